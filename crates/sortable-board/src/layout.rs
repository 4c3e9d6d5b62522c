#![forbid(unsafe_code)]

//! Column/card geometry and one-call registration of a whole board.
//!
//! [`BoardLayout`] lays columns out left to right and cards top to bottom
//! inside a one-cell column border, then registers every column and card
//! with a [`DndRegistry`]. Cards that overflow the column are clipped to its
//! interior; a card past the bottom gets an empty rect and cannot be hit.
//!
//!
//! - columns are draggable, and are sticky drop targets for items and
//!   columns that report [`BoardConfig::column_edges`];
//! - cards are draggable, and are sticky drop targets for items that report
//!   [`BoardConfig::item_edges`];
//! - the controller is registered as a [`crate::adapter::DropMonitor`].
//!
//! Payload and target data are resolved against the controller's current
//! board when they are requested, so a registration made before a commit
//! still reports correct indices. Positions do go stale after a commit;
//! hosts re-register (drop the old [`RegisteredBoard`], call
//! [`BoardLayout::register`] again) whenever the board version changes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use sortable_core::{Position, Rect};

use crate::adapter::{
    CombinedRegistration, DndRegistry, DraggableSpec, DropTargetSpec, ElementId,
};
use crate::config::BoardConfig;
use crate::controller::BoardController;
use crate::model::{ContainerId, ItemId};
use crate::payload::{DragPayload, DropTargetData, PayloadKinds};

/// Cell metrics for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    /// Top-left corner of the first column.
    pub origin: Position,
    pub column_width: u16,
    pub column_height: u16,
    /// Blank cells between adjacent columns.
    pub column_gap: u16,
    pub card_height: u16,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            origin: Position::new(0, 0),
            column_width: 30,
            column_height: 23,
            column_gap: 0,
            card_height: 3,
        }
    }
}

/// What a registered element stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoardElement {
    Container(ContainerId),
    Item(ItemId),
}

/// Geometry plus registration policy for a board.
#[derive(Debug, Clone, Default)]
pub struct BoardLayout {
    metrics: LayoutMetrics,
    config: BoardConfig,
}

impl BoardLayout {
    pub fn new(metrics: LayoutMetrics, config: BoardConfig) -> Self {
        Self { metrics, config }
    }

    #[must_use]
    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Outer rectangle of the column at `index`.
    #[must_use]
    pub fn column_rect(&self, index: usize) -> Rect {
        let m = &self.metrics;
        let stride = u32::from(m.column_width) + u32::from(m.column_gap);
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        let x = u32::from(m.origin.x).saturating_add(stride.saturating_mul(index));
        Rect::new(
            u16::try_from(x).unwrap_or(u16::MAX),
            m.origin.y,
            m.column_width,
            m.column_height,
        )
    }

    /// Rectangle of card `card` in column `column`, clipped to the column
    /// interior.
    #[must_use]
    pub fn card_rect(&self, column: usize, card: usize) -> Rect {
        let col = self.column_rect(column);
        let interior = Rect::new(
            col.x.saturating_add(1),
            col.y.saturating_add(1),
            col.width.saturating_sub(2),
            col.height.saturating_sub(2),
        );
        let m = &self.metrics;
        let card = u32::try_from(card).unwrap_or(u32::MAX);
        let y = u32::from(interior.y).saturating_add(u32::from(m.card_height).saturating_mul(card));
        Rect::new(
            interior.x,
            u16::try_from(y).unwrap_or(u16::MAX),
            interior.width,
            m.card_height,
        )
        .clip_to(&interior)
    }

    /// Register every column and card of the controller's current board.
    pub fn register(
        &self,
        registry: &DndRegistry,
        controller: &Rc<RefCell<BoardController>>,
    ) -> RegisteredBoard {
        let mut registered = RegisteredBoard::default();
        registered.guard.push(registry.monitor(controller));
        let weak = Rc::downgrade(controller);
        let board = controller.borrow().board().clone();
        let mut next_id = 0u64;
        let mut allocate = || {
            next_id += 1;
            ElementId::new(next_id)
        };

        for (ci, container) in board.containers().iter().enumerate() {
            let element = allocate();
            let column_rect = self.column_rect(ci);
            let id = container.id().clone();

            let (provider_weak, provider_id) = (weak.clone(), id.clone());
            registered.guard.push(registry.register_draggable(
                element,
                DraggableSpec::new(column_rect, move || DragPayload::Container {
                    source_index: container_index(&provider_weak, &provider_id).unwrap_or(ci),
                    container_id: provider_id.clone(),
                }),
            ));
            let (target_weak, target_id) = (weak.clone(), id.clone());
            registered.guard.push(
                registry.register_drop_target(
                    element,
                    DropTargetSpec::new(column_rect, move || DropTargetData::Container {
                        index: container_index(&target_weak, &target_id).unwrap_or(ci),
                        container_id: target_id.clone(),
                    })
                    .accepts(PayloadKinds::ITEM | PayloadKinds::CONTAINER)
                    .allowed_edges(self.config.column_edges)
                    .sticky(true),
                ),
            );
            registered.insert(element, BoardElement::Container(id.clone()));

            for (ii, item) in container.items().iter().enumerate() {
                let element = allocate();
                let card_rect = self.card_rect(ci, ii);
                let item_id = item.id().clone();
                let fallback = (id.clone(), ii);

                let (provider_weak, provider_item, provider_fallback) =
                    (weak.clone(), item_id.clone(), fallback.clone());
                registered.guard.push(registry.register_draggable(
                    element,
                    DraggableSpec::new(card_rect, move || {
                        let (container_id, source_index) =
                            item_position(&provider_weak, &provider_item)
                                .unwrap_or_else(|| provider_fallback.clone());
                        DragPayload::Item {
                            item_id: provider_item.clone(),
                            container_id,
                            source_index,
                        }
                    }),
                ));
                let (target_weak, target_item) = (weak.clone(), item_id.clone());
                registered.guard.push(
                    registry.register_drop_target(
                        element,
                        DropTargetSpec::new(card_rect, move || {
                            let (container_id, index) = item_position(&target_weak, &target_item)
                                .unwrap_or_else(|| fallback.clone());
                            DropTargetData::Item {
                                item_id: target_item.clone(),
                                container_id,
                                index,
                            }
                        })
                        .accepts(PayloadKinds::ITEM)
                        .allowed_edges(self.config.item_edges)
                        .sticky(true),
                    ),
                );
                registered.insert(element, BoardElement::Item(item_id));
            }
        }
        registered
    }
}

type SharedController = Weak<RefCell<BoardController>>;

fn container_index(controller: &SharedController, id: &ContainerId) -> Option<usize> {
    let controller = controller.upgrade()?;
    let controller = controller.borrow();
    controller.board().container_index(id)
}

fn item_position(controller: &SharedController, id: &ItemId) -> Option<(ContainerId, usize)> {
    let controller = controller.upgrade()?;
    let controller = controller.borrow();
    let board = controller.board();
    let (ci, ii) = board.locate_item(id)?;
    Some((board.containers()[ci].id().clone(), ii))
}

/// Live registrations of one board plus the element mapping.
#[derive(Debug, Default)]
pub struct RegisteredBoard {
    guard: CombinedRegistration,
    elements: AHashMap<ElementId, BoardElement>,
    reverse: AHashMap<BoardElement, ElementId>,
}

impl RegisteredBoard {
    fn insert(&mut self, element: ElementId, what: BoardElement) {
        self.reverse.insert(what.clone(), element);
        self.elements.insert(element, what);
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&BoardElement> {
        self.elements.get(&id)
    }

    #[must_use]
    pub fn item_element(&self, id: &ItemId) -> Option<ElementId> {
        self.reverse.get(&BoardElement::Item(id.clone())).copied()
    }

    #[must_use]
    pub fn container_element(&self, id: &ContainerId) -> Option<ElementId> {
        self.reverse.get(&BoardElement::Container(id.clone())).copied()
    }

    /// Number of registered elements (columns plus cards).
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Board;
    use crate::visual::DragVisualState;

    fn setup() -> (DndRegistry, Rc<RefCell<BoardController>>, RegisteredBoard) {
        let registry = DndRegistry::new();
        let controller = Rc::new(RefCell::new(BoardController::new(Board::demo())));
        let registered = BoardLayout::default().register(&registry, &controller);
        (registry, controller, registered)
    }

    #[test]
    fn geometry_matches_bordered_columns() {
        let layout = BoardLayout::default();
        assert_eq!(layout.column_rect(0), Rect::new(0, 0, 30, 23));
        assert_eq!(layout.column_rect(1), Rect::new(30, 0, 30, 23));
        assert_eq!(layout.card_rect(0, 0), Rect::new(1, 1, 28, 3));
        assert_eq!(layout.card_rect(1, 2), Rect::new(31, 7, 28, 3));
    }

    #[test]
    fn gap_offsets_columns() {
        let layout = BoardLayout::new(
            LayoutMetrics {
                column_gap: 2,
                origin: Position::new(4, 1),
                ..LayoutMetrics::default()
            },
            BoardConfig::default(),
        );
        assert_eq!(layout.column_rect(1), Rect::new(36, 1, 30, 23));
    }

    #[test]
    fn overflowing_cards_are_clipped_to_the_column() {
        let layout = BoardLayout::default();
        assert_eq!(layout.card_rect(0, 6), Rect::new(1, 19, 28, 3));
        assert!(layout.card_rect(0, 7).is_empty());
        assert!(layout.card_rect(0, usize::MAX).is_empty());

        let short = BoardLayout::new(
            LayoutMetrics {
                column_height: 6,
                ..LayoutMetrics::default()
            },
            BoardConfig::default(),
        );
        assert_eq!(short.card_rect(0, 1), Rect::new(1, 4, 28, 1));
    }

    #[test]
    fn huge_indices_saturate() {
        let layout = BoardLayout::default();
        let far = layout.column_rect(usize::MAX);
        assert_eq!(far.x, u16::MAX);
        assert!(!far.contains(Position::new(0, 0)));
    }

    #[test]
    fn registers_every_column_and_card() {
        let (registry, controller, registered) = setup();
        assert_eq!(registered.len(), 10);
        let board = controller.borrow().board().clone();
        let first = board.containers()[0].items()[0].id();
        let element = registered.item_element(first).unwrap();
        assert_eq!(registered.element(element), Some(&BoardElement::Item(first.clone())));
        assert_eq!(registry.visual_state(element), Some(DragVisualState::Idle));
        assert_eq!(registry.draggable_at(Position::new(2, 2)), Some(element));
        let column = registered.container_element(board.containers()[1].id()).unwrap();
        assert_eq!(registry.draggable_at(Position::new(35, 20)), Some(column));
    }

    #[test]
    fn dropping_registration_unregisters_everything() {
        let (registry, _controller, registered) = setup();
        drop(registered);
        assert_eq!(registry.draggable_at(Position::new(2, 2)), None);
    }
}
