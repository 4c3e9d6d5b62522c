#![forbid(unsafe_code)]

//! Board controller: the single writer of the authoritative [`Board`].
//!
//! [`BoardController::on_drag_end`] classifies a drop by payload kind and
//! target kind, resolves every index against the *current* board, runs the
//! matching engine, and commits the result as one replacement of the board
//! value. The controller is also a [`DropMonitor`], so registering it with a
//! [`crate::adapter::DndRegistry`] wires drops straight into commits.
//!
//! # Dispatch
//!
//! | payload   | target                         | engine                 |
//! |-----------|--------------------------------|------------------------|
//! | item      | item, same container           | reorder with edge      |
//! | item      | item, other container          | transfer beside target |
//! | item      | container, other container     | transfer, prepend      |
//! | item      | container, same container      | no-op                  |
//! | container | container                      | column policy          |
//! | container | item                           | no-op (mismatch)       |
//!
//! # Invariants
//!
//! 1. The board is replaced whole, never edited in place; `version`
//!    increments exactly once per replacement.
//! 2. No-ops never bump `version`.
//! 3. Drag-and-drop commits conserve the total item count.

use sortable_core::Edge;
use tracing::{debug, debug_span, warn};

use crate::adapter::DropMonitor;
use crate::columns::ColumnReorderPolicy;
use crate::config::BoardConfig;
use crate::model::{Board, Container, ContainerId, Item, ItemId};
use crate::payload::{DragPayload, DropLocation, DropTargetData};
use crate::reorder::reorder_with_edge;
use crate::transfer::{insertion_index, transfer};

/// Why a drop changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoopReason {
    /// The session ended over no target.
    NoDropTarget,
    /// The payload kind cannot land on this target kind.
    CapabilityMismatch,
    /// A referenced container no longer exists.
    MissingContainer,
    /// A referenced item no longer exists.
    MissingItem,
    /// An item was dropped on its own container.
    SameContainer,
    /// An element was dropped on itself.
    SelfDrop,
    /// The engine produced the current ordering.
    Unchanged,
}

impl NoopReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoDropTarget => "no_drop_target",
            Self::CapabilityMismatch => "capability_mismatch",
            Self::MissingContainer => "missing_container",
            Self::MissingItem => "missing_item",
            Self::SameContainer => "same_container",
            Self::SelfDrop => "self_drop",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Result of one drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Reordered {
        container_id: ContainerId,
        from: usize,
        to: usize,
    },
    Transferred {
        item_id: ItemId,
        from: ContainerId,
        to: ContainerId,
        index: usize,
    },
    ColumnMoved {
        container_id: ContainerId,
        from: usize,
        to: usize,
    },
    Noop {
        reason: NoopReason,
    },
}

impl DropOutcome {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop { .. })
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Reordered { .. } => "reordered",
            Self::Transferred { .. } => "transferred",
            Self::ColumnMoved { .. } => "column_moved",
            Self::Noop { .. } => "noop",
        }
    }

    const fn noop(reason: NoopReason) -> Self {
        Self::Noop { reason }
    }
}

/// Owner of the authoritative board.
#[derive(Debug, Clone)]
pub struct BoardController {
    board: Board,
    policy: ColumnReorderPolicy,
    version: u64,
    last_outcome: Option<DropOutcome>,
}

impl Default for BoardController {
    fn default() -> Self {
        Self::new(Board::default())
    }
}

impl BoardController {
    pub fn new(board: Board) -> Self {
        Self::with_policy(board, ColumnReorderPolicy::default())
    }

    pub fn with_config(board: Board, config: &BoardConfig) -> Self {
        Self::with_policy(board, config.column_policy)
    }

    pub fn with_policy(board: Board, policy: ColumnReorderPolicy) -> Self {
        Self {
            board,
            policy,
            version: 0,
            last_outcome: None,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of committed changes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn policy(&self) -> ColumnReorderPolicy {
        self.policy
    }

    /// Outcome of the most recent drop handled through [`DropMonitor`].
    #[must_use]
    pub fn last_outcome(&self) -> Option<&DropOutcome> {
        self.last_outcome.as_ref()
    }

    /// Apply a finished drag to the board.
    pub fn on_drag_end(
        &mut self,
        payload: &DragPayload,
        location: Option<&DropLocation>,
    ) -> DropOutcome {
        let Some(location) = location else {
            debug!(target: "sortable.board", reason = "no_drop_target", "drop ignored");
            return DropOutcome::noop(NoopReason::NoDropTarget);
        };
        let (next, outcome) = match payload {
            DragPayload::Item { item_id, .. } => {
                self.drop_item(item_id, &location.target, location.edge)
            }
            DragPayload::Container { container_id, .. } => {
                self.drop_container(container_id, &location.target, location.edge)
            }
        };
        match next {
            Some(next) => self.commit(next, &outcome),
            None => match outcome {
                DropOutcome::Noop {
                    reason: NoopReason::CapabilityMismatch,
                } => warn!(
                    target: "sortable.board",
                    payload = payload.kind().as_str(),
                    target_kind = location.target.kind().as_str(),
                    "drop rejected: capability mismatch"
                ),
                DropOutcome::Noop { reason } => {
                    debug!(target: "sortable.board", reason = reason.as_str(), "drop ignored");
                }
                _ => {}
            },
        }
        outcome
    }

    /// Append a new item to `container_id`. `None` if the container is gone.
    pub fn add_item(
        &mut self,
        container_id: &ContainerId,
        name: impl Into<String>,
    ) -> Option<ItemId> {
        let index = self.board.container_index(container_id)?;
        let item = Item::named(name);
        let id = item.id().clone();
        let mut next = self.board.clone();
        next.containers_mut()[index].items_mut().push(item);
        self.commit_action(next, "add_item");
        Some(id)
    }

    /// Append a new empty container.
    pub fn add_container(&mut self, name: impl Into<String>) -> ContainerId {
        let container = Container::named(name);
        let id = container.id().clone();
        let mut next = self.board.clone();
        next.containers_mut().push(container);
        self.commit_action(next, "add_container");
        id
    }

    /// Remove a container and the items in it.
    pub fn remove_container(&mut self, container_id: &ContainerId) -> Option<Container> {
        let index = self.board.container_index(container_id)?;
        let mut next = self.board.clone();
        let removed = next.containers_mut().remove(index);
        self.commit_action(next, "remove_container");
        Some(removed)
    }

    fn drop_item(
        &self,
        item_id: &ItemId,
        target: &DropTargetData,
        edge: Option<Edge>,
    ) -> (Option<Board>, DropOutcome) {
        let Some((source_ci, source_index)) = self.board.locate_item(item_id) else {
            return (None, DropOutcome::noop(NoopReason::MissingItem));
        };
        let source_id = self.board.containers()[source_ci].id().clone();

        match target {
            DropTargetData::Item {
                item_id: target_id, ..
            } => {
                if target_id == item_id {
                    return (None, DropOutcome::noop(NoopReason::SelfDrop));
                }
                let Some((dest_ci, target_index)) = self.board.locate_item(target_id) else {
                    return (None, DropOutcome::noop(NoopReason::MissingItem));
                };
                if dest_ci == source_ci {
                    let items = self.board.containers()[source_ci].items();
                    let items = reorder_with_edge(items, source_index, Some(target_index), edge);
                    let Some(to) = items.iter().position(|i| i.id() == item_id) else {
                        return (None, DropOutcome::noop(NoopReason::MissingItem));
                    };
                    if to == source_index {
                        return (None, DropOutcome::noop(NoopReason::Unchanged));
                    }
                    let mut next = self.board.clone();
                    *next.containers_mut()[source_ci].items_mut() = items;
                    let outcome = DropOutcome::Reordered {
                        container_id: source_id,
                        from: source_index,
                        to,
                    };
                    (Some(next), outcome)
                } else {
                    let dest = &self.board.containers()[dest_ci];
                    let index = insertion_index(dest.len(), Some(target_index), edge);
                    let dest_id = dest.id().clone();
                    let next = transfer(
                        &self.board,
                        &source_id,
                        &dest_id,
                        source_index,
                        Some(target_index),
                        edge,
                    );
                    let outcome = DropOutcome::Transferred {
                        item_id: item_id.clone(),
                        from: source_id,
                        to: dest_id,
                        index,
                    };
                    (Some(next), outcome)
                }
            }
            DropTargetData::Container { container_id, .. } => {
                if self.board.container_index(container_id).is_none() {
                    return (None, DropOutcome::noop(NoopReason::MissingContainer));
                }
                if *container_id == source_id {
                    return (None, DropOutcome::noop(NoopReason::SameContainer));
                }
                // Container targets carry a horizontal edge; items prepend.
                let next =
                    transfer(&self.board, &source_id, container_id, source_index, None, None);
                let outcome = DropOutcome::Transferred {
                    item_id: item_id.clone(),
                    from: source_id,
                    to: container_id.clone(),
                    index: 0,
                };
                (Some(next), outcome)
            }
        }
    }

    fn drop_container(
        &self,
        container_id: &ContainerId,
        target: &DropTargetData,
        edge: Option<Edge>,
    ) -> (Option<Board>, DropOutcome) {
        let DropTargetData::Container {
            container_id: target_id, ..
        } = target
        else {
            return (None, DropOutcome::noop(NoopReason::CapabilityMismatch));
        };
        let (Some(from), Some(target_index)) = (
            self.board.container_index(container_id),
            self.board.container_index(target_id),
        ) else {
            return (None, DropOutcome::noop(NoopReason::MissingContainer));
        };
        if from == target_index {
            return (None, DropOutcome::noop(NoopReason::SelfDrop));
        }
        let next = self.policy.apply(&self.board, from, target_index, edge);
        let Some(to) = next.container_index(container_id) else {
            return (None, DropOutcome::noop(NoopReason::MissingContainer));
        };
        if to == from {
            return (None, DropOutcome::noop(NoopReason::Unchanged));
        }
        let outcome = DropOutcome::ColumnMoved {
            container_id: container_id.clone(),
            from,
            to,
        };
        (Some(next), outcome)
    }

    fn commit(&mut self, next: Board, outcome: &DropOutcome) {
        let _span = debug_span!(
            target: "sortable.board",
            "board.commit",
            outcome = outcome.kind(),
            version = self.version + 1
        )
        .entered();
        self.board = next;
        self.version += 1;
        debug!(
            target: "sortable.board",
            ?outcome,
            items = self.board.item_count(),
            "board committed"
        );
    }

    fn commit_action(&mut self, next: Board, action: &'static str) {
        let _span = debug_span!(
            target: "sortable.board",
            "board.commit",
            outcome = action,
            version = self.version + 1
        )
        .entered();
        self.board = next;
        self.version += 1;
        debug!(
            target: "sortable.board",
            containers = self.board.containers().len(),
            items = self.board.item_count(),
            "board committed"
        );
    }
}

impl DropMonitor for BoardController {
    fn on_drop(&mut self, payload: &DragPayload, location: Option<&DropLocation>) {
        self.last_outcome = Some(self.on_drag_end(payload, location));
    }
}
