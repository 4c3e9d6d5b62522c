#![forbid(unsafe_code)]

//! Single-list sortable mode.
//!
//! [`SortableList`] is the one-column counterpart of
//! [`crate::controller::BoardController`]: it owns one ordered `Vec<Item>`
//! and reorders it by item ids resolved against the current list. Unknown
//! ids and drops that would not change the order are no-ops.

use sortable_core::Edge;
use tracing::debug;

use crate::adapter::DropMonitor;
use crate::model::{Item, ItemId};
use crate::payload::{DragPayload, DropLocation, DropTargetData};
use crate::reorder::reorder_with_edge;

/// An ordered list of items with edge-aware reordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortableList {
    items: Vec<Item>,
    version: u64,
}

impl SortableList {
    pub fn new(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items.into_iter().collect(),
            version: 0,
        }
    }

    /// Four items, `test1`..`test4`, fresh ids.
    #[must_use]
    pub fn demo() -> Self {
        Self::new((1..=4).map(|n| Item::named(format!("test{n}"))))
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Move `source` to the `edge` side of `target`.
    ///
    /// Returns the `(from, to)` indices when the order changed.
    pub fn move_item(
        &mut self,
        source: &ItemId,
        target: &ItemId,
        edge: Option<Edge>,
    ) -> Option<(usize, usize)> {
        let from = self.index_of(source)?;
        let target_index = self.index_of(target)?;
        let next = reorder_with_edge(&self.items, from, Some(target_index), edge);
        let to = next.iter().position(|item| item.id() == source)?;
        if to == from {
            return None;
        }
        self.items = next;
        self.version += 1;
        debug!(target: "sortable.board", from, to, version = self.version, "list reordered");
        Some((from, to))
    }
}

impl DropMonitor for SortableList {
    fn can_monitor(&self, payload: &DragPayload) -> bool {
        matches!(payload, DragPayload::Item { .. })
    }

    fn on_drop(&mut self, payload: &DragPayload, location: Option<&DropLocation>) {
        let (
            DragPayload::Item { item_id, .. },
            Some(DropLocation {
                target: DropTargetData::Item {
                    item_id: target_id, ..
                },
                edge,
            }),
        ) = (payload, location)
        else {
            return;
        };
        self.move_item(item_id, target_id, *edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> SortableList {
        SortableList::new(["a", "b", "c", "d"].map(|id| Item::new(id, id)))
    }

    fn order(list: &SortableList) -> Vec<&str> {
        list.items().iter().map(Item::name).collect()
    }

    #[test]
    fn moves_by_id() {
        let mut l = list();
        assert_eq!(l.move_item(&"a".into(), &"c".into(), Some(Edge::Bottom)), Some((0, 2)));
        assert_eq!(order(&l), ["b", "c", "a", "d"]);
        assert_eq!(l.version(), 1);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut l = list();
        assert_eq!(l.move_item(&"zz".into(), &"a".into(), None), None);
        assert_eq!(l.move_item(&"a".into(), &"zz".into(), None), None);
        assert_eq!(l, list());
    }

    #[test]
    fn self_drop_is_noop() {
        let mut l = list();
        assert_eq!(l.move_item(&"b".into(), &"b".into(), Some(Edge::Top)), None);
        assert_eq!(l.move_item(&"b".into(), &"b".into(), Some(Edge::Bottom)), None);
        assert_eq!(l.version(), 0);
    }

    #[test]
    fn monitor_applies_item_drops_only() {
        let mut l = list();
        let payload = DragPayload::Item {
            item_id: "d".into(),
            container_id: "list".into(),
            source_index: 3,
        };
        let location = DropLocation::new(
            DropTargetData::Item {
                item_id: "a".into(),
                container_id: "list".into(),
                index: 0,
            },
            Some(Edge::Top),
        );
        assert!(l.can_monitor(&payload));
        l.on_drop(&payload, Some(&location));
        assert_eq!(order(&l), ["d", "a", "b", "c"]);
        l.on_drop(&payload, None);
        assert_eq!(l.version(), 1);
    }

    #[test]
    fn demo_has_four_items() {
        let l = SortableList::demo();
        assert_eq!(order(&l), ["test1", "test2", "test3", "test4"]);
    }
}
