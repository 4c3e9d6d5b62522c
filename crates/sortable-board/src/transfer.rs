#![forbid(unsafe_code)]

//! Cross-container transfer.
//!
//! Moves one item out of a source container and into a different
//! destination container, placing it beside a destination item according to
//! the closest edge.
//!
//! # Invariants
//!
//! 1. The total item count of the board is conserved.
//! 2. On success the item leaves exactly one container and enters exactly one
//!    other; every other container is untouched.
//! 3. Reference and index errors return the input board unchanged.
//!
//! # Insertion rule
//!
//! | destination | edge      | index                                   |
//! |-------------|-----------|-----------------------------------------|
//! | empty       | any       | 0                                       |
//! | non-empty   | none      | 0                                       |
//! | non-empty   | top/left  | `dest_index`, clamped to `len`          |
//! | non-empty   | bottom/right | `dest_index + 1`, clamped to `len`   |
//!
//! An absent `dest_index` counts as 0.

use sortable_core::Edge;

use crate::model::{Board, ContainerId};
use crate::reorder::edge_adjusted_index;

/// Insertion index into a destination of length `dest_len`.
#[must_use]
pub fn insertion_index(dest_len: usize, dest_index: Option<usize>, edge: Option<Edge>) -> usize {
    if dest_len == 0 || edge.is_none() {
        return 0;
    }
    edge_adjusted_index(dest_index.unwrap_or(0), edge).min(dest_len)
}

/// Move `source[source_index]` into `dest` beside `dest[dest_index]`.
///
/// Returns a copy of `board` unchanged when the containers are equal,
/// either container is missing, or `source_index` is out of range.
#[must_use]
pub fn transfer(
    board: &Board,
    source: &ContainerId,
    dest: &ContainerId,
    source_index: usize,
    dest_index: Option<usize>,
    edge: Option<Edge>,
) -> Board {
    let mut next = board.clone();
    if source == dest {
        return next;
    }
    let (Some(si), Some(di)) = (board.container_index(source), board.container_index(dest)) else {
        return next;
    };
    if source_index >= board.containers()[si].len() {
        return next;
    }

    let containers = next.containers_mut();
    let moved = containers[si].items_mut().remove(source_index);
    let dest_items = containers[di].items_mut();
    let at = insertion_index(dest_items.len(), dest_index, edge);
    dest_items.insert(at, moved);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Container, Item};

    fn board(columns: &[(&str, &[&str])]) -> Board {
        Board::new(columns.iter().map(|(id, items)| {
            Container::new(*id, *id).with_items(items.iter().map(|t| Item::new(*t, *t)))
        }))
    }

    fn names(board: &Board, id: &str) -> Vec<String> {
        board
            .container(&id.into())
            .map(|c| c.item_names().into_iter().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    #[test]
    fn into_empty_destination_without_edge() {
        let b = board(&[("A", &["t1", "t2", "t3"]), ("B", &[])]);
        let next = transfer(&b, &"A".into(), &"B".into(), 1, None, None);
        assert_eq!(names(&next, "A"), ["t1", "t3"]);
        assert_eq!(names(&next, "B"), ["t2"]);
    }

    #[test]
    fn onto_bottom_of_last_item_appends() {
        let b = board(&[("A", &["t1", "t2"]), ("B", &["t3", "t4"])]);
        let next = transfer(&b, &"A".into(), &"B".into(), 0, Some(1), Some(Edge::Bottom));
        assert_eq!(names(&next, "A"), ["t2"]);
        assert_eq!(names(&next, "B"), ["t3", "t4", "t1"]);
    }

    #[test]
    fn onto_top_inserts_before() {
        let b = board(&[("A", &["t1", "t2"]), ("B", &["t3", "t4"])]);
        let next = transfer(&b, &"A".into(), &"B".into(), 1, Some(1), Some(Edge::Top));
        assert_eq!(names(&next, "B"), ["t3", "t2", "t4"]);
    }

    #[test]
    fn no_edge_prepends_into_non_empty() {
        let b = board(&[("A", &["t1"]), ("B", &["t3", "t4"])]);
        let next = transfer(&b, &"A".into(), &"B".into(), 0, Some(1), None);
        assert_eq!(names(&next, "B"), ["t1", "t3", "t4"]);
    }

    #[test]
    fn out_of_range_dest_index_clamps_to_append() {
        let b = board(&[("A", &["t1"]), ("B", &["t3", "t4"])]);
        let next = transfer(&b, &"A".into(), &"B".into(), 0, Some(5), Some(Edge::Bottom));
        assert_eq!(names(&next, "B"), ["t3", "t4", "t1"]);
    }

    #[test]
    fn same_container_is_noop() {
        let b = board(&[("A", &["t1", "t2"])]);
        assert_eq!(transfer(&b, &"A".into(), &"A".into(), 0, Some(1), Some(Edge::Bottom)), b);
    }

    #[test]
    fn missing_container_or_index_is_noop() {
        let b = board(&[("A", &["t1"]), ("B", &[])]);
        assert_eq!(transfer(&b, &"A".into(), &"Z".into(), 0, None, None), b);
        assert_eq!(transfer(&b, &"Z".into(), &"B".into(), 0, None, None), b);
        assert_eq!(transfer(&b, &"A".into(), &"B".into(), 3, None, None), b);
    }

    #[test]
    fn other_containers_untouched() {
        let b = board(&[("A", &["t1"]), ("B", &["t2"]), ("C", &["t3"])]);
        let next = transfer(&b, &"A".into(), &"C".into(), 0, Some(0), Some(Edge::Top));
        assert_eq!(names(&next, "B"), ["t2"]);
        assert_eq!(names(&next, "C"), ["t1", "t3"]);
        assert_eq!(next.item_count(), 3);
    }

    #[test]
    fn insertion_index_table() {
        assert_eq!(insertion_index(0, Some(3), Some(Edge::Bottom)), 0);
        assert_eq!(insertion_index(4, Some(3), None), 0);
        assert_eq!(insertion_index(4, None, Some(Edge::Bottom)), 1);
        assert_eq!(insertion_index(4, Some(2), Some(Edge::Top)), 2);
        assert_eq!(insertion_index(4, Some(3), Some(Edge::Bottom)), 4);
        assert_eq!(insertion_index(2, Some(9), Some(Edge::Top)), 2);
    }
}
