#![forbid(unsafe_code)]

//! Same-sequence reordering.
//!
//! Two rules live here and are reused by the transfer and column engines:
//!
//! - [`reorder_with_edge`]: move one element so it lands on the chosen side
//!   of a target element. A trailing edge (bottom/right) means "after the
//!   target", a leading edge (top/left) or no edge means "before it".
//! - [`reorder`]: plain positional move, `remove(start)` then
//!   `insert(finish)`.
//!
//! # Invariants
//!
//! 1. The output is a permutation of the input.
//! 2. Elements other than the moved one keep their relative order.
//! 3. Out-of-range inputs never panic: a bad start index returns the input
//!    unchanged, and a bad target is clamped into range.

use sortable_core::Edge;

/// Index a dropped element should occupy *before* the source is removed.
///
/// `target + 1` for a trailing edge, `target` otherwise.
#[inline]
#[must_use]
pub fn edge_adjusted_index(target: usize, edge: Option<Edge>) -> usize {
    if edge.is_some_and(Edge::is_trailing) {
        target.saturating_add(1)
    } else {
        target
    }
}

/// Final insertion index for moving `start` next to `target` within one
/// sequence of length `len`.
///
/// Returns `None` when `start` is out of range.
#[must_use]
pub fn reorder_destination(
    len: usize,
    start: usize,
    target: Option<usize>,
    edge: Option<Edge>,
) -> Option<usize> {
    if start >= len {
        return None;
    }
    // An absent target is a prepend with no edge.
    let (target, edge) = match target {
        Some(target) => (target, edge),
        None => (0, None),
    };
    if start == target && edge.is_some_and(Edge::is_leading) {
        return Some(start);
    }
    let mut adjusted = edge_adjusted_index(target, edge);
    if start < adjusted {
        adjusted -= 1;
    }
    // After removal the sequence holds `len - 1` elements.
    Some(adjusted.min(len - 1))
}

/// Move `list[start]` to the `edge` side of `list[target]`.
///
/// `target == None` prepends. A `start` outside the list returns a copy of
/// the input.
#[must_use]
pub fn reorder_with_edge<T: Clone>(
    list: &[T],
    start: usize,
    target: Option<usize>,
    edge: Option<Edge>,
) -> Vec<T> {
    let mut out = list.to_vec();
    if let Some(dest) = reorder_destination(list.len(), start, target, edge) {
        if dest != start {
            let moved = out.remove(start);
            out.insert(dest, moved);
        }
    }
    out
}

/// Positional move: remove at `start`, insert at `finish` (clamped).
#[must_use]
pub fn reorder<T: Clone>(list: &[T], start: usize, finish: usize) -> Vec<T> {
    let mut out = list.to_vec();
    if start < out.len() {
        let moved = out.remove(start);
        let finish = finish.min(out.len());
        out.insert(finish, moved);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABCD: [char; 4] = ['a', 'b', 'c', 'd'];

    #[test]
    fn self_drop_on_leading_edge_is_identity() {
        for i in 0..ABCD.len() {
            assert_eq!(reorder_with_edge(&ABCD, i, Some(i), Some(Edge::Top)), ABCD);
            assert_eq!(reorder_with_edge(&ABCD, i, Some(i), Some(Edge::Left)), ABCD);
        }
    }

    #[test]
    fn self_drop_on_trailing_edge_is_identity() {
        for i in 0..ABCD.len() {
            assert_eq!(reorder_with_edge(&ABCD, i, Some(i), Some(Edge::Bottom)), ABCD);
        }
    }

    #[test]
    fn forward_move_to_bottom_lands_after_target() {
        assert_eq!(
            reorder_with_edge(&ABCD, 0, Some(2), Some(Edge::Bottom)),
            vec!['b', 'c', 'a', 'd']
        );
    }

    #[test]
    fn forward_move_to_top_lands_before_target() {
        assert_eq!(
            reorder_with_edge(&ABCD, 0, Some(2), Some(Edge::Top)),
            vec!['b', 'a', 'c', 'd']
        );
    }

    #[test]
    fn backward_moves() {
        assert_eq!(
            reorder_with_edge(&ABCD, 3, Some(1), Some(Edge::Top)),
            vec!['a', 'd', 'b', 'c']
        );
        assert_eq!(
            reorder_with_edge(&ABCD, 3, Some(1), Some(Edge::Bottom)),
            vec!['a', 'b', 'd', 'c']
        );
    }

    #[test]
    fn onto_last_bottom_appends() {
        assert_eq!(
            reorder_with_edge(&ABCD, 1, Some(3), Some(Edge::Bottom)),
            vec!['a', 'c', 'd', 'b']
        );
    }

    #[test]
    fn right_edge_behaves_like_bottom() {
        assert_eq!(
            reorder_with_edge(&ABCD, 0, Some(1), Some(Edge::Right)),
            reorder_with_edge(&ABCD, 0, Some(1), Some(Edge::Bottom)),
        );
    }

    #[test]
    fn absent_target_prepends() {
        assert_eq!(
            reorder_with_edge(&ABCD, 2, None, Some(Edge::Bottom)),
            vec!['c', 'a', 'b', 'd']
        );
    }

    #[test]
    fn target_past_end_clamps() {
        assert_eq!(
            reorder_with_edge(&ABCD, 0, Some(99), Some(Edge::Bottom)),
            vec!['b', 'c', 'd', 'a']
        );
    }

    #[test]
    fn start_out_of_range_is_identity() {
        assert_eq!(reorder_with_edge(&ABCD, 4, Some(0), None), ABCD);
        assert_eq!(reorder_with_edge::<char>(&[], 0, None, None), Vec::<char>::new());
    }

    #[test]
    fn positional_reorder() {
        assert_eq!(reorder(&ABCD, 0, 2), vec!['b', 'c', 'a', 'd']);
        assert_eq!(reorder(&ABCD, 3, 0), vec!['d', 'a', 'b', 'c']);
        assert_eq!(reorder(&ABCD, 1, 50), vec!['a', 'c', 'd', 'b']);
        assert_eq!(reorder(&ABCD, 9, 0), ABCD);
    }

    #[test]
    fn adjusted_index() {
        assert_eq!(edge_adjusted_index(2, Some(Edge::Bottom)), 3);
        assert_eq!(edge_adjusted_index(2, Some(Edge::Top)), 2);
        assert_eq!(edge_adjusted_index(2, None), 2);
        assert_eq!(edge_adjusted_index(usize::MAX, Some(Edge::Right)), usize::MAX);
    }
}
