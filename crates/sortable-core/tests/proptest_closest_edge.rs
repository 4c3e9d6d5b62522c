//! Property-based invariants for closest-edge detection.
//!
//! 1. The detected edge is always a member of the allowed set
//! 2. No allowed edge is strictly closer than the detected one
//! 3. Ties never resolve to a trailing edge when the leading one is allowed
//! 4. Inside a target, the half containing the pointer decides the edge
//! 5. An empty allowed set never yields an edge

use proptest::prelude::*;
use sortable_core::{ClosestEdge, Edge, EdgeDetector, EdgeSet, Position, Rect};

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0u16..200, 0u16..200, 1u16..60, 1u16..60).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn pointer_strategy() -> impl Strategy<Value = Position> {
    (0u16..300, 0u16..300).prop_map(|(x, y)| Position::new(x, y))
}

fn edge_set_strategy() -> impl Strategy<Value = EdgeSet> {
    (0u8..16).prop_map(EdgeSet::from_bits_truncate)
}

proptest! {
    #[test]
    fn detected_edge_is_allowed(
        rect in rect_strategy(),
        pointer in pointer_strategy(),
        allowed in edge_set_strategy(),
    ) {
        match ClosestEdge.detect(rect, pointer, allowed) {
            Some(edge) => prop_assert!(allowed.allows(edge)),
            None => prop_assert!(allowed.is_empty()),
        }
    }

    #[test]
    fn detected_edge_is_minimal(
        rect in rect_strategy(),
        pointer in pointer_strategy(),
        allowed in edge_set_strategy(),
    ) {
        if let Some(edge) = ClosestEdge.detect(rect, pointer, allowed) {
            let best = ClosestEdge::distance(rect, pointer, edge);
            for other in allowed.iter_edges() {
                prop_assert!(best <= ClosestEdge::distance(rect, pointer, other));
            }
        }
    }

    #[test]
    fn ties_prefer_leading_edge(
        rect in rect_strategy(),
        pointer in pointer_strategy(),
    ) {
        let edge = ClosestEdge.detect(rect, pointer, EdgeSet::VERTICAL);
        let top = ClosestEdge::distance(rect, pointer, Edge::Top);
        let bottom = ClosestEdge::distance(rect, pointer, Edge::Bottom);
        if top == bottom {
            prop_assert_eq!(edge, Some(Edge::Top));
        }
        let edge = ClosestEdge.detect(rect, pointer, EdgeSet::HORIZONTAL);
        let left = ClosestEdge::distance(rect, pointer, Edge::Left);
        let right = ClosestEdge::distance(rect, pointer, Edge::Right);
        if left == right {
            prop_assert_eq!(edge, Some(Edge::Left));
        }
    }

    #[test]
    fn half_containing_pointer_decides(
        rect in rect_strategy(),
        dx in 0u16..60,
        dy in 0u16..60,
    ) {
        let pointer = Position::new(rect.x + dx % rect.width, rect.y + dy % rect.height);
        let offset = u32::from(pointer.y - rect.y) * 2 + 1;
        let height = u32::from(rect.height);
        let expected = if offset > height { Edge::Bottom } else { Edge::Top };
        prop_assert_eq!(
            ClosestEdge.detect(rect, pointer, EdgeSet::VERTICAL),
            Some(expected)
        );
    }

    #[test]
    fn empty_set_never_detects(rect in rect_strategy(), pointer in pointer_strategy()) {
        prop_assert_eq!(ClosestEdge.detect(rect, pointer, EdgeSet::empty()), None);
    }
}
