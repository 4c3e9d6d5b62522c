//! Property-based invariants for the ordering engines and controller.
//!
//! 1. Reordering yields a permutation and keeps every other element's order
//! 2. Dropping an element onto itself never changes the list
//! 3. A trailing edge lands after the target, a leading edge before it
//! 4. Transfers conserve the item count and keep ids unique
//! 5. Any sequence of controller drops conserves items and bumps the version
//!    exactly once per committed change

use proptest::prelude::*;
use sortable_board::{
    Board, BoardController, Container, DragPayload, DropLocation, DropTargetData, Item,
    reorder_with_edge, transfer,
};
use sortable_core::Edge;

fn vertical_edge() -> impl Strategy<Value = Option<Edge>> {
    prop_oneof![Just(None), Just(Some(Edge::Top)), Just(Some(Edge::Bottom))]
}

fn list_and_indices() -> impl Strategy<Value = (Vec<u32>, usize, usize)> {
    (1usize..24).prop_flat_map(|len| {
        let list: Vec<u32> = (0..len as u32).collect();
        (Just(list), 0..len, 0..len)
    })
}

fn board_strategy() -> impl Strategy<Value = Board> {
    prop::collection::vec(0usize..6, 1..5).prop_map(|sizes| {
        let mut n = 0;
        Board::new(sizes.into_iter().enumerate().map(|(ci, size)| {
            Container::new(format!("c{ci}"), format!("Column{ci}")).with_items((0..size).map(|_| {
                n += 1;
                Item::new(format!("t{n}"), format!("test{n}"))
            }))
        }))
    })
}

fn ids(container: &Container) -> Vec<&str> {
    container.items().iter().map(|i| i.id().as_str()).collect()
}

proptest! {
    #[test]
    fn reorder_is_order_preserving_permutation(
        (list, start, target) in list_and_indices(),
        edge in vertical_edge(),
    ) {
        let out = reorder_with_edge(&list, start, Some(target), edge);
        let mut sorted = out.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&sorted, &list);

        let moved = list[start];
        let rest_in: Vec<u32> = list.iter().copied().filter(|v| *v != moved).collect();
        let rest_out: Vec<u32> = out.iter().copied().filter(|v| *v != moved).collect();
        prop_assert_eq!(rest_in, rest_out);
    }

    #[test]
    fn self_drop_is_identity(
        (list, start, _) in list_and_indices(),
        edge in vertical_edge(),
    ) {
        prop_assert_eq!(reorder_with_edge(&list, start, Some(start), edge), list);
    }

    #[test]
    fn edge_places_item_beside_target((list, start, target) in list_and_indices()) {
        prop_assume!(start != target);
        let moved = list[start];
        let anchor = list[target];

        let after = reorder_with_edge(&list, start, Some(target), Some(Edge::Bottom));
        let at = after.iter().position(|v| *v == anchor).unwrap();
        prop_assert_eq!(after.get(at + 1).copied(), Some(moved));

        let before = reorder_with_edge(&list, start, Some(target), Some(Edge::Top));
        let at = before.iter().position(|v| *v == anchor).unwrap();
        prop_assert!(at > 0);
        prop_assert_eq!(before[at - 1], moved);
    }

    #[test]
    fn transfer_conserves_items(
        board in board_strategy(),
        pick in any::<(prop::sample::Index, prop::sample::Index, prop::sample::Index)>(),
        dest_index in prop::option::of(0usize..8),
        edge in vertical_edge(),
    ) {
        let containers = board.containers();
        let source = &containers[pick.0.index(containers.len())];
        let dest = &containers[pick.1.index(containers.len())];
        let source_index = if source.is_empty() { 0 } else { pick.2.index(source.len()) };

        let next = transfer(&board, source.id(), dest.id(), source_index, dest_index, edge);
        prop_assert_eq!(next.item_count(), board.item_count());
        prop_assert!(next.check_invariants().is_empty());

        match source.items().get(source_index).map(Item::id) {
            Some(moved) if source.id() != dest.id() => {
                let (ci, _) = next.locate_item(moved).unwrap();
                prop_assert_eq!(next.containers()[ci].id(), dest.id());
                prop_assert_eq!(next.containers()[ci].len(), dest.len() + 1);
            }
            _ => prop_assert_eq!(&next, &board),
        }
    }

    #[test]
    fn controller_drops_conserve_items(
        board in board_strategy(),
        drops in prop::collection::vec(
            (
                any::<prop::sample::Index>(),
                any::<prop::sample::Index>(),
                vertical_edge(),
                any::<bool>(),
            ),
            1..16,
        ),
    ) {
        prop_assume!(board.item_count() > 0);
        let total = board.item_count();
        let mut controller = BoardController::new(board);

        for (source, target, edge, onto_column) in drops {
            let current = controller.board().clone();
            let items: Vec<&Item> = current.containers().iter().flat_map(|c| c.items()).collect();
            let item = items[source.index(items.len())];
            let (sci, sii) = current.locate_item(item.id()).unwrap();
            let payload = DragPayload::Item {
                item_id: item.id().clone(),
                container_id: current.containers()[sci].id().clone(),
                source_index: sii,
            };
            let location = if onto_column {
                let container = &current.containers()[target.index(current.containers().len())];
                DropLocation::new(
                    DropTargetData::Container {
                        container_id: container.id().clone(),
                        index: 0,
                    },
                    Some(Edge::Left),
                )
            } else {
                let other = items[target.index(items.len())];
                let (tci, tii) = current.locate_item(other.id()).unwrap();
                DropLocation::new(
                    DropTargetData::Item {
                        item_id: other.id().clone(),
                        container_id: current.containers()[tci].id().clone(),
                        index: tii,
                    },
                    edge,
                )
            };

            let before = controller.version();
            let outcome = controller.on_drag_end(&payload, Some(&location));
            prop_assert_eq!(controller.board().item_count(), total);
            prop_assert!(controller.board().check_invariants().is_empty());
            if outcome.is_noop() {
                prop_assert_eq!(controller.version(), before);
                prop_assert_eq!(controller.board(), &current);
            } else {
                prop_assert_eq!(controller.version(), before + 1);
                prop_assert_ne!(controller.board(), &current);
            }
        }
    }
}

fn two_columns(a: &[&str], b: &[&str]) -> Board {
    let column = |id: &str, items: &[&str]| {
        Container::new(id, id).with_items(items.iter().map(|t| Item::new(*t, *t)))
    };
    Board::new([column("A", a), column("B", b)])
}

#[test]
fn transfer_into_empty_column() {
    let board = two_columns(&["t1", "t2", "t3"], &[]);
    let next = transfer(&board, &"A".into(), &"B".into(), 1, None, None);
    assert_eq!(ids(&next.containers()[0]), ["t1", "t3"]);
    assert_eq!(ids(&next.containers()[1]), ["t2"]);
}

#[test]
fn transfer_onto_bottom_edge_appends_after_target() {
    let board = two_columns(&["t1", "t2"], &["t3", "t4"]);
    let next = transfer(&board, &"A".into(), &"B".into(), 0, Some(1), Some(Edge::Bottom));
    assert_eq!(ids(&next.containers()[0]), ["t2"]);
    assert_eq!(ids(&next.containers()[1]), ["t3", "t4", "t1"]);
}

#[test]
fn out_of_range_destination_appends() {
    let board = two_columns(&["t1"], &["t2", "t3"]);
    let next = transfer(&board, &"A".into(), &"B".into(), 0, Some(5), Some(Edge::Bottom));
    assert_eq!(ids(&next.containers()[1]), ["t2", "t3", "t1"]);
}

#[test]
fn missing_target_leaves_board_untouched() {
    let mut controller = BoardController::new(two_columns(&["t1", "t2"], &["t3"]));
    let before = controller.board().clone();
    let payload = DragPayload::Item {
        item_id: "t1".into(),
        container_id: "A".into(),
        source_index: 0,
    };
    assert!(controller.on_drag_end(&payload, None).is_noop());
    assert_eq!(controller.board(), &before);
    assert_eq!(controller.version(), 0);
}
