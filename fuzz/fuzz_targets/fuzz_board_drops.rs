#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sortable_board::{
    Board, BoardController, ColumnReorderPolicy, DragPayload, DropLocation, DropTargetData,
};
use sortable_core::Edge;

#[derive(Debug, Arbitrary)]
enum FuzzEdge {
    None,
    Top,
    Right,
    Bottom,
    Left,
}

impl FuzzEdge {
    fn edge(&self) -> Option<Edge> {
        match self {
            Self::None => None,
            Self::Top => Some(Edge::Top),
            Self::Right => Some(Edge::Right),
            Self::Bottom => Some(Edge::Bottom),
            Self::Left => Some(Edge::Left),
        }
    }
}

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    ItemOnItem { source: u8, target: u8, edge: FuzzEdge },
    ItemOnColumn { source: u8, column: u8, edge: FuzzEdge },
    ColumnOnColumn { source: u8, column: u8, edge: FuzzEdge },
    ColumnOnItem { source: u8, target: u8 },
    NoTarget { source: u8 },
    AddItem { column: u8 },
    AddColumn,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    positional: bool,
    ops: Vec<FuzzOp>,
}

fn item_payload(board: &Board, pick: u8) -> Option<DragPayload> {
    let count = board.item_count();
    if count == 0 {
        return None;
    }
    let n = usize::from(pick) % count;
    let item = board.containers().iter().flat_map(|c| c.items()).nth(n)?;
    let (ci, ii) = board.locate_item(item.id())?;
    Some(DragPayload::Item {
        item_id: item.id().clone(),
        container_id: board.containers()[ci].id().clone(),
        source_index: ii,
    })
}

fn item_target(board: &Board, pick: u8) -> Option<DropTargetData> {
    let DragPayload::Item {
        item_id,
        container_id,
        source_index,
    } = item_payload(board, pick)?
    else {
        return None;
    };
    Some(DropTargetData::Item {
        item_id,
        container_id,
        index: source_index,
    })
}

fn column(board: &Board, pick: u8) -> Option<(usize, DropTargetData)> {
    let len = board.containers().len();
    if len == 0 {
        return None;
    }
    let index = usize::from(pick) % len;
    let container_id = board.containers()[index].id().clone();
    Some((index, DropTargetData::Container { container_id, index }))
}

fuzz_target!(|input: FuzzInput| {
    if input.ops.len() > 256 {
        return;
    }
    let policy = if input.positional {
        ColumnReorderPolicy::Positional
    } else {
        ColumnReorderPolicy::EdgeAware
    };
    let mut controller = BoardController::with_policy(Board::demo(), policy);

    for op in &input.ops {
        let board = controller.board().clone();
        let expected_items = board.item_count();
        let expected_columns = board.containers().len();
        let before = controller.version();

        let outcome = match op {
            FuzzOp::ItemOnItem { source, target, edge } => {
                let (Some(payload), Some(target)) =
                    (item_payload(&board, *source), item_target(&board, *target))
                else {
                    continue;
                };
                controller.on_drag_end(&payload, Some(&DropLocation::new(target, edge.edge())))
            }
            FuzzOp::ItemOnColumn { source, column: pick, edge } => {
                let (Some(payload), Some((_, target))) =
                    (item_payload(&board, *source), column(&board, *pick))
                else {
                    continue;
                };
                controller.on_drag_end(&payload, Some(&DropLocation::new(target, edge.edge())))
            }
            FuzzOp::ColumnOnColumn { source, column: pick, edge } => {
                let (Some((index, source_data)), Some((_, target))) =
                    (column(&board, *source), column(&board, *pick))
                else {
                    continue;
                };
                let DropTargetData::Container { container_id, .. } = source_data else {
                    continue;
                };
                let payload = DragPayload::Container {
                    container_id,
                    source_index: index,
                };
                controller.on_drag_end(&payload, Some(&DropLocation::new(target, edge.edge())))
            }
            FuzzOp::ColumnOnItem { source, target } => {
                let (Some((index, DropTargetData::Container { container_id, .. })), Some(target)) =
                    (column(&board, *source), item_target(&board, *target))
                else {
                    continue;
                };
                let payload = DragPayload::Container {
                    container_id,
                    source_index: index,
                };
                let location = DropLocation::new(target, None);
                let outcome = controller.on_drag_end(&payload, Some(&location));
                assert!(outcome.is_noop(), "column dropped on a card must be rejected");
                outcome
            }
            FuzzOp::NoTarget { source } => {
                let Some(payload) = item_payload(&board, *source) else {
                    continue;
                };
                controller.on_drag_end(&payload, None)
            }
            FuzzOp::AddItem { column: pick } => {
                let Some((_, DropTargetData::Container { container_id, .. })) =
                    column(&board, *pick)
                else {
                    continue;
                };
                assert!(controller.add_item(&container_id, "fuzz").is_some());
                assert_eq!(controller.board().item_count(), expected_items + 1);
                assert_eq!(controller.version(), before + 1);
                continue;
            }
            FuzzOp::AddColumn => {
                controller.add_container("fuzz");
                assert_eq!(controller.board().containers().len(), expected_columns + 1);
                continue;
            }
        };

        let after = controller.board();
        assert_eq!(after.item_count(), expected_items, "item count changed");
        assert_eq!(after.containers().len(), expected_columns, "column count changed");
        assert!(after.check_invariants().is_empty(), "duplicate ids");
        if outcome.is_noop() {
            assert_eq!(after, &board, "no-op mutated the board");
            assert_eq!(controller.version(), before);
        } else {
            assert_eq!(controller.version(), before + 1);
        }
    }
});
