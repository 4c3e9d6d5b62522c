#![forbid(unsafe_code)]

//! Column (container) reordering.
//!
//! Two policies are available; a [`crate::controller::BoardController`]
//! applies exactly one, chosen by [`ColumnReorderPolicy`]:
//!
//! - [`ColumnReorderPolicy::EdgeAware`] (default): the dropped column lands
//!   on the left or right of the target column, following the same
//!   adjustment as item reordering.
//! - [`ColumnReorderPolicy::Positional`]: the dropped column takes the
//!   target's index, ignoring the edge.

use sortable_core::Edge;

use crate::model::Board;
use crate::reorder::{reorder, reorder_with_edge};

/// How a container drop onto another container reorders the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "board-config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "board-config", serde(rename_all = "snake_case"))]
pub enum ColumnReorderPolicy {
    #[default]
    EdgeAware,
    Positional,
}

impl ColumnReorderPolicy {
    /// Apply this policy to move the container at `source_index`.
    #[must_use]
    pub fn apply(
        self,
        board: &Board,
        source_index: usize,
        target_index: usize,
        edge: Option<Edge>,
    ) -> Board {
        match self {
            Self::EdgeAware => {
                move_container_with_edge(board, source_index, Some(target_index), edge)
            }
            Self::Positional => move_container(board, source_index, target_index),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EdgeAware => "edge_aware",
            Self::Positional => "positional",
        }
    }
}

/// Positional move of a whole container.
#[must_use]
pub fn move_container(board: &Board, source_index: usize, dest_index: usize) -> Board {
    Board::new(reorder(board.containers(), source_index, dest_index))
}

/// Edge-aware move of a whole container (left/right of the target).
#[must_use]
pub fn move_container_with_edge(
    board: &Board,
    source_index: usize,
    target_index: Option<usize>,
    edge: Option<Edge>,
) -> Board {
    Board::new(reorder_with_edge(
        board.containers(),
        source_index,
        target_index,
        edge,
    ))
}
