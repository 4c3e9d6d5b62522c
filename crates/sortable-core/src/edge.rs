#![forbid(unsafe_code)]

//! Closest-edge detection for drop targets.
//!
//! A drop target answers "insert before or after me?" by asking which of its
//! allowed edges the pointer is nearest to. Vertically stacked items use
//! [`EdgeSet::VERTICAL`] (top/bottom); horizontally stacked columns use
//! [`EdgeSet::HORIZONTAL`] (left/right).
//!
//! # Tie-break
//!
//! Distances are measured from the centre of the pointer's cell, in half-cell
//! units so every value stays integral. When two allowed edges are equally
//! close the leading edge wins, in the fixed priority order
//! `Top, Left, Bottom, Right`. A pointer exactly on the midpoint of a target
//! therefore resolves to `Top` (or `Left`), never to the trailing edge.

use bitflags::bitflags;

use crate::geometry::{Position, Rect};

/// Stacking axis of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    /// Items stacked top to bottom.
    Vertical,
    /// Items laid out left to right.
    Horizontal,
}

impl Axis {
    /// The pair of edges that are meaningful on this axis.
    #[must_use]
    pub const fn edges(self) -> EdgeSet {
        match self {
            Self::Vertical => EdgeSet::VERTICAL,
            Self::Horizontal => EdgeSet::HORIZONTAL,
        }
    }
}

/// One side of a target rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// Resolution order for equidistant edges.
    pub const PRIORITY: [Edge; 4] = [Edge::Top, Edge::Left, Edge::Bottom, Edge::Right];

    /// Axis along which this edge splits a sequence.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    /// `true` for bottom/right: dropping here inserts *after* the target.
    #[must_use]
    pub const fn is_trailing(self) -> bool {
        matches!(self, Self::Bottom | Self::Right)
    }

    /// `true` for top/left: dropping here inserts *before* the target.
    #[must_use]
    pub const fn is_leading(self) -> bool {
        !self.is_trailing()
    }

    /// Single-edge flag for set membership tests.
    #[must_use]
    pub const fn flag(self) -> EdgeSet {
        match self {
            Self::Top => EdgeSet::TOP,
            Self::Right => EdgeSet::RIGHT,
            Self::Bottom => EdgeSet::BOTTOM,
            Self::Left => EdgeSet::LEFT,
        }
    }

    /// Lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Edges a drop target is willing to report.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct EdgeSet: u8 {
        const TOP    = 0b0001;
        const RIGHT  = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT   = 0b1000;
        /// Top and bottom, for vertically stacked items.
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        /// Left and right, for horizontally stacked containers.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Default for EdgeSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl EdgeSet {
    /// Whether `edge` is in the set.
    #[must_use]
    pub const fn allows(self, edge: Edge) -> bool {
        self.contains(edge.flag())
    }

    /// Members of the set, in tie-break priority order.
    pub fn iter_edges(self) -> impl Iterator<Item = Edge> {
        Edge::PRIORITY.into_iter().filter(move |e| self.allows(*e))
    }
}

/// Capability that maps a pointer over a target onto one of its edges.
pub trait EdgeDetector {
    /// Nearest allowed edge of `rect` to `pointer`, or `None` if `allowed`
    /// is empty.
    fn detect(&self, rect: Rect, pointer: Position, allowed: EdgeSet) -> Option<Edge>;
}

/// Default detector: minimum distance from the pointer cell's centre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClosestEdge;

impl ClosestEdge {
    /// Distance (in half cells) from the centre of `pointer` to `edge` of `rect`.
    ///
    /// Pointers outside the rectangle are still measured; the result is the
    /// absolute distance to the edge line.
    #[must_use]
    pub fn distance(rect: Rect, pointer: Position, edge: Edge) -> u32 {
        let px = 2 * i32::from(pointer.x) + 1;
        let py = 2 * i32::from(pointer.y) + 1;
        let line = match edge {
            Edge::Top => 2 * i32::from(rect.y),
            Edge::Bottom => 2 * i32::from(rect.bottom()),
            Edge::Left => 2 * i32::from(rect.x),
            Edge::Right => 2 * i32::from(rect.right()),
        };
        let along = match edge.axis() {
            Axis::Vertical => py,
            Axis::Horizontal => px,
        };
        (along - line).unsigned_abs()
    }
}

impl EdgeDetector for ClosestEdge {
    fn detect(&self, rect: Rect, pointer: Position, allowed: EdgeSet) -> Option<Edge> {
        // `min_by_key` keeps the first minimum, and iteration follows PRIORITY.
        allowed
            .iter_edges()
            .min_by_key(|edge| Self::distance(rect, pointer, *edge))
    }
}

/// Convenience wrapper around [`ClosestEdge`].
#[must_use]
pub fn detect_closest_edge(rect: Rect, pointer: Position, allowed: EdgeSet) -> Option<Edge> {
    ClosestEdge.detect(rect, pointer, allowed)
}
