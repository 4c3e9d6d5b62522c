// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: geometry, closest-edge detection, and drag gesture input.
//!
//! # Role in sortable
//! `sortable-core` is the input layer. It knows nothing about items, columns,
//! or boards; it answers two questions for the layer above:
//!
//! - **Where is the pointer relative to a target?** [`edge::EdgeDetector`]
//!   maps a pointer over a [`geometry::Rect`] onto its nearest allowed
//!   [`edge::Edge`].
//! - **Is the user dragging?** [`gesture::DragGestureRecognizer`] turns raw
//!   [`event::Event`]s into `Start` / `Move` / `End` / `Cancel` lifecycles.
//!
//! # How it fits in the system
//! `sortable-board` consumes these types to run drag sessions, hit-test drop
//! targets, and feed its ordering engines.

pub mod edge;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod logging;

pub use edge::{Axis, ClosestEdge, Edge, EdgeDetector, EdgeSet, detect_closest_edge};
pub use geometry::{Position, Rect};
pub use gesture::{DragGesture, DragGestureRecognizer, GestureConfig};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
