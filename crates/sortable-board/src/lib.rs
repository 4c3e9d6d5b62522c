// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Board: ordering engines, drag visuals, sessions, and the board controller.
//!
//! # Role in sortable
//! `sortable-board` owns everything above raw input:
//!
//! - **Engines.** [`reorder`], [`transfer`], and [`columns`] are pure
//!   functions from an old ordering (plus drop geometry) to a new one.
//! - **Visuals.** [`visual::VisualStateMachine`] tracks what one element
//!   should draw during a drag.
//! - **Sessions.** [`adapter::DndRegistry`] holds registered draggables,
//!   drop targets, and monitors, and runs one drag session at a time.
//! - **State.** [`controller::BoardController`] owns the [`model::Board`] and
//!   commits drops as new snapshots; [`sortable::SortableList`] does the same
//!   for a single list.
//!
//! # Wiring
//! ```rust,ignore
//! let registry = DndRegistry::new();
//! let controller = Rc::new(RefCell::new(BoardController::new(Board::demo())));
//! let _board = BoardLayout::default().register(&registry, &controller);
//!
//! let mut gestures = DragGestureRecognizer::new(config.to_gesture_config());
//! for event in events {
//!     for gesture in gestures.process(&event, Instant::now()) {
//!         registry.drive(&gesture)?;
//!     }
//! }
//! ```

pub mod adapter;
pub mod columns;
pub mod config;
pub mod controller;
pub mod layout;
pub mod model;
pub mod payload;
pub mod reorder;
pub mod sortable;
pub mod transfer;
pub mod visual;

pub use adapter::{
    CombinedRegistration, DndRegistry, DraggableSpec, DriveOutcome, DropMonitor, DropTargetSpec,
    ElementId, ElementTransition, PreviewRequest, Registration, SessionEnd, SessionError, combine,
};
pub use columns::{ColumnReorderPolicy, move_container, move_container_with_edge};
pub use config::{BoardConfig, BoardConfigError, GestureSettings};
pub use controller::{BoardController, DropOutcome, NoopReason};
pub use layout::{BoardElement, BoardLayout, LayoutMetrics, RegisteredBoard};
pub use model::{Board, BoardViolation, Container, ContainerId, Item, ItemId};
pub use payload::{DragPayload, DropLocation, DropTargetData, PayloadKind, PayloadKinds};
pub use reorder::{edge_adjusted_index, reorder, reorder_destination, reorder_with_edge};
pub use sortable::SortableList;
pub use transfer::{insertion_index, transfer};
pub use visual::{
    DragVisualState, VisualEffect, VisualEvent, VisualNoopReason, VisualStateMachine,
    VisualTransition,
};
