#![forbid(unsafe_code)]

//! Per-element drag visual state.
//!
//! Every registered element runs one [`VisualStateMachine`]. The machine
//! only drives presentation (drop indicators, a faded source, the drag
//! preview) and never touches board data.
//!
//! ```text
//!   Idle ── PreviewRendered ──▶ Previewing
//!    │ ▲                            │ Enter/Over/Leave (self)
//!    │ │ Drop                       ▼
//!    │ └────────────────────── DraggingLeftSelf
//!    │
//!    │ Enter/Over (other, edge)
//!    ▼
//!   HoveredWithEdge ── Leave (other) / Drop ──▶ Idle
//! ```
//!
//! # Invariants
//!
//! 1. `Drop` always ends in `Idle`.
//! 2. `Over` with the same edge and source geometry is a no-op.
//! 3. `HoveredWithEdge` always carries the rect of the element being
//!    dragged, so the indicator previews the final footprint.
//! 4. Transition ids increase by one per applied event, no-ops included.
//!
//! # Failure Modes
//!
//! - `Enter`/`Over` on a non-source element without an edge (the target
//!   allows no edges) leaves the state unchanged and reports
//!   [`VisualNoopReason::MissingEdge`].

use sortable_core::{Edge, Rect};

/// Presentation state of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragVisualState {
    #[default]
    Idle,
    /// This element is the drag source and its preview has been rendered.
    Previewing { preview: Rect },
    /// Another element is hovering; show an indicator on `edge`, sized like
    /// `source_rect`.
    HoveredWithEdge { edge: Edge, source_rect: Rect },
    /// This element is the drag source and the pointer is over it (or has
    /// just left it); render it faded in place.
    DraggingLeftSelf,
}

impl DragVisualState {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Edge of the indicator, if one is shown.
    #[must_use]
    pub const fn indicator_edge(&self) -> Option<Edge> {
        match self {
            Self::HoveredWithEdge { edge, .. } => Some(*edge),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Previewing { .. } => "previewing",
            Self::HoveredWithEdge { .. } => "hovered_with_edge",
            Self::DraggingLeftSelf => "dragging_left_self",
        }
    }
}

/// Session event as seen by one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualEvent {
    /// The adapter rendered this element's drag preview.
    PreviewRendered { preview: Rect },
    /// The pointer entered this element as a drop target.
    Enter {
        is_source: bool,
        edge: Option<Edge>,
        source_rect: Rect,
    },
    /// The pointer moved within this element.
    Over {
        is_source: bool,
        edge: Option<Edge>,
        source_rect: Rect,
    },
    /// The pointer left this element.
    Leave { is_source: bool },
    /// The session ended (drop or cancel).
    Drop,
}

/// Why an event did not change the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualNoopReason {
    /// A non-source target reported no edge.
    MissingEdge,
    /// The event would produce the current state.
    Unchanged,
}

/// Presentation work implied by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualEffect {
    PreviewShown { preview: Rect },
    IndicatorShown { edge: Edge, source_rect: Rect },
    SourceFaded,
    Cleared,
    Noop { reason: VisualNoopReason },
}

/// One applied event with telemetry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualTransition {
    pub transition_id: u64,
    pub from: DragVisualState,
    pub to: DragVisualState,
    pub effect: VisualEffect,
}

/// Pure transition function.
#[must_use]
pub fn reduce(state: DragVisualState, event: &VisualEvent) -> (DragVisualState, VisualEffect) {
    let next = match *event {
        VisualEvent::PreviewRendered { preview } => DragVisualState::Previewing { preview },
        VisualEvent::Enter {
            is_source: true, ..
        }
        | VisualEvent::Over {
            is_source: true, ..
        }
        | VisualEvent::Leave { is_source: true } => DragVisualState::DraggingLeftSelf,
        VisualEvent::Enter {
            edge, source_rect, ..
        }
        | VisualEvent::Over {
            edge, source_rect, ..
        } => match edge {
            Some(edge) => DragVisualState::HoveredWithEdge { edge, source_rect },
            None => {
                return (
                    state,
                    VisualEffect::Noop {
                        reason: VisualNoopReason::MissingEdge,
                    },
                );
            }
        },
        VisualEvent::Leave { is_source: false } | VisualEvent::Drop => DragVisualState::Idle,
    };

    if next == state {
        return (
            state,
            VisualEffect::Noop {
                reason: VisualNoopReason::Unchanged,
            },
        );
    }

    let effect = match next {
        DragVisualState::Idle => VisualEffect::Cleared,
        DragVisualState::Previewing { preview } => VisualEffect::PreviewShown { preview },
        DragVisualState::HoveredWithEdge { edge, source_rect } => {
            VisualEffect::IndicatorShown { edge, source_rect }
        }
        DragVisualState::DraggingLeftSelf => VisualEffect::SourceFaded,
    };
    (next, effect)
}

/// Stateful wrapper around [`reduce`] with a transition counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualStateMachine {
    state: DragVisualState,
    transition_counter: u64,
}

impl VisualStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> DragVisualState {
        self.state
    }

    #[must_use]
    pub const fn transition_count(&self) -> u64 {
        self.transition_counter
    }

    /// Apply one event and report what happened.
    pub fn apply(&mut self, event: &VisualEvent) -> VisualTransition {
        let from = self.state;
        let (to, effect) = reduce(from, event);
        self.state = to;
        self.transition_counter = self.transition_counter.saturating_add(1);
        let transition = VisualTransition {
            transition_id: self.transition_counter,
            from,
            to,
            effect,
        };
        tracing::trace!(
            target: "sortable.visual",
            transition_id = transition.transition_id,
            from = from.as_str(),
            to = to.as_str(),
            ?effect,
            "visual transition"
        );
        transition
    }

    /// Shorthand for applying [`VisualEvent::Drop`].
    pub fn reset(&mut self) -> VisualTransition {
        self.apply(&VisualEvent::Drop)
    }
}
