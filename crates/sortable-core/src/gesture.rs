#![forbid(unsafe_code)]

//! Drag gesture recognition: turns raw mouse input into drag lifecycles.
//!
//! [`DragGestureRecognizer`] watches mouse-down → move → mouse-up sequences
//! and emits [`DragGesture`] values once the pointer has travelled past the
//! configured threshold. A press that never crosses the threshold is a click
//! and produces nothing.
//!
//! # Invariants
//!
//! 1. Every emitted sequence is well-formed:
//!    `Start` → zero or more `Move` → exactly one of `End` / `Cancel`.
//! 2. `Move` and `End` are only emitted after `Start`.
//! 3. After [`reset`](DragGestureRecognizer::reset) the recognizer is idle and
//!    emits nothing for the interrupted drag.
//!
//! # Failure Modes
//!
//! - Escape or focus loss during a started drag emits `Cancel`.
//! - A mouse-up for a different button than the one that armed the drag is
//!   ignored; the drag stays live until its own button is released.
//! - A mouse-down while a drag is live emits `Cancel` for that drag and arms
//!   a fresh press.

use std::time::Duration;

use web_time::Instant;

use crate::event::{Event, KeyCode, MouseButton, MouseEventKind};
use crate::geometry::Position;

/// Thresholds for drag recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    /// Minimum manhattan distance (cells) before a drag starts (default: 3).
    pub drag_threshold: u16,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { drag_threshold: 3 }
    }
}

/// High-level drag lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragGesture {
    /// The pointer crossed the drag threshold.
    Start { origin: Position, button: MouseButton },
    /// The pointer moved during an active drag.
    Move {
        origin: Position,
        current: Position,
        delta: (i32, i32),
    },
    /// The button was released.
    End {
        origin: Position,
        end: Position,
        duration: Duration,
    },
    /// The drag was aborted (Escape or focus loss).
    Cancel,
}

#[derive(Debug, Clone, Copy)]
struct DragTracker {
    origin: Position,
    button: MouseButton,
    last: Position,
    pressed_at: Instant,
    started: bool,
}

/// Stateful recognizer for drag gestures.
#[derive(Debug, Default)]
pub struct DragGestureRecognizer {
    config: GestureConfig,
    tracker: Option<DragTracker>,
}

impl DragGestureRecognizer {
    /// Create a recognizer with the given configuration.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            tracker: None,
        }
    }

    /// Process one raw event, returning any drag gestures it produced.
    ///
    /// A single pointer move that crosses the threshold produces both
    /// `Start` and the first `Move`.
    pub fn process(&mut self, event: &Event, now: Instant) -> Vec<DragGesture> {
        let mut out = Vec::with_capacity(2);
        match event {
            Event::Mouse(mouse) => {
                let pos = mouse.position();
                match mouse.kind {
                    MouseEventKind::Down(button) => self.on_down(pos, button, now, &mut out),
                    MouseEventKind::Drag(button) => self.on_drag(pos, button, now, &mut out),
                    MouseEventKind::Up(button) => self.on_up(pos, button, now, &mut out),
                    MouseEventKind::Moved => {}
                }
            }
            Event::Key(KeyCode::Escape) | Event::Focus(false) => {
                if self.tracker.take().is_some_and(|t| t.started) {
                    out.push(DragGesture::Cancel);
                }
            }
            Event::Key(_) | Event::Focus(true) => {}
        }

        #[cfg(feature = "tracing")]
        for gesture in &out {
            tracing::trace!(target: "sortable.gesture", ?gesture, "drag gesture");
        }

        out
    }

    /// Whether a drag has started and not yet ended.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.tracker.as_ref().is_some_and(|t| t.started)
    }

    /// Drop all in-flight state without emitting anything.
    pub fn reset(&mut self) {
        self.tracker = None;
    }

    /// Current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect for the next threshold check.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    fn on_down(
        &mut self,
        pos: Position,
        button: MouseButton,
        now: Instant,
        out: &mut Vec<DragGesture>,
    ) {
        if self.tracker.take().is_some_and(|t| t.started) {
            out.push(DragGesture::Cancel);
        }
        self.tracker = Some(DragTracker {
            origin: pos,
            button,
            last: pos,
            pressed_at: now,
            started: false,
        });
    }

    fn on_drag(
        &mut self,
        pos: Position,
        button: MouseButton,
        now: Instant,
        out: &mut Vec<DragGesture>,
    ) {
        let Some(tracker) = self.tracker.as_mut() else {
            // Drag without a prior press (press happened outside our view).
            self.on_down(pos, button, now, out);
            return;
        };
        if tracker.button != button {
            return;
        }

        if !tracker.started
            && tracker.origin.manhattan_distance(pos) >= u32::from(self.config.drag_threshold)
        {
            tracker.started = true;
            out.push(DragGesture::Start {
                origin: tracker.origin,
                button: tracker.button,
            });
        }

        if tracker.started {
            out.push(DragGesture::Move {
                origin: tracker.origin,
                current: pos,
                delta: tracker.last.delta_to(pos),
            });
        }
        tracker.last = pos;
    }

    fn on_up(
        &mut self,
        pos: Position,
        button: MouseButton,
        now: Instant,
        out: &mut Vec<DragGesture>,
    ) {
        let Some(tracker) = self.tracker else {
            return;
        };
        if tracker.button != button {
            return;
        }
        self.tracker = None;
        if tracker.started {
            out.push(DragGesture::End {
                origin: tracker.origin,
                end: pos,
                duration: now.saturating_duration_since(tracker.pressed_at),
            });
        }
    }
}
