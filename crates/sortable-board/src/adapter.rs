#![forbid(unsafe_code)]

//! Drag-and-drop adapter: element registry, drag sessions, and monitors.
//!
//! # Design
//!
//! [`DndRegistry`] is a cloneable handle over shared single-threaded state
//! (`Rc<RefCell<..>>`). Hosts register elements as draggables and/or drop
//! targets and receive a [`Registration`] guard; dropping the guard removes
//! the element, including from an in-flight session. [`combine`] merges
//! guards so a whole board can be released in one step.
//!
//! A drag session runs
//! `begin_drag → preview_rendered → pointer_moved* → (drop | cancel)`.
//! Each `pointer_moved` hit-tests the drop targets, computes the closest
//! edge through the registry's [`EdgeDetector`], and feeds enter/over/leave
//! events into the per-element [`VisualStateMachine`]s. Ending the session
//! notifies every interested [`DropMonitor`] exactly once and then resets
//! every element to idle, all inside the same call.
//!
//! # Invariants
//!
//! 1. At most one session is active.
//! 2. The hovered target is the smallest-area target that contains the
//!    pointer and accepts the payload. Ties go to the lower [`ElementId`].
//! 3. A sticky target stays hovered while the pointer is over no target.
//! 4. After `drop`/`cancel` returns, every element is idle.
//! 5. A released registration is never called again.
//!
//! # Failure Modes
//!
//! - Data providers and `can_accept` predicates run while the registry is
//!   borrowed; calling back into the registry from them panics (RefCell
//!   rules), as does ending a session while a monitor is mutably borrowed.
//! - Dropping a [`Registration`] from inside such a callback cannot take the
//!   borrow; the release is queued and applied at the next registry call,
//!   before any hit-test or callback runs.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use sortable_core::{ClosestEdge, DragGesture, Edge, EdgeDetector, EdgeSet, Position, Rect};
use tracing::{debug, debug_span, trace};

use crate::payload::{DragPayload, DropLocation, DropTargetData, PayloadKinds};
use crate::visual::{DragVisualState, VisualEvent, VisualStateMachine, VisualTransition};

/// Host-chosen identity of a registered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type PayloadProvider = Rc<dyn Fn() -> DragPayload>;
type TargetDataProvider = Rc<dyn Fn() -> DropTargetData>;
type AcceptPredicate = Rc<dyn Fn(&DragPayload) -> bool>;
type DropCallback = Rc<dyn Fn(&DragPayload, Option<&DropLocation>)>;

/// How to drag an element.
#[derive(Clone)]
pub struct DraggableSpec {
    rect: Rect,
    payload: PayloadProvider,
    on_drop: Option<DropCallback>,
}

impl DraggableSpec {
    /// `payload` is called once, when a session starts on this element.
    pub fn new(rect: Rect, payload: impl Fn() -> DragPayload + 'static) -> Self {
        Self {
            rect,
            payload: Rc::new(payload),
            on_drop: None,
        }
    }

    /// Called after the monitors when a session started here ends.
    #[must_use]
    pub fn on_drop(
        mut self,
        callback: impl Fn(&DragPayload, Option<&DropLocation>) + 'static,
    ) -> Self {
        self.on_drop = Some(Rc::new(callback));
        self
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl fmt::Debug for DraggableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraggableSpec")
            .field("rect", &self.rect)
            .field("on_drop", &self.on_drop.is_some())
            .finish_non_exhaustive()
    }
}

/// How an element behaves as a drop target.
#[derive(Clone)]
pub struct DropTargetSpec {
    rect: Rect,
    data: TargetDataProvider,
    accepts: PayloadKinds,
    can_accept: Option<AcceptPredicate>,
    allowed_edges: EdgeSet,
    sticky: bool,
}

impl DropTargetSpec {
    /// Accepts every payload kind, reports no edges, not sticky.
    pub fn new(rect: Rect, data: impl Fn() -> DropTargetData + 'static) -> Self {
        Self {
            rect,
            data: Rc::new(data),
            accepts: PayloadKinds::all(),
            can_accept: None,
            allowed_edges: EdgeSet::empty(),
            sticky: false,
        }
    }

    #[must_use]
    pub fn accepts(mut self, kinds: PayloadKinds) -> Self {
        self.accepts = kinds;
        self
    }

    /// Extra acceptance check on top of the payload kind.
    #[must_use]
    pub fn can_accept(mut self, predicate: impl Fn(&DragPayload) -> bool + 'static) -> Self {
        self.can_accept = Some(Rc::new(predicate));
        self
    }

    #[must_use]
    pub fn allowed_edges(mut self, edges: EdgeSet) -> Self {
        self.allowed_edges = edges;
        self
    }

    #[must_use]
    pub fn sticky(mut self, sticky: bool) -> Self {
        self.sticky = sticky;
        self
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    fn accepts_payload(&self, payload: &DragPayload) -> bool {
        self.accepts.accepts(payload.kind())
            && self.can_accept.as_ref().is_none_or(|accept| accept(payload))
    }
}

impl fmt::Debug for DropTargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTargetSpec")
            .field("rect", &self.rect)
            .field("accepts", &self.accepts)
            .field("allowed_edges", &self.allowed_edges)
            .field("sticky", &self.sticky)
            .finish_non_exhaustive()
    }
}

/// Session-wide observer of drops.
pub trait DropMonitor {
    /// Whether this monitor wants to hear about sessions carrying `payload`.
    fn can_monitor(&self, payload: &DragPayload) -> bool {
        let _ = payload;
        true
    }

    /// Called once per session. `location` is `None` when the session was
    /// cancelled or ended over no target.
    fn on_drop(&mut self, payload: &DragPayload, location: Option<&DropLocation>);
}

/// What the host should render as the drag preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewRequest {
    pub source: ElementId,
    /// Source footprint to mirror.
    pub rect: Rect,
    /// Pointer offset from the source's top-left corner.
    pub pointer_offset: (i32, i32),
}

/// A visual transition of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementTransition {
    pub element: ElementId,
    pub transition: VisualTransition,
}

/// Result of ending a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnd {
    pub payload: DragPayload,
    pub location: Option<DropLocation>,
    pub cancelled: bool,
    /// Resets applied to non-idle elements.
    pub transitions: Vec<ElementTransition>,
}

/// Result of feeding one gesture into [`DndRegistry::drive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveOutcome {
    Started(PreviewRequest),
    Moved(Vec<ElementTransition>),
    Ended(SessionEnd),
    /// Nothing draggable under the pointer, or no session to steer.
    Ignored,
}

/// Session misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    AlreadyActive,
    NoActiveSession,
    UnknownElement(ElementId),
    NotDraggable(ElementId),
    /// The preview belongs to a session that is no longer active.
    StalePreview(ElementId),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyActive => write!(f, "a drag session is already active"),
            Self::NoActiveSession => write!(f, "no drag session is active"),
            Self::UnknownElement(id) => write!(f, "element {id} is not registered"),
            Self::NotDraggable(id) => write!(f, "element {id} is not draggable"),
            Self::StalePreview(id) => {
                write!(f, "preview for {id} does not match the active session")
            }
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Draggable(ElementId),
    DropTarget(ElementId),
    Monitor,
}

/// Releases requested while the registry was borrowed.
type ReleaseQueue = RefCell<Vec<(Slot, u64)>>;

struct DraggableEntry {
    token: u64,
    spec: DraggableSpec,
}

struct DropTargetEntry {
    token: u64,
    spec: DropTargetSpec,
}

struct MonitorEntry {
    token: u64,
    monitor: Weak<RefCell<dyn DropMonitor>>,
}

#[derive(Debug, Clone, Copy)]
struct Hover {
    element: ElementId,
    edge: Option<Edge>,
}

struct Session {
    source: ElementId,
    payload: DragPayload,
    source_rect: Rect,
    pointer: Position,
    hover: Option<Hover>,
    on_drop: Option<DropCallback>,
}

struct RegistryInner {
    detector: Box<dyn EdgeDetector>,
    draggables: AHashMap<ElementId, DraggableEntry>,
    targets: AHashMap<ElementId, DropTargetEntry>,
    monitors: Vec<MonitorEntry>,
    visuals: AHashMap<ElementId, VisualStateMachine>,
    session: Option<Session>,
    next_token: u64,
}

impl RegistryInner {
    fn issue_token(&mut self) -> u64 {
        self.next_token = self.next_token.wrapping_add(1);
        self.next_token
    }

    fn release(&mut self, slot: Slot, token: u64) {
        match slot {
            Slot::Draggable(element) => {
                if self.draggables.get(&element).is_some_and(|e| e.token == token) {
                    self.draggables.remove(&element);
                    self.prune_visual(element);
                }
            }
            Slot::DropTarget(element) => {
                if self.targets.get(&element).is_some_and(|e| e.token == token) {
                    self.targets.remove(&element);
                    if let Some(session) = self.session.as_mut()
                        && session.hover.is_some_and(|h| h.element == element)
                    {
                        session.hover = None;
                        debug!(target: "sortable.session", %element, "hovered target released");
                    }
                    self.prune_visual(element);
                }
            }
            Slot::Monitor => self.monitors.retain(|m| m.token != token),
        }
    }

    fn prune_visual(&mut self, element: ElementId) {
        if !self.draggables.contains_key(&element) && !self.targets.contains_key(&element) {
            self.visuals.remove(&element);
        }
    }

    fn draggable_at(&self, pointer: Position) -> Option<ElementId> {
        self.draggables
            .iter()
            .filter(|(_, d)| d.spec.rect.contains(pointer))
            .min_by_key(|(id, d)| (d.spec.rect.area(), **id))
            .map(|(id, _)| *id)
    }
}

fn hit_test(
    targets: &AHashMap<ElementId, DropTargetEntry>,
    pointer: Position,
    payload: &DragPayload,
) -> Option<ElementId> {
    targets
        .iter()
        .filter(|(_, t)| t.spec.rect.contains(pointer) && t.spec.accepts_payload(payload))
        .min_by_key(|(id, t)| (t.spec.rect.area(), **id))
        .map(|(id, _)| *id)
}

fn apply_visual(
    visuals: &mut AHashMap<ElementId, VisualStateMachine>,
    element: ElementId,
    event: &VisualEvent,
    out: &mut Vec<ElementTransition>,
) {
    if let Some(machine) = visuals.get_mut(&element) {
        out.push(ElementTransition {
            element,
            transition: machine.apply(event),
        });
    }
}

/// RAII guard for one registration. Dropping it unregisters.
#[must_use = "dropping a Registration unregisters it immediately"]
pub struct Registration {
    registry: Weak<RefCell<RegistryInner>>,
    released: Weak<ReleaseQueue>,
    slot: Slot,
    token: u64,
}

impl Registration {
    /// Whether the registry still exists.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry.strong_count() > 0
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("slot", &self.slot)
            .field("token", &self.token)
            .finish()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        match inner.try_borrow_mut() {
            Ok(mut inner) => inner.release(self.slot, self.token),
            Err(_) => {
                let Some(queue) = self.released.upgrade() else {
                    return;
                };
                debug!(
                    target: "sortable.session",
                    slot = ?self.slot,
                    "registry busy; release queued"
                );
                queue.borrow_mut().push((self.slot, self.token));
            }
        };
    }
}

/// Several registrations released together.
#[derive(Debug, Default)]
#[must_use = "dropping a CombinedRegistration unregisters everything in it"]
pub struct CombinedRegistration {
    parts: Vec<Registration>,
}

impl CombinedRegistration {
    pub fn push(&mut self, registration: Registration) {
        self.parts.push(registration);
    }

    /// Absorb another combined guard.
    pub fn merge(&mut self, other: CombinedRegistration) {
        self.parts.extend(other.parts);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Extend<Registration> for CombinedRegistration {
    fn extend<I: IntoIterator<Item = Registration>>(&mut self, iter: I) {
        self.parts.extend(iter);
    }
}

/// Merge registrations into one guard.
pub fn combine(parts: impl IntoIterator<Item = Registration>) -> CombinedRegistration {
    CombinedRegistration {
        parts: parts.into_iter().collect(),
    }
}

/// Shared registry of draggables, drop targets, and monitors.
///
/// Cloning shares the same state.
#[derive(Clone)]
pub struct DndRegistry {
    inner: Rc<RefCell<RegistryInner>>,
    released: Rc<ReleaseQueue>,
}

impl Default for DndRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DndRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DndRegistry")
            .field("draggables", &inner.draggables.len())
            .field("targets", &inner.targets.len())
            .field("monitors", &inner.monitors.len())
            .field("dragging", &inner.session.is_some())
            .finish()
    }
}

impl DndRegistry {
    /// Registry using [`ClosestEdge`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_detector(ClosestEdge)
    }

    /// Registry using a custom edge detector.
    pub fn with_detector(detector: impl EdgeDetector + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryInner {
                detector: Box::new(detector),
                draggables: AHashMap::new(),
                targets: AHashMap::new(),
                monitors: Vec::new(),
                visuals: AHashMap::new(),
                session: None,
                next_token: 0,
            })),
            released: Rc::default(),
        }
    }

    /// Make `element` draggable. Re-registering replaces the previous spec.
    pub fn register_draggable(&self, element: ElementId, spec: DraggableSpec) -> Registration {
        let mut inner = self.state();
        let token = inner.issue_token();
        inner.draggables.insert(element, DraggableEntry { token, spec });
        inner.visuals.entry(element).or_default();
        self.guard(Slot::Draggable(element), token)
    }

    /// Make `element` a drop target. Re-registering replaces the previous spec.
    pub fn register_drop_target(&self, element: ElementId, spec: DropTargetSpec) -> Registration {
        let mut inner = self.state();
        let token = inner.issue_token();
        inner.targets.insert(element, DropTargetEntry { token, spec });
        inner.visuals.entry(element).or_default();
        self.guard(Slot::DropTarget(element), token)
    }

    /// Observe every session end. The registry holds the monitor weakly.
    pub fn monitor<M: DropMonitor + 'static>(&self, monitor: &Rc<RefCell<M>>) -> Registration {
        let shared: Rc<RefCell<dyn DropMonitor>> = monitor.clone();
        let mut inner = self.state();
        let token = inner.issue_token();
        inner.monitors.push(MonitorEntry {
            token,
            monitor: Rc::downgrade(&shared),
        });
        self.guard(Slot::Monitor, token)
    }

    /// Update the measured rectangle of a registered element.
    ///
    /// Returns `false` if the element is not registered.
    pub fn update_rect(&self, element: ElementId, rect: Rect) -> bool {
        let mut inner = self.state();
        let mut found = false;
        if let Some(entry) = inner.draggables.get_mut(&element) {
            entry.spec.rect = rect;
            found = true;
        }
        if let Some(entry) = inner.targets.get_mut(&element) {
            entry.spec.rect = rect;
            found = true;
        }
        found
    }

    /// Current visual state of a registered element.
    #[must_use]
    pub fn visual_state(&self, element: ElementId) -> Option<DragVisualState> {
        self.settled().visuals.get(&element).map(VisualStateMachine::state)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.settled().session.is_some()
    }

    #[must_use]
    pub fn active_payload(&self) -> Option<DragPayload> {
        self.settled().session.as_ref().map(|s| s.payload.clone())
    }

    /// Hovered target and its edge, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<(ElementId, Option<Edge>)> {
        self.settled()
            .session
            .as_ref()
            .and_then(|s| s.hover)
            .map(|h| (h.element, h.edge))
    }

    /// Innermost draggable under `pointer`.
    #[must_use]
    pub fn draggable_at(&self, pointer: Position) -> Option<ElementId> {
        self.settled().draggable_at(pointer)
    }

    /// Start a session on `source`.
    pub fn begin_drag(
        &self,
        source: ElementId,
        pointer: Position,
    ) -> Result<PreviewRequest, SessionError> {
        let (provider, rect, on_drop) = {
            let inner = self.state();
            if inner.session.is_some() {
                return Err(SessionError::AlreadyActive);
            }
            let Some(entry) = inner.draggables.get(&source) else {
                return Err(if inner.targets.contains_key(&source) {
                    SessionError::NotDraggable(source)
                } else {
                    SessionError::UnknownElement(source)
                });
            };
            (
                Rc::clone(&entry.spec.payload),
                entry.spec.rect,
                entry.spec.on_drop.clone(),
            )
        };
        let payload = provider();

        let mut inner = self.state();
        if inner.session.is_some() {
            return Err(SessionError::AlreadyActive);
        }
        debug!(
            target: "sortable.session",
            element = %source,
            kind = payload.kind().as_str(),
            x = pointer.x,
            y = pointer.y,
            "drag started"
        );
        inner.session = Some(Session {
            source,
            payload,
            source_rect: rect,
            pointer,
            hover: None,
            on_drop,
        });
        Ok(PreviewRequest {
            source,
            rect,
            pointer_offset: Position::new(rect.x, rect.y).delta_to(pointer),
        })
    }

    /// The host rendered the preview for `request`; mark the source as previewing.
    pub fn preview_rendered(
        &self,
        request: &PreviewRequest,
    ) -> Result<ElementTransition, SessionError> {
        let mut inner = self.state();
        match inner.session.as_ref() {
            None => return Err(SessionError::NoActiveSession),
            Some(session) if session.source != request.source => {
                return Err(SessionError::StalePreview(request.source));
            }
            Some(_) => {}
        }
        let mut out = Vec::with_capacity(1);
        apply_visual(
            &mut inner.visuals,
            request.source,
            &VisualEvent::PreviewRendered {
                preview: request.rect,
            },
            &mut out,
        );
        out.pop().ok_or(SessionError::UnknownElement(request.source))
    }

    /// Move the pointer, updating hover state and element visuals.
    pub fn pointer_moved(&self, pointer: Position) -> Result<Vec<ElementTransition>, SessionError> {
        let mut guard = self.state();
        let RegistryInner {
            detector,
            targets,
            visuals,
            session,
            ..
        } = &mut *guard;
        let Some(session) = session.as_mut() else {
            return Err(SessionError::NoActiveSession);
        };
        session.pointer = pointer;
        let source = session.source;
        let source_rect = session.source_rect;
        let prev = session.hover;

        let (next, held) = match hit_test(targets, pointer, &session.payload) {
            Some(element) => {
                let edge = targets
                    .get(&element)
                    .and_then(|t| detector.detect(t.spec.rect, pointer, t.spec.allowed_edges));
                (Some(Hover { element, edge }), false)
            }
            None => {
                let kept = prev.filter(|h| targets.get(&h.element).is_some_and(|t| t.spec.sticky));
                (kept, kept.is_some())
            }
        };
        session.hover = next;

        let mut out = Vec::new();
        match (prev, next) {
            (Some(p), Some(n)) if p.element == n.element => {
                if !held {
                    apply_visual(
                        visuals,
                        n.element,
                        &VisualEvent::Over {
                            is_source: n.element == source,
                            edge: n.edge,
                            source_rect,
                        },
                        &mut out,
                    );
                }
            }
            _ => {
                if let Some(p) = prev {
                    trace!(target: "sortable.session", element = %p.element, "drag leave");
                    apply_visual(
                        visuals,
                        p.element,
                        &VisualEvent::Leave {
                            is_source: p.element == source,
                        },
                        &mut out,
                    );
                }
                if let Some(n) = next {
                    trace!(
                        target: "sortable.session",
                        element = %n.element,
                        edge = ?n.edge,
                        "drag enter"
                    );
                    apply_visual(
                        visuals,
                        n.element,
                        &VisualEvent::Enter {
                            is_source: n.element == source,
                            edge: n.edge,
                            source_rect,
                        },
                        &mut out,
                    );
                }
            }
        }
        Ok(out)
    }

    /// End the session over the hovered target.
    pub fn drop(&self) -> Result<SessionEnd, SessionError> {
        let (session, provider) = {
            let mut inner = self.state();
            let session = inner.session.take().ok_or(SessionError::NoActiveSession)?;
            let provider = session.hover.and_then(|h| {
                inner
                    .targets
                    .get(&h.element)
                    .map(|t| (Rc::clone(&t.spec.data), h.edge))
            });
            (session, provider)
        };
        let location = provider.map(|(data, edge)| DropLocation::new(data(), edge));
        Ok(self.finish(session, location, false))
    }

    /// Abort the session. Monitors still hear about it, without a location.
    pub fn cancel(&self) -> Result<SessionEnd, SessionError> {
        let session = self
            .state()
            .session
            .take()
            .ok_or(SessionError::NoActiveSession)?;
        Ok(self.finish(session, None, true))
    }

    /// Feed one recognized gesture into the session.
    pub fn drive(&self, gesture: &DragGesture) -> Result<DriveOutcome, SessionError> {
        match *gesture {
            DragGesture::Start { origin, .. } => match self.draggable_at(origin) {
                Some(element) => self.begin_drag(element, origin).map(DriveOutcome::Started),
                None => Ok(DriveOutcome::Ignored),
            },
            DragGesture::Move { current, .. } => {
                if !self.is_dragging() {
                    return Ok(DriveOutcome::Ignored);
                }
                self.pointer_moved(current).map(DriveOutcome::Moved)
            }
            DragGesture::End { end, .. } => {
                if !self.is_dragging() {
                    return Ok(DriveOutcome::Ignored);
                }
                self.pointer_moved(end)?;
                self.drop().map(DriveOutcome::Ended)
            }
            DragGesture::Cancel => {
                if !self.is_dragging() {
                    return Ok(DriveOutcome::Ignored);
                }
                self.cancel().map(DriveOutcome::Ended)
            }
        }
    }

    fn finish(
        &self,
        session: Session,
        location: Option<DropLocation>,
        cancelled: bool,
    ) -> SessionEnd {
        let _span = debug_span!(
            target: "sortable.session",
            "session.finish",
            element = %session.source,
            cancelled,
            has_target = location.is_some()
        )
        .entered();

        let monitors: Vec<Rc<RefCell<dyn DropMonitor>>> = {
            let mut inner = self.state();
            inner.monitors.retain(|m| m.monitor.strong_count() > 0);
            inner.monitors.iter().filter_map(|m| m.monitor.upgrade()).collect()
        };
        for monitor in monitors {
            let mut monitor = monitor.borrow_mut();
            if monitor.can_monitor(&session.payload) {
                monitor.on_drop(&session.payload, location.as_ref());
            }
        }
        if let Some(callback) = &session.on_drop {
            callback(&session.payload, location.as_ref());
        }

        let mut transitions = Vec::new();
        {
            let mut inner = self.state();
            let mut active: Vec<ElementId> = inner
                .visuals
                .iter()
                .filter(|(_, m)| !m.state().is_idle())
                .map(|(id, _)| *id)
                .collect();
            active.sort_unstable();
            for element in active {
                apply_visual(&mut inner.visuals, element, &VisualEvent::Drop, &mut transitions);
            }
        }
        debug!(
            target: "sortable.session",
            element = %session.source,
            cancelled,
            edge = ?location.as_ref().and_then(|l| l.edge),
            reset = transitions.len(),
            "drag ended"
        );

        SessionEnd {
            payload: session.payload,
            location,
            cancelled,
            transitions,
        }
    }

    /// Mutable state with queued releases applied.
    fn state(&self) -> RefMut<'_, RegistryInner> {
        let mut inner = self.inner.borrow_mut();
        self.apply_released(&mut inner);
        inner
    }

    /// Shared state, applying queued releases first when the registry is free.
    fn settled(&self) -> Ref<'_, RegistryInner> {
        let pending = !self.released.borrow().is_empty();
        if pending && let Ok(mut inner) = self.inner.try_borrow_mut() {
            self.apply_released(&mut inner);
        }
        self.inner.borrow()
    }

    fn apply_released(&self, inner: &mut RegistryInner) {
        // Dropping a released entry can drop further guards, which queue again.
        loop {
            let batch = std::mem::take(&mut *self.released.borrow_mut());
            if batch.is_empty() {
                return;
            }
            for (slot, token) in batch {
                inner.release(slot, token);
            }
        }
    }

    fn guard(&self, slot: Slot, token: u64) -> Registration {
        Registration {
            registry: Rc::downgrade(&self.inner),
            released: Rc::downgrade(&self.released),
            slot,
            token,
        }
    }
}
