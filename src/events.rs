//! Pointer events and the listener registry.
//!
//! Listeners are plain data naming an action and the window or binding it
//! belongs to; [`Popout`](crate::Popout) interprets them during dispatch.
//! Keeping them as data lets a node's handlers be replaced wholesale
//! ([`ListenerRegistry::remove_all_for`]) without relying on node identity.

use crate::dom::{Document, NodeId};
use crate::trigger::BindingId;
use crate::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    /// Delivered to each node the pointer newly enters; never propagates.
    PointerEnter,
    /// Synthesized on pointer-up over the node that saw the pointer-down.
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Bubble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Document,
    Node(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: EventKind,
    /// Viewport x coordinate.
    pub client_x: i32,
    /// Viewport y coordinate.
    pub client_y: i32,
}

impl PointerEvent {
    pub fn new(kind: EventKind, client_x: i32, client_y: i32) -> Self {
        Self {
            kind,
            client_x,
            client_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    /// Shell pointer-down: raise the window.
    FocusWindow(WindowId),
    /// Title bar pointer-down: start tracking a move.
    BeginDrag(WindowId),
    /// Document pointer-move while a move is tracked.
    TrackDrag(WindowId),
    /// Document pointer-up: stop tracking a move.
    EndDrag(WindowId),
    /// Resize handle pointer-down: start tracking a resize.
    BeginResize(WindowId),
    /// Document pointer-move while a resize is tracked.
    TrackResize(WindowId),
    /// Document pointer-up (capture phase): stop tracking a resize.
    EndResize(WindowId),
    /// Close button click.
    CloseWindow(WindowId),
    /// Keep the event from reaching the next node on the path.
    StopPropagation,
    /// Target pointer-enter: re-target the shared trigger.
    ShowTrigger(BindingId),
    /// Shared trigger click: float the bound element.
    OpenWindow(BindingId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Registration {
    id: ListenerId,
    target: EventTarget,
    kind: EventKind,
    phase: Phase,
    listener: Listener,
}

#[derive(Debug, Default, Clone)]
pub struct ListenerRegistry {
    entries: Vec<Registration>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        phase: Phase,
        listener: Listener,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Registration {
            id,
            target,
            kind,
            phase,
            listener,
        });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Strip every listener of `target`.
    pub fn remove_all_for(&mut self, target: EventTarget) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.target != target);
        before - self.entries.len()
    }

    /// Listeners registered on `target` for `kind` in `phase`, in
    /// registration order.
    pub fn listeners_for(&self, target: EventTarget, kind: EventKind, phase: Phase) -> Vec<Listener> {
        self.entries
            .iter()
            .filter(|e| e.target == target && e.kind == kind && e.phase == phase)
            .map(|e| e.listener)
            .collect()
    }

    pub fn count_for(&self, target: EventTarget) -> usize {
        self.entries.iter().filter(|e| e.target == target).count()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One step of a dispatch: the node whose listeners run and the phases that
/// run there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub target: EventTarget,
    pub phases: &'static [Phase],
}

/// Document first, then each ancestor of `node` from the body down, then
/// `node` itself.
pub fn propagation_path(doc: &Document, node: NodeId) -> Vec<EventTarget> {
    let mut path: Vec<EventTarget> = doc.ancestors(node).map(EventTarget::Node).collect();
    path.push(EventTarget::Document);
    path.reverse();
    path
}

/// Capture from the root to the target's parent, both phases at the target,
/// then bubble back to the root.
pub fn dispatch_stages(path: &[EventTarget]) -> Vec<Stage> {
    let Some((&target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut stages = Vec::with_capacity(path.len() * 2);
    stages.extend(ancestors.iter().map(|&t| Stage {
        target: t,
        phases: &[Phase::Capture],
    }));
    stages.push(Stage {
        target,
        phases: &[Phase::Capture, Phase::Bubble],
    });
    stages.extend(ancestors.iter().rev().map(|&t| Stage {
        target: t,
        phases: &[Phase::Bubble],
    }));
    stages
}
