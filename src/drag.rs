//! Title-bar dragging.
//!
//! A drag is a two-state machine. Pointer-down on the title bar enters
//! `Tracking` and installs document-level move/up listeners so the drag
//! keeps following the pointer after it leaves the title bar; pointer-up
//! anywhere leaves `Tracking` and removes both listeners.

use crate::dom::{Document, NodeId, px};
use crate::error::DomError;
use crate::events::{
    EventKind, EventTarget, Listener, ListenerId, ListenerRegistry, Phase, PointerEvent,
};
use crate::window::WindowId;

/// Origin captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDrag {
    pub start_x: i32,
    pub start_y: i32,
    pub initial_left: i32,
    pub initial_top: i32,
}

impl HeaderDrag {
    /// `(left, top)` for the shell while the pointer sits at `(x, y)`.
    pub fn position_at(&self, x: i32, y: i32) -> (i32, i32) {
        (
            self.initial_left
                .saturating_add(x.saturating_sub(self.start_x)),
            self.initial_top
                .saturating_add(y.saturating_sub(self.start_y)),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Tracking {
        drag: HeaderDrag,
        on_move: ListenerId,
        on_up: ListenerId,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, DragState::Tracking { .. })
    }

    pub fn press(
        &mut self,
        doc: &Document,
        registry: &mut ListenerRegistry,
        window: WindowId,
        shell: NodeId,
        event: PointerEvent,
    ) {
        // A stale Tracking state can only come from a lost pointer-up.
        self.release(registry);
        let drag = HeaderDrag {
            start_x: event.client_x,
            start_y: event.client_y,
            initial_left: doc.offset_left(shell),
            initial_top: doc.offset_top(shell),
        };
        let on_move = registry.add(
            EventTarget::Document,
            EventKind::PointerMove,
            Phase::Bubble,
            Listener::TrackDrag(window),
        );
        let on_up = registry.add(
            EventTarget::Document,
            EventKind::PointerUp,
            Phase::Capture,
            Listener::EndDrag(window),
        );
        tracing::debug!(window = ?window, x = event.client_x, y = event.client_y, "drag started");
        self.state = DragState::Tracking {
            drag,
            on_move,
            on_up,
        };
    }

    /// Move the shell to follow the pointer. Returns false when idle.
    pub fn track(
        &self,
        doc: &mut Document,
        shell: NodeId,
        event: PointerEvent,
    ) -> Result<bool, DomError> {
        let DragState::Tracking { drag, .. } = self.state else {
            return Ok(false);
        };
        let (left, top) = drag.position_at(event.client_x, event.client_y);
        doc.set_style(shell, "left", px(left))?;
        doc.set_style(shell, "top", px(top))?;
        tracing::trace!(shell = ?shell, left, top, "drag moved");
        Ok(true)
    }

    /// Leave `Tracking`, removing the document listeners. Returns whether a
    /// drag was in progress.
    pub fn release(&mut self, registry: &mut ListenerRegistry) -> bool {
        match std::mem::take(&mut self.state) {
            DragState::Idle => false,
            DragState::Tracking { on_move, on_up, .. } => {
                registry.remove(on_move);
                registry.remove(on_up);
                tracing::debug!("drag ended");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_shell(doc: &mut Document) -> NodeId {
        let shell = doc.create_element("div");
        doc.append_child(doc.body(), shell).unwrap();
        doc.set_style_text(
            shell,
            "position: fixed; top: 50px; left: 40px; width: 200px; height: 120px;",
        )
        .unwrap();
        shell
    }

    #[test]
    fn position_tracks_pointer_delta() {
        let drag = HeaderDrag {
            start_x: 10,
            start_y: 10,
            initial_left: 100,
            initial_top: 200,
        };
        assert_eq!(drag.position_at(15, 4), (105, 194));
        // No bounds: the window may leave the viewport.
        assert_eq!(drag.position_at(-500, -500), (-410, -310));
    }

    #[test]
    fn press_track_release_cycle() {
        let mut doc = Document::new();
        let shell = fixed_shell(&mut doc);
        let mut registry = ListenerRegistry::new();
        let mut ctl = DragController::new();
        let window = WindowId::from_index(0);

        assert!(!ctl.track(&mut doc, shell, PointerEvent::new(EventKind::PointerMove, 0, 0)).unwrap());

        ctl.press(
            &doc,
            &mut registry,
            window,
            shell,
            PointerEvent::new(EventKind::PointerDown, 60, 55),
        );
        assert!(ctl.is_tracking());
        assert_eq!(registry.count_for(EventTarget::Document), 2);

        ctl.track(&mut doc, shell, PointerEvent::new(EventKind::PointerMove, 90, 35))
            .unwrap();
        assert_eq!(doc.offset_left(shell), 70);
        assert_eq!(doc.offset_top(shell), 30);
        assert_eq!(doc.offset_width(shell), 200);
        assert_eq!(doc.offset_height(shell), 120);

        assert!(ctl.release(&mut registry));
        assert!(!ctl.release(&mut registry));
        assert!(registry.is_empty());
    }

    #[test]
    fn pressing_twice_does_not_leak_listeners() {
        let mut doc = Document::new();
        let shell = fixed_shell(&mut doc);
        let mut registry = ListenerRegistry::new();
        let mut ctl = DragController::new();
        let window = WindowId::from_index(3);
        let down = PointerEvent::new(EventKind::PointerDown, 1, 1);
        ctl.press(&doc, &mut registry, window, shell, down);
        ctl.press(&doc, &mut registry, window, shell, down);
        assert_eq!(registry.len(), 2);
    }
}
