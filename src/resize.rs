//! Bottom-right corner resizing.
//!
//! Mirrors [`DragController`](crate::drag::DragController) but writes the
//! shell's `width/height`, floored independently per axis. The pointer-up
//! listener is registered on the document in the capture phase so release
//! over nested content that stops propagation still ends the resize.

use crate::dom::{Document, NodeId, px};
use crate::error::DomError;
use crate::events::{
    EventKind, EventTarget, Listener, ListenerId, ListenerRegistry, Phase, PointerEvent,
};
use crate::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDrag {
    pub start_x: i32,
    pub start_y: i32,
    pub start_width: i32,
    pub start_height: i32,
}

impl ResizeDrag {
    /// `(width, height)` for the pointer at `(x, y)`, never below the floor.
    pub fn size_at(&self, x: i32, y: i32, min_width: i32, min_height: i32) -> (i32, i32) {
        let width = self
            .start_width
            .saturating_add(x.saturating_sub(self.start_x));
        let height = self
            .start_height
            .saturating_add(y.saturating_sub(self.start_y));
        (width.max(min_width), height.max(min_height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Tracking {
        drag: ResizeDrag,
        on_move: ListenerId,
        on_up: ListenerId,
    },
}

#[derive(Debug, Clone)]
pub struct ResizeController {
    state: ResizeState,
    min_width: i32,
    min_height: i32,
}

impl ResizeController {
    pub fn new(min_width: i32, min_height: i32) -> Self {
        Self {
            state: ResizeState::Idle,
            min_width,
            min_height,
        }
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, ResizeState::Tracking { .. })
    }

    pub fn press(
        &mut self,
        doc: &mut Document,
        registry: &mut ListenerRegistry,
        window: WindowId,
        shell: NodeId,
        event: PointerEvent,
    ) -> Result<(), DomError> {
        self.release(registry);
        let drag = ResizeDrag {
            start_x: event.client_x,
            start_y: event.client_y,
            start_width: doc.offset_width(shell),
            start_height: doc.offset_height(shell),
        };
        // Pin the shell where it is so growing it cannot move it.
        let style = doc.style(shell)?;
        if style.get("top").is_none() || style.get("left").is_none() {
            let (top, left) = (doc.offset_top(shell), doc.offset_left(shell));
            doc.set_style(shell, "top", px(top))?;
            doc.set_style(shell, "left", px(left))?;
        }
        let on_move = registry.add(
            EventTarget::Document,
            EventKind::PointerMove,
            Phase::Bubble,
            Listener::TrackResize(window),
        );
        let on_up = registry.add(
            EventTarget::Document,
            EventKind::PointerUp,
            Phase::Capture,
            Listener::EndResize(window),
        );
        tracing::debug!(window = ?window, width = drag.start_width, height = drag.start_height, "resize started");
        self.state = ResizeState::Tracking {
            drag,
            on_move,
            on_up,
        };
        Ok(())
    }

    /// Resize the shell to follow the pointer. Returns true when the move
    /// was consumed, in which case the caller suppresses its default action.
    pub fn track(
        &self,
        doc: &mut Document,
        shell: NodeId,
        event: PointerEvent,
    ) -> Result<bool, DomError> {
        let ResizeState::Tracking { drag, .. } = self.state else {
            return Ok(false);
        };
        let (width, height) =
            drag.size_at(event.client_x, event.client_y, self.min_width, self.min_height);
        doc.set_style(shell, "width", px(width))?;
        doc.set_style(shell, "height", px(height))?;
        tracing::trace!(shell = ?shell, width, height, "resize moved");
        Ok(true)
    }

    /// Leave `Tracking`, removing the move and pointer-up listeners together.
    pub fn release(&mut self, registry: &mut ListenerRegistry) -> bool {
        match std::mem::take(&mut self.state) {
            ResizeState::Idle => false,
            ResizeState::Tracking { on_move, on_up, .. } => {
                registry.remove(on_move);
                registry.remove(on_up);
                tracing::debug!("resize ended");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_floored_per_axis() {
        let drag = ResizeDrag {
            start_x: 300,
            start_y: 300,
            start_width: 202,
            start_height: 77,
        };
        assert_eq!(drag.size_at(0, 300, 100, 100), (100, 100));
        assert_eq!(drag.size_at(350, 0, 100, 100), (252, 100));
        assert_eq!(drag.size_at(310, 400, 100, 100), (212, 177));
    }

    #[test]
    fn press_pins_unset_position() {
        let mut doc = Document::new();
        let shell = doc.create_element("div");
        doc.append_child(doc.body(), shell).unwrap();
        doc.set_style_text(shell, "position: fixed; width: 150px; height: 150px;")
            .unwrap();
        doc.set_layout(shell, crate::dom::LayoutBox::new(12, 34, 150, 150), None)
            .unwrap();

        let mut registry = ListenerRegistry::new();
        let mut ctl = ResizeController::new(100, 100);
        ctl.press(
            &mut doc,
            &mut registry,
            WindowId::from_index(0),
            shell,
            PointerEvent::new(EventKind::PointerDown, 180, 180),
        )
        .unwrap();
        assert_eq!(doc.style(shell).unwrap().get("top"), Some("12px"));
        assert_eq!(doc.style(shell).unwrap().get("left"), Some("34px"));

        let consumed = ctl
            .track(
                &mut doc,
                shell,
                PointerEvent::new(EventKind::PointerMove, 200, 100),
            )
            .unwrap();
        assert!(consumed);
        assert_eq!(doc.offset_width(shell), 170);
        assert_eq!(doc.offset_height(shell), 100);
        assert_eq!(doc.offset_top(shell), 12);
        assert_eq!(doc.offset_left(shell), 34);

        assert_eq!(
            registry.listeners_for(EventTarget::Document, EventKind::PointerUp, Phase::Capture),
            vec![Listener::EndResize(WindowId::from_index(0))]
        );
        assert!(ctl.release(&mut registry));
        assert!(registry.is_empty());
        assert!(!ctl.is_tracking());
    }
}
