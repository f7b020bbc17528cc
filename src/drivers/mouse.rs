//! Terminal mouse events to [`Popout`] pointer input.

use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::error::PopoutError;
use crate::manager::{DispatchOutcome, Popout};

/// Rows scrolled per wheel notch.
const SCROLL_STEP: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerInput {
    Down { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Up { x: i32, y: i32 },
    Scroll { dx: i32, dy: i32 },
}

impl PointerInput {
    /// Only the primary button drives windows; other buttons are ignored.
    pub fn from_mouse(event: &MouseEvent) -> Option<Self> {
        let x = i32::from(event.column);
        let y = i32::from(event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Self::Down { x, y }),
            MouseEventKind::Up(MouseButton::Left) => Some(Self::Up { x, y }),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                Some(Self::Move { x, y })
            }
            MouseEventKind::ScrollDown => Some(Self::Scroll {
                dx: 0,
                dy: SCROLL_STEP,
            }),
            MouseEventKind::ScrollUp => Some(Self::Scroll {
                dx: 0,
                dy: -SCROLL_STEP,
            }),
            MouseEventKind::ScrollRight => Some(Self::Scroll {
                dx: SCROLL_STEP,
                dy: 0,
            }),
            MouseEventKind::ScrollLeft => Some(Self::Scroll {
                dx: -SCROLL_STEP,
                dy: 0,
            }),
            _ => None,
        }
    }

    pub fn apply(self, popout: &mut Popout, now: Instant) -> Result<DispatchOutcome, PopoutError> {
        match self {
            Self::Down { x, y } => popout.pointer_down(x, y, now),
            Self::Move { x, y } => popout.pointer_move(x, y, now),
            Self::Up { x, y } => popout.pointer_up(x, y, now),
            Self::Scroll { dx, dy } => {
                popout.document_mut().viewport_mut().scroll_by(dx, dy);
                Ok(DispatchOutcome::default())
            }
        }
    }
}
