pub mod console;
pub mod keyboard;
pub mod mouse;

use std::io;
use std::time::Duration;

use ratatui::layout::Rect;

use crate::manager::Popout;
use crate::render::Renderer;
use mouse::PointerInput;

/// Terminal input after translation: only what the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pointer(PointerInput),
    Resize { width: u16, height: u16 },
    Quit,
}

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Read one raw event. `None` when it carries nothing for the page.
    fn read(&mut self) -> io::Result<Option<InputEvent>>;
}

pub trait OutputDriver {
    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    /// Drawable area in cells.
    fn size(&self) -> io::Result<Rect>;

    /// Paint `popout`'s document over the whole drawable area.
    fn present(&mut self, renderer: &Renderer, popout: &Popout) -> io::Result<()>;
}
