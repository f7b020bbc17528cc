use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use super::keyboard::{KeyboardNormalizer, is_quit_key};
use super::mouse::PointerInput;
use super::{InputDriver, InputEvent, OutputDriver};
use crate::manager::Popout;
use crate::render::Renderer;

/// Reads crossterm events and turns them into page input.
///
/// Hover moves that stay in the same cell are dropped; terminals report
/// them repeatedly and each one would re-run hit testing.
#[derive(Debug, Default)]
pub struct ConsoleInputDriver {
    normalizer: KeyboardNormalizer,
    last_move: Option<(i32, i32)>,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: Event) -> Option<InputEvent> {
        match self.normalizer.normalize(event)? {
            Event::Key(key) if is_quit_key(&key) => Some(InputEvent::Quit),
            Event::Mouse(mouse) => {
                let pointer = PointerInput::from_mouse(&mouse)?;
                match pointer {
                    PointerInput::Move { x, y } => {
                        if self.last_move.replace((x, y)) == Some((x, y)) {
                            return None;
                        }
                    }
                    PointerInput::Down { .. } | PointerInput::Up { .. } => self.last_move = None,
                    PointerInput::Scroll { .. } => {}
                }
                Some(InputEvent::Pointer(pointer))
            }
            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            _ => None,
        }
    }
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Option<InputEvent>> {
        let event = crossterm::event::read()?;
        Ok(self.translate(event))
    }
}

/// Alternate-screen terminal with mouse capture while entered.
pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(
            self.terminal.backend_mut(),
            EnterAlternateScreen,
            EnableMouseCapture
        )?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }

    fn size(&self) -> io::Result<Rect> {
        let size = self.terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }

    fn present(&mut self, renderer: &Renderer, popout: &Popout) -> io::Result<()> {
        self.terminal
            .draw(|frame| {
                let area = frame.area();
                renderer.render(popout, area, frame.buffer_mut());
            })
            .map(|_| ())
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn terminal_events_become_page_input() {
        let mut input = ConsoleInputDriver::new();
        assert_eq!(
            input.translate(mouse(MouseEventKind::Down(MouseButton::Left), 2, 3)),
            Some(InputEvent::Pointer(PointerInput::Down { x: 2, y: 3 }))
        );
        assert_eq!(
            input.translate(Event::Resize(80, 24)),
            Some(InputEvent::Resize {
                width: 80,
                height: 24
            })
        );
        assert_eq!(
            input.translate(Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))),
            Some(InputEvent::Quit)
        );
        assert_eq!(
            input.translate(Event::Key(KeyEvent::new(
                KeyCode::Char('x'),
                KeyModifiers::NONE
            ))),
            None
        );
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(input.translate(Event::Key(release)), None);
        assert_eq!(input.translate(Event::FocusGained), None);
    }

    #[test]
    fn repeated_hover_in_one_cell_is_dropped() {
        let mut input = ConsoleInputDriver::new();
        let moved = |x, y| mouse(MouseEventKind::Moved, x, y);
        let expect = |x, y| Some(InputEvent::Pointer(PointerInput::Move { x, y }));

        assert_eq!(input.translate(moved(5, 5)), expect(5, 5));
        assert_eq!(input.translate(moved(5, 5)), None);
        assert_eq!(input.translate(moved(6, 5)), expect(6, 5));

        // A press forgets the last cell so the first drag step is kept.
        input.translate(mouse(MouseEventKind::Down(MouseButton::Left), 6, 5));
        assert_eq!(
            input.translate(mouse(MouseEventKind::Drag(MouseButton::Left), 6, 5)),
            expect(6, 5)
        );
    }
}
