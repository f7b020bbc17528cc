use std::io;
use std::time::Duration;

use crate::drivers::{InputDriver, InputEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Message pump for the demo runtime.
///
/// Owns the input driver and is the only place that polls it. Translated
/// input is handed to a handler closure; idle ticks (the poll interval
/// elapsing with no input) call the handler with `None`, which is where the
/// host redraws and fires timers such as the trigger's auto-hide.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    /// Runs until the handler returns [`ControlFlow::Quit`].
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(Option<InputEvent>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(None)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (drags, wheel) before the next idle tick so
                // drawing never falls behind the pointer.
                loop {
                    if let Some(input) = self.driver.read()?
                        && let ControlFlow::Quit = handler(Some(input))?
                    {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::mouse::PointerInput;
    use std::collections::VecDeque;

    /// Replays raw reads; `None` stands for an event the driver ignored.
    struct Scripted(VecDeque<Option<InputEvent>>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Option<InputEvent>> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn down(x: i32, y: i32) -> InputEvent {
        InputEvent::Pointer(PointerInput::Down { x, y })
    }

    #[test]
    fn bursts_are_drained_between_idle_ticks() {
        let script = Scripted(VecDeque::from([
            Some(down(1, 1)),
            None,
            Some(down(2, 2)),
            Some(InputEvent::Quit),
        ]));
        let mut event_loop = EventLoop::new(script, Duration::from_millis(0));
        let mut seen = Vec::new();
        event_loop
            .run(|input| {
                seen.push(input);
                Ok(match input {
                    Some(InputEvent::Quit) => ControlFlow::Quit,
                    _ => ControlFlow::Continue,
                })
            })
            .unwrap();
        assert_eq!(
            seen,
            vec![
                None,
                Some(down(1, 1)),
                Some(down(2, 2)),
                Some(InputEvent::Quit)
            ]
        );
    }

    #[test]
    fn idle_handler_can_quit() {
        let mut event_loop = EventLoop::new(Scripted(VecDeque::new()), Duration::from_millis(0));
        let mut ticks = 0;
        event_loop
            .run(|input| {
                assert!(input.is_none());
                ticks += 1;
                Ok(if ticks == 3 {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(ticks, 3);
    }
}
