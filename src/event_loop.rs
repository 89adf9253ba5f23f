use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// The host's message pump.
///
/// The only place that polls the input driver. Each turn the handler is
/// called once with `None` (run due timers, repaint) and then once per
/// pending event. The poll interval bounds how late a document timer can
/// fire unless a wake source reports an earlier deadline.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
    wake: Option<Box<dyn Fn() -> Option<Duration>>>,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
            wake: None,
        }
    }

    /// Poll no longer than `wake` says, so timers fire on time between
    /// ticks.
    pub fn with_wake(mut self, wake: impl Fn() -> Option<Duration> + 'static) -> Self {
        self.wake = Some(Box::new(wake));
        self
    }

    fn poll_timeout(&self) -> Duration {
        self.wake
            .as_ref()
            .and_then(|wake| wake())
            .map_or(self.poll_interval, |due| due.min(self.poll_interval))
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, None)? {
                break;
            }

            if self.driver.poll(self.poll_timeout())? {
                // Drain bursts (mouse drags) before the next repaint.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
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
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Scripted {
        events: VecDeque<Event>,
        timeouts: Vec<Duration>,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
            self.timeouts.push(timeout);
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    #[test]
    fn burst_is_drained_between_idle_turns() {
        let key = |c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        let script = Scripted {
            events: VecDeque::from([key('a'), key('b'), key('q')]),
            ..Scripted::default()
        };
        let mut event_loop = EventLoop::new(script, Duration::ZERO);
        let mut seen = Vec::new();
        event_loop
            .run(|_, event| {
                seen.push(event.clone());
                Ok(match event {
                    Some(e) if e == key('q') => ControlFlow::Quit,
                    _ => ControlFlow::Continue,
                })
            })
            .unwrap();
        assert_eq!(seen, vec![None, Some(key('a')), Some(key('b')), Some(key('q'))]);
    }

    #[test]
    fn wake_shortens_the_poll() {
        let mut event_loop = EventLoop::new(Scripted::default(), Duration::from_millis(50))
            .with_wake(|| Some(Duration::from_millis(5)));
        let mut turns = 0;
        event_loop
            .run(|_, _| {
                turns += 1;
                Ok(if turns == 3 {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(event_loop.driver().timeouts, vec![Duration::from_millis(5); 2]);
    }
}
