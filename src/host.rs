//! Terminal host for a document.
//!
//! Translates `crossterm` input into document input (key presses go to the
//! focused element, mouse events to whatever the painter put under the
//! pointer), runs due timers on every tick, and paints.

use std::time::Duration;

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use crate::dom::Dom;
use crate::event_loop::ControlFlow;
use crate::keybindings::{self, Action};
use crate::painter::Painter;
use crate::ui::UiFrame;

pub struct Host {
    dom: Dom,
    painter: Painter,
}

impl Host {
    pub fn new(dom: Dom) -> Self {
        Self {
            dom,
            painter: Painter::new(),
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.dom.set_viewport(f64::from(width), f64::from(height));
        self.painter.layout(&self.dom);
    }

    /// Feed one terminal event into the document.
    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if keybindings::defaults().matches(Action::Quit, key) {
                    tracing::debug!("quit requested");
                    return ControlFlow::Quit;
                }
                self.dom.press_key(*key);
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.resize(*width, *height),
            _ => {}
        }
        // Geometry must be current before the next event is hit-tested.
        self.painter.layout(&self.dom);
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let (x, y) = (f64::from(mouse.column), f64::from(mouse.row));
        let hit = self.painter.hit_test(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let target = hit.unwrap_or_else(|| self.dom.body());
                self.dom.pointer_down(target, x, y);
            }
            MouseEventKind::Up(MouseButton::Left) => self.dom.pointer_up(hit, x, y),
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                self.dom.pointer_move(hit, x, y)
            }
            _ => {}
        }
    }

    /// Run the timers that came due since the last tick. Returns how many
    /// ran.
    pub fn tick(&mut self) -> usize {
        // Timers may measure what was built since the last event.
        if self.dom.next_timer_delay() == Some(Duration::ZERO) {
            self.painter.layout(&self.dom);
        }
        let ran = self.dom.run_due_timers();
        if ran > 0 {
            self.painter.layout(&self.dom);
        }
        ran
    }

    pub fn draw(&mut self, mut frame: UiFrame<'_>) {
        let area = frame.area();
        let (width, height) = self.dom.viewport();
        if (f64::from(area.width), f64::from(area.height)) != (width, height) {
            self.dom.set_viewport(f64::from(area.width), f64::from(area.height));
        }
        self.painter.layout(&self.dom);
        self.painter.paint(&self.dom, &mut frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::el;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn host_with_input() -> (Host, crate::dom::NodeId) {
        let dom = Dom::new();
        let page = el("div")
            .child(el("div").text("Find"))
            .child(el("input").prop("type", "text"))
            .build(&dom)
            .unwrap();
        dom.append_child(dom.body(), page);
        let input = dom.children(page)[1];
        let mut host = Host::new(dom);
        host.resize(20, 4);
        (host, input)
    }

    #[test]
    fn click_focuses_element_under_pointer_and_keys_follow_focus() {
        let (mut host, input) = host_with_input();
        host.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 1));
        host.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 2, 1));
        assert_eq!(host.dom().active_element(), Some(input));
        for c in "rs".chars() {
            host.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)));
        }
        assert_eq!(host.dom().input_value(input), "rs");
    }

    #[test]
    fn quit_binding_stops_the_loop() {
        let (mut host, _) = host_with_input();
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(matches!(host.handle_event(&quit), ControlFlow::Quit));
    }

    #[test]
    fn tick_runs_due_timers() {
        let (mut host, _) = host_with_input();
        let fired = std::rc::Rc::new(std::cell::Cell::new(false));
        let f = fired.clone();
        host.dom()
            .set_timeout(Duration::from_millis(100), move |_| f.set(true));
        assert_eq!(host.tick(), 0);
        host.dom().advance_clock(Duration::from_millis(100));
        assert_eq!(host.tick(), 1);
        assert!(fired.get());
    }

    #[test]
    fn resize_updates_viewport() {
        let (mut host, _) = host_with_input();
        host.handle_event(&Event::Resize(100, 30));
        assert_eq!(host.dom().viewport(), (100.0, 30.0));
    }
}
