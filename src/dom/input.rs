//! Platform-level input: turns raw key presses and pointer actions into
//! dispatched events plus the default actions a user agent performs when
//! no handler prevents them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::query::{focusable_children, is_click_focusable, is_visible};
use super::{Dom, Event, NodeId};

enum EditTarget {
    Text { multiline: bool },
    Checkbox,
    Activatable,
    Other,
}

impl Dom {
    fn edit_target(&self, node: NodeId) -> EditTarget {
        match self.tag(node).as_deref() {
            Some("textarea") => EditTarget::Text { multiline: true },
            Some("input") => match self.attribute(node, "type").as_deref() {
                Some("checkbox") => EditTarget::Checkbox,
                Some("button" | "submit") => EditTarget::Activatable,
                Some("hidden") => EditTarget::Other,
                _ => EditTarget::Text { multiline: false },
            },
            Some("button" | "a") => EditTarget::Activatable,
            _ => EditTarget::Other,
        }
    }

    /// Deliver one key press: `keydown` at the focused element (or the body),
    /// the default action unless prevented, then `keyup` at whatever element
    /// holds focus afterwards.
    pub fn press_key(&self, key: KeyEvent) {
        let target = self.active_element().unwrap_or_else(|| self.body());
        let mut down = Event::key("keydown", key);
        let proceed = self.dispatch(target, &mut down);
        if proceed && self.exists(target) {
            self.key_default_action(target, key);
        }
        let after = self
            .active_element()
            .filter(|n| self.exists(*n))
            .unwrap_or_else(|| self.body());
        self.dispatch(after, &mut Event::key("keyup", key));
    }

    /// Press a key for every character of `text`.
    pub fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.press_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn key_default_action(&self, target: NodeId, key: KeyEvent) {
        if matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.move_focus(super::is_back_tab(&key));
            return;
        }
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match (self.edit_target(target), key.code) {
            (EditTarget::Text { .. }, KeyCode::Char(c)) if plain => {
                let mut value = self.input_value(target);
                value.push(c);
                self.set_input_value(target, value);
                self.dispatch(target, &mut Event::new("input"));
            }
            (EditTarget::Text { .. }, KeyCode::Backspace) => {
                let mut value = self.input_value(target);
                if value.pop().is_some() {
                    self.set_input_value(target, value);
                    self.dispatch(target, &mut Event::new("input"));
                }
            }
            (EditTarget::Text { multiline: true }, KeyCode::Enter) => {
                let mut value = self.input_value(target);
                value.push('\n');
                self.set_input_value(target, value);
                self.dispatch(target, &mut Event::new("input"));
            }
            (EditTarget::Checkbox, KeyCode::Char(' ')) => self.click(target),
            (EditTarget::Activatable, KeyCode::Enter | KeyCode::Char(' ')) => self.click(target),
            _ => {}
        }
    }

    /// Sequential focus navigation over the whole document, wrapping at
    /// either end.
    fn move_focus(&self, backwards: bool) {
        let order = focusable_children(self, self.body());
        if order.is_empty() {
            return;
        }
        let current = self
            .active_element()
            .and_then(|a| order.iter().position(|n| *n == a));
        let next = match (current, backwards) {
            (None, false) => 0,
            (None, true) => order.len() - 1,
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => (i + order.len() - 1) % order.len(),
        };
        self.focus(order[next]);
    }

    /// Activate `node` as a user click would. Checkboxes toggle first and
    /// report `change` afterwards.
    pub fn click(&self, node: NodeId) {
        let is_checkbox = matches!(self.edit_target(node), EditTarget::Checkbox);
        if is_checkbox {
            self.set_checked(node, !self.checked(node));
        }
        let mut click = Event::new("click");
        self.dispatch(node, &mut click);
        if is_checkbox && self.exists(node) {
            self.dispatch(node, &mut Event::new("change"));
        }
    }

    /// Topmost visible element whose laid-out box contains the point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeId> {
        self.descendants(self.body())
            .into_iter()
            .filter(|n| self.is_element(*n))
            .filter(|n| {
                let b = self.layout_box(*n);
                b.width > 0.0 && b.height > 0.0 && b.contains(x, y)
            })
            .filter(|n| is_visible(self, *n))
            .last()
    }

    /// Primary button press over `target`. Unless prevented, focus moves to
    /// the nearest focusable ancestor, or is dropped when there is none.
    pub fn pointer_down(&self, target: NodeId, x: f64, y: f64) {
        self.inner.borrow_mut().pressed = Some(target);
        let mut down = Event::pointer("mousedown", x, y);
        if !self.dispatch(target, &mut down) || !self.exists(target) {
            return;
        }
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if is_click_focusable(self, node) {
                self.focus(node);
                return;
            }
            cursor = self.parent(node);
        }
        if let Some(active) = self.active_element() {
            self.blur(active);
        }
    }

    /// Pointer motion. While a capture is held every move goes to it,
    /// regardless of what lies under the pointer.
    pub fn pointer_move(&self, target: Option<NodeId>, x: f64, y: f64) {
        let event = Event::pointer("mousemove", x, y);
        if self.deliver_captured_move(&event) {
            return;
        }
        let previous = {
            let mut doc = self.inner.borrow_mut();
            std::mem::replace(&mut doc.hovered, target)
        };
        let Some(target) = target else {
            return;
        };
        if previous != Some(target) {
            let mut over = Event::pointer("mouseover", x, y).with_related_target(previous);
            self.dispatch(target, &mut over);
        }
        if self.exists(target) {
            self.dispatch(target, &mut event.clone());
        }
    }

    /// Primary button release. A held capture is released here and receives
    /// the event; otherwise `mouseup` is dispatched and, when the release
    /// lands on the pressed element, a `click`.
    pub fn pointer_up(&self, target: Option<NodeId>, x: f64, y: f64) {
        let pressed = self.inner.borrow_mut().pressed.take();
        let event = Event::pointer("mouseup", x, y);
        if let Some(id) = self.active_capture() {
            if let Some(up) = self.release_pointer_capture(id) {
                up.fire(self, &event);
            }
            return;
        }
        let Some(target) = target else {
            return;
        };
        self.dispatch(target, &mut event.clone());
        if pressed == Some(target) && self.exists(target) {
            self.click(target);
        }
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.inner.borrow().hovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::handler;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_edits_focused_input() {
        let dom = Dom::new();
        let input = dom.create_element("input");
        dom.append_child(dom.body(), input);
        dom.focus(input);
        dom.type_text("abc");
        dom.press_key(key(KeyCode::Backspace));
        assert_eq!(dom.input_value(input), "ab");
    }

    #[test]
    fn prevented_keydown_skips_default() {
        let dom = Dom::new();
        let input = dom.create_element("input");
        dom.append_child(dom.body(), input);
        dom.add_listener(input, "keydown", handler(|_, ev| ev.prevent_default()));
        dom.focus(input);
        dom.type_text("x");
        assert_eq!(dom.input_value(input), "");
    }

    #[test]
    fn tab_wraps_through_document() {
        let dom = Dom::new();
        let a = dom.create_element("button");
        let b = dom.create_element("input");
        dom.append_child(dom.body(), a);
        dom.append_child(dom.body(), b);
        dom.press_key(key(KeyCode::Tab));
        assert_eq!(dom.active_element(), Some(a));
        dom.press_key(key(KeyCode::Tab));
        assert_eq!(dom.active_element(), Some(b));
        dom.press_key(key(KeyCode::Tab));
        assert_eq!(dom.active_element(), Some(a));
        dom.press_key(key(KeyCode::BackTab));
        assert_eq!(dom.active_element(), Some(b));
    }

    #[test]
    fn press_and_release_on_same_node_clicks() {
        let dom = Dom::new();
        let button = dom.create_element("button");
        dom.append_child(dom.body(), button);
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in ["mousedown", "mouseup", "click"] {
            let log = log.clone();
            dom.add_listener(button, kind, handler(move |_, ev| log.borrow_mut().push(ev.kind().to_string())));
        }
        dom.pointer_down(button, 1.0, 1.0);
        assert_eq!(dom.active_element(), Some(button));
        dom.pointer_up(Some(button), 1.0, 1.0);
        assert_eq!(*log.borrow(), vec!["mousedown", "mouseup", "click"]);
    }

    #[test]
    fn space_toggles_checkbox_and_reports_change() {
        let dom = Dom::new();
        let check = dom.create_element("input");
        dom.set_attribute(check, "type", "checkbox");
        dom.append_child(dom.body(), check);
        let changes = Rc::new(RefCell::new(0));
        let c = changes.clone();
        dom.add_listener(dom.body(), "change", handler(move |_, _| *c.borrow_mut() += 1));
        dom.focus(check);
        dom.press_key(key(KeyCode::Char(' ')));
        assert!(dom.checked(check));
        assert_eq!(*changes.borrow(), 1);
    }

    #[test]
    fn capture_receives_moves_and_single_release() {
        let dom = Dom::new();
        let moves = Rc::new(RefCell::new(Vec::new()));
        let ups = Rc::new(RefCell::new(0));
        let (m, u) = (moves.clone(), ups.clone());
        dom.set_pointer_capture(
            move |_, ev| m.borrow_mut().push(ev.client_y()),
            move |_, _| *u.borrow_mut() += 1,
        )
        .unwrap();
        assert!(dom.set_pointer_capture(|_, _| {}, |_, _| {}).is_err());
        dom.pointer_move(None, 0.0, 3.0);
        dom.pointer_move(None, 0.0, 5.0);
        dom.pointer_up(None, 0.0, 5.0);
        dom.pointer_up(None, 0.0, 5.0);
        assert_eq!(*moves.borrow(), vec![3.0, 5.0]);
        assert_eq!(*ups.borrow(), 1);
        assert!(dom.active_capture().is_none());
    }
}
