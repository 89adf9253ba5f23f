//! Type-ahead text input with a filtered suggestion dropdown.
//!
//! Properties: `value`, `prompt`, `placeholder`, `className`, `suggestions`
//! (a list), `constrain` (typed text must match a suggestion), and the
//! callbacks `onTextEdited(text)` and `onItemSelected(value)`. A commit also
//! raises an `itemselected` event on the root element.

use std::cell::RefCell;
use std::rc::Weak;
use std::time::Duration;

use crossterm::event::KeyCode;

use crate::builder::{Child, Element, PropertyBag, el};
use crate::components::{Component, ComponentContext, with_instance};
use crate::constants::{DEFAULT_DROPDOWN_ROW_HEIGHT, HOVER_SUPPRESS_AFTER_SCROLL};
use crate::dom::{Dom, Event, NodeId, Value, add_class_exclusively, concat_classes};
use crate::error::BuildError;
use crate::keybindings::{self, Action};

const ITEM_CLASS: &str = "combo-dropdown-item";
const HIGHLIGHT_CLASS: &str = "combo-highlighted";
const FOCUS_CLASS: &str = "combo-focus-style";

pub struct ComboBox {
    props: PropertyBag,
    me: Weak<RefCell<ComboBox>>,
    root: NodeId,
    outer_rect: NodeId,
    text_input: NodeId,
    chevron: NodeId,
    dropdown: NodeId,
    value: Option<Value>,
    suggestions: Option<Vec<Value>>,
    /// Filter the dropdown was last populated from.
    filter: Option<String>,
    /// Text input contents when the last keydown arrived.
    prev_text: String,
    items: Vec<(NodeId, Value)>,
    open: bool,
    when_scrolled: Option<Duration>,
}

impl Component for ComboBox {
    const NAME: &'static str = "ComboBox";

    fn create(props: PropertyBag, _children: Vec<Child>) -> Result<Self, BuildError> {
        let suggestions = props.value("suggestions").as_list().map(<[Value]>::to_vec);
        let value = Some(props.value("value")).filter(|v| !v.is_null());
        Ok(Self {
            props,
            me: Weak::new(),
            root: NodeId::default(),
            outer_rect: NodeId::default(),
            text_input: NodeId::default(),
            chevron: NodeId::default(),
            dropdown: NodeId::default(),
            value,
            suggestions,
            filter: None,
            prev_text: String::new(),
            items: Vec::new(),
            open: false,
            when_scrolled: None,
        })
    }

    fn props(&self) -> &PropertyBag {
        &self.props
    }

    fn render(&mut self, ctx: &ComponentContext<Self>) -> Element {
        self.me = ctx.handle();
        let initial = self
            .value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let classes = concat_classes(["combo-box", self.props.str("className").unwrap_or("")]);
        let prompt = self.props.str("prompt").map(str::to_string);

        el("div")
            .class(&classes)
            .prop("ref", ctx.node_ref(|c, n| c.root = n))
            .child(prompt.map(|p| el("div").class("combo-prompt").text(p)))
            .child(
                el("div")
                    .class("combo-rect")
                    .prop("ref", ctx.node_ref(|c, n| c.outer_rect = n))
                    .child(
                        el("input")
                            .prop("type", "text")
                            .class("combo-textbox")
                            .prop("ref", ctx.node_ref(|c, n| c.text_input = n))
                            .prop("placeholder", self.props.str("placeholder").map(str::to_string))
                            .prop("spellcheck", false)
                            .prop("defaultValue", initial)
                            .handler("onKeyDown", ctx.handler(Self::on_text_key_down))
                            .handler("onKeyUp", ctx.handler(Self::on_text_key_up))
                            .handler("onFocus", ctx.handler(Self::on_text_focus))
                            .handler("onBlur", ctx.handler(Self::on_text_blur))
                            .handler("onInput", ctx.handler(Self::on_text_input)),
                    )
                    .child(
                        el("div")
                            .class("combo-chevron")
                            .style("visibility", self.chevron_visibility())
                            .prop("ref", ctx.node_ref(|c, n| c.chevron = n))
                            .handler("onMouseDown", ctx.handler(Self::on_chevron_mouse_down))
                            .child(el("i").class("fa fa-chevron-down")),
                    ),
            )
            .child(
                el("div")
                    .class("combo-dropdown")
                    .style("display", "none")
                    .prop("tabindex", -1)
                    .prop("ref", ctx.node_ref(|c, n| c.dropdown = n))
                    .handler("onMouseDown", ctx.handler(Self::on_dropdown_mouse_down))
                    .handler("onMouseOver", ctx.handler(Self::on_dropdown_mouse_over))
                    .handler("onBlur", ctx.handler(Self::on_dropdown_blur)),
            )
    }
}

impl ComboBox {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn text_input(&self) -> NodeId {
        self.text_input
    }

    pub fn dropdown(&self) -> NodeId {
        self.dropdown
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, dom: &Dom, value: impl Into<Value>) {
        let value = value.into();
        dom.set_input_value(self.text_input, value.to_string());
        self.value = Some(value);
    }

    pub fn text(&self, dom: &Dom) -> String {
        dom.input_value(self.text_input)
    }

    pub fn set_text(&mut self, dom: &Dom, text: &str) {
        dom.set_input_value(self.text_input, text);
    }

    pub fn set_placeholder(&mut self, dom: &Dom, placeholder: &str) {
        dom.set_attribute(self.text_input, "placeholder", placeholder);
    }

    /// Replace the suggestion list. The chevron is only shown while there is
    /// something to drop down.
    /// An open dropdown is rebuilt from the current text.
    pub fn set_suggestions(&mut self, dom: &Dom, suggestions: Option<Vec<Value>>) {
        self.suggestions = suggestions;
        self.filter = None;
        dom.set_style(self.chevron, "visibility", self.chevron_visibility());
        if self.open {
            let text = dom.input_value(self.text_input);
            self.populate(dom, &text);
        }
    }

    pub fn suggestions(&self) -> Option<&[Value]> {
        self.suggestions.as_deref()
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.open
    }

    /// Index of the highlighted dropdown row.
    pub fn highlighted(&self, dom: &Dom) -> Option<usize> {
        self.items
            .iter()
            .position(|(node, _)| dom.has_class(*node, HIGHLIGHT_CLASS))
    }

    /// Text of the rows currently in the dropdown.
    pub fn dropdown_items(&self, dom: &Dom) -> Vec<String> {
        self.items
            .iter()
            .map(|(node, _)| dom.text_content(*node))
            .collect()
    }

    fn chevron_visibility(&self) -> &'static str {
        if self.suggestions.as_ref().is_some_and(|s| !s.is_empty()) {
            "visible"
        } else {
            "hidden"
        }
    }

    /// Rebuild the dropdown rows from the suggestions containing `filter`
    /// (case-insensitive). Opens the dropdown when anything matches, closes
    /// it otherwise. Does nothing when the filter is unchanged.
    fn populate(&mut self, dom: &Dom, filter: &str) {
        if self.filter.as_deref() == Some(filter) {
            return;
        }
        dom.clear_children(self.dropdown);
        self.items.clear();
        let Some(suggestions) = self.suggestions.as_ref() else {
            self.hide_dropdown(dom);
            self.filter = None;
            return;
        };
        let needle = filter.to_lowercase();
        for item in suggestions {
            let text = item.to_string();
            if !text.to_lowercase().contains(&needle) {
                continue;
            }
            let Ok(node) = el("div").class(ITEM_CLASS).text(text).build(dom) else {
                continue;
            };
            dom.append_child(self.dropdown, node);
            self.items.push((node, item.clone()));
        }
        if self.items.is_empty() {
            self.hide_dropdown(dom);
        } else {
            self.show_dropdown(dom);
        }
        self.filter = Some(filter.to_string());
    }

    fn show_dropdown(&mut self, dom: &Dom) {
        dom.remove_style(self.dropdown, "display");
        let width = dom.offset_width(self.outer_rect);
        if width > 0.0 {
            dom.set_style(self.dropdown, "min-width", format!("{width}px"));
        }
        dom.set_scroll_top(self.dropdown, 0.0);
        if !self.open {
            tracing::debug!(items = self.items.len(), "combo dropdown opened");
        }
        self.open = true;
    }

    fn hide_dropdown(&mut self, dom: &Dom) {
        dom.set_style(self.dropdown, "display", "none");
        if self.open {
            tracing::debug!("combo dropdown closed");
        }
        self.open = false;
    }

    fn move_highlight(&mut self, dom: &Dom, forward: bool) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let next = match (self.highlighted(dom), forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        let (node, value) = self.items[next].clone();
        dom.set_input_value(self.text_input, value.to_string());
        self.value = Some(value);
        let peers: Vec<NodeId> = self.items.iter().map(|(n, _)| *n).collect();
        add_class_exclusively(dom, node, HIGHLIGHT_CLASS, Some(&peers));
        self.scroll_into_view(dom, next);
    }

    /// Scroll the dropdown only as far as needed to show row `index`.
    fn scroll_into_view(&mut self, dom: &Dom, index: usize) {
        let view = dom.offset_height(self.dropdown);
        if view <= 0.0 {
            return;
        }
        let row = self
            .items
            .first()
            .map(|(n, _)| dom.offset_height(*n))
            .filter(|h| *h > 0.0)
            .unwrap_or(DEFAULT_DROPDOWN_ROW_HEIGHT);
        let top = index as f64 * row;
        let bottom = top + row;
        let scroll = dom.scroll_top(self.dropdown);
        if top < scroll {
            dom.set_scroll_top(self.dropdown, top);
            self.when_scrolled = Some(dom.now());
        } else if bottom > scroll + view {
            dom.set_scroll_top(self.dropdown, bottom - view);
            self.when_scrolled = Some(dom.now());
        }
    }

    /// Store `value` as the selection and tell observers about it.
    fn commit(&mut self, dom: &Dom, value: Value) {
        self.hide_dropdown(dom);
        let text = value.to_string();
        dom.set_input_value(self.text_input, text.clone());
        self.prev_text = text;
        self.value = Some(value.clone());
        tracing::debug!(value = %value, "combo item selected");

        let callback = self.props.handler("onItemSelected");
        let root = self.root;
        dom.queue_microtask(move |dom| {
            if let Some(callback) = callback {
                callback(dom, &mut Event::custom("itemselected", value.clone()));
            }
            dom.dispatch(root, &mut Event::custom("itemselected", value));
        });
    }

    fn commit_row(&mut self, dom: &Dom, index: usize) {
        let Some((_, value)) = self.items.get(index).cloned() else {
            return;
        };
        self.commit(dom, value);
    }

    fn on_text_key_down(&mut self, dom: &Dom, ev: &mut Event) {
        let Some(key) = ev.key_event().copied() else {
            return;
        };
        self.prev_text = dom.input_value(self.text_input);
        let bindings = keybindings::defaults();
        if bindings.matches(Action::ComboDismiss, &key) {
            self.hide_dropdown(dom);
        } else if bindings.matches(Action::ComboNext, &key)
            || bindings.matches(Action::ComboPrev, &key)
        {
            if self.open {
                self.move_highlight(dom, bindings.matches(Action::ComboNext, &key));
            } else {
                self.filter = None;
                self.populate(dom, "");
            }
            ev.prevent_default();
        } else if bindings.matches(Action::ComboCommit, &key) {
            if self.open
                && let Some(index) = self.highlighted(dom)
            {
                self.commit_row(dom, index);
                self.filter = Some(dom.input_value(self.text_input));
                ev.stop_propagation();
                return;
            }
            let typed = dom.input_value(self.text_input);
            if self.props.flag("constrain") {
                let wanted = typed.to_lowercase();
                let mut matches = self
                    .suggestions
                    .iter()
                    .flatten()
                    .filter(|s| !s.is_null() && s.to_string().to_lowercase() == wanted);
                if let (Some(only), None) = (matches.next(), matches.next()) {
                    let only = only.clone();
                    self.commit(dom, only);
                }
            } else {
                self.commit(dom, Value::Str(typed));
            }
            ev.stop_propagation();
        }
    }

    fn on_text_key_up(&mut self, dom: &Dom, ev: &mut Event) {
        if matches!(
            ev.key_code(),
            Some(KeyCode::Up | KeyCode::Down | KeyCode::Esc)
        ) {
            return;
        }
        let text = dom.input_value(self.text_input);
        if text != self.prev_text {
            self.value = Some(Value::Str(text.clone()));
            self.populate(dom, &text);
        }
    }

    fn on_text_input(&mut self, dom: &Dom, _ev: &mut Event) {
        let Some(callback) = self.props.handler("onTextEdited") else {
            return;
        };
        let text = dom.input_value(self.text_input);
        dom.queue_microtask(move |dom| {
            callback(dom, &mut Event::custom("textedited", Value::Str(text)));
        });
    }

    fn on_text_focus(&mut self, dom: &Dom, _ev: &mut Event) {
        dom.add_class(self.outer_rect, FOCUS_CLASS);
    }

    fn on_text_blur(&mut self, dom: &Dom, ev: &mut Event) {
        dom.remove_class(self.outer_rect, FOCUS_CLASS);
        if ev.related_target() != Some(self.dropdown) {
            self.hide_dropdown(dom);
        }
    }

    /// Opening is deferred so the blur caused by this press cannot close
    /// the dropdown it is about to show.
    fn on_chevron_mouse_down(&mut self, dom: &Dom, _ev: &mut Event) {
        if self.open {
            self.hide_dropdown(dom);
            return;
        }
        self.filter = None;
        let input = self.text_input;
        dom.queue_microtask(move |dom| dom.blur(input));
        let me = self.me.clone();
        dom.set_timeout(Duration::ZERO, move |dom| {
            let input = with_instance(&me, |this| {
                this.populate(dom, "");
                this.text_input
            });
            if let Some(input) = input {
                dom.focus(input);
            }
        });
    }

    fn on_dropdown_mouse_down(&mut self, dom: &Dom, ev: &mut Event) {
        let Some(target) = ev.target() else {
            return;
        };
        let Some(index) = self.items.iter().position(|(n, _)| *n == target) else {
            return;
        };
        self.commit_row(dom, index);
        let input = self.text_input;
        dom.set_timeout(Duration::ZERO, move |dom| dom.focus(input));
    }

    fn on_dropdown_mouse_over(&mut self, dom: &Dom, ev: &mut Event) {
        if let Some(scrolled) = self.when_scrolled
            && dom.now() < scrolled + HOVER_SUPPRESS_AFTER_SCROLL
        {
            return;
        }
        let Some(target) = ev.target() else {
            return;
        };
        if self.items.iter().any(|(n, _)| *n == target) {
            add_class_exclusively(dom, target, HIGHLIGHT_CLASS, None);
        }
    }

    fn on_dropdown_blur(&mut self, dom: &Dom, _ev: &mut Event) {
        if dom.active_element() != Some(self.text_input) {
            self.hide_dropdown(dom);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::slot;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use std::rc::Rc;

    fn mount(dom: &Dom, constrain: bool) -> Rc<RefCell<ComboBox>> {
        let combo = slot::<ComboBox>();
        let node = Element::component::<ComboBox>()
            .prop("suggestions", vec!["apple", "apricot", "banana"])
            .prop("constrain", constrain)
            .mount_into(&combo)
            .build(dom)
            .unwrap();
        dom.append_child(dom.body(), node);
        let combo = combo.borrow().clone().unwrap();
        let input = combo.borrow().text_input();
        dom.focus(input);
        combo
    }

    fn press(dom: &Dom, code: KeyCode) {
        dom.press_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn typing_filters_case_insensitively() {
        let dom = Dom::new();
        let combo = mount(&dom, false);
        dom.type_text("AP");
        let c = combo.borrow();
        assert!(c.is_dropdown_open());
        assert_eq!(c.dropdown_items(&dom), vec!["apple", "apricot"]);
        assert_eq!(c.highlighted(&dom), None);
    }

    #[test]
    fn no_match_closes_dropdown() {
        let dom = Dom::new();
        let combo = mount(&dom, false);
        dom.type_text("ap");
        dom.type_text("zz");
        assert!(!combo.borrow().is_dropdown_open());
    }

    #[test]
    fn arrows_open_then_cycle_with_preview() {
        let dom = Dom::new();
        let combo = mount(&dom, false);
        press(&dom, KeyCode::Down);
        assert!(combo.borrow().is_dropdown_open());
        assert_eq!(combo.borrow().highlighted(&dom), None);
        press(&dom, KeyCode::Up);
        assert_eq!(combo.borrow().highlighted(&dom), Some(2));
        assert_eq!(combo.borrow().text(&dom), "banana");
        press(&dom, KeyCode::Down);
        assert_eq!(combo.borrow().highlighted(&dom), Some(0));
        assert_eq!(combo.borrow().value(), Some(&Value::from("apple")));
    }

    #[test]
    fn escape_closes_without_commit() {
        let dom = Dom::new();
        let combo = mount(&dom, false);
        press(&dom, KeyCode::Down);
        press(&dom, KeyCode::Esc);
        assert!(!combo.borrow().is_dropdown_open());
    }

    #[test]
    fn set_suggestions_toggles_chevron() {
        let dom = Dom::new();
        let combo = mount(&dom, false);
        let chevron = combo.borrow().chevron;
        assert_eq!(dom.style(chevron, "visibility").as_deref(), Some("visible"));
        combo.borrow_mut().set_suggestions(&dom, Some(Vec::new()));
        assert_eq!(dom.style(chevron, "visibility").as_deref(), Some("hidden"));
        combo.borrow_mut().set_suggestions(&dom, None);
        press(&dom, KeyCode::Down);
        assert!(!combo.borrow().is_dropdown_open());
    }

    #[test]
    fn hover_is_ignored_right_after_auto_scroll() {
        let dom = Dom::new();
        let combo = mount(&dom, false);
        let dropdown = combo.borrow().dropdown();
        dom.set_style(dropdown, "height", "1px");
        press(&dom, KeyCode::Down);
        press(&dom, KeyCode::Down);
        press(&dom, KeyCode::Down);
        assert_eq!(dom.scroll_top(dropdown), 1.0);
        let rows: Vec<NodeId> = combo.borrow().items.iter().map(|(n, _)| *n).collect();
        dom.pointer_move(Some(rows[2]), 0.0, 0.0);
        assert_eq!(combo.borrow().highlighted(&dom), Some(1));
        dom.advance_clock(HOVER_SUPPRESS_AFTER_SCROLL);
        dom.pointer_move(Some(rows[0]), 0.0, 0.0);
        assert_eq!(combo.borrow().highlighted(&dom), Some(0));
    }

    #[test]
    fn blur_to_elsewhere_closes_dropdown() {
        let dom = Dom::new();
        let combo = mount(&dom, false);
        let other = dom.create_element("button");
        dom.append_child(dom.body(), other);
        dom.type_text("a");
        assert!(combo.borrow().is_dropdown_open());
        dom.focus(other);
        assert!(!combo.borrow().is_dropdown_open());
        assert!(!dom.has_class(combo.borrow().outer_rect, FOCUS_CLASS));
    }
}
