//! Path include/exclude inputs plus one checkbox per file extension.
//!
//! Reports the selection through `onFilterChanged`. Checkbox changes report
//! immediately; text edits are debounced.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Weak;

use crate::builder::{Child, Element, PropertyBag, el};
use crate::components::{Component, ComponentContext, with_instance};
use crate::constants::FILTER_TEXT_DEBOUNCE;
use crate::dom::{Dom, Event, NodeId, TimerId, Value};
use crate::error::BuildError;

const LIST_PLACEHOLDER: &str = "Enter comma-separated list";

pub struct FilterControl {
    props: PropertyBag,
    me: Weak<RefCell<FilterControl>>,
    root: NodeId,
    include_input: NodeId,
    exclude_input: NodeId,
    checkboxes: Vec<NodeId>,
    pending: Option<TimerId>,
}

fn split_list(text: &str) -> Vec<Value> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Value::from)
        .collect()
}

impl Component for FilterControl {
    const NAME: &'static str = "FilterControl";

    fn create(props: PropertyBag, _children: Vec<Child>) -> Result<Self, BuildError> {
        Ok(Self {
            props,
            me: Weak::new(),
            root: NodeId::default(),
            include_input: NodeId::default(),
            exclude_input: NodeId::default(),
            checkboxes: Vec::new(),
            pending: None,
        })
    }

    fn props(&self) -> &PropertyBag {
        &self.props
    }

    fn render(&mut self, ctx: &ComponentContext<Self>) -> Element {
        self.me = ctx.handle();
        let extensions = self.props.value("extensions").to_string_list();
        let checkboxes: Vec<Element> = extensions
            .iter()
            .enumerate()
            .map(|(i, ext)| {
                let id = format!("filter-ext-{}", i + 1);
                el("div")
                    .class("ext-checkbox")
                    .child(
                        el("input")
                            .prop("type", "checkbox")
                            .id(&id)
                            .prop("data-ext", ext.as_str())
                            .prop("ref", ctx.node_ref(|f, n| f.checkboxes.push(n))),
                    )
                    .child(el("label").prop("htmlFor", id).text(ext.as_str()))
            })
            .collect();

        let text_input = |label: &str, input: Element| {
            el("div")
                .class("filter-input")
                .child(el("div").class("filter-label").text(label))
                .child(
                    el("div").child(
                        input
                            .prop("type", "text")
                            .prop("spellcheck", false)
                            .prop("placeholder", LIST_PLACEHOLDER),
                    ),
                )
        };

        el("div")
            .class("filter-control")
            .prop("ref", ctx.node_ref(|f, n| f.root = n))
            .handler("onChange", ctx.handler(Self::on_change))
            .handler("onInput", ctx.handler(Self::on_input))
            .child(
                el("div")
                    .class("textinput-row")
                    .child(text_input(
                        "Only show paths that contain:",
                        el("input").prop("ref", ctx.node_ref(|f, n| f.include_input = n)),
                    ))
                    .child(text_input(
                        "Exclude paths that contain:",
                        el("input").prop("ref", ctx.node_ref(|f, n| f.exclude_input = n)),
                    )),
            )
            .child(el("div").class("checkbox-row").children(checkboxes))
    }
}

impl FilterControl {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn include_input(&self) -> NodeId {
        self.include_input
    }

    pub fn exclude_input(&self) -> NodeId {
        self.exclude_input
    }

    pub fn checkboxes(&self) -> &[NodeId] {
        &self.checkboxes
    }

    /// Current selection as `{extensions, include, exclude}`, or null when
    /// nothing is selected or typed. `extensions` is null when no box is
    /// checked.
    pub fn selection(&self, dom: &Dom) -> Value {
        let extensions: Vec<Value> = self
            .checkboxes
            .iter()
            .filter(|cb| dom.checked(**cb))
            .filter_map(|cb| dom.attribute(*cb, "data-ext"))
            .map(Value::from)
            .collect();
        let include = split_list(&dom.input_value(self.include_input));
        let exclude = split_list(&dom.input_value(self.exclude_input));
        if extensions.is_empty() && include.is_empty() && exclude.is_empty() {
            return Value::Null;
        }
        let mut map = BTreeMap::new();
        map.insert(
            "extensions".to_string(),
            if extensions.is_empty() {
                Value::Null
            } else {
                Value::List(extensions)
            },
        );
        map.insert("include".to_string(), Value::List(include));
        map.insert("exclude".to_string(), Value::List(exclude));
        Value::Map(map)
    }

    fn report(&self, dom: &Dom) {
        let Some(callback) = self.props.handler("onFilterChanged") else {
            return;
        };
        let selection = self.selection(dom);
        tracing::debug!(%selection, "filter changed");
        dom.queue_microtask(move |dom| {
            callback(dom, &mut Event::custom("filterchanged", selection));
        });
    }

    fn is_text_input(dom: &Dom, node: Option<NodeId>) -> bool {
        node.and_then(|n| dom.attribute(n, "type")).as_deref() == Some("text")
    }

    fn on_change(&mut self, dom: &Dom, ev: &mut Event) {
        if Self::is_text_input(dom, ev.target()) {
            return;
        }
        self.report(dom);
    }

    /// Each edit restarts the quiet period.
    fn on_input(&mut self, dom: &Dom, ev: &mut Event) {
        if !Self::is_text_input(dom, ev.target()) {
            return;
        }
        if let Some(pending) = self.pending.take() {
            dom.clear_timeout(pending);
        }
        let me = self.me.clone();
        self.pending = Some(dom.set_timeout(FILTER_TEXT_DEBOUNCE, move |dom| {
            with_instance(&me, |this| {
                this.pending = None;
                this.report(dom);
            });
        }));
    }
}
