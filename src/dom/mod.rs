//! In-memory retained document standing in for the platform element tree.
//!
//! `Dom` is a cheap, clonable handle to a single-threaded [`Document`]. It
//! provides what widgets expect from a UI platform: element creation in the
//! HTML or SVG namespace, attributes, live fields, inline style, direct
//! `on<event>` handlers and generic listeners, bubbling dispatch, focus,
//! geometry, scroll offsets, a clock and a timer queue.
//!
//! Borrow discipline: the document is never borrowed while user code runs.
//! Handlers, timer tasks, microtasks and capture callbacks are cloned or
//! taken out of the document first and invoked afterwards, so they are free
//! to call back into the `Dom`.

mod event;
mod input;
mod query;
mod timers;
mod value;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::constants::MAX_TIMER_DRAIN_PASSES;
use crate::error::DragError;

pub use event::{Event, Handler, PointerInfo, handler, is_back_tab};
pub use query::{
    add_class_exclusively, concat_classes, focusable_children, is_tabbable, is_visible, parse_px,
    query_class, query_class_all,
};
pub use timers::TimerId;
pub use value::Value;

use timers::TimerQueue;

new_key_type! {
    /// Identifies an element or text node. Ids of discarded nodes are never
    /// reused for a different node.
    pub struct NodeId;
}

pub const SVG_NAMESPACE_URI: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
}

/// Absolute document-space box of an element, written by the host after layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutBox {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Field names every element exposes as live properties.
const LIVE_FIELDS: &[&str] = &[
    "value",
    "checked",
    "placeholder",
    "id",
    "title",
    "hidden",
    "tabIndex",
    "disabled",
    "dataset",
    "textContent",
];

pub(crate) type Task = Box<dyn FnOnce(&Dom)>;
type MoveCallback = Box<dyn FnMut(&Dom, &Event)>;
type UpCallback = Box<dyn FnOnce(&Dom, &Event)>;

/// Identifies the holder of the document-wide pointer capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureId(u64);

struct PointerCapture {
    id: CaptureId,
    on_move: Option<MoveCallback>,
    on_up: Option<UpCallback>,
}

struct ElementData {
    tag: String,
    namespace: Namespace,
    attributes: BTreeMap<String, String>,
    fields: BTreeMap<String, Value>,
    style: BTreeMap<String, String>,
    handlers: HashMap<String, Handler>,
    listeners: Vec<(String, Handler)>,
    layout: LayoutBox,
    scroll_top: f64,
}

enum NodeData {
    Element(Box<ElementData>),
    Text(String),
}

struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    body: NodeId,
    active: Option<NodeId>,
    hovered: Option<NodeId>,
    pressed: Option<NodeId>,
    viewport: (f64, f64),
    timers: TimerQueue,
    microtasks: VecDeque<Task>,
    capture: Option<PointerCapture>,
    next_capture: u64,
    modal_depth: usize,
    clock_origin: Instant,
    clock_skew: Duration,
}

impl Document {
    fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(Box::new(ElementData::new("body", Namespace::Html))),
        });
        Self {
            nodes,
            body,
            active: None,
            hovered: None,
            pressed: None,
            viewport: (0.0, 0.0),
            timers: TimerQueue::default(),
            microtasks: VecDeque::new(),
            capture: None,
            next_capture: 0,
            modal_depth: 0,
            clock_origin: Instant::now(),
            clock_skew: Duration::ZERO,
        }
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node)?.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node)?.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != node);
        }
        if let Some(n) = self.nodes.get_mut(node) {
            n.parent = None;
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn collect_subtree(&self, root: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.nodes.get(root) {
            out.push(root);
            for child in &node.children {
                self.collect_subtree(*child, out);
            }
        }
    }

    fn now(&self) -> Duration {
        self.clock_origin.elapsed() + self.clock_skew
    }
}

impl ElementData {
    fn new(tag: &str, namespace: Namespace) -> Self {
        Self {
            tag: tag.to_string(),
            namespace,
            attributes: BTreeMap::new(),
            fields: BTreeMap::new(),
            style: BTreeMap::new(),
            handlers: HashMap::new(),
            listeners: Vec::new(),
            layout: LayoutBox::default(),
            scroll_top: 0.0,
        }
    }

    fn class_list(&self) -> Vec<String> {
        self.attributes
            .get("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn set_class_list(&mut self, classes: &[String]) {
        if classes.is_empty() {
            self.attributes.remove("class");
        } else {
            self.attributes.insert("class".to_string(), classes.join(" "));
        }
    }
}

/// Shared handle to a [`Document`].
#[derive(Clone)]
pub struct Dom {
    inner: Rc<RefCell<Document>>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let doc = self.inner.borrow();
        f.debug_struct("Dom")
            .field("nodes", &doc.nodes.len())
            .field("active", &doc.active)
            .field("timers", &doc.timers.len())
            .finish()
    }
}

impl Dom {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Document::new())),
        }
    }

    pub fn body(&self) -> NodeId {
        self.inner.borrow().body
    }

    // ----- tree -----

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.create_element_ns(tag, Namespace::Html)
    }

    pub fn create_element_ns(&self, tag: &str, namespace: Namespace) -> NodeId {
        self.inner.borrow_mut().nodes.insert(Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(Box::new(ElementData::new(tag, namespace))),
        })
    }

    pub fn create_text(&self, text: impl Into<String>) -> NodeId {
        self.inner.borrow_mut().nodes.insert(Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Text(text.into()),
        })
    }

    /// Append `child` to `parent`, moving it out of its previous parent.
    /// Appending a node into its own subtree is refused.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> bool {
        let mut doc = self.inner.borrow_mut();
        if !doc.nodes.contains_key(parent) || !doc.nodes.contains_key(child) {
            return false;
        }
        if doc.is_inclusive_ancestor(child, parent) {
            tracing::warn!(?parent, ?child, "refusing to append a node into its own subtree");
            return false;
        }
        doc.detach(child);
        if let Some(p) = doc.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = doc.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Detach `node` from its parent. The node stays alive and may be re-inserted.
    pub fn remove(&self, node: NodeId) {
        self.inner.borrow_mut().detach(node);
    }

    /// Detach `node` and free its whole subtree, dropping its handlers.
    pub fn discard(&self, node: NodeId) {
        let freed = {
            let mut doc = self.inner.borrow_mut();
            doc.detach(node);
            let mut subtree = Vec::new();
            doc.collect_subtree(node, &mut subtree);
            for id in &subtree {
                if doc.active == Some(*id) {
                    doc.active = None;
                }
                if doc.hovered == Some(*id) {
                    doc.hovered = None;
                }
                if doc.pressed == Some(*id) {
                    doc.pressed = None;
                }
            }
            let freed: Vec<Node> = subtree
                .into_iter()
                .filter_map(|id| doc.nodes.remove(id))
                .collect();
            freed
        };
        // Handlers may own component instances; drop them without the borrow.
        drop(freed);
    }

    pub fn clear_children(&self, node: NodeId) {
        for child in self.children(node) {
            self.discard(child);
        }
    }

    pub fn exists(&self, node: NodeId) -> bool {
        self.inner.borrow().nodes.contains_key(node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().nodes.get(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .borrow()
            .nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Inclusive containment: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.inner.borrow().is_inclusive_ancestor(ancestor, node)
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        let doc = self.inner.borrow();
        doc.nodes.contains_key(node) && doc.is_inclusive_ancestor(doc.body, node)
    }

    /// Descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let doc = self.inner.borrow();
        let mut out = Vec::new();
        doc.collect_subtree(root, &mut out);
        if !out.is_empty() {
            out.remove(0);
        }
        out
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.inner.borrow().element(node).map(|el| el.tag.clone())
    }

    pub fn namespace(&self, node: NodeId) -> Option<Namespace> {
        self.inner.borrow().element(node).map(|el| el.namespace)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.inner.borrow().element(node).is_some()
    }

    pub fn text(&self, node: NodeId) -> Option<String> {
        match &self.inner.borrow().nodes.get(node)?.data {
            NodeData::Text(t) => Some(t.clone()),
            NodeData::Element(_) => None,
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        let doc = self.inner.borrow();
        let mut nodes = Vec::new();
        doc.collect_subtree(node, &mut nodes);
        nodes
            .into_iter()
            .filter_map(|id| match &doc.nodes.get(id)?.data {
                NodeData::Text(t) => Some(t.as_str()),
                NodeData::Element(_) => None,
            })
            .collect()
    }

    // ----- attributes, fields, style, classes -----

    pub fn set_attribute(&self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(el) = self.inner.borrow_mut().element_mut(node) {
            el.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .element(node)
            .and_then(|el| el.attributes.get(name).cloned())
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(el) = self.inner.borrow_mut().element_mut(node) {
            el.attributes.remove(name);
        }
    }

    /// Whether `name` is a live field on the element: one of the standard
    /// element properties or a field previously assigned to it.
    pub fn has_field(&self, node: NodeId, name: &str) -> bool {
        self.inner
            .borrow()
            .element(node)
            .is_some_and(|el| LIVE_FIELDS.contains(&name) || el.fields.contains_key(name))
    }

    pub fn set_field(&self, node: NodeId, name: &str, value: Value) {
        if let Some(el) = self.inner.borrow_mut().element_mut(node) {
            el.fields.insert(name.to_string(), value);
        }
    }

    pub fn field(&self, node: NodeId, name: &str) -> Option<Value> {
        self.inner
            .borrow()
            .element(node)
            .and_then(|el| el.fields.get(name).cloned())
    }

    pub fn set_style(&self, node: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(el) = self.inner.borrow_mut().element_mut(node) {
            if value.is_empty() {
                el.style.remove(name);
            } else {
                el.style.insert(name.to_string(), value);
            }
        }
    }

    pub fn style(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .element(node)
            .and_then(|el| el.style.get(name).cloned())
    }

    pub fn remove_style(&self, node: NodeId, name: &str) {
        self.set_style(node, name, "");
    }

    pub fn class_list(&self, node: NodeId) -> Vec<String> {
        self.inner
            .borrow()
            .element(node)
            .map(ElementData::class_list)
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.class_list(node).iter().any(|c| c == class)
    }

    pub fn add_class(&self, node: NodeId, class: &str) {
        if let Some(el) = self.inner.borrow_mut().element_mut(node) {
            let mut classes = el.class_list();
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
                el.set_class_list(&classes);
            }
        }
    }

    pub fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(el) = self.inner.borrow_mut().element_mut(node) {
            let mut classes = el.class_list();
            classes.retain(|c| c != class);
            el.set_class_list(&classes);
        }
    }

    // ----- form state -----

    /// Current value of a form control: the live `value` field once set,
    /// otherwise the `value` attribute.
    pub fn input_value(&self, node: NodeId) -> String {
        match self.field(node, "value") {
            Some(v) => v.to_string(),
            None => self.attribute(node, "value").unwrap_or_default(),
        }
    }

    pub fn set_input_value(&self, node: NodeId, value: impl Into<String>) {
        self.set_field(node, "value", Value::Str(value.into()));
    }

    pub fn checked(&self, node: NodeId) -> bool {
        match self.field(node, "checked") {
            Some(v) => v.as_bool().unwrap_or(false),
            None => self.has_attribute(node, "checked"),
        }
    }

    pub fn set_checked(&self, node: NodeId, checked: bool) {
        self.set_field(node, "checked", Value::Bool(checked));
    }

    // ----- handlers -----

    /// Assign the single direct handler for `name` (e.g. `onclick`),
    /// replacing any previous one.
    pub fn set_handler(&self, node: NodeId, name: &str, handler: Handler) {
        if let Some(el) = self.inner.borrow_mut().element_mut(node) {
            el.handlers.insert(name.to_string(), handler);
        }
    }

    pub fn has_handler(&self, node: NodeId, name: &str) -> bool {
        self.inner
            .borrow()
            .element(node)
            .is_some_and(|el| el.handlers.contains_key(name))
    }

    pub fn add_listener(&self, node: NodeId, event: &str, handler: Handler) {
        if let Some(el) = self.inner.borrow_mut().element_mut(node) {
            el.listeners.push((event.to_string(), handler));
        }
    }

    pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
        self.inner
            .borrow()
            .element(node)
            .map(|el| el.listeners.iter().filter(|(e, _)| e == event).count())
            .unwrap_or(0)
    }

    fn handlers_for(&self, node: NodeId, kind: &str) -> Vec<Handler> {
        let doc = self.inner.borrow();
        let Some(el) = doc.element(node) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if let Some(h) = el.handlers.get(&format!("on{kind}")) {
            out.push(h.clone());
        }
        out.extend(
            el.listeners
                .iter()
                .filter(|(e, _)| e == kind)
                .map(|(_, h)| h.clone()),
        );
        out
    }

    /// Dispatch `event` at `target`, bubbling through ancestors unless the
    /// event kind does not bubble or a handler stops propagation. Returns
    /// `false` when a handler prevented the default action.
    pub fn dispatch(&self, target: NodeId, event: &mut Event) -> bool {
        event.set_target(target);
        let path = if event.bubbles() {
            let doc = self.inner.borrow();
            let mut path = Vec::new();
            let mut cursor = Some(target);
            while let Some(node) = cursor {
                path.push(node);
                cursor = doc.nodes.get(node).and_then(|n| n.parent);
            }
            path
        } else {
            vec![target]
        };
        for node in path {
            event.set_current_target(node);
            for h in self.handlers_for(node, event.kind()) {
                h(self, event);
                self.flush_microtasks();
            }
            if event.propagation_stopped() {
                break;
            }
        }
        !event.default_prevented()
    }

    // ----- microtasks and timers -----

    /// Queue work to run right after the current handler returns.
    pub fn queue_microtask(&self, task: impl FnOnce(&Dom) + 'static) {
        self.inner.borrow_mut().microtasks.push_back(Box::new(task));
    }

    pub fn flush_microtasks(&self) {
        loop {
            let next = self.inner.borrow_mut().microtasks.pop_front();
            match next {
                Some(task) => task(self),
                None => break,
            }
        }
    }

    pub fn set_timeout(&self, delay: Duration, task: impl FnOnce(&Dom) + 'static) -> TimerId {
        let mut doc = self.inner.borrow_mut();
        let due = doc.now() + delay;
        doc.timers.schedule(due, Box::new(task))
    }

    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.borrow_mut().timers.cancel(id)
    }

    /// Run one turn of due timers. Returns how many ran.
    pub fn run_due_timers(&self) -> usize {
        let due = {
            let doc = self.inner.borrow();
            doc.timers.due_ids(doc.now())
        };
        let mut ran = 0;
        for id in due {
            let task = self.inner.borrow_mut().timers.take(id);
            if let Some(task) = task {
                task(self);
                self.flush_microtasks();
                ran += 1;
            }
        }
        ran
    }

    /// Run turns until no timer is due, bounded so a task that keeps
    /// rescheduling itself cannot spin forever.
    pub fn run_until_idle(&self) -> usize {
        let mut total = 0;
        for _ in 0..MAX_TIMER_DRAIN_PASSES {
            let ran = self.run_due_timers();
            if ran == 0 {
                break;
            }
            total += ran;
        }
        total
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Time until the earliest pending timer is due.
    pub fn next_timer_delay(&self) -> Option<Duration> {
        let doc = self.inner.borrow();
        let now = doc.now();
        doc.timers.next_due().map(|due| due.saturating_sub(now))
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now()
    }

    /// Move the document clock forward without waiting.
    pub fn advance_clock(&self, by: Duration) {
        self.inner.borrow_mut().clock_skew += by;
    }

    // ----- focus -----

    pub fn active_element(&self) -> Option<NodeId> {
        self.inner.borrow().active
    }

    /// Move focus to `node`, dispatching `blur` on the previously focused
    /// element and `focus` on the new one, each naming the other as related.
    pub fn focus(&self, node: NodeId) {
        if !self.is_connected(node) {
            return;
        }
        let previous = {
            let mut doc = self.inner.borrow_mut();
            if doc.active == Some(node) {
                return;
            }
            doc.active.replace(node)
        };
        if let Some(prev) = previous {
            self.dispatch(prev, &mut Event::new("blur").with_related_target(Some(node)));
        }
        self.dispatch(node, &mut Event::new("focus").with_related_target(previous));
    }

    pub fn blur(&self, node: NodeId) {
        {
            let mut doc = self.inner.borrow_mut();
            if doc.active != Some(node) {
                return;
            }
            doc.active = None;
        }
        self.dispatch(node, &mut Event::new("blur"));
    }

    // ----- geometry -----

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.inner.borrow_mut().viewport = (width, height);
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.inner.borrow().viewport
    }

    pub fn set_layout_box(&self, node: NodeId, layout: LayoutBox) {
        if let Some(el) = self.inner.borrow_mut().element_mut(node) {
            el.layout = layout;
        }
    }

    pub fn layout_box(&self, node: NodeId) -> LayoutBox {
        self.inner
            .borrow()
            .element(node)
            .map(|el| el.layout)
            .unwrap_or_default()
    }

    /// Rendered height: an inline `height` in px wins over the laid-out box.
    pub fn offset_height(&self, node: NodeId) -> f64 {
        self.style(node, "height")
            .and_then(|h| parse_px(&h))
            .unwrap_or_else(|| self.layout_box(node).height)
    }

    pub fn offset_width(&self, node: NodeId) -> f64 {
        self.style(node, "width")
            .and_then(|w| parse_px(&w))
            .unwrap_or_else(|| self.layout_box(node).width)
    }

    pub fn client_height(&self, node: NodeId) -> f64 {
        self.offset_height(node)
    }

    pub fn document_top(&self, node: NodeId) -> f64 {
        self.layout_box(node).y
    }

    pub fn scroll_top(&self, node: NodeId) -> f64 {
        self.inner
            .borrow()
            .element(node)
            .map(|el| el.scroll_top)
            .unwrap_or(0.0)
    }

    pub fn set_scroll_top(&self, node: NodeId, top: f64) {
        if let Some(el) = self.inner.borrow_mut().element_mut(node) {
            el.scroll_top = top.max(0.0);
        }
    }

    // ----- modal bookkeeping -----

    /// Mark one more modal as open; the body gets `no-scroll` while any is.
    pub fn enter_modal(&self) {
        let body = self.body();
        self.inner.borrow_mut().modal_depth += 1;
        self.add_class(body, "no-scroll");
    }

    pub fn leave_modal(&self) {
        let body = self.body();
        let depth = {
            let mut doc = self.inner.borrow_mut();
            doc.modal_depth = doc.modal_depth.saturating_sub(1);
            doc.modal_depth
        };
        if depth == 0 {
            self.remove_class(body, "no-scroll");
        }
    }

    pub fn modal_depth(&self) -> usize {
        self.inner.borrow().modal_depth
    }

    // ----- pointer capture -----

    /// Claim document-wide pointer capture: until released, pointer moves go
    /// to `on_move` and the next pointer release goes to `on_up`.
    pub fn set_pointer_capture(
        &self,
        on_move: impl FnMut(&Dom, &Event) + 'static,
        on_up: impl FnOnce(&Dom, &Event) + 'static,
    ) -> Result<CaptureId, DragError> {
        let mut doc = self.inner.borrow_mut();
        if doc.capture.is_some() {
            return Err(DragError::CaptureActive);
        }
        doc.next_capture += 1;
        let id = CaptureId(doc.next_capture);
        doc.capture = Some(PointerCapture {
            id,
            on_move: Some(Box::new(on_move)),
            on_up: Some(Box::new(on_up)),
        });
        Ok(id)
    }

    /// The single place pointer capture is released. Returns the release
    /// callback so the caller can still deliver the final pointer event.
    pub(crate) fn release_pointer_capture(&self, id: CaptureId) -> Option<UpCallbackHandle> {
        let capture = {
            let mut doc = self.inner.borrow_mut();
            if doc.capture.as_ref().map(|c| c.id) != Some(id) {
                return None;
            }
            doc.capture.take()
        };
        tracing::debug!(?id, "pointer capture released");
        capture.map(|c| UpCallbackHandle(c.on_up))
    }

    pub fn active_capture(&self) -> Option<CaptureId> {
        self.inner.borrow().capture.as_ref().map(|c| c.id)
    }

    fn deliver_captured_move(&self, event: &Event) -> bool {
        let (id, callback) = {
            let mut doc = self.inner.borrow_mut();
            let Some(capture) = doc.capture.as_mut() else {
                return false;
            };
            (capture.id, capture.on_move.take())
        };
        if let Some(mut callback) = callback {
            callback(self, event);
            let mut doc = self.inner.borrow_mut();
            if let Some(capture) = doc.capture.as_mut()
                && capture.id == id
            {
                capture.on_move = Some(callback);
            }
        }
        self.flush_microtasks();
        true
    }
}

/// Release callback handed back by [`Dom::release_pointer_capture`].
pub(crate) struct UpCallbackHandle(Option<UpCallback>);

impl UpCallbackHandle {
    pub(crate) fn fire(self, dom: &Dom, event: &Event) {
        if let Some(callback) = self.0 {
            callback(dom, event);
        }
        dom.flush_microtasks();
    }
}
