use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton};

use super::{Dom, NodeId, Value};

/// Event handler stored on an element, either as the single direct handler
/// for an event name or as one of many generic listeners.
pub type Handler = Rc<dyn Fn(&Dom, &mut Event)>;

/// Wrap a closure as a [`Handler`].
pub fn handler(f: impl Fn(&Dom, &mut Event) + 'static) -> Handler {
    Rc::new(f)
}

/// Events that are delivered to their target only.
const NON_BUBBLING: &[&str] = &[
    "focus",
    "blur",
    "mouseenter",
    "mouseleave",
    "load",
    "scroll",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInfo {
    pub client_x: f64,
    pub client_y: f64,
    pub button: MouseButton,
}

#[derive(Debug, Clone)]
pub struct Event {
    kind: String,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    related_target: Option<NodeId>,
    key: Option<KeyEvent>,
    pointer: Option<PointerInfo>,
    detail: Value,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: None,
            current_target: None,
            related_target: None,
            key: None,
            pointer: None,
            detail: Value::Null,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn key(kind: impl Into<String>, key: KeyEvent) -> Self {
        let mut event = Self::new(kind);
        event.key = Some(key);
        event
    }

    pub fn pointer(kind: impl Into<String>, client_x: f64, client_y: f64) -> Self {
        let mut event = Self::new(kind);
        event.pointer = Some(PointerInfo {
            client_x,
            client_y,
            button: MouseButton::Left,
        });
        event
    }

    /// A synthetic notification carrying `detail`, e.g. `itemselected`.
    pub fn custom(kind: impl Into<String>, detail: Value) -> Self {
        let mut event = Self::new(kind);
        event.detail = detail;
        event
    }

    pub fn with_related_target(mut self, related: Option<NodeId>) -> Self {
        self.related_target = related;
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn bubbles(&self) -> bool {
        !NON_BUBBLING.contains(&self.kind.as_str())
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn related_target(&self) -> Option<NodeId> {
        self.related_target
    }

    pub fn key_event(&self) -> Option<&KeyEvent> {
        self.key.as_ref()
    }

    pub fn key_code(&self) -> Option<KeyCode> {
        self.key.map(|k| k.code)
    }

    /// Shift+Tab arrives either as `BackTab` or as `Tab` with the shift bit.
    pub fn is_back_tab(&self) -> bool {
        self.key.is_some_and(|k| is_back_tab(&k))
    }

    pub fn pointer_info(&self) -> Option<PointerInfo> {
        self.pointer
    }

    pub fn client_y(&self) -> f64 {
        self.pointer.map_or(0.0, |p| p.client_y)
    }

    pub fn client_x(&self) -> f64 {
        self.pointer.map_or(0.0, |p| p.client_x)
    }

    pub fn detail(&self) -> &Value {
        &self.detail
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub(crate) fn set_target(&mut self, target: NodeId) {
        self.target = Some(target);
    }

    pub(crate) fn set_current_target(&mut self, node: NodeId) {
        self.current_target = Some(node);
    }
}

pub fn is_back_tab(key: &KeyEvent) -> bool {
    key.code == KeyCode::BackTab
        || (key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT))
}
