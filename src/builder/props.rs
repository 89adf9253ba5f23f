use std::collections::BTreeMap;
use std::fmt;

use crate::dom::{Dom, Event, Handler, NodeId, Value};

use super::Mounted;

/// Mount callback carried by the `ref` property.
pub type RefCallback = std::rc::Rc<dyn Fn(&Dom, Mounted)>;

/// One value in a [`PropertyBag`].
#[derive(Clone, Default)]
pub enum PropValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Style(BTreeMap<String, String>),
    Handler(Handler),
    Ref(RefCallback),
    Data(Value),
    Node(NodeId),
}

impl PropValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    /// Whether the value is plain data that stringifies meaningfully.
    pub fn is_primitive(&self) -> bool {
        match self {
            PropValue::Null
            | PropValue::Bool(_)
            | PropValue::Int(_)
            | PropValue::Float(_)
            | PropValue::Str(_) => true,
            PropValue::Data(v) => v.is_primitive(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PropValue::Null => "null",
            PropValue::Bool(_) => "bool",
            PropValue::Int(_) => "int",
            PropValue::Float(_) => "float",
            PropValue::Str(_) => "string",
            PropValue::Style(_) => "style map",
            PropValue::Handler(_) => "event handler",
            PropValue::Ref(_) => "mount callback",
            PropValue::Data(_) => "data",
            PropValue::Node(_) => "node",
        }
    }

    /// Plain data view of the value. Handlers, callbacks and nodes have none.
    pub fn to_value(&self) -> Option<Value> {
        Some(match self {
            PropValue::Null => Value::Null,
            PropValue::Bool(b) => Value::Bool(*b),
            PropValue::Int(i) => Value::Int(*i),
            PropValue::Float(f) => Value::Float(*f),
            PropValue::Str(s) => Value::Str(s.clone()),
            PropValue::Style(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::Str(v.clone())))
                    .collect(),
            ),
            PropValue::Data(v) => v.clone(),
            PropValue::Handler(_) | PropValue::Ref(_) | PropValue::Node(_) => return None,
        })
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Handler(_) | PropValue::Ref(_) => write!(f, "function"),
            PropValue::Node(_) => write!(f, "[object Node]"),
            other => match other.to_value() {
                Some(v) => write!(f, "{v}"),
                None => Ok(()),
            },
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Handler(_) | PropValue::Ref(_) => write!(f, "<{}>", self.type_name()),
            PropValue::Node(n) => write!(f, "Node({n:?})"),
            PropValue::Style(map) => write!(f, "Style({map:?})"),
            other => write!(f, "{:?}", other.to_value()),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value.into())
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<Value> for PropValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PropValue::Null,
            Value::Bool(b) => PropValue::Bool(b),
            Value::Int(i) => PropValue::Int(i),
            Value::Float(f) => PropValue::Float(f),
            Value::Str(s) => PropValue::Str(s),
            rich => PropValue::Data(rich),
        }
    }
}

impl From<Vec<&str>> for PropValue {
    fn from(items: Vec<&str>) -> Self {
        PropValue::Data(items.into())
    }
}

impl From<Vec<String>> for PropValue {
    fn from(items: Vec<String>) -> Self {
        PropValue::Data(items.into())
    }
}

impl From<NodeId> for PropValue {
    fn from(node: NodeId) -> Self {
        PropValue::Node(node)
    }
}

impl From<Handler> for PropValue {
    fn from(handler: Handler) -> Self {
        PropValue::Handler(handler)
    }
}

impl From<BTreeMap<String, String>> for PropValue {
    fn from(style: BTreeMap<String, String>) -> Self {
        PropValue::Style(style)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropValue::Null, Into::into)
    }
}

/// Property names mapped to values. Keys are unique; setting an existing key
/// replaces its value in place.
#[derive(Clone, Default, Debug)]
pub struct PropertyBag {
    entries: Vec<(String, PropValue)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<PropValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PropValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropValue::Str(s) => Some(s),
            PropValue::Data(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Bool reading with JS-like truthiness for strings and numbers.
    pub fn flag(&self, name: &str) -> bool {
        match self.get(name) {
            Some(PropValue::Bool(b)) => *b,
            Some(PropValue::Int(i)) => *i != 0,
            Some(PropValue::Float(f)) => *f != 0.0,
            Some(PropValue::Str(s)) => !s.is_empty(),
            Some(PropValue::Null) | None => false,
            Some(PropValue::Data(v)) => !v.is_null(),
            Some(_) => true,
        }
    }

    pub fn f64(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            PropValue::Int(i) => Some(*i as f64),
            PropValue::Float(f) => Some(*f),
            PropValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn handler(&self, name: &str) -> Option<Handler> {
        match self.get(name)? {
            PropValue::Handler(h) => Some(h.clone()),
            _ => None,
        }
    }

    pub fn node(&self, name: &str) -> Option<NodeId> {
        match self.get(name)? {
            PropValue::Node(n) => Some(*n),
            _ => None,
        }
    }

    /// The property as plain data; missing or non-data values read as null.
    pub fn value(&self, name: &str) -> Value {
        self.get(name)
            .and_then(PropValue::to_value)
            .unwrap_or_default()
    }

    /// Invoke the handler stored under `name`, if any, with a custom event
    /// carrying `detail`.
    pub fn notify(&self, dom: &Dom, name: &str, kind: &str, detail: Value) {
        if let Some(h) = self.handler(name) {
            h(dom, &mut Event::custom(kind, detail));
        }
    }
}

/// React-style event property names and the direct handler slot they bind.
const EVENT_PROPS: &[(&str, &str)] = &[
    // clipboard
    ("onCopy", "oncopy"),
    ("onCut", "oncut"),
    ("onPaste", "onpaste"),
    // keyboard
    ("onKeyDown", "onkeydown"),
    ("onKeyPress", "onkeypress"),
    ("onKeyUp", "onkeyup"),
    // focus
    ("onFocus", "onfocus"),
    ("onBlur", "onblur"),
    // form
    ("onChange", "onchange"),
    ("onInput", "oninput"),
    ("onSubmit", "onsubmit"),
    // mouse
    ("onClick", "onclick"),
    ("onContextMenu", "oncontextmenu"),
    ("onDoubleClick", "ondblclick"),
    ("onDrag", "ondrag"),
    ("onDragEnd", "ondragend"),
    ("onDragEnter", "ondragenter"),
    ("onDragExit", "ondragexit"),
    ("onDragLeave", "ondragleave"),
    ("onDragOver", "ondragover"),
    ("onDragStart", "ondragstart"),
    ("onDrop", "ondrop"),
    ("onMouseDown", "onmousedown"),
    ("onMouseEnter", "onmouseenter"),
    ("onMouseLeave", "onmouseleave"),
    ("onMouseMove", "onmousemove"),
    ("onMouseOut", "onmouseout"),
    ("onMouseOver", "onmouseover"),
    ("onMouseUp", "onmouseup"),
    // selection
    ("onSelect", "onselect"),
    // touch
    ("onTouchCancel", "ontouchcancel"),
    ("onTouchEnd", "ontouchend"),
    ("onTouchMove", "ontouchmove"),
    ("onTouchStart", "ontouchstart"),
    ("onScroll", "onscroll"),
    ("onWheel", "onwheel"),
    // media
    ("onAbort", "onabort"),
    ("onCanPlay", "oncanplay"),
    ("onCanPlayThrough", "oncanplaythrough"),
    ("onDurationChange", "ondurationchange"),
    ("onEmptied", "onemptied"),
    ("onEncrypted", "onencrypted"),
    ("onEnded", "onended"),
    ("onLoadedData", "onloadeddata"),
    ("onLoadedMetadata", "onloadedmetadata"),
    ("onLoadStart", "onloadstart"),
    ("onPause", "onpause"),
    ("onPlay", "onplay"),
    ("onPlaying", "onplaying"),
    ("onProgress", "onprogress"),
    ("onRateChange", "onratechange"),
    ("onSeeked", "onseeked"),
    ("onSeeking", "onseeking"),
    ("onStalled", "onstalled"),
    ("onSuspend", "onsuspend"),
    ("onTimeUpdate", "ontimeupdate"),
    ("onVolumeChange", "onvolumechange"),
    ("onWaiting", "onwaiting"),
    // images
    ("onLoad", "onload"),
    ("onError", "onerror"),
];

/// Property names that differ from the attribute they set.
const ATTRIBUTE_RENAMES: &[(&str, &str)] = &[
    ("htmlFor", "for"),
    ("className", "class"),
    ("defaultValue", "value"),
    ("defaultChecked", "checked"),
];

/// Tags created in the SVG namespace.
const SVG_TAGS: &[&str] = &[
    "circle",
    "clipPath",
    "defs",
    "ellipse",
    "g",
    "image",
    "line",
    "linearGradient",
    "mask",
    "path",
    "pattern",
    "polygon",
    "polyline",
    "radialGradient",
    "rect",
    "stop",
    "svg",
    "text",
    "tspan",
];

pub(crate) fn event_slot(prop: &str) -> Option<&'static str> {
    EVENT_PROPS
        .iter()
        .find(|(name, _)| *name == prop)
        .map(|(_, slot)| *slot)
}

pub(crate) fn attribute_name(prop: &str) -> &str {
    ATTRIBUTE_RENAMES
        .iter()
        .find(|(name, _)| *name == prop)
        .map_or(prop, |(_, attr)| *attr)
}

pub(crate) fn is_svg_tag(tag: &str) -> bool {
    SVG_TAGS.contains(&tag)
}
