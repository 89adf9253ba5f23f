//! Declarative element construction.
//!
//! An [`Element`] describes one node to build: a primitive tag, a stateful
//! [`Component`] or a stateless functional renderer, together with its
//! properties and children. [`build`] turns a description into a live
//! subtree of a [`Dom`] in a single pass. Nothing is retained afterwards;
//! there is no diffing and every call builds fresh nodes.
//!
//! Handles to built nodes and component instances are published through
//! the `ref` property, a mount callback set with [`Element::on_mounted`].

mod props;

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::components::Component;
use crate::component_context::ComponentContext;
use crate::dom::{Dom, Event, Handler, Namespace, NodeId, Value, handler};
use crate::error::BuildError;

pub use props::{PropValue, PropertyBag, RefCallback};
use props::{attribute_name, event_slot, is_svg_tag};

/// Stateless renderer: receives the copied properties and the children and
/// returns the node it built.
pub type FunctionalRenderer = Rc<dyn Fn(&Dom, PropertyBag, Vec<Child>) -> Result<NodeId, BuildError>>;

/// Instantiates a component, renders it, and returns the instance together
/// with the description of its subtree.
pub type ComponentFactory =
    fn(&Dom, PropertyBag, Vec<Child>) -> Result<(Rc<dyn Any>, Element), BuildError>;

#[derive(Clone)]
pub enum ElementKind {
    Primitive(String),
    Component {
        name: &'static str,
        factory: ComponentFactory,
    },
    Functional(FunctionalRenderer),
}

impl std::fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Primitive(tag) => write!(f, "Primitive({tag})"),
            ElementKind::Component { name, .. } => write!(f, "Component({name})"),
            ElementKind::Functional(_) => write!(f, "Functional"),
        }
    }
}

/// A child slot of an element description.
#[derive(Debug, Clone)]
pub enum Child {
    Element(Element),
    Text(String),
    Number(f64),
    /// Conditionally absent child; nothing is built.
    Omit,
    /// Nested children, flattened into the parent.
    List(Vec<Child>),
    /// An already built node, appended as is.
    Node(NodeId),
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Element(element)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<i64> for Child {
    fn from(n: i64) -> Self {
        Child::Number(n as f64)
    }
}

impl From<i32> for Child {
    fn from(n: i32) -> Self {
        Child::Number(n.into())
    }
}

impl From<f64> for Child {
    fn from(n: f64) -> Self {
        Child::Number(n)
    }
}

/// `false` omits the child; `true` renders as text like any other value.
impl From<bool> for Child {
    fn from(present: bool) -> Self {
        if present {
            Child::Text("true".to_string())
        } else {
            Child::Omit
        }
    }
}

impl From<NodeId> for Child {
    fn from(node: NodeId) -> Self {
        Child::Node(node)
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(children: Vec<T>) -> Self {
        Child::List(children.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(child: Option<T>) -> Self {
        child.map_or(Child::Omit, Into::into)
    }
}

/// What a mount callback receives.
#[derive(Clone)]
pub enum Mounted {
    Element(NodeId),
    Component(ComponentHandle),
}

impl Mounted {
    pub fn node(&self) -> NodeId {
        match self {
            Mounted::Element(node) => *node,
            Mounted::Component(handle) => handle.root(),
        }
    }

    pub fn component<C: Component>(&self) -> Option<Rc<RefCell<C>>> {
        match self {
            Mounted::Component(handle) => handle.downcast(),
            Mounted::Element(_) => None,
        }
    }
}

/// Type-erased handle to a mounted component instance.
#[derive(Clone)]
pub struct ComponentHandle {
    name: &'static str,
    root: NodeId,
    instance: Rc<dyn Any>,
}

impl ComponentHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The element the component rendered.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn downcast<C: Component>(&self) -> Option<Rc<RefCell<C>>> {
        self.instance.clone().downcast::<RefCell<C>>().ok()
    }
}

/// Immutable description of one node to build.
#[derive(Debug, Clone)]
pub struct Element {
    kind: ElementKind,
    props: PropertyBag,
    children: Vec<Child>,
}

/// Describe a primitive element.
pub fn el(tag: &str) -> Element {
    Element::new(ElementKind::Primitive(tag.to_string()))
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            props: PropertyBag::new(),
            children: Vec::new(),
        }
    }

    pub fn component<C: Component>() -> Self {
        Self::new(ElementKind::Component {
            name: C::NAME,
            factory: instantiate::<C>,
        })
    }

    pub fn functional(
        renderer: impl Fn(&Dom, PropertyBag, Vec<Child>) -> Result<NodeId, BuildError> + 'static,
    ) -> Self {
        Self::new(ElementKind::Functional(Rc::new(renderer)))
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn props(&self) -> &PropertyBag {
        &self.props
    }

    pub fn prop(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        self.props.set(name, value);
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.prop("className", class)
    }

    pub fn id(self, id: &str) -> Self {
        self.prop("id", id)
    }

    /// Add one inline style field.
    pub fn style(mut self, name: &str, value: impl Into<String>) -> Self {
        match self.props.get_mut("style") {
            Some(PropValue::Style(map)) => {
                map.insert(name.to_string(), value.into());
            }
            _ => {
                let mut map = BTreeMap::new();
                map.insert(name.to_string(), value.into());
                self.props.set("style", map);
            }
        }
        self
    }

    /// Bind `f` under the event property `name` (`onClick`, or a custom
    /// event name).
    pub fn on(self, name: &str, f: impl Fn(&Dom, &mut Event) + 'static) -> Self {
        self.handler(name, handler(f))
    }

    pub fn handler(self, name: &str, handler: Handler) -> Self {
        self.prop(name, PropValue::Handler(handler))
    }

    /// Set the `ref` mount callback.
    pub fn on_mounted(self, f: impl Fn(&Dom, Mounted) + 'static) -> Self {
        self.prop("ref", PropValue::Ref(Rc::new(f)))
    }

    /// Store the mounted component instance into `slot`.
    pub fn mount_into<C: Component>(self, slot: &Rc<RefCell<Option<Rc<RefCell<C>>>>>) -> Self {
        let slot = slot.clone();
        self.on_mounted(move |_, mounted| {
            *slot.borrow_mut() = mounted.component::<C>();
        })
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<T: Into<Child>>(mut self, children: impl IntoIterator<Item = T>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Child::Text(text.into()))
    }

    pub fn build(self, dom: &Dom) -> Result<NodeId, BuildError> {
        build(dom, self)
    }
}

fn instantiate<C: Component>(
    dom: &Dom,
    props: PropertyBag,
    children: Vec<Child>,
) -> Result<(Rc<dyn Any>, Element), BuildError> {
    let instance = Rc::new(RefCell::new(C::create(props, children)?));
    let ctx = ComponentContext::new(dom.clone(), instance.clone());
    let rendered = instance.borrow_mut().render(&ctx);
    tracing::trace!(component = C::NAME, "component rendered");
    Ok((instance, rendered))
}

/// Build `element` into a live subtree and return its root node.
///
/// The returned node is detached; the caller appends it where it belongs.
pub fn build(dom: &Dom, element: Element) -> Result<NodeId, BuildError> {
    build_element(dom, element).inspect_err(|e| tracing::error!(error = %e, "element build failed"))
}

fn take_ref(props: &mut PropertyBag) -> Result<Option<RefCallback>, BuildError> {
    match props.remove("ref") {
        None | Some(PropValue::Null) => Ok(None),
        Some(PropValue::Ref(cb)) => Ok(Some(cb)),
        Some(other) => Err(BuildError::InvalidRef {
            found: other.type_name(),
        }),
    }
}

fn build_element(dom: &Dom, element: Element) -> Result<NodeId, BuildError> {
    let Element {
        kind,
        mut props,
        children,
    } = element;
    let mount = take_ref(&mut props)?;
    match kind {
        ElementKind::Primitive(tag) => {
            let namespace = if is_svg_tag(&tag) {
                Namespace::Svg
            } else {
                Namespace::Html
            };
            let node = dom.create_element_ns(&tag, namespace);
            apply_props(dom, node, &props);
            if let Err(e) = append_children(dom, node, children) {
                dom.discard(node);
                return Err(e);
            }
            if let Some(mount) = mount {
                mount(dom, Mounted::Element(node));
            }
            Ok(node)
        }
        ElementKind::Component { name, factory } => {
            let (instance, rendered) = factory(dom, props, children)?;
            let root = build_element(dom, rendered)?;
            if let Some(mount) = mount {
                mount(
                    dom,
                    Mounted::Component(ComponentHandle {
                        name,
                        root,
                        instance,
                    }),
                );
            }
            Ok(root)
        }
        ElementKind::Functional(renderer) => renderer(dom, props, children),
    }
}

fn apply_props(dom: &Dom, node: NodeId, props: &PropertyBag) {
    for (name, value) in props.iter() {
        match value {
            PropValue::Null => {}
            PropValue::Handler(h) => match event_slot(name) {
                Some(slot) => dom.set_handler(node, slot, h.clone()),
                None => dom.add_listener(node, name, h.clone()),
            },
            PropValue::Ref(_) => {
                tracing::warn!(property = name, "mount callback outside 'ref' ignored");
            }
            PropValue::Style(style) if name == "style" => {
                for (field, v) in style {
                    dom.set_style(node, field, v.clone());
                }
            }
            other => {
                let attr = attribute_name(name);
                if !other.is_primitive()
                    && dom.has_field(node, attr)
                    && let Some(data) = other.to_value()
                {
                    dom.set_field(node, attr, data);
                } else {
                    dom.set_attribute(node, attr, other.to_string());
                }
            }
        }
    }
}

fn append_children(dom: &Dom, parent: NodeId, children: Vec<Child>) -> Result<(), BuildError> {
    for child in children {
        match child {
            Child::Omit => {}
            Child::Element(element) => {
                let node = build_element(dom, element)?;
                dom.append_child(parent, node);
            }
            Child::Text(text) => {
                let node = dom.create_text(text);
                dom.append_child(parent, node);
            }
            Child::Number(n) => {
                let node = dom.create_text(Value::Float(n).to_string());
                dom.append_child(parent, node);
            }
            Child::List(nested) => append_children(dom, parent, nested)?,
            Child::Node(node) => {
                dom.append_child(parent, node);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn attributes_stringify_values() {
        let dom = Dom::new();
        let node = el("div")
            .prop("title", "hello")
            .prop("tabindex", 3)
            .prop("data-ratio", 0.5)
            .prop("aria-busy", true)
            .build(&dom)
            .unwrap();
        assert_eq!(dom.attribute(node, "title").as_deref(), Some("hello"));
        assert_eq!(dom.attribute(node, "tabindex").as_deref(), Some("3"));
        assert_eq!(dom.attribute(node, "data-ratio").as_deref(), Some("0.5"));
        assert_eq!(dom.attribute(node, "aria-busy").as_deref(), Some("true"));
    }

    #[test]
    fn null_props_are_skipped() {
        let dom = Dom::new();
        let node = el("div")
            .prop("title", PropValue::Null)
            .prop("onClick", PropValue::Null)
            .prop("custom", Option::<&str>::None)
            .build(&dom)
            .unwrap();
        assert!(!dom.has_attribute(node, "title"));
        assert!(!dom.has_attribute(node, "custom"));
        assert!(!dom.has_handler(node, "onclick"));
    }

    #[test]
    fn renamed_attributes_and_style_fields() {
        let dom = Dom::new();
        let node = el("label")
            .class("a b")
            .prop("htmlFor", "x")
            .style("height", "4px")
            .style("color", "red")
            .build(&dom)
            .unwrap();
        assert_eq!(dom.attribute(node, "class").as_deref(), Some("a b"));
        assert_eq!(dom.attribute(node, "for").as_deref(), Some("x"));
        assert_eq!(dom.style(node, "height").as_deref(), Some("4px"));
        assert_eq!(dom.style(node, "color").as_deref(), Some("red"));
        assert!(!dom.has_attribute(node, "style"));
    }

    #[test]
    fn rich_data_goes_to_live_fields() {
        let dom = Dom::new();
        let node = el("div")
            .prop("dataset", Value::from(vec!["x", "y"]))
            .prop("extra", Value::from(vec!["z"]))
            .build(&dom)
            .unwrap();
        assert_eq!(dom.field(node, "dataset"), Some(Value::from(vec!["x", "y"])));
        assert_eq!(dom.attribute(node, "extra").as_deref(), Some("z"));
    }

    #[test]
    fn event_props_replace_and_custom_props_listen() {
        let dom = Dom::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let node = el("button")
            .on("onClick", |_, _| panic!("replaced handler ran"))
            .on("onClick", move |_, _| h.set(h.get() + 1))
            .on("itemselected", |_, _| {})
            .build(&dom)
            .unwrap();
        dom.dispatch(node, &mut Event::new("click"));
        assert_eq!(hits.get(), 1);
        assert_eq!(dom.listener_count(node, "itemselected"), 1);
    }

    #[test]
    fn wheel_and_context_menu_props_bind_handler_slots() {
        let dom = Dom::new();
        let hits = Rc::new(Cell::new(0));
        let (w, c) = (hits.clone(), hits.clone());
        let node = el("div")
            .on("onWheel", move |_, _| w.set(w.get() + 1))
            .on("onContextMenu", move |_, _| c.set(c.get() + 10))
            .build(&dom)
            .unwrap();
        assert!(dom.has_handler(node, "onwheel"));
        assert!(dom.has_handler(node, "oncontextmenu"));
        assert_eq!(dom.listener_count(node, "onWheel"), 0);
        dom.dispatch(node, &mut Event::new("wheel"));
        dom.dispatch(node, &mut Event::new("contextmenu"));
        assert_eq!(hits.get(), 11);
    }

    #[test]
    fn children_flatten_and_omit() {
        let dom = Dom::new();
        let existing = dom.create_element("hr");
        let node = el("div")
            .child("a")
            .child(false)
            .child(vec![Child::from(1), Child::from(el("span").text("b"))])
            .child(Option::<Element>::None)
            .child(existing)
            .build(&dom)
            .unwrap();
        assert_eq!(dom.children(node).len(), 4);
        assert_eq!(dom.text_content(node), "a1b");
        assert_eq!(dom.parent(existing), Some(node));
    }

    #[test]
    fn svg_tags_use_svg_namespace() {
        let dom = Dom::new();
        let node = el("svg").child(el("path")).build(&dom).unwrap();
        assert_eq!(dom.namespace(node), Some(Namespace::Svg));
        let path = dom.children(node)[0];
        assert_eq!(dom.namespace(path), Some(Namespace::Svg));
        let div = el("div").build(&dom).unwrap();
        assert_eq!(dom.namespace(div), Some(Namespace::Html));
    }

    #[test]
    fn invalid_ref_aborts_branch() {
        let dom = Dom::new();
        let err = el("div").prop("ref", "oops").build(&dom).unwrap_err();
        assert!(matches!(err, BuildError::InvalidRef { found: "string" }));
    }

    #[test]
    fn ref_receives_built_element_after_children() {
        let dom = Dom::new();
        let seen = Rc::new(Cell::new(0usize));
        let s = seen.clone();
        let node = el("ul")
            .child(el("li"))
            .child(el("li"))
            .on_mounted(move |dom, m| s.set(dom.children(m.node()).len()))
            .build(&dom)
            .unwrap();
        assert_eq!(seen.get(), 2);
        assert_eq!(dom.tag(node).as_deref(), Some("ul"));
    }

    #[test]
    fn functional_renderer_gets_props_and_no_ref() {
        let dom = Dom::new();
        let mounted = Rc::new(Cell::new(false));
        let m = mounted.clone();
        let node = Element::functional(|dom, props, children| {
            el("p")
                .prop("title", props.str("label").unwrap_or_default().to_string())
                .children(children)
                .build(dom)
        })
        .prop("label", "hi")
        .on_mounted(move |_, _| m.set(true))
        .child("body")
        .build(&dom)
        .unwrap();
        assert_eq!(dom.attribute(node, "title").as_deref(), Some("hi"));
        assert_eq!(dom.text_content(node), "body");
        assert!(!mounted.get());
    }
}
