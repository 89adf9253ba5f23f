use std::cell::RefCell;
use std::rc::Rc;

use crate::builder::{Child, Element, PropertyBag};
use crate::error::BuildError;

pub mod combo_box;
pub mod filter_control;
pub mod splitter;

pub use combo_box::ComboBox;
pub use filter_control::FilterControl;
pub use splitter::Splitter;

pub use crate::component_context::{ComponentContext, defer, with_instance};

/// A stateful widget instantiated by the builder.
///
/// The builder copies the caller's property bag, calls [`Component::create`]
/// with it, then [`Component::render`] once. The instance is handed to the
/// caller through the element's `ref` callback; the rendered element takes
/// its place in the parent.
pub trait Component: Sized + 'static {
    const NAME: &'static str;

    fn create(props: PropertyBag, children: Vec<Child>) -> Result<Self, BuildError>;

    fn props(&self) -> &PropertyBag;

    fn render(&mut self, ctx: &ComponentContext<Self>) -> Element;
}

/// Shared slot filled by [`Element::mount_into`].
pub type Slot<C> = Rc<RefCell<Option<Rc<RefCell<C>>>>>;

pub fn slot<C>() -> Slot<C> {
    Rc::new(RefCell::new(None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::el;
    use crate::dom::{Dom, Event, NodeId};

    struct Counter {
        props: PropertyBag,
        clicks: usize,
        button: Option<NodeId>,
    }

    impl Component for Counter {
        const NAME: &'static str = "Counter";

        fn create(props: PropertyBag, _children: Vec<Child>) -> Result<Self, BuildError> {
            Ok(Self {
                props,
                clicks: 0,
                button: None,
            })
        }

        fn props(&self) -> &PropertyBag {
            &self.props
        }

        fn render(&mut self, ctx: &ComponentContext<Self>) -> Element {
            el("button")
                .prop("ref", ctx.node_ref(|this, node| this.button = Some(node)))
                .handler("onClick", ctx.handler(|this, _, _| this.clicks += 1))
                .text(self.props.str("label").unwrap_or("count").to_string())
        }
    }

    #[test]
    fn ref_receives_instance_and_rendered_node_is_returned() {
        let dom = Dom::new();
        let counter = slot::<Counter>();
        let node = Element::component::<Counter>()
            .prop("label", "go")
            .mount_into(&counter)
            .build(&dom)
            .unwrap();
        let counter = counter.borrow().clone().unwrap();
        assert_eq!(dom.tag(node).as_deref(), Some("button"));
        assert_eq!(counter.borrow().button, Some(node));
        assert_eq!(dom.text_content(node), "go");
        assert!(!counter.borrow().props().contains("ref"));
        dom.dispatch(node, &mut Event::new("click"));
        dom.dispatch(node, &mut Event::new("click"));
        assert_eq!(counter.borrow().clicks, 2);
    }

    #[test]
    fn instance_props_are_a_copy() {
        let dom = Dom::new();
        let counter = slot::<Counter>();
        let element = Element::component::<Counter>()
            .prop("label", "first")
            .mount_into(&counter);
        let changed = element.clone().prop("label", "second");
        element.build(&dom).unwrap();
        let counter = counter.borrow().clone().unwrap();
        assert_eq!(counter.borrow().props().str("label"), Some("first"));
        assert_eq!(changed.props().str("label"), Some("second"));
    }
}
