//! Shared component rendering context
//!
//! `ComponentContext` is handed to [`Component::render`]. It turns closures
//! over the component instance into the event handlers, mount callbacks and
//! deferred tasks that the rendered subtree carries, so components never
//! juggle `Rc<RefCell<..>>` plumbing themselves.
//!
//! Handlers keep the instance alive: a component lives as long as the nodes
//! it rendered. Deferred tasks only hold a weak handle and become no-ops once
//! the instance is gone.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::builder::{Mounted, PropValue, RefCallback};
use crate::components::Component;
use crate::dom::{Dom, Event, Handler, NodeId, TimerId};

pub struct ComponentContext<C> {
    dom: Dom,
    instance: Rc<RefCell<C>>,
}

impl<C: Component> ComponentContext<C> {
    pub(crate) fn new(dom: Dom, instance: Rc<RefCell<C>>) -> Self {
        Self { dom, instance }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Weak handle to the instance being rendered, for widgets that schedule
    /// work on themselves later.
    pub fn handle(&self) -> Weak<RefCell<C>> {
        Rc::downgrade(&self.instance)
    }

    /// Wrap `f` as an event handler running against the instance.
    ///
    /// A handler that fires while the instance is already borrowed (an event
    /// raised synchronously from inside another of its handlers) is dropped
    /// with a warning instead of panicking.
    pub fn handler(&self, f: impl Fn(&mut C, &Dom, &mut Event) + 'static) -> Handler {
        let instance = self.instance.clone();
        Rc::new(move |dom: &Dom, event: &mut Event| match instance.try_borrow_mut() {
            Ok(mut this) => f(&mut this, dom, event),
            Err(_) => tracing::warn!(
                component = C::NAME,
                event = event.kind(),
                "re-entrant event ignored"
            ),
        })
    }

    /// Mount callback recording a rendered element on the instance.
    pub fn node_ref(&self, f: impl Fn(&mut C, NodeId) + 'static) -> PropValue {
        let instance = self.handle();
        let callback: RefCallback = Rc::new(move |_: &Dom, mounted: Mounted| {
            with_instance(&instance, |this| f(this, mounted.node()));
        });
        PropValue::Ref(callback)
    }
}

/// Run `f` on the instance behind `handle` if it is still alive and not
/// borrowed.
pub fn with_instance<C, R>(handle: &Weak<RefCell<C>>, f: impl FnOnce(&mut C) -> R) -> Option<R> {
    let instance = handle.upgrade()?;
    let mut this = instance.try_borrow_mut().ok()?;
    Some(f(&mut this))
}

/// Schedule `f` on the instance after `delay`.
pub fn defer<C: 'static>(
    dom: &Dom,
    handle: &Weak<RefCell<C>>,
    delay: Duration,
    f: impl FnOnce(&mut C, &Dom) + 'static,
) -> TimerId {
    let handle = handle.clone();
    dom.set_timeout(delay, move |dom| {
        with_instance(&handle, |this| f(this, dom));
    })
}
