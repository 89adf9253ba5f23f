//! Two panes stacked vertically with a draggable divider between them.
//!
//! The panes are supplied as already built nodes through the required
//! `firstChild` and `secondChild` properties. Dragging shows a ghost divider
//! and resizes the panes only once, on release; `onSplitterMoved` is posted
//! through a zero-delay timer afterwards.

use std::cell::RefCell;
use std::rc::Weak;
use std::time::Duration;

use crate::builder::{Child, Element, PropertyBag, el};
use crate::components::{Component, ComponentContext, with_instance};
use crate::constants::DEFAULT_DIVIDER_HEIGHT;
use crate::dom::{Dom, Event, NodeId, Value, concat_classes, parse_px};
use crate::drag::DragSession;
use crate::error::BuildError;

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Transient state of one divider drag.
struct DividerDrag {
    _session: DragSession,
    ghost: NodeId,
}

pub struct Splitter {
    props: PropertyBag,
    me: Weak<RefCell<Splitter>>,
    root: NodeId,
    divider: NodeId,
    first: NodeId,
    second: NodeId,
    drag: Option<DividerDrag>,
}

impl Component for Splitter {
    const NAME: &'static str = "Splitter";

    fn create(props: PropertyBag, _children: Vec<Child>) -> Result<Self, BuildError> {
        let required = |property: &'static str| {
            props.node(property).ok_or(BuildError::MissingProperty {
                component: Self::NAME,
                property,
            })
        };
        let first = required("firstChild")?;
        let second = required("secondChild")?;
        Ok(Self {
            props,
            me: Weak::new(),
            root: NodeId::default(),
            divider: NodeId::default(),
            first,
            second,
            drag: None,
        })
    }

    fn props(&self) -> &PropertyBag {
        &self.props
    }

    fn render(&mut self, ctx: &ComponentContext<Self>) -> Element {
        self.me = ctx.handle();
        let divider_height = self
            .props
            .f64("dividerHeight")
            .unwrap_or(DEFAULT_DIVIDER_HEIGHT);
        el("div")
            .class(&concat_classes([
                "splitter-control",
                self.props.str("className").unwrap_or(""),
            ]))
            .prop("ref", ctx.node_ref(|s, n| s.root = n))
            .child(self.first)
            .child(
                el("div")
                    .class("splitter-divider")
                    .style("height", px(divider_height))
                    .prop("ref", ctx.node_ref(|s, n| s.divider = n))
                    .handler("onMouseDown", ctx.handler(Self::on_divider_mouse_down))
                    .child(el("div").class("splitter-handle")),
            )
            .child(self.second)
    }
}

impl Splitter {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn divider(&self) -> NodeId {
        self.divider
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn available_height(&self, dom: &Dom) -> f64 {
        dom.client_height(self.root) - dom.offset_height(self.divider)
    }

    fn first_height(&self, dom: &Dom) -> f64 {
        dom.style(self.first, "height")
            .and_then(|h| parse_px(&h))
            .unwrap_or_else(|| dom.offset_height(self.first))
    }

    /// Split the available height evenly between the panes.
    pub fn layout(&mut self, dom: &Dom) {
        let first = self.available_height(dom) / 2.0;
        dom.set_style(self.first, "height", px(first));
        self.fill_second(dom);
    }

    /// Re-fit the panes after the container changed size, keeping the first
    /// pane's height where it still fits.
    pub fn relayout(&mut self, dom: &Dom) {
        let available = self.available_height(dom).max(0.0);
        let first = self.first_height(dom).clamp(0.0, available);
        dom.set_style(self.first, "height", px(first));
        self.fill_second(dom);
    }

    fn fill_second(&self, dom: &Dom) {
        let second = self.available_height(dom) - dom.offset_height(self.first);
        dom.set_style(self.second, "height", px(second));
    }

    fn on_divider_mouse_down(&mut self, dom: &Dom, ev: &mut Event) {
        ev.prevent_default();
        if self.drag.is_some() {
            return;
        }
        let start = self.first_height(dom);
        let available = self.available_height(dom);
        let clamp = move |dy: f64| dy.max(-start).min(available - start);

        let Ok(ghost) = el("div")
            .class("splitter-divider splitter-divider-ghost")
            .style("left", "0px")
            .style("top", px(dom.document_top(self.divider)))
            .build(dom)
        else {
            return;
        };
        dom.append_child(dom.body(), ghost);

        let me = self.me.clone();
        let session = DragSession::begin(
            dom,
            ev,
            move |dom, motion| dom.set_style(ghost, "margin-top", px(clamp(motion.dy))),
            move |dom, motion| {
                with_instance(&me, |s| s.finish_drag(dom, start + clamp(motion.dy)));
            },
        );
        match session {
            Ok(session) => {
                self.drag = Some(DividerDrag {
                    _session: session,
                    ghost,
                });
            }
            Err(_) => dom.discard(ghost),
        }
    }

    fn finish_drag(&mut self, dom: &Dom, first_height: f64) {
        dom.set_style(self.first, "height", px(first_height));
        self.fill_second(dom);
        if let Some(drag) = self.drag.take() {
            dom.discard(drag.ghost);
        }
        tracing::debug!(first_height, "splitter moved");
        if let Some(callback) = self.props.handler("onSplitterMoved") {
            dom.set_timeout(Duration::ZERO, move |dom| {
                callback(dom, &mut Event::custom("splittermoved", Value::Null));
            });
        }
    }
}
