use std::cell::Cell;
use std::rc::Rc;

use eureka_ui::builder::{Mounted, PropValue};
use eureka_ui::dom::Event;
use eureka_ui::{Dom, el};

#[test]
fn props_become_stringified_attributes() {
    let dom = Dom::new();
    let node = el("div")
        .prop("title", "results")
        .prop("tabindex", 0)
        .prop("data-weight", 1.5)
        .prop("hidden", false)
        .prop("aria-label", PropValue::Null)
        .build(&dom)
        .unwrap();
    assert_eq!(dom.attribute(node, "title").as_deref(), Some("results"));
    assert_eq!(dom.attribute(node, "tabindex").as_deref(), Some("0"));
    assert_eq!(dom.attribute(node, "data-weight").as_deref(), Some("1.5"));
    assert_eq!(dom.attribute(node, "hidden").as_deref(), Some("false"));
    assert!(!dom.has_attribute(node, "aria-label"));
}

#[test]
fn nested_children_keep_document_order() {
    let dom = Dom::new();
    let list = el("ul")
        .child(el("li").text("first"))
        .children(vec![el("li").text("second"), el("li").text("third")])
        .child(Option::<&str>::None)
        .child("tail")
        .build(&dom)
        .unwrap();
    let children = dom.children(list);
    assert_eq!(children.len(), 4);
    assert_eq!(dom.text_content(list), "firstsecondthirdtail");
    assert_eq!(dom.tag(children[1]).as_deref(), Some("li"));
}

#[test]
fn handlers_fire_and_ref_sees_built_element() {
    let dom = Dom::new();
    let clicks = Rc::new(Cell::new(0));
    let children_at_mount = Rc::new(Cell::new(0));
    let (c, m) = (clicks.clone(), children_at_mount.clone());
    let button = el("button")
        .text("Search")
        .on("onClick", move |_, _| c.set(c.get() + 1))
        .on_mounted(move |dom, mounted| {
            if let Mounted::Element(node) = mounted {
                m.set(dom.children(node).len());
            }
        })
        .build(&dom)
        .unwrap();
    dom.append_child(dom.body(), button);
    dom.click(button);
    dom.dispatch(button, &mut Event::new("click"));
    assert_eq!(clicks.get(), 2);
    assert_eq!(children_at_mount.get(), 1);
}
