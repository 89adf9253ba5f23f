//! Queries and small helpers over the element tree.

use super::{Dom, NodeId, Value};

/// Parse a CSS pixel length such as `"42px"` or `"42"`.
pub fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    number.parse::<f64>().ok()
}

/// Join class names, skipping empty ones.
pub fn concat_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    classes
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First descendant of `root` carrying `class`, in document order.
pub fn query_class(dom: &Dom, root: NodeId, class: &str) -> Option<NodeId> {
    dom.descendants(root)
        .into_iter()
        .find(|n| dom.has_class(*n, class))
}

pub fn query_class_all(dom: &Dom, root: NodeId, class: &str) -> Vec<NodeId> {
    dom.descendants(root)
        .into_iter()
        .filter(|n| dom.has_class(*n, class))
        .collect()
}

/// Give `class` to `node` and take it away from every peer. Peers default to
/// the node's siblings.
pub fn add_class_exclusively(dom: &Dom, node: NodeId, class: &str, peers: Option<&[NodeId]>) {
    let siblings;
    let peers = match peers {
        Some(peers) => peers,
        None => {
            siblings = dom.parent(node).map(|p| dom.children(p)).unwrap_or_default();
            &siblings[..]
        }
    };
    for peer in peers {
        if *peer != node {
            dom.remove_class(*peer, class);
        }
    }
    dom.add_class(node, class);
}

fn is_disabled(dom: &Dom, node: NodeId) -> bool {
    dom.has_attribute(node, "disabled")
        || dom
            .field(node, "disabled")
            .is_some_and(|v| v == Value::Bool(true))
}

fn tab_index(dom: &Dom, node: NodeId) -> Option<i32> {
    dom.attribute(node, "tabindex")
        .and_then(|t| t.trim().parse().ok())
}

/// Whether `node` takes part in sequential (Tab key) focus navigation,
/// ignoring visibility.
pub fn is_tabbable(dom: &Dom, node: NodeId) -> bool {
    let Some(tag) = dom.tag(node) else {
        return false;
    };
    if is_disabled(dom, node) {
        return false;
    }
    if let Some(index) = tab_index(dom, node) {
        return index >= 0;
    }
    match tag.as_str() {
        "button" | "select" | "textarea" => true,
        "a" => dom.has_attribute(node, "href"),
        "input" => dom.attribute(node, "type").as_deref() != Some("hidden"),
        _ => false,
    }
}

/// Whether `node` can receive focus from a pointer press: anything tabbable
/// plus elements with a negative `tabindex`.
pub(crate) fn is_click_focusable(dom: &Dom, node: NodeId) -> bool {
    is_tabbable(dom, node) || (tab_index(dom, node).is_some() && !is_disabled(dom, node))
}

/// Whether `node` would be rendered: it is attached to the document, no
/// inclusive ancestor is `display: none` or `hidden`, and the nearest
/// explicit `visibility` is not `hidden`.
pub fn is_visible(dom: &Dom, node: NodeId) -> bool {
    if !dom.is_connected(node) {
        return false;
    }
    let mut visibility = None;
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if dom.style(current, "display").as_deref() == Some("none")
            || dom.has_attribute(current, "hidden")
        {
            return false;
        }
        if visibility.is_none() {
            visibility = dom.style(current, "visibility");
        }
        cursor = dom.parent(current);
    }
    !matches!(visibility.as_deref(), Some("hidden" | "collapse"))
}

/// Visible, tabbable descendants of `root` in document order.
pub fn focusable_children(dom: &Dom, root: NodeId) -> Vec<NodeId> {
    dom.descendants(root)
        .into_iter()
        .filter(|n| is_tabbable(dom, *n) && is_visible(dom, *n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_px_accepts_bare_numbers() {
        assert_eq!(parse_px("12px"), Some(12.0));
        assert_eq!(parse_px(" 3.5 "), Some(3.5));
        assert_eq!(parse_px("auto"), None);
    }

    #[test]
    fn concat_classes_skips_empty() {
        assert_eq!(concat_classes(["a", "", "b c"]), "a b c");
    }

    #[test]
    fn focusable_children_skip_hidden_and_disabled() {
        let dom = Dom::new();
        let root = dom.create_element("div");
        dom.append_child(dom.body(), root);
        let ok = dom.create_element("button");
        let disabled = dom.create_element("input");
        dom.set_attribute(disabled, "disabled", "");
        let hidden_wrap = dom.create_element("div");
        dom.set_style(hidden_wrap, "display", "none");
        let hidden = dom.create_element("textarea");
        let opted_out = dom.create_element("button");
        dom.set_attribute(opted_out, "tabindex", "-1");
        let span = dom.create_element("span");
        dom.set_attribute(span, "tabindex", "0");
        for n in [ok, disabled, hidden_wrap, opted_out, span] {
            dom.append_child(root, n);
        }
        dom.append_child(hidden_wrap, hidden);
        assert_eq!(focusable_children(&dom, root), vec![ok, span]);
    }

    #[test]
    fn nearest_visibility_wins() {
        let dom = Dom::new();
        let outer = dom.create_element("div");
        let inner = dom.create_element("div");
        dom.append_child(dom.body(), outer);
        dom.append_child(outer, inner);
        dom.set_style(outer, "visibility", "hidden");
        assert!(!is_visible(&dom, inner));
        dom.set_style(inner, "visibility", "visible");
        assert!(is_visible(&dom, inner));
    }

    #[test]
    fn exclusive_class_moves_between_siblings() {
        let dom = Dom::new();
        let list = dom.create_element("div");
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        dom.append_child(list, a);
        dom.append_child(list, b);
        add_class_exclusively(&dom, a, "selected", None);
        add_class_exclusively(&dom, b, "selected", None);
        assert!(!dom.has_class(a, "selected"));
        assert!(dom.has_class(b, "selected"));
    }
}
