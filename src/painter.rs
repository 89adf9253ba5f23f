//! Terminal layout and painting of the document.
//!
//! Layout is a plain block flow measured in terminal cells: elements stack
//! vertically, a few row containers place their children side by side, and
//! an inline `height`/`width` in px fixes an element's size. Elements with an
//! inline `top` (dialogs, drag ghosts), dialog masks and combo dropdowns are
//! overlays: they take no space in the flow and are laid out and painted
//! after it, in document order. Every element's resulting box is written
//! back into the document so geometry queries made by widgets see what the
//! user sees.

use ratatui::layout::Rect;
use ratatui::widgets::{Block, Clear};

use crate::constants::DROPDOWN_MAX_ROWS;
use crate::dom::{Dom, LayoutBox, NodeId, parse_px};
use crate::theme;
use crate::ui::UiFrame;

/// Containers whose children are laid out left to right.
const ROW_CLASSES: &[&str] = &[
    "combo-rect",
    "dialog-button-panel",
    "checkbox-row",
    "ext-checkbox",
    "textinput-row",
];

fn cells(value: f64) -> u16 {
    value.clamp(0.0, f64::from(u16::MAX)) as u16
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(cells(x), cells(y), cells(width), cells(height))
}

fn px_style(dom: &Dom, node: NodeId, name: &str) -> Option<f64> {
    dom.style(node, name).and_then(|v| parse_px(&v))
}

fn is_hidden(dom: &Dom, node: NodeId) -> bool {
    dom.style(node, "display").as_deref() == Some("none") || dom.has_attribute(node, "hidden")
}

/// One painted node with its area and the clip inherited from scrolling or
/// overlay containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintItem {
    pub node: NodeId,
    pub area: Rect,
    pub clip: Rect,
}

impl PaintItem {
    fn visible_area(&self) -> Rect {
        self.area.intersection(self.clip)
    }
}

struct Overlay {
    node: NodeId,
    x: f64,
    y: f64,
    width: f64,
}

struct Flow<'a> {
    dom: &'a Dom,
    viewport: Rect,
    items: Vec<PaintItem>,
    overlays: Vec<Overlay>,
}

impl Flow<'_> {
    fn node(&mut self, node: NodeId, x: f64, y: f64, width: f64, clip: Rect) -> f64 {
        let dom = self.dom;
        if !dom.is_element(node) {
            let text = dom.text(node).unwrap_or_default();
            if text.is_empty() {
                return 0.0;
            }
            let height = text.lines().count().max(1) as f64;
            self.items.push(PaintItem {
                node,
                area: rect(x, y, width, height),
                clip,
            });
            return height;
        }
        if is_hidden(dom, node) {
            dom.set_layout_box(
                node,
                LayoutBox {
                    x,
                    y,
                    width: 0.0,
                    height: 0.0,
                },
            );
            return 0.0;
        }
        if dom.style(node, "top").is_some()
            || dom.has_class(node, "dialog-mask")
            || dom.has_class(node, "combo-dropdown")
        {
            self.overlays.push(Overlay { node, x, y, width });
            return 0.0;
        }
        self.block(node, x, y, width, clip)
    }

    fn block(&mut self, node: NodeId, x: f64, y: f64, width: f64, clip: Rect) -> f64 {
        let dom = self.dom;
        let width = px_style(dom, node, "width").unwrap_or(width);
        let fixed = px_style(dom, node, "height");
        let slot = self.items.len();
        self.items.push(PaintItem {
            node,
            area: Rect::default(),
            clip,
        });
        let tag = dom.tag(node).unwrap_or_default();
        let height = match tag.as_str() {
            "input" | "button" | "select" | "i" => 1.0,
            "textarea" => (dom.input_value(node).lines().count() as f64 + 1.0).max(3.0),
            _ => {
                let inner = match fixed {
                    Some(h) => clip.intersection(rect(x, y, width, h)),
                    None => clip,
                };
                let content = if ROW_CLASSES.iter().any(|c| dom.has_class(node, c)) {
                    self.row(node, x, y, width, inner)
                } else {
                    self.column(node, x, y, width, inner)
                };
                fixed.unwrap_or(content)
            }
        };
        dom.set_layout_box(
            node,
            LayoutBox {
                x,
                y,
                width,
                height,
            },
        );
        self.items[slot].area = rect(x, y, width, height);
        height
    }

    fn column(&mut self, parent: NodeId, x: f64, y: f64, width: f64, clip: Rect) -> f64 {
        let mut cursor = y;
        for child in self.dom.children(parent) {
            cursor += self.node(child, x, cursor, width, clip);
        }
        cursor - y
    }

    fn intrinsic_width(&self, node: NodeId) -> Option<f64> {
        let dom = self.dom;
        if !dom.is_element(node) {
            return dom.text(node).map(|t| t.chars().count() as f64);
        }
        if is_hidden(dom, node) {
            return Some(0.0);
        }
        let label_len = || dom.text_content(node).chars().count() as f64;
        match dom.tag(node).as_deref() {
            Some("button") => Some(label_len() + 4.0),
            Some("label") => Some(label_len() + 2.0),
            Some("input") if dom.attribute(node, "type").as_deref() == Some("checkbox") => {
                Some(4.0)
            }
            _ if dom.has_class(node, "combo-chevron") => Some(3.0),
            _ => px_style(dom, node, "width"),
        }
    }

    fn row(&mut self, parent: NodeId, x: f64, y: f64, width: f64, clip: Rect) -> f64 {
        let children = self.dom.children(parent);
        let widths: Vec<Option<f64>> = children.iter().map(|c| self.intrinsic_width(*c)).collect();
        let fixed: f64 = widths.iter().flatten().sum();
        let flexible = widths.iter().filter(|w| w.is_none()).count();
        let share = if flexible > 0 {
            ((width - fixed) / flexible as f64).floor().max(0.0)
        } else {
            0.0
        };
        let mut cursor = x;
        let mut height: f64 = 0.0;
        for (child, w) in children.into_iter().zip(widths) {
            let w = w.unwrap_or(share);
            height = height.max(self.node(child, cursor, y, w, clip));
            cursor += w;
        }
        height
    }

    fn overlay(&mut self, overlay: Overlay) {
        let dom = self.dom;
        let node = overlay.node;
        let full = self.viewport;
        let (vw, vh) = (f64::from(full.width), f64::from(full.height));
        if dom.has_class(node, "dialog-mask") {
            dom.set_layout_box(
                node,
                LayoutBox {
                    x: 0.0,
                    y: 0.0,
                    width: vw,
                    height: vh,
                },
            );
            self.items.push(PaintItem {
                node,
                area: full,
                clip: full,
            });
            self.column(node, 0.0, 0.0, vw, full);
        } else if dom.has_class(node, "combo-dropdown") {
            let width = overlay
                .width
                .max(px_style(dom, node, "min-width").unwrap_or(0.0));
            let rows = dom.children(node).len().min(usize::from(DROPDOWN_MAX_ROWS));
            let height = rows as f64;
            let area = rect(overlay.x, overlay.y, width, height);
            self.items.push(PaintItem {
                node,
                area,
                clip: full,
            });
            dom.set_layout_box(
                node,
                LayoutBox {
                    x: overlay.x,
                    y: overlay.y,
                    width,
                    height,
                },
            );
            let scrolled = overlay.y - dom.scroll_top(node);
            self.column(node, overlay.x, scrolled, width, area);
        } else {
            let left = px_style(dom, node, "left").unwrap_or(0.0);
            let top = px_style(dom, node, "top").unwrap_or(0.0)
                + px_style(dom, node, "margin-top").unwrap_or(0.0);
            let width = px_style(dom, node, "width").unwrap_or((vw - left).max(0.0));
            if dom.has_class(node, "dialog") {
                self.dialog(node, left, top, width);
            } else {
                self.block(node, left, top, width, full);
            }
        }
    }

    /// Lay out overlays from index `from` on, each followed directly by the
    /// overlays nested inside it.
    fn drain_overlays(&mut self, from: usize) {
        while self.overlays.len() > from {
            let overlay = self.overlays.remove(from);
            let nested = self.overlays.len();
            self.overlay(overlay);
            self.drain_overlays(nested);
        }
    }

    /// A dialog is a bordered box; its contents sit inside the border.
    fn dialog(&mut self, node: NodeId, x: f64, y: f64, width: f64) {
        let dom = self.dom;
        let full = self.viewport;
        let slot = self.items.len();
        self.items.push(PaintItem {
            node,
            area: Rect::default(),
            clip: full,
        });
        let content = self.column(node, x + 1.0, y + 1.0, (width - 2.0).max(0.0), full);
        let height = px_style(dom, node, "height").unwrap_or(content + 2.0);
        dom.set_layout_box(
            node,
            LayoutBox {
                x,
                y,
                width,
                height,
            },
        );
        self.items[slot].area = rect(x, y, width, height);
    }
}

/// Lays out and paints one document.
#[derive(Debug, Default)]
pub struct Painter {
    items: Vec<PaintItem>,
}

impl Painter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay the document out in the viewport and record the paint order.
    pub fn layout(&mut self, dom: &Dom) {
        let (vw, vh) = dom.viewport();
        let viewport = rect(0.0, 0.0, vw, vh);
        let mut flow = Flow {
            dom,
            viewport,
            items: Vec::new(),
            overlays: Vec::new(),
        };
        flow.block(dom.body(), 0.0, 0.0, vw, viewport);
        flow.drain_overlays(0);
        self.items = flow.items;
    }

    pub fn items(&self) -> &[PaintItem] {
        &self.items
    }

    /// Topmost element painted at cell `(x, y)`.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<NodeId> {
        self.items
            .iter()
            .rev()
            .find(|item| {
                let area = item.visible_area();
                x >= area.x && x < area.right() && y >= area.y && y < area.bottom()
            })
            .map(|item| item.node)
    }

    pub fn paint(&self, dom: &Dom, frame: &mut UiFrame<'_>) {
        let active = dom.active_element();
        for item in &self.items {
            if !dom.exists(item.node) {
                continue;
            }
            let area = item.visible_area();
            if area.width == 0 || area.height == 0 {
                continue;
            }
            if dom.is_element(item.node) {
                paint_element(dom, frame, item, active == Some(item.node));
            } else {
                let text = dom.text(item.node).unwrap_or_default();
                for (i, line) in text.lines().enumerate() {
                    let y = item.area.y.saturating_add(i as u16);
                    frame.set_string(area, item.area.x, y, line, Default::default());
                }
            }
        }
    }
}

fn paint_element(dom: &Dom, frame: &mut UiFrame<'_>, item: &PaintItem, focused: bool) {
    let node = item.node;
    let area = item.visible_area();
    let (x, y) = (item.area.x, item.area.y);
    match dom.tag(node).as_deref() {
        Some("input") if dom.attribute(node, "type").as_deref() == Some("checkbox") => {
            let mark = if dom.checked(node) { "[x]" } else { "[ ]" };
            let style = if focused { theme::focused() } else { theme::text() };
            frame.set_string(area, x, y, mark, style);
        }
        Some("input") => {
            frame.set_style(area, if focused { theme::focused() } else { theme::input() });
            let value = dom.input_value(node);
            if value.is_empty() {
                let hint = dom.attribute(node, "placeholder").unwrap_or_default();
                frame.set_string(area, x, y, &hint, theme::placeholder());
            } else {
                frame.set_string(area, x, y, &value, Default::default());
            }
        }
        Some("textarea") => {
            frame.set_style(area, if focused { theme::focused() } else { theme::input() });
            let value = dom.input_value(node);
            for (i, line) in value.lines().enumerate() {
                frame.set_string(area, x, y.saturating_add(i as u16), line, Default::default());
            }
        }
        Some("button") => {
            let style = if focused { theme::focused() } else { theme::button() };
            frame.set_style(area, style);
            let label = format!("  {}  ", dom.text_content(node));
            frame.set_string(area, x, y, &label, style);
        }
        Some("i") if dom.has_class(node, "fa-chevron-down") => {
            frame.set_string(area, x, y, "▾", theme::text());
        }
        _ if dom.has_class(node, "dialog-mask") => frame.set_style(area, theme::mask()),
        _ if dom.has_class(node, "dialog") => {
            frame.render_widget(Clear, area);
            frame.render_widget(
                Block::bordered()
                    .border_style(theme::dialog_border())
                    .style(theme::dialog()),
                item.area,
            );
        }
        _ if dom.has_class(node, "combo-dropdown") => {
            frame.render_widget(Clear, area);
            frame.set_style(area, theme::dropdown());
        }
        _ if dom.has_class(node, "combo-highlighted") => {
            frame.set_style(area, theme::dropdown_highlight());
        }
        _ if dom.has_class(node, "splitter-divider") => {
            let style = if dom.has_class(node, "splitter-divider-ghost") {
                theme::divider_ghost()
            } else {
                theme::divider()
            };
            frame.fill(area, "─", style);
        }
        _ => {}
    }
}
