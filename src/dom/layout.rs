//! Layout boxes, the viewport and hit testing.
//!
//! Flow elements receive their boxes from the host's layout pass through
//! [`Document::set_layout`]. Elements with `position: fixed` derive their
//! box from their inline `top/left/width/height`, which is what the drag and
//! resize controllers write.

use super::{Document, NodeId, parse_px};
use crate::error::DomError;
use crate::geometry::{ViewportRect, rect_contains, viewport_offset};

/// An element's box relative to its offset parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutBox {
    pub offset_top: i32,
    pub offset_left: i32,
    pub width: i32,
    pub height: i32,
    /// Inner width without borders and scrollbars.
    pub client_width: i32,
}

impl LayoutBox {
    pub fn new(offset_top: i32, offset_left: i32, width: i32, height: i32) -> Self {
        Self {
            offset_top,
            offset_left,
            width,
            height,
            client_width: width,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    pub scroll_x: i32,
    pub scroll_y: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            scroll_x: 0,
            scroll_y: 0,
        }
    }

    pub fn scroll_by(&mut self, dx: i32, dy: i32) {
        self.scroll_x = self.scroll_x.saturating_add(dx).max(0);
        self.scroll_y = self.scroll_y.saturating_add(dy).max(0);
    }
}

impl Document {
    pub fn set_layout(
        &mut self,
        node: NodeId,
        layout: LayoutBox,
        offset_parent: Option<NodeId>,
    ) -> Result<(), DomError> {
        if let Some(parent) = offset_parent {
            self.element(parent)?;
        }
        let el = self.nodes.get_mut(node.0).ok_or(DomError::UnknownNode(node))?;
        el.layout = layout;
        el.offset_parent = offset_parent;
        Ok(())
    }

    /// The box the host assigned, ignoring fixed positioning.
    pub fn layout(&self, node: NodeId) -> LayoutBox {
        self.nodes
            .get(node.0)
            .map(|el| el.layout)
            .unwrap_or_default()
    }

    pub fn is_fixed(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|el| el.style.get("position") == Some("fixed"))
    }

    /// Fixed elements are positioned against the viewport and have none.
    pub fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        if self.is_fixed(node) {
            return None;
        }
        self.nodes.get(node.0).and_then(|el| el.offset_parent)
    }

    pub fn offset_top(&self, node: NodeId) -> i32 {
        self.fixed_length(node, "top")
            .unwrap_or_else(|| self.layout(node).offset_top)
    }

    pub fn offset_left(&self, node: NodeId) -> i32 {
        self.fixed_length(node, "left")
            .unwrap_or_else(|| self.layout(node).offset_left)
    }

    pub fn offset_width(&self, node: NodeId) -> i32 {
        self.fixed_length(node, "width")
            .unwrap_or_else(|| self.layout(node).width)
    }

    pub fn offset_height(&self, node: NodeId) -> i32 {
        self.fixed_length(node, "height")
            .unwrap_or_else(|| self.layout(node).height)
    }

    pub fn client_width(&self, node: NodeId) -> i32 {
        self.layout(node).client_width
    }

    fn fixed_length(&self, node: NodeId, prop: &str) -> Option<i32> {
        if !self.is_fixed(node) {
            return None;
        }
        self.nodes
            .get(node.0)
            .and_then(|el| el.style.get(prop))
            .map(parse_px)
    }

    /// Stacking value from inline `z-index`; unset counts as 0.
    pub fn z_index(&self, node: NodeId) -> i64 {
        self.nodes
            .get(node.0)
            .and_then(|el| el.style.get("z-index"))
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Viewport rectangle of `node`'s border box.
    pub fn client_rect(&self, node: NodeId) -> ViewportRect {
        let offset = viewport_offset(self, node);
        ViewportRect {
            top: offset.top,
            left: offset.left,
            width: self.offset_width(node),
            height: self.offset_height(node),
        }
    }

    /// Fixed children of the body in paint order: ascending z-index, ties
    /// broken by document order.
    pub fn positioned_layers(&self) -> Vec<NodeId> {
        let mut layers: Vec<NodeId> = self
            .children(self.body)
            .iter()
            .copied()
            .filter(|&n| self.is_fixed(n) && self.is_displayed(n))
            .collect();
        layers.sort_by_key(|&n| self.z_index(n));
        layers
    }

    /// Deepest displayed node under the viewport point `(left, top)`.
    /// Positioned layers are searched topmost first, then the flow content.
    pub fn hit_test(&self, left: i32, top: i32) -> Option<NodeId> {
        for layer in self.positioned_layers().into_iter().rev() {
            if let Some(hit) = self.hit_test_subtree(layer, left, top) {
                return Some(hit);
            }
        }
        self.children(self.body)
            .iter()
            .rev()
            .filter(|&&n| !self.is_fixed(n))
            .find_map(|&n| self.hit_test_subtree(n, left, top))
    }

    fn hit_test_subtree(&self, node: NodeId, left: i32, top: i32) -> Option<NodeId> {
        if !self.is_displayed(node) {
            return None;
        }
        let mut children = self.children(node).to_vec();
        children.sort_by_key(|&child| self.z_index(child));
        let deeper = children
            .into_iter()
            .rev()
            .find_map(|child| self.hit_test_subtree(child, left, top));
        if deeper.is_some() {
            return deeper;
        }
        rect_contains(self.client_rect(node), left, top).then_some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_elements_read_geometry_from_style() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.append_child(doc.body(), node).unwrap();
        doc.set_layout(node, LayoutBox::new(1, 2, 3, 4), None).unwrap();
        assert_eq!(doc.offset_top(node), 1);

        doc.set_style_text(
            node,
            "position: fixed; top: 40px; left: 30px; width: 20px; height: 10px;",
        )
        .unwrap();
        assert_eq!(doc.offset_top(node), 40);
        assert_eq!(doc.offset_left(node), 30);
        assert_eq!(doc.offset_width(node), 20);
        assert_eq!(doc.offset_height(node), 10);
    }

    #[test]
    fn hit_test_prefers_topmost_layer() {
        let mut doc = Document::new();
        let body = doc.body();
        let flow = doc.create_element("div");
        doc.append_child(body, flow).unwrap();
        doc.set_layout(flow, LayoutBox::new(0, 0, 50, 50), None).unwrap();

        let low = doc.create_element("div");
        let high = doc.create_element("div");
        for (node, z) in [(high, 5), (low, 1)] {
            doc.append_child(body, node).unwrap();
            doc.set_style_text(
                node,
                "position: fixed; top: 10px; left: 10px; width: 10px; height: 10px;",
            )
            .unwrap();
            doc.set_style(node, "z-index", z.to_string()).unwrap();
        }

        assert_eq!(doc.hit_test(12, 12), Some(high));
        assert_eq!(doc.hit_test(40, 40), Some(flow));
        assert_eq!(doc.hit_test(80, 80), None);

        doc.set_style(high, "display", "none").unwrap();
        assert_eq!(doc.hit_test(12, 12), Some(low));
    }

    #[test]
    fn hit_test_returns_deepest_node() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(doc.body(), outer).unwrap();
        doc.append_child(outer, inner).unwrap();
        doc.set_layout(outer, LayoutBox::new(0, 0, 100, 100), None)
            .unwrap();
        doc.set_layout(inner, LayoutBox::new(10, 10, 5, 5), Some(outer))
            .unwrap();
        assert_eq!(doc.hit_test(12, 12), Some(inner));
        assert_eq!(doc.hit_test(50, 50), Some(outer));
    }

    #[test]
    fn scroll_never_goes_negative() {
        let mut vp = Viewport::new(80, 24);
        vp.scroll_by(0, -5);
        assert_eq!(vp.scroll_y, 0);
        vp.scroll_by(3, 7);
        assert_eq!((vp.scroll_x, vp.scroll_y), (3, 7));
    }
}
