//! Viewport geometry.

use crate::dom::{Document, NodeId};

/// Position measured from the top-left corner of the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportOffset {
    pub top: i32,
    pub left: i32,
}

/// Signed rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportRect {
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
}

impl ViewportRect {
    pub fn right(&self) -> i32 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height)
    }
}

/// Position of `node` relative to the viewport.
///
/// Sums the offsets along the offset-parent chain and subtracts the page
/// scroll. A chain that ends in a fixed element is already viewport-relative
/// and is not scrolled. Reads live layout on every call.
pub fn viewport_offset(doc: &Document, node: NodeId) -> ViewportOffset {
    let mut top = doc.offset_top(node);
    let mut left = doc.offset_left(node);
    let mut current = node;
    while let Some(parent) = doc.offset_parent(current) {
        top = top.saturating_add(doc.offset_top(parent));
        left = left.saturating_add(doc.offset_left(parent));
        current = parent;
    }
    if !doc.is_fixed(current) {
        let viewport = doc.viewport();
        top = top.saturating_sub(viewport.scroll_y);
        left = left.saturating_sub(viewport.scroll_x);
    }
    ViewportOffset { top, left }
}

pub fn rect_contains(rect: ViewportRect, left: i32, top: i32) -> bool {
    if rect.width <= 0 || rect.height <= 0 {
        return false;
    }
    left >= rect.left && left < rect.right() && top >= rect.top && top < rect.bottom()
}
