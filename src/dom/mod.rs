//! Headless document model.
//!
//! Elements live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. The model carries just enough of a browser document for the
//! window lifecycle: tree mutation, attributes, class names, element ids,
//! inline and computed style, layout boxes and a scrolled viewport.

pub mod layout;
pub mod style;

use std::collections::BTreeMap;

pub use layout::{LayoutBox, Viewport};
pub use style::{InlineStyle, Margin, parse_px, px};

use crate::error::DomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

const INLINE_TAGS: [&str; 10] = [
    "span", "a", "em", "strong", "b", "i", "img", "code", "label", "small",
];

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    element_id: Option<String>,
    class_name: String,
    attributes: BTreeMap<String, String>,
    style: InlineStyle,
    cascaded: InlineStyle,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    layout: LayoutBox,
    offset_parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            element_id: None,
            class_name: String::new(),
            attributes: BTreeMap::new(),
            style: InlineStyle::new(),
            cascaded: InlineStyle::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            layout: LayoutBox::default(),
            offset_parent: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn element_id(&self) -> Option<&str> {
        self.element_id.as_deref()
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    fn is_inline_tag(&self) -> bool {
        INLINE_TAGS.contains(&self.tag.as_str())
    }
}

/// The document: an element arena rooted at `body`, plus the viewport.
///
/// Slots handed back through [`release`](Document::release) are reused by
/// later `create_element` calls.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    free: Vec<NodeId>,
    body: NodeId,
    viewport: Viewport,
    default_view: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let body = Element::new("body");
        Self {
            nodes: vec![body],
            free: Vec::new(),
            body: NodeId(0),
            viewport: Viewport::default(),
            default_view: true,
        }
    }

    /// A document whose computed-style lookups are unavailable; they all
    /// answer the empty string.
    pub fn without_default_view() -> Self {
        Self {
            default_view: false,
            ..Self::new()
        }
    }

    pub fn has_default_view(&self) -> bool {
        self.default_view
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn element(&self, node: NodeId) -> Result<&Element, DomError> {
        self.nodes.get(node.0).ok_or(DomError::UnknownNode(node))
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element, DomError> {
        self.nodes.get_mut(node.0).ok_or(DomError::UnknownNode(node))
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        if let Some(node) = self.free.pop() {
            self.nodes[node.0] = Element::new(tag);
            return node;
        }
        self.nodes.push(Element::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    /// Number of live elements, released slots excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free a detached subtree so its slots can be reused. Ids into the
    /// subtree must not be used afterwards.
    pub fn release(&mut self, node: NodeId) -> Result<(), DomError> {
        self.element(node)?;
        if node == self.body || self.free.contains(&node) {
            return Err(DomError::UnknownNode(node));
        }
        if self.parent(node).is_some() {
            return Err(DomError::Attached(node));
        }
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            let el = std::mem::replace(&mut self.nodes[n.0], Element::new("div"));
            stack.extend(el.children);
            self.free.push(n);
        }
        Ok(())
    }

    pub fn create_text_element(&mut self, tag: &str, text: impl Into<String>) -> NodeId {
        let node = self.create_element(tag);
        self.nodes[node.0].text = Some(text.into());
        node
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        self.element_mut(node)?.text = Some(text.into());
        Ok(())
    }

    pub fn set_element_id(&mut self, node: NodeId, id: &str) -> Result<(), DomError> {
        self.element_mut(node)?.element_id = Some(id.to_string());
        Ok(())
    }

    pub fn set_class_name(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        self.element_mut(node)?.class_name = class.to_string();
        Ok(())
    }

    // Tree

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|el| el.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|el| el.children.as_slice())
            .unwrap_or(&[])
    }

    /// Position of `node` among its parent's children.
    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    /// Whether `node` is attached under the document body.
    pub fn contains(&self, node: NodeId) -> bool {
        self.ancestors(node).any(|n| n == self.body)
    }

    /// `node` followed by each of its ancestors.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = (node.0 < self.nodes.len()).then_some(node);
        std::iter::successors(start, move |&n| self.parent(n))
    }

    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, node)?;
        self.detach(node);
        self.nodes[parent.0].children.push(node);
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }

    /// Insert `node` into `parent` immediately before `reference`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.check_insert(parent, node)?;
        self.element(reference)?;
        if node == reference {
            return Ok(());
        }
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild { parent, reference });
        }
        self.detach(node);
        let idx = self
            .index_in_parent(reference)
            .ok_or(DomError::NotAChild { parent, reference })?;
        self.nodes[parent.0].children.insert(idx, node);
        self.nodes[node.0].parent = Some(parent);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.element(parent)?;
        self.element(node)?;
        if self.parent(node) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                reference: node,
            });
        }
        self.detach(node);
        Ok(())
    }

    /// Remove `node` from its parent, if any.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        let parent = self.parent(node).ok_or(DomError::Detached(node))?;
        self.remove_child(parent, node)
    }

    fn check_insert(&self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.element(parent)?;
        self.element(node)?;
        if node == self.body || self.ancestors(parent).any(|n| n == node) {
            return Err(DomError::Cycle { parent, node });
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Attached nodes in document (pre-)order, starting at the body.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.body];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants()
            .into_iter()
            .find(|&n| self.nodes[n.0].element_id.as_deref() == Some(id))
    }

    pub fn get_elements_by_class_name(&self, class: &str) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|&n| self.nodes[n.0].has_class(class))
            .collect()
    }

    // Attributes

    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        self.element_mut(node)?
            .attributes
            .insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        self.element_mut(node)?.attributes.remove(name);
        Ok(())
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|el| el.has_attribute(name))
    }

    // Style

    pub fn style(&self, node: NodeId) -> Result<&InlineStyle, DomError> {
        Ok(&self.element(node)?.style)
    }

    pub fn set_style(
        &mut self,
        node: NodeId,
        prop: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        self.element_mut(node)?.style.set(prop, value);
        Ok(())
    }

    pub fn remove_style(&mut self, node: NodeId, prop: &str) -> Result<(), DomError> {
        self.element_mut(node)?.style.remove(prop);
        Ok(())
    }

    /// Replace the whole inline style from `"a: b; c: d"` text.
    pub fn set_style_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.element_mut(node)?.style = InlineStyle::parse(text);
        Ok(())
    }

    /// Style the host stylesheet resolved for `node`, consulted by
    /// [`computed_style`](Self::computed_style) below the inline style.
    pub fn set_cascaded_style(
        &mut self,
        node: NodeId,
        prop: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        self.element_mut(node)?.cascaded.set(prop, value);
        Ok(())
    }

    /// Resolved value of `prop`: inline, then cascaded, then the user-agent
    /// default. Empty when the document has no default view.
    pub fn computed_style(&self, node: NodeId, prop: &str) -> String {
        if !self.default_view {
            return String::new();
        }
        let Some(el) = self.nodes.get(node.0) else {
            return String::new();
        };
        el.style
            .get_owned(prop)
            .or_else(|| el.cascaded.get_owned(prop))
            .unwrap_or_else(|| user_agent_default(el, prop).to_string())
    }

    /// Whether `node` takes part in rendering (neither it nor an ancestor is
    /// `display: none`).
    pub fn is_displayed(&self, node: NodeId) -> bool {
        self.ancestors(node).all(|n| {
            self.nodes[n.0].style.get("display") != Some("none")
                && self.nodes[n.0].cascaded.get("display") != Some("none")
        })
    }
}

fn user_agent_default(el: &Element, prop: &str) -> &'static str {
    match prop {
        "display" if el.is_inline_tag() => "inline",
        "display" => "block",
        "vertical-align" => "baseline",
        "position" => "static",
        "margin-top" | "margin-right" | "margin-bottom" | "margin-left" => "0px",
        "margin" => "0px 0px 0px 0px",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_children(n: usize) -> (Document, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let nodes = (0..n)
            .map(|_| {
                let node = doc.create_element("div");
                doc.append_child(body, node).unwrap();
                node
            })
            .collect();
        (doc, nodes)
    }

    #[test]
    fn insert_before_places_node_at_reference() {
        let (mut doc, nodes) = doc_with_children(2);
        let extra = doc.create_element("div");
        doc.insert_before(doc.body(), extra, nodes[1]).unwrap();
        assert_eq!(doc.children(doc.body()), &[nodes[0], extra, nodes[1]]);
        assert_eq!(doc.index_in_parent(extra), Some(1));
    }

    #[test]
    fn insert_before_rejects_foreign_reference() {
        let (mut doc, nodes) = doc_with_children(2);
        let extra = doc.create_element("div");
        let err = doc.insert_before(nodes[0], extra, nodes[1]).unwrap_err();
        assert_eq!(
            err,
            DomError::NotAChild {
                parent: nodes[0],
                reference: nodes[1]
            }
        );
    }

    #[test]
    fn released_slots_are_reused() {
        let (mut doc, nodes) = doc_with_children(1);
        let subtree = doc.create_element("section");
        let leaf = doc.create_text_element("p", "gone");
        doc.append_child(subtree, leaf).unwrap();
        doc.append_child(nodes[0], subtree).unwrap();
        assert_eq!(doc.len(), 4);

        assert_eq!(doc.release(subtree), Err(DomError::Attached(subtree)));
        doc.remove(subtree).unwrap();
        doc.release(subtree).unwrap();
        assert_eq!(doc.len(), 2);
        assert!(doc.release(doc.body()).is_err());

        let fresh = doc.create_element("span");
        assert!(fresh == subtree || fresh == leaf);
        let el = doc.element(fresh).unwrap();
        assert_eq!(el.tag(), "span");
        assert_eq!(el.text(), None);
        assert!(doc.parent(fresh).is_none());
        assert!(doc.children(fresh).is_empty());
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn moving_a_node_detaches_it_first() {
        let (mut doc, nodes) = doc_with_children(2);
        doc.append_child(nodes[0], nodes[1]).unwrap();
        assert_eq!(doc.children(doc.body()), &[nodes[0]]);
        assert_eq!(doc.parent(nodes[1]), Some(nodes[0]));
        assert!(doc.contains(nodes[1]));
    }

    #[test]
    fn cycles_are_rejected() {
        let (mut doc, nodes) = doc_with_children(1);
        let child = doc.create_element("div");
        doc.append_child(nodes[0], child).unwrap();
        assert!(matches!(
            doc.append_child(child, nodes[0]),
            Err(DomError::Cycle { .. })
        ));
    }

    #[test]
    fn lookups_only_see_attached_nodes() {
        let (mut doc, nodes) = doc_with_children(1);
        doc.set_element_id(nodes[0], "main").unwrap();
        doc.set_class_name(nodes[0], "panel wide").unwrap();
        let loose = doc.create_element("div");
        doc.set_class_name(loose, "panel").unwrap();

        assert_eq!(doc.get_element_by_id("main"), Some(nodes[0]));
        assert_eq!(doc.get_elements_by_class_name("panel"), vec![nodes[0]]);
        doc.remove(nodes[0]).unwrap();
        assert_eq!(doc.get_element_by_id("main"), None);
    }

    #[test]
    fn computed_style_falls_back_through_cascade() {
        let mut doc = Document::new();
        let span = doc.create_element("span");
        let div = doc.create_element("div");
        assert_eq!(doc.computed_style(span, "display"), "inline");
        assert_eq!(doc.computed_style(div, "display"), "block");
        assert_eq!(doc.computed_style(div, "vertical-align"), "baseline");

        doc.set_cascaded_style(div, "margin", "3px").unwrap();
        assert_eq!(doc.computed_style(div, "margin-left"), "3px");
        doc.set_style(div, "margin-left", "7px").unwrap();
        assert_eq!(doc.computed_style(div, "margin-left"), "7px");
    }

    #[test]
    fn computed_style_is_empty_without_default_view() {
        let mut doc = Document::without_default_view();
        let div = doc.create_element("div");
        doc.set_style(div, "display", "flex").unwrap();
        assert_eq!(doc.computed_style(div, "display"), "");
    }

    #[test]
    fn display_none_hides_subtree() {
        let (mut doc, nodes) = doc_with_children(1);
        let child = doc.create_element("div");
        doc.append_child(nodes[0], child).unwrap();
        assert!(doc.is_displayed(child));
        doc.set_style(nodes[0], "display", "none").unwrap();
        assert!(!doc.is_displayed(child));
    }
}
