//! Hover trigger binder.
//!
//! Every bound element shares one "open as window" affordance. Hovering an
//! element re-targets it: the affordance's listeners are stripped, it moves
//! to the element's top-right corner, and a fresh click listener for that
//! element is installed. It hides itself after a delay unless re-targeted.

use std::time::{Duration, Instant};

use crate::config::PopoutConfig;
use crate::constants::{CLASS_TRIGGER, FLOATING_MARKER, TRIGGER_ELEMENT_ID, TRIGGER_TITLE};
use crate::dom::{Document, NodeId, px};
use crate::error::{DomError, PopoutError};
use crate::events::{EventKind, EventTarget, Listener, ListenerRegistry, Phase};
use crate::geometry::viewport_offset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(usize);

impl BindingId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub target: NodeId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct HoverTrigger {
    bindings: Vec<Binding>,
    active: Option<BindingId>,
    hide_at: Option<Instant>,
    size: i32,
    z_index: i64,
    delay: Duration,
}

impl HoverTrigger {
    pub fn new(config: &PopoutConfig) -> Self {
        Self {
            bindings: Vec::new(),
            active: None,
            hide_at: None,
            size: config.trigger_size,
            z_index: config.trigger_z_index,
            delay: config.auto_hide_delay,
        }
    }

    /// Attach hover behavior to `target`. One binding per element.
    pub fn bind(
        &mut self,
        doc: &mut Document,
        registry: &mut ListenerRegistry,
        target: NodeId,
        name: &str,
    ) -> Result<BindingId, PopoutError> {
        doc.element(target)?;
        if self.binding_for(target).is_some() {
            return Err(PopoutError::AlreadyBound(target));
        }
        self.ensure_node(doc)?;
        let id = BindingId(self.bindings.len());
        self.bindings.push(Binding {
            target,
            name: name.to_string(),
        });
        registry.add(
            EventTarget::Node(target),
            EventKind::PointerEnter,
            Phase::Bubble,
            Listener::ShowTrigger(id),
        );
        tracing::debug!(binding = ?id, target = ?target, name, "bound window trigger");
        Ok(id)
    }

    /// The shared affordance, created on first use. An element carrying the
    /// trigger id is reused, so there is never more than one.
    pub fn ensure_node(&self, doc: &mut Document) -> Result<NodeId, DomError> {
        if let Some(node) = doc.get_element_by_id(TRIGGER_ELEMENT_ID) {
            return Ok(node);
        }
        let node = doc.create_element("div");
        doc.set_element_id(node, TRIGGER_ELEMENT_ID)?;
        doc.set_class_name(node, CLASS_TRIGGER)?;
        doc.set_attribute(node, "title", TRIGGER_TITLE)?;
        doc.set_style_text(
            node,
            &format!(
                "width: {size}px; height: {size}px; background-color: #eee; \
                 border-radius: 5px; position: fixed; z-index: {}; display: none;",
                self.z_index,
                size = self.size
            ),
        )?;
        doc.append_child(doc.body(), node)?;
        Ok(node)
    }

    /// Re-target the affordance at `id`'s element. Returns false when the
    /// element is floating and the hover is ignored.
    pub fn show_for(
        &mut self,
        doc: &mut Document,
        registry: &mut ListenerRegistry,
        id: BindingId,
        now: Instant,
    ) -> Result<bool, PopoutError> {
        let target = self
            .bindings
            .get(id.0)
            .ok_or(PopoutError::UnknownBinding(id))?
            .target;
        if doc.has_attribute(target, FLOATING_MARKER) {
            return Ok(false);
        }
        self.hide_at = None;
        let node = self.ensure_node(doc)?;
        registry.remove_all_for(EventTarget::Node(node));

        let offset = viewport_offset(doc, target);
        let left = offset
            .left
            .saturating_add(doc.client_width(target))
            .saturating_sub(self.size);
        doc.set_style(node, "top", px(offset.top))?;
        doc.set_style(node, "left", px(left))?;
        doc.set_style(node, "display", "block")?;
        registry.add(
            EventTarget::Node(node),
            EventKind::Click,
            Phase::Bubble,
            Listener::OpenWindow(id),
        );
        self.active = Some(id);
        self.hide_at = Some(now + self.delay);
        tracing::debug!(binding = ?id, top = offset.top, left, "trigger re-targeted");
        Ok(true)
    }

    pub fn hide(&mut self, doc: &mut Document) -> Result<(), DomError> {
        self.hide_at = None;
        if let Some(node) = doc.get_element_by_id(TRIGGER_ELEMENT_ID) {
            doc.set_style(node, "display", "none")?;
        }
        Ok(())
    }

    /// Hide the affordance once its deadline has passed. Returns whether it
    /// was hidden by this call.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> Result<bool, DomError> {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.hide(doc)?;
                tracing::trace!("trigger auto-hidden");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.0)
    }

    pub fn binding_for(&self, target: NodeId) -> Option<BindingId> {
        self.bindings
            .iter()
            .position(|b| b.target == target)
            .map(BindingId)
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Binding the affordance was last re-targeted at.
    pub fn active(&self) -> Option<BindingId> {
        self.active
    }

    pub fn hide_deadline(&self) -> Option<Instant> {
        self.hide_at
    }

    pub fn is_visible(&self, doc: &Document) -> bool {
        doc.get_element_by_id(TRIGGER_ELEMENT_ID)
            .is_some_and(|node| doc.is_displayed(node))
    }
}
