//! Floating window lifecycle.
//!
//! A target element moves through `Docked -> Floating -> Docked`. Opening
//! captures the element's original layout, leaves a labelled placeholder in
//! its place, and re-parents the element itself into a decorated shell
//! mounted on the document body. Closing puts the element back where the
//! placeholder stood and restores the captured margin and vertical
//! alignment.

use crate::config::PopoutConfig;
use crate::constants::{
    CLASS_BUTTON_PANEL, CLASS_CLOSE_BUTTON, CLASS_CONTENT_CONTAINER, CLASS_PLACEHOLDER,
    CLASS_PLACEHOLDER_LABEL, CLASS_RESIZE, CLASS_TITLE, CLASS_WINDOW, FLOATING_MARKER,
};
use crate::dom::{Document, LayoutBox, Margin, NodeId, parse_px, px};
use crate::drag::DragController;
use crate::error::{DomError, PopoutError};
use crate::events::{EventKind, EventTarget, Listener, ListenerRegistry, Phase};
use crate::geometry::viewport_offset;
use crate::resize::ResizeController;
use crate::zorder::ZOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    pub fn from_index(index: u64) -> Self {
        Self(index)
    }

    pub fn index(self) -> u64 {
        self.0
    }
}

/// Everything needed to put a floated element back, captured before the
/// first mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalLayout {
    pub parent: NodeId,
    pub width: i32,
    pub height: i32,
    /// Viewport position at open time.
    pub top: i32,
    pub left: i32,
    pub margin: Margin,
    pub display: String,
    pub vertical_align: String,
    pub layout: LayoutBox,
    pub offset_parent: Option<NodeId>,
}

impl OriginalLayout {
    pub fn capture(doc: &Document, target: NodeId) -> Result<Self, DomError> {
        doc.element(target)?;
        let parent = doc.parent(target).ok_or(DomError::Detached(target))?;
        let offset = viewport_offset(doc, target);
        let margin = Margin {
            top: parse_px(&doc.computed_style(target, "margin-top")),
            right: parse_px(&doc.computed_style(target, "margin-right")),
            bottom: parse_px(&doc.computed_style(target, "margin-bottom")),
            left: parse_px(&doc.computed_style(target, "margin-left")),
        };
        Ok(Self {
            parent,
            width: doc.offset_width(target),
            height: doc.offset_height(target),
            top: offset.top,
            left: offset.left,
            margin,
            display: doc.computed_style(target, "display"),
            vertical_align: doc.computed_style(target, "vertical-align"),
            layout: doc.layout(target),
            offset_parent: doc.offset_parent(target),
        })
    }
}

/// Inline boxes cannot hold a sized placeholder.
pub fn placeholder_display(display: &str) -> &str {
    if display == "inline" {
        "inline-block"
    } else {
        display
    }
}

/// Viewport rectangle a freshly opened shell occupies: the element's
/// footprint grown by the chrome, lifted by the title bar so the content
/// lands where the element used to be.
pub fn shell_geometry(original: &OriginalLayout, config: &PopoutConfig) -> (i32, i32, i32, i32) {
    let width = original.width.saturating_add(config.chrome_width());
    let height = original.height.saturating_add(config.chrome_height());
    let top = original
        .top
        .saturating_sub(config.title_bar_height)
        .max(0);
    (top, original.left, width, height)
}

#[derive(Debug)]
pub struct FloatingWindow {
    id: WindowId,
    name: String,
    shell: NodeId,
    title_bar: NodeId,
    title_label: NodeId,
    button_panel: NodeId,
    close_button: NodeId,
    content_container: NodeId,
    resize_handle: NodeId,
    placeholder: Option<NodeId>,
    placeholder_label: Option<NodeId>,
    target: NodeId,
    original: OriginalLayout,
    drag: DragController,
    resize: ResizeController,
}

impl FloatingWindow {
    /// Float `target`: capture, detach, decorate, mount and raise.
    pub(crate) fn open(
        doc: &mut Document,
        registry: &mut ListenerRegistry,
        zorder: &mut ZOrder,
        config: &PopoutConfig,
        id: WindowId,
        target: NodeId,
        name: &str,
    ) -> Result<Self, PopoutError> {
        if doc.has_attribute(target, FLOATING_MARKER) {
            return Err(PopoutError::AlreadyFloating(target));
        }
        let original = OriginalLayout::capture(doc, target)?;

        let shell = doc.create_element("div");
        doc.set_class_name(shell, CLASS_WINDOW)?;
        doc.set_style_text(
            shell,
            &format!(
                "height: {}px; width: 100px; box-sizing: border-box; position: fixed; \
                 border: {}px solid #666; background-color: #fff; display: flex; \
                 flex-direction: column; z-index: {};",
                config.title_bar_height, config.border_width, config.z_index_baseline
            ),
        )?;

        let title_bar = doc.create_element("div");
        doc.set_class_name(title_bar, CLASS_TITLE)?;
        doc.set_style_text(
            title_bar,
            &format!(
                "height: {}px; flex-shrink: 0; display: flex; align-items: center; \
                 justify-content: center; position: relative; user-select: none; cursor: move;",
                config.title_bar_height
            ),
        )?;
        doc.set_attribute(title_bar, "draggable", "false")?;
        let title_label = doc.create_text_element("span", name);
        doc.append_child(title_bar, title_label)?;
        doc.append_child(shell, title_bar)?;

        let resize_handle = doc.create_element("div");
        doc.set_class_name(resize_handle, CLASS_RESIZE)?;
        doc.set_style_text(
            resize_handle,
            &format!(
                "width: {size}px; height: {size}px; position: absolute; right: 0px; \
                 bottom: 0px; cursor: se-resize; z-index: 9;",
                size = config.resize_handle_size
            ),
        )?;
        doc.append_child(shell, resize_handle)?;

        // Placeholder keeps the vacated footprint visible.
        let placeholder = doc.create_element("div");
        doc.set_class_name(placeholder, CLASS_PLACEHOLDER)?;
        doc.set_style_text(
            placeholder,
            &format!(
                "display: {}; margin: {};",
                placeholder_display(&original.display),
                original.margin.to_css()
            ),
        )?;
        let placeholder_label = doc.create_text_element("div", name);
        doc.set_class_name(placeholder_label, CLASS_PLACEHOLDER_LABEL)?;
        doc.set_style_text(
            placeholder_label,
            &format!(
                "width: {}px; height: {}px; padding: 5px; box-sizing: border-box; \
                 border: 5px dashed #eee; border-radius: 12px; font-weight: bolder; \
                 color: #eee; overflow-wrap: anywhere; display: flex; \
                 align-items: center; justify-content: center;",
                original.width, original.height
            ),
        )?;
        doc.append_child(placeholder, placeholder_label)?;
        doc.insert_before(original.parent, placeholder, target)?;
        doc.set_layout(placeholder, original.layout, original.offset_parent)?;
        doc.set_layout(
            placeholder_label,
            LayoutBox::new(0, 0, original.width, original.height),
            Some(placeholder),
        )?;

        let content_container = doc.create_element("div");
        doc.set_class_name(content_container, CLASS_CONTENT_CONTAINER)?;
        doc.set_style_text(content_container, "flex-grow: 1; overflow: auto;")?;
        doc.append_child(content_container, target)?;
        doc.set_style(target, "margin", "0px")?;
        // Baseline alignment would add a spurious scrollbar under inline content.
        doc.set_style(target, "vertical-align", "top")?;
        doc.append_child(shell, content_container)?;

        let (top, left, width, height) = shell_geometry(&original, config);
        doc.set_style(shell, "width", px(width))?;
        doc.set_style(shell, "height", px(height))?;
        doc.set_style(shell, "top", px(top))?;
        doc.set_style(shell, "left", px(left))?;

        let button_panel = doc.create_element("div");
        doc.set_class_name(button_panel, CLASS_BUTTON_PANEL)?;
        doc.set_style_text(
            button_panel,
            &format!(
                "position: absolute; right: 0px; display: flex; align-items: center; \
                 margin-right: {}px; cursor: default;",
                config.close_button_margin
            ),
        )?;
        let close_button = doc.create_element("span");
        doc.set_class_name(close_button, CLASS_CLOSE_BUTTON)?;
        doc.set_style_text(
            close_button,
            &format!(
                "width: {size}px; height: {size}px; display: flex; align-items: center;",
                size = config.close_button_size
            ),
        )?;
        doc.append_child(button_panel, close_button)?;
        doc.append_child(title_bar, button_panel)?;

        let mut window = Self {
            id,
            name: name.to_string(),
            shell,
            title_bar,
            title_label,
            button_panel,
            close_button,
            content_container,
            resize_handle,
            placeholder: Some(placeholder),
            placeholder_label: Some(placeholder_label),
            target,
            original,
            drag: DragController::new(),
            resize: ResizeController::new(config.min_width, config.min_height),
        };
        window.install_listeners(registry);
        window.sync_layout(doc, config)?;

        doc.set_attribute(target, FLOATING_MARKER, "")?;
        window.mount(doc, zorder)?;
        tracing::debug!(window = ?id, name, top, left, width, height, "opened window");
        Ok(window)
    }

    fn install_listeners(&mut self, registry: &mut ListenerRegistry) {
        let id = self.id;
        let node = EventTarget::Node;
        registry.add(
            node(self.shell),
            EventKind::PointerDown,
            Phase::Bubble,
            Listener::FocusWindow(id),
        );
        registry.add(
            node(self.title_bar),
            EventKind::PointerDown,
            Phase::Bubble,
            Listener::BeginDrag(id),
        );
        registry.add(
            node(self.resize_handle),
            EventKind::PointerDown,
            Phase::Bubble,
            Listener::BeginResize(id),
        );
        // Presses on the buttons must never start a drag.
        for kind in [EventKind::PointerDown, EventKind::PointerUp] {
            registry.add(
                node(self.button_panel),
                kind,
                Phase::Bubble,
                Listener::StopPropagation,
            );
        }
        registry.add(
            node(self.close_button),
            EventKind::Click,
            Phase::Bubble,
            Listener::CloseWindow(id),
        );
        registry.add(
            node(self.close_button),
            EventKind::Click,
            Phase::Bubble,
            Listener::StopPropagation,
        );
    }

    fn mount(&mut self, doc: &mut Document, zorder: &mut ZOrder) -> Result<i64, DomError> {
        doc.append_child(doc.body(), self.shell)?;
        zorder.bring_to_front(doc, self.shell)
    }

    /// Lay out the chrome from the shell's current size. Chrome offsets are
    /// measured from the shell's outer edge.
    pub(crate) fn sync_layout(
        &self,
        doc: &mut Document,
        config: &PopoutConfig,
    ) -> Result<(), DomError> {
        let width = doc.offset_width(self.shell);
        let height = doc.offset_height(self.shell);
        let border = config.border_width;
        let title = config.title_bar_height;
        let inner_width = (width - 2 * border).max(0);
        let inner_height = (height - 2 * border - title).max(0);
        let close = config.close_button_size;
        let handle = config.resize_handle_size;

        doc.set_layout(
            self.title_bar,
            LayoutBox::new(border, border, inner_width, title),
            Some(self.shell),
        )?;
        doc.set_layout(
            self.title_label,
            LayoutBox::new(0, 0, inner_width, title),
            Some(self.title_bar),
        )?;
        doc.set_layout(
            self.button_panel,
            LayoutBox::new(
                ((title - close) / 2).max(0),
                inner_width - config.close_button_margin - close,
                close,
                close,
            ),
            Some(self.title_bar),
        )?;
        doc.set_layout(
            self.close_button,
            LayoutBox::new(0, 0, close, close),
            Some(self.button_panel),
        )?;
        doc.set_layout(
            self.content_container,
            LayoutBox::new(border + title, border, inner_width, inner_height),
            Some(self.shell),
        )?;
        doc.set_layout(
            self.resize_handle,
            LayoutBox::new(height - border - handle, width - border - handle, handle, handle),
            Some(self.shell),
        )?;
        doc.set_layout(
            self.target,
            LayoutBox {
                offset_top: 0,
                offset_left: 0,
                width: self.original.width,
                height: self.original.height,
                client_width: self.original.layout.client_width,
            },
            Some(self.content_container),
        )?;
        Ok(())
    }

    /// Dock the element again and tear the shell down.
    ///
    /// Nothing is changed unless the placeholder still sits under the
    /// element's original parent.
    pub(crate) fn close(
        &mut self,
        doc: &mut Document,
        registry: &mut ListenerRegistry,
    ) -> Result<(), PopoutError> {
        let placeholder = self
            .placeholder
            .ok_or(PopoutError::Dom(DomError::Detached(self.target)))?;
        let parent = self.original.parent;
        if doc.parent(placeholder) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                reference: placeholder,
            }
            .into());
        }

        doc.insert_before(parent, self.target, placeholder)?;
        doc.set_style(self.target, "margin", self.original.margin.to_css())?;
        if self.original.vertical_align.is_empty() {
            doc.remove_style(self.target, "vertical-align")?;
        } else {
            doc.set_style(self.target, "vertical-align", self.original.vertical_align.clone())?;
        }
        doc.set_layout(self.target, self.original.layout, self.original.offset_parent)?;
        doc.remove_child(parent, placeholder)?;
        doc.release(placeholder)?;
        if doc.parent(self.shell).is_some() {
            doc.remove(self.shell)?;
        }

        self.drag.release(registry);
        self.resize.release(registry);
        for node in self.chrome_nodes() {
            registry.remove_all_for(EventTarget::Node(node));
        }
        doc.release(self.shell)?;
        self.placeholder = None;
        self.placeholder_label = None;
        doc.remove_attribute(self.target, FLOATING_MARKER)?;
        tracing::debug!(window = ?self.id, name = %self.name, "closed window");
        Ok(())
    }

    fn chrome_nodes(&self) -> [NodeId; 7] {
        [
            self.shell,
            self.title_bar,
            self.title_label,
            self.button_panel,
            self.close_button,
            self.content_container,
            self.resize_handle,
        ]
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shell(&self) -> NodeId {
        self.shell
    }

    pub fn title_bar(&self) -> NodeId {
        self.title_bar
    }

    pub fn close_button(&self) -> NodeId {
        self.close_button
    }

    pub fn content_container(&self) -> NodeId {
        self.content_container
    }

    pub fn resize_handle(&self) -> NodeId {
        self.resize_handle
    }

    pub fn placeholder(&self) -> Option<NodeId> {
        self.placeholder
    }

    pub fn placeholder_label(&self) -> Option<NodeId> {
        self.placeholder_label
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn original_layout(&self) -> &OriginalLayout {
        &self.original
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn resize(&self) -> &ResizeController {
        &self.resize
    }

    pub(crate) fn controllers_mut(&mut self) -> (&mut DragController, &mut ResizeController) {
        (&mut self.drag, &mut self.resize)
    }
}
