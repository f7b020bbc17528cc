//! The `Popout` service: one per document.
//!
//! Owns the document, the listener registry, every open window, the hover
//! bindings and the shared stacking counter. Hosts feed it pointer input in
//! viewport coordinates and call [`Popout::tick`] on idle so the trigger can
//! auto-hide. Nothing here is global, so tests build isolated instances.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::PopoutConfig;
use crate::constants::FLOATING_MARKER;
use crate::dom::{Document, NodeId};
use crate::error::PopoutError;
use crate::events::{
    EventKind, EventTarget, Listener, ListenerRegistry, Phase, PointerEvent, dispatch_stages,
    propagation_path,
};
use crate::trigger::{BindingId, HoverTrigger};
use crate::window::{FloatingWindow, WindowId};
use crate::zorder::ZOrder;

/// What a dispatched pointer event did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// At least one listener ran.
    pub handled: bool,
    /// A listener asked the host to suppress its default action.
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl DispatchOutcome {
    fn merge(&mut self, other: DispatchOutcome) {
        self.handled |= other.handled;
        self.default_prevented |= other.default_prevented;
    }
}

#[derive(Debug, Default, Clone)]
struct PointerState {
    /// Hovered node and its ancestors, outermost first.
    hovered: Vec<NodeId>,
    pressed: Option<NodeId>,
}

#[derive(Debug)]
pub struct Popout {
    doc: Document,
    config: PopoutConfig,
    registry: ListenerRegistry,
    zorder: ZOrder,
    windows: BTreeMap<WindowId, FloatingWindow>,
    next_window: u64,
    trigger: HoverTrigger,
    pointer: PointerState,
}

impl Popout {
    pub fn new(doc: Document, config: PopoutConfig) -> Self {
        Self {
            doc,
            zorder: ZOrder::new(config.z_index_baseline, config.z_index_ceiling),
            trigger: HoverTrigger::new(&config),
            config,
            registry: ListenerRegistry::new(),
            windows: BTreeMap::new(),
            next_window: 0,
            pointer: PointerState::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for the host's own layout and content updates.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn config(&self) -> &PopoutConfig {
        &self.config
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn trigger(&self) -> &HoverTrigger {
        &self.trigger
    }

    /// Mount hook: attach the hover trigger to `target`.
    pub fn bind(&mut self, target: NodeId, name: &str) -> Result<BindingId, PopoutError> {
        self.trigger
            .bind(&mut self.doc, &mut self.registry, target, name)
    }

    /// Float `target` in a new window titled `name`.
    pub fn open(&mut self, target: NodeId, name: &str) -> Result<WindowId, PopoutError> {
        let id = WindowId::from_index(self.next_window);
        let window = FloatingWindow::open(
            &mut self.doc,
            &mut self.registry,
            &mut self.zorder,
            &self.config,
            id,
            target,
            name,
        )?;
        self.next_window += 1;
        self.windows.insert(id, window);
        Ok(id)
    }

    /// Dock the window's element again and drop the window.
    pub fn close(&mut self, id: WindowId) -> Result<(), PopoutError> {
        let window = self
            .windows
            .get_mut(&id)
            .ok_or(PopoutError::UnknownWindow(id))?;
        let (shell, target) = (window.shell(), window.target());
        let in_shell: Vec<NodeId> = self
            .pointer
            .hovered
            .iter()
            .chain(self.pointer.pressed.iter())
            .copied()
            .filter(|&n| {
                self.doc
                    .ancestors(n)
                    .take_while(|&a| a != target)
                    .any(|a| a == shell)
            })
            .collect();
        window.close(&mut self.doc, &mut self.registry)?;
        self.windows.remove(&id);
        // Chrome slots are released; forget any pointer state inside them.
        self.pointer.hovered.retain(|n| !in_shell.contains(n));
        if self.pointer.pressed.is_some_and(|n| in_shell.contains(&n)) {
            self.pointer.pressed = None;
        }
        Ok(())
    }

    pub fn window(&self, id: WindowId) -> Option<&FloatingWindow> {
        self.windows.get(&id)
    }

    /// Open windows in creation order.
    pub fn windows(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn window_for_target(&self, target: NodeId) -> Option<WindowId> {
        self.windows
            .values()
            .find(|w| w.target() == target)
            .map(FloatingWindow::id)
    }

    pub fn window_for_shell(&self, shell: NodeId) -> Option<&FloatingWindow> {
        self.windows.values().find(|w| w.shell() == shell)
    }

    pub fn is_floating(&self, target: NodeId) -> bool {
        self.doc.has_attribute(target, FLOATING_MARKER)
    }

    pub fn bring_to_front(&mut self, id: WindowId) -> Result<i64, PopoutError> {
        let shell = self
            .windows
            .get(&id)
            .ok_or(PopoutError::UnknownWindow(id))?
            .shell();
        Ok(self.zorder.bring_to_front(&mut self.doc, shell)?)
    }

    pub fn stacking_value(&self, id: WindowId) -> Option<i64> {
        self.windows.get(&id).map(|w| self.doc.z_index(w.shell()))
    }

    /// Last value the shared counter handed out.
    pub fn stacking_counter(&self) -> i64 {
        self.zorder.current()
    }

    /// Windows from bottom to top.
    pub fn paint_order(&self) -> Vec<WindowId> {
        let mut ids = self.windows();
        ids.sort_by_key(|id| self.stacking_value(*id).unwrap_or_default());
        ids
    }

    /// Re-run chrome layout for every window, e.g. after the host changed
    /// shell styles directly.
    pub fn sync_layout(&mut self) -> Result<(), PopoutError> {
        for window in self.windows.values() {
            window.sync_layout(&mut self.doc, &self.config)?;
        }
        Ok(())
    }

    // Input

    pub fn pointer_move(
        &mut self,
        x: i32,
        y: i32,
        now: Instant,
    ) -> Result<DispatchOutcome, PopoutError> {
        let hit = self.doc.hit_test(x, y);
        let chain: Vec<NodeId> = match hit {
            Some(node) => {
                let mut chain: Vec<NodeId> = self.doc.ancestors(node).collect();
                chain.reverse();
                chain
            }
            None => Vec::new(),
        };
        let entered: Vec<NodeId> = chain
            .iter()
            .copied()
            .filter(|n| !self.pointer.hovered.contains(n))
            .collect();
        self.pointer.hovered = chain;

        let mut outcome = DispatchOutcome::default();
        for node in entered {
            let event = PointerEvent::new(EventKind::PointerEnter, x, y);
            outcome.merge(self.dispatch_at(event, EventTarget::Node(node), now)?);
        }
        let event = PointerEvent::new(EventKind::PointerMove, x, y);
        outcome.merge(self.dispatch(event, hit, now)?);
        Ok(outcome)
    }

    pub fn pointer_down(
        &mut self,
        x: i32,
        y: i32,
        now: Instant,
    ) -> Result<DispatchOutcome, PopoutError> {
        let hit = self.doc.hit_test(x, y);
        self.pointer.pressed = hit;
        self.dispatch(PointerEvent::new(EventKind::PointerDown, x, y), hit, now)
    }

    /// Pointer release; synthesizes a click when released over the node that
    /// was pressed.
    pub fn pointer_up(
        &mut self,
        x: i32,
        y: i32,
        now: Instant,
    ) -> Result<DispatchOutcome, PopoutError> {
        let hit = self.doc.hit_test(x, y);
        let pressed = self.pointer.pressed.take();
        let mut outcome = self.dispatch(PointerEvent::new(EventKind::PointerUp, x, y), hit, now)?;
        if let Some(node) = hit
            && pressed == Some(node)
            && self.doc.contains(node)
        {
            outcome.merge(self.dispatch(PointerEvent::new(EventKind::Click, x, y), hit, now)?);
        }
        Ok(outcome)
    }

    /// Fire timers that are due.
    pub fn tick(&mut self, now: Instant) -> Result<bool, PopoutError> {
        Ok(self.trigger.tick(&mut self.doc, now)?)
    }

    /// Run `event` along the propagation path of `target`. Events that hit
    /// nothing are delivered to the document alone.
    pub fn dispatch(
        &mut self,
        event: PointerEvent,
        target: Option<NodeId>,
        now: Instant,
    ) -> Result<DispatchOutcome, PopoutError> {
        let path = match target {
            Some(node) => propagation_path(&self.doc, node),
            None => vec![EventTarget::Document],
        };
        let mut outcome = DispatchOutcome::default();
        for stage in dispatch_stages(&path) {
            for &phase in stage.phases {
                self.run_listeners(event, stage.target, phase, now, &mut outcome)?;
            }
            if outcome.propagation_stopped {
                break;
            }
        }
        Ok(outcome)
    }

    /// Run the listeners of a single node, without propagation.
    fn dispatch_at(
        &mut self,
        event: PointerEvent,
        target: EventTarget,
        now: Instant,
    ) -> Result<DispatchOutcome, PopoutError> {
        let mut outcome = DispatchOutcome::default();
        for phase in [Phase::Capture, Phase::Bubble] {
            self.run_listeners(event, target, phase, now, &mut outcome)?;
        }
        Ok(outcome)
    }

    fn run_listeners(
        &mut self,
        event: PointerEvent,
        target: EventTarget,
        phase: Phase,
        now: Instant,
        outcome: &mut DispatchOutcome,
    ) -> Result<(), PopoutError> {
        for listener in self.registry.listeners_for(target, event.kind, phase) {
            outcome.handled = true;
            self.run(listener, event, now, outcome)?;
        }
        Ok(())
    }

    fn run(
        &mut self,
        listener: Listener,
        event: PointerEvent,
        now: Instant,
        outcome: &mut DispatchOutcome,
    ) -> Result<(), PopoutError> {
        match listener {
            Listener::StopPropagation => outcome.propagation_stopped = true,
            Listener::FocusWindow(id) => {
                // The window may have closed earlier in this dispatch.
                if self.windows.contains_key(&id) {
                    self.bring_to_front(id)?;
                }
            }
            Listener::BeginDrag(id) => {
                if let Some(window) = self.windows.get_mut(&id) {
                    let shell = window.shell();
                    let (drag, _) = window.controllers_mut();
                    drag.press(&self.doc, &mut self.registry, id, shell, event);
                }
            }
            Listener::TrackDrag(id) => {
                if let Some(window) = self.windows.get(&id)
                    && window.drag().track(&mut self.doc, window.shell(), event)?
                {
                    window.sync_layout(&mut self.doc, &self.config)?;
                }
            }
            Listener::EndDrag(id) => {
                if let Some(window) = self.windows.get_mut(&id) {
                    let (drag, _) = window.controllers_mut();
                    drag.release(&mut self.registry);
                }
            }
            Listener::BeginResize(id) => {
                if let Some(window) = self.windows.get_mut(&id) {
                    let shell = window.shell();
                    let (_, resize) = window.controllers_mut();
                    resize.press(&mut self.doc, &mut self.registry, id, shell, event)?;
                }
            }
            Listener::TrackResize(id) => {
                if let Some(window) = self.windows.get(&id)
                    && window.resize().track(&mut self.doc, window.shell(), event)?
                {
                    outcome.default_prevented = true;
                    window.sync_layout(&mut self.doc, &self.config)?;
                }
            }
            Listener::EndResize(id) => {
                if let Some(window) = self.windows.get_mut(&id) {
                    let (_, resize) = window.controllers_mut();
                    resize.release(&mut self.registry);
                }
            }
            Listener::CloseWindow(id) => {
                if self.windows.contains_key(&id) {
                    self.close(id)?;
                }
            }
            Listener::ShowTrigger(binding) => {
                self.trigger
                    .show_for(&mut self.doc, &mut self.registry, binding, now)?;
            }
            Listener::OpenWindow(binding) => {
                let (target, name) = match self.trigger.binding(binding) {
                    Some(b) => (b.target, b.name.clone()),
                    None => return Err(PopoutError::UnknownBinding(binding)),
                };
                self.trigger.hide(&mut self.doc)?;
                if !self.is_floating(target) {
                    self.open(target, &name)?;
                }
            }
        }
        Ok(())
    }
}
