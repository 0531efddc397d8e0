use alloc::vec::Vec;
use core::fmt;

use draglist::{
    ConfigError, DragEvent, DragItem, DropEffect, EventKind, GlobalDragCoordinator, Host,
    ListConfig, ListDragController, Notification, Record, inject_styles,
};

/// Lifecycle failures reported back to the binding.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("container is already mounted")]
    AlreadyMounted,
    #[error("container is not mounted")]
    NotMounted,
}

/// What [`DragListDirective::on_update`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The list is mid-drag; the update was dropped. The binding re-renders after drag-end.
    Deferred,
    /// The new configuration equals the old one.
    Unchanged,
    Reconfigured,
}

/// The combined result of bubbling one event through every mounted list on its path.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch<N, T> {
    pub default_prevented: bool,
    pub effect_allowed: Option<DropEffect>,
    /// Notifications to fire, paired with the container they are scoped to (innermost first).
    pub notifications: Vec<(N, Notification<T>)>,
}

impl<N, T> Default for Dispatch<N, T> {
    fn default() -> Self {
        Self {
            default_prevented: false,
            effect_allowed: None,
            notifications: Vec::new(),
        }
    }
}

struct Mounted<N, T> {
    controller: ListDragController<N, T>,
    /// Unmount arrived mid-drag; tear down once the gesture ends.
    teardown_pending: bool,
}

/// A framework-neutral drag-list directive.
///
/// This type does not hold any UI objects beyond node handles. Bindings drive it by calling:
/// - `on_mount` / `on_update` / `on_unmount` from the framework's lifecycle hooks
/// - `dispatch` for every raw gesture event a wired container receives
/// - `run_macrotasks` after each event task, `on_animation_frame` each frame, `tick` from a timer
///   and `on_transition_end` when a `transitionend` fires
///
/// It owns the document's [`GlobalDragCoordinator`], so every list mounted through one directive
/// shares window-level suppression and drag ownership.
pub struct DragListDirective<N, T = Record> {
    coordinator: GlobalDragCoordinator,
    lists: Vec<Mounted<N, T>>,
}

impl<N: fmt::Debug, T> fmt::Debug for DragListDirective<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragListDirective")
            .field("coordinator", &self.coordinator)
            .field("lists", &self.lists.len())
            .finish()
    }
}

impl<N, T> Default for DragListDirective<N, T>
where
    N: Clone + PartialEq + fmt::Debug,
    T: DragItem + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, T> DragListDirective<N, T>
where
    N: Clone + PartialEq + fmt::Debug,
    T: DragItem + PartialEq,
{
    pub fn new() -> Self {
        Self {
            coordinator: GlobalDragCoordinator::new(),
            lists: Vec::new(),
        }
    }

    pub fn coordinator(&self) -> &GlobalDragCoordinator {
        &self.coordinator
    }

    pub fn controller(&self, container: &N) -> Option<&ListDragController<N, T>> {
        self.position(container).map(|i| &self.lists[i].controller)
    }

    pub fn is_mounted(&self, container: &N) -> bool {
        self.position(container).is_some()
    }

    pub fn mounted_count(&self) -> usize {
        self.lists.len()
    }

    fn position(&self, container: &N) -> Option<usize> {
        self.lists
            .iter()
            .position(|m| m.controller.container() == container)
    }

    pub fn on_mount<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        container: N,
        config: ListConfig<T>,
    ) -> Result<(), DirectiveError> {
        if self.is_mounted(&container) {
            return Err(DirectiveError::AlreadyMounted);
        }
        inject_styles(host);
        let controller =
            ListDragController::activate(host, &mut self.coordinator, container, config)?;
        adebug!(list = ?controller.list_id(), "DragListDirective::on_mount");
        self.lists.push(Mounted {
            controller,
            teardown_pending: false,
        });
        Ok(())
    }

    pub fn on_update<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        container: &N,
        new: ListConfig<T>,
        old: &ListConfig<T>,
    ) -> Result<UpdateOutcome, DirectiveError> {
        let i = self.position(container).ok_or(DirectiveError::NotMounted)?;
        let controller = &mut self.lists[i].controller;
        // Reinitialising mid-drag would reset the drag node and leave it hidden after drop.
        if controller.is_dragging() {
            return Ok(UpdateOutcome::Deferred);
        }
        controller.clear_dragging_class(host);
        if new == *old {
            return Ok(UpdateOutcome::Unchanged);
        }
        if controller.reconfigure(host, &mut self.coordinator, new)? {
            adebug!(list = ?controller.list_id(), "DragListDirective::on_update: reconfigured");
            Ok(UpdateOutcome::Reconfigured)
        } else {
            Ok(UpdateOutcome::Deferred)
        }
    }

    /// Tears the list down, or marks it for teardown at drag-end if a drag is in flight.
    ///
    /// Returns `true` if the list was removed now.
    pub fn on_unmount<H: Host<Node = N>>(&mut self, host: &mut H, container: &N) -> bool {
        let Some(i) = self.position(container) else {
            return false;
        };
        let mounted = &mut self.lists[i];
        if mounted.controller.is_dragging() {
            adebug!(
                list = ?mounted.controller.list_id(),
                "DragListDirective::on_unmount: deferred"
            );
            mounted.teardown_pending = true;
            return false;
        }
        mounted.controller.deactivate(host, &mut self.coordinator);
        self.lists.remove(i);
        true
    }

    /// Delivers `event` to every mounted list between its target and the document root,
    /// innermost first, as DOM bubbling would.
    pub fn dispatch<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        event: &DragEvent<N>,
    ) -> Dispatch<N, T> {
        let mut out = Dispatch::default();

        let mut path = Vec::new();
        let mut cur = Some(event.target.clone());
        while let Some(n) = cur {
            cur = host.parent(&n);
            path.push(n);
        }

        for node in &path {
            let Some(i) = self.position(node) else {
                continue;
            };
            let response = self.lists[i]
                .controller
                .handle_event(host, &mut self.coordinator, event);
            out.default_prevented |= response.default_prevented;
            if out.effect_allowed.is_none() {
                out.effect_allowed = response.effect_allowed;
            }
            if let Some(n) = response.notification {
                atrace!(event = n.event_name(), "DragListDirective::dispatch: notification");
                out.notifications.push((node.clone(), n));
            }
        }

        // Window-level listeners see the event last.
        if self.coordinator.is_suppressing() && event.kind.is_window_suppressed() {
            out.default_prevented = true;
        }

        if event.kind == EventKind::DragEnd {
            self.finish_pending_teardown(host);
        }
        out
    }

    fn finish_pending_teardown<H: Host<Node = N>>(&mut self, host: &mut H) {
        let coordinator = &mut self.coordinator;
        self.lists.retain_mut(|m| {
            if !m.teardown_pending || m.controller.is_dragging() {
                return true;
            }
            adebug!(list = ?m.controller.list_id(), "DragListDirective: deferred teardown");
            m.controller.deactivate(host, coordinator);
            false
        });
    }

    pub fn run_macrotasks<H: Host<Node = N>>(&mut self, host: &mut H) {
        for m in &mut self.lists {
            m.controller.run_macrotasks(host);
        }
    }

    pub fn on_animation_frame<H: Host<Node = N>>(&mut self, host: &mut H, now_ms: u64) {
        for m in &mut self.lists {
            m.controller.on_animation_frame(host, now_ms);
        }
    }

    /// Returns `true` if some list's animation finished because of this notification.
    pub fn on_transition_end<H: Host<Node = N>>(&mut self, host: &mut H, node: &N) -> bool {
        let mut done = false;
        for m in &mut self.lists {
            done |= m.controller.on_transition_end(host, node);
        }
        done
    }

    pub fn tick<H: Host<Node = N>>(&mut self, host: &mut H, now_ms: u64) {
        for m in &mut self.lists {
            m.controller.tick(host, now_ms);
        }
    }
}
