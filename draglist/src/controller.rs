use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::{
    ConfigError, DRAGGABLE_ATTR, DRAGGING_CLASS, DragEndDetail, DragEvent, DragItem, DropEffect,
    EventKind, EventResponse, FlipSession, GlobalDragCoordinator, Host, ITEM_ID_ATTR,
    LIST_ID_ATTR, ListConfig, ListId, Notification, Record, reconcile, resolve_dragged,
};

/// Where a controller is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Not wired: dragging is disabled or the list was deactivated.
    Inactive,
    Idle,
    Dragging,
}

/// "Add the dragging class to `node`", queued as a macrotask so the browser snapshots the drag
/// image before the element is hidden.
#[derive(Clone, Debug)]
struct DeferredClass<N> {
    node: N,
    gesture: u64,
}

/// The per-container drag state machine.
///
/// One controller exists per mounted list container. It does not hold any UI objects beyond node
/// handles; the adapter drives it by calling:
/// - [`ListDragController::handle_event`] for every raw gesture event that reaches the container
/// - [`ListDragController::run_macrotasks`] once the current task has finished
/// - [`ListDragController::on_animation_frame`], [`ListDragController::on_transition_end`] and
///   [`ListDragController::tick`] to advance FLIP animations
///
/// Configuration changes and teardown are refused while a drag is in flight; the dragged element
/// would otherwise be left hidden by a stale deferred callback.
pub struct ListDragController<N, T = Record> {
    container: N,
    config: ListConfig<T>,
    list_id: Option<ListId>,
    dragging: bool,
    current_drag_node: Option<N>,
    drag_allowed: bool,
    click_target: Option<N>,
    flip: Option<FlipSession<N>>,
    gesture: u64,
    macrotasks: Vec<DeferredClass<N>>,
}

impl<N: fmt::Debug, T> fmt::Debug for ListDragController<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListDragController")
            .field("container", &self.container)
            .field("list_id", &self.list_id)
            .field("dragging", &self.dragging)
            .field("current_drag_node", &self.current_drag_node)
            .field("drag_allowed", &self.drag_allowed)
            .field("gesture", &self.gesture)
            .finish_non_exhaustive()
    }
}

impl<N, T> ListDragController<N, T>
where
    N: Clone + PartialEq + fmt::Debug,
    T: DragItem,
{
    /// Validates `config` and attaches a controller to `container`.
    ///
    /// The controller is wired immediately when dragging is enabled; otherwise it stays
    /// [`Phase::Inactive`] until reconfigured.
    pub fn activate<H: Host<Node = N>>(
        host: &mut H,
        coordinator: &mut GlobalDragCoordinator,
        container: N,
        config: ListConfig<T>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut c = Self {
            container,
            config,
            list_id: None,
            dragging: false,
            current_drag_node: None,
            drag_allowed: false,
            click_target: None,
            flip: None,
            gesture: 0,
            macrotasks: Vec::new(),
        };
        c.clear_dragging_class(host);
        if c.config.dragging_enabled {
            c.wire(host, coordinator);
        }
        Ok(c)
    }

    /// Replaces the configuration.
    ///
    /// Returns `Ok(false)` without touching anything while a drag is in flight. Otherwise the
    /// list is fully unwired and, if the new configuration enables dragging, wired again under a
    /// fresh [`ListId`].
    pub fn reconfigure<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        coordinator: &mut GlobalDragCoordinator,
        config: ListConfig<T>,
    ) -> Result<bool, ConfigError> {
        if self.dragging {
            ddebug!(
                list = ?self.list_id,
                "ListDragController::reconfigure: skipped while dragging"
            );
            return Ok(false);
        }
        config.validate()?;
        self.unwire(host, coordinator);
        self.config = config;
        if self.config.dragging_enabled {
            self.wire(host, coordinator);
        } else {
            set_children_draggable(host, &self.container, false);
        }
        Ok(true)
    }

    /// Unwires the list and releases its hold on the window-level suppression.
    ///
    /// Returns `false` when nothing was done: the list is mid-drag (retry after drag-end) or was
    /// never wired / already deactivated.
    pub fn deactivate<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        coordinator: &mut GlobalDragCoordinator,
    ) -> bool {
        if self.dragging {
            ddebug!(
                list = ?self.list_id,
                "ListDragController::deactivate: deferred while dragging"
            );
            return false;
        }
        self.unwire(host, coordinator)
    }

    fn wire<H: Host<Node = N>>(&mut self, host: &mut H, coordinator: &mut GlobalDragCoordinator) {
        let id = coordinator.allocate_list_id();
        host.set_attribute(&self.container, LIST_ID_ATTR, &id.attr_value());
        set_children_draggable(host, &self.container, true);
        host.listen(&self.container, &EventKind::CONTAINER);
        coordinator.acquire(host);

        self.list_id = Some(id);
        self.current_drag_node = None;
        self.drag_allowed = false;
        self.click_target = None;
        ddebug!(
            list = %id,
            handle_mode = self.config.is_handle_mode(),
            "ListDragController: wired"
        );
    }

    fn unwire<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        coordinator: &mut GlobalDragCoordinator,
    ) -> bool {
        let Some(id) = self.list_id.take() else {
            return false;
        };
        host.unlisten(&self.container, &EventKind::CONTAINER);
        coordinator.release(host);
        coordinator.unclaim(id);

        self.clear_dragging_class(host);
        set_children_draggable(host, &self.container, false);
        host.remove_attribute(&self.container, LIST_ID_ATTR);

        if let Some(mut flip) = self.flip.take() {
            flip.finish_now(host);
        }
        self.macrotasks.clear();
        self.dragging = false;
        self.current_drag_node = None;
        self.drag_allowed = false;
        self.click_target = None;
        ddebug!(list = %id, "ListDragController: unwired");
        true
    }

    pub fn container(&self) -> &N {
        &self.container
    }

    pub fn config(&self) -> &ListConfig<T> {
        &self.config
    }

    pub fn list_id(&self) -> Option<ListId> {
        self.list_id
    }

    pub fn phase(&self) -> Phase {
        match (self.list_id, self.dragging) {
            (None, _) => Phase::Inactive,
            (Some(_), false) => Phase::Idle,
            (Some(_), true) => Phase::Dragging,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_drag_allowed(&self) -> bool {
        self.drag_allowed
    }

    pub fn current_drag_node(&self) -> Option<&N> {
        self.current_drag_node.as_ref()
    }

    /// The element the last in-list pointer-down landed on.
    pub fn click_target(&self) -> Option<&N> {
        self.click_target.as_ref()
    }

    pub fn flip(&self) -> Option<&FlipSession<N>> {
        self.flip.as_ref()
    }

    pub fn has_pending_macrotasks(&self) -> bool {
        !self.macrotasks.is_empty()
    }

    /// Removes the dragging class from every direct child.
    pub fn clear_dragging_class<H: Host<Node = N>>(&self, host: &mut H) {
        for child in host.children(&self.container) {
            if host.has_class(&child, DRAGGING_CLASS) {
                host.remove_class(&child, DRAGGING_CLASS);
            }
        }
    }

    /// Handles one raw event that reached this container (directly or by bubbling).
    pub fn handle_event<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        coordinator: &mut GlobalDragCoordinator,
        event: &DragEvent<N>,
    ) -> EventResponse<T> {
        let Some(id) = self.list_id else {
            return EventResponse::ignored();
        };
        dtrace!(list = %id, kind = event.kind.dom_name(), "ListDragController::handle_event");
        match event.kind {
            EventKind::PointerDown => self.on_pointer_down(host, id, &event.target),
            EventKind::DragStart => self.on_drag_start(host, coordinator, id, &event.target),
            EventKind::DragEnter => self.on_drag_enter(host, coordinator, id, &event.target),
            EventKind::DragEnd => self.on_drag_end(host, coordinator, id),
            EventKind::DragOver | EventKind::Drop => EventResponse::prevented(),
        }
    }

    fn on_pointer_down<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        id: ListId,
        target: &N,
    ) -> EventResponse<T> {
        // Every press starts a fresh gesture; a press owned by a nested list must not inherit an
        // earlier handle grab.
        self.drag_allowed = false;
        self.click_target = None;
        if !self.owns(host, id, target) {
            return EventResponse::ignored();
        }
        self.click_target = Some(target.clone());

        // Native dragstart cannot be vetoed from mousedown, so the decision is made here and
        // checked when dragstart arrives.
        if let Some(handle) = self.config.handle_class() {
            self.drag_allowed = match self.item_of(host, target) {
                Some(item) if target != &self.container => {
                    has_class_up_to(host, target, &item, handle)
                }
                _ => false,
            };
            dtrace!(list = %id, allowed = self.drag_allowed, "ListDragController: pointer-down");
        }
        EventResponse::ignored()
    }

    fn on_drag_start<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        coordinator: &mut GlobalDragCoordinator,
        id: ListId,
        target: &N,
    ) -> EventResponse<T> {
        if !self.owns(host, id, target) {
            return EventResponse::ignored();
        }
        if self.config.is_handle_mode() && !self.drag_allowed {
            ddebug!(list = %id, "ListDragController: drag-start outside handle cancelled");
            return EventResponse::prevented();
        }
        let Some(item) = self.item_of(host, target) else {
            return EventResponse::ignored();
        };

        if let Some(mut previous) = self.flip.take() {
            previous.finish_now(host);
        }

        // A live text selection corrupts the drag image in some browsers.
        host.clear_selection();

        coordinator.claim(id);
        self.dragging = true;
        self.gesture += 1;

        let children = host.children(&self.container);
        self.flip = Some(FlipSession::capture(
            host,
            children,
            Some(&item),
            self.config.flip,
        ));
        self.macrotasks.push(DeferredClass {
            node: item.clone(),
            gesture: self.gesture,
        });
        self.current_drag_node = Some(item);
        ddebug!(list = %id, gesture = self.gesture, "ListDragController: drag started");

        EventResponse {
            default_prevented: false,
            effect_allowed: Some(DropEffect::Move),
            notification: Some(Notification::DragModeStart { is_dragging: true }),
        }
    }

    fn on_drag_enter<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        coordinator: &GlobalDragCoordinator,
        id: ListId,
        target: &N,
    ) -> EventResponse<T> {
        let response = EventResponse::prevented();
        if coordinator.is_owned_by_other(id) {
            return response;
        }
        let Some(dragged) = self.current_drag_node.clone() else {
            return response;
        };
        let Some(hovered) = self.hovered_item(host, target) else {
            return response;
        };
        if hovered == dragged {
            return response;
        }

        let children = host.children(&self.container);
        let (Some(source), Some(dest)) = (
            children.iter().position(|c| c == &dragged),
            children.iter().position(|c| c == &hovered),
        ) else {
            return response;
        };

        if source < dest {
            let after = children.get(dest + 1);
            host.insert_before(&self.container, &dragged, after);
        } else {
            host.insert_before(&self.container, &dragged, Some(&hovered));
        }
        dtrace!(list = %id, from = source, to = dest, "ListDragController: reordered");

        if let Some(flip) = &mut self.flip {
            flip.play(host);
        }
        response
    }

    fn on_drag_end<H: Host<Node = N>>(
        &mut self,
        host: &mut H,
        coordinator: &mut GlobalDragCoordinator,
        id: ListId,
    ) -> EventResponse<T> {
        let mut response = EventResponse::prevented();

        if let Some(node) = self.current_drag_node.take() {
            host.remove_class(&node, DRAGGING_CLASS);

            let ids = host
                .children(&self.container)
                .iter()
                .filter_map(|child| host.attribute(child, ITEM_ID_ATTR))
                .filter(|id| !id.is_empty())
                .collect::<Vec<String>>();
            let updated_data = reconcile(ids, &self.config.items);
            let dragged_id = host.attribute(&node, ITEM_ID_ATTR);
            let dragged_item_data = resolve_dragged(&updated_data, dragged_id.as_deref());
            ddebug!(
                list = %id,
                len = updated_data.len(),
                resolved = dragged_item_data.is_some(),
                "ListDragController: drag ended"
            );
            response.notification = Some(Notification::DragModeEnd(DragEndDetail {
                updated_data,
                dragged_item_data,
            }));
        }

        self.dragging = false;
        self.drag_allowed = false;
        self.click_target = None;
        coordinator.unclaim(id);
        response
    }

    /// Runs deferred work queued during the last task.
    ///
    /// A queued dragging-class application only takes effect if the gesture that queued it is
    /// still in flight. After a drag-end (or a drag-end followed by a new drag-start) it is
    /// dropped.
    pub fn run_macrotasks<H: Host<Node = N>>(&mut self, host: &mut H) {
        for task in core::mem::take(&mut self.macrotasks) {
            let live = self.dragging
                && task.gesture == self.gesture
                && self.current_drag_node.as_ref() == Some(&task.node);
            if live {
                host.add_class(&task.node, DRAGGING_CLASS);
            } else {
                dtrace!(
                    gesture = task.gesture,
                    "ListDragController: stale dragging class discarded"
                );
            }
        }
    }

    pub fn on_animation_frame<H: Host<Node = N>>(&mut self, host: &mut H, now_ms: u64) {
        if let Some(flip) = &mut self.flip {
            flip.on_animation_frame(host, now_ms);
        }
    }

    pub fn on_transition_end<H: Host<Node = N>>(&mut self, host: &mut H, node: &N) -> bool {
        let done = match &mut self.flip {
            Some(flip) => flip.on_transition_end(host, node),
            None => false,
        };
        self.drop_idle_session();
        done
    }

    /// Fires due fallback timers.
    pub fn tick<H: Host<Node = N>>(&mut self, host: &mut H, now_ms: u64) {
        if let Some(flip) = &mut self.flip {
            flip.tick(host, now_ms);
        }
        self.drop_idle_session();
    }

    fn drop_idle_session(&mut self) {
        let idle = matches!(&self.flip, Some(flip) if !flip.is_animating());
        if idle && !self.dragging {
            self.flip = None;
        }
    }

    /// `true` if the nearest ownership attribute above `target` is this list's.
    fn owns<H: Host<Node = N>>(&self, host: &H, id: ListId, target: &N) -> bool {
        host.closest(target, |h, n| h.attribute(n, LIST_ID_ATTR).is_some())
            .and_then(|list| host.attribute(&list, LIST_ID_ATTR))
            .is_some_and(|value| value == id.attr_value())
    }

    fn item_of<H: Host<Node = N>>(&self, host: &H, target: &N) -> Option<N> {
        let class = self.config.item_class();
        host.closest(target, |h, n| h.has_class(n, class))
    }

    /// The direct child of the container under `target`, if it is an item.
    fn hovered_item<H: Host<Node = N>>(&self, host: &H, target: &N) -> Option<N> {
        let mut cur = target.clone();
        loop {
            if cur == self.container {
                return None;
            }
            let parent = host.parent(&cur)?;
            if parent == self.container {
                return host
                    .has_class(&cur, self.config.item_class())
                    .then_some(cur);
            }
            cur = parent;
        }
    }
}

/// Walks from `from` up to and including `stop`, looking for `class`.
fn has_class_up_to<H: Host>(host: &H, from: &H::Node, stop: &H::Node, class: &str) -> bool {
    let mut cur = Some(from.clone());
    while let Some(n) = cur {
        if host.has_class(&n, class) {
            return true;
        }
        if &n == stop {
            return false;
        }
        cur = host.parent(&n);
    }
    false
}

/// Toggles native draggability on every child carrying an item id.
fn set_children_draggable<H: Host>(host: &mut H, container: &H::Node, draggable: bool) {
    for child in host.children(container) {
        if host.attribute(&child, ITEM_ID_ATTR).is_none() {
            continue;
        }
        if draggable {
            host.set_attribute(&child, DRAGGABLE_ATTR, "true");
        } else {
            host.remove_attribute(&child, DRAGGABLE_ATTR);
        }
    }
}
