use crate::*;

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

type Controller = ListDragController<NodeId, Record>;

struct Fixture {
    dom: MemoryDom,
    coord: GlobalDragCoordinator,
    container: NodeId,
    items: Vec<NodeId>,
}

fn records(ids: &[i64]) -> Vec<Record> {
    ids.iter()
        .map(|&id| Record::new(id).with_field("label", alloc::format!("item {id}")))
        .collect()
}

fn build_list(dom: &mut MemoryDom, parent: NodeId, ids: &[i64]) -> (NodeId, Vec<NodeId>) {
    let container = dom.element(parent, "ul", "list");
    let items = ids
        .iter()
        .map(|id| dom.item(container, DEFAULT_ITEM_SELECTOR, &id.to_string()))
        .collect();
    (container, items)
}

fn fixture(ids: &[i64]) -> Fixture {
    let mut dom = MemoryDom::new();
    let root = dom.root();
    let (container, items) = build_list(&mut dom, root, ids);
    Fixture {
        dom,
        coord: GlobalDragCoordinator::new(),
        container,
        items,
    }
}

fn activate(f: &mut Fixture, config: ListConfig) -> Controller {
    ListDragController::activate(&mut f.dom, &mut f.coord, f.container, config).unwrap()
}

fn mount(
    dom: &mut MemoryDom,
    coord: &mut GlobalDragCoordinator,
    container: NodeId,
    ids: &[i64],
) -> Controller {
    ListDragController::activate(dom, coord, container, ListConfig::new(records(ids))).unwrap()
}

fn send(
    c: &mut Controller,
    f: &mut Fixture,
    kind: EventKind,
    target: NodeId,
) -> EventResponse<Record> {
    c.handle_event(&mut f.dom, &mut f.coord, &DragEvent::new(kind, target))
}

fn ids_of(updated: &[Record]) -> Vec<String> {
    updated.iter().map(|r| r.id.to_string()).collect()
}

fn end_detail(resp: EventResponse<Record>) -> DragEndDetail<Record> {
    match resp.notification {
        Some(Notification::DragModeEnd(detail)) => detail,
        other => panic!("expected drag-mode-end, got {other:?}"),
    }
}

#[test]
fn activate_marks_identified_children_draggable() {
    let mut f = fixture(&[1, 2, 3]);
    let stray = f.dom.element(f.container, "div", DEFAULT_ITEM_SELECTOR);
    let c = activate(&mut f, ListConfig::new(records(&[1, 2, 3])));

    assert_eq!(c.phase(), Phase::Idle);
    for item in &f.items {
        assert_eq!(f.dom.attribute(item, DRAGGABLE_ATTR).as_deref(), Some("true"));
    }
    assert_eq!(f.dom.attribute(&stray, DRAGGABLE_ATTR), None);
    assert_eq!(
        f.dom.attribute(&f.container, LIST_ID_ATTR),
        c.list_id().map(ListId::attr_value)
    );
    assert_eq!(f.dom.listeners(f.container).len(), EventKind::CONTAINER.len());
    assert!(f.dom.window_suppression());
    assert_eq!(f.coord.refcount(), 1);
}

#[test]
fn handle_mode_still_marks_children_draggable() {
    let mut f = fixture(&[1, 2]);
    let _c = activate(
        &mut f,
        ListConfig::new(records(&[1, 2])).with_handle_selector("grip"),
    );
    for item in &f.items {
        assert_eq!(f.dom.attribute(item, DRAGGABLE_ATTR).as_deref(), Some("true"));
    }
}

#[test]
fn disabled_config_leaves_list_inert() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(
        &mut f,
        ListConfig::new(records(&[1, 2])).with_dragging_enabled(false),
    );

    assert_eq!(c.phase(), Phase::Inactive);
    assert_eq!(c.list_id(), None);
    assert_eq!(f.coord.refcount(), 0);
    assert!(!f.dom.window_suppression());
    for item in &f.items {
        assert_eq!(f.dom.attribute(item, DRAGGABLE_ATTR), None);
    }

    let item = f.items[0];
    let resp = send(&mut c, &mut f, EventKind::DragStart, item);
    assert_eq!(resp, EventResponse::ignored());
    assert!(!c.is_dragging());
}

#[test]
fn refcount_tracks_drag_enabled_lists() {
    let mut dom = MemoryDom::new();
    let mut coord = GlobalDragCoordinator::new();
    let root = dom.root();

    let mut lists = Vec::new();
    for _ in 0..3 {
        let (container, _) = build_list(&mut dom, root, &[1, 2]);
        let c = mount(&mut dom, &mut coord, container, &[1, 2]);
        lists.push(c);
    }
    let (off, _) = build_list(&mut dom, root, &[1]);
    let _disabled: Controller = ListDragController::activate(
        &mut dom,
        &mut coord,
        off,
        ListConfig::new(records(&[1])).with_dragging_enabled(false),
    )
    .unwrap();

    assert_eq!(coord.refcount(), 3);
    assert!(dom.window_suppression());
    assert_eq!(dom.suppression_toggles(), 1);

    assert!(lists[0].deactivate(&mut dom, &mut coord));
    assert!(lists[1].deactivate(&mut dom, &mut coord));
    assert_eq!(coord.refcount(), 1);
    assert!(dom.window_suppression());

    assert!(lists[2].deactivate(&mut dom, &mut coord));
    assert_eq!(coord.refcount(), 0);
    assert!(!dom.window_suppression());
    assert_eq!(dom.suppression_toggles(), 2);
}

#[test]
fn list_ids_are_unique() {
    let mut dom = MemoryDom::new();
    let mut coord = GlobalDragCoordinator::new();
    let root = dom.root();
    let (a, _) = build_list(&mut dom, root, &[1]);
    let (b, _) = build_list(&mut dom, root, &[1]);
    let ca = mount(&mut dom, &mut coord, a, &[1]);
    let cb = mount(&mut dom, &mut coord, b, &[1]);
    assert_ne!(ca.list_id(), cb.list_id());
    assert_ne!(dom.attribute(&a, LIST_ID_ATTR), dom.attribute(&b, LIST_ID_ATTR));
}

#[test]
fn drag_gesture_reorders_and_reports_new_order() {
    let mut f = fixture(&[1, 2, 3]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2, 3])));
    let [i1, _i2, i3] = [f.items[0], f.items[1], f.items[2]];

    let start = send(&mut c, &mut f, EventKind::DragStart, i3);
    assert!(!start.default_prevented);
    assert_eq!(start.effect_allowed, Some(DropEffect::Move));
    assert_eq!(
        start.notification,
        Some(Notification::DragModeStart { is_dragging: true })
    );
    assert_eq!(c.phase(), Phase::Dragging);
    assert_eq!(f.coord.active_list(), c.list_id());
    assert_eq!(c.current_drag_node(), Some(&i3));
    assert_eq!(f.dom.selection_clears(), 1);

    // Moving up: dragged node lands before the hovered one.
    let enter = send(&mut c, &mut f, EventKind::DragEnter, i1);
    assert!(enter.default_prevented);
    assert_eq!(f.dom.child_ids(f.container), ["3", "1", "2"]);

    let detail = end_detail(send(&mut c, &mut f, EventKind::DragEnd, i3));
    assert_eq!(ids_of(&detail.updated_data), ["3", "1", "2"]);
    assert_eq!(detail.updated_data[0], records(&[3])[0]);
    assert_eq!(detail.dragged_item_data.map(|r| r.id), Some(ItemId::Number(3)));

    assert_eq!(c.phase(), Phase::Idle);
    assert_eq!(c.current_drag_node(), None);
    assert_eq!(f.coord.active_list(), None);
}

#[test]
fn dragging_down_inserts_after_target() {
    let mut f = fixture(&[1, 2, 3, 4]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2, 3, 4])));
    let (i1, i3) = (f.items[0], f.items[2]);

    send(&mut c, &mut f, EventKind::DragStart, i1);
    send(&mut c, &mut f, EventKind::DragEnter, i3);
    assert_eq!(f.dom.child_ids(f.container), ["2", "3", "1", "4"]);

    let i4 = f.items[3];
    send(&mut c, &mut f, EventKind::DragEnter, i4);
    assert_eq!(f.dom.child_ids(f.container), ["2", "3", "4", "1"]);
}

#[test]
fn dragged_identity_is_preserved() {
    let mut f = fixture(&[1, 2, 3]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2, 3])));
    let (i1, i2) = (f.items[0], f.items[1]);

    send(&mut c, &mut f, EventKind::DragStart, i2);
    send(&mut c, &mut f, EventKind::DragEnter, i1);
    let detail = end_detail(send(&mut c, &mut f, EventKind::DragEnd, i2));

    assert_eq!(detail.dragged_item_data.unwrap().id, ItemId::Number(2));
    assert_eq!(detail.updated_data[0].id, ItemId::Number(2));
    assert_eq!(ids_of(&detail.updated_data), ["2", "1", "3"]);
}

#[test]
fn drag_start_from_item_descendant_drags_the_item() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));
    let label = f.dom.element(f.items[1], "span", "label");

    send(&mut c, &mut f, EventKind::DragStart, label);
    assert_eq!(c.current_drag_node(), Some(&f.items[1]));
}

#[test]
fn drag_enter_on_container_or_dragged_node_is_ignored() {
    let mut f = fixture(&[1, 2, 3]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2, 3])));
    let i2 = f.items[1];
    let container = f.container;
    let gap = f.dom.element(container, "div", "spacer");

    send(&mut c, &mut f, EventKind::DragStart, i2);
    assert!(send(&mut c, &mut f, EventKind::DragEnter, container).default_prevented);
    assert!(send(&mut c, &mut f, EventKind::DragEnter, i2).default_prevented);
    assert!(send(&mut c, &mut f, EventKind::DragEnter, gap).default_prevented);
    assert_eq!(f.dom.child_ids(container), ["1", "2", "3"]);
}

#[test]
fn drag_over_and_drop_are_always_cancelled() {
    let mut f = fixture(&[1]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1])));
    let i1 = f.items[0];
    assert!(send(&mut c, &mut f, EventKind::DragOver, i1).default_prevented);
    assert!(send(&mut c, &mut f, EventKind::Drop, i1).default_prevented);
}

#[test]
fn drag_end_without_drag_still_resets_state() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(
        &mut f,
        ListConfig::new(records(&[1, 2])).with_handle_selector("grip"),
    );
    let grip = f.dom.element(f.items[0], "span", "grip");
    send(&mut c, &mut f, EventKind::PointerDown, grip);
    assert!(c.is_drag_allowed());
    assert_eq!(c.click_target(), Some(&grip));

    let i1 = f.items[0];
    let resp = send(&mut c, &mut f, EventKind::DragEnd, i1);
    assert!(resp.default_prevented);
    assert_eq!(resp.notification, None);
    assert!(!c.is_drag_allowed());
    assert_eq!(c.click_target(), None);
}

#[test]
fn other_list_drag_does_not_reorder() {
    let mut dom = MemoryDom::new();
    let mut coord = GlobalDragCoordinator::new();
    let root = dom.root();
    let (a, a_items) = build_list(&mut dom, root, &[1, 2]);
    let (b, b_items) = build_list(&mut dom, root, &[10, 20]);
    let mut ca = mount(&mut dom, &mut coord, a, &[1, 2]);
    let mut cb = mount(&mut dom, &mut coord, b, &[10, 20]);

    ca.handle_event(&mut dom, &mut coord, &DragEvent::new(EventKind::DragStart, a_items[1]));
    assert_eq!(coord.active_list(), ca.list_id());

    let enter = DragEvent::new(EventKind::DragEnter, b_items[0]);
    let resp = cb.handle_event(&mut dom, &mut coord, &enter);
    assert!(resp.default_prevented);
    assert_eq!(dom.child_ids(b), ["10", "20"]);
    assert_eq!(dom.child_ids(a), ["1", "2"]);

    // B never saw a drag-start from its own items.
    let foreign = DragEvent::new(EventKind::DragStart, a_items[1]);
    let start = cb.handle_event(&mut dom, &mut coord, &foreign);
    assert_eq!(start, EventResponse::ignored());
    assert!(!cb.is_dragging());
}

#[test]
fn handle_mode_cancels_drag_outside_handle() {
    let mut f = fixture(&[1, 2, 3]);
    let mut c = activate(
        &mut f,
        ListConfig::new(records(&[1, 2, 3])).with_handle_selector("grip"),
    );
    let body = f.dom.element(f.items[1], "span", "body");
    let _grip = f.dom.element(f.items[1], "span", "grip");

    send(&mut c, &mut f, EventKind::PointerDown, body);
    assert!(!c.is_drag_allowed());

    let i2 = f.items[1];
    let start = send(&mut c, &mut f, EventKind::DragStart, i2);
    assert!(start.default_prevented);
    assert_eq!(start.notification, None);
    assert!(!c.is_dragging());
    assert_eq!(f.coord.active_list(), None);

    let i1 = f.items[0];
    send(&mut c, &mut f, EventKind::DragEnter, i1);
    assert_eq!(f.dom.child_ids(f.container), ["1", "2", "3"]);
}

#[test]
fn handle_mode_allows_drag_from_handle() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(
        &mut f,
        ListConfig::new(records(&[1, 2])).with_handle_selector(".grip"),
    );
    let grip = f.dom.element(f.items[1], "span", "grip");
    let icon = f.dom.element(grip, "i", "icon");

    send(&mut c, &mut f, EventKind::PointerDown, icon);
    assert!(c.is_drag_allowed());

    let i2 = f.items[1];
    let start = send(&mut c, &mut f, EventKind::DragStart, i2);
    assert!(!start.default_prevented);
    assert!(c.is_dragging());
}

#[test]
fn handle_mode_rejects_container_and_non_item_targets() {
    let mut f = fixture(&[1]);
    let mut c = activate(
        &mut f,
        ListConfig::new(records(&[1])).with_handle_selector("grip"),
    );
    let container = f.container;
    // A handle-classed element that is not inside any item.
    let loose = f.dom.element(container, "span", "grip");

    send(&mut c, &mut f, EventKind::PointerDown, container);
    assert!(!c.is_drag_allowed());
    send(&mut c, &mut f, EventKind::PointerDown, loose);
    assert!(!c.is_drag_allowed());
}

#[test]
fn deactivate_is_idempotent() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));

    assert!(c.deactivate(&mut f.dom, &mut f.coord));
    let after_first = f.coord.refcount();
    assert!(!c.deactivate(&mut f.dom, &mut f.coord));
    assert_eq!(f.coord.refcount(), after_first);
    assert_eq!(after_first, 0);

    assert!(f.dom.listeners(f.container).is_empty());
    assert_eq!(f.dom.attribute(&f.container, LIST_ID_ATTR), None);
    for item in &f.items {
        assert_eq!(f.dom.attribute(item, DRAGGABLE_ATTR), None);
    }
}

#[test]
fn teardown_and_reconfigure_wait_for_drag_end() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));
    let i1 = f.items[0];
    send(&mut c, &mut f, EventKind::DragStart, i1);
    let id = c.list_id();

    assert!(!c.deactivate(&mut f.dom, &mut f.coord));
    assert_eq!(
        c.reconfigure(&mut f.dom, &mut f.coord, ListConfig::new(records(&[2, 1])))
            .unwrap(),
        false
    );
    assert_eq!(c.list_id(), id);
    assert_eq!(c.config().items, records(&[1, 2]));
    assert_eq!(f.coord.refcount(), 1);

    send(&mut c, &mut f, EventKind::DragEnd, i1);
    assert!(c.deactivate(&mut f.dom, &mut f.coord));
    assert_eq!(f.coord.refcount(), 0);
}

#[test]
fn reconfigure_rewires_under_a_new_id() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));
    let first = c.list_id();

    assert!(c
        .reconfigure(&mut f.dom, &mut f.coord, ListConfig::new(records(&[2, 1])))
        .unwrap());
    assert_ne!(c.list_id(), first);
    assert_eq!(f.coord.refcount(), 1);
    assert_eq!(c.config().items, records(&[2, 1]));
}

#[test]
fn reconfigure_to_disabled_does_not_reacquire() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));

    let disabled = ListConfig::new(records(&[1, 2])).with_dragging_enabled(false);
    assert!(c.reconfigure(&mut f.dom, &mut f.coord, disabled).unwrap());
    assert_eq!(c.phase(), Phase::Inactive);
    assert_eq!(f.coord.refcount(), 0);
    assert!(!f.dom.window_suppression());
    for item in &f.items {
        assert_eq!(f.dom.attribute(item, DRAGGABLE_ATTR), None);
    }

    assert!(c
        .reconfigure(&mut f.dom, &mut f.coord, ListConfig::new(records(&[1, 2])))
        .unwrap());
    assert_eq!(f.coord.refcount(), 1);
}

#[test]
fn invalid_config_is_rejected() {
    let mut f = fixture(&[1]);
    let err = ListDragController::<NodeId, Record>::activate(
        &mut f.dom,
        &mut f.coord,
        f.container,
        ListConfig::new(records(&[1])).with_item_selector(""),
    )
    .unwrap_err();
    assert_eq!(err, ConfigError::EmptyItemSelector);
    assert_eq!(f.coord.refcount(), 0);

    let cfg = ListConfig::new(records(&[1])).with_handle_selector("a b");
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::InvalidSelector("a b".to_string()))
    );
    let cfg = ListConfig::new(records(&[1])).with_handle_selector(".");
    assert_eq!(cfg.validate(), Err(ConfigError::EmptyHandleSelector));
}

#[test]
fn dragging_class_applies_after_macrotask() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));
    let i1 = f.items[0];

    send(&mut c, &mut f, EventKind::DragStart, i1);
    assert!(!f.dom.has_class(&i1, DRAGGING_CLASS));
    assert!(c.has_pending_macrotasks());

    c.run_macrotasks(&mut f.dom);
    assert!(f.dom.has_class(&i1, DRAGGING_CLASS));

    send(&mut c, &mut f, EventKind::DragEnd, i1);
    assert!(!f.dom.has_class(&i1, DRAGGING_CLASS));
}

#[test]
fn stale_dragging_class_is_discarded_after_drag_end() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));
    let i1 = f.items[0];

    send(&mut c, &mut f, EventKind::DragStart, i1);
    send(&mut c, &mut f, EventKind::DragEnd, i1);
    c.run_macrotasks(&mut f.dom);

    assert!(f.dom.with_class(DRAGGING_CLASS).is_empty());
}

#[test]
fn rapid_regrab_does_not_hide_previous_item() {
    let mut f = fixture(&[1, 2, 3]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2, 3])));
    let (i1, i2) = (f.items[0], f.items[1]);

    send(&mut c, &mut f, EventKind::DragStart, i1);
    send(&mut c, &mut f, EventKind::DragEnd, i1);
    // The first gesture's deferred callback has not run yet.
    send(&mut c, &mut f, EventKind::DragStart, i2);
    c.run_macrotasks(&mut f.dom);

    assert_eq!(f.dom.with_class(DRAGGING_CLASS), [i2]);

    send(&mut c, &mut f, EventKind::DragEnd, i2);
    assert!(f.dom.with_class(DRAGGING_CLASS).is_empty());
}

#[test]
fn rapid_regrab_of_same_item_ends_visible() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));
    let i1 = f.items[0];

    send(&mut c, &mut f, EventKind::DragStart, i1);
    send(&mut c, &mut f, EventKind::DragEnd, i1);
    send(&mut c, &mut f, EventKind::DragStart, i1);
    send(&mut c, &mut f, EventKind::DragEnd, i1);
    c.run_macrotasks(&mut f.dom);

    assert!(f.dom.with_class(DRAGGING_CLASS).is_empty());
}

#[test]
fn activation_clears_stale_dragging_class() {
    let mut f = fixture(&[1, 2]);
    let i2 = f.items[1];
    f.dom.add_class(&i2, DRAGGING_CLASS);
    let _c = activate(&mut f, ListConfig::new(records(&[1, 2])));
    assert!(!f.dom.has_class(&i2, DRAGGING_CLASS));
}

#[test]
fn flip_play_inverts_then_animates_back() {
    let mut f = fixture(&[1, 2, 3]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2, 3])));
    let [i1, i2, i3] = [f.items[0], f.items[1], f.items[2]];

    send(&mut c, &mut f, EventKind::DragStart, i2);
    send(&mut c, &mut f, EventKind::DragEnter, i1);

    use StyleProperty::*;
    assert_eq!(f.dom.style(i1, Transform), Some("translate(0px, -20px)"));
    assert_eq!(f.dom.style(i1, Transition), Some("none"));
    assert_eq!(f.dom.style(i1, PointerEvents), Some("none"));
    // The dragged element keeps pointer events.
    assert_eq!(f.dom.style(i2, Transform), Some("translate(0px, 20px)"));
    assert_eq!(f.dom.style(i2, PointerEvents), None);
    // Unmoved elements are untouched.
    assert!(f.dom.style_log().iter().all(|w| w.node != i3));

    let flip = c.flip().unwrap();
    assert!(flip.is_animating());
    assert_eq!(flip.element(&i1).unwrap().delta(), Point::new(0.0, -20.0));
    let join = flip.last_play().unwrap().clone();
    assert!(!join.is_resolved());

    // One frame is not enough.
    c.on_animation_frame(&mut f.dom, 100);
    assert_eq!(f.dom.style(i1, Transition), Some("none"));
    c.on_animation_frame(&mut f.dom, 116);
    assert_eq!(f.dom.style(i1, Transition), Some("transform 500ms"));
    assert_eq!(f.dom.style(i1, Transform), Some("none"));

    assert!(c.on_transition_end(&mut f.dom, &i1));
    assert_eq!(f.dom.style(i1, Transform), None);
    assert_eq!(f.dom.style(i1, PointerEvents), None);
    assert!(!join.is_resolved());

    // i2 never reports transitionend; the fallback timer completes it.
    c.tick(&mut f.dom, 116 + 549);
    assert!(!join.is_resolved());
    c.tick(&mut f.dom, 116 + 550);
    assert!(join.is_resolved());
    assert_eq!(join.timed_out(), 1);
    assert_eq!(f.dom.style(i2, Transition), None);

    // Completion re-captures the baseline.
    let flip = c.flip().unwrap();
    assert_eq!(flip.element(&i1).unwrap().first(), Point::new(0.0, 20.0));
    assert!(!flip.is_animating());
}

#[test]
fn transition_end_before_play_is_ignored() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));
    let (i1, i2) = (f.items[0], f.items[1]);

    send(&mut c, &mut f, EventKind::DragStart, i2);
    send(&mut c, &mut f, EventKind::DragEnter, i1);
    assert!(!c.on_transition_end(&mut f.dom, &i1));
    c.tick(&mut f.dom, 10_000);
    assert!(c.flip().unwrap().is_animating());
}

#[test]
fn flip_unchanged_element_resolves_without_styling() {
    let mut dom = MemoryDom::new();
    let root = dom.root();
    let (container, items) = build_list(&mut dom, root, &[1, 2]);
    let nodes = dom.children(&container);
    let mut session = FlipSession::capture(&dom, nodes, None, FlipOptions::default());

    let join = session.play(&mut dom);
    assert!(join.is_resolved());
    assert!(join.parts().iter().all(|p| p.settled() == Some(Settled::Unchanged)));
    assert!(dom.style_log().is_empty());
    assert!(!session.is_animating());
    assert_eq!(session.element(&items[0]).unwrap().delta(), Point::default());
}

#[test]
fn flip_replay_while_animating_joins_in_flight_completion() {
    let mut dom = MemoryDom::new();
    let root = dom.root();
    let (container, items) = build_list(&mut dom, root, &[1, 2]);
    let nodes = dom.children(&container);
    let mut session = FlipSession::capture(&dom, nodes, None, FlipOptions::default());

    dom.insert_before(&container, &items[1], Some(&items[0]));
    let first = session.play(&mut dom);
    let writes = dom.style_log().len();

    let second = session.play(&mut dom);
    assert_eq!(dom.style_log().len(), writes);
    assert!(first.parts()[0].ptr_eq(&second.parts()[0]));

    session.on_animation_frame(&mut dom, 0);
    session.on_animation_frame(&mut dom, 16);
    session.on_transition_end(&mut dom, &items[0]);
    session.on_transition_end(&mut dom, &items[1]);
    assert!(first.is_resolved());
    assert!(second.is_resolved());
    assert_eq!(first.parts()[0].settled(), Some(Settled::TransitionEnd));
}

#[test]
fn new_gesture_interrupts_running_animation() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));
    let (i1, i2) = (f.items[0], f.items[1]);

    send(&mut c, &mut f, EventKind::DragStart, i2);
    send(&mut c, &mut f, EventKind::DragEnter, i1);
    let join = c.flip().unwrap().last_play().unwrap().clone();
    send(&mut c, &mut f, EventKind::DragEnd, i2);
    // The session survives drag-end until its animations finish.
    assert!(c.flip().is_some());

    send(&mut c, &mut f, EventKind::DragStart, i1);
    assert!(join.is_resolved());
    assert!(join.parts().iter().any(|p| p.settled() == Some(Settled::Interrupted)));
    for n in [i1, i2] {
        assert_eq!(f.dom.style(n, StyleProperty::Transform), None);
    }
}

#[test]
fn finished_session_is_dropped_after_drag_end() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 2])));
    let (i1, i2) = (f.items[0], f.items[1]);

    send(&mut c, &mut f, EventKind::DragStart, i2);
    send(&mut c, &mut f, EventKind::DragEnter, i1);
    send(&mut c, &mut f, EventKind::DragEnd, i2);
    c.on_animation_frame(&mut f.dom, 0);
    c.on_animation_frame(&mut f.dom, 16);
    c.tick(&mut f.dom, 1_000);
    assert!(c.flip().is_none());
}

#[test]
fn nested_lists_arbitrate_by_ownership() {
    let mut dom = MemoryDom::new();
    let mut coord = GlobalDragCoordinator::new();
    let root = dom.root();
    let (outer, outer_items) = build_list(&mut dom, root, &[1, 2]);
    let (inner, inner_items) = build_list(&mut dom, outer_items[0], &[10, 20]);
    let mut co = mount(&mut dom, &mut coord, outer, &[1, 2]);
    let mut ci = mount(&mut dom, &mut coord, inner, &[10, 20]);

    // Bubble: inner container first, then outer.
    let mut bubble = |kind, target| {
        let e = DragEvent::new(kind, target);
        let ri = ci.handle_event(&mut dom, &mut coord, &e);
        let ro = co.handle_event(&mut dom, &mut coord, &e);
        (ri, ro)
    };

    let (ri, ro) = bubble(EventKind::DragStart, inner_items[1]);
    assert!(ri.notification.is_some());
    assert_eq!(ro, EventResponse::ignored());

    bubble(EventKind::DragEnter, inner_items[0]);
    let (ri, ro) = bubble(EventKind::DragEnd, inner_items[1]);
    assert_eq!(ids_of(&end_detail(ri).updated_data), ["20", "10"]);
    assert_eq!(ro.notification, None);
    assert_eq!(dom.child_ids(outer), ["1", "2"]);
    assert_eq!(coord.active_list(), None);
}

#[test]
fn outer_drag_over_nested_list_reorders_outer_items() {
    let mut dom = MemoryDom::new();
    let mut coord = GlobalDragCoordinator::new();
    let root = dom.root();
    let (outer, outer_items) = build_list(&mut dom, root, &[1, 2]);
    let (inner, inner_items) = build_list(&mut dom, outer_items[0], &[10, 20]);
    let mut co = mount(&mut dom, &mut coord, outer, &[1, 2]);
    let mut ci = mount(&mut dom, &mut coord, inner, &[10, 20]);

    co.handle_event(&mut dom, &mut coord, &DragEvent::new(EventKind::DragStart, outer_items[1]));
    let e = DragEvent::new(EventKind::DragEnter, inner_items[0]);
    ci.handle_event(&mut dom, &mut coord, &e);
    co.handle_event(&mut dom, &mut coord, &e);

    assert_eq!(dom.child_ids(inner), ["10", "20"]);
    assert_eq!(dom.child_ids(outer), ["2", "1"]);
}

#[test]
fn reconcile_is_lenient_about_mismatches() {
    let items = records(&[1, 2, 3]);
    let updated = reconcile(["3", "99", "1"], &items);
    assert_eq!(ids_of(&updated), ["3", "1"]);

    let text = vec![Record::new("a"), Record::new("2")];
    let updated = reconcile(["2", "a"], &text);
    assert_eq!(updated, vec![Record::new("2"), Record::new("a")]);
    assert_eq!(resolve_dragged(&updated, Some("a")), Some(Record::new("a")));
    assert_eq!(resolve_dragged(&updated, None), None);
}

#[test]
fn drag_end_drops_nodes_without_data() {
    let mut f = fixture(&[1, 2, 3]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1, 3])));
    let i1 = f.items[0];
    send(&mut c, &mut f, EventKind::DragStart, i1);
    let detail = end_detail(send(&mut c, &mut f, EventKind::DragEnd, i1));
    assert_eq!(ids_of(&detail.updated_data), ["1", "3"]);
}

#[test]
fn drag_end_reports_null_for_unknown_dragged_item() {
    let mut f = fixture(&[1, 2]);
    let mut c = activate(&mut f, ListConfig::new(records(&[1])));
    let i2 = f.items[1];
    send(&mut c, &mut f, EventKind::DragStart, i2);
    let detail = end_detail(send(&mut c, &mut f, EventKind::DragEnd, i2));
    assert_eq!(detail.dragged_item_data, None);
    assert_eq!(ids_of(&detail.updated_data), ["1"]);
}

#[test]
fn item_ids_compare_by_string_form() {
    assert!(ItemId::Number(7).matches_attr("7"));
    assert!(ItemId::from("7").matches_attr("7"));
    assert!(!ItemId::Number(7).matches_attr("07"));
    assert_eq!(ItemId::Number(-3).to_string(), "-3");
}

#[test]
fn config_equality_is_structural() {
    let nested = |n: f64| {
        let mut inner = alloc::collections::BTreeMap::new();
        inner.insert("n".to_string(), Value::Number(n));
        Value::Record(inner)
    };
    let a = ListConfig::new(vec![
        Record::new(1)
            .with_field("at", Value::Date(1_700_000_000_000))
            .with_field("re", Value::pattern("^a", "gi"))
            .with_field("meta", nested(1.0)),
    ]);
    let mut b = a.clone();
    assert_eq!(a, b);

    b.items[0] = b.items[0].clone().with_field("meta", nested(2.0));
    assert_ne!(a, b);

    let c = a.clone().with_handle_selector("grip");
    assert_ne!(a, c);
    assert_eq!(Value::pattern("^a", "gi").to_string(), "/^a/gi");
}

#[test]
fn value_numbers_compare_like_object_is() {
    assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    assert_ne!(Value::Number(0.0), Value::Number(-0.0));
    assert_eq!(Value::Number(1.5), Value::Number(1.5));
    assert_ne!(Value::Number(1.0), Value::Date(1));

    let a = ListConfig::new(vec![Record::new(1).with_field("z", Value::Number(0.0))]);
    let b = ListConfig::new(vec![Record::new(1).with_field("z", Value::Number(-0.0))]);
    assert_ne!(a, b);
}

#[test]
fn style_logging_can_be_turned_off() {
    let mut dom = MemoryDom::new();
    let root = dom.root();
    let (_, items) = build_list(&mut dom, root, &[1]);

    dom.set_style(&items[0], StyleProperty::Transform, "none");
    assert_eq!(dom.style_log().len(), 1);

    dom.set_style_logging(false);
    assert!(dom.style_log().is_empty());
    dom.set_style(&items[0], StyleProperty::Transition, "none");
    assert!(dom.style_log().is_empty());
    assert_eq!(dom.style(items[0], StyleProperty::Transition), Some("none"));

    dom.set_style_logging(true);
    dom.set_style(&items[0], StyleProperty::Transition, "");
    assert_eq!(dom.style_log().len(), 1);
}

#[test]
fn completion_first_resolver_wins() {
    let c = Completion::new();
    let seen = c.clone();
    assert!(c.resolve(Settled::TransitionEnd));
    assert!(!seen.resolve(Settled::Timeout));
    assert_eq!(seen.settled(), Some(Settled::TransitionEnd));
}

#[test]
fn completion_and_join_are_futures() {
    let waker = Waker::noop();
    let mut cx = Context::from_waker(waker);

    let a = Completion::new();
    let b = Completion::new();
    let mut join = Join::new(vec![a.clone(), b.clone()]);
    let mut fut = a.clone();

    assert_eq!(Pin::new(&mut fut).poll(&mut cx), Poll::Pending);
    assert_eq!(Pin::new(&mut join).poll(&mut cx), Poll::Pending);

    a.resolve(Settled::Timeout);
    assert_eq!(Pin::new(&mut fut).poll(&mut cx), Poll::Ready(Settled::Timeout));
    assert_eq!(Pin::new(&mut join).poll(&mut cx), Poll::Pending);

    b.resolve(Settled::Unchanged);
    assert_eq!(Pin::new(&mut join).poll(&mut cx), Poll::Ready(()));
}

#[test]
fn coordinator_release_without_acquire_is_ignored_in_release_builds() {
    let mut dom = MemoryDom::new();
    let mut coord = GlobalDragCoordinator::new();
    coord.acquire(&mut dom);
    coord.release(&mut dom);
    assert_eq!(coord.refcount(), 0);
    assert!(!dom.window_suppression());
    if !cfg!(debug_assertions) {
        coord.release(&mut dom);
        assert_eq!(coord.refcount(), 0);
    }
}

#[test]
fn styles_are_injected_once() {
    let mut dom = MemoryDom::new();
    assert!(inject_styles(&mut dom));
    assert!(!inject_styles(&mut dom));
    assert_eq!(dom.stylesheet_count(), 1);
    assert!(dom.stylesheet(STYLE_ELEMENT_ID).unwrap().contains(DRAGGING_CLASS));
}
