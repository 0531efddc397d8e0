use draglist::{
    DragEvent, EventKind, GlobalDragCoordinator, Host, ListConfig, ListDragController, MemoryDom,
    Notification, Record,
};

fn main() {
    // Example: one list, one gesture, driven by hand the way a host event loop would.
    //
    // A host would:
    // - forward raw events to `handle_event` and apply the response to the real event
    // - call `run_macrotasks` after each event task
    // - call `on_animation_frame` / `tick` from its frame loop and timer
    let mut dom = MemoryDom::new();
    let root = dom.root();
    let list = dom.element(root, "ul", "todo");
    let ids = ["a", "b", "c", "d"];
    let items: Vec<_> = ids.iter().map(|id| dom.item(list, "app-item", id)).collect();

    let data = ids
        .iter()
        .map(|id| Record::new(*id).with_field("title", format!("task {id}")))
        .collect();
    let mut coord = GlobalDragCoordinator::new();
    let mut c: ListDragController<_, Record> =
        ListDragController::activate(&mut dom, &mut coord, list, ListConfig::new(data))
            .expect("valid config");

    c.handle_event(&mut dom, &mut coord, &DragEvent::new(EventKind::DragStart, items[0]));
    c.run_macrotasks(&mut dom);

    let mut now_ms = 0u64;
    for &target in &items[1..] {
        c.handle_event(&mut dom, &mut coord, &DragEvent::new(EventKind::DragEnter, target));
        println!("order={:?}", dom.child_ids(list));
        for _ in 0..2 {
            now_ms += 16;
            c.on_animation_frame(&mut dom, now_ms);
        }
    }

    let end = c.handle_event(&mut dom, &mut coord, &DragEvent::new(EventKind::DragEnd, items[0]));
    if let Some(Notification::DragModeEnd(detail)) = end.notification {
        let order: Vec<_> = detail.updated_data.iter().map(|r| r.id.to_string()).collect();
        println!("drag-mode-end updated={order:?} dragged={:?}", detail.dragged_item_data);
    }

    while c.flip().is_some() {
        now_ms += 16;
        c.on_animation_frame(&mut dom, now_ms);
        c.tick(&mut dom, now_ms);
    }
    println!(
        "settled at t={now_ms}ms, first item rect={:?}",
        dom.bounding_rect(&items[0])
    );
}
