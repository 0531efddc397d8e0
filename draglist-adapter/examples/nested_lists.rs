use draglist::{DragEvent, EventKind, ListConfig, MemoryDom, Record};
use draglist_adapter::DragListDirective;

fn main() {
    // Example: two nested lists mounted through one directive. Events are dispatched at their
    // target and bubble through both containers; only the list that owns the drag reacts.
    let mut dom = MemoryDom::new();
    let root = dom.root();

    let board = dom.element(root, "div", "board");
    let columns: Vec<_> = ["todo", "doing"]
        .iter()
        .map(|id| dom.item(board, "app-item", id))
        .collect();
    let cards = dom.element(columns[0], "ul", "cards");
    let card_ids = ["1", "2", "3"];
    let card_nodes: Vec<_> = card_ids
        .iter()
        .map(|id| dom.item(cards, "app-item", id))
        .collect();

    let mut d = DragListDirective::new();
    d.on_mount(
        &mut dom,
        board,
        ListConfig::new(vec![Record::new("todo"), Record::new("doing")]),
    )
    .expect("valid board config");
    d.on_mount(
        &mut dom,
        cards,
        ListConfig::new(card_ids.iter().map(|id| Record::new(*id)).collect()),
    )
    .expect("valid card config");

    let gesture = [
        DragEvent::new(EventKind::DragStart, card_nodes[2]),
        DragEvent::new(EventKind::DragEnter, card_nodes[0]),
        DragEvent::new(EventKind::DragOver, card_nodes[0]),
        DragEvent::new(EventKind::Drop, card_nodes[0]),
        DragEvent::new(EventKind::DragEnd, card_nodes[2]),
    ];
    for (i, event) in gesture.iter().enumerate() {
        let out = d.dispatch(&mut dom, event);
        d.run_macrotasks(&mut dom);
        d.on_animation_frame(&mut dom, i as u64 * 16);
        for (container, n) in &out.notifications {
            println!("{} on {container:?}: {n:?}", n.event_name());
        }
    }

    println!("cards={:?} columns={:?}", dom.child_ids(cards), dom.child_ids(board));
}
