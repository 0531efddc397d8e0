use alloc::vec::Vec;

use crate::DragItem;

/// Maps DOM order back onto the source data.
///
/// `dom_ids` are the `data-id` values of the container's children in document order (children
/// without an id are expected to be filtered out already). Each id is matched against `items` by
/// string comparison; the first matching entry wins. Ids with no matching entry are dropped, and
/// so are entries that never appear in the DOM.
pub fn reconcile<T, I, S>(dom_ids: I, items: &[T]) -> Vec<T>
where
    T: DragItem,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    dom_ids
        .into_iter()
        .filter_map(|id| {
            let id = id.as_ref();
            let found = items.iter().find(|item| item.item_id().matches_attr(id));
            if found.is_none() {
                dtrace!(id, "reconcile: DOM node has no matching entry");
            }
            found.cloned()
        })
        .collect()
}

/// Finds the dragged entry in the reconciled order.
pub fn resolve_dragged<T: DragItem>(updated: &[T], dragged_id: Option<&str>) -> Option<T> {
    let id = dragged_id?;
    updated
        .iter()
        .find(|item| item.item_id().matches_attr(id))
        .cloned()
}
