use alloc::format;
use alloc::string::String;
use core::fmt;

use crate::Host;

/// Identifies one activated list. Rendered into the container's ownership attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListId(u64);

impl ListId {
    pub fn get(self) -> u64 {
        self.0
    }

    pub fn attr_value(self) -> String {
        format!("drag-list-{}", self.0)
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drag-list-{}", self.0)
    }
}

/// State shared by every list in one document.
///
/// - A reference count of lists with dragging enabled. While it is non-zero the window-level
///   default-preventing listeners are installed, so the browser never shows a "forbidden"
///   cursor or aborts the gesture when the pointer leaves a container.
/// - The id of the list that owns the drag in flight. Only that list reorders on `dragenter`,
///   which keeps nested and sibling lists from fighting over one gesture.
///
/// Own exactly one per document and pass it by `&mut` to every controller. All mutation happens
/// on the event-loop thread; wrap it in a mutex if that ever stops being true.
#[derive(Debug, Default)]
pub struct GlobalDragCoordinator {
    suppression_refs: usize,
    active_list: Option<ListId>,
    next_id: u64,
}

impl GlobalDragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an id that no other list in this document has been given.
    pub fn allocate_list_id(&mut self) -> ListId {
        self.next_id += 1;
        ListId(self.next_id)
    }

    pub fn refcount(&self) -> usize {
        self.suppression_refs
    }

    pub fn is_suppressing(&self) -> bool {
        self.suppression_refs > 0
    }

    /// Registers one more drag-enabled list. Installs the window listeners on 0 → 1.
    pub fn acquire<H: Host>(&mut self, host: &mut H) {
        if self.suppression_refs == 0 {
            ddebug!("GlobalDragCoordinator: installing window drag suppression");
            host.set_window_drag_suppression(true);
        }
        self.suppression_refs += 1;
    }

    /// Unregisters a drag-enabled list. Removes the window listeners on 1 → 0.
    ///
    /// Calls must pair 1:1 with [`GlobalDragCoordinator::acquire`]; an unpaired release is
    /// ignored.
    pub fn release<H: Host>(&mut self, host: &mut H) {
        if self.suppression_refs == 0 {
            dwarn!("GlobalDragCoordinator: release without matching acquire");
            debug_assert!(
                self.suppression_refs > 0,
                "GlobalDragCoordinator: release without matching acquire"
            );
            return;
        }
        self.suppression_refs -= 1;
        if self.suppression_refs == 0 {
            ddebug!("GlobalDragCoordinator: removing window drag suppression");
            host.set_window_drag_suppression(false);
        }
    }

    pub fn active_list(&self) -> Option<ListId> {
        self.active_list
    }

    /// Makes `list` the owner of the drag in flight.
    pub fn claim(&mut self, list: ListId) {
        if self.is_owned_by_other(list) {
            dtrace!(next = %list, "GlobalDragCoordinator: drag ownership taken over");
        }
        self.active_list = Some(list);
    }

    /// Clears ownership if `list` holds it.
    pub fn unclaim(&mut self, list: ListId) {
        if self.active_list == Some(list) {
            self.active_list = None;
        }
    }

    /// `true` if some other list owns the drag in flight.
    pub fn is_owned_by_other(&self, list: ListId) -> bool {
        matches!(self.active_list, Some(owner) if owner != list)
    }
}
