use alloc::vec::Vec;

use crate::DropEffect;

/// Raw gesture events a list container listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    PointerDown,
    DragStart,
    DragEnter,
    DragOver,
    Drop,
    DragEnd,
}

impl EventKind {
    /// Every kind a container wires, in registration order.
    pub const CONTAINER: [EventKind; 6] = [
        Self::DragStart,
        Self::DragEnter,
        Self::DragEnd,
        Self::DragOver,
        Self::Drop,
        Self::PointerDown,
    ];

    /// Kinds whose default the window-level suppression cancels.
    pub const WINDOW_SUPPRESSED: [EventKind; 3] = [Self::DragEnter, Self::DragOver, Self::DragEnd];

    pub fn dom_name(self) -> &'static str {
        match self {
            Self::PointerDown => "mousedown",
            Self::DragStart => "dragstart",
            Self::DragEnter => "dragenter",
            Self::DragOver => "dragover",
            Self::Drop => "drop",
            Self::DragEnd => "dragend",
        }
    }

    pub fn is_window_suppressed(self) -> bool {
        Self::WINDOW_SUPPRESSED.contains(&self)
    }
}

/// A raw event delivered to a list container.
#[derive(Clone, Debug, PartialEq)]
pub struct DragEvent<N> {
    pub kind: EventKind,
    /// The element the event was originally dispatched at (`event.target`).
    pub target: N,
}

impl<N> DragEvent<N> {
    pub fn new(kind: EventKind, target: N) -> Self {
        Self { kind, target }
    }
}

/// Detail of the `drag-mode-end` notification.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DragEndDetail<T> {
    /// The full list in its new order.
    pub updated_data: Vec<T>,
    /// The entry that was dragged, if it could be resolved.
    pub dragged_item_data: Option<T>,
}

/// Container-scoped notifications for the embedding application.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification<T> {
    DragModeStart { is_dragging: bool },
    DragModeEnd(DragEndDetail<T>),
}

impl<T> Notification<T> {
    /// The custom event name the host should dispatch on the container.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::DragModeStart { .. } => "drag-mode-start",
            Self::DragModeEnd(_) => "drag-mode-end",
        }
    }
}

/// What a controller wants done with the event it just handled.
#[derive(Clone, Debug, PartialEq)]
pub struct EventResponse<T> {
    /// Whether the host should call `preventDefault()`.
    pub default_prevented: bool,
    /// Value for `dataTransfer.effectAllowed`, if it should be set.
    pub effect_allowed: Option<DropEffect>,
    pub notification: Option<Notification<T>>,
}

impl<T> Default for EventResponse<T> {
    fn default() -> Self {
        Self {
            default_prevented: false,
            effect_allowed: None,
            notification: None,
        }
    }
}

impl<T> EventResponse<T> {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn prevented() -> Self {
        Self {
            default_prevented: true,
            ..Self::default()
        }
    }
}
