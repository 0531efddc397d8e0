//! A headless drag-and-drop list reordering engine.
//!
//! For lifecycle wiring (mount/update/unmount, event bubbling, plugin registration), see the
//! `draglist-adapter` crate.
//!
//! This crate focuses on the two pieces that have to cooperate tightly during a native drag
//! gesture: a per-container state machine that turns raw drag events into sibling reorders, and a
//! FLIP animator that makes the resulting reflow look continuous.
//!
//! It is UI-agnostic. A browser/TUI/GUI layer is expected to provide:
//! - a document tree through the [`Host`] trait
//! - raw gesture events (`mousedown`, `dragstart`, `dragenter`, ...)
//! - animation frames, `transitionend` notifications and a clock for fallback timers
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod completion;
mod config;
mod controller;
mod coordinator;
mod event;
mod flip;
mod host;
mod item;
mod memory;
mod reconcile;
mod style;
mod types;

#[cfg(test)]
mod tests;

pub use completion::{Completion, Join, Settled};
pub use config::{ConfigError, DEFAULT_ITEM_SELECTOR, ListConfig};
pub use controller::{ListDragController, Phase};
pub use coordinator::{GlobalDragCoordinator, ListId};
pub use event::{DragEndDetail, DragEvent, EventKind, EventResponse, Notification};
pub use flip::{FlipElement, FlipOptions, FlipSession};
pub use host::Host;
pub use item::{DragItem, ItemId, Record, Value};
pub use memory::{MemoryDom, NodeId, StyleWrite};
pub use reconcile::{reconcile, resolve_dragged};
pub use style::{DRAGGING_CLASS, DRAGGING_STYLES, STYLE_ELEMENT_ID, inject_styles};
pub use types::{
    DRAGGABLE_ATTR, DropEffect, ITEM_ID_ATTR, LIST_ID_ATTR, Point, Rect, StyleProperty,
};
