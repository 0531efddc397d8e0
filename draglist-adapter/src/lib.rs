//! Lifecycle adapter utilities for the `draglist` crate.
//!
//! The `draglist` crate provides the per-container state machine and the FLIP animator. This
//! crate provides the framework-neutral glue a UI binding needs around them:
//!
//! - Mount/update/unmount handling with the drag-in-flight guards (a directive)
//! - Event routing that bubbles a raw event through every mounted list above its target
//! - Plugin-style registration under a configurable directive name
//!
//! This crate is intentionally framework-agnostic (no vue/leptos/yew bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod directive;
mod plugin;


pub use directive::{DirectiveError, Dispatch, DragListDirective, UpdateOutcome};
pub use plugin::{DEFAULT_DIRECTIVE_NAME, DirectiveApp, PluginOptions, install, register};
