use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::{DragItem, FlipOptions, Record};

/// Class carried by draggable children when no selector is configured.
pub const DEFAULT_ITEM_SELECTOR: &str = "app-item";

/// Rejected list configurations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("item selector must not be empty")]
    EmptyItemSelector,
    #[error("handle selector must not be empty when set")]
    EmptyHandleSelector,
    #[error("selector `{0}` must be a single class name")]
    InvalidSelector(String),
}

/// Configuration for one list container.
///
/// Selectors are class names (`app-item` matches elements carrying `class="app-item"`).
/// Setting `handle_selector` switches the list into handle-gated mode: a drag may only start from
/// a pointer-down that landed inside an element with that class.
///
/// Two configurations are equal when their items are structurally equal and every option
/// matches; the lifecycle adapter uses this to skip redundant reinitialization.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ListConfig<T = Record> {
    pub items: Vec<T>,
    pub dragging_enabled: bool,
    pub item_selector: String,
    pub handle_selector: Option<String>,
    pub flip: FlipOptions,
}

impl<T> Default for ListConfig<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            dragging_enabled: true,
            item_selector: DEFAULT_ITEM_SELECTOR.to_string(),
            handle_selector: None,
            flip: FlipOptions::default(),
        }
    }
}

impl<T> ListConfig<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn with_dragging_enabled(mut self, enabled: bool) -> Self {
        self.dragging_enabled = enabled;
        self
    }

    pub fn with_item_selector(mut self, selector: impl Into<String>) -> Self {
        self.item_selector = selector.into();
        self
    }

    pub fn with_handle_selector(mut self, selector: impl Into<String>) -> Self {
        self.handle_selector = Some(selector.into());
        self
    }

    pub fn with_flip(mut self, flip: FlipOptions) -> Self {
        self.flip = flip;
        self
    }

    pub fn is_handle_mode(&self) -> bool {
        self.handle_selector.is_some()
    }
}

impl<T: DragItem> ListConfig<T> {
    /// Checks the selectors. Duplicate item ids are tolerated (the first entry wins during
    /// reconciliation) but logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let item = self.item_selector.trim_start_matches('.');
        if item.is_empty() {
            return Err(ConfigError::EmptyItemSelector);
        }
        if !is_class_name(item) {
            return Err(ConfigError::InvalidSelector(self.item_selector.clone()));
        }
        if let Some(handle) = &self.handle_selector {
            let handle = handle.trim_start_matches('.');
            if handle.is_empty() {
                return Err(ConfigError::EmptyHandleSelector);
            }
            if !is_class_name(handle) {
                return Err(ConfigError::InvalidSelector(handle.to_string()));
            }
        }

        let mut seen = BTreeSet::new();
        for entry in &self.items {
            let id = entry.item_id().to_string();
            if !seen.insert(id) {
                dwarn!(
                    id = %entry.item_id(),
                    "ListConfig: duplicate item id; only the first entry is reachable"
                );
            }
        }
        Ok(())
    }

    /// The item class without a leading `.`.
    pub(crate) fn item_class(&self) -> &str {
        self.item_selector.trim_start_matches('.')
    }

    pub(crate) fn handle_class(&self) -> Option<&str> {
        self.handle_selector
            .as_deref()
            .map(|s| s.trim_start_matches('.'))
    }
}

fn is_class_name(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
