use alloc::string::String;

use draglist::{DragItem, Record};

use crate::DragListDirective;

/// Directive name used when [`PluginOptions::name`] is unset.
pub const DEFAULT_DIRECTIVE_NAME: &str = "drag-list";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PluginOptions {
    /// Overrides the directive name the behaviour is bound under.
    pub name: Option<String>,
}

impl PluginOptions {
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// The configured name, falling back to [`DEFAULT_DIRECTIVE_NAME`] when unset or empty.
    pub fn directive_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_DIRECTIVE_NAME)
    }
}

/// A host application that can bind a directive under a name.
pub trait DirectiveApp<D> {
    fn directive(&mut self, name: &str, directive: D);
}

/// Registers a fresh [`DragListDirective`] with `app` under the configured name.
pub fn install<A, N, T>(app: &mut A, options: &PluginOptions)
where
    A: DirectiveApp<DragListDirective<N, T>>,
    N: Clone + PartialEq + core::fmt::Debug,
    T: DragItem + PartialEq,
{
    let name = options.directive_name();
    adebug!(name, "install: registering drag-list directive");
    app.directive(name, DragListDirective::new());
}

/// [`install`] with default options.
pub fn register<A, N>(app: &mut A)
where
    A: DirectiveApp<DragListDirective<N, Record>>,
    N: Clone + PartialEq + core::fmt::Debug,
{
    install(app, &PluginOptions::default());
}
