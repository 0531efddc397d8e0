use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// A stable item identifier, either textual or numeric.
///
/// Reconciliation compares identifiers by their string form, so `Number(2)` and `Text("2")` name
/// the same item (the DOM only ever carries the string).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl ItemId {
    /// Returns `true` when this id names the same item as a `data-id` attribute value.
    pub fn matches_attr(&self, attr: &str) -> bool {
        match self {
            Self::Text(s) => s == attr,
            Self::Number(_) => self.to_string() == attr,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ItemId {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A list entry that can be reordered.
///
/// Implement this for your own row type, or use the dynamic [`Record`].
pub trait DragItem: Clone {
    fn item_id(&self) -> ItemId;
}

/// A loosely-typed field value.
///
/// Equality is structural: nested records and lists compare element-wise, dates compare by
/// timestamp and patterns by their `/source/flags` form. Numbers follow `Object.is`: `NaN` equals
/// itself and `0.0` differs from `-0.0`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    Pattern {
        source: String,
        flags: String,
    },
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

impl Value {
    pub fn pattern(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::Pattern {
            source: source.into(),
            flags: flags.into(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => same_number(*a, *b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (
                Self::Pattern { source, flags },
                Self::Pattern {
                    source: other_source,
                    flags: other_flags,
                },
            ) => source == other_source && flags == other_flags,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            _ => false,
        }
    }
}

fn same_number(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    a.to_bits() == b.to_bits()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Date(ms) => write!(f, "{ms}"),
            Self::Pattern { source, flags } => write!(f, "/{source}/{flags}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Self::Record(_) => f.write_str("[object]"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A dynamic list entry: a required id plus arbitrary named fields.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    pub id: ItemId,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl DragItem for Record {
    fn item_id(&self) -> ItemId {
        self.id.clone()
    }
}
