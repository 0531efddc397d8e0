/// Attribute carrying an item's stable identifier (`data-id`).
pub const ITEM_ID_ATTR: &str = "data-id";
/// Attribute placed on a list container so events can be attributed to their owning list.
pub const LIST_ID_ATTR: &str = "data-drag-list-id";
/// Native draggable attribute.
pub const DRAGGABLE_ATTR: &str = "draggable";

/// A viewport-relative position (the top-left corner of an element's bounding box).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl core::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A viewport-relative bounding box, as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Inline style properties the animator overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleProperty {
    Transition,
    Transform,
    PointerEvents,
}

impl StyleProperty {
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Transition => "transition",
            Self::Transform => "transform",
            Self::PointerEvents => "pointer-events",
        }
    }
}

/// `dataTransfer.effectAllowed` values the controller asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropEffect {
    Move,
}

impl DropEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
        }
    }
}
