//! Geometry, color and layout value types shared by every scribe crate.
//!
//! These are plain `Copy` values. Equality is NaN-aware (see
//! [`crate::float`]) so that `Eq` and `Hash` hold for the types that carry
//! them.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::float::{float_eq, hash_float};

// ── Color ───────────────────────────────────────────────────────────

/// RGBA color, each channel in [0.0, 1.0].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        float_eq(self.r, other.r)
            && float_eq(self.g, other.g)
            && float_eq(self.b, other.b)
            && float_eq(self.a, other.a)
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for channel in self.as_array() {
            hash_float(channel, state);
        }
    }
}

// ── Point / Size / Rect ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        float_eq(self.x, other.x) && float_eq(self.y, other.y)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_float(self.x, state);
        hash_float(self.y, state);
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl PartialEq for Size {
    fn eq(&self, other: &Self) -> bool {
        float_eq(self.width, other.width) && float_eq(self.height, other.height)
    }
}

impl Eq for Size {}

impl Hash for Size {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_float(self.width, state);
        hash_float(self.height, state);
    }
}

/// Origin + size rectangle (design-tool convention).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PartialEq for EdgeInsets {
    fn eq(&self, other: &Self) -> bool {
        float_eq(self.left, other.left)
            && float_eq(self.top, other.top)
            && float_eq(self.right, other.right)
            && float_eq(self.bottom, other.bottom)
    }
}

impl Eq for EdgeInsets {}

// ── Layout ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutDirection {
    #[default]
    Undefined,
    LeftToRight,
    RightToLeft,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayType {
    None,
    #[default]
    Flex,
    Contents,
}

/// Resolved layout of a node: where it sits and how it is inset.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub frame: Rect,
    pub content_insets: EdgeInsets,
    pub border_width: EdgeInsets,
    pub display_type: DisplayType,
    pub layout_direction: LayoutDirection,
    pub point_scale_factor: f32,
}

impl PartialEq for LayoutMetrics {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame
            && self.content_insets == other.content_insets
            && self.border_width == other.border_width
            && self.display_type == other.display_type
            && self.layout_direction == other.layout_direction
            && float_eq(self.point_scale_factor, other.point_scale_factor)
    }
}

impl Eq for LayoutMetrics {}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            frame: Rect::default(),
            content_insets: EdgeInsets::default(),
            border_width: EdgeInsets::default(),
            display_type: DisplayType::Flex,
            layout_direction: LayoutDirection::Undefined,
            point_scale_factor: 1.0,
        }
    }
}

/// Size bounds a measurement must respect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutConstraints {
    pub minimum_size: Size,
    pub maximum_size: Size,
    pub layout_direction: LayoutDirection,
}

impl LayoutConstraints {
    /// Constraints bounded only by `max_width`; height stays unbounded.
    pub fn with_max_width(max_width: f32) -> Self {
        Self {
            maximum_size: Size::new(max_width, f32::INFINITY),
            ..Self::default()
        }
    }
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self {
            minimum_size: Size::default(),
            maximum_size: Size::new(f32::INFINITY, f32::INFINITY),
            layout_direction: LayoutDirection::Undefined,
        }
    }
}
