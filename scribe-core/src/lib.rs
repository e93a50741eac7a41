//! # scribe-core
//!
//! Value types and the attributed-string data model for the scribe text
//! stack.
//!
//! ## Architecture
//!
//! ```text
//! AttributedString ──seal()──► SharedAttributedString (Arc, read-only)
//!     │
//!     └── Shard (ShardAttributes)
//!           └── Fragment (text + FragmentAttributes + Anchor)
//! ```
//!
//! - **`attributed_string`** — Fragment / Shard / AttributedString and the
//!   append/prepend protocol.
//! - **`attributes`** — fragment, shard and paragraph attribute sets.
//! - **`primitives`** — color, geometry and layout values.
//! - **`sealable`** / **`debug`** — the sealing and diagnostics capabilities.

pub mod attributed_string;
pub mod attributes;
pub mod debug;
pub mod error;
pub mod float;
pub mod primitives;
pub mod sealable;

// Re-exports for ergonomic use.
pub use attributed_string::{
    Anchor, AttributedString, Fragment, FragmentHandle, Shard, SharedAttributedString,
    ATTACHMENT_CHARACTER,
};
pub use attributes::{
    AccessibilityRole, DynamicTypeRamp, EllipsizeMode, FontStyle, FontVariant, FontWeight,
    FragmentAttributes, HyphenationFrequency, LineBreakStrategy, ParagraphAttributes,
    ShardAttributes, TextAlignment, TextAlignmentVertical, TextBreakStrategy,
    TextDecorationLineType, TextDecorationStyle, TextTransform, WritingDirection,
};
pub use debug::{DebugItem, Describable};
pub use error::AttributedStringError;
pub use primitives::{
    Color, DisplayType, EdgeInsets, LayoutConstraints, LayoutDirection, LayoutMetrics, Point,
    Rect, Size,
};
pub use sealable::Sealable;
