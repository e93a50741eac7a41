//! Attribute sets carried by fragments, shards and paragraphs.
//!
//! A default-constructed attribute set is *unset*: floats are NaN, options
//! are `None`, the family is empty. [`FragmentAttributes::apply`] cascades a
//! child set over a parent set, overriding only what the child sets. Use
//! `default_attributes()` for a fully specified baseline.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::debug::DebugItem;
use crate::float::{float_eq, hash_float, nan_as_null};
use crate::primitives::{Color, LayoutDirection, Size};

// ── Font enums ──────────────────────────────────────────────────────

/// Font weight (100–900). 400 = normal, 700 = bold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const THIN: FontWeight = FontWeight(100);
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const MEDIUM: FontWeight = FontWeight(500);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const BLACK: FontWeight = FontWeight(900);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontVariant {
    Default,
    SmallCaps,
    OldstyleNums,
    LiningNums,
    TabularNums,
    ProportionalNums,
}

/// Platform dynamic-type size ramp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DynamicTypeRamp {
    Caption2,
    Caption1,
    Footnote,
    Subheadline,
    Callout,
    Body,
    Headline,
    Title3,
    Title2,
    Title1,
    LargeTitle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextTransform {
    None,
    Uppercase,
    Lowercase,
    Capitalize,
    Unset,
}

// ── Paragraph-level enums ───────────────────────────────────────────

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAlignment {
    Natural,
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WritingDirection {
    Natural,
    LeftToRight,
    RightToLeft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineBreakStrategy {
    None,
    PushOut,
    HangulWordPriority,
    Standard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextDecorationLineType {
    None,
    Underline,
    Strikethrough,
    UnderlineStrikethrough,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextDecorationStyle {
    Solid,
    Double,
    Dotted,
    Dashed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessibilityRole {
    None,
    Button,
    Link,
    Header,
    Image,
    Text,
    Summary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EllipsizeMode {
    Clip,
    Head,
    #[default]
    Tail,
    Middle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextBreakStrategy {
    Simple,
    #[default]
    HighQuality,
    Balanced,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HyphenationFrequency {
    #[default]
    None,
    Normal,
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAlignmentVertical {
    Auto,
    Top,
    Bottom,
    Center,
}

// ── FragmentAttributes ──────────────────────────────────────────────

/// Effective styling of one text fragment, built by cascading the
/// attributes of nested text nodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FragmentAttributes {
    // Color
    pub foreground_color: Option<Color>,
    pub background_color: Option<Color>,
    #[serde(with = "nan_as_null")]
    pub opacity: f32,

    // Font
    pub font_family: String,
    #[serde(with = "nan_as_null")]
    pub font_size: f32,
    #[serde(with = "nan_as_null")]
    pub font_size_multiplier: f32,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub font_variant: Option<FontVariant>,
    pub allow_font_scaling: Option<bool>,
    pub dynamic_type_ramp: Option<DynamicTypeRamp>,
    #[serde(with = "nan_as_null")]
    pub letter_spacing: f32,
    pub text_transform: Option<TextTransform>,

    // Paragraph styles
    #[serde(with = "nan_as_null")]
    pub line_height: f32,
    pub alignment: Option<TextAlignment>,
    pub base_writing_direction: Option<WritingDirection>,
    pub line_break_strategy: Option<LineBreakStrategy>,

    // Decoration
    pub text_decoration_color: Option<Color>,
    pub text_decoration_line_type: Option<TextDecorationLineType>,
    pub text_decoration_style: Option<TextDecorationStyle>,

    // Shadow
    pub text_shadow_offset: Option<Size>,
    #[serde(with = "nan_as_null")]
    pub text_shadow_radius: f32,
    pub text_shadow_color: Option<Color>,

    // Special
    pub is_highlighted: Option<bool>,
    pub is_pressable: Option<bool>,
    pub layout_direction: Option<LayoutDirection>,
    pub accessibility_role: Option<AccessibilityRole>,
    pub role: Option<AccessibilityRole>,
}

impl Default for FragmentAttributes {
    fn default() -> Self {
        Self {
            foreground_color: None,
            background_color: None,
            opacity: f32::NAN,
            font_family: String::new(),
            font_size: f32::NAN,
            font_size_multiplier: f32::NAN,
            font_weight: None,
            font_style: None,
            font_variant: None,
            allow_font_scaling: None,
            dynamic_type_ramp: None,
            letter_spacing: f32::NAN,
            text_transform: None,
            line_height: f32::NAN,
            alignment: None,
            base_writing_direction: None,
            line_break_strategy: None,
            text_decoration_color: None,
            text_decoration_line_type: None,
            text_decoration_style: None,
            text_shadow_offset: None,
            text_shadow_radius: f32::NAN,
            text_shadow_color: None,
            is_highlighted: None,
            is_pressable: None,
            layout_direction: None,
            accessibility_role: None,
            role: None,
        }
    }
}

/// Overrides `$dst` with `$src` when `$src` is set.
macro_rules! cascade {
    (option $dst:expr, $src:expr) => {
        if $src.is_some() {
            $dst = $src;
        }
    };
    (float $dst:expr, $src:expr) => {
        if !$src.is_nan() {
            $dst = $src;
        }
    };
}

impl FragmentAttributes {
    /// Fully specified baseline: 14pt, black on clear, opaque, default
    /// font, natural alignment.
    pub fn default_attributes() -> Self {
        Self {
            foreground_color: Some(Color::BLACK),
            background_color: Some(Color::CLEAR),
            opacity: 1.0,
            font_size: 14.0,
            font_size_multiplier: 1.0,
            font_weight: Some(FontWeight::NORMAL),
            font_style: Some(FontStyle::Normal),
            font_variant: Some(FontVariant::Default),
            allow_font_scaling: Some(true),
            letter_spacing: 0.0,
            text_transform: Some(TextTransform::None),
            alignment: Some(TextAlignment::Natural),
            base_writing_direction: Some(WritingDirection::Natural),
            line_break_strategy: Some(LineBreakStrategy::None),
            text_decoration_line_type: Some(TextDecorationLineType::None),
            text_decoration_style: Some(TextDecorationStyle::Solid),
            text_shadow_offset: Some(Size::default()),
            text_shadow_radius: 0.0,
            text_shadow_color: Some(Color::CLEAR),
            is_highlighted: Some(false),
            is_pressable: Some(false),
            layout_direction: Some(LayoutDirection::LeftToRight),
            ..Self::default()
        }
    }

    /// Cascade `other` over `self`: every attribute set in `other` wins.
    pub fn apply(&mut self, other: &FragmentAttributes) {
        cascade!(option self.foreground_color, other.foreground_color);
        cascade!(option self.background_color, other.background_color);
        cascade!(float self.opacity, other.opacity);

        if !other.font_family.is_empty() {
            self.font_family = other.font_family.clone();
        }
        cascade!(float self.font_size, other.font_size);
        cascade!(float self.font_size_multiplier, other.font_size_multiplier);
        cascade!(option self.font_weight, other.font_weight);
        cascade!(option self.font_style, other.font_style);
        cascade!(option self.font_variant, other.font_variant);
        cascade!(option self.allow_font_scaling, other.allow_font_scaling);
        cascade!(option self.dynamic_type_ramp, other.dynamic_type_ramp);
        cascade!(float self.letter_spacing, other.letter_spacing);
        cascade!(option self.text_transform, other.text_transform);

        cascade!(float self.line_height, other.line_height);
        cascade!(option self.alignment, other.alignment);
        cascade!(option self.base_writing_direction, other.base_writing_direction);
        cascade!(option self.line_break_strategy, other.line_break_strategy);

        cascade!(option self.text_decoration_color, other.text_decoration_color);
        cascade!(option self.text_decoration_line_type, other.text_decoration_line_type);
        cascade!(option self.text_decoration_style, other.text_decoration_style);

        cascade!(option self.text_shadow_offset, other.text_shadow_offset);
        cascade!(float self.text_shadow_radius, other.text_shadow_radius);
        cascade!(option self.text_shadow_color, other.text_shadow_color);

        cascade!(option self.is_highlighted, other.is_highlighted);
        cascade!(option self.is_pressable, other.is_pressable);
        cascade!(option self.layout_direction, other.layout_direction);
        cascade!(option self.accessibility_role, other.accessibility_role);
        cascade!(option self.role, other.role);
    }

    /// Set attributes only, one item each, for diagnostics.
    pub fn debug_props(&self) -> Vec<DebugItem> {
        let mut props = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                props.push(DebugItem::leaf(name, value));
            }
        };
        let float = |v: f32| (!v.is_nan()).then(|| v.to_string());
        fn debug<T: std::fmt::Debug>(value: &T) -> String {
            format!("{value:?}")
        }

        push("foregroundColor", self.foreground_color.map(|c| debug(&c.as_array())));
        push("backgroundColor", self.background_color.map(|c| debug(&c.as_array())));
        push("opacity", float(self.opacity));
        push(
            "fontFamily",
            (!self.font_family.is_empty()).then(|| self.font_family.clone()),
        );
        push("fontSize", float(self.font_size));
        push("fontSizeMultiplier", float(self.font_size_multiplier));
        push("fontWeight", self.font_weight.map(|w| w.0.to_string()));
        push("fontStyle", self.font_style.map(|v| debug(&v)));
        push("fontVariant", self.font_variant.map(|v| debug(&v)));
        push("allowFontScaling", self.allow_font_scaling.map(|v| v.to_string()));
        push("dynamicTypeRamp", self.dynamic_type_ramp.map(|v| debug(&v)));
        push("letterSpacing", float(self.letter_spacing));
        push("textTransform", self.text_transform.map(|v| debug(&v)));
        push("lineHeight", float(self.line_height));
        push("alignment", self.alignment.map(|v| debug(&v)));
        push("baseWritingDirection", self.base_writing_direction.map(|v| debug(&v)));
        push("lineBreakStrategy", self.line_break_strategy.map(|v| debug(&v)));
        push(
            "textDecorationColor",
            self.text_decoration_color.map(|c| debug(&c.as_array())),
        );
        push("textDecorationLineType", self.text_decoration_line_type.map(|v| debug(&v)));
        push("textDecorationStyle", self.text_decoration_style.map(|v| debug(&v)));
        push("textShadowOffset", self.text_shadow_offset.map(|v| debug(&v)));
        push("textShadowRadius", float(self.text_shadow_radius));
        push("textShadowColor", self.text_shadow_color.map(|c| debug(&c.as_array())));
        push("isHighlighted", self.is_highlighted.map(|v| v.to_string()));
        push("isPressable", self.is_pressable.map(|v| v.to_string()));
        push("layoutDirection", self.layout_direction.map(|v| debug(&v)));
        push("accessibilityRole", self.accessibility_role.map(|v| debug(&v)));
        push("role", self.role.map(|v| debug(&v)));
        props
    }
}

impl PartialEq for FragmentAttributes {
    fn eq(&self, rhs: &Self) -> bool {
        self.foreground_color == rhs.foreground_color
            && self.background_color == rhs.background_color
            && self.font_family == rhs.font_family
            && self.font_weight == rhs.font_weight
            && self.font_style == rhs.font_style
            && self.font_variant == rhs.font_variant
            && self.allow_font_scaling == rhs.allow_font_scaling
            && self.dynamic_type_ramp == rhs.dynamic_type_ramp
            && self.text_transform == rhs.text_transform
            && self.alignment == rhs.alignment
            && self.base_writing_direction == rhs.base_writing_direction
            && self.line_break_strategy == rhs.line_break_strategy
            && self.text_decoration_color == rhs.text_decoration_color
            && self.text_decoration_line_type == rhs.text_decoration_line_type
            && self.text_decoration_style == rhs.text_decoration_style
            && self.text_shadow_offset == rhs.text_shadow_offset
            && self.text_shadow_color == rhs.text_shadow_color
            && self.is_highlighted == rhs.is_highlighted
            && self.is_pressable == rhs.is_pressable
            && self.layout_direction == rhs.layout_direction
            && self.accessibility_role == rhs.accessibility_role
            && self.role == rhs.role
            && float_eq(self.opacity, rhs.opacity)
            && float_eq(self.font_size, rhs.font_size)
            && float_eq(self.font_size_multiplier, rhs.font_size_multiplier)
            && float_eq(self.letter_spacing, rhs.letter_spacing)
            && float_eq(self.line_height, rhs.line_height)
            && float_eq(self.text_shadow_radius, rhs.text_shadow_radius)
    }
}

impl Eq for FragmentAttributes {}

// ── ShardAttributes ─────────────────────────────────────────────────

/// Decoration that spans a whole shard (e.g. a shared background).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShardAttributes {
    pub background_color: Option<Color>,
}

impl ShardAttributes {
    /// Fully specified baseline: clear background.
    pub fn default_attributes() -> Self {
        Self {
            background_color: Some(Color::CLEAR),
        }
    }

    pub fn apply(&mut self, other: &ShardAttributes) {
        cascade!(option self.background_color, other.background_color);
    }

    pub fn debug_props(&self) -> Vec<DebugItem> {
        self.background_color
            .map(|c| DebugItem::leaf("backgroundColor", format!("{:?}", c.as_array())))
            .into_iter()
            .collect()
    }
}

// ── ParagraphAttributes ─────────────────────────────────────────────

/// Attributes that apply to a whole paragraph rather than a fragment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParagraphAttributes {
    /// Maximum number of lines; zero or negative means unlimited.
    pub maximum_number_of_lines: i32,
    pub ellipsize_mode: EllipsizeMode,
    pub text_break_strategy: TextBreakStrategy,
    pub adjusts_font_size_to_fit: bool,
    pub include_font_padding: bool,
    #[serde(with = "nan_as_null")]
    pub minimum_font_size: f32,
    #[serde(with = "nan_as_null")]
    pub maximum_font_size: f32,
    pub android_hyphenation_frequency: HyphenationFrequency,
    pub text_align_vertical: Option<TextAlignmentVertical>,
}

impl Default for ParagraphAttributes {
    fn default() -> Self {
        Self {
            maximum_number_of_lines: 0,
            ellipsize_mode: EllipsizeMode::Tail,
            text_break_strategy: TextBreakStrategy::HighQuality,
            adjusts_font_size_to_fit: false,
            include_font_padding: true,
            minimum_font_size: f32::NAN,
            maximum_font_size: f32::NAN,
            android_hyphenation_frequency: HyphenationFrequency::None,
            text_align_vertical: None,
        }
    }
}

impl PartialEq for ParagraphAttributes {
    fn eq(&self, rhs: &Self) -> bool {
        self.maximum_number_of_lines == rhs.maximum_number_of_lines
            && self.ellipsize_mode == rhs.ellipsize_mode
            && self.text_break_strategy == rhs.text_break_strategy
            && self.adjusts_font_size_to_fit == rhs.adjusts_font_size_to_fit
            && self.include_font_padding == rhs.include_font_padding
            && self.android_hyphenation_frequency == rhs.android_hyphenation_frequency
            && self.text_align_vertical == rhs.text_align_vertical
            && float_eq(self.minimum_font_size, rhs.minimum_font_size)
            && float_eq(self.maximum_font_size, rhs.maximum_font_size)
    }
}

impl Eq for ParagraphAttributes {}

impl Hash for ParagraphAttributes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.maximum_number_of_lines.hash(state);
        self.ellipsize_mode.hash(state);
        self.text_break_strategy.hash(state);
        self.adjusts_font_size_to_fit.hash(state);
        self.include_font_padding.hash(state);
        hash_float(self.minimum_font_size, state);
        hash_float(self.maximum_font_size, state);
        self.android_hyphenation_frequency.hash(state);
        self.text_align_vertical.hash(state);
    }
}
