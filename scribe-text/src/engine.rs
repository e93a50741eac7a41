//! Cosmic-text backed [`TextMeasurer`].
//!
//! Lays the fragments of an attributed string out as rich text in a
//! `cosmic_text::Buffer` bounded by the maximum width, then reads the
//! layout runs back:
//!
//! ```text
//! Fragment* ──► (text, Attrs{family, weight, style, metadata=index})
//!     │
//!     ▼
//! Buffer::set_rich_text ──► layout_runs() ──► TextMeasurement
//!                                   │
//!                                   └─ glyph.metadata → attachment frames
//! ```
//!
//! Only layout-relevant attributes are read, and only the maximum width of
//! the constraints, so results stay a function of the cache key.

use std::sync::{Mutex, MutexGuard};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style as CStyle, Weight};
use scribe_core::float::or_default;
use scribe_core::{
    AttributedString, FontStyle, Fragment, FragmentAttributes, LayoutConstraints,
    ParagraphAttributes, Rect, Size,
};
use serde::{Deserialize, Serialize};

use crate::measure_cache::TextMeasurer;
use crate::measurement::{Attachment, TextMeasurement};

/// Fallbacks for attributes a fragment leaves unset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurerConfig {
    /// Font size in points when a fragment sets none.
    pub default_font_size: f32,
    /// Line height as a multiple of the font size when unset.
    pub line_height_factor: f32,
}

impl Default for MeasurerConfig {
    fn default() -> Self {
        Self {
            default_font_size: 14.0,
            line_height_factor: 1.2,
        }
    }
}

/// Measures attributed strings with cosmic-text.
pub struct CosmicMeasurer {
    font_system: Mutex<FontSystem>,
    config: MeasurerConfig,
}

impl Default for CosmicMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicMeasurer {
    /// Create a measurer with system font discovery.
    pub fn new() -> Self {
        Self::with_config(MeasurerConfig::default())
    }

    pub fn with_config(config: MeasurerConfig) -> Self {
        Self::with_font_system(FontSystem::new(), config)
    }

    pub fn with_font_system(font_system: FontSystem, config: MeasurerConfig) -> Self {
        Self {
            font_system: Mutex::new(font_system),
            config,
        }
    }

    pub fn config(&self) -> &MeasurerConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, FontSystem> {
        self.font_system.lock().unwrap_or_else(|poisoned| {
            log::warn!("Recovering poisoned font system lock");
            poisoned.into_inner()
        })
    }

    fn scale(attributes: &FragmentAttributes) -> f32 {
        if attributes.allow_font_scaling == Some(false) {
            1.0
        } else {
            or_default(attributes.font_size_multiplier, 1.0)
        }
    }

    /// Font size after applying the size multiplier.
    pub fn effective_font_size(&self, attributes: &FragmentAttributes) -> f32 {
        or_default(attributes.font_size, self.config.default_font_size) * Self::scale(attributes)
    }

    /// Line height after scaling; derived from the font size when unset.
    pub fn effective_line_height(&self, attributes: &FragmentAttributes) -> f32 {
        if attributes.line_height.is_nan() {
            self.effective_font_size(attributes) * self.config.line_height_factor
        } else {
            attributes.line_height * Self::scale(attributes)
        }
    }
}

/// First family of a CSS-like chain (`"Arial, Helvetica, sans-serif"`).
fn resolve_family(name: &str) -> Family<'_> {
    let first = name
        .split(',')
        .next()
        .unwrap_or(name)
        .trim()
        .trim_matches('"')
        .trim_matches('\'');
    match first {
        "" | "sans-serif" | "system-ui" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        concrete => Family::Name(concrete),
    }
}

/// Span attributes for `fragment`; `metadata` carries its index so glyphs
/// can be traced back.
fn attrs_for(fragment: &Fragment, index: usize) -> Attrs<'_> {
    let attributes = &fragment.attributes;
    let style = match attributes.font_style {
        Some(FontStyle::Italic) => CStyle::Italic,
        Some(FontStyle::Oblique) => CStyle::Oblique,
        _ => CStyle::Normal,
    };
    Attrs::new()
        .family(resolve_family(&attributes.font_family))
        .weight(Weight(attributes.font_weight.map_or(400, |w| w.0)))
        .style(style)
        .metadata(index)
}

impl TextMeasurer for CosmicMeasurer {
    fn measure(
        &self,
        attributed_string: &AttributedString,
        paragraph_attributes: &ParagraphAttributes,
        layout_constraints: &LayoutConstraints,
    ) -> TextMeasurement {
        let fragments: Vec<&Fragment> = attributed_string.fragments().collect();
        if fragments.is_empty() {
            return TextMeasurement::default();
        }

        // Buffer metrics come from the largest run.
        let font_size = fragments
            .iter()
            .map(|f| self.effective_font_size(&f.attributes))
            .fold(0.0f32, f32::max);
        let line_height = fragments
            .iter()
            .map(|f| self.effective_line_height(&f.attributes))
            .fold(0.0f32, f32::max);
        let max_width = layout_constraints.maximum_size.width;
        let max_lines = usize::try_from(paragraph_attributes.maximum_number_of_lines)
            .ok()
            .filter(|&n| n > 0);

        // Fragment index → attachment ordinal.
        let mut ordinals = Vec::with_capacity(fragments.len());
        let mut attachment_count = 0;
        for fragment in &fragments {
            if fragment.is_attachment() {
                ordinals.push(Some(attachment_count));
                attachment_count += 1;
            } else {
                ordinals.push(None);
            }
        }
        let mut attachments: Vec<Option<Attachment>> = vec![None; attachment_count];

        let spans: Vec<(&str, Attrs)> = fragments
            .iter()
            .enumerate()
            .map(|(i, f)| (f.string.as_str(), attrs_for(f, i)))
            .collect();

        let mut guard = self.lock();
        let font_system = &mut *guard;
        let mut buffer = Buffer::new(font_system, Metrics::new(font_size, line_height));
        buffer.set_size(font_system, max_width.is_finite().then_some(max_width), None);
        buffer.set_rich_text(font_system, spans, Attrs::new(), Shaping::Advanced);
        buffer.shape_until_scroll(font_system, false);

        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;

        for (line, run) in buffer.layout_runs().enumerate() {
            if max_lines.is_some_and(|n| line >= n) {
                break;
            }
            let line_top = height;
            let mut line_width: f32 = 0.0;
            let mut line_extent = line_height;
            let mut spacing_offset = 0.0;

            for glyph in run.glyphs.iter() {
                let Some(fragment) = fragments.get(glyph.metadata) else {
                    continue;
                };
                let x = glyph.x + spacing_offset;

                if let Some(ordinal) = ordinals[glyph.metadata] {
                    let size = fragment.anchor.layout_metrics.frame.size;
                    let frame = Rect::new(x, line_top, size.width, size.height);
                    line_extent = line_extent.max(size.height);
                    line_width = line_width.max(frame.max_x());
                    attachments[ordinal] = Some(Attachment {
                        frame,
                        is_clipped: max_width.is_finite() && frame.max_x() > max_width,
                    });
                    // The object occupies its own width, not the marker's.
                    spacing_offset += size.width - glyph.w;
                } else {
                    line_width = line_width.max(x + glyph.w);
                }

                spacing_offset += or_default(fragment.attributes.letter_spacing, 0.0);
            }

            width = width.max(line_width);
            height += line_extent;
        }
        drop(guard);

        // Attachments that never got a glyph (truncated or unshapeable)
        // are reported clipped at the origin.
        let attachments = attachments
            .into_iter()
            .zip(fragments.iter().filter(|f| f.is_attachment()))
            .map(|(placed, fragment)| {
                placed.unwrap_or(Attachment {
                    frame: Rect {
                        size: fragment.anchor.layout_metrics.frame.size,
                        ..Rect::default()
                    },
                    is_clipped: true,
                })
            })
            .collect();

        log::debug!(
            "Measured {} fragments: {}x{} (max width {})",
            fragments.len(),
            width,
            height,
            max_width
        );

        TextMeasurement {
            size: Size::new(width, height),
            attachments,
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
