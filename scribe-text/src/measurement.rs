//! Measurement results produced by a [`crate::TextMeasurer`].

use scribe_core::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Placement of one embedded object within the measured text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub frame: Rect,
    /// The object falls (partly) outside the constrained area.
    pub is_clipped: bool,
}

/// Size of a measured attributed string plus one [`Attachment`] per
/// attachment fragment, in fragment order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextMeasurement {
    pub size: Size,
    pub attachments: Vec<Attachment>,
}

impl TextMeasurement {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            attachments: Vec::new(),
        }
    }
}
