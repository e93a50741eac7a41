//! Text measure cache — reuses measurements across layout-wise
//! equivalent strings.
//!
//! ```text
//! TextMeasureCacheKey (sealed string + paragraph attrs + constraints)
//!     │  hash/eq: layout-wise string, full paragraph attrs, max width
//!     ▼
//! ThreadSafeCache ── hit ──► TextMeasurement
//!     │
//!     └─ miss ──► TextMeasurer::measure (lock released) ──► insert
//! ```
//!
//! Only the maximum width of the constraints takes part in the key:
//! measurement is width-driven and height-flexible.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use scribe_core::float::{canonical_bits, float_eq};
use scribe_core::{
    AttributedString, LayoutConstraints, ParagraphAttributes, Sealable, SharedAttributedString,
};
use serde::{Deserialize, Serialize};

use crate::cache::ThreadSafeCache;
use crate::layout_wise::{fx_hash, hash_combine, LayoutWise};
use crate::measurement::TextMeasurement;

/// Maximum number of cached measurements, sized for the typical variety
/// of distinct measurements on one screen.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

// ── Measurer seam ───────────────────────────────────────────────────

/// Pure measurement function: the same layout-relevant input must always
/// yield the same result.
pub trait TextMeasurer: Send + Sync {
    fn measure(
        &self,
        attributed_string: &AttributedString,
        paragraph_attributes: &ParagraphAttributes,
        layout_constraints: &LayoutConstraints,
    ) -> TextMeasurement;
}

impl<F> TextMeasurer for F
where
    F: Fn(&AttributedString, &ParagraphAttributes, &LayoutConstraints) -> TextMeasurement
        + Send
        + Sync,
{
    fn measure(
        &self,
        attributed_string: &AttributedString,
        paragraph_attributes: &ParagraphAttributes,
        layout_constraints: &LayoutConstraints,
    ) -> TextMeasurement {
        self(attributed_string, paragraph_attributes, layout_constraints)
    }
}

// ── Key ─────────────────────────────────────────────────────────────

/// Lookup key of the [`TextMeasureCache`].
#[derive(Clone, Debug)]
pub struct TextMeasureCacheKey {
    pub attributed_string: SharedAttributedString,
    pub paragraph_attributes: ParagraphAttributes,
    pub layout_constraints: LayoutConstraints,
}

impl TextMeasureCacheKey {
    pub fn new(
        attributed_string: SharedAttributedString,
        paragraph_attributes: ParagraphAttributes,
        layout_constraints: LayoutConstraints,
    ) -> Self {
        if !attributed_string.is_sealed() {
            log::warn!("Unsealed attributed string used as a text measure cache key");
        }
        Self {
            attributed_string,
            paragraph_attributes,
            layout_constraints,
        }
    }

    #[inline]
    fn max_width(&self) -> f32 {
        self.layout_constraints.maximum_size.width
    }
}

impl PartialEq for TextMeasureCacheKey {
    fn eq(&self, rhs: &Self) -> bool {
        float_eq(self.max_width(), rhs.max_width())
            && self.paragraph_attributes == rhs.paragraph_attributes
            && (Arc::ptr_eq(&self.attributed_string, &rhs.attributed_string)
                || self
                    .attributed_string
                    .is_equivalent_layout_wise(&rhs.attributed_string))
    }
}

impl Eq for TextMeasureCacheKey {}

impl Hash for TextMeasureCacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let seed = hash_combine(
            self.attributed_string.hash_layout_wise(),
            fx_hash(&self.paragraph_attributes),
        );
        state.write_u64(hash_combine(seed, u64::from(canonical_bits(self.max_width()))));
    }
}

// ── Config / stats ──────────────────────────────────────────────────

/// Tunables of a [`TextMeasureCache`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextMeasureCacheConfig {
    /// Entry cap; zero is treated as one.
    pub capacity: usize,
}

impl Default for TextMeasureCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Snapshot of cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache (0.0 with no lookups).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// ── Cache ───────────────────────────────────────────────────────────

/// Bounded, thread-safe cache of text measurements keyed by layout-wise
/// equivalence.
///
/// Construct one per process (or per test) and pass it by reference to
/// measurement call sites; there is no hidden global instance.
pub struct TextMeasureCache<M> {
    measurer: M,
    entries: ThreadSafeCache<TextMeasureCacheKey, TextMeasurement>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<M: TextMeasurer> TextMeasureCache<M> {
    pub fn new(measurer: M) -> Self {
        Self::with_config(TextMeasureCacheConfig::default(), measurer)
    }

    pub fn with_config(config: TextMeasureCacheConfig, measurer: M) -> Self {
        log::info!("Text measure cache created (capacity {})", config.capacity);
        Self {
            measurer,
            entries: ThreadSafeCache::new(config.capacity),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Measurement for `key`, measuring and storing it on a miss.
    pub fn get(&self, key: TextMeasureCacheKey) -> TextMeasurement {
        let mut missed = false;
        let measurement = self.entries.get_or_insert_with(key, |key| {
            missed = true;
            log::debug!(
                "Text measure cache miss: {:?} at width {}",
                key.attributed_string.joined_string(),
                key.max_width()
            );
            self.measurer.measure(
                &key.attributed_string,
                &key.paragraph_attributes,
                &key.layout_constraints,
            )
        });

        if missed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::trace!("Text measure cache hit");
        }
        measurement
    }

    /// Convenience wrapper building the key from its parts.
    pub fn measure(
        &self,
        attributed_string: &SharedAttributedString,
        paragraph_attributes: &ParagraphAttributes,
        layout_constraints: &LayoutConstraints,
    ) -> TextMeasurement {
        self.get(TextMeasureCacheKey::new(
            Arc::clone(attributed_string),
            paragraph_attributes.clone(),
            *layout_constraints,
        ))
    }

    /// Whether an equivalent key currently has an entry. Does not count
    /// as a lookup.
    pub fn contains(&self, key: &TextMeasureCacheKey) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        log::info!("Text measure cache cleared ({} entries)", self.len());
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
            capacity: self.capacity(),
        }
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }
}

// ===================================================================
// Tests
// ===================================================================
