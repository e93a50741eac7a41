//! # scribe-text
//!
//! Layout-wise equivalence and cached text measurement on top of the
//! `scribe-core` attributed-string model.
//!
//! ## Architecture
//!
//! ```text
//! SharedAttributedString + ParagraphAttributes + LayoutConstraints
//!     │
//!     ▼
//! TextMeasureCacheKey ──(LayoutWise eq/hash)──► TextMeasureCache
//!                                                   │ miss
//!                                                   ▼
//!                                  TextMeasurer (CosmicMeasurer / closure)
//! ```
//!
//! - **`layout_wise`** — equivalence predicate and consistent hash that
//!   ignore purely decorative attributes.
//! - **`cache`** — bounded, thread-safe LRU store.
//! - **`measure_cache`** — the measurement cache and its key.
//! - **`engine`** — cosmic-text backed measurer.

pub mod cache;
pub mod engine;
pub mod layout_wise;
pub mod measure_cache;
pub mod measurement;

// Re-exports for ergonomic use.
pub use cache::ThreadSafeCache;
pub use engine::{CosmicMeasurer, MeasurerConfig};
pub use layout_wise::{hash_combine, LayoutWise};
pub use measure_cache::{
    CacheStats, TextMeasureCache, TextMeasureCacheConfig, TextMeasureCacheKey, TextMeasurer,
    DEFAULT_CACHE_CAPACITY,
};
pub use measurement::{Attachment, TextMeasurement};
