//! Layout-wise equivalence — a coarser equality for measurement reuse.
//!
//! Two values are equivalent layout-wise when measuring them is
//! guaranteed to produce the same result. Only attributes that change
//! text metrics take part:
//!
//! | Level            | Compared                                            |
//! |------------------|-----------------------------------------------------|
//! | Attributes       | family, weight, style, variant, font scaling, type  |
//! |                  | ramp, letter spacing, line height, size, size       |
//! |                  | multiplier, alignment                               |
//! | Fragment         | text + attributes; anchor layout for attachments    |
//! | Shard            | fragments pairwise, in order                        |
//! | AttributedString | shards pairwise, in order                           |
//!
//! Colors, shadows, decorations, highlight/press flags and accessibility
//! metadata never participate. Shard attributes are not considered yet.
//!
//! ## Hash/equivalence contract
//!
//! `a.is_equivalent_layout_wise(&b)` implies
//! `a.hash_layout_wise() == b.hash_layout_wise()`. The fragment hash covers
//! text and layout attributes only, never the anchor layout, so
//! attachment-heavy strings that differ only in anchor layout collide and
//! are told apart by the equivalence check.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use scribe_core::float::{float_eq, hash_float};
use scribe_core::{AttributedString, Fragment, FragmentAttributes, Shard};

/// Order-sensitive hash mixing (boost `hash_combine`, 64-bit constant).
#[inline]
pub fn hash_combine(seed: u64, value: u64) -> u64 {
    seed ^ value
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

/// Single-value Fx hash.
#[inline]
pub fn fx_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Equivalence relation and matching hash that ignore attributes which
/// do not affect measured size.
pub trait LayoutWise {
    fn is_equivalent_layout_wise(&self, other: &Self) -> bool;

    fn hash_layout_wise(&self) -> u64;
}

impl LayoutWise for FragmentAttributes {
    fn is_equivalent_layout_wise(&self, rhs: &Self) -> bool {
        self.font_family == rhs.font_family
            && self.font_weight == rhs.font_weight
            && self.font_style == rhs.font_style
            && self.font_variant == rhs.font_variant
            && self.allow_font_scaling == rhs.allow_font_scaling
            && self.dynamic_type_ramp == rhs.dynamic_type_ramp
            && self.alignment == rhs.alignment
            && float_eq(self.font_size, rhs.font_size)
            && float_eq(self.font_size_multiplier, rhs.font_size_multiplier)
            && float_eq(self.letter_spacing, rhs.letter_spacing)
            && float_eq(self.line_height, rhs.line_height)
    }

    fn hash_layout_wise(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.font_family.hash(&mut hasher);
        hash_float(self.font_size, &mut hasher);
        hash_float(self.font_size_multiplier, &mut hasher);
        self.font_weight.hash(&mut hasher);
        self.font_style.hash(&mut hasher);
        self.font_variant.hash(&mut hasher);
        self.allow_font_scaling.hash(&mut hasher);
        self.dynamic_type_ramp.hash(&mut hasher);
        hash_float(self.letter_spacing, &mut hasher);
        hash_float(self.line_height, &mut hasher);
        self.alignment.hash(&mut hasher);
        hasher.finish()
    }
}

impl LayoutWise for Fragment {
    fn is_equivalent_layout_wise(&self, rhs: &Self) -> bool {
        self.string == rhs.string
            && self.attributes.is_equivalent_layout_wise(&rhs.attributes)
            // The size of an embedded object feeds into the measured size.
            && (!self.is_attachment() || self.anchor.layout_metrics == rhs.anchor.layout_metrics)
    }

    fn hash_layout_wise(&self) -> u64 {
        hash_combine(fx_hash(&self.string), self.attributes.hash_layout_wise())
    }
}

impl LayoutWise for Shard {
    // TODO: fold shard attributes into equivalence and hash once a
    // shard-level attribute can change metrics.
    fn is_equivalent_layout_wise(&self, rhs: &Self) -> bool {
        let (lhs, rhs) = (self.fragments(), rhs.fragments());
        lhs.len() == rhs.len()
            && lhs
                .iter()
                .zip(rhs)
                .all(|(l, r)| l.is_equivalent_layout_wise(r))
    }

    fn hash_layout_wise(&self) -> u64 {
        self.fragments()
            .iter()
            .fold(0, |seed, f| hash_combine(seed, f.hash_layout_wise()))
    }
}

impl LayoutWise for AttributedString {
    fn is_equivalent_layout_wise(&self, rhs: &Self) -> bool {
        let (lhs, rhs) = (self.shards(), rhs.shards());
        lhs.len() == rhs.len()
            && lhs
                .iter()
                .zip(rhs)
                .all(|(l, r)| l.is_equivalent_layout_wise(r))
    }

    fn hash_layout_wise(&self) -> u64 {
        self.shards()
            .iter()
            .fold(0, |seed, s| hash_combine(seed, s.hash_layout_wise()))
    }
}

// ===================================================================
// Tests
// ===================================================================
