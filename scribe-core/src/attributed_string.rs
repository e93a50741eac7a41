//! Attributed string — text split into styled fragments, grouped in shards.
//!
//! ## Structure
//!
//! ```text
//! AttributedString
//!   └── Shard*            (shared decoration, e.g. a background)
//!         └── Fragment*   (text run + attributes + anchor)
//! ```
//!
//! A string is built by appending and prepending fragments and shards,
//! then sealed. Sealing is transitive to every shard and permanent:
//! afterwards every structural mutation fails with
//! [`AttributedStringError::Sealed`], and the value can be shared across
//! threads behind an [`Arc`] ([`SharedAttributedString`]).
//!
//! Empty fragments and empty shards are never stored; appending one is a
//! no-op.

use std::ops::Index;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attributes::{FragmentAttributes, ShardAttributes};
use crate::debug::{DebugItem, Describable};
use crate::error::AttributedStringError;
use crate::primitives::LayoutMetrics;
use crate::sealable::Sealable;

/// Unicode OBJECT REPLACEMENT CHARACTER, the text of an attachment fragment.
pub const ATTACHMENT_CHARACTER: &str = "\u{FFFC}";

/// Sealed attributed string behind a shared immutable handle.
pub type SharedAttributedString = Arc<AttributedString>;

// ── Anchor ──────────────────────────────────────────────────────────

/// Reference to the node a fragment belongs to. For attachment fragments
/// it is the embedded object, and its layout contributes to the measured
/// size of the string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub tag: Uuid,
    pub layout_metrics: LayoutMetrics,
}

impl Anchor {
    pub fn new(tag: Uuid) -> Self {
        Self {
            tag,
            layout_metrics: LayoutMetrics::default(),
        }
    }

    pub fn with_layout_metrics(tag: Uuid, layout_metrics: LayoutMetrics) -> Self {
        Self {
            tag,
            layout_metrics,
        }
    }
}

// ── Fragment ────────────────────────────────────────────────────────

/// Smallest styled run of text, or a placeholder for an embedded object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Fragment {
    pub string: String,
    pub attributes: FragmentAttributes,
    pub anchor: Anchor,
}

impl Fragment {
    pub fn new(string: impl Into<String>, attributes: FragmentAttributes) -> Self {
        Self {
            string: string.into(),
            attributes,
            anchor: Anchor::default(),
        }
    }

    /// Placeholder fragment for the embedded object `anchor`.
    pub fn attachment(attributes: FragmentAttributes, anchor: Anchor) -> Self {
        Self {
            string: ATTACHMENT_CHARACTER.to_string(),
            attributes,
            anchor,
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    #[inline]
    pub fn is_attachment(&self) -> bool {
        self.string == ATTACHMENT_CHARACTER
    }

    /// Text and attributes only; the anchor is ignored.
    pub fn is_content_equal(&self, rhs: &Fragment) -> bool {
        self.string == rhs.string && self.attributes == rhs.attributes
    }

    fn debug_item(&self) -> DebugItem {
        DebugItem::new(
            "Fragment",
            self.string.clone(),
            Vec::new(),
            self.attributes.debug_props(),
        )
    }
}

/// Full equality: text, attributes, anchor tag and anchor layout.
impl PartialEq for Fragment {
    fn eq(&self, rhs: &Self) -> bool {
        self.string == rhs.string && self.attributes == rhs.attributes && self.anchor == rhs.anchor
    }
}

// ── FragmentHandle ──────────────────────────────────────────────────

/// Locates a fragment inside an [`AttributedString`].
///
/// Only valid while the string's shard/fragment layout is unchanged; any
/// later structural mutation may invalidate it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FragmentHandle {
    pub shard_index: usize,
    pub fragment_index: usize,
}

impl FragmentHandle {
    pub const fn new(shard_index: usize, fragment_index: usize) -> Self {
        Self {
            shard_index,
            fragment_index,
        }
    }
}

// ── Shard ───────────────────────────────────────────────────────────

/// Ordered group of fragments sharing span-level decoration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Shard {
    fragments: Vec<Fragment>,
    attributes: ShardAttributes,
    #[serde(skip)]
    sealed: bool,
}

impl Shard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attributes(attributes: ShardAttributes) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    #[inline]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    #[inline]
    pub fn attributes(&self) -> &ShardAttributes {
        &self.attributes
    }

    pub fn set_attributes(&mut self, attributes: ShardAttributes) -> Result<(), AttributedStringError> {
        self.ensure_unsealed()?;
        self.attributes = attributes;
        Ok(())
    }

    /// Concatenated text of every fragment.
    pub fn string(&self) -> String {
        self.fragments.iter().map(|f| f.string.as_str()).collect()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn count_attachments(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_attachment()).count()
    }

    /// Appends `fragment`, returning its index, or `None` when the
    /// fragment has no text and was dropped.
    pub fn append_fragment(
        &mut self,
        fragment: Fragment,
    ) -> Result<Option<usize>, AttributedStringError> {
        self.ensure_unsealed()?;
        if fragment.string.is_empty() {
            return Ok(None);
        }
        self.fragments.push(fragment);
        Ok(Some(self.fragments.len() - 1))
    }

    /// Prepends `fragment`; it always lands at index 0.
    pub fn prepend_fragment(
        &mut self,
        fragment: Fragment,
    ) -> Result<Option<usize>, AttributedStringError> {
        self.ensure_unsealed()?;
        if fragment.string.is_empty() {
            return Ok(None);
        }
        self.fragments.insert(0, fragment);
        Ok(Some(0))
    }

    /// Pairwise comparison of text and attributes, ignoring anchors.
    pub fn compare_text_attributes_without_frame(&self, rhs: &Shard) -> bool {
        self.fragments.len() == rhs.fragments.len()
            && self
                .fragments
                .iter()
                .zip(&rhs.fragments)
                .all(|(l, r)| l.attributes == r.attributes && l.string == r.string)
    }

    pub fn is_content_equal(&self, rhs: &Shard) -> bool {
        self.fragments.len() == rhs.fragments.len()
            && self
                .fragments
                .iter()
                .zip(&rhs.fragments)
                .all(|(l, r)| l.is_content_equal(r))
    }
}

/// Copies start unsealed, like a fresh builder.
impl Clone for Shard {
    fn clone(&self) -> Self {
        Self {
            fragments: self.fragments.clone(),
            attributes: self.attributes.clone(),
            sealed: false,
        }
    }
}

impl PartialEq for Shard {
    fn eq(&self, rhs: &Self) -> bool {
        self.attributes == rhs.attributes && self.fragments == rhs.fragments
    }
}

impl Sealable for Shard {
    const KIND: &'static str = "Shard";

    fn seal(&mut self) {
        self.sealed = true;
    }

    #[inline]
    fn is_sealed(&self) -> bool {
        self.sealed
    }
}

impl Describable for Shard {
    fn debug_name(&self) -> String {
        "Shard".into()
    }

    fn debug_value(&self) -> String {
        self.string()
    }

    fn debug_children(&self) -> Vec<DebugItem> {
        self.fragments.iter().map(Fragment::debug_item).collect()
    }

    fn debug_props(&self) -> Vec<DebugItem> {
        self.attributes.debug_props()
    }
}

// ── AttributedString ────────────────────────────────────────────────

/// Ordered sequence of shards; the full styled text value.
///
/// Always holds at least one shard: a new string starts with a single
/// empty shard that fragment appends land in.
#[derive(Debug, Serialize, Deserialize)]
pub struct AttributedString {
    shards: Vec<Shard>,
    #[serde(skip)]
    sealed: bool,
}

impl Default for AttributedString {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributedString {
    pub fn new() -> Self {
        Self {
            shards: vec![Shard::new()],
            sealed: false,
        }
    }

    /// Builds an unsealed string holding `fragments` in order.
    pub fn from_fragments(
        fragments: impl IntoIterator<Item = Fragment>,
    ) -> Self {
        let mut shard = Shard::new();
        shard.fragments = fragments
            .into_iter()
            .filter(|f| !f.string.is_empty())
            .collect();
        Self {
            shards: vec![shard],
            sealed: false,
        }
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Appends `shard` unless it has no fragments. The inserted shard is
    /// owned by this string and starts unsealed.
    pub fn append_shard(&mut self, mut shard: Shard) -> Result<(), AttributedStringError> {
        self.ensure_unsealed()?;
        if !shard.is_empty() {
            shard.sealed = false;
            self.shards.push(shard);
        }
        Ok(())
    }

    /// Prepends `shard` unless it has no fragments.
    pub fn prepend_shard(&mut self, mut shard: Shard) -> Result<(), AttributedStringError> {
        self.ensure_unsealed()?;
        if !shard.is_empty() {
            shard.sealed = false;
            self.shards.insert(0, shard);
        }
        Ok(())
    }

    /// Appends `fragment` to the last shard.
    ///
    /// Returns `None` when the fragment has no text and was dropped.
    pub fn append_fragment(
        &mut self,
        fragment: Fragment,
    ) -> Result<Option<FragmentHandle>, AttributedStringError> {
        self.ensure_unsealed()?;
        let shard_index = self.shards.len() - 1;
        let fragment_index = self.shards[shard_index].append_fragment(fragment)?;
        Ok(fragment_index.map(|i| FragmentHandle::new(shard_index, i)))
    }

    /// Prepends `fragment` to the first shard.
    ///
    /// Returns `None` when the fragment has no text and was dropped.
    pub fn prepend_fragment(
        &mut self,
        fragment: Fragment,
    ) -> Result<Option<FragmentHandle>, AttributedStringError> {
        self.ensure_unsealed()?;
        let fragment_index = self.shards[0].prepend_fragment(fragment)?;
        Ok(fragment_index.map(|i| FragmentHandle::new(0, i)))
    }

    /// Splices every shard of `other` onto the end. `other` is untouched;
    /// the copied shards start unsealed.
    pub fn append_attributed_string(
        &mut self,
        other: &AttributedString,
    ) -> Result<(), AttributedStringError> {
        self.ensure_unsealed()?;
        self.shards.extend(other.shards.iter().cloned());
        Ok(())
    }

    /// Splices every shard of `other` onto the front.
    pub fn prepend_attributed_string(
        &mut self,
        other: &AttributedString,
    ) -> Result<(), AttributedStringError> {
        self.ensure_unsealed()?;
        self.shards.splice(0..0, other.shards.iter().cloned());
        Ok(())
    }

    /// Mutable access to one shard, for shard-level edits before sealing.
    pub fn shard_mut(&mut self, index: usize) -> Result<&mut Shard, AttributedStringError> {
        self.ensure_unsealed()?;
        self.shards
            .get_mut(index)
            .ok_or(AttributedStringError::ShardOutOfRange { index })
    }

    /// Cascades `attributes` over the shard at `index`.
    pub fn apply_shard_attributes(
        &mut self,
        index: usize,
        attributes: &ShardAttributes,
    ) -> Result<(), AttributedStringError> {
        let shard = self.shard_mut(index)?;
        shard.ensure_unsealed()?;
        shard.attributes.apply(attributes);
        Ok(())
    }

    /// Replaces the anchor of the fragment at `handle`, e.g. once the
    /// embedded object has been laid out.
    pub fn set_anchor(
        &mut self,
        handle: FragmentHandle,
        anchor: Anchor,
    ) -> Result<(), AttributedStringError> {
        self.fragment_mut(handle)?.anchor = anchor;
        Ok(())
    }

    /// Replaces the attributes of the fragment at `handle`.
    pub fn set_fragment_attributes(
        &mut self,
        handle: FragmentHandle,
        attributes: FragmentAttributes,
    ) -> Result<(), AttributedStringError> {
        self.fragment_mut(handle)?.attributes = attributes;
        Ok(())
    }

    fn fragment_mut(
        &mut self,
        handle: FragmentHandle,
    ) -> Result<&mut Fragment, AttributedStringError> {
        self.ensure_unsealed()?;
        self.shards
            .get_mut(handle.shard_index)
            .and_then(|s| s.fragments.get_mut(handle.fragment_index))
            .ok_or(AttributedStringError::HandleOutOfRange {
                shard_index: handle.shard_index,
                fragment_index: handle.fragment_index,
            })
    }

    /// Seals the string and moves it behind a shared handle.
    pub fn into_shared(mut self) -> SharedAttributedString {
        self.seal();
        Arc::new(self)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    #[inline]
    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    /// Every fragment of every shard, in order.
    pub fn all_fragments(&self) -> Vec<Fragment> {
        self.fragments().cloned().collect()
    }

    /// Iterator over every fragment of every shard, in order.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.shards.iter().flat_map(|s| s.fragments.iter())
    }

    /// Resolves `handle`; fails when it no longer points at a fragment.
    pub fn fragment(&self, handle: FragmentHandle) -> Result<&Fragment, AttributedStringError> {
        self.shards
            .get(handle.shard_index)
            .and_then(|s| s.fragments.get(handle.fragment_index))
            .ok_or(AttributedStringError::HandleOutOfRange {
                shard_index: handle.shard_index,
                fragment_index: handle.fragment_index,
            })
    }

    /// Concatenated text of every fragment across every shard.
    pub fn joined_string(&self) -> String {
        self.fragments().map(|f| f.string.as_str()).collect()
    }

    pub fn count_all_attachments(&self) -> usize {
        self.shards.iter().map(Shard::count_attachments).sum()
    }

    /// `true` when no shard holds a fragment.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(Shard::is_empty)
    }

    pub fn compare_text_attributes_without_frame(&self, rhs: &AttributedString) -> bool {
        self.shards.len() == rhs.shards.len()
            && self
                .shards
                .iter()
                .zip(&rhs.shards)
                .all(|(l, r)| l.compare_text_attributes_without_frame(r))
    }

    pub fn is_content_equal(&self, rhs: &AttributedString) -> bool {
        self.shards.len() == rhs.shards.len()
            && self
                .shards
                .iter()
                .zip(&rhs.shards)
                .all(|(l, r)| l.is_content_equal(r))
    }
}

/// Copies start unsealed, like a fresh builder.
impl Clone for AttributedString {
    fn clone(&self) -> Self {
        Self {
            shards: self.shards.clone(),
            sealed: false,
        }
    }
}

impl PartialEq for AttributedString {
    fn eq(&self, rhs: &Self) -> bool {
        self.shards == rhs.shards
    }
}

/// Panics on a stale handle; use [`AttributedString::fragment`] for a
/// checked lookup.
impl Index<FragmentHandle> for AttributedString {
    type Output = Fragment;

    fn index(&self, handle: FragmentHandle) -> &Fragment {
        match self.fragment(handle) {
            Ok(fragment) => fragment,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Sealable for AttributedString {
    const KIND: &'static str = "AttributedString";

    fn seal(&mut self) {
        self.sealed = true;
        for shard in &mut self.shards {
            shard.seal();
        }
    }

    #[inline]
    fn is_sealed(&self) -> bool {
        self.sealed
    }
}

impl Describable for AttributedString {
    fn debug_name(&self) -> String {
        "AttributedString".into()
    }

    fn debug_children(&self) -> Vec<DebugItem> {
        self.shards
            .iter()
            .map(|s| DebugItem::leaf("Shard", s.string()))
            .collect()
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::FontWeight;
    use crate::primitives::{Color, Rect};

    fn attrs(size: f32) -> FragmentAttributes {
        FragmentAttributes {
            font_size: size,
            ..FragmentAttributes::default_attributes()
        }
    }

    fn text(s: &str) -> Fragment {
        Fragment::new(s, attrs(14.0))
    }

    fn shard_of(parts: &[&str]) -> Shard {
        let mut shard = Shard::new();
        for p in parts {
            shard.append_fragment(text(p)).unwrap();
        }
        shard
    }

    #[test]
    fn test_new_string_has_one_empty_shard() {
        let s = AttributedString::new();
        assert_eq!(s.shards().len(), 1);
        assert!(s.shards()[0].is_empty());
        assert!(s.is_empty());
        assert!(!s.is_sealed());
    }

    #[test]
    fn test_joined_string_order() {
        let mut s = AttributedString::new();
        for part in ["A", "B", "C"] {
            s.append_fragment(text(part)).unwrap();
        }
        assert_eq!(s.joined_string(), "ABC");
    }

    #[test]
    fn test_prepend_fragment() {
        let mut s = AttributedString::new();
        s.append_fragment(text("B")).unwrap();
        let handle = s.prepend_fragment(text("A")).unwrap();
        assert_eq!(handle, Some(FragmentHandle::new(0, 0)));
        assert_eq!(s.joined_string(), "AB");
    }

    #[test]
    fn test_append_returns_handle() {
        let mut s = AttributedString::new();
        s.append_fragment(text("first")).unwrap();
        let handle = s.append_fragment(text("second")).unwrap().unwrap();
        assert_eq!(handle, FragmentHandle::new(0, 1));
        assert_eq!(s[handle].string, "second");
    }

    #[test]
    fn test_empty_fragment_is_noop() {
        let mut s = AttributedString::new();
        assert_eq!(s.append_fragment(text("")).unwrap(), None);
        assert_eq!(s.prepend_fragment(text("")).unwrap(), None);
        assert!(s.is_empty());
        assert_eq!(s.all_fragments().len(), 0);
    }

    #[test]
    fn test_empty_shard_is_noop() {
        let mut s = AttributedString::new();
        s.append_shard(Shard::new()).unwrap();
        s.prepend_shard(Shard::new()).unwrap();
        assert_eq!(s.shards().len(), 1);
    }

    #[test]
    fn test_append_and_prepend_shards() {
        let mut s = AttributedString::new();
        s.append_shard(shard_of(&["c", "d"])).unwrap();
        s.prepend_shard(shard_of(&["a", "b"])).unwrap();
        assert_eq!(s.shards().len(), 3);
        assert_eq!(s.joined_string(), "abcd");
        assert_eq!(s.shards()[0].string(), "ab");
    }

    #[test]
    fn test_append_fragment_targets_last_shard() {
        let mut s = AttributedString::new();
        s.append_shard(shard_of(&["x"])).unwrap();
        let handle = s.append_fragment(text("y")).unwrap().unwrap();
        assert_eq!(handle, FragmentHandle::new(1, 1));
        assert_eq!(s.shards()[1].string(), "xy");
    }

    #[test]
    fn test_append_attributed_string_leaves_other_untouched() {
        let mut other = AttributedString::new();
        other.append_fragment(text("tail")).unwrap();
        other.seal();

        let mut s = AttributedString::new();
        s.append_fragment(text("head")).unwrap();
        s.append_attributed_string(&other).unwrap();

        assert_eq!(s.joined_string(), "headtail");
        assert_eq!(s.shards().len(), 2);
        assert!(other.is_sealed());
        // Spliced copies are mutable builders again.
        assert!(!s.shards()[1].is_sealed());
        s.append_fragment(text("!")).unwrap();
        assert_eq!(other.joined_string(), "tail");
    }

    #[test]
    fn test_prepend_attributed_string() {
        let mut other = AttributedString::new();
        other.append_fragment(text("head")).unwrap();

        let mut s = AttributedString::new();
        s.append_fragment(text("tail")).unwrap();
        s.prepend_attributed_string(&other).unwrap();
        assert_eq!(s.joined_string(), "headtail");
    }

    #[test]
    fn test_seal_is_transitive() {
        let mut s = AttributedString::new();
        s.append_shard(shard_of(&["a"])).unwrap();
        s.seal();
        assert!(s.is_sealed());
        assert!(s.shards().iter().all(|shard| shard.is_sealed()));
    }

    #[test]
    fn test_mutation_after_seal_fails() {
        let mut s = AttributedString::new();
        s.append_fragment(text("a")).unwrap();
        s.seal();

        let sealed = AttributedStringError::Sealed {
            what: "AttributedString",
        };
        assert_eq!(s.append_fragment(text("b")).unwrap_err(), sealed);
        assert_eq!(s.prepend_fragment(text("b")).unwrap_err(), sealed);
        assert_eq!(s.append_shard(shard_of(&["b"])).unwrap_err(), sealed);
        assert_eq!(s.prepend_shard(shard_of(&["b"])).unwrap_err(), sealed);
        assert_eq!(
            s.append_attributed_string(&AttributedString::new()).unwrap_err(),
            sealed
        );
        assert_eq!(s.shard_mut(0).unwrap_err(), sealed);
        assert_eq!(
            s.set_anchor(FragmentHandle::new(0, 0), Anchor::default()).unwrap_err(),
            sealed
        );
        assert_eq!(s.joined_string(), "a");
    }

    #[test]
    fn test_empty_mutation_after_seal_still_fails() {
        let mut s = AttributedString::new();
        s.seal();
        assert!(s.append_fragment(text("")).is_err());
        assert!(s.append_shard(Shard::new()).is_err());
    }

    #[test]
    fn test_seal_idempotent() {
        let mut once = AttributedString::new();
        once.append_fragment(text("a")).unwrap();
        let mut twice = once.clone();

        once.seal();
        twice.seal();
        twice.seal();

        assert_eq!(once.is_sealed(), twice.is_sealed());
        assert_eq!(
            once.append_fragment(text("b")).unwrap_err(),
            twice.append_fragment(text("b")).unwrap_err()
        );
    }

    #[test]
    fn test_sealed_shard_rejects_fragments() {
        let mut shard = shard_of(&["a"]);
        shard.seal();
        assert_eq!(
            shard.append_fragment(text("b")).unwrap_err(),
            AttributedStringError::Sealed { what: "Shard" }
        );
        assert!(shard.set_attributes(ShardAttributes::default()).is_err());
    }

    #[test]
    fn test_clone_starts_unsealed() {
        let mut s = AttributedString::new();
        s.append_fragment(text("a")).unwrap();
        s.seal();
        let mut copy = s.clone();
        assert!(!copy.is_sealed());
        assert!(!copy.shards()[0].is_sealed());
        copy.append_fragment(text("b")).unwrap();
        assert_eq!(copy.joined_string(), "ab");
    }

    #[test]
    fn test_into_shared_seals() {
        let mut s = AttributedString::new();
        s.append_fragment(text("a")).unwrap();
        let shared = s.into_shared();
        assert!(shared.is_sealed());
        assert!(shared.shards()[0].is_sealed());
    }

    #[test]
    fn test_count_attachments() {
        let mut s = AttributedString::new();
        s.append_fragment(text("before")).unwrap();
        s.append_fragment(Fragment::attachment(attrs(14.0), Anchor::default()))
            .unwrap();
        let mut shard = shard_of(&["x"]);
        shard
            .append_fragment(Fragment::attachment(attrs(14.0), Anchor::default()))
            .unwrap();
        // Sentinel plus other text is not an attachment.
        shard
            .append_fragment(text(&format!("{ATTACHMENT_CHARACTER}!")))
            .unwrap();
        s.append_shard(shard).unwrap();

        assert_eq!(s.count_all_attachments(), 2);
        assert_eq!(s.shards()[1].count_attachments(), 1);
    }

    #[test]
    fn test_fragment_handle_out_of_range() {
        let mut s = AttributedString::new();
        s.append_fragment(text("a")).unwrap();
        assert_eq!(
            s.fragment(FragmentHandle::new(0, 5)).unwrap_err(),
            AttributedStringError::HandleOutOfRange {
                shard_index: 0,
                fragment_index: 5,
            }
        );
        assert!(s.fragment(FragmentHandle::new(3, 0)).is_err());
        assert!(s
            .set_anchor(FragmentHandle::new(2, 0), Anchor::default())
            .is_err());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_with_stale_handle_panics() {
        let s = AttributedString::new();
        let _ = &s[FragmentHandle::new(0, 0)];
    }

    #[test]
    fn test_shard_mut_out_of_range() {
        let mut s = AttributedString::new();
        assert_eq!(
            s.shard_mut(4).unwrap_err(),
            AttributedStringError::ShardOutOfRange { index: 4 }
        );
    }

    #[test]
    fn test_set_anchor_updates_layout() {
        let mut s = AttributedString::new();
        let handle = s
            .append_fragment(Fragment::attachment(attrs(14.0), Anchor::default()))
            .unwrap()
            .unwrap();
        let metrics = LayoutMetrics {
            frame: Rect::new(0.0, 0.0, 20.0, 20.0),
            ..Default::default()
        };
        s.set_anchor(handle, Anchor::with_layout_metrics(Uuid::nil(), metrics))
            .unwrap();
        assert_eq!(s[handle].anchor.layout_metrics.frame.size.width, 20.0);
    }

    #[test]
    fn test_full_equality_includes_anchor_layout() {
        let anchor_a = Anchor::new(Uuid::from_u128(1));
        let mut anchor_b = anchor_a;
        anchor_b.layout_metrics.frame = Rect::new(0.0, 0.0, 5.0, 5.0);

        let a = Fragment::new("x", attrs(14.0)).with_anchor(anchor_a);
        let b = Fragment::new("x", attrs(14.0)).with_anchor(anchor_b);
        assert_ne!(a, b);
        assert!(a.is_content_equal(&b));
    }

    #[test]
    fn test_string_equality_and_content_equality() {
        let build = |tag: u128| {
            let mut s = AttributedString::new();
            s.append_fragment(text("a").with_anchor(Anchor::new(Uuid::from_u128(tag))))
                .unwrap();
            s
        };
        let a = build(1);
        let b = build(2);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.is_content_equal(&b));
        assert!(a.compare_text_attributes_without_frame(&b));
    }

    #[test]
    fn test_compare_text_attributes_detects_style_change() {
        let mut a = AttributedString::new();
        a.append_fragment(text("a")).unwrap();
        let mut b = AttributedString::new();
        b.append_fragment(Fragment::new(
            "a",
            FragmentAttributes {
                font_weight: Some(FontWeight::BOLD),
                ..attrs(14.0)
            },
        ))
        .unwrap();
        assert!(!a.compare_text_attributes_without_frame(&b));
        assert!(!a.is_content_equal(&b));
    }

    #[test]
    fn test_shard_equality_includes_attributes() {
        let a = shard_of(&["a"]);
        let mut b = shard_of(&["a"]);
        b.set_attributes(ShardAttributes {
            background_color: Some(Color::WHITE),
        })
        .unwrap();
        assert_ne!(a, b);
        assert!(a.is_content_equal(&b));
    }

    #[test]
    fn test_apply_shard_attributes() {
        let mut s = AttributedString::new();
        s.apply_shard_attributes(
            0,
            &ShardAttributes {
                background_color: Some(Color::WHITE),
            },
        )
        .unwrap();
        assert_eq!(s.shards()[0].attributes().background_color, Some(Color::WHITE));
    }

    #[test]
    fn test_from_fragments_drops_empty() {
        let s = AttributedString::from_fragments([text("a"), text(""), text("b")]);
        assert_eq!(s.all_fragments().len(), 2);
        assert_eq!(s.joined_string(), "ab");
    }

    #[test]
    fn test_describe() {
        let mut s = AttributedString::new();
        s.append_fragment(text("Hi")).unwrap();
        assert_eq!(
            s.describe(),
            "<AttributedString\n  <Shard value=\"Hi\" />\n>\n"
        );
        let shard_dump = s.shards()[0].describe();
        assert!(shard_dump.contains("<Fragment value=\"Hi\""));
        assert!(shard_dump.contains("fontSize=\"14\""));
    }

    #[test]
    fn test_serde_round_trip_starts_unsealed() {
        let mut s = AttributedString::new();
        s.append_fragment(text("hello")).unwrap();
        s.seal();
        let json = serde_json::to_string(&s).unwrap();
        let back: AttributedString = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        assert!(!back.is_sealed());
    }

    #[test]
    fn test_inserted_sealed_shard_accepts_mutation() {
        let mut shard = Shard::new();
        shard.append_fragment(Fragment::new("A", FragmentAttributes::default())).unwrap();
        shard.seal();
        let mut prefix = shard.clone();
        prefix.seal();

        let mut s = AttributedString::new();
        s.append_shard(shard).unwrap();
        s.prepend_shard(prefix).unwrap();
        assert!(!s.is_sealed());
        assert!(s.shards().iter().all(|shard| !shard.is_sealed()));

        let handle = s
            .append_fragment(Fragment::new("B", FragmentAttributes::default()))
            .unwrap();
        assert_eq!(handle, Some(FragmentHandle::new(2, 1)));
        s.prepend_fragment(Fragment::new("C", FragmentAttributes::default()))
            .unwrap();
        s.apply_shard_attributes(2, &ShardAttributes::default()).unwrap();
        assert_eq!(s.joined_string(), "CAAB");
    }
}
