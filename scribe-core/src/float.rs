//! Float comparison and hashing helpers.
//!
//! Attribute sets use NaN as the "unset" marker, so plain `==` would make
//! an unset value unequal to itself. Everything that compares or hashes an
//! attribute float goes through these helpers instead, which keeps
//! equality reflexive and hashes consistent with it.

use std::hash::Hasher;

/// Equality where NaN equals NaN and `0.0` equals `-0.0`.
#[inline]
pub fn float_eq(lhs: f32, rhs: f32) -> bool {
    (lhs.is_nan() && rhs.is_nan()) || lhs == rhs
}

/// Bit pattern used for hashing. All NaNs collapse to one pattern and
/// negative zero folds into positive zero, matching [`float_eq`].
#[inline]
pub fn canonical_bits(value: f32) -> u32 {
    if value.is_nan() {
        f32::NAN.to_bits()
    } else if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

#[inline]
pub fn hash_float<H: Hasher>(value: f32, state: &mut H) {
    state.write_u32(canonical_bits(value));
}

/// `value` unless it is NaN, otherwise `fallback`.
#[inline]
pub fn or_default(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value
    }
}

/// Serde adapter writing unset (NaN) floats as `null`, since JSON has no
/// NaN literal.
pub mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_equals_nan() {
        assert!(float_eq(f32::NAN, f32::NAN));
        assert!(!float_eq(f32::NAN, 1.0));
        assert!(!float_eq(1.0, f32::NAN));
    }

    #[test]
    fn test_signed_zero() {
        assert!(float_eq(0.0, -0.0));
        assert_eq!(canonical_bits(0.0), canonical_bits(-0.0));
    }

    #[test]
    fn test_canonical_nan_bits() {
        let other_nan = f32::from_bits(0x7fc0_0001);
        assert!(other_nan.is_nan());
        assert_eq!(canonical_bits(other_nan), canonical_bits(f32::NAN));
    }

    #[test]
    fn test_or_default() {
        assert_eq!(or_default(f32::NAN, 14.0), 14.0);
        assert_eq!(or_default(12.0, 14.0), 12.0);
    }
}
