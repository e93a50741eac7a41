//! One-way freeze of a mutable builder into a shareable value.

use crate::error::AttributedStringError;

/// Capability of structures that can be sealed against further
/// structural mutation. Sealing is permanent and idempotent.
pub trait Sealable {
    /// Human-readable type name used in the sealed-mutation error.
    const KIND: &'static str;

    fn seal(&mut self);

    fn is_sealed(&self) -> bool;

    /// Fails with [`AttributedStringError::Sealed`] once sealed.
    fn ensure_unsealed(&self) -> Result<(), AttributedStringError> {
        if self.is_sealed() {
            log::error!("Attempt to mutate a sealed {}", Self::KIND);
            Err(AttributedStringError::Sealed { what: Self::KIND })
        } else {
            Ok(())
        }
    }
}
