//! Resource identifiers.
//!
//! A [`ResId`] is an opaque 32-bit key. Its high byte names the package
//! scope the identifier was assigned in:
//!
//! | High byte | Meaning |
//! |-----------|---------|
//! | `0x00` | reserved, [`ResId::NULL`] |
//! | `0x01`..`0x7d` | framework and shared libraries |
//! | `0x7e` | synthetic identifiers minted by this layer |
//! | `0x7f` | app-private identifiers |

use core::fmt;

use crate::error::InvalidIdentifier;
use crate::scope::Scope;

/// Opaque 32-bit resource identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ResId(u32);

impl ResId {
    /// The reserved null identifier.
    pub const NULL: ResId = ResId(0);

    /// First identifier of the app-private range. The global scope may not claim it.
    pub const APP_RANGE_START: u32 = 0x7f00_0000;

    /// Base of the synthetic identifier range.
    pub const SYNTHETIC_BASE: u32 = 0x7e00_0000;

    const SYNTHETIC_MASK: u32 = 0x00ff_ffff;

    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns true for [`ResId::NULL`].
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this identifier can key a lookup.
    ///
    /// Identifiers are compared as signed values, so zero and everything
    /// with the top bit set never resolve to a replacement.
    #[must_use]
    pub const fn is_lookup_key(self) -> bool {
        (self.0 as i32) > 0
    }

    /// Returns true if the identifier lies in the app-private range.
    #[must_use]
    pub const fn is_app_private(self) -> bool {
        (self.0 as i32) >= Self::APP_RANGE_START as i32
    }

    /// Returns true if the identifier was minted by [`ResId::synthetic`].
    #[must_use]
    pub const fn is_synthetic(self) -> bool {
        self.0 & !Self::SYNTHETIC_MASK == Self::SYNTHETIC_BASE
    }

    /// Returns the package byte (the high byte).
    #[must_use]
    pub const fn package_byte(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Mints the synthetic identifier for a fully qualified resource name.
    ///
    /// The result is a pure function of `full_name`, so translating the same
    /// foreign resource twice yields the same identifier.
    ///
    /// ```
    /// use reskin_core::ResId;
    ///
    /// let a = ResId::synthetic("com.module:drawable/foo");
    /// let b = ResId::synthetic("com.module:drawable/foo");
    /// assert_eq!(a, b);
    /// assert!(a.is_synthetic());
    /// ```
    #[must_use]
    pub fn synthetic(full_name: &str) -> Self {
        Self(Self::SYNTHETIC_BASE | (string_hash(full_name) & Self::SYNTHETIC_MASK))
    }

    /// Checks that this identifier may be written under `scope`.
    ///
    /// # Errors
    ///
    /// - [`InvalidIdentifier::Zero`] for [`ResId::NULL`]
    /// - [`InvalidIdentifier::AppPrivateInGlobalScope`] for an app-private id in the global scope
    pub fn validate_for(self, scope: &Scope) -> Result<(), InvalidIdentifier> {
        if self.is_null() {
            return Err(InvalidIdentifier::Zero);
        }
        if scope.is_global() && self.is_app_private() {
            return Err(InvalidIdentifier::AppPrivateInGlobalScope(self));
        }
        Ok(())
    }
}

/// 31-multiplier polynomial hash over UTF-16 code units.
///
/// Stable across processes and platforms, which is what keeps synthetic ids
/// deterministic.
fn string_hash(s: &str) -> u32 {
    s.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

impl From<u32> for ResId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ResId> for u32 {
    fn from(id: ResId) -> Self {
        id.0
    }
}

impl fmt::Debug for ResId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResId({:#010x})", self.0)
    }
}

impl fmt::Display for ResId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
