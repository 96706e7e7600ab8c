//! Identity tokens handed out by the simulation.

use serde::{Deserialize, Serialize};

/// Opaque handle that resolves back to a live simulation entity.
///
/// A token is only unique for the lifetime of the entity it refers to; the
/// simulation recycles tokens. Records keyed by a token must therefore be
/// dropped once the token stops resolving rather than kept forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct IdentityToken(pub i32);

impl IdentityToken {
    /// Sentinel the simulation uses for "no entity".
    pub const INVALID: Self = Self(-1);

    /// Returns true unless this is the [`IdentityToken::INVALID`] sentinel.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }

    /// Converts the sentinel into `None`.
    #[inline]
    #[must_use]
    pub const fn valid(self) -> Option<Self> {
        if self.is_valid() {
            Some(self)
        } else {
            None
        }
    }
}

impl Default for IdentityToken {
    fn default() -> Self {
        Self::INVALID
    }
}

impl From<i32> for IdentityToken {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
