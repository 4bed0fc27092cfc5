//! Caller, owner, and issuer identities.
//!
//! Identities are opaque strings assigned by the host environment (a wallet
//! address, a DID, a test label). The registry never interprets them beyond
//! equality comparison and the null check: the empty string stands in for
//! the host's null/burn identity and is never a valid owner or admin.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of an actor identity, in bytes.
pub const MAX_ACTOR_ID_LEN: usize = 128;

/// Errors from identity construction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IdentityError {
    /// The identity exceeds [`MAX_ACTOR_ID_LEN`].
    #[error("actor identity is {length} bytes, exceeding the {max} byte bound")]
    TooLong {
        /// Length of the rejected identity.
        length: usize,
        /// The enforced bound.
        max: usize,
    },
}

/// An identity participating in certificate operations.
///
/// The empty string is the null/burn identity: it is constructible (hosts
/// may hand it to us) but every operation that stores an identity rejects
/// it with `InvalidAddress`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Creates an identity from a host-supplied string.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::TooLong`] if the string exceeds
    /// [`MAX_ACTOR_ID_LEN`] bytes.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityError> {
        let id = id.into();
        if id.len() > MAX_ACTOR_ID_LEN {
            return Err(IdentityError::TooLong {
                length: id.len(),
                max: MAX_ACTOR_ID_LEN,
            });
        }
        Ok(Self(id))
    }

    /// The null/burn identity.
    #[must_use]
    pub const fn null() -> Self {
        Self(String::new())
    }

    /// Returns `true` if this is the null/burn identity.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_empty()
    }

    /// The identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ActorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ActorId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_identity_is_detected() {
        assert!(ActorId::null().is_null());
        assert!(ActorId::new("").unwrap().is_null());
        assert!(!ActorId::new("admin").unwrap().is_null());
    }

    #[test]
    fn over_length_identity_is_rejected() {
        let id = "x".repeat(MAX_ACTOR_ID_LEN + 1);
        assert!(matches!(
            ActorId::new(id),
            Err(IdentityError::TooLong { length, max })
                if length == MAX_ACTOR_ID_LEN + 1 && max == MAX_ACTOR_ID_LEN
        ));
    }

    #[test]
    fn at_bound_identity_is_accepted() {
        let id = "x".repeat(MAX_ACTOR_ID_LEN);
        assert_eq!(ActorId::new(id.clone()).unwrap().as_str(), id);
    }
}
