//! Registry error types.
//!
//! Errors are categorical, not exceptional: every operation returns either
//! a success value or exactly one of the named kinds below, and each kind
//! is a deterministic function of the inputs and the current state.
//! Nothing is retried, logged-and-swallowed, or wrapped; errors surface
//! directly to the caller, which may resubmit (a failed precondition
//! aborts with no partial effect).

use thiserror::Error;

use crate::identity::ActorId;
use crate::registry::state::CertId;

/// Errors that can occur during certificate registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The caller lacks the role the operation requires (admin for
    /// issue/update/revoke/pause, current owner for transfer).
    #[error("actor {actor} is not authorized for this operation")]
    NotAuthorized {
        /// The rejected caller.
        actor: ActorId,
    },

    /// No certificate exists under the given identifier.
    #[error("no certificate with id {cert_id}")]
    InvalidCertificateId {
        /// The unknown identifier.
        cert_id: CertId,
    },

    /// The certificate is in the terminal revoked state, or a revoke was
    /// attempted on an already-revoked certificate (revocation is terminal
    /// either way).
    #[error("certificate {cert_id} is revoked")]
    CertificateRevoked {
        /// The revoked certificate.
        cert_id: CertId,
    },

    /// The allocator produced an identifier that is already occupied.
    /// Unreachable while the counter invariant holds; guards against
    /// counter corruption.
    #[error("certificate {cert_id} already exists")]
    CertificateExists {
        /// The colliding identifier.
        cert_id: CertId,
    },

    /// A null/burn identity was supplied where a real identity is required.
    #[error("null identity supplied for {field}")]
    InvalidAddress {
        /// The offending input field.
        field: String,
    },

    /// The global mutation lock is engaged.
    #[error("registry is paused")]
    Paused,

    /// A length bound was violated (certificate metadata or item id).
    #[error("{field} is {length} bytes, outside the (0, {max}] bound")]
    InvalidMetadata {
        /// The offending input field.
        field: String,
        /// Length of the rejected value.
        length: usize,
        /// The enforced bound.
        max: usize,
    },

    /// Verification was attempted against a version other than the
    /// certificate's current one (stale or future).
    #[error("certificate {cert_id} is at version {current}, not {requested}")]
    VersionMismatch {
        /// The certificate being verified.
        cert_id: CertId,
        /// The certificate's current version.
        current: u64,
        /// The version the caller asked about.
        requested: u64,
    },
}
