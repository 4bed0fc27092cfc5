//! Certificate and version-history state types.

use serde::{Deserialize, Serialize};

use crate::identity::ActorId;

/// Maximum length of a certificate's metadata, in bytes. Part of the wire
/// contract shared with peer systems; reimplementations must enforce the
/// same bound.
pub const MAX_METADATA_LEN: usize = 256;

/// Maximum length of an issuer-supplied item identifier, in bytes. Also
/// part of the wire contract.
pub const MAX_ITEM_ID_LEN: usize = 64;

/// Certificate identifier, allocated sequentially from 1.
pub type CertId = u64;

/// Per-transaction context supplied by the host environment.
///
/// `at` is the host's monotonic logical counter (block height or admission
/// sequence number), never wall-clock time: replaying the same transaction
/// sequence must reproduce identical audit timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxContext {
    /// Identity authoring the transaction.
    pub caller: ActorId,
    /// Logical timestamp at which the host admitted the transaction.
    pub at: u64,
}

impl TxContext {
    /// Creates a transaction context.
    #[must_use]
    pub const fn new(caller: ActorId, at: u64) -> Self {
        Self { caller, at }
    }
}

/// One physical item's authenticity claim.
///
/// Created only by issuance; mutated only by the metadata-update, revoke,
/// and transfer operations; never deleted. Once `revoked` is set, every
/// field is frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Issuer-supplied item identifier. Not required to be unique across
    /// certificates.
    pub item_id: String,

    /// Current holder. Never the null identity.
    pub owner: ActorId,

    /// Identity that issued the certificate. Immutable.
    pub issuer: ActorId,

    /// Logical timestamp captured at issuance. Immutable.
    pub issued_at: u64,

    /// Current metadata version. Starts at 1, bumped by exactly 1 per
    /// accepted metadata update; never decreases, never skips.
    pub version: u64,

    /// Terminal revocation flag. Settable to `true` exactly once.
    pub revoked: bool,

    /// Current metadata. Always within `(0, MAX_METADATA_LEN]`.
    pub metadata: String,
}

/// Immutable audit record of a certificate's metadata at one version.
///
/// Written once by issuance (version 1) or a metadata update (version
/// `v + 1`), then never touched again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSnapshot {
    /// Metadata value at this version.
    pub metadata: String,

    /// Logical timestamp of the write.
    pub updated_at: u64,

    /// Identity that performed the write (the issuer for version 1).
    pub updated_by: ActorId,
}

/// Aggregate counts over one registry instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Certificates ever issued (equals the allocator counter).
    pub certificate_count: u64,

    /// Certificates in the terminal revoked state.
    pub revoked_count: u64,

    /// Version snapshots across all certificates.
    pub snapshot_count: u64,

    /// Whether the global mutation lock is engaged.
    pub paused: bool,
}
