//! Tamper-evident certificate registry for physical goods.
//!
//! This crate implements the certificate lifecycle state machine behind a
//! goods-authenticity system: certificates are issued by a single
//! administrator, carry versioned metadata with a full append-only history,
//! can be revoked exactly once (terminally), and are transferable by their
//! current owner. External systems (provenance ledgers, marketplaces,
//! access-rewards contracts) gate their own logic on [`verify`].
//!
//! # Architecture
//!
//! ```text
//! issue ---------> Certificate (v1) + VersionSnapshot (id, 1)
//!                  |
//!                  v
//! update_metadata --> Certificate (v+1) + VersionSnapshot (id, v+1)
//!                  |
//!                  v
//! revoke ---------> Certificate (revoked, frozen)
//! ```
//!
//! Ownership transfer mutates only the `owner` field and never touches the
//! version history: history tracks metadata provenance, not custody.
//!
//! # Execution model
//!
//! The registry is a pure, synchronous state-transition machine: the host
//! admits one transaction at a time, each carrying a [`TxContext`] (caller
//! identity plus an injected monotonic logical timestamp). Every operation
//! validates all preconditions before writing, so a failed call leaves no
//! partial effect. Embedders that need to share a registry across threads
//! wrap it in [`SharedRegistry`], which serializes access the same way the
//! host would.
//!
//! # Example
//!
//! ```rust
//! use certledger_core::{ActorId, CertificateRegistry, TxContext};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let admin = ActorId::new("admin-1")?;
//! let mut registry = CertificateRegistry::new(admin.clone())?;
//!
//! let ctx = TxContext::new(admin, 1);
//! let owner = ActorId::new("owner-a")?;
//! let cert_id = registry.issue(&ctx, "ITEM123", owner, "Luxury watch #XYZ123")?;
//!
//! registry.verify(cert_id, 1)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`verify`]: CertificateRegistry::verify

pub mod access;
pub mod identity;
pub mod registry;
pub mod sync;

pub use access::AccessControl;
pub use identity::{ActorId, IdentityError, MAX_ACTOR_ID_LEN};
pub use registry::checkpoint::{self, CheckpointError};
pub use registry::{
    CertId, Certificate, CertificateRegistry, RegistryError, RegistryStats, TxContext,
    VersionSnapshot, MAX_ITEM_ID_LEN, MAX_METADATA_LEN,
};
pub use sync::{SharedRegistry, SharedRegistryError};
