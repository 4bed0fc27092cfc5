//! Certificate lifecycle state machine.
//!
//! This module holds the registry proper: the certificate store, the
//! append-only version history, and the lifecycle operations that mutate
//! them. Certificates move through the lifecycle below and are never
//! deleted.
//!
//! # Architecture
//!
//! ```text
//! issue ----------> Certificate (version 1, unrevoked)
//!                   |
//!      +------------+------------+
//!      v            v            v
//! update_metadata  transfer    revoke
//! (version + 1,    (owner      (terminal: every later
//!  new snapshot)    replaced)   mutation and verify fails)
//! ```
//!
//! # Key Concepts
//!
//! - **Certificate**: one physical item's authenticity claim, identified by
//!   a sequentially allocated [`CertId`]
//! - **`VersionSnapshot`**: write-once history entry keyed by
//!   `(cert_id, version)`; snapshots cover every version from 1 to the
//!   certificate's current version with no gaps
//! - **Verification**: read-only exact-version check used by peer systems
//!   as a hard gate
//!
//! # Determinism
//!
//! Every operation is a deterministic function of its inputs and the
//! current state: identical calls against identical state produce identical
//! results, including identical errors. Time enters only through the
//! host-supplied logical counter in [`TxContext`].

pub mod checkpoint;
mod error;
mod state;
mod store;


pub use error::RegistryError;
pub use state::{
    CertId, Certificate, RegistryStats, TxContext, VersionSnapshot, MAX_ITEM_ID_LEN,
    MAX_METADATA_LEN,
};
pub use store::CertificateRegistry;
