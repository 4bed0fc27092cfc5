//! Lossless checkpointing of registry state.
//!
//! A checkpoint is the full registry state (certificates, version history,
//! access control, allocator counter) as a single JSON document. Restoring
//! a checkpoint and then applying further transactions is indistinguishable
//! from never having checkpointed: the state maps are ordered, so the same
//! state always serializes to the same bytes.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::registry::store::CertificateRegistry;

/// Errors that can occur while writing or restoring a checkpoint.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckpointError {
    /// The state could not be encoded or decoded.
    #[error("checkpoint serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error reading or writing the checkpoint file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes a registry to checkpoint bytes.
///
/// # Errors
///
/// Returns [`CheckpointError::Serialization`] if encoding fails.
pub fn to_bytes(registry: &CertificateRegistry) -> Result<Vec<u8>, CheckpointError> {
    Ok(serde_json::to_vec_pretty(registry)?)
}

/// Restores a registry from checkpoint bytes.
///
/// # Errors
///
/// Returns [`CheckpointError::Serialization`] if the bytes are not a valid
/// checkpoint.
pub fn from_bytes(bytes: &[u8]) -> Result<CertificateRegistry, CheckpointError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Writes a registry checkpoint to a file.
///
/// # Errors
///
/// Returns [`CheckpointError::Serialization`] or [`CheckpointError::Io`].
pub fn save(registry: &CertificateRegistry, path: impl AsRef<Path>) -> Result<(), CheckpointError> {
    fs::write(path, to_bytes(registry)?)?;
    Ok(())
}

/// Reads a registry checkpoint from a file.
///
/// # Errors
///
/// Returns [`CheckpointError::Serialization`] or [`CheckpointError::Io`].
pub fn load(path: impl AsRef<Path>) -> Result<CertificateRegistry, CheckpointError> {
    from_bytes(&fs::read(path)?)
}
