//! Shared-handle wrapper for embedders.
//!
//! The registry itself is a single-threaded state machine: the host admits
//! one transaction at a time, so operations never observe partial writes.
//! Embedders without such a host get the same guarantee from
//! [`SharedRegistry`], which serializes every operation under one lock and
//! hands out cloneable handles.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::registry::{CertId, Certificate, CertificateRegistry, RegistryError, VersionSnapshot};

/// Errors from shared-registry operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SharedRegistryError {
    /// The underlying registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Another holder of the lock panicked.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

/// A cloneable, thread-safe handle to one registry instance.
///
/// All handles reach the same state; mutations are serialized by the lock,
/// preserving the total order the host environment would otherwise provide.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<CertificateRegistry>>,
}

impl SharedRegistry {
    /// Wraps a registry in a shared handle.
    #[must_use]
    pub fn new(registry: CertificateRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Runs one mutating transaction against the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SharedRegistryError::LockPoisoned`] if the lock is
    /// poisoned, or the error produced by `op`.
    pub fn transact<T>(
        &self,
        op: impl FnOnce(&mut CertificateRegistry) -> Result<T, RegistryError>,
    ) -> Result<T, SharedRegistryError> {
        let mut registry = self
            .inner
            .write()
            .map_err(|_| SharedRegistryError::LockPoisoned)?;
        Ok(op(&mut registry)?)
    }

    /// Runs a read-only query against the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SharedRegistryError::LockPoisoned`] if the lock is
    /// poisoned.
    pub fn read<T>(
        &self,
        query: impl FnOnce(&CertificateRegistry) -> T,
    ) -> Result<T, SharedRegistryError> {
        let registry = self
            .inner
            .read()
            .map_err(|_| SharedRegistryError::LockPoisoned)?;
        Ok(query(&registry))
    }

    /// Verifies a certificate at an exact version (see
    /// [`CertificateRegistry::verify`]).
    ///
    /// # Errors
    ///
    /// Returns the verification error, or
    /// [`SharedRegistryError::LockPoisoned`].
    pub fn verify(&self, cert_id: CertId, version: u64) -> Result<(), SharedRegistryError> {
        self.read(|r| r.verify(cert_id, version))?
            .map_err(SharedRegistryError::Registry)
    }

    /// Returns a clone of the certificate with the given id, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SharedRegistryError::LockPoisoned`] if the lock is
    /// poisoned.
    pub fn certificate(&self, cert_id: CertId) -> Result<Option<Certificate>, SharedRegistryError> {
        self.read(|r| r.certificate(cert_id).cloned())
    }

    /// Returns a clone of the snapshot at `(cert_id, version)`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SharedRegistryError::LockPoisoned`] if the lock is
    /// poisoned.
    pub fn snapshot(
        &self,
        cert_id: CertId,
        version: u64,
    ) -> Result<Option<VersionSnapshot>, SharedRegistryError> {
        self.read(|r| r.snapshot(cert_id, version).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::identity::ActorId;
    use crate::registry::TxContext;

    fn actor(s: &str) -> ActorId {
        ActorId::new(s).unwrap()
    }

    #[test]
    fn handles_share_state() {
        let registry = CertificateRegistry::new(actor("admin")).unwrap();
        let shared = SharedRegistry::new(registry);
        let other = shared.clone();

        let ctx = TxContext::new(actor("admin"), 1);
        let id = shared
            .transact(|r| r.issue(&ctx, "ITEM123", actor("owner-a"), "Watch"))
            .unwrap();

        assert!(other.verify(id, 1).is_ok());
        assert_eq!(
            other.certificate(id).unwrap().unwrap().owner,
            actor("owner-a")
        );
    }

    #[test]
    fn concurrent_issuance_stays_gapless() {
        let registry = CertificateRegistry::new(actor("admin")).unwrap();
        let shared = SharedRegistry::new(registry);

        let handles: Vec<_> = (0u64..8)
            .map(|tick| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let ctx = TxContext::new(actor("admin"), tick);
                    shared
                        .transact(|r| r.issue(&ctx, "ITEM", actor("owner"), "Metadata"))
                        .unwrap()
                })
            })
            .collect();

        let mut ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn transaction_errors_pass_through() {
        let registry = CertificateRegistry::new(actor("admin")).unwrap();
        let shared = SharedRegistry::new(registry);

        let ctx = TxContext::new(actor("mallory"), 1);
        let err = shared
            .transact(|r| r.issue(&ctx, "ITEM", actor("owner"), "Metadata"))
            .unwrap_err();
        assert!(matches!(
            err,
            SharedRegistryError::Registry(RegistryError::NotAuthorized { .. })
        ));
    }
}
