//! The certificate registry state machine.

// Snapshot and revocation counts fit in u64 on every supported platform.
#![allow(clippy::cast_possible_truncation)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::access::AccessControl;
use crate::identity::ActorId;
use crate::registry::error::RegistryError;
use crate::registry::state::{
    CertId, Certificate, RegistryStats, TxContext, VersionSnapshot, MAX_ITEM_ID_LEN,
    MAX_METADATA_LEN,
};

/// Certificate store, version history, and the operations that mutate them.
///
/// One instance owns all registry state exclusively; no other component
/// writes `certificates`, `history`, or the access-control fields directly.
/// Each public operation validates every precondition before its first
/// write, so a failed call leaves the registry untouched.
///
/// The maps are `BTreeMap` so that checkpoints serialize deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRegistry {
    access: AccessControl,

    /// Certificate id to current record.
    certificates: BTreeMap<CertId, Certificate>,

    /// Certificate id to its append-only version history. For every
    /// certificate the inner map holds exactly the versions
    /// `1..=certificate.version`, with no gaps.
    history: BTreeMap<CertId, BTreeMap<u64, VersionSnapshot>>,

    /// Last-allocated certificate id; ids are assigned sequentially from 1
    /// and never reused.
    certificate_counter: u64,
}

impl CertificateRegistry {
    /// Creates an empty registry administered by `admin`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidAddress`] if `admin` is the null
    /// identity.
    pub fn new(admin: ActorId) -> Result<Self, RegistryError> {
        Ok(Self {
            access: AccessControl::new(admin)?,
            certificates: BTreeMap::new(),
            history: BTreeMap::new(),
            certificate_counter: 0,
        })
    }

    // ------------------------------------------------------------------
    // Access-control surface
    // ------------------------------------------------------------------

    /// Replaces the administrator. Admin-gated.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthorized`] if the caller is not the
    /// current administrator, or [`RegistryError::InvalidAddress`] if
    /// `new_admin` is the null identity.
    pub fn transfer_admin(
        &mut self,
        ctx: &TxContext,
        new_admin: ActorId,
    ) -> Result<(), RegistryError> {
        self.access.transfer_admin(&ctx.caller, new_admin)?;
        tracing::debug!(caller = %ctx.caller, admin = %self.access.admin(), "admin transferred");
        Ok(())
    }

    /// Sets the global pause flag. Admin-gated.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthorized`] if the caller is not the
    /// current administrator.
    pub fn set_paused(&mut self, ctx: &TxContext, paused: bool) -> Result<(), RegistryError> {
        self.access.set_paused(&ctx.caller, paused)?;
        tracing::debug!(caller = %ctx.caller, paused, "pause flag set");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lifecycle operations
    // ------------------------------------------------------------------

    /// Issues a new certificate and records its version-1 snapshot.
    ///
    /// Preconditions are checked in order, short-circuiting on the first
    /// failure: caller is admin, owner is non-null, metadata bound, item-id
    /// bound, registry not paused.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthorized`],
    /// [`RegistryError::InvalidAddress`], [`RegistryError::InvalidMetadata`],
    /// [`RegistryError::Paused`], or [`RegistryError::CertificateExists`]
    /// (allocator collision, unreachable while the counter invariant holds).
    pub fn issue(
        &mut self,
        ctx: &TxContext,
        item_id: impl Into<String>,
        owner: ActorId,
        metadata: impl Into<String>,
    ) -> Result<CertId, RegistryError> {
        let item_id = item_id.into();
        let metadata = metadata.into();

        self.access.require_admin(&ctx.caller)?;
        if owner.is_null() {
            return Err(RegistryError::InvalidAddress {
                field: "owner".to_string(),
            });
        }
        check_bound("metadata", &metadata, MAX_METADATA_LEN)?;
        check_bound("item_id", &item_id, MAX_ITEM_ID_LEN)?;
        self.access.require_unpaused()?;

        let cert_id = self.certificate_counter + 1;
        if self.certificates.contains_key(&cert_id) {
            return Err(RegistryError::CertificateExists { cert_id });
        }

        let certificate = Certificate {
            item_id,
            owner,
            issuer: ctx.caller.clone(),
            issued_at: ctx.at,
            version: 1,
            revoked: false,
            metadata: metadata.clone(),
        };
        self.certificates.insert(cert_id, certificate);
        self.record_snapshot(cert_id, 1, metadata, ctx);
        self.certificate_counter = cert_id;

        tracing::debug!(caller = %ctx.caller, cert_id, at = ctx.at, "certificate issued");
        Ok(cert_id)
    }

    /// Updates a certificate's metadata, bumping its version by exactly 1
    /// and appending the corresponding history snapshot. Owner, issuer, and
    /// issuance timestamp are untouched. Returns the new version.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthorized`],
    /// [`RegistryError::InvalidMetadata`], [`RegistryError::Paused`],
    /// [`RegistryError::InvalidCertificateId`], or
    /// [`RegistryError::CertificateRevoked`].
    pub fn update_metadata(
        &mut self,
        ctx: &TxContext,
        cert_id: CertId,
        metadata: impl Into<String>,
    ) -> Result<u64, RegistryError> {
        let metadata = metadata.into();

        self.access.require_admin(&ctx.caller)?;
        check_bound("metadata", &metadata, MAX_METADATA_LEN)?;
        self.access.require_unpaused()?;

        let certificate = self
            .certificates
            .get_mut(&cert_id)
            .ok_or(RegistryError::InvalidCertificateId { cert_id })?;
        if certificate.revoked {
            return Err(RegistryError::CertificateRevoked { cert_id });
        }

        let new_version = certificate.version + 1;
        certificate.version = new_version;
        certificate.metadata = metadata.clone();
        self.record_snapshot(cert_id, new_version, metadata, ctx);

        tracing::debug!(caller = %ctx.caller, cert_id, version = new_version, "metadata updated");
        Ok(new_version)
    }

    /// Revokes a certificate. Terminal: no operation ever clears the flag,
    /// and every subsequent mutation or verification of the certificate
    /// fails with [`RegistryError::CertificateRevoked`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthorized`], [`RegistryError::Paused`],
    /// [`RegistryError::InvalidCertificateId`], or
    /// [`RegistryError::CertificateRevoked`] if already revoked (revocation
    /// is terminal either way, so "already revoked" shares the kind).
    pub fn revoke(&mut self, ctx: &TxContext, cert_id: CertId) -> Result<(), RegistryError> {
        self.access.require_admin(&ctx.caller)?;
        self.access.require_unpaused()?;

        let certificate = self
            .certificates
            .get_mut(&cert_id)
            .ok_or(RegistryError::InvalidCertificateId { cert_id })?;
        if certificate.revoked {
            return Err(RegistryError::CertificateRevoked { cert_id });
        }
        certificate.revoked = true;

        tracing::debug!(caller = %ctx.caller, cert_id, "certificate revoked");
        Ok(())
    }

    /// Transfers ownership of a certificate to `new_owner`.
    ///
    /// Owner-gated, not admin-gated: the caller must be the certificate's
    /// current owner. No version bump and no history entry (history tracks
    /// metadata provenance, not custody).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Paused`], [`RegistryError::InvalidAddress`],
    /// [`RegistryError::InvalidCertificateId`],
    /// [`RegistryError::NotAuthorized`] if the caller is not the current
    /// owner, or [`RegistryError::CertificateRevoked`].
    pub fn transfer(
        &mut self,
        ctx: &TxContext,
        cert_id: CertId,
        new_owner: ActorId,
    ) -> Result<(), RegistryError> {
        self.access.require_unpaused()?;
        if new_owner.is_null() {
            return Err(RegistryError::InvalidAddress {
                field: "new_owner".to_string(),
            });
        }

        let certificate = self
            .certificates
            .get_mut(&cert_id)
            .ok_or(RegistryError::InvalidCertificateId { cert_id })?;
        if ctx.caller != certificate.owner {
            return Err(RegistryError::NotAuthorized {
                actor: ctx.caller.clone(),
            });
        }
        if certificate.revoked {
            return Err(RegistryError::CertificateRevoked { cert_id });
        }
        certificate.owner = new_owner;

        tracing::debug!(caller = %ctx.caller, cert_id, owner = %certificate.owner, "ownership transferred");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Verification and read accessors
    // ------------------------------------------------------------------

    /// Verifies that a certificate exists, is not revoked, and is currently
    /// at exactly the supplied version.
    ///
    /// Peer systems call this before trusting any certificate-derived claim
    /// and must treat every error as a hard stop.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidCertificateId`],
    /// [`RegistryError::CertificateRevoked`], or
    /// [`RegistryError::VersionMismatch`] for any version other than the
    /// current one, historical versions included.
    pub fn verify(&self, cert_id: CertId, version: u64) -> Result<(), RegistryError> {
        let certificate = self
            .certificates
            .get(&cert_id)
            .ok_or(RegistryError::InvalidCertificateId { cert_id })?;
        if certificate.revoked {
            return Err(RegistryError::CertificateRevoked { cert_id });
        }
        if certificate.version != version {
            return Err(RegistryError::VersionMismatch {
                cert_id,
                current: certificate.version,
                requested: version,
            });
        }
        Ok(())
    }

    /// Returns the certificate with the given id, if it exists.
    #[must_use]
    pub fn certificate(&self, cert_id: CertId) -> Option<&Certificate> {
        self.certificates.get(&cert_id)
    }

    /// Returns the history snapshot for `(cert_id, version)`, if it exists.
    #[must_use]
    pub fn snapshot(&self, cert_id: CertId, version: u64) -> Option<&VersionSnapshot> {
        self.history.get(&cert_id)?.get(&version)
    }

    /// Iterates a certificate's history in version order (1 up to the
    /// current version). Empty for unknown ids.
    pub fn history(&self, cert_id: CertId) -> impl Iterator<Item = (u64, &VersionSnapshot)> + '_ {
        self.history
            .get(&cert_id)
            .into_iter()
            .flatten()
            .map(|(version, snapshot)| (*version, snapshot))
    }

    /// The current administrator.
    #[must_use]
    pub fn admin(&self) -> &ActorId {
        self.access.admin()
    }

    /// Returns `true` if the global mutation lock is engaged.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.access.is_paused()
    }

    /// Number of certificates ever issued (the allocator counter).
    #[must_use]
    pub const fn issued_count(&self) -> u64 {
        self.certificate_counter
    }

    /// Aggregate counts over this registry.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            certificate_count: self.certificate_counter,
            revoked_count: self.certificates.values().filter(|c| c.revoked).count() as u64,
            snapshot_count: self.history.values().map(|h| h.len() as u64).sum(),
            paused: self.access.is_paused(),
        }
    }

    /// Writes the history entry for `(cert_id, version)`.
    ///
    /// The single code path through which snapshots are created; always
    /// targets the next unused version, so existing entries are never
    /// overwritten.
    fn record_snapshot(&mut self, cert_id: CertId, version: u64, metadata: String, ctx: &TxContext) {
        let entry = self.history.entry(cert_id).or_default();
        debug_assert!(
            !entry.contains_key(&version),
            "history entry ({cert_id}, {version}) would be overwritten"
        );
        entry.insert(
            version,
            VersionSnapshot {
                metadata,
                updated_at: ctx.at,
                updated_by: ctx.caller.clone(),
            },
        );
    }
}

/// Fails unless `value` has a length in `(0, max]` bytes.
fn check_bound(field: &str, value: &str, max: usize) -> Result<(), RegistryError> {
    if value.is_empty() || value.len() > max {
        return Err(RegistryError::InvalidMetadata {
            field: field.to_string(),
            length: value.len(),
            max,
        });
    }
    Ok(())
}
