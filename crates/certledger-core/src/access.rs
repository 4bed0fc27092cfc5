//! Access-control policy: a single administrator and a global pause flag.
//!
//! Exactly one administrator identity exists at any time, initialized to the
//! identity that created the registry. Every admin-gated operation runs
//! [`AccessControl::require_admin`] as its first check; pause-gated
//! operations run [`AccessControl::require_unpaused`]. Ownership transfer is
//! deliberately the one mutation that is pause-gated but not admin-gated
//! (owner self-service), so it only ever calls `require_unpaused`.

use serde::{Deserialize, Serialize};

use crate::identity::ActorId;
use crate::registry::RegistryError;

/// Administrator identity and pause flag for one registry instance.
///
/// Mutated only through [`transfer_admin`](Self::transfer_admin) and
/// [`set_paused`](Self::set_paused); never shared as ambient global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    admin: ActorId,
    paused: bool,
}

impl AccessControl {
    /// Creates the policy with the given initial administrator, unpaused.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidAddress`] if `admin` is the null
    /// identity.
    pub fn new(admin: ActorId) -> Result<Self, RegistryError> {
        if admin.is_null() {
            return Err(RegistryError::InvalidAddress {
                field: "admin".to_string(),
            });
        }
        Ok(Self {
            admin,
            paused: false,
        })
    }

    /// The current administrator.
    #[must_use]
    pub fn admin(&self) -> &ActorId {
        &self.admin
    }

    /// Returns `true` if the global mutation lock is engaged.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Replaces the administrator.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthorized`] if `caller` is not the
    /// current administrator, or [`RegistryError::InvalidAddress`] if
    /// `new_admin` is the null identity.
    pub fn transfer_admin(
        &mut self,
        caller: &ActorId,
        new_admin: ActorId,
    ) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        if new_admin.is_null() {
            return Err(RegistryError::InvalidAddress {
                field: "new_admin".to_string(),
            });
        }
        self.admin = new_admin;
        Ok(())
    }

    /// Sets the pause flag.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthorized`] if `caller` is not the
    /// current administrator.
    pub fn set_paused(&mut self, caller: &ActorId, paused: bool) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        self.paused = paused;
        Ok(())
    }

    /// Fails unless `caller` is the current administrator.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAuthorized`] otherwise.
    pub fn require_admin(&self, caller: &ActorId) -> Result<(), RegistryError> {
        if *caller == self.admin {
            Ok(())
        } else {
            Err(RegistryError::NotAuthorized {
                actor: caller.clone(),
            })
        }
    }

    /// Fails while the pause flag is set.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Paused`] otherwise.
    pub const fn require_unpaused(&self) -> Result<(), RegistryError> {
        if self.paused {
            Err(RegistryError::Paused)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(s: &str) -> ActorId {
        ActorId::new(s).unwrap()
    }

    #[test]
    fn initial_admin_is_set_and_unpaused() {
        let access = AccessControl::new(actor("admin")).unwrap();
        assert_eq!(access.admin(), &actor("admin"));
        assert!(!access.is_paused());
    }

    #[test]
    fn null_initial_admin_is_rejected() {
        assert!(matches!(
            AccessControl::new(ActorId::null()),
            Err(RegistryError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn only_admin_can_transfer_admin() {
        let mut access = AccessControl::new(actor("admin")).unwrap();
        let err = access
            .transfer_admin(&actor("mallory"), actor("mallory"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotAuthorized { .. }));
        assert_eq!(access.admin(), &actor("admin"));

        access.transfer_admin(&actor("admin"), actor("admin2")).unwrap();
        assert_eq!(access.admin(), &actor("admin2"));

        // The old admin no longer holds the role.
        assert!(access.require_admin(&actor("admin")).is_err());
        assert!(access.require_admin(&actor("admin2")).is_ok());
    }

    #[test]
    fn admin_cannot_be_transferred_to_null() {
        let mut access = AccessControl::new(actor("admin")).unwrap();
        let err = access
            .transfer_admin(&actor("admin"), ActorId::null())
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAddress { .. }));
        assert_eq!(access.admin(), &actor("admin"));
    }

    #[test]
    fn pause_is_admin_gated() {
        let mut access = AccessControl::new(actor("admin")).unwrap();
        assert!(access.set_paused(&actor("mallory"), true).is_err());
        assert!(!access.is_paused());

        access.set_paused(&actor("admin"), true).unwrap();
        assert!(access.is_paused());
        assert!(matches!(
            access.require_unpaused(),
            Err(RegistryError::Paused)
        ));

        access.set_paused(&actor("admin"), false).unwrap();
        assert!(access.require_unpaused().is_ok());
    }
}
