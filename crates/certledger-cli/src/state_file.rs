//! Registry state file.
//!
//! The CLI acts as its own host environment: between invocations the full
//! registry checkpoint lives in one JSON document next to a logical clock
//! high-water mark, and each mutating command is one transaction at the
//! next clock tick.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use certledger_core::{ActorId, CertificateRegistry, TxContext};
use serde::{Deserialize, Serialize};

/// On-disk state: the registry checkpoint plus the transaction clock.
#[derive(Debug, Serialize, Deserialize)]
pub struct StateFile {
    /// Logical timestamp of the last admitted transaction.
    pub clock: u64,

    /// The registry checkpoint.
    pub registry: CertificateRegistry,
}

impl StateFile {
    /// Creates a fresh state file for a newly initialized registry.
    pub fn new(registry: CertificateRegistry) -> Self {
        Self { clock: 0, registry }
    }

    /// Loads the state file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("no registry state at {} (run `init` first)", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("corrupt registry state at {}", path.display()))
    }

    /// Writes the state file to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        fs::write(path, bytes)
            .with_context(|| format!("cannot write registry state to {}", path.display()))?;
        Ok(())
    }

    /// Admits the next transaction: advances the clock and builds its
    /// context.
    pub fn next_tx(&mut self, caller: ActorId) -> TxContext {
        self.clock += 1;
        TxContext::new(caller, self.clock)
    }
}
