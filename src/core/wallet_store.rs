use std::collections::HashMap;

use crate::domain::Wallet;
use crate::storage::{self, SafeLoad, StorageBackend};

/// Result of persisting cached wallets. Failures are reported, never raised.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub saved: Vec<String>,
    pub failed: Vec<SaveFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    pub login: String,
    pub reason: String,
}

impl SaveReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, login: &str, result: storage::Result<()>) {
        match result {
            Ok(()) => self.saved.push(login.to_string()),
            Err(err) => {
                tracing::error!(login, error = %err, "failed to save wallet");
                self.failed.push(SaveFailure {
                    login: login.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Load-on-demand cache of wallets keyed by owner login.
///
/// The store has a single owner: ledger operations borrow it mutably, so two operations can
/// never interleave. A host that shares it between threads must add its own per-login locking.
pub struct WalletStore {
    wallets: HashMap<String, Wallet>,
    storage: Box<dyn StorageBackend>,
}

impl WalletStore {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            wallets: HashMap::new(),
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Returns the cached wallet for `login`, loading it from storage on first access.
    ///
    /// A missing or unreadable record yields an empty wallet (see [`SafeLoad`]).
    pub fn get_or_load(&mut self, login: &str) -> &mut Wallet {
        let backend = self.storage.as_ref();
        self.wallets.entry(login.to_string()).or_insert_with(|| {
            tracing::debug!(login, "wallet cached");
            storage::load_wallet(backend, login).into_inner()
        })
    }

    /// Read-only cache lookup; never touches storage.
    pub fn get_if_cached(&self, login: &str) -> Option<&Wallet> {
        self.wallets.get(login)
    }

    /// Reloads the wallet of a freshly authenticated user and persists it right away.
    ///
    /// Any cached copy is replaced by the stored one. When the stored record was corrupt the
    /// empty replacement is written over it.
    pub fn open_session(&mut self, login: &str) -> SaveReport {
        let outcome = storage::load_wallet(self.storage.as_ref(), login);
        if let SafeLoad::Degraded { reason, .. } = &outcome {
            tracing::warn!(login, %reason, "session opened on an empty wallet");
        }
        let wallet = outcome.into_inner();
        let mut report = SaveReport::default();
        report.record(login, storage::save_wallet(self.storage.as_ref(), &wallet));
        self.wallets.insert(login.to_string(), wallet);
        tracing::info!(login, "session wallet loaded");
        report
    }

    /// Persists every wallet among `known_logins` that was loaded during this run.
    ///
    /// Logins that were never loaded are left untouched on disk.
    pub fn save_all<'a, I>(&self, known_logins: I) -> SaveReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = SaveReport::default();
        for login in known_logins {
            if let Some(wallet) = self.get_if_cached(login) {
                report.record(login, storage::save_wallet(self.storage.as_ref(), wallet));
            }
        }
        report
    }
}
