//! User directory: registered logins and their credential hashes.

use sha2::{Digest, Sha256};

use crate::{
    domain::{validate_login, User},
    errors::AuthError,
    storage::{self, SafeLoad, StorageBackend, UserRecords},
};

/// The view of the user directory the ledger depends on.
pub trait IdentityDirectory {
    fn login_exists(&self, login: &str) -> bool;
    fn known_logins(&self) -> Vec<String>;
}

#[derive(Debug, Default, Clone)]
pub struct UserDirectory {
    records: UserRecords,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: UserRecords) -> Self {
        Self { records }
    }

    /// Loads the directory record; an unreadable record yields an empty directory.
    pub fn load(backend: &dyn StorageBackend) -> SafeLoad<Self> {
        match storage::load_directory(backend) {
            SafeLoad::Found(records) => SafeLoad::Found(Self::from_records(records)),
            SafeLoad::Missing(records) => SafeLoad::Missing(Self::from_records(records)),
            SafeLoad::Degraded { value, reason } => SafeLoad::Degraded {
                value: Self::from_records(value),
                reason,
            },
        }
    }

    pub fn save(&self, backend: &dyn StorageBackend) -> storage::Result<()> {
        storage::save_directory(backend, &self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn register(&mut self, login: &str, password: &str) -> Result<User, AuthError> {
        validate_login(login)?;
        if password.trim().is_empty() {
            return Err(AuthError::BlankPassword);
        }
        if self.records.contains(login) {
            return Err(AuthError::LoginTaken(login.to_string()));
        }
        let user = User::new(login)?;
        self.records.insert(login, hash_password(password));
        tracing::info!(login, "user registered");
        Ok(user)
    }

    pub fn authenticate(&self, login: &str, password: &str) -> Result<User, AuthError> {
        validate_login(login)?;
        let stored = self
            .records
            .get(login)
            .ok_or_else(|| AuthError::UnknownUser(login.to_string()))?;
        if stored != hash_password(password) {
            tracing::warn!(login, "authentication failed");
            return Err(AuthError::WrongPassword);
        }
        User::new(login)
    }
}

impl IdentityDirectory for UserDirectory {
    fn login_exists(&self, login: &str) -> bool {
        self.records.contains(login)
    }

    fn known_logins(&self) -> Vec<String> {
        self.records.logins().map(str::to_string).collect()
    }
}

/// Lowercase hex SHA-256 of `password`.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|byte| format!("{:02x}", byte)).collect()
}
