//! Persistence: opaque named records, the codec that fills them, and the degrade-on-failure
//! load policy.

pub mod codec;
pub mod json_backend;

use crate::{domain::Wallet, errors::StorageError};

pub use codec::{UserRecords, DIRECTORY_RECORD_NAME, SCHEMA_VERSION, WALLET_RECORD_PREFIX};
pub use json_backend::JsonStorage;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Abstraction over backends that store opaque records addressed by name.
pub trait StorageBackend: Send + Sync {
    /// Returns the bytes of record `name`, or `None` when it was never written.
    fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>>;
    /// Replaces record `name` with `bytes`.
    fn write_record(&self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Outcome of a load that never fails: storage trouble degrades to a default value.
///
/// `Degraded` means a record existed but could not be read or decoded. The default that
/// replaces it will overwrite the record on the next save, so its contents are lost.
#[derive(Debug)]
pub enum SafeLoad<T> {
    Found(T),
    Missing(T),
    Degraded { value: T, reason: String },
}

impl<T> SafeLoad<T> {
    pub fn value(&self) -> &T {
        match self {
            SafeLoad::Found(value) | SafeLoad::Missing(value) => value,
            SafeLoad::Degraded { value, .. } => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            SafeLoad::Found(value) | SafeLoad::Missing(value) => value,
            SafeLoad::Degraded { value, .. } => value,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SafeLoad::Found(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SafeLoad::Degraded { .. })
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            SafeLoad::Degraded { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Loads the wallet owned by `login`, falling back to an empty wallet.
pub fn load_wallet(backend: &dyn StorageBackend, login: &str) -> SafeLoad<Wallet> {
    let name = codec::wallet_record_name(login);
    let outcome = load_or_default(
        backend,
        &name,
        |bytes| {
            let wallet = codec::decode_wallet(bytes)?;
            if wallet.owner_login() != login {
                return Err(StorageError::Corrupt(format!(
                    "record belongs to `{}`",
                    wallet.owner_login()
                )));
            }
            Ok(wallet)
        },
        || Wallet::new(login),
    );
    if let SafeLoad::Degraded { reason, .. } = &outcome {
        tracing::warn!(login, %reason, "unable to load wallet, starting from an empty one");
    }
    outcome
}

pub fn save_wallet(backend: &dyn StorageBackend, wallet: &Wallet) -> Result<()> {
    let name = codec::wallet_record_name(wallet.owner_login());
    let bytes = codec::encode_wallet(wallet)?;
    backend.write_record(&name, &bytes)?;
    tracing::debug!(login = wallet.owner_login(), "wallet saved");
    Ok(())
}

/// Loads the user directory record, falling back to an empty directory.
pub fn load_directory(backend: &dyn StorageBackend) -> SafeLoad<UserRecords> {
    let outcome = load_or_default(
        backend,
        DIRECTORY_RECORD_NAME,
        codec::decode_directory,
        UserRecords::default,
    );
    if let SafeLoad::Degraded { reason, .. } = &outcome {
        tracing::warn!(%reason, "unable to load user directory, starting from an empty one");
    }
    outcome
}

pub fn save_directory(backend: &dyn StorageBackend, records: &UserRecords) -> Result<()> {
    let bytes = codec::encode_directory(records)?;
    backend.write_record(DIRECTORY_RECORD_NAME, &bytes)?;
    tracing::debug!(users = records.len(), "user directory saved");
    Ok(())
}

fn load_or_default<T>(
    backend: &dyn StorageBackend,
    name: &str,
    decode: impl FnOnce(&[u8]) -> Result<T>,
    default: impl FnOnce() -> T,
) -> SafeLoad<T> {
    match backend.read_record(name) {
        Ok(None) => SafeLoad::Missing(default()),
        Ok(Some(bytes)) => match decode(&bytes) {
            Ok(value) => SafeLoad::Found(value),
            Err(err) => SafeLoad::Degraded {
                value: default(),
                reason: err.to_string(),
            },
        },
        Err(err) => SafeLoad::Degraded {
            value: default(),
            reason: err.to_string(),
        },
    }
}
