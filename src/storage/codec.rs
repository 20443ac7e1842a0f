//! JSON encoding for wallet and user-directory records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{validate_login, TransactionKind, Wallet},
    errors::StorageError,
};

use super::Result;

/// Version written into every record envelope.
pub const SCHEMA_VERSION: u8 = 1;
pub const WALLET_RECORD_PREFIX: &str = "wallet_";
pub const DIRECTORY_RECORD_NAME: &str = "users";

/// Record name holding the wallet of `login`.
pub fn wallet_record_name(login: &str) -> String {
    format!("{}{}", WALLET_RECORD_PREFIX, login)
}

/// Persisted login → credential hash table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecords(BTreeMap<String, String>);

impl UserRecords {
    pub fn get(&self, login: &str) -> Option<&str> {
        self.0.get(login).map(String::as_str)
    }

    pub fn contains(&self, login: &str) -> bool {
        self.0.contains_key(login)
    }

    pub fn insert(&mut self, login: impl Into<String>, hash: impl Into<String>) {
        self.0.insert(login.into(), hash.into());
    }

    pub fn logins(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Serialize)]
struct WalletRecordRef<'a> {
    schema_version: u8,
    wallet: &'a Wallet,
}

#[derive(Deserialize)]
struct WalletRecord {
    schema_version: u8,
    wallet: Wallet,
}

#[derive(Serialize)]
struct DirectoryRecordRef<'a> {
    schema_version: u8,
    users: &'a UserRecords,
}

#[derive(Deserialize)]
struct DirectoryRecord {
    schema_version: u8,
    #[serde(default)]
    users: UserRecords,
}

pub fn encode_wallet(wallet: &Wallet) -> Result<Vec<u8>> {
    let record = WalletRecordRef {
        schema_version: SCHEMA_VERSION,
        wallet,
    };
    Ok(serde_json::to_vec_pretty(&record)?)
}

pub fn decode_wallet(bytes: &[u8]) -> Result<Wallet> {
    let record: WalletRecord = serde_json::from_slice(bytes)?;
    ensure_schema_support(record.schema_version)?;
    validate_wallet(&record.wallet)?;
    Ok(record.wallet)
}

pub fn encode_directory(records: &UserRecords) -> Result<Vec<u8>> {
    let record = DirectoryRecordRef {
        schema_version: SCHEMA_VERSION,
        users: records,
    };
    Ok(serde_json::to_vec_pretty(&record)?)
}

pub fn decode_directory(bytes: &[u8]) -> Result<UserRecords> {
    let record: DirectoryRecord = serde_json::from_slice(bytes)?;
    ensure_schema_support(record.schema_version)?;
    if let Some(login) = record.users.logins().find(|login| validate_login(login).is_err()) {
        return Err(StorageError::Corrupt(format!("invalid login `{}`", login)));
    }
    Ok(record.users)
}

fn ensure_schema_support(found: u8) -> Result<()> {
    if found > SCHEMA_VERSION {
        return Err(StorageError::UnsupportedSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(())
}

/// Rejects decoded wallets that break the ledger invariants.
fn validate_wallet(wallet: &Wallet) -> Result<()> {
    for (key, category) in wallet.categories() {
        if category.name().trim().is_empty() {
            return Err(StorageError::Corrupt("blank category name".into()));
        }
        if key != category.name() {
            return Err(StorageError::Corrupt(format!(
                "category key `{}` does not match name `{}`",
                key,
                category.name()
            )));
        }
        if category.budget() < Decimal::ZERO {
            return Err(StorageError::Corrupt(format!(
                "category `{}` has a negative budget",
                key
            )));
        }
    }
    for txn in wallet.transactions() {
        if txn.amount <= Decimal::ZERO {
            return Err(StorageError::Corrupt(format!(
                "transaction {} has a non-positive amount",
                txn.id
            )));
        }
        if txn.kind == TransactionKind::Expense && !wallet.has_category(&txn.category) {
            return Err(StorageError::Corrupt(format!(
                "expense {} references unknown category `{}`",
                txn.id, txn.category
            )));
        }
    }
    for kind in [TransactionKind::Income, TransactionKind::Expense] {
        if wallet.checked_total(kind).is_none() {
            return Err(StorageError::Corrupt(format!("{} total overflows", kind)));
        }
    }
    Ok(())
}
