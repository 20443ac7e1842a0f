use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    errors::StorageError,
};

use super::{codec, Result, StorageBackend};

const RECORD_EXTENSION: &str = "json";

/// Stores each record as `<root>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, name: &str) -> Result<PathBuf> {
        validate_record_name(name)?;
        Ok(self.root.join(format!("{}.{}", name, RECORD_EXTENSION)))
    }

    pub fn wallet_path(&self, login: &str) -> Result<PathBuf> {
        self.record_path(&codec::wallet_record_name(login))
    }
}

impl StorageBackend for JsonStorage {
    fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.record_path(name)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(&path)?))
    }

    fn write_record(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.record_path(name)?;
        write_atomic(&path, bytes)?;
        Ok(())
    }
}

fn validate_record_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains('/') || name.contains('\\') || name.contains("..")
    {
        return Err(StorageError::InvalidRecordName(name.to_string()));
    }
    Ok(())
}
