use thiserror::Error;

/// Domain failures raised by ledger operations.
///
/// Every variant aborts only the operation that produced it; the wallet is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Category already exists: {0}")]
    DuplicateCategory(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Cannot transfer funds to yourself")]
    SelfTransfer,
    #[error("Recipient not found: {0}")]
    UnknownRecipient(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures at the persistence boundary. These never escape as domain errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("record schema v{found} is newer than supported v{supported}")]
    UnsupportedSchema { found: u8, supported: u8 },
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error("invalid record name `{0}`")]
    InvalidRecordName(String),
}

/// Failures raised by the user directory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Login must not be blank")]
    BlankLogin,
    #[error("Password must not be blank")]
    BlankPassword,
    #[error("Invalid login: {0}")]
    InvalidLogin(String),
    #[error("A user with login `{0}` already exists")]
    LoginTaken(String),
    #[error("User not found: {0}")]
    UnknownUser(String),
    #[error("Wrong password")]
    WrongPassword,
}

/// Failures reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}
