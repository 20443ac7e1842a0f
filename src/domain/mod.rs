pub mod category;
pub mod transaction;
pub mod user;
pub mod wallet;

pub use category::Category;
pub use transaction::{Transaction, TransactionKind};
pub use user::{validate_login, User};
pub use wallet::Wallet;

/// Pseudo-category debited on the sender's wallet by a transfer.
pub const TRANSFER_OUT_CATEGORY: &str = "transfer-out";
/// Pseudo-category credited on the recipient's wallet by a transfer.
pub const TRANSFER_IN_CATEGORY: &str = "transfer-in";
