pub mod services;
pub mod utils;
pub mod wallet_store;

pub use wallet_store::{SaveFailure, SaveReport, WalletStore};
