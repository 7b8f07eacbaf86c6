pub mod db;

pub mod events;
pub mod fx;
pub mod transactions;
pub mod wallets;

pub mod config;
pub mod constants;
pub mod errors;
pub mod schema;

pub use config::WalletConfig;
pub use errors::{Error, Result};
