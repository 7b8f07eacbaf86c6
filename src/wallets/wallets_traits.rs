use diesel::SqliteConnection;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::wallets::wallets_model::{Wallet, WalletDB};

/// Trait defining the contract for wallet storage.
///
/// Methods taking a `SqliteConnection` run inside the engine's write
/// transaction on the dedicated writer connection; the pool-backed methods are
/// plain reads.
pub trait WalletRepositoryTrait: Send + Sync {
    /// The wallet for `(user, currency)` on the writer connection, if any.
    fn find_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        currency: &str,
    ) -> Result<Option<WalletDB>>;

    /// Sets the wallet's balance and bumps `updated_at`. Returns the updated row.
    fn set_balance_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        wallet_id: &str,
        new_balance: Decimal,
    ) -> Result<WalletDB>;

    /// Inserts a zero-balance wallet unless `(user, currency)` already exists.
    /// Returns the row either way.
    fn create_if_absent_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        currency: &str,
    ) -> Result<WalletDB>;

    /// All wallets for a user.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Wallet>>;

    /// The wallet for `(user, currency)`, if any.
    fn find_by_currency(&self, user_id: &str, currency: &str) -> Result<Option<Wallet>>;
}
