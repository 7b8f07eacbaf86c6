use diesel::SqliteConnection;

use crate::errors::Result;
use crate::transactions::transactions_model::{NewTransaction, Paged, TransactionRecord, TransactionType};

/// Trait defining the contract for transaction record storage.
///
/// The ledger is append-only. `create_in_transaction` is the single write path
/// and is only ever called from inside the engine's write transaction, so a
/// record exists exactly when the balance change it documents committed.
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Inserts one record on an already-open connection/transaction.
    fn create_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        new_transaction: NewTransaction,
    ) -> Result<TransactionRecord>;

    /// All records for a user, newest first, paginated.
    fn list_for_user(&self, user_id: &str, page: i64, limit: i64)
        -> Result<Paged<TransactionRecord>>;

    /// Records touching one wallet, scoped to its owner.
    fn list_for_wallet(
        &self,
        wallet_id: &str,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>>;

    /// Records of one type for a user.
    fn list_by_type(
        &self,
        user_id: &str,
        transaction_type: TransactionType,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>>;

    /// A single record by id, scoped to its owner.
    fn get_by_id(&self, transaction_id: &str, user_id: &str) -> Result<Option<TransactionRecord>>;
}
