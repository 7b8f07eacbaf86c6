use std::sync::Arc;

use crate::errors::Result;
use crate::transactions::transactions_model::{Paged, TransactionRecord, TransactionType};
use crate::transactions::transactions_traits::TransactionRepositoryTrait;

/// Read-side service over the transaction ledger.
///
/// Writes never go through here; records are inserted exclusively inside the
/// engine's write transaction.
pub struct TransactionQueryService {
    repository: Arc<dyn TransactionRepositoryTrait>,
}

impl TransactionQueryService {
    pub fn new(repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        Self { repository }
    }

    pub fn get_user_transactions(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>> {
        self.repository.list_for_user(user_id, page, limit)
    }

    pub fn get_wallet_transactions(
        &self,
        wallet_id: &str,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>> {
        self.repository
            .list_for_wallet(wallet_id, user_id, page, limit)
    }

    pub fn get_transactions_by_type(
        &self,
        user_id: &str,
        transaction_type: TransactionType,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>> {
        self.repository
            .list_by_type(user_id, transaction_type, page, limit)
    }

    pub fn get_transaction(
        &self,
        transaction_id: &str,
        user_id: &str,
    ) -> Result<Option<TransactionRecord>> {
        self.repository.get_by_id(transaction_id, user_id)
    }
}
