use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::transactions;
use crate::transactions::transactions_model::{
    NewTransaction, Paged, TransactionDB, TransactionRecord, TransactionType,
};
use crate::transactions::transactions_traits::TransactionRepositoryTrait;

const DEFAULT_PAGE_LIMIT: i64 = 20;
const MAX_PAGE_LIMIT: i64 = 100;

/// Repository for the append-only transaction ledger.
pub struct TransactionRepository {
    pool: Arc<DbPool>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Normalizes pagination input: pages are 1-based, limits are clamped.
    fn page_window(page: i64, limit: i64) -> (i64, i64, i64) {
        let page = page.max(1);
        let limit = if limit <= 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            limit.min(MAX_PAGE_LIMIT)
        };
        (page, limit, (page - 1) * limit)
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    fn create_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        new_transaction: NewTransaction,
    ) -> Result<TransactionRecord> {
        let metadata = new_transaction
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let row = TransactionDB {
            id: Uuid::new_v4().to_string(),
            user_id: new_transaction.user_id,
            wallet_id: new_transaction.wallet_id,
            transaction_type: new_transaction.transaction_type.as_str().to_string(),
            status: new_transaction.status.as_str().to_string(),
            amount: new_transaction.amount.to_string(),
            source_currency: new_transaction.source_currency,
            target_currency: new_transaction.target_currency,
            exchange_rate: new_transaction.exchange_rate.to_string(),
            reference: Uuid::new_v4().to_string(),
            metadata,
            timestamp: Utc::now().to_rfc3339(),
        };

        let inserted = diesel::insert_into(transactions::table)
            .values(&row)
            .get_result::<TransactionDB>(conn)?;

        Ok(TransactionRecord::from(inserted))
    }

    fn list_for_user(
        &self,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, limit, offset) = Self::page_window(page, limit);

        let total = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        let rows = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .order(transactions::timestamp.desc())
            .limit(limit)
            .offset(offset)
            .load::<TransactionDB>(&mut conn)?;

        Ok(Paged {
            items: rows.into_iter().map(TransactionRecord::from).collect(),
            total,
            page,
            limit,
        })
    }

    fn list_for_wallet(
        &self,
        wallet_id: &str,
        user_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, limit, offset) = Self::page_window(page, limit);

        let total = transactions::table
            .filter(transactions::wallet_id.eq(wallet_id))
            .filter(transactions::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        let rows = transactions::table
            .filter(transactions::wallet_id.eq(wallet_id))
            .filter(transactions::user_id.eq(user_id))
            .order(transactions::timestamp.desc())
            .limit(limit)
            .offset(offset)
            .load::<TransactionDB>(&mut conn)?;

        Ok(Paged {
            items: rows.into_iter().map(TransactionRecord::from).collect(),
            total,
            page,
            limit,
        })
    }

    fn list_by_type(
        &self,
        user_id: &str,
        transaction_type: TransactionType,
        page: i64,
        limit: i64,
    ) -> Result<Paged<TransactionRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, limit, offset) = Self::page_window(page, limit);

        let total = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::transaction_type.eq(transaction_type.as_str()))
            .count()
            .get_result::<i64>(&mut conn)?;

        let rows = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::transaction_type.eq(transaction_type.as_str()))
            .order(transactions::timestamp.desc())
            .limit(limit)
            .offset(offset)
            .load::<TransactionDB>(&mut conn)?;

        Ok(Paged {
            items: rows.into_iter().map(TransactionRecord::from).collect(),
            total,
            page,
            limit,
        })
    }

    fn get_by_id(&self, transaction_id: &str, user_id: &str) -> Result<Option<TransactionRecord>> {
        let mut conn = get_connection(&self.pool)?;

        let row = transactions::table
            .filter(transactions::id.eq(transaction_id))
            .filter(transactions::user_id.eq(user_id))
            .first::<TransactionDB>(&mut conn)
            .optional()?;

        Ok(row.map(TransactionRecord::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_normalization() {
        assert_eq!(TransactionRepository::page_window(1, 20), (1, 20, 0));
        assert_eq!(TransactionRepository::page_window(3, 10), (3, 10, 20));
        // Zero and negative input falls back to defaults.
        assert_eq!(
            TransactionRepository::page_window(0, 0),
            (1, DEFAULT_PAGE_LIMIT, 0)
        );
        // Oversized limits are clamped.
        assert_eq!(
            TransactionRepository::page_window(1, 10_000),
            (1, MAX_PAGE_LIMIT, 0)
        );
    }
}
