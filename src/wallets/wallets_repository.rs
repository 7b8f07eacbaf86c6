use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::wallets;
use crate::wallets::wallets_model::{Wallet, WalletDB};
use crate::wallets::wallets_traits::WalletRepositoryTrait;

/// Repository for wallet rows.
pub struct WalletRepository {
    pool: Arc<DbPool>,
}

impl WalletRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl WalletRepositoryTrait for WalletRepository {
    fn find_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        currency: &str,
    ) -> Result<Option<WalletDB>> {
        let row = wallets::table
            .filter(wallets::user_id.eq(user_id))
            .filter(wallets::currency.eq(currency))
            .first::<WalletDB>(conn)
            .optional()?;

        Ok(row)
    }

    fn set_balance_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        wallet_id: &str,
        new_balance: Decimal,
    ) -> Result<WalletDB> {
        let updated = diesel::update(wallets::table.filter(wallets::id.eq(wallet_id)))
            .set((
                wallets::balance.eq(new_balance.to_string()),
                wallets::updated_at.eq(Utc::now().to_rfc3339()),
            ))
            .get_result::<WalletDB>(conn)?;

        Ok(updated)
    }

    fn create_if_absent_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        currency: &str,
    ) -> Result<WalletDB> {
        if let Some(existing) = self.find_in_transaction(conn, user_id, currency)? {
            return Ok(existing);
        }

        let now = Utc::now().to_rfc3339();
        let row = WalletDB {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            currency: currency.to_string(),
            balance: Decimal::ZERO.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        let inserted = diesel::insert_into(wallets::table)
            .values(&row)
            .get_result::<WalletDB>(conn)?;

        Ok(inserted)
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Wallet>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = wallets::table
            .filter(wallets::user_id.eq(user_id))
            .order(wallets::currency.asc())
            .load::<WalletDB>(&mut conn)?;

        Ok(rows.into_iter().map(Wallet::from).collect())
    }

    fn find_by_currency(&self, user_id: &str, currency: &str) -> Result<Option<Wallet>> {
        let mut conn = get_connection(&self.pool)?;

        let row = wallets::table
            .filter(wallets::user_id.eq(user_id))
            .filter(wallets::currency.eq(currency))
            .first::<WalletDB>(&mut conn)
            .optional()?;

        Ok(row.map(Wallet::from))
    }
}
