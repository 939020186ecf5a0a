//! sqlx-backed store implementations for PostgreSQL.
//!
//! Queries use `RETURNING` so every write hands back the persisted row.
//! The unique constraint on `cards.card_number` is the backstop for the
//! check-then-act window in card creation; a conflicting insert surfaces
//! as a database error, which the creation flow translates. Transaction
//! writes run inside a database transaction so the row write and the
//! balance write commit together.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::balance::Balance;
use crate::models::card::{Card, CardStatus, NewCard};
use crate::models::transaction::{NewTransaction, Transaction};
use crate::store::{BalanceStore, CardStore, TransactionStore};

/// Balance store backed by the `balances` table.
#[derive(Clone)]
pub struct PgBalanceStore {
    pool: DbPool,
}

impl PgBalanceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BalanceStore for PgBalanceStore {
    async fn create(&self) -> Result<Balance, ApiError> {
        let balance = sqlx::query_as::<_, Balance>(
            r#"
            INSERT INTO balances (id, value)
            VALUES ($1, 0)
            RETURNING id, value
            "#,
        )
        .bind(Uuid::new_v4())
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Balance>, ApiError> {
        let balance =
            sqlx::query_as::<_, Balance>("SELECT id, value FROM balances WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(balance)
    }

    async fn save_value(&self, id: Uuid, value: Decimal) -> Result<Balance, ApiError> {
        let balance = sqlx::query_as::<_, Balance>(
            r#"
            UPDATE balances
            SET value = $2
            WHERE id = $1
            RETURNING id, value
            "#,
        )
        .bind(id)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::Unexpected)?;

        Ok(balance)
    }
}

/// Card store backed by the `cards` table.
#[derive(Clone)]
pub struct PgCardStore {
    pool: DbPool,
}

impl PgCardStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const CARD_COLUMNS: &str = "id, card_number, password, status, balance_id, created_at, updated_at";

#[async_trait]
impl CardStore for PgCardStore {
    async fn create(&self, card: NewCard) -> Result<Card, ApiError> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            INSERT INTO cards (id, card_number, password, status, balance_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, card_number, password, status, balance_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(card.card_number)
        .bind(card.password)
        .bind(card.status)
        .bind(card.balance_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>, ApiError> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    async fn find_by_number(&self, card_number: &str) -> Result<Option<Card>, ApiError> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE card_number = $1"
        ))
        .bind(card_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    async fn replace(&self, card: Card) -> Result<Card, ApiError> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            UPDATE cards
            SET card_number = $2,
                password = $3,
                status = $4,
                balance_id = $5,
                created_at = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, card_number, password, status, balance_id, created_at, updated_at
            "#,
        )
        .bind(card.id)
        .bind(card.card_number)
        .bind(card.password)
        .bind(card.status)
        .bind(card.balance_id)
        .bind(card.created_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::CardNotFound)?;

        Ok(card)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let deleted = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_ordered_by_number(&self) -> Result<Vec<Card>, ApiError> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards ORDER BY card_number ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    async fn list_by_status_ordered_by_number(
        &self,
        status: CardStatus,
    ) -> Result<Vec<Card>, ApiError> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE status = $1 ORDER BY card_number ASC"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }
}

/// Transaction store backed by the `transactions` table.
#[derive(Clone)]
pub struct PgTransactionStore {
    pool: DbPool,
}

impl PgTransactionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for PgTransactionStore {
    async fn create(
        &self,
        transaction: NewTransaction,
        balance_id: Uuid,
        balance_value: Decimal,
    ) -> Result<Transaction, ApiError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE balances SET value = $2 WHERE id = $1")
            .bind(balance_id)
            .bind(balance_value)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Err(ApiError::TransactionNotFound);
        }

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (id, card_id, value)
            VALUES ($1, $2, $3)
            RETURNING id, card_id, value, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(transaction.card_id)
        .bind(transaction.value)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(transaction)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, ApiError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            "SELECT id, card_id, value, created_at, updated_at \
             FROM transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    async fn delete(
        &self,
        id: Uuid,
        balance_id: Uuid,
        balance_value: Decimal,
    ) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(ApiError::TransactionNotFound);
        }

        let updated = sqlx::query("UPDATE balances SET value = $2 WHERE id = $1")
            .bind(balance_id)
            .bind(balance_value)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Err(ApiError::TransactionNotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, ApiError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            "SELECT id, card_id, value, created_at, updated_at \
             FROM transactions ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}
