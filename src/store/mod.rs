//! Persistence abstraction: narrow capability traits, one per entity.
//!
//! The service layer depends only on these traits. `postgres` holds the
//! sqlx-backed implementations used by the running server; `memory`
//! holds in-memory implementations the test suites substitute in.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::balance::Balance;
use crate::models::card::{Card, CardStatus, NewCard};
use crate::models::transaction::{NewTransaction, Transaction};

/// Storage operations for balance rows.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Insert a fresh zero-value balance and return it.
    async fn create(&self) -> Result<Balance, ApiError>;

    /// Fetch a balance by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Balance>, ApiError>;

    /// Persist a new value for an existing balance.
    async fn save_value(&self, id: Uuid, value: Decimal) -> Result<Balance, ApiError>;
}

/// Storage operations for card rows.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Insert a new card. The store assigns id and timestamps.
    async fn create(&self, card: NewCard) -> Result<Card, ApiError>;

    /// Fetch a card by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>, ApiError>;

    /// Fetch a card by its unique card number.
    async fn find_by_number(&self, card_number: &str) -> Result<Option<Card>, ApiError>;

    /// Full-replace an existing card row, refreshing `updated_at`.
    async fn replace(&self, card: Card) -> Result<Card, ApiError>;

    /// Delete a card by id. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    /// All cards, ordered ascending by card number.
    async fn list_ordered_by_number(&self) -> Result<Vec<Card>, ApiError>;

    /// Cards with the given status, ordered ascending by card number.
    async fn list_by_status_ordered_by_number(
        &self,
        status: CardStatus,
    ) -> Result<Vec<Card>, ApiError>;
}

/// Storage operations for transaction rows.
///
/// The two write operations couple the row write with the balance write
/// into one unit of work: a debit or a reversal either lands in full or
/// not at all. The service layer computes the new balance value; the
/// store only persists it.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert a new transaction and persist the debited balance value in
    /// the same unit of work. The store assigns id and timestamps.
    async fn create(
        &self,
        transaction: NewTransaction,
        balance_id: Uuid,
        balance_value: Decimal,
    ) -> Result<Transaction, ApiError>;

    /// Fetch a transaction by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, ApiError>;

    /// Delete a transaction and persist the credited balance value in
    /// the same unit of work. `TransactionNotFound` if the row vanished
    /// since the caller looked it up.
    async fn delete(
        &self,
        id: Uuid,
        balance_id: Uuid,
        balance_value: Decimal,
    ) -> Result<(), ApiError>;

    /// Every transaction, in creation order.
    async fn list_all(&self) -> Result<Vec<Transaction>, ApiError>;
}
