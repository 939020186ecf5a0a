//! In-memory store implementations.
//!
//! Drop-in substitutes for the Postgres stores, used by the test suites
//! to exercise the service layer and the HTTP surface without a
//! database. Rows live in `Mutex`-guarded collections.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::balance::Balance;
use crate::models::card::{Card, CardStatus, NewCard};
use crate::models::transaction::{NewTransaction, Transaction};
use crate::store::{BalanceStore, CardStore, TransactionStore};

/// In-memory balance store.
#[derive(Default)]
pub struct MemoryBalanceStore {
    rows: Mutex<HashMap<Uuid, Balance>>,
}

impl MemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BalanceStore for MemoryBalanceStore {
    async fn create(&self) -> Result<Balance, ApiError> {
        let balance = Balance {
            id: Uuid::new_v4(),
            value: Decimal::ZERO,
        };
        self.rows
            .lock()
            .unwrap()
            .insert(balance.id, balance.clone());
        Ok(balance)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Balance>, ApiError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn save_value(&self, id: Uuid, value: Decimal) -> Result<Balance, ApiError> {
        let mut rows = self.rows.lock().unwrap();
        let balance = rows.get_mut(&id).ok_or(ApiError::Unexpected)?;
        balance.value = value;
        Ok(balance.clone())
    }
}

/// In-memory card store.
#[derive(Default)]
pub struct MemoryCardStore {
    rows: Mutex<HashMap<Uuid, Card>>,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for MemoryCardStore {
    async fn create(&self, card: NewCard) -> Result<Card, ApiError> {
        let now = Utc::now();
        let card = Card {
            id: Uuid::new_v4(),
            card_number: card.card_number,
            password: card.password,
            status: card.status,
            balance_id: card.balance_id,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(card.id, card.clone());
        Ok(card)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>, ApiError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_number(&self, card_number: &str) -> Result<Option<Card>, ApiError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|card| card.card_number == card_number)
            .cloned())
    }

    async fn replace(&self, mut card: Card) -> Result<Card, ApiError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&card.id) {
            return Err(ApiError::CardNotFound);
        }
        card.updated_at = Utc::now();
        rows.insert(card.id, card.clone());
        Ok(card)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }

    async fn list_ordered_by_number(&self) -> Result<Vec<Card>, ApiError> {
        let mut cards: Vec<Card> = self.rows.lock().unwrap().values().cloned().collect();
        cards.sort_by(|a, b| a.card_number.cmp(&b.card_number));
        Ok(cards)
    }

    async fn list_by_status_ordered_by_number(
        &self,
        status: CardStatus,
    ) -> Result<Vec<Card>, ApiError> {
        let mut cards: Vec<Card> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|card| card.status == status)
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.card_number.cmp(&b.card_number));
        Ok(cards)
    }
}

/// In-memory transaction store. Rows are kept in a Vec to preserve
/// creation order for `list_all`. Holds the balance store so the two
/// writes of a debit or a reversal land together, mirroring the
/// Postgres store's unit of work.
pub struct MemoryTransactionStore {
    rows: Mutex<Vec<Transaction>>,
    balances: Arc<MemoryBalanceStore>,
}

impl MemoryTransactionStore {
    pub fn new(balances: Arc<MemoryBalanceStore>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            balances,
        }
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn create(
        &self,
        transaction: NewTransaction,
        balance_id: Uuid,
        balance_value: Decimal,
    ) -> Result<Transaction, ApiError> {
        self.balances.save_value(balance_id, balance_value).await?;

        let now = Utc::now();
        let transaction = Transaction {
            id: Uuid::new_v4(),
            card_id: transaction.card_id,
            value: transaction.value,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(transaction.clone());
        Ok(transaction)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, ApiError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn delete(
        &self,
        id: Uuid,
        balance_id: Uuid,
        balance_value: Decimal,
    ) -> Result<(), ApiError> {
        {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|t| t.id != id);
            if rows.len() == before {
                return Err(ApiError::TransactionNotFound);
            }
        }

        self.balances.save_value(balance_id, balance_value).await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, ApiError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}
