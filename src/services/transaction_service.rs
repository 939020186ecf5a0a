//! Transaction service - the debit gate and the reversal flow.
//!
//! Creating a transaction debits the card's balance behind four
//! sequential checks; deleting one credits the exact amount back. The
//! check order (existence, active, password, funds) is observable
//! behavior and must not be rearranged: it determines which error a
//! multiply-invalid request surfaces.
//!
//! `update_balance` is the single choke point through which balance
//! values change; each computed value is persisted together with the
//! transaction row write in one store unit of work.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::card::{Card, CardStatus};
use crate::models::transaction::{CreateTransactionRequest, NewTransaction, TransactionResponse};
use crate::store::{BalanceStore, CardStore, TransactionStore};

/// Direction of a balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BalanceDirection {
    Debit,
    Credit,
}

/// Validates and executes debits; reverses them on deletion.
#[derive(Clone)]
pub struct TransactionService {
    transactions: Arc<dyn TransactionStore>,
    cards: Arc<dyn CardStore>,
    balances: Arc<dyn BalanceStore>,
}

impl TransactionService {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        cards: Arc<dyn CardStore>,
        balances: Arc<dyn BalanceStore>,
    ) -> Self {
        Self {
            transactions,
            cards,
            balances,
        }
    }

    /// Transaction projection by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<TransactionResponse, ApiError> {
        let transaction = self
            .transactions
            .find_by_id(id)
            .await?
            .ok_or(ApiError::TransactionNotFound)?;

        Ok(transaction.into())
    }

    /// Every transaction. An empty set is `TransactionNotFound`, the
    /// same empty-as-error convention the card listings use.
    pub async fn list_all(&self) -> Result<Vec<TransactionResponse>, ApiError> {
        let transactions = self.transactions.list_all().await?;
        if transactions.is_empty() {
            return Err(ApiError::TransactionNotFound);
        }

        Ok(transactions.into_iter().map(Into::into).collect())
    }

    /// The debit flow.
    ///
    /// Checks run in a strict sequence, each short-circuiting the next:
    ///
    /// 1. card by number - `InvalidCardNumber` if absent
    /// 2. status ACTIVE - `InactiveCard` otherwise
    /// 3. exact password match - `InvalidPassword` otherwise
    /// 4. balance `>=` value - `InsufficientBalance` otherwise
    ///
    /// On success the debited balance value and the transaction row are
    /// persisted in one store unit of work, so a failure anywhere leaves
    /// no transaction row and the balance unchanged.
    pub async fn create(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<&'static str, ApiError> {
        let card = self
            .cards
            .find_by_number(&request.card_number)
            .await?
            .ok_or(ApiError::InvalidCardNumber)?;

        if card.status != CardStatus::Active {
            return Err(ApiError::InactiveCard);
        }

        if card.password != request.password {
            return Err(ApiError::InvalidPassword);
        }

        let balance = self
            .balances
            .find_by_id(card.balance_id)
            .await?
            .ok_or(ApiError::Unexpected)?;

        if balance.value < request.value {
            return Err(ApiError::InsufficientBalance);
        }

        let (balance_id, new_value) = self
            .update_balance(&card, request.value, BalanceDirection::Debit)
            .await?;

        let transaction = self
            .transactions
            .create(
                NewTransaction {
                    card_id: card.id,
                    value: request.value,
                },
                balance_id,
                new_value,
            )
            .await?;

        tracing::info!(transaction_id = %transaction.id, card_id = %card.id, "debit executed");

        Ok("OK")
    }

    /// The reversal flow.
    ///
    /// Follows the stored card reference to obtain the card's current
    /// number, then re-resolves the card by that number; a card renamed
    /// since the debit is still reached. Both lookups reuse
    /// `TransactionNotFound` on failure, a deliberate quirk of the
    /// reference behavior. The row removal and the compensating credit
    /// land in one store unit of work.
    pub async fn delete(&self, id: Uuid) -> Result<&'static str, ApiError> {
        let transaction = self
            .transactions
            .find_by_id(id)
            .await?
            .ok_or(ApiError::TransactionNotFound)?;

        let owner = self
            .cards
            .find_by_id(transaction.card_id)
            .await?
            .ok_or(ApiError::TransactionNotFound)?;

        let card = self
            .cards
            .find_by_number(&owner.card_number)
            .await?
            .ok_or(ApiError::TransactionNotFound)?;

        let (balance_id, new_value) = self
            .update_balance(&card, transaction.value, BalanceDirection::Credit)
            .await?;

        self.transactions.delete(id, balance_id, new_value).await?;

        tracing::info!(transaction_id = %id, card_id = %card.id, "transaction reversed");

        Ok("Transaction reversed.")
    }

    /// The only path by which balance values change.
    ///
    /// Looks up the balance row by the card's balance id and computes
    /// `old - value` for a debit or `old + value` for a credit. The
    /// computed value is handed to the transaction store, which persists
    /// it together with the row write in one unit of work. A missing
    /// balance row surfaces as `TransactionNotFound`, reusing that error
    /// kind as the reference system does.
    async fn update_balance(
        &self,
        card: &Card,
        value: Decimal,
        direction: BalanceDirection,
    ) -> Result<(Uuid, Decimal), ApiError> {
        let balance = self
            .balances
            .find_by_id(card.balance_id)
            .await?
            .ok_or(ApiError::TransactionNotFound)?;

        let new_value = match direction {
            BalanceDirection::Debit => balance.value - value,
            BalanceDirection::Credit => balance.value + value,
        };

        Ok((balance.id, new_value))
    }
}
