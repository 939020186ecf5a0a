//! Transaction data models and API request/response types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a transaction record from the database.
///
/// A transaction is a durable fact: at creation time it debited the
/// referenced card's balance by `value`, and deleting it credits that
/// exact amount back. The reversal flow reaches the card through the
/// stored reference and then re-resolves it by its current card number.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Transaction {
    /// Unique identifier for this transaction
    pub id: Uuid,

    /// The card this transaction debited
    pub card_id: Uuid,

    /// Debited amount
    pub value: Decimal,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last written
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a new transaction. The store assigns id and
/// timestamps.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub card_id: Uuid,
    pub value: Decimal,
}

/// Request body for creating a transaction (the debit flow).
///
/// # JSON Example
///
/// ```json
/// {
///   "card_number": "1111111111",
///   "password": "p",
///   "value": "10.00"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub card_number: String,

    #[serde(default)]
    pub password: String,

    pub value: Decimal,
}

/// Response body for transaction endpoints.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub card_id: Uuid,
    pub value: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            card_id: transaction.card_id,
            value: transaction.value,
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}
