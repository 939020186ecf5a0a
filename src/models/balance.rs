//! Balance data model and API response type.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Represents a balance record from the database.
///
/// Each balance is owned by exactly one card and is created as a side
/// effect of card creation with a value of zero. The value is never set
/// directly by a client; it only changes through the debit/credit path
/// in the transaction service.
///
/// # Monetary Representation
///
/// Values are `rust_decimal::Decimal` (Postgres NUMERIC), so arithmetic
/// and comparisons are exact. Never floats.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Balance {
    /// Unique identifier for this balance
    pub id: Uuid,

    /// Current monetary value
    pub value: Decimal,
}

/// Balance projection embedded in card responses.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub id: Uuid,
    pub value: Decimal,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            id: balance.id,
            value: balance.value,
        }
    }
}
