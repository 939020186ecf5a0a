//! Card data models and API request/response types.
//!
//! This module defines:
//! - `Card`: Database entity representing a payment card
//! - `CardStatus`: enumerated card status
//! - `CreateCardRequest` / `UpdateCardRequest`: request bodies
//! - `CardResponse`: response body returned to clients

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::balance::{Balance, BalanceResponse};

/// Card status gating whether new transactions may be created against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "card_status", rename_all = "UPPERCASE")]
pub enum CardStatus {
    Active,
    Inactive,
}

impl FromStr for CardStatus {
    type Err = ();

    /// Parse a status path segment, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(CardStatus::Active),
            "INACTIVE" => Ok(CardStatus::Inactive),
            _ => Err(()),
        }
    }
}

/// Represents a card record from the database.
///
/// # Database Table
///
/// Maps to the `cards` table. Each card:
/// - Has a unique, non-blank card number
/// - Owns exactly one balance for its entire lifetime (via `balance_id`)
/// - Stores its password in clear text, reproducing the reference
///   system's behavior (a known defect there, not a design goal here)
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Card {
    /// Unique identifier for this card
    pub id: Uuid,

    /// Card number, unique across all cards
    pub card_number: String,

    /// Password gating transaction creation
    pub password: String,

    /// Current status (ACTIVE or INACTIVE)
    pub status: CardStatus,

    /// The balance this card exclusively owns
    pub balance_id: Uuid,

    /// Timestamp when the card was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last update, refreshed by the store on write
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a new card. The store assigns id and
/// timestamps.
#[derive(Debug, Clone)]
pub struct NewCard {
    pub card_number: String,
    pub password: String,
    pub status: CardStatus,
    pub balance_id: Uuid,
}

/// Request body for creating a new card.
///
/// # JSON Example
///
/// ```json
/// {
///   "card_number": "1111111111",
///   "password": "p",
///   "status": "INACTIVE"
/// }
/// ```
///
/// # Validation
///
/// - `card_number`: required, non-blank
/// - `status`: accepted but ignored; newly created cards are always ACTIVE
#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub card_number: String,

    #[serde(default)]
    pub password: String,

    /// Ignored on creation; the card is forced to ACTIVE regardless.
    #[serde(default)]
    pub status: Option<CardStatus>,
}

/// Request body for the full-replace card update.
///
/// The path id wins over anything in the body, the stored balance
/// reference is preserved, and a missing status defaults to ACTIVE.
#[derive(Debug, Deserialize)]
pub struct UpdateCardRequest {
    pub card_number: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub status: Option<CardStatus>,
}

/// Response body for card endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "card_number": "1111111111",
///   "status": "ACTIVE",
///   "balance": { "id": "660e8400-...", "value": "0" },
///   "created_at": "2025-03-01T10:00:00Z",
///   "updated_at": "2025-03-01T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: Uuid,
    pub card_number: String,
    pub status: CardStatus,
    pub balance: BalanceResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CardResponse {
    /// Build the wire projection from a card row and its balance row.
    ///
    /// Field-by-field on purpose: every transfer is auditable, and the
    /// password never leaves the service.
    pub fn from_parts(card: Card, balance: Balance) -> Self {
        Self {
            id: card.id,
            card_number: card.card_number,
            status: card.status,
            balance: balance.into(),
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("ACTIVE".parse::<CardStatus>(), Ok(CardStatus::Active));
        assert_eq!("inactive".parse::<CardStatus>(), Ok(CardStatus::Inactive));
        assert_eq!("Active".parse::<CardStatus>(), Ok(CardStatus::Active));
        assert!("BLOCKED".parse::<CardStatus>().is_err());
        assert!("".parse::<CardStatus>().is_err());
    }

    #[test]
    fn projection_hides_password() {
        let card = Card {
            id: Uuid::new_v4(),
            card_number: "1111111111".to_string(),
            password: "secret".to_string(),
            status: CardStatus::Active,
            balance_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let balance = Balance {
            id: card.balance_id,
            value: rust_decimal::Decimal::ZERO,
        };

        let json = serde_json::to_value(CardResponse::from_parts(card, balance)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["status"], "ACTIVE");
    }
}
