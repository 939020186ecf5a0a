//! Data models representing database entities and their wire projections.

/// Balance owned by a card
pub mod balance;
/// Payment card model
pub mod card;
/// Debit transaction model
pub mod transaction;
