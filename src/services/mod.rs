//! Business logic services.
//!
//! Services contain the core validation and balance-mutation logic,
//! separated from HTTP handlers. They depend only on the store traits,
//! never on SQL.

pub mod card_service;
pub mod transaction_service;

pub use card_service::CardService;
pub use transaction_service::TransactionService;
