//! Transactional card ledger service.
//!
//! Manages payment cards, each linked one-to-one with a monetary
//! balance, and records debit transactions against that balance behind
//! password-gated authorization. Deleting a transaction reverses the
//! debit with an exact compensating credit.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, behind per-entity store traits
//! - **Money**: rust_decimal, exact fixed-point arithmetic end to end
//! - **Format**: JSON requests/responses

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::services::{CardService, TransactionService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub cards: CardService,
    pub transactions: TransactionService,
}

/// Build the HTTP router over the given state.
///
/// Kept separate from `main` so tests can drive the full surface
/// in-process with in-memory stores.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Card management routes. The fixed segments (`/cards/id`,
        // `/cards/status`) win over the single-segment capture. The
        // capture carries the card number on GET and the card id on
        // PUT/DELETE; the router requires one name per position.
        .route("/cards", get(handlers::cards::list_cards))
        .route("/cards", post(handlers::cards::create_card))
        .route(
            "/cards/{card_number}",
            get(handlers::cards::get_balance_by_number),
        )
        .route("/cards/id/{id}", get(handlers::cards::get_card_by_id))
        .route(
            "/cards/status/{status}",
            get(handlers::cards::list_cards_by_status),
        )
        .route("/cards/{card_number}", put(handlers::cards::update_card))
        .route("/cards/{card_number}", delete(handlers::cards::delete_card))
        // Transaction routes
        .route("/transactions", get(handlers::transactions::list_transactions))
        .route(
            "/transactions",
            post(handlers::transactions::create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(handlers::transactions::get_transaction_by_id),
        )
        .route(
            "/transactions/{id}",
            delete(handlers::transactions::delete_transaction),
        )
        // Public health check
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
}
