//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - GET /transactions/{id} - Transaction by id
//! - GET /transactions - List all transactions
//! - POST /transactions - Execute a debit against a card
//! - DELETE /transactions/{id} - Reverse a transaction

use crate::{
    AppState,
    error::ApiError,
    models::transaction::{CreateTransactionRequest, TransactionResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Transaction projection by id.
pub async fn get_transaction_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = state.transactions.find_by_id(id).await?;
    Ok(Json(transaction))
}

/// List every transaction.
///
/// An empty store yields 404, not an empty list.
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let transactions = state.transactions.list_all().await?;
    Ok(Json(transactions))
}

/// Execute a debit against a card.
///
/// # Request Body
///
/// ```json
/// {
///   "card_number": "1111111111",
///   "password": "p",
///   "value": "10.00"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: "OK"
/// - **Error (404)**: card number does not exist
/// - **Error (422)**: inactive card, wrong password, or insufficient
///   balance, in that gate order
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let acknowledgment = state.transactions.create(request).await?;
    Ok((StatusCode::CREATED, acknowledgment))
}

/// Reverse a transaction, crediting its value back to the card.
///
/// # Response
///
/// - **Success (200 OK)**: text confirmation
/// - **Error (404)**: transaction absent, or its card could not be
///   re-resolved by number
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<&'static str, ApiError> {
    state.transactions.delete(id).await
}
