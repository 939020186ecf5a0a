//! Card management HTTP handlers.
//!
//! This module implements the card-related API endpoints:
//! - GET /cards/{card_number} - Balance value by card number
//! - GET /cards/id/{id} - Card by id
//! - GET /cards - List all cards ordered by number
//! - GET /cards/status/{status} - List cards filtered by status
//! - POST /cards - Create a card (zero balance, forced ACTIVE)
//! - PUT /cards/{id} - Full-replace update
//! - DELETE /cards/{id} - Delete a card

use crate::{
    AppState,
    error::ApiError,
    models::card::{CardResponse, CardStatus, CreateCardRequest, UpdateCardRequest},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Balance value of the card with the given number.
///
/// # Response
///
/// - **Success (200 OK)**: the balance value as a JSON number
/// - **Error (404)**: no card with that number
pub async fn get_balance_by_number(
    State(state): State<AppState>,
    Path(card_number): Path<String>,
) -> Result<Json<Decimal>, ApiError> {
    let value = state.cards.find_balance_by_card_number(&card_number).await?;
    Ok(Json(value))
}

/// Card projection by id.
pub async fn get_card_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CardResponse>, ApiError> {
    let card = state.cards.find_card_by_id(id).await?;
    Ok(Json(card))
}

/// List all cards, ordered ascending by card number.
///
/// An empty store yields 404, not an empty list.
pub async fn list_cards(
    State(state): State<AppState>,
) -> Result<Json<Vec<CardResponse>>, ApiError> {
    let cards = state.cards.list_all().await?;
    Ok(Json(cards))
}

/// List cards filtered by status, ordered ascending by card number.
///
/// An unparseable status segment yields 404, matching the contract for
/// an empty result.
pub async fn list_cards_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<CardResponse>>, ApiError> {
    let status: CardStatus = status.parse().map_err(|_| ApiError::CardNotFound)?;
    let cards = state.cards.list_by_status(status).await?;
    Ok(Json(cards))
}

/// Create a new card.
///
/// # Request Body
///
/// ```json
/// {
///   "card_number": "1111111111",
///   "password": "p"
/// }
/// ```
///
/// Any `status` in the payload is ignored; new cards are always ACTIVE
/// and start with a zero balance.
///
/// # Response
///
/// - **Success (201 Created)**: the card projection
/// - **Error (422)**: a card with that number already exists
/// - **Error (400)**: blank card number, or persistence failure
pub async fn create_card(
    State(state): State<AppState>,
    Json(request): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), ApiError> {
    let card = state.cards.create(request).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// Full-replace update of a card.
///
/// The path id wins over anything in the body; the stored balance
/// reference and `created_at` are preserved.
pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCardRequest>,
) -> Result<Json<CardResponse>, ApiError> {
    let card = state.cards.update(id, request).await?;
    Ok(Json(card))
}

/// Delete a card by id.
///
/// # Response
///
/// - **Success (200 OK)**: text confirmation
/// - **Error (404)**: no card with that id
pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<&'static str, ApiError> {
    state.cards.delete(id).await
}
