//! Card service - CRUD orchestration for cards and balance provisioning.
//!
//! Card creation provisions a fresh zero-value balance and forces the
//! new card to ACTIVE regardless of the payload. Updates are full
//! replaces with fixed precedence rules: the path id wins, the stored
//! balance reference and creation timestamp are preserved, and a missing
//! status defaults to ACTIVE.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::models::card::{
    Card, CardResponse, CardStatus, CreateCardRequest, NewCard, UpdateCardRequest,
};
use crate::store::{BalanceStore, CardStore};
use uuid::Uuid;

/// Orchestrates card CRUD against the card and balance stores.
#[derive(Clone)]
pub struct CardService {
    cards: Arc<dyn CardStore>,
    balances: Arc<dyn BalanceStore>,
}

impl CardService {
    pub fn new(cards: Arc<dyn CardStore>, balances: Arc<dyn BalanceStore>) -> Self {
        Self { cards, balances }
    }

    /// Balance value of the card with the given number.
    ///
    /// # Errors
    ///
    /// `CardNotFound` if no card has that number.
    pub async fn find_balance_by_card_number(
        &self,
        card_number: &str,
    ) -> Result<Decimal, ApiError> {
        let card = self
            .cards
            .find_by_number(card_number)
            .await?
            .ok_or(ApiError::CardNotFound)?;

        let balance = self
            .balances
            .find_by_id(card.balance_id)
            .await?
            .ok_or(ApiError::Unexpected)?;

        Ok(balance.value)
    }

    /// Card projection by id.
    pub async fn find_card_by_id(&self, id: Uuid) -> Result<CardResponse, ApiError> {
        let card = self
            .cards
            .find_by_id(id)
            .await?
            .ok_or(ApiError::CardNotFound)?;

        self.project(card).await
    }

    /// All cards, ordered ascending by card number.
    ///
    /// An empty result set is `CardNotFound`, never an empty list. This
    /// reproduces the reference system's observable behavior.
    pub async fn list_all(&self) -> Result<Vec<CardResponse>, ApiError> {
        let cards = self.cards.list_ordered_by_number().await?;
        if cards.is_empty() {
            return Err(ApiError::CardNotFound);
        }

        let mut responses = Vec::with_capacity(cards.len());
        for card in cards {
            responses.push(self.project(card).await?);
        }
        Ok(responses)
    }

    /// Cards with the given status, ordered ascending by card number.
    /// Empty result is `CardNotFound`, same as [`Self::list_all`].
    pub async fn list_by_status(
        &self,
        status: CardStatus,
    ) -> Result<Vec<CardResponse>, ApiError> {
        let cards = self.cards.list_by_status_ordered_by_number(status).await?;
        if cards.is_empty() {
            return Err(ApiError::CardNotFound);
        }

        let mut responses = Vec::with_capacity(cards.len());
        for card in cards {
            responses.push(self.project(card).await?);
        }
        Ok(responses)
    }

    /// Create a card with a freshly provisioned zero-value balance.
    ///
    /// The card's status is forced to ACTIVE regardless of the payload.
    ///
    /// # Errors
    ///
    /// - `InvalidParameters` if the card number is blank
    /// - `CardAlreadyExists` if a card with that number exists
    /// - `CardCreationError` if persistence fails during provisioning
    ///   (the underlying cause is discarded)
    pub async fn create(&self, request: CreateCardRequest) -> Result<CardResponse, ApiError> {
        if request.card_number.trim().is_empty() {
            return Err(ApiError::InvalidParameters);
        }

        if self.exists(&request.card_number).await? {
            return Err(ApiError::CardAlreadyExists);
        }

        let balance = self
            .balances
            .create()
            .await
            .map_err(|_| ApiError::CardCreationError)?;

        let card = self
            .cards
            .create(NewCard {
                card_number: request.card_number,
                password: request.password,
                // Ignore any caller-supplied status
                status: CardStatus::Active,
                balance_id: balance.id,
            })
            .await
            .map_err(|_| ApiError::CardCreationError)?;

        tracing::info!(card_id = %card.id, "card created");

        Ok(CardResponse::from_parts(card, balance))
    }

    /// Full-replace update of an existing card.
    ///
    /// Precedence rules, in order: the path id wins over anything in the
    /// body; the balance reference comes from the stored card; card
    /// number and password pass through from the payload; a missing
    /// status defaults to ACTIVE; `created_at` is preserved and
    /// `updated_at` refreshed by the store.
    ///
    /// # Errors
    ///
    /// - `InvalidParameters` if the replacement card number is blank
    /// - `CardNotFound` if no card has the path id
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCardRequest,
    ) -> Result<CardResponse, ApiError> {
        if request.card_number.trim().is_empty() {
            return Err(ApiError::InvalidParameters);
        }

        let existing = self
            .cards
            .find_by_id(id)
            .await?
            .ok_or(ApiError::CardNotFound)?;

        let replacement = Card {
            id,
            card_number: request.card_number,
            password: request.password,
            status: request.status.unwrap_or(CardStatus::Active),
            balance_id: existing.balance_id,
            created_at: existing.created_at,
            // Refreshed by the store on write
            updated_at: existing.updated_at,
        };

        let card = self.cards.replace(replacement).await?;
        self.project(card).await
    }

    /// Delete a card by id. The linked balance row is left behind, as in
    /// the reference system.
    pub async fn delete(&self, id: Uuid) -> Result<&'static str, ApiError> {
        if !self.cards.delete(id).await? {
            return Err(ApiError::CardNotFound);
        }

        tracing::info!(card_id = %id, "card deleted");
        Ok("Card deleted.")
    }

    /// Whether a card with the given number already exists. Used by
    /// [`Self::create`] before inserting.
    pub async fn exists(&self, card_number: &str) -> Result<bool, ApiError> {
        Ok(self.cards.find_by_number(card_number).await?.is_some())
    }

    /// Build the wire projection, resolving the card's balance row. A
    /// card without its balance row is an internal inconsistency.
    async fn project(&self, card: Card) -> Result<CardResponse, ApiError> {
        let balance = self
            .balances
            .find_by_id(card.balance_id)
            .await?
            .ok_or(ApiError::Unexpected)?;

        Ok(CardResponse::from_parts(card, balance))
    }
}
