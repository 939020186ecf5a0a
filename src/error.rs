//! Error types and HTTP error response handling.
//!
//! This module defines all domain errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant corresponds to one domain failure and maps to a fixed
/// HTTP status and message text at the boundary. Failures are raised at
/// the point of detection and propagate unmodified; there is no local
/// recovery or retry in the core.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No card matches the requested id or number, or a card listing
    /// came back empty (empty listings are an error in this API, not an
    /// empty 200).
    #[error("Card not found.")]
    CardNotFound,

    /// The card number given in a transaction request does not exist.
    #[error("Invalid card number")]
    InvalidCardNumber,

    /// Persistence failed while provisioning a card or its balance.
    /// The underlying cause is deliberately discarded.
    #[error("Error creating card.")]
    CardCreationError,

    /// A card with the requested number already exists.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Exist card with informed number.")]
    CardAlreadyExists,

    /// The card exists but its status is not ACTIVE.
    #[error("Inactive card.")]
    InactiveCard,

    /// No transaction matches the requested id, the transaction listing
    /// is empty, or a reversal could not re-resolve its card or balance.
    #[error("Transaction not found.")]
    TransactionNotFound,

    /// The card's balance is smaller than the requested debit.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Insufficient balance to carry out the transaction.")]
    InsufficientBalance,

    /// Request payload or path parameters are invalid.
    #[error("Invalid parameter")]
    InvalidParameters,

    /// The password in a transaction request does not match the card's.
    #[error("Wrong password.")]
    InvalidPassword,

    /// Catch-all for internal inconsistencies.
    #[error("Unexpected error")]
    Unexpected,

    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for ApiError`.
    /// Presented to clients as the generic unexpected-error triple.
    #[error("Unexpected error")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// HTTP status this error maps to at the boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::CardNotFound
            | ApiError::InvalidCardNumber
            | ApiError::TransactionNotFound => StatusCode::NOT_FOUND,
            ApiError::CardCreationError | ApiError::InvalidParameters => StatusCode::BAD_REQUEST,
            ApiError::CardAlreadyExists
            | ApiError::InactiveCard
            | ApiError::InsufficientBalance
            | ApiError::InvalidPassword => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unexpected | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert ApiError into an HTTP response.
///
/// Allows handlers to return `Result<T, ApiError>` and have failures
/// converted automatically.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "status": 404,
///   "code": "404",
///   "message": "Card not found."
/// }
/// ```
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Database(ref e) = self {
            tracing::error!(error = %e, "database error");
        }

        let status = self.status();
        let body = Json(json!({
            "status": status.as_u16(),
            "code": status.as_u16().to_string(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_mapping() {
        assert_eq!(ApiError::CardNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InvalidCardNumber.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::TransactionNotFound.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::CardCreationError.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidParameters.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::CardAlreadyExists.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::InactiveCard.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::InsufficientBalance.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::InvalidPassword.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Unexpected.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn fixed_message_text() {
        assert_eq!(ApiError::CardNotFound.to_string(), "Card not found.");
        assert_eq!(
            ApiError::InvalidCardNumber.to_string(),
            "Invalid card number"
        );
        assert_eq!(
            ApiError::CardAlreadyExists.to_string(),
            "Exist card with informed number."
        );
        assert_eq!(
            ApiError::InsufficientBalance.to_string(),
            "Insufficient balance to carry out the transaction."
        );
        assert_eq!(ApiError::InvalidPassword.to_string(), "Wrong password.");
    }
}
