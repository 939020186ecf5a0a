//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to the service layer
//! 3. Returns an HTTP response (JSON, status code)

/// Card management endpoints
pub mod cards;
/// Health check endpoint
pub mod health;
/// Transaction endpoints
pub mod transactions;
