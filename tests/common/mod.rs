// Allow dead_code because these helpers are used across different test
// files which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;

use card_ledger::AppState;
use card_ledger::models::card::{CardResponse, CreateCardRequest};
use card_ledger::services::{CardService, TransactionService};
use card_ledger::store::BalanceStore;
use card_ledger::store::memory::{MemoryBalanceStore, MemoryCardStore, MemoryTransactionStore};

/// Services wired to in-memory stores, with direct handles kept for
/// fixture manipulation (e.g. seeding a balance value).
pub struct TestContext {
    pub cards: CardService,
    pub transactions: TransactionService,
    pub balance_store: Arc<MemoryBalanceStore>,
}

/// Build both services over fresh in-memory stores.
pub fn test_context() -> TestContext {
    let balances = Arc::new(MemoryBalanceStore::new());
    let cards = Arc::new(MemoryCardStore::new());
    let transactions = Arc::new(MemoryTransactionStore::new(balances.clone()));

    TestContext {
        cards: CardService::new(cards.clone(), balances.clone()),
        transactions: TransactionService::new(transactions, cards, balances.clone()),
        balance_store: balances,
    }
}

/// App state over in-memory stores, for driving the router in-process.
pub fn test_state() -> (AppState, Arc<MemoryBalanceStore>) {
    let ctx = test_context();
    (
        AppState {
            cards: ctx.cards,
            transactions: ctx.transactions,
        },
        ctx.balance_store,
    )
}

/// Parse a decimal literal.
pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Create a card through the service and return its projection.
pub async fn create_card(ctx: &TestContext, number: &str, password: &str) -> CardResponse {
    ctx.cards
        .create(CreateCardRequest {
            card_number: number.to_string(),
            password: password.to_string(),
            status: None,
        })
        .await
        .unwrap()
}

/// Fixture: overwrite a balance value directly in the store.
pub async fn set_balance(store: &MemoryBalanceStore, balance_id: uuid::Uuid, value: &str) {
    store.save_value(balance_id, dec(value)).await.unwrap();
}
