mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use card_ledger::error::ApiError;
use card_ledger::models::card::{CardStatus, CreateCardRequest, UpdateCardRequest};
use card_ledger::models::transaction::{CreateTransactionRequest, NewTransaction, Transaction};
use card_ledger::services::{CardService, TransactionService};
use card_ledger::store::TransactionStore;
use card_ledger::store::memory::{MemoryBalanceStore, MemoryCardStore, MemoryTransactionStore};
use common::{create_card, dec, set_balance, test_context};
use rust_decimal::Decimal;
use uuid::Uuid;

fn debit(number: &str, password: &str, value: &str) -> CreateTransactionRequest {
    CreateTransactionRequest {
        card_number: number.to_string(),
        password: password.to_string(),
        value: dec(value),
    }
}

#[tokio::test]
async fn successful_debit_decreases_balance_and_records_transaction() {
    let ctx = test_context();
    let card = create_card(&ctx, "1111111111", "p").await;
    set_balance(&ctx.balance_store, card.balance.id, "100.00").await;

    let ack = ctx
        .transactions
        .create(debit("1111111111", "p", "10.50"))
        .await
        .unwrap();
    assert_eq!(ack, "OK");

    let value = ctx
        .cards
        .find_balance_by_card_number("1111111111")
        .await
        .unwrap();
    assert_eq!(value, dec("89.50"));

    let transactions = ctx.transactions.list_all().await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].card_id, card.id);
    assert_eq!(transactions[0].value, dec("10.50"));
}

#[tokio::test]
async fn debit_requires_balance_gte_value() {
    let ctx = test_context();
    let card = create_card(&ctx, "1111111111", "p").await;
    set_balance(&ctx.balance_store, card.balance.id, "10.00").await;

    // Exactly equal passes (>=, not >)
    let ack = ctx
        .transactions
        .create(debit("1111111111", "p", "10.00"))
        .await
        .unwrap();
    assert_eq!(ack, "OK");

    let value = ctx
        .cards
        .find_balance_by_card_number("1111111111")
        .await
        .unwrap();
    assert_eq!(value, dec("0.00"));
}

#[tokio::test]
async fn insufficient_balance_leaves_state_untouched() {
    let ctx = test_context();
    let card = create_card(&ctx, "1111111111", "p").await;
    set_balance(&ctx.balance_store, card.balance.id, "5.00").await;

    let err = ctx
        .transactions
        .create(debit("1111111111", "p", "10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InsufficientBalance));

    // Balance unchanged, no transaction row
    let value = ctx
        .cards
        .find_balance_by_card_number("1111111111")
        .await
        .unwrap();
    assert_eq!(value, dec("5.00"));

    let err = ctx.transactions.list_all().await.unwrap_err();
    assert!(matches!(err, ApiError::TransactionNotFound));
}

#[tokio::test]
async fn gate_order_nonexistent_card_wins_over_later_checks() {
    let ctx = test_context();

    // The card number does not exist; the request would also fail the
    // password and funds checks, but the first gate must answer.
    let err = ctx
        .transactions
        .create(debit("0000000000", "wrong", "10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidCardNumber));
}

#[tokio::test]
async fn gate_order_inactive_wins_over_password_and_funds() {
    let ctx = test_context();
    let card = create_card(&ctx, "1111111111", "p").await;
    ctx.cards
        .update(
            card.id,
            UpdateCardRequest {
                card_number: "1111111111".to_string(),
                password: "p".to_string(),
                status: Some(CardStatus::Inactive),
            },
        )
        .await
        .unwrap();

    // Wrong password AND empty balance, but inactive answers first
    let err = ctx
        .transactions
        .create(debit("1111111111", "wrong", "10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InactiveCard));
}

#[tokio::test]
async fn gate_order_wrong_password_wins_over_funds() {
    let ctx = test_context();
    create_card(&ctx, "1111111111", "p").await;

    // Balance is zero, but the password gate answers first
    let err = ctx
        .transactions
        .create(debit("1111111111", "wrong", "10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidPassword));
}

#[tokio::test]
async fn reversal_restores_the_exact_pre_transaction_balance() {
    let ctx = test_context();
    let card = create_card(&ctx, "1111111111", "p").await;
    set_balance(&ctx.balance_store, card.balance.id, "50.00").await;

    ctx.transactions
        .create(debit("1111111111", "p", "10.00"))
        .await
        .unwrap();
    let transaction = ctx.transactions.list_all().await.unwrap().remove(0);

    let message = ctx.transactions.delete(transaction.id).await.unwrap();
    assert_eq!(message, "Transaction reversed.");

    let value = ctx
        .cards
        .find_balance_by_card_number("1111111111")
        .await
        .unwrap();
    assert_eq!(value, dec("50.00"));

    // The transaction row is gone
    let err = ctx.transactions.find_by_id(transaction.id).await.unwrap_err();
    assert!(matches!(err, ApiError::TransactionNotFound));
}

#[tokio::test]
async fn spec_scenario_debit_after_funding_then_reverse() {
    let ctx = test_context();

    // Fresh card starts at zero; a 10.00 debit must fail
    let card = create_card(&ctx, "1111111111", "p").await;
    assert_eq!(card.balance.value, dec("0.00"));

    let err = ctx
        .transactions
        .create(debit("1111111111", "p", "10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InsufficientBalance));

    // Fund the balance, retry the same debit
    set_balance(&ctx.balance_store, card.balance.id, "50.00").await;
    let ack = ctx
        .transactions
        .create(debit("1111111111", "p", "10.00"))
        .await
        .unwrap();
    assert_eq!(ack, "OK");

    let value = ctx
        .cards
        .find_balance_by_card_number("1111111111")
        .await
        .unwrap();
    assert_eq!(value, dec("40.00"));

    // Reversal returns the balance to 50.00 exactly
    let transaction = ctx.transactions.list_all().await.unwrap().remove(0);
    ctx.transactions.delete(transaction.id).await.unwrap();

    let value = ctx
        .cards
        .find_balance_by_card_number("1111111111")
        .await
        .unwrap();
    assert_eq!(value, dec("50.00"));
}

#[tokio::test]
async fn reversal_of_missing_transaction_is_not_found() {
    let ctx = test_context();

    let err = ctx.transactions.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ApiError::TransactionNotFound));
}

#[tokio::test]
async fn reversal_reuses_transaction_not_found_when_card_is_gone() {
    let ctx = test_context();
    let card = create_card(&ctx, "1111111111", "p").await;
    set_balance(&ctx.balance_store, card.balance.id, "50.00").await;

    ctx.transactions
        .create(debit("1111111111", "p", "10.00"))
        .await
        .unwrap();
    let transaction = ctx.transactions.list_all().await.unwrap().remove(0);

    // Deleting the card breaks the stored-reference resolution; the
    // reversal reports TransactionNotFound, not a card error, and leaves
    // the transaction row in place.
    ctx.cards.delete(card.id).await.unwrap();

    let err = ctx.transactions.delete(transaction.id).await.unwrap_err();
    assert!(matches!(err, ApiError::TransactionNotFound));
    assert!(ctx.transactions.find_by_id(transaction.id).await.is_ok());
}

#[tokio::test]
async fn reversal_follows_a_renumbered_card() {
    let ctx = test_context();
    let card = create_card(&ctx, "1111111111", "p").await;
    set_balance(&ctx.balance_store, card.balance.id, "50.00").await;

    ctx.transactions
        .create(debit("1111111111", "p", "10.00"))
        .await
        .unwrap();
    let transaction = ctx.transactions.list_all().await.unwrap().remove(0);

    // Renumbering the card after the debit must not strand it: the
    // reversal reaches the card through the stored reference and its
    // current number.
    ctx.cards
        .update(
            card.id,
            UpdateCardRequest {
                card_number: "2222222222".to_string(),
                password: "p".to_string(),
                status: Some(CardStatus::Active),
            },
        )
        .await
        .unwrap();

    let message = ctx.transactions.delete(transaction.id).await.unwrap();
    assert_eq!(message, "Transaction reversed.");

    let value = ctx
        .cards
        .find_balance_by_card_number("2222222222")
        .await
        .unwrap();
    assert_eq!(value, dec("50.00"));
}

#[tokio::test]
async fn find_by_id_and_empty_listing() {
    let ctx = test_context();

    let err = ctx.transactions.find_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ApiError::TransactionNotFound));

    let err = ctx.transactions.list_all().await.unwrap_err();
    assert!(matches!(err, ApiError::TransactionNotFound));
}

#[tokio::test]
async fn repeated_debits_accumulate_exactly() {
    let ctx = test_context();
    let card = create_card(&ctx, "1111111111", "p").await;
    set_balance(&ctx.balance_store, card.balance.id, "1.00").await;

    for _ in 0..10 {
        ctx.transactions
            .create(debit("1111111111", "p", "0.10"))
            .await
            .unwrap();
    }

    // Exact fixed-point arithmetic: ten debits of 0.10 empty the balance
    let value = ctx
        .cards
        .find_balance_by_card_number("1111111111")
        .await
        .unwrap();
    assert_eq!(value, dec("0.00"));

    let err = ctx
        .transactions
        .create(debit("1111111111", "p", "0.10"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InsufficientBalance));
}

/// Transaction store whose writes can be switched to fail, for
/// exercising the all-or-nothing behavior of debits and reversals.
struct FaultyTransactionStore {
    inner: MemoryTransactionStore,
    fail_writes: AtomicBool,
}

impl FaultyTransactionStore {
    fn new(balances: Arc<MemoryBalanceStore>) -> Self {
        Self {
            inner: MemoryTransactionStore::new(balances),
            fail_writes: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl TransactionStore for FaultyTransactionStore {
    async fn create(
        &self,
        transaction: NewTransaction,
        balance_id: Uuid,
        balance_value: Decimal,
    ) -> Result<Transaction, ApiError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Unexpected);
        }
        self.inner.create(transaction, balance_id, balance_value).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, ApiError> {
        self.inner.find_by_id(id).await
    }

    async fn delete(
        &self,
        id: Uuid,
        balance_id: Uuid,
        balance_value: Decimal,
    ) -> Result<(), ApiError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Unexpected);
        }
        self.inner.delete(id, balance_id, balance_value).await
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, ApiError> {
        self.inner.list_all().await
    }
}

fn faulty_context() -> (
    CardService,
    TransactionService,
    Arc<FaultyTransactionStore>,
    Arc<MemoryBalanceStore>,
) {
    let balances = Arc::new(MemoryBalanceStore::new());
    let cards = Arc::new(MemoryCardStore::new());
    let transactions = Arc::new(FaultyTransactionStore::new(balances.clone()));

    (
        CardService::new(cards.clone(), balances.clone()),
        TransactionService::new(transactions.clone(), cards, balances.clone()),
        transactions,
        balances,
    )
}

async fn faulty_card(
    cards: &CardService,
    balances: &MemoryBalanceStore,
    value: &str,
) {
    let card = cards
        .create(CreateCardRequest {
            card_number: "1111111111".to_string(),
            password: "p".to_string(),
            status: None,
        })
        .await
        .unwrap();
    set_balance(balances, card.balance.id, value).await;
}

#[tokio::test]
async fn failed_debit_write_leaves_the_balance_untouched() {
    let (cards, transactions, store, balances) = faulty_context();
    faulty_card(&cards, &balances, "50.00").await;

    store.fail_writes.store(true, Ordering::SeqCst);
    let err = transactions
        .create(debit("1111111111", "p", "10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unexpected));

    // Neither a transaction row nor a balance change survives
    let value = cards.find_balance_by_card_number("1111111111").await.unwrap();
    assert_eq!(value, dec("50.00"));
    let err = transactions.list_all().await.unwrap_err();
    assert!(matches!(err, ApiError::TransactionNotFound));

    // The same debit goes through once writes recover
    store.fail_writes.store(false, Ordering::SeqCst);
    transactions
        .create(debit("1111111111", "p", "10.00"))
        .await
        .unwrap();
    let value = cards.find_balance_by_card_number("1111111111").await.unwrap();
    assert_eq!(value, dec("40.00"));
}

#[tokio::test]
async fn failed_reversal_write_keeps_the_record_and_the_balance() {
    let (cards, transactions, store, balances) = faulty_context();
    faulty_card(&cards, &balances, "50.00").await;

    transactions
        .create(debit("1111111111", "p", "10.00"))
        .await
        .unwrap();
    let transaction = transactions.list_all().await.unwrap().remove(0);

    store.fail_writes.store(true, Ordering::SeqCst);
    let err = transactions.delete(transaction.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Unexpected));

    // The record is not lost and no credit was applied
    assert!(transactions.find_by_id(transaction.id).await.is_ok());
    let value = cards.find_balance_by_card_number("1111111111").await.unwrap();
    assert_eq!(value, dec("40.00"));

    // The reversal goes through once writes recover
    store.fail_writes.store(false, Ordering::SeqCst);
    transactions.delete(transaction.id).await.unwrap();
    let value = cards.find_balance_by_card_number("1111111111").await.unwrap();
    assert_eq!(value, dec("50.00"));
}
