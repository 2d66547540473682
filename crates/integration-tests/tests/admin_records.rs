//! Integration tests for the dashboard against the record service.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::{Value, json};

use elite_cards_admin::dashboard::{AdminDashboard, NewCard};
use elite_cards_admin::records::{CARDS, FileUpload, PAYMENT_PROOFS};
use elite_cards_core::{CardId, MemoryStore, PaymentStatus, Provenance, TransactionId};
use elite_cards_integration_tests::FakeRecordStore;

const NOTE: &str = r#"{"amount":50,"amountGHS":"601.50","currency":"USD","status":"approved","submittedAt":"2024-06-01T09:30:00.000Z","reference":"MOMO-1182"}"#;

fn proofs() -> FakeRecordStore {
    FakeRecordStore::new().with_record(
        PAYMENT_PROOFS,
        "p1",
        "2024-06-01 09:31:00.000Z",
        json!({ "email": "ama@example.com", "note": NOTE, "Screenshot": "proof_x1.png" }),
    )
}

// =============================================================================
// Transactions
// =============================================================================

#[tokio::test]
async fn test_remote_transaction_fields_come_from_note() {
    let dashboard = AdminDashboard::new(MemoryStore::new(), proofs());

    let transactions = dashboard.get_transactions().await;
    assert_eq!(transactions.provenance, Provenance::Remote);

    let transaction = transactions.value.first().unwrap();
    assert_eq!(transaction.id, TransactionId::new("p1"));
    assert_eq!(transaction.user_email, "ama@example.com");
    assert_eq!(transaction.amount, Decimal::from(50));
    assert_eq!(transaction.amount_ghs, Decimal::new(60150, 2));
    assert_eq!(transaction.status, PaymentStatus::Approved);
    assert_eq!(
        transaction.screenshot.as_deref(),
        Some("http://records.test/api/files/payment_proofs/p1/proof_x1.png")
    );
}

#[tokio::test]
async fn test_remote_status_update_rewrites_note() {
    let records = proofs();
    let dashboard = AdminDashboard::new(MemoryStore::new(), records.clone());

    dashboard
        .update_transaction_status(&TransactionId::new("p1"), PaymentStatus::Rejected)
        .await
        .unwrap();

    let updates = records.updates();
    assert_eq!(updates.len(), 1);
    let (collection, id, fields) = updates.first().unwrap();
    assert_eq!(collection, PAYMENT_PROOFS);
    assert_eq!(id, "p1");

    let note: Value = serde_json::from_str(fields.get("note").unwrap().as_str().unwrap()).unwrap();
    assert_eq!(note["status"], "rejected");
    assert_eq!(note["amount"], 50);
    assert_eq!(note["reference"], "MOMO-1182");

    let transactions = dashboard.get_transactions().await;
    assert_eq!(
        transactions.value.first().unwrap().status,
        PaymentStatus::Rejected
    );
}

#[tokio::test]
async fn test_remote_status_update_of_unknown_record_fails() {
    let dashboard = AdminDashboard::new(MemoryStore::new(), proofs());

    let result = dashboard
        .update_transaction_status(&TransactionId::new("missing"), PaymentStatus::Approved)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_remote_falls_back_to_mirror() {
    let store = MemoryStore::with_entries([(
        "payments",
        r#"[{"userEmail":"kofi@example.com","amount":35,"amountGHS":421.05,"status":"pending"}]"#,
    )]);
    let dashboard = AdminDashboard::new(store, FakeRecordStore::new());

    let transactions = dashboard.get_transactions().await;
    assert_eq!(transactions.provenance, Provenance::LocalFallback);
    assert_eq!(transactions.value.len(), 1);
    assert_eq!(transactions.value.first().unwrap().id.as_str(), "local_0");
}

#[tokio::test]
async fn test_stats_survive_overflowing_amounts() {
    let store = MemoryStore::with_entries([(
        "payments",
        r#"[{"amount":"79228162514264337593543950335"},{"amount":"1"}]"#,
    )]);
    let dashboard = AdminDashboard::new(store, FakeRecordStore::offline());

    let stats = dashboard.stats().await;
    assert_eq!(stats.total_transactions, 2);
    assert_eq!(stats.revenue, Decimal::MAX);
}

// =============================================================================
// Cards
// =============================================================================

#[tokio::test]
async fn test_cards_fall_back_when_offline() {
    let dashboard = AdminDashboard::new(MemoryStore::new(), FakeRecordStore::offline());

    let cards = dashboard.get_cards().await;
    assert!(cards.is_fallback());
    assert_eq!(cards.value.len(), 5);

    let gold = cards.value.iter().find(|card| card.name == "Visa Gold").unwrap();
    assert_eq!(dashboard.card_image_url(gold), "images/visa-gold.png");
}

#[tokio::test]
async fn test_empty_card_collection_is_not_replaced() {
    let dashboard = AdminDashboard::new(MemoryStore::new(), FakeRecordStore::new());

    let cards = dashboard.get_cards().await;
    assert_eq!(cards.provenance, Provenance::Remote);
    assert!(cards.value.is_empty());
}

#[tokio::test]
async fn test_malformed_card_record_is_skipped() {
    let records = FakeRecordStore::new()
        .with_record(
            CARDS,
            "c1",
            "2024-06-01 09:00:00.000Z",
            json!({ "Name": "Visa Gold", "Description": "Gold", "Price": 200, "Image": "gold.png" }),
        )
        .with_record(
            CARDS,
            "c2",
            "2024-06-01 08:00:00.000Z",
            json!({ "Name": "Broken", "Price": "two hundred" }),
        );
    let dashboard = AdminDashboard::new(MemoryStore::new(), records);

    let cards = dashboard.get_cards().await;
    assert_eq!(cards.value.len(), 1);

    let card = cards.value.first().unwrap();
    assert_eq!(card.id, CardId::new("c1"));
    assert_eq!(card.price, Decimal::from(200));
    assert_eq!(
        dashboard.card_image_url(card),
        "http://records.test/api/files/Cards/c1/gold.png"
    );
}

#[tokio::test]
async fn test_add_card_uploads_form() {
    let records = FakeRecordStore::new();
    let dashboard = AdminDashboard::new(MemoryStore::new(), records.clone());

    let created = dashboard
        .add_card(NewCard {
            name: "Titanium Discover".to_string(),
            description: "Cashback rewards".to_string(),
            price: Decimal::new(4999, 2),
            image: Some(FileUpload {
                file_name: "titanium.png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }),
        })
        .await;

    assert_eq!(created.provenance, Provenance::Remote);
    let card = created.value.unwrap();
    assert_eq!(card.name, "Titanium Discover");
    assert_eq!(card.price, Decimal::new(4999, 2));
    assert_eq!(card.image.as_deref(), Some("titanium.png"));

    let forms = records.created();
    let (collection, form) = forms.first().unwrap();
    assert_eq!(collection, CARDS);
    assert_eq!(form.get("Price"), Some("49.99"));
    assert_eq!(form.files.len(), 1);
}

#[tokio::test]
async fn test_add_card_offline_is_reported_not_saved() {
    let dashboard = AdminDashboard::new(MemoryStore::new(), FakeRecordStore::offline());

    let created = dashboard
        .add_card(NewCard {
            name: "Visa Infinite".to_string(),
            description: String::new(),
            price: Decimal::from(35),
            image: None,
        })
        .await;

    assert!(created.is_fallback());
    assert!(created.value.is_none());
}

#[tokio::test]
async fn test_delete_card() {
    let records = FakeRecordStore::new().with_record(
        CARDS,
        "c1",
        "2024-06-01 09:00:00.000Z",
        json!({ "Name": "Visa Gold", "Price": 200 }),
    );
    let dashboard = AdminDashboard::new(MemoryStore::new(), records.clone());

    dashboard.delete_card(&CardId::new("c1")).await.unwrap();
    assert!(records.ids(CARDS).is_empty());

    assert!(dashboard.delete_card(&CardId::new("c1")).await.is_err());
}
