// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::{Error, ErrorKind};

use chrono::{NaiveDate, TimeZone, Utc};
use dompet::error::StoreError;
use dompet::models::{Account, AccountKind, Transaction, TxKind};
use dompet::mutate::{self, AccountDraft, TransactionDraft};
use dompet::state::{Session, backup_key, default_accounts};
use dompet::store::{
    FileStore, KEY_ACCOUNTS, KEY_DARK_MODE, KEY_TRANSACTIONS, KEY_USER, KeyValueStore, MemoryStore,
};
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;

fn income(amount: &str) -> TransactionDraft {
    TransactionDraft {
        kind: TxKind::Income,
        category: "Gaji".into(),
        amount: amount.into(),
        description: "Gaji Januari".into(),
        date: NaiveDate::from_ymd_opt(2025, 1, 25).unwrap(),
        account_id: "2".into(),
        recurring: true,
    }
}

#[test]
fn absent_keys_load_as_defaults_and_accounts_are_seeded() {
    let store = MemoryStore::new();
    let session = Session::open(&store);
    let ledger = session.ledger();
    assert!(ledger.user.is_none());
    assert!(ledger.transactions.is_empty());
    assert!(ledger.goals.is_empty());
    assert!(ledger.budgets.is_empty());
    assert!(!ledger.dark_mode);
    assert_eq!(ledger.accounts, default_accounts());
    // Seeding is persisted straight away.
    let stored: Vec<Account> = store.load(KEY_ACCOUNTS).unwrap().unwrap();
    assert_eq!(stored.len(), 3);
    assert!(!store.contains(KEY_TRANSACTIONS));
}

#[test]
fn seeding_is_idempotent() {
    let store = MemoryStore::new();
    let mut session = Session::open(&store);
    let next = mutate::delete_account(session.ledger(), "3");
    session.commit(next);

    let reopened = Session::open(&store);
    let names: Vec<&str> = reopened.ledger().accounts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Dompet Utama", "Bank BCA"]);
}

#[test]
fn commit_mirrors_changes_to_files() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path(), "finance_app");
    {
        let mut session = Session::open(&store);
        session.apply(|l| mutate::add_transaction(l, income("5000000"))).unwrap();
        session.set_dark_mode(true);
    }

    assert!(dir.path().join("finance_app_transactions.json").exists());
    assert!(dir.path().join("finance_app_accounts.json").exists());

    let session = Session::open(&store);
    let ledger = session.ledger();
    assert_eq!(ledger.transactions.len(), 1);
    assert_eq!(ledger.account("2").unwrap().balance, Decimal::from(5_000_000));
    assert!(ledger.dark_mode);
}

#[test]
fn validation_failure_persists_nothing() {
    let store = MemoryStore::new();
    let mut session = Session::open(&store);
    assert!(session.apply(|l| mutate::add_transaction(l, income("lots"))).is_err());
    assert!(session.ledger().transactions.is_empty());
    assert!(!store.contains(KEY_TRANSACTIONS));
}

#[test]
fn persisted_layout_uses_camel_case_and_numbers() {
    let store = MemoryStore::new();
    let mut session = Session::open(&store);
    session.apply(|l| mutate::add_transaction(l, income("1500000"))).unwrap();

    let raw: serde_json::Value = store.load(KEY_TRANSACTIONS).unwrap().unwrap();
    let first = &raw[0];
    assert_eq!(first["type"], json!("income"));
    assert_eq!(first["accountId"], json!("2"));
    assert_eq!(first["date"], json!("2025-01-25"));
    assert_eq!(first["recurring"], json!(true));
    assert_eq!(first["amount"].as_f64(), Some(1_500_000.0));
}

#[test]
fn reads_documents_written_by_the_browser_app() {
    let store = MemoryStore::new();
    store
        .put_raw(
            KEY_TRANSACTIONS,
            r#"[{"id":"1736900000000","type":"expense","category":"Makanan","amount":150000,
                 "description":"Makan siang","date":"2025-01-15","accountId":"1"}]"#,
        )
        .unwrap();
    store.put_raw(KEY_DARK_MODE, "true").unwrap();

    let session = Session::open(&store);
    let txs: &[Transaction] = &session.ledger().transactions;
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, Decimal::from(150_000));
    assert_eq!(txs[0].recurring, None);
    assert!(session.ledger().dark_mode);
}

#[test]
fn corrupt_document_is_treated_as_absent() {
    let store = MemoryStore::new();
    store.put_raw(KEY_TRANSACTIONS, "{not json").unwrap();
    assert!(store.load::<Vec<Transaction>>(KEY_TRANSACTIONS).is_err());

    let session = Session::open(&store);
    assert!(session.ledger().transactions.is_empty());
}

#[test]
fn login_logout_and_clear() {
    let store = MemoryStore::new();
    let mut session = Session::open(&store);
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();

    let user = session.login("budi@example.com", "secret", "", now).unwrap();
    assert_eq!(user.name, "budi");
    assert!(store.contains(KEY_USER));
    assert!(session.login("", "secret", "Budi", now).is_err());

    session.logout();
    assert!(session.ledger().user.is_none());
    assert!(!store.contains(KEY_USER));
    assert!(store.contains(KEY_ACCOUNTS));

    session.clear_all();
    assert!(!store.contains(KEY_ACCOUNTS));
    assert_eq!(session.ledger().accounts.len(), 0);
}

#[test]
fn file_store_missing_key_is_none() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path(), "finance_app");
    assert!(store.get_raw("goals").unwrap().is_none());
    store.remove("goals").unwrap();
    store.save("goals", &json!([])).unwrap();
    assert_eq!(store.get_raw("goals").unwrap().as_deref(), Some("[]"));
    assert_eq!(store.path_for("goals"), dir.path().join("finance_app_goals.json"));
}

const ACCOUNTS_WITH_UNKNOWN_KIND: &str = r##"[
    {"id":"1","name":"Dompet Utama","type":"cash","balance":2500000,"color":"#3b82f6"},
    {"id":"9","name":"Kartu Kredit","type":"credit","balance":0,"color":"#ef4444"}
]"##;

#[test]
fn unreadable_accounts_are_backed_up_before_reseeding() {
    let store = MemoryStore::new();
    store.put_raw(KEY_ACCOUNTS, ACCOUNTS_WITH_UNKNOWN_KIND).unwrap();

    let mut session = Session::open(&store);
    assert_eq!(session.ledger().accounts, default_accounts());
    session.apply(|l| mutate::add_transaction(l, income("100"))).unwrap();

    let backup = store.get_raw(&backup_key(KEY_ACCOUNTS)).unwrap();
    assert_eq!(backup.as_deref(), Some(ACCOUNTS_WITH_UNKNOWN_KIND));
}

#[test]
fn unreadable_transactions_survive_the_next_commit_on_disk() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path(), "finance_app");
    let original = r#"[{"id":"1","type":"transfer","amount":10}]"#;
    store.put_raw(KEY_TRANSACTIONS, original).unwrap();

    {
        let mut session = Session::open(&store);
        assert!(session.ledger().transactions.is_empty());
        session.apply(|l| mutate::add_transaction(l, income("5000"))).unwrap();
    }

    let kept = dir.path().join("finance_app_transactions.bak.json");
    assert_eq!(std::fs::read_to_string(kept).unwrap(), original);
    let reopened = Session::open(&store);
    assert_eq!(reopened.ledger().transactions.len(), 1);
}

/// Accounts cannot be read at all; every other key behaves normally.
struct LockedAccounts {
    inner: MemoryStore,
}

impl KeyValueStore for LockedAccounts {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        if key == KEY_ACCOUNTS {
            return Err(StoreError::Io {
                key: key.to_string(),
                path: "finance_app_accounts.json".into(),
                source: Error::new(ErrorKind::PermissionDenied, "denied"),
            });
        }
        self.inner.get_raw(key)
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.put_raw(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }
}

#[test]
fn keys_that_cannot_be_read_or_backed_up_are_never_written() {
    let store = LockedAccounts {
        inner: MemoryStore::new(),
    };
    let mut session = Session::open(&store);
    assert!(!store.inner.contains(KEY_ACCOUNTS));

    session
        .apply(|l| {
            mutate::add_account(
                l,
                AccountDraft {
                    name: "Mandiri".into(),
                    kind: AccountKind::Bank,
                    balance: "100".into(),
                    color: None,
                },
            )
        })
        .unwrap();
    session.set_dark_mode(true);
    assert!(!store.inner.contains(KEY_ACCOUNTS));
    assert!(store.inner.contains(KEY_DARK_MODE));
}
