// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{StoreError, ValidationError};
use crate::models::{Account, AccountKind, Budget, Goal, Transaction, User};
use crate::store::{
    ALL_KEYS, KEY_ACCOUNTS, KEY_BUDGETS, KEY_DARK_MODE, KEY_GOALS, KEY_TRANSACTIONS, KEY_USER,
    KeyValueStore,
};

pub const UNKNOWN_ACCOUNT: &str = "unknown account";
const FALLBACK_USER_NAME: &str = "Pengguna";

/// Everything a session owns. Mutations produce a new value, see [`crate::mutate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    pub user: Option<User>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub goals: Vec<Goal>,
    pub budgets: Vec<Budget>,
    pub dark_mode: bool,
}

impl Ledger {
    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Display name of the account a transaction points at.
    pub fn account_name(&self, id: &str) -> &str {
        self.account(id)
            .map(|a| a.name.as_str())
            .unwrap_or(UNKNOWN_ACCOUNT)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn budget(&self, id: &str) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }
}

pub fn default_accounts() -> Vec<Account> {
    let seed = |id: &str, name: &str, kind, color: &str| Account {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        balance: Decimal::ZERO,
        color: color.to_string(),
    };
    vec![
        seed("1", "Dompet Utama", AccountKind::Cash, "#3b82f6"),
        seed("2", "Bank BCA", AccountKind::Bank, "#10b981"),
        seed("3", "GoPay", AccountKind::Ewallet, "#f59e0b"),
    ]
}

/// Key under which an unreadable document is preserved before it can be overwritten.
pub fn backup_key(key: &str) -> String {
    format!("{}.bak", key)
}

/// The top-level owner of the ledger, mirrored to a [`KeyValueStore`].
pub struct Session<'a, S: KeyValueStore> {
    store: &'a S,
    ledger: Ledger,
    /// Keys whose stored value could be neither read nor backed up. Never written.
    frozen: Vec<&'static str>,
}

impl<'a, S: KeyValueStore> Session<'a, S> {
    /// Loads every collection and seeds the default accounts when none exist.
    ///
    /// A stored value that fails to parse loads as empty, and its raw text is
    /// first copied to [`backup_key`] so later writes cannot destroy it.
    pub fn open(store: &'a S) -> Self {
        let mut frozen = Vec::new();
        let ledger = Ledger {
            user: load_or_default(store, KEY_USER, &mut frozen),
            accounts: load_or_default(store, KEY_ACCOUNTS, &mut frozen),
            transactions: load_or_default(store, KEY_TRANSACTIONS, &mut frozen),
            goals: load_or_default(store, KEY_GOALS, &mut frozen),
            budgets: load_or_default(store, KEY_BUDGETS, &mut frozen),
            dark_mode: load_or_default(store, KEY_DARK_MODE, &mut frozen),
        };
        let mut session = Self {
            store,
            ledger,
            frozen,
        };
        if session.ledger.accounts.is_empty() {
            tracing::info!("no accounts found, seeding defaults");
            session.ledger.accounts = default_accounts();
            session.mirror(KEY_ACCOUNTS, &session.ledger.accounts);
        }
        session
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Replaces the ledger and writes back the collections that changed.
    pub fn commit(&mut self, next: Ledger) {
        let prev = std::mem::replace(&mut self.ledger, next);
        let cur = &self.ledger;
        if prev.user != cur.user {
            match &cur.user {
                Some(user) => self.mirror(KEY_USER, user),
                None => self.forget(KEY_USER),
            }
        }
        if prev.accounts != cur.accounts {
            self.mirror(KEY_ACCOUNTS, &cur.accounts);
        }
        if prev.transactions != cur.transactions {
            self.mirror(KEY_TRANSACTIONS, &cur.transactions);
        }
        if prev.goals != cur.goals {
            self.mirror(KEY_GOALS, &cur.goals);
        }
        if prev.budgets != cur.budgets {
            self.mirror(KEY_BUDGETS, &cur.budgets);
        }
        if prev.dark_mode != cur.dark_mode {
            self.mirror(KEY_DARK_MODE, &cur.dark_mode);
        }
    }

    /// Runs a mutation and commits its result. On error nothing changes.
    pub fn apply<F>(&mut self, op: F) -> Result<(), ValidationError>
    where
        F: FnOnce(&Ledger) -> Result<Ledger, ValidationError>,
    {
        let next = op(&self.ledger)?;
        self.commit(next);
        Ok(())
    }

    /// Unauthenticated sign-in: any credentials are accepted, only the profile is kept.
    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<User, ValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        let name = match name.trim() {
            "" => match email.split('@').next() {
                Some(local) if !local.is_empty() => local.to_string(),
                _ => FALLBACK_USER_NAME.to_string(),
            },
            n => n.to_string(),
        };
        let user = User {
            email: email.to_string(),
            name,
            created_at: now,
        };
        let mut next = self.ledger.clone();
        next.user = Some(user.clone());
        self.commit(next);
        Ok(user)
    }

    /// Forgets the user but keeps every collection.
    pub fn logout(&mut self) {
        let mut next = self.ledger.clone();
        next.user = None;
        self.commit(next);
    }

    pub fn set_dark_mode(&mut self, on: bool) {
        let mut next = self.ledger.clone();
        next.dark_mode = on;
        self.commit(next);
    }

    /// Drops every persisted key and resets the in-memory state.
    pub fn clear_all(&mut self) {
        self.frozen.clear();
        for key in ALL_KEYS {
            self.forget(key);
        }
        self.ledger = Ledger::default();
    }

    fn is_frozen(&self, key: &str) -> bool {
        if self.frozen.iter().any(|k| *k == key) {
            tracing::warn!(key, "stored value is unreadable and was not backed up, not writing");
            return true;
        }
        false
    }

    fn mirror<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if self.is_frozen(key) {
            return;
        }
        if let Err(e) = self.store.save(key, value) {
            tracing::warn!(key, error = %e, "failed to persist, keeping in-memory state");
        }
    }

    fn forget(&self, key: &str) {
        if self.is_frozen(key) {
            return;
        }
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, error = %e, "failed to remove persisted key");
        }
    }
}

fn load_or_default<S, T>(store: &S, key: &'static str, frozen: &mut Vec<&'static str>) -> T
where
    S: KeyValueStore,
    T: DeserializeOwned + Default,
{
    match store.load(key) {
        Ok(Some(v)) => v,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "unreadable stored value, starting empty");
            if let Err(e) = back_up(store, key) {
                tracing::warn!(key, error = %e, "could not back up unreadable value");
                frozen.push(key);
            }
            T::default()
        }
    }
}

fn back_up<S: KeyValueStore>(store: &S, key: &str) -> Result<(), StoreError> {
    if let Some(raw) = store.get_raw(key)? {
        let backup = backup_key(key);
        store.put_raw(&backup, &raw)?;
        tracing::warn!(key, backup = %backup, "kept a copy of the unreadable value");
    }
    Ok(())
}
