// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::state::Session;
use crate::store::KeyValueStore;
use anyhow::Result;
use chrono::Utc;

pub fn login<S: KeyValueStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let mut session = Session::open(store);
    let arg = |name: &str| m.get_one::<String>(name).map(String::as_str).unwrap_or("");
    let user = session.login(arg("email"), arg("password"), arg("name"), Utc::now())?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub fn logout<S: KeyValueStore>(store: &S) -> Result<()> {
    let mut session = Session::open(store);
    session.logout();
    println!("Signed out, data kept");
    Ok(())
}

pub fn whoami<S: KeyValueStore>(store: &S) -> Result<()> {
    let session = Session::open(store);
    match &session.ledger().user {
        Some(u) => println!(
            "{} <{}> since {}",
            u.name,
            u.email,
            u.created_at.format("%Y-%m-%d")
        ),
        None => println!("Not signed in"),
    }
    Ok(())
}
