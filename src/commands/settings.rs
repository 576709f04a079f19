// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::state::Session;
use crate::store::KeyValueStore;
use anyhow::{Result, bail};

pub fn handle<S: KeyValueStore>(store: &S, m: &clap::ArgMatches) -> Result<()> {
    let mut session = Session::open(store);
    match m.subcommand() {
        Some(("dark-mode", sub)) => {
            match sub.get_one::<String>("state").map(String::as_str) {
                Some("on") => session.set_dark_mode(true),
                Some("off") => session.set_dark_mode(false),
                _ => {}
            }
            let state = if session.ledger().dark_mode { "on" } else { "off" };
            println!("Dark mode: {}", state);
        }
        Some(("clear", sub)) => {
            if !sub.get_flag("yes") {
                bail!("Refusing to clear data without --yes");
            }
            session.clear_all();
            println!("All stored data removed");
        }
        _ => {}
    }
    Ok(())
}
