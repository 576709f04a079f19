// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use dompet::config::Config;
use dompet::state::Session;
use dompet::store::FileStore;
use dompet::{cli, commands};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::resolve(
        matches.get_one::<PathBuf>("data-dir").cloned(),
        matches.get_flag("verbose"),
    )?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let store = FileStore::open(&config)?;
    tracing::debug!(dir = %store.dir().display(), "data dir");

    match matches.subcommand() {
        Some(("init", _)) => {
            let session = Session::open(&store);
            println!(
                "Data initialized at {} ({} accounts)",
                store.dir().display(),
                session.ledger().accounts.len()
            );
        }
        Some(("login", sub)) => commands::user::login(&store, sub)?,
        Some(("logout", _)) => commands::user::logout(&store)?,
        Some(("whoami", _)) => commands::user::whoami(&store)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&store, &config, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&store, &config, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&store, &config, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&store, &config, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&store, &config, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, &config, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
