// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};
use std::path::PathBuf;

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn optional(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

pub fn build_cli() -> Command {
    Command::new("dompet")
        .version(clap::crate_version!())
        .about("Personal finance tracker: accounts, budgets, savings goals and reports")
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the stored collections"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging to stderr"),
        )
        .subcommand(
            Command::new("init").about("Create the data directory and seed default accounts"),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in (any credentials are accepted)")
                .arg(required("email", "Email address"))
                .arg(required("password", "Password, not verified"))
                .arg(optional("name", "Display name, defaults to the email's local part")),
        )
        .subcommand(Command::new("logout").about("Sign out, keeping all data"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(json_args(
            Command::new("dashboard").about("Balances, this month, budgets and goals"),
        ))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(required("name", "Account name"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("cash")
                                .value_parser(["cash", "bank", "ewallet"]),
                        )
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Initial balance"),
                        )
                        .arg(optional("color", "Display color, e.g. #10b981")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("rm").arg(required("account", "Account id or name")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(required("category", "Category label"))
                        .arg(required("amount", "Amount, a non-negative number"))
                        .arg(required("description", "What it was for"))
                        .arg(optional("date", "YYYY-MM-DD, defaults to today"))
                        .arg(required("account", "Account id or name"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .arg(optional("search", "Match description or category"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(optional("category", "Exact category"))
                        .arg(optional("account", "Account id or name"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(Command::new("rm").arg(required("id", "Transaction id"))),
        )
        .subcommand(
            Command::new("budget")
                .about("Category spending limits")
                .subcommand(
                    Command::new("add")
                        .arg(required("category", "Category label"))
                        .arg(required("limit", "Spending ceiling"))
                        .arg(optional("month", "YYYY-MM, defaults to this month")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(required("id", "Budget id"))),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(required("name", "Goal name"))
                        .arg(required("target", "Target amount"))
                        .arg(optional("current", "Amount already saved"))
                        .arg(required("deadline", "YYYY-MM-DD"))
                        .arg(optional("icon", "Emoji shown next to the goal")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(required("id", "Goal id")))
                .subcommand(
                    Command::new("contribute")
                        .arg(required("id", "Goal id"))
                        .arg(optional("amount", "Amount to add"))
                        .arg(
                            Arg::new("preset")
                                .long("preset")
                                .value_parser(value_parser!(u8).range(1..=3))
                                .help("Quick amount: 1 = 100000, 2 = 500000, 3 = 1000000"),
                        )
                        .group(
                            ArgGroup::new("contribution")
                                .args(["amount", "preset"])
                                .required(true),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Derived reports")
                .subcommand(json_args(Command::new("summary")))
                .subcommand(json_args(Command::new("monthly")))
                .subcommand(json_args(
                    Command::new("categories")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(
                            Arg::new("top")
                                .long("top")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_args(Command::new("compare"))),
        )
        .subcommand(
            Command::new("settings")
                .about("Preferences and data")
                .subcommand(
                    Command::new("dark-mode").arg(
                        Arg::new("state")
                            .required(true)
                            .value_parser(["on", "off", "show"]),
                    ),
                )
                .subcommand(
                    Command::new("clear")
                        .about("Delete every stored collection")
                        .arg(Arg::new("yes").long("yes").action(ArgAction::SetTrue).required(true)),
                ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv | json"),
                    )
                    .arg(required("out", "Output file")),
            ),
        )
}
