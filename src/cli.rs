// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
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

pub fn build_cli() -> Command {
    Command::new("pumbacash")
        .about("Record income, expenses and savings; see what is left")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file (defaults to the platform config dir)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(
            Command::new("add")
                .about("Record a movement")
                .arg(Arg::new("amount").long("amount").short('a').required(true))
                .arg(
                    Arg::new("rate")
                        .long("rate")
                        .short('r')
                        .default_value("0")
                        .help("Secondary-currency rate"),
                )
                .arg(Arg::new("note").long("note").short('n'))
                .arg(
                    Arg::new("preset")
                        .long("preset")
                        .short('p')
                        .help("One of the keys listed by `presets`"),
                )
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .short('k')
                        .requires("category")
                        .help("Ingreso | Gasto | Ahorro | Inversion"),
                )
                .arg(Arg::new("category").long("category").short('c').requires("kind"))
                .group(
                    ArgGroup::new("what")
                        .args(["preset", "kind"])
                        .required(true),
                ),
        )
        .subcommand(json_flags(
            Command::new("history")
                .about("List records, newest first")
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("summary").about("Totals and the available balance"),
        ))
        .subcommand(Command::new("presets").about("List the quick categories"))
        .subcommand(
            Command::new("export")
                .about("Write records to a file")
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Append records from a CSV in the ledger layout")
                .arg(Arg::new("path").long("path").required(true)),
        )
        .subcommand(
            Command::new("session")
                .about("Sign in and out")
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("user-id").long("user-id").required(true))
                        .arg(Arg::new("email").long("email")),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("status")),
        )
        .subcommand(Command::new("doctor").about("Check the configured store"))
}
