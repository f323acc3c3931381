// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;

use pumbacash::commands::{doctor, exporter, importer, records};
use pumbacash::config::Settings;
use pumbacash::guard::DuplicateGuard;
use pumbacash::store::PlainFileStore;
use pumbacash::{Kind, Ledger, LedgerStore, cli};
use rust_decimal::Decimal;
use tempfile::{NamedTempFile, TempDir, tempdir};

fn setup() -> (TempDir, Ledger<PlainFileStore>) {
    let dir = tempdir().unwrap();
    let ledger = Ledger::new(
        PlainFileStore::new(dir.path().join("registros.csv")),
        DuplicateGuard::default(),
    );
    (dir, ledger)
}

fn sub<'a>(matches: &'a clap::ArgMatches, name: &str) -> &'a clap::ArgMatches {
    match matches.subcommand() {
        Some((n, m)) if n == name => m,
        _ => panic!("no {} subcommand", name),
    }
}

#[test]
fn add_with_preset_records_kind_and_category() {
    let (_dir, ledger) = setup();
    let matches = cli::build_cli().get_matches_from([
        "pumbacash", "add", "--preset", "compra-divisas", "--amount", "50", "--rate", "36.5",
    ]);
    let rec = records::add(&ledger, None, sub(&matches, "add")).unwrap().unwrap();
    assert_eq!(rec.kind, Kind::Saving);
    assert_eq!(rec.category, "Compra Divisas");
    assert_eq!(rec.rate, Decimal::new(365, 1));
    assert_eq!(records::confirmation(&rec), "Savings recorded: Compra Divisas ($50.00)");
}

#[test]
fn add_with_kind_and_category() {
    let (_dir, ledger) = setup();
    let matches = cli::build_cli().get_matches_from([
        "pumbacash", "add", "--kind", "Gasto", "--category", "Farmacia", "--amount", "12.5",
        "--note", "vitaminas",
    ]);
    let rec = records::add(&ledger, None, sub(&matches, "add")).unwrap().unwrap();
    assert_eq!(rec.kind, Kind::Expense);
    assert_eq!(rec.note.as_deref(), Some("vitaminas"));
    assert_eq!(records::confirmation(&rec), "Expense recorded: Farmacia (-$12.50)");
}

#[test]
fn add_zero_amount_fails_and_creates_nothing() {
    let (dir, ledger) = setup();
    let matches = cli::build_cli()
        .get_matches_from(["pumbacash", "add", "--preset", "comida", "--amount", "0"]);
    let err = records::add(&ledger, None, sub(&matches, "add")).unwrap_err();
    assert!(err.to_string().contains("greater than 0"));
    assert!(!dir.path().join("registros.csv").exists());
}

#[test]
fn add_twice_quickly_warns_instead_of_failing() {
    let (_dir, ledger) = setup();
    let matches = cli::build_cli()
        .get_matches_from(["pumbacash", "add", "--preset", "gasolina", "--amount", "20"]);
    assert!(records::add(&ledger, None, sub(&matches, "add")).unwrap().is_some());
    assert!(records::add(&ledger, None, sub(&matches, "add")).unwrap().is_none());
    assert_eq!(ledger.overview(None).records.len(), 1);
}

#[test]
fn unknown_preset_is_an_error() {
    let (_dir, ledger) = setup();
    let matches = cli::build_cli()
        .get_matches_from(["pumbacash", "add", "--preset", "loteria", "--amount", "1"]);
    let err = records::add(&ledger, None, sub(&matches, "add")).unwrap_err();
    assert!(err.to_string().contains("Unknown preset"));
}

#[test]
fn history_limit_respected() {
    let (_dir, ledger) = setup();
    for preset in ["comida", "salud", "cashea"] {
        let m = cli::build_cli()
            .get_matches_from(["pumbacash", "add", "--preset", preset, "--amount", "3"]);
        records::add(&ledger, None, sub(&m, "add")).unwrap();
    }
    let matches = cli::build_cli().get_matches_from(["pumbacash", "history", "--limit", "2"]);
    let rows = records::query_rows(&ledger, None, sub(&matches, "history"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].categoria, "Cashea");
}

#[test]
fn export_csv_matches_the_store_layout() {
    let (dir, ledger) = setup();
    let m = cli::build_cli()
        .get_matches_from(["pumbacash", "add", "--preset", "quincena", "--amount", "500.00"]);
    records::add(&ledger, None, sub(&m, "add")).unwrap();

    let out = dir.path().join("export.csv");
    let out_str = out.to_string_lossy().to_string();
    let matches = cli::build_cli()
        .get_matches_from(["pumbacash", "export", "--format", "csv", "--out", &out_str]);
    exporter::handle(&ledger, None, sub(&matches, "export")).unwrap();

    let exported = std::fs::read_to_string(&out).unwrap();
    let stored = std::fs::read_to_string(dir.path().join("registros.csv")).unwrap();
    assert_eq!(exported, stored);
    assert!(exported.starts_with("Fecha,Tipo,Categoria,Monto,Tasa,Nota\n"));
}

#[test]
fn export_rejects_unknown_format() {
    let (dir, ledger) = setup();
    let out = dir.path().join("export.xml");
    let out_str = out.to_string_lossy().to_string();
    let matches = cli::build_cli()
        .get_matches_from(["pumbacash", "export", "--format", "xml", "--out", &out_str]);
    assert!(exporter::handle(&ledger, None, sub(&matches, "export")).is_err());
    assert!(!out.exists());
}

#[test]
fn import_appends_rows_from_csv() {
    let (_dir, ledger) = setup();
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "Fecha,Tipo,Categoria,Monto,Tasa,Nota\n\
         2025-01-02 08:00:00,Ingreso,Salario,500.0,36.5,\n\
         2025-01-03 09:30:00,Gasto,Comida,12.25,36.6,almuerzo\n"
    )
    .unwrap();
    file.flush().unwrap();

    let path = format!("  {}  ", file.path().to_str().unwrap());
    let matches = cli::build_cli().get_matches_from(["pumbacash", "import", "--path", &path]);
    let n = importer::handle(&ledger, None, sub(&matches, "import")).unwrap();
    assert_eq!(n, 2);

    let s = ledger.overview(None).summary;
    assert_eq!(s.available, Decimal::new(48775, 2));
}

#[test]
fn doctor_reports_an_empty_file_store() {
    let (_dir, ledger) = setup();
    let settings = Settings::default();
    let rows = doctor::report(ledger.store(), &settings, None);
    assert!(rows.contains(&vec!["reachable".to_string(), "yes".to_string()]));
    assert!(rows.contains(&vec!["records".to_string(), "0".to_string()]));
    assert!(ledger.store().describe().starts_with("file "));
}

#[test]
fn add_requires_preset_or_kind() {
    let res = cli::build_cli().try_get_matches_from(["pumbacash", "add", "--amount", "5"]);
    assert!(res.is_err());
}
