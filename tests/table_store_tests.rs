// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use pumbacash::guard::DuplicateGuard;
use pumbacash::schema::TableRow;
use pumbacash::store::sqlite::SqliteTable;
use pumbacash::store::{HostedTableStore, TableFilter, TableService};
use pumbacash::{Kind, Ledger, LedgerError, LedgerStore, Owner, RecordDraft, summarize};
use rust_decimal::Decimal;

fn at(s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(10, 0, s)
        .unwrap()
}

fn store() -> HostedTableStore<SqliteTable> {
    HostedTableStore::new(SqliteTable::open_in_memory("registros").unwrap(), "registros")
}

fn draft(kind: Kind, category: &str, cents: i64) -> RecordDraft {
    RecordDraft::new(kind, category, Decimal::new(cents, 2), Decimal::new(365, 1))
}

#[test]
fn records_are_invisible_to_other_identities() {
    let ledger = Ledger::new(store(), DuplicateGuard::default());
    let a = Owner::new("user-a");
    let b = Owner::new("user-b");

    ledger
        .submit_at(Some(&a), draft(Kind::Income, "Salario", 50000), None, at(0))
        .unwrap();

    let for_b = ledger.overview(Some(&b));
    assert!(for_b.records.is_empty());
    assert_eq!(for_b.summary, summarize(&[]));

    let for_a = ledger.overview(Some(&a));
    assert_eq!(for_a.records.len(), 1);
    assert_eq!(for_a.records[0].owner.as_ref(), Some(&a));
    assert_eq!(for_a.summary.total_income, Decimal::new(500, 0));
}

#[test]
fn round_trip_keeps_fields_and_precision() {
    let s = store();
    let owner = Owner::new("user-a");
    let rec = draft(Kind::Saving, "Fondo Ahorro", 1005)
        .note("para el carro")
        .into_record(at(3), Some(&owner))
        .unwrap();
    s.append(&rec, Some(&owner), None).unwrap();

    let loaded = s.load_all(Some(&owner)).unwrap();
    assert_eq!(loaded.records, vec![rec]);
    assert!(loaded.version.is_none());
    assert_eq!(loaded.records[0].amount.to_string(), "10.05");
}

#[test]
fn no_identity_sees_nothing_and_cannot_write() {
    let s = store();
    let owner = Owner::new("user-a");
    let rec = draft(Kind::Expense, "Comida", 500)
        .into_record(at(0), Some(&owner))
        .unwrap();
    s.append(&rec, Some(&owner), None).unwrap();

    assert!(s.load_all(None).unwrap().records.is_empty());
    let err = s.append(&rec, None, None).unwrap_err();
    assert!(matches!(err, LedgerError::MissingOwner));
    assert_eq!(s.load_all(Some(&owner)).unwrap().records.len(), 1);
}

#[test]
fn insertion_order_is_kept() {
    let s = store();
    let owner = Owner::new("user-a");
    // Later timestamp inserted first: order follows insertion, not fecha.
    for (sec, cat) in [(9, "Salud"), (1, "Comida")] {
        let r = draft(Kind::Expense, cat, 100)
            .into_record(at(sec), Some(&owner))
            .unwrap();
        s.append(&r, Some(&owner), None).unwrap();
    }
    let cats: Vec<String> = s
        .load_all(Some(&owner))
        .unwrap()
        .records
        .into_iter()
        .map(|r| r.category)
        .collect();
    assert_eq!(cats, ["Salud", "Comida"]);
}

#[test]
fn duplicate_lookup_is_scoped_to_the_owner() {
    let ledger = Ledger::new(store(), DuplicateGuard::default());
    let a = Owner::new("user-a");
    let b = Owner::new("user-b");

    ledger
        .submit_at(Some(&a), draft(Kind::Expense, "Gasolina", 2000), None, at(0))
        .unwrap();
    // Same movement by someone else moments later is not a duplicate.
    ledger
        .submit_at(Some(&b), draft(Kind::Expense, "Gasolina", 2000), None, at(1))
        .unwrap();
    let again = ledger.submit_at(Some(&a), draft(Kind::Expense, "Gasolina", 2000), None, at(2));
    assert!(matches!(again, Err(LedgerError::DuplicateSuspected { .. })));

    assert_eq!(ledger.overview(Some(&a)).records.len(), 1);
    assert_eq!(ledger.overview(Some(&b)).records.len(), 1);
}

#[test]
fn amount_filter_compares_numerically() {
    let t = SqliteTable::open_in_memory("registros").unwrap();
    t.connection()
        .execute(
            "INSERT INTO registros(user_id, fecha, tipo, categoria, monto, tasa, descripcion) \
             VALUES ('u', '2025-06-01 10:00:00', 'Gasto', 'Comida', '20.0', '0', NULL)",
            [],
        )
        .unwrap();
    let filter = TableFilter {
        user_id: Some("u".into()),
        monto: Some(Decimal::new(2000, 2)),
        ..TableFilter::default()
    };
    assert_eq!(t.select("registros", &filter).unwrap().len(), 1);
}

/// A service that ignores the owner filter entirely.
struct LeakyService(Vec<TableRow>);

impl TableService for LeakyService {
    fn select(&self, _table: &str, _filter: &TableFilter) -> pumbacash::Result<Vec<TableRow>> {
        Ok(self.0.clone())
    }

    fn insert(&self, _table: &str, row: &TableRow) -> pumbacash::Result<TableRow> {
        Ok(row.clone())
    }
}

#[test]
fn rows_of_other_owners_are_dropped_even_if_returned() {
    let row = |user: &str| TableRow {
        user_id: user.into(),
        fecha: "2025-06-01T10:00:00".into(),
        tipo: "Gasto".into(),
        categoria: "Comida".into(),
        monto: Decimal::new(5, 0),
        tasa: None,
        descripcion: None,
    };
    let s = HostedTableStore::new(LeakyService(vec![row("a"), row("b"), row("a")]), "registros");
    let recs = s.load_all(Some(&Owner::new("a"))).unwrap().records;
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r.owner == Some(Owner::new("a"))));
}

#[test]
fn hosted_rows_deserialize_from_json() {
    let body = r#"[{"id": 7, "user_id": "a", "fecha": "2025-06-01T10:00:00+00:00",
                   "tipo": "Inversion", "categoria": "Oficina", "monto": 120.5,
                   "tasa": "36.5", "descripcion": null, "created_at": "2025-06-01"}]"#;
    let rows: Vec<TableRow> = serde_json::from_str(body).unwrap();
    let rec = rows.into_iter().next().unwrap().into_record(1).unwrap();
    assert_eq!(rec.kind, Kind::Investment);
    assert_eq!(rec.amount, Decimal::new(1205, 1));
    assert_eq!(rec.rate, Decimal::new(365, 1));
    assert_eq!(rec.note, None);
}

#[test]
fn null_or_missing_rate_reads_as_zero() {
    let body = r#"[{"user_id": "a", "fecha": "2025-06-01 10:00:00", "tipo": "Gasto",
                    "categoria": "Comida", "monto": "4.50", "tasa": null},
                   {"user_id": "a", "fecha": "2025-06-01 10:01:00", "tipo": "Gasto",
                    "categoria": "Salud", "monto": "3"}]"#;
    let rows: Vec<TableRow> = serde_json::from_str(body).unwrap();
    let s = HostedTableStore::new(LeakyService(rows), "registros");
    let recs = s.load_all(Some(&Owner::new("a"))).unwrap().records;
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r.rate == Decimal::ZERO));
    assert_eq!(recs[0].secondary_amount(), Decimal::ZERO);
}
