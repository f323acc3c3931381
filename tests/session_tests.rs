// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pumbacash::Owner;
use pumbacash::session::{Resumed, Session, SessionFile, is_expired};
use tempfile::tempdir;

fn t(min: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::minutes(min)
}

#[test]
fn expiry_is_strictly_after_the_timeout() {
    let timeout = Duration::minutes(30);
    assert!(!is_expired(t(10), t(0), timeout));
    assert!(!is_expired(t(30), t(0), timeout));
    assert!(is_expired(t(31), t(0), timeout));
}

#[test]
fn resume_refreshes_an_active_session() {
    let dir = tempdir().unwrap();
    let file = SessionFile::new(dir.path().join("session.json"));
    file.save(&Session::start(Owner::new("u-1"), Some("u1@example.com".into()), t(0)))
        .unwrap();

    let resumed = file.resume(t(20), Duration::minutes(30)).unwrap();
    assert_eq!(resumed.owner(), Some(&Owner::new("u-1")));
    assert_eq!(file.load().unwrap().unwrap().last_activity, t(20));

    // Activity at t(20) keeps it alive past the original deadline.
    assert!(matches!(
        file.resume(t(45), Duration::minutes(30)).unwrap(),
        Resumed::Active(_)
    ));
}

#[test]
fn resume_clears_an_expired_session() {
    let dir = tempdir().unwrap();
    let file = SessionFile::new(dir.path().join("session.json"));
    file.save(&Session::start(Owner::new("u-1"), None, t(0))).unwrap();

    let resumed = file.resume(t(31), Duration::minutes(30)).unwrap();
    assert!(matches!(resumed, Resumed::Expired(_)));
    assert_eq!(resumed.owner(), None);
    assert!(file.load().unwrap().is_none());
}

#[test]
fn no_session_file_means_signed_out() {
    let dir = tempdir().unwrap();
    let file = SessionFile::new(dir.path().join("session.json"));
    assert_eq!(file.resume(t(0), Duration::minutes(30)).unwrap(), Resumed::None);
    assert!(!file.clear().unwrap());
}

#[test]
fn corrupt_session_file_reads_as_signed_out() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();
    let file = SessionFile::new(&path);

    assert!(file.load().is_err());
    assert_eq!(file.resume(t(0), Duration::minutes(30)).unwrap(), Resumed::None);
    assert!(!path.exists());
}
