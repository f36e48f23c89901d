/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! End-to-end sweeps over a real directory

use backup_retention::{
    RetentionConfig, RetentionPolicy, RetentionService, StorageConfig,
};
use chrono::{Datelike, Duration, NaiveDate};
use std::path::Path;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 5).unwrap()
}

async fn touch(dir: &Path, names: &[String]) {
    for name in names {
        tokio::fs::write(dir.join(name), b"encrypted").await.unwrap();
    }
}

async fn remaining(dir: &Path) -> Vec<String> {
    let mut entries = tokio::fs::read_dir(dir).await.unwrap();
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name().into_string().unwrap());
    }
    names.sort();
    names
}

/// One backup per day for ten years
fn daily_backups(until: NaiveDate) -> Vec<String> {
    let mut date = until - Duration::days(3652);
    let mut names = Vec::new();
    while date <= until {
        names.push(format!("backup_{}.gpg", date.format("%Y%m%d")));
        date += Duration::days(1);
    }
    names
}

#[tokio::test]
async fn test_grandfather_father_son_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let backups = daily_backups(today());
    touch(dir.path(), &backups).await;
    touch(dir.path(), &["README.txt".to_string()]).await;

    let config = RetentionConfig {
        storage: StorageConfig::local(dir.path()),
        ..Default::default()
    };
    let service = RetentionService::new(&config).await.unwrap();
    let report = service.run(today()).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.examined, backups.len() + 1);
    assert_eq!(report.indeterminate, vec!["README.txt"]);

    let left = remaining(dir.path()).await;
    let dated: Vec<NaiveDate> = left
        .iter()
        .filter_map(|name| {
            let digits = name.strip_prefix("backup_")?.strip_suffix(".gpg")?;
            NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
        })
        .collect();

    // Everything inside the short window survives: 91 days (age 0..=90)
    let recent = dated
        .iter()
        .filter(|d| (today() - **d).num_days() < 91)
        .count();
    assert_eq!(recent, 91);

    // Older survivors are month starts within twelve months or January 1st
    // within five years
    let old: Vec<&NaiveDate> = dated
        .iter()
        .filter(|d| (today() - **d).num_days() >= 91)
        .collect();
    for date in &old {
        assert_eq!(date.day(), 1, "{date}");
    }
    let monthly = old.iter().filter(|d| d.month() != 1 || d.year() >= 2024).count();
    let yearly: Vec<i32> = old
        .iter()
        .filter(|d| d.month() == 1 && d.year() < 2024)
        .map(|d| d.year())
        .collect();

    // 2023-08-01 ..= 2024-05-01, the 1st of May being 96 days old
    assert_eq!(monthly, 10);
    // 2023-01-01 falls outside the monthly window but within the yearly one
    assert_eq!(yearly, vec![2019, 2020, 2021, 2022, 2023]);

    assert_eq!(left.len(), 1 + 91 + 10 + 5);
    assert_eq!(report.deleted.len(), backups.len() - (91 + 10 + 5));
}

#[tokio::test]
async fn test_dry_run_leaves_directory_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let backups = vec![
        "backup_20100101.gpg".to_string(),
        "backup_20231115.gpg".to_string(),
        "backup_20240701.gpg".to_string(),
    ];
    touch(dir.path(), &backups).await;

    let config = RetentionConfig {
        dry_run: true,
        storage: StorageConfig::local(dir.path()),
        ..Default::default()
    };
    let report = RetentionService::new(&config)
        .await
        .unwrap()
        .run(today())
        .await
        .unwrap();

    assert_eq!(report.deleted, vec!["backup_20100101.gpg", "backup_20231115.gpg"]);
    assert_eq!(remaining(dir.path()).await, backups);
}

#[tokio::test]
async fn test_custom_policy_from_config() {
    let dir = tempfile::tempdir().unwrap();
    touch(
        dir.path(),
        &[
            "db_20240801.sql.gz".to_string(),
            "db_20240720.sql.gz".to_string(),
            "db_20240601.sql.gz".to_string(),
            "db_20240501.sql.gz".to_string(),
        ],
    )
    .await;

    let config = RetentionConfig {
        policy: RetentionPolicy::new(14, 2, 0),
        storage: StorageConfig::local(dir.path()),
        ..Default::default()
    };
    let service = RetentionService::new(&config).await.unwrap();
    assert_eq!(service.policy().short_retention_days, 14);

    let report = service.run(today()).await.unwrap();
    assert_eq!(report.deleted, vec!["db_20240501.sql.gz", "db_20240720.sql.gz"]);
    assert_eq!(
        remaining(dir.path()).await,
        vec!["db_20240601.sql.gz", "db_20240801.sql.gz"]
    );
}

#[tokio::test]
async fn test_missing_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = RetentionConfig {
        storage: StorageConfig::local(dir.path().join("not-mounted")),
        ..Default::default()
    };
    assert!(RetentionService::new(&config).await.is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_utf8_name_is_kept_and_reported() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let dir = tempfile::tempdir().unwrap();
    let unreadable = dir
        .path()
        .join(OsStr::from_bytes(b"backup_\xff_20100101.gpg"));
    tokio::fs::write(&unreadable, b"encrypted").await.unwrap();
    touch(dir.path(), &["backup_20100101.gpg".to_string()]).await;

    let config = RetentionConfig {
        storage: StorageConfig::local(dir.path()),
        ..Default::default()
    };
    let report = RetentionService::new(&config)
        .await
        .unwrap()
        .run(today())
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.examined, 2);
    assert_eq!(report.deleted, vec!["backup_20100101.gpg"]);
    assert_eq!(report.indeterminate, vec!["backup_\u{FFFD}_20100101.gpg"]);
    assert!(unreadable.exists());
}
