/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Extraction of the `YYYYMMDD` date embedded in a backup file name

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static DATE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{8}").expect("static date pattern"));

/// Outcome of looking for a date in a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateExtraction {
    /// A valid calendar date was found
    Found(NaiveDate),
    /// No run of eight digits exists in the name
    Missing,
    /// Eight digits were found but they are not a calendar date
    Invalid(String),
}

/// Find the first run of eight digits in `filename` and parse it as `YYYYMMDD`.
///
/// Inside a longer run of digits (e.g. a `YYYYMMDDhhmmss` timestamp) the
/// leading eight digits are used.
pub fn extract_date(filename: &str) -> DateExtraction {
    let Some(digits) = DATE_RUN.find(filename).map(|m| m.as_str()) else {
        return DateExtraction::Missing;
    };

    match parse_yyyymmdd(digits) {
        Some(date) => DateExtraction::Found(date),
        None => DateExtraction::Invalid(digits.to_string()),
    }
}

fn parse_yyyymmdd(digits: &str) -> Option<NaiveDate> {
    let year = digits.get(0..4)?.parse::<i32>().ok()?;
    let month = digits.get(4..6)?.parse::<u32>().ok()?;
    let day = digits.get(6..8)?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_finds_embedded_date() {
        assert_eq!(
            extract_date("backup_20240101.gpg"),
            DateExtraction::Found(ymd(2024, 1, 1))
        );
        assert_eq!(
            extract_date("20231115-full.tar.zst"),
            DateExtraction::Found(ymd(2023, 11, 15))
        );
    }

    #[test]
    fn test_missing_date() {
        assert_eq!(extract_date("notes_backup.gpg"), DateExtraction::Missing);
        assert_eq!(extract_date(""), DateExtraction::Missing);
        // Seven digits are not enough
        assert_eq!(extract_date("backup_2024010.gpg"), DateExtraction::Missing);
        // Separated components do not form a run
        assert_eq!(extract_date("backup_2024-01-01.gpg"), DateExtraction::Missing);
    }

    #[test]
    fn test_invalid_calendar_dates() {
        assert_eq!(
            extract_date("backup_20240230.gpg"),
            DateExtraction::Invalid("20240230".to_string())
        );
        assert_eq!(
            extract_date("backup_20241301.gpg"),
            DateExtraction::Invalid("20241301".to_string())
        );
        assert_eq!(
            extract_date("backup_20240132.gpg"),
            DateExtraction::Invalid("20240132".to_string())
        );
        assert_eq!(
            extract_date("backup_20240000.gpg"),
            DateExtraction::Invalid("20240000".to_string())
        );
    }

    #[test]
    fn test_leap_days() {
        assert_eq!(
            extract_date("backup_20240229.gpg"),
            DateExtraction::Found(ymd(2024, 2, 29))
        );
        assert_eq!(
            extract_date("backup_20230229.gpg"),
            DateExtraction::Invalid("20230229".to_string())
        );
        assert_eq!(
            extract_date("backup_19000229.gpg"),
            DateExtraction::Invalid("19000229".to_string())
        );
        assert_eq!(
            extract_date("backup_20000229.gpg"),
            DateExtraction::Found(ymd(2000, 2, 29))
        );
    }

    #[test]
    fn test_first_run_wins() {
        // Timestamp: only the leading eight digits count
        assert_eq!(
            extract_date("db_20240805123000.sql.gz"),
            DateExtraction::Found(ymd(2024, 8, 5))
        );
        // Short digit runs before the date are skipped
        assert_eq!(
            extract_date("host01_v2_20220301.tar"),
            DateExtraction::Found(ymd(2022, 3, 1))
        );
        // The first eight-digit run decides even when a later one is valid
        assert_eq!(
            extract_date("99999999_20220301.tar"),
            DateExtraction::Invalid("99999999".to_string())
        );
    }
}
