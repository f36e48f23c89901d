/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use std::fmt::Display;

use backup_retention::{RetentionConfig, RetentionPolicy};
use chrono::NaiveDate;

pub mod check;
pub mod cli;
pub mod policy;
pub mod prune;

/// Settings shared by every command once configuration has been resolved
#[derive(Debug, Clone)]
pub struct Context {
    pub config: RetentionConfig,
    pub today: NaiveDate,
}

impl Context {
    pub fn policy(&self) -> &RetentionPolicy {
        &self.config.policy
    }
}

/// Exit status for configuration, storage and other setup errors
pub const EXIT_FAILURE: i32 = 1;

pub trait UnwrapResult<T> {
    fn unwrap_result(self, message: &str) -> T;
}

impl<T, E: Display> UnwrapResult<T> for Result<T, E> {
    fn unwrap_result(self, message: &str) -> T {
        match self {
            Ok(result) => result,
            Err(err) => {
                eprintln!("Failed to {message}: {err}");
                std::process::exit(EXIT_FAILURE);
            }
        }
    }
}

/// Parse a `YYYY-MM-DD` (or `YYYYMMDD`) date given on the command line
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
        .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD"))
}
