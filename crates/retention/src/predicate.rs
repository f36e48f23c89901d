/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Keep-or-delete decision for a single backup file.
//!
//! The rules are applied in a fixed order:
//!
//! 1. a file whose name carries no valid `YYYYMMDD` date is never deleted,
//! 2. a file younger than the short window is kept,
//! 3. a first-of-month file within the monthly window is kept,
//! 4. a first-of-January file within the yearly window is kept,
//! 5. everything else may be deleted.
//!
//! Boundary snapshots are only protected while inside their window. Once a
//! January 1st file falls out of the yearly window it is deleted like any
//! other file.

use crate::{
    date::{extract_date, DateExtraction},
    policy::RetentionPolicy,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Why a file is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RetainReason {
    /// Younger than the short retention window
    TooRecent { age_days: i64 },
    /// First of a month inside the monthly window
    MonthlySnapshot { months_ago: i64 },
    /// January 1st inside the yearly window
    YearlySnapshot { years_ago: i64 },
}

/// Why the age of a file could not be judged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", content = "value", rename_all = "snake_case")]
pub enum IndeterminateReason {
    NoDate,
    InvalidDate(String),
}

/// Result of evaluating one file name against a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum RetentionDecision {
    Retain(RetainReason),
    Delete,
    /// Kept because the name could not be dated
    Indeterminate(IndeterminateReason),
}

impl RetentionDecision {
    pub fn is_delete(&self) -> bool {
        matches!(self, RetentionDecision::Delete)
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, RetentionDecision::Indeterminate(_))
    }
}

impl fmt::Display for RetainReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetainReason::TooRecent { age_days } => write!(f, "{age_days} days old"),
            RetainReason::MonthlySnapshot { months_ago } => {
                write!(f, "monthly snapshot, {months_ago} months ago")
            }
            RetainReason::YearlySnapshot { years_ago } => {
                write!(f, "yearly snapshot, {years_ago} years ago")
            }
        }
    }
}

impl fmt::Display for IndeterminateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndeterminateReason::NoDate => f.write_str("no date in file name"),
            IndeterminateReason::InvalidDate(digits) => write!(f, "invalid date {digits}"),
        }
    }
}

impl fmt::Display for RetentionDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionDecision::Retain(reason) => write!(f, "retain ({reason})"),
            RetentionDecision::Delete => f.write_str("delete"),
            RetentionDecision::Indeterminate(reason) => write!(f, "indeterminate ({reason})"),
        }
    }
}

/// Decide what to do with `filename` on `today`.
pub fn evaluate(filename: &str, today: NaiveDate, policy: &RetentionPolicy) -> RetentionDecision {
    let date = match extract_date(filename) {
        DateExtraction::Found(date) => date,
        DateExtraction::Missing => {
            return RetentionDecision::Indeterminate(IndeterminateReason::NoDate)
        }
        DateExtraction::Invalid(digits) => {
            return RetentionDecision::Indeterminate(IndeterminateReason::InvalidDate(digits))
        }
    };

    let age_days = (today - date).num_days();
    if age_days < i64::from(policy.short_retention_days) {
        return RetentionDecision::Retain(RetainReason::TooRecent { age_days });
    }

    if date.day() == 1 {
        let months_ago = months_between(date, today);
        if months_ago <= i64::from(policy.monthly_retention_months) {
            return RetentionDecision::Retain(RetainReason::MonthlySnapshot { months_ago });
        }

        if date.month() == 1 {
            let years_ago = i64::from(today.year()) - i64::from(date.year());
            if years_ago <= i64::from(policy.yearly_retention_years) {
                return RetentionDecision::Retain(RetainReason::YearlySnapshot { years_ago });
            }
        }
    }

    RetentionDecision::Delete
}

/// `true` when `filename` may be deleted on `today`.
///
/// Files without a usable date are never eligible.
pub fn should_delete(filename: &str, today: NaiveDate, policy: &RetentionPolicy) -> bool {
    evaluate(filename, today, policy).is_delete()
}

/// Whole calendar months from `from` to `to`, ignoring the day of month.
fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let month_index = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
    month_index(to) - month_index(from)
}
