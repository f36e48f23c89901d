/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Retention policy parameters

use serde::{Deserialize, Serialize};

/// Short retention window expressed in weeks
pub const DEFAULT_SHORT_RETENTION_WEEKS: u32 = 13;

/// Number of months a first-of-month snapshot is kept
pub const DEFAULT_MONTHLY_RETENTION_MONTHS: u32 = 12;

/// Number of years a first-of-January snapshot is kept
pub const DEFAULT_YEARLY_RETENTION_YEARS: u32 = 5;

/// Grandfather-father-son retention policy.
///
/// Every file younger than `short_retention_days` is kept. Past that age only
/// first-of-month files within `monthly_retention_months` and first-of-January
/// files within `yearly_retention_years` survive. All windows are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    pub short_retention_days: u32,
    pub monthly_retention_months: u32,
    pub yearly_retention_years: u32,
}

/// A policy combination that is legal but probably not what was meant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyWarning {
    pub field: &'static str,
    pub message: String,
}

impl RetentionPolicy {
    pub fn new(
        short_retention_days: u32,
        monthly_retention_months: u32,
        yearly_retention_years: u32,
    ) -> Self {
        Self {
            short_retention_days,
            monthly_retention_months,
            yearly_retention_years,
        }
    }

    /// Check the policy for windows that shadow each other.
    ///
    /// Nothing here is fatal: the predicate is well defined for any values.
    pub fn validate(&self) -> Vec<PolicyWarning> {
        let mut warnings = Vec::new();

        // Months are at least 28 days long, so most files the monthly rule
        // could keep are already inside the short window.
        if u64::from(self.monthly_retention_months) * 28 < u64::from(self.short_retention_days) {
            warnings.push(PolicyWarning {
                field: "monthly_retention_months",
                message: format!(
                    "monthly window of {} months is mostly covered by the {} day short window",
                    self.monthly_retention_months, self.short_retention_days
                ),
            });
        }

        if u64::from(self.yearly_retention_years) * 12 < u64::from(self.monthly_retention_months) {
            warnings.push(PolicyWarning {
                field: "yearly_retention_years",
                message: format!(
                    "yearly window of {} years is shorter than the {} month monthly window",
                    self.yearly_retention_years, self.monthly_retention_months
                ),
            });
        }

        warnings
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            short_retention_days: DEFAULT_SHORT_RETENTION_WEEKS * 7,
            monthly_retention_months: DEFAULT_MONTHLY_RETENTION_MONTHS,
            yearly_retention_years: DEFAULT_YEARLY_RETENTION_YEARS,
        }
    }
}
