/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Applying the retention policy to a whole backup location

use crate::{
    error::Result,
    policy::RetentionPolicy,
    predicate::{evaluate, RetentionDecision},
    storage::{FileListing, StorageBackend},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Prunes a storage location according to a retention policy
#[derive(Debug)]
pub struct RetentionSweeper {
    storage: Arc<dyn StorageBackend>,
    policy: RetentionPolicy,
    dry_run: bool,
}

/// A deletion that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    pub file: String,
    pub error: String,
}

/// Outcome of a single sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub today: Option<NaiveDate>,
    pub dry_run: bool,
    pub examined: usize,
    pub retained: usize,
    /// Files removed, or that would have been removed in a dry run
    pub deleted: Vec<String>,
    /// Files kept because no date could be read from their name, including
    /// files whose name is not valid UTF-8
    pub indeterminate: Vec<String>,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl RetentionSweeper {
    pub fn new(storage: Arc<dyn StorageBackend>, policy: RetentionPolicy) -> Self {
        Self {
            storage,
            policy,
            dry_run: false,
        }
    }

    /// Report what would be deleted without touching the storage
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Evaluate every file in the storage and delete the expired ones.
    ///
    /// Only a failure to list the storage aborts the sweep. Failed deletions
    /// are collected in the report.
    pub async fn sweep(&self, today: NaiveDate) -> Result<SweepReport> {
        info!(
            "Sweeping {} for {} (dry run: {})",
            self.storage.describe(),
            today,
            self.dry_run
        );

        let FileListing { files, unreadable } = self.storage.list_files().await?;
        let mut report = SweepReport {
            today: Some(today),
            dry_run: self.dry_run,
            ..Default::default()
        };

        for file in unreadable {
            report.examined += 1;
            warn!("Keeping {}: file name is not valid UTF-8", file);
            report.indeterminate.push(file);
        }

        for file in files {
            report.examined += 1;

            match evaluate(&file, today, &self.policy) {
                RetentionDecision::Delete => {
                    if self.dry_run {
                        info!("Would delete {}", file);
                        report.deleted.push(file);
                        continue;
                    }
                    match self.storage.delete_file(&file).await {
                        Ok(()) => {
                            info!("Deleted {}", file);
                            report.deleted.push(file);
                        }
                        Err(err) => {
                            error!("Failed to delete {}: {}", file, err);
                            report.failures.push(SweepFailure {
                                file,
                                error: err.to_string(),
                            });
                        }
                    }
                }
                RetentionDecision::Retain(reason) => {
                    debug!("Keeping {}: {}", file, reason);
                    report.retained += 1;
                }
                RetentionDecision::Indeterminate(reason) => {
                    warn!("Keeping {}: {}", file, reason);
                    report.indeterminate.push(file);
                }
            }
        }

        info!(
            "Sweep finished: {} examined, {} retained, {} deleted, {} indeterminate, {} failed",
            report.examined,
            report.retained,
            report.deleted.len(),
            report.indeterminate.len(),
            report.failures.len()
        );

        Ok(report)
    }
}
