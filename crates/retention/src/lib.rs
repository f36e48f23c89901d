/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! # Backup Retention
//!
//! Grandfather-father-son rotation for backup archives whose file names carry
//! a `YYYYMMDD` date:
//!
//! - recent files are always kept,
//! - first-of-month snapshots are kept for a number of months,
//! - first-of-January snapshots are kept for a number of years,
//! - files without a readable date are never deleted.
//!
//! The decision for a single file is a pure function, see
//! [`should_delete`] and [`evaluate`]. [`RetentionService`] applies it to a
//! storage location and reports what happened.

pub mod config;
pub mod date;
pub mod error;
pub mod policy;
pub mod predicate;
pub mod storage;
pub mod sweep;

pub use config::RetentionConfig;
pub use date::{extract_date, DateExtraction};
pub use error::{RetentionError, Result};
pub use policy::RetentionPolicy;
pub use predicate::{
    evaluate, should_delete, IndeterminateReason, RetainReason, RetentionDecision,
};
pub use storage::{FileListing, LocalStorageBackend, StorageBackend, StorageConfig};
pub use sweep::{RetentionSweeper, SweepFailure, SweepReport};

use chrono::NaiveDate;
use tracing::info;

/// Retention service bound to one configured storage location
#[derive(Debug)]
pub struct RetentionService {
    sweeper: RetentionSweeper,
}

impl RetentionService {
    /// Create the storage backend described by `config`
    pub async fn new(config: &RetentionConfig) -> Result<Self> {
        info!("Initializing retention service");

        let storage = storage::create_backend(&config.storage).await?;
        let sweeper = RetentionSweeper::new(storage, config.policy).with_dry_run(config.dry_run);

        Ok(Self { sweeper })
    }

    /// Prune the storage location as of `today`
    pub async fn run(&self, today: NaiveDate) -> Result<SweepReport> {
        self.sweeper.sweep(today).await
    }

    pub fn policy(&self) -> &RetentionPolicy {
        self.sweeper.policy()
    }
}
