/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use std::path::PathBuf;

use backup_retention::RetentionPolicy;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use super::parse_date;

#[derive(Parser)]
#[command(name = "backup-retention-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "BACKUP_RETENTION_CONFIG")]
    pub config: Option<PathBuf>,
    /// Evaluate as of this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    pub today: Option<NaiveDate>,
    /// Days during which every backup is kept
    #[arg(long, global = true)]
    pub short_days: Option<u32>,
    /// Months during which first-of-month backups are kept
    #[arg(long, global = true)]
    pub monthly_months: Option<u32>,
    /// Years during which first-of-January backups are kept
    #[arg(long, global = true)]
    pub yearly_years: Option<u32>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the retention decision for file names
    Check(CheckCommand),

    /// Delete expired backups from a directory
    Prune(PruneCommand),

    /// Print the effective configuration
    Policy,
}

#[derive(Args)]
pub struct CheckCommand {
    /// File names to evaluate
    #[arg(required = true)]
    pub names: Vec<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PruneCommand {
    /// Backup directory, overrides the configured storage
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
    /// Report what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Apply the policy flags on top of an already loaded policy
    pub fn override_policy(&self, mut policy: RetentionPolicy) -> RetentionPolicy {
        if let Some(days) = self.short_days {
            policy.short_retention_days = days;
        }
        if let Some(months) = self.monthly_months {
            policy.monthly_retention_months = months;
        }
        if let Some(years) = self.yearly_years {
            policy.yearly_retention_years = years;
        }
        policy
    }
}
