/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

//! Backup retention CLI library
//!
//! Command definitions and handlers for the `backup-retention-cli` tool, which
//! evaluates backup file names against a grandfather-father-son policy and
//! prunes expired backups from a directory.

pub mod modules;

pub use modules::{
    Context, UnwrapResult,
    cli::{CheckCommand, Cli, Commands, PruneCommand},
};
