/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use backup_retention::{RetentionConfig, RetentionService, StorageConfig, SweepReport};
use console::style;
use prettytable::{Attr, Cell, Row, Table};

use super::{Context, UnwrapResult, cli::PruneCommand};

/// Exit status when some deletions failed
pub const EXIT_PARTIAL_FAILURE: i32 = 2;

impl PruneCommand {
    pub async fn exec(self, ctx: &Context) {
        let config = self.effective_config(&ctx.config);
        let json = self.json;

        let service = RetentionService::new(&config)
            .await
            .unwrap_result("open backup storage");
        let report = service.run(ctx.today).await.unwrap_result("prune backups");

        if json {
            println!("{}", report.to_json().unwrap_result("serialize report"));
        } else {
            print_report(&report);
        }

        if let Some(code) = exit_code(&report) {
            std::process::exit(code);
        }
    }

    pub fn effective_config(&self, base: &RetentionConfig) -> RetentionConfig {
        let mut config = base.clone();
        if let Some(dir) = &self.dir {
            config.storage = StorageConfig::local(dir);
        }
        config.dry_run |= self.dry_run;
        config
    }
}

/// Non-zero exit status for a finished sweep, if any
pub fn exit_code(report: &SweepReport) -> Option<i32> {
    (!report.is_success()).then_some(EXIT_PARTIAL_FAILURE)
}

fn print_report(report: &SweepReport) {
    let verb = if report.dry_run { "Would delete" } else { "Deleted" };

    if !report.deleted.is_empty() || !report.failures.is_empty() {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("File").with_style(Attr::Bold),
            Cell::new("Result").with_style(Attr::Bold),
        ]));
        for file in &report.deleted {
            table.add_row(Row::new(vec![Cell::new(file), Cell::new(verb)]));
        }
        for failure in &report.failures {
            table.add_row(Row::new(vec![
                Cell::new(&failure.file),
                Cell::new(&style(&failure.error).red().to_string()),
            ]));
        }
        eprintln!();
        table.printstd();
    }

    if !report.indeterminate.is_empty() {
        eprintln!(
            "\n{} Kept {} file{} without a readable date: {}",
            style("!").yellow().bold(),
            report.indeterminate.len(),
            if report.indeterminate.len() == 1 { "" } else { "s" },
            report.indeterminate.join(", ")
        );
    }

    eprintln!(
        "\n{} examined, {} retained, {} {}, {} failed.\n",
        report.examined,
        report.retained,
        report.deleted.len(),
        verb.to_lowercase(),
        report.failures.len()
    );
}
