/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use backup_retention::{RetentionDecision, evaluate};
use console::style;
use prettytable::{Attr, Cell, Row, Table};
use serde::Serialize;

use super::{Context, UnwrapResult, cli::CheckCommand};

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub file: String,
    #[serde(flatten)]
    pub decision: RetentionDecision,
}

impl CheckCommand {
    pub fn exec(self, ctx: &Context) {
        let results = evaluate_names(&self.names, ctx);

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&results).unwrap_result("serialize results")
            );
            return;
        }

        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("File").with_style(Attr::Bold),
            Cell::new("Decision").with_style(Attr::Bold),
        ]));
        for result in &results {
            table.add_row(Row::new(vec![
                Cell::new(&result.file),
                Cell::new(&decision_label(&result.decision)),
            ]));
        }

        eprintln!();
        table.printstd();
        eprintln!(
            "\n{} of {} file{} eligible for deletion as of {}.\n",
            results.iter().filter(|r| r.decision.is_delete()).count(),
            results.len(),
            if results.len() == 1 { "" } else { "s" },
            ctx.today
        );
    }
}

pub fn evaluate_names(names: &[String], ctx: &Context) -> Vec<CheckResult> {
    names
        .iter()
        .map(|name| CheckResult {
            file: name.clone(),
            decision: evaluate(name, ctx.today, ctx.policy()),
        })
        .collect()
}

fn decision_label(decision: &RetentionDecision) -> String {
    match decision {
        RetentionDecision::Delete => style(decision).red().to_string(),
        RetentionDecision::Retain(_) => style(decision).green().to_string(),
        RetentionDecision::Indeterminate(_) => style(decision).yellow().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backup_retention::{IndeterminateReason, RetentionConfig};
    use chrono::NaiveDate;

    fn context() -> Context {
        Context {
            config: RetentionConfig::default(),
            today: NaiveDate::from_ymd_opt(2024, 8, 5).unwrap(),
        }
    }

    #[test]
    fn test_evaluate_names() {
        let names = vec![
            "backup_20240101.gpg".to_string(),
            "backup_20100101.gpg".to_string(),
            "notes_backup.gpg".to_string(),
        ];
        let results = evaluate_names(&names, &context());

        assert_eq!(results.len(), 3);
        assert!(!results[0].decision.is_delete());
        assert!(results[1].decision.is_delete());
        assert_eq!(
            results[2].decision,
            RetentionDecision::Indeterminate(IndeterminateReason::NoDate)
        );
    }

    #[test]
    fn test_json_output() {
        let results = evaluate_names(&["backup_20240230.gpg".to_string()], &context());
        let json = serde_json::to_value(&results).unwrap();

        assert_eq!(json[0]["file"], "backup_20240230.gpg");
        assert_eq!(json[0]["decision"], "indeterminate");
        assert_eq!(json[0]["reason"]["cause"], "invalid_date");
        assert_eq!(json[0]["reason"]["value"], "20240230");
    }
}
