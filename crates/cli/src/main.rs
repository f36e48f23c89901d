/*
 * SPDX-FileCopyrightText: 2024 A3Mailer Project
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

use backup_retention::config;
use backup_retention_cli::{
    Cli, Commands, Context, UnwrapResult,
    modules::policy,
};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if args.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::load(args.config.as_deref())
        .await
        .unwrap_result("load configuration");

    let overridden = args.override_policy(config.policy);
    if overridden != config.policy {
        for warning in overridden.validate() {
            warn!("Policy {}: {}", warning.field, warning.message);
        }
        config.policy = overridden;
    }

    let ctx = Context {
        config,
        today: args
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
    };
    info!(
        "Retention policy: {} days, {} months, {} years as of {}",
        ctx.config.policy.short_retention_days,
        ctx.config.policy.monthly_retention_months,
        ctx.config.policy.yearly_retention_years,
        ctx.today
    );

    match args.command {
        Commands::Check(command) => command.exec(&ctx),
        Commands::Prune(command) => command.exec(&ctx).await,
        Commands::Policy => policy::exec(&ctx),
    }

    Ok(())
}
