// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use moneytrail::{cli, commands, config::AppConfig, db};

fn env_bool(key: &str) -> bool {
    matches!(
        std::env::var(key).as_deref().map(str::trim),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if env_bool("MONEYTRAIL_LOG_JSON") {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let cfg = AppConfig::load(&conn, matches.get_one::<String>("user").map(String::as_str))?;
    tracing::debug!(user = %cfg.user, "configuration resolved");

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("income", sub)) => commands::income::handle(&conn, &cfg, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&conn, &cfg, sub)?,
        Some(("installment", sub)) => commands::installments::handle(&conn, &cfg, sub)?,
        Some(("subscription", sub)) => commands::subscriptions::handle(&conn, &cfg, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &cfg, sub)?,
        Some(("agenda", sub)) => commands::agenda::handle(&conn, &cfg, sub)?,
        Some(("budget", sub)) => commands::budget::handle(&conn, &cfg, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &cfg)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
