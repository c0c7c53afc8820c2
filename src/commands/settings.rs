// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{KNOWN_KEYS, is_known_key, parse_timeout_secs};
use crate::utils::{get_setting, list_settings, pretty_table, required, set_setting};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = required(sub, "key")?;
            match get_setting(conn, key)? {
                Some(v) => println!("{}", display_value(key, &v)),
                None => println!("{} is not set", key),
            }
        }
        Some(("set", sub)) => {
            let key = required(sub, "key")?;
            let value = required(sub, "value")?.trim();
            set(conn, key, value)?;
            println!("{} set", key);
        }
        Some(("list", _)) => {
            let rows = list_settings(conn)?
                .into_iter()
                .map(|(k, v)| {
                    let shown = display_value(&k, &v);
                    vec![k, shown]
                })
                .collect();
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}

/// Stores a known setting after checking its value.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    if !is_known_key(key) {
        let known: Vec<&str> = KNOWN_KEYS.iter().map(|(k, _)| *k).collect();
        bail!("Unknown setting '{}', expected one of: {}", key, known.join(", "));
    }
    if key == "advisor_timeout_secs" {
        parse_timeout_secs(value)?;
    }
    if value.is_empty() {
        bail!("Value for '{}' must not be empty", key);
    }
    set_setting(conn, key, value)?;
    tracing::debug!(key, "setting updated");
    Ok(())
}

fn display_value(key: &str, value: &str) -> String {
    if key == "advisor_key" {
        "********".to_string()
    } else {
        value.to_string()
    }
}
