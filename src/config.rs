// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration. Values come from, in order of precedence: the
//! `--user` flag, `MONEYTRAIL_*` environment variables, the `settings` table,
//! and built-in defaults. The resolved [`AppConfig`] is passed explicitly to
//! the layers doing I/O; [`AdvisorConfig`] is resolved only by the command
//! that calls the advisor.

use std::time::Duration;

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::utils::get_setting;

pub const DEFAULT_USER: &str = "default";
pub const DEFAULT_ADVISOR_TIMEOUT_SECS: u64 = 30;

/// Setting keys accepted by `config set`, paired with their env override.
pub const KNOWN_KEYS: &[(&str, &str)] = &[
    ("user", "MONEYTRAIL_USER"),
    ("advisor_url", "MONEYTRAIL_ADVISOR_URL"),
    ("advisor_key", "MONEYTRAIL_ADVISOR_KEY"),
    ("advisor_timeout_secs", "MONEYTRAIL_ADVISOR_TIMEOUT_SECS"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Opaque id scoping every stored record.
    pub user: String,
}

/// Env override first, then the stored setting. Blank env values are ignored.
fn lookup(
    conn: &Connection,
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    env_key: &str,
) -> Result<Option<String>> {
    if let Some(v) = env(env_key).filter(|v| !v.trim().is_empty()) {
        return Ok(Some(v.trim().to_string()));
    }
    get_setting(conn, key)
}

impl AppConfig {
    /// Resolves configuration against the process environment.
    pub fn load(conn: &Connection, user_flag: Option<&str>) -> Result<Self> {
        Self::resolve(conn, user_flag, |k| std::env::var(k).ok())
    }

    /// Resolves configuration with an explicit env lookup.
    pub fn resolve(
        conn: &Connection,
        user_flag: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let user = match user_flag.map(str::trim).filter(|u| !u.is_empty()) {
            Some(u) => u.to_string(),
            None => lookup(conn, &env, "user", "MONEYTRAIL_USER")?
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
        };
        Ok(AppConfig { user })
    }
}

impl AdvisorConfig {
    /// Only `budget recommend` needs these, so they are resolved on demand.
    pub fn load(conn: &Connection) -> Result<Self> {
        Self::resolve(conn, |k| std::env::var(k).ok())
    }

    pub fn resolve(conn: &Connection, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs = match lookup(
            conn,
            &env,
            "advisor_timeout_secs",
            "MONEYTRAIL_ADVISOR_TIMEOUT_SECS",
        )? {
            Some(s) => parse_timeout_secs(&s)?,
            None => DEFAULT_ADVISOR_TIMEOUT_SECS,
        };
        Ok(AdvisorConfig {
            url: lookup(conn, &env, "advisor_url", "MONEYTRAIL_ADVISOR_URL")?,
            api_key: lookup(conn, &env, "advisor_key", "MONEYTRAIL_ADVISOR_KEY")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// A whole, positive number of seconds.
pub fn parse_timeout_secs(s: &str) -> Result<u64> {
    match s.trim().parse::<u64>() {
        Ok(0) => bail!("advisor_timeout_secs must be at least 1 second"),
        Ok(n) => Ok(n),
        Err(_) => bail!("Invalid advisor_timeout_secs '{}', expected whole seconds", s),
    }
}

pub fn is_known_key(key: &str) -> bool {
    KNOWN_KEYS.iter().any(|(k, _)| *k == key)
}
