// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::time::Duration;

use moneytrail::commands::settings;
use moneytrail::config::{AdvisorConfig, AppConfig, DEFAULT_ADVISOR_TIMEOUT_SECS, DEFAULT_USER};
use moneytrail::db;
use moneytrail::utils::{get_setting, parse_month};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_without_settings_or_env() {
    let conn = db::open_in_memory().unwrap();
    let cfg = AppConfig::resolve(&conn, None, no_env).unwrap();
    assert_eq!(cfg.user, DEFAULT_USER);
    let advisor = AdvisorConfig::resolve(&conn, no_env).unwrap();
    assert_eq!(advisor.url, None);
    assert_eq!(
        advisor.timeout,
        Duration::from_secs(DEFAULT_ADVISOR_TIMEOUT_SECS)
    );
}

#[test]
fn flag_beats_env_beats_settings() {
    let conn = db::open_in_memory().unwrap();
    settings::set(&conn, "user", "stored").unwrap();
    settings::set(&conn, "advisor_url", "http://stored.local/").unwrap();
    settings::set(&conn, "advisor_timeout_secs", "12").unwrap();

    let cfg = AppConfig::resolve(&conn, None, no_env).unwrap();
    assert_eq!(cfg.user, "stored");
    let advisor = AdvisorConfig::resolve(&conn, no_env).unwrap();
    assert_eq!(advisor.url.as_deref(), Some("http://stored.local/"));
    assert_eq!(advisor.timeout, Duration::from_secs(12));

    let env: HashMap<&str, &str> = [
        ("MONEYTRAIL_USER", "from-env"),
        ("MONEYTRAIL_ADVISOR_URL", "http://env.local/"),
        ("MONEYTRAIL_ADVISOR_TIMEOUT_SECS", " "),
    ]
    .into_iter()
    .collect();
    let lookup = |k: &str| env.get(k).map(|v| v.to_string());
    let cfg = AppConfig::resolve(&conn, None, lookup).unwrap();
    assert_eq!(cfg.user, "from-env");
    let advisor = AdvisorConfig::resolve(&conn, lookup).unwrap();
    assert_eq!(advisor.url.as_deref(), Some("http://env.local/"));
    // blank env values fall through to the stored setting
    assert_eq!(advisor.timeout, Duration::from_secs(12));

    let cfg = AppConfig::resolve(&conn, Some("cli"), lookup).unwrap();
    assert_eq!(cfg.user, "cli");
}

#[test]
fn bad_timeout_in_env_only_breaks_the_advisor() {
    let conn = db::open_in_memory().unwrap();
    for bad in ["soon", "0"] {
        let env = |k: &str| (k == "MONEYTRAIL_ADVISOR_TIMEOUT_SECS").then(|| bad.to_string());
        assert!(AdvisorConfig::resolve(&conn, env).is_err());
        // user resolution, and so every other command, is unaffected
        assert_eq!(AppConfig::resolve(&conn, None, env).unwrap().user, DEFAULT_USER);
    }
}

#[test]
fn set_rejects_unknown_keys_and_bad_values() {
    let conn = db::open_in_memory().unwrap();
    assert!(settings::set(&conn, "base_currency", "USD").is_err());
    assert!(settings::set(&conn, "advisor_timeout_secs", "ten").is_err());
    assert!(settings::set(&conn, "advisor_timeout_secs", "0").is_err());
    assert_eq!(get_setting(&conn, "advisor_timeout_secs").unwrap(), None);
    settings::set(&conn, "advisor_timeout_secs", "1").unwrap();
    assert!(settings::set(&conn, "user", "").is_err());
    assert_eq!(get_setting(&conn, "user").unwrap(), None);
}

#[test]
fn settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("moneytrail.sqlite");
    {
        let conn = db::open_at(&path).unwrap();
        settings::set(&conn, "advisor_key", "secret").unwrap();
    }
    let conn = db::open_at(&path).unwrap();
    let advisor = AdvisorConfig::resolve(&conn, no_env).unwrap();
    assert_eq!(advisor.api_key.as_deref(), Some("secret"));
}

#[test]
fn month_arguments() {
    assert_eq!(parse_month("2024-02").unwrap(), (2024, 2));
    assert!(parse_month("2024-13").is_err());
    assert!(parse_month("Feb 2024").is_err());
}
