use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::report::ReportOptions;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const SEED_FILE: &str = "RINKSTATS_SEED_FILE";
pub const HIGHLIGHT_LIMIT: &str = "RINKSTATS_HIGHLIGHT_LIMIT";
pub const PER_RULE_CAP: &str = "RINKSTATS_PER_RULE_CAP";
pub const STANDOUT_COUNT: &str = "RINKSTATS_STANDOUT_COUNT";
pub const DIVISIONS: &str = "RINKSTATS_DIVISIONS";

/// Runtime configuration read from the environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    /// Postgres adapters are used when set, in-memory adapters otherwise
    pub database_url: Option<String>,
    pub seed_file: Option<PathBuf>,
    pub report: ReportOptions,
    /// Divisions to build; empty means every division the directory knows
    pub divisions: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = ReportOptions::default();

        Self {
            database_url: text(DATABASE_URL),
            seed_file: text(SEED_FILE).map(PathBuf::from),
            report: ReportOptions {
                highlight_limit: parse_or(HIGHLIGHT_LIMIT, text(HIGHLIGHT_LIMIT), defaults.highlight_limit),
                per_rule_cap: parse_or(PER_RULE_CAP, text(PER_RULE_CAP), defaults.per_rule_cap),
                standout_count: parse_or(STANDOUT_COUNT, text(STANDOUT_COUNT), defaults.standout_count),
            },
            divisions: text(DIVISIONS)
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|division| !division.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default = %default, "Ignoring unparseable setting");
            default
        }),
        None => default,
    }
}
