use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

pub const DEFAULT_START_MESSAGE: &str = "I'm a bot, please talk to me!";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Typed configuration, read from the environment (and `.env` if present).
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    /// Users allowed to run `/links`, `/isgroup` and `/stats`.
    pub telegram_admin_users: Vec<i64>,
    /// Page scanned by `/links` when no URL is given.
    pub scan_page_url: Option<String>,
    pub fetch_timeout: Duration,
    pub start_message: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let telegram_admin_users = parse_csv_i64(lookup("TELEGRAM_ADMIN_USERS"));
        let scan_page_url = lookup("SCAN_PAGE_URL").and_then(non_empty);

        let fetch_timeout = match lookup("FETCH_TIMEOUT_MS") {
            None => DEFAULT_FETCH_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) | Err(_) => {
                    return Err(Error::Config(format!(
                        "FETCH_TIMEOUT_MS must be a positive integer, got {raw:?}"
                    )))
                }
                Ok(ms) => Duration::from_millis(ms),
            },
        };

        let start_message = lookup("START_MESSAGE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_START_MESSAGE.to_string());

        Ok(Self {
            telegram_bot_token: telegram_bot_token.trim().to_string(),
            telegram_admin_users,
            scan_page_url,
            fetch_timeout,
            start_message,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.trim().to_string())
    }
}
