//! Runtime settings read from the environment and an optional `.env` file.

use std::{env, path::Path, path::PathBuf, time::Duration};

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;

use crate::utils;

const DEFAULT_ASSET_HOST: &str = "http://localhost:5000";
const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Jakarta;
const DEFAULT_PAGE_SIZE: usize = 8;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Root of the REST API, without a trailing slash.
    pub api_url: String,
    /// Host that serves the API-relative photo paths.
    pub asset_host: String,
    /// Timezone used for calendar days and displayed dates.
    pub timezone: Tz,
    /// Cards per page on the landing grid.
    pub page_size: usize,
    pub session_path: PathBuf,
    pub http_timeout: Duration,
}

impl Settings {
    /// Load `env_file` into the process environment when it exists, then
    /// read settings from the environment. Variables already set win over
    /// the file.
    pub fn from_env(env_file: &Path) -> Result<Self> {
        if env_file.exists() {
            dotenvy::from_path(env_file)
                .with_context(|| format!("reading env file {}", env_file.display()))?;
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = get("EVENT_API_URL")
            .ok_or_else(|| anyhow!("EVENT_API_URL must be set"))?
            .trim_end_matches('/')
            .to_string();
        reqwest::Url::parse(&api_url).with_context(|| format!("invalid EVENT_API_URL {api_url}"))?;

        let asset_host = get("EVENT_ASSET_HOST")
            .unwrap_or_else(|| DEFAULT_ASSET_HOST.to_string())
            .trim_end_matches('/')
            .to_string();
        let timezone = match get("EVENT_TIMEZONE") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|err| anyhow!("invalid EVENT_TIMEZONE {name}: {err}"))?,
            None => DEFAULT_TIMEZONE,
        };
        let page_size = get("EVENT_PAGE_SIZE")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let session_path = get("EVENT_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(utils::default_session_path);
        let http_timeout = get("EVENT_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));

        Ok(Self {
            api_url,
            asset_host,
            timezone,
            page_size,
            session_path,
            http_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, fs};
    use tempfile::tempdir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = Settings::from_lookup(lookup(&[("EVENT_API_URL", "http://api.local/")]))
            .expect("settings");
        assert_eq!(cfg.api_url, "http://api.local");
        assert_eq!(cfg.asset_host, DEFAULT_ASSET_HOST);
        assert_eq!(cfg.timezone, chrono_tz::Asia::Jakarta);
        assert_eq!(cfg.page_size, 8);
        assert_eq!(cfg.http_timeout, Duration::from_secs(20));
    }

    #[test]
    fn reads_values_from_env_file() {
        let dir = tempdir().expect("temp dir");
        let env_path = dir.path().join(".env");
        fs::write(
            &env_path,
            concat!(
                "EVENT_API_URL=https://events.example.com/api\n",
                "EVENT_ASSET_HOST=https://cdn.example.com/\n",
                "EVENT_TIMEZONE=Asia/Makassar\n",
                "EVENT_PAGE_SIZE=12\n",
                "EVENT_SESSION_PATH=/tmp/portal-session.json\n",
            ),
        )
        .expect("write env");

        let pairs: HashMap<String, String> = dotenvy::from_path_iter(&env_path)
            .expect("open env")
            .collect::<Result<_, _>>()
            .expect("parse env");
        let cfg = Settings::from_lookup(|key| pairs.get(key).cloned()).expect("settings");

        assert_eq!(cfg.api_url, "https://events.example.com/api");
        assert_eq!(cfg.asset_host, "https://cdn.example.com");
        assert_eq!(cfg.timezone, chrono_tz::Asia::Makassar);
        assert_eq!(cfg.page_size, 12);
        assert_eq!(cfg.session_path, PathBuf::from("/tmp/portal-session.json"));
    }

    #[test]
    fn rejects_missing_or_bad_values() {
        assert!(Settings::from_lookup(lookup(&[])).is_err());
        assert!(Settings::from_lookup(lookup(&[("EVENT_API_URL", "not a url")])).is_err());
        assert!(Settings::from_lookup(lookup(&[
            ("EVENT_API_URL", "http://api.local"),
            ("EVENT_TIMEZONE", "Mars/Olympus"),
        ]))
        .is_err());
    }
}
