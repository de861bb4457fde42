use std::{env, path::PathBuf, time::Duration};

use log::warn;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PROBE_ADDR: &str = "generativelanguage.googleapis.com:443";

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Provider credential. Without it every online advisory call falls back.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    /// Per-request timeout for the advisory provider
    pub request_timeout: Duration,
    /// `host:port` the reachability probe connects to
    pub probe_addr: String,
    pub probe_interval: Duration,
    /// Directory holding `settings.json`
    pub data_dir: PathBuf,
    /// Seed the store with the demo readings
    pub seed_demo: bool,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(20),
            probe_addr: DEFAULT_PROBE_ADDR.to_string(),
            probe_interval: Duration::from_secs(5),
            data_dir: PathBuf::from(".glucatrack"),
            seed_demo: false,
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = ["GLUCATRACK_API_KEY", "GEMINI_API_KEY", "API_KEY"]
            .iter()
            .find_map(|key| env::var(key).ok())
            .filter(|value| !value.trim().is_empty());

        Self {
            api_key,
            model: env::var("GLUCATRACK_MODEL").unwrap_or(defaults.model),
            endpoint: env::var("GLUCATRACK_ENDPOINT")
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or(defaults.endpoint),
            request_timeout: secs_var("GLUCATRACK_TIMEOUT_SECS").unwrap_or(defaults.request_timeout),
            probe_addr: env::var("GLUCATRACK_PROBE_ADDR").unwrap_or(defaults.probe_addr),
            probe_interval: secs_var("GLUCATRACK_PROBE_INTERVAL_SECS")
                .unwrap_or(defaults.probe_interval),
            data_dir: env::var("GLUCATRACK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            seed_demo: flag_var("GLUCATRACK_DEMO"),
            debug: flag_var("GLUCATRACK_DEBUG"),
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }
}

fn flag_var(name: &str) -> bool {
    env::var(name)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn secs_var(name: &str) -> Option<Duration> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => {
            warn!("Ignoring invalid {name}={raw}; expected a positive number of seconds");
            None
        }
        Ok(secs) => Some(Duration::from_secs(secs)),
    }
}
