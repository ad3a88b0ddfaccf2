use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;
use tracing::{Level, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub session_file: PathBuf,
    /// Initial credential given to newly registered employees
    pub default_password: String,
    pub log_dir: PathBuf,
    pub log_level: Level,
    /// (key, value) settings that failed to parse and fell back to defaults
    pub rejected: Vec<(String, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080/api".to_string(),
            session_file: PathBuf::from(".hrm/session.json"),
            default_password: "123456".to_string(),
            log_dir: PathBuf::from("logs"),
            log_level: Level::INFO,
            rejected: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Config::default();
        let mut rejected = Vec::new();
        let log_level = parsed("HRM_LOG_LEVEL", defaults.log_level, &mut rejected);

        Self {
            api_base: env::var("HRM_API_BASE").unwrap_or(defaults.api_base),
            session_file: env::var("HRM_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            default_password: env::var("HRM_DEFAULT_PASSWORD")
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or(defaults.default_password),
            log_dir: env::var("HRM_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level,
            rejected,
        }
    }

    /// Settings are read before the subscriber exists, so warnings wait for this
    pub fn report_rejected(&self) {
        for (key, value) in &self.rejected {
            warn!(key = %key, value = %value, "ignoring invalid setting");
        }
    }
}

/// Unparseable values fall back to the default instead of aborting start-up
fn parsed<T: FromStr>(key: &str, default: T, rejected: &mut Vec<(String, String)>) -> T {
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                rejected.push((key.to_string(), raw));
                default
            }
        },
        Err(_) => default,
    }
}
