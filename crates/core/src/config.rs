use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    match env_or(key, "").as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub validation: ValidationConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            store: StoreConfig::from_env(),
            validation: ValidationConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  store:       event_buffer={}", self.store.event_buffer);
        tracing::info!(
            "  validation:  strict_weekdays={}",
            self.validation.strict_weekdays
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

// ── Store ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Capacity of the change-event broadcast channel.
    pub event_buffer: usize,
}

impl StoreConfig {
    fn from_env() -> Self {
        Self {
            event_buffer: env_usize("DISPATCH_EVENT_BUFFER", 64).max(1),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { event_buffer: 64 }
    }
}

// ── Validation ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject recurrence rules whose weekday filter contains the
    /// UNSPECIFIED sentinel instead of letting them enumerate as empty.
    pub strict_weekdays: bool,
}

impl ValidationConfig {
    fn from_env() -> Self {
        Self {
            strict_weekdays: env_bool("DISPATCH_STRICT_WEEKDAYS", false),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict_weekdays: false,
        }
    }
}
