use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub store: StoreConfig,
    pub rules: RulesConfig,
    pub source: SourceConfig,
    pub notify: NotifyConfig,
    pub poll: PollConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `COURTWATCH_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("COURTWATCH_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            store: StoreConfig::from_env_profiled(p),
            rules: RulesConfig::from_env_profiled(p),
            source: SourceConfig::from_env_profiled(p),
            notify: NotifyConfig::from_env_profiled(p),
            poll: PollConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  store:   redis={}, prefix={}, retention_days={}",
            self.store.redis_url.as_deref().map(redact_url).unwrap_or_else(|| "(in-memory)".to_string()),
            self.store.key_prefix,
            self.store.retention_days
        );
        tracing::info!("  rules:   file={}", self.rules.rules_file.display());
        tracing::info!("  source:  {}", redact_url(&self.source.location));
        tracing::info!(
            "  notify:  ntfy={}, log={}",
            self.notify.ntfy_url.as_deref().unwrap_or("(disabled)"),
            self.notify.log_path.display()
        );
        tracing::info!("  poll:    interval={}s", self.poll.interval_secs);
    }
}

/// Hide the userinfo part of a URL (`redis://:secret@host` → `redis://***@host`).
pub fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}***{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}

// ── Notification store ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Redis connection URL. `None` selects the in-memory store.
    pub redis_url: Option<String>,
    pub key_prefix: String,
    /// Record TTL on creation and default purge threshold.
    pub retention_days: u32,
    pub timeout_secs: u64,
}

impl StoreConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            redis_url: profiled_env_opt(p, "REDIS_URL"),
            key_prefix: profiled_env_or(p, "REDIS_KEY_PREFIX", "notified_slot"),
            retention_days: profiled_env_u32(p, "RETENTION_DAYS", 7),
            timeout_secs: profiled_env_u64(p, "STORE_TIMEOUT_SECS", 5),
        }
    }
}

// ── Preference rules ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    pub rules_file: PathBuf,
}

impl RulesConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            rules_file: PathBuf::from(profiled_env_or(p, "RULES_FILE", "config/courts.yml")),
        }
    }
}

// ── Slot source ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// `file:<path>` or an `http(s)://` remote browser endpoint.
    pub location: String,
    pub timeout_secs: u64,
}

impl SourceConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            location: profiled_env_or(p, "SLOTS_SOURCE", "file:data/slots.json"),
            timeout_secs: profiled_env_u64(p, "SOURCE_TIMEOUT_SECS", 60),
        }
    }
}

// ── Notification delivery ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// ntfy topic URL. Set `NTFY_URL=off` to disable.
    pub ntfy_url: Option<String>,
    pub log_path: PathBuf,
    /// Optional minijinja template overriding the default message.
    pub template: Option<String>,
}

impl NotifyConfig {
    fn from_env_profiled(p: &str) -> Self {
        let ntfy_url = profiled_env_or(p, "NTFY_URL", "https://ntfy.sh/court-slots");
        Self {
            ntfy_url: (!ntfy_url.eq_ignore_ascii_case("off")).then_some(ntfy_url),
            log_path: PathBuf::from(profiled_env_or(p, "NOTIFICATION_LOG", "logs/notifications.log")),
            template: profiled_env_opt(p, "NOTIFICATION_TEMPLATE"),
        }
    }
}

// ── Polling ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    pub interval_secs: u64,
}

impl PollConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            interval_secs: profiled_env_u64(p, "POLL_INTERVAL_SECS", 30),
        }
    }
}
