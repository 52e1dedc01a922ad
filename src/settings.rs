use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::connection::Credentials;

pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StripeSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub stripe_version: String,
    #[serde(default = "default_stripe_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for StripeSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            account_id: String::new(),
            stripe_version: String::new(),
            timeout_ms: default_stripe_timeout_ms(),
            api_base: default_api_base(),
        }
    }
}

impl StripeSettings {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.account_id.clone(), self.api_key.clone())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub stripe: StripeSettings,
    pub server_port: u16,
    #[serde(default = "default_shutdown_grace", with = "humantime_serde")]
    pub shutdown_grace: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stripe: StripeSettings::default(),
            server_port: 8080,
            shutdown_grace: default_shutdown_grace(),
        }
    }
}

impl Config {
    /// Load from config.toml (if present) and environment variables.
    /// Environment variables override file values.
    /// Supported env keys: STRIPE_API_KEY (or SK_TEST), STRIPE_ACCOUNT_ID (or PK_TEST),
    /// STRIPE_VERSION, STRIPE_TIMEOUT_MS, STRIPE_API_BASE, SERVER_PORT, SHUTDOWN_GRACE
    pub fn load() -> Self {
        Self::load_with(|key| std::env::var(key).ok())
    }

    pub fn from_env() -> Self {
        Self::load()
    }

    /// Same as [`Config::load`] with an injectable variable lookup.
    pub fn load_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // 1) Start with defaults + config.toml only if it exists
        let base: Config = Default::default();
        let mut fig = Figment::from(Serialized::defaults(base));
        if std::path::Path::new("config.toml").exists() {
            fig = fig.merge(Toml::file("config.toml"));
        }
        let mut cfg: Config = fig.extract().unwrap_or_default();

        // 2) Overlay environment variables explicitly; STRIPE_* wins over the short aliases
        if let Some(v) = lookup("SK_TEST") {
            cfg.stripe.api_key = v;
        }
        if let Some(v) = lookup("STRIPE_API_KEY") {
            cfg.stripe.api_key = v;
        }
        if let Some(v) = lookup("PK_TEST") {
            cfg.stripe.account_id = v;
        }
        if let Some(v) = lookup("STRIPE_ACCOUNT_ID") {
            cfg.stripe.account_id = v;
        }
        if let Some(v) = lookup("STRIPE_VERSION") {
            cfg.stripe.stripe_version = v;
        }
        if let Some(v) = lookup("STRIPE_TIMEOUT_MS") {
            cfg.stripe.timeout_ms = v.parse().unwrap_or(cfg.stripe.timeout_ms);
        }
        if let Some(v) = lookup("STRIPE_API_BASE") {
            if !v.is_empty() {
                cfg.stripe.api_base = v;
            }
        }
        if let Some(v) = lookup("SERVER_PORT") {
            cfg.server_port = v.parse().unwrap_or(cfg.server_port);
        }
        if let Some(v) = lookup("SHUTDOWN_GRACE") {
            cfg.shutdown_grace = parse_duration_env(&v, cfg.shutdown_grace);
        }

        cfg
    }
}

fn parse_duration_env(value: &str, current: Duration) -> Duration {
    humantime::parse_duration(value).unwrap_or(current)
}

fn default_stripe_timeout_ms() -> u64 {
    15_000
}

fn default_api_base() -> String {
    DEFAULT_STRIPE_API_BASE.to_string()
}

fn default_shutdown_grace() -> Duration {
    Duration::from_secs(10)
}
