//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. The store and interpreter are built once at
//! startup and shared behind `Arc`.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use nebula_agentic::Interpreter;
use nebula_store::{BountyStore, InMemoryStore};

// -- Configuration ------------------------------------------------------------

/// Log output format for the server binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Application configuration, read from the environment at startup.
///
/// Custom `Debug` redacts the auth token.
#[derive(Clone)]
pub struct AppConfig {
    /// Listen port (`PORT`, default 8080).
    pub port: u16,
    /// Shared secret for bearer tokens (`AUTH_TOKEN`). When set, tokens must
    /// be `<actor_id>:<secret>`.
    pub auth_token: Option<String>,
    /// Load the demo fixtures at startup (`NEBULA_SEED_DEMO`, default true).
    pub seed_demo: bool,
    /// `NEBULA_LOG_FORMAT=json` selects JSON logs.
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("seed_demo", &self.seed_demo)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            seed_demo: true,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Unparseable values fall back to
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let auth_token = lookup("AUTH_TOKEN").filter(|t| !t.is_empty());
        let seed_demo = lookup("NEBULA_SEED_DEMO")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(defaults.seed_demo);
        let log_format = match lookup("NEBULA_LOG_FORMAT").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        Self {
            port,
            auth_token,
            seed_demo,
            log_format,
        }
    }
}

// -- Application State --------------------------------------------------------

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BountyStore>,
    pub interpreter: Arc<Interpreter>,
    pub config: AppConfig,
    /// Present when a Prometheus recorder was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state over an existing store.
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn BountyStore>,
    ) -> Result<Self, regex::Error> {
        let interpreter = Arc::new(Interpreter::new(store.clone())?);
        Ok(Self {
            store,
            interpreter,
            config,
            metrics: None,
        })
    }

    /// Build state over a fresh in-memory store, seeded with the demo
    /// fixtures when `config.seed_demo` is set.
    pub fn in_memory(config: AppConfig) -> anyhow::Result<Self> {
        let store = if config.seed_demo {
            InMemoryStore::with_demo_data()?
        } else {
            InMemoryStore::new()
        };
        Ok(Self::with_store(config, Arc::new(store))?)
    }

    /// Attach the Prometheus handle served at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
