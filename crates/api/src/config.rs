//! Process configuration loaded from environment variables.
//!
//! Every setting has a default; empty or unparsable values fall back to it.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use recipe_ai::OllamaConfig;
use recipe_events::EventBusConfig;
use recipe_observability::{LogConfig, LogFormat};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    /// Upper bound for a single HTTP request, including synchronous LLM calls.
    pub request_timeout: Duration,
    pub log_level: String,
    pub ollama: OllamaConfig,
    /// Time allowed for the event bus to drain after the server stops.
    pub shutdown_timeout: Duration,
    pub event_bus: EventBusConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            port: DEFAULT_PORT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            ollama: OllamaConfig::default(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            event_bus: EventBusConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let seconds = |key: &str, default: Duration| {
            get(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(default)
        };
        let count = |key: &str, default: usize| {
            get(key)
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(default)
        };

        let ollama = OllamaConfig {
            base_url: get("OLLAMA_BASE_URL").unwrap_or(defaults.ollama.base_url),
            model: get("OLLAMA_MODEL").unwrap_or(defaults.ollama.model),
            timeout: seconds("LLM_TIMEOUT", defaults.ollama.timeout),
        };

        let event_bus = EventBusConfig::default()
            .with_worker_count(count("EVENT_BUS_WORKERS", defaults.event_bus.worker_count))
            .with_queue_capacity(count("EVENT_BUS_QUEUE_CAPACITY", defaults.event_bus.queue_capacity))
            .with_handler_timeout(seconds(
                "EVENT_BUS_HANDLER_TIMEOUT",
                defaults.event_bus.handler_timeout,
            ));

        Self {
            environment: get("ENV").map(|v| Environment::parse(&v)).unwrap_or_default(),
            port: get("PORT")
                .and_then(|v| v.parse().ok())
                .filter(|p| *p > 0)
                .unwrap_or(defaults.port),
            request_timeout: seconds("REQUEST_TIMEOUT", defaults.request_timeout),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            ollama,
            shutdown_timeout: seconds("SHUTDOWN_TIMEOUT", defaults.shutdown_timeout),
            event_bus,
        }
    }

    pub fn log_config(&self) -> LogConfig {
        let format = match self.environment {
            Environment::Production => LogFormat::Json,
            Environment::Development => LogFormat::Pretty,
        };
        LogConfig::new(format, self.log_level.clone())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
