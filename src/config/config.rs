//! TOML configuration parsing and the bridge into the orchestrator.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::orchestration::{BusyPolicy, OrchestratorConfig, RetryPolicy};

/// Agent/turn settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum tool-call hops per turn.
    #[serde(default = "default_max_hops")]
    pub max_hops: u32,
    /// Whether a tool result loops back into the model.
    #[serde(default = "default_true")]
    pub loop_after_tool: bool,
    /// Whether the full transcript is replayed into the model context.
    #[serde(default = "default_true")]
    pub replay_full_history: bool,
    /// Reject (instead of queue) concurrent turns for one thread.
    #[serde(default)]
    pub reject_busy_threads: bool,
    /// Optional wall-clock budget per turn, in seconds.
    pub turn_timeout_seconds: Option<u64>,
}

fn default_max_hops() -> u32 {
    8
}

fn default_true() -> bool {
    true
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
            loop_after_tool: true,
            replay_full_history: true,
            reject_busy_threads: false,
            turn_timeout_seconds: None,
        }
    }
}

/// Retry settings for rate-limited model calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Sleep after the first failure, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Growth factor for subsequent sleeps.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Conversation store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend selector: "memory" or "file".
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Base directory for the file backend.
    pub path: Option<PathBuf>,
}

fn default_store_backend() -> String {
    "memory".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Turn log file; a temp-dir default is used when absent.
    pub log_file: Option<PathBuf>,
}

/// Marketplace tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Result count requested per search (both marketplaces).
    #[serde(default = "default_results")]
    pub results: u32,
    /// Register the Yahoo! Shopping tool.
    #[serde(default = "default_true")]
    pub yahoo_enabled: bool,
    /// Register the Rakuten Ichiba tools.
    #[serde(default)]
    pub rakuten_enabled: bool,
}

fn default_results() -> u32 {
    10
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            results: default_results(),
            yahoo_enabled: true,
            rakuten_enabled: false,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Agent/turn settings.
    #[serde(default)]
    pub agent: AgentConfig,
    /// Model retry settings.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Conversation store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Marketplace tool settings.
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
}

impl Configuration {
    /// Translate the file settings into the orchestrator's config types.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            max_hops: self.agent.max_hops,
            retry: RetryPolicy {
                max_attempts: self.retry.max_attempts,
                initial_delay: Duration::from_millis(self.retry.initial_delay_ms),
                backoff_multiplier: self.retry.backoff_multiplier,
            },
            loop_after_tool: self.agent.loop_after_tool,
            replay_full_history: self.agent.replay_full_history,
            busy_policy: if self.agent.reject_busy_threads {
                BusyPolicy::Reject
            } else {
                BusyPolicy::Queue
            },
            turn_timeout: self.agent.turn_timeout_seconds.map(Duration::from_secs),
        }
    }
}

/// Loads `Configuration` from a TOML file, falling back to defaults.
#[derive(Debug, Clone)]
pub struct ConfigurationLoader {
    /// The parsed configuration.
    pub config: Configuration,
}

impl ConfigurationLoader {
    /// Load from `path`, or defaults when no path is given.
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => Configuration::default(),
        };
        Ok(Self { config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.agent.max_hops, 8);
        assert!(config.agent.loop_after_tool);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.marketplace.results, 10);
    }

    #[test]
    fn test_parse_partial_toml() {
        let raw = r#"
            [agent]
            max_hops = 3
            loop_after_tool = false
            turn_timeout_seconds = 120

            [retry]
            max_attempts = 2
            initial_delay_ms = 250

            [store]
            backend = "file"
            path = "/var/lib/kaimono/threads"
        "#;
        let config: Configuration = toml::from_str(raw).unwrap();
        assert_eq!(config.agent.max_hops, 3);
        assert!(!config.agent.loop_after_tool);
        // Unspecified sections and fields keep their defaults.
        assert!(config.agent.replay_full_history);
        assert_eq!(config.retry.backoff_multiplier, 2.0);
        assert_eq!(config.store.backend, "file");
        assert!(config.marketplace.yahoo_enabled);
    }

    #[test]
    fn test_orchestrator_config_bridge() {
        let mut config = Configuration::default();
        config.agent.reject_busy_threads = true;
        config.agent.turn_timeout_seconds = Some(60);
        config.retry.initial_delay_ms = 500;

        let orch = config.orchestrator_config();
        assert_eq!(orch.busy_policy, BusyPolicy::Reject);
        assert_eq!(orch.turn_timeout, Some(Duration::from_secs(60)));
        assert_eq!(orch.retry.initial_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_loader_defaults_without_path() {
        let loader = ConfigurationLoader::new(None).unwrap();
        assert_eq!(loader.config.agent.max_hops, 8);
    }
}
