//! Configuration: TOML settings and environment credential loading.

pub mod config;
pub mod environment;

pub use config::{
    AgentConfig, Configuration, ConfigurationLoader, LoggingConfig, MarketplaceConfig,
    RetryConfig, StoreConfig,
};
pub use environment::EnvironmentLoader;
