//! Environment variable loading for marketplace credentials.
//!
//! Credentials never reach the orchestration core; they are read here and
//! handed to the marketplace tool constructors.

use std::env;
use std::path::Path;

/// Loads environment variables from a .env file and the system environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    #[allow(dead_code)]
    env_file: Option<String>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// Only loads a .env file when an explicit path is provided; this keeps
    /// unit tests from picking up repository or system .env files.
    pub fn new(env_file: Option<&Path>) -> Self {
        if let Some(path) = env_file {
            if path.exists() {
                if let Err(e) = dotenv::from_path(path) {
                    eprintln!("Warning: Failed to load .env file: {}", e);
                }
            }
        }

        Self {
            env_file: env_file.map(|p| p.to_string_lossy().to_string()),
        }
    }

    /// Yahoo! Shopping application id.
    pub fn yahoo_app_id(&self) -> Option<String> {
        env::var("YAHOO_APP_ID").ok()
    }

    /// Optional Yahoo! affiliate id.
    pub fn yahoo_affiliate_id(&self) -> Option<String> {
        env::var("YAHOO_AFFILIATE_ID").ok()
    }

    /// Rakuten application id.
    pub fn rakuten_app_id(&self) -> Option<String> {
        env::var("RAKUTEN_APP_ID").ok()
    }

    /// Optional Rakuten affiliate id.
    pub fn rakuten_affiliate_id(&self) -> Option<String> {
        env::var("RAKUTEN_AFFILIATE_ID").ok()
    }
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
