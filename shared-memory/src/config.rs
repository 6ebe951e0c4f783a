//! Store configuration, loaded from the environment.

use std::env;

/// Backend selection config. A present `redis_url` means "probe Redis once
/// at construction"; absent means the in-process map.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// REDIS_URL
    pub redis_url: Option<String>,
    /// MEMORY_KEY_PREFIX
    pub key_prefix: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: "memory:".to_string(),
        }
    }
}

impl MemoryConfig {
    /// Load from environment variables.
    pub fn from_env() -> Self {
        let redis_url = env::var("REDIS_URL").ok();
        let key_prefix =
            env::var("MEMORY_KEY_PREFIX").unwrap_or_else(|_| "memory:".to_string());
        Self {
            redis_url,
            key_prefix,
        }
    }
}
