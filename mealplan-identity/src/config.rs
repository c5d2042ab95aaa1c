//! Configuration for the identity store

use std::path::{Path, PathBuf};

/// Default key the current user record is persisted under
pub const DEFAULT_STORAGE_KEY: &str = "user";

/// Environment variable overriding [`DEFAULT_STORAGE_KEY`]
pub const STORAGE_KEY_ENV: &str = "MEALPLAN_STORAGE_KEY";

/// Identity store configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Directory holding the persisted key-value entries
    pub base_path: PathBuf,

    /// Key of the single persisted user record
    pub storage_key: String,

    /// Bounded mailbox size of the identity actor
    pub channel_capacity: usize,
}

impl IdentityConfig {
    /// Create config with sensible defaults
    ///
    /// # Arguments
    /// * `base_path` - Directory for persisted state.
    ///   Layout:
    ///   ```text
    ///   base_path/
    ///   └── user.json        (current user record, if signed in)
    ///   ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            storage_key: resolve_storage_key(std::env::var(STORAGE_KEY_ENV).ok()),
            channel_capacity: 256,
        }
    }

    /// Override the storage key
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Override the actor mailbox size
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Path of the persisted user record
    pub fn record_path(&self) -> PathBuf {
        self.base_path.join(format!("{}.json", self.storage_key))
    }
}

fn resolve_storage_key(from_env: Option<String>) -> String {
    from_env
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = IdentityConfig::new("/tmp/test_identity").with_storage_key("user");
        assert_eq!(cfg.channel_capacity, 256);
        assert_eq!(cfg.record_path(), PathBuf::from("/tmp/test_identity/user.json"));
    }

    #[test]
    fn test_storage_key_resolution() {
        assert_eq!(resolve_storage_key(None), DEFAULT_STORAGE_KEY);
        assert_eq!(resolve_storage_key(Some("   ".into())), DEFAULT_STORAGE_KEY);
        assert_eq!(resolve_storage_key(Some(" session ".into())), "session");

        let cfg = IdentityConfig::new("/tmp/test_identity");
        let expected = resolve_storage_key(std::env::var(STORAGE_KEY_ENV).ok());
        assert_eq!(cfg.storage_key, expected);
        assert_eq!(
            cfg.record_path(),
            PathBuf::from(format!("/tmp/test_identity/{expected}.json"))
        );
    }

    #[test]
    fn test_builder_pattern() {
        let cfg = IdentityConfig::new("/data")
            .with_storage_key("session")
            .with_channel_capacity(0);

        assert_eq!(cfg.storage_key, "session");
        assert_eq!(cfg.channel_capacity, 1);
        assert_eq!(cfg.record_path(), PathBuf::from("/data/session.json"));
    }
}
