//! Store configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default limit on key and value length, the largest length an 8-bit
/// count can describe.
pub const DEFAULT_MAX_LEN: usize = u8::MAX as usize;

/// Largest accepted `initial_capacity`. Larger values are rejected by
/// [`StoreConfig::validate`] and clamped by
/// [`RankTrie::with_capacity`](crate::RankTrie::with_capacity).
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// Configuration for a [`KvStore`](crate::KvStore).
///
/// Every field has a default, so a TOML document only needs to name the
/// settings it changes:
///
/// ```
/// use ostrie::StoreConfig;
///
/// let config = StoreConfig::from_toml_str("max_key_len = 64").unwrap();
/// assert_eq!(config.max_key_len, 64);
/// assert_eq!(config.max_value_len, 255);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Longest key accepted, in bytes.
    pub max_key_len: usize,

    /// Longest value accepted, in bytes.
    pub max_value_len: usize,

    /// Number of trie nodes to allocate room for up front.
    pub initial_capacity: usize,

    /// Free trie branches that no longer lead to any key when a key is
    /// deleted. Off by default: deleted keys leave their nodes in place, and
    /// re-inserting the same key reuses them.
    pub prune_empty_nodes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_key_len: DEFAULT_MAX_LEN,
            max_value_len: DEFAULT_MAX_LEN,
            initial_capacity: 0,
            prune_empty_nodes: false,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from TOML and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the document does not parse or
    /// describes an invalid configuration.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Sets the longest key accepted.
    #[must_use]
    pub fn with_max_key_len(mut self, max_key_len: usize) -> Self {
        self.max_key_len = max_key_len;
        self
    }

    /// Sets the longest value accepted.
    #[must_use]
    pub fn with_max_value_len(mut self, max_value_len: usize) -> Self {
        self.max_value_len = max_value_len;
        self
    }

    /// Sets the number of trie nodes allocated up front.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Enables or disables freeing of empty branches on delete.
    #[must_use]
    pub fn with_prune_empty_nodes(mut self, prune_empty_nodes: bool) -> Self {
        self.prune_empty_nodes = prune_empty_nodes;
        self
    }

    /// Checks that the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if either length limit is zero or
    /// `initial_capacity` exceeds [`MAX_INITIAL_CAPACITY`].
    pub fn validate(&self) -> Result<()> {
        if self.max_key_len == 0 {
            return Err(Error::InvalidConfig("max_key_len must be greater than zero".to_string()));
        }
        if self.max_value_len == 0 {
            return Err(Error::InvalidConfig("max_value_len must be greater than zero".to_string()));
        }
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(Error::InvalidConfig(format!(
                "initial_capacity {} exceeds the maximum of {MAX_INITIAL_CAPACITY}",
                self.initial_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_eight_bit_lengths() {
        let config = StoreConfig::new();
        assert_eq!(config.max_key_len, 255);
        assert_eq!(config.max_value_len, 255);
        assert!(!config.prune_empty_nodes);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builder_sets_fields() {
        let config = StoreConfig::new()
            .with_max_key_len(16)
            .with_max_value_len(1024)
            .with_initial_capacity(100)
            .with_prune_empty_nodes(true);
        assert_eq!(
            config,
            StoreConfig {
                max_key_len: 16,
                max_value_len: 1024,
                initial_capacity: 100,
                prune_empty_nodes: true,
            }
        );
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(matches!(StoreConfig::new().with_max_key_len(0).validate(), Err(Error::InvalidConfig(_))));
        assert!(matches!(StoreConfig::new().with_max_value_len(0).validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn oversized_initial_capacity_is_rejected() {
        let at_limit = StoreConfig::new().with_initial_capacity(MAX_INITIAL_CAPACITY);
        assert_eq!(at_limit.validate(), Ok(()));

        let over = StoreConfig::new().with_initial_capacity(MAX_INITIAL_CAPACITY + 1);
        assert!(matches!(over.validate(), Err(Error::InvalidConfig(_))));
        assert!(matches!(
            StoreConfig::from_toml_str("initial_capacity = 1000000000000"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn toml_round_trip() {
        let config = StoreConfig::new().with_max_value_len(4096).with_prune_empty_nodes(true);
        let text = config.to_toml_string().unwrap();
        assert_eq!(StoreConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn toml_errors_are_reported() {
        assert!(matches!(StoreConfig::from_toml_str("max_key_len = \"long\""), Err(Error::InvalidConfig(_))));
        assert!(matches!(StoreConfig::from_toml_str("unknown_setting = 1"), Err(Error::InvalidConfig(_))));
        assert!(matches!(StoreConfig::from_toml_str("max_key_len = 0"), Err(Error::InvalidConfig(_))));
        assert_eq!(StoreConfig::from_toml_str("").unwrap(), StoreConfig::default());
    }
}
