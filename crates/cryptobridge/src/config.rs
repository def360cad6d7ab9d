//! Registry configuration

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::registry::AlgorithmFamily;

/// Environment variable listing algorithms to disable, comma separated
pub const DISABLED_ALGORITHMS_ENV: &str = "CRYPTOBRIDGE_DISABLED_ALGORITHMS";

/// Which algorithms an [`AlgorithmRegistry`](crate::registry::AlgorithmRegistry)
/// exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Families exposed by the registry
    pub enabled_families: BTreeSet<AlgorithmFamily>,

    /// Algorithm names left out even when their family is enabled
    pub disabled_algorithms: BTreeSet<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled_families: AlgorithmFamily::ALL.into_iter().collect(),
            disabled_algorithms: BTreeSet::new(),
        }
    }
}

impl RegistryConfig {
    /// Configuration with no family enabled
    pub fn empty() -> Self {
        Self {
            enabled_families: BTreeSet::new(),
            disabled_algorithms: BTreeSet::new(),
        }
    }

    /// Enable `family`
    #[must_use]
    pub fn with_family(mut self, family: AlgorithmFamily) -> Self {
        self.enabled_families.insert(family);
        self
    }

    /// Disable `family`
    #[must_use]
    pub fn without_family(mut self, family: AlgorithmFamily) -> Self {
        self.enabled_families.remove(&family);
        self
    }

    /// Leave out the algorithm called `name`
    #[must_use]
    pub fn without_algorithm(mut self, name: impl Into<String>) -> Self {
        self.disabled_algorithms.insert(name.into());
        self
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TransformError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default configuration with algorithms from
    /// [`DISABLED_ALGORITHMS_ENV`] disabled
    pub fn from_env() -> Self {
        let disabled = std::env::var(DISABLED_ALGORITHMS_ENV).unwrap_or_default();
        parse_name_list(&disabled)
            .into_iter()
            .fold(Self::default(), Self::without_algorithm)
    }

    /// Whether `name` of `family` should be registered
    pub fn is_enabled(&self, family: AlgorithmFamily, name: &str) -> bool {
        self.enabled_families.contains(&family) && !self.disabled_algorithms.contains(name)
    }
}

fn parse_name_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_enables_everything() {
        let config = RegistryConfig::default();
        for family in AlgorithmFamily::ALL {
            assert!(config.is_enabled(family, "anything"));
        }
    }

    #[test]
    fn test_builders() {
        let config = RegistryConfig::empty()
            .with_family(AlgorithmFamily::Hash)
            .with_family(AlgorithmFamily::Mac)
            .without_family(AlgorithmFamily::Mac)
            .without_algorithm("md5");

        assert!(config.is_enabled(AlgorithmFamily::Hash, "sha256"));
        assert!(!config.is_enabled(AlgorithmFamily::Hash, "md5"));
        assert!(!config.is_enabled(AlgorithmFamily::Mac, "hmac-sha256"));
    }

    #[test]
    fn test_from_json() {
        let config = RegistryConfig::from_json(
            r#"{"enabled_families": ["hash", "stream_cipher"], "disabled_algorithms": ["xsalsa20"]}"#,
        )
        .expect("config should parse");
        assert!(config.is_enabled(AlgorithmFamily::StreamCipher, "salsa20"));
        assert!(!config.is_enabled(AlgorithmFamily::StreamCipher, "xsalsa20"));
        assert!(!config.is_enabled(AlgorithmFamily::BlockCipher, "aes"));

        let partial = RegistryConfig::from_json(r#"{"disabled_algorithms": ["md5"]}"#).unwrap();
        assert_eq!(partial.enabled_families, RegistryConfig::default().enabled_families);

        assert!(matches!(
            RegistryConfig::from_json("{"),
            Err(TransformError::Config(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = RegistryConfig::default().without_algorithm("md5");
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RegistryConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_parse_name_list() {
        assert_eq!(
            parse_name_list(" MD5, ,sha224 "),
            vec!["md5".to_string(), "sha224".to_string()]
        );
        assert!(parse_name_list("").is_empty());
    }
}
