//! Vault configuration
//!
//! Loaded from `<vault>/.vaultmatch.yaml` when present. Every field has a
//! default, so an empty or missing file yields [`Config::default`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Config file name, looked up at the vault root
pub const CONFIG_FILE: &str = ".vaultmatch.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub matching: MatchingConfig,
    pub vault: VaultConfig,
}

/// Scoring and ranking knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    /// Candidates scoring below this are dropped
    pub min_score: f32,
    /// Maximum number of candidates returned per query
    pub max_results: usize,
    /// Weight of the normalized edit-distance component
    pub edit_weight: f32,
    /// Weight of the token-overlap component
    pub token_weight: f32,
    /// Length bound (in chars) of the content excerpt kept per note
    pub excerpt_chars: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_score: 0.3,
            max_results: 10,
            edit_weight: 0.6,
            token_weight: 0.4,
            excerpt_chars: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VaultConfig {
    /// Glob patterns, relative to the vault root, skipped during scans
    pub exclude: Vec<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            exclude: vec![
                ".obsidian/**".to_string(),
                ".trash/**".to_string(),
                ".git/**".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load config from an explicit file, or from the vault root.
    ///
    /// An explicit path must exist; the vault-root file is optional.
    pub fn load(vault_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => (vault_root.join(CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        let config = Self::from_yaml(&raw)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate config from YAML text
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: Config = if raw.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(raw)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.matching;

        if !m.min_score.is_finite() || !(0.0..=1.0).contains(&m.min_score) {
            return Err(Error::Config(format!(
                "matching.min_score must be within [0, 1], got {}",
                m.min_score
            )));
        }
        if !m.edit_weight.is_finite() || !m.token_weight.is_finite() {
            return Err(Error::Config(
                "matching weights must be finite numbers".to_string(),
            ));
        }
        if m.edit_weight < 0.0 || m.token_weight < 0.0 {
            return Err(Error::Config(
                "matching weights must be non-negative".to_string(),
            ));
        }
        if m.edit_weight + m.token_weight <= 0.0 {
            return Err(Error::Config(
                "matching weights must not both be zero".to_string(),
            ));
        }
        if m.max_results == 0 {
            return Err(Error::Config(
                "matching.max_results must be at least 1".to_string(),
            ));
        }
        if m.excerpt_chars == 0 {
            return Err(Error::Config(
                "matching.excerpt_chars must be at least 1".to_string(),
            ));
        }

        for pattern in &self.vault.exclude {
            glob::Pattern::new(pattern)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.matching.min_score, 0.3);
        assert_eq!(config.matching.max_results, 10);
        assert_eq!(config.matching.edit_weight, 0.6);
        assert_eq!(config.matching.token_weight, 0.4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("matching:\n  max_results: 3\n").unwrap();
        assert_eq!(config.matching.max_results, 3);
        assert_eq!(config.matching.min_score, 0.3);
        assert_eq!(config.vault, VaultConfig::default());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let err = Config::from_yaml("matching:\n  min_score: 1.5\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_zero_weights() {
        let yaml = "matching:\n  edit_weight: 0.0\n  token_weight: 0.0\n";
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_non_finite_weights() {
        for yaml in [
            "matching:\n  edit_weight: .nan\n",
            "matching:\n  edit_weight: .inf\n",
            "matching:\n  token_weight: -.inf\n",
            "matching:\n  min_score: .nan\n",
        ] {
            assert!(
                matches!(Config::from_yaml(yaml), Err(Error::Config(_))),
                "accepted {:?}",
                yaml
            );
        }
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            Config::from_yaml("matching:\n  fuzziness: 2\n"),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn test_rejects_bad_glob() {
        let yaml = "vault:\n  exclude: [\"[\"]\n";
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Pattern(_))));
    }

    #[test]
    fn test_load_missing_vault_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            Config::load(dir.path(), Some(&missing)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_from_vault_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "matching:\n  min_score: 0.5\n").unwrap();
        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config.matching.min_score, 0.5);
    }
}
