use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::corpus::extract::DEFAULT_EXTENSION;
use crate::corpus::loader::LoadOptions;
use crate::corpus::sentences::DEFAULT_MIN_LENGTH;
use crate::embedding::download::{default_cache_dir, ModelStore, DEFAULT_BASE_URL};
use crate::embedding::registry::DEFAULT_MODEL;

/// Distance below which two sentences count as near-duplicates.
pub const DEFAULT_THRESHOLD: f64 = 0.2;

/// Central configuration loaded from environment variables.
///
/// Every value has a default; command-line flags override what is loaded
/// here. The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the per-user cache (models live in <cache_dir>/models)
    pub cache_dir: PathBuf,
    /// Registry name of the embedding model
    pub model_name: String,
    /// Release URL models are downloaded from
    pub model_base_url: String,
    pub distance_threshold: f64,
    pub min_sentence_length: usize,
    /// Extension of the documents to compare, e.g. ".docx"
    pub file_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            model_name: DEFAULT_MODEL.to_string(),
            model_base_url: DEFAULT_BASE_URL.to_string(),
            distance_threshold: DEFAULT_THRESHOLD,
            min_sentence_length: DEFAULT_MIN_LENGTH,
            file_extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys keep their defaults;
    /// set but unparseable numbers are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let distance_threshold = match lookup("DOCINTEGRITY_THRESHOLD") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DOCINTEGRITY_THRESHOLD is not a number: {raw}"))?,
            None => defaults.distance_threshold,
        };

        let min_sentence_length = match lookup("DOCINTEGRITY_MIN_LENGTH") {
            Some(raw) => raw.trim().parse().with_context(|| {
                format!("DOCINTEGRITY_MIN_LENGTH is not a whole number: {raw}")
            })?,
            None => defaults.min_sentence_length,
        };

        Ok(Self {
            cache_dir: lookup("DOCINTEGRITY_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            model_name: lookup("DOCINTEGRITY_MODEL").unwrap_or(defaults.model_name),
            model_base_url: lookup("DOCINTEGRITY_MODEL_URL").unwrap_or(defaults.model_base_url),
            distance_threshold,
            min_sentence_length,
            file_extension: lookup("DOCINTEGRITY_EXTENSION").unwrap_or(defaults.file_extension),
        })
    }

    /// The model cache described by this config.
    pub fn model_store(&self) -> ModelStore {
        ModelStore::new(&self.cache_dir, self.model_base_url.clone())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            extension: self.file_extension.clone(),
            min_length: self.min_sentence_length,
        }
    }

    /// Check that the threshold is usable before any work starts.
    pub fn require_valid_threshold(&self) -> Result<()> {
        if !self.distance_threshold.is_finite() || self.distance_threshold < 0.0 {
            anyhow::bail!(
                "Distance threshold must be a non-negative number, got {}.\n\
                 Lower values are stricter; the default is {DEFAULT_THRESHOLD}.",
                self.distance_threshold
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.model_name, "glove-wiki-gigaword-100");
        assert_eq!(config.distance_threshold, 0.2);
        assert_eq!(config.min_sentence_length, 20);
        assert_eq!(config.file_extension, ".docx");
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DOCINTEGRITY_THRESHOLD", "0.35"),
            ("DOCINTEGRITY_MIN_LENGTH", "40"),
            ("DOCINTEGRITY_MODEL", "glove-twitter-25"),
            ("DOCINTEGRITY_CACHE_DIR", "/tmp/di-cache"),
            ("DOCINTEGRITY_EXTENSION", ".txt"),
        ]))
        .unwrap();
        assert_eq!(config.distance_threshold, 0.35);
        assert_eq!(config.min_sentence_length, 40);
        assert_eq!(config.model_name, "glove-twitter-25");
        assert_eq!(config.file_extension, ".txt");
        assert_eq!(
            config.model_store().root(),
            PathBuf::from("/tmp/di-cache/models")
        );
    }

    #[test]
    fn test_bad_numbers_are_errors() {
        assert!(Config::from_lookup(lookup_from(&[("DOCINTEGRITY_THRESHOLD", "low")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("DOCINTEGRITY_MIN_LENGTH", "-3")])).is_err());
    }

    #[test]
    fn test_threshold_validation() {
        let mut config = Config::default();
        assert!(config.require_valid_threshold().is_ok());
        config.distance_threshold = 0.0;
        assert!(config.require_valid_threshold().is_ok());
        config.distance_threshold = -0.1;
        assert!(config.require_valid_threshold().is_err());
        config.distance_threshold = f64::NAN;
        assert!(config.require_valid_threshold().is_err());
    }
}
