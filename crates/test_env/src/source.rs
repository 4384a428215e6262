//! Environment sources.
//!
//! The loader never reads `std::env` directly. It asks an [`EnvSource`] for
//! each variable, so tests can hand it a plain map and production code hands
//! it [`ProcessEnv`].

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Read-only lookup of environment variables by name.
pub trait EnvSource: Send + Sync {
    /// Returns the value of `key`, or `None` when it is not set.
    fn get(&self, key: &str) -> Option<String>;

    /// Returns the value of `key`, falling back to `default` when it is not set.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// The environment of the running process.
///
/// A value that is not valid unicode is still present: invalid bytes are
/// replaced with U+FFFD, so a port set that way fails to parse instead of
/// falling back to its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Two sources stacked: `primary` wins, `fallback` fills the gaps.
#[derive(Debug, Clone)]
pub struct Layered<P, F> {
    primary: P,
    fallback: F,
}

impl<P: EnvSource, F: EnvSource> Layered<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: EnvSource, F: EnvSource> EnvSource for Layered<P, F> {
    fn get(&self, key: &str) -> Option<String> {
        self.primary.get(key).or_else(|| self.fallback.get(key))
    }
}

/// Scalar values accepted in an override file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Number(serde_yaml::Number),
    Text(String),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

/// Variables read from a YAML mapping of name to scalar value.
///
/// ```yaml
/// IBIS_TEST_IMPALA_HOST: impala.internal
/// IBIS_TEST_IMPALA_PORT: 21050
/// IBIS_TEST_USE_CODEGEN: true
/// IBIS_TEST_NN_HOST: ~        # null leaves the variable unset
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileEnv {
    vars: BTreeMap<String, String>,
}

impl FileEnv {
    /// Load variables from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse variables from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: BTreeMap<String, Option<Scalar>> = serde_yaml::from_str(content)?;
        let vars = raw
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v.into_string())))
            .collect();

        Ok(Self { vars })
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvSource for FileEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_get_or_falls_back_only_when_unset() {
        let env = map(&[("SET", ""), ("OTHER", "value")]);

        assert_eq!(env.get_or("SET", "default"), "");
        assert_eq!(env.get_or("OTHER", "default"), "value");
        assert_eq!(env.get_or("MISSING", "default"), "default");
    }

    #[test]
    fn test_layered_prefers_primary() {
        let primary = map(&[("A", "primary")]);
        let fallback = map(&[("A", "fallback"), ("B", "fallback")]);
        let layered = Layered::new(&primary, &fallback);

        assert_eq!(layered.get("A").as_deref(), Some("primary"));
        assert_eq!(layered.get("B").as_deref(), Some("fallback"));
        assert_eq!(layered.get("C"), None);
    }

    #[test]
    fn test_file_env_scalars() {
        let file = FileEnv::from_yaml_str(
            "IBIS_TEST_IMPALA_HOST: impala.internal\n\
             IBIS_TEST_IMPALA_PORT: 21000\n\
             IBIS_TEST_USE_CODEGEN: true\n\
             IBIS_TEST_DATA_DB: '42'\n\
             IBIS_TEST_NN_HOST: ~\n",
        )
        .unwrap();

        assert_eq!(file.len(), 4);
        assert_eq!(
            file.get("IBIS_TEST_IMPALA_HOST").as_deref(),
            Some("impala.internal")
        );
        assert_eq!(file.get("IBIS_TEST_IMPALA_PORT").as_deref(), Some("21000"));
        assert_eq!(file.get("IBIS_TEST_USE_CODEGEN").as_deref(), Some("true"));
        assert_eq!(file.get("IBIS_TEST_DATA_DB").as_deref(), Some("42"));
        assert_eq!(file.get("IBIS_TEST_NN_HOST"), None);
    }

    #[test]
    fn test_file_env_empty_document() {
        let file = FileEnv::from_yaml_str("  \n").unwrap();
        assert!(file.is_empty());
    }

    #[test]
    fn test_file_env_rejects_nested_values() {
        let result = FileEnv::from_yaml_str("IBIS_TEST_IMPALA_HOST:\n  - a\n  - b\n");
        assert!(matches!(result, Err(ConfigError::FileParseError { .. })));
    }

    #[test]
    fn test_file_env_missing_file() {
        let result = FileEnv::load_from_file("/nonexistent/ibis-test-env.yaml");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
