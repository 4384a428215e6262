use crate::source::EnvSource;

pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_LOG_MODULE_TEST_ENV: &str = "LOG_MODULE_TEST_ENV";

/// Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Level override for this crate's own events
    pub module_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    /// Unknown names fall back to `Pretty`
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Load from environment variables
    pub fn from_env<E: EnvSource + ?Sized>(env: &E) -> Self {
        Self {
            level: env.get_or(ENV_LOG_LEVEL, "info"),
            format: env
                .get(ENV_LOG_FORMAT)
                .map(|f| LogFormat::from_name(&f))
                .unwrap_or_default(),
            module_level: env.get(ENV_LOG_MODULE_TEST_ENV),
        }
    }

    /// Filter directive for `tracing_subscriber::EnvFilter`
    pub fn filter(&self) -> String {
        let mut filter = self.level.clone();
        if let Some(level) = &self.module_level {
            filter.push_str(&format!(",test_env={}", level));
        }
        filter
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            module_level: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::from_env(&HashMap::<String, String>::new());
        assert_eq!(config, LoggingConfig::default());
        assert_eq!(config.filter(), "info");
    }

    #[test]
    fn test_logging_from_env() {
        let env: HashMap<String, String> = [
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_FORMAT, "JSON"),
            (ENV_LOG_MODULE_TEST_ENV, "debug"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = LoggingConfig::from_env(&env);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter(), "warn,test_env=debug");
    }

    #[test]
    fn test_unknown_format_is_pretty() {
        assert_eq!(LogFormat::from_name("fancy"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_name("compact"), LogFormat::Compact);
    }
}
