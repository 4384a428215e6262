use std::fmt;

use crate::{source::EnvSource, ConfigError};

pub const ENV_IMPALA_HOST: &str = "IBIS_TEST_IMPALA_HOST";
pub const ENV_IMPALA_PROTOCOL: &str = "IBIS_TEST_IMPALA_PROTOCOL";
pub const ENV_IMPALA_PORT: &str = "IBIS_TEST_IMPALA_PORT";
pub const ENV_TMP_DIR: &str = "IBIS_TMP_HDFS_DIR";
pub const ENV_TEST_DATA_DB: &str = "IBIS_TEST_DATA_DB";
pub const ENV_TEST_DATA_DIR: &str = "IBIS_TEST_DATA_HDFS_DIR";
pub const ENV_NN_HOST: &str = "IBIS_TEST_NN_HOST";
pub const ENV_WEBHDFS_PORT: &str = "IBIS_TEST_WEBHDFS_PORT";
pub const ENV_USE_CODEGEN: &str = "IBIS_TEST_USE_CODEGEN";

pub const DEFAULT_IMPALA_HOST: &str = "localhost";
pub const DEFAULT_IMPALA_PROTOCOL: &str = "hiveserver2";
pub const DEFAULT_IMPALA_PORT: i64 = 21050;
pub const DEFAULT_TMP_DIR: &str = "/tmp/__ibis_test";
pub const DEFAULT_TEST_DATA_DB: &str = "ibis_testing";
pub const DEFAULT_TEST_DATA_DIR: &str = "/__ibis/ibis-testing-data";
pub const DEFAULT_NN_HOST: &str = "localhost";
/// Default WebHDFS port of the impala dev environment
pub const DEFAULT_WEBHDFS_PORT: i64 = 5070;
pub const DEFAULT_USE_CODEGEN: bool = false;

/// Every variable the loader reads.
pub const ENV_VARS: &[&str] = &[
    ENV_IMPALA_HOST,
    ENV_IMPALA_PROTOCOL,
    ENV_IMPALA_PORT,
    ENV_TMP_DIR,
    ENV_TEST_DATA_DB,
    ENV_TEST_DATA_DIR,
    ENV_NN_HOST,
    ENV_WEBHDFS_PORT,
    ENV_USE_CODEGEN,
];

/// Settings for the Impala/HDFS cluster the test suite runs against.
///
/// Every field is resolved once, when the value is built; `hdfs_url` is
/// derived from `nn_host` and `webhdfs_port` at that point and has no
/// variable of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbisTestEnv {
    impala_host: String,
    impala_protocol: String,
    impala_port: i64,
    tmp_dir: String,
    test_data_db: String,
    test_data_dir: String,
    nn_host: String,
    webhdfs_port: i64,
    hdfs_url: String,
    use_codegen: bool,
}

impl IbisTestEnv {
    /// Load from an arbitrary environment source
    pub fn load_from<E: EnvSource + ?Sized>(env: &E) -> Result<Self, ConfigError> {
        let impala_host =
            resolve(env, ENV_IMPALA_HOST).unwrap_or_else(|| DEFAULT_IMPALA_HOST.to_string());
        let impala_protocol = resolve(env, ENV_IMPALA_PROTOCOL)
            .unwrap_or_else(|| DEFAULT_IMPALA_PROTOCOL.to_string());
        let impala_port = parse_port(env, ENV_IMPALA_PORT, DEFAULT_IMPALA_PORT)?;
        let tmp_dir = resolve(env, ENV_TMP_DIR).unwrap_or_else(|| DEFAULT_TMP_DIR.to_string());
        let test_data_db =
            resolve(env, ENV_TEST_DATA_DB).unwrap_or_else(|| DEFAULT_TEST_DATA_DB.to_string());
        let test_data_dir =
            resolve(env, ENV_TEST_DATA_DIR).unwrap_or_else(|| DEFAULT_TEST_DATA_DIR.to_string());
        let nn_host = resolve(env, ENV_NN_HOST).unwrap_or_else(|| DEFAULT_NN_HOST.to_string());
        let webhdfs_port = parse_port(env, ENV_WEBHDFS_PORT, DEFAULT_WEBHDFS_PORT)?;
        let use_codegen = resolve(env, ENV_USE_CODEGEN)
            .map(|v| parse_flag(&v))
            .unwrap_or(DEFAULT_USE_CODEGEN);

        let config = Self::new(
            impala_host,
            impala_protocol,
            impala_port,
            tmp_dir,
            test_data_db,
            test_data_dir,
            nn_host,
            webhdfs_port,
            use_codegen,
        );

        tracing::debug!(
            impala = %format!("{}:{}", config.impala_host, config.impala_port),
            hdfs_url = %config.hdfs_url,
            use_codegen = config.use_codegen,
            "Loaded test environment"
        );

        Ok(config)
    }

    #[allow(clippy::too_many_arguments)]
    fn new(
        impala_host: String,
        impala_protocol: String,
        impala_port: i64,
        tmp_dir: String,
        test_data_db: String,
        test_data_dir: String,
        nn_host: String,
        webhdfs_port: i64,
        use_codegen: bool,
    ) -> Self {
        let hdfs_url = format!("http://{}:{}", nn_host, webhdfs_port);
        Self {
            impala_host,
            impala_protocol,
            impala_port,
            tmp_dir,
            test_data_db,
            test_data_dir,
            nn_host,
            webhdfs_port,
            hdfs_url,
            use_codegen,
        }
    }

    pub fn impala_host(&self) -> &str {
        &self.impala_host
    }

    pub fn impala_protocol(&self) -> &str {
        &self.impala_protocol
    }

    pub fn impala_port(&self) -> i64 {
        self.impala_port
    }

    /// Scratch directory on HDFS for tables created by tests
    pub fn tmp_dir(&self) -> &str {
        &self.tmp_dir
    }

    pub fn test_data_db(&self) -> &str {
        &self.test_data_db
    }

    /// HDFS directory holding the test data files
    pub fn test_data_dir(&self) -> &str {
        &self.test_data_dir
    }

    /// Namenode host
    pub fn nn_host(&self) -> &str {
        &self.nn_host
    }

    pub fn webhdfs_port(&self) -> i64 {
        self.webhdfs_port
    }

    /// WebHDFS endpoint, `http://{nn_host}:{webhdfs_port}`
    pub fn hdfs_url(&self) -> &str {
        &self.hdfs_url
    }

    pub fn use_codegen(&self) -> bool {
        self.use_codegen
    }

    /// Field names and rendered values, in declaration order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("impala_host", self.impala_host.clone()),
            ("impala_protocol", self.impala_protocol.clone()),
            ("impala_port", self.impala_port.to_string()),
            ("tmp_dir", self.tmp_dir.clone()),
            ("test_data_db", self.test_data_db.clone()),
            ("test_data_dir", self.test_data_dir.clone()),
            ("nn_host", self.nn_host.clone()),
            ("webhdfs_port", self.webhdfs_port.to_string()),
            ("hdfs_url", self.hdfs_url.clone()),
            ("use_codegen", self.use_codegen.to_string()),
        ]
    }

    /// Multi-line representation suitable for logging
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl Default for IbisTestEnv {
    fn default() -> Self {
        Self::new(
            DEFAULT_IMPALA_HOST.to_string(),
            DEFAULT_IMPALA_PROTOCOL.to_string(),
            DEFAULT_IMPALA_PORT,
            DEFAULT_TMP_DIR.to_string(),
            DEFAULT_TEST_DATA_DB.to_string(),
            DEFAULT_TEST_DATA_DIR.to_string(),
            DEFAULT_NN_HOST.to_string(),
            DEFAULT_WEBHDFS_PORT,
            DEFAULT_USE_CODEGEN,
        )
    }
}

impl fmt::Display for IbisTestEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kvs: Vec<String> = self
            .fields()
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        write!(f, "IbisTestEnv(\n    {})", kvs.join(",\n    "))
    }
}

/// Reads `var` once and logs it when set.
fn resolve<E: EnvSource + ?Sized>(env: &E, var: &'static str) -> Option<String> {
    let value = env.get(var);
    if let Some(value) = &value {
        tracing::debug!(var = %var, value = %value, "Overriding test environment default");
    }
    value
}

fn parse_port<E: EnvSource + ?Sized>(
    env: &E,
    var: &'static str,
    default: i64,
) -> Result<i64, ConfigError> {
    let Some(value) = resolve(env, var) else {
        return Ok(default);
    };
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::ParseError {
            var,
            value,
            source,
        })
}

/// Only a case-insensitive "true" enables a flag; anything else, including "", is false.
fn parse_flag(value: &str) -> bool {
    value.to_lowercase() == "true"
}
