use std::env;

use auth::HashingCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::Map;
use serde::Deserialize;

/// Top-level tables that environment variables may override.
const ENV_SECTIONS: [&str; 4] = ["DATABASE", "SERVER", "JWT", "HASHING"];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { http_port: 8000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default)]
    pub expiration_hours: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        let cost = HashingCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

impl From<HashingConfig> for HashingCost {
    fn from(config: HashingConfig) -> Self {
        Self {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. `JWT_SECRET` and `SALT` (hashing iterations)
    /// 2. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    ///
    /// # Errors
    /// A missing or empty JWT secret, or a value of the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(env::vars())
    }

    fn load_from(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self, ConfigError> {
        let vars: Map<String, String> = vars.into_iter().collect();
        let run_mode = vars
            .get("RUN_MODE")
            .cloned()
            .unwrap_or_else(|| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(sectioned(&vars))),
            )
            .set_override_option("jwt.secret", vars.get("JWT_SECRET").cloned())?
            .set_override_option("hashing.iterations", vars.get("SALT").cloned())?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret (JWT_SECRET) must be set to a non-empty value".to_string(),
            ));
        }

        if matches!(self.jwt.expiration_hours, Some(hours) if hours <= 0) {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Variables of the form `SECTION__KEY` for a known section; anything else
/// in the process environment is ignored.
fn sectioned(vars: &Map<String, String>) -> Map<String, String> {
    vars.iter()
        .filter(|(key, _)| {
            let key = key.to_ascii_uppercase();
            ENV_SECTIONS
                .iter()
                .any(|section| key.starts_with(&format!("{}__", section)))
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &str) -> Config {
        Config {
            database: None,
            server: ServerConfig::default(),
            jwt: JwtConfig {
                secret: secret.to_string(),
                expiration_hours: None,
            },
            hashing: HashingConfig::default(),
        }
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(config_with_secret("").validate().is_err());
        assert!(config_with_secret("   ").validate().is_err());
        assert!(config_with_secret("secret").validate().is_ok());
    }

    #[test]
    fn test_non_positive_expiration_is_rejected() {
        let mut config = config_with_secret("secret");
        config.jwt.expiration_hours = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hashing_defaults_match_argon2() {
        let cost: HashingCost = HashingConfig::default().into();
        assert_eq!(cost, HashingCost::default());
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_unrelated_variables_are_ignored() {
        let config = Config::load_from(vars(&[
            ("SERVER", "nginx"),
            ("JWT", "yes"),
            ("HASHING", "fast"),
            ("JWT__SECRET", "sectioned-secret"),
            ("SERVER__HTTP_PORT", "9000"),
        ]))
        .unwrap();

        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.jwt.secret, "sectioned-secret");
    }

    #[test]
    fn test_flat_variables_take_precedence() {
        let config = Config::load_from(vars(&[
            ("JWT__SECRET", "sectioned-secret"),
            ("JWT_SECRET", "flat-secret"),
            ("SALT", "3"),
        ]))
        .unwrap();

        assert_eq!(config.jwt.secret, "flat-secret");
        assert_eq!(config.hashing.iterations, 3);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        assert!(Config::load_from(vars(&[("SERVER__HTTP_PORT", "9000")])).is_err());
    }

    #[test]
    fn test_sectioned_filter() {
        let filtered = sectioned(
            &vars(&[("DATABASE__URL", "postgres://"), ("DATABASE", "x"), ("PATH", "/bin")])
                .into_iter()
                .collect(),
        );

        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains_key("DATABASE__URL"));
    }
}
