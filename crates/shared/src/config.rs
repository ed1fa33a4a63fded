//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Ledger posting policies.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings as loaded from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for verifying tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Which date a void's reversal entry is booked on.
///
/// This decides which period absorbs the correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReversalDating {
    /// Reversal is dated on the day the void executes.
    #[default]
    VoidDate,
    /// Reversal is backdated to the original entry's date.
    OriginalDate,
}

/// Ledger posting policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Dating rule for reversal entries created by a void.
    #[serde(default)]
    pub reversal_dating: ReversalDating,
    /// Whether a draft may still be posted after one of its accounts was
    /// deactivated. Deactivation always blocks new drafts.
    #[serde(default = "default_post_with_inactive_accounts")]
    pub post_with_inactive_accounts: bool,
}

fn default_post_with_inactive_accounts() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            reversal_dating: ReversalDating::default(),
            post_with_inactive_accounts: default_post_with_inactive_accounts(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_config_defaults() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.reversal_dating, ReversalDating::VoidDate);
        assert!(cfg.post_with_inactive_accounts);
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("TALLY__SERVER__PORT", Some("9090")),
                ("TALLY__DATABASE__URL", Some("postgres://localhost/tally_test")),
                ("TALLY__JWT__SECRET", Some("secret")),
                ("TALLY__LEDGER__REVERSAL_DATING", Some("original_date")),
                ("TALLY__LEDGER__POST_WITH_INACTIVE_ACCOUNTS", Some("false")),
            ],
            || {
                let cfg = AppConfig::load().unwrap();
                assert_eq!(cfg.server.port, 9090);
                assert_eq!(cfg.server.host, "0.0.0.0");
                assert_eq!(cfg.database.url, "postgres://localhost/tally_test");
                assert_eq!(cfg.database.max_connections, 10);
                assert_eq!(cfg.jwt.access_token_expiry_secs, 900);
                assert_eq!(cfg.ledger.reversal_dating, ReversalDating::OriginalDate);
                assert!(!cfg.ledger.post_with_inactive_accounts);
            },
        );
    }

    #[test]
    fn test_ledger_section_optional() {
        temp_env::with_vars(
            [
                ("TALLY__DATABASE__URL", Some("postgres://localhost/tally_test")),
                ("TALLY__JWT__SECRET", Some("secret")),
            ],
            || {
                let cfg = AppConfig::load().unwrap();
                assert_eq!(cfg.ledger, LedgerConfig::default());
            },
        );
    }
}
