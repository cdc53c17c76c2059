//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::money::{BALANCE_TOLERANCE, CURRENCY_DECIMALS};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger posting configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
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

/// Ledger posting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Exclusive bound on |debits - credits| for a journal entry.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
    /// Decimal places of the tenant currency.
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u32,
}

fn default_balance_tolerance() -> Decimal {
    BALANCE_TOLERANCE
}

fn default_currency_decimals() -> u32 {
    CURRENCY_DECIMALS
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
            currency_decimals: default_currency_decimals(),
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
            .add_source(config::Environment::with_prefix("TALLYBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("TALLYBOOK__DATABASE__URL", Some("postgres://localhost/tallybook_test")),
                ("TALLYBOOK__DATABASE__MAX_CONNECTIONS", Some("4")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/tallybook_test");
                assert_eq!(config.database.max_connections, 4);
                assert_eq!(config.database.min_connections, 1);
                assert_eq!(config.ledger.balance_tolerance, dec!(0.01));
                assert_eq!(config.ledger.currency_decimals, 2);
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_var_unset("TALLYBOOK__DATABASE__URL", || {
            assert!(AppConfig::load().is_err());
        });
    }

    #[test]
    fn test_ledger_defaults() {
        let ledger = LedgerConfig::default();
        assert_eq!(ledger.balance_tolerance, dec!(0.01));
        assert_eq!(ledger.currency_decimals, 2);
    }
}
