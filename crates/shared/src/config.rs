//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::jwt::JwtConfig;
use crate::types::{AccountId, Money};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// JWT configuration.
    pub auth: JwtConfig,
    /// Ledger engine configuration.
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
    /// Seed demo accounts at startup (development convenience).
    #[serde(default)]
    pub seed_demo_accounts: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Ledger engine configuration.
///
/// Fee constants are configuration values, not embedded literals, so they
/// can change without redeploying logic.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// The designated house account that collects fees.
    #[serde(default)]
    pub treasury_account_id: Option<AccountId>,
    /// Rate applied to a withdrawal amount to compute its fee.
    #[serde(default = "default_withdrawal_fee_rate")]
    pub withdrawal_fee_rate: Decimal,
    /// Flat fee debited when applying for credit.
    #[serde(default = "default_credit_application_fee")]
    pub credit_application_fee: Money,
    /// Maximum automatic retries after a commit conflict.
    #[serde(default = "default_max_commit_retries")]
    pub max_commit_retries: u32,
    /// Currency symbol used in user-visible notification text.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_withdrawal_fee_rate() -> Decimal {
    Decimal::new(10, 2) // 10%
}

fn default_credit_application_fee() -> Money {
    Money::from_minor_units(100_000) // 1000.00
}

fn default_max_commit_retries() -> u32 {
    5
}

fn default_currency_symbol() -> String {
    "Kz".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            treasury_account_id: None,
            withdrawal_fee_rate: default_withdrawal_fee_rate(),
            credit_application_fee: default_credit_application_fee(),
            max_commit_retries: default_max_commit_retries(),
            currency_symbol: default_currency_symbol(),
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
            .add_source(config::Environment::with_prefix("KIVELA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_defaults() {
        let ledger = LedgerConfig::default();
        assert_eq!(ledger.withdrawal_fee_rate, dec!(0.10));
        assert_eq!(ledger.credit_application_fee, Money::from_minor_units(100_000));
        assert_eq!(ledger.max_commit_retries, 5);
        assert_eq!(ledger.currency_symbol, "Kz");
        assert!(ledger.treasury_account_id.is_none());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let raw = r#"
            [server]
            port = 9090

            [auth]
            secret = "s3cret"

            [ledger]
            treasury_account_id = "0192f3a1-7c3e-7b11-a8f2-3d2f9a6b1c4d"
            withdrawal_fee_rate = "0.05"
            credit_application_fee = "500.00"
            max_commit_retries = 3
        "#;

        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.auth.secret, "s3cret");
        assert_eq!(config.ledger.withdrawal_fee_rate, dec!(0.05));
        assert_eq!(
            config.ledger.credit_application_fee,
            Money::from_minor_units(50_000)
        );
        assert_eq!(config.ledger.max_commit_retries, 3);
        assert!(config.ledger.treasury_account_id.is_some());
    }
}
