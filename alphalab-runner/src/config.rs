//! Serializable backtest configuration.
//!
//! Replaces a loose parameter bag with one explicit struct. Every field has a
//! documented default so a TOML file only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use alphalab_core::engine::{
    CostModel, EngineConfig, SignalScope, DEFAULT_COMMISSION_RATE, DEFAULT_LOOKBACK,
    DEFAULT_SLIPPAGE_RATE, DEFAULT_STARTING_CASH, DEFAULT_TRADE_QUANTITY,
};
use alphalab_core::signal::MIN_LOOKBACK;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a single backtest run.
///
/// ```toml
/// lookback_period = 10
/// commission_rate = 0.001
/// slippage_rate = 0.001
/// starting_cash = 1000000.0
/// trade_quantity = 1.0
/// signal_scope = "primary"   # or "per_instrument"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BacktestConfig {
    /// Bars in the alpha window, current bar included.
    pub lookback_period: usize,
    /// Commission as a fraction of notional, charged on each leg.
    pub commission_rate: f64,
    /// Slippage as a fraction of notional, charged on each leg.
    pub slippage_rate: f64,
    pub starting_cash: f64,
    /// Units bought on every BUY.
    pub trade_quantity: f64,
    pub signal_scope: SignalScope,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            lookback_period: DEFAULT_LOOKBACK,
            commission_rate: DEFAULT_COMMISSION_RATE,
            slippage_rate: DEFAULT_SLIPPAGE_RATE,
            starting_cash: DEFAULT_STARTING_CASH,
            trade_quantity: DEFAULT_TRADE_QUANTITY,
            signal_scope: SignalScope::Primary,
        }
    }
}

impl BacktestConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Check ranges: lookback >= 2, rates in [0, 1), cash and quantity
    /// positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_period < MIN_LOOKBACK {
            return Err(ConfigError::Invalid(format!(
                "lookback_period must be >= {MIN_LOOKBACK}, got {}",
                self.lookback_period
            )));
        }
        for (name, rate) in [
            ("commission_rate", self.commission_rate),
            ("slippage_rate", self.slippage_rate),
        ] {
            if !(0.0..1.0).contains(&rate) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be in [0, 1), got {rate}"
                )));
            }
        }
        for (name, value) in [
            ("starting_cash", self.starting_cash),
            ("trade_quantity", self.trade_quantity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.starting_cash, self.lookback_period)
            .with_costs(CostModel::new(self.commission_rate, self.slippage_rate))
            .with_quantity(self.trade_quantity)
            .with_scope(self.signal_scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_parameters() {
        let config = BacktestConfig::default();
        assert_eq!(config.lookback_period, 10);
        assert_eq!(config.commission_rate, 0.001);
        assert_eq!(config.slippage_rate, 0.001);
        assert_eq!(config.starting_cash, 1_000_000.0);
        assert_eq!(config.trade_quantity, 1.0);
        assert_eq!(config.signal_scope, SignalScope::Primary);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = BacktestConfig::from_toml(
            r#"
            lookback_period = 20
            signal_scope = "per_instrument"
            "#,
        )
        .unwrap();
        assert_eq!(config.lookback_period, 20);
        assert_eq!(config.signal_scope, SignalScope::PerInstrument);
        assert_eq!(config.starting_cash, 1_000_000.0);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            BacktestConfig::from_toml("").unwrap(),
            BacktestConfig::default()
        );
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let err = BacktestConfig::from_toml("lookback = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_short_lookback() {
        let err = BacktestConfig::from_toml("lookback_period = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_out_of_range_rates() {
        let mut config = BacktestConfig::default();
        config.commission_rate = 1.0;
        assert!(config.validate().is_err());
        config.commission_rate = 0.0;
        config.slippage_rate = -0.01;
        assert!(config.validate().is_err());
        config.slippage_rate = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_cash_and_quantity() {
        let mut config = BacktestConfig::default();
        config.starting_cash = 0.0;
        assert!(config.validate().is_err());
        config.starting_cash = 1.0;
        config.trade_quantity = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BacktestConfig::from_file("/no/such/config.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn engine_config_carries_every_field() {
        let config = BacktestConfig {
            lookback_period: 5,
            commission_rate: 0.002,
            slippage_rate: 0.0005,
            starting_cash: 50_000.0,
            trade_quantity: 3.0,
            signal_scope: SignalScope::PerInstrument,
        };
        let engine = config.to_engine_config();
        assert_eq!(engine.lookback_period, 5);
        assert_eq!(engine.cost_model, CostModel::new(0.002, 0.0005));
        assert_eq!(engine.starting_cash, 50_000.0);
        assert_eq!(engine.trade_quantity, 3.0);
        assert_eq!(engine.signal_scope, SignalScope::PerInstrument);
    }
}
