use settleup_application::{AmountConversionError, CurrencyContext};
use std::env;

const SCALE_VAR: &str = "SETTLEUP_CURRENCY_SCALE";
const SYMBOL_VAR: &str = "SETTLEUP_CURRENCY_SYMBOL";
const DEFAULT_SCALE: u32 = 2;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("SETTLEUP_CURRENCY_SCALE must be a non-negative integer, got '{0}'")]
    InvalidScale(String),
    #[error("SETTLEUP_CURRENCY_SCALE: {0}")]
    Currency(#[from] AmountConversionError),
}

/// Settings read from the environment (and `.env`, if present).
#[derive(Debug)]
pub struct CliConfig {
    pub currency: CurrencyContext,
}

impl CliConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let scale = match lookup(SCALE_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidScale(raw))?,
            None => DEFAULT_SCALE,
        };
        let symbol = lookup(SYMBOL_VAR).unwrap_or_default();

        Ok(Self {
            currency: CurrencyContext::new(scale, &symbol)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[test]
    fn defaults_to_cents_without_symbol() {
        let config = CliConfig::from_lookup(lookup(&[])).expect("defaults are valid");
        assert_eq!(config.currency, CurrencyContext::cents());
    }

    #[test]
    fn reads_scale_and_symbol() {
        let config = CliConfig::from_lookup(lookup(&[(SCALE_VAR, "0"), (SYMBOL_VAR, "¥")]))
            .expect("config is valid");

        assert_eq!(config.currency.scale(), 0);
        assert_eq!(config.currency.symbol(), "¥");
    }

    #[rstest]
    #[case::not_a_number("two", ConfigError::InvalidScale("two".to_owned()))]
    #[case::negative("-1", ConfigError::InvalidScale("-1".to_owned()))]
    #[case::too_large(
        "19",
        ConfigError::Currency(AmountConversionError::UnsupportedScale {
            scale: 19,
            max_supported: 18,
        })
    )]
    fn rejects_invalid_scale(#[case] raw: &str, #[case] expected: ConfigError) {
        let err = CliConfig::from_lookup(lookup(&[(SCALE_VAR, raw)]))
            .expect_err("scale should be rejected");
        assert_eq!(err, expected);
    }
}
