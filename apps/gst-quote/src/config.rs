//! # Quote Configuration
//!
//! Seller details and storefront pricing settings for the CLI.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied in main)             │
//! │     --home MH  --rate 12                                               │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     TRIPUND_HOME_STATE=KA                                              │
//! │     TRIPUND_TAX_RATE=18                                                │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/pricing/quote.toml (Linux)                               │
//! │     ~/Library/Application Support/com.tripund.pricing/quote.toml       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     home state KA, 18% GST, storefront shipping defaults               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # quote.toml
//! [seller]
//! home_state = "KA"
//! gstin = "29ABCDE1234F1Z5"
//!
//! [settings.shipping]
//! free_shipping_threshold = 5000   # rupees
//! standard_shipping_rate = 100
//! express_shipping_rate = 200
//!
//! [settings.payment]
//! tax_rate = 18                    # percent
//! prepaid_discount = 5
//! cod_enabled = true
//! cod_limit = 10000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tripund_core::jurisdiction::{self, HOME_JURISDICTION};
use tripund_core::{PublicSettings, SettingsSource, TaxRate};

use crate::error::{QuoteError, QuoteResult};

// =============================================================================
// Seller Configuration
// =============================================================================

/// The registered seller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerConfig {
    /// State code of the seller's GST registration.
    #[serde(default = "default_home_state")]
    pub home_state: String,

    /// GSTIN printed on invoices, if registered.
    #[serde(default)]
    pub gstin: Option<String>,
}

fn default_home_state() -> String {
    HOME_JURISDICTION.to_string()
}

impl Default for SellerConfig {
    fn default() -> Self {
        SellerConfig {
            home_state: default_home_state(),
            gstin: None,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete gst-quote configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    #[serde(default)]
    pub seller: SellerConfig,

    /// Same document the storefront reads from its settings endpoint.
    #[serde(default)]
    pub settings: PublicSettings,
}

impl QuoteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (quote.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> QuoteResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading quote config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration and canonicalises the home state code.
    pub fn validate(&mut self) -> QuoteResult<()> {
        let home = jurisdiction::find(&self.seller.home_state)
            .ok_or_else(|| QuoteError::UnknownState(self.seller.home_state.clone()))?;
        self.seller.home_state = home.code.to_string();

        if let Some(ref gstin) = self.seller.gstin {
            // The first two digits of a GSTIN are the registration state
            if !gstin.starts_with(home.gst_code) {
                return Err(QuoteError::InvalidConfig(format!(
                    "GSTIN {} is not registered in {} (expected prefix {})",
                    gstin, home.name, home.gst_code
                )));
            }
        }

        if self.settings.general.currency != "INR" {
            return Err(QuoteError::InvalidConfig(format!(
                "Only INR is supported, got: {}",
                self.settings.general.currency
            )));
        }

        Ok(())
    }

    /// Applies `TRIPUND_*` overrides from `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(state) = lookup("TRIPUND_HOME_STATE") {
            debug!(home_state = %state, "Overriding home state from environment");
            self.seller.home_state = state;
        }

        if let Some(rate) = lookup("TRIPUND_TAX_RATE") {
            match rate.parse::<f64>().map(TaxRate::from_percentage) {
                Ok(Ok(parsed)) => {
                    debug!(rate = %parsed, "Overriding tax rate from environment");
                    self.settings.payment.tax_rate = parsed;
                }
                _ => warn!(rate = %rate, "Ignoring invalid TRIPUND_TAX_RATE"),
            }
        }

        if let Some(gstin) = lookup("TRIPUND_GSTIN") {
            self.seller.gstin = Some(gstin);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tripund", "pricing")
            .map(|dirs| dirs.config_dir().join("quote.toml"))
    }

    pub fn home_state(&self) -> &str {
        &self.seller.home_state
    }
}

// =============================================================================
// Settings Source
// =============================================================================

/// Reads the `[settings]` table from the config on every fetch.
///
/// Wrapped in a `SettingsService`, edits to the file are picked up once the
/// cached copy expires.
#[derive(Debug, Clone, Default)]
pub struct ConfigSettingsSource {
    path: Option<PathBuf>,
}

impl ConfigSettingsSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        ConfigSettingsSource { path }
    }
}

impl SettingsSource for ConfigSettingsSource {
    type Error = QuoteError;

    fn fetch(&self) -> QuoteResult<PublicSettings> {
        QuoteConfig::load(self.path.clone()).map(|config| config.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tripund_core::Money;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let mut config = QuoteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.home_state(), "KA");
        assert_eq!(config.settings.payment.tax_rate, TaxRate::GST_STANDARD);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [seller]
            home_state = "mh"
            gstin = "27ABCDE1234F1Z5"

            [settings.shipping]
            standard_shipping_rate = 79

            [settings.payment]
            tax_rate = 12
            cod_enabled = false
        "#;
        let mut config: QuoteConfig = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();

        assert_eq!(config.home_state(), "MH");
        assert_eq!(config.settings.payment.tax_rate.bps(), 1200);
        assert!(!config.settings.payment.cod_enabled);
        assert_eq!(config.settings.shipping.standard_shipping_rate, Money::from_rupees(79));
        assert_eq!(
            config.settings.shipping.free_shipping_threshold,
            Money::from_rupees(5000)
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = QuoteConfig::default();
        config.apply_overrides(env(&[
            ("TRIPUND_HOME_STATE", "TN"),
            ("TRIPUND_TAX_RATE", "5"),
        ]));
        assert_eq!(config.seller.home_state, "TN");
        assert_eq!(config.settings.payment.tax_rate.bps(), 500);
    }

    #[test]
    fn test_invalid_env_rate_is_ignored() {
        let mut config = QuoteConfig::default();
        config.apply_overrides(env(&[("TRIPUND_TAX_RATE", "lots")]));
        assert_eq!(config.settings.payment.tax_rate, TaxRate::GST_STANDARD);

        config.apply_overrides(env(&[("TRIPUND_TAX_RATE", "-5")]));
        assert_eq!(config.settings.payment.tax_rate, TaxRate::GST_STANDARD);
    }

    #[test]
    fn test_validation() {
        let mut config = QuoteConfig::default();
        config.seller.home_state = "ZZ".to_string();
        assert!(matches!(config.validate(), Err(QuoteError::UnknownState(_))));

        config.seller.home_state = "KA".to_string();
        config.seller.gstin = Some("27ABCDE1234F1Z5".to_string());
        assert!(matches!(config.validate(), Err(QuoteError::InvalidConfig(_))));

        config.seller.gstin = Some("29ABCDE1234F1Z5".to_string());
        assert!(config.validate().is_ok());

        config.settings.general.currency = "USD".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("gst-quote-test-does-not-exist.toml");
        let source = ConfigSettingsSource::new(Some(path));
        let settings = source.fetch().unwrap();
        assert_eq!(settings.general.currency, "INR");
    }

    #[test]
    fn test_toml_serialization() {
        let config = QuoteConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[seller]"));
        assert!(toml_str.contains("home_state = \"KA\""));
    }
}
