//! Configuration for invoice computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{GstBillError, Result};
use crate::invoice::amounts::parse_amount;
use crate::models::document::TaxRegime;

/// Main configuration for gstbill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Page layout configuration.
    pub pagination: PaginationConfig,

    /// Tax resolution configuration.
    pub tax: TaxConfig,

    /// Amount-in-words footer configuration.
    pub words: WordsConfig,
}

/// Page layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Line items printed per page.
    pub items_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { items_per_page: 10 }
    }
}

/// Tax resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// GST rate (percent) for lines that carry none. Unset means 0.
    pub default_gst_rate: Option<Decimal>,

    /// Regime used when the seller is registered but the buyer's state is unknown.
    pub unknown_buyer_state: TaxRegime,

    /// Warn about GSTINs that fail the format or checksum check.
    pub validate_gstin: bool,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            default_gst_rate: None,
            unknown_buyer_state: TaxRegime::Intrastate,
            validate_gstin: true,
        }
    }
}

/// Amount-in-words footer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordsConfig {
    pub prefix: String,
    pub suffix: String,
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self {
            prefix: "RUPEES".to_string(),
            suffix: "ONLY".to_string(),
        }
    }
}

impl BillingConfig {
    /// Dotted keys accepted by [`get_value`](Self::get_value) and
    /// [`set_value`](Self::set_value).
    pub const KEYS: [&'static str; 6] = [
        "pagination.items_per_page",
        "tax.default_gst_rate",
        "tax.unknown_buyer_state",
        "tax.validate_gstin",
        "words.prefix",
        "words.suffix",
    ];

    /// Current value of a dotted key as text. An unset default rate is "".
    pub fn get_value(&self, key: &str) -> Option<String> {
        let value = match key {
            "pagination.items_per_page" => self.pagination.items_per_page.to_string(),
            "tax.default_gst_rate" => self
                .tax
                .default_gst_rate
                .map(|rate| rate.normalize().to_string())
                .unwrap_or_default(),
            "tax.unknown_buyer_state" => self.tax.unknown_buyer_state.key().to_string(),
            "tax.validate_gstin" => self.tax.validate_gstin.to_string(),
            "words.prefix" => self.words.prefix.clone(),
            "words.suffix" => self.words.suffix.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a dotted key from text. The configuration is left untouched
    /// unless the result validates.
    ///
    /// `tax.default_gst_rate` is cleared by "" or "none".
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || GstBillError::Config(format!("invalid value for {}: {}", key, value));
        let trimmed = value.trim();
        let mut next = self.clone();

        match key {
            "pagination.items_per_page" => {
                next.pagination.items_per_page = trimmed.parse().map_err(|_| invalid())?;
            }
            "tax.default_gst_rate" => {
                next.tax.default_gst_rate =
                    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
                        None
                    } else {
                        Some(parse_amount(trimmed).ok_or_else(invalid)?)
                    };
            }
            "tax.unknown_buyer_state" => {
                next.tax.unknown_buyer_state = TaxRegime::from_str(trimmed).ok_or_else(invalid)?;
            }
            "tax.validate_gstin" => {
                next.tax.validate_gstin = trimmed.parse().map_err(|_| invalid())?;
            }
            "words.prefix" => next.words.prefix = trimmed.to_string(),
            "words.suffix" => next.words.suffix = trimmed.to_string(),
            _ => {
                return Err(GstBillError::Config(format!(
                    "unknown configuration key: {} (expected one of: {})",
                    key,
                    Self::KEYS.join(", ")
                )));
            }
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        self.validate()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.pagination.items_per_page == 0 {
            return Err(GstBillError::Config(
                "pagination.items_per_page must be at least 1".to_string(),
            ));
        }

        if !self.tax.unknown_buyer_state.is_taxed() {
            return Err(GstBillError::Config(
                "tax.unknown_buyer_state must be intrastate or interstate".to_string(),
            ));
        }

        if let Some(rate) = self.tax.default_gst_rate {
            if rate.is_sign_negative() || rate > Decimal::ONE_HUNDRED {
                return Err(GstBillError::Config(format!(
                    "tax.default_gst_rate out of range: {}",
                    rate
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BillingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pagination.items_per_page, 10);
        assert_eq!(config.tax.unknown_buyer_state, TaxRegime::Intrastate);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BillingConfig =
            serde_json::from_str(r#"{ "pagination": { "items_per_page": 15 } }"#).unwrap();
        assert_eq!(config.pagination.items_per_page, 15);
        assert!(config.tax.validate_gstin);
        assert_eq!(config.words.suffix, "ONLY");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = BillingConfig::default();
        config.pagination.items_per_page = 0;
        assert!(matches!(config.validate(), Err(GstBillError::Config(_))));

        let mut config = BillingConfig::default();
        config.tax.unknown_buyer_state = TaxRegime::NoTax;
        assert!(config.validate().is_err());

        let mut config = BillingConfig::default();
        config.tax.default_gst_rate = Some(Decimal::from(-5));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_every_key_reads_back() {
        let config = BillingConfig::default();
        for key in BillingConfig::KEYS {
            assert!(config.get_value(key).is_some(), "{} has no value", key);
        }
        assert_eq!(config.get_value("pagination.items_per_page").as_deref(), Some("10"));
        assert_eq!(config.get_value("tax.default_gst_rate").as_deref(), Some(""));
        assert_eq!(config.get_value("tax.unknown_buyer_state").as_deref(), Some("intrastate"));
        assert_eq!(config.get_value("pagination"), None);
    }

    #[test]
    fn test_set_value_parses_typed_fields() {
        let mut config = BillingConfig::default();

        config.set_value("pagination.items_per_page", "25").unwrap();
        config.set_value("tax.default_gst_rate", "18").unwrap();
        config.set_value("tax.unknown_buyer_state", "igst").unwrap();
        config.set_value("tax.validate_gstin", "false").unwrap();
        config.set_value("words.prefix", " INR ").unwrap();

        assert_eq!(config.pagination.items_per_page, 25);
        assert_eq!(config.tax.default_gst_rate, Some(Decimal::from(18)));
        assert_eq!(config.tax.unknown_buyer_state, TaxRegime::Interstate);
        assert!(!config.tax.validate_gstin);
        assert_eq!(config.words.prefix, "INR");
        assert_eq!(config.get_value("tax.default_gst_rate").as_deref(), Some("18"));

        config.set_value("tax.default_gst_rate", "none").unwrap();
        assert_eq!(config.tax.default_gst_rate, None);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = BillingConfig::default();

        assert!(config.set_value("pagination.items_per_page", "0").is_err());
        assert_eq!(config.pagination.items_per_page, 10);
        assert!(config.set_value("pagination.items_per_page", "ten").is_err());
        assert!(config.set_value("tax.default_gst_rate", "150").is_err());
        assert!(config.set_value("tax.unknown_buyer_state", "no_tax").is_err());
        assert!(config.set_value("tax.validate_gstin", "maybe").is_err());
        assert!(matches!(
            config.set_value("colors.theme", "dark"),
            Err(GstBillError::Config(_))
        ));
    }
}
