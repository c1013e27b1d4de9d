//! Canonical invoice lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a line sells goods or a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Product,
    Service,
}

impl LineKind {
    /// Parse a raw discriminator ("product", "Service", "services", ...).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "product" | "products" | "goods" => Some(LineKind::Product),
            "service" | "services" => Some(LineKind::Service),
            _ => None,
        }
    }
}

/// A line after reconciliation of the raw record shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLine {
    pub kind: LineKind,

    /// Display name, never empty.
    pub name: String,

    /// Quantity. Always 1 for services.
    pub quantity: Decimal,

    /// Unit price before tax.
    pub unit_price: Decimal,

    /// Pre-tax line value, rounded to paise.
    pub taxable_amount: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// GST rate (percent) recorded on the line or its product/service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_rate_hint: Option<Decimal>,

    /// HSN (goods) or SAC (services) code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsn_sac: Option<String>,

    /// Unit of measure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A normalized line with GST applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxedLine {
    #[serde(flatten)]
    pub line: NormalizedLine,

    /// Applied GST rate in percent.
    pub gst_rate: Decimal,

    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,

    /// `taxable_amount + cgst + sgst + igst`.
    pub line_total: Decimal,
}

impl TaxedLine {
    /// Sum of all tax components.
    pub fn total_tax(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }

    /// True when CGST/SGST and IGST are not both in use.
    pub fn is_tax_exclusive(&self) -> bool {
        let split = !self.cgst.is_zero() || !self.sgst.is_zero();
        let integrated = !self.igst.is_zero();
        !(split && integrated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_kind_parsing() {
        assert_eq!(LineKind::from_str("product"), Some(LineKind::Product));
        assert_eq!(LineKind::from_str(" Service "), Some(LineKind::Service));
        assert_eq!(LineKind::from_str("services"), Some(LineKind::Service));
        assert_eq!(LineKind::from_str("bundle"), None);
    }

    #[test]
    fn test_tax_exclusivity() {
        let line = NormalizedLine {
            kind: LineKind::Product,
            name: "Item".to_string(),
            quantity: Decimal::ONE,
            unit_price: Decimal::from(100),
            taxable_amount: Decimal::from(100),
            description: None,
            gst_rate_hint: None,
            hsn_sac: None,
            unit: None,
        };
        let mut taxed = TaxedLine {
            line,
            gst_rate: Decimal::from(18),
            cgst: Decimal::from(9),
            sgst: Decimal::from(9),
            igst: Decimal::ZERO,
            line_total: Decimal::from(118),
        };
        assert!(taxed.is_tax_exclusive());
        assert_eq!(taxed.total_tax(), Decimal::from(18));

        taxed.igst = Decimal::ONE;
        assert!(!taxed.is_tax_exclusive());
    }
}
