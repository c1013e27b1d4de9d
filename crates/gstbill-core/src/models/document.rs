//! The computed invoice document handed to renderers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line::TaxedLine;
use super::party::TaxIdentity;

/// GST treatment of a whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// Unregistered seller or zero tax: no GST columns.
    #[default]
    NoTax,
    /// Seller and buyer in the same state: CGST + SGST.
    Intrastate,
    /// Different states: IGST.
    Interstate,
}

impl TaxRegime {
    pub fn is_taxed(&self) -> bool {
        !matches!(self, TaxRegime::NoTax)
    }

    /// Parse a regime name ("no_tax", "intrastate", "interstate").
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "no_tax" | "notax" | "none" => Some(TaxRegime::NoTax),
            "intrastate" | "intra" | "cgst_sgst" => Some(TaxRegime::Intrastate),
            "interstate" | "inter" | "igst" => Some(TaxRegime::Interstate),
            _ => None,
        }
    }

    /// Serialized name ("no_tax", "intrastate", "interstate").
    pub fn key(&self) -> &'static str {
        match self {
            TaxRegime::NoTax => "no_tax",
            TaxRegime::Intrastate => "intrastate",
            TaxRegime::Interstate => "interstate",
        }
    }

    /// Format for display.
    pub fn display(&self) -> &'static str {
        match self {
            TaxRegime::NoTax => "No GST",
            TaxRegime::Intrastate => "CGST + SGST",
            TaxRegime::Interstate => "IGST",
        }
    }
}

/// Sums for all lines sharing one GST rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBreakdown {
    pub gst_rate: Decimal,
    pub taxable: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total: Decimal,
}

/// Document-level totals: exact sums of the per-line values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub total_taxable: Decimal,
    pub total_cgst: Decimal,
    pub total_sgst: Decimal,
    pub total_igst: Decimal,
    pub grand_total: Decimal,
    pub total_quantity: Decimal,
    pub total_line_count: usize,

    /// Per-rate summary, ascending by rate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_rate: Vec<RateBreakdown>,
}

impl DocumentTotals {
    pub fn total_tax(&self) -> Decimal {
        self.total_cgst + self.total_sgst + self.total_igst
    }
}

/// One printed page worth of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub page_number: usize,

    pub page_count: usize,

    /// 1-based serial number of the first line on this page.
    pub first_serial: usize,

    /// Only the final page carries the totals block.
    pub is_last_page: bool,

    pub lines: Vec<TaxedLine>,
}

/// Identifying fields carried over from the transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentHeader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Observations made while computing the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputeMetadata {
    /// Data-quality warnings (missing rates, malformed GSTINs, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Regime before the zero-tax downgrade, when it differs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_regime: Option<TaxRegime>,
}

/// A fully computed invoice, ready for any renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub header: DocumentHeader,
    pub seller: TaxIdentity,
    pub buyer: TaxIdentity,
    pub regime: TaxRegime,
    pub lines: Vec<TaxedLine>,
    pub totals: DocumentTotals,
    pub pages: Vec<Page>,

    /// Grand total in whole rupees, in words.
    pub amount_in_words: String,

    /// Footer phrase, e.g. "RUPEES ONE HUNDRED ONLY".
    pub amount_in_words_phrase: String,

    #[serde(default)]
    pub metadata: ComputeMetadata,
}

impl InvoiceDocument {
    /// Check the document's internal invariants and return any violations.
    pub fn verify(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (i, line) in self.lines.iter().enumerate() {
            if !line.is_tax_exclusive() {
                issues.push(format!("Line {} mixes CGST/SGST with IGST", i + 1));
            }
            if line.line_total != line.line.taxable_amount + line.total_tax() {
                issues.push(format!(
                    "Line {} total ({}) differs from taxable plus tax ({})",
                    i + 1,
                    line.line_total,
                    line.line.taxable_amount + line.total_tax()
                ));
            }
            if !self.regime.is_taxed() && !line.total_tax().is_zero() {
                issues.push(format!("Line {} is taxed on a no-tax document", i + 1));
            }
        }

        let lines_total: Decimal = self.lines.iter().map(|l| l.line_total).sum();
        if lines_total != self.totals.grand_total {
            issues.push(format!(
                "Sum of line totals ({}) differs from grand total ({})",
                lines_total, self.totals.grand_total
            ));
        }

        let components = self.totals.total_taxable + self.totals.total_tax();
        if components != self.totals.grand_total {
            issues.push(format!(
                "Taxable plus tax ({}) differs from grand total ({})",
                components, self.totals.grand_total
            ));
        }

        if self.totals.total_line_count != self.lines.len() {
            issues.push(format!(
                "Line count ({}) differs from number of lines ({})",
                self.totals.total_line_count,
                self.lines.len()
            ));
        }

        let paged: Vec<&TaxedLine> = self.pages.iter().flat_map(|p| p.lines.iter()).collect();
        if paged.len() != self.lines.len() || paged.iter().zip(&self.lines).any(|(a, b)| *a != b) {
            issues.push("Pages do not reproduce the line sequence".to_string());
        }

        let last_flags = self.pages.iter().filter(|p| p.is_last_page).count();
        if last_flags != 1 || self.pages.last().is_some_and(|p| !p.is_last_page) {
            issues.push("Exactly the final page must be marked as last".to_string());
        }

        issues
    }
}
