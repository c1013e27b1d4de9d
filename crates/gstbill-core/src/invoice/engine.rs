//! Wires the pipeline: raw records in, [`InvoiceDocument`] out.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use tracing::{debug, info};

use crate::models::config::BillingConfig;
use crate::models::document::{ComputeMetadata, DocumentHeader, InvoiceDocument, TaxRegime};
use crate::models::raw::{InvoiceBundle, RawCompany, RawParty, RawTransaction};

use super::jurisdiction::resolve_regime_for;
use super::normalize::LineNormalizer;
use super::paginate::paginate;
use super::tax::{apply_tax_collecting, GstRateResolver, LineRateResolver};
use super::totals::aggregate;
use super::words::{amount_to_words, words_phrase};

/// Stateless invoice computation with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct InvoiceEngine {
    config: BillingConfig,
}

impl InvoiceEngine {
    pub fn new(config: BillingConfig) -> Self {
        Self { config }
    }

    /// Override the number of lines per page.
    pub fn with_page_size(mut self, items_per_page: usize) -> Self {
        self.config.pagination.items_per_page = items_per_page;
        self
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Compute a document from a bundle.
    pub fn compute_bundle(&self, bundle: &InvoiceBundle) -> InvoiceDocument {
        self.compute(
            &bundle.transaction,
            &bundle.company,
            &bundle.party,
            &bundle.service_names,
        )
    }

    /// Compute a document using line rates, falling back to the configured default.
    pub fn compute(
        &self,
        transaction: &RawTransaction,
        company: &RawCompany,
        party: &RawParty,
        service_names: &HashMap<String, String>,
    ) -> InvoiceDocument {
        let rates = LineRateResolver::new().with_default_rate(self.config.tax.default_gst_rate);
        self.compute_with_rates(transaction, company, party, service_names, &rates)
    }

    /// Compute a document with a caller-supplied rate resolver.
    pub fn compute_with_rates<R>(
        &self,
        transaction: &RawTransaction,
        company: &RawCompany,
        party: &RawParty,
        service_names: &HashMap<String, String>,
        rates: &R,
    ) -> InvoiceDocument
    where
        R: GstRateResolver + ?Sized,
    {
        let mut warnings = Vec::new();

        let resolution = resolve_regime_for(company, party, &self.config.tax, &mut warnings);
        let normalized =
            LineNormalizer::new(service_names).normalize_collecting(transaction, &mut warnings);
        let lines = apply_tax_collecting(&normalized, resolution.regime, rates, &mut warnings);

        // A registered seller with nothing actually taxed prints as a no-tax document.
        let all_untaxed = lines.iter().all(|l| l.total_tax().is_zero());
        let (regime, resolved_regime) = if resolution.regime.is_taxed() && all_untaxed {
            debug!("No line carries tax; reporting document as no-tax");
            (TaxRegime::NoTax, Some(resolution.regime))
        } else {
            (resolution.regime, None)
        };

        let totals = aggregate(&lines);
        let amount_in_words = amount_to_words(totals.grand_total);
        let amount_in_words_phrase = words_phrase(
            &amount_in_words,
            &self.config.words.prefix,
            &self.config.words.suffix,
        );
        let pages = paginate(&lines, self.config.pagination.items_per_page);

        info!(
            "Computed invoice: {} lines, {} pages, grand total {} ({:?})",
            lines.len(),
            pages.len(),
            totals.grand_total,
            regime
        );

        InvoiceDocument {
            header: header_of(transaction),
            seller: resolution.seller,
            buyer: resolution.buyer,
            regime,
            lines,
            totals,
            pages,
            amount_in_words,
            amount_in_words_phrase,
            metadata: ComputeMetadata {
                warnings,
                resolved_regime,
            },
        }
    }
}

fn header_of(transaction: &RawTransaction) -> DocumentHeader {
    DocumentHeader {
        invoice_number: transaction.invoice_number.clone(),
        reference_number: transaction.reference_number.clone(),
        transaction_type: transaction.transaction_type.clone(),
        date: transaction.date.as_deref().and_then(parse_record_date),
        due_date: transaction.due_date.as_deref().and_then(parse_record_date),
        description: transaction.description.clone(),
        notes: transaction.notes.clone(),
    }
}

/// Parse a stored date: RFC 3339 timestamp or a plain calendar date.
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}
