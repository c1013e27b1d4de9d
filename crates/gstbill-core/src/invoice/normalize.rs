//! Reconciles the historical line layouts into one ordered list of
//! [`NormalizedLine`]s.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::line::{LineKind, NormalizedLine};
use crate::models::raw::{LineShape, RawLine, RawRef, RawTransaction};

use super::amounts::{round_paise, within_bounds};

/// Name used when nothing better can be resolved.
pub const FALLBACK_NAME: &str = "Item";

/// Line normalizer bound to a caller-owned service name lookup.
pub struct LineNormalizer<'a> {
    service_names: &'a HashMap<String, String>,
}

impl<'a> LineNormalizer<'a> {
    pub fn new(service_names: &'a HashMap<String, String>) -> Self {
        Self { service_names }
    }

    /// Normalize every line of a transaction.
    pub fn normalize(&self, raw: &RawTransaction) -> Vec<NormalizedLine> {
        self.normalize_collecting(raw, &mut Vec::new())
    }

    /// Normalize, appending data-quality warnings to `warnings`.
    pub fn normalize_collecting(
        &self,
        raw: &RawTransaction,
        warnings: &mut Vec<String>,
    ) -> Vec<NormalizedLine> {
        match raw.shape() {
            LineShape::Unified(items) => {
                if !raw.products.is_empty() || !raw.services.is_empty() || !raw.service.is_empty() {
                    debug!("Transaction has unified items; ignoring legacy product/service arrays");
                }
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.normalize_line(item, unified_kind(item), i + 1, warnings))
                    .collect()
            }
            LineShape::Split { products, services } => {
                let products = products
                    .iter()
                    .map(|line| (line, LineKind::Product));
                let services = services
                    .iter()
                    .map(|line| (line, LineKind::Service));

                products
                    .chain(services)
                    .enumerate()
                    .map(|(i, (line, kind))| self.normalize_line(line, kind, i + 1, warnings))
                    .collect()
            }
        }
    }

    /// Normalize one raw line. `serial` is 1-based and only used in warnings.
    pub fn normalize_line(
        &self,
        raw: &RawLine,
        kind: LineKind,
        serial: usize,
        warnings: &mut Vec<String>,
    ) -> NormalizedLine {
        let reference = primary_ref(raw, kind);
        let name = self.resolve_name(raw, reference);

        let price = raw.unit_price();
        let given_quantity = match raw.quantity.filter(|q| *q > Decimal::ZERO) {
            Some(quantity) if !within_bounds(quantity) => {
                record(
                    warnings,
                    format!("Line {}: quantity {} out of range; ignored", serial, quantity),
                );
                None
            }
            quantity => quantity,
        };

        // Services are never unit-counted, but a recorded quantity still
        // scales the amount when only a rate was stored.
        let amount_quantity = match kind {
            LineKind::Service => given_quantity.unwrap_or(Decimal::ONE),
            LineKind::Product => given_quantity.unwrap_or(Decimal::ZERO),
        };
        let stated = match raw.amount {
            Some(amount) => Some(amount),
            None => price.unwrap_or(Decimal::ZERO).checked_mul(amount_quantity),
        };
        let taxable_amount = match stated.map(round_paise).filter(|a| within_bounds(*a)) {
            Some(amount) => amount,
            None => {
                record(
                    warnings,
                    format!("Line {}: amount out of range; taken as 0", serial),
                );
                Decimal::ZERO
            }
        };

        let (quantity, unit_price) = match kind {
            LineKind::Service => (Decimal::ONE, taxable_amount),
            LineKind::Product => match given_quantity {
                Some(quantity) => {
                    let unit_price = match price {
                        Some(p) if p.checked_mul(quantity).map(round_paise) == Some(taxable_amount) => p,
                        Some(p) => {
                            record(
                                warnings,
                                format!(
                                    "Line {}: amount {} does not match {} x {}; unit price derived from amount",
                                    serial, taxable_amount, quantity, p
                                ),
                            );
                            per_unit(taxable_amount, quantity, serial, warnings)
                        }
                        None => {
                            debug!("Line {}: unit price derived from amount", serial);
                            per_unit(taxable_amount, quantity, serial, warnings)
                        }
                    };
                    (quantity, unit_price)
                }
                None => (Decimal::ZERO, Decimal::ZERO),
            },
        };

        let doc = reference.and_then(RawRef::doc);
        let gst_rate_hint = raw
            .gst_rate_hint()
            .or_else(|| doc.and_then(|d| d.gst_percentage.or(d.gst_rate)));
        let hsn_sac = match kind {
            LineKind::Product => raw.hsn.clone().or_else(|| doc.and_then(|d| d.hsn.clone())),
            LineKind::Service => raw.sac.clone().or_else(|| doc.and_then(|d| d.sac.clone())),
        };
        let unit = raw
            .unit_type
            .clone()
            .or_else(|| doc.and_then(|d| d.unit_type.clone()));

        NormalizedLine {
            kind,
            name,
            quantity,
            unit_price,
            taxable_amount,
            description: raw.description.clone(),
            gst_rate_hint,
            hsn_sac,
            unit,
        }
    }

    /// Explicit name, then populated sub-document name, then id lookup,
    /// then [`FALLBACK_NAME`].
    fn resolve_name(&self, raw: &RawLine, reference: Option<&RawRef>) -> String {
        raw.name
            .as_deref()
            .or_else(|| reference.and_then(RawRef::name))
            .or_else(|| {
                reference
                    .and_then(RawRef::id)
                    .and_then(|id| self.service_names.get(id))
                    .map(String::as_str)
                    .filter(|name| !name.trim().is_empty())
            })
            .unwrap_or(FALLBACK_NAME)
            .to_string()
    }
}

/// Normalize a transaction's lines.
pub fn normalize(
    raw: &RawTransaction,
    service_names: &HashMap<String, String>,
) -> Vec<NormalizedLine> {
    LineNormalizer::new(service_names).normalize(raw)
}

/// `amount / quantity`, or 0 when the quotient does not fit.
fn per_unit(amount: Decimal, quantity: Decimal, serial: usize, warnings: &mut Vec<String>) -> Decimal {
    amount.checked_div(quantity).unwrap_or_else(|| {
        record(
            warnings,
            format!("Line {}: unit price out of range; taken as 0", serial),
        );
        Decimal::ZERO
    })
}

fn record(warnings: &mut Vec<String>, message: String) {
    warn!("{}", message);
    warnings.push(message);
}

/// Kind of a unified line: explicit `type`, else whichever reference is set.
fn unified_kind(item: &RawLine) -> LineKind {
    if let Some(kind) = item.kind.as_deref().and_then(LineKind::from_str) {
        return kind;
    }
    match (&item.product, &item.service) {
        (None, Some(_)) => LineKind::Service,
        _ => LineKind::Product,
    }
}

/// The reference matching the line's kind, falling back to the other one.
fn primary_ref(raw: &RawLine, kind: LineKind) -> Option<&RawRef> {
    match kind {
        LineKind::Product => raw.product.as_ref().or(raw.service.as_ref()),
        LineKind::Service => raw.service.as_ref().or(raw.product.as_ref()),
    }
}
