//! Document totals as exact sums of the rounded per-line values.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::document::{DocumentTotals, RateBreakdown};
use crate::models::line::TaxedLine;

/// Sum taxed lines into document totals. No rounding happens here.
///
/// Lines from the normalizer are bounded well below `Decimal::MAX`; sums of
/// hand-built lines beyond that saturate instead of panicking.
pub fn aggregate(lines: &[TaxedLine]) -> DocumentTotals {
    let mut totals = DocumentTotals {
        total_line_count: lines.len(),
        ..DocumentTotals::default()
    };
    let mut by_rate: BTreeMap<Decimal, RateBreakdown> = BTreeMap::new();

    for line in lines {
        totals.total_taxable = totals.total_taxable.saturating_add(line.line.taxable_amount);
        totals.total_cgst = totals.total_cgst.saturating_add(line.cgst);
        totals.total_sgst = totals.total_sgst.saturating_add(line.sgst);
        totals.total_igst = totals.total_igst.saturating_add(line.igst);
        totals.grand_total = totals.grand_total.saturating_add(line.line_total);
        totals.total_quantity = totals.total_quantity.saturating_add(line.line.quantity);

        let entry = by_rate
            .entry(line.gst_rate.normalize())
            .or_insert_with(|| RateBreakdown {
                gst_rate: line.gst_rate.normalize(),
                taxable: Decimal::ZERO,
                cgst: Decimal::ZERO,
                sgst: Decimal::ZERO,
                igst: Decimal::ZERO,
                total: Decimal::ZERO,
            });
        entry.taxable = entry.taxable.saturating_add(line.line.taxable_amount);
        entry.cgst = entry.cgst.saturating_add(line.cgst);
        entry.sgst = entry.sgst.saturating_add(line.sgst);
        entry.igst = entry.igst.saturating_add(line.igst);
        entry.total = entry.total.saturating_add(line.line_total);
    }

    totals.by_rate = by_rate.into_values().collect();
    totals
}
