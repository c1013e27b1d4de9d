//! Per-line GST under a document-wide regime.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::document::TaxRegime;
use crate::models::line::{NormalizedLine, TaxedLine};

use super::amounts::round_paise;

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Supplies the GST rate (percent) for a line.
pub trait GstRateResolver {
    /// `None` when the line has no known rate; it is then taxed at 0.
    fn gst_rate(&self, line: &NormalizedLine) -> Option<Decimal>;
}

impl<F> GstRateResolver for F
where
    F: Fn(&NormalizedLine) -> Option<Decimal>,
{
    fn gst_rate(&self, line: &NormalizedLine) -> Option<Decimal> {
        self(line)
    }
}

/// Uses the rate recorded on the line, else a configured default.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRateResolver {
    default_rate: Option<Decimal>,
}

impl LineRateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rate for lines that carry none.
    pub fn with_default_rate(mut self, rate: Option<Decimal>) -> Self {
        self.default_rate = rate;
        self
    }
}

impl GstRateResolver for LineRateResolver {
    fn gst_rate(&self, line: &NormalizedLine) -> Option<Decimal> {
        line.gst_rate_hint.or(self.default_rate)
    }
}

/// Apply GST to every line under one regime.
pub fn apply_tax<R>(lines: &[NormalizedLine], regime: TaxRegime, rates: &R) -> Vec<TaxedLine>
where
    R: GstRateResolver + ?Sized,
{
    apply_tax_collecting(lines, regime, rates, &mut Vec::new())
}

/// Apply GST, appending a warning for each line taxed at 0 for lack of a
/// usable rate. Rates outside 0..=100 percent count as unusable.
pub fn apply_tax_collecting<R>(
    lines: &[NormalizedLine],
    regime: TaxRegime,
    rates: &R,
    warnings: &mut Vec<String>,
) -> Vec<TaxedLine>
where
    R: GstRateResolver + ?Sized,
{
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let rate = match (regime.is_taxed(), rates.gst_rate(line)) {
                (false, _) => Decimal::ZERO,
                (true, Some(rate)) if rate >= Decimal::ZERO && rate <= PERCENT => rate,
                (true, Some(rate)) => {
                    let message =
                        format!("Line {}: GST rate {} out of range, taxed at 0", i + 1, rate);
                    warn!("{}", message);
                    warnings.push(message);
                    Decimal::ZERO
                }
                (true, None) => {
                    let message = format!("Line {} ({}): no GST rate, taxed at 0", i + 1, line.name);
                    warn!("{}", message);
                    warnings.push(message);
                    Decimal::ZERO
                }
            };
            checked_tax_line(line, regime, rate).unwrap_or_else(|| {
                let message = format!("Line {}: tax out of range, taxed at 0", i + 1);
                warn!("{}", message);
                warnings.push(message);
                untaxed(line)
            })
        })
        .collect()
}

/// Tax one line at `gst_rate` percent. A line whose tax does not fit in a
/// `Decimal` is returned untaxed.
///
/// Intrastate CGST and SGST are each rounded from half the rate, not by
/// halving a rounded total.
pub fn tax_line(line: &NormalizedLine, regime: TaxRegime, gst_rate: Decimal) -> TaxedLine {
    checked_tax_line(line, regime, gst_rate).unwrap_or_else(|| untaxed(line))
}

/// Tax one line, or `None` when an intermediate amount overflows.
pub fn checked_tax_line(
    line: &NormalizedLine,
    regime: TaxRegime,
    gst_rate: Decimal,
) -> Option<TaxedLine> {
    let taxable = line.taxable_amount;

    let (gst_rate, cgst, sgst, igst) = match regime {
        TaxRegime::NoTax => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        TaxRegime::Intrastate => {
            let half = taxable
                .checked_mul(gst_rate)?
                .checked_div(PERCENT * Decimal::TWO)?;
            let half = round_paise(half);
            (gst_rate, half, half, Decimal::ZERO)
        }
        TaxRegime::Interstate => {
            let igst = round_paise(taxable.checked_mul(gst_rate)?.checked_div(PERCENT)?);
            (gst_rate, Decimal::ZERO, Decimal::ZERO, igst)
        }
    };

    let line_total = taxable
        .checked_add(cgst)?
        .checked_add(sgst)?
        .checked_add(igst)?;

    Some(TaxedLine {
        line: line.clone(),
        gst_rate,
        cgst,
        sgst,
        igst,
        line_total,
    })
}

fn untaxed(line: &NormalizedLine) -> TaxedLine {
    TaxedLine {
        line: line.clone(),
        gst_rate: Decimal::ZERO,
        cgst: Decimal::ZERO,
        sgst: Decimal::ZERO,
        igst: Decimal::ZERO,
        line_total: line.taxable_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::line::LineKind;
    use std::str::FromStr;

    fn line(taxable: i64, hint: Option<i64>) -> NormalizedLine {
        NormalizedLine {
            kind: LineKind::Product,
            name: "Item".to_string(),
            quantity: Decimal::ONE,
            unit_price: Decimal::from(taxable),
            taxable_amount: Decimal::from(taxable),
            description: None,
            gst_rate_hint: hint.map(Decimal::from),
            hsn_sac: None,
            unit: None,
        }
    }

    #[test]
    fn test_intrastate_split() {
        let taxed = tax_line(&line(1000, None), TaxRegime::Intrastate, Decimal::from(18));
        assert_eq!(taxed.cgst, Decimal::from_str("90.00").unwrap());
        assert_eq!(taxed.sgst, Decimal::from_str("90.00").unwrap());
        assert_eq!(taxed.igst, Decimal::ZERO);
        assert_eq!(taxed.line_total, Decimal::from(1180));
    }

    #[test]
    fn test_intrastate_halves_round_independently() {
        // 0.05 * 5% = 0.0025 -> each half 0.00125 -> 0.00
        let mut small = line(0, None);
        small.taxable_amount = Decimal::new(5, 2);
        let taxed = tax_line(&small, TaxRegime::Intrastate, Decimal::from(5));
        assert_eq!(taxed.cgst, Decimal::ZERO);

        // 333.33 at 5%: half = 8.33325 -> 8.33 each
        let mut odd = line(0, None);
        odd.taxable_amount = Decimal::new(33333, 2);
        let taxed = tax_line(&odd, TaxRegime::Intrastate, Decimal::from(5));
        assert_eq!(taxed.cgst, Decimal::new(833, 2));
        assert_eq!(taxed.sgst, Decimal::new(833, 2));
        assert_eq!(taxed.line_total, Decimal::new(34999, 2));
    }

    #[test]
    fn test_interstate() {
        let taxed = tax_line(&line(1000, None), TaxRegime::Interstate, Decimal::from(18));
        assert_eq!(taxed.igst, Decimal::from(180));
        assert_eq!(taxed.cgst, Decimal::ZERO);
        assert_eq!(taxed.sgst, Decimal::ZERO);
        assert_eq!(taxed.line_total, Decimal::from(1180));
    }

    #[test]
    fn test_no_tax_ignores_rate() {
        let taxed = tax_line(&line(1000, Some(18)), TaxRegime::NoTax, Decimal::from(18));
        assert_eq!(taxed.gst_rate, Decimal::ZERO);
        assert_eq!(taxed.total_tax(), Decimal::ZERO);
        assert_eq!(taxed.line_total, Decimal::from(1000));
    }

    #[test]
    fn test_missing_rate_is_zero_with_warning() {
        let lines = vec![line(1000, Some(12)), line(500, None)];
        let mut warnings = Vec::new();
        let taxed = apply_tax_collecting(
            &lines,
            TaxRegime::Interstate,
            &LineRateResolver::new(),
            &mut warnings,
        );

        assert_eq!(taxed[0].igst, Decimal::from(120));
        assert_eq!(taxed[1].igst, Decimal::ZERO);
        assert_eq!(taxed[1].line_total, Decimal::from(500));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_default_rate_and_closure_resolver() {
        let lines = vec![line(200, None)];

        let resolver = LineRateResolver::new().with_default_rate(Some(Decimal::from(5)));
        let taxed = apply_tax(&lines, TaxRegime::Interstate, &resolver);
        assert_eq!(taxed[0].igst, Decimal::from(10));

        let flat = |_: &NormalizedLine| Some(Decimal::from(28));
        let taxed = apply_tax(&lines, TaxRegime::Intrastate, &flat);
        assert_eq!(taxed[0].cgst, Decimal::from(28));
        assert_eq!(taxed[0].sgst, Decimal::from(28));
    }

    #[test]
    fn test_no_tax_never_warns() {
        let mut warnings = Vec::new();
        apply_tax_collecting(&[line(10, None)], TaxRegime::NoTax, &LineRateResolver::new(), &mut warnings);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_out_of_range_rates_are_zero_with_warning() {
        let lines = vec![line(1000, Some(1000)), line(1000, Some(-5)), line(1000, Some(100))];
        let mut warnings = Vec::new();
        let taxed = apply_tax_collecting(
            &lines,
            TaxRegime::Interstate,
            &LineRateResolver::new(),
            &mut warnings,
        );

        assert_eq!(taxed[0].igst, Decimal::ZERO);
        assert_eq!(taxed[1].igst, Decimal::ZERO);
        assert_eq!(taxed[2].igst, Decimal::from(1000));
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_overflowing_tax_leaves_line_untaxed() {
        let mut huge = line(0, Some(18));
        huge.taxable_amount = Decimal::from_str("70000000000000000000000000000").unwrap();

        assert!(checked_tax_line(&huge, TaxRegime::Interstate, Decimal::from(18)).is_none());

        let taxed = tax_line(&huge, TaxRegime::Intrastate, Decimal::from(18));
        assert_eq!(taxed.total_tax(), Decimal::ZERO);
        assert_eq!(taxed.line_total, huge.taxable_amount);

        let mut warnings = Vec::new();
        let taxed = apply_tax_collecting(
            &[huge],
            TaxRegime::Interstate,
            &LineRateResolver::new(),
            &mut warnings,
        );
        assert_eq!(taxed[0].gst_rate, Decimal::ZERO);
        assert_eq!(warnings, vec!["Line 1: tax out of range, taxed at 0".to_string()]);
    }
}
