//! Decides the document-wide GST regime from seller and buyer identities.

use tracing::{debug, warn};

use crate::models::config::TaxConfig;
use crate::models::document::TaxRegime;
use crate::models::party::{StateCode, TaxIdentity};
use crate::models::raw::{RawCompany, RawParty, RawTaxProfile};

use super::gstin::{check_gstin, normalize_gstin, state_code_of};
use super::states::{state_code_for_name, state_name_for_code};

/// Regime resolved for a seller/buyer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub regime: TaxRegime,
    pub seller: TaxIdentity,
    pub buyer: TaxIdentity,
}

/// Resolve the regime from GSTINs alone.
///
/// No seller GSTIN means no tax. Differing state prefixes mean IGST;
/// matching prefixes, or a buyer without a usable GSTIN, mean CGST + SGST.
pub fn resolve_regime(seller_gstin: Option<&str>, buyer_gstin: Option<&str>) -> TaxRegime {
    let seller = identity_from_gstin(seller_gstin);
    let buyer = identity_from_gstin(buyer_gstin);
    regime_between(&seller, &buyer, TaxRegime::Intrastate)
}

/// Resolve the regime from full company and party records.
///
/// State codes come from the GSTIN prefix first, then from the free-text
/// state fields. GSTIN problems are reported in `warnings` but never change
/// the outcome.
pub fn resolve_regime_for(
    company: &RawCompany,
    party: &RawParty,
    config: &TaxConfig,
    warnings: &mut Vec<String>,
) -> Resolution {
    let mut seller = identity_of(&company.tax);
    seller.name = company.display_name().map(str::to_string);
    let mut buyer = identity_of(&party.tax);
    buyer.name = party.name.clone();

    if config.validate_gstin {
        for (role, identity) in [("Seller", &seller), ("Buyer", &buyer)] {
            if let Some(gstin) = &identity.gstin {
                if let Err(issue) = check_gstin(gstin) {
                    let message = format!("{} GSTIN {} is invalid: {}", role, gstin, issue);
                    warn!("{}", message);
                    warnings.push(message);
                }
            }
        }
    }

    if seller.is_registered() && buyer.state_code.is_none() {
        let message = format!(
            "Buyer state unknown; applying {}",
            config.unknown_buyer_state.display()
        );
        debug!("{}", message);
        warnings.push(message);
    }

    let regime = regime_between(&seller, &buyer, config.unknown_buyer_state);
    debug!(
        "Resolved regime {:?} (seller state {:?}, buyer state {:?})",
        regime, seller.state_code, buyer.state_code
    );

    Resolution {
        regime,
        seller,
        buyer,
    }
}

/// Regime for two identities. `unknown_buyer` applies when the seller is
/// registered but either state code is missing.
pub fn regime_between(
    seller: &TaxIdentity,
    buyer: &TaxIdentity,
    unknown_buyer: TaxRegime,
) -> TaxRegime {
    if !seller.is_registered() {
        return TaxRegime::NoTax;
    }

    match (seller.state_code, buyer.state_code) {
        (Some(s), Some(b)) if s == b => TaxRegime::Intrastate,
        (Some(_), Some(_)) => TaxRegime::Interstate,
        _ => unknown_buyer,
    }
}

/// Build a tax identity from a record's GSTIN aliases and state fields.
pub fn identity_of(profile: &RawTaxProfile) -> TaxIdentity {
    let gstin = profile.gstin().map(normalize_gstin);

    let state_code = gstin
        .as_deref()
        .and_then(state_code_of)
        .or_else(|| profile.state_code.as_deref().and_then(state_code_for_name))
        .or_else(|| profile.state.as_deref().and_then(state_code_for_name));

    TaxIdentity {
        name: None,
        gstin,
        state_code,
        state_name: state_display_name(state_code, profile.state.as_deref()),
    }
}

fn identity_from_gstin(gstin: Option<&str>) -> TaxIdentity {
    let gstin = gstin
        .map(normalize_gstin)
        .filter(|g| !g.is_empty());
    let state_code = gstin.as_deref().and_then(state_code_of);

    TaxIdentity {
        name: None,
        gstin,
        state_code,
        state_name: state_display_name(state_code, None),
    }
}

fn state_display_name(code: Option<StateCode>, raw: Option<&str>) -> Option<String> {
    code.and_then(state_name_for_code)
        .map(str::to_string)
        .or_else(|| raw.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gstin_only_regimes() {
        assert_eq!(
            resolve_regime(Some("27AAPFU0939F1ZV"), Some("07AAACR5055K1Z9")),
            TaxRegime::Interstate
        );
        assert_eq!(
            resolve_regime(Some("27AAPFU0939F1ZV"), Some("27AAACR5055K1Z7")),
            TaxRegime::Intrastate
        );
        assert_eq!(resolve_regime(None, Some("27AAACR5055K1Z7")), TaxRegime::NoTax);
        assert_eq!(resolve_regime(None, None), TaxRegime::NoTax);
        assert_eq!(resolve_regime(Some("  "), None), TaxRegime::NoTax);
        assert_eq!(
            resolve_regime(Some("27AAPFU0939F1ZV"), None),
            TaxRegime::Intrastate
        );
    }

    #[test]
    fn test_state_name_fallback_for_buyer() {
        let company: RawCompany = serde_json::from_value(json!({
            "businessName": "Acme",
            "gstin": "27AAPFU0939F1ZV"
        }))
        .unwrap();

        let local: RawParty = serde_json::from_value(json!({ "name": "Walk-in", "state": "maharashtra" })).unwrap();
        let remote: RawParty = serde_json::from_value(json!({ "name": "Far", "state": "Karnataka" })).unwrap();

        let mut warnings = Vec::new();
        let config = TaxConfig::default();

        let resolution = resolve_regime_for(&company, &local, &config, &mut warnings);
        assert_eq!(resolution.regime, TaxRegime::Intrastate);
        assert_eq!(resolution.buyer.state_name.as_deref(), Some("Maharashtra"));
        assert_eq!(resolution.seller.name.as_deref(), Some("Acme"));

        let resolution = resolve_regime_for(&company, &remote, &config, &mut warnings);
        assert_eq!(resolution.regime, TaxRegime::Interstate);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_buyer_state_follows_config() {
        let company: RawCompany =
            serde_json::from_value(json!({ "gstIn": "27AAPFU0939F1ZV" })).unwrap();
        let party = RawParty::default();

        let mut config = TaxConfig::default();
        let mut warnings = Vec::new();
        assert_eq!(
            resolve_regime_for(&company, &party, &config, &mut warnings).regime,
            TaxRegime::Intrastate
        );
        assert_eq!(warnings.len(), 1);

        config.unknown_buyer_state = TaxRegime::Interstate;
        assert_eq!(
            resolve_regime_for(&company, &party, &config, &mut warnings).regime,
            TaxRegime::Interstate
        );
    }

    #[test]
    fn test_seller_state_from_name_when_gstin_prefix_unusable() {
        let company: RawCompany = serde_json::from_value(json!({
            "gstNumber": "PENDING",
            "state": "Delhi"
        }))
        .unwrap();
        let party: RawParty =
            serde_json::from_value(json!({ "gstin": "07AAACR5055K1Z9" })).unwrap();

        let mut warnings = Vec::new();
        let resolution = resolve_regime_for(&company, &party, &TaxConfig::default(), &mut warnings);
        assert_eq!(resolution.regime, TaxRegime::Intrastate);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_gstin_prefix_beats_state_text() {
        let profile: RawTaxProfile = serde_json::from_value(json!({
            "gstin": "29aagcb7383j1z4",
            "state": "Maharashtra"
        }))
        .unwrap();

        let identity = identity_of(&profile);
        assert_eq!(identity.gstin.as_deref(), Some("29AAGCB7383J1Z4"));
        assert_eq!(identity.state_code.map(|c| c.value()), Some(29));
        assert_eq!(identity.state_name.as_deref(), Some("Karnataka"));
    }

    #[test]
    fn test_invalid_gstin_warns_but_keeps_regime() {
        let company: RawCompany =
            serde_json::from_value(json!({ "gstin": "27AAPFU0939F1ZV" })).unwrap();
        let party: RawParty =
            serde_json::from_value(json!({ "gstin": "07AAACR5055K1Z0" })).unwrap();

        let mut warnings = Vec::new();
        let resolution = resolve_regime_for(&company, &party, &TaxConfig::default(), &mut warnings);
        assert_eq!(resolution.regime, TaxRegime::Interstate);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Buyer GSTIN"));
    }
}
