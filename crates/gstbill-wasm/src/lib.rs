//! WASM bindings for GST invoice computation.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use gstbill_core::invoice::gstin::{check_gstin, normalize_gstin, state_code_of};
use gstbill_core::invoice::{amount_to_words as words_for, parse_amount, state_name_for_code};
use gstbill_core::{BillingConfig, InvoiceBundle, InvoiceDocument, InvoiceEngine};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Plain objects on the JS side, so `by_rate` is not turned into a `Map`.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(to_js_error)
}

/// Bundles arrive as loose JS objects; route them through `serde_json` so the
/// lenient field parsers see the same input they see from files.
fn bundle_from_js(bundle: JsValue) -> Result<InvoiceBundle, JsValue> {
    let json: serde_json::Value = serde_wasm_bindgen::from_value(bundle).map_err(to_js_error)?;
    serde_json::from_value(json).map_err(to_js_error)
}

/// Compute an invoice document from `{ transaction, company, party, serviceNames }`.
#[wasm_bindgen]
pub fn compute_invoice(bundle: JsValue) -> Result<JsValue, JsValue> {
    let bundle = bundle_from_js(bundle)?;
    let document = InvoiceEngine::new(BillingConfig::default()).compute_bundle(&bundle);
    to_js(&document)
}

/// Same as `compute_invoice`, JSON string in and out.
#[wasm_bindgen]
pub fn compute_invoice_json(bundle: &str) -> Result<String, JsValue> {
    let bundle = InvoiceBundle::from_json(bundle).map_err(to_js_error)?;
    let document = InvoiceEngine::new(BillingConfig::default()).compute_bundle(&bundle);
    serde_json::to_string(&document).map_err(to_js_error)
}

/// Amount in words, Indian numbering, whole rupees only (e.g. "1,23,456.78").
#[wasm_bindgen]
pub fn amount_in_words(amount: &str) -> Result<String, JsValue> {
    let value = parse_amount(amount)
        .ok_or_else(|| JsValue::from_str(&format!("Not a valid amount: {}", amount)))?;
    if value.is_sign_negative() {
        return Err(JsValue::from_str("Amount must not be negative"));
    }
    Ok(words_for(value))
}

/// Validate a GSTIN (layout and check character).
#[wasm_bindgen]
pub fn validate_gstin(gstin: &str) -> bool {
    gstbill_core::invoice::validate_gstin(gstin)
}

/// Explain a GSTIN: `{ gstin, valid, issue, state_code, state_name }`.
#[wasm_bindgen]
pub fn describe_gstin(gstin: &str) -> Result<JsValue, JsValue> {
    #[derive(Serialize)]
    struct GstinInfo {
        gstin: String,
        valid: bool,
        issue: Option<String>,
        state_code: Option<u8>,
        state_name: Option<&'static str>,
    }

    let gstin = normalize_gstin(gstin);
    let issue = check_gstin(&gstin).err().map(|e| e.to_string());
    let state_code = state_code_of(&gstin);

    to_js(&GstinInfo {
        valid: issue.is_none(),
        issue,
        state_code: state_code.map(|c| c.value()),
        state_name: state_code.and_then(state_name_for_code),
        gstin,
    })
}

/// Tax regime between two GSTINs: "no_tax", "intrastate" or "interstate".
#[wasm_bindgen]
pub fn resolve_regime(seller_gstin: Option<String>, buyer_gstin: Option<String>) -> String {
    let regime =
        gstbill_core::invoice::resolve_regime(seller_gstin.as_deref(), buyer_gstin.as_deref());
    regime.key().to_string()
}

/// Invoice computer class for browser use.
#[wasm_bindgen]
pub struct InvoiceComputer {
    engine: InvoiceEngine,
}

#[wasm_bindgen]
impl InvoiceComputer {
    /// Create a computer with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: InvoiceEngine::new(BillingConfig::default()),
        }
    }

    /// Create a computer from a configuration object (same shape as the config file).
    #[wasm_bindgen]
    pub fn with_config(config: JsValue) -> Result<InvoiceComputer, JsValue> {
        let json: serde_json::Value =
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?;
        let config: BillingConfig = serde_json::from_value(json).map_err(to_js_error)?;
        config.validate().map_err(to_js_error)?;
        Ok(Self {
            engine: InvoiceEngine::new(config),
        })
    }

    /// Set the number of lines per page.
    #[wasm_bindgen]
    pub fn set_page_size(&mut self, items_per_page: usize) -> Result<(), JsValue> {
        if items_per_page == 0 {
            return Err(JsValue::from_str("Page size must be at least 1"));
        }
        let config = self.engine.config().clone();
        self.engine = InvoiceEngine::new(config).with_page_size(items_per_page);
        Ok(())
    }

    /// Current configuration.
    #[wasm_bindgen]
    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.config())
    }

    /// Compute an invoice document.
    #[wasm_bindgen]
    pub fn compute(&self, bundle: JsValue) -> Result<JsValue, JsValue> {
        let bundle = bundle_from_js(bundle)?;
        to_js(&self.compute_document(&bundle))
    }

    /// Compute and list invariant violations (empty when the document is consistent).
    #[wasm_bindgen]
    pub fn verify(&self, bundle: JsValue) -> Result<Vec<String>, JsValue> {
        let bundle = bundle_from_js(bundle)?;
        Ok(self.compute_document(&bundle).verify())
    }
}

impl InvoiceComputer {
    fn compute_document(&self, bundle: &InvoiceBundle) -> InvoiceDocument {
        self.engine.compute_bundle(bundle)
    }
}

impl Default for InvoiceComputer {
    fn default() -> Self {
        Self::new()
    }
}
