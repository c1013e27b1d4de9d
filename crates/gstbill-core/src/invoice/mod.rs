//! Invoice computation pipeline.
//!
//! Data flows one way: raw transaction -> [`normalize`] -> [`jurisdiction`]
//! and [`tax`] -> [`totals`], [`words`] and [`paginate`] -> [`InvoiceDocument`].
//!
//! [`InvoiceDocument`]: crate::models::document::InvoiceDocument

pub mod amounts;
pub mod engine;
pub mod gstin;
pub mod jurisdiction;
pub mod normalize;
pub mod paginate;
pub mod states;
pub mod tax;
pub mod totals;
pub mod words;

pub use amounts::{format_amount, parse_amount, round_paise};
pub use engine::InvoiceEngine;
pub use gstin::{check_gstin, normalize_gstin, validate_gstin, GstinIssue};
pub use jurisdiction::{resolve_regime, resolve_regime_for, Resolution};
pub use normalize::{normalize, LineNormalizer};
pub use paginate::paginate;
pub use states::{state_code_for_name, state_name_for_code};
pub use tax::{apply_tax, checked_tax_line, tax_line, GstRateResolver, LineRateResolver};
pub use totals::aggregate;
pub use words::{amount_to_words, to_words};
