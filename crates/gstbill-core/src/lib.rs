//! Core library for GST invoice computation.
//!
//! This crate provides:
//! - Line normalization across the historical transaction layouts
//! - GST regime resolution from GSTINs and state names (CGST+SGST, IGST, none)
//! - Per-line tax, document totals and a per-rate breakdown
//! - Amount in words (Indian numbering) and fixed-size pagination
//!
//! The pipeline is pure and synchronous: every call builds a fresh
//! [`InvoiceDocument`] and never fails on incomplete data.

pub mod error;
pub mod invoice;
pub mod models;

pub use error::{GstBillError, Result};
pub use invoice::{GstRateResolver, InvoiceEngine, LineNormalizer, LineRateResolver};
pub use models::config::BillingConfig;
pub use models::document::{DocumentTotals, InvoiceDocument, Page, TaxRegime};
pub use models::line::{LineKind, NormalizedLine, TaxedLine};
pub use models::party::{StateCode, TaxIdentity};
pub use models::raw::{InvoiceBundle, RawCompany, RawParty, RawTransaction};
