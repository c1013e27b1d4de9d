//! GSTIN (Goods and Services Tax Identification Number) validation.
//!
//! Layout: 2-digit state code, 10-character PAN, entity number,
//! the letter `Z`, and a mod-36 check character.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::models::party::StateCode;

lazy_static! {
    pub static ref GSTIN_PATTERN: Regex = Regex::new(
        r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$"
    ).unwrap();
}

const GSTIN_LEN: usize = 15;
const CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Why a GSTIN failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GstinIssue {
    #[error("expected 15 characters, found {0}")]
    Length(usize),

    #[error("does not match the GSTIN layout")]
    Format,

    #[error("check character is {found}, expected {expected}")]
    Checksum { expected: char, found: char },
}

/// Upper-case a GSTIN and strip whitespace and dashes.
pub fn normalize_gstin(gstin: &str) -> String {
    gstin
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Check a GSTIN's layout and check character.
pub fn check_gstin(gstin: &str) -> Result<(), GstinIssue> {
    let gstin = normalize_gstin(gstin);
    let len = gstin.chars().count();
    if len != GSTIN_LEN {
        return Err(GstinIssue::Length(len));
    }

    if !GSTIN_PATTERN.is_match(&gstin) {
        return Err(GstinIssue::Format);
    }

    let expected = gstin_check_char(&gstin[..14]).ok_or(GstinIssue::Format)?;
    let found = gstin.as_bytes()[14] as char;
    if expected != found {
        return Err(GstinIssue::Checksum { expected, found });
    }

    Ok(())
}

/// Validate a GSTIN.
pub fn validate_gstin(gstin: &str) -> bool {
    check_gstin(gstin).is_ok()
}

/// Compute the check character for the first 14 characters of a GSTIN.
///
/// Odd positions are weighted 1, even positions 2; each product is folded
/// into base 36 (quotient plus remainder) before summing.
pub fn gstin_check_char(first14: &str) -> Option<char> {
    if first14.len() != 14 {
        return None;
    }

    let mut sum = 0u32;
    for (i, c) in first14.chars().enumerate() {
        let value = CHARSET.find(c)? as u32;
        let product = value * if i % 2 == 0 { 1 } else { 2 };
        sum += product / 36 + product % 36;
    }

    let check = ((36 - sum % 36) % 36) as usize;
    CHARSET.chars().nth(check)
}

/// State code encoded in the first two characters of a GSTIN.
pub fn state_code_of(gstin: &str) -> Option<StateCode> {
    let gstin = normalize_gstin(gstin);
    let prefix = gstin.get(..2)?;
    StateCode::parse(prefix).filter(|_| prefix.len() == 2)
}
