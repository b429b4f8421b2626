//! # Price Text Extractor
//!
//! Pulls the base price out of a fetched page using a configured pattern.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "...لجرام الذهب عيار 21 هو ٥٤١٥ جنيها"      pattern: "هو (\S+)"       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  compile pattern ─────────── empty / invalid → ParseFailure            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  first match, first group ── nothing → ParseFailure::NoMatch           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  "٥٤١٥" → "5415"  (Arabic-Indic digits normalized)                     │
//! │  keep digits and '.' ─────── empty / not a number → NotNumeric         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  5415 > 0 ? ──────────────── no → NotPositive                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No fetching happens here; the caller supplies the text.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ParseFailure;

/// Extracts a positive price from `text` using `pattern`.
///
/// If the pattern has capturing groups the first group is used, otherwise the
/// whole match. Thousands separators, currency symbols and spaces inside the
/// matched text are dropped before parsing.
///
/// ## Example
/// ```rust
/// use aurum_core::extract::extract_price;
/// use rust_decimal::Decimal;
///
/// let text = "علما بأن سعر البيع لجرام الذهب عيار 21 هو 5415 جنيها";
/// let price = extract_price(text, r"هو (\d+)").unwrap();
/// assert_eq!(price, Decimal::from(5415));
/// ```
pub fn extract_price(text: &str, pattern: &str) -> Result<Decimal, ParseFailure> {
    let regex = compile_pattern(pattern)?;

    let captures = regex.captures(text).ok_or(ParseFailure::NoMatch)?;
    let matched = if captures.len() > 1 {
        captures.get(1).ok_or(ParseFailure::NoMatch)?
    } else {
        captures.get(0).ok_or(ParseFailure::NoMatch)?
    };

    parse_amount(matched.as_str())
}

/// Compiles a price pattern, rejecting blank ones.
pub fn compile_pattern(pattern: &str) -> Result<Regex, ParseFailure> {
    if pattern.trim().is_empty() {
        return Err(ParseFailure::EmptyPattern);
    }

    Regex::new(pattern).map_err(|e| ParseFailure::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Parses matched text into a positive amount.
fn parse_amount(matched: &str) -> Result<Decimal, ParseFailure> {
    let cleaned: String = matched
        .chars()
        .filter_map(normalize_char)
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return Err(ParseFailure::NotNumeric {
            matched: matched.to_string(),
        });
    }

    let value = Decimal::from_str(&cleaned).map_err(|_| ParseFailure::NotNumeric {
        matched: matched.to_string(),
    })?;

    if value <= Decimal::ZERO {
        return Err(ParseFailure::NotPositive { value });
    }

    Ok(value.normalize())
}

/// Maps Arabic-Indic and Eastern Arabic-Indic digits to ASCII, and the Arabic
/// decimal separator to `'.'`.
fn normalize_char(c: char) -> Option<char> {
    match c {
        '\u{0660}'..='\u{0669}' => char::from_digit(c as u32 - 0x0660, 10),
        '\u{06F0}'..='\u{06F9}' => char::from_digit(c as u32 - 0x06F0, 10),
        '\u{066B}' => Some('.'),
        _ => Some(c),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ARABIC_PAGE: &str = "علما بأن سعر البيع لجرام الذهب عيار 21 هو 5415 جنيها";

    #[test]
    fn test_extract_price_from_arabic_text() {
        assert_eq!(extract_price(ARABIC_PAGE, r"هو (\d+)").unwrap(), dec!(5415));
        assert_eq!(
            extract_price(ARABIC_PAGE, r"(?:الذهب عيار 21 هو )(\d+)").unwrap(),
            dec!(5415)
        );
    }

    #[test]
    fn test_whole_match_without_groups() {
        assert_eq!(
            extract_price("Gold: 5000 EGP", r"\d{4}").unwrap(),
            dec!(5000)
        );
    }

    #[test]
    fn test_separators_and_symbols_are_stripped() {
        let html = r#"<span class="price">EGP 5,415.50</span>"#;
        assert_eq!(
            extract_price(html, r#"class="price">([^<]+)<"#).unwrap(),
            dec!(5415.5)
        );
    }

    #[test]
    fn test_arabic_indic_digits() {
        let text = "سعر الجرام هو ٥٤١٥٫٥ جنيها";
        assert_eq!(extract_price(text, r"هو (\S+)").unwrap(), dec!(5415.5));
    }

    #[test]
    fn test_empty_pattern() {
        assert_eq!(
            extract_price(ARABIC_PAGE, "   "),
            Err(ParseFailure::EmptyPattern)
        );
        assert_eq!(
            extract_price(ARABIC_PAGE, ""),
            Err(ParseFailure::EmptyPattern)
        );
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            extract_price(ARABIC_PAGE, r"هو (\d+"),
            Err(ParseFailure::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(
            extract_price("No price information available", r"هو (\d+)"),
            Err(ParseFailure::NoMatch)
        );
        assert_eq!(extract_price("", r"\d+"), Err(ParseFailure::NoMatch));
    }

    #[test]
    fn test_matched_text_not_numeric() {
        assert!(matches!(
            extract_price("price: n/a", r"price: (\S+)"),
            Err(ParseFailure::NotNumeric { .. })
        ));
        assert!(matches!(
            extract_price("price: 1.2.3", r"price: (\S+)"),
            Err(ParseFailure::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_zero_price_rejected() {
        assert_eq!(
            extract_price("price: 0", r"price: (\d+)"),
            Err(ParseFailure::NotPositive { value: dec!(0) })
        );
    }

    #[test]
    fn test_optional_group_that_did_not_participate() {
        assert_eq!(
            extract_price("price: 12", r"price: (x)?\d+"),
            Err(ParseFailure::NoMatch)
        );
    }
}
