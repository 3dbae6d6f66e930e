//! Display helpers for clocks and money.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ProjectionError;
use crate::projection::ProjectedValue;
use crate::storage::CurrencyConfig;

/// Shown in place of a projection that could not be computed.
pub const CALCULATION_ERROR: &str = "Error in calculation";

/// `MM:SS`, minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Inserts `sep` between every group of three digits, from the right.
///
/// A leading `-` is kept in front of the grouped digits.
pub fn group_digits(digits: &str, sep: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len() + 1);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}

fn attach_symbol(number: String, currency: &CurrencyConfig) -> String {
    if currency.symbol_after {
        format!("{number} {}", currency.symbol)
    } else {
        match number.strip_prefix('-') {
            Some(rest) => format!("-{}{rest}", currency.symbol),
            None => format!("{}{number}", currency.symbol),
        }
    }
}

/// Formats an amount with the configured separators, precision and symbol.
pub fn format_currency(amount: Decimal, currency: &CurrencyConfig) -> String {
    let rounded = amount.round_dp_with_strategy(
        currency.fraction_digits,
        RoundingStrategy::MidpointAwayFromZero,
    );
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut number = String::new();
    if negative {
        number.push('-');
    }
    number.push_str(&group_digits(int_part, &currency.thousands_separator));
    if currency.fraction_digits > 0 {
        let width = currency.fraction_digits as usize;
        number.push_str(&currency.decimal_separator);
        number.push_str(&format!("{frac_part:0<width$}"));
    }
    attach_symbol(number, currency)
}

/// Formats an integer digit string that may exceed any machine number.
///
/// Anything that is not an optionally signed run of ASCII digits renders as
/// a zero amount.
pub fn format_big_currency(digits: &str, currency: &CurrencyConfig) -> String {
    let unsigned = digits.strip_prefix('-').unwrap_or(digits);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return attach_symbol("0".into(), currency);
    }
    attach_symbol(group_digits(digits, &currency.thousands_separator), currency)
}

/// Display text for a projection outcome.
pub fn format_projection(
    outcome: &Result<ProjectedValue, ProjectionError>,
    currency: &CurrencyConfig,
) -> String {
    match outcome {
        Ok(value) => format_big_currency(&value.digits(), currency),
        Err(_) => CALCULATION_ERROR.to_string(),
    }
}
