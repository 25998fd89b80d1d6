use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

use crate::error::CurrencyError;
use crate::types::Cell;

pub const CURRENCY_SYMBOL: &str = "R$";
const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// A money value that is either already numeric or still locale-formatted text.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrencyInput {
    Numeric(Decimal),
    Text(String),
}

impl From<Decimal> for CurrencyInput {
    fn from(value: Decimal) -> Self {
        CurrencyInput::Numeric(value)
    }
}

impl From<&str> for CurrencyInput {
    fn from(value: &str) -> Self {
        CurrencyInput::Text(value.to_string())
    }
}

impl From<&Cell> for CurrencyInput {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Int(i) => CurrencyInput::Numeric(Decimal::from(*i)),
            Cell::Float(f) => match Decimal::from_f64(*f) {
                Some(d) => CurrencyInput::Numeric(d),
                None => CurrencyInput::Text(f.to_string()),
            },
            Cell::Text(s) => CurrencyInput::Text(s.clone()),
            Cell::Empty => CurrencyInput::Text(String::new()),
            Cell::Date(d) => CurrencyInput::Text(d.to_string()),
        }
    }
}

/// Parses `"R$ 1.234,56"` style text into `1234.56`; numeric input passes through.
pub fn normalize_currency(input: &CurrencyInput) -> Result<Decimal, CurrencyError> {
    let raw = match input {
        CurrencyInput::Numeric(value) => return Ok(*value),
        CurrencyInput::Text(raw) => raw,
    };

    let cleaned = raw
        .replace(CURRENCY_SYMBOL, "")
        .replace(THOUSANDS_SEPARATOR, "")
        .replace(DECIMAL_SEPARATOR, ".");
    let cleaned = cleaned.trim();

    let invalid = || CurrencyError::InvalidCurrencyFormat { raw: raw.clone() };
    if !is_plain_decimal(cleaned) {
        return Err(invalid());
    }
    Decimal::from_str(cleaned).map_err(|_| invalid())
}

/// Normalizes every value or fails on the first malformed one.
pub fn normalize_column<'a, I>(values: I) -> Result<Vec<Decimal>, CurrencyError>
where
    I: IntoIterator<Item = &'a CurrencyInput>,
{
    values.into_iter().map(normalize_currency).collect()
}

// Digits with an optional fractional part that has at least one digit.
fn is_plain_decimal(s: &str) -> bool {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match s.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(s),
    }
}
