//! Token symbols and amounts.
//!
//! A [`Symbol`] pairs a decimal precision with a short uppercase code
//! (`4,RB`). An [`Amount`] is a signed integer magnitude in the symbol's
//! smallest unit (`5000000` at precision 4 prints as `500.0000 RB`).
//!
//! Constructors do not validate: records arriving from callers are checked
//! at the ledger boundary with [`Symbol::is_valid`] / [`Amount::is_valid`].
//! The text parsers do validate.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Largest decimal precision a symbol may carry.
pub const MAX_PRECISION: u8 = 18;

/// Longest symbol code.
pub const MAX_SYMBOL_CODE_LEN: usize = 7;

/// Largest magnitude an amount may hold (`2^62 - 1`).
pub const MAX_AMOUNT: i64 = (1 << 62) - 1;

/// Uppercase code of a token symbol (e.g. `RB`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolCode(String);

impl SymbolCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 1..=7 characters, `A-Z` only.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= MAX_SYMBOL_CODE_LEN
            && self.0.bytes().all(|b| b.is_ascii_uppercase())
    }
}

impl core::fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token type identifier: precision + code.
///
/// Two symbols are equal only when both precision and code match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol {
    precision: u8,
    code: SymbolCode,
}

impl Symbol {
    /// Build a symbol without validating it.
    pub fn new(precision: u8, code: impl Into<String>) -> Self {
        Self {
            precision,
            code: SymbolCode::new(code),
        }
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn code(&self) -> &SymbolCode {
        &self.code
    }

    pub fn is_valid(&self) -> bool {
        self.precision <= MAX_PRECISION && self.code.is_valid()
    }
}

impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl FromStr for Symbol {
    type Err = DomainError;

    /// Parses `"<precision>,<CODE>"`, e.g. `"4,RB"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| DomainError::validation(format!("symbol '{s}': expected 'P,CODE'")))?;
        let precision: u8 = precision
            .trim()
            .parse()
            .map_err(|e| DomainError::validation(format!("symbol '{s}': precision: {e}")))?;
        let symbol = Symbol::new(precision, code.trim());
        if !symbol.is_valid() {
            return Err(DomainError::validation(format!("symbol '{s}' is not valid")));
        }
        Ok(symbol)
    }
}

impl TryFrom<String> for Symbol {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.to_string()
    }
}

/// A quantity of a specific token symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    value: i64,
    symbol: Symbol,
}

impl Amount {
    /// Build an amount from its smallest-unit magnitude, without validating it.
    pub fn new(value: i64, symbol: Symbol) -> Self {
        Self { value, symbol }
    }

    pub fn zero(symbol: Symbol) -> Self {
        Self::new(0, symbol)
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn is_within_range(&self) -> bool {
        (-MAX_AMOUNT..=MAX_AMOUNT).contains(&self.value)
    }

    pub fn is_valid(&self) -> bool {
        self.is_within_range() && self.symbol.is_valid()
    }

    pub fn is_positive(&self) -> bool {
        self.value > 0
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    fn ensure_same_symbol(&self, other: &Amount) -> DomainResult<()> {
        if self.symbol != other.symbol {
            return Err(DomainError::SymbolMismatch {
                left: self.symbol.to_string(),
                right: other.symbol.to_string(),
            });
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Amount) -> DomainResult<Amount> {
        self.ensure_same_symbol(other)?;
        let value = self
            .value
            .checked_add(other.value)
            .filter(|v| (-MAX_AMOUNT..=MAX_AMOUNT).contains(v))
            .ok_or(DomainError::Overflow)?;
        Ok(Amount::new(value, self.symbol.clone()))
    }

    pub fn checked_sub(&self, other: &Amount) -> DomainResult<Amount> {
        self.ensure_same_symbol(other)?;
        let value = self
            .value
            .checked_sub(other.value)
            .filter(|v| (-MAX_AMOUNT..=MAX_AMOUNT).contains(v))
            .ok_or(DomainError::Overflow)?;
        Ok(Amount::new(value, self.symbol.clone()))
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.value < 0 { "-" } else { "" };
        let magnitude = self.value.unsigned_abs();
        if self.symbol.precision > MAX_PRECISION {
            return write!(f, "{} ({})", self.value, self.symbol);
        }
        let precision = u32::from(self.symbol.precision);
        if precision == 0 {
            return write!(f, "{sign}{magnitude} {}", self.symbol.code);
        }
        let scale = 10u128.pow(precision);
        let whole = u128::from(magnitude) / scale;
        let frac = u128::from(magnitude) % scale;
        write!(
            f,
            "{sign}{whole}.{frac:0width$} {}",
            self.symbol.code,
            width = precision as usize
        )
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    /// Parses `"<number> <CODE>"`; the number of fractional digits is the
    /// symbol's precision (`"500.0000 RB"` is `4,RB`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| DomainError::validation(format!("amount '{s}': {why}"));

        let (number, code) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| invalid("expected '<number> <CODE>'"))?;
        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || (digits.contains('.') && frac.is_empty()) {
            return Err(invalid("malformed number"));
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid("malformed number"));
        }
        let precision = u8::try_from(frac.len())
            .ok()
            .filter(|p| *p <= MAX_PRECISION)
            .ok_or_else(|| invalid("too many fractional digits"))?;

        let magnitude: i64 = format!("{whole}{frac}")
            .parse()
            .map_err(|_| invalid("out of range"))?;
        let value = if negative { -magnitude } else { magnitude };

        let amount = Amount::new(value, Symbol::new(precision, code.trim()));
        if !amount.is_valid() {
            return Err(invalid("not a valid amount"));
        }
        Ok(amount)
    }
}

impl TryFrom<String> for Amount {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}
