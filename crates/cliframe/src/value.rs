//! Typed option values and the string coercion rules behind them.

use std::fmt;

use crate::error::{Error, Result};

const TRUTHY: [&str; 4] = ["true", "1", "on", "yes"];
const FALSY: [&str; 4] = ["false", "0", "off", "no"];

/// Type an option value can be read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Bool,
    Int,
    Float,
    Str,
}

impl OptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An option value after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            Self::Bool(_) => OptionKind::Bool,
            Self::Int(_) => OptionKind::Int,
            Self::Float(_) => OptionKind::Float,
            Self::Str(_) => OptionKind::Str,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for OptionValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// Coerce the raw string bound to `name` into `kind`.
///
/// Numbers follow C `strtol`/`strtof` rules: leading whitespace is skipped,
/// everything after it must parse (`"12abc"` and `"12 "` are not ints), and
/// floats may be written in hex (`0x1p4`). Floats that overflow or underflow
/// `f32` are rejected.
pub fn coerce(name: &str, raw: &str, kind: OptionKind) -> Result<OptionValue> {
    match kind {
        OptionKind::Str => Ok(OptionValue::Str(raw.to_string())),
        OptionKind::Bool => {
            if TRUTHY.contains(&raw) {
                Ok(OptionValue::Bool(true))
            } else if FALSY.contains(&raw) {
                Ok(OptionValue::Bool(false))
            } else {
                Err(Error::bad_type(name, kind.as_str()))
            }
        }
        OptionKind::Int => skip_leading_space(raw)
            .parse::<i32>()
            .map(OptionValue::Int)
            .map_err(|_| Error::bad_type(name, kind.as_str())),
        OptionKind::Float => parse_float(raw)
            .map(OptionValue::Float)
            .ok_or_else(|| Error::bad_type(name, kind.as_str())),
    }
}

// Same set as C `isspace` in the "C" locale.
fn skip_leading_space(raw: &str) -> &str {
    raw.trim_start_matches([' ', '\t', '\n', '\x0b', '\x0c', '\r'])
}

fn parse_float(raw: &str) -> Option<f32> {
    let trimmed = skip_leading_space(raw);
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if unsigned.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = if is_hex(unsigned) {
        parse_hex_float(&unsigned[2..])? as f32
    } else {
        unsigned.parse::<f32>().ok()?
    };

    // Out-of-range literals saturate to infinity or zero instead of failing.
    if magnitude.is_infinite() && !spells_infinity(unsigned) {
        return None;
    }
    if magnitude == 0.0 && has_nonzero_mantissa(unsigned) {
        return None;
    }

    Some(if negative { -magnitude } else { magnitude })
}

fn is_hex(unsigned: &str) -> bool {
    matches!(unsigned.get(..2), Some("0x" | "0X"))
}

/// Parse the part of a hex float after `0x`: `h[.h][p[+-]d]`.
fn parse_hex_float(body: &str) -> Option<f64> {
    let (mantissa, exponent) = match body.split_once(['p', 'P']) {
        Some((m, e)) => (m, e.parse::<i32>().ok()?),
        None => (body, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut value = 0f64;
    for c in int_part.chars() {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }
    let mut scale = 1.0 / 16.0;
    for c in frac_part.chars() {
        value += f64::from(c.to_digit(16)?) * scale;
        scale /= 16.0;
    }
    Some(value * 2f64.powi(exponent))
}

fn spells_infinity(unsigned: &str) -> bool {
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn has_nonzero_mantissa(unsigned: &str) -> bool {
    let mantissa = if is_hex(unsigned) {
        unsigned[2..].split(['p', 'P']).next()
    } else {
        unsigned.split(['e', 'E']).next()
    };
    mantissa
        .unwrap_or_default()
        .chars()
        .any(|c| c.is_ascii_hexdigit() && c != '0')
}

/// Rust types an option can be read as.
pub trait FromOption: Sized {
    const KIND: OptionKind;

    /// Convert a value of kind `KIND`. `None` is reported as a bad option type.
    fn from_value(value: OptionValue) -> Option<Self>;
}

impl FromOption for bool {
    const KIND: OptionKind = OptionKind::Bool;

    fn from_value(value: OptionValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromOption for i32 {
    const KIND: OptionKind = OptionKind::Int;

    fn from_value(value: OptionValue) -> Option<Self> {
        value.as_int()
    }
}

impl FromOption for f32 {
    const KIND: OptionKind = OptionKind::Float;

    fn from_value(value: OptionValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromOption for String {
    const KIND: OptionKind = OptionKind::Str;

    fn from_value(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Str(v) => Some(v),
            _ => None,
        }
    }
}
