use crate::catalog::{DefaultValue, ParameterType};
use derive_more::From;

/// Significant digits kept when a float is written as text.
pub const FLOAT_SIGNIFICANT_DIGITS: usize = 6;

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, From)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int(i32),
    Float(f64),
    Bool(bool),
    String(String),
    /// The textual strategy code `index:name0;name1;...`.
    #[from(ignore)]
    StringList(String),
}

impl Value {
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Self::Int(_) => ParameterType::Int,
            Self::Float(_) => ParameterType::Float,
            Self::Bool(_) => ParameterType::Bool,
            Self::String(_) => ParameterType::String,
            Self::StringList(_) => ParameterType::StringList,
        }
    }

    /// Parses `text` as a value of type `kind`.
    ///
    /// String lists must at least contain the `:` separating the index from the
    /// alternatives; everything else about them is checked when they are decoded.
    pub fn parse(kind: ParameterType, text: &str) -> Option<Self> {
        let trimmed = text.trim();
        match kind {
            ParameterType::Int => trimmed.parse().ok().map(Self::Int),
            ParameterType::Float => trimmed.parse().ok().map(Self::Float),
            ParameterType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Self::Bool(true)),
                "false" | "0" => Some(Self::Bool(false)),
                _ => None,
            },
            ParameterType::String => Some(Self::String(text.to_owned())),
            ParameterType::StringList => trimmed
                .contains(':')
                .then(|| Self::StringList(trimmed.to_owned())),
        }
    }

    /// The persisted textual form. Floats keep [`FLOAT_SIGNIFICANT_DIGITS`] digits.
    pub fn to_text(&self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Float(value) => format_float(*value, FLOAT_SIGNIFICANT_DIGITS),
            Self::Bool(value) => value.to_string(),
            Self::String(value) | Self::StringList(value) => value.clone(),
        }
    }

    /// The text of string and string-list values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) | Self::StringList(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<DefaultValue> for Value {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Int(value) => Self::Int(value),
            DefaultValue::Float(value) => Self::Float(value),
            DefaultValue::Bool(value) => Self::Bool(value),
            DefaultValue::String(value) => Self::String(value.to_owned()),
            DefaultValue::StringList(value) => Self::StringList(value.to_owned()),
        }
    }
}

/// Formats `value` like C's `%g` with `digits` significant digits.
///
/// Trailing zeros are dropped and scientific notation is used when the decimal
/// exponent is below -4 or at least `digits`.
pub fn format_float(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };
    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_owned()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
