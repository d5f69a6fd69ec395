use std::fmt;
use std::str::FromStr;

/// A numeric cell.
///
/// Integers and floats are kept apart so a table can be written back the way
/// it was read: `7` stays `7`, `0.0` stays `0.0`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Float(v) => v.is_finite(),
        }
    }
}

/// Numeric equality: `Int(0) == Float(0.0)`.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl FromStr for Number {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Number::Int(v));
        }
        s.parse::<f64>().map(Number::Float)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            // `{:?}` is the shortest round-trip form and keeps the ".0".
            Number::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// A row of a raw run, before normalization. `value` is `None` when the
/// measurement tool emitted no sample for that bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub node: String,
    pub timestamp: Number,
    pub value: Option<Number>,
}

/// A complete row: node label, timestamp and metric value.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub node: String,
    pub timestamp: Number,
    pub value: Number,
}

impl Row {
    pub fn new(node: impl Into<String>, timestamp: Number, value: Number) -> Self {
        Self {
            node: node.into(),
            timestamp,
            value,
        }
    }

    /// True if both key columns match `other`.
    pub fn same_key(&self, other: &Row) -> bool {
        self.node == other.node && self.timestamp == other.timestamp
    }
}
