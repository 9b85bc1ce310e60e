//! Parsing options.

use std::fmt;
use std::str::FromStr;

use field_common::FieldError;
use serde::{Deserialize, Serialize};

/// Symbol separating the integer and fractional parts of numbers in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    /// `12.5`
    #[default]
    Dot,
    /// `12,5` (rewritten to `12.5` before parsing)
    Comma,
}

impl DecimalSeparator {
    pub fn symbol(&self) -> char {
        match self {
            Self::Dot => '.',
            Self::Comma => ',',
        }
    }
}

impl fmt::Display for DecimalSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for DecimalSeparator {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "." | "dot" | "point" => Ok(Self::Dot),
            "," | "comma" => Ok(Self::Comma),
            other => Err(FieldError::InvalidSeparator(other.to_string())),
        }
    }
}

/// How to treat rows that do not have exactly three fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Skip the row and keep going.
    #[default]
    Lenient,
    /// Fail on the first such row. Blank lines are still ignored.
    Strict,
}

/// Options controlling how a sample file is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub decimal_separator: DecimalSeparator,
    pub row_policy: RowPolicy,
}

impl ParseOptions {
    pub fn new(decimal_separator: DecimalSeparator) -> Self {
        Self {
            decimal_separator,
            row_policy: RowPolicy::default(),
        }
    }

    pub fn strict(mut self) -> Self {
        self.row_policy = RowPolicy::Strict;
        self
    }
}
