//! Reader for whitespace-delimited scattered temperature measurements.
//!
//! Each accepted line holds three numeric tokens: `x y temperature`.
//! Decimal commas are supported through [`DecimalSeparator::Comma`], and
//! [`RowPolicy`] decides whether rows with the wrong field count are skipped
//! or rejected.

pub mod options;
pub mod reader;

pub use options::{DecimalSeparator, ParseOptions, RowPolicy};
pub use reader::{parse_number, parse_samples, read_samples, read_samples_with_report, ParseReport};
