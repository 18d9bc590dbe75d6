use std::fmt;

use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InputField {
    Principal,
    AnnualRate,
    Years,
    ReinvestPercent,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputField::Principal => "principal",
            InputField::AnnualRate => "annual rate",
            InputField::Years => "years",
            InputField::ReinvestPercent => "reinvest percent",
        };
        f.write_str(name)
    }
}

/// Rejected calculator input. Validation stops at the first failing field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("{field} must be a number, got {raw:?}")]
    NotANumber { field: InputField, raw: String },

    #[error("{field} must be a finite number")]
    NotFinite { field: InputField },

    #[error("{field} must be a whole number, got {value}")]
    NotAWholeNumber { field: InputField, value: f64 },

    #[error("years must be >= 1, got {value}")]
    NonPositiveYears { value: f64 },

    #[error("{field} {expected}, got {value}")]
    OutOfRange {
        field: InputField,
        value: f64,
        expected: &'static str,
    },
}

impl InvalidInputError {
    pub fn field(&self) -> InputField {
        match self {
            InvalidInputError::NotANumber { field, .. }
            | InvalidInputError::NotFinite { field }
            | InvalidInputError::NotAWholeNumber { field, .. }
            | InvalidInputError::OutOfRange { field, .. } => *field,
            InvalidInputError::NonPositiveYears { .. } => InputField::Years,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("calculate a schedule before exporting")]
    NothingToExport,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("malformed CSV at line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}
