//! Error types for the draft pipeline.
//!
//! Uses [`thiserror`] for the typed errors. The binary shell still returns
//! `Box<dyn Error>`, so every variant here converts with `?`.

use thiserror::Error;

/// Which numeric field of a line item failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Quantity,
    UnitPrice,
    LineWeight,
}

impl std::fmt::Display for NumericField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NumericField::Quantity => "quantity",
            NumericField::UnitPrice => "unit_price",
            NumericField::LineWeight => "line_weight",
        })
    }
}

/// Raised by strict sanitization. Allocation itself never fails.
#[derive(Debug, Error, PartialEq)]
pub enum AllocationError {
    /// A numeric field was non-numeric, non-finite or negative.
    #[error("line {line}: malformed {field} value {raw:?}")]
    MalformedField {
        line: usize,
        field: NumericField,
        raw: String,
    },
}

/// Errors surfaced by the draft-building pipeline.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LLM request failed: {0}")]
    Llm(String),
}
