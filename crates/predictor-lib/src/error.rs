//! Error taxonomy for the prediction and ranking engine
//!
//! Every variant is a local, recoverable-by-caller condition. The engine
//! never retries internally and never substitutes defaults for structurally
//! invalid input.

use thiserror::Error;

/// Errors that can occur in the prediction and ranking engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Prediction was requested before a model bundle was fit or loaded
    #[error("model has not been trained or loaded")]
    NotTrained,

    /// A categorical value at inference time was never seen during fit
    #[error("unknown category `{value}` in column `{column}`")]
    UnknownCategory { column: String, value: String },

    /// A derived feature could not be computed (e.g. zero or absent
    /// denominator in a ratio)
    #[error("invalid feature `{name}`: {reason}")]
    InvalidFeature { name: String, reason: String },

    /// The training table has zero rows
    #[error("training table has no rows")]
    EmptyTrainingSet,

    /// Neither target column exists in the training table
    #[error("neither target column `{profit}` nor `{delivery}` is present")]
    MissingTarget { profit: String, delivery: String },

    /// Ranking weights do not sum to 1.0
    #[error("ranking weights sum to {sum}, expected 1.0")]
    InvalidWeights { sum: f64 },

    /// A persisted bundle has the wrong schema version or failed validation
    #[error("incompatible model bundle: {reason}")]
    IncompatibleBundle { reason: String },

    /// A column required by the current operation is absent
    #[error("required column `{column}` is missing")]
    MissingColumn { column: String },

    /// A column was inserted with a length that does not match the table
    #[error("column `{column}` has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Model store I/O failure
    #[error("model store I/O failed")]
    Io(#[from] std::io::Error),

    /// Bundle (de)serialization failure
    #[error("bundle serialization failed")]
    Serialization(#[from] serde_json::Error),
}
