use thiserror::Error;

#[derive(Debug, Error)]
pub enum RippleError {
    #[error("{name} must be {requirement}, got {value}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },

    #[error("sample count must be at least 2, got {0}")]
    TooFewSamples(usize),

    #[error("no duty cycles given")]
    NoDutyCycles,

    #[error("absolute scaling needs an input voltage")]
    MissingInputVoltage,

    #[error("parameter file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RippleError>;
