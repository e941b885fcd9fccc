use thiserror::Error;

/// Errors surfaced by the checked entry points and config loading.
///
/// Plain `get` never fails; see [`crate::NoiseEvaluator::get`] for how
/// non-finite input is handled there.
#[derive(Debug, Error)]
pub enum NoiseError {
    #[error("non-finite query coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("invalid fBm parameters: {0}")]
    InvalidFbm(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NoiseError>;
