//! Domain error types.

/// Top-level error type for crosstrader.
#[derive(Debug, thiserror::Error)]
pub enum CrosstraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid price data: {reason}")]
    Data { reason: String },

    #[error("window lengths must be positive (fast={fast}, slow={slow})")]
    NonPositiveWindow { fast: usize, slow: usize },

    #[error("fast window ({fast}) must be shorter than slow window ({slow})")]
    WindowOrder { fast: usize, slow: usize },

    #[error("fee must be non-negative, got {fee_bps} bps")]
    NegativeFee { fee_bps: f64 },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CrosstraderError> for std::process::ExitCode {
    fn from(err: &CrosstraderError) -> Self {
        let code: u8 = match err {
            CrosstraderError::Io(_) => 1,
            CrosstraderError::ConfigParse { .. }
            | CrosstraderError::ConfigMissing { .. }
            | CrosstraderError::ConfigInvalid { .. } => 2,
            CrosstraderError::Data { .. } => 3,
            CrosstraderError::NonPositiveWindow { .. }
            | CrosstraderError::WindowOrder { .. }
            | CrosstraderError::NegativeFee { .. } => 4,
            CrosstraderError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
