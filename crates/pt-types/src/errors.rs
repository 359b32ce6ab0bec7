use thiserror::Error;

/// Main error type for the PointTuner system
#[derive(Error, Debug)]
pub enum PtError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Allocation error: {0}")]
    Allocation(String),

    #[error("Non-positive baseline score {score}: the optimizer requires a positive starting score")]
    NonPositiveBaseline { score: f64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PtError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn oracle(message: impl Into<String>) -> Self {
        Self::Oracle(message.into())
    }

    pub fn allocation(message: impl Into<String>) -> Self {
        Self::Allocation(message.into())
    }
}

/// Result type alias for PointTuner operations
pub type PtResult<T> = Result<T, PtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_error_display() {
        let error = PtError::NonPositiveBaseline { score: -0.5 };
        assert!(error.to_string().contains("-0.5"));
        assert!(error.to_string().contains("positive starting score"));
    }

    #[test]
    fn config_helper() {
        let error = PtError::config("batch_size must be at least 1");
        match error {
            PtError::Config(msg) => assert!(msg.contains("batch_size")),
            _ => panic!("Expected Config error"),
        }
    }
}
