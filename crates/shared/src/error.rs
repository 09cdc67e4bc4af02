#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown variant '{0}'")]
    UnknownVariant(String),
    #[error("Invalid sweep '{sweep}': {reason}")]
    InvalidSweep { sweep: String, reason: String },
}

impl ConfigError {
    pub fn invalid(sweep: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidSweep {
            sweep: sweep.to_string(),
            reason: reason.into(),
        }
    }
}
