use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] fxcal_core::ValidationError),

    #[error(transparent)]
    Resolve(#[from] fxcal_core::ResolveError),

    #[error("input error: {0}")]
    Input(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("detail lookup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Resolve(_) => 2,
            Self::Input(_) => 2,
            Self::Csv(_) => 3,
            Self::Serialization(_) => 4,
            Self::Http(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
