//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    /// The API rejected or could not serve the request.
    #[error("{0}")]
    Unavailable(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use crate::application::ApplicationError;

        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Unavailable(_) => crate::exitcode::UNAVAILABLE,
            CliError::Infra(e) => match e {
                InfraError::Transport(_) => crate::exitcode::CONFIG,
                InfraError::Application(ApplicationError::Config { .. }) => {
                    crate::exitcode::CONFIG
                }
                InfraError::Application(_) => crate::exitcode::SOFTWARE,
            },
        }
    }
}

impl From<crate::application::ApplicationError> for CliError {
    fn from(e: crate::application::ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}
