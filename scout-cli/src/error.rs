//! Error type for the scout binary.

/// Error type for CLI operations.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or credential failure.
    #[error("{0}")]
    Config(#[from] crate::config::ConfigError),

    /// Agent construction or run failure.
    #[error("{0}")]
    Agent(#[from] scout::Error),

    /// Line editor failure.
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn config_error_passes_through() {
        let err = CliError::from(ConfigError::MissingCredential("GITHUB_TOKEN"));
        assert_eq!(
            err.to_string(),
            "missing credential: set the GITHUB_TOKEN environment variable"
        );
    }

    #[test]
    fn agent_error_passes_through() {
        let err = CliError::from(scout::Error::max_steps(4));
        assert!(err.to_string().contains("Maximum steps"));
    }
}
