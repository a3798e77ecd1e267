use thiserror::Error;

/// One listener that returned an error during a notification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    /// Position of the listener in the pass (subscription order).
    pub position: usize,
    /// Version whose notification pass failed.
    pub version: u64,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ToolError {

    #[error("Config error happened {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("{} listener(s) failed after state{} committed version {version}", .failures.len(), fmt_name(.state))]
    ListenerFailures {
        state: Option<String>,
        version: u64,
        failures: Vec<ListenerFailure>,
    },

    #[error("State '{name}' exists but does not hold a {expected}")]
    StateTypeMismatch {
        name: String,
        expected: &'static str,
    },

}

fn fmt_name(name: &Option<String>) -> String {
    name.as_ref().map(|n| format!(" '{}'", n)).unwrap_or_default()
}

impl From<config::ConfigError> for ToolError {
    fn from(err: config::ConfigError) -> Self {
        ToolError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
