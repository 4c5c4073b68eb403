use thiserror::Error;

/// Invocation-level failures. These are the only errors that abort a run,
/// and they are always raised before the tree is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("You must pass the '{parameter}' parameter. Example: --{flag} {example}")]
    MissingParameter {
        parameter: &'static str,
        flag: &'static str,
        example: &'static str,
    },

    #[error(
        "Invalid project name: {value}. Only alphanumeric characters and underscores are allowed (expected {pattern})"
    )]
    InvalidIdentifier { value: String, pattern: &'static str },

    #[error("Invalid package name: {value}. It must be a valid dotted package name (expected {pattern})")]
    InvalidNamespace { value: String, pattern: &'static str },
}

impl ValidationError {
    /// Name of the parameter that failed validation.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::MissingParameter { parameter, .. } => *parameter,
            Self::InvalidIdentifier { .. } => "projectName",
            Self::InvalidNamespace { .. } => "packageName",
        }
    }
}
