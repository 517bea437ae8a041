use thiserror::Error;

/// Data that failed the constraints declared for it.
///
/// Carries every message collected during a single validation call, in the
/// order the checks ran.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .validation_errors.join("\n"))]
pub struct ValidationError {
    validation_errors: Vec<String>,
}

impl ValidationError {
    pub fn new(validation_errors: Vec<String>) -> Self {
        Self { validation_errors }
    }

    /// The ordered list of human-readable failures.
    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.validation_errors
    }
}

/// Core error type shared across schemata crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A programmer mistake: missing argument, wrong container, unknown name.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),
    /// A `type` or `member_type` setting names an unrecognized type.
    #[error("illegal type: {0}")]
    IllegalType(String),
    /// Data failed its declared constraints.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl Error {
    /// The collected messages when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            Error::Validation(err) => Some(err.validation_errors()),
            _ => None,
        }
    }
}

/// Convenience alias for results returned by schemata crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Turn a collected error list into the raising form.
pub(crate) fn raise_if_any(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(ValidationError::new(errors)))
    }
}
