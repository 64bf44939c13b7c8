//! Error types for nessview

use thiserror::Error;

/// Result type alias using nessview Error
pub type Result<T> = std::result::Result<T, Error>;

/// Nessview error types
#[derive(Error, Debug)]
pub enum Error {
    /// The root element of an input file does not match a known schema
    /// generation. Fatal for that document.
    #[error("unrecognized report format in {path}: root element <{root}>")]
    UnrecognizedFormat { path: String, root: String },

    /// A schema-mandatory field is absent. Fatal for the containing
    /// finding (which is skipped) or report (which fails to load).
    #[error("missing required field '{field}' in {context}")]
    RequiredField { context: String, field: String },

    /// A required field is present but its value cannot be interpreted.
    #[error("invalid value for '{field}': {value}")]
    InvalidField { field: String, value: String },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get an error code for logging/metrics
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnrecognizedFormat { .. } => "UNRECOGNIZED_FORMAT",
            Error::RequiredField { .. } => "REQUIRED_FIELD_MISSING",
            Error::InvalidField { .. } => "INVALID_FIELD",
            Error::Xml(_) => "XML_ERROR",
            Error::Io(_) => "IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = Error::RequiredField {
            context: "ReportItem".to_string(),
            field: "pluginID".to_string(),
        };
        assert_eq!(err.code(), "REQUIRED_FIELD_MISSING");
        assert!(err.to_string().contains("pluginID"));
    }
}
