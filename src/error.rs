use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an XSD file into a compiled schema. Fatal for the whole run.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{details}")]
    Parse { details: String },

    #[error("{0}")]
    LibXml2(#[from] LibXml2Error),
}

/// Failure to validate a single XML document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document was read but does not conform to the schema (or is not well-formed)
    #[error("{0}")]
    Invalid(ValidationFailure),

    /// The document could not be read from disk
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    LibXml2(#[from] LibXml2Error),
}

impl From<ValidationFailure> for DocumentError {
    fn from(failure: ValidationFailure) -> Self {
        DocumentError::Invalid(failure)
    }
}

/// Position of a diagnostic inside the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    /// 0 when the engine did not report a column
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// First schema violation reported for a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub message: String,
    pub location: Option<Location>,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub fn at(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            location: Some(Location { line, column }),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// LibXML2-specific error types
#[derive(Error, Debug)]
pub enum LibXml2Error {
    #[error("Schema parsing failed: null pointer returned")]
    SchemaParseFailed,

    #[error("Validation context creation failed")]
    ValidationContextCreationFailed,

    #[error("Memory allocation failed in libxml2")]
    MemoryAllocation,

    #[error("Path cannot be passed to libxml2: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Schema validation internal error: code {code}")]
    InternalError { code: i32 },
}

/// Failure to read the bundled configuration resource
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration resource not found: {name}")]
    NotFound { name: String },

    #[error("Configuration resource is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),
}

/// LibXML2 result type alias
pub type LibXml2Result<T> = std::result::Result<T, LibXml2Error>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display_is_underlying_message() {
        let io_error = SchemaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));
        assert_eq!(io_error.to_string(), "File not found");

        let parse_error = SchemaError::Parse {
            details: "Start tag expected, '<' not found".to_string(),
        };
        assert_eq!(parse_error.to_string(), "Start tag expected, '<' not found");
    }

    #[test]
    fn test_location_display() {
        let location = Location { line: 12, column: 7 };
        assert_eq!(location.to_string(), "12:7");
    }

    #[test]
    fn test_validation_failure_constructors() {
        let unlocated = ValidationFailure::new("Element 'x': not expected.");
        assert_eq!(unlocated.location, None);
        assert_eq!(unlocated.to_string(), "Element 'x': not expected.");

        let located = ValidationFailure::at("Element 'x': not expected.", 3, 0);
        assert_eq!(located.location, Some(Location { line: 3, column: 0 }));
    }

    #[test]
    fn test_document_error_conversion() {
        let failure = ValidationFailure::new("bad");
        match DocumentError::from(failure) {
            DocumentError::Invalid(f) => assert_eq!(f.message, "bad"),
            other => panic!("Expected DocumentError::Invalid, got {:?}", other),
        }

        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Access denied");
        match DocumentError::from(io_error) {
            DocumentError::Io(_) => (),
            other => panic!("Expected DocumentError::Io, got {:?}", other),
        }
    }

    #[test]
    fn test_libxml2_error_display() {
        let parse_failed = LibXml2Error::SchemaParseFailed;
        assert!(parse_failed.to_string().contains("Schema parsing failed"));

        let invalid_path = LibXml2Error::InvalidPath {
            path: PathBuf::from("bad\0name.xml"),
        };
        assert!(invalid_path.to_string().starts_with("Path cannot be passed to libxml2"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let error = SchemaError::LibXml2(LibXml2Error::MemoryAllocation);
        assert!(error.source().is_some());
    }
}
