//! Validation Driver
//!
//! Compiles the schema once, then validates each document in command-line order.
//! The first document that fails or cannot be read ends the run; the remaining
//! documents are never opened.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cli::Invocation;
use crate::error::{DocumentError, LibXml2Error, SchemaError, ValidationFailure};
use crate::libxml2::{LibXml2Wrapper, ValidationResult, XmlSchemaPtr};
use crate::output::Output;

/// Schema compiler and document validator used by the driver
pub trait SchemaEngine {
    type Schema;

    fn compile_schema(&self, path: &Path) -> Result<Self::Schema, SchemaError>;

    fn validate(&self, schema: &Self::Schema, path: &Path) -> Result<(), DocumentError>;
}

impl SchemaEngine for LibXml2Wrapper {
    type Schema = XmlSchemaPtr;

    fn compile_schema(&self, path: &Path) -> Result<XmlSchemaPtr, SchemaError> {
        // Surface unreadable files as I/O errors rather than libxml2 load messages
        drop(File::open(path)?);
        self.parse_schema_file(path)
    }

    fn validate(&self, schema: &XmlSchemaPtr, path: &Path) -> Result<(), DocumentError> {
        drop(File::open(path)?);

        match self.validate_file(schema, path)? {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { errors } => Err(errors
                .into_iter()
                .next()
                .map(|diagnostic| diagnostic.into_failure())
                .unwrap_or_else(|| ValidationFailure::new("Document fails schema validation"))
                .into()),
            ValidationResult::InternalError { code } => {
                Err(LibXml2Error::InternalError { code }.into())
            }
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every document validated
    Success,
    /// A document violated the schema
    ValidationFailed { file: PathBuf },
    /// A document could not be read
    XmlUnreadable { file: PathBuf },
    /// The schema could not be read or compiled; no document was opened
    SchemaUnreadable,
}

impl RunOutcome {
    pub const VALIDATION_FAIL: u8 = 1;
    pub const ERROR_READING_XML: u8 = 2;
    pub const ERROR_READING_SCHEMA: u8 = 3;

    pub fn code(&self) -> u8 {
        match self {
            RunOutcome::Success => 0,
            RunOutcome::ValidationFailed { .. } => Self::VALIDATION_FAIL,
            RunOutcome::XmlUnreadable { .. } => Self::ERROR_READING_XML,
            RunOutcome::SchemaUnreadable => Self::ERROR_READING_SCHEMA,
        }
    }
}

impl From<RunOutcome> for ExitCode {
    fn from(outcome: RunOutcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// Validate every document of `invocation` against its schema, stopping at the
/// first failure
///
/// # Errors
///
/// Only failures to write to `output` are returned; validation problems are
/// reported on `output` and encoded in the `RunOutcome`.
pub fn run<Eng, O, E>(
    engine: &Eng,
    invocation: &Invocation,
    output: &mut Output<O, E>,
) -> io::Result<RunOutcome>
where
    Eng: SchemaEngine,
    O: Write,
    E: Write,
{
    tracing::debug!(schema = %invocation.schema.display(), "compiling schema");

    let schema = match engine.compile_schema(&invocation.schema) {
        Ok(schema) => schema,
        Err(err) => {
            tracing::debug!(error = ?err, "schema compilation failed");
            output.schema_read_error(&invocation.schema, &err)?;
            return Ok(RunOutcome::SchemaUnreadable);
        }
    };

    for xml_file in &invocation.xml_files {
        tracing::debug!(file = %xml_file.display(), "validating");

        match engine.validate(&schema, xml_file) {
            Ok(()) => output.file_validates(xml_file)?,
            Err(DocumentError::Invalid(failure)) => {
                output.file_fails(xml_file, &failure)?;
                return Ok(RunOutcome::ValidationFailed {
                    file: xml_file.clone(),
                });
            }
            Err(err) => {
                output.xml_read_error(xml_file, &err)?;
                return Ok(RunOutcome::XmlUnreadable {
                    file: xml_file.clone(),
                });
            }
        }
    }

    Ok(RunOutcome::Success)
}
