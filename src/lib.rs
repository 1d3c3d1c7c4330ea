//! # xsd-validator Library
//!
//! Validates XML documents against a single XML Schema (XSD) using libxml2,
//! stopping at the first document that fails.

pub mod cli;
pub mod config;
pub mod error;
pub mod libxml2;
pub mod output;
pub mod validator;

pub use cli::{Command, Invocation, UsageError, parse_args};
pub use config::AppConfig;
pub use error::{DocumentError, LibXml2Error, Location, SchemaError, ValidationFailure};
pub use libxml2::{LibXml2Wrapper, ValidationResult, XmlDiagnostic, XmlSchemaPtr};
pub use output::Output;
pub use validator::{RunOutcome, SchemaEngine, run};
