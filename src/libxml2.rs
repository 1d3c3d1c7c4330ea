//! LibXML2 FFI Wrapper Module
//!
//! This module provides a safe wrapper around the libxml2 FFI calls needed for
//! XML Schema validation.
//!
//! ## Why direct FFI
//!
//! No mature pure Rust library implements XML Schema (XSD) validation:
//!
//! - **roxmltree**, **quick-xml**, **xml-rs**: XML parsing only, no schema validation
//! - **xsd-parser**: generates code from XSD schemas, no runtime validation
//!
//! libxml2 is the only practical engine, and the handful of entry points used here
//! are small enough to bind directly without the `libxml` crate.
//!
//! ## Diagnostics
//!
//! libxml2 prints its errors to stderr unless a structured error handler is
//! installed. Every call that can emit diagnostics runs with handlers pointing at a
//! local `Vec<XmlDiagnostic>`, so nothing leaks onto the console and the caller
//! decides what to report.

use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::path::Path;
use std::ptr::{self, NonNull};
use std::sync::Once;

use libc::{c_char, c_int, c_uint, c_void};

use crate::error::{LibXml2Error, LibXml2Result, SchemaError, ValidationFailure};

/// Global initialization flag for libxml2
///
/// libxml2's initialization functions are not reentrant, so they run exactly once.
static LIBXML2_INIT: Once = Once::new();

/// `xmlErrorLevel` values at or above this are reported; warnings are dropped.
const XML_ERR_ERROR: c_int = 2;

// Opaque libxml2 structures
#[repr(C)]
pub struct XmlSchema {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaParserCtxt {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlSchemaValidCtxt {
    _private: [u8; 0],
}

#[repr(C)]
pub struct xmlError {
    pub domain: c_int,
    pub code: c_int,
    pub message: *const c_char,
    pub level: c_int,
    pub file: *const c_char,
    pub line: c_int,
    pub str1: *const c_char,
    pub str2: *const c_char,
    pub str3: *const c_char,
    pub int1: c_int,
    /// Column number, when known
    pub int2: c_int,
    pub ctxt: *mut c_void,
    pub node: *mut c_void,
}

pub type XmlStructuredErrorFunc =
    Option<unsafe extern "C" fn(user_data: *mut c_void, error: *mut xmlError)>;

// External libxml2 FFI declarations
#[cfg_attr(target_os = "windows", link(name = "libxml2"))]
#[cfg_attr(not(target_os = "windows"), link(name = "xml2"))]
unsafe extern "C" {
    pub fn xmlInitParser();

    pub fn xmlSetStructuredErrorFunc(ctx: *mut c_void, handler: XmlStructuredErrorFunc);

    // Schema parsing functions
    pub fn xmlSchemaNewParserCtxt(url: *const c_char) -> *mut XmlSchemaParserCtxt;
    pub fn xmlSchemaSetParserStructuredErrors(
        ctxt: *mut XmlSchemaParserCtxt,
        serror: XmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
    pub fn xmlSchemaParse(ctxt: *const XmlSchemaParserCtxt) -> *mut XmlSchema;
    pub fn xmlSchemaFreeParserCtxt(ctxt: *mut XmlSchemaParserCtxt);
    pub fn xmlSchemaFree(schema: *mut XmlSchema);

    // Schema validation functions
    pub fn xmlSchemaNewValidCtxt(schema: *const XmlSchema) -> *mut XmlSchemaValidCtxt;
    pub fn xmlSchemaFreeValidCtxt(ctxt: *mut XmlSchemaValidCtxt);
    pub fn xmlSchemaSetValidStructuredErrors(
        ctxt: *mut XmlSchemaValidCtxt,
        serror: XmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
    pub fn xmlSchemaValidateFile(
        ctxt: *const XmlSchemaValidCtxt,
        file_name: *const c_char,
        options: c_uint,
    ) -> c_int;
}

/// One error reported by libxml2
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDiagnostic {
    pub message: String,
    /// 1-based, 0 when unknown
    pub line: i32,
    /// 1-based, 0 when unknown
    pub column: i32,
}

impl XmlDiagnostic {
    pub fn into_failure(self) -> ValidationFailure {
        if self.line > 0 {
            ValidationFailure::at(self.message, self.line as u32, self.column.max(0) as u32)
        } else {
            ValidationFailure::new(self.message)
        }
    }
}

/// Callback for libxml2 to report errors (structured)
unsafe extern "C" fn structured_error_callback(user_data: *mut c_void, error: *mut xmlError) {
    if user_data.is_null() || error.is_null() {
        return;
    }

    let diagnostics = unsafe { &mut *(user_data as *mut Vec<XmlDiagnostic>) };
    let error = unsafe { &*error };

    if error.level < XML_ERR_ERROR || error.message.is_null() {
        return;
    }

    let message = unsafe { CStr::from_ptr(error.message) }
        .to_string_lossy()
        .trim()
        .to_string();

    diagnostics.push(XmlDiagnostic {
        message,
        line: error.line,
        column: error.int2,
    });
}

/// Routes libxml2's process-wide error channel into a sink until dropped.
///
/// Errors raised outside any schema context (document parsing, resource loading)
/// only reach the global handler.
struct GlobalErrorCapture<'a> {
    _sink: PhantomData<&'a mut Vec<XmlDiagnostic>>,
}

impl<'a> GlobalErrorCapture<'a> {
    /// # Safety
    ///
    /// `sink` must stay valid and unmoved for as long as the guard lives.
    unsafe fn install(sink: *mut Vec<XmlDiagnostic>) -> Self {
        unsafe {
            xmlSetStructuredErrorFunc(sink as *mut c_void, Some(structured_error_callback));
        }
        GlobalErrorCapture { _sink: PhantomData }
    }
}

impl Drop for GlobalErrorCapture<'_> {
    fn drop(&mut self) {
        unsafe {
            xmlSetStructuredErrorFunc(ptr::null_mut(), None);
        }
    }
}

/// Owning handle for a compiled libxml2 schema, freed on drop
#[derive(Debug)]
pub struct XmlSchemaPtr {
    ptr: NonNull<XmlSchema>,
}

impl XmlSchemaPtr {
    /// Create a new XmlSchemaPtr from a raw pointer
    ///
    /// # Safety
    ///
    /// The pointer must come from `xmlSchemaParse` and must not be freed elsewhere.
    pub(crate) unsafe fn from_raw(ptr: *mut XmlSchema) -> LibXml2Result<Self> {
        NonNull::new(ptr)
            .map(|ptr| XmlSchemaPtr { ptr })
            .ok_or(LibXml2Error::SchemaParseFailed)
    }

    pub(crate) fn as_ptr(&self) -> *const XmlSchema {
        self.ptr.as_ptr()
    }
}

impl Drop for XmlSchemaPtr {
    fn drop(&mut self) {
        unsafe {
            xmlSchemaFree(self.ptr.as_ptr());
        }
    }
}

/// Validation result from libxml2
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Validation succeeded (return code 0)
    Valid,
    /// Schema violations or well-formedness errors, in the order libxml2 raised them
    Invalid { errors: Vec<XmlDiagnostic> },
    /// Internal error occurred (negative return code, nothing reported)
    InternalError { code: i32 },
}

impl ValidationResult {
    /// Create ValidationResult from libxml2 return code and captured errors
    ///
    /// A negative code that still came with diagnostics is a document problem, not
    /// an engine failure.
    pub fn from_code(code: c_int, errors: Vec<XmlDiagnostic>) -> Self {
        match code {
            0 => ValidationResult::Valid,
            n if n > 0 || !errors.is_empty() => ValidationResult::Invalid { errors },
            n => ValidationResult::InternalError { code: n },
        }
    }
}

#[cfg(unix)]
fn path_to_cstring(path: &Path) -> LibXml2Result<CString> {
    use std::os::unix::ffi::OsStrExt;

    // libxml2 hands file names to fopen unchanged, so raw bytes work
    CString::new(path.as_os_str().as_bytes()).map_err(|_| LibXml2Error::InvalidPath {
        path: path.to_path_buf(),
    })
}

#[cfg(not(unix))]
fn path_to_cstring(path: &Path) -> LibXml2Result<CString> {
    path.to_str()
        .and_then(|s| CString::new(s).ok())
        .ok_or_else(|| LibXml2Error::InvalidPath {
            path: path.to_path_buf(),
        })
}

/// Safe access to the libxml2 schema parser and validator
pub struct LibXml2Wrapper {
    _phantom: PhantomData<()>,
}

impl LibXml2Wrapper {
    /// Create a new wrapper, initializing libxml2 on first use
    pub fn new() -> Self {
        LIBXML2_INIT.call_once(|| unsafe {
            xmlInitParser();
        });

        LibXml2Wrapper {
            _phantom: PhantomData,
        }
    }

    /// Parse an XML schema from a file on disk
    ///
    /// The schema is loaded by path so that relative `xs:include` and `xs:import`
    /// locations resolve against the schema's own directory.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Parse` carrying the first libxml2 diagnostic when the
    /// schema cannot be loaded or compiled.
    pub fn parse_schema_file(&self, path: &Path) -> Result<XmlSchemaPtr, SchemaError> {
        let c_path = path_to_cstring(path)?;
        let mut diagnostics: Vec<XmlDiagnostic> = Vec::new();
        let sink = &mut diagnostics as *mut Vec<XmlDiagnostic>;

        let schema_ptr = unsafe {
            let parser_ctxt = xmlSchemaNewParserCtxt(c_path.as_ptr());
            if parser_ctxt.is_null() {
                return Err(LibXml2Error::MemoryAllocation.into());
            }

            xmlSchemaSetParserStructuredErrors(
                parser_ctxt,
                Some(structured_error_callback),
                sink as *mut c_void,
            );

            let schema_ptr = {
                let _capture = GlobalErrorCapture::install(sink);
                xmlSchemaParse(parser_ctxt)
            };

            // Always free the parser context
            xmlSchemaFreeParserCtxt(parser_ctxt);
            schema_ptr
        };

        if schema_ptr.is_null() {
            let details = diagnostics
                .into_iter()
                .next()
                .map(|d| d.message)
                .unwrap_or_else(|| LibXml2Error::SchemaParseFailed.to_string());
            return Err(SchemaError::Parse { details });
        }

        Ok(unsafe { XmlSchemaPtr::from_raw(schema_ptr) }?)
    }

    /// Validate an XML file against a schema
    ///
    /// libxml2 streams the file through its SAX parser, so every diagnostic carries
    /// both line and column. A document that is not well-formed yields
    /// `ValidationResult::Invalid` carrying the parser errors.
    ///
    /// # Errors
    ///
    /// Returns `LibXml2Error::ValidationContextCreationFailed` if the validation
    /// context cannot be created, and `LibXml2Error::InternalError` when libxml2
    /// fails without reporting anything.
    pub fn validate_file(
        &self,
        schema: &XmlSchemaPtr,
        file_path: &Path,
    ) -> LibXml2Result<ValidationResult> {
        let c_path = path_to_cstring(file_path)?;

        let mut diagnostics: Vec<XmlDiagnostic> = Vec::new();
        let sink = &mut diagnostics as *mut Vec<XmlDiagnostic>;

        let result_code = unsafe {
            // Fresh validation context per document
            let valid_ctxt = xmlSchemaNewValidCtxt(schema.as_ptr());
            if valid_ctxt.is_null() {
                return Err(LibXml2Error::ValidationContextCreationFailed);
            }

            xmlSchemaSetValidStructuredErrors(
                valid_ctxt,
                Some(structured_error_callback),
                sink as *mut c_void,
            );

            let result_code = {
                let _capture = GlobalErrorCapture::install(sink);
                xmlSchemaValidateFile(valid_ctxt, c_path.as_ptr(), 0)
            };

            // Always free the validation context
            xmlSchemaFreeValidCtxt(valid_ctxt);
            result_code
        };

        match ValidationResult::from_code(result_code, diagnostics) {
            ValidationResult::InternalError { code } => Err(LibXml2Error::InternalError { code }),
            result => Ok(result),
        }
    }
}

impl Default for LibXml2Wrapper {
    fn default() -> Self {
        Self::new()
    }
}
