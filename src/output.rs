//! Console Output
//!
//! All user-visible text lives here. Success and validation narrative go to the
//! `out` stream, usage and read errors to the `err` stream; scripts rely on that
//! split.

use std::io::{self, Write};
use std::path::Path;

use crate::config::AppConfig;
use crate::error::{SchemaError, ValidationFailure};

pub fn usage_line(config: &AppConfig) -> String {
    format!(
        "Usage: {} [OPTION]... XSDFILE XMLFILE [XMLFILE...]",
        config.program_name()
    )
}

pub fn help_text(config: &AppConfig) -> String {
    format!(
        "\n{}\n\n Validates the XML document(s) at XMLFILE against the XML Schema at XSDFILE.\n\n\
         --version  -V  Output version number.\n\
         --help  -h  Output this help.\n",
        usage_line(config)
    )
}

pub fn version_text(config: &AppConfig) -> String {
    format!("{} Version {}\n\n", config.program_name(), config.version())
}

/// Name a document is reported under: its final path component
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Writer pair for the standard output and standard error streams
pub struct Output<O: Write, E: Write> {
    out: O,
    err: E,
}

impl Output<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Output<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    pub fn help(&mut self, config: &AppConfig) -> io::Result<()> {
        self.out.write_all(help_text(config).as_bytes())?;
        self.out.flush()
    }

    pub fn version(&mut self, config: &AppConfig) -> io::Result<()> {
        self.out.write_all(version_text(config).as_bytes())?;
        self.out.flush()
    }

    pub fn usage(&mut self, config: &AppConfig) -> io::Result<()> {
        writeln!(self.err, "{}", usage_line(config))
    }

    pub fn illegal_option(&mut self, flag: char) -> io::Result<()> {
        writeln!(self.err, "Illegal option {}", flag)
    }

    pub fn file_validates(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "{} validates", display_name(path))?;
        self.out.flush()
    }

    pub fn file_fails(&mut self, path: &Path, failure: &ValidationFailure) -> io::Result<()> {
        writeln!(self.out, "{} fails to validate because:", display_name(path))?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", failure.message)?;
        if let Some(location) = failure.location {
            writeln!(self.out, "At: {}", location)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn xml_read_error(&mut self, path: &Path, error: &dyn std::error::Error) -> io::Result<()> {
        writeln!(self.err, "Error reading XML source: {}", display_name(path))?;
        writeln!(self.err, "{}", error)
    }

    pub fn schema_read_error(&mut self, path: &Path, error: &SchemaError) -> io::Result<()> {
        writeln!(self.err, "Error reading XML Schema: {}", path.display())?;
        writeln!(self.err, "{}", error)
    }
}
