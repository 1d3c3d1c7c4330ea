#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Test fixture paths
pub struct TestFixtures {
    pub fixtures_dir: PathBuf,
}

impl TestFixtures {
    pub fn new() -> Self {
        let fixtures_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures");

        Self { fixtures_dir }
    }

    pub fn xml_valid_dir(&self) -> PathBuf {
        self.fixtures_dir.join("xml").join("valid")
    }

    pub fn xml_invalid_dir(&self) -> PathBuf {
        self.fixtures_dir.join("xml").join("invalid")
    }

    pub fn xml_malformed_dir(&self) -> PathBuf {
        self.fixtures_dir.join("xml").join("malformed")
    }

    pub fn schemas_dir(&self) -> PathBuf {
        self.fixtures_dir.join("schemas")
    }

    /// Schema pulling its simple types in through a relative `xs:include`
    pub fn note_schema(&self) -> PathBuf {
        self.schemas_dir().join("note.xsd")
    }

    /// Schema referencing an undefined type
    pub fn broken_schema(&self) -> PathBuf {
        self.schemas_dir().join("broken.xsd")
    }

    pub fn valid_note(&self) -> PathBuf {
        self.xml_valid_dir().join("note1.xml")
    }

    pub fn other_valid_note(&self) -> PathBuf {
        self.xml_valid_dir().join("note2.xml")
    }

    /// `<cc>` inserted where `<from>` is expected, on line 4
    pub fn unexpected_element_note(&self) -> PathBuf {
        self.xml_invalid_dir().join("unexpected_element.xml")
    }

    /// Priority outside its 1..=5 range, on line 5
    pub fn bad_priority_note(&self) -> PathBuf {
        self.xml_invalid_dir().join("bad_priority.xml")
    }

    pub fn malformed_note(&self) -> PathBuf {
        self.xml_malformed_dir().join("unclosed.xml")
    }

    pub fn missing_xml(&self) -> PathBuf {
        self.fixtures_dir.join("does_not_exist.xml")
    }
}

/// Run the compiled `xsdv` binary with the given arguments
pub fn run_xsdv<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_xsdv"))
        .args(args)
        .output()
        .expect("Failed to execute xsdv")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

pub fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}
