use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

/// What the command line asks the tool to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the version text and exit successfully
    Version,
    /// Print the help text and exit successfully
    Help,
    /// Validate the given documents
    Validate(Invocation),
}

/// Schema and documents resolved from the positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub schema: PathBuf,
    /// In command-line order; duplicates are kept
    pub xml_files: Vec<PathBuf>,
}

/// Command lines that cannot be acted on. Both print the usage line and exit with 2.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Illegal option {0}")]
    IllegalOption(char),

    #[error("expected an XSD file followed by at least one XML file")]
    MissingArguments,
}

/// Interpret the arguments following the program name
///
/// Leading tokens starting with `-` are options. `--version` and `--help` are
/// matched whole; any other such token is a cluster of single-character flags.
/// The first `V` or `h` in a cluster wins immediately, without looking at the rest
/// of the command line. Option scanning stops at the first token that does not
/// start with `-`.
pub fn parse_args<I>(args: I) -> Result<Command, UsageError>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::<OsString>::into).peekable();

    while let Some(token) = args.next_if(|arg| arg.to_string_lossy().starts_with('-')) {
        let token = token.to_string_lossy();

        match &*token {
            "--version" => return Ok(Command::Version),
            "--help" => return Ok(Command::Help),
            cluster => {
                for flag in cluster.chars().skip(1) {
                    match flag {
                        'V' => return Ok(Command::Version),
                        'h' => return Ok(Command::Help),
                        other => return Err(UsageError::IllegalOption(other)),
                    }
                }
            }
        }
    }

    let schema = args.next().ok_or(UsageError::MissingArguments)?;
    let xml_files: Vec<PathBuf> = args.map(PathBuf::from).collect();
    if xml_files.is_empty() {
        return Err(UsageError::MissingArguments);
    }

    Ok(Command::Validate(Invocation {
        schema: PathBuf::from(schema),
        xml_files,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, UsageError> {
        parse_args(args.iter().copied())
    }

    #[test]
    fn test_basic_invocation() {
        let command = parse(&["schema.xsd", "a.xml", "b.xml", "a.xml"]).unwrap();
        assert_eq!(
            command,
            Command::Validate(Invocation {
                schema: PathBuf::from("schema.xsd"),
                xml_files: vec![
                    PathBuf::from("a.xml"),
                    PathBuf::from("b.xml"),
                    PathBuf::from("a.xml"),
                ],
            })
        );
    }

    #[test]
    fn test_version_flags() {
        assert_eq!(parse(&["--version"]), Ok(Command::Version));
        assert_eq!(parse(&["-V"]), Ok(Command::Version));
        assert_eq!(parse(&["-V", "-z", "only-one"]), Ok(Command::Version));
        assert_eq!(parse(&["--version", "s.xsd", "a.xml"]), Ok(Command::Version));
    }

    #[test]
    fn test_help_flags() {
        assert_eq!(parse(&["--help"]), Ok(Command::Help));
        assert_eq!(parse(&["-h"]), Ok(Command::Help));
        assert_eq!(parse(&["-h", "s.xsd", "a.xml"]), Ok(Command::Help));
    }

    #[test]
    fn test_flag_cluster_first_flag_wins() {
        assert_eq!(parse(&["-hV"]), Ok(Command::Help));
        assert_eq!(parse(&["-Vh"]), Ok(Command::Version));
        assert_eq!(parse(&["-hz"]), Ok(Command::Help));
        assert_eq!(parse(&["-zh"]), Err(UsageError::IllegalOption('z')));
    }

    #[test]
    fn test_illegal_option() {
        let err = parse(&["-z", "s.xsd", "a.xml"]).unwrap_err();
        assert_eq!(err, UsageError::IllegalOption('z'));
        assert_eq!(err.to_string(), "Illegal option z");
    }

    #[test]
    fn test_unknown_long_option_is_a_cluster() {
        assert_eq!(
            parse(&["--verbose", "s.xsd", "a.xml"]),
            Err(UsageError::IllegalOption('-'))
        );
        assert_eq!(
            parse(&["--", "s.xsd", "a.xml"]),
            Err(UsageError::IllegalOption('-'))
        );
    }

    #[test]
    fn test_bare_dash_is_ignored() {
        let command = parse(&["-", "s.xsd", "a.xml"]).unwrap();
        assert!(matches!(command, Command::Validate(_)));
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(parse(&[]), Err(UsageError::MissingArguments));
        assert_eq!(parse(&["s.xsd"]), Err(UsageError::MissingArguments));
        assert_eq!(parse(&["-", "s.xsd"]), Err(UsageError::MissingArguments));
    }

    #[test]
    fn test_option_scanning_stops_at_first_positional() {
        let command = parse(&["s.xsd", "-h", "-z"]).unwrap();
        assert_eq!(
            command,
            Command::Validate(Invocation {
                schema: PathBuf::from("s.xsd"),
                xml_files: vec![PathBuf::from("-h"), PathBuf::from("-z")],
            })
        );
    }
}
