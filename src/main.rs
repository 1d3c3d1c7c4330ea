use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use xsd_validator::{AppConfig, Command, LibXml2Wrapper, Output, UsageError, parse_args, run};

/// Exit code for command lines that cannot be acted on
const USAGE_ERROR: u8 = 2;

/// Exit code when stdout or stderr cannot be written, kept apart from the
/// validation outcomes 1 to 3
const OUTPUT_ERROR: u8 = 4;

fn init_logging() {
    // Silent unless RUST_LOG asks otherwise; stdout and stderr carry the tool's contract
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let config = AppConfig::load();
    let mut output = Output::stdio();

    let result = match parse_args(std::env::args_os().skip(1)) {
        Ok(Command::Version) => output.version(&config).map(|_| ExitCode::SUCCESS),
        Ok(Command::Help) => output.help(&config).map(|_| ExitCode::SUCCESS),
        Ok(Command::Validate(invocation)) => {
            let engine = LibXml2Wrapper::new();
            run(&engine, &invocation, &mut output).map(ExitCode::from)
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejecting command line");
            let reported = match err {
                UsageError::IllegalOption(flag) => output.illegal_option(flag),
                UsageError::MissingArguments => Ok(()),
            };
            reported
                .and_then(|_| output.usage(&config))
                .map(|_| ExitCode::from(USAGE_ERROR))
        }
    };

    result.unwrap_or_else(|err| {
        tracing::error!(error = %err, "console output failed");
        eprintln!("{}", err);
        ExitCode::from(OUTPUT_ERROR)
    })
}
