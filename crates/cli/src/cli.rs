use clap::error::ErrorKind;
use clap::{Args, Parser};
use miette::{Diagnostic, Report};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::tracing::{LogLevel, TracingConfig, TracingFormat, init_tracing};

/// Exit code for a completed run
pub const EXIT_OK: i32 = 0;
/// Exit code for usage errors and fatal failures
pub const EXIT_ERROR: i32 = 1;

/// Fatal errors of the srcfetch tools
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// An input file could not be read
    #[error("Failed to read input: {message}")]
    #[diagnostic(code(srcfetch::input))]
    Input {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// The resolver could not be run or reported failure
    #[error("Resolver failed: {message}")]
    #[diagnostic(code(srcfetch::resolver))]
    Resolver {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// An output file could not be written
    #[error("Failed to write output: {message}")]
    #[diagnostic(code(srcfetch::output))]
    Output {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Logging could not be set up
    #[error("Tracing initialization failed: {message}")]
    #[diagnostic(
        code(srcfetch::tracing),
        help("Check --log-level and the RUST_LOG environment variable")
    )]
    Tracing {
        /// The error message
        message: String,
    },
    /// Other unexpected error
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(srcfetch::other))]
    Other {
        /// The error message
        message: String,
    },
}

impl CliError {
    /// Create an input error
    #[must_use]
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: None,
        }
    }

    /// Create a resolver error
    #[must_use]
    pub fn resolver(message: impl Into<String>) -> Self {
        Self::Resolver {
            message: message.into(),
            help: None,
        }
    }

    /// Create an output error
    #[must_use]
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
            help: None,
        }
    }

    /// Create a tracing error
    #[must_use]
    pub fn tracing(message: impl Into<String>) -> Self {
        Self::Tracing {
            message: message.into(),
        }
    }

    /// Add help text to an existing error
    #[must_use]
    pub fn with_help(self, help_text: impl Into<String>) -> Self {
        let help = Some(help_text.into());
        match self {
            Self::Input { message, .. } => Self::Input { message, help },
            Self::Resolver { message, .. } => Self::Resolver { message, help },
            Self::Output { message, .. } => Self::Output { message, help },
            other => other,
        }
    }
}

impl From<srcfetch_manifest::Error> for CliError {
    fn from(err: srcfetch_manifest::Error) -> Self {
        match err {
            srcfetch_manifest::Error::Read { .. } => {
                Self::input(err.to_string()).with_help("Check that the file exists and is readable")
            }
            srcfetch_manifest::Error::Write { .. } => Self::output(err.to_string())
                .with_help("Check that the output directory exists and is writable"),
        }
    }
}

impl From<srcfetch_spack::Error> for CliError {
    fn from(err: srcfetch_spack::Error) -> Self {
        match err {
            srcfetch_spack::Error::Manifest(inner) => inner.into(),
            srcfetch_spack::Error::Spawn { .. } => Self::resolver(err.to_string())
                .with_help("Is spack on PATH? Use --spack or SPACK_BIN to point at it"),
            srcfetch_spack::Error::CommandFailed { .. } => Self::resolver(err.to_string()),
        }
    }
}

impl From<srcfetch_fetch::Error> for CliError {
    fn from(err: srcfetch_fetch::Error) -> Self {
        match err {
            srcfetch_fetch::Error::Manifest(inner) => inner.into(),
            other => Self::Other {
                message: other.to_string(),
            },
        }
    }
}

/// Logging options shared by every tool
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log level for srcfetch messages
    #[arg(
        long,
        value_enum,
        env = "SRCFETCH_LOG_LEVEL",
        default_value_t = LogLevel::Info
    )]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value_t = TracingFormat::Compact)]
    pub log_format: TracingFormat,
}

impl LogArgs {
    /// Tracing configuration for these options
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            format: self.log_format,
            level: self.log_level.into(),
            filter: None,
        }
    }
}

/// List the upstream sources of a Spack spec's dependencies
#[derive(Parser, Debug)]
#[command(name = "get-sources", version)]
pub struct GetSourcesArgs {
    /// Spack spec to resolve, e.g. `hdf5@1.14%gcc`
    pub spec: String,

    /// File of package names to fetch, one per line
    pub whitelist: PathBuf,

    /// File of URL substrings a source must contain, one per line
    pub url_filter: PathBuf,

    /// Spack executable
    #[arg(long, env = "SPACK_BIN", default_value = "spack")]
    pub spack: PathBuf,

    /// Directory receiving the two manifests
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Merge two download manifests, preferring the first on name collisions
#[derive(Parser, Debug)]
#[command(name = "merge-sources", version)]
pub struct MergeSourcesArgs {
    /// Manifest whose entries win
    pub first: PathBuf,

    /// Manifest filling in packages missing from the first
    pub second: PathBuf,

    /// Merged manifest path
    #[arg(long, default_value = srcfetch_manifest::DEFAULT_MERGE_OUTPUT)]
    pub output: PathBuf,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Download or clone every source listed in a manifest
#[derive(Parser, Debug)]
#[command(name = "fetch-sources", version)]
pub struct FetchSourcesArgs {
    /// Manifest of `name@version -> location` lines
    pub manifest: PathBuf,

    /// Directory receiving the `<name>-<version>` directories
    #[arg(long, default_value = ".")]
    pub target_dir: PathBuf,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Parse arguments, exiting with [`EXIT_ERROR`] and usage on bad input.
///
/// `--help` and `--version` exit with [`EXIT_OK`].
#[must_use]
pub fn parse_or_exit<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_OK,
                _ => EXIT_ERROR,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}

/// Print an error with its diagnostics to stderr
pub fn render_error(err: CliError) {
    eprintln!("{:?}", Report::new(err));
}

/// Set up logging, run a tool against stdout and map the result to an exit code
pub fn run_tool<F, T>(log: &LogArgs, tool: F) -> i32
where
    F: FnOnce(&mut dyn Write) -> Result<T, CliError>,
{
    if let Err(err) = init_tracing(log.tracing_config()) {
        render_error(err);
        return EXIT_ERROR;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match tool(&mut out) {
        Ok(_) => EXIT_OK,
        Err(err) => {
            tracing::error!(error = %err, "Aborting");
            render_error(err);
            EXIT_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_sources_positionals() {
        let args = GetSourcesArgs::try_parse_from([
            "get-sources",
            "hdf5@1.14%gcc",
            "whitelist.txt",
            "urls.txt",
        ])
        .unwrap();
        assert_eq!(args.spec, "hdf5@1.14%gcc");
        assert_eq!(args.whitelist, PathBuf::from("whitelist.txt"));
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.log.log_level, LogLevel::Info);
    }

    #[test]
    fn test_get_sources_wrong_count() {
        let err = GetSourcesArgs::try_parse_from(["get-sources", "hdf5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = GetSourcesArgs::try_parse_from(["get-sources", "a", "b", "c", "d"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_merge_default_output() {
        let args = MergeSourcesArgs::try_parse_from(["merge-sources", "a.txt", "b.txt"]).unwrap();
        assert_eq!(args.output, PathBuf::from("merge_to_download.txt"));
    }

    #[test]
    fn test_fetch_flags() {
        let args = FetchSourcesArgs::try_parse_from([
            "fetch-sources",
            "m.txt",
            "--target-dir",
            "src",
            "--log-level",
            "warn",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.target_dir, PathBuf::from("src"));
        assert_eq!(args.log.log_level, LogLevel::Warn);
        assert_eq!(args.log.log_format, TracingFormat::Json);
    }

    #[test]
    fn test_manifest_read_error_maps_to_input() {
        let err = srcfetch_manifest::Error::read(
            "whitelist.txt",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        let cli: CliError = err.into();
        assert!(matches!(cli, CliError::Input { help: Some(_), .. }));
        assert!(cli.to_string().contains("whitelist.txt"));
    }

    #[test]
    fn test_resolver_error_maps_to_resolver() {
        let err = srcfetch_spack::Error::command_failed("spack spec zlib", "exit status: 1");
        let cli: CliError = err.into();
        assert!(matches!(cli, CliError::Resolver { .. }));
    }
}
