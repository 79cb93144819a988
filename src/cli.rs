//! Command-line interface for datastacks-shell.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::protocol::Framing;

/// Command-line arguments.
///
/// Every connection option is optional so that unset flags leave lower
/// priority sources (env, config file) untouched.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Server host.
    pub host: Option<String>,
    /// Server port.
    pub port: Option<u16>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Wire framing.
    pub framing: Option<Framing>,
    /// Reply timeout in seconds.
    pub timeout: Option<u64>,
    /// Abort if the handshake is not answered with `OK`.
    pub strict_auth: bool,
    /// Skip the startup prompts.
    pub no_prompt: bool,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('H') | Long("host") => {
                let value: String = parser.value()?.parse()?;
                if value.is_empty() {
                    return Err(ArgsError::InvalidValue("host", value));
                }
                result.host = Some(value);
            }
            Short('p') | Long("port") => {
                let value: String = parser.value()?.parse()?;
                result.port = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("port", value))?,
                );
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('f') | Long("framing") => {
                let value: String = parser.value()?.parse()?;
                result.framing = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("framing", value))?,
                );
            }
            Short('t') | Long("timeout") => {
                let value: String = parser.value()?.parse()?;
                result.timeout = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("timeout", value))?,
                );
            }
            Long("strict-auth") => {
                result.strict_auth = true;
            }
            Long("no-prompt") => {
                result.no_prompt = true;
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"datastacks-shell {version}
Interactive command shell for the DataStacks key/value server

USAGE:
    datastacks-shell [OPTIONS]

OPTIONS:
    -H, --host <HOST>       Default server host [default: localhost]
    -p, --port <PORT>       Default server port [default: 3008]
    -c, --config <FILE>     Path to configuration file (JSON)
    -f, --framing <MODE>    Wire framing: legacy, line, length [default: legacy]
    -t, --timeout <SECS>    Give up waiting for a reply after SECS seconds
        --strict-auth       Exit unless the server answers the password with OK
        --no-prompt         Connect with configured values, skip the prompts
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    DATASTACKS_HOST         Server host (overrides config)
    DATASTACKS_PORT         Server port (overrides config)
    DATASTACKS_PASSWORD     Handshake password (overrides config)
    DATASTACKS_LOG_LEVEL    Log level (overrides config)
    RUST_LOG                Alternative log level setting

COMMANDS (sent to the server verbatim, type 'exit' to quit):
    PING                    Check the server is alive
    SET key "value"         Store a string
    SET key "a" "b"         Store an array
    SETEX key 60 "value"    Store with a time-to-live in seconds
    GET key                 Fetch a value
    PUSHBACK key "value"    Append to an array
    PUSHFRONT key "value"   Prepend to an array
    DEL key                 Remove a key
    DROPALL x               Remove every key

EXAMPLES:
    # Prompt for everything, offering localhost:3008 as default
    datastacks-shell

    # Non-interactive connection setup
    DATASTACKS_PASSWORD=secret datastacks-shell -H 10.0.0.5 --no-prompt
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("datastacks-shell {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("datastacks-shell")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.host.is_none());
        assert!(result.port.is_none());
        assert!(result.framing.is_none());
        assert!(!result.no_prompt);
        assert!(!result.strict_auth);
    }

    #[test]
    fn test_host_port() {
        let result = parse_args_from(args(&["-H", "db.local", "-p", "4000"])).unwrap();
        assert_eq!(result.host.as_deref(), Some("db.local"));
        assert_eq!(result.port, Some(4000));
    }

    #[test]
    fn test_long_options() {
        let result = parse_args_from(args(&[
            "--host",
            "10.0.0.5",
            "--port",
            "9000",
            "--framing",
            "length",
            "--timeout",
            "5",
        ]))
        .unwrap();
        assert_eq!(result.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(result.port, Some(9000));
        assert_eq!(result.framing, Some(Framing::Length));
        assert_eq!(result.timeout, Some(5));
    }

    #[test]
    fn test_flags() {
        let result = parse_args_from(args(&["--strict-auth", "--no-prompt"])).unwrap();
        assert!(result.strict_auth);
        assert!(result.no_prompt);
    }

    #[test]
    fn test_config_file() {
        let result = parse_args_from(args(&["-c", "/etc/datastacks.json"])).unwrap();
        assert_eq!(result.config, Some(PathBuf::from("/etc/datastacks.json")));
    }

    #[test]
    fn test_help_and_version() {
        assert!(parse_args_from(args(&["-h"])).unwrap().help);
        assert!(parse_args_from(args(&["--help"])).unwrap().help);
        assert!(parse_args_from(args(&["-V"])).unwrap().version);
        assert!(parse_args_from(args(&["--version"])).unwrap().version);
    }

    #[test]
    fn test_log_level() {
        let result = parse_args_from(args(&["-l", "debug"])).unwrap();
        assert_eq!(result.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_invalid_port() {
        let err = parse_args_from(args(&["-p", "70000"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for --port: '70000'");
    }

    #[test]
    fn test_invalid_framing() {
        let err = parse_args_from(args(&["-f", "xml"])).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidValue("framing", _)));
    }

    #[test]
    fn test_empty_host() {
        assert!(parse_args_from(args(&["-H", ""])).is_err());
    }

    #[test]
    fn test_positional_rejected() {
        let err = parse_args_from(args(&["localhost"])).unwrap_err();
        assert!(matches!(err, ArgsError::UnexpectedArgument(_)));
    }
}
