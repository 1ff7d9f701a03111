#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually; `TESSEL_DEMO_*` environment variables supply
//! defaults that explicit flags override.

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log file for the fmt subscriber.
pub const ENV_LOG: &str = "TESSEL_LOG";
/// Poll interval between frames, in milliseconds.
pub const ENV_TICK_MS: &str = "TESSEL_DEMO_TICK_MS";
/// Auto-quit after this many milliseconds.
pub const ENV_EXIT_AFTER_MS: &str = "TESSEL_DEMO_EXIT_AFTER_MS";

const HELP_TEXT: &str = "\
Tessel demo: a bordered counter driven by the element tree

USAGE:
    tessel-demo [OPTIONS]

OPTIONS:
    --tick-ms=N          Poll interval between frames (default: 50)
    --exit-after-ms=N    Quit automatically after N milliseconds
    --log=PATH           Write tracing output to PATH
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Up / +          Increment the counter
    Down / -        Decrement the counter
    r               Reset the counter
    q / Ctrl+C      Quit

ENVIRONMENT VARIABLES:
    TESSEL_LOG                  Override --log
    TESSEL_DEMO_TICK_MS         Override --tick-ms
    TESSEL_DEMO_EXIT_AFTER_MS   Override --exit-after-ms
    TESSEL_PAINT_CACHE          0/false disables paint caching";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub tick: Duration,
    /// Zero disables auto-exit.
    pub exit_after: Duration,
    pub log_path: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(50),
            exit_after: Duration::ZERO,
            log_path: None,
        }
    }
}

/// Outcome of parsing that should stop the program before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Help,
    Version,
    Invalid(String),
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version` or a malformed flag.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(Exit::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(Exit::Version) => {
                println!("tessel-demo {VERSION}");
                process::exit(0);
            }
            Err(Exit::Invalid(msg)) => {
                eprintln!("{msg}");
                process::exit(1);
            }
        }
    }

    /// Parse from explicit arguments and an environment lookup.
    ///
    /// # Errors
    ///
    /// [`Exit`] for help, version, or an invalid flag value.
    pub fn parse_from<F>(args: &[String], get_env: F) -> Result<Self, Exit>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = get_env(ENV_TICK_MS)
            && let Ok(n) = val.parse()
        {
            opts.tick = Duration::from_millis(n);
        }
        if let Some(val) = get_env(ENV_EXIT_AFTER_MS)
            && let Ok(n) = val.parse()
        {
            opts.exit_after = Duration::from_millis(n);
        }
        if let Some(val) = get_env(ENV_LOG).filter(|v| !v.is_empty()) {
            opts.log_path = Some(PathBuf::from(val));
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Err(Exit::Help),
                "--version" | "-V" => return Err(Exit::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--tick-ms=") {
                        opts.tick = Duration::from_millis(parse_ms("--tick-ms", val)?);
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after = Duration::from_millis(parse_ms("--exit-after-ms", val)?);
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log_path = Some(PathBuf::from(val));
                    } else {
                        return Err(Exit::Invalid(format!("Unknown argument: {other}")));
                    }
                }
            }
        }
        Ok(opts)
    }
}

fn parse_ms(flag: &str, val: &str) -> Result<u64, Exit> {
    val.parse()
        .map_err(|_| Exit::Invalid(format!("Invalid {flag} value: {val}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Opts, Exit> {
        let args: Vec<String> = args.iter().map(|s| (*s).to_owned()).collect();
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Opts::parse_from(&args, |key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        assert_eq!(parse(&[], &[]), Ok(Opts::default()));
    }

    #[test]
    fn env_supplies_defaults() {
        let opts = parse(&[], &[(ENV_TICK_MS, "20"), (ENV_LOG, "/tmp/t.log")]).unwrap();
        assert_eq!(opts.tick, Duration::from_millis(20));
        assert_eq!(opts.log_path, Some(PathBuf::from("/tmp/t.log")));
    }

    #[test]
    fn flags_override_env() {
        let opts = parse(&["--tick-ms=5"], &[(ENV_TICK_MS, "20")]).unwrap();
        assert_eq!(opts.tick, Duration::from_millis(5));
    }

    #[test]
    fn malformed_env_is_ignored() {
        let opts = parse(&[], &[(ENV_EXIT_AFTER_MS, "soon")]).unwrap();
        assert_eq!(opts.exit_after, Duration::ZERO);
    }

    #[test]
    fn malformed_flag_is_rejected() {
        assert_eq!(
            parse(&["--tick-ms=fast"], &[]),
            Err(Exit::Invalid("Invalid --tick-ms value: fast".into()))
        );
        assert!(matches!(parse(&["--bogus"], &[]), Err(Exit::Invalid(_))));
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["-h"], &[]), Err(Exit::Help));
        assert_eq!(parse(&["--version"], &[]), Err(Exit::Version));
        assert!(HELP_TEXT.contains(ENV_LOG));
        assert!(HELP_TEXT.contains(ENV_TICK_MS));
    }
}
