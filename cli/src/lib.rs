//! Runs a command-tree [`Namespace`] as a process entry point.
//!
//! [`simple_cli`] is the one-call entry: it parses the process arguments
//! into [`CliOptions`], installs logging, builds the namespace and hands off
//! to [`run`], returning the exit status.
//!
//! Exit statuses:
//!
//! | status | meaning |
//! |---|---|
//! | 0 | the command ran (or docs were printed) |
//! | 1 | the command itself failed, or the configuration could not be loaded |
//! | 2 | the command line was rejected before the command ran |

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use command_tree_core::{
    ConfigError, Error, Group, Namespace, ParserConfig, Value, execute_tokens_with,
};
use command_tree_docs::{generate_docs, render_listing};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_BAD_ARGUMENTS: i32 = 2;

const DEFAULT_LOG_FILTER: &str = "warn";

/// How a command's return value is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain display form; nothing is printed for an empty result.
    #[default]
    Text,
    /// One JSON document per invocation.
    Json,
}

#[derive(Debug, Parser)]
#[command(about = "Run a command from the command tree")]
pub struct CliOptions {
    /// Print Markdown documentation for every command and exit.
    #[arg(long)]
    pub markdown: bool,
    /// List every command path and exit.
    #[arg(long, conflicts_with = "markdown")]
    pub list: bool,
    /// Output format for the command's result.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// YAML parser configuration (list separator, true values, internal prefix).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Log filter directive, e.g. `debug` or `command_tree_core=trace`.
    /// Overrides `RUST_LOG`.
    #[arg(long)]
    pub log_level: Option<String>,
    /// Namespace path, command name and `--key value` arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl CliOptions {
    /// Loads the `--config` file, or the default configuration when absent.
    pub fn parser_config(&self) -> Result<ParserConfig, ConfigError> {
        match &self.config {
            Some(path) => ParserConfig::load(path),
            None => Ok(ParserConfig::default()),
        }
    }
}

/// Runs `group` as a CLI over the process arguments.
pub fn simple_cli(group: &Group) -> i32 {
    simple_cli_from(group, std::env::args_os())
}

/// [`simple_cli`] over an explicit argument list; the first item is the
/// program name.
pub fn simple_cli_from<I, T>(group: &Group, args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let opts = match CliOptions::try_parse_from(args) {
        Ok(opts) => opts,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };
    init_logging(opts.log_level.as_deref());
    tracing::debug!(?opts, "parsed options");

    let config = match opts.parser_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: failed to load config: {err}");
            return EXIT_FAILURE;
        }
    };
    let ns = match Namespace::from_group_with(group, &config) {
        Ok(ns) => ns,
        Err(err) => {
            eprintln!("error: {err}");
            return EXIT_FAILURE;
        }
    };

    run(&ns, &opts, &config, &mut io::stdout().lock(), &mut io::stderr().lock())
}

/// Executes the command selected by `opts` and reports the outcome.
///
/// The result goes to `out`; diagnostics go to `err`. Returns the exit
/// status.
pub fn run(
    ns: &Namespace,
    opts: &CliOptions,
    config: &ParserConfig,
    out: &mut impl Write,
    err: &mut impl Write,
) -> i32 {
    if opts.markdown {
        return emit(out, err, &generate_docs(ns, "##"));
    }
    if opts.list {
        return emit(out, err, &render_listing(ns));
    }

    match execute_tokens_with(ns, &opts.command, config) {
        Ok(value) => match format_value(&value, opts.format) {
            Ok(Some(text)) => emit(out, err, &format!("{text}\n")),
            Ok(None) => EXIT_SUCCESS,
            Err(msg) => {
                let _ = writeln!(err, "error: {msg}");
                EXIT_FAILURE
            }
        },
        Err(failure) if failure.is_bad_arguments() => {
            let _ = writeln!(err, "{}", bad_arguments_message(ns, &failure));
            EXIT_BAD_ARGUMENTS
        }
        Err(failure) => {
            let _ = writeln!(err, "error: {failure}");
            EXIT_FAILURE
        }
    }
}

/// Installs a stderr `fmt` subscriber.
///
/// `level` wins over `RUST_LOG`; with neither set only warnings are shown.
/// A subscriber that is already installed is left in place.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .try_init();
}

fn format_value(value: &Value, format: OutputFormat) -> Result<Option<String>, String> {
    match format {
        OutputFormat::Text if value.is_none() => Ok(None),
        OutputFormat::Text => Ok(Some(value.to_string())),
        OutputFormat::Json => serde_json::to_string(value)
            .map(Some)
            .map_err(|e| format!("JSON serialization failed: {e}")),
    }
}

/// Appends the accepted names to path-resolution errors.
fn bad_arguments_message(ns: &Namespace, failure: &Error) -> String {
    let options = match failure {
        Error::NoCommand => Some(ns.child_names()),
        other => other.valid_options().map(<[String]>::to_vec),
    };
    let message = failure.to_string();
    match options {
        Some(names) => {
            let sep = if message.ends_with('.') { " " } else { ". " };
            format!("{message}{sep}Try any of: {}", quoted_list(&names))
        }
        None => message,
    }
}

fn quoted_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|name| format!("'{name}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn emit(out: &mut impl Write, err: &mut impl Write, text: &str) -> i32 {
    match out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "error: failed to write output: {e}");
            EXIT_FAILURE
        }
    }
}
