//! Error types for command resolution, tree building and configuration.
//!
//! The `Display` output of [`Error`] is shown verbatim to end users, so the
//! message wording is stable and covered by tests.

use thiserror::Error;

/// Error type returned by command handlers.
pub type CommandError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while resolving, binding or invoking a command.
#[derive(Debug, Error)]
pub enum Error {
    /// The command line contained no tokens.
    #[error("no command")]
    NoCommand,

    /// A path token matched neither a namespace nor a command.
    #[error("{}", bad_subcommand_message(.parent, .attempted))]
    BadSubcommand {
        /// Root-inclusive names of the namespaces walked so far.
        parent: Vec<String>,
        attempted: String,
        /// Namespace and command names valid at the point of failure.
        valid_options: Vec<String>,
    },

    /// The command line ended on a namespace instead of a command.
    #[error("'{}' requires a sub-command.", without_root(.parent))]
    MissingSubcommand {
        parent: Vec<String>,
        valid_options: Vec<String>,
    },

    /// A bare value appeared where a `--parameter` was expected.
    #[error(
        "Expected a parameter (--parameter) but got a value: {0}. Did you mean --{0}?"
    )]
    UnexpectedValue(String),

    /// A second bare value followed a completed `--key value` pair.
    #[error(
        "Attempted to pass multiple values to option (--{last_key} {last_value} {attempted}). Did you mean --{attempted}?"
    )]
    ConsecutiveValues {
        last_key: String,
        last_value: String,
        attempted: String,
    },

    /// Required parameters were not given.
    #[error("Missing parameters: {}", dashed(.0))]
    MissingParameters(Vec<String>),

    /// Parameters the command does not declare were given.
    #[error("Unexpected parameters: {}", dashed(.0))]
    UnexpectedParameters(Vec<String>),

    /// Parameters that need a value were given without one.
    #[error("Missing values for parameters: {}", dashed(.0))]
    MissingValues(Vec<String>),

    /// A value-less raw was cast to a type that needs a value.
    #[error("Missing value for type '{type_name}'")]
    MissingValue { type_name: String },

    /// A raw string could not be parsed as the declared type.
    #[error("Unable to convert '{raw}' to type '{type_name}': {message}")]
    Conversion {
        raw: String,
        type_name: String,
        message: String,
    },

    /// A raw string named no variant of the declared enum.
    #[error(
        "Unable to convert '{raw}' to type '{type_name}': expected one of {}",
        .variants.join(", ")
    )]
    EnumLookup {
        raw: String,
        type_name: String,
        variants: Vec<String>,
    },

    /// Both members of a mutually exclusive pair were set.
    #[error("The flags {} are mutually exclusive", exclusive_pair(.0))]
    ExclusiveFlags((String, String)),

    /// Only part of a required-together pair was set.
    #[error(
        "Passing the flags {} also requires the flags: {} to be provided",
        dashed(.present),
        dashed(.required)
    )]
    MissingRequiredCombination {
        present: Vec<String>,
        required: Vec<String>,
    },

    /// A quote in the command line was never closed.
    #[error("No closing quotation")]
    UnterminatedQuote,

    /// A handler asked for a bound argument with the wrong shape.
    #[error("Argument '{name}' is not of kind '{expected}'")]
    ArgumentKind { name: String, expected: &'static str },

    /// The command handler itself failed.
    #[error("{0}")]
    Command(CommandError),
}

impl Error {
    /// Returns `true` for errors caused by a malformed invocation, as opposed
    /// to failures inside the invoked command.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::Error;
    ///
    /// assert!(Error::NoCommand.is_bad_arguments());
    /// assert!(!Error::Command("boom".into()).is_bad_arguments());
    /// ```
    pub fn is_bad_arguments(&self) -> bool {
        !matches!(self, Error::Command(_) | Error::ArgumentKind { .. })
    }

    /// Names that would have been accepted at the point of failure, for
    /// path-resolution errors.
    pub fn valid_options(&self) -> Option<&[String]> {
        match self {
            Error::BadSubcommand { valid_options, .. }
            | Error::MissingSubcommand { valid_options, .. } => Some(valid_options),
            _ => None,
        }
    }
}

/// Errors raised while building a [`Namespace`](crate::Namespace) or
/// declaring a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Two sibling groups share a name.
    #[error("duplicate namespace '{name}' in '{location}'")]
    DuplicateNamespace { name: String, location: String },

    /// Two sibling commands share a name.
    #[error("duplicate command '{name}' in '{location}'")]
    DuplicateCommand { name: String, location: String },

    /// A group and a command share a name at the same level.
    #[error("'{name}' is declared as both a namespace and a command in '{location}'")]
    AmbiguousName { name: String, location: String },

    /// A command declares the same argument twice.
    #[error("duplicate argument '{name}' on command '{command}'")]
    DuplicateArgument { command: String, name: String },

    /// A validator references arguments the command does not declare.
    #[error(
        "Received arguments: {} for decorator, which are not accepted by '{command}'.",
        tuple(.names)
    )]
    UnknownValidatorArguments { names: Vec<String>, command: String },
}

/// Errors raised while loading or saving a [`ParserConfig`](crate::ParserConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

fn without_root(path: &[String]) -> String {
    path.get(1..).unwrap_or_default().join(" ")
}

fn bad_subcommand_message(parent: &[String], attempted: &str) -> String {
    if parent.len() > 1 {
        format!(
            "'{}' has no sub-command '{attempted}'.",
            without_root(parent)
        )
    } else {
        format!("No top-level command '{attempted}'.")
    }
}

fn dashed(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("--{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn exclusive_pair(pair: &(String, String)) -> String {
    format!("--{}, --{}", pair.0, pair.1)
}

fn tuple(names: &[String]) -> String {
    let quoted = names.iter().map(|n| format!("'{n}'")).collect::<Vec<_>>();
    format!("({})", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_subcommand_top_level() {
        let err = Error::BadSubcommand {
            parent: vec!["Calculator".into()],
            attempted: "asd".into(),
            valid_options: vec!["double".into()],
        };
        assert_eq!(err.to_string(), "No top-level command 'asd'.");
        assert_eq!(err.valid_options(), Some(&["double".to_string()][..]));
    }

    #[test]
    fn test_bad_subcommand_nested_drops_root() {
        let err = Error::BadSubcommand {
            parent: vec!["Tools".into(), "Calculator".into()],
            attempted: "triple".into(),
            valid_options: vec!["double".into()],
        };
        assert_eq!(
            err.to_string(),
            "'Calculator' has no sub-command 'triple'."
        );
    }

    #[test]
    fn test_parameter_lists_are_dashed() {
        let err = Error::MissingParameters(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Missing parameters: --a, --b");

        let err = Error::UnexpectedParameters(vec!["c".into()]);
        assert_eq!(err.to_string(), "Unexpected parameters: --c");
    }

    #[test]
    fn test_consecutive_values_message() {
        let err = Error::ConsecutiveValues {
            last_key: "name".into(),
            last_value: "a".into(),
            attempted: "b".into(),
        };
        assert_eq!(
            err.to_string(),
            "Attempted to pass multiple values to option (--name a b). Did you mean --b?"
        );
    }

    #[test]
    fn test_required_combination_message() {
        let err = Error::MissingRequiredCombination {
            present: vec!["a".into()],
            required: vec!["b".into()],
        };
        assert_eq!(
            err.to_string(),
            "Passing the flags --a also requires the flags: --b to be provided"
        );
    }

    #[test]
    fn test_unknown_validator_arguments_message() {
        let err = BuildError::UnknownValidatorArguments {
            names: vec!["c".into(), "d".into()],
            command: "a_function".into(),
        };
        assert_eq!(
            err.to_string(),
            "Received arguments: ('c', 'd') for decorator, which are not accepted by 'a_function'."
        );
    }
}
