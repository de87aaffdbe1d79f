//! Command resolution, argument binding and invocation.
//!
//! [`execute_command`] is the main entry point: it splits a command line,
//! walks the [`Namespace`] tree to a [`Command`], binds and casts the flag
//! segment against the command's declared arguments, runs the command's
//! validators, and finally invokes the handler. Any error short-circuits the
//! call before the handler runs.

use tracing::debug;

use crate::bound::BoundArgs;
use crate::cast::cast_with;
use crate::config::ParserConfig;
use crate::error::{Error, Result};
use crate::namespace::{Command, Namespace};
use crate::tokenize::{ParsedArgs, args_to_kwargs, split_command_line};
use crate::types::{ArgType, Value};

/// Resolves and runs `command_line` against `root`.
///
/// # Errors
///
/// Any [`Error`] from splitting, path resolution, tokenizing, binding,
/// casting or validation; handler failures come back as [`Error::Command`].
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let math = Group::new("Math").with_command(
///     CommandDef::new("add", |args| {
///         Ok(Value::Float(args.int("a")? as f64 + args.float("b")?))
///     })
///     .with_arg(Arg::new("a", ArgType::Int))
///     .with_arg(Arg::new("b", ArgType::Float)),
/// );
/// let ns = Namespace::from_group(&math).unwrap();
///
/// assert_eq!(execute_command(&ns, "add --a 10 --b 5.1").unwrap(), Value::Float(15.1));
///
/// let err = execute_command(&ns, "add --a 10").unwrap_err();
/// assert_eq!(err.to_string(), "Missing parameters: --b");
/// ```
pub fn execute_command(root: &Namespace, command_line: &str) -> Result<Value> {
    execute_command_with(root, command_line, &ParserConfig::default())
}

/// [`execute_command`] with an explicit configuration.
pub fn execute_command_with(
    root: &Namespace,
    command_line: &str,
    config: &ParserConfig,
) -> Result<Value> {
    let tokens = split_command_line(command_line)?;
    execute_tokens_with(root, &tokens, config)
}

/// Resolves and runs already split tokens against `root`.
///
/// Used when the caller has the tokens at hand, such as process arguments.
pub fn execute_tokens<S: AsRef<str>>(root: &Namespace, tokens: &[S]) -> Result<Value> {
    execute_tokens_with(root, tokens, &ParserConfig::default())
}

/// [`execute_tokens`] with an explicit configuration.
pub fn execute_tokens_with<S: AsRef<str>>(
    root: &Namespace,
    tokens: &[S],
    config: &ParserConfig,
) -> Result<Value> {
    let (command, flags) = resolve(root, tokens)?;
    let bound = bind(command, flags, config)?;

    for validator in command.validators() {
        validator.validate(&bound)?;
    }

    debug!(
        command = %command.name(),
        args = ?bound.names().collect::<Vec<_>>(),
        "invoking command"
    );
    command.invoke(&bound).map_err(Error::Command)
}

/// Walks `tokens` down the namespace tree to a command.
///
/// Returns the command and the tokens that follow its name.
///
/// # Errors
///
/// - [`Error::NoCommand`] for an empty token list.
/// - [`Error::BadSubcommand`] when a token names nothing at its level.
/// - [`Error::MissingSubcommand`] when the tokens end on a namespace.
pub fn resolve<'a, 't, S: AsRef<str>>(
    root: &'a Namespace,
    tokens: &'t [S],
) -> Result<(&'a Command, &'t [S])> {
    if tokens.is_empty() {
        return Err(Error::NoCommand);
    }

    let mut current = root;
    for (idx, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        if let Some(member) = current.find_member(token) {
            current = member;
            continue;
        }
        if let Some(command) = current.find_command(token) {
            debug!(path = ?command.path(), command = %command.name(), "resolved command");
            return Ok((command, &tokens[idx + 1..]));
        }
        return Err(Error::BadSubcommand {
            parent: current.path().to_vec(),
            attempted: token.to_string(),
            valid_options: current.child_names(),
        });
    }

    Err(Error::MissingSubcommand {
        parent: current.path().to_vec(),
        valid_options: current.child_names(),
    })
}

/// Tokenizes `flags` and binds them to the declared arguments of `command`.
///
/// Presence checks run before any casting, in this order: undeclared keys,
/// missing required arguments, then keys given without a needed value. A
/// repeated key needs a value on every occurrence.
pub fn bind<S: AsRef<str>>(
    command: &Command,
    flags: &[S],
    config: &ParserConfig,
) -> Result<BoundArgs> {
    let parsed = args_to_kwargs(flags)?;
    check_presence(command, &parsed)?;

    let mut bound = BoundArgs::default();
    for arg in command.args() {
        let value = match parsed.get(&arg.name) {
            Some(raw) => cast_with(&raw, &arg.arg_type, config)?,
            None => default_value(&arg.arg_type, arg.default.as_ref()),
        };
        bound.insert(&arg.name, value);
    }
    Ok(bound)
}

fn check_presence(command: &Command, parsed: &ParsedArgs) -> Result<()> {
    let mut unexpected: Vec<String> = parsed
        .keys()
        .filter(|key| command.find_arg(key).is_none())
        .map(String::from)
        .collect();
    if !unexpected.is_empty() {
        unexpected.sort();
        return Err(Error::UnexpectedParameters(unexpected));
    }

    let missing: Vec<String> = command
        .args()
        .iter()
        .filter(|arg| arg.is_required() && !parsed.contains_key(&arg.name))
        .map(|arg| arg.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingParameters(missing));
    }

    let valueless: Vec<String> = command
        .args()
        .iter()
        .filter(|arg| needs_value(&arg.arg_type))
        .filter(|arg| {
            parsed
                .occurrences(&arg.name)
                .is_some_and(|values| values.iter().any(Option::is_none))
        })
        .map(|arg| arg.name.clone())
        .collect();
    if !valueless.is_empty() {
        return Err(Error::MissingValues(valueless));
    }

    Ok(())
}

/// Whether a key of this type must be followed by a value.
fn needs_value(arg_type: &ArgType) -> bool {
    match arg_type {
        ArgType::Flag | ArgType::Optional(_) => false,
        ArgType::Union(members) => !members.iter().any(|m| !needs_value(m)),
        _ => true,
    }
}

fn default_value(arg_type: &ArgType, default: Option<&Value>) -> Value {
    match (default, arg_type) {
        (Some(value), _) => value.clone(),
        (None, ArgType::Flag) => Value::Bool(false),
        (None, _) => Value::None,
    }
}
