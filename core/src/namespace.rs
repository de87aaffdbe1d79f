//! Command-tree declaration and the immutable namespace tree built from it.
//!
//! Applications declare their commands with [`Group`] and [`CommandDef`],
//! then build a [`Namespace`] once. The built tree is read-only: documentation
//! renderers and the resolver only ever see ordered views of it.
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let tools = Group::new("Tools")
//!     .with_group(
//!         Group::new("Calculator").with_command(
//!             CommandDef::new("double", |args| Ok(Value::Int(2 * args.int("number")?)))
//!                 .with_arg(Arg::new("number", ArgType::Int)),
//!         ),
//!     )
//!     .with_command(CommandDef::new("_internal", |_| Ok(Value::None)));
//!
//! let ns = Namespace::from_group(&tools).unwrap();
//! assert_eq!(ns.name(), "Tools");
//! assert!(ns.callables().is_empty());
//! assert_eq!(ns.members()[0].callables()[0].name(), "double");
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::bound::BoundArgs;
use crate::config::ParserConfig;
use crate::error::{BuildError, CommandError};
use crate::types::{Arg, Value};
use crate::validate::{ExclusiveFlags, RequiredTogether, Validator, check_validator_names};

/// Shared, thread-safe command handler.
pub type Handler = Arc<dyn Fn(&BoundArgs) -> Result<Value, CommandError> + Send + Sync>;

/// Declaration of one invocable command.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let modify = CommandDef::new("modify", |_| Ok(Value::None))
///     .with_arg(Arg::new("value", ArgType::Str))
///     .with_arg(Arg::flag("reverse"))
///     .with_arg(Arg::flag("crop_4"))
///     .exclusive_flags([("reverse", "crop_4")]);
/// assert_eq!(modify.name, "modify");
///
/// // Validators may only reference arguments the command declares.
/// let f = CommandDef::new("f", |_| Ok(Value::None))
///     .with_arg(Arg::flag("a"))
///     .required_together([("a", "b")]);
/// let err = Namespace::from_group(&Group::new("Root").with_command(f)).unwrap_err();
/// assert!(matches!(err, BuildError::UnknownValidatorArguments { .. }));
/// ```
#[derive(Clone)]
pub struct CommandDef {
    pub name: String,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub args: Vec<Arg>,
    validators: Vec<Arc<dyn Validator>>,
    handler: Handler,
}

impl CommandDef {
    /// Creates a command declaration with no arguments.
    pub fn new<F>(name: &str, handler: F) -> Self
    where
        F: Fn(&BoundArgs) -> Result<Value, CommandError> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: None,
            long_description: None,
            args: Vec::new(),
            validators: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Adds an argument; arguments keep declaration order.
    pub fn with_arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    /// Adds a one-line description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds a longer description shown after the one-liner.
    pub fn with_long_description(mut self, desc: &str) -> Self {
        self.long_description = Some(desc.to_string());
        self
    }

    /// Attaches a validator; validators run in the order they are attached.
    ///
    /// The names it refers to are checked against the command's arguments
    /// when the namespace is built, so arguments may be added before or
    /// after the validator.
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Attaches an [`ExclusiveFlags`] validator over `pairs`.
    pub fn exclusive_flags<'a>(self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        self.with_validator(ExclusiveFlags::new(pairs))
    }

    /// Attaches a [`RequiredTogether`] validator over `pairs`.
    pub fn required_together<'a>(
        self,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.with_validator(RequiredTogether::new(pairs))
    }
}

impl fmt::Debug for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDef")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}

/// Declaration of a group of commands and nested groups.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub name: String,
    pub description: Option<String>,
    pub groups: Vec<Group>,
    pub commands: Vec<CommandDef>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a nested group.
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds a command.
    pub fn with_command(mut self, command: CommandDef) -> Self {
        self.commands.push(command);
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// An invocable leaf of the namespace tree.
#[derive(Clone)]
pub struct Command {
    name: String,
    path: Vec<String>,
    description: Option<String>,
    long_description: Option<String>,
    args: Vec<Arg>,
    validators: Vec<Arc<dyn Validator>>,
    handler: Handler,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root-inclusive names of the namespaces that own this command.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Space-joined owning namespaces below the root; empty for top-level
    /// commands.
    pub fn category(&self) -> String {
        self.path.get(1..).unwrap_or_default().join(" ")
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn long_description(&self) -> Option<&str> {
        self.long_description.as_deref()
    }

    /// Declared arguments, in declaration order.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn find_arg(&self, name: &str) -> Option<&Arg> {
        self.args.iter().find(|a| a.name == name)
    }

    /// Attached validators, in declaration order.
    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }

    /// Runs the handler on already bound arguments.
    pub fn invoke(&self, args: &BoundArgs) -> Result<Value, CommandError> {
        (self.handler)(args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("args", &self.args)
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}

/// A node of the built command tree.
#[derive(Debug, Clone)]
pub struct Namespace {
    name: String,
    path: Vec<String>,
    description: Option<String>,
    members: Vec<Namespace>,
    callables: Vec<Command>,
}

impl Namespace {
    /// Builds the tree for `group` with the default [`ParserConfig`].
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] when sibling names collide or a command
    /// declares the same argument twice.
    pub fn from_group(group: &Group) -> Result<Self, BuildError> {
        Self::from_group_with(group, &ParserConfig::default())
    }

    /// Builds the tree for `group`, skipping names that
    /// [`ParserConfig::is_internal`] marks as internal.
    pub fn from_group_with(group: &Group, config: &ParserConfig) -> Result<Self, BuildError> {
        let mut path = Vec::new();
        build_namespace(group, &mut path, config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root-inclusive names from the root down to this namespace.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Nested namespaces, in declaration order.
    pub fn members(&self) -> &[Namespace] {
        &self.members
    }

    /// Commands declared directly on this namespace, in declaration order.
    pub fn callables(&self) -> &[Command] {
        &self.callables
    }

    pub fn find_member(&self, name: &str) -> Option<&Namespace> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.callables.iter().find(|c| c.name == name)
    }

    /// Names valid at this level: members first, then commands.
    pub fn child_names(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| m.name.clone())
            .chain(self.callables.iter().map(|c| c.name.clone()))
            .collect()
    }

    /// Every command in the tree, depth-first: own callables, then each
    /// member's commands.
    pub fn commands(&self) -> Vec<&Command> {
        let mut out: Vec<&Command> = self.callables.iter().collect();
        for member in &self.members {
            out.extend(member.commands());
        }
        out
    }
}

fn build_namespace(
    group: &Group,
    path: &mut Vec<String>,
    config: &ParserConfig,
) -> Result<Namespace, BuildError> {
    path.push(group.name.clone());
    let location = path.join(" ");

    let mut member_names: HashSet<&str> = HashSet::new();
    let mut members = Vec::new();
    for child in &group.groups {
        if config.is_internal(&child.name) {
            debug!(namespace = %child.name, location = %location, "skipping internal namespace");
            continue;
        }
        if !member_names.insert(child.name.as_str()) {
            return Err(BuildError::DuplicateNamespace {
                name: child.name.clone(),
                location,
            });
        }
        members.push(build_namespace(child, path, config)?);
    }

    let mut command_names: HashSet<&str> = HashSet::new();
    let mut callables = Vec::new();
    for def in &group.commands {
        if config.is_internal(&def.name) {
            debug!(command = %def.name, location = %location, "skipping internal command");
            continue;
        }
        if member_names.contains(def.name.as_str()) {
            return Err(BuildError::AmbiguousName {
                name: def.name.clone(),
                location,
            });
        }
        if !command_names.insert(def.name.as_str()) {
            return Err(BuildError::DuplicateCommand {
                name: def.name.clone(),
                location,
            });
        }
        callables.push(build_command(def, path)?);
    }

    let namespace = Namespace {
        name: group.name.clone(),
        path: path.clone(),
        description: group.description.clone(),
        members,
        callables,
    };
    path.pop();
    Ok(namespace)
}

fn build_command(def: &CommandDef, path: &[String]) -> Result<Command, BuildError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for arg in &def.args {
        if !seen.insert(arg.name.as_str()) {
            return Err(BuildError::DuplicateArgument {
                command: def.name.clone(),
                name: arg.name.clone(),
            });
        }
    }
    for validator in &def.validators {
        check_validator_names(validator.as_ref(), &def.args, &def.name)?;
    }

    Ok(Command {
        name: def.name.clone(),
        path: path.to_vec(),
        description: def.description.clone(),
        long_description: def.long_description.clone(),
        args: def.args.clone(),
        validators: def.validators.clone(),
        handler: Arc::clone(&def.handler),
    })
}
