//! Core types and the invocation pipeline for namespace-driven CLIs.
//!
//! A program declares its commands as a tree of [`Group`]s holding
//! [`CommandDef`]s. [`Namespace::from_group`] turns that declaration into an
//! immutable command tree, and [`execute_command`] runs one command line
//! against it:
//!
//! - [`split_command_line`] splits the line into tokens, honoring quotes.
//! - [`resolve`] walks the leading tokens down the tree to a [`Command`].
//! - [`args_to_kwargs`] groups the remaining `--key value` tokens.
//! - [`bind`] checks them against the command's [`Arg`]s and [`cast`]s each
//!   raw value to its declared [`ArgType`].
//! - The command's [`Validator`]s ([`ExclusiveFlags`], [`RequiredTogether`])
//!   check the bound [`BoundArgs`] before the handler runs.
//!
//! Every failure surfaces as an [`Error`]; user input mistakes are told
//! apart from handler failures by [`Error::is_bad_arguments`].
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let image = Group::new("Image").with_command(
//!     CommandDef::new("modify", |args| {
//!         Ok(Value::Str(format!(
//!             "{} reverse={} crop_4={}",
//!             args.str("image")?,
//!             args.flag("reverse")?,
//!             args.flag("crop_4")?
//!         )))
//!     })
//!     .with_arg(Arg::new("image", ArgType::Str))
//!     .with_arg(Arg::flag("reverse"))
//!     .with_arg(Arg::flag("crop_4"))
//!     .exclusive_flags([("reverse", "crop_4")]),
//! );
//! let root = Group::new("Tools").with_group(image);
//! let ns = Namespace::from_group(&root).unwrap();
//!
//! assert_eq!(
//!     execute_command(&ns, "Image modify --image pic.png --reverse").unwrap(),
//!     Value::Str("pic.png reverse=true crop_4=false".into())
//! );
//!
//! let err = execute_command(&ns, "Image modify --image pic.png --reverse --crop-4").unwrap_err();
//! assert_eq!(err.to_string(), "The flags --reverse, --crop_4 are mutually exclusive");
//! ```

mod bound;
mod cast;
mod config;
mod error;
mod execute;
mod namespace;
mod tokenize;
mod types;
mod validate;

pub use bound::BoundArgs;
pub use cast::{cast, cast_with};
pub use config::ParserConfig;
pub use error::{BuildError, CommandError, ConfigError, Error, Result};
pub use execute::{
    bind, execute_command, execute_command_with, execute_tokens, execute_tokens_with, resolve,
};
pub use namespace::{Command, CommandDef, Group, Handler, Namespace};
pub use tokenize::{FLAG_MARKER, ParsedArgs, RawValue, args_to_kwargs, split_command_line};
pub use types::{Arg, ArgType, Value};
pub use validate::{ExclusiveFlags, RequiredTogether, Validator};
