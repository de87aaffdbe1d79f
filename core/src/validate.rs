//! Cross-argument constraints checked after binding and before invocation.
//!
//! A [`Command`](crate::Command) owns an ordered list of [`Validator`]s. They
//! run over the fully bound [`BoundArgs`] in declaration order and the first
//! violation aborts the call.
//!
//! # Examples
//!
//! ```
//! use command_tree_core::*;
//!
//! let mut args = BoundArgs::default();
//! args.insert("reverse", Value::Bool(true));
//! args.insert("crop_4", Value::Bool(true));
//!
//! let exclusive = ExclusiveFlags::new([("reverse", "crop_4")]);
//! let err = exclusive.validate(&args).unwrap_err();
//! assert_eq!(err.to_string(), "The flags --reverse, --crop_4 are mutually exclusive");
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::bound::BoundArgs;
use crate::error::{BuildError, Error, Result};
use crate::types::Arg;

/// A constraint over the bound arguments of one command.
pub trait Validator: fmt::Debug + Send + Sync {
    /// Argument-name pairs this validator refers to, checked against the
    /// command's declared arguments when the namespace is built.
    fn pairs(&self) -> &[(String, String)];

    /// Checks the bound arguments, returning the first violation found.
    fn validate(&self, args: &BoundArgs) -> Result<()>;
}

/// Rejects invocations where both members of a pair are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveFlags {
    pairs: Vec<(String, String)>,
}

impl ExclusiveFlags {
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            pairs: owned_pairs(pairs),
        }
    }
}

impl Validator for ExclusiveFlags {
    fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    fn validate(&self, args: &BoundArgs) -> Result<()> {
        for (a, b) in &self.pairs {
            if args.is_truthy(a) && args.is_truthy(b) {
                return Err(Error::ExclusiveFlags((a.clone(), b.clone())));
            }
        }
        Ok(())
    }
}

/// Rejects invocations where only one member of a pair is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredTogether {
    pairs: Vec<(String, String)>,
}

impl RequiredTogether {
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            pairs: owned_pairs(pairs),
        }
    }
}

impl Validator for RequiredTogether {
    fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    fn validate(&self, args: &BoundArgs) -> Result<()> {
        for (a, b) in &self.pairs {
            let (present, required) = match (args.is_truthy(a), args.is_truthy(b)) {
                (true, false) => (a, b),
                (false, true) => (b, a),
                _ => continue,
            };
            return Err(Error::MissingRequiredCombination {
                present: vec![present.clone()],
                required: vec![required.clone()],
            });
        }
        Ok(())
    }
}

/// Checks that every name a validator refers to is a declared argument.
///
/// Reports the first pair containing an unknown name.
pub(crate) fn check_validator_names(
    validator: &dyn Validator,
    args: &[Arg],
    command: &str,
) -> std::result::Result<(), BuildError> {
    let declared: HashSet<&str> = args.iter().map(|a| a.name.as_str()).collect();

    for (a, b) in validator.pairs() {
        if !declared.contains(a.as_str()) || !declared.contains(b.as_str()) {
            return Err(BuildError::UnknownValidatorArguments {
                names: vec![a.clone(), b.clone()],
                command: command.to_string(),
            });
        }
    }

    Ok(())
}

fn owned_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}
