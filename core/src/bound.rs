//! The typed keyword set handed to validators and command handlers.

use crate::error::{Error, Result};
use crate::types::Value;

/// Fully cast arguments of one invocation, in declaration order.
///
/// The typed accessors fail with [`Error::ArgumentKind`] when the stored
/// value has a different shape, so handlers can use `?` throughout.
///
/// # Examples
///
/// ```
/// use command_tree_core::{BoundArgs, Value};
///
/// let mut args = BoundArgs::default();
/// args.insert("a", Value::Int(10));
/// args.insert("b", Value::Float(5.1));
///
/// assert_eq!(args.int("a").unwrap(), 10);
/// assert_eq!(args.float("b").unwrap(), 5.1);
/// assert!(args.str("a").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    values: Vec<(String, Value)>,
}

impl BoundArgs {
    /// Inserts or replaces the value bound to `name`.
    pub fn insert(&mut self, name: &str, value: Value) {
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Whether `name` is bound to a truthy value.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_truthy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value bound to `name`, or [`Value::None`] if unbound.
    pub fn value(&self, name: &str) -> &Value {
        self.get(name).unwrap_or(&Value::None)
    }

    pub fn str(&self, name: &str) -> Result<&str> {
        self.value(name).as_str().ok_or_else(|| kind_error(name, "str"))
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        self.value(name).as_int().ok_or_else(|| kind_error(name, "int"))
    }

    /// Returns a float argument; integer values are widened.
    pub fn float(&self, name: &str) -> Result<f64> {
        self.value(name)
            .as_float()
            .ok_or_else(|| kind_error(name, "float"))
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        self.value(name)
            .as_bool()
            .ok_or_else(|| kind_error(name, "bool"))
    }

    /// Returns a `Flag` argument; an unbound flag reads as `false`.
    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            None => Ok(false),
            Some(value) => value.as_bool().ok_or_else(|| kind_error(name, "Flag")),
        }
    }

    pub fn list(&self, name: &str) -> Result<&[Value]> {
        self.value(name)
            .as_list()
            .ok_or_else(|| kind_error(name, "List"))
    }

    /// Returns an `Optional` argument, mapping [`Value::None`] to `None`.
    pub fn optional(&self, name: &str) -> Option<&Value> {
        self.get(name).filter(|value| !value.is_none())
    }
}

fn kind_error(name: &str, expected: &'static str) -> Error {
    Error::ArgumentKind {
        name: name.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut args = BoundArgs::default();
        args.insert("a", Value::Int(1));
        args.insert("b", Value::Int(2));
        args.insert("a", Value::Int(3));

        assert_eq!(args.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(args.int("a").unwrap(), 3);
    }

    #[test]
    fn test_kind_error_message() {
        let mut args = BoundArgs::default();
        args.insert("a", Value::Str("x".into()));
        let err = args.int("a").unwrap_err();
        assert_eq!(err.to_string(), "Argument 'a' is not of kind 'int'");
    }

    #[test]
    fn test_optional_and_flag_defaults() {
        let mut args = BoundArgs::default();
        args.insert("items", Value::None);
        assert!(args.optional("items").is_none());
        assert!(!args.flag("verbose").unwrap());
        assert!(!args.is_truthy("items"));
    }
}
