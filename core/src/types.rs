//! Argument and value type definitions.
//!
//! [`ArgType`] describes what a declared parameter accepts, [`Value`] is what
//! the caster produces from raw command-line strings, and [`Arg`] ties a name
//! and a type together with an optional default.

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Semantic type of a declared argument.
///
/// The set is closed: the caster matches it exhaustively, and new shapes are
/// added as new variants.
///
/// # Examples
///
/// ```
/// use command_tree_core::ArgType;
///
/// let items = ArgType::optional(ArgType::list(ArgType::Int));
/// assert_eq!(items.type_name(), "Optional[List[int]]");
/// assert!(items.is_optional());
/// assert_eq!(items.unwrap_optional(), &ArgType::list(ArgType::Int));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    /// Any string, taken verbatim.
    Str,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// Lenient boolean: only the configured true-strings are `true`.
    Bool,
    /// One of a fixed set of variant names.
    Enum { name: String, variants: Vec<String> },
    /// The argument may be given without a value, yielding [`Value::None`].
    Optional(Box<ArgType>),
    /// Comma-separated items of the inner type.
    List(Box<ArgType>),
    /// Like [`ArgType::List`], intended for `--key` given several times.
    Repeated(Box<ArgType>),
    /// First member type that accepts the raw value wins.
    Union(Vec<ArgType>),
    /// Presence marker: given means `true`, omitted means `false`.
    Flag,
}

impl ArgType {
    /// Wraps `inner` as [`ArgType::Optional`].
    pub fn optional(inner: ArgType) -> Self {
        ArgType::Optional(Box::new(inner))
    }

    /// Wraps `inner` as [`ArgType::List`].
    pub fn list(inner: ArgType) -> Self {
        ArgType::List(Box::new(inner))
    }

    /// Wraps `inner` as [`ArgType::Repeated`].
    pub fn repeated(inner: ArgType) -> Self {
        ArgType::Repeated(Box::new(inner))
    }

    /// Builds a union of the given member types, tried in order.
    pub fn union(members: impl IntoIterator<Item = ArgType>) -> Self {
        ArgType::Union(members.into_iter().collect())
    }

    /// Builds an enum type from its name and variant names.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::ArgType;
    ///
    /// let color = ArgType::enumeration("Color", ["RED", "GREEN"]);
    /// assert_eq!(color.type_name(), "Color");
    /// ```
    pub fn enumeration<I, S>(name: &str, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ArgType::Enum {
            name: name.to_string(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Human-readable type name, used in error messages and documentation.
    pub fn type_name(&self) -> String {
        match self {
            ArgType::Str => "str".to_string(),
            ArgType::Int => "int".to_string(),
            ArgType::Float => "float".to_string(),
            ArgType::Bool => "bool".to_string(),
            ArgType::Flag => "Flag".to_string(),
            ArgType::Enum { name, .. } => name.clone(),
            ArgType::Optional(inner) => format!("Optional[{}]", inner.type_name()),
            ArgType::List(inner) => format!("List[{}]", inner.type_name()),
            ArgType::Repeated(inner) => format!("Repeated[{}]", inner.type_name()),
            ArgType::Union(members) => format!(
                "Union[{}]",
                members
                    .iter()
                    .map(ArgType::type_name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, ArgType::Flag)
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, ArgType::Optional(_))
    }

    /// Returns the inner type of an [`ArgType::Optional`], or `self`.
    pub fn unwrap_optional(&self) -> &ArgType {
        match self {
            ArgType::Optional(inner) => inner,
            other => other,
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

/// A typed value produced by the caster.
///
/// Serializes to plain JSON: `None` as `null`, enums as their variant name,
/// lists as arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Enum { type_name: String, variant: String },
    List(Vec<Value>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the variant name of an enum value.
    pub fn as_variant(&self) -> Option<&str> {
        match self {
            Value::Enum { variant, .. } => Some(variant),
            _ => None,
        }
    }

    /// Whether the value counts as "set" for cross-argument constraints.
    ///
    /// `None`, `false`, zero, the empty string and the empty list are falsy.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::Value;
    ///
    /// assert!(Value::Str("a".into()).is_truthy());
    /// assert!(!Value::Str(String::new()).is_truthy());
    /// assert!(!Value::None.is_truthy());
    /// assert!(!Value::Bool(false).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Str(s) => !s.is_empty(),
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Bool(b) => *b,
            Value::Enum { .. } => true,
            Value::List(items) => !items.is_empty(),
        }
    }

    /// Renders the value back into the raw form the caster accepts.
    ///
    /// Returns `None` for [`Value::None`], which has no raw form.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::Value;
    ///
    /// let items = Value::List(vec![Value::Int(1), Value::Int(2)]);
    /// assert_eq!(items.to_raw(','), Some("1,2".to_string()));
    /// assert_eq!(Value::None.to_raw(','), None);
    /// ```
    pub fn to_raw(&self, separator: char) -> Option<String> {
        match self {
            Value::None => None,
            Value::Str(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Enum { variant, .. } => Some(variant.clone()),
            Value::List(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.to_raw(separator))
                    .collect::<Vec<_>>()
                    .join(&separator.to_string()),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Enum { variant, .. } => f.write_str(variant),
            Value::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_none(),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Enum { variant, .. } => serializer.serialize_str(variant),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// One declared parameter of a command.
///
/// Use [`new`](Arg::new) or [`flag`](Arg::flag), then chain builder methods.
///
/// # Examples
///
/// ```
/// use command_tree_core::{Arg, ArgType, Value};
///
/// let x = Arg::new("x", ArgType::Int).with_default(5i64);
/// assert!(x.has_default());
/// assert_eq!(x.default, Some(Value::Int(5)));
///
/// let reverse = Arg::flag("reverse");
/// assert!(reverse.is_flag());
/// assert!(!reverse.has_default());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    /// Parameter name, matched against `--name` on the command line.
    pub name: String,
    /// Declared type.
    pub arg_type: ArgType,
    /// Fallback used when the parameter is omitted.
    pub default: Option<Value>,
    /// Description for generated documentation.
    pub description: Option<String>,
    /// Example value for generated documentation.
    pub example: Option<String>,
}

impl Arg {
    /// Creates an argument with no default.
    pub fn new(name: &str, arg_type: ArgType) -> Self {
        Self {
            name: name.to_string(),
            arg_type,
            default: None,
            description: None,
            example: None,
        }
    }

    /// Creates a [`ArgType::Flag`] argument.
    pub fn flag(name: &str) -> Self {
        Self::new(name, ArgType::Flag)
    }

    /// Sets the fallback value used when the argument is omitted.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds an example value for documentation.
    pub fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_flag(&self) -> bool {
        self.arg_type.is_flag()
    }

    /// Whether the argument must appear on the command line.
    ///
    /// An `Optional` type without a default is still required; it only
    /// allows the key to be given without a value.
    pub fn is_required(&self) -> bool {
        !self.has_default() && !self.is_flag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(ArgType::Str.type_name(), "str");
        assert_eq!(ArgType::list(ArgType::Float).type_name(), "List[float]");
        assert_eq!(
            ArgType::union([ArgType::Int, ArgType::Str]).type_name(),
            "Union[int, str]"
        );
        assert_eq!(ArgType::repeated(ArgType::Str).to_string(), "Repeated[str]");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Float(15.1).to_string(), "15.1");
        assert_eq!(
            Value::from(vec!["d", "c"]).to_string(),
            "[d, c]"
        );
        assert_eq!(Value::None.to_string(), "None");
    }

    #[test]
    fn test_value_serializes_as_plain_json() {
        let value = Value::List(vec![
            Value::Str("b".into()),
            Value::Int(2),
            Value::None,
            Value::Enum {
                type_name: "Color".into(),
                variant: "RED".into(),
            },
        ]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"["b",2,null,"RED"]"#);
    }

    #[test]
    fn test_required_args() {
        assert!(Arg::new("a", ArgType::Int).is_required());
        assert!(Arg::new("a", ArgType::optional(ArgType::Int)).is_required());
        assert!(!Arg::new("a", ArgType::optional(ArgType::Int))
            .with_default(Value::None)
            .is_required());
        assert!(!Arg::flag("verbose").is_required());
    }
}
