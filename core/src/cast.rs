//! Type casting from raw command-line strings to typed [`Value`]s.
//!
//! Casting is atomic: a raw value either converts completely or the whole
//! cast fails with the first error encountered. Boolean casting is lenient on
//! purpose; any string outside the configured true-set is `false`.

use tracing::trace;

use crate::config::ParserConfig;
use crate::error::{Error, Result};
use crate::tokenize::RawValue;
use crate::types::{ArgType, Value};

/// Casts `raw` into `arg_type` using the default [`ParserConfig`].
///
/// # Errors
///
/// - [`Error::MissingValue`] when `raw` is [`RawValue::Missing`] and the type
///   is neither `Optional` nor `Flag`.
/// - [`Error::Conversion`] when a number fails to parse.
/// - [`Error::EnumLookup`] when no enum variant has the given name.
///
/// # Examples
///
/// ```
/// use command_tree_core::{ArgType, RawValue, Value, cast};
///
/// let items = cast(&"10,20,30".into(), &ArgType::list(ArgType::Int)).unwrap();
/// assert_eq!(items, Value::from(vec![10i64, 20, 30]));
///
/// let none = cast(&RawValue::Missing, &ArgType::optional(ArgType::Str)).unwrap();
/// assert_eq!(none, Value::None);
///
/// let err = cast(&"banana".into(), &ArgType::Int).unwrap_err();
/// assert!(err.to_string().starts_with("Unable to convert 'banana' to type 'int': "));
/// ```
pub fn cast(raw: &RawValue, arg_type: &ArgType) -> Result<Value> {
    cast_with(raw, arg_type, &ParserConfig::default())
}

/// Casts `raw` into `arg_type` using the given configuration.
pub fn cast_with(raw: &RawValue, arg_type: &ArgType, config: &ParserConfig) -> Result<Value> {
    match raw {
        RawValue::Missing => cast_missing(arg_type, config),
        RawValue::Single(s) => cast_str(s, arg_type, config),
        RawValue::Many(values) => cast_many(values, arg_type, config),
    }
}

fn cast_missing(arg_type: &ArgType, config: &ParserConfig) -> Result<Value> {
    match arg_type {
        ArgType::Optional(_) => Ok(Value::None),
        ArgType::Flag => Ok(Value::Bool(true)),
        ArgType::Union(members) => first_success(members, "", |member| {
            cast_missing(member, config)
        }),
        other => Err(Error::MissingValue {
            type_name: other.type_name(),
        }),
    }
}

fn cast_many(values: &[String], arg_type: &ArgType, config: &ParserConfig) -> Result<Value> {
    match arg_type {
        ArgType::Optional(inner) => cast_many(values, inner, config),
        ArgType::List(inner) | ArgType::Repeated(inner) => {
            let mut items = Vec::new();
            for value in values {
                items.extend(split_items(value, inner, config)?);
            }
            Ok(Value::List(items))
        }
        ArgType::Union(members) => {
            let raw = values.join(" ");
            first_success(members, &raw, |member| cast_many(values, member, config))
        }
        scalar => match values.last() {
            Some(last) => {
                trace!(
                    occurrences = values.len(),
                    "scalar parameter given several times, keeping the last"
                );
                cast_str(last, scalar, config)
            }
            None => cast_missing(scalar, config),
        },
    }
}

fn cast_str(raw: &str, arg_type: &ArgType, config: &ParserConfig) -> Result<Value> {
    match arg_type {
        ArgType::Str => Ok(Value::Str(raw.to_string())),
        ArgType::Int => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| conversion_error(raw, arg_type, e)),
        ArgType::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| conversion_error(raw, arg_type, e)),
        ArgType::Bool | ArgType::Flag => Ok(Value::Bool(config.is_true(raw))),
        ArgType::Enum { name, variants } => {
            if variants.iter().any(|v| v == raw) {
                Ok(Value::Enum {
                    type_name: name.clone(),
                    variant: raw.to_string(),
                })
            } else {
                Err(Error::EnumLookup {
                    raw: raw.to_string(),
                    type_name: name.clone(),
                    variants: variants.clone(),
                })
            }
        }
        ArgType::Optional(inner) => cast_str(raw, inner, config),
        ArgType::List(inner) | ArgType::Repeated(inner) => {
            split_items(raw, inner, config).map(Value::List)
        }
        ArgType::Union(members) => {
            first_success(members, raw, |member| cast_str(raw, member, config))
        }
    }
}

fn split_items(raw: &str, inner: &ArgType, config: &ParserConfig) -> Result<Vec<Value>> {
    raw.split(config.list_separator)
        .map(|piece| cast_str(piece, inner, config))
        .collect()
}

/// Tries each member in order; the first success wins, otherwise the last
/// member's error is returned.
fn first_success<F>(members: &[ArgType], raw: &str, mut attempt: F) -> Result<Value>
where
    F: FnMut(&ArgType) -> Result<Value>,
{
    let mut last_err = None;
    for member in members {
        match attempt(member) {
            Ok(value) => return Ok(value),
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| Error::Conversion {
        raw: raw.to_string(),
        type_name: "Union[]".to_string(),
        message: "union has no member types".to_string(),
    }))
}

fn conversion_error(raw: &str, arg_type: &ArgType, err: impl std::fmt::Display) -> Error {
    Error::Conversion {
        raw: raw.to_string(),
        type_name: arg_type.type_name(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(s: &str) -> RawValue {
        RawValue::Single(s.to_string())
    }

    fn strings(items: &[&str]) -> Value {
        Value::List(items.iter().map(|s| Value::Str(s.to_string())).collect())
    }

    fn some_enum() -> ArgType {
        ArgType::enumeration("SomeEnum", ["SOMETHING", "OTHER"])
    }

    #[test]
    fn test_primitives() {
        assert_eq!(
            cast(&single("some string"), &ArgType::Str).unwrap(),
            Value::Str("some string".into())
        );
        assert_eq!(cast(&single("10"), &ArgType::Int).unwrap(), Value::Int(10));
        assert_eq!(
            cast(&single("-2.5"), &ArgType::Float).unwrap(),
            Value::Float(-2.5)
        );
    }

    #[test]
    fn test_bool_is_lenient() {
        for raw in ["1", "yes", "true", "True", "T"] {
            assert_eq!(cast(&single(raw), &ArgType::Bool).unwrap(), Value::Bool(true));
        }
        for raw in ["0", "no", "false", "False", "F", "something weird"] {
            assert_eq!(
                cast(&single(raw), &ArgType::Bool).unwrap(),
                Value::Bool(false)
            );
        }
    }

    #[test]
    fn test_custom_true_values() {
        let config = ParserConfig {
            true_values: vec!["on".into()],
            ..ParserConfig::default()
        };
        assert_eq!(
            cast_with(&single("ON"), &ArgType::Bool, &config).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            cast_with(&single("yes"), &ArgType::Bool, &config).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_lists() {
        let list_str = ArgType::list(ArgType::Str);
        assert_eq!(cast(&single("10"), &list_str).unwrap(), strings(&["10"]));
        assert_eq!(
            cast(&single("10,20,30"), &list_str).unwrap(),
            strings(&["10", "20", "30"])
        );
        assert_eq!(
            cast(&single("10.5,20.5,30.5"), &list_str).unwrap(),
            strings(&["10.5", "20.5", "30.5"])
        );
        assert_eq!(
            cast(&single("10,20,30"), &ArgType::list(ArgType::Int)).unwrap(),
            Value::from(vec![10i64, 20, 30])
        );
        assert_eq!(
            cast(&single("10.5,20.5,30.5"), &ArgType::list(ArgType::Float)).unwrap(),
            Value::from(vec![10.5, 20.5, 30.5])
        );
    }

    #[test]
    fn test_custom_list_separator() {
        let config = ParserConfig {
            list_separator: ';',
            ..ParserConfig::default()
        };
        assert_eq!(
            cast_with(&single("a,b;c"), &ArgType::list(ArgType::Str), &config).unwrap(),
            strings(&["a,b", "c"])
        );
    }

    #[test]
    fn test_list_is_atomic() {
        let err = cast(&single("1,x,3"), &ArgType::list(ArgType::Int)).unwrap_err();
        assert!(matches!(err, Error::Conversion { ref raw, .. } if raw == "x"));
    }

    #[test]
    fn test_optional() {
        let opt_str = ArgType::optional(ArgType::Str);
        assert_eq!(cast(&single("asd"), &opt_str).unwrap(), Value::Str("asd".into()));
        assert_eq!(cast(&RawValue::Missing, &opt_str).unwrap(), Value::None);

        let opt_list = ArgType::optional(ArgType::list(ArgType::Str));
        assert_eq!(cast(&single("asd"), &opt_list).unwrap(), strings(&["asd"]));
        assert_eq!(cast(&RawValue::Missing, &opt_list).unwrap(), Value::None);
    }

    #[test]
    fn test_missing_value_for_required_type() {
        let err = cast(&RawValue::Missing, &ArgType::Str).unwrap_err();
        assert_eq!(err.to_string(), "Missing value for type 'str'");
    }

    #[test]
    fn test_flag() {
        assert_eq!(cast(&RawValue::Missing, &ArgType::Flag).unwrap(), Value::Bool(true));
        assert_eq!(cast(&single("no"), &ArgType::Flag).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_enum() {
        assert_eq!(
            cast(&single("SOMETHING"), &some_enum()).unwrap().as_variant(),
            Some("SOMETHING")
        );
        assert_eq!(
            cast(&single("OTHER"), &some_enum()).unwrap().as_variant(),
            Some("OTHER")
        );
    }

    #[test]
    fn test_enum_lookup_is_exact() {
        let err = cast(&single("other"), &some_enum()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to convert 'other' to type 'SomeEnum': expected one of SOMETHING, OTHER"
        );
    }

    #[test]
    fn test_union_first_success_wins() {
        let items = ArgType::list(ArgType::union([ArgType::Int, ArgType::Str]));
        assert_eq!(
            cast(&single("b,2"), &items).unwrap(),
            Value::List(vec![Value::Str("b".into()), Value::Int(2)])
        );
    }

    #[test]
    fn test_union_reports_last_error() {
        let number = ArgType::union([ArgType::Int, ArgType::Float]);
        let err = cast(&single("abc"), &number).unwrap_err();
        assert!(matches!(err, Error::Conversion { ref type_name, .. } if type_name == "float"));
    }

    #[test]
    fn test_conversion_message() {
        let err = cast(&single("banana"), &ArgType::Int).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to convert 'banana' to type 'int': invalid digit found in string"
        );
    }

    #[test]
    fn test_many_concatenates_for_repeated() {
        let raw = RawValue::Many(vec!["1,2".into(), "3".into()]);
        assert_eq!(
            cast(&raw, &ArgType::repeated(ArgType::Int)).unwrap(),
            Value::from(vec![1i64, 2, 3])
        );
        assert_eq!(
            cast(&raw, &ArgType::optional(ArgType::list(ArgType::Int))).unwrap(),
            Value::from(vec![1i64, 2, 3])
        );
    }

    #[test]
    fn test_many_keeps_last_for_scalar() {
        let raw = RawValue::Many(vec!["1".into(), "2".into()]);
        assert_eq!(cast(&raw, &ArgType::Int).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_primitive_round_trip() {
        let config = ParserConfig::default();
        let cases = [
            ("42", ArgType::Int),
            ("-7", ArgType::Int),
            ("3.25", ArgType::Float),
            ("1e-3", ArgType::Float),
            ("hello", ArgType::Str),
            ("yes", ArgType::Bool),
            ("nope", ArgType::Bool),
            ("1,2,3", ArgType::list(ArgType::Int)),
        ];
        for (raw, ty) in cases {
            let first = cast(&single(raw), &ty).unwrap();
            let rendered = first.to_raw(config.list_separator).unwrap();
            let second = cast(&RawValue::Single(rendered), &ty).unwrap();
            assert_eq!(first, second, "round trip of {raw} as {ty}");
        }
    }
}
