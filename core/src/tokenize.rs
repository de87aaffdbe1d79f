//! Command-line tokenizing.
//!
//! Two stages live here: [`split_command_line`] turns a raw line into
//! shell-style tokens, and [`args_to_kwargs`] turns the flag segment of those
//! tokens into an ordered [`ParsedArgs`] mapping. Neither stage knows about
//! declared argument types; deciding whether a value-less key is legal is the
//! binder's job.

use tracing::trace;

use crate::error::{Error, Result};

/// Prefix that marks a token as a parameter name.
pub const FLAG_MARKER: &str = "--";

/// Raw value of one parameter as handed to the caster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// The key was given without a value.
    Missing,
    /// The key was given once with a value.
    Single(String),
    /// The key was given several times; values in order of appearance.
    Many(Vec<String>),
}

impl RawValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Single(s.to_string())
    }
}

/// Ordered mapping from parameter name to every occurrence's raw value.
///
/// Keys keep the order in which they were first seen.
///
/// # Examples
///
/// ```
/// use command_tree_core::{RawValue, args_to_kwargs};
///
/// let parsed = args_to_kwargs(&["--tag", "a", "--tag=b", "--dry-run"]).unwrap();
/// assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["tag", "dry_run"]);
/// assert_eq!(
///     parsed.get("tag"),
///     Some(RawValue::Many(vec!["a".into(), "b".into()]))
/// );
/// assert_eq!(parsed.get("dry_run"), Some(RawValue::Missing));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    entries: Vec<(String, Vec<Option<String>>)>,
}

impl ParsedArgs {
    fn push(&mut self, key: String, value: Option<String>) {
        trace!(key = %key, value = ?value, "tokenized parameter");
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, occurrences)) => occurrences.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Folds every occurrence of `key` into a single [`RawValue`].
    ///
    /// Several occurrences become [`RawValue::Many`] of the ones that carried
    /// a value, or [`RawValue::Missing`] if none did.
    pub fn get(&self, key: &str) -> Option<RawValue> {
        let occurrences = self.occurrences(key)?;
        let raw = match occurrences {
            [single] => match single {
                Some(value) => RawValue::Single(value.clone()),
                None => RawValue::Missing,
            },
            many => {
                let values: Vec<String> = many.iter().flatten().cloned().collect();
                if values.is_empty() {
                    RawValue::Missing
                } else {
                    RawValue::Many(values)
                }
            }
        };
        Some(raw)
    }

    /// Every occurrence of `key`, in order of appearance.
    pub fn occurrences(&self, key: &str) -> Option<&[Option<String>]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, occurrences)| occurrences.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits a flag segment into an ordered key → value(s) mapping.
///
/// `--key value` and `--key=value` assign a value, a `--key` followed by
/// another `--key` or by the end of input is recorded without a value, and
/// dashes inside a key become underscores.
///
/// # Errors
///
/// - [`Error::UnexpectedValue`] for a bare token before any key.
/// - [`Error::ConsecutiveValues`] for a bare token right after a completed
///   `--key value` pair.
///
/// # Examples
///
/// ```
/// use command_tree_core::{Error, RawValue, args_to_kwargs};
///
/// let parsed = args_to_kwargs(&["--arg2", "20", "--arg3=5"]).unwrap();
/// assert_eq!(parsed.get("arg2"), Some(RawValue::Single("20".into())));
/// assert_eq!(parsed.get("arg3"), Some(RawValue::Single("5".into())));
///
/// let err = args_to_kwargs(&["--name", "a", "b"]).unwrap_err();
/// assert!(matches!(err, Error::ConsecutiveValues { .. }));
/// ```
pub fn args_to_kwargs<S: AsRef<str>>(tokens: &[S]) -> Result<ParsedArgs> {
    let mut parsed = ParsedArgs::default();
    let mut pending: Option<String> = None;
    let mut last_pair: Option<(String, String)> = None;

    for token in tokens {
        let token = token.as_ref();

        if let Some(stripped) = token.strip_prefix(FLAG_MARKER) {
            if let Some(key) = pending.take() {
                parsed.push(key, None);
            }
            match stripped.split_once('=') {
                Some((key, value)) => {
                    let key = normalize_key(key);
                    parsed.push(key.clone(), Some(value.to_string()));
                    last_pair = Some((key, value.to_string()));
                }
                None => {
                    pending = Some(normalize_key(stripped));
                    last_pair = None;
                }
            }
            continue;
        }

        if let Some(key) = pending.take() {
            parsed.push(key.clone(), Some(token.to_string()));
            last_pair = Some((key, token.to_string()));
            continue;
        }

        return Err(match last_pair {
            Some((last_key, last_value)) => Error::ConsecutiveValues {
                last_key,
                last_value,
                attempted: token.to_string(),
            },
            None => Error::UnexpectedValue(token.to_string()),
        });
    }

    if let Some(key) = pending {
        parsed.push(key, None);
    }

    Ok(parsed)
}

fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
}

/// Splits a command line into tokens using POSIX shell quoting rules.
///
/// Whitespace separates tokens. Single quotes keep their content literally;
/// double quotes keep whitespace and honour `\"`, `\\`, `` \` `` and `\$`
/// escapes; outside quotes a backslash escapes the next character. A
/// backslash-newline outside single quotes is a line continuation and is
/// dropped. No expansion or substitution is performed.
///
/// # Errors
///
/// Returns [`Error::UnterminatedQuote`] when a quote is never closed.
///
/// # Examples
///
/// ```
/// use command_tree_core::split_command_line;
///
/// let tokens = split_command_line(r#"join --items 'a b',c --char "\"""#).unwrap();
/// assert_eq!(tokens, vec!["join", "--items", "a b,c", "--char", "\""]);
/// ```
pub fn split_command_line(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(Error::UnterminatedQuote),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('\n') => {}
                            Some(c @ ('"' | '\\' | '`' | '$')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(Error::UnterminatedQuote),
                        },
                        Some(c) => current.push(c),
                        None => return Err(Error::UnterminatedQuote),
                    }
                }
            }
            '\\' => match chars.next() {
                Some('\n') => {}
                Some(c) => {
                    in_token = true;
                    current.push(c);
                }
                // a trailing backslash is kept literally
                None => {
                    in_token = true;
                    current.push('\\');
                }
            },
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}
