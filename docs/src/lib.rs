//! Documentation rendering for command-tree namespaces.
//!
//! - [`generate_docs`] renders a Markdown reference: one section per
//!   command with a usage example and an argument table.
//! - [`render_listing`] renders an aligned plain-text index of every
//!   invocable command path.
//!
//! Both walk the same ordered views of a built [`Namespace`], so internal
//! names skipped at build time never show up here.
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//! use command_tree_docs::generate_docs;
//!
//! let math = Group::new("math").with_command(
//!     CommandDef::new("add", |args| Ok(Value::Int(args.int("a")? + args.int("b")?)))
//!         .with_description("Add 2 numbers")
//!         .with_arg(Arg::new("a", ArgType::Int).with_example("5"))
//!         .with_arg(Arg::new("b", ArgType::Int)),
//! );
//! let ns = Namespace::from_group(&Group::new("c").with_group(math)).unwrap();
//!
//! let docs = generate_docs(&ns, "##");
//! assert!(docs.starts_with("## add\nAdd 2 numbers\n"));
//! assert!(docs.contains("math add --a int --b int\n"));
//! assert!(docs.contains("|a|int|5|&nbsp;|&nbsp;|\n"));
//! ```

use command_tree_core::{Arg, Command, Namespace};
use tracing::debug;

const EMPTY_CELL: &str = "&nbsp;";

/// Renders a Markdown reference for every command under `ns`.
///
/// Commands are grouped by category (their namespace path without the
/// root) in first-seen order. Each command gets a `heading` line, its
/// descriptions, a `bash` usage example listing required arguments before
/// optional ones, and an argument table.
pub fn generate_docs(ns: &Namespace, heading: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let categories = by_category(ns);

    for (category, commands) in &categories {
        for command in commands {
            lines.push(format!("{heading} {}", command.name()));
            lines.extend(command_section(command, category));
            lines.push(String::new());
        }
    }

    debug!(
        namespace = %ns.name(),
        categories = categories.len(),
        "generated docs"
    );
    lines.join("\n")
}

/// Renders one line per command: its invocation path and short description.
pub fn render_listing(ns: &Namespace) -> String {
    let entries: Vec<(String, &str)> = ns
        .commands()
        .into_iter()
        .map(|command| {
            (
                invocation(&command.category(), command.name()),
                command.description().unwrap_or(""),
            )
        })
        .collect();

    let width = entries.iter().map(|(path, _)| path.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (path, desc) in &entries {
        if desc.is_empty() {
            out.push_str(&format!("  {path}\n"));
        } else {
            out.push_str(&format!("  {path:<width$}  {desc}\n"));
        }
    }
    out
}

fn by_category(ns: &Namespace) -> Vec<(String, Vec<&Command>)> {
    let mut categories: Vec<(String, Vec<&Command>)> = Vec::new();
    for command in ns.commands() {
        let category = command.category();
        match categories.iter_mut().find(|(name, _)| *name == category) {
            Some((_, commands)) => commands.push(command),
            None => categories.push((category, vec![command])),
        }
    }
    categories
}

fn command_section(command: &Command, category: &str) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(desc) = command.description() {
        lines.push(desc.to_string());
    }
    if let Some(desc) = command.long_description() {
        lines.push(desc.to_string());
    }
    lines.push(String::new());

    // required arguments first; the sort is stable
    let mut args: Vec<&Arg> = command.args().iter().collect();
    args.sort_by_key(|arg| !arg.is_required());

    lines.push("Example:".to_string());
    lines.push("```bash".to_string());
    let mut usage = invocation(category, command.name());
    for arg in &args {
        usage.push(' ');
        usage.push_str(&usage_fragment(arg));
    }
    lines.push(usage);
    lines.push("```".to_string());

    lines.push("Arguments:".to_string());
    lines.push(String::new());
    lines.push("|name|type|example|description|default|".to_string());
    lines.push("|----|----|-------|-----------|-------|".to_string());
    for arg in &args {
        lines.push(table_row(arg));
    }
    lines.push(String::new());

    lines
}

fn invocation(category: &str, name: &str) -> String {
    if category.is_empty() {
        name.to_string()
    } else {
        format!("{category} {name}")
    }
}

fn usage_fragment(arg: &Arg) -> String {
    let fragment = if arg.is_flag() {
        format!("--{}", arg.name)
    } else {
        format!("--{} {}", arg.name, arg.arg_type.unwrap_optional().type_name())
    };
    if arg.is_required() {
        fragment
    } else {
        format!("[{fragment}]")
    }
}

fn table_row(arg: &Arg) -> String {
    let description = arg
        .description
        .as_deref()
        .map(|desc| desc.replace('\n', "<br/>"))
        .unwrap_or_else(|| EMPTY_CELL.to_string());
    let default = arg
        .default
        .as_ref()
        .map(|value| value.to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string());

    format!(
        "|{}|{}|{}|{description}|{default}|",
        arg.name,
        arg.arg_type.unwrap_optional().type_name(),
        arg.example.as_deref().unwrap_or(""),
    )
}

#[cfg(test)]
mod tests {
    use command_tree_core::{ArgType, CommandDef, Group, Value};

    use super::*;

    fn sample() -> Namespace {
        let math = Group::new("math")
            .with_command(
                CommandDef::new("add", |_| Ok(Value::None))
                    .with_description("Add 2 numbers")
                    .with_arg(Arg::new("a", ArgType::Int).with_example("5"))
                    .with_arg(Arg::new("b", ArgType::Int)),
            )
            .with_command(
                CommandDef::new("sub", |_| Ok(Value::None))
                    .with_arg(Arg::new("a", ArgType::Int))
                    .with_arg(Arg::new("b", ArgType::Int)),
            );
        let string = Group::new("string").with_command(
            CommandDef::new("join", |_| Ok(Value::None))
                .with_description("Join items")
                .with_arg(
                    Arg::new("char", ArgType::optional(ArgType::Str))
                        .with_default(" ")
                        .with_description("Separator\nplaced between items"),
                )
                .with_arg(Arg::new("items", ArgType::list(ArgType::Str)))
                .with_arg(Arg::flag("trim")),
        );
        let root = Group::new("c").with_group(math).with_group(string);
        Namespace::from_group(&root).unwrap()
    }

    #[test]
    fn test_sections_follow_category_order() {
        let docs = generate_docs(&sample(), "##");
        let headings: Vec<&str> = docs.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(headings, vec!["## add", "## sub", "## join"]);
    }

    #[test]
    fn test_add_section() {
        let docs = generate_docs(&sample(), "##");
        let expected = "## add
Add 2 numbers

Example:
```bash
math add --a int --b int
```
Arguments:

|name|type|example|description|default|
|----|----|-------|-----------|-------|
|a|int|5|&nbsp;|&nbsp;|
|b|int||&nbsp;|&nbsp;|

";
        assert!(docs.starts_with(expected), "got:\n{docs}");
    }

    #[test]
    fn test_optional_args_are_bracketed_and_unwrapped() {
        let docs = generate_docs(&sample(), "###");
        assert!(docs.contains("### join\n"));
        assert!(docs.contains("string join --items List[str] [--char str] [--trim]\n"));
        assert!(docs.contains("|char|str||Separator<br/>placed between items| |\n"));
        assert!(docs.contains("|trim|Flag||&nbsp;|&nbsp;|\n"));
    }

    #[test]
    fn test_commands_without_description() {
        let docs = generate_docs(&sample(), "##");
        assert!(docs.contains("## sub\n\nExample:\n"));
    }

    #[test]
    fn test_listing_is_aligned() {
        let listing = render_listing(&sample());
        assert_eq!(
            listing,
            "  math add     Add 2 numbers\n  math sub\n  string join  Join items\n"
        );
    }

    #[test]
    fn test_top_level_commands_have_no_category() {
        let root = Group::new("tools").with_command(
            CommandDef::new("version", |_| Ok(Value::None))
                .with_arg(Arg::new("verbose", ArgType::Bool).with_default(false)),
        );
        let ns = Namespace::from_group(&root).unwrap();
        let docs = generate_docs(&ns, "##");
        assert!(docs.contains("```bash\nversion [--verbose bool]\n```"));
        assert!(docs.contains("|verbose|bool||&nbsp;|false|\n"));
    }
}
