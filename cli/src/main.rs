//! `tools`: a small utility collection driven by a command tree.

use command_tree_cli::simple_cli;
use command_tree_core::{Arg, ArgType, CommandDef, Group, Value};

fn calculator() -> Group {
    Group::new("Calculator")
        .with_description("A simple calculator.")
        .with_command(
            CommandDef::new("double", |args| {
                let number = args.int("number")?;
                number
                    .checked_mul(2)
                    .map(Value::Int)
                    .ok_or_else(|| format!("{number} is too large to double").into())
            })
            .with_description("Doubles a number.")
            .with_arg(Arg::new("number", ArgType::Int).with_example("21")),
        )
        .with_command(
            CommandDef::new("divide", |args| {
                let divisor = args.float("divisor")?;
                if divisor == 0.0 {
                    return Err("division by zero".into());
                }
                Ok(Value::Float(args.float("dividend")? / divisor))
            })
            .with_description("Divides one number by another.")
            .with_arg(Arg::new("dividend", ArgType::Float))
            .with_arg(Arg::new("divisor", ArgType::Float)),
        )
}

fn string() -> Group {
    Group::new("String")
        .with_description("A simple string utility.")
        .with_command(
            CommandDef::new("reverse", |args| {
                Ok(Value::Str(args.str("string")?.chars().rev().collect()))
            })
            .with_description("Reverses a string.")
            .with_arg(Arg::new("string", ArgType::Str).with_example("hello")),
        )
        .with_command(
            CommandDef::new("join", |args| {
                let sep = args.optional("char").and_then(Value::as_str).unwrap_or("");
                let items: Vec<String> = args.list("items")?.iter().map(Value::to_string).collect();
                Ok(Value::Str(items.join(sep)))
            })
            .with_description("Joins items with a separator.")
            .with_arg(
                Arg::new("items", ArgType::list(ArgType::Str))
                    .with_description("Items to join")
                    .with_example("a,b,c"),
            )
            .with_arg(
                Arg::new("char", ArgType::optional(ArgType::Str))
                    .with_default(" ")
                    .with_description("Separator placed between items"),
            ),
        )
}

fn image() -> Group {
    let modify = CommandDef::new("modify", |args| {
        let image = args.str("image")?;
        let op = if args.flag("reverse")? {
            "reversed"
        } else if args.flag("crop_4")? {
            "cropped to 4 px"
        } else {
            "unchanged"
        };
        Ok(Value::Str(format!("{image}: {op}")))
    })
    .with_description("Applies one transformation to an image.")
    .with_arg(Arg::new("image", ArgType::Str).with_example("photo.png"))
    .with_arg(Arg::flag("reverse").with_description("Mirror the image"))
    .with_arg(Arg::flag("crop_4").with_description("Crop 4 px from every edge"))
    .exclusive_flags([("reverse", "crop_4")]);

    Group::new("Image").with_command(modify)
}

fn tools() -> Group {
    Group::new("Tools")
        .with_group(calculator())
        .with_group(string())
        .with_group(image())
}

fn main() {
    std::process::exit(simple_cli(&tools()));
}
