use std::fs;
use std::process::{Command, Output};

fn tools(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tools"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tools")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

#[test]
fn double_prints_result() {
    let output = tools(&["Calculator", "double", "--number", "10"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "20");
}

#[test]
fn reverse_prints_result() {
    let output = tools(&["String", "reverse", "--string", "hello"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "olleh");
}

#[test]
fn join_uses_default_separator() {
    let output = tools(&["String", "join", "--items", "a,b,c"]);
    assert_eq!(stdout(&output), "a b c");

    let output = tools(&["String", "join", "--items", "a,b", "--char=-"]);
    assert_eq!(stdout(&output), "a-b");
}

#[test]
fn json_output_format() {
    let output = tools(&["--format", "json", "String", "reverse", "--string", "abc"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "\"cba\"");
}

#[test]
fn modify_accepts_one_flag() {
    let output = tools(&["Image", "modify", "--image", "a.png", "--crop-4"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "a.png: cropped to 4 px");
}

// ---------------------------------------------------------------------------
// Failures and exit codes
// ---------------------------------------------------------------------------

#[test]
fn unknown_top_level_command() {
    let output = tools(&["asd"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stderr(&output),
        "No top-level command 'asd'. Try any of: ['Calculator', 'String', 'Image']"
    );
}

#[test]
fn unknown_nested_command() {
    let output = tools(&["Calculator", "triple"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stderr(&output),
        "'Calculator' has no sub-command 'triple'. Try any of: ['double', 'divide']"
    );
}

#[test]
fn bad_argument_value() {
    let output = tools(&["Calculator", "double", "--number", "banana"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stderr(&output),
        "Unable to convert 'banana' to type 'int': invalid digit found in string"
    );
}

#[test]
fn exclusive_flags_are_rejected() {
    let output = tools(&["Image", "modify", "--image", "a.png", "--reverse", "--crop_4"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stderr(&output),
        "The flags --reverse, --crop_4 are mutually exclusive"
    );
}

#[test]
fn handler_failure_exits_with_one() {
    let output = tools(&["Calculator", "divide", "--dividend", "1", "--divisor", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output), "error: division by zero");
}

// ---------------------------------------------------------------------------
// Docs and configuration
// ---------------------------------------------------------------------------

#[test]
fn markdown_documents_every_command() {
    let output = tools(&["--markdown"]);
    assert!(output.status.success());
    let docs = stdout(&output);
    for heading in ["## double", "## divide", "## reverse", "## join", "## modify"] {
        assert!(docs.contains(heading), "missing {heading} in:\n{docs}");
    }
    assert!(docs.contains("Image modify --image str [--reverse] [--crop_4]"));
}

#[test]
fn list_shows_command_paths() {
    let output = tools(&["--list"]);
    assert!(output.status.success());
    let listing = stdout(&output);
    assert!(listing.contains("Calculator double"));
    assert!(listing.contains("Image modify"));
}

#[test]
fn config_changes_list_separator() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("parser.yaml");
    fs::write(&config, "list_separator: ';'\n").unwrap();

    let output = tools(&[
        "--config",
        config.to_str().unwrap(),
        "String",
        "join",
        "--items",
        "a,b;c",
        "--char",
        "+",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "a,b+c");
}

#[test]
fn missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("absent.yaml");
    let output = tools(&["--config", config.to_str().unwrap(), "Calculator"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: failed to load config:"));
}
