//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `dsltk` binary and verify
//! exit codes, stdout content, and stderr content.
//!
//! All tests set `current_dir` to the workspace root so that relative
//! paths to the sample grammar and sources resolve correctly.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `dsltk` binary, rooted at workspace.
fn dsltk() -> Command {
    let mut cmd = cargo_bin_cmd!("dsltk");
    cmd.current_dir(workspace_root());
    cmd
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    dsltk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Rule-driven parser for command-style languages",
        ));
}

#[test]
fn version_exits_0() {
    dsltk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dsltk"));
}

// ──────────────────────────────────────────────
// 2. Tokens subcommand
// ──────────────────────────────────────────────

#[test]
fn tokens_prints_one_token_per_line() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("ops.cmd");
    fs::write(&src, ">= <= == $foo").unwrap();

    dsltk()
        .args(["tokens", src.to_str().unwrap()])
        .assert()
        .success()
        .stdout("[GEQ: >=]\n[LEQ: <=]\n[EQ: ==]\n[VAR_ID: foo]\n[EOF: <EOF>]\n");
}

#[test]
fn tokens_json_includes_diagnostics() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("odd.cmd");
    fs::write(&src, "a @ 'open").unwrap();

    let out = dsltk()
        .args(["--output", "json", "tokens", src.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let tokens = json["tokens"].as_array().unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1]["kind"], "str");
    assert_eq!(tokens[1]["text"], "open");
    assert_eq!(tokens[2]["kind"], "eof");
    let diags = json["diagnostics"].as_array().unwrap();
    assert_eq!(diags.len(), 2);
    assert_eq!(diags[0]["kind"], "unknown_char");
    assert_eq!(diags[1]["kind"], "unterminated_string");
}

#[test]
fn tokens_unknown_char_is_logged_as_warning() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("odd.cmd");
    fs::write(&src, "a @ b").unwrap();

    dsltk()
        .args(["tokens", src.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown character '@'"));
}

#[test]
fn tokens_missing_file_exits_1() {
    dsltk()
        .args(["tokens", "does/not/exist.cmd"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading file"));
}

// ──────────────────────────────────────────────
// 3. Parse subcommand
// ──────────────────────────────────────────────

#[test]
fn parse_sample_renders_tree() {
    dsltk()
        .args(["parse", "samples/game.cmd", "--grammar", "samples/game.toml"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Action { action = apply_effect, arguments = {\n  effect_type: Constant(poison)\n  amplifier: Constant(2.0)\n  duration: Constant(10.0)\n  target: Constant(Maple)\n}\n",
        ))
        .stdout(predicate::str::contains("target: VarAccess(player)"))
        .stdout(predicate::str::contains("value: Constant(20.5)"))
        .stdout(predicate::str::contains("value: Constant(false)"));
}

#[test]
fn parse_sample_json_block() {
    let out = dsltk()
        .args([
            "--output",
            "json",
            "parse",
            "samples/game.cmd",
            "-g",
            "samples/game.toml",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let actions = json["actions"].as_array().unwrap();
    let names: Vec<_> = actions.iter().map(|a| a["action"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["apply_effect", "send", "set", "set"]);
    assert_eq!(actions[1]["arguments"]["message"]["value"], "hello there");
    assert_eq!(actions[2]["arguments"]["name"]["type"], "var");
    assert_eq!(actions[3]["line"], 4);
}

#[test]
fn parse_syntax_error_exits_1_with_position() {
    dsltk()
        .args(["parse", "samples/broken.cmd", "--grammar", "samples/game.toml"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "line 2: no rule matches at token 4 [WORD: teleport]",
        ));
}

#[test]
fn parse_syntax_error_json() {
    let out = dsltk()
        .args([
            "--output",
            "json",
            "parse",
            "samples/broken.cmd",
            "--grammar",
            "samples/game.toml",
        ])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stderr
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["errors"][0]["kind"], "syntax");
    assert_eq!(json["errors"][0]["position"], 4);
    assert_eq!(json["errors"][0]["line"], 2);
    assert_eq!(json["errors"][0]["found"]["text"], "teleport");
}

#[test]
fn quiet_silences_errors_in_every_format() {
    for format in ["text", "json"] {
        dsltk()
            .args([
                "--quiet",
                "--output",
                format,
                "parse",
                "samples/broken.cmd",
                "--grammar",
                "samples/game.toml",
            ])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::is_empty());

        dsltk()
            .args(["--quiet", "--output", format, "grammar", "does/not/exist.toml"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::is_empty());
    }
}

#[test]
fn parse_recover_keeps_going() {
    dsltk()
        .args([
            "parse",
            "samples/broken.cmd",
            "--grammar",
            "samples/game.toml",
            "--recover",
        ])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("message: Constant(a)"))
        .stdout(predicate::str::contains("message: Constant(b)"))
        .stderr(predicate::str::contains("[WORD: teleport]"))
        .stderr(predicate::str::contains("[WORD: Maple]"))
        .stderr(predicate::str::contains("[WORD: home]"));
}

#[test]
fn parse_with_json_grammar() {
    let dir = TempDir::new().unwrap();
    let grammar = dir.path().join("g.json");
    fs::write(
        &grammar,
        r#"{"rules": [{"name": "heal", "elements": [{"keyword": "heal"}, {"argument": "amount"}]}]}"#,
    )
    .unwrap();
    let src = dir.path().join("s.cmd");
    fs::write(&src, "heal 5 heal $bonus").unwrap();

    dsltk()
        .args([
            "parse",
            src.to_str().unwrap(),
            "--grammar",
            grammar.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("amount: Constant(5.0)"))
        .stdout(predicate::str::contains("amount: VarAccess(bonus)"));
}

#[test]
fn parse_bad_grammar_exits_1() {
    let dir = TempDir::new().unwrap();
    let grammar = dir.path().join("g.toml");
    fs::write(&grammar, "[[rule]]\nname = \"x\"\n").unwrap();

    dsltk()
        .args([
            "parse",
            "samples/game.cmd",
            "--grammar",
            grammar.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "rule 'x' must have exactly one of 'pattern' or 'elements'",
        ));
}

// ──────────────────────────────────────────────
// 4. Grammar subcommand
// ──────────────────────────────────────────────

#[test]
fn grammar_lists_rules_as_patterns() {
    dsltk()
        .args(["grammar", "samples/game.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("send := send <message> to <target>"))
        .stdout(predicate::str::contains("set := set <name> = <value>"));
}

#[test]
fn grammar_reports_lint_warnings() {
    let dir = TempDir::new().unwrap();
    let grammar = dir.path().join("g.toml");
    fs::write(
        &grammar,
        "[[rule]]\nname = \"say\"\npattern = \"say <x>\"\n\n[[rule]]\nname = \"say_to\"\npattern = \"say <x> to <y>\"\n",
    )
    .unwrap();

    dsltk()
        .args(["grammar", grammar.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "warning: rule 'say_to' is unreachable: earlier rule 'say' matches a prefix of it",
        ));
}

#[test]
fn grammar_accepts_angle_operators_in_patterns() {
    let dir = TempDir::new().unwrap();
    let grammar = dir.path().join("g.toml");
    fs::write(
        &grammar,
        "[[rule]]\nname = \"lt\"\npattern = \"if <a> < <b>\"\n\n[[rule]]\nname = \"le\"\npattern = \"if <a> <= <b>\"\n",
    )
    .unwrap();
    let src = dir.path().join("s.cmd");
    fs::write(&src, "if $hp <= 10").unwrap();

    dsltk()
        .args([
            "parse",
            src.to_str().unwrap(),
            "--grammar",
            grammar.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("action = le"))
        .stdout(predicate::str::contains("a: VarAccess(hp)"))
        .stdout(predicate::str::contains("b: Constant(10.0)"));
}

#[test]
fn grammar_json_output() {
    let out = dsltk()
        .args(["--output", "json", "grammar", "samples/game.toml"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["rules"].as_array().unwrap().len(), 3);
    assert_eq!(json["rules"][1]["name"], "send");
    assert_eq!(json["rules"][1]["elements"][0]["keyword"], "send");
    assert!(json["warnings"].as_array().unwrap().is_empty());
}
