//! Spawns the `kestrel` binary and checks exit codes and output.
//!
//! Every test passes `--config` so a config file in the user's home
//! directory cannot change the results.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn kestrel(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("kestrel");
        cmd.arg("--config").arg(self.dir.path().join("config.toml"));
        cmd
    }
}

#[test]
fn help_describes_the_tool() {
    cargo_bin_cmd!("kestrel")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Parse Kestrel source files and report diagnostics",
        ));
}

#[test]
fn parse_prints_tree_and_exits_0() {
    let ws = Workspace::new();
    let file = ws.file("A.kes", "class A { }");

    ws.kestrel()
        .arg("parse")
        .arg(&file)
        .assert()
        .success()
        .stdout("CompilationUnit@0..11\n  ClassDecl@0..11\n")
        .stderr("");
}

#[test]
fn parse_source_format_prints_canonical_text() {
    let ws = Workspace::new();
    let file = ws.file("A.kes", "class A{int f(){return 1;}}");

    ws.kestrel()
        .args(["parse", "--format", "source"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("return 1;"))
        .stdout(predicate::str::contains("CompilationUnit").not());
}

#[test]
fn config_file_selects_the_format() {
    let ws = Workspace::new();
    ws.file("config.toml", "[output]\nformat = \"source\"\n");
    let file = ws.file("A.kes", "class A { }");

    ws.kestrel()
        .arg("parse")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("class A {"));
}

#[test]
fn syntax_errors_exit_1_with_located_diagnostics() {
    let ws = Workspace::new();
    let file = ws.file("Broken.kes", "class A { int x = ; }");

    ws.kestrel()
        .arg("parse")
        .arg(&file)
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("CompilationUnit@0..21"))
        .stderr(predicate::str::contains(
            "Broken.kes:1:19: error: expected expression, found ';'",
        ));
}

#[test]
fn warnings_do_not_fail_the_run() {
    let ws = Workspace::new();
    let file = ws.file("A.kes", "class A { ; }");

    ws.kestrel()
        .arg("parse")
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "1:11: warning: unnecessary semicolon in class body",
        ));
}

#[test]
fn warnings_can_be_silenced_in_config() {
    let ws = Workspace::new();
    ws.file("config.toml", "[diagnostics]\nwarnings = false\n");
    let file = ws.file("A.kes", "class A { ; }");

    ws.kestrel()
        .arg("parse")
        .arg(&file)
        .assert()
        .success()
        .stderr("");
}

#[test]
fn diagnostics_beyond_the_limit_are_counted() {
    let ws = Workspace::new();
    ws.file("config.toml", "[output]\nmax_diagnostics = 1\n");
    let file = ws.file("A.kes", "class A { void f() { x;");

    ws.kestrel()
        .arg("parse")
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected '}', found end of input").count(1))
        .stderr(predicate::str::contains("... and 1 more diagnostics"));
}

#[test]
fn missing_input_exits_2() {
    let ws = Workspace::new();

    ws.kestrel()
        .arg("parse")
        .arg(ws.dir.path().join("nope.kes"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn malformed_config_exits_2() {
    let ws = Workspace::new();
    ws.file("config.toml", "[output]\nformat = \"xml\"\n");
    let file = ws.file("A.kes", "class A { }");

    ws.kestrel()
        .arg("parse")
        .arg(&file)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn tokens_lists_trivia_too() {
    let ws = Workspace::new();
    let file = ws.file("A.kes", "class A {}");

    ws.kestrel()
        .arg("tokens")
        .arg(&file)
        .assert()
        .success()
        .stdout(concat!(
            "Class@0..5 \"class\"\n",
            "Whitespace@5..6 \" \"\n",
            "Ident@6..7 \"A\"\n",
            "Whitespace@7..8 \" \"\n",
            "LBrace@8..9 \"{\"\n",
            "RBrace@9..10 \"}\"\n",
        ));
}
