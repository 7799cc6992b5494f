//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const EXAMPLE: &str = "
= h (lottery 1)
a
== q
p
+ a1 (correct)
+ a2
";

fn examtool(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("examtool").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("EXAM_COOKIE")
        // Nothing should be listening here; tests must not reach the network.
        .env("EXAMTOOL_BASE_URL", "http://127.0.0.1:9");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn parse_prints_exam_json() {
    let dir = TempDir::new().unwrap();
    write(&dir, "exam.typ", EXAMPLE);

    let output = examtool(&dir)
        .arg("parse")
        .arg("exam.typ")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "name": "h",
            "description": "a\n",
            "lotteryOn": true,
            "lotteryItemCount": 1,
            "questions": [{
                "typst": "p\n",
                "options": [
                    {"option": "a1", "correctOption": true},
                    {"option": "a2", "correctOption": false}
                ],
                "html": "<p>p</p>"
            }]
        }])
    );
}

#[test]
fn parse_pretty() {
    let dir = TempDir::new().unwrap();
    write(&dir, "exam.typ", EXAMPLE);

    examtool(&dir)
        .args(["parse", "exam.typ", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  {"))
        .stdout(predicate::str::contains("\"lotteryItemCount\": 1"));
}

#[test]
fn parse_rejects_orphan_option() {
    let dir = TempDir::new().unwrap();
    write(&dir, "bad.typ", "+ a1\n");

    examtool(&dir)
        .args(["parse", "bad.typ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("outside of a question"));
}

#[test]
fn parse_nonexistent_file() {
    let dir = TempDir::new().unwrap();

    examtool(&dir)
        .args(["parse", "nonexistent.typ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read exam markup"));
}

#[test]
fn validate_valid_markup() {
    let dir = TempDir::new().unwrap();
    write(&dir, "exam.typ", EXAMPLE);

    examtool(&dir)
        .args(["validate", "exam.typ"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 sections, 1 questions"))
        .stdout(predicate::str::contains("Exam is valid."));
}

#[test]
fn validate_reports_issues() {
    let dir = TempDir::new().unwrap();
    write(&dir, "exam.typ", "= s (lottery 2)\n== q\n+ only\n");

    examtool(&dir)
        .args(["validate", "exam.typ"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("exceeds 1 question(s)"))
        .stdout(predicate::str::contains("needs at least 2 options"))
        .stdout(predicate::str::contains("no correct option"))
        .stderr(predicate::str::contains("3 validation issue(s) found"));
}

#[test]
fn validate_json_file() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "exam.json",
        r#"[{"name": "s", "questions": [{"typst": "body\n", "options": [
            {"option": "a", "correctOption": true}, {"option": "b"}]}]}]"#,
    );

    examtool(&dir)
        .args(["validate", "exam.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam is valid."));
}

#[test]
fn import_invalid_exam_fails_before_network() {
    let dir = TempDir::new().unwrap();
    write(&dir, "exam.typ", "= s\n== q\n+ a\n+ b\n");

    examtool(&dir)
        .args(["import", "1", "2", "exam.typ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid for import"))
        .stderr(predicate::str::contains("no correct option"));
}

#[test]
fn import_malformed_markup_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "exam.typ", "== q\n");

    examtool(&dir)
        .args(["import", "1", "2", "exam.typ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("before any section"));
}

#[test]
fn create_question_rejects_bad_options() {
    let dir = TempDir::new().unwrap();

    examtool(&dir)
        .args(["create", "question", "1", "1", "<p>q</p>", "not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("options must be a JSON list"));
}

#[test]
fn missing_config_file() {
    let dir = TempDir::new().unwrap();

    examtool(&dir)
        .args(["--config", "nope.toml", "get", "exams"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn warns_when_cookie_variable_is_unset() {
    let dir = TempDir::new().unwrap();
    write(&dir, "examtool.toml", "cookie = \"${EXAM_COOKIE}\"\n");

    examtool(&dir)
        .env_remove("RUST_LOG")
        .args(["get", "exams"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no session cookie configured"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    examtool(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created examtool.toml"))
        .stdout(predicate::str::contains("Created exam.typ"));

    assert!(dir.path().join("examtool.toml").exists());
    assert!(dir.path().join("exam.typ").exists());

    // The example exam is valid as written.
    examtool(&dir)
        .args(["validate", "exam.typ"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam is valid."));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    examtool(&dir).arg("init").assert().success();

    // Second init should skip
    examtool(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
