use assert_cmd::Command;
use predicates::prelude::*;

fn snipctx() -> Command {
    let mut command = Command::cargo_bin("snipctx").expect("binary exists");
    command.env_remove("SNIPCTX_MODEL");
    command.env_remove("SNIPCTX_SNIPPET_HEADER");
    command
}

#[test]
fn help_displays_usage() {
    snipctx()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn extract_reads_stdin() {
    snipctx()
        .arg("extract")
        .write_stdin("intro\n```java\nint x=1;\n```\nend")
        .assert()
        .success()
        .stdout("int x=1;\n");
}

#[test]
fn render_highlights_bash_block() {
    snipctx()
        .arg("render")
        .write_stdin("```bash\necho hi\n```")
        .assert()
        .success()
        .stdout(predicate::str::contains("<pre"))
        .stdout(predicate::str::contains("<span style='color:#CC7832'>echo</span> hi"))
        .stdout(predicate::str::contains("```").not());
}

#[test]
fn capture_prints_snippet_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let document = dir.path().join("Main.java");
    std::fs::write(&document, "line1\nline2\nline3\n").expect("write document");

    snipctx()
        .arg("capture")
        .arg("--document")
        .arg(&document)
        .write_stdin("line2\nline3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"file_name\": \"Main.java\""))
        .stdout(predicate::str::contains("\"start_line\": 2"))
        .stdout(predicate::str::contains("\"end_line\": 3"));
}

#[test]
fn capture_miss_prints_null() {
    let dir = tempfile::tempdir().expect("tempdir");
    let document = dir.path().join("Main.java");
    std::fs::write(&document, "line1\nline2\n").expect("write document");

    snipctx()
        .args(["capture", "--name", "Other.java", "--document"])
        .arg(&document)
        .write_stdin("single line")
        .assert()
        .success()
        .stdout("null\n");
}
