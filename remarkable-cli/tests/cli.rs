use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("remarkable-babel")
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn prints_document_tree_by_default() {
    let mut cmd = cargo_bin_cmd!("remarkable");
    cmd.arg(fixture_path("resume.md"));

    let output_pred = predicate::str::contains("\"className\": \"metadata resume\"")
        .and(predicate::str::contains("\"skills\""));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn prints_requested_stage() {
    let mut cmd = cargo_bin_cmd!("remarkable");
    cmd.arg(fixture_path("resume.md")).arg("--stage").arg("resolved");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"metadata\""));
}

#[test]
fn markdown_stage_echoes_source() {
    let mut cmd = cargo_bin_cmd!("remarkable");
    cmd.arg(fixture_path("resume.md")).arg("--stage").arg("markdown");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("<!-- : resume : collections = skills -->"));
}

#[test]
fn compact_output_is_one_line() {
    let mut cmd = cargo_bin_cmd!("remarkable");
    cmd.arg(fixture_path("resume.md")).arg("--compact");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("[{").and(predicate::str::ends_with("}]\n")));
}

#[test]
fn yaml_output() {
    let mut cmd = cargo_bin_cmd!("remarkable");
    cmd.arg(fixture_path("resume.md")).arg("--format").arg("yaml");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("className: metadata resume"));
}

#[test]
fn cycles_are_named_or_deleted() {
    let file = write_temp(".md", "<!-- : loop : name = x : @parent = x -->\n");

    cargo_bin_cmd!("remarkable")
        .arg(file.path())
        .arg("--compact")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""children":["$[0].x"]"#));

    cargo_bin_cmd!("remarkable")
        .arg(file.path())
        .arg("--compact")
        .arg("--delete-cycles")
        .assert()
        .success()
        .stdout(predicate::str::contains("$[0].x").not());
}

#[test]
fn reads_token_streams() {
    let file = write_temp(
        ".txt",
        r#"[{"type": "paragraph", "tokens": [{"type": "text", "raw": "hi", "text": "hi"}]}]"#,
    );

    cargo_bin_cmd!("remarkable")
        .arg(file.path())
        .arg("--tokens")
        .arg("--compact")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""text":"hi""#)
                .and(predicate::str::contains(r#""type":"paragraph""#)),
        );
}

#[test]
fn config_file_is_layered() {
    let config = write_temp(".toml", "[output]\nstage = \"tokens\"\npretty = false\n");

    cargo_bin_cmd!("remarkable")
        .arg(fixture_path("resume.md"))
        .arg("--config")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"html""#));
}

#[test]
fn missing_file_fails() {
    cargo_bin_cmd!("remarkable")
        .arg("no/such/file.md")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot load"));
}

#[test]
fn invalid_token_stream_fails() {
    let file = write_temp(".json", "not json");

    cargo_bin_cmd!("remarkable")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}
