use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn isolated_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dirty-json-agent");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("DJA_CONFIG_PATH", home.join("missing.toml"))
        .env_remove("DJA_LOG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn parse_closes_missing_brace_from_stdin() {
    let tmp = tempdir().expect("tempdir");

    let out = isolated_cmd(tmp.path())
        .args(["--json", "parse"])
        .write_stdin(r#"{"a": 1, "b": [1,2,3]"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: Value = serde_json::from_slice(&out).expect("report json");
    assert_eq!(report["ok"], Value::Bool(true));
    assert_eq!(report["payload"]["a"], 1);
    assert_eq!(report["payload"]["b"], serde_json::json!([1, 2, 3]));
    assert!(
        report["details"]
            .as_array()
            .expect("details")
            .iter()
            .any(|d| d == "braces_corrected=true")
    );
}

#[test]
fn parse_accepts_native_literals_from_file() {
    let tmp = tempdir().expect("tempdir");
    let input = tmp.path().join("reply.txt");
    fs::write(&input, "{'a': True, 'b': None}").expect("write input");

    isolated_cmd(tmp.path())
        .arg("parse")
        .arg("--file")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a\": true"))
        .stdout(predicate::str::contains("\"b\": null"));
}

#[test]
fn parse_rejects_prose() {
    let tmp = tempdir().expect("tempdir");

    isolated_cmd(tmp.path())
        .arg("parse")
        .write_stdin("not json at all")
        .assert()
        .failure()
        .stdout(predicate::str::contains("parse: failed"))
        .stdout(predicate::str::contains("unparsable json"));
}
