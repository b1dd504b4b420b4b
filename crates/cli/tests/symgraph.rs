use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn method(id: &str, label: &str) -> String {
    format!(
        r#"{{
      "identifier": {{"precise": "{id}", "interfaceLanguage": "swift"}},
      "kind": {{"identifier": "swift.method", "displayName": "Instance Method"}},
      "pathComponents": ["Widget", "draw"],
      "names": {{"title": "draw({label}:)"}},
      "accessLevel": "public",
      "declarationFragments": [
        {{"kind": "keyword", "spelling": "func"}},
        {{"kind": "text", "spelling": " "}},
        {{"kind": "identifier", "spelling": "draw"}},
        {{"kind": "text", "spelling": "("}},
        {{"kind": "externalParam", "spelling": "{label}"}},
        {{"kind": "text", "spelling": ": "}},
        {{"kind": "typeIdentifier", "spelling": "Int"}},
        {{"kind": "text", "spelling": ")"}}
      ]
    }}"#
    )
}

fn graph(module: &str, os: &str, symbols: &[String], relationships: &str) -> String {
    format!(
        r#"{{
  "metadata": {{"formatVersion": {{"major": 0, "minor": 6, "patch": 0}}, "generator": "test"}},
  "module": {{"name": "{module}", "platform": {{"operatingSystem": {{"name": "{os}"}}}}}},
  "symbols": [{}],
  "relationships": [{relationships}]
}}"#,
        symbols.join(",")
    )
}

fn write_fixture(dir: &Path) {
    let widget = r#"{
      "identifier": {"precise": "s:Widget", "interfaceLanguage": "swift"},
      "kind": {"identifier": "swift.struct", "displayName": "Structure"},
      "pathComponents": ["Widget"],
      "names": {"title": "Widget"},
      "accessLevel": "public"
    }"#
    .to_string();

    fs::write(
        dir.join("Kit.symbols.json"),
        graph(
            "Kit",
            "macosx",
            &[widget, method("s:draw-in", "in"), method("s:draw-at", "at")],
            r#"{"source": "s:draw-in", "target": "s:Widget", "kind": "memberOf"},
               {"source": "s:Lost", "target": "s:Gone", "kind": "conformsTo"}"#,
        ),
    )
    .unwrap();
    fs::write(
        dir.join("Tools@Kit.symbols.json"),
        graph("Tools", "macosx", &[method("s:draw-with", "with")], ""),
    )
    .unwrap();
}

#[allow(deprecated)]
fn symgraph() -> Command {
    Command::cargo_bin("symgraph").expect("binary")
}

fn run_json(args: &[&str], dir: &Path) -> Value {
    let output = symgraph()
        .arg("--json")
        .args(args)
        .arg(dir)
        .output()
        .expect("command run");

    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn json_report_covers_modules_groups_and_orphans() {
    let temp = tempdir().unwrap();
    write_fixture(temp.path());

    let report = run_json(&["--overload-groups"], temp.path());
    let modules = report["modules"].as_array().expect("modules array");
    assert_eq!(modules.len(), 1);

    let kit = &modules[0];
    assert_eq!(kit["name"], "Kit");
    // Widget, three `draw` overloads and their group
    assert_eq!(kit["symbols"], 5);
    assert_eq!(kit["orphans"], 1);
    assert_eq!(kit["sources"].as_array().unwrap().len(), 2);
    assert_eq!(
        kit["overload_groups"],
        json!(["s:draw-at::OverloadGroup"])
    );

    let diagnostics = report["diagnostics"].as_array().expect("diagnostics array");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["kind"], "orphan_relationships");
}

#[test]
fn symbol_count_includes_synthesized_groups() {
    let temp = tempdir().unwrap();
    write_fixture(temp.path());

    let plain = run_json(&[], temp.path());
    assert_eq!(plain["modules"][0]["symbols"], 4);
    assert_eq!(plain["modules"][0]["overload_groups"], json!([]));

    let grouped = run_json(&["--overload-groups"], temp.path());
    assert_eq!(grouped["modules"][0]["symbols"], 5);
    assert_eq!(
        grouped["modules"][0]["overload_groups"],
        json!(["s:draw-at::OverloadGroup"])
    );
}

#[test]
fn extending_association_keeps_tools_separate() {
    let temp = tempdir().unwrap();
    write_fixture(temp.path());

    let report = run_json(&["--extension-association", "extending"], temp.path());
    let names: Vec<&str> = report["modules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Kit", "Tools"]);
    assert_eq!(report["modules"][0]["overload_groups"], json!([]));
}

#[test]
fn config_file_is_overridden_by_flags() {
    let temp = tempdir().unwrap();
    let graphs = temp.path().join("graphs");
    fs::create_dir_all(&graphs).unwrap();
    write_fixture(&graphs);
    let config = temp.path().join("symgraph.toml");
    fs::write(
        &config,
        "create_overload_groups = true\nrestrict_overload_group_languages = [\"occ\"]\n",
    )
    .unwrap();

    let restricted = run_json(&["--config", config.to_str().unwrap()], &graphs);
    assert_eq!(restricted["modules"][0]["overload_groups"], json!([]));

    let overridden = run_json(
        &["--config", config.to_str().unwrap(), "--restrict-language", "swift"],
        &graphs,
    );
    assert_eq!(
        overridden["modules"][0]["overload_groups"],
        json!(["s:draw-at::OverloadGroup"])
    );
}

#[test]
fn markdown_is_the_default_output() {
    let temp = tempdir().unwrap();
    write_fixture(temp.path());

    symgraph()
        .arg("--quiet")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Symbol graph report"))
        .stdout(predicate::str::contains("## Kit"));
}

#[test]
fn invalid_inputs_fail() {
    let temp = tempdir().unwrap();

    symgraph()
        .arg(temp.path().join("missing.symbols.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input not found"));

    let broken = temp.path().join("Broken.symbols.json");
    fs::write(&broken, "{ not json").unwrap();
    symgraph()
        .arg(&broken)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode symbol graph"));
}
