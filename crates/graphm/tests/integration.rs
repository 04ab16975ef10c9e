//! End-to-end CLI tests for the `graphm` binary.
//!
//! Each test works in its own temporary directory and runs the binary as a
//! subprocess via `assert_cmd`.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A `graphm` command isolated from the caller's configuration.
fn graphm(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("graphm").unwrap();
    cmd.current_dir(dir)
        .env_remove("GRAPHM_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("GRAPHM_OUTPUT__COLOR", "never");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> String {
    std::fs::write(dir.path().join(name), contents).unwrap();
    name.to_string()
}

fn user_payload() -> Value {
    json!({
        "@odata.type": "#microsoft.graph.user",
        "id": "87d349ed-44d7-43e1-9a83-5f2406dee5bd",
        "accountEnabled": true,
        "businessPhones": ["+1 425 555 0109"],
        "displayName": "Adele Vance",
        "mail": "AdeleV@contoso.com",
        "jobTitle": "Retail Manager",
        "officeLocation": "18/2111"
    })
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

#[test]
fn decode_describes_the_model() {
    let tmp = TempDir::new().unwrap();
    let file = write(&tmp, "user.json", &user_payload().to_string());

    graphm(tmp.path())
        .args(["decode", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("User  #microsoft.graph.user"))
        .stdout(predicate::str::contains("87d349ed-44d7-43e1-9a83-5f2406dee5bd"))
        .stdout(predicate::str::contains("fields          5"))
        .stdout(predicate::str::contains("jobTitle, officeLocation"));
}

#[test]
fn decode_json_reencodes_the_payload() {
    let tmp = TempDir::new().unwrap();
    let encoded = stdout_json(graphm(tmp.path()).args(["decode", "--json", "-"]).write_stdin(user_payload().to_string()));
    assert_eq!(encoded, user_payload());
}

#[test]
fn decode_picks_subtypes_from_a_collection_page() {
    let tmp = TempDir::new().unwrap();
    let page = json!({
        "@odata.nextLink": "https://graph.microsoft.com/v1.0/groups/g1/members?$skiptoken=abc",
        "value": [
            {"@odata.type": "#microsoft.graph.user", "id": "u1"},
            {"@odata.type": "#microsoft.graph.group", "id": "g2", "visibility": "Private"}
        ]
    });
    let file = write(&tmp, "page.json", &page.to_string());

    let encoded = stdout_json(graphm(tmp.path()).args([
        "decode",
        "--json",
        "--type",
        "DirectoryObjectCollectionResponse",
        &file,
    ]));
    assert_eq!(encoded, page);
}

#[test]
fn strict_decode_rejects_unknown_discriminators() {
    let tmp = TempDir::new().unwrap();
    let file = write(&tmp, "printer.json", r##"{"@odata.type":"#microsoft.graph.printer"}"##);

    graphm(tmp.path())
        .args(["decode", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entity  #microsoft.graph.printer"));

    graphm(tmp.path())
        .args(["decode", "--strict", &file])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown discriminator '#microsoft.graph.printer'"));
}

#[test]
fn decode_errors_name_the_field() {
    let tmp = TempDir::new().unwrap();
    let file = write(&tmp, "bad.json", r#"{"accountEnabled":"yes"}"#);

    graphm(tmp.path())
        .args(["decode", "-t", "user", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot decode bad.json"))
        .stderr(predicate::str::contains("field 'accountEnabled'"));
}

#[test]
fn invalid_json_is_reported_as_json_in_json_mode() {
    let tmp = TempDir::new().unwrap();
    let output = graphm(tmp.path())
        .args(["decode", "--json", "-"])
        .write_stdin("{not json")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let err: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert!(err["error"].as_str().unwrap().starts_with("- is not valid JSON"));
}

#[test]
fn unknown_type_flag_is_an_error() {
    let tmp = TempDir::new().unwrap();
    graphm(tmp.path())
        .args(["decode", "--type", "printer", "-"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown type 'printer'"));
}

// ---------------------------------------------------------------------------
// roundtrip
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_of_a_policy_is_lossless() {
    let tmp = TempDir::new().unwrap();
    let policy = json!({
        "@odata.type": "#microsoft.graph.accessPackageAssignmentPolicy",
        "id": "b2eba9a1-b357-42ee-83a8-336522ed6cbf",
        "displayName": "All Users",
        "createdDateTime": "2021-03-01T09:00:00.000Z",
        "allowedTargetScope": "allMemberUsers",
        "expiration": {
            "@odata.type": "#microsoft.graph.expirationPattern",
            "type": "afterDuration",
            "duration": "P0Y0M0DT720H0M"
        },
        "requestApprovalSettings": {
            "@odata.type": "#microsoft.graph.approvalSettings",
            "isApprovalRequired": true,
            "approvalMode": "SingleStage",
            "approvalStages": [{
                "@odata.type": "#microsoft.graph.unifiedApprovalStage",
                "approvalStageTimeOutInDays": 14,
                "primaryApprovers": [
                    {"@odata.type": "#microsoft.graph.singleUser", "userId": "e6d5b37a"}
                ],
                "escalationApprovers": []
            }]
        }
    });
    let file = write(&tmp, "policy.json", &policy.to_string());

    graphm(tmp.path())
        .args(["roundtrip", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{2713} payload  AccessPackageAssignmentPolicy"));
}

#[test]
fn roundtrip_jsonl_reports_each_line() {
    let tmp = TempDir::new().unwrap();
    let lines = [
        user_payload().to_string(),
        String::new(),
        r#"{"id": "x", "accountEnabled": 3}"#.to_string(),
        r##"{"@odata.type": "#microsoft.graph.group", "id": "g1", "groupTypes": ["Unified"]}"##
            .to_string(),
    ];
    let file = write(&tmp, "batch.jsonl", &lines.join("\n"));

    graphm(tmp.path())
        .args(["roundtrip", "--jsonl", "-t", "user", &file])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("\u{2713} line 1  User"))
        .stdout(predicate::str::contains("\u{2716} line 3"))
        .stdout(predicate::str::contains("\u{2713} line 4  Group"))
        .stdout(predicate::str::contains("3 payloads, 1 failed"))
        .stderr(predicate::str::contains("1 of 3 payloads did not survive the round trip"));
}

#[test]
fn roundtrip_json_report() {
    let tmp = TempDir::new().unwrap();
    let file = write(&tmp, "user.json", r#"{"id": "u1", "displayName": "Adele"}"#);

    let report = stdout_json(graphm(tmp.path()).args(["roundtrip", "--json", "--type", "user", &file]));
    assert_eq!(
        report,
        json!({
            "payloads": 1,
            "failed": 0,
            "results": [{
                "line": null,
                "type": "User",
                "lossless": true,
                "losses": [],
                "added": ["/@odata.type"]
            }]
        })
    );
}

// ---------------------------------------------------------------------------
// edit
// ---------------------------------------------------------------------------

#[test]
fn edit_changes_produce_a_patch_body() {
    let tmp = TempDir::new().unwrap();
    let file = write(&tmp, "user.json", &user_payload().to_string());

    let patch = stdout_json(graphm(tmp.path()).args([
        "edit",
        &file,
        "--set",
        "displayName=Adele Kerr",
        "--set",
        "userType=Guest",
        "--unset",
        "mail",
        "--changes",
    ]));
    assert_eq!(
        patch,
        json!({"displayName": "Adele Kerr", "mail": null, "userType": "Guest"})
    );
}

#[test]
fn edit_patch_of_an_unmodelled_property() {
    let tmp = TempDir::new().unwrap();
    let mut payload = user_payload();
    payload["@odata.context"] = json!("https://graph.microsoft.com/v1.0/$metadata#users/$entity");
    let file = write(&tmp, "user.json", &payload.to_string());

    let patch = stdout_json(graphm(tmp.path()).args([
        "edit",
        &file,
        "--set",
        "officeLocation=20/1101",
        "--unset",
        "jobTitle",
        "--changes",
    ]));
    assert_eq!(patch, json!({"jobTitle": null, "officeLocation": "20/1101"}));
}

#[test]
fn edit_without_changes_prints_the_whole_model() {
    let tmp = TempDir::new().unwrap();
    let file = write(&tmp, "user.json", &user_payload().to_string());

    let edited = stdout_json(graphm(tmp.path()).args(["edit", &file, "--set", "accountEnabled=false"]));
    let mut expected = user_payload();
    expected["accountEnabled"] = json!(false);
    assert_eq!(edited, expected);
}

#[test]
fn edit_rejects_values_of_the_wrong_type() {
    let tmp = TempDir::new().unwrap();
    let file = write(&tmp, "user.json", &user_payload().to_string());

    graphm(tmp.path())
        .args(["edit", &file, "--set", "accountEnabled=maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot set accountEnabled"));
}

// ---------------------------------------------------------------------------
// configuration
// ---------------------------------------------------------------------------

#[test]
fn config_init_show_and_path() {
    let tmp = TempDir::new().unwrap();

    graphm(tmp.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"));

    graphm(tmp.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(tmp.path().join(".graphm.yaml").is_file());

    graphm(tmp.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    graphm(tmp.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default-type: Entity"))
        .stdout(predicate::str::contains("changed-only: false"));

    let path = stdout_json(graphm(tmp.path()).args(["config", "path", "--json"]));
    assert_eq!(path["exists"], json!(true));
    assert!(path["path"].as_str().unwrap().ends_with(".graphm.yaml"));
}

#[test]
fn config_file_is_found_from_a_subdirectory() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, ".graphm.yaml", "encode:\n  changed-only: true\noutput:\n  pretty: false\n");
    let nested = tmp.path().join("payloads");
    std::fs::create_dir(&nested).unwrap();
    std::fs::write(nested.join("user.json"), user_payload().to_string()).unwrap();

    graphm(&nested)
        .args(["edit", "user.json", "--set", "surname=Vance"])
        .assert()
        .success()
        .stdout("{\"surname\":\"Vance\"}\n");
}

#[test]
fn environment_overrides_the_default_type() {
    let tmp = TempDir::new().unwrap();
    graphm(tmp.path())
        .env("GRAPHM_DECODE__DEFAULT_TYPE", "group")
        .args(["decode", "-"])
        .write_stdin(r#"{"id": "g1", "visibility": "Private"}"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Group"));
}

#[test]
fn invalid_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, "broken.yaml", "log:\n  level: loud\n");

    graphm(tmp.path())
        .args(["--config", "broken.yaml", "types"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration in broken.yaml"))
        .stderr(predicate::str::contains("log.level"));
}

// ---------------------------------------------------------------------------
// misc
// ---------------------------------------------------------------------------

#[test]
fn types_lists_the_registry() {
    let tmp = TempDir::new().unwrap();
    graphm(tmp.path())
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("#microsoft.graph.accessPackageAssignmentPolicy"))
        .stdout(predicate::str::contains("(no discriminator)"));

    let types = stdout_json(graphm(tmp.path()).args(["types", "--json"]));
    let users: Vec<&Value> = types
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["name"] == "User")
        .collect();
    assert_eq!(users, vec![&json!({"name": "User", "odataType": "#microsoft.graph.user"})]);
}

#[test]
fn completion_and_version() {
    let tmp = TempDir::new().unwrap();
    graphm(tmp.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("graphm"));

    let version = stdout_json(graphm(tmp.path()).args(["version", "--json"]));
    assert_eq!(version["version"], json!(env!("CARGO_PKG_VERSION")));
    assert_eq!(version["graphApi"], json!("v1.0"));

    graphm(tmp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph v1.0 models:"));
}
