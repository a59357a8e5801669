use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

use outreach::crypto::{CipherEncoding, EnvelopeDecoder, SharedSecret};

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn decoder() -> EnvelopeDecoder {
    EnvelopeDecoder::new(SharedSecret::new(SECRET).unwrap())
}

fn seal(value: Value) -> String {
    decoder().seal(&value, CipherEncoding::Hex).unwrap()
}

fn outreach(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("outreach").unwrap();
    cmd.env("OUTREACH_CONFIG_DIR", config_dir.path())
        .env("OUTREACH_SHARED_SECRET", SECRET)
        .env_remove("RUST_LOG");
    cmd
}

fn write_json(dir: &TempDir, name: &str, value: &Value) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, value.to_string()).unwrap();
    path
}

#[test]
fn decode_prints_json() {
    let dir = TempDir::new().unwrap();
    let envelope = seal(json!({"first_name": "Maria", "visits": 3}));

    outreach(&dir)
        .args(["decode", &envelope])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"first_name\": \"Maria\""))
        .stdout(predicate::str::contains("\"visits\": 3"));
}

#[test]
fn decode_reads_stdin() {
    let dir = TempDir::new().unwrap();

    outreach(&dir)
        .args(["decode", "-"])
        .write_stdin(format!("{}\n", seal(json!([1, 2]))))
        .assert()
        .success()
        .stdout(predicate::str::contains("1,"));
}

#[test]
fn decode_failure_exits_non_zero() {
    let dir = TempDir::new().unwrap();

    outreach(&dir)
        .args(["decode", "no-separator"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed envelope"));
}

#[test]
fn decode_lenient_echoes_input() {
    let dir = TempDir::new().unwrap();

    outreach(&dir)
        .args(["decode", "--lenient", "no-separator"])
        .assert()
        .success()
        .stdout("no-separator\n");
}

#[test]
fn invalid_secret_length_is_rejected() {
    let dir = TempDir::new().unwrap();

    outreach(&dir)
        .env("OUTREACH_SHARED_SECRET", "short")
        .args(["decode", "abc:def"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("16, 24 or 32 bytes"));
}

#[test]
fn seal_output_decodes() {
    let dir = TempDir::new().unwrap();

    let output = outreach(&dir)
        .args(["seal", "--encoding", "base64", r#"{"status":"Active"}"#])
        .output()
        .unwrap();
    assert!(output.status.success());

    let envelope = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        decoder().decode(envelope.trim()).unwrap(),
        json!({"status": "Active"})
    );
}

#[test]
fn normalize_decodes_response_and_fields() {
    let dir = TempDir::new().unwrap();
    let rows = json!([{"first_name": seal(json!("Maria")), "age": 30}]);
    let path = write_json(&dir, "page.json", &json!({"data": seal(rows), "total": 1}));

    outreach(&dir)
        .arg("normalize")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"first_name\": \"Maria\""))
        .stdout(predicate::str::contains("\"age\": 30"));
}

#[test]
fn audit_table_summarizes_events() {
    let dir = TempDir::new().unwrap();
    let events = json!([
        {
            "action": "CREATE",
            "table_name": "patients",
            "new_values": seal(json!({"first_name": "Maria", "last_name": "Santos"})),
            "username": "nurse.ana",
        },
        {
            "action": "UPDATE",
            "table_name": "patients",
            "old_values": {"status": "Active"},
            "new_values": {"status": "Inactive"},
            "username": "nurse.ana",
        },
    ]);
    let path = write_json(&dir, "audit.json", &events);

    outreach(&dir)
        .arg("audit")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created patients: Maria Santos"))
        .stdout(predicate::str::contains("Updated status"))
        .stdout(predicate::str::contains("2 event(s)"));
}

#[test]
fn audit_csv_uses_configured_offset() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"utc_offset_minutes": 0}"#).unwrap();
    let path = write_json(
        &dir,
        "audit.json",
        &json!({"data": [{
            "action": "LOGOUT",
            "table": "users",
            "user": {"username": "admin"},
            "created_at": "2025-10-25T14:07:45Z",
        }]}),
    );

    outreach(&dir)
        .args(["audit", "--format", "csv"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            "When,User,Action,Table,Summary\n\
             \"10/25/2025, 2:07:45 PM\",admin,LOGOUT,users,User logged out\n",
        );
}

#[test]
fn total_uses_probe_when_ambiguous() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<Value> = (0..10).map(|i| json!({"id": i})).collect();
    let page = write_json(&dir, "page.json", &json!({"data": rows, "total": 10}));
    let probe = write_json(&dir, "probe.json", &json!({"data": [{"id": 0}], "total": 37}));

    outreach(&dir)
        .arg("total")
        .arg(&page)
        .assert()
        .success()
        .stdout("10\n");

    outreach(&dir)
        .arg("total")
        .arg(&page)
        .arg("--probe")
        .arg(&probe)
        .assert()
        .success()
        .stdout("37\n");
}

#[test]
fn init_writes_settings_once() {
    let dir = TempDir::new().unwrap();

    outreach(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings written to"));
    assert!(dir.path().join("config.json").exists());

    outreach(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

#[test]
fn config_shows_paths() {
    let dir = TempDir::new().unwrap();

    outreach(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config directory"))
        .stdout(predicate::str::contains("from environment/flag"));
}

#[test]
fn corrupt_settings_do_not_block_recovery() {
    let dir = TempDir::new().unwrap();
    let settings_file = dir.path().join("config.json");
    std::fs::write(&settings_file, "{not json").unwrap();

    outreach(&dir)
        .args(["decode", "abc:def"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse settings file"));

    outreach(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config directory"))
        .stdout(predicate::str::contains("Could not load settings"));

    outreach(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    outreach(&dir).args(["init", "--force"]).assert().success();
    let restored: Value =
        serde_json::from_str(&std::fs::read_to_string(&settings_file).unwrap()).unwrap();
    assert_eq!(restored["diff_equality"], "textual");

    outreach(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Diff equality:    Textual"));
}
