use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

fn aqua(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("aqua").unwrap();
    cmd.current_dir(home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("GEMINI_API_KEY")
        .env_remove("GEMINI_API_BASE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn advise_with_mock_provider() {
    let temp = tempfile::tempdir().unwrap();
    aqua(&temp)
        .args(["--provider", "mock", "advise"])
        .assert()
        .success()
        .stdout(contains("Liters per Day: 153.0 L"))
        .stdout(contains("Your Personalized Action Plan"))
        .stdout(contains("[stub answer] 5 facts received"));
}

#[test]
fn advise_json_with_mock_provider() {
    let temp = tempfile::tempdir().unwrap();
    let out = aqua(&temp)
        .args(["--provider", "mock", "--json", "advise", "--laundry", "7"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("single json object");
    assert_eq!(v["liters_per_day"], 195.9);
    assert_eq!(v["model"], "gemini-1.5-flash");
    assert!(v["advice"].as_str().unwrap().contains("stub answer"));
    assert!(v["error"].is_null());
}

#[test]
fn missing_key_halts_before_computing() {
    let temp = tempfile::tempdir().unwrap();
    aqua(&temp)
        .arg("advise")
        .assert()
        .failure()
        .stderr(contains("GEMINI_API_KEY not found"))
        .stdout(contains("Liters per Day").not());
}

#[test]
fn missing_key_json_error() {
    let temp = tempfile::tempdir().unwrap();
    let out = aqua(&temp).args(["advise", "--json"]).output().unwrap();
    assert!(!out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid json error");
    assert_eq!(v["code"], "missing_api_key");
    assert!(v["message"].as_str().unwrap().contains("GEMINI_API_KEY"));
    assert!(v.get("hint").is_some());
}

#[test]
fn missing_key_also_stops_the_form() {
    let temp = tempfile::tempdir().unwrap();
    aqua(&temp)
        .arg("form")
        .write_stdin("\n\n\n\nq\n")
        .assert()
        .failure()
        .stderr(contains("GEMINI_API_KEY not found"))
        .stdout(contains("Input Your Details").not());
}

#[test]
fn key_from_dotenv_file_is_picked_up() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join(".env"), "GEMINI_API_KEY=from-dotenv\n").unwrap();
    // the key satisfies startup; the bogus base makes the call fail without network access
    aqua(&temp)
        .env("GEMINI_API_BASE", "http://127.0.0.1:9/v1beta")
        .arg("advise")
        .assert()
        .success()
        .stdout(contains("Liters per Day: 153.0 L"))
        .stderr(contains("Error generating response"));
}

#[test]
fn unknown_provider_is_a_configuration_error() {
    let temp = tempfile::tempdir().unwrap();
    aqua(&temp)
        .args(["--provider", "openai", "advise"])
        .assert()
        .failure()
        .stderr(contains("unsupported provider: openai"));
}

#[test]
fn form_refuses_json_output() {
    let temp = tempfile::tempdir().unwrap();
    let out = aqua(&temp)
        .args(["--provider", "mock", "--json", "form"])
        .write_stdin("\n\n\n\nq\n")
        .output()
        .unwrap();
    assert!(!out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("only a json error on stdout");
    assert!(v["message"].as_str().unwrap().contains("--json is not supported"));
}
