use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "longedrome-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn tester() -> Command {
    Command::new(env!("CARGO_BIN_EXE_longedrome-tester"))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let output_path = temp_path("list");
    let status = tester()
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("final-battle"));
}

#[test]
fn cli_runs_smoke_with_json_report() {
    let output_path = temp_path("smoke");
    let output = tester()
        .args([
            "--report",
            "json",
            "--scenarios",
            "smoke,final-battle",
            "--iterations",
            "2",
            "--seeds",
            "1,temple",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let content = std::fs::read_to_string(output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = report.as_array().expect("array of results");
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["passed"] == true));
    assert_eq!(results[2]["outcomes"]["victories"], 2);
}

#[test]
fn cli_warns_about_unknown_scenarios() {
    let output = tester()
        .args(["--scenarios", "weather", "--report", "markdown", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stderr.contains("Unknown scenario"));
    assert!(stdout.contains("No scenarios executed"));
}

#[test]
fn cli_fails_when_a_scenario_fails() {
    let config_path = temp_path("config.json");
    // One round from zero amiability: a single talk cannot befriend the Guardian.
    std::fs::write(
        &config_path,
        r#"{"max_turns": 1, "enemy": {"hp": 100, "max_hp": 100, "amiability": 0}}"#,
    )
    .expect("write config");
    let output = tester()
        .args(["--scenarios", "diplomacy", "--iterations", "1", "--report", "json", "--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_rejects_invalid_config() {
    let config_path = temp_path("invalid.json");
    std::fs::write(&config_path, r#"{"magic_cost": -5}"#).expect("write config");
    let output = tester()
        .args(["--scenarios", "smoke", "--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load config"));
}
