use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
    export: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        let export = seed_export_fixture(&base);

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
            export,
        }
    }

    fn write_config(&self, content: &str) {
        let dir = self.xdg_config.join("sms-analytics");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), content).expect("failed to write config");
    }

    fn export_arg(&self) -> &str {
        self.export.to_str().expect("fixture path is not UTF-8")
    }
}

fn seed_export_fixture(base: &Path) -> PathBuf {
    let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../sms-analytics-core/tests/fixtures/sms-backup.xml");
    let target = base.join("sms-backup.xml");
    fs::copy(source, &target).expect("failed to copy export fixture");
    target
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("sms-analytics"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute sms-analytics: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    assert!(
        output.status.success(),
        "sms-analytics {:?} failed\nstdout:\n{}\nstderr:\n{}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn text_report_for_year() {
    let env = CliTestEnv::new();
    let args = [env.export_arg(), "--year", "2014", "--timezone", "utc"];
    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let text = stdout(&output);
    assert!(text.starts_with("SMS Analytics for 2014\n"), "{text}");
    assert!(text.contains("Total SMSs:                       7  100.00%"), "{text}");
    assert!(text.contains("    Sent:                         4   57.14%"), "{text}");
    assert!(text.contains("     1  Peter Phan                   3   42.86%"), "{text}");
    assert!(text.contains("Monthly SMS activity:"), "{text}");
    assert!(!text.contains("Total SMSs for"), "{text}");
}

#[test]
fn person_filter_adds_person_table() {
    let env = CliTestEnv::new();
    let args = [
        env.export_arg(),
        "--year",
        "2014",
        "--person",
        "Peter Phan",
        "--timezone",
        "utc",
    ];
    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let text = stdout(&output);
    assert!(text.contains("Total SMSs for Peter Phan:        3  100.00%"), "{text}");
    assert!(text.contains("Hourly SMS activity for Peter Phan:"), "{text}");
    assert!(text.contains(&format!("    14:             2  {}", "#".repeat(35))), "{text}");
}

#[test]
fn config_file_supplies_filters() {
    let env = CliTestEnv::new();
    env.write_config(
        r#"
[report]
year_filter_enabled = true
year_filter = "2013"
timezone = "utc"
"#,
    );

    let args = [env.export_arg()];
    let output = run_bin(&env, &args);
    assert_success(&args, &output);
    assert!(stdout(&output).starts_with("SMS Analytics for 2013\n"));

    let args = [env.export_arg(), "--all-time"];
    let output = run_bin(&env, &args);
    assert_success(&args, &output);
    assert!(stdout(&output).starts_with("SMS Analytics for ALL TIME\n"));
}

#[test]
fn json_export() {
    let env = CliTestEnv::new();
    let args = [
        env.export_arg(),
        "--timezone",
        "utc",
        "--ratio-min-texts",
        "1",
        "--export",
        "json",
    ];
    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["period"], "ALL TIME");
    assert_eq!(json["volume"]["total"], 8);
    assert_eq!(json["activity"]["monthly"].as_array().map(Vec::len), Some(12));
    assert_eq!(json["activity"]["daily"].as_array().map(Vec::len), Some(7));
    assert_eq!(json["activity"]["hourly"].as_array().map(Vec::len), Some(24));
    assert_eq!(json["activity"]["hourly"][0]["label"], "00:00");
    assert_eq!(json["ratios"][0]["kind"], "sent_to_received");
}

#[test]
fn json_export_writes_infinite_ratio_as_null() {
    let env = CliTestEnv::new();
    fs::write(
        &env.export,
        r#"<smses count="3">
  <sms date="1394460300000" type="2" contact_name="Peter Phan" />
  <sms date="1394461200000" type="2" contact_name="Peter Phan" />
  <sms date="1394921400000" type="1" contact_name="Alice Nguyen" />
</smses>"#,
    )
    .expect("failed to overwrite fixture");

    let args = [
        env.export_arg(),
        "--timezone",
        "utc",
        "--ratio-min-texts",
        "1",
        "--export",
        "json",
    ];
    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let sent_to_received = &json["ratios"][0]["entries"][0];
    assert_eq!(sent_to_received["name"], "Peter Phan");
    assert!(sent_to_received["ratio"].is_null());
    assert_eq!(sent_to_received["sent"], 2);
    assert_eq!(sent_to_received["received"], 0);

    let received_to_sent = &json["ratios"][1]["entries"];
    assert_eq!(received_to_sent[0]["name"], "Alice Nguyen");
    assert!(received_to_sent[0]["ratio"].is_null());
    assert_eq!(received_to_sent[1]["name"], "Peter Phan");
    assert_eq!(received_to_sent[1]["ratio"], 0.0);
}

#[test]
fn missing_file_fails() {
    let env = CliTestEnv::new();
    let args = ["/nonexistent/sms-backup.xml"];
    let output = run_bin(&env, &args);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load SMS export"), "{stderr}");
}

#[test]
fn missing_argument_fails() {
    let env = CliTestEnv::new();
    let output = run_bin(&env, &[]);
    assert!(!output.status.success());
}

#[test]
fn malformed_export_fails() {
    let env = CliTestEnv::new();
    fs::write(&env.export, "<smses><sms date=\"oops\" type=\"1\" contact_name=\"A\" /></smses>")
        .expect("failed to overwrite fixture");

    let args = [env.export_arg()];
    let output = run_bin(&env, &args);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parse error"), "{stderr}");
}

#[test]
fn malformed_year_fails() {
    let env = CliTestEnv::new();
    let args = [env.export_arg(), "--year", "14"];
    let output = run_bin(&env, &args);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid year filter"), "{stderr}");
}
