/// CLI integration tests for pillbox.
///
/// Each test spawns the compiled binary via the `assert_cmd::cargo_bin_cmd!`
/// macro and sets `PILLBOX_HOME` to a fresh `TempDir` so tests are fully
/// isolated from the developer's real `~/.pillbox` data.
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ── helpers ──────────────────────────────────────────────────────────────────

/// Returns a `Command` with `PILLBOX_HOME` pointing at `dir`.
fn cmd_in(dir: &TempDir) -> assert_cmd::Command {
    let mut c = cargo_bin_cmd!("pillbox");
    c.env("PILLBOX_HOME", dir.path());
    c
}

/// Run `pillbox init --skip` in the given temp dir so the config and DB
/// exist before subsequent commands.
fn init_dir(dir: &TempDir) {
    cmd_in(dir).args(["init", "--skip"]).assert().success();
}

/// Parse stdout JSON and return the root `Value`.
fn parse_json(output: &assert_cmd::assert::Assert) -> Value {
    let bytes = output.get_output().stdout.clone();
    serde_json::from_slice(&bytes).expect("stdout is not valid JSON")
}

/// Parse stderr JSON and return the root `Value`.
fn parse_stderr_json(output: &assert_cmd::assert::Assert) -> Value {
    let bytes = output.get_output().stderr.clone();
    serde_json::from_slice(&bytes).expect("stderr is not valid JSON")
}

/// Register a medicine and create a midnight reminder for it, returning the
/// reminder id. Midnight is always past due, which keeps take/sweep flows
/// deterministic regardless of when the test runs.
fn add_reminder(dir: &TempDir, medicine: &str) -> String {
    cmd_in(dir)
        .args(["med", "add", medicine])
        .assert()
        .success();
    let out = cmd_in(dir)
        .args(["reminder", "add", medicine, "--time", "00:00", "--dose", "1 tablet"])
        .assert()
        .success();
    let json = parse_json(&out);
    json["data"]["id"].as_str().expect("reminder id").to_string()
}

// ── init ─────────────────────────────────────────────────────────────────────

#[test]
fn test_init_skip_creates_config_and_db() {
    let dir = TempDir::new().unwrap();
    cmd_in(&dir)
        .args(["init", "--skip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config initialized"));

    assert!(dir.path().join("config.toml").exists());
    assert!(dir.path().join("data.db").exists());
}

// ── med ──────────────────────────────────────────────────────────────────────

#[test]
fn test_med_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);

    let out = cmd_in(&dir)
        .args(["med", "add", "metformin", "--note", "500mg tablets"])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["data"]["name"], "metformin");

    let out = cmd_in(&dir).args(["med", "list"]).assert().success();
    let json = parse_json(&out);
    let meds = json["data"]["medicines"].as_array().unwrap();
    assert_eq!(meds.len(), 1);
}

// ── reminder lifecycle ───────────────────────────────────────────────────────

#[test]
fn test_reminder_add_requires_known_medicine() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);

    let out = cmd_in(&dir)
        .args(["reminder", "add", "ghost-medicine", "--time", "08:00"])
        .assert()
        .failure();
    let err = parse_stderr_json(&out);
    assert_eq!(err["status"], "error");
    assert_eq!(err["error"]["code"], "not_found");
}

#[test]
fn test_reminder_validation_error_surfaces() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    cmd_in(&dir).args(["med", "add", "aspirin"]).assert().success();

    let out = cmd_in(&dir)
        .args([
            "reminder",
            "add",
            "aspirin",
            "--time",
            "08:00",
            "--recurrence",
            "specific_days",
        ])
        .assert()
        .failure();
    let err = parse_stderr_json(&out);
    assert_eq!(err["error"]["code"], "validation");
}

#[test]
fn test_take_flow_reaches_stats() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let id = add_reminder(&dir, "metformin");

    // The reminder shows up on today's dashboard, already past due
    let out = cmd_in(&dir).args(["reminder", "today"]).assert().success();
    let json = parse_json(&out);
    let entries = json["data"]["reminders"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["is_pending"], true);

    cmd_in(&dir)
        .args(["reminder", "take", &id])
        .assert()
        .success();

    // Taken entries disappear from the dashboard
    let out = cmd_in(&dir).args(["reminder", "today"]).assert().success();
    let json = parse_json(&out);
    assert!(json["data"]["reminders"].as_array().unwrap().is_empty());

    // And land in the adherence stats
    let today = chrono::Local::now().date_naive().to_string();
    let out = cmd_in(&dir)
        .args(["adherence", "stats", "--from", &today, "--to", &today])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["total_scheduled"], 1);
    assert_eq!(json["data"]["taken"], 1);
    assert_eq!(json["data"]["adherence_rate"], 100.0);
}

#[test]
fn test_sweep_is_idempotent_per_day() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_reminder(&dir, "metformin");

    let out = cmd_in(&dir).args(["reminder", "sweep"]).assert().success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["missed_recorded"], 1);

    let out = cmd_in(&dir).args(["reminder", "sweep"]).assert().success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["missed_recorded"], 0);
}

#[test]
fn test_delete_removes_reminder_and_history() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let id = add_reminder(&dir, "metformin");

    cmd_in(&dir)
        .args(["reminder", "take", &id])
        .assert()
        .success();
    cmd_in(&dir)
        .args(["reminder", "delete", &id])
        .assert()
        .success();

    let out = cmd_in(&dir).args(["reminder", "list"]).assert().success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["total"], 0);

    let today = chrono::Local::now().date_naive().to_string();
    let out = cmd_in(&dir)
        .args(["adherence", "stats", "--from", &today, "--to", &today])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["total_scheduled"], 0);
}

#[test]
fn test_take_unknown_reminder_fails_with_not_found() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);

    let out = cmd_in(&dir)
        .args(["reminder", "take", "no-such-id"])
        .assert()
        .failure();
    let err = parse_stderr_json(&out);
    assert_eq!(err["error"]["code"], "not_found");
}

// ── user scoping ─────────────────────────────────────────────────────────────

#[test]
fn test_user_flag_scopes_data() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_reminder(&dir, "metformin"); // default user

    let out = cmd_in(&dir)
        .args(["reminder", "list", "--user", "someone-else"])
        .assert()
        .success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["total"], 0);
}

// ── tick ─────────────────────────────────────────────────────────────────────

#[test]
fn test_tick_daily_reports_sweep() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_reminder(&dir, "metformin");

    let out = cmd_in(&dir).args(["tick", "daily"]).assert().success();
    let json = parse_json(&out);
    assert_eq!(json["data"]["daily"]["total_missed"], 1);
    assert!(json["data"]["weekly"].is_null());
}

#[test]
fn test_tick_weekly_reports_observations() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    let id = add_reminder(&dir, "metformin");
    cmd_in(&dir)
        .args(["reminder", "take", &id])
        .assert()
        .success();

    let out = cmd_in(&dir).args(["tick", "weekly"]).assert().success();
    let json = parse_json(&out);
    let observations = json["data"]["weekly"]["observations"].as_array().unwrap();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0]["current_streak"], 1);
}

// ── human output ─────────────────────────────────────────────────────────────

#[test]
fn test_human_today_renders_table() {
    let dir = TempDir::new().unwrap();
    init_dir(&dir);
    add_reminder(&dir, "metformin");

    cmd_in(&dir)
        .args(["reminder", "today", "--human"])
        .assert()
        .success()
        .stdout(predicate::str::contains("metformin"));
}
