mod common;

use common::{fixture, run_with_crosswalk, spawn_command, stderr, stdout};

#[test]
fn validate_valid_book() {
    let output = spawn_command(&["validate", &fixture("crosswalk.yaml")]);
    assert!(
        output.status.success(),
        "validate should succeed for a valid book: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("✓"));
}

#[test]
fn validate_reports_every_issue() {
    let output = spawn_command(&["validate", &fixture("bad_references.yaml")]);
    assert_eq!(output.status.code(), Some(2));

    let out = stdout(&output);
    assert!(out.contains("value 'Halt'"), "missing value error: {out}");
    assert!(out.contains("did you mean 'AllStop'?"), "missing suggestion: {out}");
    assert!(out.contains("non-negative"), "missing duration error: {out}");
    assert!(out.contains("unknown phase ring 'CrosswalkRng'"), "missing ring error: {out}");
}

#[test]
fn validate_json_output() {
    let output = spawn_command(&[
        "validate",
        "--format",
        "json",
        &fixture("crosswalk.yaml"),
        &fixture("one_way.yaml"),
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let parsed: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("output should be valid JSON");
    let reports = parsed.as_array().expect("JSON output should be an array");
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["valid"], true);
    assert_eq!(reports[1]["warnings"][0]["severity"], "warning");
}

#[test]
fn validate_strict_fails_on_warnings() {
    let output = spawn_command(&["validate", "--strict", &fixture("one_way.yaml")]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn validate_empty_and_missing_files() {
    let output = spawn_command(&["validate", &fixture("empty.yaml")]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("empty"));

    let output = spawn_command(&["validate", "/tmp/nonexistent_roadnet_book.yaml"]);
    assert!(!output.status.success());
}

#[test]
fn describe_human() {
    let output = run_with_crosswalk(&["describe"], &[]);
    assert!(output.status.success(), "{}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("Road network: Crosswalk (malidrive)"));
    assert!(out.contains("CrosswalkRing (current: AllGo)"));
    assert!(out.contains("AllGo -> AllStop after 45s"));
    assert!(out.contains("EastFacing-EastFacingBulbs-GreenBulb"));
}

#[test]
fn describe_json() {
    let output = run_with_crosswalk(&["describe", "--format", "json"], &[]);
    assert!(output.status.success(), "{}", stderr(&output));

    let parsed: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("output should be valid JSON");
    assert_eq!(parsed["geometry"]["backend"], "malidrive");
    assert_eq!(parsed["geometry"]["id"], "Crosswalk");
    assert!(parsed["phase_rings"]["CrosswalkRing"].is_object());
}

#[test]
fn describe_dragway() {
    let output = spawn_command(&["describe", "--backend", "dragway", "--num-lanes", "3"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).starts_with("Road network: Dragway with 3 lanes. (dragway)"));
}

#[test]
fn describe_multilane() {
    let output = spawn_command(&[
        "describe",
        "--backend",
        "multilane",
        "--yaml-file",
        &fixture("circuit.yaml"),
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).starts_with("Road network: circuit (multilane)"));
}

#[test]
fn unreadable_multilane_file_is_io_error() {
    let fixtures = common::fixture_path("");
    let output = spawn_command(&[
        "describe",
        "--backend",
        "multilane",
        "--yaml-file",
        fixtures.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("I/O error"));
}

#[test]
fn malidrive_without_xodr_is_config_error() {
    let output = spawn_command(&["describe"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("xodr_file_path"));
}

#[test]
fn query_current_phase() {
    let output = run_with_crosswalk(&["query"], &["current-phase", "CrosswalkRing"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "CrosswalkRing: AllGo (next: AllStop after 45s)\n"
    );
}

#[test]
fn query_phase_right_of_way_json() {
    let output = run_with_crosswalk(
        &["query", "--format", "json"],
        &["phase-right-of-way", "CrosswalkRing", "AllStop"],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["rule_states"]["Crosswalk/EastApproach"], "Stop");
}

#[test]
fn query_unknown_ring_suggests() {
    let output = run_with_crosswalk(&["query"], &["current-phase", "CrosswalkRng"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("did you mean 'CrosswalkRing'?"));
}

#[test]
fn query_rules() {
    let output = run_with_crosswalk(&["query"], &["discrete-rule", "Crosswalk/NoStopping"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("values: [DoNotStop]"));

    let output = run_with_crosswalk(&["query"], &["range-rule", "SpeedLimit/Crosswalk"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("[0, 11.1] crosswalk zone"));
}

#[test]
fn dynamic_environment_iterates_phases() {
    let output = run_with_crosswalk(
        &["dynamic-environment"],
        &[
            "--phase-duration",
            "0.2",
            "--period",
            "100ms",
            "--run-for",
            "700ms",
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("Static DiscreteValueRules\n"));
    assert!(out.contains("\tDiscrete Value Rule: Crosswalk/NoStopping | State: DoNotStop"));
    assert!(out.contains("\tRange Value Rule: SpeedLimit/Crosswalk | State: [0, 11.1]"));
    assert!(out.contains("Time: "));
    assert!(out.contains("PhaseRingId: CrosswalkRing | Current Phase: AllGo"));
    assert!(
        out.contains("PhaseRingId: CrosswalkRing | Current Phase: AllStop"),
        "ring should have advanced: {out}"
    );
    assert!(out.contains("\tBulbUniqueId: EastFacing-EastFacingBulbs-RedBulb | State: On"));
}

#[cfg(unix)]
#[test]
fn dynamic_environment_stops_cleanly_on_interrupt() {
    let flags = common::crosswalk_args();
    let mut args = vec!["dynamic-environment"];
    args.extend(flags.iter().map(String::as_str));
    args.extend_from_slice(&["--phase-duration", "0.05", "--period", "5ms"]);
    let child = common::spawn_background(&args);

    std::thread::sleep(std::time::Duration::from_millis(800));
    let status = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("Time: "));
}

#[test]
fn dynamic_environment_rejects_non_positive_duration() {
    let output = run_with_crosswalk(
        &["dynamic-environment"],
        &["--phase-duration", "-5", "--run-for", "1s"],
    );
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("phase_duration"));
}

#[test]
fn measure_load_time() {
    let output = run_with_crosswalk(&["measure-load-time", "--iterations", "3"], &[]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("over 3 iteration(s)"));
}

#[test]
fn measure_load_time_rejects_zero_iterations() {
    let output = spawn_command(&[
        "measure-load-time",
        "--backend",
        "dragway",
        "--iterations",
        "0",
    ]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_json() {
    let output = spawn_command(&["version", "--format", "json"]);
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["name"], "roadnet");
}

#[test]
fn completions_bash() {
    let output = spawn_command(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("roadnet"));
}
