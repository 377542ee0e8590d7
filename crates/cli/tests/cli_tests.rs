// End-to-end tests for the `roster` binary.
// Run with: cargo test -p roster-cli --test cli_tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn roster(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_roster"));
    cmd.current_dir(dir);
    cmd.env("RUST_LOG", "error");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../recon/tests/fixtures").join(name)
}

/// Temp dir holding the four fixture tables under their default names.
fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (src, dst) in [
        ("inventory.csv", "inventory_data.csv"),
        ("majors.csv", "majors_data.csv"),
        ("occupancy.csv", "occupancy_data.csv"),
        ("persons.csv", "persons_data.csv"),
    ] {
        fs::copy(fixture(src), dir.path().join(dst)).unwrap();
    }
    dir
}

fn exit_code(output: &Output) -> i32 {
    output.status.code().expect("process exited by signal")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(str::to_string).collect()
}

// ============================================================================
// Successful runs
// ============================================================================

#[test]
fn run_writes_both_outputs() {
    let dir = workspace();
    let output = roster(dir.path()).args(["run", "--quiet"]).output().unwrap();
    assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));

    let with = read_lines(&dir.path().join("person_with_bookings.csv"));
    assert_eq!(
        with[0],
        "personId,name,email,dob,address1,address2,city,state,majorIds,bedId"
    );
    assert_eq!(with.len(), 3);
    assert_eq!(
        with[1],
        "1001,Ada Byron,ada@uni.edu,1998-12-10,12 Elm St,\"Springfield, IL\",Springfield,IL,\"10,20\",MH-101-A"
    );
    assert!(with[2].starts_with("1002,"));

    let without = read_lines(&dir.path().join("person_without_bookings.csv"));
    assert_eq!(without.len(), 2);
    assert!(without[1].starts_with("1004,Emmy Noether,emmy@uni.edu,,7 Erl St,\"Madison, WI\",Madison,WI,"));
    assert!(!dir.path().join("person_with_bookings.csv.tmp").exists());
}

#[test]
fn run_prints_console_report() {
    let dir = workspace();
    let output = roster(dir.path()).arg("run").output().unwrap();
    assert_eq!(exit_code(&output), 0);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("------------- Assumptions ----------------"));
    assert!(stdout.contains("------------- Data Cleaning Strategy ----------------"));
    assert!(stdout.contains("Persons with bookings: 2"));
    assert!(stdout.contains("Persons without bookings: 1"));
    assert!(stdout.contains("Unique States: 2"));
    assert!(stderr(&output).contains("roster: 2 with bookings"));
}

#[test]
fn strict_dob_skips_empty_without_bookings_file() {
    let dir = workspace();
    let output = roster(dir.path())
        .args(["run", "--quiet", "--dob-policy", "strict"])
        .output()
        .unwrap();
    assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));
    assert!(dir.path().join("person_with_bookings.csv").exists());
    assert!(!dir.path().join("person_without_bookings.csv").exists());
}

#[test]
fn empty_without_bookings_removes_earlier_output() {
    let dir = workspace();
    let stale = dir.path().join("person_without_bookings.csv");

    let output = roster(dir.path()).args(["run", "--quiet"]).output().unwrap();
    assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));
    assert!(stale.exists());

    let output = roster(dir.path())
        .args(["run", "--quiet", "--dob-policy", "strict"])
        .output()
        .unwrap();
    assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));
    assert!(!stale.exists());
    assert_eq!(read_lines(&dir.path().join("person_with_bookings.csv")).len(), 3);
}

#[test]
fn short_person_rows_are_padded() {
    let dir = workspace();
    // Trailing majors/phone cells missing on 1002
    let persons = fs::read_to_string(dir.path().join("persons_data.csv"))
        .unwrap()
        .replace(",Physics,555-0102", "");
    fs::write(dir.path().join("persons_data.csv"), persons).unwrap();

    let output = roster(dir.path()).args(["run", "--quiet"]).output().unwrap();
    assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));
    let with = read_lines(&dir.path().join("person_with_bookings.csv"));
    assert!(with[2].starts_with("1002,Alan Turing,"));
    assert!(with[2].ends_with(",TX,,MH-101-B"));
}

#[test]
fn json_summary_is_machine_readable() {
    let dir = workspace();
    let output = roster(dir.path()).args(["run", "--json"]).output().unwrap();
    assert_eq!(exit_code(&output), 0);

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["joined_rows"], 3);
    assert_eq!(summary["persons_with_bookings"], 2);
    assert_eq!(summary["persons_without_bookings"], 1);
    assert_eq!(summary["dropped_with_bookings"]["invalid_email"], 1);
    assert_eq!(summary["dropped_without_bookings"]["incomplete_address"], 1);
    assert_eq!(summary["meta"]["dob_policy"], "lenient");
}

#[test]
fn config_paths_resolve_against_config_dir() {
    let dir = workspace();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    for name in ["inventory_data.csv", "majors_data.csv", "occupancy_data.csv", "persons_data.csv"] {
        fs::rename(dir.path().join(name), data.join(name)).unwrap();
    }
    fs::create_dir(data.join("out")).unwrap();
    fs::write(
        data.join("roster.toml"),
        "[outputs]\ndir = \"out\"\nwith_bookings = \"booked.csv\"\n",
    )
    .unwrap();

    let output = roster(dir.path())
        .args(["run", "--quiet", "--config", "data/roster.toml"])
        .output()
        .unwrap();
    assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));
    assert!(data.join("out/booked.csv").exists());
    assert!(data.join("out/person_without_bookings.csv").exists());
}

// ============================================================================
// Failures and exit codes
// ============================================================================

#[test]
fn missing_input_exits_3() {
    let dir = workspace();
    fs::remove_file(dir.path().join("majors_data.csv")).unwrap();
    let output = roster(dir.path()).args(["run", "--quiet"]).output().unwrap();
    assert_eq!(exit_code(&output), 3);
    assert!(stderr(&output).contains("majors_data.csv"));
    assert!(!dir.path().join("person_with_bookings.csv").exists());
}

#[test]
fn empty_input_exits_4() {
    let dir = workspace();
    fs::write(dir.path().join("occupancy_data.csv"), "").unwrap();
    let output = roster(dir.path()).args(["run", "--quiet"]).output().unwrap();
    assert_eq!(exit_code(&output), 4);
}

#[test]
fn malformed_input_exits_5() {
    let dir = workspace();
    fs::write(dir.path().join("inventory_data.csv"), "buildingName,roomName\nA,1,extra\n").unwrap();
    let output = roster(dir.path()).args(["run", "--quiet"]).output().unwrap();
    assert_eq!(exit_code(&output), 5);
}

#[test]
fn missing_column_exits_6() {
    let dir = workspace();
    fs::write(dir.path().join("majors_data.csv"), "title,id\nPhysics,30\n").unwrap();
    let output = roster(dir.path()).args(["run", "--quiet"]).output().unwrap();
    assert_eq!(exit_code(&output), 6);
    let err = stderr(&output);
    assert!(err.contains("majors"), "stderr: {err}");
    assert!(err.contains("hint:"));
}

#[test]
fn no_valid_bookings_exits_7() {
    let dir = workspace();
    fs::write(
        dir.path().join("persons_data.csv"),
        "personId,firstName,lastName,email,dob,address,majors\n\
         1001,Ada,Byron,no-at-sign,1998-12-10,\"12 Elm St, Springfield, IL\",Physics\n",
    )
    .unwrap();
    let output = roster(dir.path()).args(["run", "--quiet"]).output().unwrap();
    assert_eq!(exit_code(&output), 7);
    assert!(!dir.path().join("person_with_bookings.csv").exists());
}

#[test]
fn failed_second_write_publishes_neither_output() {
    let dir = workspace();
    fs::write(
        dir.path().join("roster.toml"),
        "[outputs]\nwithout_bookings = \"no/such/dir/unbooked.csv\"\n",
    )
    .unwrap();

    let output = roster(dir.path())
        .args(["run", "--quiet", "--config", "roster.toml"])
        .output()
        .unwrap();
    assert_eq!(exit_code(&output), 8);
    assert!(!dir.path().join("person_with_bookings.csv").exists());
    assert!(!dir.path().join("person_with_bookings.csv.tmp").exists());
}

#[test]
fn unknown_policy_is_a_usage_error() {
    let dir = workspace();
    let output = roster(dir.path())
        .args(["run", "--dob-policy", "sometimes"])
        .output()
        .unwrap();
    assert_eq!(exit_code(&output), 2);
}

#[test]
fn validate_accepts_good_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("roster.toml");
    fs::write(&config, "[cleaning]\ndob = \"strict\"\n").unwrap();
    let output = roster(dir.path()).args(["validate", "--config", "roster.toml"]).output().unwrap();
    assert_eq!(exit_code(&output), 0);
    assert!(stderr(&output).contains("dob=strict"));
}

#[test]
fn validate_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("roster.toml");
    fs::write(&config, "[outputs]\nwith_bookings = \"x.csv\"\nwithout_bookings = \"x.csv\"\n").unwrap();
    let output = roster(dir.path()).args(["validate", "--config", "roster.toml"]).output().unwrap();
    assert_eq!(exit_code(&output), 2);

    fs::write(&config, "[inputs]\npeople = \"p.csv\"\n").unwrap();
    let output = roster(dir.path()).args(["validate", "--config", "roster.toml"]).output().unwrap();
    assert_eq!(exit_code(&output), 2);
}
