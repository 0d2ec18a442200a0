use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        self.cmd_as("alice")
    }

    /// `mileage` isolated from the real user's config and data directories.
    fn cmd_as(&self, user: &str) -> Command {
        let mut cmd = Command::cargo_bin("mileage").unwrap();
        cmd.env("XDG_CONFIG_HOME", self.dir.path())
            .env("XDG_DATA_HOME", self.dir.path())
            .env_remove("MILEAGE_MAX_FILE_SIZE")
            .arg("--store")
            .arg(self.path("store.json"))
            .arg("--user")
            .arg(user);
        cmd
    }

    fn add_trip(&self, date: &str, start: u32, end: u32) {
        self.cmd()
            .args(["trips", "add", "--date", date])
            .args(["--start", &start.to_string(), "--end", &end.to_string()])
            .assert()
            .success();
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn extract_prints_candidates_as_json() {
    let ws = Workspace::new();
    let log = ws.write("january.txt", "01/15/2025 45230 45480\n");

    ws.cmd()
        .args(["extract", arg(&log)])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"start_mileage\": 45230"))
        .stdout(predicate::str::contains("\"date\": \"2025-01-15\""))
        .stdout(predicate::str::contains("Extracted from PDF"));

    assert!(!ws.path("store.json").exists());
}

#[test]
fn extract_warns_on_fallback() {
    let ws = Workspace::new();
    let log = ws.write("empty-ish.txt", "no readings in here");

    ws.cmd()
        .args(["extract", arg(&log), "--date", "2025-02-01", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-02-01,1000,1050,50,true,fallback"))
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn extract_rejects_unknown_type() {
    let ws = Workspace::new();
    let image = ws.write("scan.jpg", "not really an image");

    ws.cmd()
        .args(["extract", arg(&image)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported document type"));
}

#[test]
fn trips_add_validates_readings() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["trips", "add", "--date", "2025-01-01", "--start", "20", "--end", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than or equal"));

    ws.cmd()
        .args(["trips", "add", "--date", "2025-13-01", "--start", "1", "--end", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn gaps_detect_finds_missing_days() {
    let ws = Workspace::new();
    ws.add_trip("2025-01-01", 50, 100);
    ws.add_trip("2025-01-05", 500, 520);

    ws.cmd()
        .args(["gaps", "detect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 gaps found"))
        .stdout(predicate::str::contains("2025-01-02  ~133 mi/day"));

    ws.cmd()
        .args(["gaps", "list", "--unresolved", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"expected_miles\": 133"));

    // Other users see nothing
    ws.cmd_as("bob")
        .args(["gaps", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No gaps found."));
}

#[test]
fn gaps_resolve_records_actual_miles() {
    let ws = Workspace::new();
    ws.add_trip("2025-01-01", 50, 100);
    ws.add_trip("2025-01-05", 500, 520);
    ws.cmd().args(["gaps", "detect"]).assert().success();

    // Trips take ids 1 and 2, the gap is 3
    ws.cmd()
        .args(["gaps", "resolve", "3", "--actual-miles", "380", "--notes", "client visits"])
        .assert()
        .success()
        .stdout(predicate::str::contains("380 actual miles"));

    ws.cmd()
        .args(["gaps", "list", "--unresolved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No gaps found."));

    ws.cmd()
        .args(["gaps", "resolve", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gap not found: 99"));
}

#[test]
fn upload_stores_extracted_trips() {
    let ws = Workspace::new();
    ws.write("a.txt", "01/15/2025 45230 45480\nOdometer: 45480 45500\n");
    ws.write("b.txt", "Start: 100 End: 90\n");
    let pattern = ws.dir.path().join("*.txt");

    ws.cmd()
        .args(["upload", arg(&pattern)])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 trips extracted, 2 stored"))
        .stdout(predicate::str::contains("placeholder"));

    ws.cmd()
        .args(["trips", "list", "--format", "csv", "--ascending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-15,45230,45480,250,true"))
        .stdout(predicate::str::contains("1000,1050,50"));
}

#[test]
fn upload_stops_on_error_unless_asked() {
    let ws = Workspace::new();
    ws.write("good.txt", "Odometer 10 20");
    ws.write("bad.log", "Odometer 10 20");
    let pattern = ws.dir.path().join("*.*");

    ws.cmd()
        .args(["upload", arg(&pattern)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.log"));

    ws.cmd()
        .args(["upload", arg(&pattern), "--continue-on-error"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 failed"));
}

#[test]
fn summary_reports_totals() {
    let ws = Workspace::new();
    ws.add_trip("2025-01-01", 50, 100);
    ws.cmd()
        .args(["trips", "add", "--date", "2025-01-03", "--start", "5000", "--end", "5100", "--personal"])
        .assert()
        .success();

    ws.cmd()
        .args(["summary", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"business_miles\": 50"))
        .stdout(predicate::str::contains("\"personal_miles\": 100"))
        .stdout(predicate::str::contains("\"total_trips\": 2"));

    ws.cmd()
        .args(["summary", "--start-date", "2025-01-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trips from 2025-01-03 to 2025-01-03"));
}

#[test]
fn config_set_and_get() {
    let ws = Workspace::new();
    let config = ws.path("config.json");

    ws.cmd()
        .args(["--config", arg(&config), "config", "set", "gaps.skip_known_dates", "true"])
        .assert()
        .success();

    ws.cmd()
        .args(["--config", arg(&config), "config", "get", "gaps.skip_known_dates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));

    ws.cmd()
        .args(["--config", arg(&config), "config", "set", "upload.max_file_size", "\"lots\""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn max_file_size_env_override() {
    let ws = Workspace::new();
    let log = ws.write("big.txt", "Odometer 10 20 and some padding");

    ws.cmd()
        .env("MILEAGE_MAX_FILE_SIZE", "8")
        .args(["extract", arg(&log)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit is 8 bytes"));
}
