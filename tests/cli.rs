#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_inputs(dir: &Path, second_day_b: &str) {
    fs::write(
        dir.join("roster.csv"),
        "worker_id,name,work_time,reduced_hours\na,Ada,1.0,false\nb,Bob,0.5,true\n",
    )
    .unwrap();
    fs::write(
        dir.join("availability.csv"),
        format!("worker_id,2024-05-01,2024-05-02\na,9-12,9-12\nb,9-12,{second_day_b}\n"),
    )
    .unwrap();
    fs::write(
        dir.join("staffing.csv"),
        "hour,2024-05-01,2024-05-02\n9:00,1,1\n10:00,1,1\n11:00,1,1\n",
    )
    .unwrap();
}

fn cli() -> Command {
    Command::cargo_bin("creneaux-cli").unwrap()
}

#[test]
fn generate_then_show() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "N");
    let out_json = dir.path().join("schedule.json");
    let out_csv = dir.path().join("schedule.csv");
    let report = dir.path().join("report.csv");

    cli()
        .current_dir(dir.path())
        .args([
            "generate",
            "--roster",
            "roster.csv",
            "--availability",
            "availability.csv",
            "--staffing",
            "staffing.csv",
            "--open-hour",
            "9",
            "--close-hour",
            "12",
            "--seed",
            "7",
            "--out-json",
            "schedule.json",
            "--out-csv",
            "schedule.csv",
            "--report",
            "report.csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("01-05 | 09:00 | 1/1"))
        .stdout(predicate::str::contains("02-05 | 11:00 | 1/1 | a"))
        .stdout(predicate::str::contains("Hours per worker:"));

    let csv = fs::read_to_string(&out_csv).unwrap();
    assert!(csv.starts_with("day,hour,required,assigned,workers"));
    assert_eq!(csv.lines().count(), 7);
    let report = fs::read_to_string(&report).unwrap();
    assert!(report.contains("quota_deviation"));

    cli()
        .args(["show", "--schedule"])
        .arg(&out_json)
        .assert()
        .success()
        .stdout(predicate::str::contains("02-05 | 09:00"));
}

#[test]
fn understaffing_exits_with_warning_code() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "N");
    cli()
        .current_dir(dir.path())
        .args([
            "generate",
            "--roster",
            "roster.csv",
            "--availability",
            "availability.csv",
            "--open-hour",
            "9",
            "--close-hour",
            "12",
            "--max-workers",
            "2",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("understaffed 02-05 09:00: 1/2"));
}

#[test]
fn malformed_availability_is_fatal() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "abc");
    cli()
        .current_dir(dir.path())
        .args([
            "generate",
            "--roster",
            "roster.csv",
            "--availability",
            "availability.csv",
            "--staffing",
            "staffing.csv",
            "--open-hour",
            "9",
            "--close-hour",
            "12",
            "--out-json",
            "schedule.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed availability for worker b on 02-05"));
    assert!(!dir.path().join("schedule.json").exists());
}

#[test]
fn check_flags_excessive_unavailability() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "N");
    fs::write(
        dir.path().join("availability.csv"),
        "worker_id,2024-05-01,2024-05-02\na,N,N\nb,N,N\n",
    )
    .unwrap();
    cli()
        .current_dir(dir.path())
        .args([
            "check",
            "--roster",
            "roster.csv",
            "--availability",
            "availability.csv",
            "--max-unavailability",
            "1",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("worker a declared 2 unavailable day(s)"))
        .stderr(predicate::str::contains("worker b").not());
}

#[test]
fn printed_seed_replays_the_run() {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), "9-12");
    let args = [
        "generate",
        "--roster",
        "roster.csv",
        "--availability",
        "availability.csv",
        "--staffing",
        "staffing.csv",
        "--open-hour",
        "9",
        "--close-hour",
        "12",
    ];

    let first = cli().current_dir(dir.path()).args(args).output().unwrap();
    assert!(first.status.success());
    let stderr = String::from_utf8(first.stderr).unwrap();
    let seed = stderr
        .lines()
        .find_map(|l| l.strip_prefix("seed: "))
        .expect("seed is printed")
        .trim()
        .to_string();

    cli()
        .current_dir(dir.path())
        .args(args)
        .args(["--seed", seed.as_str()])
        .assert()
        .success()
        .stderr(predicate::str::contains(format!("seed: {seed}")))
        .stdout(String::from_utf8(first.stdout).unwrap());
}
