#![forbid(unsafe_code)]
use creneaux::{
    io, normalize_availability, Availability, Roster, SchedError, Settings, Worker, WorkerId,
};
use std::fs;
use tempfile::tempdir;

fn roster() -> Roster {
    Roster::new(vec![
        Worker::new("3", "Ada", 1.0, false).unwrap(),
        Worker::new("7", "Lin", 0.5, true).unwrap(),
    ])
    .unwrap()
}

#[test]
fn malformed_cell_names_worker_and_day() {
    let header = vec!["id", "2024-05-01 00:00:00", "2024-05-02 00:00:00"];
    let rows = vec![vec!["3", "10-16", "N"], vec!["7", "9 12", "abc"]];

    let err = normalize_availability(&header, &rows, &roster(), &Settings::default()).unwrap_err();
    match &err {
        SchedError::MalformedAvailability { worker, day, value, .. } => {
            assert_eq!(worker, "7");
            assert_eq!(day, "02-05");
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected error: {other}"),
    }
    insta::assert_snapshot!(
        err.to_string(),
        @r#"malformed availability for worker 7 on 02-05: "abc" (expected `H1-H2` or `H1 H2`)"#
    );
}

#[test]
fn table_orders_workers_by_window_start() {
    let header = vec!["id", "2024-05-01"];
    let rows = vec![vec!["3", "12-18"], vec!["7", "8-12"]];
    let table = normalize_availability(&header, &rows, &roster(), &Settings::default()).unwrap();

    assert_eq!(table.days()[0].as_str(), "01-05");
    let order: Vec<&str> = table
        .available_on(0)
        .into_iter()
        .map(|(id, _)| id.as_str())
        .collect();
    assert_eq!(order, vec!["7", "3"]);
}

#[test]
fn comma_separator_is_opt_in() {
    let header = vec!["id", "2024-05-01"];
    let rows = vec![vec!["3", "10,16"], vec!["7", "N"]];
    assert!(normalize_availability(&header, &rows, &roster(), &Settings::default()).is_err());

    let lenient = Settings {
        accept_comma_separator: true,
        ..Settings::default()
    };
    let table = normalize_availability(&header, &rows, &roster(), &lenient).unwrap();
    assert!(table.get(&WorkerId::new("3"), 0).covers(15));
    assert_eq!(table.get(&WorkerId::new("7"), 0), Availability::Unavailable);
}

#[test]
fn unknown_or_duplicate_rows_are_rejected() {
    let header = vec!["id", "2024-05-01"];
    let unknown = vec![vec!["99", "10-16"]];
    assert!(matches!(
        normalize_availability(&header, &unknown, &roster(), &Settings::default()),
        Err(SchedError::UnknownWorker(id)) if id == "99"
    ));
    let dup = vec![vec!["3", "10-16"], vec!["3", "N"]];
    assert!(matches!(
        normalize_availability(&header, &dup, &roster(), &Settings::default()),
        Err(SchedError::DuplicateWorker(_))
    ));
}

#[test]
fn csv_import_keeps_typed_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("availability.csv");
    fs::write(&path, "worker_id,2024-05-01,2024-05-02\n3,10-16,N\n7,9-12,abc\n").unwrap();

    let err = io::import_availability_csv(&path, &roster(), &Settings::default()).unwrap_err();
    let sched = err.downcast_ref::<SchedError>().expect("typed error");
    assert!(matches!(
        sched,
        SchedError::MalformedAvailability { worker, day, .. } if worker == "7" && day == "02-05"
    ));
}

#[test]
fn roster_csv_import() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.csv");
    fs::write(
        &path,
        "worker_id,name,work_time,reduced_hours\n3,Ada,1.0,no\n7,Lin,0.5,oui\n9,Sam,0.75\n",
    )
    .unwrap();
    let roster = io::import_roster_csv(&path).unwrap();
    assert_eq!(roster.len(), 3);
    assert!(roster.find_worker(&WorkerId::new("7")).unwrap().reduced_hours);
    assert!(!roster.find_worker(&WorkerId::new("9")).unwrap().reduced_hours);
    assert_eq!(roster.find_worker(&WorkerId::new("3")).unwrap().weight(), 4);

    fs::write(&path, "worker_id,name,work_time\n3,Ada,1.5\n").unwrap();
    assert!(io::import_roster_csv(&path).is_err());
}

#[test]
fn repeated_day_column_is_rejected() {
    let header = vec!["id", "2024-05-01", "2024-05-01 00:00:00"];
    let rows = vec![vec!["3", "10-16", "N"]];
    assert!(matches!(
        normalize_availability(&header, &rows, &roster(), &Settings::default()),
        Err(SchedError::InvalidDayHeader(_))
    ));
}

#[test]
fn header_formats_share_one_key() {
    use creneaux::normalize::day_key_from_header;
    for raw in ["2024-05-02", "2024-05-02 00:00:00", "2024-05-02T00:00:00", "02-05"] {
        assert_eq!(day_key_from_header(raw).unwrap().as_str(), "02-05", "{raw}");
    }
    assert!(day_key_from_header("mai").is_err());
    assert!(day_key_from_header("32-01").is_err());
}

#[test]
fn cell_grammar() {
    use creneaux::normalize::{day_key_from_header, parse_availability_cell};
    let w = WorkerId::new("7");
    let day = day_key_from_header("2024-05-02").unwrap();
    let ok = |raw: &str| parse_availability_cell(raw, &w, &day, false).unwrap();
    assert_eq!(ok("N"), Availability::Unavailable);
    assert!(ok("10-16").covers(10));
    assert!(!ok("10 16").covers(16));

    for bad in ["n", "", "10,16", "10--16", "10  16", "16-10", "10-25", "a-b", "24-24"] {
        assert!(
            parse_availability_cell(bad, &w, &day, false).is_err(),
            "{bad:?} should be rejected"
        );
    }
    assert!(parse_availability_cell("10,16", &w, &day, true).is_ok());
}

#[test]
fn window_may_end_at_midnight() {
    use creneaux::normalize::{day_key_from_header, parse_availability_cell};
    use creneaux::ClockTime;
    let w = WorkerId::new("3");
    let day = day_key_from_header("2024-05-02").unwrap();

    let late = parse_availability_cell("16-24", &w, &day, false).unwrap();
    assert!(late.covers(23));
    assert!(!late.covers(15));
    assert_eq!(late.window().unwrap().to, ClockTime::END_OF_DAY);

    let err = parse_availability_cell("24-24", &w, &day, false).unwrap_err();
    assert!(matches!(
        err,
        SchedError::MalformedAvailability { reason, .. } if reason == "start is not an hour of day"
    ));
}
