#![forbid(unsafe_code)]
use creneaux::normalize::day_key_from_header;
use creneaux::{normalize_staffing, Requirements, SchedError};

#[test]
fn parses_table_and_reports_gaps() {
    let header = vec!["hour", "2024-05-01", "2024-05-02"];
    let rows = vec![vec!["9:00", "2", "3.0"], vec!["10:00", "1", ""]];
    let table = normalize_staffing(&header, &rows).unwrap();
    let d1 = day_key_from_header("2024-05-01").unwrap();
    let d2 = day_key_from_header("2024-05-02").unwrap();
    assert_eq!(table.get(&d1, 9), Some(2));
    assert_eq!(table.get(&d2, 9), Some(3));
    assert_eq!(table.get(&d2, 10), None);

    let reqs = Requirements::Table(table);
    let err = reqs.ensure_covers(&[d1, d2], 9..11).unwrap_err();
    assert!(matches!(
        err,
        SchedError::MissingStaffingRequirement { ref day, hour: 10 } if day == "02-05"
    ));
}

#[test]
fn rejects_bad_cells_and_labels() {
    let header = vec!["hour", "2024-05-01"];
    assert!(normalize_staffing(&header, &[vec!["9:00", "deux"]]).is_err());
    assert!(normalize_staffing(&header, &[vec!["9:30", "1"]]).is_err());
    assert!(normalize_staffing(&header, &[vec!["9:00", "-1"]]).is_err());
    assert!(matches!(
        normalize_staffing(&header, &[vec!["24:00", "1"]]),
        Err(SchedError::InvalidTimeLabel(_))
    ));
}

#[test]
fn repeated_hour_row_is_rejected() {
    let header = vec!["hour", "2024-05-01"];
    let rows = vec![vec!["9:00", "1"], vec!["09:00", "3"]];
    let err = normalize_staffing(&header, &rows).unwrap_err();
    assert!(matches!(
        err,
        SchedError::DuplicateStaffingRequirement { ref day, hour: 9 } if day == "01-05"
    ));
    insta::assert_snapshot!(err.to_string(), @"duplicate staffing requirement for 01-05 at 9:00");
}

#[test]
fn repeated_day_column_is_rejected() {
    let header = vec!["hour", "2024-05-01", "2024-05-01 00:00:00"];
    let rows = vec![vec!["9:00", "1", "4"]];
    assert!(matches!(
        normalize_staffing(&header, &rows),
        Err(SchedError::InvalidDayHeader(raw)) if raw == "2024-05-01 00:00:00"
    ));
}
