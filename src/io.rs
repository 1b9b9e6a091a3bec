use crate::config::Settings;
use crate::model::{Roster, Schedule, Worker};
use crate::normalize::{normalize_availability, AvailabilityTable};
use crate::report::{StaffingReport, Warning};
use crate::staffing::{normalize_staffing, StaffingTable};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

/// Import du roster depuis CSV: header `worker_id,name,work_time[,reduced_hours]`
pub fn import_roster_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Roster> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing worker_id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if id.is_empty() || name.is_empty() {
            bail!("invalid roster row (empty)");
        }
        let work_time: f64 = rec
            .get(2)
            .context("missing work_time")?
            .trim()
            .parse()
            .with_context(|| format!("invalid work_time for worker {id}"))?;
        let reduced = match rec.get(3).map(str::trim) {
            Some(flag) if !flag.is_empty() => parse_bool(flag)
                .with_context(|| format!("invalid reduced_hours value for worker {id}"))?,
            _ => false,
        };
        out.push(Worker::new(id, name, work_time, reduced)?);
    }
    Ok(Roster::new(out)?)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Lit un tableau brut : (en-tête, lignes).
fn read_table(path: &Path) -> anyhow::Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let header = rdr.headers()?.iter().map(str::to_owned).collect();
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        rows.push(rec.iter().map(str::to_owned).collect());
    }
    Ok((header, rows))
}

/// Import des disponibilités: header `worker_id,<date>,<date>...`,
/// cellules `N` ou `H1-H2`.
pub fn import_availability_csv<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
    settings: &Settings,
) -> anyhow::Result<AvailabilityTable> {
    let path = path.as_ref();
    let (header, rows) = read_table(path)?;
    let table = normalize_availability(&header, &rows, roster, settings)
        .with_context(|| format!("normalizing availability {}", path.display()))?;
    Ok(table)
}

/// Import des effectifs: header `hour,<date>,<date>...`, lignes `H:00,n,n...`
pub fn import_staffing_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<StaffingTable> {
    let path = path.as_ref();
    let (header, rows) = read_table(path)?;
    let table = normalize_staffing(&header, &rows)
        .with_context(|| format!("normalizing staffing {}", path.display()))?;
    Ok(table)
}

/// Export CSV du planning: header `day,hour,required,assigned,workers`
/// (`workers` séparés par `;`)
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["day", "hour", "required", "assigned", "workers"])?;
    for (day, slot) in schedule.slots() {
        let workers = slot
            .worker_ids()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(";");
        w.write_record([
            day.as_str(),
            format!("{:02}:00", slot.hour).as_str(),
            slot.required.to_string().as_str(),
            slot.headcount().to_string().as_str(),
            workers.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV du rapport: header `kind,day,hour,worker,expected,realized`
pub fn export_report_csv<P: AsRef<Path>>(path: P, report: &StaffingReport) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["kind", "day", "hour", "worker", "expected", "realized"])?;
    for h in &report.hours {
        w.write_record([
            "hours",
            "",
            "",
            h.worker.as_str(),
            format!("{:.1}", h.target).as_str(),
            h.realized.to_string().as_str(),
        ])?;
    }
    for warning in &report.warnings {
        match warning {
            Warning::UnderstaffedSlot {
                day,
                hour,
                required,
                realized,
            } => w.write_record([
                "understaffed",
                day.as_str(),
                format!("{hour:02}:00").as_str(),
                "",
                required.to_string().as_str(),
                realized.to_string().as_str(),
            ])?,
            Warning::QuotaDeviation {
                worker,
                realized,
                target,
            } => w.write_record([
                "quota_deviation",
                "",
                "",
                worker.as_str(),
                format!("{target:.1}").as_str(),
                realized.to_string().as_str(),
            ])?,
            Warning::ExcessiveUnavailability { worker, days } => w.write_record([
                "unavailability",
                "",
                "",
                worker.as_str(),
                "",
                days.to_string().as_str(),
            ])?,
        }
    }
    w.flush()?;
    Ok(())
}
