//! Normalisation des disponibilités brutes (tableur) en plages horaires.
//!
//! Une cellule vaut soit la sentinelle `N` (indisponible), soit deux heures
//! entières séparées par un tiret ou une espace : `"10-16"`, `"10 16"`.
//! La fin peut valoir `24` (fin de journée).
//! Les en-têtes de colonnes sont des dates ISO, ramenées à la clé `jj-mm`.

use crate::config::Settings;
use crate::error::SchedError;
use crate::model::{Availability, AvailabilityWindow, DayKey, Roster, WorkerId};
use crate::time::ClockTime;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

/// Sentinelle d'indisponibilité (sensible à la casse).
pub const UNAVAILABLE: &str = "N";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Ramène un en-tête de colonne (date ISO, horodatage, ou déjà `jj-mm`) à sa clé jour.
pub fn day_key_from_header(raw: &str) -> Result<DayKey, SchedError> {
    let raw_trim = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw_trim, "%Y-%m-%d") {
        return Ok(DayKey::from_date(date));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw_trim, fmt) {
            return Ok(DayKey::from_date(dt.date()));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw_trim) {
        return Ok(DayKey::from_date(dt.date_naive()));
    }
    if is_display_key(raw_trim) {
        return Ok(DayKey::from_normalized(raw_trim.to_string()));
    }
    Err(SchedError::InvalidDayHeader(raw.to_string()))
}

/// Clés jour des colonnes `header[1..]`. Deux colonnes ramenées au même jour
/// sont refusées.
pub(crate) fn day_columns<S: AsRef<str>>(header: &[S]) -> Result<Vec<DayKey>, SchedError> {
    let mut seen = HashSet::new();
    let mut days = Vec::with_capacity(header.len().saturating_sub(1));
    for raw in header.iter().skip(1).map(AsRef::as_ref) {
        let day = day_key_from_header(raw)?;
        if !seen.insert(day.clone()) {
            return Err(SchedError::InvalidDayHeader(raw.to_string()));
        }
        days.push(day);
    }
    Ok(days)
}

fn is_display_key(s: &str) -> bool {
    let Some((d, m)) = s.split_once('-') else {
        return false;
    };
    let two_digits = |p: &str| p.len() == 2 && p.chars().all(|c| c.is_ascii_digit());
    if !two_digits(d) || !two_digits(m) {
        return false;
    }
    matches!((d.parse::<u32>(), m.parse::<u32>()), (Ok(1..=31), Ok(1..=12)))
}

/// Interprète une cellule de disponibilité pour `worker` le jour `day`.
pub fn parse_availability_cell(
    raw: &str,
    worker: &WorkerId,
    day: &DayKey,
    accept_comma: bool,
) -> Result<Availability, SchedError> {
    let value = raw.trim();
    if value == UNAVAILABLE {
        return Ok(Availability::Unavailable);
    }

    let malformed = |reason: &'static str| SchedError::MalformedAvailability {
        worker: worker.as_str().to_string(),
        day: day.as_str().to_string(),
        value: raw.to_string(),
        reason,
    };

    let (start, end) =
        split_range(value, accept_comma).ok_or_else(|| malformed("expected `H1-H2` or `H1 H2`"))?;
    let from = parse_hour(start, ClockTime::from_hour)
        .ok_or_else(|| malformed("start is not an hour of day"))?;
    let to = parse_hour(end, ClockTime::end_hour)
        .ok_or_else(|| malformed("end is not an hour of day"))?;
    AvailabilityWindow::new(from, to)
        .map(Availability::Window)
        .ok_or_else(|| malformed("start must be before end"))
}

fn split_range(value: &str, accept_comma: bool) -> Option<(&str, &str)> {
    let separators: &[char] = if accept_comma {
        &['-', ' ', ',']
    } else {
        &['-', ' ']
    };
    let mut parts = value.split(separators);
    let start = parts.next()?;
    let end = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((start, end))
}

// `24` n'est accepté qu'en fin de plage.
fn parse_hour(
    s: &str,
    build: impl Fn(u32) -> Result<ClockTime, SchedError>,
) -> Option<ClockTime> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hour = s.parse::<u32>().ok()?;
    build(hour).ok()
}

/// Disponibilités d'un équipier, alignées sur les jours de la table.
#[derive(Debug, Clone)]
pub struct AvailabilityRow {
    pub worker: WorkerId,
    pub cells: Vec<Availability>,
}

/// Disponibilités normalisées sur l'horizon, dans l'ordre des colonnes.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityTable {
    days: Vec<DayKey>,
    rows: Vec<AvailabilityRow>,
}

impl AvailabilityTable {
    pub fn days(&self) -> &[DayKey] {
        &self.days
    }

    /// Un équipier absent de la table est indisponible tout l'horizon.
    pub fn get(&self, worker: &WorkerId, day_index: usize) -> Availability {
        self.rows
            .iter()
            .find(|r| &r.worker == worker)
            .and_then(|r| r.cells.get(day_index).copied())
            .unwrap_or(Availability::Unavailable)
    }

    /// Équipiers ayant une plage ce jour-là, triés par heure de début
    /// (ordre de la table en cas d'égalité).
    pub fn available_on(&self, day_index: usize) -> Vec<(&WorkerId, AvailabilityWindow)> {
        let mut out: Vec<(&WorkerId, AvailabilityWindow)> = self
            .rows
            .iter()
            .filter_map(|r| {
                r.cells
                    .get(day_index)
                    .and_then(|a| a.window().copied())
                    .map(|w| (&r.worker, w))
            })
            .collect();
        out.sort_by_key(|(_, w)| w.from);
        out
    }

    pub fn unavailable_days(&self, worker: &WorkerId) -> u32 {
        self.rows
            .iter()
            .find(|r| &r.worker == worker)
            .map(|r| {
                r.cells
                    .iter()
                    .filter(|a| matches!(a, Availability::Unavailable))
                    .count() as u32
            })
            .unwrap_or(self.days.len() as u32)
    }
}

/// Normalise une table brute : `header[0]` est l'en-tête de la colonne
/// identifiant, les suivants sont des dates ; chaque ligne commence par
/// l'identifiant de l'équipier.
///
/// La première cellule invalide interrompt toute la normalisation.
pub fn normalize_availability<S: AsRef<str>>(
    header: &[S],
    rows: &[Vec<S>],
    roster: &Roster,
    settings: &Settings,
) -> Result<AvailabilityTable, SchedError> {
    let days = day_columns(header)?;

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(first) = row.first() else {
            continue;
        };
        let worker = WorkerId::new(first.as_ref());
        if worker.as_str().is_empty() {
            continue;
        }
        if roster.find_worker(&worker).is_none() {
            return Err(SchedError::UnknownWorker(worker.as_str().to_string()));
        }
        if !seen.insert(worker.clone()) {
            return Err(SchedError::DuplicateWorker(worker.as_str().to_string()));
        }

        let mut cells = Vec::with_capacity(days.len());
        for (idx, day) in days.iter().enumerate() {
            let raw = row.get(idx + 1).map(AsRef::as_ref).unwrap_or("");
            cells.push(parse_availability_cell(
                raw,
                &worker,
                day,
                settings.accept_comma_separator,
            )?);
        }
        out.push(AvailabilityRow { worker, cells });
    }

    for w in roster.workers() {
        if !seen.contains(&w.id) {
            tracing::debug!(worker = %w.id, "no availability row, unavailable all horizon");
        }
    }

    Ok(AvailabilityTable { days, rows: out })
}
