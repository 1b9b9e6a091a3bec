use crate::error::SchedError;
use crate::model::DayKey;
use crate::normalize::day_columns;
use crate::time::ClockTime;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ops::Range;

/// Effectif minimum par (jour, heure).
#[derive(Debug, Clone, Default)]
pub struct StaffingTable {
    entries: HashMap<(DayKey, u8), u32>,
}

impl StaffingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Un même créneau ne peut être renseigné qu'une fois.
    pub fn insert(&mut self, day: DayKey, hour: u8, required: u32) -> Result<(), SchedError> {
        match self.entries.entry((day, hour)) {
            Entry::Occupied(slot) => Err(SchedError::DuplicateStaffingRequirement {
                day: slot.key().0.as_str().to_string(),
                hour,
            }),
            Entry::Vacant(slot) => {
                slot.insert(required);
                Ok(())
            }
        }
    }

    pub fn get(&self, day: &DayKey, hour: u8) -> Option<u32> {
        self.entries.get(&(day.clone(), hour)).copied()
    }
}

/// Source des effectifs requis pour une génération.
#[derive(Debug, Clone)]
pub enum Requirements {
    Table(StaffingTable),
    /// Effectif identique pour chaque créneau (`max_workers`).
    Uniform(u32),
}

impl Requirements {
    pub fn required(&self, day: &DayKey, hour: u8) -> Result<u32, SchedError> {
        match self {
            Requirements::Uniform(n) => Ok(*n),
            Requirements::Table(table) => {
                table
                    .get(day, hour)
                    .ok_or_else(|| SchedError::MissingStaffingRequirement {
                        day: day.as_str().to_string(),
                        hour,
                    })
            }
        }
    }

    /// Vérifie que chaque heure ouvrée de chaque jour a un effectif.
    pub fn ensure_covers(&self, days: &[DayKey], hours: Range<u8>) -> Result<(), SchedError> {
        for day in days {
            for hour in hours.clone() {
                self.required(day, hour)?;
            }
        }
        Ok(())
    }
}

/// Normalise une table d'effectifs brute : `header[0]` est l'en-tête de la
/// colonne horaire, les suivants sont des dates ; chaque ligne commence par un
/// libellé `H:00`. Une cellule vide laisse le créneau sans effectif ; un jour
/// ou un créneau répété est une erreur.
pub fn normalize_staffing<S: AsRef<str>>(
    header: &[S],
    rows: &[Vec<S>],
) -> Result<StaffingTable, SchedError> {
    let days = day_columns(header)?;

    let mut table = StaffingTable::new();
    for row in rows {
        let Some(label) = row.first().map(AsRef::as_ref) else {
            continue;
        };
        if label.trim().is_empty() {
            continue;
        }
        let time: ClockTime = label.parse()?;
        if time.minute() != 0 || time == ClockTime::END_OF_DAY {
            return Err(SchedError::InvalidTimeLabel(label.to_string()));
        }

        for (idx, day) in days.iter().enumerate() {
            let raw = row.get(idx + 1).map(AsRef::as_ref).unwrap_or("").trim();
            if raw.is_empty() {
                continue;
            }
            let required = parse_headcount(raw).ok_or_else(|| SchedError::InvalidStaffingCell {
                day: day.as_str().to_string(),
                label: label.to_string(),
                value: raw.to_string(),
            })?;
            table.insert(day.clone(), time.hour(), required)?;
        }
    }
    Ok(table)
}

// Les tableurs exportent souvent `2.0` pour un entier.
fn parse_headcount(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
}
