use crate::error::SchedError;
use crate::time::ClockTime;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifiant fort pour Worker
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Équipier du roster
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    /// Fraction de temps plein contractuelle, `0 < f <= 1`.
    pub work_time: f64,
    /// Étudiant ou second emploi : sert de réserve de dernier recours.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reduced_hours: bool,
}

impl Worker {
    pub fn new<I: AsRef<str>, N: Into<String>>(
        id: I,
        name: N,
        work_time: f64,
        reduced_hours: bool,
    ) -> Result<Self, SchedError> {
        let id = WorkerId::new(id);
        if !(work_time.is_finite() && work_time > 0.0 && work_time <= 1.0) {
            return Err(SchedError::InvalidWorkTime {
                worker: id.as_str().to_string(),
                value: work_time,
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            work_time,
            reduced_hours,
        })
    }

    /// Poids de tirage : quatre paliers selon le temps de travail.
    pub fn weight(&self) -> u32 {
        (self.work_time * 4.0).floor() as u32
    }
}

/// Roster complet, figé pendant une génération.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    workers: Vec<Worker>,
}

impl Roster {
    pub fn new(workers: Vec<Worker>) -> Result<Self, SchedError> {
        let mut seen = HashSet::new();
        for w in &workers {
            if !seen.insert(w.id.clone()) {
                return Err(SchedError::DuplicateWorker(w.id.as_str().to_string()));
            }
        }
        Ok(Self { workers })
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }
    pub fn len(&self) -> usize {
        self.workers.len()
    }
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
    pub fn find_worker<'a>(&'a self, id: &WorkerId) -> Option<&'a Worker> {
        self.workers.iter().find(|w| &w.id == id)
    }
}

/// Clé d'affichage d'un jour (`jj-mm`), utilisée comme clé de jointure entre
/// disponibilités et effectifs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayKey(String);

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%d-%m").to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub(crate) fn from_normalized(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plage de disponibilité `[from, to)` sur une journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AvailabilityWindow {
    pub from: ClockTime,
    pub to: ClockTime,
}

impl AvailabilityWindow {
    pub fn new(from: ClockTime, to: ClockTime) -> Option<Self> {
        (from < to).then_some(Self { from, to })
    }

    pub fn covers(&self, hour: u8) -> bool {
        self.from.hour() <= hour && hour < self.to.hour()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Availability {
    Unavailable,
    Window(AvailabilityWindow),
}

impl Availability {
    pub fn window(&self) -> Option<&AvailabilityWindow> {
        match self {
            Availability::Unavailable => None,
            Availability::Window(w) => Some(w),
        }
    }
    pub fn covers(&self, hour: u8) -> bool {
        self.window().is_some_and(|w| w.covers(hour))
    }
}

/// Réserve d'où provient un équipier placé sur un créneau.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Placement {
    /// Disponibilité déclarée couvrant l'heure.
    Availability,
    /// Réserve des équipiers à horaires réduits (hors plage déclarée).
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    pub worker: WorkerId,
    pub via: Placement,
    /// Maintenu depuis l'heure précédente.
    #[cfg_attr(feature = "serde", serde(default))]
    pub carried_over: bool,
}

/// Créneau d'une heure : effectif requis et équipiers placés, dans l'ordre.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HourSlot {
    pub hour: u8,
    pub required: u32,
    pub assignments: Vec<Assignment>,
}

impl HourSlot {
    pub fn contains(&self, worker: &WorkerId) -> bool {
        self.assignments.iter().any(|a| &a.worker == worker)
    }
    pub fn worker_ids(&self) -> impl Iterator<Item = &WorkerId> + '_ {
        self.assignments.iter().map(|a| &a.worker)
    }
    pub fn headcount(&self) -> u32 {
        self.assignments.len() as u32
    }
    pub fn is_understaffed(&self) -> bool {
        self.headcount() < self.required
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DaySchedule {
    pub day: DayKey,
    pub slots: Vec<HourSlot>,
}

impl DaySchedule {
    pub fn slot(&self, hour: u8) -> Option<&HourSlot> {
        self.slots.iter().find(|s| s.hour == hour)
    }
}

/// Planning complet : jour -> heure -> équipiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    pub days: Vec<DaySchedule>,
}

impl Schedule {
    pub fn day(&self, day: &DayKey) -> Option<&DaySchedule> {
        self.days.iter().find(|d| &d.day == day)
    }
    pub fn slots(&self) -> impl Iterator<Item = (&DayKey, &HourSlot)> + '_ {
        self.days
            .iter()
            .flat_map(|d| d.slots.iter().map(move |s| (&d.day, s)))
    }
}
