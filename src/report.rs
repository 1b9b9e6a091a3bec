use crate::config::Settings;
use crate::model::{DayKey, Roster, Schedule, WorkerId};
use crate::normalize::AvailabilityTable;
use crate::scheduler::tracker::hours_worked_total;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Heures réalisées d'un équipier face à son quota contractuel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkerHours {
    pub worker: WorkerId,
    pub name: String,
    pub realized: u32,
    pub target: f64,
}

/// Avertissement non bloquant produit par une génération.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Warning {
    UnderstaffedSlot {
        day: DayKey,
        hour: u8,
        required: u32,
        realized: u32,
    },
    QuotaDeviation {
        worker: WorkerId,
        realized: u32,
        target: f64,
    },
    /// Plus de `max_unavailability` jours déclarés indisponibles
    /// (hors horaires réduits).
    ExcessiveUnavailability { worker: WorkerId, days: u32 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnderstaffedSlot {
                day,
                hour,
                required,
                realized,
            } => write!(
                f,
                "understaffed {day} {hour:02}:00: {realized}/{required} worker(s)"
            ),
            Warning::QuotaDeviation {
                worker,
                realized,
                target,
            } => write!(
                f,
                "worker {worker} has {realized} hour(s) instead of {target:.1}"
            ),
            Warning::ExcessiveUnavailability { worker, days } => {
                write!(f, "worker {worker} declared {days} unavailable day(s)")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StaffingReport {
    pub hours: Vec<WorkerHours>,
    pub warnings: Vec<Warning>,
}

impl StaffingReport {
    pub fn build(
        schedule: &Schedule,
        roster: &Roster,
        availability: &AvailabilityTable,
        settings: &Settings,
    ) -> Self {
        let mut warnings: Vec<Warning> = schedule
            .slots()
            .filter(|(_, slot)| slot.is_understaffed())
            .map(|(day, slot)| Warning::UnderstaffedSlot {
                day: day.clone(),
                hour: slot.hour,
                required: slot.required,
                realized: slot.headcount(),
            })
            .collect();

        let hours: Vec<WorkerHours> = roster
            .workers()
            .iter()
            .map(|w| WorkerHours {
                worker: w.id.clone(),
                name: w.name.clone(),
                realized: hours_worked_total(schedule, &w.id),
                target: settings.quota_for(w.work_time),
            })
            .collect();

        warnings.extend(
            hours
                .iter()
                .filter(|h| (f64::from(h.realized) - h.target).abs() > settings.deviation_tolerance)
                .map(|h| Warning::QuotaDeviation {
                    worker: h.worker.clone(),
                    realized: h.realized,
                    target: h.target,
                }),
        );
        warnings.extend(unavailability_flags(roster, availability, settings));

        Self { hours, warnings }
    }

    pub fn understaffed(&self) -> impl Iterator<Item = &Warning> + '_ {
        self.warnings
            .iter()
            .filter(|w| matches!(w, Warning::UnderstaffedSlot { .. }))
    }

    pub fn has_understaffing(&self) -> bool {
        self.understaffed().next().is_some()
    }

    pub fn hours_for(&self, worker: &WorkerId) -> Option<u32> {
        self.hours
            .iter()
            .find(|h| &h.worker == worker)
            .map(|h| h.realized)
    }
}

/// Équipiers (hors horaires réduits) déclarant trop de jours d'indisponibilité.
pub fn unavailability_flags(
    roster: &Roster,
    availability: &AvailabilityTable,
    settings: &Settings,
) -> Vec<Warning> {
    roster
        .workers()
        .iter()
        .filter(|w| !w.reduced_hours)
        .filter_map(|w| {
            let days = availability.unavailable_days(&w.id);
            (days > settings.max_unavailability).then(|| Warning::ExcessiveUnavailability {
                worker: w.id.clone(),
                days,
            })
        })
        .collect()
}

/// Permet de customiser le rendu du rapport (texte, mail, etc.).
pub trait ReportRenderer {
    fn render(&self, report: &StaffingReport) -> String;
}

/// Rendu texte brut, une ligne par équipier puis par avertissement.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

impl ReportRenderer for TextReport {
    fn render(&self, report: &StaffingReport) -> String {
        let mut out = String::from("Hours per worker:\n");
        for h in &report.hours {
            out.push_str(&format!(
                "  {} ({}): {} h / {:.1} h\n",
                h.worker, h.name, h.realized, h.target
            ));
        }
        if report.warnings.is_empty() {
            out.push_str("No warnings.\n");
        } else {
            out.push_str(&format!("Warnings ({}):\n", report.warnings.len()));
            for w in &report.warnings {
                out.push_str(&format!("  - {w}\n"));
            }
        }
        out
    }
}
