use crate::config::Settings;
use crate::model::{DayKey, Roster, Schedule, WorkerId};
use std::collections::HashMap;

/// Heures effectuées par `worker` le jour `day` (créneaux déjà remplis).
pub fn hours_worked_on_day(schedule: &Schedule, day: &DayKey, worker: &WorkerId) -> u32 {
    schedule
        .day(day)
        .map(|d| d.slots.iter().filter(|s| s.contains(worker)).count() as u32)
        .unwrap_or(0)
}

/// Heures effectuées par `worker` sur tout l'horizon déjà planifié.
pub fn hours_worked_total(schedule: &Schedule, worker: &WorkerId) -> u32 {
    schedule
        .slots()
        .filter(|(_, slot)| slot.contains(worker))
        .count() as u32
}

/// Quotas mensuels figés au début d'une journée.
#[derive(Debug, Clone, Default)]
pub struct QuotaState {
    totals: HashMap<WorkerId, u32>,
    reached: HashMap<WorkerId, bool>,
}

impl QuotaState {
    pub fn is_reached(&self, worker: &WorkerId) -> bool {
        self.reached.get(worker).copied().unwrap_or(false)
    }

    pub fn total(&self, worker: &WorkerId) -> u32 {
        self.totals.get(worker).copied().unwrap_or(0)
    }
}

/// Contraintes consultées par l'allocation : plafond journalier et quota
/// mensuel. Ne modifie jamais le planning.
#[derive(Debug, Clone)]
pub struct ConstraintTracker {
    max_hours: u32,
    full_time: f64,
    quota: QuotaState,
}

impl ConstraintTracker {
    pub fn new(settings: &Settings) -> Self {
        Self {
            max_hours: settings.max_hours,
            full_time: settings.full_time,
            quota: QuotaState::default(),
        }
    }

    pub fn hours_worked_on_day(&self, schedule: &Schedule, day: &DayKey, worker: &WorkerId) -> u32 {
        hours_worked_on_day(schedule, day, worker)
    }

    pub fn daily_cap_reached(&self, schedule: &Schedule, day: &DayKey, worker: &WorkerId) -> bool {
        self.hours_worked_on_day(schedule, day, worker) >= self.max_hours
    }

    /// Recalcule entièrement les quotas à partir du planning existant.
    ///
    /// À appeler une fois par jour, avant la première heure : les quotas ne
    /// bougent pas en cours de journée.
    pub fn recompute_monthly_quota(&mut self, schedule: &Schedule, roster: &Roster) -> &QuotaState {
        let mut totals: HashMap<WorkerId, u32> =
            roster.workers().iter().map(|w| (w.id.clone(), 0)).collect();
        for (_, slot) in schedule.slots() {
            for id in slot.worker_ids() {
                if let Some(t) = totals.get_mut(id) {
                    *t += 1;
                }
            }
        }
        let reached = roster
            .workers()
            .iter()
            .map(|w| {
                let total = totals.get(&w.id).copied().unwrap_or(0);
                (w.id.clone(), f64::from(total) >= w.work_time * self.full_time)
            })
            .collect();
        self.quota = QuotaState { totals, reached };
        &self.quota
    }

    pub fn quota_reached(&self, worker: &WorkerId) -> bool {
        self.quota.is_reached(worker)
    }
}
