mod allocation;
mod pool;
pub mod tracker;

pub use tracker::{ConstraintTracker, QuotaState};

use crate::config::Settings;
use crate::error::SchedError;
use crate::model::{Roster, Schedule};
use crate::normalize::AvailabilityTable;
use crate::report::StaffingReport;
use crate::staffing::Requirements;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Résultat d'une génération : le planning et son rapport.
#[derive(Debug, Clone)]
pub struct ScheduleRun {
    pub schedule: Schedule,
    pub report: StaffingReport,
}

/// Scheduler : encapsule un Roster et les paramètres d'une génération
#[derive(Debug)]
pub struct Scheduler {
    roster: Roster,
    settings: Settings,
}

impl Scheduler {
    pub fn new(roster: Roster, settings: Settings) -> Result<Self, SchedError> {
        settings.validate()?;
        Ok(Self { roster, settings })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Génère le planning avec la source d'aléa fournie.
    ///
    /// Une erreur (effectif manquant...) n'entraîne aucun planning partiel.
    pub fn schedule<R: Rng + ?Sized>(
        &self,
        availability: &AvailabilityTable,
        requirements: &Requirements,
        rng: &mut R,
    ) -> Result<ScheduleRun, SchedError> {
        let schedule = allocation::build_schedule(
            &self.roster,
            availability,
            requirements,
            &self.settings,
            rng,
        )?;
        let report = StaffingReport::build(&schedule, &self.roster, availability, &self.settings);
        info!(
            days = schedule.days.len(),
            understaffed = report.understaffed().count(),
            "schedule generated"
        );
        Ok(ScheduleRun { schedule, report })
    }

    /// Variante reproductible : même graine, même planning.
    pub fn schedule_seeded(
        &self,
        availability: &AvailabilityTable,
        requirements: &Requirements,
        seed: u64,
    ) -> Result<ScheduleRun, SchedError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.schedule(availability, requirements, &mut rng)
    }
}
