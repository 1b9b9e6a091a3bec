#![forbid(unsafe_code)]
//! Creneaux : répartition d'équipiers sur des créneaux horaires (sans BD).
//!
//! - Disponibilités et effectifs importés de tableaux (CSV).
//! - Allocation gloutonne heure par heure, tirage pondéré reproductible.
//! - Plafond journalier, quota mensuel, continuité des présences.
//! - Rapport des heures réalisées et des créneaux en sous-effectif.

pub mod config;
pub mod error;
#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod normalize;
pub mod report;
pub mod scheduler;
pub mod staffing;
#[cfg(feature = "serde")]
pub mod storage;
pub mod time;

pub use config::{CarryOverPolicy, ConfigError, Settings};
pub use error::SchedError;
pub use model::{
    Assignment, Availability, AvailabilityWindow, DayKey, DaySchedule, HourSlot, Placement,
    Roster, Schedule, Worker, WorkerId,
};
pub use normalize::{normalize_availability, AvailabilityTable};
pub use report::{ReportRenderer, StaffingReport, TextReport, Warning};
pub use scheduler::{ConstraintTracker, QuotaState, ScheduleRun, Scheduler};
pub use staffing::{normalize_staffing, Requirements, StaffingTable};
#[cfg(feature = "serde")]
pub use storage::{JsonStorage, Storage};
pub use time::ClockTime;
