use super::pool::WeightedPool;
use super::tracker::ConstraintTracker;
use crate::config::{CarryOverPolicy, Settings};
use crate::error::SchedError;
use crate::model::{
    Assignment, Availability, DayKey, DaySchedule, HourSlot, Placement, Roster, Schedule, Worker,
};
use crate::normalize::AvailabilityTable;
use crate::staffing::Requirements;
use rand::Rng;
use tracing::{debug, warn};

/// Construit le planning jour par jour, heure par heure. Aucune heure déjà
/// remplie n'est révisée.
pub(super) fn build_schedule<R: Rng + ?Sized>(
    roster: &Roster,
    availability: &AvailabilityTable,
    requirements: &Requirements,
    settings: &Settings,
    rng: &mut R,
) -> Result<Schedule, SchedError> {
    requirements.ensure_covers(availability.days(), settings.business_hours())?;

    let mut schedule = Schedule::default();
    let mut tracker = ConstraintTracker::new(settings);

    for (day_index, day) in availability.days().iter().enumerate() {
        tracker.recompute_monthly_quota(&schedule, roster);

        let pos = schedule.days.len();
        schedule.days.push(DaySchedule {
            day: day.clone(),
            slots: Vec::new(),
        });

        let ordered = ordered_workers(roster, availability, day_index);
        for hour in settings.business_hours() {
            let required = requirements.required(day, hour)?;
            let prev = schedule.days[pos].slots.last();
            let ctx = HourContext {
                roster,
                availability,
                settings,
                tracker: &tracker,
                schedule: &schedule,
                day,
                day_index,
                hour,
                required,
            };
            let slot = allocate_hour(&ctx, &ordered, prev, rng);
            if slot.is_understaffed() {
                warn!(
                    day = %day,
                    hour,
                    required,
                    placed = slot.headcount(),
                    "understaffed slot"
                );
            }
            schedule.days[pos].slots.push(slot);
        }
        debug!(day = %day, "day scheduled");
    }

    Ok(schedule)
}

struct HourContext<'a> {
    roster: &'a Roster,
    availability: &'a AvailabilityTable,
    settings: &'a Settings,
    tracker: &'a ConstraintTracker,
    schedule: &'a Schedule,
    day: &'a DayKey,
    day_index: usize,
    hour: u8,
    required: u32,
}

impl HourContext<'_> {
    fn capped(&self, worker: &Worker) -> bool {
        self.tracker
            .daily_cap_reached(self.schedule, self.day, &worker.id)
    }

    fn usable(&self, worker: &Worker, placed: &[Assignment]) -> bool {
        !placed.iter().any(|a| a.worker == worker.id) && !self.tracker.quota_reached(&worker.id)
    }
}

// Équipiers ayant une plage ce jour-là, par heure de début croissante.
fn ordered_workers<'a>(
    roster: &'a Roster,
    availability: &AvailabilityTable,
    day_index: usize,
) -> Vec<&'a Worker> {
    availability
        .available_on(day_index)
        .into_iter()
        .filter_map(|(id, _)| roster.find_worker(id))
        .collect()
}

fn allocate_hour<R: Rng + ?Sized>(
    ctx: &HourContext<'_>,
    ordered: &[&Worker],
    prev: Option<&HourSlot>,
    rng: &mut R,
) -> HourSlot {
    let hour = ctx.hour;

    let available: Vec<&Worker> = ordered
        .iter()
        .copied()
        .filter(|w| {
            ctx.availability
                .get(&w.id, ctx.day_index)
                .covers(hour)
                && !ctx.capped(w)
        })
        .collect();

    // Horaires réduits présents ce jour-là mais hors de leur plage à cette heure.
    let fallback: Vec<&Worker> = ctx
        .roster
        .workers()
        .iter()
        .filter(|w| w.reduced_hours && !ctx.capped(w))
        .filter(|w| match ctx.availability.get(&w.id, ctx.day_index) {
            Availability::Unavailable => false,
            Availability::Window(win) => !win.covers(hour),
        })
        .collect();

    let mut placed: Vec<Assignment> = Vec::new();

    if let Some(prev) = prev {
        carry_over(ctx, prev, &available, &fallback, &mut placed);
    }

    let iterations = fill_gaps(
        ctx.required,
        &mut placed,
        WeightedPool::new(available.iter().map(|w| (*w, w.weight()))),
        WeightedPool::new(fallback.iter().map(|w| (*w, w.weight()))),
        |w, placed| ctx.usable(w, placed),
        ctx.settings.max_iterations_per_hour,
        rng,
    );
    debug!(
        day = %ctx.day,
        hour,
        required = ctx.required,
        placed = placed.len(),
        iterations,
        "hour allocated"
    );

    HourSlot {
        hour,
        required: ctx.required,
        assignments: placed,
    }
}

fn carry_over(
    ctx: &HourContext<'_>,
    prev: &HourSlot,
    available: &[&Worker],
    fallback: &[&Worker],
    placed: &mut Vec<Assignment>,
) {
    for previous in &prev.assignments {
        let below_minimum = (placed.len() as u32) < ctx.required;
        let wanted = match ctx.settings.carry_over {
            CarryOverPolicy::Strict => below_minimum,
            CarryOverPolicy::Permissive => {
                below_minimum
                    || ctx
                        .tracker
                        .hours_worked_on_day(ctx.schedule, ctx.day, &previous.worker)
                        < ctx.settings.continuity_hours
            }
        };
        if !wanted {
            continue;
        }

        let via = if available.iter().any(|w| w.id == previous.worker) {
            Placement::Availability
        } else if fallback.iter().any(|w| w.id == previous.worker) {
            Placement::Fallback
        } else {
            continue;
        };
        if ctx
            .tracker
            .daily_cap_reached(ctx.schedule, ctx.day, &previous.worker)
        {
            continue;
        }

        placed.push(Assignment {
            worker: previous.worker.clone(),
            via,
            carried_over: true,
        });
    }
}

/// Complète l'effectif par tirage pondéré sans remise. Chaque itération
/// retire un candidat : au plus `|available| + |fallback|` itérations.
fn fill_gaps<R, F>(
    required: u32,
    placed: &mut Vec<Assignment>,
    mut available: WeightedPool<&Worker>,
    mut fallback: WeightedPool<&Worker>,
    usable: F,
    max_iterations: Option<usize>,
    rng: &mut R,
) -> usize
where
    R: Rng + ?Sized,
    F: Fn(&Worker, &[Assignment]) -> bool,
{
    let mut iterations = 0usize;

    while (placed.len() as u32) < required {
        if max_iterations.is_some_and(|max| iterations >= max) {
            warn!(iterations, "iteration guard hit, slot left as is");
            break;
        }

        let (candidate, via) = if available.len() > 1 {
            (available.take(rng), Placement::Availability)
        } else if let Some(sole) = available.take_sole() {
            (Some(sole), Placement::Availability)
        } else if !fallback.is_empty() {
            (fallback.take(rng), Placement::Fallback)
        } else {
            break;
        };
        iterations += 1;

        let Some(worker) = candidate else {
            break;
        };
        if usable(worker, placed.as_slice()) {
            placed.push(Assignment {
                worker: worker.id.clone(),
                via,
                carried_over: false,
            });
        }
    }

    iterations
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn workers(n: usize, reduced: bool) -> Vec<Worker> {
        (0..n)
            .map(|i| {
                let prefix = if reduced { "r" } else { "w" };
                Worker::new(format!("{prefix}{i}"), format!("W{i}"), 0.25 * ((i % 4) + 1) as f64, reduced)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn gap_filling_is_bounded_by_pool_sizes() {
        let avail = workers(5, false);
        let spare = workers(3, true);
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut placed = Vec::new();
            // Personne n'est utilisable : les deux réserves sont vidées.
            let iterations = fill_gaps(
                10,
                &mut placed,
                WeightedPool::new(avail.iter().map(|w| (w, w.weight()))),
                WeightedPool::new(spare.iter().map(|w| (w, w.weight()))),
                |_, _| false,
                None,
                &mut rng,
            );
            assert_eq!(iterations, avail.len() + spare.len());
            assert!(placed.is_empty());
        }
    }

    #[test]
    fn fallback_only_after_availability_is_exhausted() {
        let avail = workers(2, false);
        let spare = workers(2, true);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut placed = Vec::new();
        fill_gaps(
            3,
            &mut placed,
            WeightedPool::new(avail.iter().map(|w| (w, w.weight()))),
            WeightedPool::new(spare.iter().map(|w| (w, w.weight()))),
            |_, _| true,
            None,
            &mut rng,
        );
        let vias: Vec<Placement> = placed.iter().map(|a| a.via).collect();
        assert_eq!(
            vias,
            vec![Placement::Availability, Placement::Availability, Placement::Fallback]
        );
    }

    #[test]
    fn iteration_guard_stops_early() {
        let avail = workers(6, false);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut placed = Vec::new();
        let iterations = fill_gaps(
            6,
            &mut placed,
            WeightedPool::new(avail.iter().map(|w| (w, w.weight()))),
            WeightedPool::new(Vec::new()),
            |_, _| false,
            Some(2),
            &mut rng,
        );
        assert_eq!(iterations, 2);
    }
}
