use crate::model::Schedule;
use anyhow::{bail, Context};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un planning depuis un support.
    fn load(&self) -> anyhow::Result<Schedule>;
    /// Sauvegarde de manière atomique.
    fn save(&self, schedule: &Schedule) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

/// Un planning relu doit rester exploitable : jours uniques, heures
/// croissantes, pas d'équipier en double sur un créneau.
fn check_loaded(schedule: &Schedule) -> anyhow::Result<()> {
    let mut days = HashSet::new();
    for day in &schedule.days {
        if !days.insert(&day.day) {
            bail!("day {} appears twice", day.day);
        }
        let mut last = None;
        for slot in &day.slots {
            if last.is_some_and(|h| h >= slot.hour) {
                bail!("slot {:02}:00 out of order on {}", slot.hour, day.day);
            }
            last = Some(slot.hour);
            let mut workers = HashSet::new();
            if let Some(dup) = slot.worker_ids().find(|id| !workers.insert(*id)) {
                bail!("worker {dup} placed twice on {} {:02}:00", day.day, slot.hour);
            }
        }
    }
    Ok(())
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Schedule> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let schedule: Schedule = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        check_loaded(&schedule)
            .with_context(|| format!("inconsistent schedule {}", self.path.display()))?;
        Ok(schedule)
    }

    fn save(&self, schedule: &Schedule) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(schedule)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
