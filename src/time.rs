use crate::error::SchedError;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Heure murale (heure + minute) sur une journée de 24 h.
///
/// Les bornes sont vérifiées à la construction : une heure hors `0..24` ou une
/// minute hors `0..60` est une erreur, jamais un repliement silencieux.
/// Seule exception, [`ClockTime::END_OF_DAY`] (`24:00`) borne la fin d'une plage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime { hour: 0, minute: 0 };
    /// Fin de journée (`24:00`), borne exclusive uniquement.
    pub const END_OF_DAY: ClockTime = ClockTime { hour: 24, minute: 0 };

    pub fn new(hour: u32, minute: u32) -> Result<Self, SchedError> {
        if hour >= 24 || minute >= 60 {
            return Err(SchedError::InvalidTime { hour, minute });
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Heure pleine (`H:00`).
    pub fn from_hour(hour: u32) -> Result<Self, SchedError> {
        Self::new(hour, 0)
    }

    /// Borne de fin d'une plage : comme [`ClockTime::from_hour`], `24` en plus.
    pub fn end_hour(hour: u32) -> Result<Self, SchedError> {
        if hour == 24 {
            return Ok(Self::END_OF_DAY);
        }
        Self::from_hour(hour)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    fn total_minutes(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    fn from_total_minutes(total: u32) -> Option<Self> {
        if total >= 24 * 60 {
            return None;
        }
        Some(Self {
            hour: (total / 60) as u8,
            minute: (total % 60) as u8,
        })
    }

    /// Addition bornée à la journée ; `None` si le résultat dépasse 23:59.
    pub fn checked_add(self, other: ClockTime) -> Option<ClockTime> {
        Self::from_total_minutes(self.total_minutes() + other.total_minutes())
    }

    /// Soustraction bornée à la journée ; `None` si le résultat passe sous 00:00.
    pub fn checked_sub(self, other: ClockTime) -> Option<ClockTime> {
        self.total_minutes()
            .checked_sub(other.total_minutes())
            .and_then(Self::from_total_minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = SchedError;

    /// Accepte `H:MM`, `HH:MM` et `HH:MM:SS` (secondes nulles).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || SchedError::InvalidTimeLabel(raw.to_string());
        let mut parts = raw.trim().split(':');
        let hour = parts
            .next()
            .and_then(|h| h.trim().parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let minute = parts
            .next()
            .and_then(|m| m.trim().parse::<u32>().ok())
            .ok_or_else(invalid)?;
        if let Some(sec) = parts.next() {
            if sec.trim().parse::<u32>().ok() != Some(0) {
                return Err(invalid());
            }
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        if (hour, minute) == (24, 0) {
            return Ok(ClockTime::END_OF_DAY);
        }
        ClockTime::new(hour, minute)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = SchedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}
