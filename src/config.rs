//! Paramètres d'une génération de planning.
//!
//! Toutes les constantes métier (plage d'ouverture, plafond journalier, quota
//! temps plein...) vivent ici et peuvent être chargées depuis un fichier TOML :
//!
//! ```toml
//! open_hour = 9
//! close_hour = 21
//! max_hours = 8
//! full_time = 160.0
//! carry_over = "strict"
//! ```

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::path::Path;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Règle de maintien d'un équipier d'une heure sur la suivante.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CarryOverPolicy {
    /// Maintenu tant que l'effectif minimum n'est pas atteint, OU tant que
    /// l'équipier a fait moins de `continuity_hours` heures dans la journée.
    /// Peut donc dépasser le minimum requis.
    #[default]
    Permissive,
    /// Maintenu uniquement tant que l'effectif minimum n'est pas atteint.
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Settings {
    /// Première heure planifiée (incluse).
    pub open_hour: u8,
    /// Heure de fermeture (exclue), au plus 24.
    pub close_hour: u8,
    /// Plafond d'heures par équipier et par jour.
    pub max_hours: u32,
    /// Effectif uniforme utilisé quand aucune table d'effectifs n'est fournie.
    pub max_workers: u32,
    /// Heures d'un temps plein sur l'horizon.
    pub full_time: f64,
    /// Nombre de jours d'indisponibilité au-delà duquel un équipier est signalé.
    pub max_unavailability: u32,
    pub continuity_hours: u32,
    pub carry_over: CarryOverPolicy,
    /// Accepte aussi `"10,16"` comme plage horaire.
    pub accept_comma_separator: bool,
    /// Écart toléré (en heures) entre heures réalisées et quota contractuel.
    pub deviation_tolerance: f64,
    pub max_iterations_per_hour: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            open_hour: 8,
            close_hour: 20,
            max_hours: 8,
            max_workers: 3,
            full_time: 160.0,
            max_unavailability: 5,
            continuity_hours: 4,
            carry_over: CarryOverPolicy::Permissive,
            accept_comma_separator: false,
            deviation_tolerance: 0.5,
            max_iterations_per_hour: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.close_hour > 24 {
            return Err(ConfigError::Invalid(format!(
                "close_hour must be <= 24, got {}",
                self.close_hour
            )));
        }
        if self.open_hour >= self.close_hour {
            return Err(ConfigError::Invalid(format!(
                "open_hour ({}) must be before close_hour ({})",
                self.open_hour, self.close_hour
            )));
        }
        if self.max_hours == 0 {
            return Err(ConfigError::Invalid("max_hours must be > 0".into()));
        }
        if !(self.full_time.is_finite() && self.full_time > 0.0) {
            return Err(ConfigError::Invalid("full_time must be > 0".into()));
        }
        if !(self.deviation_tolerance.is_finite() && self.deviation_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(
                "deviation_tolerance must be >= 0".into(),
            ));
        }
        if self.max_iterations_per_hour == Some(0) {
            return Err(ConfigError::Invalid(
                "max_iterations_per_hour must be > 0 when set".into(),
            ));
        }
        Ok(())
    }

    /// Heures ouvrées `[open_hour, close_hour)`.
    pub fn business_hours(&self) -> std::ops::Range<u8> {
        self.open_hour..self.close_hour
    }

    /// Quota d'heures pour une fraction de temps de travail donnée.
    pub fn quota_for(&self, work_time: f64) -> f64 {
        work_time * self.full_time
    }
}

#[cfg(feature = "serde")]
impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
