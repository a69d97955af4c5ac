//! Run settings for the transport engine.
//!
//! Only eigenvalue (criticality) runs are modelled. The initial fission
//! source is a uniform box, optionally restricted to fissionable material.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from settings validation.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("Particles per batch must be positive")]
    NoParticles,

    #[error("Inactive batches ({inactive}) must be fewer than total batches ({batches})")]
    TooManyInactive { inactive: usize, batches: usize },

    #[error("Source box lower corner {lower:?} is not below upper corner {upper:?}")]
    InvalidSourceBox { lower: [f64; 3], upper: [f64; 3] },

    #[error("Source strength must be positive and finite, got {0}")]
    InvalidStrength(f64),
}

/// Spatial distribution of the initial source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceSpace {
    /// Uniform in an axis-aligned box (cm).
    Box {
        lower: [f64; 3],
        upper: [f64; 3],
        /// Reject source sites outside fissionable material.
        only_fissionable: bool,
    },
    Point { xyz: [f64; 3] },
}

/// Initial source definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub space: SourceSpace,
    pub strength: f64,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            space: SourceSpace::Box {
                lower: [-4.0, -4.0, -3.4],
                upper: [4.0, 4.0, 3.4],
                only_fissionable: true,
            },
            strength: 1.0,
        }
    }
}

/// Eigenvalue run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Total batches.
    pub batches: usize,
    /// Batches discarded while the fission source converges.
    pub inactive: usize,
    /// Particles per batch.
    pub particles: u64,
    /// Random number seed; the engine default is used when unset.
    pub seed: Option<u64>,
    pub source: Source,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            batches: 100,
            inactive: 10,
            particles: 5000,
            seed: None,
            source: Source::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.particles == 0 {
            return Err(SettingsError::NoParticles);
        }
        if self.inactive >= self.batches {
            return Err(SettingsError::TooManyInactive {
                inactive: self.inactive,
                batches: self.batches,
            });
        }
        if !(self.source.strength.is_finite() && self.source.strength > 0.0) {
            return Err(SettingsError::InvalidStrength(self.source.strength));
        }
        if let SourceSpace::Box { lower, upper, .. } = &self.source.space {
            let ordered = lower
                .iter()
                .zip(upper)
                .all(|(l, u)| l.is_finite() && u.is_finite() && l < u);
            if !ordered {
                return Err(SettingsError::InvalidSourceBox {
                    lower: *lower,
                    upper: *upper,
                });
            }
        }
        Ok(())
    }

    /// Active (tallied) batches.
    pub fn active_batches(&self) -> usize {
        self.batches.saturating_sub(self.inactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let s = Settings::default();
        s.validate().unwrap();
        assert_eq!(s.active_batches(), 90);
    }

    #[test]
    fn test_inactive_must_be_below_batches() {
        let s = Settings {
            batches: 10,
            inactive: 10,
            ..Default::default()
        };
        assert_eq!(
            s.validate(),
            Err(SettingsError::TooManyInactive {
                inactive: 10,
                batches: 10
            })
        );
    }

    #[test]
    fn test_zero_particles() {
        let s = Settings {
            particles: 0,
            ..Default::default()
        };
        assert_eq!(s.validate(), Err(SettingsError::NoParticles));
    }

    #[test]
    fn test_inverted_source_box() {
        let s = Settings {
            source: Source {
                space: SourceSpace::Box {
                    lower: [4.0, -4.0, -3.4],
                    upper: [-4.0, 4.0, 3.4],
                    only_fissionable: false,
                },
                strength: 1.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            s.validate(),
            Err(SettingsError::InvalidSourceBox { .. })
        ));
    }
}
