use serde::Deserialize;

use crate::error::ReconError;

/// Score gates for the match resolver and unit suggestions.
///
/// Defaults are the production values; a TOML override exists for
/// calibration runs against historic feeds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconTolerance {
    /// Description similarity a rigid candidate must exceed.
    pub rigid_accept: f64,
    /// Score reported for an accepted rigid match.
    pub rigid_score: f64,
    /// Similarity a unit suggestion must exceed.
    pub suggest_accept: f64,
}

impl Default for ReconTolerance {
    fn default() -> Self {
        Self {
            rigid_accept: 0.9,
            rigid_score: 0.95,
            suggest_accept: 0.7,
        }
    }
}

impl ReconTolerance {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let tolerance: ReconTolerance =
            toml::from_str(input).map_err(|e| ReconError::ToleranceParse(e.to_string()))?;
        tolerance.validate()?;
        Ok(tolerance)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (name, value) in [
            ("rigid_accept", self.rigid_accept),
            ("rigid_score", self.rigid_score),
            ("suggest_accept", self.suggest_accept),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ReconError::ToleranceValidation(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.rigid_accept > self.rigid_score {
            return Err(ReconError::ToleranceValidation(format!(
                "rigid_accept ({}) must not exceed rigid_score ({})",
                self.rigid_accept, self.rigid_score
            )));
        }
        Ok(())
    }
}
