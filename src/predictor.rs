//! Skill prediction
//!
//! The skill label comes from an opaque model behind the `SkillModel` trait.
//! Only the next-distance heuristic is ours: 10% past the recent average.
//! Any model failure collapses to the `("Unknown", 0)` sentinel; it is logged
//! and never surfaces to the player.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Skill label used whenever the model cannot answer
pub const UNKNOWN_SKILL: &str = "Unknown";

/// Predicted next distance = average distance x this factor
pub const NEXT_DISTANCE_FACTOR: f64 = 1.1;

const DEFAULT_BANDS: &str = include_str!("../assets/skill_bands.json");

/// Aggregates over recent runs fed to the model
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillFeatures {
    pub avg_distance: f64,
    pub avg_duration: f64,
    pub avg_obstacles_hit: f64,
    pub avg_coins_collected: f64,
    pub run_count: f64,
}

impl SkillFeatures {
    fn check(&self) -> Result<(), PredictError> {
        let fields = [
            ("avg_distance", self.avg_distance),
            ("avg_duration", self.avg_duration),
            ("avg_obstacles_hit", self.avg_obstacles_hit),
            ("avg_coins_collected", self.avg_coins_collected),
            ("run_count", self.run_count),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(PredictError::InvalidInput(format!("{name} = {value}")));
            }
        }
        Ok(())
    }
}

/// Model output paired with the distance heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub skill: String,
    pub predicted_distance: f64,
}

impl Prediction {
    pub fn unknown() -> Self {
        Self {
            skill: UNKNOWN_SKILL.to_string(),
            predicted_distance: 0.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid model input: {0}")]
    InvalidInput(String),
    #[error("model unavailable: {0}")]
    Unavailable(String),
}

/// Anything that can label a player's skill
pub trait SkillModel {
    fn skill_level(&self, features: &SkillFeatures) -> Result<String, PredictError>;
}

impl<F> SkillModel for F
where
    F: Fn(&SkillFeatures) -> Result<String, PredictError>,
{
    fn skill_level(&self, features: &SkillFeatures) -> Result<String, PredictError> {
        self(features)
    }
}

/// One label band; the last band usually has no upper bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBand {
    pub label: String,
    #[serde(default)]
    pub max_avg_distance: Option<f64>,
}

/// Data-driven model: labels by average distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceBands {
    pub bands: Vec<SkillBand>,
}

impl Default for DistanceBands {
    fn default() -> Self {
        Self::from_json(DEFAULT_BANDS).unwrap_or_else(|_| Self {
            bands: vec![
                SkillBand {
                    label: "Beginner".into(),
                    max_avg_distance: Some(600.0),
                },
                SkillBand {
                    label: "Intermediate".into(),
                    max_avg_distance: Some(1500.0),
                },
                SkillBand {
                    label: "Advanced".into(),
                    max_avg_distance: None,
                },
            ],
        })
    }
}

impl DistanceBands {
    /// Load bands from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not parse into a band list.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl SkillModel for DistanceBands {
    fn skill_level(&self, features: &SkillFeatures) -> Result<String, PredictError> {
        // The model works on whole-number features
        let distance = features.avg_distance.trunc();
        self.bands
            .iter()
            .find(|band| band.max_avg_distance.is_none_or(|max| distance <= max))
            .map(|band| band.label.clone())
            .ok_or_else(|| PredictError::Unavailable(format!("no band covers {distance}")))
    }
}

/// Wraps a model with input checks, the distance heuristic and the fallback
#[derive(Debug, Clone, Default)]
pub struct SkillPredictor<M> {
    model: M,
}

impl<M: SkillModel> SkillPredictor<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Predict skill and next-run distance; never fails
    pub fn predict(&self, features: &SkillFeatures) -> Prediction {
        let skill = features
            .check()
            .and_then(|()| self.model.skill_level(features));

        match skill {
            Ok(skill) => Prediction {
                skill,
                predicted_distance: next_distance(features.avg_distance),
            },
            Err(e) => {
                log::warn!("Skill prediction failed: {e}");
                Prediction::unknown()
            }
        }
    }
}

/// `avg x 1.1` when there is history, 0 otherwise
pub fn next_distance(avg_distance: f64) -> f64 {
    if avg_distance > 0.0 {
        avg_distance * NEXT_DISTANCE_FACTOR
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(avg_distance: f64) -> SkillFeatures {
        SkillFeatures {
            avg_distance,
            run_count: 3.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_bundled_bands_parse() {
        let bands = DistanceBands::from_json(DEFAULT_BANDS).unwrap();
        assert_eq!(bands.bands.len(), 3);
        assert!(bands.bands.last().unwrap().max_avg_distance.is_none());
    }

    #[test]
    fn test_band_lookup() {
        let predictor = SkillPredictor::new(DistanceBands::default());
        assert_eq!(predictor.predict(&features(100.0)).skill, "Beginner");
        assert_eq!(predictor.predict(&features(600.9)).skill, "Beginner");
        assert_eq!(predictor.predict(&features(601.0)).skill, "Intermediate");
        assert_eq!(predictor.predict(&features(5000.0)).skill, "Advanced");
    }

    #[test]
    fn test_next_distance_heuristic() {
        let predictor = SkillPredictor::new(DistanceBands::default());
        let p = predictor.predict(&features(1000.0));
        assert!((p.predicted_distance - 1100.0).abs() < 1e-9);

        let p = predictor.predict(&features(0.0));
        assert_eq!(p.predicted_distance, 0.0);
        assert_eq!(p.skill, "Beginner");
    }

    #[test]
    fn test_model_failure_falls_back() {
        let broken = |_: &SkillFeatures| -> Result<String, PredictError> {
            Err(PredictError::Unavailable("model file missing".into()))
        };
        let predictor = SkillPredictor::new(broken);
        assert_eq!(predictor.predict(&features(900.0)), Prediction::unknown());
    }

    #[test]
    fn test_invalid_input_falls_back() {
        let predictor = SkillPredictor::new(DistanceBands::default());
        assert_eq!(
            predictor.predict(&features(f64::NAN)),
            Prediction::unknown()
        );
        assert_eq!(predictor.predict(&features(-1.0)), Prediction::unknown());
    }

    #[test]
    fn test_label_is_passed_through() {
        let custom = |_: &SkillFeatures| -> Result<String, PredictError> { Ok("Speedster".into()) };
        let predictor = SkillPredictor::new(custom);
        assert_eq!(predictor.predict(&features(10.0)).skill, "Speedster");
    }

    #[test]
    fn test_empty_bands_fall_back() {
        let predictor = SkillPredictor::new(DistanceBands { bands: Vec::new() });
        assert_eq!(predictor.predict(&features(10.0)), Prediction::unknown());
    }
}
