use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RegistrationError;
use crate::Result;

/// 3x3 projective transform mapping source image coordinates into the
/// reference frame.
///
/// Opaque to the engine: it is carried through to downstream consumers
/// (e.g. a warping step), never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    pub matrix: [[f64; 3]; 3],
}

impl Homography {
    pub fn identity() -> Self {
        Self {
            matrix: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }
}

impl From<[[f64; 3]; 3]> for Homography {
    fn from(matrix: [[f64; 3]; 3]) -> Self {
        Self { matrix }
    }
}

/// Quality-scored output of a single registration algorithm attempt.
///
/// Fields are validated at construction and immutable afterwards: `score`
/// and `inlier_ratio` are guaranteed to lie in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResult {
    score: f64,
    inlier_ratio: f64,
    homography: Homography,
    matches_count: usize,
    metadata: HashMap<String, Value>,
}

impl RegistrationResult {
    pub fn new(
        score: f64,
        inlier_ratio: f64,
        homography: Homography,
        matches_count: usize,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&score) {
            return Err(RegistrationError::ScoreOutOfRange(score));
        }
        if !(0.0..=1.0).contains(&inlier_ratio) {
            return Err(RegistrationError::InlierRatioOutOfRange(inlier_ratio));
        }
        Ok(Self {
            score,
            inlier_ratio,
            homography,
            matches_count,
            metadata: HashMap::new(),
        })
    }

    /// Attach an algorithm-specific metadata entry.
    pub fn with_metadata<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Overall alignment confidence in `[0.0, 1.0]`.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Fraction of feature matches consistent with the estimated transform.
    pub fn inlier_ratio(&self) -> f64 {
        self.inlier_ratio
    }

    pub fn homography(&self) -> &Homography {
        &self.homography
    }

    /// Raw feature-match count before inlier filtering.
    pub fn matches_count(&self) -> usize {
        self.matches_count
    }

    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.metadata
    }
}

/// Acceptance policy for the registration engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum score for accepting an alignment outright (0.0 to 1.0).
    pub min_score: f64,

    /// Minimum inlier ratio for accepting an alignment outright (0.0 to 1.0).
    pub min_inlier_ratio: f64,

    /// Return the best sub-threshold result instead of failing outright.
    pub enable_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_score: 0.85,
            min_inlier_ratio: 0.6,
            enable_fallback: true,
        }
    }
}

impl EngineConfig {
    pub fn new(min_score: f64, min_inlier_ratio: f64, enable_fallback: bool) -> Result<Self> {
        let config = Self {
            min_score,
            min_inlier_ratio,
            enable_fallback,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-check the threshold ranges, e.g. after deserializing from a
    /// config file (which bypasses [`EngineConfig::new`]).
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(RegistrationError::ThresholdOutOfRange {
                name: "min_score",
                value: self.min_score,
            });
        }
        if !(0.0..=1.0).contains(&self.min_inlier_ratio) {
            return Err(RegistrationError::ThresholdOutOfRange {
                name: "min_inlier_ratio",
                value: self.min_inlier_ratio,
            });
        }
        Ok(())
    }
}

/// Confidence tag on the engine's final decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// A result met both quality thresholds.
    Accepted,
    /// No result met the thresholds; carrying the best available one.
    Fallback,
    /// No usable result was produced.
    Failed,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Accepted => "accepted",
            RegistrationStatus::Fallback => "fallback",
            RegistrationStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final decision of the registration engine for one image pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationOutput {
    /// Name of the algorithm whose result was selected, if any.
    pub algorithm: Option<String>,

    pub status: RegistrationStatus,

    /// Present for `Accepted` and `Fallback`, absent for `Failed`.
    pub result: Option<RegistrationResult>,

    /// Algorithm names attempted, in evaluation order.
    pub attempts: Vec<String>,
}

impl RegistrationOutput {
    /// Transform to hand to a warping step; `Some` unless the status is
    /// [`RegistrationStatus::Failed`].
    pub fn homography(&self) -> Option<&Homography> {
        self.result.as_ref().map(|r| r.homography())
    }
}
