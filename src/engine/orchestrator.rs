use image::GrayImage;

use crate::engine::traits::RegistrationAlgorithm;
use crate::engine::types::{
    EngineConfig, RegistrationOutput, RegistrationResult, RegistrationStatus,
};
use crate::logging::spans::{AttemptSpan, RegistrationSpan};

/// Multi-algorithm image registration engine.
///
/// Holds an ordered table of named algorithms, tries them in registration
/// order against an image pair, applies the configured quality gate, and
/// returns a single decision. The first result meeting both thresholds is
/// accepted and the remaining algorithms are not tried.
///
/// `register` never returns an error: quality failures surface as a
/// [`RegistrationStatus::Failed`] output so batch callers are not
/// interrupted by a single bad image pair.
pub struct ImageRegistrationEngine {
    algorithms: Vec<(String, Box<dyn RegistrationAlgorithm>)>,
    config: EngineConfig,
}

impl Default for ImageRegistrationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ImageRegistrationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            algorithms: Vec::new(),
            config,
        }
    }

    /// Builder-style registration for construction time.
    pub fn with_algorithm<N: Into<String>>(
        mut self,
        name: N,
        algorithm: Box<dyn RegistrationAlgorithm>,
    ) -> Self {
        self.register_algorithm(name, algorithm);
        self
    }

    /// Add or replace the algorithm registered under `name`.
    ///
    /// Replacement keeps the slot's original position in the evaluation
    /// order; only a new name appends.
    pub fn register_algorithm<N: Into<String>>(
        &mut self,
        name: N,
        algorithm: Box<dyn RegistrationAlgorithm>,
    ) {
        let name = name.into();
        match self.algorithms.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => {
                tracing::info!(algorithm = %name, "Replacing registered algorithm");
                slot.1 = algorithm;
            }
            None => {
                tracing::info!(algorithm = %name, "Registering new algorithm");
                self.algorithms.push((name, algorithm));
            }
        }
    }

    /// Remove the algorithm registered under `name`; no-op if absent.
    pub fn unregister_algorithm(&mut self, name: &str) {
        let before = self.algorithms.len();
        self.algorithms.retain(|(n, _)| n != name);
        if self.algorithms.len() < before {
            tracing::info!(algorithm = name, "Unregistered algorithm");
        }
    }

    /// Registered algorithm names in evaluation order.
    pub fn algorithm_names(&self) -> Vec<&str> {
        self.algorithms.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register `source` against `reference` using the registered
    /// algorithms, in order.
    ///
    /// Each algorithm is invoked once; a fault or an absent result moves on
    /// to the next one. The first result meeting both thresholds is returned
    /// as `Accepted`. If every algorithm was exhausted but at least one
    /// produced a result, the highest-scoring one is returned as `Fallback`
    /// (when enabled by the config) or the call reports `Failed`. With no
    /// produced result at all the call reports `Failed` regardless of the
    /// fallback setting.
    pub fn register(&self, source: &GrayImage, reference: &GrayImage) -> RegistrationOutput {
        let span = RegistrationSpan::new(self.algorithms.len());

        let mut best: Option<(String, RegistrationResult)> = None;
        let mut attempts = Vec::with_capacity(self.algorithms.len());

        for (name, algorithm) in &self.algorithms {
            attempts.push(name.clone());
            let attempt = AttemptSpan::new(name);

            let result = match algorithm.align(source, reference) {
                Ok(Some(result)) => {
                    attempt.record_result(&result);
                    result
                }
                Ok(None) => {
                    attempt.record_no_result();
                    continue;
                }
                Err(fault) => {
                    attempt.record_fault(&fault);
                    continue;
                }
            };

            // Strict comparison keeps the earliest algorithm on equal scores.
            if best.as_ref().map_or(true, |(_, b)| result.score() > b.score()) {
                best = Some((name.clone(), result.clone()));
            }

            if self.is_acceptable(&result) {
                span.record_decision(RegistrationStatus::Accepted, Some(name.as_str()), Some(&result));
                return RegistrationOutput {
                    algorithm: Some(name.clone()),
                    status: RegistrationStatus::Accepted,
                    result: Some(result),
                    attempts,
                };
            }
        }

        match best {
            Some((name, result)) if self.config.enable_fallback => {
                span.record_decision(RegistrationStatus::Fallback, Some(name.as_str()), Some(&result));
                RegistrationOutput {
                    algorithm: Some(name),
                    status: RegistrationStatus::Fallback,
                    result: Some(result),
                    attempts,
                }
            }
            Some((name, result)) => {
                tracing::warn!(
                    algorithm = %name,
                    score = result.score(),
                    min_score = self.config.min_score,
                    inlier_ratio = result.inlier_ratio(),
                    min_inlier_ratio = self.config.min_inlier_ratio,
                    "Best result is below thresholds and fallback is disabled"
                );
                span.record_decision(RegistrationStatus::Failed, None, None);
                RegistrationOutput {
                    algorithm: None,
                    status: RegistrationStatus::Failed,
                    result: None,
                    attempts,
                }
            }
            None => {
                span.record_decision(RegistrationStatus::Failed, None, None);
                RegistrationOutput {
                    algorithm: None,
                    status: RegistrationStatus::Failed,
                    result: None,
                    attempts,
                }
            }
        }
    }

    fn is_acceptable(&self, result: &RegistrationResult) -> bool {
        result.score() >= self.config.min_score
            && result.inlier_ratio() >= self.config.min_inlier_ratio
    }
}
