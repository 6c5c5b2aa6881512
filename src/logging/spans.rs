//! Structured spans for engine diagnostics.
//!
//! One [`RegistrationSpan`] covers a whole `register` call and carries a
//! correlation id so the attempts of one image pair can be grouped in a
//! batch run's log stream. Each strategy invocation gets an
//! [`AttemptSpan`]. Events carry an `event` field with one of
//! `attempt_start`, `attempt_result`, `attempt_fault`, `decision`.

use std::time::Instant;

use tracing::{span, Level, Span};
use uuid::Uuid;

use crate::engine::types::{RegistrationResult, RegistrationStatus};

// Diagnostic events filter under the engine target, not this module's.
const ENGINE_TARGET: &str = "image_registration::engine";

/// Span covering one `register` call.
pub struct RegistrationSpan {
    span: Span,
    start: Instant,
}

impl RegistrationSpan {
    pub fn new(algorithm_count: usize) -> Self {
        let correlation_id = Uuid::new_v4();
        let span = span!(
            target: ENGINE_TARGET,
            Level::INFO,
            "registration",
            algorithms = algorithm_count,
            correlation_id = %correlation_id
        );
        tracing::info!(
            target: ENGINE_TARGET,
            parent: &span,
            algorithms = algorithm_count,
            "Starting registration"
        );
        Self {
            span,
            start: Instant::now(),
        }
    }

    /// Record the engine's final decision.
    ///
    /// `Accepted` and `Fallback` are informational; `Failed` is a warning.
    pub fn record_decision(
        &self,
        status: RegistrationStatus,
        algorithm: Option<&str>,
        result: Option<&RegistrationResult>,
    ) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        match status {
            RegistrationStatus::Failed => {
                tracing::warn!(
                    target: ENGINE_TARGET,
                    parent: &self.span,
                    event = "decision",
                    status = %status,
                    elapsed_ms,
                    "Registration produced no acceptable result"
                );
            }
            _ => {
                tracing::info!(
                    target: ENGINE_TARGET,
                    parent: &self.span,
                    event = "decision",
                    status = %status,
                    algorithm,
                    score = result.map(|r| r.score()),
                    inlier_ratio = result.map(|r| r.inlier_ratio()),
                    elapsed_ms,
                    "Registration decision"
                );
            }
        }
    }
}

/// Span for a single algorithm attempt.
pub struct AttemptSpan {
    span: Span,
    start: Instant,
    algorithm: String,
}

impl AttemptSpan {
    pub fn new(algorithm: &str) -> Self {
        let span = span!(
            target: ENGINE_TARGET,
            Level::INFO,
            "registration_attempt",
            algorithm = algorithm
        );
        tracing::info!(
            target: ENGINE_TARGET,
            parent: &span,
            event = "attempt_start",
            algorithm,
            "Attempting registration algorithm"
        );
        Self {
            span,
            start: Instant::now(),
            algorithm: algorithm.to_string(),
        }
    }

    /// Record a candidate alignment produced by the algorithm.
    pub fn record_result(&self, result: &RegistrationResult) {
        tracing::info!(
            target: ENGINE_TARGET,
            parent: &self.span,
            event = "attempt_result",
            algorithm = %self.algorithm,
            score = result.score(),
            inlier_ratio = result.inlier_ratio(),
            matches_count = result.matches_count(),
            elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0,
            "Algorithm produced a candidate alignment"
        );
    }

    /// Record an ordinary "no alignment found" outcome.
    pub fn record_no_result(&self) {
        tracing::info!(
            target: ENGINE_TARGET,
            parent: &self.span,
            event = "attempt_result",
            algorithm = %self.algorithm,
            found = false,
            elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0,
            "Algorithm found no valid alignment"
        );
    }

    /// Record an unexpected fault raised by the algorithm.
    pub fn record_fault(&self, error: &anyhow::Error) {
        tracing::warn!(
            target: ENGINE_TARGET,
            parent: &self.span,
            event = "attempt_fault",
            algorithm = %self.algorithm,
            error = %error,
            elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0,
            "Algorithm raised an unexpected error"
        );
    }
}
