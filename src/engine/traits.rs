use image::GrayImage;

use crate::engine::types::RegistrationResult;

/// Contract for pluggable registration algorithms.
///
/// The engine treats implementations as interchangeable: it invokes
/// [`align`](RegistrationAlgorithm::align), scores whatever comes back, and
/// knows nothing about feature detectors, matchers, or how the homography
/// was estimated.
///
/// Return `Ok(None)` for ordinary alignment failure (insufficient features,
/// no homography found, degenerate geometry). Reserve `Err` for unexpected
/// faults; the engine catches those, logs them, and moves on to the next
/// algorithm, so a broken implementation cannot abort a registration run.
pub trait RegistrationAlgorithm: Send + Sync {
    /// Align `source` to `reference`.
    ///
    /// A returned [`RegistrationResult`] must already satisfy the value
    /// invariants (score and inlier ratio in `[0, 1]`); the engine does not
    /// re-derive them.
    fn align(
        &self,
        source: &GrayImage,
        reference: &GrayImage,
    ) -> anyhow::Result<Option<RegistrationResult>>;
}
