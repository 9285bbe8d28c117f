//! Departure-buffer solving.
//!
//! Inverts the simulated failure probability to answer two questions:
//! the **latest safe departure** (smallest buffer whose risk stays at or
//! below a low target, e.g. 5%) and the **drop-dead buffer** (the point
//! below which risk exceeds a high ceiling, e.g. 90%, and the trip is
//! effectively hopeless).
//!
//! Both are the same monotone search: for fixed leg models, failure
//! probability is non-increasing in the available buffer — more slack
//! can only help, because the duration distribution does not depend on
//! the buffer. Bisection narrows the bracket until its width drops to
//! the tolerance or a bounded step count runs out.
//!
//! Each step re-simulates at the midpoint, so each probe carries Monte
//! Carlo noise. A non-zero tolerance absorbs noise near the crossing;
//! treat `tolerance` as a floor on precision, not an exact root. Very
//! tight tolerances can oscillate against sampling error — raise the
//! iteration count rather than shrinking the tolerance below it.

use serde::Serialize;
use tracing::debug;

use crate::random::stream_seed;
use crate::simulate::{simulate, ConfigurationError, SimulationConfig, SimulationResult};
use crate::trip::TripSpec;

/// Upper bound on bisection steps, so termination never depends on the
/// tolerance actually being reachable.
const MAX_BISECTION_STEPS: u64 = 64;

/// Validated buffer interval for the solver, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchRange {
    min: f64,
    max: f64,
}

impl SearchRange {
    /// Creates a search interval `[min, max]`.
    ///
    /// # Errors
    /// Returns `Err` if either bound is not finite, `min < 0`, or
    /// `min >= max`.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigurationError> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min >= max {
            return Err(ConfigurationError::InvalidSearchRange(format!(
                "search range requires 0 ≤ min < max, got [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Converged (or explicitly non-converged) answer of one solver run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverResult {
    /// Buffer at which the search settled, in minutes.
    pub buffer_minutes: f64,
    /// Simulation at that buffer.
    pub result: SimulationResult,
    /// `false` means no buffer in range met the threshold; the reported
    /// buffer is the range maximum, not an extrapolation.
    pub converged: bool,
}

/// Finds the smallest buffer whose failure probability stays at or
/// below `target_probability` — the latest departure still considered
/// safe.
///
/// If even `range.max` exceeds the target, the result carries
/// `converged: false` ("unsafe at any buffer in range"). If `range.min`
/// already meets it, the minimum is returned immediately.
///
/// # Errors
/// Returns [`ConfigurationError`] for a target outside `(0, 1)` or a
/// non-positive tolerance.
///
/// # Examples
/// ```
/// use flightrisk_core::distributions::Triangular;
/// use flightrisk_core::simulate::SimulationConfig;
/// use flightrisk_core::solver::{find_latest_safe_departure, SearchRange};
/// use flightrisk_core::trip::{LegModel, TripSpec};
///
/// let trip = TripSpec::new(
///     vec![LegModel::Triangular(Triangular::new(35.0, 45.0, 65.0).unwrap())],
///     vec![],
///     0.0,
/// )
/// .unwrap();
/// let config = SimulationConfig::new(4_000, vec![95.0]).unwrap();
/// let range = SearchRange::new(30.0, 90.0).unwrap();
/// let found = find_latest_safe_departure(&trip, 0.05, range, 1.0, &config, 42).unwrap();
/// assert!(found.converged);
/// assert!(found.buffer_minutes > 45.0 && found.buffer_minutes < 66.0);
/// ```
pub fn find_latest_safe_departure(
    trip: &TripSpec,
    target_probability: f64,
    range: SearchRange,
    tolerance: f64,
    config: &SimulationConfig,
    seed: u64,
) -> Result<SolverResult, ConfigurationError> {
    debug!(target_probability, "solving for latest safe departure");
    smallest_buffer_meeting(trip, target_probability, range, tolerance, config, seed)
}

/// Finds the buffer below which failure probability exceeds
/// `max_acceptable_probability` — past this point the trip is no longer
/// reasonably salvageable.
///
/// The search is identical to [`find_latest_safe_departure`] with the
/// threshold at the high end of the risk scale (e.g. 0.90 instead of
/// 0.05); for the same trip the drop-dead buffer is the smaller of the
/// two.
///
/// # Errors
/// Returns [`ConfigurationError`] for a threshold outside `(0, 1)` or a
/// non-positive tolerance.
pub fn find_drop_dead_buffer(
    trip: &TripSpec,
    max_acceptable_probability: f64,
    range: SearchRange,
    tolerance: f64,
    config: &SimulationConfig,
    seed: u64,
) -> Result<SolverResult, ConfigurationError> {
    debug!(max_acceptable_probability, "solving for drop-dead buffer");
    smallest_buffer_meeting(trip, max_acceptable_probability, range, tolerance, config, seed)
}

/// Bisects for the smallest buffer in `range` whose simulated failure
/// probability is ≤ `threshold`.
fn smallest_buffer_meeting(
    trip: &TripSpec,
    threshold: f64,
    range: SearchRange,
    tolerance: f64,
    config: &SimulationConfig,
    seed: u64,
) -> Result<SolverResult, ConfigurationError> {
    if !threshold.is_finite() || threshold <= 0.0 || threshold >= 1.0 {
        return Err(ConfigurationError::InvalidSolverControls(format!(
            "probability threshold must lie in (0, 1), got {threshold}"
        )));
    }
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(ConfigurationError::InvalidSolverControls(format!(
            "tolerance must be > 0, got {tolerance}"
        )));
    }

    let probe = |buffer: f64, step: u64| -> SimulationResult {
        let shifted = trip
            .with_buffer(buffer)
            .expect("search range validated non-negative");
        simulate(&shifted, config, stream_seed(seed, step))
    };

    // Even the widest buffer misses the threshold: report that rather
    // than extrapolate beyond the range.
    let at_max = probe(range.max, 0);
    if at_max.failure_probability > threshold {
        debug!(
            probability = at_max.failure_probability,
            "threshold unreachable within search range"
        );
        return Ok(SolverResult {
            buffer_minutes: range.max,
            result: at_max,
            converged: false,
        });
    }

    // The tightest buffer already qualifies.
    let at_min = probe(range.min, 1);
    if at_min.failure_probability <= threshold {
        return Ok(SolverResult {
            buffer_minutes: range.min,
            result: at_min,
            converged: true,
        });
    }

    // Invariant: probability at `lo` is above the threshold, at `hi` is
    // at or below it.
    let mut lo = range.min;
    let mut hi = range.max;
    let mut best = at_max;
    let mut step = 2;
    while hi - lo > tolerance && step < MAX_BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        let result = probe(mid, step);
        debug!(
            step,
            mid,
            probability = result.failure_probability,
            "bisection step"
        );
        if result.failure_probability <= threshold {
            hi = mid;
            best = result;
        } else {
            lo = mid;
        }
        step += 1;
    }

    Ok(SolverResult {
        buffer_minutes: hi,
        result: best,
        converged: true,
    })
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::distributions::Triangular;
    use crate::trip::LegModel;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn solution_stays_within_range(
            threshold in 0.05_f64..0.95,
            seed in any::<u64>(),
        ) {
            let trip = TripSpec::new(
                vec![LegModel::Triangular(Triangular::new(20.0, 35.0, 80.0).unwrap())],
                vec![],
                0.0,
            )
            .unwrap();
            let range = SearchRange::new(10.0, 120.0).unwrap();
            let cfg = SimulationConfig::new(2_000, vec![50.0]).unwrap();
            let found =
                find_latest_safe_departure(&trip, threshold, range, 1.0, &cfg, seed).unwrap();
            prop_assert!(found.buffer_minutes >= range.min());
            prop_assert!(found.buffer_minutes <= range.max());
            if found.converged {
                prop_assert!(found.result.failure_probability <= threshold);
            } else {
                prop_assert!(found.result.failure_probability > threshold);
            }
        }
    }
}
