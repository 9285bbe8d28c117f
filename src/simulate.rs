//! Monte Carlo risk aggregation.
//!
//! Runs N independent trials of a [`TripSpec`](crate::trip::TripSpec)
//! and reduces them to a failure probability and closest-rank percentile
//! arrival times.
//!
//! # Parallelism & Reproducibility
//!
//! Trials are embarrassingly parallel: they share no state. Iterations
//! are split into fixed-size batches executed on rayon's pool, and batch
//! `b` owns a generator seeded with `stream_seed(seed, b)`. Partial
//! failure counts and duration lists merge in batch order, so a given
//! `(trip, config, seed)` is bit-reproducible regardless of thread
//! count — a fixed seed replays a run exactly, which regression tests
//! rely on; production callers seed from entropy.
//!
//! # Cancellation
//!
//! [`simulate_cancellable`] checks a caller-supplied flag between
//! batches. A cancelled run returns no partial result.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::random::{create_rng, stream_seed};
use crate::trip::{run_trial, TripSpec};

/// Trials per worker batch. Iterations are rounded up into batches of
/// this size; the last batch may be short.
const TRIALS_PER_BATCH: usize = 8192;

/// Error type for invalid simulation and solver controls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The trial count is zero.
    #[error("iterations must be ≥ 1, got {0}")]
    InvalidIterations(u32),
    /// The percentile list is empty or holds values outside (0, 100).
    #[error("invalid percentiles: {0}")]
    InvalidPercentiles(String),
    /// The solver search range is inverted, empty, or negative.
    #[error("invalid search range: {0}")]
    InvalidSearchRange(String),
    /// A solver threshold or tolerance is out of range.
    #[error("invalid solver controls: {0}")]
    InvalidSolverControls(String),
}

/// A run was cancelled between batches; no partial result exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("simulation cancelled before completion")]
pub struct Cancelled;

/// Validated simulation controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationConfig {
    iterations: u32,
    percentiles: Vec<f64>,
}

impl SimulationConfig {
    /// Creates simulation controls.
    ///
    /// `percentiles` are percent values in the open interval `(0, 100)`,
    /// reported back in the order given (e.g. `[50.0, 95.0]`).
    ///
    /// # Errors
    /// Returns `Err` if `iterations < 1`, `percentiles` is empty, or any
    /// percentile lies outside `(0, 100)`.
    pub fn new(iterations: u32, percentiles: Vec<f64>) -> Result<Self, ConfigurationError> {
        if iterations < 1 {
            return Err(ConfigurationError::InvalidIterations(iterations));
        }
        if percentiles.is_empty() {
            return Err(ConfigurationError::InvalidPercentiles(
                "at least one percentile is required".into(),
            ));
        }
        for &p in &percentiles {
            if !p.is_finite() || p <= 0.0 || p >= 100.0 {
                return Err(ConfigurationError::InvalidPercentiles(format!(
                    "percentiles must lie in (0, 100), got {p}"
                )));
            }
        }
        Ok(Self {
            iterations,
            percentiles,
        })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn percentiles(&self) -> &[f64] {
        &self.percentiles
    }
}

/// One requested percentile and its arrival total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentilePoint {
    /// Requested percentile in (0, 100).
    pub percentile: f64,
    /// Arrival total at that percentile, in minutes.
    pub minutes: f64,
}

/// Terminal artifact of one simulation run. Plain data; presentation
/// and persistence belong to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Fraction of trials whose total exceeded the buffer, in [0, 1].
    pub failure_probability: f64,
    /// Requested percentiles in request order (closest-rank method).
    pub percentiles: Vec<PercentilePoint>,
    /// Number of trials behind this estimate.
    pub iterations: u32,
    /// Mean arrival total across all trials, in minutes.
    pub mean_minutes: f64,
    /// Sample standard deviation of arrival totals, in minutes.
    pub std_dev_minutes: f64,
}

/// Runs the full Monte Carlo simulation for one trip.
///
/// Equivalent to [`simulate_cancellable`] with a flag that never trips.
///
/// # Examples
/// ```
/// use flightrisk_core::distributions::Gamma;
/// use flightrisk_core::simulate::{simulate, SimulationConfig};
/// use flightrisk_core::trip::{LegModel, TripSpec};
///
/// let trip = TripSpec::new(
///     vec![LegModel::Gamma(Gamma::new(7.1, 4.2).unwrap())],
///     vec![],
///     60.0,
/// )
/// .unwrap();
/// let config = SimulationConfig::new(5_000, vec![95.0]).unwrap();
/// let result = simulate(&trip, &config, 42);
/// assert!((0.0..=1.0).contains(&result.failure_probability));
/// ```
pub fn simulate(trip: &TripSpec, config: &SimulationConfig, seed: u64) -> SimulationResult {
    let never = AtomicBool::new(false);
    simulate_cancellable(trip, config, seed, &never).expect("cancellation flag never set")
}

/// Runs the simulation, checking `cancel` between batches.
///
/// # Errors
/// Returns [`Cancelled`] if the flag was observed set before all batches
/// completed. No partial result is produced.
pub fn simulate_cancellable(
    trip: &TripSpec,
    config: &SimulationConfig,
    seed: u64,
    cancel: &AtomicBool,
) -> Result<SimulationResult, Cancelled> {
    let iterations = config.iterations as usize;
    let batch_count = iterations.div_ceil(TRIALS_PER_BATCH);
    debug!(
        iterations,
        batch_count,
        buffer = trip.available_buffer_minutes(),
        "running risk simulation"
    );

    let partials: Option<Vec<BatchPartial>> = (0..batch_count)
        .into_par_iter()
        .map(|batch| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let start = batch * TRIALS_PER_BATCH;
            let len = TRIALS_PER_BATCH.min(iterations - start);
            let mut rng = create_rng(stream_seed(seed, batch as u64));
            let mut exceeded = 0_u64;
            let mut totals = Vec::with_capacity(len);
            for _ in 0..len {
                let outcome = run_trial(trip, &mut rng);
                if outcome.exceeded_buffer {
                    exceeded += 1;
                }
                totals.push(outcome.total_minutes);
            }
            Some(BatchPartial { exceeded, totals })
        })
        .collect();
    let partials = partials.ok_or(Cancelled)?;

    let mut exceeded = 0_u64;
    let mut totals = Vec::with_capacity(iterations);
    for partial in partials {
        exceeded += partial.exceeded;
        totals.extend(partial.totals);
    }
    totals.sort_unstable_by(f64::total_cmp);

    let failure_probability = exceeded as f64 / iterations as f64;
    let percentiles = config
        .percentiles
        .iter()
        .map(|&p| PercentilePoint {
            percentile: p,
            minutes: percentile_closest_rank(&totals, p),
        })
        .collect();
    let mean_minutes = kahan_sum(&totals) / iterations as f64;
    let std_dev_minutes = sample_std_dev(&totals, mean_minutes);

    debug!(failure_probability, mean_minutes, "simulation complete");
    Ok(SimulationResult {
        failure_probability,
        percentiles,
        iterations: config.iterations,
        mean_minutes,
        std_dev_minutes,
    })
}

struct BatchPartial {
    exceeded: u64,
    totals: Vec<f64>,
}

/// Closest-rank percentile on **pre-sorted** data.
///
/// For `p ∈ (0, 100)` and n samples, returns the value at rank
/// `⌈p/100 · n⌉ − 1` (0-based). Unlike interpolating methods, the
/// result is always an observed sample, and values are monotonically
/// non-decreasing in `p` by construction.
///
/// Reference: Hyndman & Fan (1996), "Sample Quantiles in Statistical
/// Packages", *The American Statistician* 50(4) (the inverse-ECDF
/// definition, their type 1).
fn percentile_closest_rank(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let rank = ((p / 100.0) * n as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(n - 1)]
}

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Sample standard deviation (n − 1 denominator); 0 for fewer than two
/// samples.
fn sample_std_dev(data: &[f64], mean: f64) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = data.iter().map(|&x| (x - mean) * (x - mean)).sum();
    (sum_sq / (data.len() - 1) as f64).sqrt()
}

// ============================================================================
// Tests
// ============================================================================
