//! Trip description and single-trial evaluation.
//!
//! A [`TripSpec`] is an ordered list of uncertain legs ([`LegModel`])
//! plus fixed legs ([`DeterministicLeg`]) and the buffer available
//! before the deadline. One trial ([`run_trial`]) draws exactly one
//! sample from every uncertain leg, sums in the fixed legs, and compares
//! the total against the buffer.
//!
//! All invariants are enforced at construction: a malformed leg cannot
//! reach the sampling loop.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::distributions::{DistributionError, Gamma, Normal, Triangular};

/// Error type for invalid trip components.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A leg distribution's parameters violate its invariant.
    #[error(transparent)]
    Distribution(#[from] DistributionError),
    /// A fixed duration is negative or not finite.
    #[error("invalid fixed duration: {0}")]
    InvalidDuration(String),
    /// The available buffer is negative or not finite.
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),
}

/// One uncertain trip segment.
///
/// The variant picks the duration model: [`Triangular`] for drive time
/// from three field estimates, [`Normal`] for weather-adjusted drive
/// time, [`Gamma`] for queue waits. Each wraps an already validated
/// distribution, so holding a `LegModel` is proof its parameters are
/// sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegModel {
    Triangular(Triangular),
    Normal(Normal),
    Gamma(Gamma),
}

impl LegModel {
    /// Draws one duration for this leg.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            LegModel::Triangular(t) => t.sample(rng),
            LegModel::Normal(n) => n.sample(rng),
            LegModel::Gamma(g) => g.sample(rng),
        }
    }

    /// Expected duration of this leg.
    pub fn mean(&self) -> f64 {
        match self {
            LegModel::Triangular(t) => t.mean(),
            LegModel::Normal(n) => n.mean(),
            LegModel::Gamma(g) => g.mean(),
        }
    }
}

/// A fixed, non-random duration in minutes (e.g. the terminal walk).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeterministicLeg(f64);

impl DeterministicLeg {
    /// Creates a fixed leg.
    ///
    /// # Errors
    /// Returns `Err` if `minutes` is negative or not finite.
    pub fn new(minutes: f64) -> Result<Self, ValidationError> {
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(ValidationError::InvalidDuration(format!(
                "fixed leg must be a finite duration ≥ 0, got {minutes}"
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> f64 {
        self.0
    }
}

/// Full description of one trip against one deadline.
///
/// Owned by a single simulation invocation; cloned (cheaply) by the
/// solver to evaluate other buffer values.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSpec {
    legs: Vec<LegModel>,
    fixed: Vec<DeterministicLeg>,
    available_buffer_minutes: f64,
}

impl TripSpec {
    /// Assembles a trip from its legs and the minutes remaining until
    /// the deadline.
    ///
    /// # Errors
    /// Returns `Err` if the buffer is negative or not finite. Leg
    /// invariants were already enforced when the legs were built.
    pub fn new(
        legs: Vec<LegModel>,
        fixed: Vec<DeterministicLeg>,
        available_buffer_minutes: f64,
    ) -> Result<Self, ValidationError> {
        if !available_buffer_minutes.is_finite() || available_buffer_minutes < 0.0 {
            return Err(ValidationError::InvalidBuffer(format!(
                "available buffer must be a finite duration ≥ 0, got {available_buffer_minutes}"
            )));
        }
        Ok(Self {
            legs,
            fixed,
            available_buffer_minutes,
        })
    }

    pub fn legs(&self) -> &[LegModel] {
        &self.legs
    }

    pub fn fixed_legs(&self) -> &[DeterministicLeg] {
        &self.fixed
    }

    pub fn available_buffer_minutes(&self) -> f64 {
        self.available_buffer_minutes
    }

    /// Sum of all fixed legs.
    pub fn fixed_minutes(&self) -> f64 {
        self.fixed.iter().map(DeterministicLeg::minutes).sum()
    }

    /// Expected total duration (sum of leg means plus fixed legs).
    pub fn mean_minutes(&self) -> f64 {
        self.legs.iter().map(LegModel::mean).sum::<f64>() + self.fixed_minutes()
    }

    /// The same trip evaluated against a different buffer.
    ///
    /// The duration distribution does not depend on the buffer, which is
    /// what makes failure probability monotone in it; the solver leans
    /// on this to bisect.
    ///
    /// # Errors
    /// Returns `Err` if `minutes` is negative or not finite.
    pub fn with_buffer(&self, minutes: f64) -> Result<Self, ValidationError> {
        Self::new(self.legs.clone(), self.fixed.clone(), minutes)
    }
}

/// Outcome of one simulated trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrialOutcome {
    /// Total elapsed minutes across every leg.
    pub total_minutes: f64,
    /// Whether the total exceeded the available buffer.
    pub exceeded_buffer: bool,
}

/// Evaluates one trial: draws one sample per uncertain leg in order,
/// adds the fixed legs, and compares against the buffer.
///
/// Consumes randomness from `rng` and nothing else; there is no state
/// carried between trials.
///
/// # Examples
/// ```
/// use flightrisk_core::distributions::Triangular;
/// use flightrisk_core::random::create_rng;
/// use flightrisk_core::trip::{run_trial, LegModel, TripSpec};
///
/// let trip = TripSpec::new(
///     vec![LegModel::Triangular(Triangular::new(35.0, 45.0, 65.0).unwrap())],
///     vec![],
///     70.0,
/// )
/// .unwrap();
/// let outcome = run_trial(&trip, &mut create_rng(1));
/// assert!(!outcome.exceeded_buffer); // the leg cannot exceed 65 minutes
/// ```
pub fn run_trial<R: Rng + ?Sized>(trip: &TripSpec, rng: &mut R) -> TrialOutcome {
    let mut total = trip.fixed_minutes();
    for leg in &trip.legs {
        total += leg.sample(rng);
    }
    TrialOutcome {
        total_minutes: total,
        exceeded_buffer: total > trip.available_buffer_minutes,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn trial_total_bounded_by_triangular_support(
            min in 1.0_f64..60.0,
            mode_frac in 0.01_f64..0.99,
            range in 1.0_f64..60.0,
            walk in 0.0_f64..30.0,
            buffer in 0.0_f64..500.0,
            seed in any::<u64>(),
        ) {
            let max = min + range;
            let mode = min + mode_frac * range;
            let trip = TripSpec::new(
                vec![LegModel::Triangular(Triangular::new(min, mode, max).unwrap())],
                vec![DeterministicLeg::new(walk).unwrap()],
                buffer,
            )
            .unwrap();
            let outcome = run_trial(&trip, &mut create_rng(seed));
            prop_assert!(outcome.total_minutes >= min + walk - 1e-9);
            prop_assert!(outcome.total_minutes <= max + walk + 1e-9);
            prop_assert_eq!(
                outcome.exceeded_buffer,
                outcome.total_minutes > buffer
            );
        }
    }
}
