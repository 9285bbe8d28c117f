//! # flightrisk-core
//!
//! Stochastic risk kernel for deadline-constrained travel.
//!
//! Given a trip described as a sequence of uncertain legs (driving time,
//! screening queues) and fixed legs (terminal walk), this crate estimates
//! the probability of missing a hard deadline such as a flight's gate
//! closure, and inverts that estimate to answer "when must I leave?" and
//! "when is it already too late?".
//!
//! ## Modules
//!
//! - [`distributions`] — validated leg distributions (triangular, normal,
//!   gamma) with analytical moments, CDFs, and one-draw samplers
//! - [`trip`] — trip description and the single-trial evaluator
//! - [`simulate`] — Monte Carlo aggregation into a failure probability
//!   and percentile arrival times
//! - [`solver`] — monotone bisection over the departure buffer
//! - [`calibrate`] — derivation of distribution parameters from trip
//!   facts (weather along the route, airport tier, congestion window)
//! - [`random`] — seeded RNG construction and decorrelated seed streams
//!
//! ## Design Philosophy
//!
//! - **Validate at construction**: malformed parameters are rejected
//!   before any trial runs, never inside the sampling loop
//! - **Explicit randomness**: every sampling call takes a caller-owned
//!   random source; a fixed seed reproduces a run bit-for-bit
//! - **No I/O**: fetching traffic, weather, and flight data belongs to
//!   callers; the kernel consumes plain parameter structs
//!
//! ## Example
//!
//! ```
//! use flightrisk_core::distributions::{Gamma, Normal, Triangular};
//! use flightrisk_core::simulate::{simulate, SimulationConfig};
//! use flightrisk_core::trip::{DeterministicLeg, LegModel, TripSpec};
//!
//! let trip = TripSpec::new(
//!     vec![
//!         LegModel::Triangular(Triangular::new(35.0, 45.0, 65.0).unwrap()),
//!         LegModel::Gamma(Gamma::new(7.1, 4.2).unwrap()),
//!     ],
//!     vec![DeterministicLeg::new(8.0).unwrap()],
//!     195.0,
//! )
//! .unwrap();
//!
//! let config = SimulationConfig::new(10_000, vec![50.0, 95.0]).unwrap();
//! let result = simulate(&trip, &config, 42);
//! assert!((0.0..=1.0).contains(&result.failure_probability));
//! ```

pub mod calibrate;
pub mod distributions;
pub mod random;
pub mod simulate;
pub mod solver;
pub mod trip;

pub use distributions::{DistributionError, Gamma, Normal, Triangular};
pub use simulate::{
    simulate, simulate_cancellable, Cancelled, ConfigurationError, PercentilePoint,
    SimulationConfig, SimulationResult,
};
pub use solver::{find_drop_dead_buffer, find_latest_safe_departure, SearchRange, SolverResult};
pub use trip::{run_trial, DeterministicLeg, LegModel, TrialOutcome, TripSpec, ValidationError};
