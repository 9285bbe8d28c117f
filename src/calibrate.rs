//! Distribution parameter derivation from trip facts.
//!
//! Upstream engines fetch traffic estimates, route weather, and flight
//! details over the network; none of that happens here. This module is
//! the pure second half of that pipeline: turning the fetched facts into
//! validated leg distributions.
//!
//! - Route weather becomes a weighted drive-time multiplier plus a
//!   volatility term (weather widens variance, it does not shift the
//!   mean at simulation time).
//! - A three-point traffic estimate becomes a [`Triangular`] leg, or a
//!   weather-adjusted [`Normal`] approximation of it.
//! - Airport tier, congestion window, and traveler options (checked
//!   bags, expedited screening) become [`Gamma`] queue legs and a fixed
//!   terminal walk model.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::Serialize;

use crate::distributions::{DistributionError, Gamma, Normal, Triangular};

// ============================================================================
// Weather
// ============================================================================

/// Observed weather condition at one point along the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Mist,
    Drizzle,
    Fog,
    Rain,
    Thunderstorm,
    Snow,
}

impl WeatherCondition {
    /// Drive-time multiplier for this condition, from Department of
    /// Transportation congestion statistics.
    pub fn multiplier(self) -> f64 {
        match self {
            WeatherCondition::Clear => 1.0,
            WeatherCondition::Clouds => 1.0,
            WeatherCondition::Mist => 1.05,
            WeatherCondition::Drizzle => 1.08,
            WeatherCondition::Fog => 1.15,
            WeatherCondition::Rain => 1.2,
            WeatherCondition::Thunderstorm => 1.35,
            WeatherCondition::Snow => 1.45,
        }
    }

    /// Relative volatility of the drive-time multiplier: even when the
    /// condition is known, its severity varies trip to trip.
    pub fn volatility(self) -> f64 {
        match self {
            WeatherCondition::Clear => 0.01,
            WeatherCondition::Clouds => 0.02,
            WeatherCondition::Rain => 0.10,
            WeatherCondition::Thunderstorm => 0.15,
            WeatherCondition::Snow => 0.20,
            // Mist, drizzle, fog sit in the middle band.
            _ => 0.05,
        }
    }
}

/// Weather at the three sampled points of a route.
///
/// The destination carries most of the weight: there is no time left to
/// make up for conditions at the end of the drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteWeather {
    pub start: WeatherCondition,
    pub mid: WeatherCondition,
    pub end: WeatherCondition,
}

// Weights sum to 1 so uniformly clear weather stays neutral.
const WEIGHT_START: f64 = 0.15;
const WEIGHT_MID: f64 = 0.25;
const WEIGHT_END: f64 = 0.60;

impl RouteWeather {
    /// The same condition at every sampled point.
    pub fn uniform(condition: WeatherCondition) -> Self {
        Self {
            start: condition,
            mid: condition,
            end: condition,
        }
    }

    /// Weighted drive-time multiplier across the route, rounded to two
    /// decimals.
    pub fn impact(&self) -> f64 {
        let raw = self.start.multiplier() * WEIGHT_START
            + self.mid.multiplier() * WEIGHT_MID
            + self.end.multiplier() * WEIGHT_END;
        (raw * 100.0).round() / 100.0
    }

    /// The condition that drives volatility: the destination's.
    pub fn dominant(&self) -> WeatherCondition {
        self.end
    }

    /// Volatility of the dominant condition.
    pub fn volatility(&self) -> f64 {
        self.dominant().volatility()
    }
}

// ============================================================================
// Traffic
// ============================================================================

/// Three-point drive-time estimate in minutes, as routing services
/// report it: optimistic, best guess, pessimistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrafficEstimate {
    optimistic: f64,
    best_guess: f64,
    pessimistic: f64,
}

impl TrafficEstimate {
    /// Creates an estimate. Ordering is not required here — routing
    /// services occasionally return estimates that collapse or invert,
    /// and [`normalized`](Self::normalized) repairs them — but every
    /// value must be a positive, finite duration.
    ///
    /// # Errors
    /// Returns `Err` if any estimate is not finite or ≤ 0.
    pub fn new(optimistic: f64, best_guess: f64, pessimistic: f64) -> Result<Self, DistributionError> {
        for (name, value) in [
            ("optimistic", optimistic),
            ("best_guess", best_guess),
            ("pessimistic", pessimistic),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DistributionError::InvalidParameters(format!(
                    "traffic estimate `{name}` must be a finite duration > 0, got {value}"
                )));
            }
        }
        Ok(Self {
            optimistic,
            best_guess,
            pessimistic,
        })
    }

    pub fn optimistic(&self) -> f64 {
        self.optimistic
    }

    pub fn best_guess(&self) -> f64 {
        self.best_guess
    }

    pub fn pessimistic(&self) -> f64 {
        self.pessimistic
    }

    /// Enforces `optimistic < best_guess < pessimistic`, nudging a
    /// collapsed or inverted bound one minute off the best guess.
    pub fn normalized(&self) -> Self {
        let mut out = *self;
        if out.optimistic >= out.best_guess {
            out.optimistic = out.best_guess - 1.0;
        }
        if out.pessimistic <= out.best_guess {
            out.pessimistic = out.best_guess + 1.0;
        }
        out
    }

    /// Applies the weather multiplier to all three estimates, with the
    /// pessimistic bound widened by an extra 10% (bad weather hurts the
    /// worst case more than the typical case). Benign weather
    /// (impact ≤ 1) leaves the estimate untouched.
    pub fn widened(&self, weather: &RouteWeather) -> Self {
        let normalized = self.normalized();
        let impact = weather.impact();
        if impact <= 1.0 {
            return normalized;
        }
        Self {
            optimistic: normalized.optimistic * impact,
            best_guess: normalized.best_guess * impact,
            pessimistic: normalized.pessimistic * impact * 1.1,
        }
    }

    /// The triangular drive-time leg for this estimate.
    ///
    /// # Errors
    /// Returns `Err` if the normalized bounds still cannot form a valid
    /// triangular distribution (optimistic nudged to ≤ 0).
    pub fn triangular(&self) -> Result<Triangular, DistributionError> {
        let n = self.normalized();
        Triangular::new(n.optimistic, n.best_guess, n.pessimistic)
    }

    /// Normal approximation of the drive-time leg with weather
    /// volatility folded into the spread.
    ///
    /// Takes the triangular distribution's mean and variance and widens
    /// the variance by `(mean · volatility)²` — the stochastic weather
    /// term enters as spread, never as a mean shift.
    ///
    /// # Errors
    /// Returns `Err` if `volatility` is negative or not finite, or the
    /// estimate cannot form a triangular distribution.
    pub fn normal_approximation(&self, volatility: f64) -> Result<Normal, DistributionError> {
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "volatility must be ≥ 0, got {volatility}"
            )));
        }
        let tri = self.triangular()?;
        let mean = tri.mean();
        let weather_term = mean * volatility;
        let sigma = (tri.variance() + weather_term * weather_term).sqrt();
        Normal::new(mean, sigma)
    }

    /// Model reliability on a 0–100 scale: a wide spread between the
    /// optimistic and pessimistic estimates relative to the best guess
    /// means low confidence.
    pub fn confidence(&self) -> u8 {
        let spread_ratio = (self.pessimistic - self.optimistic) / self.best_guess;
        (100.0 * (1.0 - spread_ratio)).clamp(0.0, 100.0) as u8
    }
}

// ============================================================================
// Airport
// ============================================================================

/// Top-30 busiest US airports: chaotic queues, high variance.
const MAJOR_HUBS: [&str; 30] = [
    "ATL", "DFW", "DEN", "ORD", "LAX", "JFK", "LAS", "MCO", "MIA", "CLT", "SEA", "PHX", "EWR",
    "SFO", "IAH", "BOS", "FLL", "MSP", "LGA", "DTW", "PHL", "SLC", "DCA", "SAN", "BWI", "TPA",
    "AUS", "IAD", "BNA", "MDW",
];

/// Mid-size regional hubs: more efficient processing.
const REGIONAL_HUBS: [&str; 11] = [
    "PBI", "BUR", "SNA", "HOU", "DAL", "STL", "PDX", "SMF", "OAK", "RDU", "RSW",
];

/// Airport complexity class, derived from the IATA code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AirportTier {
    /// Top-30 hub (e.g. JFK).
    Major,
    /// Regional hub (e.g. PBI).
    Regional,
    /// Small local airport (e.g. ISP).
    Local,
}

impl AirportTier {
    /// Classifies an IATA code; unknown codes are small local airports.
    pub fn classify(iata: &str) -> Self {
        let code = iata.to_ascii_uppercase();
        if MAJOR_HUBS.contains(&code.as_str()) {
            AirportTier::Major
        } else if REGIONAL_HUBS.contains(&code.as_str()) {
            AirportTier::Regional
        } else {
            AirportTier::Local
        }
    }

    /// Base (mean wait, gamma scale) for the security checkpoint.
    /// Higher scale means higher variance.
    fn security_base(self) -> (f64, f64) {
        match self {
            AirportTier::Major => (25.0, 4.0),
            AirportTier::Regional => (15.0, 2.5),
            AirportTier::Local => (10.0, 1.5),
        }
    }

    /// Base (mean wait, gamma scale) for the bag-drop line.
    fn bag_drop_base(self) -> (f64, f64) {
        match self {
            AirportTier::Major => (18.0, 4.0),
            AirportTier::Regional => (10.0, 2.0),
            AirportTier::Local => (5.0, 1.0),
        }
    }

    /// Post-security terminal transit model. Walking pace is consistent,
    /// so a normal fits: big hubs mean a train ride or a mile on foot.
    pub fn terminal_walk(self) -> Normal {
        let (mean, sigma) = match self {
            AirportTier::Major => (12.0, 5.0),
            AirportTier::Regional => (7.0, 2.0),
            AirportTier::Local => (3.0, 1.0),
        };
        Normal::new(mean, sigma).expect("tier walk parameters are valid")
    }
}

// ============================================================================
// Congestion window
// ============================================================================

/// Composite congestion multiplier for a moment in time: rush-hour,
/// day-of-week, and holiday-season factors, applied to both the mean and
/// the scale of queue waits (congestion raises variance, not just the
/// average).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CongestionWindow {
    multiplier: f64,
}

impl CongestionWindow {
    /// Derives the window for an arrival instant.
    pub fn at(when: DateTime<Utc>) -> Self {
        let multiplier =
            Self::hour_multiplier(when.hour()) * Self::calendar_multiplier(when.weekday(), when.month());
        Self { multiplier }
    }

    /// A neutral window (multiplier 1.0), for callers without a usable
    /// arrival time.
    pub fn neutral() -> Self {
        Self { multiplier: 1.0 }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Rush-hour factor: morning business travel, evening departures,
    /// quiet mid-day and late-night troughs.
    fn hour_multiplier(hour: u32) -> f64 {
        match hour {
            5..=8 => 1.3,
            15..=18 => 1.2,
            10..=13 | 21..=23 => 0.7,
            _ => 1.0,
        }
    }

    /// Day-of-week and season factor: Friday and Sunday are peak travel
    /// days, Tuesday and Wednesday the lightest; summer and the
    /// November–December holidays add load.
    fn calendar_multiplier(weekday: Weekday, month: u32) -> f64 {
        let mut multiplier = 1.0;
        if weekday == Weekday::Fri || weekday == Weekday::Sun {
            multiplier *= 1.15;
        }
        if weekday == Weekday::Tue || weekday == Weekday::Wed {
            multiplier *= 0.85;
        }
        if matches!(month, 6..=8 | 11 | 12) {
            multiplier *= 1.1;
        }
        multiplier
    }
}

// ============================================================================
// Queue legs
// ============================================================================

/// Security checkpoint leg for an airport tier under a congestion
/// window. Expedited screening (PreCheck) cuts the mean wait by 65% and
/// substantially tightens the variance.
///
/// # Errors
/// Returns `Err` only if the derived parameters degenerate (they cannot
/// for positive multipliers; the check is the constructor's).
///
/// # Examples
/// ```
/// use flightrisk_core::calibrate::{screening_gamma, AirportTier, CongestionWindow};
/// let queue = screening_gamma(
///     AirportTier::Major,
///     &CongestionWindow::neutral(),
///     false,
/// )
/// .unwrap();
/// assert!((queue.mean() - 25.0).abs() < 1e-10);
/// ```
pub fn screening_gamma(
    tier: AirportTier,
    window: &CongestionWindow,
    expedited: bool,
) -> Result<Gamma, DistributionError> {
    let (mut mean, mut scale) = tier.security_base();
    mean *= window.multiplier();
    scale *= window.multiplier();
    if expedited {
        mean *= 0.35;
        scale *= 0.4;
    }
    Gamma::from_mean_scale(mean, scale)
}

/// Bag-drop leg, present only with checked bags; digital check-in
/// contributes negligible time and yields no leg.
///
/// # Errors
/// As [`screening_gamma`].
pub fn bag_drop_gamma(
    tier: AirportTier,
    window: &CongestionWindow,
    has_bags: bool,
) -> Result<Option<Gamma>, DistributionError> {
    if !has_bags {
        return Ok(None);
    }
    let (mut mean, mut scale) = tier.bag_drop_base();
    mean *= window.multiplier();
    scale *= window.multiplier();
    Gamma::from_mean_scale(mean, scale).map(Some)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // --- weather ---

    #[test]
    fn test_clear_route_is_neutral() {
        let route = RouteWeather::uniform(WeatherCondition::Clear);
        assert_eq!(route.impact(), 1.0);
        assert_eq!(route.volatility(), 0.01);
    }

    #[test]
    fn test_destination_weather_outweighs_origin() {
        // A storm over the destination must hurt more than the same
        // storm at the start of the drive.
        let storm_at_destination = RouteWeather {
            start: WeatherCondition::Clear,
            mid: WeatherCondition::Clear,
            end: WeatherCondition::Thunderstorm,
        };
        let storm_at_origin = RouteWeather {
            start: WeatherCondition::Thunderstorm,
            mid: WeatherCondition::Clear,
            end: WeatherCondition::Clear,
        };
        assert!(storm_at_destination.impact() > storm_at_origin.impact());
        // 0.15 + 0.25 + 0.60·1.35 = 1.21
        assert!((storm_at_destination.impact() - 1.21).abs() < 1e-10);
        // 0.15·1.35 + 0.25 + 0.60 = 1.0525 → 1.05
        assert!((storm_at_origin.impact() - 1.05).abs() < 1e-10);
    }

    #[test]
    fn test_volatility_bands() {
        assert_eq!(WeatherCondition::Snow.volatility(), 0.20);
        assert_eq!(WeatherCondition::Thunderstorm.volatility(), 0.15);
        assert_eq!(WeatherCondition::Fog.volatility(), 0.05);
        assert_eq!(WeatherCondition::Drizzle.volatility(), 0.05);
    }

    #[test]
    fn test_dominant_is_destination() {
        let route = RouteWeather {
            start: WeatherCondition::Snow,
            mid: WeatherCondition::Snow,
            end: WeatherCondition::Clear,
        };
        assert_eq!(route.dominant(), WeatherCondition::Clear);
        assert_eq!(route.volatility(), 0.01);
    }

    // --- traffic ---

    #[test]
    fn test_estimate_rejects_non_positive() {
        assert!(TrafficEstimate::new(0.0, 50.0, 60.0).is_err());
        assert!(TrafficEstimate::new(40.0, -1.0, 60.0).is_err());
        assert!(TrafficEstimate::new(40.0, 50.0, f64::NAN).is_err());
    }

    #[test]
    fn test_normalized_repairs_collapsed_bounds() {
        let estimate = TrafficEstimate::new(50.0, 50.0, 40.0).unwrap();
        let n = estimate.normalized();
        assert_eq!(n.optimistic(), 49.0);
        assert_eq!(n.best_guess(), 50.0);
        assert_eq!(n.pessimistic(), 51.0);
    }

    #[test]
    fn test_normalized_keeps_ordered_bounds() {
        let estimate = TrafficEstimate::new(40.0, 50.0, 60.0).unwrap();
        assert_eq!(estimate.normalized(), estimate);
    }

    #[test]
    fn test_widened_by_rain() {
        let estimate = TrafficEstimate::new(40.0, 50.0, 60.0).unwrap();
        let rain = RouteWeather::uniform(WeatherCondition::Rain); // impact 1.2
        let widened = estimate.widened(&rain);
        assert!((widened.optimistic() - 48.0).abs() < 1e-10);
        assert!((widened.best_guess() - 60.0).abs() < 1e-10);
        // pessimistic takes the extra 10%: 60 · 1.2 · 1.1
        assert!((widened.pessimistic() - 79.2).abs() < 1e-10);
    }

    #[test]
    fn test_widened_noop_in_clear_weather() {
        let estimate = TrafficEstimate::new(40.0, 50.0, 60.0).unwrap();
        let clear = RouteWeather::uniform(WeatherCondition::Clear);
        assert_eq!(estimate.widened(&clear), estimate);
    }

    #[test]
    fn test_triangular_leg() {
        let estimate = TrafficEstimate::new(35.0, 45.0, 65.0).unwrap();
        let tri = estimate.triangular().unwrap();
        assert_eq!(tri.min(), 35.0);
        assert_eq!(tri.mode(), 45.0);
        assert_eq!(tri.max(), 65.0);
    }

    #[test]
    fn test_normal_approximation_combines_variances() {
        let estimate = TrafficEstimate::new(35.0, 45.0, 65.0).unwrap();
        let tri = estimate.triangular().unwrap();
        let normal = estimate.normal_approximation(0.1).unwrap();
        assert!((normal.mean() - tri.mean()).abs() < 1e-10);
        let weather_term = tri.mean() * 0.1;
        let expected = (tri.variance() + weather_term * weather_term).sqrt();
        assert!((normal.std_dev() - expected).abs() < 1e-10);
        // Weather always widens relative to the dry triangular spread.
        assert!(normal.variance() > tri.variance());
    }

    #[test]
    fn test_normal_approximation_rejects_negative_volatility() {
        let estimate = TrafficEstimate::new(35.0, 45.0, 65.0).unwrap();
        assert!(estimate.normal_approximation(-0.1).is_err());
    }

    #[test]
    fn test_confidence_falls_with_spread() {
        let stable = TrafficEstimate::new(55.0, 60.0, 65.0).unwrap();
        let volatile = TrafficEstimate::new(40.0, 60.0, 100.0).unwrap();
        assert!(stable.confidence() > volatile.confidence());
        assert_eq!(stable.confidence(), 83);
        assert_eq!(volatile.confidence(), 0);
    }

    // --- airport tiers ---

    #[test]
    fn test_tier_classification() {
        assert_eq!(AirportTier::classify("JFK"), AirportTier::Major);
        assert_eq!(AirportTier::classify("lax"), AirportTier::Major);
        assert_eq!(AirportTier::classify("PBI"), AirportTier::Regional);
        assert_eq!(AirportTier::classify("ISP"), AirportTier::Local);
        assert_eq!(AirportTier::classify("XXX"), AirportTier::Local);
    }

    #[test]
    fn test_major_hub_queues_slower_than_local() {
        let window = CongestionWindow::neutral();
        let jfk = screening_gamma(AirportTier::Major, &window, false).unwrap();
        let isp = screening_gamma(AirportTier::Local, &window, false).unwrap();
        assert!(jfk.mean() > isp.mean());
        assert!(jfk.variance() > isp.variance());
    }

    #[test]
    fn test_expedited_screening_faster_and_tighter() {
        let window = CongestionWindow::neutral();
        let standard = screening_gamma(AirportTier::Major, &window, false).unwrap();
        let expedited = screening_gamma(AirportTier::Major, &window, true).unwrap();
        assert!(expedited.mean() < standard.mean());
        assert!(expedited.variance() < standard.variance());
        // 65% faster on average
        assert!((expedited.mean() - 25.0 * 0.35).abs() < 1e-10);
    }

    #[test]
    fn test_bag_drop_only_with_bags() {
        let window = CongestionWindow::neutral();
        assert!(bag_drop_gamma(AirportTier::Major, &window, false)
            .unwrap()
            .is_none());
        let line = bag_drop_gamma(AirportTier::Major, &window, true)
            .unwrap()
            .unwrap();
        assert!((line.mean() - 18.0).abs() < 1e-10);
    }

    #[test]
    fn test_terminal_walk_scales_with_tier() {
        assert!(
            AirportTier::Major.terminal_walk().mean() > AirportTier::Local.terminal_walk().mean()
        );
        assert_eq!(AirportTier::Regional.terminal_walk().mean(), 7.0);
    }

    // --- congestion window ---

    #[test]
    fn test_morning_rush_on_a_tuesday() {
        // Tuesday 2024-03-12 07:30 — morning rush (1.3) × mid-week (0.85)
        let when = Utc.with_ymd_and_hms(2024, 3, 12, 7, 30, 0).unwrap();
        let window = CongestionWindow::at(when);
        assert!((window.multiplier() - 1.3 * 0.85).abs() < 1e-10);
    }

    #[test]
    fn test_summer_friday_evening_peak() {
        // Friday 2024-07-05 17:00 — evening rush × Friday × summer
        let when = Utc.with_ymd_and_hms(2024, 7, 5, 17, 0, 0).unwrap();
        let window = CongestionWindow::at(when);
        assert!((window.multiplier() - 1.2 * 1.15 * 1.1).abs() < 1e-10);
    }

    #[test]
    fn test_midday_trough() {
        // Monday 2024-03-11 12:00 — off-peak hours only
        let when = Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap();
        let window = CongestionWindow::at(when);
        assert!((window.multiplier() - 0.7).abs() < 1e-10);
    }

    #[test]
    fn test_congestion_scales_queue_mean_and_variance() {
        let peak = CongestionWindow::at(Utc.with_ymd_and_hms(2024, 7, 5, 17, 0, 0).unwrap());
        let calm = CongestionWindow::neutral();
        let busy = screening_gamma(AirportTier::Major, &peak, false).unwrap();
        let quiet = screening_gamma(AirportTier::Major, &calm, false).unwrap();
        assert!(busy.mean() > quiet.mean());
        assert!(busy.variance() > quiet.variance());
        // shape = mean / scale is invariant under the window multiplier
        assert!((busy.shape() - quiet.shape()).abs() < 1e-10);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn any_condition() -> impl Strategy<Value = WeatherCondition> {
        prop_oneof![
            Just(WeatherCondition::Clear),
            Just(WeatherCondition::Clouds),
            Just(WeatherCondition::Mist),
            Just(WeatherCondition::Drizzle),
            Just(WeatherCondition::Fog),
            Just(WeatherCondition::Rain),
            Just(WeatherCondition::Thunderstorm),
            Just(WeatherCondition::Snow),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn impact_bounded_by_condition_extremes(
            start in any_condition(),
            mid in any_condition(),
            end in any_condition(),
        ) {
            let route = RouteWeather { start, mid, end };
            let impact = route.impact();
            prop_assert!(impact >= 1.0 - 1e-9, "impact {impact} below clear-weather floor");
            prop_assert!(impact <= 1.45 + 1e-9, "impact {impact} above snow ceiling");
        }

        #[test]
        fn widened_estimates_stay_ordered(
            opt in 1.0_f64..120.0,
            best in 1.0_f64..120.0,
            pess in 1.0_f64..120.0,
            start in any_condition(),
            mid in any_condition(),
            end in any_condition(),
        ) {
            prop_assume!(best > 2.0); // a nudged optimistic bound must stay positive
            let estimate = TrafficEstimate::new(opt, best, pess).unwrap();
            let weather = RouteWeather { start, mid, end };
            let widened = estimate.widened(&weather);
            prop_assert!(widened.optimistic() < widened.best_guess());
            prop_assert!(widened.best_guess() < widened.pessimistic());
            prop_assert!(widened.triangular().is_ok());
        }

        #[test]
        fn screening_mean_positive_under_any_window(
            hour in 0_u32..24,
            expedited in any::<bool>(),
        ) {
            // Any hour multiplier keeps the gamma well-formed.
            let when = Utc.with_ymd_and_hms(2024, 3, 11, hour, 0, 0).unwrap();
            let window = CongestionWindow::at(when);
            let tier = AirportTier::Major;
            let queue = screening_gamma(tier, &window, expedited).unwrap();
            prop_assert!(queue.mean() > 0.0);
            prop_assert!(queue.variance() > 0.0);
        }
    }
}
