//! Leg duration distributions.
//!
//! Validated distribution types for the three kinds of uncertain trip
//! legs, with analytical moments, CDF evaluation, and one-draw sampling.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Models | Mean |
//! |---|---|---|---|
//! | [`Triangular`] | min, mode, max | drive time from three field estimates | (a+b+c)/3 |
//! | [`Normal`] | μ, σ | weather-adjusted drive time | μ |
//! | [`Gamma`] | shape, scale | screening / bag-drop queue wait | k·θ |
//!
//! Triangular fits traffic naturally: routing services hand back an
//! optimistic, likely, and pessimistic estimate, and delays skew worse
//! rather than better. Weather perturbs the variance of drive time, not
//! its shape, hence the normal variant. Queue waits are classically
//! gamma-distributed and carry the long right tail a bounded or
//! symmetric distribution would understate.
//!
//! Parameters are validated once, at construction. Samplers draw from a
//! caller-owned random source and never clamp: a negative raw draw from
//! a mis-parameterized normal is a modeling error to be caught upstream,
//! not silently repaired here.

use rand::Rng;
use rand_distr::Distribution;
use thiserror::Error;

/// Floor applied to a normal leg's standard deviation before sampling,
/// so a near-degenerate variance still yields a proper distribution.
pub const MIN_STD_DEV: f64 = 0.1;

/// Error type for invalid distribution parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),
}

// ============================================================================
// Triangular Distribution
// ============================================================================

/// Triangular distribution with parameters `[min, mode, max]`.
///
/// # Mathematical Definition
/// - PDF: piecewise linear, peaking at mode
/// - CDF: piecewise quadratic
/// - Mean: (min + mode + max) / 3
/// - Variance: (a² + b² + c² − ab − ac − bc) / 18
///
/// Reference: Johnson, Kotz & Balakrishnan (1995), *Continuous Univariate
/// Distributions*, Vol. 2, Chapter 26.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangular {
    min: f64,
    mode: f64,
    max: f64,
}

impl Triangular {
    /// Creates a new triangular distribution.
    ///
    /// # Errors
    /// Returns `Err` if any parameter is not finite, `min >= max`, or
    /// `mode` lies outside `[min, max]`.
    pub fn new(min: f64, mode: f64, max: f64) -> Result<Self, DistributionError> {
        if !min.is_finite() || !mode.is_finite() || !max.is_finite() {
            return Err(DistributionError::InvalidParameters(
                "Triangular parameters must be finite".into(),
            ));
        }
        if min > mode || mode > max || min >= max {
            return Err(DistributionError::InvalidParameters(format!(
                "Triangular requires min ≤ mode ≤ max and min < max, got {min}, {mode}, {max}"
            )));
        }
        Ok(Self { min, mode, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn mode(&self) -> f64 {
        self.mode
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Mean = (min + mode + max) / 3.
    pub fn mean(&self) -> f64 {
        (self.min + self.mode + self.max) / 3.0
    }

    /// Variance = (a² + b² + c² − ab − ac − bc) / 18.
    pub fn variance(&self) -> f64 {
        let (a, b, c) = (self.min, self.mode, self.max);
        (a * a + b * b + c * c - a * b - a * c - b * c) / 18.0
    }

    /// CDF of the triangular distribution.
    ///
    /// ```text
    /// F(x) = (x−a)² / ((c−a)(b−a))       for a ≤ x ≤ b
    ///      = 1 − (c−x)² / ((c−a)(c−b))   for b < x ≤ c
    /// ```
    pub fn cdf(&self, x: f64) -> f64 {
        let (a, b, c) = (self.min, self.mode, self.max);
        if x <= a {
            0.0
        } else if x <= b {
            (x - a) * (x - a) / ((c - a) * (b - a).max(f64::MIN_POSITIVE))
        } else if x < c {
            1.0 - (c - x) * (c - x) / ((c - a) * (c - b).max(f64::MIN_POSITIVE))
        } else {
            1.0
        }
    }

    /// Inverse CDF (quantile function) of the triangular distribution.
    ///
    /// ```text
    /// F⁻¹(p) = a + √(p·(c−a)·(b−a))                 if p < F(b)
    ///        = c − √((1−p)·(c−a)·(c−b))              if p ≥ F(b)
    /// ```
    ///
    /// Returns `None` if `p` is outside `[0, 1]`.
    pub fn quantile(&self, p: f64) -> Option<f64> {
        if !(0.0..=1.0).contains(&p) {
            return None;
        }
        let (a, b, c) = (self.min, self.mode, self.max);
        let fc = (b - a) / (c - a); // CDF at the mode
        if p < fc {
            Some(a + ((c - a) * (b - a) * p).sqrt())
        } else {
            Some(c - ((c - a) * (c - b) * (1.0 - p)).sqrt())
        }
    }

    /// Draws one duration by inverse-CDF transform of a uniform variate.
    ///
    /// The draw always lies in `[min, max]`.
    ///
    /// # Examples
    /// ```
    /// use flightrisk_core::distributions::Triangular;
    /// use flightrisk_core::random::create_rng;
    /// let t = Triangular::new(35.0, 45.0, 65.0).unwrap();
    /// let mut rng = create_rng(7);
    /// let x = t.sample(&mut rng);
    /// assert!((35.0..=65.0).contains(&x));
    /// ```
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.random();
        self.quantile(u).expect("uniform draw lies in [0, 1)")
    }
}

// ============================================================================
// Normal Distribution
// ============================================================================

/// Normal (Gaussian) distribution N(μ, σ²).
///
/// Models drive time whose variance has been widened by weather; the
/// weather multiplier perturbs spread, not shape.
///
/// # Mathematical Definition
/// - CDF: Φ((x−μ)/σ) (via standard normal CDF)
/// - Mean: μ
/// - Variance: σ²
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Creates a new normal distribution N(μ, σ).
    ///
    /// # Errors
    /// Returns `Err` if `sigma ≤ 0` or parameters are not finite.
    pub fn new(mu: f64, sigma: f64) -> Result<Self, DistributionError> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Normal requires finite μ and σ > 0, got μ={mu}, σ={sigma}"
            )));
        }
        Ok(Self { mu, sigma })
    }

    pub fn mean(&self) -> f64 {
        self.mu
    }

    pub fn std_dev(&self) -> f64 {
        self.sigma
    }

    pub fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    /// CDF: Φ((x−μ)/σ).
    pub fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        standard_normal_cdf(z)
    }

    /// Draws one duration.
    ///
    /// The standard deviation is floored at [`MIN_STD_DEV`] before
    /// sampling, so a near-zero variance still produces a proper
    /// distribution. Raw draws are not clamped and may be negative for
    /// mis-parameterized legs (large σ relative to μ).
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let sigma = self.sigma.max(MIN_STD_DEV);
        rand_distr::Normal::new(self.mu, sigma)
            .expect("parameters validated at construction")
            .sample(rng)
    }
}

// ============================================================================
// Gamma Distribution
// ============================================================================

/// Gamma distribution with shape k and scale θ.
///
/// The standard model for service-queue wait times: arrivals are
/// memoryless, service variance is non-trivial, and the right tail is
/// long. Used for security screening and bag-drop lines.
///
/// # Mathematical Definition
/// - PDF: x^(k−1) e^(−x/θ) / (Γ(k) θᵏ) for x > 0
/// - CDF: P(k, x/θ) (regularized lower incomplete gamma)
/// - Mean: k·θ
/// - Variance: k·θ²
///
/// Reference: Johnson, Kotz & Balakrishnan (1994), *Continuous Univariate
/// Distributions*, Vol. 1, Chapter 17.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamma {
    shape: f64,
    scale: f64,
}

impl Gamma {
    /// Creates a new gamma distribution with shape k and scale θ.
    ///
    /// # Errors
    /// Returns `Err` if `shape ≤ 0`, `scale ≤ 0`, or either parameter is
    /// not finite.
    pub fn new(shape: f64, scale: f64) -> Result<Self, DistributionError> {
        if !shape.is_finite() || !scale.is_finite() || shape <= 0.0 || scale <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Gamma requires shape > 0 and scale > 0, got k={shape}, θ={scale}"
            )));
        }
        Ok(Self { shape, scale })
    }

    /// Builds a gamma leg from its mean wait and scale, the common field
    /// parameterization (`shape = mean / scale`).
    ///
    /// # Errors
    /// Returns `Err` if `mean ≤ 0` or `scale ≤ 0`.
    pub fn from_mean_scale(mean: f64, scale: f64) -> Result<Self, DistributionError> {
        if !mean.is_finite() || mean <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Gamma mean must be > 0, got {mean}"
            )));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Gamma scale must be > 0, got {scale}"
            )));
        }
        Self::new(mean / scale, scale)
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Mean = k·θ.
    pub fn mean(&self) -> f64 {
        self.shape * self.scale
    }

    /// Variance = k·θ².
    pub fn variance(&self) -> f64 {
        self.shape * self.scale * self.scale
    }

    /// CDF: P(k, x/θ), the regularized lower incomplete gamma function.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        regularized_lower_gamma(self.shape, x / self.scale)
    }

    /// Draws one wait time. Draws are always ≥ 0.
    ///
    /// # Examples
    /// ```
    /// use flightrisk_core::distributions::Gamma;
    /// use flightrisk_core::random::create_rng;
    /// let g = Gamma::new(7.1, 4.2).unwrap();
    /// let mut rng = create_rng(7);
    /// assert!(g.sample(&mut rng) >= 0.0);
    /// ```
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rand_distr::Gamma::new(self.shape, self.scale)
            .expect("parameters validated at construction")
            .sample(rng)
    }
}

// ============================================================================
// Standard Normal CDF
// ============================================================================

/// 1/√(2π) ≈ 0.3989422804014327
const FRAC_1_SQRT_2PI: f64 = 0.3989422804014326779399460599343818684758586311649;

/// Approximation of the standard normal CDF Φ(x) = P(Z ≤ x) for Z ~ N(0,1).
///
/// # Algorithm
/// Abramowitz & Stegun formula 26.2.17, polynomial approximation with
/// Horner evaluation.
///
/// Reference: Abramowitz & Stegun (1964), *Handbook of Mathematical
/// Functions*, formula 26.2.17, p. 932.
///
/// # Accuracy
/// Maximum absolute error < 7.5 × 10⁻⁸.
fn standard_normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }

    // Use symmetry: Φ(-x) = 1 - Φ(x)
    let abs_x = x.abs();
    let k = 1.0 / (1.0 + 0.2316419 * abs_x);

    // φ(x) = (1/√(2π)) exp(-x²/2)
    let phi = FRAC_1_SQRT_2PI * (-0.5 * abs_x * abs_x).exp();

    // Horner evaluation of the polynomial
    let poly = k
        * (0.319381530
            + k * (-0.356563782 + k * (1.781477937 + k * (-1.821255978 + k * 1.330274429))));

    let cdf_abs = 1.0 - phi * poly;

    if x >= 0.0 {
        cdf_abs
    } else {
        1.0 - cdf_abs
    }
}

// ============================================================================
// Regularized Lower Incomplete Gamma
// ============================================================================

/// Regularized lower incomplete gamma P(a, x).
///
/// Uses series expansion for `x < a + 1`, continued fraction otherwise.
///
/// Reference: Press et al. (2007), *Numerical Recipes*, 3rd ed., §6.2.
fn regularized_lower_gamma(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x < a + 1.0 {
        gamma_series(a, x)
    } else {
        1.0 - gamma_cf(a, x)
    }
}

/// Series expansion for the regularized lower incomplete gamma.
fn gamma_series(a: f64, x: f64) -> f64 {
    let mut term = 1.0 / a;
    let mut sum = term;
    let mut ap = a;
    for _ in 0..200 {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * 1e-14 {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

/// Continued fraction for the upper incomplete gamma Q(a, x) = 1 − P(a, x).
fn gamma_cf(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / 1e-30;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=200 {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < 1e-30 {
            d = 1e-30;
        }
        c = b + an / c;
        if c.abs() < 1e-30 {
            c = 1e-30;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < 1e-14 {
            break;
        }
    }
    h * (-x + a * x.ln() - ln_gamma(a)).exp()
}

/// Lanczos approximation of ln Γ(x).
///
/// Reference: Lanczos (1964), "A Precision Approximation of the Gamma
/// Function", *SIAM Journal on Numerical Analysis* 1(1).
///
/// # Accuracy
/// Relative error < 2 × 10⁻¹⁰ for x > 0.
fn ln_gamma(x: f64) -> f64 {
    // Lanczos coefficients (g = 7)
    #[allow(clippy::excessive_precision)]
    const COEFFICIENTS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;

    if x < 0.5 {
        // Reflection formula: Γ(x)·Γ(1−x) = π/sin(πx)
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFICIENTS[0];
    for (i, &c) in COEFFICIENTS[1..].iter().enumerate() {
        sum += c / (x + i as f64 + 1.0);
    }

    let t = x + G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

// ============================================================================
// Tests
// ============================================================================
