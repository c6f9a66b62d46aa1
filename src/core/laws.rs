//! Random process generators.
//!
//! Both laws implement [`Distribution<f64>`] so the engine can thread its one
//! seeded generator into every draw.

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::types::SimTime;

/// Uniform inter-arrival delays over `[min, max)`.
#[derive(Debug, Clone, Copy)]
pub struct UniformInterarrival {
    min: SimTime,
    max: SimTime,
    inner: Uniform<f64>,
}

impl UniformInterarrival {
    /// Bounds must satisfy `min < max`; the config validator checks this
    /// before the engine is built.
    pub fn new(min: SimTime, max: SimTime) -> Self {
        Self {
            min,
            max,
            inner: Uniform::new(min, max),
        }
    }

    pub fn bounds(&self) -> (SimTime, SimTime) {
        (self.min, self.max)
    }
}

impl Distribution<f64> for UniformInterarrival {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.inner.sample(rng)
    }
}

/// Exponential service durations drawn by inverse CDF: `-ln(1 - u) / rate`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialService {
    rate: f64,
}

impl ExponentialService {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Distribution<f64> for ExponentialService {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.rate <= 0.0 {
            return 0.0;
        }
        let u: f64 = rng.gen();
        -(1.0 - u).ln() / self.rate
    }
}
