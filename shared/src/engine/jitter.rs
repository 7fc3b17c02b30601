//! Reproducible bounded noise.
//!
//! The forecaster perturbs its rule output slightly so consecutive months are
//! not perfectly flat. The perturbation is drawn from a generator seeded by a
//! SHA-256 digest of the inputs, so identical requests always produce
//! identical numbers.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::types::Location;

pub struct Jitter {
    rng: Option<StdRng>,
}

impl Jitter {
    /// Seed from an ordered list of key parts
    pub fn seeded(parts: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_bytes());
            hasher.update([0x1f]);
        }
        let digest = hasher.finalize();
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest[..8]);
        Self {
            rng: Some(StdRng::seed_from_u64(u64::from_le_bytes(seed))),
        }
    }

    /// Noise stream for one forecast month of one run
    pub fn for_month(location: &Location, year: i32, month: u32, issued_on: NaiveDate) -> Self {
        let period = format!("{:04}-{:02}", year, month);
        let run = issued_on.to_string();
        Self::seeded(&["month", &location.key(), &period, &run])
    }

    /// Noise stream for a single-day prediction
    pub fn for_day(location: &Location, date: NaiveDate) -> Self {
        let day = date.to_string();
        Self::seeded(&["day", &location.key(), &day])
    }

    /// A jitter source that always returns the neutral value
    pub fn none() -> Self {
        Self { rng: None }
    }

    /// Uniform additive offset in [-bound, bound]
    pub fn offset(&mut self, bound: f64) -> f64 {
        match self.rng.as_mut() {
            Some(rng) if bound > 0.0 => rng.gen_range(-bound..=bound),
            _ => 0.0,
        }
    }

    /// Uniform multiplicative factor in [low, high]
    pub fn factor(&mut self, low: f64, high: f64) -> f64 {
        match self.rng.as_mut() {
            Some(rng) if high > low => rng.gen_range(low..=high),
            _ => 1.0,
        }
    }
}
