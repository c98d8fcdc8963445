//! Randomized values used to keep virtual users and iterations from colliding
//!
//! All randomness flows through a [`RandomSource`], so tests can swap in a
//! seeded or scripted source and assert exact values.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const AIRLINE_CODES: [&str; 4] = ["BA", "UA", "LH", "AF"];

/// Source of uniform random integers
pub trait RandomSource: Send {
    /// Uniform integer in `0..upper`. `upper` is always greater than zero.
    fn next_below(&mut self, upper: u32) -> u32;
}

/// [`RandomSource`] backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn next_below(&mut self, upper: u32) -> u32 {
        self.0.random_range(0..upper)
    }
}

/// Replays a fixed list of values (each reduced modulo the requested bound), cycling at the end
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<u32>,
    position: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "SequenceSource needs at least one value");
        Self {
            values,
            position: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_below(&mut self, upper: u32) -> u32 {
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value % upper
    }
}

/// Generates the strings, ids and codes the scenarios send
pub struct ValueGenerator {
    source: Box<dyn RandomSource>,
}

impl ValueGenerator {
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(RngSource(StdRng::from_os_rng()))
    }

    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(RngSource(StdRng::seed_from_u64(seed)))
    }

    /// Integer in `low..=high`
    pub fn int_between(&mut self, low: u32, high: u32) -> u32 {
        debug_assert!(low <= high);
        low + self.source.next_below(high - low + 1)
    }

    /// `length` lowercase ASCII letters
    pub fn string(&mut self, length: usize) -> String {
        (0..length)
            .map(|_| LOWERCASE[self.source.next_below(LOWERCASE.len() as u32) as usize] as char)
            .collect()
    }

    /// `xxxxx.xxxxx@<domain>`
    pub fn email(&mut self, domain: &str) -> String {
        format!("{}.{}@{}", self.string(5), self.string(5), domain)
    }

    /// Six letters followed by four digits (1000-9999)
    pub fn password(&mut self) -> String {
        let letters = self.string(6);
        format!("{}{}", letters, self.int_between(1000, 9999))
    }

    /// `org_` plus six letters; used for both the name and the schema name
    pub fn organization_name(&mut self) -> String {
        format!("org_{}", self.string(6))
    }

    /// Random (version 4) UUID
    pub fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        for byte in bytes.iter_mut() {
            *byte = self.source.next_below(256) as u8;
        }
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    /// Aircraft registration: `N` followed by five digits (10000-99999)
    pub fn registration(&mut self) -> String {
        format!("N{}", self.int_between(10_000, 99_999))
    }

    /// Airline code plus a number in 100-9099, e.g. `LH4521`
    pub fn flight_number(&mut self) -> String {
        let code = AIRLINE_CODES[self.source.next_below(AIRLINE_CODES.len() as u32) as usize];
        format!("{}{}", code, self.int_between(100, 9_099))
    }
}

impl std::fmt::Debug for ValueGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueGenerator").finish_non_exhaustive()
    }
}
