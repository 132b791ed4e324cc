//! Run configuration for the `sample` command.

use crate::bed::{BedError, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

/// Block size used by the line counter (16 MiB).
pub const COUNT_BLOCK_SIZE: usize = 4096 * 4096;

/// Floor for the sampler's attempt budget.
pub const MIN_ATTEMPTS: u64 = 10_000;

/// Attempts allowed per requested record before sampling gives up.
pub const ATTEMPTS_PER_RECORD: u64 = 1_000;

/// Default attempt budget for `count` records.
pub fn default_max_attempts(count: usize) -> u64 {
    (count as u64)
        .saturating_mul(ATTEMPTS_PER_RECORD)
        .max(MIN_ATTEMPTS)
}

/// Upper bound of the byte offsets the catalog sampler probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeSpan {
    /// The counted number of lines, which reaches only a prefix of the file.
    /// Reproduces the selections of earlier BED4SV releases.
    #[default]
    Lines,
    /// The uncompressed length of the file.
    Bytes,
}

impl ProbeSpan {
    /// Parse span from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lines" | "line" => Some(Self::Lines),
            "bytes" | "byte" => Some(Self::Bytes),
            _ => None,
        }
    }
}

/// Closed range `[low, high]` of target allele frequencies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VafRange {
    pub low: f64,
    pub high: f64,
}

impl VafRange {
    /// Create a range, rejecting `low > high` and non-finite bounds.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(BedError::InvalidVafRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// Build a range only when both bounds are supplied.
    pub fn from_bounds(low: Option<f64>, high: Option<f64>) -> Result<Option<Self>> {
        match (low, high) {
            (Some(low), Some(high)) => Self::new(low, high).map(Some),
            _ => Ok(None),
        }
    }

    /// Draw a uniform frequency in the range, rounded to 3 decimals.
    ///
    /// Rounding never carries the value outside the range; bounds with more
    /// than 3 decimals are returned as-is when the rounded draw would cross them.
    #[inline]
    pub fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        let raw = rng.gen_range(self.low..=self.high);
        round_to(raw, 3).clamp(self.low, self.high)
    }
}

/// Round `value` to `digits` decimal places, ties to even.
#[inline]
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round_ties_even() / scale
}

/// Configuration for a sampling run.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub count: usize,
    pub seed: Option<u64>,
    pub vaf: Option<VafRange>,
    pub max_attempts: u64,
    pub probe_span: ProbeSpan,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::from("output.bed"),
            count: 0,
            seed: None,
            vaf: None,
            max_attempts: MIN_ATTEMPTS,
            probe_span: ProbeSpan::Lines,
        }
    }
}

impl SampleConfig {
    /// Output path with the `.bed` extension the simulator expects.
    pub fn output_path(&self) -> PathBuf {
        with_bed_extension(&self.output)
    }

    /// Build the run's generator: seeded if a seed was given, otherwise from OS entropy.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    /// Reject configurations that cannot be run.
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(BedError::InvalidFormat("input path is empty".to_string()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(BedError::InvalidFormat("output path is empty".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(BedError::InvalidFormat(
                "max attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Append `.bed` unless the path already ends with it.
pub fn with_bed_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "bed") {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".bed");
        PathBuf::from(name)
    }
}
