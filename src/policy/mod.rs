//! Interval generation policies.
//!
//! Two strategies share one capability:
//! - [`CatalogGuided`] probes a variant catalog on disk and never holds more
//!   than the selected lines.
//! - [`CaptureStochastic`] loads every candidate capture region into memory and
//!   draws from it with replacement.

pub mod capture;
pub mod catalog;

pub use capture::CaptureStochastic;
pub use catalog::CatalogGuided;

use crate::bed::Result;
use crate::streaming::output::IntervalWriter;
use rand::Rng;
use std::io::Write;
use std::path::Path;

/// Statistics from one generation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PolicyStats {
    /// Output records written
    pub records: usize,
    /// Lines counted (catalog) or candidate regions loaded (capture)
    pub candidates: u64,
    /// Sampler probes; zero for the capture policy
    pub attempts: u64,
}

impl std::fmt::Display for PolicyStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records from {} candidates ({} probes)",
            self.records, self.candidates, self.attempts
        )
    }
}

/// A strategy that turns an input file into output intervals.
pub trait GenerationPolicy {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Generate and write intervals, drawing every random value from `rng`.
    fn generate<W: Write, R: Rng>(
        &self,
        rng: &mut R,
        writer: &mut IntervalWriter<W>,
    ) -> Result<PolicyStats>;
}

/// Policy chosen from the input file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Variant catalog (VCF, optionally gzipped)
    CatalogGuided,
    /// Capture regions (`.bed` or `.bed.gz`)
    CaptureStochastic,
}

impl PolicyKind {
    /// `.bed` and `.bed.gz` inputs are capture regions; everything else is a catalog.
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if name.ends_with(".bed") || name.ends_with(".bed.gz") {
            Self::CaptureStochastic
        } else {
            Self::CatalogGuided
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CatalogGuided => "guided",
            Self::CaptureStochastic => "stochastic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_detection() {
        assert_eq!(
            PolicyKind::detect(Path::new("probes.bed")),
            PolicyKind::CaptureStochastic
        );
        assert_eq!(
            PolicyKind::detect(Path::new("data/probes.bed.gz")),
            PolicyKind::CaptureStochastic
        );
        assert_eq!(
            PolicyKind::detect(Path::new("CosmicCodingMuts.vcf.gz")),
            PolicyKind::CatalogGuided
        );
        assert_eq!(
            PolicyKind::detect(Path::new("catalog.vcf")),
            PolicyKind::CatalogGuided
        );
        assert_eq!(
            PolicyKind::detect(Path::new("probes.BED")),
            PolicyKind::CatalogGuided
        );
    }

    #[test]
    fn test_stats_display() {
        let stats = PolicyStats {
            records: 3,
            candidates: 10,
            attempts: 7,
        };
        assert_eq!(stats.to_string(), "3 records from 10 candidates (7 probes)");
    }
}
