//! Capture-stochastic generation: random positions inside capture regions.
//!
//! The whole region file is filtered into memory first. Regions are then drawn
//! with replacement, so one region can contribute several output positions.

use super::{GenerationPolicy, PolicyStats};
use crate::bed::{read_candidate_regions, BedError, RegionRecord, Result};
use crate::config::VafRange;
use crate::interval::OutputInterval;
use crate::streaming::output::IntervalWriter;
use crate::streaming::source::LineSource;
use rand::Rng;
use std::io::Write;
use std::path::PathBuf;

/// Draws `count` regions uniformly with replacement and emits one uniformly
/// chosen base from each region's inclusive `[start, end]` span.
#[derive(Debug, Clone)]
pub struct CaptureStochastic {
    input: PathBuf,
    count: usize,
    vaf: Option<VafRange>,
}

impl CaptureStochastic {
    pub fn new(input: impl Into<PathBuf>, count: usize) -> Self {
        Self {
            input: input.into(),
            count,
            vaf: None,
        }
    }

    pub fn with_vaf(mut self, vaf: Option<VafRange>) -> Self {
        self.vaf = vaf;
        self
    }

    /// Load and filter every region of the input file.
    pub fn load_candidates(&self) -> Result<Vec<RegionRecord>> {
        let source = LineSource::open(&self.input)?;
        read_candidate_regions(source)
    }

    /// Emit intervals from an already loaded candidate list.
    pub fn generate_from<W: Write, R: Rng>(
        &self,
        candidates: &[RegionRecord],
        rng: &mut R,
        writer: &mut IntervalWriter<W>,
    ) -> Result<usize> {
        if candidates.len() < self.count {
            return Err(BedError::InsufficientRegions {
                requested: self.count,
                available: candidates.len(),
            });
        }

        for _ in 0..self.count {
            let region = &candidates[rng.gen_range(0..candidates.len())];
            let pos = rng.gen_range(region.start..=region.end);
            let vaf = self.vaf.map(|range| range.draw(rng));
            let interval = OutputInterval::single_base(region.chrom.as_str(), pos).with_vaf(vaf);
            writer.write_interval(&interval)?;
        }

        Ok(self.count)
    }
}

impl GenerationPolicy for CaptureStochastic {
    fn name(&self) -> &'static str {
        "stochastic"
    }

    fn generate<W: Write, R: Rng>(
        &self,
        rng: &mut R,
        writer: &mut IntervalWriter<W>,
    ) -> Result<PolicyStats> {
        let candidates = self.load_candidates()?;
        log::info!(
            "{}: {} candidate regions",
            self.input.display(),
            candidates.len()
        );

        let records = self.generate_from(&candidates, rng, writer)?;
        Ok(PolicyStats {
            records,
            candidates: candidates.len() as u64,
            attempts: 0,
        })
    }
}
