//! Catalog-guided generation: known mutation sites sampled from a VCF.

use super::{GenerationPolicy, PolicyStats};
use crate::bed::{BedError, Result};
use crate::config::{ProbeSpan, VafRange};
use crate::sampler::RandomSelector;
use crate::streaming::counter::tally_lines;
use crate::streaming::output::IntervalWriter;
use crate::streaming::source::LineSource;
use crate::vcf::CatalogRecord;
use rand::Rng;
use std::io::Write;
use std::path::PathBuf;

/// Samples distinct single-base catalog records and emits `chr{CHROM}`
/// intervals `[POS-1, POS)` annotated with an optional VAF and the ALT base.
#[derive(Debug, Clone)]
pub struct CatalogGuided {
    input: PathBuf,
    count: usize,
    vaf: Option<VafRange>,
    max_attempts: u64,
    probe_span: ProbeSpan,
}

impl CatalogGuided {
    pub fn new(input: impl Into<PathBuf>, count: usize) -> Self {
        Self {
            input: input.into(),
            count,
            vaf: None,
            max_attempts: crate::config::default_max_attempts(count),
            probe_span: ProbeSpan::Lines,
        }
    }

    pub fn with_vaf(mut self, vaf: Option<VafRange>) -> Self {
        self.vaf = vaf;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_probe_span(mut self, probe_span: ProbeSpan) -> Self {
        self.probe_span = probe_span;
        self
    }
}

impl GenerationPolicy for CatalogGuided {
    fn name(&self) -> &'static str {
        "guided"
    }

    fn generate<W: Write, R: Rng>(
        &self,
        rng: &mut R,
        writer: &mut IntervalWriter<W>,
    ) -> Result<PolicyStats> {
        let tally = tally_lines(&self.input)?;
        log::info!(
            "{}: {} non-header lines, {} bytes",
            self.input.display(),
            tally.lines,
            tally.bytes
        );
        let span = match self.probe_span {
            ProbeSpan::Lines => tally.lines,
            ProbeSpan::Bytes => tally.bytes,
        };

        let mut source = LineSource::open(&self.input)?;
        let selector = RandomSelector::new(self.max_attempts);
        let outcome = selector.select(&mut source, span, self.count, rng)?;
        drop(source);

        for line in outcome.selection.iter() {
            let record = CatalogRecord::parse(line).ok_or_else(|| {
                BedError::InvalidFormat(format!("selected catalog line did not parse: {}", line))
            })?;
            let vaf = self.vaf.map(|range| range.draw(rng));
            writer.write_interval(&record.to_interval(vaf))?;
        }

        Ok(PolicyStats {
            records: outcome.selection.len(),
            candidates: tally.lines,
            attempts: outcome.attempts,
        })
    }
}
