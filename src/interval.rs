//! Single-base output intervals handed to the mutation simulator.

/// A half-open single-base interval `[start, end)` with optional annotations.
///
/// Written as `chrom start end [vaf] [allele]`, tab-separated, by
/// [`IntervalWriter`](crate::streaming::IntervalWriter).
#[derive(Debug, Clone, PartialEq)]
pub struct OutputInterval {
    pub chrom: String,
    /// 0-based start position
    pub start: u64,
    /// Exclusive end, always `start + 1`
    pub end: u64,
    /// Target variant allele frequency, rounded to 3 decimals
    pub vaf: Option<f64>,
    /// Alternate allele, present for catalog-guided records
    pub allele: Option<String>,
}

impl OutputInterval {
    /// Create a 1bp interval at 0-based `start`.
    #[inline]
    pub fn single_base(chrom: impl Into<String>, start: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end: start + 1,
            vaf: None,
            allele: None,
        }
    }

    /// Attach an allele frequency.
    #[inline]
    pub fn with_vaf(mut self, vaf: Option<f64>) -> Self {
        self.vaf = vaf;
        self
    }

    /// Attach an alternate allele.
    #[inline]
    pub fn with_allele(mut self, allele: impl Into<String>) -> Self {
        self.allele = Some(allele.into());
        self
    }

    /// Length in bases.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
