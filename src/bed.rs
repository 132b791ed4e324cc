//! Capture-region BED records and the crate error type.

use crate::contig::is_valid_contig;
use crate::streaming::parsing::{parse_u64_fast, should_skip_line};
use std::io::{self, BufRead};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while sampling, reading or writing records.
#[derive(Error, Debug)]
pub enum BedError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error(
        "Sampling exhausted: found {found} of {requested} eligible records after {attempts} attempts"
    )]
    SamplingExhausted {
        requested: usize,
        found: usize,
        attempts: u64,
    },

    #[error("Not enough regions available for the requested selection: {available} candidates, {requested} requested")]
    InsufficientRegions { requested: usize, available: usize },

    #[error("Cannot write output '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid VAF range: low ({low}) must be <= high ({high})")]
    InvalidVafRange { low: f64, high: f64 },
}

pub type Result<T> = std::result::Result<T, BedError>;

/// A capture region with an inclusive `[start, end]` span as read from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRecord {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl RegionRecord {
    /// Parse a region line, returning `None` for anything that cannot serve as a
    /// candidate: comments, track lines, fewer than 3 fields, non-numeric
    /// coordinates, `end < start`, an end of `u64::MAX` (a base drawn there has
    /// no representable exclusive end), or a rejected contig.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if should_skip_line(line.as_bytes()) {
            return None;
        }

        let mut fields = line.split_whitespace();
        let chrom = fields.next()?;
        if !is_valid_contig(chrom) {
            return None;
        }
        let start = parse_u64_fast(fields.next()?.as_bytes())?;
        let end = parse_u64_fast(fields.next()?.as_bytes())?;
        if end < start || end == u64::MAX {
            return None;
        }

        Some(Self {
            chrom: chrom.to_string(),
            start,
            end,
        })
    }
}

/// Read every candidate region from `reader` into memory.
///
/// Lines that do not parse are dropped without error; only I/O failures surface.
pub fn read_candidate_regions<R: BufRead>(reader: R) -> Result<Vec<RegionRecord>> {
    let mut regions = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match RegionRecord::parse(&line) {
            Some(region) => regions.push(region),
            None => log::trace!("skipping region line {}: {:?}", idx + 1, line),
        }
    }
    Ok(regions)
}

/// Parse candidate regions from a string (useful for testing).
pub fn parse_regions(content: &str) -> Result<Vec<RegionRecord>> {
    read_candidate_regions(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region() {
        let region = RegionRecord::parse("chr1\t100\t200\tprobe_1\n").unwrap();
        assert_eq!(region.chrom, "chr1");
        assert_eq!(region.start, 100);
        assert_eq!(region.end, 200);
    }

    #[test]
    fn test_skip_comments_and_track_lines() {
        let content = "# comment\ntrack name=probes\nbrowser position chr1:1-10\nchr1\t100\t200\n";
        let regions = parse_regions(content).unwrap();
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn test_rejects_alternate_contigs() {
        let content = "chr1\t100\t200\nchr1_KI270706v1_random\t10\t20\nchrUn_GL000195v1\t1\t5\nchr2\t5\t6\n";
        let regions = parse_regions(content).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].chrom, "chr2");
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let content = "chr1\t100\nchr1\tabc\t200\nchr1\t300\t200\n\nchr3\t1\t2\n";
        let regions = parse_regions(content).unwrap();
        assert_eq!(regions, vec![RegionRecord {
            chrom: "chr3".to_string(),
            start: 1,
            end: 2
        }]);
    }

    #[test]
    fn test_rejects_end_at_coordinate_limit() {
        assert!(RegionRecord::parse("chr1\t100\t18446744073709551615").is_none());
        assert!(RegionRecord::parse("chr1\t18446744073709551615\t18446744073709551615").is_none());

        let region = RegionRecord::parse("chr1\t100\t18446744073709551614").unwrap();
        assert_eq!(region.end, u64::MAX - 1);
    }

    #[test]
    fn test_error_messages() {
        let err = BedError::InsufficientRegions {
            requested: 5,
            available: 3,
        };
        assert!(err.to_string().contains("Not enough regions"));

        let err = BedError::SamplingExhausted {
            requested: 10,
            found: 2,
            attempts: 100,
        };
        assert!(err.to_string().contains("found 2 of 10"));
    }
}
