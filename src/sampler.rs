//! Random record selection by byte-offset probing.
//!
//! Each probe draws an offset in `[0, total_lines)`, seeks there as a *byte*
//! position, drops the partial line under the cursor and tests the next full
//! line. Nothing but the accepted lines is kept in memory, so the input may be
//! arbitrarily large. Probes are independent: a rejected offset can be drawn
//! again.
//!
//! Treating a line count as a byte range means the probed region covers only
//! a prefix of the file, and a line is chosen with probability proportional to
//! the length of the line before it. Output parity with existing benchmark
//! sets depends on this distribution, so it is reproduced unchanged.

use crate::bed::{BedError, Result};
use crate::vcf::is_eligible_catalog_line;
use rand::Rng;
use rustc_hash::FxHashSet;
use std::io::{BufRead, Seek, SeekFrom};

/// Unique selected lines in the order they were accepted.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    lines: Vec<String>,
    seen: FxHashSet<String>,
}

impl Selection {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity),
            seen: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert a line; returns `false` if an identical line is already present.
    pub fn insert(&mut self, line: String) -> bool {
        if self.seen.contains(&line) {
            return false;
        }
        self.seen.insert(line.clone());
        self.lines.push(line);
        true
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

/// Result of a selection run.
#[derive(Debug, Clone)]
pub struct SelectOutcome {
    pub selection: Selection,
    /// Probes performed, including rejected and duplicate ones
    pub attempts: u64,
}

/// Bounded-attempt random catalog line selector.
///
/// A probed line is kept when [`is_eligible_catalog_line`] accepts it.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    max_attempts: u64,
}

impl RandomSelector {
    pub fn new(max_attempts: u64) -> Self {
        Self { max_attempts }
    }

    /// Select `required` distinct eligible lines from `source`.
    ///
    /// `total_lines` bounds the probed offsets. Fails with
    /// [`BedError::SamplingExhausted`] once `max_attempts` probes have not
    /// produced enough distinct lines.
    pub fn select<S, R>(
        &self,
        source: &mut S,
        total_lines: u64,
        required: usize,
        rng: &mut R,
    ) -> Result<SelectOutcome>
    where
        S: BufRead + Seek,
        R: Rng,
    {
        let mut selection = Selection::with_capacity(required);
        let mut attempts = 0u64;

        if required == 0 {
            return Ok(SelectOutcome {
                selection,
                attempts,
            });
        }
        if total_lines == 0 {
            return Err(BedError::SamplingExhausted {
                requested: required,
                found: 0,
                attempts,
            });
        }

        let mut buf = Vec::with_capacity(1024);
        while selection.len() < required {
            if attempts >= self.max_attempts {
                return Err(BedError::SamplingExhausted {
                    requested: required,
                    found: selection.len(),
                    attempts,
                });
            }
            attempts += 1;

            let offset = rng.gen_range(0..total_lines);
            match self.probe(source, offset, &mut buf)? {
                Some(line) => {
                    if !selection.insert(line) {
                        log::trace!("offset {}: duplicate record", offset);
                    }
                }
                None => log::trace!("offset {}: no eligible record", offset),
            }
        }

        log::debug!(
            "selected {} records in {} probes ({} lines counted)",
            selection.len(),
            attempts,
            total_lines
        );
        Ok(SelectOutcome {
            selection,
            attempts,
        })
    }

    /// Seek to `offset`, skip the partial line there and test the next one.
    fn probe<S: BufRead + Seek>(
        &self,
        source: &mut S,
        offset: u64,
        buf: &mut Vec<u8>,
    ) -> Result<Option<String>> {
        source.seek(SeekFrom::Start(offset))?;
        buf.clear();
        source.read_until(b'\n', buf)?;

        buf.clear();
        if source.read_until(b'\n', buf)? == 0 {
            return Ok(None);
        }

        let line = buf.trim_ascii();
        if !is_eligible_catalog_line(line) {
            return Ok(None);
        }
        Ok(std::str::from_utf8(line).ok().map(str::to_string))
    }
}
