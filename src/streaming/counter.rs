//! Bounded-memory line counting.
//!
//! The stream is read in fixed-size blocks without regard to line boundaries.
//! A line that straddles two blocks is counted once per block it touches; the
//! resulting count is an upper bound used only to size the byte-offset range
//! the sampler probes, so the approximation is kept as is.

use memchr::memchr_iter;
use std::io::{self, Read};
use std::path::Path;

use crate::bed::Result;
use crate::config::COUNT_BLOCK_SIZE;
use crate::streaming::parsing::is_meta_line;
use crate::streaming::source::LineSource;

/// Line and byte totals of one scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineTally {
    /// Lines not starting with `##`
    pub lines: u64,
    /// Uncompressed bytes read
    pub bytes: u64,
}

/// Count the lines of `path` that do not begin with `##`.
pub fn count_lines<P: AsRef<Path>>(path: P) -> Result<u64> {
    Ok(tally_lines(path)?.lines)
}

/// Scan `path` once for its line and byte totals.
pub fn tally_lines<P: AsRef<Path>>(path: P) -> Result<LineTally> {
    let source = LineSource::open(path)?;
    Ok(tally_lines_in(source, COUNT_BLOCK_SIZE)?)
}

/// Count non-`##` lines of `reader`, scanning `block_size` bytes at a time.
pub fn count_lines_in<R: Read>(reader: R, block_size: usize) -> io::Result<u64> {
    Ok(tally_lines_in(reader, block_size)?.lines)
}

/// Line and byte totals of `reader`, scanning `block_size` bytes at a time.
pub fn tally_lines_in<R: Read>(mut reader: R, block_size: usize) -> io::Result<LineTally> {
    let mut block = vec![0u8; block_size.max(1)];
    let mut tally = LineTally::default();

    loop {
        let n = read_block(&mut reader, &mut block)?;
        if n == 0 {
            break;
        }
        tally.lines += count_block(&block[..n]);
        tally.bytes += n as u64;
    }

    Ok(tally)
}

/// Fill `buf` as far as the stream allows; returns bytes read (0 at EOF).
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Count newline-separated segments of one block that are not `##` lines.
/// The empty segment after a block's final newline is not a line.
fn count_block(block: &[u8]) -> u64 {
    let mut count = 0;
    let mut start = 0;

    for nl in memchr_iter(b'\n', block) {
        if !is_meta_line(&block[start..nl]) {
            count += 1;
        }
        start = nl + 1;
    }
    if start < block.len() && !is_meta_line(&block[start..]) {
        count += 1;
    }

    count
}
