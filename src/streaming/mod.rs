//! Streaming I/O shared by the sampling policies and commands.
//!
//! - Plain or gzip-compressed line sources with seek support
//! - Bounded-memory line counting
//! - Byte-level field parsing
//! - Interval output with atomic file commit

pub mod counter;
pub mod output;
pub mod parsing;
pub mod source;

pub use counter::{count_lines, tally_lines, LineTally};
pub use output::{format_float, IntervalWriter, OutputFile};
pub use parsing::{parse_u64_fast, should_skip_line};
pub use source::LineSource;
