//! Interval output.
//!
//! Records are newline-separated, not newline-terminated: the last record is
//! not followed by a line break. Integers go through itoa and floats through
//! [`format_float`], which prints `0.05` and `0.1` as written.

use crate::bed::{BedError, Result};
use crate::interval::OutputInterval;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Buffer size for IntervalWriter (1MB default).
const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Tab-separated interval writer.
pub struct IntervalWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    written: usize,
    /// Reported in write errors
    destination: PathBuf,
}

impl<W: Write> IntervalWriter<W> {
    /// Create a new IntervalWriter with default 1MB buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    /// Create a new IntervalWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            written: 0,
            destination: PathBuf::from("-"),
        }
    }

    /// Name the destination reported in write errors.
    pub fn with_destination<P: AsRef<Path>>(mut self, destination: P) -> Self {
        self.destination = destination.as_ref().to_path_buf();
        self
    }

    /// Write one record, preceded by a newline unless it is the first.
    pub fn write_interval(&mut self, interval: &OutputInterval) -> Result<()> {
        self.write_fields(interval).map_err(|source| BedError::Write {
            path: self.destination.clone(),
            source,
        })
    }

    fn write_fields(&mut self, interval: &OutputInterval) -> io::Result<()> {
        if self.written > 0 {
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(interval.chrom.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(interval.start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(interval.end).as_bytes())?;
        if let Some(vaf) = interval.vaf {
            self.writer.write_all(b"\t")?;
            self.writer.write_all(format_float(vaf).as_bytes())?;
        }
        if let Some(allele) = &interval.allele {
            self.writer.write_all(b"\t")?;
            self.writer.write_all(allele.as_bytes())?;
        }
        self.written += 1;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        let destination = self.destination;
        self.writer.into_inner().map_err(|e| BedError::Write {
            path: destination,
            source: e.into_error(),
        })
    }
}

impl IntervalWriter<OutputFile> {
    /// Writer over a pending output file, reporting errors against its path.
    pub fn for_file(output: OutputFile) -> Self {
        let destination = output.path().to_path_buf();
        Self::new(output).with_destination(destination)
    }
}

/// Shortest round-trip text for `value`.
///
/// Positional when the leading digit's decimal exponent is in `-4..16`,
/// otherwise scientific with a signed exponent of at least two digits
/// (`1e-05`, `1.5e+16`). Whole numbers keep a `.0` suffix.
pub fn format_float(value: f64) -> String {
    let mut buf = ryu::Buffer::new();
    if !value.is_finite() {
        return buf.format(value).to_string();
    }
    let text = buf.format_finite(value);
    let (sign, text) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (mantissa, exponent) = match text.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (text, 0),
    };

    let point = mantissa.find('.').unwrap_or(mantissa.len()) as i32;
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let leading = digits.len() - digits.trim_start_matches('0').len();
    let digits = digits.trim_matches('0');
    if digits.is_empty() {
        return format!("{}0.0", sign);
    }
    // Decimal exponent of the first significant digit
    let magnitude = point - 1 - leading as i32 + exponent;

    if (-4..16).contains(&magnitude) {
        if magnitude < 0 {
            let zeros = "0".repeat((-magnitude - 1) as usize);
            format!("{}0.{}{}", sign, zeros, digits)
        } else {
            let int_len = magnitude as usize + 1;
            if digits.len() > int_len {
                format!("{}{}.{}", sign, &digits[..int_len], &digits[int_len..])
            } else {
                let zeros = "0".repeat(int_len - digits.len());
                format!("{}{}{}.0", sign, digits, zeros)
            }
        }
    } else {
        let exp_sign = if magnitude < 0 { '-' } else { '+' };
        let (head, tail) = digits.split_at(1);
        let fraction = if tail.is_empty() {
            String::new()
        } else {
            format!(".{}", tail)
        };
        format!("{}{}{}e{}{:02}", sign, head, fraction, exp_sign, magnitude.abs())
    }
}

/// Output destination that only appears at its final path once committed.
///
/// Created as a temporary file beside the destination, so an unwritable
/// directory is reported before any sampling work. Dropping it without
/// [`OutputFile::commit`] removes the temporary file.
pub struct OutputFile {
    file: NamedTempFile,
    path: PathBuf,
}

impl OutputFile {
    /// Open a pending output for `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".bed4sv-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o644));
        }

        let file = builder
            .tempfile_in(&dir)
            .map_err(|source| BedError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(Self { file, path })
    }

    /// Final destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the written file to its destination, replacing any existing file.
    pub fn commit(self) -> Result<()> {
        let path = self.path;
        self.file
            .persist(&path)
            .map_err(|e| BedError::Write {
                path: path.clone(),
                source: e.error,
            })?;
        Ok(())
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
