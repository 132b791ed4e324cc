//! Seekable line sources over plain or gzip-compressed files.
//!
//! A compressed stream cannot be seeked directly. Forward seeks decompress and
//! discard; backward seeks reopen the file and decompress from the start. Both
//! variants report offsets in uncompressed bytes.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::bed::Result;

/// Read buffer size for line sources.
const BUF_SIZE: usize = 64 * 1024;

/// Returns `true` if `path` names a gzip-compressed file.
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// A byte stream supporting line iteration and seeking to an arbitrary offset.
pub enum LineSource {
    Plain(BufReader<File>),
    Gzip(GzipSource),
}

impl LineSource {
    /// Open `path`, decompressing transparently if it ends in `.gz`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if is_gzip_path(path) {
            Ok(Self::Gzip(GzipSource::open(path)?))
        } else {
            let file = File::open(path)?;
            Ok(Self::Plain(BufReader::with_capacity(BUF_SIZE, file)))
        }
    }
}

impl Read for LineSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(reader) => reader.read(buf),
            Self::Gzip(reader) => reader.read(buf),
        }
    }
}

impl BufRead for LineSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Self::Plain(reader) => reader.fill_buf(),
            Self::Gzip(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::Plain(reader) => reader.consume(amt),
            Self::Gzip(reader) => reader.consume(amt),
        }
    }
}

impl Seek for LineSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::Plain(reader) => reader.seek(pos),
            Self::Gzip(reader) => reader.seek(pos),
        }
    }
}

/// Gzip stream that tracks its uncompressed position so it can emulate seeking.
pub struct GzipSource {
    path: PathBuf,
    reader: BufReader<MultiGzDecoder<File>>,
    position: u64,
}

impl GzipSource {
    fn open(path: &Path) -> io::Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            reader: Self::decoder(path)?,
            position: 0,
        })
    }

    fn decoder(path: &Path) -> io::Result<BufReader<MultiGzDecoder<File>>> {
        let file = File::open(path)?;
        Ok(BufReader::with_capacity(BUF_SIZE, MultiGzDecoder::new(file)))
    }

    fn rewind_to_start(&mut self) -> io::Result<()> {
        self.reader = Self::decoder(&self.path)?;
        self.position = 0;
        Ok(())
    }
}

impl Read for GzipSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl BufRead for GzipSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
        self.position += amt as u64;
    }
}

impl Seek for GzipSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "invalid seek to a negative or overflowing position",
                )
            })?,
            SeekFrom::End(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "cannot seek relative to the end of a gzip stream",
                ))
            }
        };

        if target < self.position {
            self.rewind_to_start()?;
        }

        // Stops early at end of stream, leaving the position at EOF.
        let remaining = target - self.position;
        let skipped = io::copy(&mut (&mut self.reader).take(remaining), &mut io::sink())?;
        self.position += skipped;
        Ok(self.position)
    }
}
