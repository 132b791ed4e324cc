//! Reference contig lengths for VCF headers.
//!
//! Either the built-in GRCh38 primary assembly or a two-column `.genome` file
//! (`chrom<TAB>length`).

use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::bed::{BedError, Result};

/// GRCh38 primary contigs in header order.
const HG38_CONTIGS: [(&str, u64); 25] = [
    ("chr1", 248_956_422),
    ("chr2", 242_193_529),
    ("chr3", 198_295_559),
    ("chr4", 190_214_555),
    ("chr5", 181_538_259),
    ("chr6", 170_805_979),
    ("chr7", 159_345_973),
    ("chr8", 145_138_636),
    ("chr9", 138_394_717),
    ("chr10", 133_797_422),
    ("chr11", 135_086_622),
    ("chr12", 133_275_309),
    ("chr13", 114_364_328),
    ("chr14", 107_043_718),
    ("chr15", 101_991_189),
    ("chr16", 90_338_345),
    ("chr17", 83_257_441),
    ("chr18", 80_373_285),
    ("chr19", 58_617_616),
    ("chr20", 64_444_167),
    ("chr21", 46_709_983),
    ("chr22", 50_818_468),
    ("chrX", 156_040_895),
    ("chrY", 57_227_415),
    ("chrM", 16_569),
];

/// Ordered contig lengths. Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    contigs: Vec<(String, u64)>,
    index: FxHashMap<String, usize>,
}

impl Genome {
    pub fn new() -> Self {
        Self::default()
    }

    /// The GRCh38 primary assembly: chr1-22, chrX, chrY and chrM.
    pub fn hg38() -> Self {
        let mut genome = Self::new();
        for (name, length) in HG38_CONTIGS {
            genome.insert(name, length);
        }
        genome
    }

    /// Load contig lengths from a `.genome` file.
    /// Blank lines and `#` comments are ignored; a repeated contig keeps its
    /// first position and takes the last length.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut genome = Self::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (name, length) = match (fields.next(), fields.next()) {
                (Some(name), Some(length)) => (name, length),
                _ => {
                    return Err(BedError::Parse {
                        line: idx + 1,
                        message: "genome file requires two columns: chrom and length".to_string(),
                    })
                }
            };
            let length: u64 = length.parse().map_err(|_| BedError::Parse {
                line: idx + 1,
                message: format!("invalid contig length: {}", length),
            })?;
            genome.insert(name, length);
        }

        Ok(genome)
    }

    /// Add or update a contig.
    pub fn insert(&mut self, name: impl Into<String>, length: u64) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => self.contigs[i].1 = length,
            None => {
                self.index.insert(name.clone(), self.contigs.len());
                self.contigs.push((name, length));
            }
        }
    }

    #[inline]
    pub fn length(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|&i| self.contigs[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Contigs with their lengths, in order.
    pub fn contigs(&self) -> impl Iterator<Item = (&str, u64)> {
        self.contigs.iter().map(|(name, len)| (name.as_str(), *len))
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_hg38() {
        let genome = Genome::hg38();
        assert_eq!(genome.len(), 25);
        assert_eq!(genome.length("chr1"), Some(248_956_422));
        assert_eq!(genome.length("chrM"), Some(16_569));
        assert_eq!(genome.length("chr1_KI270706v1_random"), None);

        let names: Vec<&str> = genome.contigs().map(|(n, _)| n).collect();
        assert_eq!(names[0], "chr1");
        assert_eq!(names[22..], ["chrX", "chrY", "chrM"]);
    }

    #[test]
    fn test_genome_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t1000000").unwrap();
        writeln!(file, "# comment line").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "chr2 500000").unwrap();
        writeln!(file, "chr1\t2000").unwrap();
        file.flush().unwrap();

        let genome = Genome::from_file(file.path()).unwrap();
        assert_eq!(genome.len(), 2);
        assert_eq!(genome.length("chr1"), Some(2000));
        let names: Vec<&str> = genome.contigs().map(|(n, _)| n).collect();
        assert_eq!(names, ["chr1", "chr2"]);
    }

    #[test]
    fn test_genome_file_errors() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t1000").unwrap();
        writeln!(file, "chr2").unwrap();
        file.flush().unwrap();
        assert!(matches!(
            Genome::from_file(file.path()),
            Err(BedError::Parse { line: 2, .. })
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\tlong").unwrap();
        file.flush().unwrap();
        assert!(matches!(
            Genome::from_file(file.path()),
            Err(BedError::Parse { line: 1, .. })
        ));
    }
}
