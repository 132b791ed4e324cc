//! Assemble simulator output into benchmark VCFs.
//!
//! One combined VCF plus one VCF per input-VAF bin, so variant callers can be
//! scored separately at low and high allele frequencies.

use crate::bed::{BedError, Result};
use crate::genome::Genome;
use crate::streaming::output::{format_float, OutputFile};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Minimum number of columns in a simulator output row.
pub const MIN_FIELDS: usize = 9;

/// Input-VAF bins with their file suffixes. Upper bounds are exclusive.
pub const VAF_BINS: [(&str, f64); 4] = [
    ("AF_0_to_002", 0.02),
    ("AF_002_to_005", 0.05),
    ("AF_005_to_01", 0.1),
    ("AF_01_to_1", f64::INFINITY),
];

const INFO_HEADERS: [&str; 4] = [
    "##INFO=<ID=iAF,Number=1,Type=Float,Description=\"Input allele frequency\">",
    "##INFO=<ID=iDP,Number=1,Type=Integer,Description=\"Input depth\">",
    "##INFO=<ID=AF,Number=1,Type=Float,Description=\"Output allele frequency\">",
    "##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Output depth\">",
];

/// One row of simulator output.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedVariant {
    pub chrom: String,
    pub pos: String,
    pub input_vaf: f64,
    pub input_depth: String,
    pub output_vaf: String,
    pub output_depth: String,
    pub reference: String,
    pub alternate: String,
}

impl SimulatedVariant {
    /// Parse a whitespace-separated row; `line_num` is reported in errors.
    pub fn parse(line: &str, line_num: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            return Err(BedError::Parse {
                line: line_num,
                message: format!(
                    "expected at least {} columns, found {}",
                    MIN_FIELDS,
                    fields.len()
                ),
            });
        }
        let input_vaf: f64 = fields[3].parse().map_err(|_| BedError::Parse {
            line: line_num,
            message: format!("invalid input VAF: {}", fields[3]),
        })?;

        Ok(Self {
            chrom: fields[0].to_string(),
            pos: fields[2].to_string(),
            input_vaf,
            input_depth: fields[4].to_string(),
            output_vaf: fields[5].to_string(),
            output_depth: fields[6].to_string(),
            reference: fields[7].to_string(),
            alternate: fields[8].to_string(),
        })
    }

    /// Index into [`VAF_BINS`]; `None` only for NaN.
    pub fn bin(&self) -> Option<usize> {
        VAF_BINS
            .iter()
            .position(|&(_, upper)| self.input_vaf < upper)
    }

    /// The VCF data line, without a line break.
    pub fn to_vcf_line(&self) -> String {
        format!(
            "{}\t{}\t.\t{}\t{}\t.\tPASS\tiAF={};iDP={};AF={};DP={}",
            self.chrom,
            self.pos,
            self.reference,
            self.alternate,
            format_float(self.input_vaf),
            self.input_depth,
            self.output_vaf,
            self.output_depth
        )
    }
}

/// Statistics from a VCF assembly run.
#[derive(Debug, Default, Clone)]
pub struct VcfStats {
    pub variants: usize,
    /// Variants per entry of [`VAF_BINS`]
    pub binned: [usize; 4],
    pub files: Vec<PathBuf>,
}

impl std::fmt::Display for VcfStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} variants (", self.variants)?;
        for (i, ((suffix, _), n)) in VAF_BINS.iter().zip(self.binned).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", suffix, n)?;
        }
        write!(f, ")")
    }
}

/// VCF assembly command.
pub struct VcfCommand {
    genome: Genome,
    file_date: String,
}

impl Default for VcfCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl VcfCommand {
    /// GRCh38 contigs, dated today.
    pub fn new() -> Self {
        Self {
            genome: Genome::hg38(),
            file_date: chrono::Local::now().format("%Y%m%d").to_string(),
        }
    }

    pub fn with_genome(mut self, genome: Genome) -> Self {
        self.genome = genome;
        self
    }

    /// Override the `##fileDate` value (`YYYYMMDD`).
    pub fn with_file_date(mut self, date: impl Into<String>) -> Self {
        self.file_date = date.into();
        self
    }

    /// Destination paths for `base`: the combined file, then one per bin.
    pub fn output_paths(base: &Path) -> Vec<PathBuf> {
        let mut suffixes = vec!["all"];
        suffixes.extend(VAF_BINS.iter().map(|(suffix, _)| *suffix));
        suffixes
            .into_iter()
            .map(|suffix| {
                let mut name = base.as_os_str().to_owned();
                name.push(format!("_{}.vcf", suffix));
                PathBuf::from(name)
            })
            .collect()
    }

    /// Header lines shared by every output file.
    pub fn header(&self) -> String {
        let mut header = String::new();
        header.push_str("##fileformat=VCFv4.2\n");
        header.push_str(&format!("##fileDate={}\n", self.file_date));
        header.push_str("##source=SomatoSim\n");
        for (name, length) in self.genome.contigs() {
            header.push_str(&format!("##contig=<ID={},length={}>\n", name, length));
        }
        for info in INFO_HEADERS {
            header.push_str(info);
            header.push('\n');
        }
        header.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n");
        header
    }

    /// Read simulator output from `input` and write the five VCFs next to `base`.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, base: Q) -> Result<VcfStats> {
        let reader = BufReader::new(File::open(input.as_ref())?);
        let paths = Self::output_paths(base.as_ref());

        let mut outputs = Vec::with_capacity(paths.len());
        for path in &paths {
            outputs.push(VcfOutput::create(path)?);
        }
        let header = self.header();
        for output in &mut outputs {
            output.write_str(&header)?;
        }

        let mut stats = VcfStats::default();
        // First line is the simulator's column header.
        for (idx, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let variant = SimulatedVariant::parse(&line, idx + 1)?;
            let mut record = variant.to_vcf_line();
            record.push('\n');

            outputs[0].write_str(&record)?;
            if let Some(bin) = variant.bin() {
                outputs[bin + 1].write_str(&record)?;
                stats.binned[bin] += 1;
            }
            stats.variants += 1;
        }

        for output in outputs {
            output.commit()?;
        }
        stats.files = paths;
        Ok(stats)
    }
}

/// A buffered pending VCF file.
struct VcfOutput {
    writer: BufWriter<OutputFile>,
    path: PathBuf,
}

impl VcfOutput {
    fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: BufWriter::new(OutputFile::create(path)?),
            path: path.to_path_buf(),
        })
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|source| BedError::Write {
                path: self.path.clone(),
                source,
            })
    }

    fn commit(self) -> Result<()> {
        let path = self.path;
        let file = self.writer.into_inner().map_err(|e| BedError::Write {
            path,
            source: e.into_error(),
        })?;
        file.commit()
    }
}
