//! Turn caller comparison reports into TSV matrices.
//!
//! Two report layouts are understood. The general report lists, per simulated
//! file, how many calls each caller shares with the truth set (TP), misses
//! (FN) or adds (FP). The detailed report repeats those counts per VAF bin.

use crate::bed::{BedError, Result};
use crate::config::round_to;
use crate::streaming::output::{format_float, OutputFile};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Variant callers recognized in the general report.
pub const CALLERS: [&str; 5] = ["FreeBayes", "LoFreq", "Mutect2", "Strelka2", "VarScan2"];

/// Row labels for the detailed report's VAF bins.
pub const AF_RANGES: [&str; 4] = ["< 0.02", "0.02 - 0.05", "0.05 - 0.1", "> 0.1"];

/// Bin markers of the detailed report, in [`AF_RANGES`] order.
const AF_MARKERS: [&str; 4] = ["_AF_0_to_002", "_AF_002_to_005", "_AF_005_to_01", "_AF_01_to_1"];

const GENERAL_HEADER: [&str; 13] = [
    "File",
    "Caller",
    "TP",
    "TN",
    "FP",
    "FN",
    "Sensitivity",
    "Specificity",
    "Precision",
    "Accuracy",
    "FPR",
    "FNR",
    "F1 Score",
];

const DETAILED_HEADER: [&str; 6] = [
    "File",
    "Caller",
    "AF",
    "total_variants",
    "total_called",
    "Ratio",
];

/// Confusion counts for one (file, caller) pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Confusion {
    pub tp: u64,
    pub tn: u64,
    pub fp: u64,
    pub fn_: u64,
}

#[inline]
fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

impl Confusion {
    pub fn sensitivity(&self) -> f64 {
        ratio(self.tp as f64, (self.tp + self.fn_) as f64)
    }

    pub fn specificity(&self) -> f64 {
        ratio(self.tn as f64, (self.tn + self.fp) as f64)
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp as f64, (self.tp + self.fp) as f64)
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.tp + self.tn + self.fp + self.fn_;
        ratio((self.tp + self.tn) as f64, total as f64)
    }

    pub fn false_positive_rate(&self) -> f64 {
        ratio(self.fp as f64, (self.fp + self.tn) as f64)
    }

    pub fn false_negative_rate(&self) -> f64 {
        ratio(self.fn_ as f64, (self.tp + self.fn_) as f64)
    }

    pub fn f1(&self) -> f64 {
        let (p, s) = (self.precision(), self.sensitivity());
        ratio(2.0 * p * s, p + s)
    }
}

/// One row of the general matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralRow {
    pub file: String,
    pub caller: String,
    pub counts: Confusion,
}

impl GeneralRow {
    fn to_fields(&self) -> Vec<String> {
        let c = &self.counts;
        let mut fields = vec![
            self.file.clone(),
            self.caller.clone(),
            c.tp.to_string(),
            c.tn.to_string(),
            c.fp.to_string(),
            c.fn_.to_string(),
        ];
        for metric in [
            c.sensitivity(),
            c.specificity(),
            c.precision(),
            c.accuracy(),
            c.false_positive_rate(),
            c.false_negative_rate(),
            c.f1(),
        ] {
            fields.push(format_float(metric));
        }
        fields
    }
}

/// One row of the detailed matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedRow {
    pub file: String,
    pub caller: String,
    /// Index into [`AF_RANGES`]
    pub af_bin: usize,
    pub total_variants: u64,
    pub total_called: u64,
}

impl DetailedRow {
    /// Called over total, rounded to 2 decimals; `None` when there are no variants.
    pub fn ratio(&self) -> Option<f64> {
        (self.total_variants > 0)
            .then(|| round_to(self.total_called as f64 / self.total_variants as f64, 2))
    }

    fn to_fields(&self) -> Vec<String> {
        let ratio = match self.ratio() {
            Some(r) => format_float(r),
            None => "0".to_string(),
        };
        vec![
            self.file.clone(),
            self.caller.clone(),
            AF_RANGES[self.af_bin].to_string(),
            self.total_variants.to_string(),
            self.total_called.to_string(),
            ratio,
        ]
    }
}

fn parse_count(field: Option<&str>, line_num: usize) -> Result<u64> {
    let field = field.ok_or_else(|| BedError::Parse {
        line: line_num,
        message: "missing count column".to_string(),
    })?;
    field.parse().map_err(|_| BedError::Parse {
        line: line_num,
        message: format!("invalid count: {}", field),
    })
}

/// Parse a general comparison report.
///
/// `FL <file> <TN>` opens a file block. Caller lines carry a count in their
/// second column: more than four columns means shared calls (TP), a third
/// column ending in `_all.vcf.gz` means truth-only calls (FN), anything else
/// caller-only calls (FP). A row is closed when the caller or file changes.
pub fn parse_general(content: &str) -> Result<Vec<GeneralRow>> {
    let mut rows = Vec::new();
    let mut file = String::new();
    let mut caller = String::new();
    let mut counts = Confusion::default();

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();

        if line.starts_with("FL") {
            if !file.is_empty() {
                rows.push(GeneralRow {
                    file: file.clone(),
                    caller: caller.clone(),
                    counts,
                });
            }
            file = fields
                .get(1)
                .ok_or_else(|| BedError::Parse {
                    line: line_num,
                    message: "FL line without a file name".to_string(),
                })?
                .to_string();
            caller.clear();
            counts = Confusion {
                tn: parse_count(fields.get(2).copied(), line_num)?,
                ..Default::default()
            };
        } else if CALLERS.iter().any(|c| line.contains(c)) {
            if caller != fields[0] {
                if !caller.is_empty() {
                    rows.push(GeneralRow {
                        file: file.clone(),
                        caller: caller.clone(),
                        counts,
                    });
                }
                caller = fields[0].to_string();
                counts = Confusion {
                    tn: counts.tn,
                    ..Default::default()
                };
            }

            let count = parse_count(fields.get(1).copied(), line_num)?;
            if fields.len() > 4 {
                counts.tp = count;
            } else if fields.get(2).is_some_and(|f| f.ends_with("_all.vcf.gz")) {
                counts.fn_ = count;
            } else {
                counts.fp = count;
            }
        }
    }

    if !file.is_empty() && !caller.is_empty() {
        rows.push(GeneralRow {
            file,
            caller,
            counts,
        });
    }
    Ok(rows)
}

/// Parse a detailed comparison report.
///
/// `FL <file>` opens a file block, `_AF_*` marker lines select the VAF bin and
/// a blank line closes the current row. Lines with more than four columns add
/// to both totals; lines mentioning `x_AF_` add to the variant total only.
pub fn parse_detailed(content: &str) -> Result<Vec<DetailedRow>> {
    let mut rows = Vec::new();
    let mut file = String::new();
    let mut caller = String::new();
    let mut af_bin = 0;
    let mut total_variants = 0;
    let mut total_called = 0;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let trimmed = line.trim();

        if line.starts_with("FL") {
            let fields: Vec<&str> = line.split_whitespace().collect();
            file = fields
                .get(1)
                .ok_or_else(|| BedError::Parse {
                    line: line_num,
                    message: "FL line without a file name".to_string(),
                })?
                .to_string();
            caller.clear();
            af_bin = 0;
            total_variants = 0;
            total_called = 0;
        } else if let Some(bin) = AF_MARKERS.iter().position(|m| *m == trimmed) {
            af_bin = bin;
        } else if trimmed.is_empty() {
            if !file.is_empty() {
                rows.push(DetailedRow {
                    file: file.clone(),
                    caller: caller.clone(),
                    af_bin,
                    total_variants,
                    total_called,
                });
            }
            total_variants = 0;
            total_called = 0;
        } else {
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            caller = fields[0].to_string();
            if fields.len() > 4 {
                let count = parse_count(fields.get(1).copied(), line_num)?;
                total_called += count;
                total_variants += count;
            } else if line.contains("x_AF_") {
                total_variants += parse_count(fields.get(1).copied(), line_num)?;
            }
        }
    }

    Ok(rows)
}

/// Replace the last extension of `input` with `.tsv`.
pub fn tsv_path(input: &Path) -> PathBuf {
    input.with_extension("tsv")
}

/// Matrix generation command.
#[derive(Debug, Clone, Default)]
pub struct MatrixCommand;

impl MatrixCommand {
    pub fn new() -> Self {
        Self
    }

    /// Write the general matrix beside `input`; returns the output path.
    pub fn general<P: AsRef<Path>>(&self, input: P) -> Result<PathBuf> {
        let content = fs::read_to_string(input.as_ref())?;
        let rows = parse_general(&content)?;
        let output = tsv_path(input.as_ref());
        write_table(
            &output,
            &GENERAL_HEADER,
            rows.iter().map(GeneralRow::to_fields),
        )?;
        log::info!("General matrix: {} rows -> {}", rows.len(), output.display());
        Ok(output)
    }

    /// Write the detailed matrix beside `input`; returns the output path.
    pub fn detailed<P: AsRef<Path>>(&self, input: P) -> Result<PathBuf> {
        let content = fs::read_to_string(input.as_ref())?;
        let rows = parse_detailed(&content)?;
        let output = tsv_path(input.as_ref());
        write_table(
            &output,
            &DETAILED_HEADER,
            rows.iter().map(DetailedRow::to_fields),
        )?;
        log::info!("Detailed matrix: {} rows -> {}", rows.len(), output.display());
        Ok(output)
    }

    /// Build both matrices. A failure in one is logged and does not stop the
    /// other; the first error is returned once both have run.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, general: P, detailed: Q) -> Result<()> {
        let general = self.general(general).map(|_| ()).inspect_err(|e| {
            log::error!("Error while processing general matrix: {}", e);
        });
        let detailed = self.detailed(detailed).map(|_| ()).inspect_err(|e| {
            log::error!("Error while processing detailed matrix: {}", e);
        });
        general.and(detailed)
    }
}

fn write_table<I>(path: &Path, header: &[&str], rows: I) -> Result<()>
where
    I: Iterator<Item = Vec<String>>,
{
    let write_err = |source| BedError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(OutputFile::create(path)?);
    writeln!(writer, "{}", header.join("\t")).map_err(write_err)?;
    for row in rows {
        writeln!(writer, "{}", row.join("\t")).map_err(write_err)?;
    }
    let file = writer.into_inner().map_err(|e| write_err(e.into_error()))?;
    file.commit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GENERAL: &str = "\
# vcf-compare summary
FL sim_01 1000
FreeBayes 40 sim_01_all.vcf.gz FreeBayes.vcf.gz (80.0%) (90.0%)
FreeBayes 10 sim_01_all.vcf.gz
FreeBayes 5 FreeBayes.vcf.gz
Mutect2 45 sim_01_all.vcf.gz Mutect2.vcf.gz (90.0%) (100.0%)
Mutect2 5 sim_01_all.vcf.gz
FL sim_02 500
LoFreq 0 sim_02_all.vcf.gz
";

    const DETAILED: &str = "\
FL sim_01
_AF_0_to_002
FreeBayes 3 x_AF_0_to_002.vcf.gz FreeBayes.vcf.gz (30.0%)
FreeBayes 7 x_AF_0_to_002.vcf.gz

_AF_01_to_1
FreeBayes 9 x_AF_01_to_1.vcf.gz FreeBayes.vcf.gz (90.0%)
FreeBayes 1 x_AF_01_to_1.vcf.gz

_AF_002_to_005
Mutect2 2 caller_only.vcf.gz

";

    #[test]
    fn test_confusion_metrics() {
        let c = Confusion {
            tp: 40,
            tn: 1000,
            fp: 5,
            fn_: 10,
        };
        assert_eq!(c.sensitivity(), 0.8);
        assert_eq!(c.precision(), 40.0 / 45.0);
        assert_eq!(c.false_negative_rate(), 0.2);
        assert_eq!(c.accuracy(), 1040.0 / 1055.0);

        let empty = Confusion::default();
        assert_eq!(empty.sensitivity(), 0.0);
        assert_eq!(empty.f1(), 0.0);
    }

    #[test]
    fn test_parse_general() {
        let rows = parse_general(GENERAL).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].file, "sim_01");
        assert_eq!(rows[0].caller, "FreeBayes");
        assert_eq!(
            rows[0].counts,
            Confusion {
                tp: 40,
                tn: 1000,
                fp: 5,
                fn_: 10
            }
        );
        assert_eq!(rows[1].caller, "Mutect2");
        assert_eq!(rows[1].counts.tp, 45);
        assert_eq!(rows[1].counts.fn_, 5);
        assert_eq!(rows[1].counts.fp, 0);

        assert_eq!(rows[2].file, "sim_02");
        assert_eq!(rows[2].counts.tn, 500);
        assert_eq!(rows[2].counts.fn_, 0);
    }

    #[test]
    fn test_general_row_fields() {
        let row = GeneralRow {
            file: "sim".into(),
            caller: "LoFreq".into(),
            counts: Confusion {
                tp: 1,
                tn: 1,
                fp: 0,
                fn_: 1,
            },
        };
        assert_eq!(
            row.to_fields().join("\t"),
            "sim\tLoFreq\t1\t1\t0\t1\t0.5\t1.0\t1.0\t0.6666666666666666\t0.0\t0.5\t0.6666666666666666"
        );
    }

    #[test]
    fn test_general_row_small_metrics() {
        let row = GeneralRow {
            file: "sim".into(),
            caller: "Mutect2".into(),
            counts: Confusion {
                tp: 1,
                tn: 199_999,
                fp: 2,
                fn_: 0,
            },
        };
        // FPR = 2 / 200001
        assert_eq!(row.to_fields()[10], "9.999950000249999e-06");
    }

    #[test]
    fn test_ratio_rounds_half_to_even() {
        let row = |called, total| DetailedRow {
            file: "sim".into(),
            caller: "VarScan2".into(),
            af_bin: 1,
            total_variants: total,
            total_called: called,
        };
        assert_eq!(row(1, 8).ratio(), Some(0.12));
        assert_eq!(row(5, 8).ratio(), Some(0.62));
        assert_eq!(row(3, 8).ratio(), Some(0.38));
        assert_eq!(row(1, 8).to_fields()[5], "0.12");
        assert_eq!(row(8, 8).to_fields()[5], "1.0");
    }

    #[test]
    fn test_parse_general_bad_count() {
        assert!(matches!(
            parse_general("FL sim many\n"),
            Err(BedError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_detailed() {
        let rows = parse_detailed(DETAILED).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].af_bin, 0);
        assert_eq!(rows[0].caller, "FreeBayes");
        assert_eq!(rows[0].total_variants, 10);
        assert_eq!(rows[0].total_called, 3);
        assert_eq!(rows[0].ratio(), Some(0.3));

        assert_eq!(rows[1].af_bin, 3);
        assert_eq!(rows[1].to_fields()[2], "> 0.1");
        assert_eq!(rows[1].to_fields()[5], "0.9");

        assert_eq!(rows[2].caller, "Mutect2");
        assert_eq!(rows[2].total_variants, 0);
        assert_eq!(rows[2].to_fields()[5], "0");
    }

    #[test]
    fn test_tsv_path() {
        assert_eq!(tsv_path(Path::new("res/general.txt")), PathBuf::from("res/general.tsv"));
        assert_eq!(tsv_path(Path::new("a.b.c")), PathBuf::from("a.b.tsv"));
        assert_eq!(tsv_path(Path::new("report")), PathBuf::from("report.tsv"));
    }

    #[test]
    fn test_run_writes_both() {
        let dir = TempDir::new().unwrap();
        let general = dir.path().join("general.txt");
        let detailed = dir.path().join("detailed.txt");
        fs::write(&general, GENERAL).unwrap();
        fs::write(&detailed, DETAILED).unwrap();

        MatrixCommand::new().run(&general, &detailed).unwrap();

        let out = fs::read_to_string(dir.path().join("general.tsv")).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("File\tCaller\tTP\tTN"));
        assert!(lines[1].starts_with("sim_01\tFreeBayes\t40\t1000\t5\t10\t0.8\t"));

        let out = fs::read_to_string(dir.path().join("detailed.tsv")).unwrap();
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_one_failure_does_not_stop_the_other() {
        let dir = TempDir::new().unwrap();
        let detailed = dir.path().join("detailed.txt");
        fs::write(&detailed, DETAILED).unwrap();

        let result = MatrixCommand::new().run(dir.path().join("missing.txt"), &detailed);
        assert!(result.is_err());
        assert!(dir.path().join("detailed.tsv").exists());
    }
}
