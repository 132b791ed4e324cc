//! The `sample` command: pick mutation sites and write a BED file for the
//! somatic mutation simulator.
//!
//! The input name selects the policy. `.bed` and `.bed.gz` files are capture
//! regions and go through [`CaptureStochastic`]; anything else is treated as a
//! variant catalog and goes through [`CatalogGuided`].

use crate::bed::Result;
use crate::config::SampleConfig;
use crate::policy::{
    CaptureStochastic, CatalogGuided, GenerationPolicy, PolicyKind, PolicyStats,
};
use crate::streaming::output::{IntervalWriter, OutputFile};
use rand::Rng;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Statistics from one `sample` run.
#[derive(Debug, Clone)]
pub struct SampleStats {
    pub policy: PolicyKind,
    pub output: PathBuf,
    pub generation: PolicyStats,
    pub elapsed_secs: f64,
}

impl std::fmt::Display for SampleStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} mode) -> {} ({:.2}s)",
            self.generation,
            self.policy.name(),
            self.output.display(),
            self.elapsed_secs
        )
    }
}

/// Sample command.
pub struct SampleCommand {
    config: SampleConfig,
}

impl SampleCommand {
    pub fn new(config: SampleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SampleConfig {
        &self.config
    }

    /// Run with the generator the configuration describes.
    pub fn run(&self) -> Result<SampleStats> {
        let mut rng = self.config.rng();
        self.run_with_rng(&mut rng)
    }

    /// Run with a caller-supplied generator.
    ///
    /// The output file is opened before the input is read, and only appears
    /// at its destination once every record has been written.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<SampleStats> {
        let start = Instant::now();
        self.config.validate()?;

        let output_path = self.config.output_path();
        let output = OutputFile::create(&output_path)?;
        let policy = PolicyKind::detect(&self.config.input);

        log::info!("Input: {}", self.config.input.display());
        log::info!("Output: {}", output_path.display());
        log::info!("Mode: {}", policy.name());

        let mut writer = IntervalWriter::for_file(output);
        let generation = match policy {
            PolicyKind::CatalogGuided => {
                let guided = CatalogGuided::new(&self.config.input, self.config.count)
                    .with_vaf(self.config.vaf)
                    .with_max_attempts(self.config.max_attempts)
                    .with_probe_span(self.config.probe_span);
                run_policy(&guided, rng, &mut writer)?
            }
            PolicyKind::CaptureStochastic => {
                let stochastic = CaptureStochastic::new(&self.config.input, self.config.count)
                    .with_vaf(self.config.vaf);
                run_policy(&stochastic, rng, &mut writer)?
            }
        };

        writer.into_inner()?.commit()?;

        Ok(SampleStats {
            policy,
            output: output_path,
            generation,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }
}

fn run_policy<P, W, R>(
    policy: &P,
    rng: &mut R,
    writer: &mut IntervalWriter<W>,
) -> Result<PolicyStats>
where
    P: GenerationPolicy,
    W: Write,
    R: Rng,
{
    let stats = policy.generate(rng, writer)?;
    log::debug!("{} policy: {}", policy.name(), stats);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bed::BedError;
    use crate::config::{ProbeSpan, VafRange};
    use std::fs;
    use tempfile::TempDir;

    fn write_regions(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("probes.bed");
        fs::write(
            &path,
            "chr1\t1000\t2000\nchr2\t500\t600\nchrUn_KI270302v1\t1\t100\nchr3\t10\t20\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_sample_capture_regions() {
        let dir = TempDir::new().unwrap();
        let config = SampleConfig {
            input: write_regions(&dir),
            output: dir.path().join("sim"),
            count: 3,
            seed: Some(42),
            vaf: Some(VafRange::new(0.05, 0.1).unwrap()),
            ..Default::default()
        };
        let stats = SampleCommand::new(config).run().unwrap();

        assert_eq!(stats.policy, PolicyKind::CaptureStochastic);
        assert_eq!(stats.generation.records, 3);
        assert_eq!(stats.generation.candidates, 3);
        assert_eq!(stats.output, dir.path().join("sim.bed"));

        let out = fs::read_to_string(dir.path().join("sim.bed")).unwrap();
        assert_eq!(out.split('\n').count(), 3);
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn test_sample_is_reproducible() {
        let dir = TempDir::new().unwrap();
        let input = write_regions(&dir);
        let run = |name: &str| {
            let config = SampleConfig {
                input: input.clone(),
                output: dir.path().join(name),
                count: 3,
                seed: Some(0),
                ..Default::default()
            };
            SampleCommand::new(config).run().unwrap();
            fs::read_to_string(dir.path().join(format!("{}.bed", name))).unwrap()
        };
        assert_eq!(run("a"), run("b"));
    }

    #[test]
    fn test_failed_sampling_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let config = SampleConfig {
            input: write_regions(&dir),
            output: dir.path().join("sim.bed"),
            count: 10,
            seed: Some(1),
            ..Default::default()
        };
        let err = SampleCommand::new(config).run().unwrap_err();
        assert!(matches!(err, BedError::InsufficientRegions { .. }));
        assert!(!dir.path().join("sim.bed").exists());
    }

    #[test]
    fn test_unwritable_output_fails_before_reading_input() {
        let dir = TempDir::new().unwrap();
        let config = SampleConfig {
            input: dir.path().join("missing.vcf"),
            output: dir.path().join("no_such_dir").join("sim"),
            count: 1,
            ..Default::default()
        };
        let err = SampleCommand::new(config).run().unwrap_err();
        assert!(matches!(err, BedError::Write { .. }));
    }

    #[test]
    fn test_sample_catalog() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("catalog.vcf");
        fs::write(
            &input,
            "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\n1\t100\tCOSV1\tA\tG\n2\t200\tCOSV2\tC\tT\n",
        )
        .unwrap();
        let config = SampleConfig {
            input,
            output: dir.path().join("guided"),
            count: 1,
            seed: Some(9),
            probe_span: ProbeSpan::Bytes,
            ..Default::default()
        };
        let stats = SampleCommand::new(config).run().unwrap();
        assert_eq!(stats.policy, PolicyKind::CatalogGuided);

        let out = fs::read_to_string(dir.path().join("guided.bed")).unwrap();
        assert!(out == "chr1\t99\t100\tG" || out == "chr2\t199\t200\tT");
    }
}
