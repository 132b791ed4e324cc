//! BED4SV: mutation-site BED generator for somatic variant simulation
//!
//! Usage: bed4sv <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use bed4sv::bed::BedError;
use bed4sv::commands::{MatrixCommand, SampleCommand, VcfCommand};
use bed4sv::config::{default_max_attempts, ProbeSpan, SampleConfig, VafRange};
use bed4sv::genome::Genome;

#[derive(Parser)]
#[command(name = "bed4sv")]
#[command(version)]
#[command(about = "BED4SV: select mutation sites for somatic variant simulation", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select mutation sites from a variant catalog or capture regions
    Sample {
        /// Input VCF (optionally .gz) catalog, or .bed/.bed.gz capture regions
        #[arg(short, long)]
        input: PathBuf,

        /// Output BED path (.bed is appended if missing)
        #[arg(short, long)]
        output: PathBuf,

        /// Number of mutation sites to select
        #[arg(short = 'n', long = "variants-number")]
        number: usize,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Lowest target VAF
        #[arg(long, requires = "vaf_high")]
        vaf_low: Option<f64>,

        /// Highest target VAF
        #[arg(long, requires = "vaf_low")]
        vaf_high: Option<f64>,

        /// Probe budget for catalog sampling (default: max(10000, 1000 x number))
        #[arg(long)]
        max_attempts: Option<u64>,

        /// Catalog probe range: lines (compatible) or bytes (whole file)
        #[arg(long, default_value = "lines")]
        probe_span: String,
    },

    /// Build benchmark VCFs from simulator output
    Vcf {
        /// Simulator output table
        #[arg(short, long)]
        input: PathBuf,

        /// Base name for the output VCF files
        #[arg(short, long)]
        output: PathBuf,

        /// Genome file for ##contig lines (default: GRCh38 primary contigs)
        #[arg(short = 'g', long)]
        genome: Option<PathBuf>,
    },

    /// Build TSV matrices from caller comparison reports
    Matrix {
        /// General comparison report
        #[arg(short = 'g', long = "general-results")]
        general: PathBuf,

        /// Detailed (per VAF bin) comparison report
        #[arg(short = 'd', long = "detailed-results")]
        detailed: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Sample {
            input,
            output,
            number,
            seed,
            vaf_low,
            vaf_high,
            max_attempts,
            probe_span,
        } => run_sample(
            input,
            output,
            number,
            seed,
            vaf_low,
            vaf_high,
            max_attempts,
            probe_span,
        ),
        Commands::Vcf {
            input,
            output,
            genome,
        } => run_vcf(input, output, genome),
        Commands::Matrix { general, detailed } => run_matrix(general, detailed),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_sample(
    input: PathBuf,
    output: PathBuf,
    number: usize,
    seed: Option<u64>,
    vaf_low: Option<f64>,
    vaf_high: Option<f64>,
    max_attempts: Option<u64>,
    probe_span: String,
) -> Result<(), BedError> {
    let probe_span = ProbeSpan::from_str(&probe_span).ok_or_else(|| {
        BedError::InvalidFormat(format!(
            "Invalid probe span '{}'. Use: lines, bytes",
            probe_span
        ))
    })?;

    let config = SampleConfig {
        input,
        output,
        count: number,
        seed,
        vaf: VafRange::from_bounds(vaf_low, vaf_high)?,
        max_attempts: max_attempts.unwrap_or_else(|| default_max_attempts(number)),
        probe_span,
    };

    log::info!("BED4SV");
    log::info!("Input file: {}", config.input.display());
    log::info!("Number of mutations to be selected: {}", config.count);
    match config.vaf {
        Some(vaf) => log::info!("VAF range: {} - {}", vaf.low, vaf.high),
        None => log::info!("VAF range: none"),
    }
    if let Some(seed) = config.seed {
        log::info!("Seed: {}", seed);
    }

    let stats = SampleCommand::new(config).run()?;
    log::info!("Complete: {}", stats);
    Ok(())
}

fn run_vcf(input: PathBuf, output: PathBuf, genome: Option<PathBuf>) -> Result<(), BedError> {
    let genome = match genome {
        Some(path) => Genome::from_file(&path)?,
        None => Genome::hg38(),
    };

    log::info!("Input file: {}", input.display());
    let stats = VcfCommand::new().with_genome(genome).run(&input, &output)?;
    for file in &stats.files {
        log::info!("Wrote {}", file.display());
    }
    log::info!("Complete: {}", stats);
    Ok(())
}

fn run_matrix(general: PathBuf, detailed: PathBuf) -> Result<(), BedError> {
    MatrixCommand::new().run(&general, &detailed)
}
