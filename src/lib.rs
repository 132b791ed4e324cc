// Clippy allows for the whole crate
#![allow(clippy::should_implement_trait)]

//! BED4SV: mutation-site selection for somatic variant simulation
//!
//! Produces single-base BED intervals that a mutation simulator uses to spike
//! variants into sequencing reads, and turns the simulator's results back into
//! benchmark VCFs.
//!
//! # Policies
//!
//! - **Catalog-guided**: known mutation sites are probed at random byte offsets
//!   of a (possibly gzipped) VCF catalog, keeping distinct single-base SNVs.
//! - **Capture-stochastic**: random bases are drawn from capture regions of a
//!   BED file, with replacement.
//!
//! # Example
//!
//! ```rust,no_run
//! use bed4sv::commands::SampleCommand;
//! use bed4sv::config::{SampleConfig, VafRange};
//!
//! let config = SampleConfig {
//!     input: "CosmicCodingMuts.vcf.gz".into(),
//!     output: "sim".into(),
//!     count: 100,
//!     seed: Some(42),
//!     vaf: Some(VafRange::new(0.01, 0.2).unwrap()),
//!     ..Default::default()
//! };
//! let stats = SampleCommand::new(config).run().unwrap();
//! println!("{}", stats);
//! ```

pub mod bed;
pub mod commands;
pub mod config;
pub mod contig;
pub mod genome;
pub mod interval;
pub mod policy;
pub mod sampler;
pub mod streaming;
pub mod vcf;

// Re-export commonly used types
pub use bed::{BedError, RegionRecord, Result};
pub use interval::OutputInterval;
pub use policy::{CaptureStochastic, CatalogGuided, GenerationPolicy, PolicyKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bed::{read_candidate_regions, BedError, RegionRecord};
    pub use crate::commands::{MatrixCommand, SampleCommand, VcfCommand};
    pub use crate::config::{ProbeSpan, SampleConfig, VafRange};
    pub use crate::interval::OutputInterval;
    pub use crate::policy::{CaptureStochastic, CatalogGuided, GenerationPolicy, PolicyKind};
    pub use crate::sampler::RandomSelector;
    pub use crate::streaming::{IntervalWriter, LineSource, OutputFile};
    pub use crate::vcf::CatalogRecord;
}
