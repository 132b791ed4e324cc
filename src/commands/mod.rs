//! Command implementations for bed4sv.

pub mod matrix;
pub mod sample;
pub mod vcf;

pub use matrix::MatrixCommand;
pub use sample::{SampleCommand, SampleStats};
pub use vcf::{VcfCommand, VcfStats};
