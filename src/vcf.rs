//! Variant-catalog (VCF) records.
//!
//! Only the five leading columns matter here: `CHROM POS ID REF ALT`.

use crate::contig::is_valid_contig;
use crate::interval::OutputInterval;
use crate::streaming::parsing::{parse_u64_fast, whitespace_fields};

/// Minimum number of whitespace-separated fields for a catalog line.
pub const MIN_FIELDS: usize = 5;

/// Prefix added to catalog contig names on output.
pub const CHROM_PREFIX: &str = "chr";

/// A known mutation site from a variant catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    pub chrom: String,
    /// 1-based position
    pub pos: u64,
    pub id: String,
    pub reference: String,
    pub alternate: String,
}

impl CatalogRecord {
    /// Parse a catalog line. Returns `None` for headers, lines with fewer than
    /// [`MIN_FIELDS`] fields, or a position that is not a positive integer.
    pub fn parse(line: &str) -> Option<Self> {
        if line.starts_with('#') {
            return None;
        }
        let mut fields = line.split_whitespace();
        let chrom = fields.next()?;
        let pos = parse_u64_fast(fields.next()?.as_bytes()).filter(|&p| p > 0)?;
        let id = fields.next()?;
        let reference = fields.next()?;
        let alternate = fields.next()?;

        Some(Self {
            chrom: chrom.to_string(),
            pos,
            id: id.to_string(),
            reference: reference.to_string(),
            alternate: alternate.to_string(),
        })
    }

    /// The single-base output interval `[pos - 1, pos)` on `chr{chrom}`.
    pub fn to_interval(&self, vaf: Option<f64>) -> OutputInterval {
        OutputInterval::single_base(format!("{}{}", CHROM_PREFIX, self.chrom), self.pos - 1)
            .with_vaf(vaf)
            .with_allele(self.alternate.as_str())
    }
}

/// Whether a raw catalog line may enter a selection: not a header, more than
/// four fields, an accepted contig, a positive position and a one-base ALT.
pub fn is_eligible_catalog_line(line: &[u8]) -> bool {
    if line.first() == Some(&b'#') {
        return false;
    }
    let mut fields = whitespace_fields(line);
    let (Some(chrom), Some(pos), Some(_id), Some(_reference), Some(alternate)) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return false;
    };

    alternate.len() == 1
        && std::str::from_utf8(chrom).is_ok_and(is_valid_contig)
        && parse_u64_fast(pos).is_some_and(|p| p > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_record() {
        let record = CatalogRecord::parse("7\t140753336\tCOSV56056643\tA\tT\t.\t.\tGENE=BRAF").unwrap();
        assert_eq!(record.chrom, "7");
        assert_eq!(record.pos, 140753336);
        assert_eq!(record.reference, "A");
        assert_eq!(record.alternate, "T");
    }

    #[test]
    fn test_parse_rejects_short_and_header_lines() {
        assert!(CatalogRecord::parse("#CHROM\tPOS\tID\tREF\tALT").is_none());
        assert!(CatalogRecord::parse("1\t100\t.\tA").is_none());
        assert!(CatalogRecord::parse("1\tpos\t.\tA\tG").is_none());
        assert!(CatalogRecord::parse("1\t0\t.\tA\tG").is_none());
    }

    #[test]
    fn test_to_interval() {
        let record = CatalogRecord::parse("17\t7674220\tCOSV1\tC\tT").unwrap();
        let iv = record.to_interval(Some(0.042));
        assert_eq!(
            iv,
            OutputInterval::single_base("chr17", 7674219)
                .with_vaf(Some(0.042))
                .with_allele("T")
        );
        assert_eq!(iv.end, 7674220);

        let iv = record.to_interval(None);
        assert_eq!(iv.vaf, None);
        assert_eq!(iv.allele.as_deref(), Some("T"));
    }

    #[test]
    fn test_eligibility() {
        assert!(is_eligible_catalog_line(b"1\t100\tCOSV1\tA\tG"));
        assert!(is_eligible_catalog_line(b"X\t5\tCOSV2\tAT\tG\t.\t."));
        // Multi-base ALT
        assert!(!is_eligible_catalog_line(b"1\t100\tCOSV1\tA\tGT"));
        // Too few fields
        assert!(!is_eligible_catalog_line(b"1\t100\tCOSV1\tA"));
        // Header
        assert!(!is_eligible_catalog_line(b"#CHROM\tPOS\tID\tREF\tALT"));
        // Alternate contig
        assert!(!is_eligible_catalog_line(b"chr1_KI270706v1_random\t100\t.\tA\tG"));
        // Non-numeric position
        assert!(!is_eligible_catalog_line(b"1\tabc\t.\tA\tG"));
        assert!(!is_eligible_catalog_line(b""));
    }
}
