//! Primary-assembly contig filter.
//!
//! Alternate loci, random and unplaced scaffolds, haplotypes and fix patches
//! are recognised by fixed name fragments. Matching is case-sensitive, so `KI`
//! in `chr1_KI270706v1_random` is not caught by `ki`; the `random` suffix is.

/// Name fragments that mark a contig as outside the primary assembly.
pub const DENYLIST: [&str; 8] = ["alt", "random", "Un", "chrUn", "hap", "gl", "ki", "fix"];

/// Returns `true` if `name` contains none of the [`DENYLIST`] fragments.
#[inline]
pub fn is_valid_contig(name: &str) -> bool {
    !DENYLIST.iter().any(|token| name.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_primary_contigs() {
        for name in ["chr1", "chr22", "chrX", "chrY", "chrM", "1", "X", "MT"] {
            assert!(is_valid_contig(name), "{} should be accepted", name);
        }
    }

    #[test]
    fn test_rejects_denylisted_contigs() {
        for name in [
            "chr1_KI270706v1_random",
            "chrUn_GL000195v1",
            "chr6_GL000251v2_alt",
            "chr6_apd_hap1",
            "chr1_KN196472v1_fix",
            "gl000192.1",
            "ki270728.1",
        ] {
            assert!(!is_valid_contig(name), "{} should be rejected", name);
        }
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert!(is_valid_contig("HAP"));
        assert!(!is_valid_contig("hap"));
    }
}
