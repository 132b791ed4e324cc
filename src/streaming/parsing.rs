//! Zero-allocation line parsing utilities.
//!
//! Probed lines are tested many times per accepted record, so these helpers
//! work on borrowed slices and never allocate.

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty or contains non-digit characters.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Check if a line should be skipped (empty, comment, or header).
#[inline(always)]
pub fn should_skip_line(line: &[u8]) -> bool {
    line.is_empty() || line[0] == b'#' || line.starts_with(b"track") || line.starts_with(b"browser")
}

/// Check if a line is a `##` meta-information line.
#[inline(always)]
pub fn is_meta_line(line: &[u8]) -> bool {
    line.starts_with(b"##")
}

/// Split a line on runs of ASCII whitespace, skipping empty fields.
#[inline]
pub fn whitespace_fields(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|b| b.is_ascii_whitespace())
        .filter(|field| !field.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64_fast() {
        assert_eq!(parse_u64_fast(b"12345"), Some(12345));
        assert_eq!(parse_u64_fast(b"0"), Some(0));
        assert_eq!(parse_u64_fast(b""), None);
        assert_eq!(parse_u64_fast(b"abc"), None);
        assert_eq!(parse_u64_fast(b"123abc"), None);
        assert_eq!(parse_u64_fast(b"-5"), None);
        assert_eq!(parse_u64_fast(b"18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_u64_fast(b"18446744073709551616"), None);
    }

    #[test]
    fn test_should_skip_line() {
        assert!(should_skip_line(b""));
        assert!(should_skip_line(b"#CHROM\tPOS"));
        assert!(should_skip_line(b"track name=foo"));
        assert!(should_skip_line(b"browser position chr1:1-100"));
        assert!(!should_skip_line(b"chr1\t100\t200"));
    }

    #[test]
    fn test_is_meta_line() {
        assert!(is_meta_line(b"##fileformat=VCFv4.2"));
        assert!(!is_meta_line(b"#CHROM\tPOS"));
        assert!(!is_meta_line(b"1\t100"));
    }

    #[test]
    fn test_whitespace_fields() {
        let fields: Vec<&[u8]> = whitespace_fields(b"1\t100 \t rs1\tA\tG\n").collect();
        assert_eq!(
            fields,
            vec![&b"1"[..], &b"100"[..], &b"rs1"[..], &b"A"[..], &b"G"[..]]
        );
        assert_eq!(whitespace_fields(b"   ").count(), 0);
    }
}
