//! HTTP `Range` header parsing.
//!
//! Supported forms (single contiguous range only):
//! - `bytes=0-499`
//! - `bytes=500-` (from offset to EOF)
//! - `bytes=-500` (last 500 bytes)
//!
//! A malformed or unsatisfiable header is [`ParsedRange::Invalid`], which the
//! server degrades to a full-content 200 response. 416 is never emitted;
//! permissive fallback matches what real-world clients tolerate best.

/// Outcome of parsing a `Range` header against a file of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedRange {
    /// No header was present: serve the full file with 200.
    Absent,
    /// A satisfiable inclusive byte window `start..=end`,
    /// with `start <= end < file_size`.
    Single { start: u64, end: u64 },
    /// Header present but malformed or out of bounds: degrade to 200.
    Invalid,
}

/// Parse an optional `Range` header value against `file_size`.
///
/// Never fails hard: every header that does not yield a satisfiable single
/// range becomes [`ParsedRange::Invalid`].
pub fn parse(header: Option<&str>, file_size: u64) -> ParsedRange {
    let Some(header) = header else {
        return ParsedRange::Absent;
    };

    match parse_single(header, file_size) {
        Some((start, end)) => ParsedRange::Single { start, end },
        None => ParsedRange::Invalid,
    }
}

fn parse_single(header: &str, file_size: u64) -> Option<(u64, u64)> {
    let value = header.strip_prefix("bytes=")?.trim();

    // Multi-range requests are out of scope; treat the whole header as
    // invalid rather than serving only the first part.
    if value.contains(',') {
        return None;
    }

    let (start, end) = value.split_once('-')?;
    let start = start.trim();
    let end = end.trim();

    if file_size == 0 {
        return None;
    }

    match (start.is_empty(), end.is_empty()) {
        // bytes=-500 (last 500 bytes)
        (true, false) => {
            let suffix_len: u64 = end.parse().ok()?;
            if suffix_len == 0 {
                return None;
            }
            let start = file_size.saturating_sub(suffix_len);
            Some((start, file_size - 1))
        }
        // bytes=500- (from 500 to EOF)
        (false, true) => {
            let start: u64 = start.parse().ok()?;
            if start >= file_size {
                return None;
            }
            Some((start, file_size - 1))
        }
        // bytes=0-499
        (false, false) => {
            let start: u64 = start.parse().ok()?;
            let end: u64 = end.parse().ok()?;
            if start >= file_size {
                return None;
            }
            let end = end.min(file_size - 1);
            if start > end {
                return None;
            }
            Some((start, end))
        }
        // bytes=- (invalid)
        (true, true) => None,
    }
}
