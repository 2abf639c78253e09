//! Normalization of block header times.

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("invalid time: {0}")]
    InvalidTime(String),
}

/// Parse an RFC3339 block time (any offset, nanosecond precision) and re-render it in UTC.
pub fn normalize_block_time(s: &str) -> Result<String, NormalizeError> {
    let dt = OffsetDateTime::parse(s.trim(), &Rfc3339)
        .map_err(|e| NormalizeError::InvalidTime(format!("{s}: {e}")))?;
    dt.to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| NormalizeError::InvalidTime(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_utc_time() {
        let t = normalize_block_time("2025-03-01T12:00:05Z").unwrap();
        assert_eq!(t, "2025-03-01T12:00:05Z");
    }

    #[test]
    fn converts_offset_to_utc() {
        let t = normalize_block_time("2025-03-01T14:00:05+02:00").unwrap();
        assert_eq!(t, "2025-03-01T12:00:05Z");
    }

    #[test]
    fn keeps_subsecond_precision() {
        let t = normalize_block_time(" 2025-03-01T12:00:05.123456789Z ").unwrap();
        assert_eq!(t, "2025-03-01T12:00:05.123456789Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(normalize_block_time("yesterday").is_err());
        assert!(normalize_block_time("").is_err());
    }
}
