//! Integer reads with default substitution.

use crate::error::CorrectionError;
use log::trace;
use std::fs;
use std::path::Path;

/// A value together with whether it came from the fallback default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadValue<T> {
    /// The value read, or the default.
    pub value: T,
    /// `true` when the source was missing or unparsable.
    pub defaulted: bool,
}

impl<T> ReadValue<T> {
    /// A value read from its source.
    pub fn read(value: T) -> Self {
        Self {
            value,
            defaulted: false,
        }
    }

    /// A fallback value.
    pub fn default_value(value: T) -> Self {
        Self {
            value,
            defaulted: true,
        }
    }
}

/// Parse the leading integer of `text`.
///
/// Leading whitespace is skipped and parsing stops at the first character
/// that is not part of the number, so `"42\n"` and `"42 lux"` both yield 42.
pub fn parse_leading_int(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}

/// Read the leading integer of the file at `path`.
pub fn read_int(path: &Path) -> Result<i32, CorrectionError> {
    let content = fs::read_to_string(path).map_err(|source| CorrectionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_leading_int(&content).ok_or_else(|| CorrectionError::Parse {
        path: path.to_path_buf(),
        content: content.trim().to_owned(),
    })
}

/// Read the leading integer of the file at `path`, falling back to `default`.
///
/// # Example
///
/// ```
/// use als_correction::read_int_or;
///
/// let value = read_int_or("/nonexistent/cali_coe", 1000);
/// assert_eq!(value.value, 1000);
/// assert!(value.defaulted);
/// ```
pub fn read_int_or(path: impl AsRef<Path>, default: i32) -> ReadValue<i32> {
    match read_int(path.as_ref()) {
        Ok(value) => ReadValue::read(value),
        Err(e) => {
            trace!("{}, using default {}", e, default);
            ReadValue::default_value(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  17\n"), Some(17));
        assert_eq!(parse_leading_int("-5"), Some(-5));
        assert_eq!(parse_leading_int("+8"), Some(8));
        assert_eq!(parse_leading_int("255 nits"), Some(255));
        assert_eq!(parse_leading_int("12abc"), Some(12));
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("   "), None);
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999"), None);
    }

    #[test]
    fn test_read_int_missing_file() {
        let err = read_int(Path::new("/nonexistent/als/red_max_lux")).unwrap_err();
        assert!(matches!(err, CorrectionError::Io { .. }));
    }

    #[test]
    fn test_read_int_or_uses_file_then_default() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("good");
        fs::write(&good, "123\n").unwrap();
        assert_eq!(read_int_or(&good, 7), ReadValue::read(123));

        let bad = dir.path().join("bad");
        fs::write(&bad, "n/a").unwrap();
        assert_eq!(read_int_or(&bad, 7), ReadValue::default_value(7));
        assert!(matches!(
            read_int(&bad),
            Err(CorrectionError::Parse { ref content, .. }) if content == "n/a"
        ));
    }
}
