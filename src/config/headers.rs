//! Raw header text parsing
//!
//! Header text arrives as free-form lines (`Key: Value`). Lines that are not
//! headers are dropped without complaint.

use crate::error::{ErrorContext, Result};
use std::path::Path;

/// Parse `Key: Value` lines into ordered pairs.
///
/// Each line is trimmed and split at its first `:`; key and value are
/// trimmed. Lines without a colon, and lines whose key is empty, are skipped.
pub fn parse_header_lines(raw: &str) -> Vec<(String, String)> {
    raw.lines().filter_map(parse_header_line).collect()
}

/// Parse a single header line
pub fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (key, value) = line.trim().split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

/// Read header text from a file
pub fn read_header_file(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read headers file '{}'", path.display()))?;
    Ok(parse_header_lines(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_basic_headers_in_order() {
        let headers = parse_header_lines("X-Trace: 1\nAuthorization: Bearer abc\n");
        assert_eq!(headers, vec![pair("X-Trace", "1"), pair("Authorization", "Bearer abc")]);
    }

    #[test]
    fn test_split_at_first_colon_only() {
        let headers = parse_header_lines("Referer: https://portal.azure.com:443/path");
        assert_eq!(headers, vec![pair("Referer", "https://portal.azure.com:443/path")]);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let headers = parse_header_lines("   X-Client  :   conntest   \r\n");
        assert_eq!(headers, vec![pair("X-Client", "conntest")]);
    }

    #[test]
    fn test_malformed_lines_dropped() {
        let headers = parse_header_lines("no colon here\n\n: empty key\nX-Ok: yes\n   \n");
        assert_eq!(headers, vec![pair("X-Ok", "yes")]);
    }

    #[test]
    fn test_empty_value_kept() {
        assert_eq!(parse_header_line("X-Empty:"), Some(pair("X-Empty", "")));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_header_lines("").is_empty());
    }

    #[test]
    fn test_read_header_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "X-Tenant: contoso").unwrap();
        writeln!(file, "garbage").unwrap();
        writeln!(file, "Accept: */*").unwrap();

        let headers = read_header_file(file.path()).unwrap();
        assert_eq!(headers, vec![pair("X-Tenant", "contoso"), pair("Accept", "*/*")]);
    }

    #[test]
    fn test_missing_header_file_is_io_error() {
        let error = read_header_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert_eq!(error.category(), "IO");
        assert!(error.detail().starts_with("Failed to read headers file '/definitely/not/here.txt': "));
    }
}
