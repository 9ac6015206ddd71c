//! Flat setfile decoder
//!
//! Line rules:
//! - surrounding whitespace is trimmed
//! - blank lines and lines starting with `;` are skipped
//! - the first `=` splits key from value, both trimmed
//! - lines without `=` are skipped
//! - a repeated key overwrites the earlier value

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::checksum::Checksum;
use super::encoding::{decode_bytes, TextEncoding};
use super::errors::{SetfileError, SetfileResult};

/// Decoded setfile. Read-only once built.
#[derive(Debug, Clone)]
pub struct DecodedSetfile {
    values: HashMap<String, String>,
    duplicate_keys: usize,
    encoding: TextEncoding,
    checksum: Option<Checksum>,
}

impl DecodedSetfile {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Lines whose key had already been seen
    pub fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Checksum of the source bytes, when decoded from bytes
    pub fn checksum(&self) -> Option<Checksum> {
        self.checksum
    }
}

/// Parses already-decoded setfile text
pub fn parse_setfile(text: &str) -> DecodedSetfile {
    let mut values = HashMap::new();
    let mut duplicate_keys = 0;

    // `\r\n`, `\n` and bare `\r` all end a line
    for line in text.split(|c: char| c == '\n' || c == '\r') {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if values
            .insert(key.trim().to_string(), value.trim().to_string())
            .is_some()
        {
            duplicate_keys += 1;
        }
    }

    DecodedSetfile {
        values,
        duplicate_keys,
        encoding: TextEncoding::Utf8,
        checksum: None,
    }
}

/// Decodes setfile bytes in either supported encoding
pub fn decode_setfile(bytes: &[u8]) -> SetfileResult<DecodedSetfile> {
    let (text, encoding) = decode_bytes(bytes)?;
    let mut decoded = parse_setfile(&text);
    decoded.encoding = encoding;
    decoded.checksum = Some(Checksum::of(bytes));
    Ok(decoded)
}

/// Reads and decodes a setfile from disk
pub fn read_setfile(path: &Path) -> SetfileResult<DecodedSetfile> {
    let bytes = fs::read(path).map_err(|e| SetfileError::io_at_path(path, e))?;
    let decoded = decode_setfile(&bytes).map_err(|e| match e {
        SetfileError::Decode(reason) => SetfileError::Decode(format!("{}: {}", path.display(), reason)),
        other => other,
    })?;

    debug!(
        path = %path.display(),
        keys = decoded.len(),
        duplicates = decoded.duplicate_keys(),
        encoding = decoded.encoding().as_str(),
        "setfile decoded"
    );

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setfile::encoding::encode_text;

    #[test]
    fn test_last_write_wins() {
        let decoded = parse_setfile("gInput_MaxOrders=100\ngInput_Grid_P1=300.0\ngInput_MaxOrders=150\n");
        assert_eq!(decoded.get("gInput_MaxOrders"), Some("150"));
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.duplicate_keys(), 1);
    }

    #[test]
    fn test_comments_blank_lines_and_bare_lines_are_skipped() {
        let text = "; header\n\n   ; indented comment\nno equals sign here\n  gInput_Mult_P1 = 1.20  \n";
        let decoded = parse_setfile(text);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get("gInput_Mult_P1"), Some("1.20"));
    }

    #[test]
    fn test_split_on_first_equals() {
        let decoded = parse_setfile("gInput_Note=a=b\n");
        assert_eq!(decoded.get("gInput_Note"), Some("a=b"));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let decoded = parse_setfile("gInput_License=\n");
        assert_eq!(decoded.get("gInput_License"), Some(""));
    }

    #[test]
    fn test_crlf_line_endings() {
        let decoded = parse_setfile("a=1\r\nb=2\r\n");
        assert_eq!(decoded.get("a"), Some("1"));
        assert_eq!(decoded.get("b"), Some("2"));
    }

    #[test]
    fn test_bare_cr_line_endings() {
        let decoded = parse_setfile("a=1\rb=2\r");
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.get("a"), Some("1"));
        assert_eq!(decoded.get("b"), Some("2"));
    }

    #[test]
    fn test_decode_utf16_setfile() {
        let bytes = encode_text("; comment\r\ngInput_Grid_BST3=300.0\r\n", TextEncoding::Utf16Le);
        let decoded = decode_setfile(&bytes).unwrap();
        assert_eq!(decoded.encoding(), TextEncoding::Utf16Le);
        assert_eq!(decoded.get("gInput_Grid_BST3"), Some("300.0"));
        assert_eq!(decoded.checksum(), Some(Checksum::of(&bytes)));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let err = read_setfile(Path::new("/nonexistent/path/file.set")).unwrap_err();
        assert_eq!(err.code(), "SETPARITY_IO_ERROR");
    }
}
