//! Byte encodings of setfiles
//!
//! Trading terminals write UTF-16LE with a `FF FE` byte-order mark.
//! Anything else is read as UTF-8 (an optional UTF-8 BOM is dropped).

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::checksum::Checksum;
use super::errors::{SetfileError, SetfileResult};

const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
}

impl TextEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf8",
            TextEncoding::Utf16Le => "utf16le",
        }
    }
}

/// Decodes raw setfile bytes, detecting the encoding from the BOM
pub fn decode_bytes(bytes: &[u8]) -> SetfileResult<(String, TextEncoding)> {
    if let Some(body) = bytes.strip_prefix(&UTF16LE_BOM) {
        if body.len() % 2 != 0 {
            return Err(SetfileError::Decode(format!(
                "UTF-16LE body has odd length {}",
                body.len()
            )));
        }
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        let text = String::from_utf16(&units).map_err(|e| SetfileError::Decode(format!("invalid UTF-16LE: {}", e)))?;
        return Ok((text, TextEncoding::Utf16Le));
    }

    let body = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(body)
        .map_err(|e| SetfileError::Decode(format!("not UTF-8 or UTF-16LE: {}", e)))?
        .to_string();
    Ok((text, TextEncoding::Utf8))
}

/// Encodes text for writing. UTF-16LE output carries the BOM.
pub fn encode_text(text: &str, encoding: TextEncoding) -> Vec<u8> {
    match encoding {
        TextEncoding::Utf8 => text.as_bytes().to_vec(),
        TextEncoding::Utf16Le => {
            let mut bytes = Vec::with_capacity(2 + text.len() * 2);
            bytes.extend_from_slice(&UTF16LE_BOM);
            for unit in text.encode_utf16() {
                bytes.extend_from_slice(&unit.to_le_bytes());
            }
            bytes
        }
    }
}

/// Outcome of writing a setfile
#[derive(Debug, Clone, Serialize)]
pub struct WriteSummary {
    pub path: String,
    pub bytes: usize,
    pub encoding: TextEncoding,
    pub checksum: Checksum,
}

/// Writes `text` to `path` via a sibling temp file and rename, so a
/// reader never sees a half-written setfile
pub fn write_setfile(path: &Path, text: &str, encoding: TextEncoding) -> SetfileResult<WriteSummary> {
    let bytes = encode_text(text, encoding);

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    {
        let mut file = File::create(tmp_path).map_err(|e| SetfileError::io_at_path(tmp_path, e))?;
        file.write_all(&bytes)
            .map_err(|e| SetfileError::io_at_path(tmp_path, e))?;
        file.sync_all().map_err(|e| SetfileError::io_at_path(tmp_path, e))?;
    }

    if let Err(e) = fs::rename(tmp_path, path) {
        let _ = fs::remove_file(tmp_path);
        return Err(SetfileError::io_at_path(path, e));
    }

    Ok(WriteSummary {
        path: path.display().to_string(),
        bytes: bytes.len(),
        encoding,
        checksum: Checksum::of(&bytes),
    })
}
