//! Text encodings for store files
//!
//! Stores are read and written in a single encoding declared by the caller.
//! Decoding problems surface as `StockroomError::Decode`, separate from the
//! per-line grammar diagnostics produced by the codec.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{StockroomError, StockroomResult};

/// Supported file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextEncoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    /// ISO-8859-1, common for files written by older point-of-sale tools
    #[serde(rename = "latin-1")]
    Latin1,
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Decode file bytes into text
    pub fn decode(&self, bytes: &[u8], path: &Path) -> StockroomResult<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                String::from_utf8(bytes.to_vec()).map_err(|e| StockroomError::Decode {
                    path: path.to_path_buf(),
                    encoding: self.name(),
                    reason: format!("invalid byte at offset {}", e.utf8_error().valid_up_to()),
                })
            }
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Encode text into file bytes
    pub fn encode(&self, text: &str, path: &Path) -> StockroomResult<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| StockroomError::Encode {
                        path: path.to_path_buf(),
                        encoding: self.name(),
                        reason: format!("character {:?} has no latin-1 form", c),
                    })
                })
                .collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            other => Err(format!("Unsupported encoding '{}'", other)),
        }
    }
}
