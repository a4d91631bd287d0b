//! Byte <-> text conversion for documents on disk.
//!
//! Detection order:
//! 1. Byte-order mark (UTF-8 `EF BB BF`, UTF-16LE `FF FE`, UTF-16BE `FE FF`).
//! 2. Zero-byte parity heuristic: ASCII-heavy UTF-16 text has a zero in every
//!    other byte. More zeros at odd offsets means little endian, more at even
//!    offsets means big endian. No zeros (or a tie) means UTF-8.
//!
//! A detected UTF-16 payload with an odd byte count is a hard error. Line
//! endings are normalized to `\n` on read when any `\r\n` is present and the
//! `uses_crlf` flag tells `write_text_with_encoding` to expand them again, so an
//! unchanged document round-trips byte for byte.

use std::fmt;
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl Encoding {
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
        }
    }

    fn bom(self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => UTF8_BOM,
            Encoding::Utf16Le => UTF16LE_BOM,
            Encoding::Utf16Be => UTF16BE_BOM,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Malformed document data. Aborts the open that produced it, nothing else.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("{encoding} data has an odd byte count ({len})")]
    OddLength { encoding: Encoding, len: usize },
    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("unpaired surrogate in {encoding} data")]
    InvalidUtf16 { encoding: Encoding },
}

/// Result of decoding a file's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// LF-only text.
    pub text: String,
    pub encoding: Encoding,
    pub has_bom: bool,
    pub uses_crlf: bool,
}

/// Sniff the encoding. Returns the encoding and the BOM length to skip.
pub fn detect_encoding(bytes: &[u8]) -> (Encoding, usize) {
    if bytes.starts_with(UTF8_BOM) {
        return (Encoding::Utf8, UTF8_BOM.len());
    }
    if bytes.starts_with(UTF16LE_BOM) {
        return (Encoding::Utf16Le, UTF16LE_BOM.len());
    }
    if bytes.starts_with(UTF16BE_BOM) {
        return (Encoding::Utf16Be, UTF16BE_BOM.len());
    }
    let mut even_zeros = 0usize;
    let mut odd_zeros = 0usize;
    for (i, b) in bytes.iter().enumerate() {
        if *b == 0 {
            if i % 2 == 0 {
                even_zeros += 1;
            } else {
                odd_zeros += 1;
            }
        }
    }
    let encoding = if odd_zeros > even_zeros {
        Encoding::Utf16Le
    } else if even_zeros > odd_zeros {
        Encoding::Utf16Be
    } else {
        Encoding::Utf8
    };
    (encoding, 0)
}

pub fn read_text_with_encoding(bytes: &[u8]) -> Result<DecodedText, EncodingError> {
    let (encoding, bom_len) = detect_encoding(bytes);
    let payload = &bytes[bom_len..];
    let raw = match encoding {
        Encoding::Utf8 => std::str::from_utf8(payload)
            .map_err(|e| EncodingError::InvalidUtf8 {
                offset: bom_len + e.valid_up_to(),
            })?
            .to_string(),
        Encoding::Utf16Le | Encoding::Utf16Be => {
            if payload.len() % 2 != 0 {
                return Err(EncodingError::OddLength {
                    encoding,
                    len: bytes.len(),
                });
            }
            let units = payload.chunks_exact(2).map(|pair| {
                let pair = [pair[0], pair[1]];
                if encoding == Encoding::Utf16Le {
                    u16::from_le_bytes(pair)
                } else {
                    u16::from_be_bytes(pair)
                }
            });
            char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .map_err(|_| EncodingError::InvalidUtf16 { encoding })?
        }
    };
    let uses_crlf = raw.contains("\r\n");
    let text = if uses_crlf {
        raw.replace("\r\n", "\n")
    } else {
        raw
    };
    tracing::debug!(
        target: "io",
        encoding = encoding.label(),
        has_bom = bom_len > 0,
        uses_crlf,
        size_bytes = bytes.len(),
        "decoded"
    );
    Ok(DecodedText {
        text,
        encoding,
        has_bom: bom_len > 0,
        uses_crlf,
    })
}

/// Exact inverse of `read_text_with_encoding`.
pub fn write_text_with_encoding(text: &str, encoding: Encoding, bom: bool, crlf: bool) -> Vec<u8> {
    let expanded;
    let text = if crlf {
        expanded = text.replace('\n', "\r\n");
        expanded.as_str()
    } else {
        text
    };
    let mut out = Vec::with_capacity(text.len() * 2 + 3);
    if bom {
        out.extend_from_slice(encoding.bom());
    }
    match encoding {
        Encoding::Utf8 => out.extend_from_slice(text.as_bytes()),
        Encoding::Utf16Le => {
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
        }
        Encoding::Utf16Be => {
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
    }
    out
}
