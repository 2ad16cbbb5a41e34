//! Binary helpers
//!
//! Big-endian 64-bit wire words and a hex/ASCII dump formatter for
//! frame-level diagnostics.

use crate::error::{Result, TapError};

/// Pack a u64 into 8 big-endian bytes (network order)
pub fn pack_u64(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Unpack 8 big-endian bytes into a u64
///
/// Fails with a protocol error if the slice is not exactly 8 bytes.
pub fn unpack_u64(bytes: &[u8]) -> Result<u64> {
    if bytes.len() != 8 {
        return Err(TapError::Protocol(format!(
            "expected 8 bytes for u64, got {}",
            bytes.len()
        )));
    }
    Ok(u64::from_be_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ]))
}

/// Format bytes in rows of 4: offset, hex codes, ASCII-or-blank.
///
/// Diagnostic only; used for trace-level frame logging.
///
/// ```
/// let dump = tapstream::binutil::hex_dump(b"abcd\x80");
/// assert!(dump.contains("0x80"));
/// ```
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();

    for (row, chunk) in data.chunks(4).enumerate() {
        let hex = chunk
            .iter()
            .map(|b| format!("0x{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii = chunk
            .iter()
            .map(|&b| {
                if b.is_ascii_alphanumeric() || b == b'_' {
                    b as char
                } else {
                    ' '
                }
            })
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        out.push_str(&format!("{:5}\t{}\t{}\n", row * 4, hex, ascii));
    }

    out
}
