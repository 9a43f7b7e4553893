//! Pairtree identifier encoding.
//!
//! Volumes are laid out on disk under a pairtree: the cleaned identifier is
//! split into two-character segments that become nested directory names,
//! and the leaf directory is named after the whole cleaned identifier.

use std::fmt::Write;

const ENCODED: &[u8] = b"\"*+,<=>?\\^|";

/// Clean an identifier for use as a pairtree path component.
///
/// Bytes outside the visible ASCII range and the reserved characters
/// `" * + , < = > ? \ ^ |` are hex-encoded as `^hh`; then `/` becomes `=`,
/// `:` becomes `+`, and `.` becomes `,`.
pub fn clean_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for &b in id.as_bytes() {
        if !(0x21..=0x7e).contains(&b) || ENCODED.contains(&b) {
            let _ = write!(out, "^{b:02x}");
            continue;
        }
        out.push(match b {
            b'/' => '=',
            b':' => '+',
            b'.' => ',',
            _ => b as char,
        });
    }
    out
}

/// Split a cleaned identifier into its pairtree directory segments.
pub fn ppath(cleaned: &str) -> Vec<String> {
    let chars: Vec<char> = cleaned.chars().collect();
    chars.chunks(2).map(|c| c.iter().collect()).collect()
}
