//! Input screening for documents read from disk.

use crate::index::types::is_reserved;

/// Check if content is likely binary
///
/// Examines first 8KB for null bytes or high ratio of non-text bytes
pub fn is_likely_binary(content: &[u8]) -> bool {
    let sample_size = content.len().min(8192);
    let sample = &content[..sample_size];

    // Null bytes are a very strong indicator of binary
    if sample.contains(&0) {
        return true;
    }

    // Allow printable ASCII, common whitespace and any UTF-8 lead/continuation byte
    let non_text_count = sample
        .iter()
        .filter(|&&b| {
            !((0x20..=0x7E).contains(&b)
                || b == b'\n'
                || b == b'\r'
                || b == b'\t'
                || (0x80..=0xFD).contains(&b))
        })
        .count();

    // If more than 10% are non-text bytes, likely binary
    non_text_count > sample_size / 10
}

/// Decode file content into a document, or `None` when it cannot be indexed
/// (binary, empty, or containing a reserved code)
pub fn decode_document(content: &[u8]) -> Option<String> {
    if content.is_empty() || is_likely_binary(content) {
        return None;
    }
    let text = String::from_utf8_lossy(content).into_owned();
    if text.encode_utf16().any(is_reserved) {
        return None;
    }
    Some(text)
}
