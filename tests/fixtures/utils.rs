//! Shared helpers for integration tests.
#![allow(dead_code)]

use fmx::FmIndex;

/// Build an index over `docs` with sampling interval `ddic`
pub fn built_index(docs: &[&str], ddic: u32) -> FmIndex {
    let mut fmi = FmIndex::new();
    for doc in docs {
        fmi.push(doc).unwrap();
    }
    fmi.build_default(ddic).unwrap();
    fmi
}

/// Every code-unit position where `key` starts in `text`, overlaps included
pub fn naive_search(text: &str, key: &str) -> Vec<usize> {
    let text: Vec<u16> = text.encode_utf16().collect();
    let key: Vec<u16> = key.encode_utf16().collect();
    if key.is_empty() || key.len() > text.len() {
        return Vec::new();
    }
    text.windows(key.len())
        .enumerate()
        .filter(|(_, window)| *window == key.as_slice())
        .map(|(i, _)| i)
        .collect()
}

/// Small source-like documents with repeated tokens
pub fn sample_documents() -> Vec<String> {
    (0..12)
        .map(|i| {
            format!(
                "// File {i}\nfn function_{i}() {{\n    let x = {i} * 2;\n}}\n\n\
                 struct Struct{i} {{\n    field: i32,\n}}\n\n\
                 impl Struct{i} {{\n    fn new() -> Self {{\n        Self {{ field: {i} }}\n    }}\n}}\n"
            )
        })
        .collect()
}
