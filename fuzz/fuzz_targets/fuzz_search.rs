#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    docs: Vec<String>,
    key: String,
    ddic: u8,
}

fuzz_target!(|input: Input| {
    let mut fmi = fmx::FmIndex::new();
    for doc in &input.docs {
        let _ = fmi.push(doc);
    }
    if fmi.build_default(u32::from(input.ddic).max(1)).is_err() {
        return;
    }

    let positions = fmi.search(&input.key).unwrap();
    assert_eq!(positions.len(), fmi.count(&input.key).unwrap());
    for doc_id in 0..fmi.document_count() as u32 {
        fmi.document(doc_id).unwrap();
    }
});
