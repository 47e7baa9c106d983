//! Property tests for the succinct structures and the FM-Index.

mod fixtures;

use fixtures::utils::naive_search;
use fmx::{BitVectorBuilder, FmIndex, WaveletMatrix};
use proptest::prelude::*;

fn documents() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-d]{1,24}", 1..5)
}

fn built(docs: &[String], ddic: u32) -> FmIndex {
    let mut fmi = FmIndex::new();
    for doc in docs {
        fmi.push(doc).unwrap();
    }
    fmi.build_default(ddic).unwrap();
    fmi
}

proptest! {
    #[test]
    fn prop_bit_vector_rank(bits in prop::collection::vec(any::<bool>(), 0..2000)) {
        let mut builder = BitVectorBuilder::new(bits.len());
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                builder.set1(i).unwrap();
            }
        }
        let bv = builder.build();

        let mut ones = 0;
        for i in 0..=bits.len() {
            prop_assert_eq!(bv.rank1(i).unwrap(), ones);
            prop_assert_eq!(bv.rank0(i).unwrap() + bv.rank1(i).unwrap(), i);
            if i < bits.len() {
                prop_assert_eq!(bv.get(i).unwrap(), bits[i]);
                ones += usize::from(bits[i]);
            }
        }
        prop_assert_eq!(bv.rank0(bits.len()).unwrap(), bv.size0());
    }

    #[test]
    fn prop_wavelet_get_and_rank(symbols in prop::collection::vec(0u16..40, 1..300)) {
        let mut wm = WaveletMatrix::new();
        wm.set_max_char_code(40).unwrap();
        wm.build(&symbols).unwrap();

        for (i, &code) in symbols.iter().enumerate() {
            let c = u32::from(code);
            prop_assert_eq!(wm.get(i).unwrap(), c);
            prop_assert_eq!(wm.rank(i + 1, c).unwrap() - wm.rank(i, c).unwrap(), 1);
        }
        for c in 0..40u32 {
            let expected = symbols.iter().filter(|&&s| u32::from(s) == c).count();
            prop_assert_eq!(wm.count(c).unwrap(), expected);
        }
    }

    #[test]
    fn prop_wavelet_rank_less_than(
        symbols in prop::collection::vec(0u16..40, 1..300),
        i in 0usize..300,
    ) {
        let i = i % (symbols.len() + 1);
        let mut wm = WaveletMatrix::new();
        wm.set_max_char_code(40).unwrap();
        wm.build(&symbols).unwrap();

        prop_assert_eq!(wm.rank_less_than(i, 0).unwrap(), 0);
        let mut previous = 0;
        for c in 0..=64u32 {
            let value = wm.rank_less_than(i, c).unwrap();
            let expected = symbols[..i].iter().filter(|&&s| u32::from(s) < c).count();
            prop_assert_eq!(value, expected);
            prop_assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn prop_substring_recovers_documents(docs in documents(), ddic in 1u32..20) {
        let fmi = built(&docs, ddic);
        let joined = docs.join("");

        prop_assert_eq!(fmi.substring(0, fmi.size()).unwrap(), joined);
        for (doc_id, doc) in docs.iter().enumerate() {
            prop_assert_eq!(&fmi.document(doc_id as u32).unwrap(), doc);
        }
    }

    #[test]
    fn prop_search_matches_naive(docs in documents(), key in "[a-d]{1,4}", ddic in 1u32..20) {
        let fmi = built(&docs, ddic);
        let joined = docs.join("\u{1}");

        prop_assert_eq!(fmi.search(&key).unwrap(), naive_search(&joined, &key));
    }

    #[test]
    fn prop_dump_load_equivalent(docs in documents(), key in "[a-d]{1,3}", ddic in 1u32..20) {
        let fmi = built(&docs, ddic);
        let mut buf = Vec::new();
        fmi.dump(&mut buf).unwrap();

        let mut loaded = FmIndex::new();
        loaded.load(&mut buf.as_slice()).unwrap();

        prop_assert_eq!(loaded.size(), fmi.size());
        prop_assert_eq!(loaded.document_count(), docs.len());
        prop_assert_eq!(loaded.search(&key).unwrap(), fmi.search(&key).unwrap());
        prop_assert_eq!(
            loaded.substring(0, loaded.size()).unwrap(),
            fmi.substring(0, fmi.size()).unwrap()
        );
    }
}
