//! Integration tests for building, querying and persisting FM-Indexes.

mod fixtures;

use fixtures::utils::{built_index, naive_search, sample_documents};
use fmx::index::{FmIndexReader, FmIndexWriter};
use fmx::{Error, FmIndex, FmIndexConfig};
use tempfile::tempdir;

#[test]
fn test_banana() {
    let fmi = built_index(&["banana"], 1);

    assert_eq!(fmi.size(), 7);
    assert_eq!(fmi.search("ana").unwrap(), vec![1, 3]);
    assert_eq!(fmi.search("a").unwrap(), vec![1, 3, 5]);
    assert_eq!(fmi.search("banana").unwrap(), vec![0]);
    assert_eq!(fmi.search("xyz").unwrap(), Vec::<usize>::new());
    assert_eq!(fmi.substring(0, 6).unwrap(), "banana");
    assert_eq!(fmi.substring(1, 3).unwrap(), "ana");
    assert_eq!(fmi.count("na").unwrap(), 2);
    assert!(fmi.contains("nan").unwrap());
}

#[test]
fn test_push_empty_is_invalid_argument() {
    let mut fmi = FmIndex::new();
    let err = fmi.push("").unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_push_after_build_is_invalid_operation() {
    let mut fmi = built_index(&["abc"], 2);
    assert!(matches!(fmi.push("def"), Err(Error::InvalidOperation(_))));

    fmi.clear();
    fmi.push("def").unwrap();
    fmi.build_default(2).unwrap();
    assert_eq!(fmi.search("ef").unwrap(), vec![1]);
}

#[test]
fn test_substring_out_of_range() {
    let fmi = built_index(&["banana"], 2);
    let err = fmi.substring(7, 1).unwrap_err();
    assert!(err.is_range());
    // End clamps to the index size
    assert_eq!(fmi.substring(4, 100).unwrap(), "na");
}

#[test]
fn test_matches_never_cross_documents() {
    let fmi = built_index(&["abc", "def"], 3);

    assert!(fmi.search("cd").unwrap().is_empty());
    assert_eq!(fmi.search("c").unwrap(), vec![2]);
    assert_eq!(fmi.search("d").unwrap(), vec![4]);
    assert_eq!(fmi.document(1).unwrap(), "def");
}

#[test]
fn test_sample_documents_against_naive_search() {
    let docs = sample_documents();
    let refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    let joined = docs.join("\u{1}");

    for ddic in [1, 3, 16, 64] {
        let fmi = built_index(&refs, ddic);
        for key in ["fn", "let", "self", "()", "{", "Struct1", "zzz"] {
            assert_eq!(
                fmi.search(key).unwrap(),
                naive_search(&joined, key),
                "key {:?} ddic {}",
                key,
                ddic
            );
        }
        for (doc_id, doc) in docs.iter().enumerate() {
            assert_eq!(&fmi.document(doc_id as u32).unwrap(), doc);
        }
    }
}

#[test]
fn test_search_documents_bitmap() {
    let fmi = built_index(&["one needle", "no match", "needle needle"], 4);
    let docs = fmi.search_documents("needle").unwrap();
    assert_eq!(docs.iter().collect::<Vec<_>>(), vec![0, 2]);

    let matches = fmi.search_with_positions("needle", 2).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!((matches[0].doc_id, matches[0].offset), (0, 4));
    assert_eq!((matches[1].doc_id, matches[1].offset), (2, 0));
}

#[test]
fn test_build_with_config() {
    let config = FmIndexConfig {
        sample_interval: 5,
        max_char_code: 128,
    };
    let mut fmi = FmIndex::new();
    fmi.push("ascii only").unwrap();
    fmi.build_with_config(&config).unwrap();
    assert_eq!(fmi.sample_interval(), 5);
    assert_eq!(fmi.max_char_code(), 128);
    assert_eq!(fmi.stats().bitsize, 7);

    let mut wide = FmIndex::new();
    wide.push("naïve").unwrap();
    assert!(wide.build_with_config(&config).unwrap_err().is_invalid_argument());
    assert!(!wide.is_built());
}

#[test]
fn test_dump_load_in_memory() {
    let fmi = built_index(&["mississippi", "missouri"], 3);
    let mut buf = Vec::new();
    fmi.dump(&mut buf).unwrap();

    let mut loaded = FmIndex::new();
    loaded.load(&mut buf.as_slice()).unwrap();

    assert_eq!(loaded.size(), fmi.size());
    assert_eq!(loaded.document_count(), 2);
    assert_eq!(loaded.search("ssi").unwrap(), fmi.search("ssi").unwrap());
    assert_eq!(loaded.search("miss").unwrap(), vec![0, 12]);
    assert_eq!(loaded.document(1).unwrap(), "missouri");
}

#[test]
fn test_load_garbage_fails() {
    let mut fmi = FmIndex::new();
    let garbage = [0xFFu8; 64];
    assert!(fmi.load(&mut garbage.as_slice()).is_err());
    assert!(!fmi.is_built());
    assert_eq!(fmi.size(), 0);
}

#[test]
fn test_index_directory_round_trip() {
    let temp_dir = tempdir().unwrap();
    let fmi = built_index(&["first document", "second document"], 8);
    let sources = vec!["a.txt".to_string(), "b.txt".to_string()];
    FmIndexWriter::write(temp_dir.path(), &fmi, &sources).unwrap();

    let reader = FmIndexReader::open(temp_dir.path()).unwrap().unwrap();
    let meta = reader.meta().unwrap();
    assert_eq!(meta.doc_count, 2);
    assert_eq!(meta.sample_interval, 8);
    assert_eq!(meta.sources, sources);

    let index = reader.index();
    assert_eq!(index.search("document").unwrap(), vec![6, 22]);
    assert_eq!(reader.source_label(1), "b.txt");
    assert_eq!(reader.source_label(7), "#7");
}

#[test]
fn test_open_missing_index() {
    let temp_dir = tempdir().unwrap();
    assert!(FmIndexReader::open(temp_dir.path()).unwrap().is_none());
}
