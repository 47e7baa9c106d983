#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Loading arbitrary bytes must fail cleanly or yield a usable index
    let mut fmi = fmx::FmIndex::new();
    if fmi.load(&mut &data[..]).is_ok() {
        let _ = fmi.search("a");
        let _ = fmi.substring(0, fmi.size());
    } else {
        assert!(!fmi.is_built());
    }
});
