#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;

const LTWA: &str = "PATTERN\tREPLACEMENT\tLANGUAGES\n\
    international\tInt.\tmul\n\
    journal\tJ.\tmul\n\
    geograph-\tGeogr.\tmul\n\
    science\tSci.\tmul\n\
    zeitschrift\tZ.\tger\n\
    deutsch-\tDtsch.\tger\n\
    -ology\t-ol.\teng\n\
    acta\tn.a.\tlat\n";

static ENGINE: OnceLock<ltwa::Engine> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let engine = ENGINE.get_or_init(|| {
        ltwa::Engine::new(LTWA, "of\nthe\nfür\nund\n").expect("static dictionary parses")
    });

    let title = String::from_utf8_lossy(data);
    let out = engine.make_abbreviation(&title, None, None);

    // Queries are total and abbreviating never lengthens.
    let bound = ltwa::collate::nfc(&title).trim().chars().count();
    debug_assert!(out.chars().count() <= bound);

    // The language filter only ever narrows the candidate set.
    let narrow = engine.matching_patterns(&title, Some(&["ger"]), false, None);
    let all = engine.matching_patterns(&title, None, false, None);
    debug_assert!(narrow.len() <= all.len());
});
