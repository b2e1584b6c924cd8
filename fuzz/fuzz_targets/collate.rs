#![no_main]

use libfuzzer_sys::fuzz_target;

use ltwa::collate;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let normalized = collate::normalize(&s);
    debug_assert!(normalized
        .chars()
        .all(|c| !matches!(c, '\u{0300}'..='\u{036F}')));

    let key = collate::promiscuously_normalize(&s);
    debug_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
    debug_assert!(!key.contains('h'));

    debug_assert!(collate::c_equiv(&s, &s));

    // Self-alignment always succeeds and reproduces the string.
    let chars: Vec<char> = s.chars().collect();
    let parts = collate::collating_match(&chars, &chars).expect("self-alignment");
    let text: String = parts.iter().map(|p| p.text.as_str()).collect();
    debug_assert_eq!(text, s.as_ref());
});
