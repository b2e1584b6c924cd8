#![no_main]

use libfuzzer_sys::fuzz_target;

use ltwa::collate;
use ltwa::trie::PrefixTree;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let keys: Vec<String> = s
        .split_whitespace()
        .map(collate::promiscuously_normalize)
        .filter(|k| !k.is_empty())
        .take(64)
        .collect();

    let mut tree = PrefixTree::new();
    for (i, key) in keys.iter().enumerate() {
        tree.add(key, i);
    }
    debug_assert_eq!(tree.len(), keys.len());

    // Every inserted key must be recalled for any extension of itself.
    for (i, key) in keys.iter().enumerate() {
        debug_assert!(tree.get(key).contains(&i));
        let extended = format!("{key}xyz");
        debug_assert!(tree.get(&extended).contains(&i));
    }
});
