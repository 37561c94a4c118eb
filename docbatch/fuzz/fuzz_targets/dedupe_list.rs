#![no_main]

use docbatch::config::DedupPolicy;
use docbatch::filelist::{FileKind, FileList};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

fuzz_target!(|data: &[u8]| {
    let s = std::str::from_utf8(data).unwrap_or("");

    // Two alphanumeric chars per name so duplicates are common and every
    // name is a plain `.pdf` file.
    let names: Vec<String> = s
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphanumeric)
                .take(2)
                .collect::<String>()
        })
        .filter(|stem| !stem.is_empty())
        .map(|stem| format!("{stem}.pdf"))
        .collect();

    let mut list = FileList::new(FileKind::Pdf);
    assert!(list.add(names.iter().map(String::as_str)).is_empty());

    for policy in [DedupPolicy::KeepLast, DedupPolicy::KeepFirst] {
        let once = list.dedupe(policy);
        let twice = once.dedupe(policy);
        assert_eq!(once.paths(), twice.paths());

        let distinct: HashSet<_> = list.paths().into_iter().collect();
        assert_eq!(once.len(), distinct.len());
    }
});
