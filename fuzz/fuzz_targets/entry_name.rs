//! Fuzz target for EntryName::new with arbitrary string input.
//!
//! Run with: cargo +nightly fuzz run entry_name

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(name) = zipmap::EntryName::new(s) {
            // Accepted names are stored verbatim
            assert_eq!(name.as_str(), s);
            assert!(!s.is_empty());
            assert!(!s.contains('\0'));
            assert!(s.len() <= zipmap::entry_name::MAX_NAME_LENGTH);
        }
    }
});
