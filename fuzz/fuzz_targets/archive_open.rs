//! Fuzz target for opening an archive file with arbitrary content.
//!
//! The bytes are written to a file and handed to the one-shot functions,
//! which open the file through the `zip` crate and read every entry. The
//! goal is to find panics or hangs when the backing file is malformed.
//!
//! Run with: cargo +nightly fuzz run archive_open

#![no_main]

use libfuzzer_sys::fuzz_target;
use zipmap::convenience;

fuzz_target!(|data: &[u8]| {
    let Ok(dir) = tempfile::tempdir() else {
        return;
    };
    let path = dir.path().join("fuzz.zip");
    if std::fs::write(&path, data).is_err() {
        return;
    }

    // We don't care about the result - we're looking for panics or hangs
    if let Ok(names) = convenience::list(&path) {
        for name in &names {
            let _ = convenience::read(&path, name);
        }
    }
});
