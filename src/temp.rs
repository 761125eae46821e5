//! Generated backing paths for handles created without one.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const PREFIX: &str = "zipmap_";
const SUFFIX: &str = ".zip";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Returns a fresh path in the system temporary directory.
///
/// The name combines the current time, the process id and a per-process
/// sequence number. Nothing is created on disk and collisions are not
/// retried.
pub fn generate_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let name = format!(
        "{}{}.{:09}_{}_{}{}",
        PREFIX,
        now.as_secs(),
        now.subsec_nanos(),
        process::id(),
        seq,
        SUFFIX
    );
    std::env::temp_dir().join(name)
}
