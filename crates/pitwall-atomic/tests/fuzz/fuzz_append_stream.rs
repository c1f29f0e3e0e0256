//! Fuzz targets for pitwall-atomic.
//!
//! These targets are designed to be used with `cargo fuzz`.
//!
//! # Usage
//!
//! ```bash
//! cd crates/pitwall-atomic
//! cargo fuzz run fuzz_append_stream
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use pitwall_atomic::{AppendMode, SnapshotBuffer};

fuzz_target!(|data: &[u8]| {
    let buffer = SnapshotBuffer::new();
    let mut appended: u64 = 0;

    for chunk in data.chunks_exact(8) {
        let value = f64::from_le_bytes([
            chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
        ]);
        assert_eq!(buffer.append(value), AppendMode::Direct);
        appended += 1;
    }

    assert_eq!(buffer.pending_len(), 0);
    assert_eq!(buffer.generation().sequence(), appended);
    assert!(!buffer.generation().is_buffered());
});
