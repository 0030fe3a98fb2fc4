//! Fuzz target for wildcard pattern parsing.
//!
//! Verifies:
//!
//! 1. **No panics**: arbitrary text is either parsed or rejected
//! 2. **Roundtrip invariant**: `parse(format(base, mask)) == (base, mask)` for accepted patterns
//! 3. **Expansion shape**: small masks expand to `2^popcount` values sharing the fixed bits

#![no_main]

use intvec::{wildcard_expand, wildcard_format, wildcard_parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok((base, mask)) = wildcard_parse(text) else {
        return;
    };

    // the parser never sets a base bit under a wildcard
    assert_eq!(base & mask, 0);
    let formatted = wildcard_format(base, mask);
    assert_eq!(wildcard_parse(&formatted).ok(), Some((base, mask)));

    if mask.count_ones() <= 12 {
        let values = wildcard_expand(base, mask).expect("small masks always expand");
        assert_eq!(values.len(), 1 << mask.count_ones());
        assert!(values.iter().all(|v| v & !mask == base));
    }
});
