//! Fuzz target for textual generation requests.
//!
//! Arbitrary text must parse or fail with `InvalidSpecification`, and every parsed request
//! must print back to text that parses to the same request.

#![no_main]

use intvec::GenerationRequest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    match text.parse::<GenerationRequest>() {
        Ok(request) => {
            let reparsed: GenerationRequest = request
                .to_string()
                .parse()
                .expect("canonical form always parses");
            assert_eq!(reparsed, request);
        }
        Err(err) => assert!(err.is_invalid_specification()),
    }
});
