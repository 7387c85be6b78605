//! Fuzz target for argument token parsing and recipient creation.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run argument_token
//! ```

#![no_main]

use keyroute_args::ArgumentToken;
use keyroute_resolve::Recipient;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(token) = ArgumentToken::parse(text) else {
        return;
    };

    let shown = token.to_string();
    if token.is_masked() {
        assert!(shown.starts_with(&format!("{}:<hidden>", token.key())));
    }

    let _ = Recipient::create(&token);
});
