//! Fuzz target for `-D KEY=VALUE` overrides.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run override_pairs
//! ```

#![no_main]

use keyroute_args::source::{split_overrides, OverrideSource};
use keyroute_args::{ArgumentImportance, ArgumentSourceChain};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let args = text.split('\n').map(str::to_string);
    let (_rest, pairs) = split_overrides(args);

    let mut chain = ArgumentSourceChain::new().with(OverrideSource::new(pairs.clone()));
    if chain.init().is_err() {
        return;
    }
    for pair in &pairs {
        if let Some((name, _)) = pair.split_once('=') {
            let _ = chain.read_list(name, ArgumentImportance::Optional);
        }
    }
});
