//! keyroute binary entry point.

use std::io;

use keyroute::{run, RunOptions};
use keyroute_args::TerminalPrompt;

fn main() {
    let code = run(
        std::env::args(),
        TerminalPrompt::new(),
        &RunOptions::binary(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    std::process::exit(code);
}
