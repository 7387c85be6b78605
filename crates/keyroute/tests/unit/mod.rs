//! Grammar tests for the keyroute command line.

pub mod cli_parse_test;
