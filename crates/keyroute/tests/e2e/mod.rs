//! End-to-end runs of the keyroute tool.

pub mod card_test;
pub mod exit_code_test;
pub mod key_test;
pub mod keygen_test;
pub mod recipients_test;
