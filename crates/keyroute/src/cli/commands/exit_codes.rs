//! Exit code constants for CLI commands.
//!
//! These exit codes are used consistently across all commands to indicate
//! the result of the operation.

/// Successful operation, including help and version requests.
pub const EXIT_SUCCESS: i32 = 0;

/// The command failed and the usage was shown (`-v`), or the command line
/// could not be parsed.
pub const EXIT_USAGE: i32 = 1;

/// General error (argument resolution, configuration, directory, I/O).
pub const EXIT_ERROR: i32 = 2;
