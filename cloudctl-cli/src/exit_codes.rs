//! Process exit codes.

/// Command completed.
pub const EXIT_SUCCESS: i32 = 0;

/// Remote, transport, decode or configuration failure.
pub const EXIT_ERROR: i32 = 1;

/// Invalid input, detected before any request is sent. Matches clap's
/// exit code for usage errors.
pub const EXIT_USAGE: i32 = 2;

/// Missing or rejected access token.
pub const EXIT_AUTH: i32 = 3;
