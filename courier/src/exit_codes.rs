//! Stable exit codes for courier CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid usage, config, or other local errors.
pub const INVALID: i32 = 1;
/// Operation rejected locally (validation, conflict, unknown stop).
pub const REJECTED: i32 = 2;
/// Remote call failed; the route was left as it was.
pub const NETWORK: i32 = 3;
/// No bearer credential was supplied.
pub const MISSING_CREDENTIAL: i32 = 4;
