//! Exit codes for CLI operations
//!
//! Argument errors are reported by clap with its own code.

/// Success - operation completed without errors
pub const SUCCESS: u8 = 0;

/// General error - unspecified failure
pub const ERROR: u8 = 1;

/// Resolution error - bad environment alias, missing required file, bad config
pub const RESOLUTION_ERROR: u8 = 2;

/// Path template error - a path pattern failed to parse or render
pub const PATH_TEMPLATE_ERROR: u8 = 3;

/// Engine error - ytt failed, is missing, or produced unexpected output
pub const ENGINE_ERROR: u8 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: u8 = 5;
