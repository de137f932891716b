//! Exit code constants for the stagetime CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable request or config)
//! - 2: Render failure (one or more invocations could not be rendered)
//! - 3: Template configuration failure (the fixed template does not parse)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable input, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Render failure: malformed encoding, invalid identity, or template execution error.
pub const RENDER_FAILURE: i32 = 2;

/// Template configuration failure: a manifest or tracking template failed to parse.
pub const TEMPLATE_CONFIG_FAILURE: i32 = 3;
