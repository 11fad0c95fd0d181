/// Exit codes for kebablint, following Ruff's convention so CI systems can
/// tell lint findings apart from tool failures.
/// Success - no issues found
pub const SUCCESS: i32 = 0;

/// One or more violations detected
pub const VIOLATIONS_FOUND: i32 = 1;

/// Configuration error, file access error, or internal error
pub const TOOL_ERROR: i32 = 2;

pub mod exit {
    use super::{SUCCESS, TOOL_ERROR, VIOLATIONS_FOUND};

    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    pub fn violations_found() -> ! {
        std::process::exit(VIOLATIONS_FOUND);
    }

    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
