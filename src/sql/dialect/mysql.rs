//! MySQL SQL dialect.
//!
//! MySQL differences from ANSI:
//! - Backslash is an escape character inside string literals (unless
//!   `NO_BACKSLASH_ESCAPES` is set), so it must be escaped too
//! - TRUE/FALSE are aliases for 1/0
//! - No FULL OUTER JOIN: `FULL` is parsed as a table alias

use super::helpers;
use super::SqlDialect;

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_backslash(s)
    }

    // Uses default emit_limit (LIMIT n)

    fn supports_full_outer_join(&self) -> bool {
        false
    }
}
