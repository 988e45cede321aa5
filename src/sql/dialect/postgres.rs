//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features relevant here:
//! - Standard-conforming strings: only `'` needs escaping
//! - Native boolean type (true/false)
//! - FULL OUTER JOIN

use super::SqlDialect;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }
}
