//! SQL generation module.
//!
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations
//! - [`quote`] - Literal rendering

pub mod dialect;
pub mod quote;
pub mod token;


// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use quote::{QuoteError, ValueQuoter};
pub use token::{Token, TokenStream};
