//! # semsql
//!
//! Compiles semantic queries (structured, pre-SQL descriptions of a query)
//! into single SQL statements. Literal values only ever reach the statement
//! as escaped literals.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │      free-text response from an inference service        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [document::extract]
//! ┌─────────────────────────────────────────────────────────┐
//! │           QueryDocument (loose JSON wire form)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [lowering]  ── [validation]
//! ┌─────────────────────────────────────────────────────────┐
//! │             SemanticQuery (typed model)                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compile] + [sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │          SQL statement (MySQL, Postgres, DuckDB)         │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compile;
pub mod config;
pub mod document;
pub mod hash;
pub mod inference;
pub mod lowering;
pub mod model;
pub mod sql;
pub mod summary;
pub mod validation;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{compile, compile_document, CompileOutcome, Compiler, DegradeReason};
    pub use crate::document::QueryDocument;
    pub use crate::model::{
        AggregateFunction, Aggregation, Condition, ConditionValue, Join, JoinType, Operator,
        OrderTerm, Scalar, SemanticQuery, SortDirection,
    };
    pub use crate::sql::{Dialect, SqlDialect};
    pub use crate::validation::{validate, ValidationError, ValidationReport, Validator};
}

pub use compile::{CompileOutcome, Compiler};
pub use document::QueryDocument;
pub use model::SemanticQuery;
pub use sql::Dialect;
