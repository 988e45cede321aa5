//! Compilation from a semantic query to SQL.
//!
//! ```text
//! QueryDocument → lower_lenient → SemanticQuery → clauses → SQL
//! ```
//!
//! Compilation never fails outright. A query with no tables, or one that hits
//! an internal fault, compiles to a harmless `SELECT 1; -- ...` statement and
//! the outcome is tagged [`CompileOutcome::Degraded`].
//!
//! # Example
//!
//! ```ignore
//! use semsql::compile::Compiler;
//! use semsql::model::{Condition, SemanticQuery};
//! use semsql::sql::Dialect;
//!
//! let query = SemanticQuery::from_tables(["orders"])
//!     .select(["id", "amount"])
//!     .filter(Condition::eq("status", "paid"))
//!     .limit(10);
//!
//! let sql = Compiler::new(Dialect::MySql).compile(&query).into_sql();
//! assert_eq!(sql, "SELECT id, amount FROM orders WHERE status = 'paid' LIMIT 10");
//! ```

pub mod clauses;
pub mod joins;

pub use joins::{plan_joins, JoinPlan, JoinStep, SkipReason, SkippedJoin};

use crate::document::QueryDocument;
use crate::lowering::{self, LoweringError};
use crate::model::SemanticQuery;
use crate::sql::{Dialect, QuoteError, Token, TokenStream, ValueQuoter};

// ============================================================================
// Error Types
// ============================================================================

/// Faults that turn a compile into the error fallback statement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("{0}")]
    Quote(#[from] QuoteError),

    #[error("{0}")]
    Lowering(#[from] LoweringError),
}

/// Why a compile produced a fallback statement.
#[derive(Debug, Clone, PartialEq)]
pub enum DegradeReason {
    NoTables,
    Failed(CompileError),
}

impl std::fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradeReason::NoTables => write!(f, "No tables specified"),
            DegradeReason::Failed(err) => write!(f, "Error generating SQL: {}", err),
        }
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result of a compile. Always carries a single SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileOutcome {
    Compiled(String),
    Degraded { sql: String, reason: DegradeReason },
}

impl CompileOutcome {
    fn degraded(reason: DegradeReason, dialect: Dialect) -> Self {
        let mut ts = TokenStream::new();
        ts.push(Token::Select)
            .space()
            .push(Token::LitInt(1))
            .push(Token::Semicolon)
            .space()
            .push(Token::Comment(reason.to_string()));

        CompileOutcome::Degraded {
            sql: ts.serialize(dialect),
            reason,
        }
    }

    pub fn sql(&self) -> &str {
        match self {
            CompileOutcome::Compiled(sql) => sql,
            CompileOutcome::Degraded { sql, .. } => sql,
        }
    }

    pub fn into_sql(self) -> String {
        match self {
            CompileOutcome::Compiled(sql) => sql,
            CompileOutcome::Degraded { sql, .. } => sql,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, CompileOutcome::Degraded { .. })
    }

    pub fn degrade_reason(&self) -> Option<&DegradeReason> {
        match self {
            CompileOutcome::Compiled(_) => None,
            CompileOutcome::Degraded { reason, .. } => Some(reason),
        }
    }
}

// ============================================================================
// Compiler
// ============================================================================

/// Compiles semantic queries for one dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compiler {
    dialect: Dialect,
}

impl Compiler {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Compile a typed query.
    pub fn compile(&self, query: &SemanticQuery) -> CompileOutcome {
        if query.tables.is_empty() {
            return self.degrade(DegradeReason::NoTables);
        }

        match self.render(query) {
            Ok(sql) => {
                if tracing::enabled!(tracing::Level::DEBUG) {
                    tracing::debug!(
                        dialect = %self.dialect,
                        fingerprint = %query.fingerprint().unwrap_or_default(),
                        "compiled semantic query"
                    );
                }
                CompileOutcome::Compiled(sql)
            }
            Err(err) => self.degrade(DegradeReason::Failed(err)),
        }
    }

    /// Lower a document leniently, then compile it.
    ///
    /// Keywords the lenient reader cannot recognize degrade the compile
    /// instead of reaching the statement.
    pub fn compile_document(&self, doc: &QueryDocument) -> CompileOutcome {
        if doc.tables.is_empty() {
            return self.degrade(DegradeReason::NoTables);
        }

        match lowering::lower_lenient(doc) {
            Ok(query) => self.compile(&query),
            Err(err) => self.degrade(DegradeReason::Failed(err.into())),
        }
    }

    fn degrade(&self, reason: DegradeReason) -> CompileOutcome {
        tracing::warn!(dialect = %self.dialect, reason = %reason, "degraded compile");
        CompileOutcome::degraded(reason, self.dialect)
    }

    fn render(&self, query: &SemanticQuery) -> Result<String, CompileError> {
        let quoter = ValueQuoter::new(self.dialect);
        let plan = query
            .anchor()
            .map(|anchor| plan_joins(anchor, &query.joins))
            .unwrap_or_default();

        for skipped in &plan.skipped {
            tracing::warn!(
                index = skipped.index,
                reason = ?skipped.reason,
                "skipping join"
            );
        }

        let parts = [
            Some(clauses::select(&query.columns)),
            clauses::from(&query.tables, !query.joins.is_empty()),
            clauses::joins(&plan.steps),
            clauses::where_clause(&query.conditions, &quoter)?,
            clauses::group_by(query.group_by.as_deref()),
            clauses::order_by(query.order_by.as_deref()),
            clauses::limit(query.effective_limit(), self.dialect),
        ];

        let mut ts = TokenStream::new();
        for (i, clause) in parts.iter().flatten().enumerate() {
            if i > 0 {
                ts.space();
            }
            ts.append(clause);
        }
        Ok(ts.serialize(self.dialect))
    }
}

/// Compile with the default (MySQL) dialect.
pub fn compile(query: &SemanticQuery) -> CompileOutcome {
    Compiler::default().compile(query)
}

/// Lower and compile a document with the default (MySQL) dialect.
pub fn compile_document(doc: &QueryDocument) -> CompileOutcome {
    Compiler::default().compile_document(doc)
}
