//! User-facing narration of a compiled query.

use std::fmt;

use crate::compile::CompileOutcome;
use crate::document::QueryDocument;
use crate::model::SemanticQuery;
use crate::sql::Dialect;

/// What a compiled query touches, plus the statement itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub tables: Vec<String>,
    pub columns: Vec<String>,
    pub conditions: usize,
    pub aggregations: usize,
    pub joins: usize,
    pub dialect: Dialect,
    pub sql: String,
    /// Set when the statement is a fallback.
    pub note: Option<String>,
}

impl Summary {
    pub fn new(query: &SemanticQuery, outcome: &CompileOutcome, dialect: Dialect) -> Self {
        Self {
            tables: query.tables.clone(),
            columns: query.columns.clone(),
            conditions: query.conditions.len(),
            aggregations: query.aggregations.len(),
            joins: query.joins.len(),
            dialect,
            sql: outcome.sql().to_string(),
            note: outcome.degrade_reason().map(|r| r.to_string()),
        }
    }

    /// Summary taken from the document as received, for outcomes where
    /// lowering may not have succeeded.
    pub fn from_document(doc: &QueryDocument, outcome: &CompileOutcome, dialect: Dialect) -> Self {
        Self {
            tables: doc.tables.clone(),
            columns: doc.columns.clone(),
            conditions: doc.conditions.len(),
            aggregations: doc.aggregations.len(),
            joins: doc.joins.len(),
            dialect,
            sql: outcome.sql().to_string(),
            note: outcome.degrade_reason().map(|r| r.to_string()),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Semantic query:")?;
        if self.tables.is_empty() {
            writeln!(f, "- Tables: none specified")?;
        } else {
            writeln!(f, "- Tables: {}", self.tables.join(", "))?;
        }
        if self.columns.is_empty() {
            writeln!(f, "- Columns: all columns")?;
        } else {
            writeln!(f, "- Columns: {}", self.columns.join(", "))?;
        }

        // Counts only appear when non-zero.
        if self.conditions > 0 {
            writeln!(f, "- Conditions: {}", self.conditions)?;
        }
        if self.aggregations > 0 {
            writeln!(f, "- Aggregations: {}", self.aggregations)?;
        }
        if self.joins > 0 {
            writeln!(f, "- Joins: {}", self.joins)?;
        }

        writeln!(f)?;
        writeln!(f, "SQL ({}):", self.dialect)?;
        writeln!(f, "```sql")?;
        writeln!(f, "{}", self.sql)?;
        write!(f, "```")?;

        if let Some(note) = &self.note {
            write!(f, "\n\nNote: {}", note)?;
        }
        Ok(())
    }
}
