//! Natural-language translation through an external inference service.
//!
//! The service itself is out of scope. [`Inference`] is the seam: it takes a
//! prompt and returns the raw response text. The [`Translator`] builds the
//! prompt, extracts the document from the response, falls back to the empty
//! document when that fails, and compiles.
//!
//! ```ignore
//! use semsql::inference::{Inference, InferenceError, Translator};
//! use semsql::sql::Dialect;
//!
//! struct Canned;
//!
//! impl Inference for Canned {
//!     fn complete(&self, _prompt: &str) -> Result<String, InferenceError> {
//!         Ok(r#"{"tables": ["orders"], "limit": 10}"#.into())
//!     }
//! }
//!
//! let translation = Translator::new(Canned, Dialect::MySql).translate("latest orders");
//! assert_eq!(translation.sql(), "SELECT * FROM orders LIMIT 10");
//! ```

use std::sync::LazyLock;

use crate::compile::{CompileOutcome, Compiler};
use crate::document::QueryDocument;
use crate::model::{AggregateFunction, JoinType, Operator};
use crate::sql::Dialect;
use crate::summary::Summary;

/// Errors from the inference service.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Inference service unavailable: {0}")]
    Unavailable(String),

    #[error("Inference request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A text-generation service.
///
/// Calls are synchronous; any timeout belongs to the implementor.
pub trait Inference: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, InferenceError>;
}

impl<T: Inference + ?Sized> Inference for &T {
    fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        (**self).complete(prompt)
    }
}

fn keywords<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Instructions sent ahead of every question.
pub static SYSTEM_PROMPT: LazyLock<String> = LazyLock::new(|| {
    format!(
        r#"You convert natural-language questions about a relational database into a semantic query document.

Reply with exactly one JSON object and nothing else, using these fields:
{{
    "tables": ["table1", "table2"],
    "columns": ["column1", "column2", "FUNCTION(column) as alias"],
    "conditions": [
        {{"column": "column", "operator": "operator", "value": "value", "table": "table"}}
    ],
    "aggregations": [
        {{"function": "FUNCTION", "column": "column", "alias": "alias"}}
    ],
    "joins": [
        {{"type": "JOIN TYPE", "table1": "table1", "table2": "table2", "condition": "join condition"}}
    ],
    "order_by": [{{"column": "column", "direction": "ASC or DESC"}}],
    "group_by": ["column"],
    "limit": null
}}

Supported operators: {operators}
Supported aggregation functions: {functions}
Supported join types: {join_types}

Example question: "total order amount per user"
{{
    "tables": ["users", "orders"],
    "columns": ["users.id", "SUM(orders.amount) as total_amount"],
    "conditions": [],
    "aggregations": [{{"function": "SUM", "column": "orders.amount", "alias": "total_amount"}}],
    "joins": [{{"type": "INNER", "table1": "users", "table2": "orders", "condition": "users.id = orders.user_id"}}],
    "order_by": [],
    "group_by": ["users.id"],
    "limit": null
}}"#,
        operators = keywords(Operator::ALL),
        functions = keywords(AggregateFunction::ALL),
        join_types = keywords(JoinType::ALL),
    )
});

/// Full prompt for `question`, with optional schema description.
pub fn build_prompt(question: &str, schema: Option<&str>) -> String {
    let mut prompt = SYSTEM_PROMPT.clone();
    if let Some(schema) = schema.map(str::trim).filter(|s| !s.is_empty()) {
        prompt.push_str("\n\nDatabase schema:\n");
        prompt.push_str(schema);
    }
    prompt.push_str("\n\nQuestion: ");
    prompt.push_str(question.trim());
    prompt
}

/// Where a translation's document came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    /// Extracted from the service's response.
    Parsed,
    /// The empty document, substituted after a failure.
    Fallback { reason: String },
}

/// Result of translating one question.
#[derive(Debug, Clone)]
pub struct Translation {
    pub question: String,
    pub document: QueryDocument,
    pub source: DocumentSource,
    pub outcome: CompileOutcome,
    pub dialect: Dialect,
}

impl Translation {
    pub fn sql(&self) -> &str {
        self.outcome.sql()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, DocumentSource::Fallback { .. })
    }

    pub fn summary(&self) -> Summary {
        Summary::from_document(&self.document, &self.outcome, self.dialect)
    }
}

/// Question in, SQL out.
pub struct Translator<I> {
    inference: I,
    compiler: Compiler,
    schema: Option<String>,
}

impl<I: Inference> Translator<I> {
    pub fn new(inference: I, dialect: Dialect) -> Self {
        Self {
            inference,
            compiler: Compiler::new(dialect),
            schema: None,
        }
    }

    /// Describe the database to the service in every prompt.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Ask the service for a document and compile it.
    ///
    /// Never fails: service and extraction errors produce the empty document,
    /// which compiles to the no-tables fallback statement.
    pub fn translate(&self, question: &str) -> Translation {
        let prompt = build_prompt(question, self.schema.as_deref());

        let (document, source) = match self.request(&prompt) {
            Ok(document) => (document, DocumentSource::Parsed),
            Err(reason) => {
                tracing::warn!(reason = %reason, "falling back to empty semantic query");
                (QueryDocument::empty(), DocumentSource::Fallback { reason })
            }
        };

        let outcome = self.compiler.compile_document(&document);
        Translation {
            question: question.to_string(),
            document,
            source,
            outcome,
            dialect: self.compiler.dialect(),
        }
    }

    fn request(&self, prompt: &str) -> Result<QueryDocument, String> {
        let response = self.inference.complete(prompt).map_err(|e| e.to_string())?;
        tracing::debug!(bytes = response.len(), "inference response received");
        QueryDocument::from_response(&response).map_err(|e| e.to_string())
    }
}
