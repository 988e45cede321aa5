//! The semantic query: a structured, pre-SQL description of a query.

use serde::Serialize;

use super::aggregation::Aggregation;
use super::condition::Condition;
use super::join::Join;
use super::order::OrderTerm;
use crate::hash::compute_hash;

/// A semantic query.
///
/// Built once per request and never mutated afterwards; the builder methods
/// consume and return `self`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[must_use = "builders have no effect until used"]
pub struct SemanticQuery {
    /// Tables in order. The first one anchors FROM when joins are present.
    pub tables: Vec<String>,

    /// Column expressions. Empty selects `*`.
    pub columns: Vec<String>,

    pub conditions: Vec<Condition>,

    pub aggregations: Vec<Aggregation>,

    pub joins: Vec<Join>,

    pub order_by: Option<Vec<OrderTerm>>,

    pub group_by: Option<Vec<String>>,

    /// Row limit. `None` and `Some(0)` both mean no LIMIT clause.
    pub limit: Option<u64>,
}

impl SemanticQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query over the given tables.
    pub fn from_tables<S: AsRef<str>>(tables: impl IntoIterator<Item = S>) -> Self {
        Self {
            tables: tables.into_iter().map(|t| t.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn select<S: AsRef<str>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn aggregate(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn group_by<S: AsRef<str>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.group_by = Some(
            columns
                .into_iter()
                .map(|c| c.as_ref().to_string())
                .collect(),
        );
        self
    }

    pub fn order_by(mut self, terms: Vec<OrderTerm>) -> Self {
        self.order_by = Some(terms);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The anchor table, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.tables.first().map(String::as_str)
    }

    /// Limit that actually produces a LIMIT clause.
    pub fn effective_limit(&self) -> Option<u64> {
        self.limit.filter(|&n| n > 0)
    }

    /// SHA-256 of the query's JSON form, for correlating log lines.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        compute_hash(self)
    }
}
