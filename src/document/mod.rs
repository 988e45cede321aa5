//! The semantic query document: the loosely typed JSON form produced by the
//! inference collaborator.
//!
//! Every field is optional and enumerated values are plain strings, so any
//! well-formed JSON object deserializes. Turning a document into a typed
//! [`SemanticQuery`](crate::model::SemanticQuery) is the job of
//! [`lowering`](crate::lowering); judging it is the job of
//! [`validation`](crate::validation).
//!
//! ```json
//! {
//!     "tables": ["users", "orders"],
//!     "columns": ["users.id", "SUM(orders.amount) as total_amount"],
//!     "conditions": [{"column": "orders.status", "operator": "=", "value": "paid"}],
//!     "aggregations": [{"function": "SUM", "column": "orders.amount", "alias": "total_amount"}],
//!     "joins": [{"type": "INNER", "table1": "users", "table2": "orders",
//!                "condition": "users.id = orders.user_id"}],
//!     "order_by": [{"column": "total_amount", "direction": "DESC"}],
//!     "group_by": ["users.id"],
//!     "limit": 10
//! }
//! ```

mod extract;

pub use extract::extract_json_object;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Errors reading a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("No JSON object found in response")]
    NoJsonObject,

    #[error("Invalid semantic query document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Root of a semantic query document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDocument {
    #[serde(deserialize_with = "null_as_default")]
    pub tables: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub columns: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub conditions: Vec<ConditionDoc>,

    #[serde(deserialize_with = "null_as_default")]
    pub aggregations: Vec<AggregationDoc>,

    #[serde(deserialize_with = "null_as_default")]
    pub joins: Vec<JoinDoc>,

    pub order_by: Option<Vec<OrderTermDoc>>,

    pub group_by: Option<Vec<String>>,

    /// Integer, numeric string, or null.
    pub limit: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionDoc {
    pub column: Option<String>,
    pub operator: Option<String>,
    pub value: Option<Value>,
    pub table: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationDoc {
    pub function: Option<String>,
    pub column: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinDoc {
    #[serde(rename = "type")]
    pub join_type: Option<String>,
    pub table1: Option<String>,
    pub table2: Option<String>,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderTermDoc {
    pub column: Option<String>,
    pub direction: Option<String>,
}

impl QueryDocument {
    /// The document every failed extraction falls back to.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Extract and parse the first JSON object embedded in `response`.
    pub fn from_response(response: &str) -> Result<Self, DocumentError> {
        let json = extract_json_object(response).ok_or(DocumentError::NoJsonObject)?;
        Self::from_json(json)
    }

    /// Like [`from_response`](Self::from_response), falling back to the
    /// empty document on any error.
    pub fn from_response_or_empty(response: &str) -> Self {
        Self::from_response(response).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to empty semantic query");
            Self::empty()
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
