//! Typed semantic query model.
//!
//! Closed vocabularies (operators, aggregate functions, join types, sort
//! directions) are enums; identifiers and join conditions stay as the SQL
//! text the caller supplied.

pub mod aggregation;
pub mod condition;
pub mod join;
pub mod order;
pub mod query;

pub use aggregation::{AggregateFunction, Aggregation};
pub use condition::{Condition, ConditionValue, Operator, Scalar};
pub use join::{Join, JoinType};
pub use order::{OrderTerm, SortDirection};
pub use query::SemanticQuery;
