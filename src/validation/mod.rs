//! Validation of semantic query documents.
//!
//! Validation fails on the first structural problem, checked in this order:
//! no tables, aggregation functions, condition operators, join types, sort
//! directions, values and limit. Passing documents come back lowered, along
//! with advisory warnings about parts the compiler will skip.
//!
//! Validation is advisory. The compiler accepts the same input and applies
//! its own defaults.

use crate::compile::{plan_joins, SkipReason};
use crate::document::QueryDocument;
use crate::lowering::{self, LoweringError};
use crate::model::{ConditionValue, JoinType, Operator, SemanticQuery};
use crate::sql::{Dialect, SqlDialect};

/// Validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The document names no tables.
    NoTablesSpecified,
    /// Aggregation function missing or not one of COUNT, SUM, AVG, MAX, MIN.
    InvalidAggregationFunction {
        column: String,
        function: Option<String>,
    },
    /// Condition operator missing or not in the supported set.
    InvalidOperator {
        column: String,
        operator: Option<String>,
    },
    InvalidJoinType { join_type: String },
    InvalidSortDirection { column: String, direction: String },
    /// Condition value cannot become a literal.
    InvalidValue {
        column: String,
        reason: &'static str,
    },
    /// Limit is negative or not an integer.
    InvalidLimit { limit: String },
}

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(missing)")
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoTablesSpecified => write!(f, "No tables specified"),
            ValidationError::InvalidAggregationFunction { column, function } => {
                write!(
                    f,
                    "Invalid aggregation function '{}' on column '{}'",
                    or_missing(function),
                    column
                )
            }
            ValidationError::InvalidOperator { column, operator } => {
                write!(
                    f,
                    "Invalid operator '{}' on column '{}'",
                    or_missing(operator),
                    column
                )
            }
            ValidationError::InvalidJoinType { join_type } => {
                write!(f, "Invalid join type '{}'", join_type)
            }
            ValidationError::InvalidSortDirection { column, direction } => {
                write!(
                    f,
                    "Invalid sort direction '{}' on column '{}'",
                    direction, column
                )
            }
            ValidationError::InvalidValue { column, reason } => {
                write!(f, "Invalid value for column '{}': {}", column, reason)
            }
            ValidationError::InvalidLimit { limit } => write!(f, "Invalid limit: {}", limit),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<LoweringError> for ValidationError {
    fn from(err: LoweringError) -> Self {
        match err {
            LoweringError::InvalidAggregationFunction { column, function } => {
                ValidationError::InvalidAggregationFunction { column, function }
            }
            LoweringError::InvalidOperator { column, operator } => {
                ValidationError::InvalidOperator { column, operator }
            }
            LoweringError::InvalidJoinType { join_type } => {
                ValidationError::InvalidJoinType { join_type }
            }
            LoweringError::InvalidSortDirection { column, direction } => {
                ValidationError::InvalidSortDirection { column, direction }
            }
            LoweringError::InvalidValue { column, reason } => {
                ValidationError::InvalidValue { column, reason }
            }
            LoweringError::InvalidLimit { limit } => ValidationError::InvalidLimit { limit },
        }
    }
}

/// Something the compiler will tolerate but probably not as intended.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// A join names a table missing from `tables`.
    JoinTableNotListed { join: usize, table: String },
    /// A join is missing a table or its condition and will be skipped.
    IncompleteJoin { join: usize },
    /// Both sides of a join were already joined; it will be skipped.
    RedundantJoin { join: usize },
    /// A join never connects to the anchor table; it will be skipped.
    DisconnectedJoin { join: usize, anchor: String },
    /// The target dialect cannot execute this join type.
    UnsupportedJoinType {
        join: usize,
        join_type: JoinType,
        dialect: Dialect,
    },
    /// A condition with an empty column, an absent value or an empty IN
    /// list; it will be skipped.
    SkippedCondition { condition: usize, column: String },
    /// A BETWEEN value that is not a two-item list. It is compared against
    /// one quoted literal, which most databases reject.
    MalformedRange { condition: usize, column: String },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::JoinTableNotListed { join, table } => {
                write!(f, "join #{}: table '{}' is not listed in tables", join, table)
            }
            ValidationWarning::IncompleteJoin { join } => {
                write!(f, "join #{}: missing table or condition, skipped", join)
            }
            ValidationWarning::RedundantJoin { join } => {
                write!(f, "join #{}: both tables already joined, skipped", join)
            }
            ValidationWarning::DisconnectedJoin { join, anchor } => {
                write!(
                    f,
                    "join #{}: does not connect to anchor table '{}', skipped",
                    join, anchor
                )
            }
            ValidationWarning::UnsupportedJoinType {
                join,
                join_type,
                dialect,
            } => {
                write!(
                    f,
                    "join #{}: {} JOIN is not supported by {}",
                    join, join_type, dialect
                )
            }
            ValidationWarning::SkippedCondition { condition, column } => {
                write!(
                    f,
                    "condition #{} on '{}': nothing to compare, skipped",
                    condition, column
                )
            }
            ValidationWarning::MalformedRange { condition, column } => {
                write!(
                    f,
                    "condition #{} on '{}': BETWEEN needs exactly two values, \
                     compared against a single literal",
                    condition, column
                )
            }
        }
    }
}

/// A document that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub query: SemanticQuery,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Validates documents against one target dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    dialect: Dialect,
}

impl Validator {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn validate(&self, doc: &QueryDocument) -> Result<ValidationReport, ValidationError> {
        if doc.tables.is_empty() {
            return Err(ValidationError::NoTablesSpecified);
        }

        let query = lowering::lower(doc)?;
        let mut warnings = Vec::new();
        self.check_joins(&query, &mut warnings);
        check_conditions(&query, &mut warnings);

        Ok(ValidationReport { query, warnings })
    }

    fn check_joins(&self, query: &SemanticQuery, warnings: &mut Vec<ValidationWarning>) {
        let mut unlisted: Vec<&str> = Vec::new();
        for (i, join) in query.joins.iter().enumerate() {
            for table in [&join.table1, &join.table2] {
                if !table.is_empty()
                    && !query.tables.contains(table)
                    && !unlisted.contains(&table.as_str())
                {
                    unlisted.push(table);
                    warnings.push(ValidationWarning::JoinTableNotListed {
                        join: i,
                        table: table.clone(),
                    });
                }
            }

            if join.join_type == JoinType::Full && !self.dialect.supports_full_outer_join() {
                warnings.push(ValidationWarning::UnsupportedJoinType {
                    join: i,
                    join_type: join.join_type,
                    dialect: self.dialect,
                });
            }
        }

        let Some(anchor) = query.anchor() else {
            return;
        };
        for skipped in plan_joins(anchor, &query.joins).skipped {
            let join = skipped.index;
            warnings.push(match skipped.reason {
                SkipReason::Incomplete => ValidationWarning::IncompleteJoin { join },
                SkipReason::Redundant => ValidationWarning::RedundantJoin { join },
                SkipReason::Disconnected => ValidationWarning::DisconnectedJoin {
                    join,
                    anchor: anchor.to_string(),
                },
            });
        }
    }
}

fn check_conditions(query: &SemanticQuery, warnings: &mut Vec<ValidationWarning>) {
    for (i, condition) in query.conditions.iter().enumerate() {
        if !condition.is_renderable() {
            warnings.push(ValidationWarning::SkippedCondition {
                condition: i,
                column: condition.column.clone(),
            });
        } else if condition.operator == Operator::Between
            && !matches!(&condition.value, Some(ConditionValue::List(items)) if items.len() == 2)
        {
            warnings.push(ValidationWarning::MalformedRange {
                condition: i,
                column: condition.column.clone(),
            });
        }
    }
}

/// Validate against the default (MySQL) dialect.
pub fn validate(doc: &QueryDocument) -> Result<ValidationReport, ValidationError> {
    Validator::default().validate(doc)
}
