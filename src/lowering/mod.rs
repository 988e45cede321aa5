//! Lowering a query document to a typed semantic query.
//!
//! Two modes:
//!
//! - **Strict** ([`lower`]): enumerated values must use their canonical
//!   spelling (`"="`, `"LIKE"`, `"SUM"`, `"LEFT"`, `"DESC"`) and every
//!   condition and aggregation must name one. Used by validation.
//! - **Lenient** ([`lower_lenient`]): keywords are matched ignoring case and
//!   whitespace, a missing operator means `=`, aggregations that cannot be
//!   read are dropped (they never reach SQL) and a whole-number float limit
//!   such as `10.0` is read as an integer. Used by the compiler.
//!
//! In both modes a missing join type means `INNER` and a missing direction
//! means `ASC`. Values that cannot become literals and malformed limits are
//! errors in both modes.

use serde_json::Value;

use crate::document::{AggregationDoc, ConditionDoc, JoinDoc, OrderTermDoc, QueryDocument};
use crate::model::{
    AggregateFunction, Aggregation, Condition, ConditionValue, Join, JoinType, Operator,
    OrderTerm, Scalar, SemanticQuery, SortDirection,
};

/// Errors lowering a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoweringError {
    #[error("Invalid aggregation function {} on column '{column}'", describe(.function))]
    InvalidAggregationFunction {
        column: String,
        function: Option<String>,
    },

    #[error("Invalid operator {} on column '{column}'", describe(.operator))]
    InvalidOperator {
        column: String,
        operator: Option<String>,
    },

    #[error("Invalid join type '{join_type}'")]
    InvalidJoinType { join_type: String },

    #[error("Invalid sort direction '{direction}' on column '{column}'")]
    InvalidSortDirection { column: String, direction: String },

    #[error("Invalid value for column '{column}': {reason}")]
    InvalidValue {
        column: String,
        reason: &'static str,
    },

    #[error("Invalid limit: {limit}")]
    InvalidLimit { limit: String },
}

fn describe(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("'{}'", v),
        None => "(missing)".to_string(),
    }
}

/// How strictly keywords are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoweringMode {
    Strict,
    Lenient,
}

/// Lower a document, requiring canonical keywords.
pub fn lower(doc: &QueryDocument) -> Result<SemanticQuery, LoweringError> {
    Lowerer::new(LoweringMode::Strict).lower(doc)
}

/// Lower a document with the compiler's defaults.
pub fn lower_lenient(doc: &QueryDocument) -> Result<SemanticQuery, LoweringError> {
    Lowerer::new(LoweringMode::Lenient).lower(doc)
}

struct Lowerer {
    mode: LoweringMode,
}

impl Lowerer {
    fn new(mode: LoweringMode) -> Self {
        Self { mode }
    }

    fn strict(&self) -> bool {
        self.mode == LoweringMode::Strict
    }

    fn lower(&self, doc: &QueryDocument) -> Result<SemanticQuery, LoweringError> {
        // Aggregations are checked before conditions, conditions before joins.
        let mut aggregations = Vec::with_capacity(doc.aggregations.len());
        for agg in &doc.aggregations {
            if let Some(aggregation) = self.lower_aggregation(agg)? {
                aggregations.push(aggregation);
            }
        }

        let conditions = doc
            .conditions
            .iter()
            .map(|c| self.lower_condition(c))
            .collect::<Result<Vec<_>, _>>()?;

        let joins = doc
            .joins
            .iter()
            .map(|j| self.lower_join(j))
            .collect::<Result<Vec<_>, _>>()?;

        let order_by = doc
            .order_by
            .as_ref()
            .map(|terms| {
                terms
                    .iter()
                    .map(|t| self.lower_order_term(t))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(SemanticQuery {
            tables: doc.tables.clone(),
            columns: doc.columns.clone(),
            conditions,
            aggregations,
            joins,
            order_by,
            group_by: doc.group_by.clone(),
            limit: self.lower_limit(doc.limit.as_ref())?,
        })
    }

    fn lower_aggregation(
        &self,
        agg: &AggregationDoc,
    ) -> Result<Option<Aggregation>, LoweringError> {
        let column = agg.column.clone().unwrap_or_default();
        let function = agg.function.as_deref().and_then(|f| {
            if self.strict() {
                AggregateFunction::from_canonical(f)
            } else {
                AggregateFunction::from_str(f)
            }
        });

        match function {
            Some(function) => Ok(Some(Aggregation {
                function,
                column,
                alias: agg.alias.clone(),
            })),
            None if self.strict() => Err(LoweringError::InvalidAggregationFunction {
                column,
                function: agg.function.clone(),
            }),
            None => {
                tracing::debug!(
                    column = %column,
                    function = ?agg.function,
                    "dropping unreadable aggregation"
                );
                Ok(None)
            }
        }
    }

    fn lower_condition(&self, cond: &ConditionDoc) -> Result<Condition, LoweringError> {
        let column = cond.column.clone().unwrap_or_default();

        let operator = match cond.operator.as_deref() {
            Some(op) if self.strict() => Operator::from_canonical(op),
            Some(op) => Operator::from_str(op),
            None if self.strict() => None,
            None => Some(Operator::Eq),
        }
        .ok_or_else(|| LoweringError::InvalidOperator {
            column: column.clone(),
            operator: cond.operator.clone(),
        })?;

        let value = match &cond.value {
            Some(v) => lower_value(&column, v)?,
            None => None,
        };

        Ok(Condition {
            column,
            operator,
            value,
            table: cond.table.clone(),
        })
    }

    fn lower_join(&self, join: &JoinDoc) -> Result<Join, LoweringError> {
        let join_type = match join.join_type.as_deref() {
            None => Some(JoinType::Inner),
            Some(jt) if self.strict() => JoinType::from_canonical(jt),
            Some(jt) => JoinType::from_str(jt),
        }
        .ok_or_else(|| LoweringError::InvalidJoinType {
            join_type: join.join_type.clone().unwrap_or_default(),
        })?;

        Ok(Join {
            join_type,
            table1: join.table1.clone().unwrap_or_default(),
            table2: join.table2.clone().unwrap_or_default(),
            condition: join.condition.clone().unwrap_or_default(),
        })
    }

    fn lower_order_term(&self, term: &OrderTermDoc) -> Result<OrderTerm, LoweringError> {
        let column = term.column.clone().unwrap_or_default();
        let direction = match term.direction.as_deref() {
            None => Some(SortDirection::Asc),
            Some(d) if self.strict() => SortDirection::from_canonical(d),
            Some(d) => SortDirection::from_str(d),
        }
        .ok_or_else(|| LoweringError::InvalidSortDirection {
            column: column.clone(),
            direction: term.direction.clone().unwrap_or_default(),
        })?;

        Ok(OrderTerm { column, direction })
    }

    fn lower_limit(&self, limit: Option<&Value>) -> Result<Option<u64>, LoweringError> {
        let invalid = |v: &Value| LoweringError::InvalidLimit {
            limit: v.to_string(),
        };

        match limit {
            None | Some(Value::Null) => Ok(None),
            Some(v @ Value::Number(n)) => match n.as_u64() {
                Some(n) => Ok(Some(n)),
                None if !self.strict() => n
                    .as_f64()
                    .and_then(whole_u64)
                    .map(Some)
                    .ok_or_else(|| invalid(v)),
                None => Err(invalid(v)),
            },
            Some(v @ Value::String(s)) => {
                s.trim().parse::<u64>().map(Some).map_err(|_| invalid(v))
            }
            Some(v) => Err(invalid(v)),
        }
    }
}

fn lower_value(column: &str, value: &Value) -> Result<Option<ConditionValue>, LoweringError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let scalars = items
                .iter()
                .map(|item| match item {
                    Value::Array(_) => Err(invalid_value(column, "nested sequence")),
                    other => lower_scalar(column, other),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(ConditionValue::List(scalars)))
        }
        other => lower_scalar(column, other).map(|s| Some(ConditionValue::Scalar(s))),
    }
}

fn lower_scalar(column: &str, value: &Value) -> Result<Scalar, LoweringError> {
    match value {
        Value::Null => Ok(Scalar::Null),
        Value::Bool(b) => Ok(Scalar::Bool(*b)),
        Value::String(s) => Ok(Scalar::String(s.clone())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Scalar::Int(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Scalar::UInt(u))
            } else {
                n.as_f64()
                    .map(Scalar::Float)
                    .ok_or_else(|| invalid_value(column, "number out of range"))
            }
        }
        Value::Array(_) => Err(invalid_value(column, "unexpected sequence")),
        Value::Object(_) => Err(invalid_value(column, "objects are not literals")),
    }
}

/// `10.0` -> `10`; fractions, negatives and out-of-range values -> `None`.
fn whole_u64(f: f64) -> Option<u64> {
    if f.is_finite() && f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

fn invalid_value(column: &str, reason: &'static str) -> LoweringError {
    LoweringError::InvalidValue {
        column: column.to_string(),
        reason,
    }
}
