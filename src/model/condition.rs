//! Filter conditions and their literal values.

use serde::Serialize;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "BETWEEN")]
    Between,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::Like,
        Operator::In,
        Operator::Between,
    ];

    /// Canonical spelling, as emitted into SQL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::Between => "BETWEEN",
        }
    }

    /// Parse the exact canonical spelling.
    pub fn from_canonical(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    /// Parse an operator, ignoring case and surrounding whitespace.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::from_canonical(&s.trim().to_uppercase())
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Int(i64),
    /// Integers above `i64::MAX`.
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Scalar {
    /// Text form used when a value has to be carried as one string literal.
    pub fn display_text(&self) -> String {
        match self {
            Scalar::String(s) => s.clone(),
            Scalar::Int(n) => n.to_string(),
            Scalar::UInt(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Null => "null".to_string(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Scalar::Int(i),
            Err(_) => Scalar::UInt(n),
        }
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Int(n.into())
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// The right-hand side of a condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Scalar(Scalar),
    /// Sequence of scalars, used by `IN` and `BETWEEN`.
    List(Vec<Scalar>),
}

impl ConditionValue {
    pub fn list<T: Into<Scalar>>(items: impl IntoIterator<Item = T>) -> Self {
        ConditionValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Bracketed text of the value, e.g. `[1, 2, 3]`.
    pub fn display_text(&self) -> String {
        match self {
            ConditionValue::Scalar(s) => s.display_text(),
            ConditionValue::List(items) => {
                let parts: Vec<String> = items.iter().map(Scalar::display_text).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

macro_rules! scalar_condition_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConditionValue {
                fn from(value: $ty) -> Self {
                    ConditionValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_condition_value!(&str, String, i64, u64, i32, f64, bool);

impl From<Scalar> for ConditionValue {
    fn from(value: Scalar) -> Self {
        ConditionValue::Scalar(value)
    }
}

impl From<Vec<Scalar>> for ConditionValue {
    fn from(items: Vec<Scalar>) -> Self {
        ConditionValue::List(items)
    }
}

/// A `column operator value` filter. Conditions are combined with AND.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    /// `None` when the value was absent or null; such conditions are skipped.
    pub value: Option<ConditionValue>,
    /// Table the column belongs to. Informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl Condition {
    pub fn new(column: &str, operator: Operator, value: impl Into<ConditionValue>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: Some(value.into()),
            table: None,
        }
    }

    pub fn eq(column: &str, value: impl Into<ConditionValue>) -> Self {
        Self::new(column, Operator::Eq, value)
    }

    pub fn in_list<T: Into<Scalar>>(column: &str, values: impl IntoIterator<Item = T>) -> Self {
        Self::new(column, Operator::In, ConditionValue::list(values))
    }

    pub fn between(column: &str, low: impl Into<Scalar>, high: impl Into<Scalar>) -> Self {
        Self::new(
            column,
            Operator::Between,
            ConditionValue::List(vec![low.into(), high.into()]),
        )
    }

    pub fn with_table(mut self, table: &str) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Whether the compiler will render this condition.
    pub fn is_renderable(&self) -> bool {
        if self.column.is_empty() {
            return false;
        }
        match &self.value {
            None => false,
            Some(ConditionValue::List(items)) if self.operator == Operator::In => {
                !items.is_empty()
            }
            Some(_) => true,
        }
    }
}
