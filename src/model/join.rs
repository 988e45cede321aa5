//! Join edges between tables.

use serde::Serialize;

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub const ALL: [JoinType; 4] = [
        JoinType::Inner,
        JoinType::Left,
        JoinType::Right,
        JoinType::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        }
    }

    /// Parse the exact canonical spelling.
    pub fn from_canonical(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|jt| jt.as_str() == s)
    }

    /// Parse a join type, ignoring case and surrounding whitespace.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::from_canonical(&s.trim().to_uppercase())
    }
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A join edge: `table1` and `table2` related by a pre-formed SQL condition.
///
/// Empty `table1`, `table2` or `condition` make the edge incomplete; the
/// compiler skips incomplete edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Join {
    #[serde(rename = "type")]
    pub join_type: JoinType,
    pub table1: String,
    pub table2: String,
    pub condition: String,
}

impl Join {
    pub fn new(join_type: JoinType, table1: &str, table2: &str, condition: &str) -> Self {
        Self {
            join_type,
            table1: table1.into(),
            table2: table2.into(),
            condition: condition.into(),
        }
    }

    pub fn inner(table1: &str, table2: &str, condition: &str) -> Self {
        Self::new(JoinType::Inner, table1, table2, condition)
    }

    pub fn left(table1: &str, table2: &str, condition: &str) -> Self {
        Self::new(JoinType::Left, table1, table2, condition)
    }

    pub fn is_complete(&self) -> bool {
        !self.table1.is_empty() && !self.table2.is_empty() && !self.condition.is_empty()
    }
}
