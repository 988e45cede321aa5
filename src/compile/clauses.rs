//! One function per clause.
//!
//! Each returns `None` when the clause would be empty, so the assembler can
//! omit it. Identifiers are emitted as fragments and empty ones are
//! dropped; values go through the [`ValueQuoter`].

use super::joins::JoinStep;
use crate::model::{Condition, JoinType, Operator, OrderTerm, SortDirection};
use crate::sql::{Dialect, QuoteError, SqlDialect, Token, TokenStream, ValueQuoter};

fn fragments<S: AsRef<str>>(items: &[S]) -> Vec<TokenStream> {
    items
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.is_empty())
        .map(|s| Token::Fragment(s.to_string()).into())
        .collect()
}

/// `SELECT a, b` or `SELECT *`.
pub fn select(columns: &[String]) -> TokenStream {
    let columns = fragments(columns);
    let mut ts = TokenStream::new();
    ts.push(Token::Select).space();
    if columns.is_empty() {
        ts.push(Token::Star);
    } else {
        ts.comma_separated(&columns);
    }
    ts
}

/// `FROM t` with joins, `FROM t1, t2, ...` without.
pub fn from(tables: &[String], has_joins: bool) -> Option<TokenStream> {
    let tables = if has_joins {
        tables.get(..1)?
    } else {
        tables
    };
    let tables = fragments(tables);
    if tables.is_empty() {
        return None;
    }

    let mut ts = TokenStream::new();
    ts.push(Token::From).space().comma_separated(&tables);
    Some(ts)
}

/// `INNER JOIN t ON cond LEFT JOIN u ON cond ...`
pub fn joins(steps: &[JoinStep<'_>]) -> Option<TokenStream> {
    if steps.is_empty() {
        return None;
    }

    let mut ts = TokenStream::new();
    for (i, step) in steps.iter().enumerate() {
        if i > 0 {
            ts.space();
        }
        ts.push(join_type_token(step.join.join_type))
            .space()
            .push(Token::Join)
            .space()
            .fragment(step.table)
            .space()
            .push(Token::On)
            .space()
            .fragment(&step.join.condition);
    }
    Some(ts)
}

fn join_type_token(join_type: JoinType) -> Token {
    match join_type {
        JoinType::Inner => Token::Inner,
        JoinType::Left => Token::Left,
        JoinType::Right => Token::Right,
        JoinType::Full => Token::Full,
    }
}

/// `WHERE c1 AND c2 ...`, skipping conditions that cannot render.
pub fn where_clause(
    conditions: &[Condition],
    quoter: &ValueQuoter,
) -> Result<Option<TokenStream>, QuoteError> {
    let mut predicates = Vec::with_capacity(conditions.len());
    for condition in conditions {
        if let Some(predicate) = predicate(condition, quoter)? {
            predicates.push(predicate);
        }
    }

    if predicates.is_empty() {
        return Ok(None);
    }

    let mut ts = TokenStream::new();
    ts.push(Token::Where).space().and_separated(&predicates);
    Ok(Some(ts))
}

fn predicate(
    condition: &Condition,
    quoter: &ValueQuoter,
) -> Result<Option<TokenStream>, QuoteError> {
    if !condition.is_renderable() {
        return Ok(None);
    }
    let Some(value) = &condition.value else {
        return Ok(None);
    };

    let mut ts = TokenStream::new();
    ts.fragment(&condition.column)
        .space()
        .push(operator_token(condition.operator))
        .space()
        .append(&quoter.operand(condition.operator, value)?);
    Ok(Some(ts))
}

fn operator_token(operator: Operator) -> Token {
    match operator {
        Operator::Eq => Token::Eq,
        Operator::Ne => Token::Ne,
        Operator::Gt => Token::Gt,
        Operator::Lt => Token::Lt,
        Operator::Gte => Token::Gte,
        Operator::Lte => Token::Lte,
        Operator::Like => Token::Like,
        Operator::In => Token::In,
        Operator::Between => Token::Between,
    }
}

/// `GROUP BY a, b`
pub fn group_by(columns: Option<&[String]>) -> Option<TokenStream> {
    let columns = fragments(columns?);
    if columns.is_empty() {
        return None;
    }

    let mut ts = TokenStream::new();
    ts.push(Token::GroupBy).space().comma_separated(&columns);
    Some(ts)
}

/// `ORDER BY a ASC, b DESC`
pub fn order_by(terms: Option<&[OrderTerm]>) -> Option<TokenStream> {
    let terms: Vec<TokenStream> = terms?
        .iter()
        .filter(|t| !t.column.is_empty())
        .map(|t| {
            let mut ts = TokenStream::new();
            ts.fragment(&t.column).space().push(match t.direction {
                SortDirection::Asc => Token::Asc,
                SortDirection::Desc => Token::Desc,
            });
            ts
        })
        .collect();
    if terms.is_empty() {
        return None;
    }

    let mut ts = TokenStream::new();
    ts.push(Token::OrderBy).space().comma_separated(&terms);
    Some(ts)
}

/// `LIMIT n`. Pass [`SemanticQuery::effective_limit`], which already
/// folds zero into `None`.
///
/// [`SemanticQuery::effective_limit`]: crate::model::SemanticQuery::effective_limit
pub fn limit(limit: Option<u64>, dialect: Dialect) -> Option<TokenStream> {
    limit.map(|n| dialect.emit_limit(n))
}
