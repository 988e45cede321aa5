//! Literal rendering.
//!
//! Every value that came from a semantic query reaches SQL through this
//! module as a literal token, so the dialect's string escaping is the only
//! way user text enters a statement. Identifiers never pass through here.

use super::dialect::Dialect;
use super::token::{Token, TokenStream};
use crate::model::{ConditionValue, Operator, Scalar};

/// Errors raised while rendering a literal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuoteError {
    #[error("cannot render non-finite number {0} as a SQL literal")]
    NonFiniteFloat(f64),
}

/// Renders condition values as dialect-safe SQL literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueQuoter {
    dialect: Dialect,
}

impl ValueQuoter {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Quote a single scalar to SQL text.
    pub fn quote(&self, value: &Scalar) -> Result<String, QuoteError> {
        Ok(scalar_token(value)?.serialize(self.dialect))
    }

    /// Tokens for the right-hand side of `operator`.
    ///
    /// - `IN`: `(a, b, c)`; a scalar becomes `(a)`
    /// - `BETWEEN`: `a AND b` for a pair; anything else degrades to a single
    ///   quoted literal
    /// - everything else: a single literal
    ///
    /// A sequence in a single-literal position is quoted as one string of its
    /// bracketed text, never emitted raw.
    pub fn operand(
        &self,
        operator: Operator,
        value: &ConditionValue,
    ) -> Result<TokenStream, QuoteError> {
        match (operator, value) {
            (Operator::In, ConditionValue::List(items)) => list(items),
            (Operator::In, ConditionValue::Scalar(s)) => list(std::slice::from_ref(s)),
            (Operator::Between, ConditionValue::List(items)) if items.len() == 2 => {
                range(&items[0], &items[1])
            }
            (_, ConditionValue::Scalar(s)) => Ok(scalar_token(s)?.into()),
            (_, ConditionValue::List(_)) => {
                Ok(Token::LitString(value.display_text()).into())
            }
        }
    }
}

/// Literal token for a scalar.
pub fn scalar_token(value: &Scalar) -> Result<Token, QuoteError> {
    Ok(match value {
        Scalar::String(s) => Token::LitString(s.clone()),
        Scalar::Int(n) => Token::LitInt(*n),
        Scalar::UInt(n) => Token::LitUInt(*n),
        Scalar::Float(f) if !f.is_finite() => return Err(QuoteError::NonFiniteFloat(*f)),
        Scalar::Float(f) => Token::LitFloat(*f),
        Scalar::Bool(b) => Token::LitBool(*b),
        Scalar::Null => Token::LitNull,
    })
}

fn list(items: &[Scalar]) -> Result<TokenStream, QuoteError> {
    let quoted = items
        .iter()
        .map(|item| scalar_token(item).map(TokenStream::from))
        .collect::<Result<Vec<_>, _>>()?;

    let mut ts = TokenStream::new();
    ts.lparen().comma_separated(&quoted).rparen();
    Ok(ts)
}

fn range(low: &Scalar, high: &Scalar) -> Result<TokenStream, QuoteError> {
    let mut ts = TokenStream::new();
    ts.push(scalar_token(low)?)
        .space()
        .push(Token::And)
        .space()
        .push(scalar_token(high)?);
    Ok(ts)
}
