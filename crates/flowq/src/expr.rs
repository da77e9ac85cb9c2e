//! Operator grammar and variable filter expression parsing.

use crate::value::VarValue;
use std::fmt;
use thiserror::Error as ThisError;

///
/// CompareOp
///
/// Comparison operators recognized in variable filter expressions.
/// Closed set; the tokens are the wire vocabulary and never change.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gteq,
    Lt,
    Lteq,
    Like,
    NotLike,
}

impl CompareOp {
    /// All operators, longest token first.
    ///
    /// CONTRACT: delimiter matching walks this order so `gteq` is never
    /// read as `gt` and `neq` is never read as `eq`.
    pub(crate) const ALL: [Self; 8] = [
        Self::NotLike,
        Self::Gteq,
        Self::Lteq,
        Self::Like,
        Self::Neq,
        Self::Eq,
        Self::Gt,
        Self::Lt,
    ];

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gteq => "gteq",
            Self::Lt => "lt",
            Self::Lteq => "lteq",
            Self::Like => "like",
            Self::NotLike => "notLike",
        }
    }

    /// Resolve an operator token from the structured triple form.
    pub fn from_token(token: &str) -> Result<Self, ExprError> {
        Self::ALL
            .into_iter()
            .find(|op| op.token() == token)
            .ok_or_else(|| ExprError::InvalidOperator {
                token: token.to_string(),
            })
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

///
/// VariableFilter
///
/// A `(name, operator, value)` triple filtering on a dynamically named
/// process/task variable rather than a fixed resource field. Constructed
/// only through validated parsing or explicit parts.
///
#[derive(Clone, Debug, PartialEq)]
pub struct VariableFilter {
    name: String,
    op: CompareOp,
    value: VarValue,
}

impl VariableFilter {
    #[must_use]
    pub fn new(name: impl Into<String>, op: CompareOp, value: VarValue) -> Self {
        Self {
            name: name.into(),
            op,
            value,
        }
    }

    /// Build from the structured `{name, operator, value}` triple form.
    pub fn from_triple(
        name: impl Into<String>,
        operator: &str,
        value: VarValue,
    ) -> Result<Self, ExprError> {
        Ok(Self::new(name, CompareOp::from_token(operator)?, value))
    }

    /// Parse the compact `<name>_<operator>_<value>` string form.
    ///
    /// Recognized operator delimiters are searched longest token first, so
    /// names may themselves contain underscores. When no recognized
    /// delimiter exists but the input still splits into three parts, the
    /// middle token is reported verbatim as the invalid operator.
    pub fn parse(input: &str) -> Result<Self, ExprError> {
        for op in CompareOp::ALL {
            let delimiter = format!("_{}_", op.token());
            if let Some(at) = input.find(&delimiter) {
                let name = &input[..at];
                let value = &input[at + delimiter.len()..];
                return Ok(Self::new(name, op, VarValue::Text(value.to_string())));
            }
        }

        let mut parts = input.splitn(3, '_');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(token), Some(_)) => Err(ExprError::InvalidOperator {
                token: token.to_string(),
            }),
            _ => Err(ExprError::Malformed),
        }
    }

    /// Parse a comma-separated sequence of compact expressions.
    ///
    /// Elements are parsed independently and order is preserved; the first
    /// failure aborts the whole sequence.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, ExprError> {
        input.split(',').map(Self::parse).collect()
    }

    /// Render the compact expression form.
    #[must_use]
    pub fn expression(&self) -> String {
        format!("{}_{}_{}", self.name, self.op.token(), self.value)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn op(&self) -> CompareOp {
        self.op
    }

    #[must_use]
    pub const fn value(&self) -> &VarValue {
        &self.value
    }
}

///
/// ExprError
///
#[derive(Debug, ThisError)]
pub enum ExprError {
    #[error("variable query parameter has to have format KEY_OPERATOR_VALUE")]
    Malformed,

    #[error("Invalid variable comparator specified: {token}")]
    InvalidOperator { token: String },
}
