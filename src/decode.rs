//! Decoding of raw token text into typed domain values.
//!
//! These are pure functions: a token either maps to exactly one tag or the
//! decode fails with [`CompileError::UnrecognizedToken`] or
//! [`CompileError::MalformedLiteral`].

use crate::syntax::LiteralToken;
use crate::types::{
    AggregateFun, ArithOp, CompileError, ConstraintOp, Literal, SelectionPolicy, ValueType,
};

fn unrecognized(token: &str, expected: &'static str) -> CompileError {
    CompileError::UnrecognizedToken {
        token: token.to_owned(),
        expected,
    }
}

fn malformed(token: &str, expected: &'static str) -> CompileError {
    CompileError::MalformedLiteral {
        token: token.to_owned(),
        expected,
    }
}

pub(crate) fn constraint_op(token: &str) -> Result<ConstraintOp, CompileError> {
    match token {
        "=" => Ok(ConstraintOp::Equal),
        ">" => Ok(ConstraintOp::GreaterThan),
        "<" => Ok(ConstraintOp::LessThan),
        "!=" => Ok(ConstraintOp::Different),
        _ => Err(unrecognized(token, "comparison operator")),
    }
}

pub(crate) fn arith_op(token: &str) -> Result<ArithOp, CompileError> {
    match token {
        "+" => Ok(ArithOp::Add),
        "-" => Ok(ArithOp::Sub),
        "*" => Ok(ArithOp::Mul),
        "/" => Ok(ArithOp::Div),
        "&" => Ok(ArithOp::And),
        "|" => Ok(ArithOp::Or),
        _ => Err(unrecognized(token, "arithmetic operator")),
    }
}

pub(crate) fn value_type(token: &str) -> Result<ValueType, CompileError> {
    match token {
        "int" => Ok(ValueType::Int),
        "float" => Ok(ValueType::Float),
        "bool" => Ok(ValueType::Bool),
        "string" => Ok(ValueType::String),
        _ => Err(unrecognized(token, "value type")),
    }
}

pub(crate) fn aggregate_fun(token: &str) -> Result<AggregateFun, CompileError> {
    match token {
        "AVG" => Ok(AggregateFun::Avg),
        "SUM" => Ok(AggregateFun::Sum),
        "COUNT" => Ok(AggregateFun::Count),
        "MIN" => Ok(AggregateFun::Min),
        "MAX" => Ok(AggregateFun::Max),
        _ => Err(unrecognized(token, "aggregation function")),
    }
}

pub(crate) fn selection_policy(token: &str) -> Result<SelectionPolicy, CompileError> {
    match token {
        "each" => Ok(SelectionPolicy::EachWithin),
        "last" => Ok(SelectionPolicy::LastWithin),
        "first" => Ok(SelectionPolicy::FirstWithin),
        _ => Err(unrecognized(token, "selection policy")),
    }
}

pub(crate) fn int(token: &str) -> Result<i64, CompileError> {
    token.parse().map_err(|_| malformed(token, "integer"))
}

pub(crate) fn float(token: &str) -> Result<f64, CompileError> {
    token.parse().map_err(|_| malformed(token, "float"))
}

pub(crate) fn boolean(token: &str) -> Result<bool, CompileError> {
    token.parse().map_err(|_| malformed(token, "boolean"))
}

/// Window durations are non-negative millisecond counts.
pub(crate) fn millis(token: &str) -> Result<u64, CompileError> {
    token.parse().map_err(|_| malformed(token, "integer"))
}

/// Strips exactly one leading and one trailing quote character.
///
/// The grammar guarantees string tokens are at least two characters long;
/// anything shorter is a broken front-end.
pub(crate) fn string(token: &str) -> Result<String, CompileError> {
    let mut chars = token.chars();
    if chars.next().is_none() || chars.next_back().is_none() {
        return Err(CompileError::InvariantViolation {
            detail: format!("string token '{token}' is shorter than its quotes"),
        });
    }
    Ok(chars.as_str().to_owned())
}

pub(crate) fn literal(token: &LiteralToken) -> Result<Literal, CompileError> {
    match token {
        LiteralToken::Int(t) => int(t).map(Literal::Int),
        LiteralToken::Float(t) => float(t).map(Literal::Float),
        LiteralToken::Bool(t) => boolean(t).map(Literal::Bool),
        LiteralToken::String(t) => string(t).map(Literal::String),
    }
}
