use std::fmt;

/// Comparison operators usable in attribute constraints and parameter bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    Equal,
    GreaterThan,
    LessThan,
    Different,
}

/// Arithmetic and boolean operators usable inside value expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
}

/// Windowed aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFun {
    Avg,
    Sum,
    Count,
    Min,
    Max,
}

/// How candidate events within a selection window are chosen for a
/// pattern predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    EachWithin,
    LastWithin,
    FirstWithin,
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintOp::Equal => write!(f, "="),
            ConstraintOp::GreaterThan => write!(f, ">"),
            ConstraintOp::LessThan => write!(f, "<"),
            ConstraintOp::Different => write!(f, "!="),
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithOp::Add => write!(f, "+"),
            ArithOp::Sub => write!(f, "-"),
            ArithOp::Mul => write!(f, "*"),
            ArithOp::Div => write!(f, "/"),
            ArithOp::And => write!(f, "&"),
            ArithOp::Or => write!(f, "|"),
        }
    }
}

impl fmt::Display for AggregateFun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateFun::Avg => write!(f, "AVG"),
            AggregateFun::Sum => write!(f, "SUM"),
            AggregateFun::Count => write!(f, "COUNT"),
            AggregateFun::Min => write!(f, "MIN"),
            AggregateFun::Max => write!(f, "MAX"),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::EachWithin => write!(f, "each"),
            SelectionPolicy::LastWithin => write!(f, "last"),
            SelectionPolicy::FirstWithin => write!(f, "first"),
        }
    }
}
