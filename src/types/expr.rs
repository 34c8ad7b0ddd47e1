use super::op::ArithOp;
use super::value::{Literal, ValueType};

/// Which accumulator of the compiled rule a value reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// An ordinary pattern predicate's attribute.
    State,
    /// A negation's attribute.
    Negation,
    /// An aggregate's computed value.
    Aggregate,
}

/// A resolved operand source for an expression leaf.
///
/// `State` and `Negation` name the attribute they read; an aggregate already
/// names its own source attribute, so only its list index is carried.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceTarget {
    State { index: usize, attribute: String },
    Negation { index: usize, attribute: String },
    Aggregate { index: usize },
}

impl ReferenceTarget {
    /// The [`ReferenceKind`] tag of this target.
    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        match self {
            ReferenceTarget::State { .. } => ReferenceKind::State,
            ReferenceTarget::Negation { .. } => ReferenceKind::Negation,
            ReferenceTarget::Aggregate { .. } => ReferenceKind::Aggregate,
        }
    }

    /// The sequence or list index this target points at.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            ReferenceTarget::State { index, .. }
            | ReferenceTarget::Negation { index, .. }
            | ReferenceTarget::Aggregate { index } => *index,
        }
    }
}

/// A typed value-expression tree, evaluated by the matching runtime when a
/// rule fires.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    /// A constant leaf.
    Literal { value: Literal, ty: ValueType },
    /// A leaf reading from a bound predicate, negation, or aggregate.
    Reference { target: ReferenceTarget, ty: ValueType },
    /// An operation over two sub-expressions. Always tagged `Int`.
    BinaryOp {
        op: ArithOp,
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
        ty: ValueType,
    },
}

impl ExpressionNode {
    /// The declared value type of this node.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            ExpressionNode::Literal { ty, .. }
            | ExpressionNode::Reference { ty, .. }
            | ExpressionNode::BinaryOp { ty, .. } => *ty,
        }
    }
}
