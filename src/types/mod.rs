mod error;
mod expr;
mod op;
mod rule;
mod value;

pub use error::CompileError;
pub use expr::{ExpressionNode, ReferenceKind, ReferenceTarget};
pub use op::{AggregateFun, ArithOp, ConstraintOp, SelectionPolicy};
pub use rule::{
    Aggregate, AggregateWindow, CompiledRule, ComputedAttribute, Constraint, EventPredicate,
    EventTemplate, EventTypeId, Negation, NegationWindow, ParameterBinding, Selection,
    StaticAttribute,
};
pub use value::{Literal, ValueType};
