mod compile;
mod decode;
pub mod syntax;
mod types;

pub use compile::{compile, EventCatalog, RuleCompiler};
pub use types::{
    Aggregate, AggregateFun, AggregateWindow, ArithOp, CompileError, CompiledRule,
    ComputedAttribute, Constraint, ConstraintOp, EventPredicate, EventTemplate, EventTypeId,
    ExpressionNode, Literal, Negation, NegationWindow, ParameterBinding, ReferenceKind,
    ReferenceTarget, Selection, SelectionPolicy, StaticAttribute, ValueType,
};
