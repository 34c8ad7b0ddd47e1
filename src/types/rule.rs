use std::fmt;

use super::expr::{ExpressionNode, ReferenceKind};
use super::op::{AggregateFun, ConstraintOp, SelectionPolicy};
use super::value::{Literal, ValueType};

/// Numeric identifier of an event type in the external catalog.
pub type EventTypeId = u32;

/// A static filter on one attribute of one event occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub attribute: String,
    pub op: ConstraintOp,
    pub value: Literal,
}

/// Selection behavior of a non-terminator pattern predicate: which slot it
/// occupies, how far back its window reaches, and how candidates are picked.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub index: usize,
    pub window: u64,
    pub policy: SelectionPolicy,
}

/// One occurrence of an event type in a rule's pattern.
///
/// The terminator predicate carries no [`Selection`].
#[derive(Debug, Clone, PartialEq)]
pub struct EventPredicate {
    pub event_type: EventTypeId,
    pub constraints: Vec<Constraint>,
    pub selection: Option<Selection>,
}

impl EventPredicate {
    /// Field-for-field comparison ignoring the sequence slot, which is
    /// derived from insertion position. Used for declaration dedup.
    ///
    /// Constraints form a set: the compiler stores them duplicate-free, so
    /// equal length plus containment compares them order-insensitively.
    pub(crate) fn same_shape(&self, other: &EventPredicate) -> bool {
        self.event_type == other.event_type
            && self.constraints.len() == other.constraints.len()
            && self
                .constraints
                .iter()
                .all(|c| other.constraints.contains(c))
            && match (&self.selection, &other.selection) {
                (None, None) => true,
                (Some(a), Some(b)) => a.window == b.window && a.policy == b.policy,
                _ => false,
            }
    }
}

/// Window bounds of an aggregate computation.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateWindow {
    /// Every matching event between the two referenced predicates.
    Between { lower: usize, upper: usize },
    /// A fixed duration back from the referenced predicate's occurrence.
    Within { millis: u64, from: usize },
}

/// A windowed computation over one attribute of one event type.
///
/// Identity for dedup is `(event_type, fun, attribute)`: structurally equal
/// requests resolve to one stored aggregate and one list index.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub event_type: EventTypeId,
    pub window: AggregateWindow,
    pub fun: AggregateFun,
    pub attribute: String,
    pub constraints: Vec<Constraint>,
}

/// Window bounds of a negation.
#[derive(Debug, Clone, PartialEq)]
pub enum NegationWindow {
    /// A fixed duration back from the referenced predicate's occurrence.
    WithinFrom { millis: u64, from: usize },
    /// The span between the two referenced predicates.
    Between { lower: usize, upper: usize },
}

/// An event type whose absence within a window is required.
#[derive(Debug, Clone, PartialEq)]
pub struct Negation {
    pub event_type: EventTypeId,
    pub window: NegationWindow,
    pub constraints: Vec<Constraint>,
}

/// A comparison tying an entity's own attribute to an expression computed
/// from earlier-declared entities.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding {
    pub op: ConstraintOp,
    /// Which accumulator owns the left-hand attribute.
    pub owner: ReferenceKind,
    /// Value type of the right-hand expression.
    pub value_type: ValueType,
    /// Always a reference to the owner's own attribute.
    pub left: ExpressionNode,
    pub right: ExpressionNode,
}

/// An output attribute whose value is fixed at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAttribute {
    pub name: String,
    pub value: Literal,
}

/// An output attribute computed when the rule fires.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedAttribute {
    pub name: String,
    pub expr: ExpressionNode,
}

/// The shape of the event a rule synthesizes when it fires.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTemplate {
    pub event_type: EventTypeId,
    pub statics: Vec<StaticAttribute>,
    pub attributes: Vec<ComputedAttribute>,
}

/// The executable form of one rule, consumed by the matching runtime.
///
/// Predicates are in declaration order with the terminator last; that order
/// is the addressing scheme every cross-reference uses. `consuming` lists the
/// sequence indices whose matched events are dropped from pending state when
/// the rule fires.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    pub template: EventTemplate,
    pub predicates: Vec<EventPredicate>,
    pub parameters: Vec<ParameterBinding>,
    pub aggregates: Vec<Aggregate>,
    pub negations: Vec<Negation>,
    pub consuming: Vec<usize>,
}

impl fmt::Display for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompiledRule({} predicates, {} parameters, {} aggregates, {} negations)",
            self.predicates.len(),
            self.parameters.len(),
            self.aggregates.len(),
            self.negations.len(),
        )
    }
}
