//! Syntax-tree node types delivered by the grammar front-end.
//!
//! The compiler never tokenizes rule text itself: an external parser builds
//! these nodes and drives a [`RuleCompiler`](crate::RuleCompiler) over them
//! in document order. Every payload here is raw token text; decoding into
//! typed domain values happens inside the compiler.

/// A literal token, tagged with the lexical class the scanner assigned.
///
/// String payloads still include their surrounding quote characters.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralToken {
    Int(String),
    Float(String),
    Bool(String),
    String(String),
}

/// One `name: type` declaration in the rule's define clause.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrDeclaration {
    pub name: String,
    pub value_type: String,
}

/// The rule's define clause: the synthesized event's name and its declared
/// attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDeclaration {
    pub event: String,
    pub attributes: Vec<AttrDeclaration>,
}

/// An `attribute OP literal` filter attached to a predicate occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrConstraint {
    pub attribute: String,
    pub op: String,
    pub value: LiteralToken,
}

/// A `[type] attribute OP expr` comparison clause attached to a predicate,
/// negation, or aggregate occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrParameter {
    pub value_type: String,
    pub attribute: String,
    pub op: String,
    pub expr: Expr,
}

/// A `$name := attribute` short-name binding on a predicate occurrence, for
/// later reference from other expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamMapping {
    pub param: String,
    pub attribute: String,
}

/// The body shared by positive, negative, and terminator predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub event: String,
    pub constraints: Vec<AttrConstraint>,
    pub parameters: Vec<AttrParameter>,
    pub mappings: Vec<ParamMapping>,
}

/// One alternative of the expression grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Atom(Atom),
    Aggregate(Box<AggregateAtom>),
    /// Sub-expressions joined by a single operator token, folded left.
    Binary { op: String, operands: Vec<Expr> },
}

/// A non-aggregate expression leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Literal(LiteralToken),
    /// `$name` back-reference to a param mapping.
    Param(String),
    /// `event.attribute` reference to an earlier predicate occurrence.
    EventAttribute { event: String, attribute: String },
}

/// Window sub-clause of an aggregate atom. Predicate names and durations are
/// raw token text.
#[derive(Debug, Clone, PartialEq)]
pub enum AggWindow {
    Between { lower: String, upper: String },
    Within { millis: String, from: String },
}

/// `FUN(event.attribute)` with its window, plus any attached constraint and
/// parameter clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateAtom {
    pub fun: String,
    pub event: String,
    pub attribute: String,
    pub window: AggWindow,
    pub constraints: Vec<AttrConstraint>,
    pub parameters: Vec<AttrParameter>,
}

/// A positive pattern predicate with its selection policy and window.
#[derive(Debug, Clone, PartialEq)]
pub struct PositivePredicate {
    pub policy: String,
    pub window: String,
    pub predicate: Predicate,
}

/// Window sub-clause of a negative predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum NegWindow {
    WithinFrom { millis: String, from: String },
    Between { lower: String, upper: String },
}

/// A predicate whose absence within a window is required.
#[derive(Debug, Clone, PartialEq)]
pub struct NegativePredicate {
    pub window: NegWindow,
    pub predicate: Predicate,
}

/// The predicate closing the pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Terminator {
    pub predicate: Predicate,
}

/// One `attribute := expr` computed definition in the where clause.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrDefinition {
    pub attribute: String,
    pub expr: Expr,
}

/// One `attribute = literal` static definition in the where clause.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAttrDefinition {
    pub attribute: String,
    pub value: LiteralToken,
}

/// The where clause: static values and computed expressions for the
/// synthesized event's attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    pub statics: Vec<StaticAttrDefinition>,
    pub attributes: Vec<AttrDefinition>,
}

/// A pattern element, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternItem {
    Positive(PositivePredicate),
    Negative(NegativePredicate),
}

/// A complete rule syntax tree, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSyntax {
    pub declaration: EventDeclaration,
    pub pattern: Vec<PatternItem>,
    pub terminator: Terminator,
    pub definitions: Definitions,
    /// Names listed in the trailing consuming clause.
    pub consuming: Vec<String>,
}
