//! Tree-walking semantic analysis: lowers one rule syntax tree into a
//! [`CompiledRule`].
//!
//! A [`RuleCompiler`] is constructed fresh per rule and fed productions in
//! document order through its `enter_*` methods, either by an external
//! walker or by the [`compile`] driver. All name resolution is
//! order-sensitive: predicate and parameter names resolve only after their
//! declaration, never forward.

use std::collections::HashMap;

use crate::decode;
use crate::syntax::{
    AggWindow, AggregateAtom, Atom, AttrConstraint, AttrParameter, Definitions, EventDeclaration,
    Expr, NegWindow, NegativePredicate, ParamMapping, PatternItem, PositivePredicate, Predicate,
    RuleSyntax, Terminator,
};
use crate::types::{
    Aggregate, AggregateFun, AggregateWindow, CompileError, CompiledRule, ComputedAttribute,
    Constraint, EventPredicate, EventTemplate, EventTypeId, ExpressionNode, Negation,
    NegationWindow, ParameterBinding, ReferenceKind, ReferenceTarget, Selection, StaticAttribute,
    ValueType,
};

/// Read-only mapping from event type names to their catalog ids.
///
/// Supplied by the schema/catalog before compilation begins; the one piece
/// of state that may be shared across concurrent compilations.
pub type EventCatalog = HashMap<String, EventTypeId>;

/// What a `$name` param mapping resolves to. The producing event-type id is
/// not stored twice; it is the indexed predicate's.
#[derive(Debug, Clone)]
struct ParamSource {
    predicate: usize,
    attribute: String,
}

/// Single-use semantic compiler for one rule.
///
/// Owns every mutable accumulator for the walk: the symbol tables, the
/// predicate/negation/aggregate lists, and the parameter set. The terminal
/// notification is [`finish`](Self::finish), which consumes the compiler, so
/// neither retrieving a partial rule nor reusing an instance across rules is
/// representable.
#[derive(Debug)]
pub struct RuleCompiler<'a> {
    catalog: &'a EventCatalog,
    template: Option<EventTemplate>,
    /// Declared output-attribute types from the define clause.
    declared: HashMap<String, ValueType>,
    /// `$name` mappings; first binding of a name wins.
    param_sources: HashMap<String, ParamSource>,
    /// Predicate name to sequence index; first binding of a name wins.
    predicate_names: HashMap<String, usize>,
    predicates: Vec<EventPredicate>,
    parameters: Vec<ParameterBinding>,
    aggregates: Vec<Aggregate>,
    negations: Vec<Negation>,
    consuming: Vec<usize>,
}

impl<'a> RuleCompiler<'a> {
    #[must_use]
    pub fn new(catalog: &'a EventCatalog) -> Self {
        RuleCompiler {
            catalog,
            template: None,
            declared: HashMap::new(),
            param_sources: HashMap::new(),
            predicate_names: HashMap::new(),
            predicates: Vec::new(),
            parameters: Vec::new(),
            aggregates: Vec::new(),
            negations: Vec::new(),
            consuming: Vec::new(),
        }
    }

    fn event_id(&self, name: &str) -> Result<EventTypeId, CompileError> {
        self.catalog
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UnknownEventType {
                name: name.to_owned(),
            })
    }

    fn predicate_index(&self, name: &str) -> Result<usize, CompileError> {
        self.predicate_names
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UnknownPredicateReference {
                name: name.to_owned(),
            })
    }

    fn declared_type(&self, name: &str) -> Result<ValueType, CompileError> {
        self.declared
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::UndeclaredAttribute {
                name: name.to_owned(),
            })
    }

    /// Define clause: fixes the output event type and the declared attribute
    /// types used to check the where clause later.
    pub fn enter_declaration(&mut self, decl: &EventDeclaration) -> Result<(), CompileError> {
        let event_type = self.event_id(&decl.event)?;
        for attr in &decl.attributes {
            let ty = decode::value_type(&attr.value_type)?;
            self.declared.insert(attr.name.clone(), ty);
        }
        self.template = Some(EventTemplate {
            event_type,
            statics: Vec::new(),
            attributes: Vec::new(),
        });
        Ok(())
    }

    /// A pattern predicate with a selection policy and window.
    pub fn enter_positive_predicate(
        &mut self,
        pred: &PositivePredicate,
    ) -> Result<(), CompileError> {
        let event_type = self.event_id(&pred.predicate.event)?;
        let window = decode::millis(&pred.window)?;
        let policy = decode::selection_policy(&pred.policy)?;
        let constraints = self.lower_constraints(&pred.predicate.constraints)?;
        let candidate = EventPredicate {
            event_type,
            constraints,
            selection: Some(Selection {
                index: self.predicates.len(),
                window,
                policy,
            }),
        };
        let index = self.add_predicate(candidate, &pred.predicate.event);
        self.finish_predicate_body(&pred.predicate, index)
    }

    /// A negation: an event type whose absence within a window is required.
    /// Window references must name already-declared predicates.
    pub fn enter_negative_predicate(
        &mut self,
        neg: &NegativePredicate,
    ) -> Result<(), CompileError> {
        let event_type = self.event_id(&neg.predicate.event)?;
        let window = match &neg.window {
            NegWindow::WithinFrom { millis, from } => NegationWindow::WithinFrom {
                millis: decode::millis(millis)?,
                from: self.predicate_index(from)?,
            },
            NegWindow::Between { lower, upper } => NegationWindow::Between {
                lower: self.predicate_index(lower)?,
                upper: self.predicate_index(upper)?,
            },
        };
        let constraints = self.lower_constraints(&neg.predicate.constraints)?;
        self.negations.push(Negation {
            event_type,
            window,
            constraints,
        });
        let index = self.negations.len() - 1;
        for par in &neg.predicate.parameters {
            self.bind_parameter(par, index, ReferenceKind::Negation)?;
        }
        // a negation's event name is not a pattern predicate, so mappings on
        // it fail unless the name happens to be declared as one
        for mapping in &neg.predicate.mappings {
            let predicate = self.predicate_index(&neg.predicate.event)?;
            self.record_mapping(predicate, mapping);
        }
        Ok(())
    }

    /// The terminator closing the pattern. Must follow at least one pattern
    /// predicate; appended last, with no selection fields.
    pub fn enter_terminator(&mut self, term: &Terminator) -> Result<(), CompileError> {
        let event_type = self.event_id(&term.predicate.event)?;
        if self.predicates.is_empty() {
            return Err(CompileError::EmptyPattern {
                name: term.predicate.event.clone(),
            });
        }
        let constraints = self.lower_constraints(&term.predicate.constraints)?;
        let candidate = EventPredicate {
            event_type,
            constraints,
            selection: None,
        };
        let index = self.add_predicate(candidate, &term.predicate.event);
        self.finish_predicate_body(&term.predicate, index)
    }

    /// Re-visit of an aggregate atom node: attaches constraint and parameter
    /// clauses to an aggregate the expression-lowering pass already built.
    /// Unlike [`lower_expr`](Self::lower_expr) this path never creates on
    /// miss.
    pub fn enter_aggregate_atom(&mut self, atom: &AggregateAtom) -> Result<(), CompileError> {
        let fun = decode::aggregate_fun(&atom.fun)?;
        let event_type = self.event_id(&atom.event)?;
        let index = self
            .find_aggregate(event_type, fun, &atom.attribute)
            .ok_or_else(|| CompileError::AggregateNotFound {
                fun,
                event: atom.event.clone(),
                attribute: atom.attribute.clone(),
            })?;
        for cons in &atom.constraints {
            let constraint = lower_constraint(cons)?;
            let existing = &mut self.aggregates[index].constraints;
            if !existing.contains(&constraint) {
                existing.push(constraint);
            }
        }
        for par in &atom.parameters {
            self.bind_parameter(par, index, ReferenceKind::Aggregate)?;
        }
        Ok(())
    }

    /// Where clause: static attribute values and computed attribute
    /// expressions for the synthesized event.
    pub fn enter_definitions(&mut self, defs: &Definitions) -> Result<(), CompileError> {
        let mut statics = Vec::with_capacity(defs.statics.len());
        for sdef in &defs.statics {
            let declared = self.declared_type(&sdef.attribute)?;
            let value = decode::literal(&sdef.value)?;
            if value.value_type() != declared {
                return Err(CompileError::TypeMismatch {
                    name: sdef.attribute.clone(),
                    expected: declared,
                    found: value.value_type(),
                });
            }
            statics.push(StaticAttribute {
                name: sdef.attribute.clone(),
                value,
            });
        }

        let mut attributes = Vec::with_capacity(defs.attributes.len());
        for adef in &defs.attributes {
            let declared = self.declared_type(&adef.attribute)?;
            let expr = self.lower_expr(&adef.expr, declared)?;
            attributes.push(ComputedAttribute {
                name: adef.attribute.clone(),
                expr,
            });
        }

        let template = self.template.as_mut().ok_or_else(|| {
            CompileError::InvariantViolation {
                detail: "where clause visited before the define clause".to_owned(),
            }
        })?;
        template.statics.extend(statics);
        template.attributes.extend(attributes);
        Ok(())
    }

    /// Consuming clause: each name resolves to the sequence index whose
    /// matched event is dropped from pending state when the rule fires.
    pub fn enter_consuming(&mut self, names: &[String]) -> Result<(), CompileError> {
        for name in names {
            let index = self.predicate_index(name)?;
            self.consuming.push(index);
        }
        Ok(())
    }

    /// Terminal notification: freezes the accumulated state into the rule.
    pub fn finish(self) -> Result<CompiledRule, CompileError> {
        let template = self
            .template
            .ok_or_else(|| CompileError::InvariantViolation {
                detail: "rule ended without a define clause".to_owned(),
            })?;
        Ok(CompiledRule {
            template,
            predicates: self.predicates,
            parameters: self.parameters,
            aggregates: self.aggregates,
            negations: self.negations,
            consuming: self.consuming,
        })
    }

    /// Appends a predicate unless a field-identical one (sequence slot
    /// aside) is already in the sequence, and returns the slot it occupies.
    /// The declared name binds to the new index only on insertion; a name is
    /// never rebound.
    fn add_predicate(&mut self, candidate: EventPredicate, name: &str) -> usize {
        if let Some(index) = self.predicates.iter().position(|p| p.same_shape(&candidate)) {
            return index;
        }
        let index = self.predicates.len();
        self.predicates.push(candidate);
        self.predicate_names.entry(name.to_owned()).or_insert(index);
        index
    }

    /// Parameter clauses are compiled before the predicate's own mappings
    /// are recorded: mapping nodes are children of the predicate production
    /// and fire after its enter, so an expression can only use mappings from
    /// strictly earlier predicates.
    fn finish_predicate_body(&mut self, pred: &Predicate, index: usize) -> Result<(), CompileError> {
        for par in &pred.parameters {
            self.bind_parameter(par, index, ReferenceKind::State)?;
        }
        for mapping in &pred.mappings {
            self.record_mapping(index, mapping);
        }
        Ok(())
    }

    /// Records `$name -> (sequence index, attribute)`. A name bound twice
    /// keeps its first binding.
    fn record_mapping(&mut self, predicate: usize, mapping: &ParamMapping) {
        if !self.param_sources.contains_key(&mapping.param) {
            self.param_sources.insert(
                mapping.param.clone(),
                ParamSource {
                    predicate,
                    attribute: mapping.attribute.clone(),
                },
            );
        }
    }

    fn lower_constraints(
        &self,
        constraints: &[AttrConstraint],
    ) -> Result<Vec<Constraint>, CompileError> {
        let mut out = Vec::with_capacity(constraints.len());
        for cons in constraints {
            let constraint = lower_constraint(cons)?;
            if !out.contains(&constraint) {
                out.push(constraint);
            }
        }
        Ok(out)
    }

    /// Builds one bidirectional comparison binding: the owner's own
    /// attribute on the left, the computed expression on the right.
    /// Identical bindings collapse.
    fn bind_parameter(
        &mut self,
        par: &AttrParameter,
        index: usize,
        owner: ReferenceKind,
    ) -> Result<(), CompileError> {
        let declared = decode::value_type(&par.value_type)?;
        let right = self.lower_expr(&par.expr, declared)?;
        let target = match owner {
            ReferenceKind::State => ReferenceTarget::State {
                index,
                attribute: par.attribute.clone(),
            },
            ReferenceKind::Negation => ReferenceTarget::Negation {
                index,
                attribute: par.attribute.clone(),
            },
            ReferenceKind::Aggregate => ReferenceTarget::Aggregate { index },
        };
        let left = ExpressionNode::Reference {
            target,
            ty: declared,
        };
        let binding = ParameterBinding {
            op: decode::constraint_op(&par.op)?,
            owner,
            value_type: right.value_type(),
            left,
            right,
        };
        if !self.parameters.contains(&binding) {
            self.parameters.push(binding);
        }
        Ok(())
    }

    /// Recursive descent over the expression grammar's three alternatives.
    /// The only side effect is aggregate-list growth.
    fn lower_expr(
        &mut self,
        expr: &Expr,
        expected: ValueType,
    ) -> Result<ExpressionNode, CompileError> {
        match expr {
            Expr::Atom(atom) => self.lower_atom(atom, expected),
            Expr::Aggregate(atom) => self.lower_aggregate_atom(atom, expected),
            Expr::Binary { op, operands } => {
                let op = decode::arith_op(op)?;
                let mut acc: Option<ExpressionNode> = None;
                for operand in operands {
                    let next = self.lower_expr(operand, expected)?;
                    acc = Some(match acc {
                        None => next,
                        // binary nodes are always tagged Int; the runtime
                        // expects exactly this, whatever the operand types
                        Some(prev) => ExpressionNode::BinaryOp {
                            op,
                            left: Box::new(prev),
                            right: Box::new(next),
                            ty: ValueType::Int,
                        },
                    });
                }
                acc.ok_or_else(|| CompileError::InvariantViolation {
                    detail: "binary expression with no operands".to_owned(),
                })
            }
        }
    }

    fn lower_atom(&self, atom: &Atom, expected: ValueType) -> Result<ExpressionNode, CompileError> {
        match atom {
            Atom::Literal(token) => {
                let value = decode::literal(token)?;
                let ty = value.value_type();
                Ok(ExpressionNode::Literal { value, ty })
            }
            Atom::Param(name) => {
                let source =
                    self.param_sources
                        .get(name)
                        .ok_or_else(|| CompileError::UnknownParameter {
                            name: name.clone(),
                        })?;
                Ok(ExpressionNode::Reference {
                    target: ReferenceTarget::State {
                        index: source.predicate,
                        attribute: source.attribute.clone(),
                    },
                    ty: expected,
                })
            }
            Atom::EventAttribute { event, attribute } => Ok(ExpressionNode::Reference {
                target: ReferenceTarget::State {
                    index: self.predicate_index(event)?,
                    attribute: attribute.clone(),
                },
                ty: expected,
            }),
        }
    }

    /// Dedup-lookup-or-create: an aggregate with the same
    /// `(event type, function, attribute)` identity is built once, on first
    /// reference, and every later matching reference reuses its index.
    fn lower_aggregate_atom(
        &mut self,
        atom: &AggregateAtom,
        expected: ValueType,
    ) -> Result<ExpressionNode, CompileError> {
        let fun = decode::aggregate_fun(&atom.fun)?;
        let event_type = self.event_id(&atom.event)?;
        let index = match self.find_aggregate(event_type, fun, &atom.attribute) {
            Some(index) => index,
            None => {
                let window = match &atom.window {
                    AggWindow::Between { lower, upper } => AggregateWindow::Between {
                        lower: self.predicate_index(lower)?,
                        upper: self.predicate_index(upper)?,
                    },
                    AggWindow::Within { millis, from } => AggregateWindow::Within {
                        millis: decode::millis(millis)?,
                        from: self.predicate_index(from)?,
                    },
                };
                self.aggregates.push(Aggregate {
                    event_type,
                    window,
                    fun,
                    attribute: atom.attribute.clone(),
                    constraints: Vec::new(),
                });
                self.aggregates.len() - 1
            }
        };
        Ok(ExpressionNode::Reference {
            target: ReferenceTarget::Aggregate { index },
            ty: expected,
        })
    }

    fn find_aggregate(
        &self,
        event_type: EventTypeId,
        fun: AggregateFun,
        attribute: &str,
    ) -> Option<usize> {
        self.aggregates
            .iter()
            .position(|a| a.event_type == event_type && a.fun == fun && a.attribute == attribute)
    }
}

fn lower_constraint(cons: &AttrConstraint) -> Result<Constraint, CompileError> {
    Ok(Constraint {
        attribute: cons.attribute.clone(),
        op: decode::constraint_op(&cons.op)?,
        value: decode::literal(&cons.value)?,
    })
}

/// Walks one rule syntax tree in document order and compiles it.
///
/// Replays the order an external depth-first walker would deliver: the
/// define clause, each pattern item followed by the aggregate atoms nested
/// in its parameter expressions, the terminator, the where clause and its
/// nested atoms, the consuming clause, then the terminal notification.
///
/// # Errors
///
/// Returns the first [`CompileError`] encountered; no partial rule is
/// produced.
pub fn compile(rule: &RuleSyntax, catalog: &EventCatalog) -> Result<CompiledRule, CompileError> {
    let mut compiler = RuleCompiler::new(catalog);
    compiler.enter_declaration(&rule.declaration)?;
    for item in &rule.pattern {
        match item {
            PatternItem::Positive(pred) => {
                compiler.enter_positive_predicate(pred)?;
                visit_predicate_atoms(&pred.predicate, &mut compiler)?;
            }
            PatternItem::Negative(neg) => {
                compiler.enter_negative_predicate(neg)?;
                visit_predicate_atoms(&neg.predicate, &mut compiler)?;
            }
        }
    }
    compiler.enter_terminator(&rule.terminator)?;
    visit_predicate_atoms(&rule.terminator.predicate, &mut compiler)?;
    compiler.enter_definitions(&rule.definitions)?;
    for adef in &rule.definitions.attributes {
        visit_expr_atoms(&adef.expr, &mut compiler)?;
    }
    compiler.enter_consuming(&rule.consuming)?;
    compiler.finish()
}

fn visit_predicate_atoms(
    pred: &Predicate,
    compiler: &mut RuleCompiler<'_>,
) -> Result<(), CompileError> {
    for par in &pred.parameters {
        visit_expr_atoms(&par.expr, compiler)?;
    }
    Ok(())
}

/// Fires the aggregate-atom re-visit notifications nested inside an
/// expression, in document order.
fn visit_expr_atoms(expr: &Expr, compiler: &mut RuleCompiler<'_>) -> Result<(), CompileError> {
    match expr {
        Expr::Atom(_) => Ok(()),
        Expr::Aggregate(atom) => {
            compiler.enter_aggregate_atom(atom)?;
            for par in &atom.parameters {
                visit_expr_atoms(&par.expr, compiler)?;
            }
            Ok(())
        }
        Expr::Binary { operands, .. } => {
            for operand in operands {
                visit_expr_atoms(operand, compiler)?;
            }
            Ok(())
        }
    }
}
