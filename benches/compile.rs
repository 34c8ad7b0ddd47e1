use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tesla_compiler::syntax::{
    Atom, AttrConstraint, AttrDeclaration, AttrDefinition, AttrParameter, Definitions,
    EventDeclaration, Expr, LiteralToken, PatternItem, PositivePredicate, Predicate, RuleSyntax,
    Terminator,
};
use tesla_compiler::{compile, EventCatalog};

/// Build a rule with `n` positive predicates, each constrained and bound to
/// the previous one, closed by a terminator that references them all.
fn build_rule(n: usize) -> (RuleSyntax, EventCatalog) {
    let mut catalog = EventCatalog::new();
    for i in 0..n {
        catalog.insert(format!("E{i}"), i as u32);
    }
    catalog.insert("End".to_owned(), 9_000);
    catalog.insert("Out".to_owned(), 9_001);

    let mut pattern = Vec::with_capacity(n);
    for i in 0..n {
        let mut predicate = Predicate {
            event: format!("E{i}"),
            constraints: vec![AttrConstraint {
                attribute: "value".to_owned(),
                op: ">".to_owned(),
                value: LiteralToken::Int(i.to_string()),
            }],
            parameters: Vec::new(),
            mappings: Vec::new(),
        };
        if i > 0 {
            predicate.parameters.push(AttrParameter {
                value_type: "int".to_owned(),
                attribute: "value".to_owned(),
                op: ">".to_owned(),
                expr: Expr::Binary {
                    op: "+".to_owned(),
                    operands: vec![
                        Expr::Atom(Atom::EventAttribute {
                            event: format!("E{}", i - 1),
                            attribute: "value".to_owned(),
                        }),
                        Expr::Atom(Atom::Literal(LiteralToken::Int("1".to_owned()))),
                    ],
                },
            });
        }
        pattern.push(PatternItem::Positive(PositivePredicate {
            policy: "each".to_owned(),
            window: "5000".to_owned(),
            predicate,
        }));
    }

    let rule = RuleSyntax {
        declaration: EventDeclaration {
            event: "Out".to_owned(),
            attributes: vec![AttrDeclaration {
                name: "total".to_owned(),
                value_type: "int".to_owned(),
            }],
        },
        pattern,
        terminator: Terminator {
            predicate: Predicate {
                event: "End".to_owned(),
                constraints: Vec::new(),
                parameters: Vec::new(),
                mappings: Vec::new(),
            },
        },
        definitions: Definitions {
            statics: Vec::new(),
            attributes: vec![AttrDefinition {
                attribute: "total".to_owned(),
                expr: Expr::Atom(Atom::EventAttribute {
                    event: "E0".to_owned(),
                    attribute: "value".to_owned(),
                }),
            }],
        },
        consuming: (0..n).map(|i| format!("E{i}")).collect(),
    };
    (rule, catalog)
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for &n in &[2, 10, 50] {
        let (rule, catalog) = build_rule(n);
        group.bench_function(&format!("{n}_predicates"), |b| {
            b.iter(|| compile(black_box(&rule), black_box(&catalog)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
