use thiserror::Error;

use super::op::AggregateFun;
use super::value::ValueType;

/// Errors raised while lowering a rule syntax tree.
///
/// All variants are fail-fast: the first failure aborts compilation of the
/// current rule and no partial [`CompiledRule`](super::CompiledRule) is ever
/// produced.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unrecognized {expected} token '{token}'")]
    UnrecognizedToken { token: String, expected: &'static str },

    #[error("malformed {expected} literal '{token}'")]
    MalformedLiteral { token: String, expected: &'static str },

    #[error("unknown event type '{name}'")]
    UnknownEventType { name: String },

    #[error("unknown parameter '${name}'")]
    UnknownParameter { name: String },

    #[error("reference to undeclared predicate '{name}'")]
    UnknownPredicateReference { name: String },

    #[error("terminator '{name}' closes an empty pattern")]
    EmptyPattern { name: String },

    #[error("no aggregate {fun}({event}.{attribute}) has been built")]
    AggregateNotFound {
        fun: AggregateFun,
        event: String,
        attribute: String,
    },

    #[error("attribute '{name}' is not declared by the rule's event template")]
    UndeclaredAttribute { name: String },

    #[error("attribute '{name}' is declared {expected} but defined with a {found} literal")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("invariant violated: {detail}")]
    InvariantViolation { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_token_message() {
        let err = CompileError::UnrecognizedToken {
            token: "%".into(),
            expected: "arithmetic operator",
        };
        assert_eq!(err.to_string(), "unrecognized arithmetic operator token '%'");
    }

    #[test]
    fn malformed_literal_message() {
        let err = CompileError::MalformedLiteral {
            token: "12x".into(),
            expected: "integer",
        };
        assert_eq!(err.to_string(), "malformed integer literal '12x'");
    }

    #[test]
    fn unknown_event_type_message() {
        let err = CompileError::UnknownEventType { name: "Smoke".into() };
        assert_eq!(err.to_string(), "unknown event type 'Smoke'");
    }

    #[test]
    fn unknown_parameter_message() {
        let err = CompileError::UnknownParameter { name: "x".into() };
        assert_eq!(err.to_string(), "unknown parameter '$x'");
    }

    #[test]
    fn unknown_predicate_reference_message() {
        let err = CompileError::UnknownPredicateReference { name: "Temp".into() };
        assert_eq!(err.to_string(), "reference to undeclared predicate 'Temp'");
    }

    #[test]
    fn empty_pattern_message() {
        let err = CompileError::EmptyPattern { name: "Fire".into() };
        assert_eq!(err.to_string(), "terminator 'Fire' closes an empty pattern");
    }

    #[test]
    fn aggregate_not_found_message() {
        let err = CompileError::AggregateNotFound {
            fun: AggregateFun::Avg,
            event: "Temp".into(),
            attribute: "value".into(),
        };
        assert_eq!(
            err.to_string(),
            "no aggregate AVG(Temp.value) has been built"
        );
    }

    #[test]
    fn type_mismatch_message() {
        let err = CompileError::TypeMismatch {
            name: "area".into(),
            expected: ValueType::String,
            found: ValueType::Int,
        };
        assert_eq!(
            err.to_string(),
            "attribute 'area' is declared string but defined with a int literal"
        );
    }
}
