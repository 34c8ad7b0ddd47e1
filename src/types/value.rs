use std::fmt;

/// Value types an attribute, literal, or expression node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Float,
    Bool,
    String,
}

/// A literal value decoded from rule source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string, quotes already stripped.
    String(String),
}

impl Literal {
    /// The [`ValueType`] tag this literal carries.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Literal::Int(_) => ValueType::Int,
            Literal::Float(_) => ValueType::Float,
            Literal::Bool(_) => ValueType::Bool,
            Literal::String(_) => ValueType::String,
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_owned())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::String => write!(f, "string"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v}"),
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::String(v) => write!(f, "\"{v}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_tags() {
        assert_eq!(Literal::Int(1).value_type(), ValueType::Int);
        assert_eq!(Literal::Float(1.0).value_type(), ValueType::Float);
        assert_eq!(Literal::Bool(true).value_type(), ValueType::Bool);
        assert_eq!(Literal::from("x").value_type(), ValueType::String);
    }

    #[test]
    fn from_impls() {
        assert_eq!(Literal::from(42_i64), Literal::Int(42));
        assert_eq!(Literal::from(2.5_f64), Literal::Float(2.5));
        assert_eq!(Literal::from(false), Literal::Bool(false));
        assert_eq!(
            Literal::from("hello".to_owned()),
            Literal::String("hello".to_owned())
        );
    }

    #[test]
    fn display() {
        assert_eq!(ValueType::Int.to_string(), "int");
        assert_eq!(ValueType::String.to_string(), "string");
        assert_eq!(Literal::Int(7).to_string(), "7");
        assert_eq!(Literal::String("hi".into()).to_string(), "\"hi\"");
    }
}
