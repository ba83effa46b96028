//! Expression nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Direction, TypeRef};

/// Literal constant values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    Char(char),
    String(String),
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    /// Decimal value in invariant textual form, e.g. `"12.50"`
    Decimal(String),
}

/// Binary operators understood by the generators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Assign,
    IdentityInequality,
    IdentityEquality,
    ValueEquality,
    BitwiseOr,
    BitwiseAnd,
    BooleanOr,
    BooleanAnd,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl BinaryOperator {
    pub const ALL: [BinaryOperator; 17] = [
        BinaryOperator::Add,
        BinaryOperator::Subtract,
        BinaryOperator::Multiply,
        BinaryOperator::Divide,
        BinaryOperator::Modulus,
        BinaryOperator::Assign,
        BinaryOperator::IdentityInequality,
        BinaryOperator::IdentityEquality,
        BinaryOperator::ValueEquality,
        BinaryOperator::BitwiseOr,
        BinaryOperator::BitwiseAnd,
        BinaryOperator::BooleanOr,
        BinaryOperator::BooleanAnd,
        BinaryOperator::LessThan,
        BinaryOperator::LessThanOrEqual,
        BinaryOperator::GreaterThan,
        BinaryOperator::GreaterThanOrEqual,
    ];
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryOperator::Add => "add",
            BinaryOperator::Subtract => "subtract",
            BinaryOperator::Multiply => "multiply",
            BinaryOperator::Divide => "divide",
            BinaryOperator::Modulus => "modulus",
            BinaryOperator::Assign => "assign",
            BinaryOperator::IdentityInequality => "identity inequality",
            BinaryOperator::IdentityEquality => "identity equality",
            BinaryOperator::ValueEquality => "value equality",
            BinaryOperator::BitwiseOr => "bitwise or",
            BinaryOperator::BitwiseAnd => "bitwise and",
            BinaryOperator::BooleanOr => "boolean or",
            BinaryOperator::BooleanAnd => "boolean and",
            BinaryOperator::LessThan => "less than",
            BinaryOperator::LessThanOrEqual => "less than or equal",
            BinaryOperator::GreaterThan => "greater than",
            BinaryOperator::GreaterThanOrEqual => "greater than or equal",
        };
        f.write_str(name)
    }
}

/// Reference to a method, optionally qualified by a target object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRef {
    #[serde(default)]
    pub target: Option<Box<Expr>>,
    pub name: String,
}

impl MethodRef {
    pub fn new(target: Option<Expr>, name: impl Into<String>) -> Self {
        Self {
            target: target.map(Box::new),
            name: name.into(),
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Primitive(Literal),
    ArgumentRef(String),
    VariableRef(String),
    FieldRef {
        #[serde(default)]
        target: Option<Box<Expr>>,
        name: String,
    },
    PropertyRef {
        #[serde(default)]
        target: Option<Box<Expr>>,
        name: String,
    },
    /// The implicit `value` inside a property setter
    PropertySetValue,
    EventRef {
        #[serde(default)]
        target: Option<Box<Expr>>,
        name: String,
    },
    MethodRef(MethodRef),
    MethodInvoke {
        method: MethodRef,
        #[serde(default)]
        args: Vec<Expr>,
    },
    DelegateInvoke {
        #[serde(default)]
        target: Option<Box<Expr>>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    DelegateCreate {
        delegate_type: TypeRef,
        #[serde(default)]
        target: Option<Box<Expr>>,
        method: String,
    },
    ObjectCreate {
        #[serde(rename = "type")]
        ty: TypeRef,
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// Array creation. Without initializers the array is sized by `size`
    /// (absent means zero elements).
    ArrayCreate {
        element_type: TypeRef,
        #[serde(default)]
        size: Option<Box<Expr>>,
        #[serde(default)]
        initializers: Vec<Expr>,
    },
    ArrayIndex {
        target: Box<Expr>,
        indices: Vec<Expr>,
    },
    Indexer {
        target: Box<Expr>,
        indices: Vec<Expr>,
    },
    Cast {
        #[serde(rename = "type")]
        ty: TypeRef,
        expr: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    Direction {
        direction: Direction,
        expr: Box<Expr>,
    },
    This,
    Base,
    TypeOf(TypeRef),
    TypeReference(TypeRef),
    /// Raw source text, emitted verbatim
    Snippet(String),
}

impl Expr {
    pub fn null() -> Self {
        Expr::Primitive(Literal::Null)
    }

    pub fn int(value: i64) -> Self {
        Expr::Primitive(Literal::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Primitive(Literal::Bool(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Primitive(Literal::String(value.into()))
    }

    pub fn char(value: char) -> Self {
        Expr::Primitive(Literal::Char(value))
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::VariableRef(name.into())
    }

    pub fn arg(name: impl Into<String>) -> Self {
        Expr::ArgumentRef(name.into())
    }

    pub fn field(target: Option<Expr>, name: impl Into<String>) -> Self {
        Expr::FieldRef {
            target: target.map(Box::new),
            name: name.into(),
        }
    }

    pub fn this_field(name: impl Into<String>) -> Self {
        Expr::field(Some(Expr::This), name)
    }

    pub fn property(target: Option<Expr>, name: impl Into<String>) -> Self {
        Expr::PropertyRef {
            target: target.map(Box::new),
            name: name.into(),
        }
    }

    pub fn call(target: Option<Expr>, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodInvoke {
            method: MethodRef::new(target, name),
            args,
        }
    }

    pub fn new_object(ty: impl Into<TypeRef>, args: Vec<Expr>) -> Self {
        Expr::ObjectCreate {
            ty: ty.into(),
            args,
        }
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn cast(ty: impl Into<TypeRef>, expr: Expr) -> Self {
        Expr::Cast {
            ty: ty.into(),
            expr: Box::new(expr),
        }
    }
}
