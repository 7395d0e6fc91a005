//! The canonical expression tree: the operator/literal form consumed by
//! the downstream query engine. Built once, never mutated; both translator
//! directions construct fresh trees.

pub mod names;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

///
/// Literal
///
/// Typed literal leaves. There is deliberately no 16-bit integer kind:
/// Int16 attribute values are widened to Int32 on encode and narrowed back
/// against the schema's declared type on decode.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Literal {
    Bool(bool),
    Text(String),
    Int32(i32),
    Float64(f64),
    Time(DateTime<Utc>),
    ClassRef(String),
}

impl Literal {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::Int32(_) => "int32",
            Self::Float64(_) => "float64",
            Self::Time(_) => "time",
            Self::ClassRef(_) => "class",
        }
    }
}

///
/// OperatorNode
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OperatorNode {
    pub name: String,
    pub operands: Vec<Expression>,
}

///
/// Expression
///
/// Closed sum over the three node kinds. Every match in the encoder and
/// decoder is exhaustive, so a new kind cannot be added without the
/// compiler pointing at every site that must handle it.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Expression {
    Attribute(String),
    Operator(OperatorNode),
    Literal(Literal),
}

impl Expression {
    #[must_use]
    pub fn attribute(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    #[must_use]
    pub fn operator(name: impl Into<String>, operands: Vec<Self>) -> Self {
        Self::Operator(OperatorNode {
            name: name.into(),
            operands,
        })
    }

    #[must_use]
    pub fn literal(literal: Literal) -> Self {
        Self::Literal(literal)
    }

    #[must_use]
    pub const fn as_operator(&self) -> Option<&OperatorNode> {
        match self {
            Self::Operator(node) => Some(node),
            Self::Attribute(_) | Self::Literal(_) => None,
        }
    }

    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            Self::Attribute(_) | Self::Operator(_) => None,
        }
    }

    #[must_use]
    pub fn as_attribute(&self) -> Option<&str> {
        match self {
            Self::Attribute(name) => Some(name),
            Self::Operator(_) | Self::Literal(_) => None,
        }
    }

    /// One-word description of the node kind, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Attribute(_) => "attribute",
            Self::Operator(_) => "operator",
            Self::Literal(_) => "literal",
        }
    }
}

///
/// ExpressionTree
///
/// Root pair: the class the whole query filters over, plus the root
/// expression.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ExpressionTree {
    pub class_under_qualification: String,
    pub root: Expression,
}

impl ExpressionTree {
    #[must_use]
    pub fn new(class_under_qualification: impl Into<String>, root: Expression) -> Self {
        Self {
            class_under_qualification: class_under_qualification.into(),
            root,
        }
    }
}

// s-expression rendering, for diagnostics and test output
impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attribute(name) => write!(f, "{name}"),
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Operator(node) => {
                write!(f, "({}", node.name)?;
                for operand in &node.operands {
                    write!(f, " {operand}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{}", v.to_rfc3339()),
            Self::ClassRef(v) => write!(f, "<{v}>"),
        }
    }
}

impl std::fmt::Display for ExpressionTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.class_under_qualification, self.root)
    }
}
