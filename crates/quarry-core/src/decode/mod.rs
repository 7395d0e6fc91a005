//! Expression tree → edit tree.
//!
//! Decoding is two-pass by necessity: a node's interpretation depends on
//! the declared type of the attribute it denotes, so
//! [`resolve::resolve_childmost_class`] runs over a subtree before the
//! structural decode commits to a shape. Malformed input fails with an
//! error naming the offending operator and the expected shape; no partial
//! tree is ever returned.

pub mod resolve;


use crate::{
    expr::{Expression, ExpressionTree, Literal, OperatorNode, names},
    path::AttributePath,
    row::{AttributeOperator, CollectionOperator, KeyedProperty, RowData, RowRoot},
    value::Value,
};
use quarry_schema::{AttributeType, ClassDescription, SchemaError, SchemaProvider};
use resolve::{lookup, per_user_attribute, resolve_childmost_class, scope_class};
use thiserror::Error as ThisError;

///
/// DecodeError
///
/// Expected-grammar-violation diagnostics. All fatal; decoding never
/// recovers locally, because the transform is deterministic and a retry
/// would fail identically.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DecodeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("operator {operator} expects {expected} operand(s), found {found}")]
    Arity {
        operator: String,
        expected: usize,
        found: usize,
    },

    #[error("operator {operator} expects {expected} here, found {found}")]
    Kind {
        operator: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unrecognized operator: {name}")]
    UnknownOperator { name: String },

    #[error("unknown attribute: {class}.{attribute}")]
    UnknownAttribute { class: String, attribute: String },

    #[error("attribute {attribute} is not {expected}")]
    AttributeKind {
        attribute: String,
        expected: &'static str,
    },

    #[error("unrecognized parameter value class: {name}")]
    ParameterClass { name: String },

    #[error("operator {operator} expects a {expected} literal, found {found}")]
    LiteralType {
        operator: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {value} is out of range for a 16-bit attribute")]
    Int16Range { value: i32 },
}

/// Decode a well-formed expression tree back into an edit tree. The result
/// re-encodes to a structurally equal expression tree.
pub fn decode<P: SchemaProvider>(
    provider: &P,
    tree: &ExpressionTree,
) -> Result<RowRoot, DecodeError> {
    let class = provider
        .class_description(&tree.class_under_qualification)
        .ok_or_else(|| SchemaError::UnknownClass {
            name: tree.class_under_qualification.clone(),
        })?;

    let node = tree.root.as_operator().ok_or_else(|| DecodeError::Kind {
        operator: "<root>".to_string(),
        expected: "operator",
        found: tree.root.kind(),
    })?;

    let (operator, operands) = classify_root(node)?;

    let mut root = RowRoot::new(&tree.class_under_qualification, operator);
    root.row.children = operands
        .iter()
        .map(|child| decode_row(provider, class, child))
        .collect::<Result<_, _>>()?;

    Ok(root)
}

/// Root-level collection classification: or/any → ANY, and/all → ALL,
/// not(or|any) → NONE. The NONE form is unwrapped one level to reach the
/// real operand list.
fn classify_root(node: &OperatorNode) -> Result<(CollectionOperator, &[Expression]), DecodeError> {
    match node.name.as_str() {
        names::OR | names::ANY => Ok((CollectionOperator::Any, &node.operands)),
        names::AND | names::ALL => Ok((CollectionOperator::All, &node.operands)),
        names::NOT => {
            let inner = unwrap_not(node)?;
            match inner.name.as_str() {
                names::OR | names::ANY => Ok((CollectionOperator::None, &inner.operands)),
                other => Err(DecodeError::UnknownOperator {
                    name: other.to_string(),
                }),
            }
        }
        other => Err(DecodeError::UnknownOperator {
            name: other.to_string(),
        }),
    }
}

/// A `not` node has exactly one operand, and it must itself be an
/// operator. Extra operands are an error, never silently ignored.
fn unwrap_not(node: &OperatorNode) -> Result<&OperatorNode, DecodeError> {
    if node.operands.len() != 1 {
        return Err(DecodeError::Arity {
            operator: names::NOT.to_string(),
            expected: 1,
            found: node.operands.len(),
        });
    }

    node.operands[0].as_operator().ok_or_else(|| DecodeError::Kind {
        operator: names::NOT.to_string(),
        expected: "operator",
        found: node.operands[0].kind(),
    })
}

fn decode_row<P: SchemaProvider>(
    provider: &P,
    class: &ClassDescription,
    expr: &Expression,
) -> Result<RowData, DecodeError> {
    let node = expr.as_operator().ok_or_else(|| DecodeError::Kind {
        operator: "<row>".to_string(),
        expected: "operator",
        found: expr.kind(),
    })?;

    if let Some(operator) = AttributeOperator::from_symbol(&node.name) {
        return decode_comparison_row(provider, class, node, operator);
    }

    match node.name.as_str() {
        names::IS_NULL => decode_null_row(provider, class, node, AttributeOperator::IsNull),
        names::NOT => {
            let inner = unwrap_not(node)?;
            match inner.name.as_str() {
                names::IS_NULL => {
                    decode_null_row(provider, class, inner, AttributeOperator::IsNotNull)
                }
                names::ANY | names::OR => {
                    decode_compound_row(provider, class, CollectionOperator::None, inner)
                }
                other => Err(DecodeError::UnknownOperator {
                    name: other.to_string(),
                }),
            }
        }
        names::ANY | names::OR => {
            decode_compound_row(provider, class, CollectionOperator::Any, node)
        }
        names::ALL | names::AND => {
            decode_compound_row(provider, class, CollectionOperator::All, node)
        }
        names::COUNT => Err(DecodeError::Kind {
            operator: names::COUNT.to_string(),
            expected: "an enclosing comparison operator",
            found: "row position",
        }),
        other => Err(DecodeError::UnknownOperator {
            name: other.to_string(),
        }),
    }
}

fn single_path_operand<P: SchemaProvider>(
    provider: &P,
    class: &ClassDescription,
    node: &OperatorNode,
) -> Result<AttributePath, DecodeError> {
    if node.operands.len() != 1 {
        return Err(DecodeError::Arity {
            operator: node.name.clone(),
            expected: 1,
            found: node.operands.len(),
        });
    }

    decode_path(provider, class, &node.operands[0])
}

/// A null check row: `isnull` (or its negation) over a plain path or a
/// keyed-map chain.
fn decode_null_row<P: SchemaProvider>(
    provider: &P,
    class: &ClassDescription,
    node: &OperatorNode,
    operator: AttributeOperator,
) -> Result<RowData, DecodeError> {
    if node.operands.len() != 1 {
        return Err(DecodeError::Arity {
            operator: node.name.clone(),
            expected: 1,
            found: node.operands.len(),
        });
    }

    if let Some(dot) = keyed_chain(&node.operands[0]) {
        let (path, prop) = decode_keyed_chain(provider, class, dot)?;
        return Ok(RowData::new(path).with_prop(prop).with_operator(operator));
    }

    let path = decode_path(provider, class, &node.operands[0])?;

    Ok(RowData::new(path).with_operator(operator))
}

/// Recognize the `(. (as …) value)` head of a keyed-map encoding.
fn keyed_chain(expr: &Expression) -> Option<&OperatorNode> {
    expr.as_operator().filter(|dot| {
        dot.name == names::DOT
            && dot
                .operands
                .first()
                .and_then(Expression::as_operator)
                .is_some_and(|n| n.name == names::AS)
    })
}

fn decode_comparison_row<P: SchemaProvider>(
    provider: &P,
    class: &ClassDescription,
    node: &OperatorNode,
    operator: AttributeOperator,
) -> Result<RowData, DecodeError> {
    if node.operands.len() != 2 {
        return Err(DecodeError::Arity {
            operator: node.name.clone(),
            expected: 2,
            found: node.operands.len(),
        });
    }

    let lhs = &node.operands[0];
    let rhs = &node.operands[1];

    // count wrapper
    if let Some(inner) = lhs.as_operator()
        && inner.name == names::COUNT
    {
        let path = single_path_operand(provider, class, inner)?;
        let value = match require_literal(&node.name, rhs)? {
            Literal::Int32(v) => Value::Int32(*v),
            other => {
                return Err(DecodeError::LiteralType {
                    operator: node.name.clone(),
                    expected: "int32",
                    found: other.kind(),
                });
            }
        };

        let mut row = RowData::new(path)
            .with_collection_operator(CollectionOperator::Count)
            .with_operator(operator);
        row.attribute_value = Some(value);

        return Ok(row);
    }

    // keyed-map shape
    if let Some(dot) = keyed_chain(lhs) {
        return decode_map_comparison(provider, class, node, dot, operator);
    }

    // plain (or per-user) attribute comparison
    let path = decode_path(provider, class, lhs)?;
    let childmost = path.childmost().ok_or_else(|| DecodeError::Kind {
        operator: node.name.clone(),
        expected: "attribute path",
        found: lhs.kind(),
    })?;

    let (operator, value) = decode_rhs(&node.name, operator, childmost.ty, rhs)?;

    let mut row = RowData::new(path).with_operator(operator);
    row.attribute_value = value;

    Ok(row)
}

fn decode_map_comparison<P: SchemaProvider>(
    provider: &P,
    class: &ClassDescription,
    node: &OperatorNode,
    dot: &OperatorNode,
    operator: AttributeOperator,
) -> Result<RowData, DecodeError> {
    let (path, prop) = decode_keyed_chain(provider, class, dot)?;
    let (operator, value) = decode_rhs(&node.name, operator, prop.ty, &node.operands[1])?;

    let mut row = RowData::new(path).with_prop(prop).with_operator(operator);
    row.attribute_value = value;

    Ok(row)
}

/// Recover the map path and property from a `(. (as (parameter path name)
/// class) value)` chain.
fn decode_keyed_chain<P: SchemaProvider>(
    provider: &P,
    class: &ClassDescription,
    dot: &OperatorNode,
) -> Result<(AttributePath, KeyedProperty), DecodeError> {
    if dot.operands.len() != 2 {
        return Err(DecodeError::Arity {
            operator: names::DOT.to_string(),
            expected: 2,
            found: dot.operands.len(),
        });
    }

    // guarded by the caller
    let as_node = dot.operands[0].as_operator().expect("as operator");
    if as_node.operands.len() != 2 {
        return Err(DecodeError::Arity {
            operator: names::AS.to_string(),
            expected: 2,
            found: as_node.operands.len(),
        });
    }

    let parameter = as_node.operands[0]
        .as_operator()
        .filter(|n| n.name == names::PARAMETER)
        .ok_or_else(|| DecodeError::Kind {
            operator: names::AS.to_string(),
            expected: "parameter operator",
            found: as_node.operands[0].kind(),
        })?;

    if parameter.operands.len() != 2 {
        return Err(DecodeError::Arity {
            operator: names::PARAMETER.to_string(),
            expected: 2,
            found: parameter.operands.len(),
        });
    }

    if dot.operands[1].as_attribute() != Some(names::VALUE) {
        return Err(DecodeError::Kind {
            operator: names::DOT.to_string(),
            expected: "the value attribute",
            found: dot.operands[1].kind(),
        });
    }

    let path = decode_path(provider, class, &parameter.operands[0])?;
    let childmost = path.childmost().ok_or_else(|| DecodeError::Kind {
        operator: names::PARAMETER.to_string(),
        expected: "attribute path",
        found: parameter.operands[0].kind(),
    })?;

    if childmost.ty != AttributeType::ParametersMap {
        return Err(DecodeError::AttributeKind {
            attribute: childmost.name.clone(),
            expected: "a parameters map",
        });
    }

    let prop_name = match require_literal(names::PARAMETER, &parameter.operands[1])? {
        Literal::Text(s) => s.clone(),
        other => {
            return Err(DecodeError::LiteralType {
                operator: names::PARAMETER.to_string(),
                expected: "text",
                found: other.kind(),
            });
        }
    };

    let prop_ty = parameter_type(names::AS, &as_node.operands[1])?;

    Ok((path, KeyedProperty::new(prop_name, prop_ty)))
}

fn decode_compound_row<P: SchemaProvider>(
    provider: &P,
    class: &ClassDescription,
    collection: CollectionOperator,
    node: &OperatorNode,
) -> Result<RowData, DecodeError> {
    let Some((head, rest)) = node.operands.split_first() else {
        return Err(DecodeError::Arity {
            operator: node.name.clone(),
            expected: 2,
            found: 0,
        });
    };

    // per-user keyed maps hide under a compound node
    if head
        .as_operator()
        .is_some_and(|n| n.name == names::ELEMENTS_OF_TYPE)
    {
        return decode_per_user_map_row(provider, class, collection, node);
    }

    let path = decode_path(provider, class, head)?;
    let childmost = path.childmost().ok_or_else(|| DecodeError::Kind {
        operator: node.name.clone(),
        expected: "attribute path",
        found: head.kind(),
    })?;

    let target = childmost
        .target
        .as_deref()
        .ok_or_else(|| SchemaError::NotAReference {
            class: class.name.clone(),
            attribute: childmost.name.clone(),
        })?;
    let target = provider
        .class_description(target)
        .ok_or_else(|| SchemaError::UnknownClass {
            name: target.to_string(),
        })?;

    let mut row = RowData::new(path).with_collection_operator(collection);

    // a lone trailing collection node is the second-level quantifier —
    // unless its first operand is itself a path, which makes it a child row
    if let [only] = rest
        && let Some((second, inner)) = second_level(provider, target, only)?
    {
        row.collection_operator2 = Some(second);
        row.children = inner
            .iter()
            .map(|child| decode_row(provider, target, child))
            .collect::<Result<_, _>>()?;
    } else {
        row.children = rest
            .iter()
            .map(|child| decode_row(provider, target, child))
            .collect::<Result<_, _>>()?;
    }

    Ok(row)
}

/// Recognize a second-level collection operator node. Returns the operator
/// and its operand list (the outer row's children), or `None` when the
/// node reads as an ordinary child row.
fn second_level<'e, P: SchemaProvider>(
    provider: &P,
    target: &ClassDescription,
    expr: &'e Expression,
) -> Result<Option<(CollectionOperator, &'e [Expression])>, DecodeError> {
    let Some(node) = expr.as_operator() else {
        return Ok(None);
    };

    let (operator, inner): (_, &[Expression]) = match node.name.as_str() {
        names::ANY | names::OR => (CollectionOperator::Any, &node.operands),
        names::ALL | names::AND => (CollectionOperator::All, &node.operands),
        names::NOT => {
            let Ok(inner) = unwrap_not(node) else {
                return Ok(None);
            };
            match inner.name.as_str() {
                names::ANY | names::OR => (CollectionOperator::None, &inner.operands),
                _ => return Ok(None),
            }
        }
        _ => return Ok(None),
    };

    // a child row's first operand is a path; a second-level node's
    // operands are all rows
    if inner.first().is_some_and(|e| is_path_like(provider, target, e)) {
        return Ok(None);
    }

    Ok(Some((operator, inner)))
}

/// Heuristic shared with the encoder's output shapes: path expressions are
/// attribute leaves, dot chains, or per-user operator nodes; row nodes are
/// comparisons, null checks, or collection operators.
fn is_path_like<P: SchemaProvider>(
    provider: &P,
    class: &ClassDescription,
    expr: &Expression,
) -> bool {
    match expr {
        Expression::Attribute(_) => true,
        Expression::Operator(node) if node.name == names::DOT => true,
        Expression::Operator(node) => per_user_attribute(provider, class, &node.name).is_some(),
        Expression::Literal(_) => false,
    }
}

fn decode_per_user_map_row<P: SchemaProvider>(
    provider: &P,
    class: &ClassDescription,
    collection: CollectionOperator,
    node: &OperatorNode,
) -> Result<RowData, DecodeError> {
    if node.operands.len() != 2 {
        return Err(DecodeError::Arity {
            operator: node.name.clone(),
            expected: 2,
            found: node.operands.len(),
        });
    }

    // guarded by the caller
    let elements = node.operands[0].as_operator().expect("elementsOfType");
    if elements.operands.len() != 2 {
        return Err(DecodeError::Arity {
            operator: names::ELEMENTS_OF_TYPE.to_string(),
            expected: 2,
            found: elements.operands.len(),
        });
    }

    let keyed = elements.operands[0]
        .as_operator()
        .ok_or_else(|| DecodeError::Kind {
            operator: names::ELEMENTS_OF_TYPE.to_string(),
            expected: "operator",
            found: elements.operands[0].kind(),
        })?;

    if keyed.operands.len() != 2 {
        return Err(DecodeError::Arity {
            operator: keyed.name.clone(),
            expected: 2,
            found: keyed.operands.len(),
        });
    }

    let prop_name = match require_literal(&keyed.name, &keyed.operands[0])? {
        Literal::Text(s) => s.clone(),
        other => {
            return Err(DecodeError::LiteralType {
                operator: keyed.name.clone(),
                expected: "text",
                found: other.kind(),
            });
        }
    };

    let prop_ty = parameter_type(names::ELEMENTS_OF_TYPE, &elements.operands[1])?;

    // scope: explicit "this" or a qualifying prefix path
    let scope = &keyed.operands[1];
    let (mut path, context) = if scope.as_attribute() == Some(names::THIS) {
        (AttributePath::new(), class)
    } else {
        let prefix = decode_path(provider, class, scope)?;
        let context = resolve_childmost_class(provider, class, scope)?;
        (prefix, context)
    };

    let (attr, is_mine) =
        per_user_attribute(provider, context, &keyed.name).ok_or_else(|| {
            DecodeError::UnknownOperator {
                name: keyed.name.clone(),
            }
        })?;

    if attr.ty != AttributeType::PerUserParametersMap {
        return Err(DecodeError::AttributeKind {
            attribute: attr.name.clone(),
            expected: "a per-user parameters map",
        });
    }

    path.push(attr.clone().with_is_mine(is_mine));

    // the sibling comparison over the value pseudo-attribute
    let cmp = node.operands[1].as_operator().ok_or_else(|| DecodeError::Kind {
        operator: node.name.clone(),
        expected: "comparison operator",
        found: node.operands[1].kind(),
    })?;

    let (operator, value) = decode_value_comparison(cmp, prop_ty)?;

    let mut row = RowData::new(path)
        .with_collection_operator(collection)
        .with_prop(KeyedProperty::new(prop_name, prop_ty))
        .with_operator(operator);
    row.attribute_value = value;

    Ok(row)
}

/// Decode the `value`-side comparison of a per-user keyed row: a plain
/// comparison, `isnull`, or `not(isnull)` over the value pseudo-attribute.
fn decode_value_comparison(
    node: &OperatorNode,
    prop_ty: AttributeType,
) -> Result<(AttributeOperator, Option<Value>), DecodeError> {
    if let Some(operator) = AttributeOperator::from_symbol(&node.name) {
        if node.operands.len() != 2 {
            return Err(DecodeError::Arity {
                operator: node.name.clone(),
                expected: 2,
                found: node.operands.len(),
            });
        }
        require_value_attribute(&node.name, &node.operands[0])?;

        return decode_rhs(&node.name, operator, prop_ty, &node.operands[1]);
    }

    match node.name.as_str() {
        names::IS_NULL => {
            require_single_value_operand(node)?;
            Ok((AttributeOperator::IsNull, None))
        }
        names::NOT => {
            let inner = unwrap_not(node)?;
            if inner.name != names::IS_NULL {
                return Err(DecodeError::UnknownOperator {
                    name: inner.name.clone(),
                });
            }
            require_single_value_operand(inner)?;
            Ok((AttributeOperator::IsNotNull, None))
        }
        other => Err(DecodeError::UnknownOperator {
            name: other.to_string(),
        }),
    }
}

fn require_single_value_operand(node: &OperatorNode) -> Result<(), DecodeError> {
    if node.operands.len() != 1 {
        return Err(DecodeError::Arity {
            operator: node.name.clone(),
            expected: 1,
            found: node.operands.len(),
        });
    }

    require_value_attribute(&node.name, &node.operands[0])
}

fn require_value_attribute(operator: &str, expr: &Expression) -> Result<(), DecodeError> {
    if expr.as_attribute() == Some(names::VALUE) {
        Ok(())
    } else {
        Err(DecodeError::Kind {
            operator: operator.to_string(),
            expected: "the value attribute",
            found: expr.kind(),
        })
    }
}

/// Comparison right-hand side: the boolean collapse, or the inverse of the
/// encoder's literal mapping with schema-driven Int16 narrowing.
fn decode_rhs(
    operator_name: &str,
    operator: AttributeOperator,
    decl_ty: AttributeType,
    rhs: &Expression,
) -> Result<(AttributeOperator, Option<Value>), DecodeError> {
    let literal = require_literal(operator_name, rhs)?;

    // `== <bool>` on a boolean attribute collapses to IS_TRUE / IS_FALSE
    if decl_ty == AttributeType::Boolean {
        return match (operator, literal) {
            (AttributeOperator::Eq, Literal::Bool(true)) => Ok((AttributeOperator::IsTrue, None)),
            (AttributeOperator::Eq, Literal::Bool(false)) => Ok((AttributeOperator::IsFalse, None)),
            _ => Err(DecodeError::LiteralType {
                operator: operator_name.to_string(),
                expected: "boolean equality",
                found: literal.kind(),
            }),
        };
    }

    let value = value_of(operator_name, decl_ty, literal)?;

    Ok((operator, Some(value)))
}

fn value_of(
    operator: &str,
    decl_ty: AttributeType,
    literal: &Literal,
) -> Result<Value, DecodeError> {
    let mismatch = |expected: &'static str| DecodeError::LiteralType {
        operator: operator.to_string(),
        expected,
        found: literal.kind(),
    };

    let value = match decl_ty {
        AttributeType::Utf8String => match literal {
            Literal::Text(s) => Value::Text(s.clone()),
            _ => return Err(mismatch("text")),
        },
        AttributeType::Int32 => match literal {
            Literal::Int32(v) => Value::Int32(*v),
            _ => return Err(mismatch("int32")),
        },
        AttributeType::Int16 => match literal {
            // schema-driven narrowing, bounds-checked
            Literal::Int32(v) => i16::try_from(*v)
                .map(Value::Int16)
                .map_err(|_| DecodeError::Int16Range { value: *v })?,
            _ => return Err(mismatch("int32")),
        },
        AttributeType::Float64 => match literal {
            Literal::Float64(v) => Value::Float64(*v),
            _ => return Err(mismatch("float64")),
        },
        AttributeType::DateTime => match literal {
            Literal::Time(v) => Value::Time(*v),
            _ => return Err(mismatch("time")),
        },
        AttributeType::Reference => match literal {
            Literal::ClassRef(s) => Value::Text(s.clone()),
            _ => return Err(mismatch("class name")),
        },
        AttributeType::PerUser | AttributeType::PerUserOrCustomReference => match literal {
            Literal::Text(s) => Value::Text(s.clone()),
            _ => return Err(mismatch("text")),
        },
        AttributeType::Boolean
        | AttributeType::ParametersMap
        | AttributeType::PerUserParametersMap => {
            return Err(mismatch("a comparable literal"));
        }
    };

    Ok(value)
}

fn require_literal<'e>(operator: &str, expr: &'e Expression) -> Result<&'e Literal, DecodeError> {
    expr.as_literal().ok_or_else(|| DecodeError::Kind {
        operator: operator.to_string(),
        expected: "literal",
        found: expr.kind(),
    })
}

fn parameter_type(operator: &str, expr: &Expression) -> Result<AttributeType, DecodeError> {
    match require_literal(operator, expr)? {
        Literal::ClassRef(name) => AttributeType::from_parameter_class_name(name)
            .ok_or_else(|| DecodeError::ParameterClass { name: name.clone() }),
        other => Err(DecodeError::LiteralType {
            operator: operator.to_string(),
            expected: "class",
            found: other.kind(),
        }),
    }
}

/// Decode an attribute-path expression: a leaf, a left-deep dot chain, or
/// a per-user operator node with an optional qualifying prefix.
fn decode_path<P: SchemaProvider>(
    provider: &P,
    class: &ClassDescription,
    expr: &Expression,
) -> Result<AttributePath, DecodeError> {
    match expr {
        Expression::Attribute(name) => {
            let attr = lookup(provider, class, name)?;
            Ok(AttributePath::from(vec![attr.clone()]))
        }
        Expression::Operator(node) if node.name == names::DOT => {
            if node.operands.len() != 2 {
                return Err(DecodeError::Arity {
                    operator: names::DOT.to_string(),
                    expected: 2,
                    found: node.operands.len(),
                });
            }

            let mut path = decode_path(provider, class, &node.operands[0])?;
            // lookahead: the rhs name means nothing until the lhs class
            // is known
            let left = resolve_childmost_class(provider, class, &node.operands[0])?;

            let name = node.operands[1].as_attribute().ok_or_else(|| DecodeError::Kind {
                operator: names::DOT.to_string(),
                expected: "attribute",
                found: node.operands[1].kind(),
            })?;
            let attr = lookup(provider, left, name)?;

            path.push(attr.clone());

            Ok(path)
        }
        Expression::Operator(node) => {
            if node.operands.len() > 1 {
                return Err(DecodeError::Arity {
                    operator: node.name.clone(),
                    expected: 1,
                    found: node.operands.len(),
                });
            }

            let context = scope_class(provider, class, node.operands.first())?;
            let (attr, is_mine) = per_user_attribute(provider, context, &node.name)
                .ok_or_else(|| DecodeError::UnknownOperator {
                    name: node.name.clone(),
                })?;

            let mut path = match node.operands.first() {
                Some(scope) if scope.as_attribute() != Some(names::THIS) => {
                    decode_path(provider, class, scope)?
                }
                _ => AttributePath::new(),
            };
            path.push(attr.clone().with_is_mine(is_mine));

            Ok(path)
        }
        Expression::Literal(_) => Err(DecodeError::Kind {
            operator: "<path>".to_string(),
            expected: "attribute path",
            found: expr.kind(),
        }),
    }
}
