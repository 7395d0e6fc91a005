//! Edit tree → expression tree.
//!
//! Each row shape expands to a fixed but non-uniform subtree: NONE is
//! always the negated-or/any form, keyed maps go through the
//! `as`/`parameter` chain, per-user attributes become named operator nodes
//! with an optional qualifying prefix. The decoder reverses every one of
//! these forms, so any change here has a mirror in [`crate::decode`].


use crate::{
    expr::{Expression, ExpressionTree, Literal, names},
    row::{AttributeOperator, CollectionOperator, KeyedProperty, RowData, RowPath, RowRoot},
    value::Value,
};
use quarry_schema::{Attribute, AttributeType, SchemaError, SchemaProvider, Sentinel};
use thiserror::Error as ThisError;

///
/// EncodeError
///
/// Precondition violations. Every variant names the offending row; the
/// caller is expected to have run [`RowRoot::validate`] first, so these
/// are programming errors rather than user input errors.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum EncodeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("row {row} still contains the attribute placeholder")]
    SelectAttribute { row: RowPath },

    #[error("row {row} has an empty attribute path")]
    EmptyAttributePath { row: RowPath },

    #[error("compound row {row} has no children")]
    EmptyCompoundRow { row: RowPath },

    #[error("row {row} has no collection operator where one is required")]
    MissingCollectionOperator { row: RowPath },

    #[error("the root operator must be ANY, ALL, or NONE, not {operator}")]
    RootOperator { operator: CollectionOperator },

    #[error("the second collection operator on row {row} must be ANY, ALL, or NONE")]
    SecondOperator { row: RowPath },

    #[error("row {row} has no attribute operator")]
    MissingOperator { row: RowPath },

    #[error("row {row} has no comparison value")]
    MissingValue { row: RowPath },

    #[error("keyed-map row {row} has no property name/type")]
    MissingProperty { row: RowPath },

    #[error("row {row}: expected {expected} value, found {found}")]
    ValueType {
        row: RowPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("row {row}: property type {ty} has no parameter value class")]
    PropertyType { row: RowPath, ty: AttributeType },

    #[error("per-user keyed row {row} cannot have child rows")]
    UnexpectedChildren { row: RowPath },
}

/// Encode a legal edit tree into the canonical expression form.
pub fn encode<P: SchemaProvider>(
    provider: &P,
    root: &RowRoot,
) -> Result<ExpressionTree, EncodeError> {
    // the CUQ must exist even though row paths carry their own attributes
    provider
        .class_description(&root.class_under_qualification)
        .ok_or_else(|| SchemaError::UnknownClass {
            name: root.class_under_qualification.clone(),
        })?;

    let at = RowPath::root();
    let operator = root
        .row
        .collection_operator
        .ok_or_else(|| EncodeError::MissingCollectionOperator { row: at.clone() })?;

    if root.row.children.is_empty() {
        return Err(EncodeError::EmptyCompoundRow { row: at });
    }

    let children = encode_children(&root.row, &at)?;

    // NONE is always the negated-or form at the root
    let expr = match operator {
        CollectionOperator::Any => Expression::operator(names::OR, children),
        CollectionOperator::All => Expression::operator(names::AND, children),
        CollectionOperator::None => Expression::operator(
            names::NOT,
            vec![Expression::operator(names::OR, children)],
        ),
        CollectionOperator::Count => {
            return Err(EncodeError::RootOperator { operator });
        }
    };

    Ok(ExpressionTree::new(
        root.class_under_qualification.clone(),
        expr,
    ))
}

fn encode_children(row: &RowData, at: &RowPath) -> Result<Vec<Expression>, EncodeError> {
    row.children
        .iter()
        .enumerate()
        .map(|(index, child)| encode_row(child, &at.child(index)))
        .collect()
}

fn encode_row(row: &RowData, at: &RowPath) -> Result<Expression, EncodeError> {
    if !row.attribute_path.is_legal() {
        return Err(EncodeError::SelectAttribute { row: at.clone() });
    }

    // a trailing null pseudo-attribute overrides the row's own operator
    let (segments, sentinel) = row.attribute_path.split_null_sentinel();
    let operator = match sentinel {
        Some(Sentinel::IsNull) => Some(AttributeOperator::IsNull),
        Some(Sentinel::IsNotNull) => Some(AttributeOperator::IsNotNull),
        _ => row.attribute_operator,
    };

    let (prefix, childmost) = segments
        .split_last()
        .map(|(last, prefix)| (prefix, last))
        .ok_or_else(|| EncodeError::EmptyAttributePath { row: at.clone() })?;

    match row.collection_operator {
        Some(CollectionOperator::Count) => {
            encode_count(row, at, prefix, childmost, operator)
        }
        Some(op) => encode_compound(row, at, prefix, childmost, operator, op),
        None => encode_comparison(row, at, prefix, childmost, operator),
    }
}

/// COUNT is never a standalone node: the attribute comparison wraps it.
fn encode_count(
    row: &RowData,
    at: &RowPath,
    prefix: &[Attribute],
    childmost: &Attribute,
    operator: Option<AttributeOperator>,
) -> Result<Expression, EncodeError> {
    let operator = operator.ok_or_else(|| EncodeError::MissingOperator { row: at.clone() })?;
    let symbol = operator
        .symbol()
        .ok_or_else(|| EncodeError::MissingOperator { row: at.clone() })?;

    let literal = match row.attribute_value.as_ref() {
        Some(Value::Int32(v)) => Literal::Int32(*v),
        Some(Value::Int16(v)) => Literal::Int32(i32::from(*v)),
        Some(other) => {
            return Err(EncodeError::ValueType {
                row: at.clone(),
                expected: "int32",
                found: other.kind(),
            });
        }
        None => return Err(EncodeError::MissingValue { row: at.clone() }),
    };

    let count = Expression::operator(names::COUNT, vec![path_expr(prefix, childmost)]);

    Ok(Expression::operator(
        symbol,
        vec![count, Expression::literal(literal)],
    ))
}

fn encode_compound(
    row: &RowData,
    at: &RowPath,
    prefix: &[Attribute],
    childmost: &Attribute,
    operator: Option<AttributeOperator>,
    collection: CollectionOperator,
) -> Result<Expression, EncodeError> {
    if childmost.ty == AttributeType::PerUserParametersMap {
        return encode_per_user_map(row, at, prefix, childmost, operator, collection);
    }

    if row.children.is_empty() {
        return Err(EncodeError::EmptyCompoundRow { row: at.clone() });
    }

    let children = encode_children(row, at)?;
    let path = path_expr(prefix, childmost);

    let operands = match row.collection_operator2 {
        Some(second) => {
            let inner = compound_node(second, children)
                .ok_or_else(|| EncodeError::SecondOperator { row: at.clone() })?;
            vec![path, inner]
        }
        None => {
            let mut operands = Vec::with_capacity(children.len() + 1);
            operands.push(path);
            operands.extend(children);
            operands
        }
    };

    // non-root NONE is negated-any, never a single operator
    compound_node(collection, operands)
        .ok_or(EncodeError::RootOperator { operator: collection })
}

/// ANY/ALL/NONE node over prepared operands; `None` for COUNT.
fn compound_node(op: CollectionOperator, operands: Vec<Expression>) -> Option<Expression> {
    match op {
        CollectionOperator::Any => Some(Expression::operator(names::ANY, operands)),
        CollectionOperator::All => Some(Expression::operator(names::ALL, operands)),
        CollectionOperator::None => Some(Expression::operator(
            names::NOT,
            vec![Expression::operator(names::ANY, operands)],
        )),
        CollectionOperator::Count => None,
    }
}

fn encode_comparison(
    row: &RowData,
    at: &RowPath,
    prefix: &[Attribute],
    childmost: &Attribute,
    operator: Option<AttributeOperator>,
) -> Result<Expression, EncodeError> {
    let operator = operator.ok_or_else(|| EncodeError::MissingOperator { row: at.clone() })?;

    match childmost.ty {
        AttributeType::ParametersMap => {
            let prop = required_prop(row, at)?;
            let class_name = parameter_class(prop, at)?;

            let parameter = Expression::operator(
                names::PARAMETER,
                vec![
                    path_expr(prefix, childmost),
                    Expression::literal(Literal::Text(prop.name.clone())),
                ],
            );
            let as_node = Expression::operator(
                names::AS,
                vec![
                    parameter,
                    Expression::literal(Literal::ClassRef(class_name.to_string())),
                ],
            );
            let lhs = Expression::operator(
                names::DOT,
                vec![as_node, Expression::attribute(names::VALUE)],
            );

            wrap_comparison(lhs, operator, row.attribute_value.as_ref(), prop.ty, at)
        }
        AttributeType::PerUserParametersMap => {
            // only reachable without a quantifier, which validation rejects
            Err(EncodeError::MissingCollectionOperator { row: at.clone() })
        }
        AttributeType::PerUser | AttributeType::PerUserOrCustomReference => {
            let lhs = per_user_expr(prefix, childmost);
            wrap_comparison(lhs, operator, row.attribute_value.as_ref(), childmost.ty, at)
        }
        _ => {
            let lhs = path_expr(prefix, childmost);
            wrap_comparison(lhs, operator, row.attribute_value.as_ref(), childmost.ty, at)
        }
    }
}

/// The `elementsOfType` form: the row's compound operator carries the
/// elements node and its sibling value comparison.
fn encode_per_user_map(
    row: &RowData,
    at: &RowPath,
    prefix: &[Attribute],
    childmost: &Attribute,
    operator: Option<AttributeOperator>,
    collection: CollectionOperator,
) -> Result<Expression, EncodeError> {
    if !row.children.is_empty() {
        return Err(EncodeError::UnexpectedChildren { row: at.clone() });
    }

    let operator = operator.ok_or_else(|| EncodeError::MissingOperator { row: at.clone() })?;
    let prop = required_prop(row, at)?;
    let class_name = parameter_class(prop, at)?;

    // the qualifying prefix, or an explicit "this"
    let scope = match prefix.split_last() {
        Some((last, rest)) => path_expr(rest, last),
        None => Expression::attribute(names::THIS),
    };

    let keyed = Expression::operator(
        per_user_name(childmost),
        vec![
            Expression::literal(Literal::Text(prop.name.clone())),
            scope,
        ],
    );
    let elements = Expression::operator(
        names::ELEMENTS_OF_TYPE,
        vec![
            keyed,
            Expression::literal(Literal::ClassRef(class_name.to_string())),
        ],
    );

    let comparison = wrap_comparison(
        Expression::attribute(names::VALUE),
        operator,
        row.attribute_value.as_ref(),
        prop.ty,
        at,
    )?;

    compound_node(collection, vec![elements, comparison])
        .ok_or(EncodeError::RootOperator { operator: collection })
}

/// Left-deep binary dot chain over a non-empty path.
fn path_expr(prefix: &[Attribute], last: &Attribute) -> Expression {
    let leaf = Expression::attribute(last.query_name.clone());

    match prefix.split_last() {
        Some((pl, pp)) => Expression::operator(names::DOT, vec![path_expr(pp, pl), leaf]),
        None => leaf,
    }
}

/// Per-user operator node; "this" is implicit when there is no prefix.
fn per_user_expr(prefix: &[Attribute], childmost: &Attribute) -> Expression {
    let operands = match prefix.split_last() {
        Some((last, rest)) => vec![path_expr(rest, last)],
        None => Vec::new(),
    };

    Expression::operator(per_user_name(childmost), operands)
}

fn per_user_name(attr: &Attribute) -> String {
    if attr.is_mine {
        format!("{}{}", names::MY_PREFIX, attr.query_name)
    } else {
        attr.query_name.clone()
    }
}

fn wrap_comparison(
    lhs: Expression,
    operator: AttributeOperator,
    value: Option<&Value>,
    ty: AttributeType,
    at: &RowPath,
) -> Result<Expression, EncodeError> {
    let expr = match operator {
        AttributeOperator::IsNull => Expression::operator(names::IS_NULL, vec![lhs]),
        AttributeOperator::IsNotNull => Expression::operator(
            names::NOT,
            vec![Expression::operator(names::IS_NULL, vec![lhs])],
        ),
        AttributeOperator::IsTrue => Expression::operator(
            names::EQ,
            vec![lhs, Expression::literal(Literal::Bool(true))],
        ),
        AttributeOperator::IsFalse => Expression::operator(
            names::EQ,
            vec![lhs, Expression::literal(Literal::Bool(false))],
        ),
        other => {
            let symbol = other
                .symbol()
                .ok_or_else(|| EncodeError::MissingOperator { row: at.clone() })?;
            let value = value.ok_or_else(|| EncodeError::MissingValue { row: at.clone() })?;
            let literal = literal_of(ty, value, at)?;

            Expression::operator(symbol, vec![lhs, Expression::literal(literal)])
        }
    };

    Ok(expr)
}

/// Total type→literal mapping. Int16 widens; booleans have no literal
/// comparisons (IS_TRUE/IS_FALSE are the only boolean operators, so the
/// collapse in `wrap_comparison` is the single encoding).
fn literal_of(ty: AttributeType, value: &Value, at: &RowPath) -> Result<Literal, EncodeError> {
    let mismatch = |expected: &'static str| EncodeError::ValueType {
        row: at.clone(),
        expected,
        found: value.kind(),
    };

    let literal = match ty {
        AttributeType::Utf8String => match value {
            Value::Text(s) => Literal::Text(s.clone()),
            _ => return Err(mismatch("text")),
        },
        AttributeType::Int16 => match value {
            Value::Int16(v) => Literal::Int32(i32::from(*v)),
            _ => return Err(mismatch("int16")),
        },
        AttributeType::Int32 => match value {
            Value::Int32(v) => Literal::Int32(*v),
            _ => return Err(mismatch("int32")),
        },
        AttributeType::Float64 => match value {
            Value::Float64(v) => Literal::Float64(*v),
            _ => return Err(mismatch("float64")),
        },
        AttributeType::DateTime => match value {
            Value::Time(v) => Literal::Time(*v),
            _ => return Err(mismatch("time")),
        },
        AttributeType::Reference => match value {
            Value::Text(s) => Literal::ClassRef(s.clone()),
            _ => return Err(mismatch("class name")),
        },
        AttributeType::PerUser | AttributeType::PerUserOrCustomReference => match value {
            Value::Text(s) => Literal::Text(s.clone()),
            _ => return Err(mismatch("text")),
        },
        AttributeType::Boolean => {
            return Err(mismatch("is true / is false operator"));
        }
        AttributeType::ParametersMap | AttributeType::PerUserParametersMap => {
            return Err(mismatch("keyed property value"));
        }
    };

    Ok(literal)
}

fn required_prop<'a>(row: &'a RowData, at: &RowPath) -> Result<&'a KeyedProperty, EncodeError> {
    row.prop
        .as_ref()
        .ok_or_else(|| EncodeError::MissingProperty { row: at.clone() })
}

fn parameter_class(prop: &KeyedProperty, at: &RowPath) -> Result<&'static str, EncodeError> {
    prop.ty
        .parameter_class_name()
        .ok_or_else(|| EncodeError::PropertyType {
            row: at.clone(),
            ty: prop.ty,
        })
}
