//! Lookahead pass: resolve the class an attribute-path expression reaches.
//!
//! The grammar is not parseable node-locally — whether a node is a keyed
//! map, a per-user operator, or a plain attribute depends on the declared
//! type of the attribute it denotes, which in turn depends on the class
//! its left context resolves to. This pass walks a subtree in the same
//! order as the structural decode and answers only that question; it is a
//! separate function on purpose and must stay one.

use crate::{
    decode::DecodeError,
    expr::{Expression, names},
};
use quarry_schema::{Attribute, ClassDescription, SchemaError, SchemaProvider};

/// The class reachable after walking `expr` as an attribute path starting
/// from `class`. Errors when a segment is unknown or does not lead to a
/// class.
pub fn resolve_childmost_class<'a, P: SchemaProvider>(
    provider: &'a P,
    class: &'a ClassDescription,
    expr: &Expression,
) -> Result<&'a ClassDescription, DecodeError> {
    match expr {
        Expression::Attribute(name) => {
            let attr = lookup(provider, class, name)?;
            target_class(provider, class, attr)
        }
        Expression::Operator(node) if node.name == names::DOT => {
            if node.operands.len() != 2 {
                return Err(DecodeError::Arity {
                    operator: names::DOT.to_string(),
                    expected: 2,
                    found: node.operands.len(),
                });
            }

            let left = resolve_childmost_class(provider, class, &node.operands[0])?;
            let name = node.operands[1].as_attribute().ok_or_else(|| DecodeError::Kind {
                operator: names::DOT.to_string(),
                expected: "attribute",
                found: node.operands[1].kind(),
            })?;

            let attr = lookup(provider, left, name)?;
            target_class(provider, left, attr)
        }
        Expression::Operator(node) => {
            // per-user operator node: resolve the scope first, then match
            // the (possibly "my"-prefixed) name against it
            let scope = scope_class(provider, class, node.operands.first())?;
            let (attr, _is_mine) = per_user_attribute(provider, scope, &node.name)
                .ok_or_else(|| DecodeError::UnknownOperator {
                    name: node.name.clone(),
                })?;

            target_class(provider, scope, attr)
        }
        Expression::Literal(_) => Err(DecodeError::Kind {
            operator: "<path>".to_string(),
            expected: "attribute path",
            found: expr.kind(),
        }),
    }
}

/// Context class for a per-user node's qualifying scope operand: absent or
/// the implicit `this` both mean the starting class.
pub(crate) fn scope_class<'a, P: SchemaProvider>(
    provider: &'a P,
    class: &'a ClassDescription,
    scope: Option<&Expression>,
) -> Result<&'a ClassDescription, DecodeError> {
    match scope {
        None => Ok(class),
        Some(expr) if expr.as_attribute() == Some(names::THIS) => Ok(class),
        Some(expr) => resolve_childmost_class(provider, class, expr),
    }
}

/// Match `name` against a per-user-family attribute on `class`, trying the
/// plain spelling first and then the "my"-prefixed one. The flag reports
/// whether the "mine" variant matched.
pub(crate) fn per_user_attribute<'a, P: SchemaProvider>(
    provider: &'a P,
    class: &'a ClassDescription,
    name: &str,
) -> Option<(&'a Attribute, bool)> {
    if let Some(attr) = provider.attribute_by_query_name(class, name)
        && attr.ty.is_per_user_family()
    {
        return Some((attr, false));
    }

    if let Some(rest) = name.strip_prefix(names::MY_PREFIX)
        && let Some(attr) = provider.attribute_by_query_name(class, rest)
        && attr.ty.is_per_user_family()
    {
        return Some((attr, true));
    }

    None
}

pub(crate) fn lookup<'a, P: SchemaProvider>(
    provider: &'a P,
    class: &'a ClassDescription,
    query_name: &str,
) -> Result<&'a Attribute, DecodeError> {
    provider
        .attribute_by_query_name(class, query_name)
        .ok_or_else(|| DecodeError::UnknownAttribute {
            class: class.name.clone(),
            attribute: query_name.to_string(),
        })
}

fn target_class<'a, P: SchemaProvider>(
    provider: &'a P,
    class: &'a ClassDescription,
    attr: &Attribute,
) -> Result<&'a ClassDescription, DecodeError> {
    let target = attr
        .target
        .as_deref()
        .ok_or_else(|| SchemaError::NotAReference {
            class: class.name.clone(),
            attribute: attr.name.clone(),
        })?;

    provider
        .class_description(target)
        .ok_or_else(|| {
            SchemaError::UnknownClass {
                name: target.to_string(),
            }
            .into()
        })
}
