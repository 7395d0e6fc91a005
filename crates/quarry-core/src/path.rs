//! Ordered attribute chains from a starting class to a leaf attribute.

use derive_more::{Deref, DerefMut, IntoIterator};
use quarry_schema::{Attribute, ClassDescription, SchemaError, SchemaProvider, Sentinel};
use serde::{Deserialize, Serialize};

///
/// AttributePath
///
/// An ordered chain of attributes. Paths store owned attribute values so a
/// row can carry the "my" variant of a per-user attribute independently of
/// the catalog's canonical copy.
///

#[derive(
    Clone, Debug, Default, Deref, DerefMut, Deserialize, Eq, IntoIterator, PartialEq, Serialize,
)]
pub struct AttributePath(#[into_iterator(owned, ref)] Vec<Attribute>);

impl AttributePath {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// The last (rightmost) attribute, which determines the row's
    /// comparison semantics.
    #[must_use]
    pub fn childmost(&self) -> Option<&Attribute> {
        self.0.last()
    }

    /// Split into qualifying prefix and childmost attribute.
    #[must_use]
    pub fn split_childmost(&self) -> Option<(&[Attribute], &Attribute)> {
        self.0.split_last().map(|(last, prefix)| (prefix, last))
    }

    /// A path is legal iff no segment is the SELECT placeholder.
    #[must_use]
    pub fn is_legal(&self) -> bool {
        !self.0.iter().any(Attribute::is_select)
    }

    /// Strip a trailing IS_NULL / IS_NOT_NULL pseudo-attribute, returning
    /// the sentinel alongside the remaining path. Identity when the
    /// childmost segment is a real attribute.
    #[must_use]
    pub fn split_null_sentinel(&self) -> (&[Attribute], Option<Sentinel>) {
        match self.split_childmost() {
            Some((prefix, last)) => match last.sentinel() {
                s @ Some(Sentinel::IsNull | Sentinel::IsNotNull) => (prefix, s),
                _ => (self.0.as_slice(), None),
            },
            None => (self.0.as_slice(), None),
        }
    }
}

impl From<Vec<Attribute>> for AttributePath {
    fn from(segments: Vec<Attribute>) -> Self {
        Self(segments)
    }
}

impl FromIterator<Attribute> for AttributePath {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for AttributePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, attr) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", attr.name)?;
        }

        Ok(())
    }
}

/// Walk `segments` from `start`, following reference targets, and return
/// the class reachable after the final segment. Errors if a non-terminal
/// segment does not lead to a class.
pub fn resolve_class<'a, P: SchemaProvider>(
    provider: &'a P,
    start: &'a ClassDescription,
    segments: &[Attribute],
) -> Result<&'a ClassDescription, SchemaError> {
    let mut current = start;

    for attr in segments {
        let target = attr
            .target
            .as_deref()
            .ok_or_else(|| SchemaError::NotAReference {
                class: current.name.clone(),
                attribute: attr.name.clone(),
            })?;

        current = provider
            .class_description(target)
            .ok_or_else(|| SchemaError::UnknownClass {
                name: target.to_string(),
            })?;
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog as demo_catalog, path as path_of};
    use quarry_schema::{AttributeType, Cardinality};

    #[test]
    fn childmost_and_split() {
        let catalog = demo_catalog();
        let path = path_of(&catalog, "Epoch", &["epochGroup", "source", "label"]);

        assert_eq!(path.len(), 3);
        assert_eq!(path.childmost().map(|a| a.name.as_str()), Some("label"));

        let (prefix, last) = path.split_childmost().expect("non-empty");
        assert_eq!(prefix.len(), 2);
        assert_eq!(last.ty, AttributeType::Utf8String);
    }

    #[test]
    fn select_sentinel_makes_path_illegal() {
        let mut path = AttributePath::new();
        assert!(path.is_legal());

        path.push(Attribute::select());
        assert!(!path.is_legal());
    }

    #[test]
    fn null_sentinel_splits_off() {
        let catalog = demo_catalog();
        let mut path = path_of(&catalog, "Epoch", &["epochGroup"]);
        path.push(Attribute::is_null());

        let (prefix, sentinel) = path.split_null_sentinel();
        assert_eq!(prefix.len(), 1);
        assert_eq!(sentinel, Some(Sentinel::IsNull));

        let plain = path_of(&catalog, "Epoch", &["purpose"]);
        let (prefix, sentinel) = plain.split_null_sentinel();
        assert_eq!(prefix.len(), 1);
        assert_eq!(sentinel, None);
    }

    #[test]
    fn resolve_class_follows_references() {
        let catalog = demo_catalog();
        let epoch = catalog.class("Epoch").expect("Epoch");
        let path = path_of(&catalog, "Epoch", &["epochGroup", "source"]);

        let resolved = resolve_class(&catalog, epoch, &path).expect("resolves");
        assert_eq!(resolved.name, "Source");
    }

    #[test]
    fn resolve_class_rejects_non_reference_segment() {
        let catalog = demo_catalog();
        let epoch = catalog.class("Epoch").expect("Epoch");
        let purpose = catalog.attribute(epoch, "purpose").expect("attr").clone();
        assert_eq!(purpose.cardinality, Cardinality::ToOne);

        let err = resolve_class(&catalog, epoch, &[purpose]).expect_err("not a reference");
        assert!(matches!(err, SchemaError::NotAReference { .. }));
    }
}
