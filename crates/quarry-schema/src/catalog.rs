use crate::{MAX_NAME_LEN, prelude::*};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

///
/// SchemaProvider
///
/// Read-only schema handle injected into the translator. Deliberately a
/// trait so decode lookahead can be exercised against synthetic catalogs;
/// there is no global registry.
///

pub trait SchemaProvider {
    fn class_description(&self, name: &str) -> Option<&ClassDescription>;

    /// Flattened attribute lookup: the class's own attributes plus every
    /// ancestor's, nearest declaration winning.
    fn attribute<'a>(&'a self, class: &'a ClassDescription, name: &str) -> Option<&'a Attribute> {
        self.find_attribute(class, |a| a.name == name)
    }

    /// Flattened lookup by query-tree spelling.
    fn attribute_by_query_name<'a>(
        &'a self,
        class: &'a ClassDescription,
        query_name: &str,
    ) -> Option<&'a Attribute> {
        self.find_attribute(class, |a| a.query_name == query_name)
    }

    /// Own plus inherited attributes, subclass declarations first.
    fn all_attributes<'a>(&'a self, class: &'a ClassDescription) -> Vec<&'a Attribute> {
        let mut out = Vec::new();
        let mut current = Some(class);

        while let Some(cls) = current {
            out.extend(cls.own_attributes());
            current = cls
                .parent
                .as_deref()
                .and_then(|p| self.class_description(p));
        }

        out
    }

    fn find_attribute<'a>(
        &'a self,
        class: &'a ClassDescription,
        pred: impl Fn(&Attribute) -> bool,
    ) -> Option<&'a Attribute> {
        let mut current = Some(class);

        while let Some(cls) = current {
            if let Some(attr) = cls.own_attributes().iter().find(|a| pred(a)) {
                return Some(attr);
            }
            current = cls
                .parent
                .as_deref()
                .and_then(|p| self.class_description(p));
        }

        None
    }
}

///
/// Catalog
///
/// Owning class registry. Built once through [`CatalogBuilder`], immutable
/// afterwards. BTreeMap keeps iteration (and therefore the fingerprint)
/// deterministic.
///

#[derive(Clone, Debug)]
pub struct Catalog {
    classes: BTreeMap<String, ClassDescription>,
}

impl Catalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassDescription> {
        self.classes.get(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDescription> {
        self.classes.values()
    }

    /// Deterministic digest of the catalog's shape: class names, parents,
    /// and every attribute's identifying fields, all length-prefixed so
    /// adjacent names cannot collide.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        for class in self.classes.values() {
            write_str(&mut hasher, &class.name);
            write_str(&mut hasher, class.parent.as_deref().unwrap_or(""));
            write_u32(&mut hasher, class.own_attributes().len() as u32);

            for attr in class.own_attributes() {
                write_str(&mut hasher, &attr.name);
                write_str(&mut hasher, &attr.query_name);
                write_str(&mut hasher, &format!("{}", attr.ty));
                write_str(&mut hasher, &format!("{}", attr.cardinality));
                write_str(&mut hasher, attr.target.as_deref().unwrap_or(""));
            }
        }

        hasher.finalize().into()
    }
}

impl SchemaProvider for Catalog {
    fn class_description(&self, name: &str) -> Option<&ClassDescription> {
        self.class(name)
    }
}

fn write_str(hasher: &mut Sha256, s: &str) {
    write_u32(hasher, s.len() as u32);
    hasher.update(s.as_bytes());
}

fn write_u32(hasher: &mut Sha256, v: u32) {
    hasher.update(v.to_be_bytes());
}

///
/// CatalogBuilder
///
/// Collects class descriptions and validates the whole set on `build`:
/// no duplicate classes or attributes, every parent known, every
/// reference-family attribute carrying a known target.
///

#[derive(Clone, Debug, Default)]
pub struct CatalogBuilder {
    classes: Vec<ClassDescription>,
}

impl CatalogBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn class(mut self, class: ClassDescription) -> Self {
        self.classes.push(class);
        self
    }

    pub fn build(self) -> Result<Catalog, SchemaError> {
        let mut classes = BTreeMap::new();

        for class in self.classes {
            check_name(&class.name)?;

            for attr in class.own_attributes() {
                check_name(&attr.name)?;

                if class
                    .own_attributes()
                    .iter()
                    .filter(|a| a.name == attr.name)
                    .count()
                    > 1
                {
                    return Err(SchemaError::DuplicateAttribute {
                        class: class.name.clone(),
                        attribute: attr.name.clone(),
                    });
                }
            }

            if classes.insert(class.name.clone(), class.clone()).is_some() {
                return Err(SchemaError::DuplicateClass {
                    name: class.name.clone(),
                });
            }
        }

        // parent and target resolution needs the full set
        for class in classes.values() {
            if let Some(parent) = class.parent.as_deref()
                && !classes.contains_key(parent)
            {
                return Err(SchemaError::UnknownParent {
                    class: class.name.clone(),
                    parent: parent.to_string(),
                });
            }

            for attr in class.own_attributes() {
                if let Some(target) = attr.target.as_deref()
                    && !classes.contains_key(target)
                {
                    return Err(SchemaError::UnknownClass {
                        name: target.to_string(),
                    });
                }
            }
        }

        Ok(Catalog { classes })
    }
}

fn check_name(name: &str) -> Result<(), SchemaError> {
    if name.len() > MAX_NAME_LEN {
        return Err(SchemaError::NameTooLong {
            name: name.to_string(),
        });
    }

    Ok(())
}
