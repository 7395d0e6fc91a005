use crate::prelude::*;

///
/// ClassDescription
///
/// A named class with single inheritance and its own attributes. Inherited
/// attributes are resolved through the owning [`Catalog`], which holds the
/// parent chain; a class on its own only answers for what it declares.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClassDescription {
    pub name: String,
    pub parent: Option<String>,
    attributes: Vec<Attribute>,
}

impl ClassDescription {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Attributes declared directly on this class, in declaration order.
    #[must_use]
    pub fn own_attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up a declared attribute by name.
    #[must_use]
    pub fn own_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Look up a declared attribute by its query-tree spelling.
    #[must_use]
    pub fn own_attribute_by_query_name(&self, query_name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.query_name == query_name)
    }
}

impl std::fmt::Display for ClassDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
