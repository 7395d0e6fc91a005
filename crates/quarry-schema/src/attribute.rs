use crate::prelude::*;

///
/// Sentinel
///
/// Pseudo-attributes that live outside any catalog. SELECT is the
/// placeholder for a row whose attribute is still unchosen and is always
/// illegal; the null checks are normalized into attribute operators before
/// encoding.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Sentinel {
    Select,
    IsNull,
    IsNotNull,
}

///
/// Attribute
///
/// A typed attribute on a class. `query_name` is the spelling used in the
/// expression tree; `is_mine` distinguishes the "my X" variant of a
/// per-user-family attribute from the "any X" variant (same query name,
/// "my"-prefixed on encode).
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub display_name: String,
    pub query_name: String,
    pub ty: AttributeType,
    pub cardinality: Cardinality,
    pub target: Option<String>,
    pub is_mine: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    sentinel: Option<Sentinel>,
}

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: AttributeType) -> Self {
        let name = name.into();

        Self {
            display_name: name.clone(),
            query_name: name.clone(),
            name,
            ty,
            cardinality: Cardinality::ToOne,
            target: None,
            is_mine: false,
            sentinel: None,
        }
    }

    /// Reference attribute pointing at `target`, with the given cardinality.
    #[must_use]
    pub fn reference(
        name: impl Into<String>,
        target: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        let mut attr = Self::new(name, AttributeType::Reference);
        attr.target = Some(target.into());
        attr.cardinality = cardinality;

        attr
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_query_name(mut self, query_name: impl Into<String>) -> Self {
        self.query_name = query_name.into();
        self
    }

    #[must_use]
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Flip to the "my X" variant of a per-user-family attribute.
    #[must_use]
    pub const fn with_is_mine(mut self, is_mine: bool) -> Self {
        self.is_mine = is_mine;
        self
    }

    // sentinels

    #[must_use]
    pub fn select() -> Self {
        Self::sentinel_named("select", Sentinel::Select)
    }

    #[must_use]
    pub fn is_null() -> Self {
        Self::sentinel_named("is null", Sentinel::IsNull)
    }

    #[must_use]
    pub fn is_not_null() -> Self {
        Self::sentinel_named("is not null", Sentinel::IsNotNull)
    }

    fn sentinel_named(name: &str, sentinel: Sentinel) -> Self {
        let mut attr = Self::new(name, AttributeType::Utf8String);
        attr.cardinality = Cardinality::Na;
        attr.sentinel = Some(sentinel);

        attr
    }

    #[must_use]
    pub const fn sentinel(&self) -> Option<Sentinel> {
        self.sentinel
    }

    #[must_use]
    pub const fn is_select(&self) -> bool {
        matches!(self.sentinel, Some(Sentinel::Select))
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
