use crate::prelude::*;

///
/// Cardinality
///

#[derive(Clone, Copy, Default, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Cardinality {
    #[default]
    ToOne,
    ToMany,
    Na,
}

impl Cardinality {
    #[must_use]
    pub const fn is_to_many(self) -> bool {
        matches!(self, Self::ToMany)
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ToOne => "to-one",
            Self::ToMany => "to-many",
            Self::Na => "n/a",
        };

        write!(f, "{s}")
    }
}

///
/// AttributeType
///
/// Declared kind of a schema attribute. The map- and per-user-family kinds
/// drive the irregular encodings in the translator; everything else is a
/// plain value comparison.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AttributeType {
    Boolean,
    Utf8String,
    Int16,
    Int32,
    Float64,
    DateTime,
    Reference,
    ParametersMap,
    PerUser,
    PerUserParametersMap,
    PerUserOrCustomReference,
}

impl AttributeType {
    /// Keyed-map kinds that require a user-supplied property name and type.
    #[must_use]
    pub const fn is_map_family(self) -> bool {
        matches!(self, Self::ParametersMap | Self::PerUserParametersMap)
    }

    /// Kinds with "mine" vs "any" user-scoped variants.
    #[must_use]
    pub const fn is_per_user_family(self) -> bool {
        matches!(
            self,
            Self::PerUser | Self::PerUserParametersMap | Self::PerUserOrCustomReference
        )
    }

    /// Kinds that can appear as a non-terminal path segment.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Reference | Self::PerUserOrCustomReference)
    }

    /// Class-reference literal name used by the keyed-map encodings for a
    /// property of this type. Total over the value-bearing kinds only.
    #[must_use]
    pub const fn parameter_class_name(self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("BooleanValue"),
            Self::Utf8String => Some("StringValue"),
            Self::Int16 | Self::Int32 => Some("IntegerValue"),
            Self::Float64 => Some("NumericValue"),
            Self::DateTime => Some("DateValue"),
            _ => None,
        }
    }

    /// Inverse of [`Self::parameter_class_name`]. Ambiguous integer widths
    /// resolve to `Int32`; narrowing back to `Int16` is schema-driven and
    /// happens in the decoder.
    #[must_use]
    pub fn from_parameter_class_name(name: &str) -> Option<Self> {
        match name {
            "BooleanValue" => Some(Self::Boolean),
            "StringValue" => Some(Self::Utf8String),
            "IntegerValue" => Some(Self::Int32),
            "NumericValue" => Some(Self::Float64),
            "DateValue" => Some(Self::DateTime),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttributeType {
    // The variant name is the canonical spelling.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
