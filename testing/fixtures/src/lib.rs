//! Demo catalog shared across quarry test surfaces.
//!
//! Models a small acquisition-style schema: an `Entity` base class carrying
//! the per-user attributes, with `Epoch` as the usual class under
//! qualification. Kept deliberately close to the shapes the translator has
//! to disambiguate: plain values, references both to-one and to-many, a
//! keyed parameters map, and the whole per-user family.

use quarry_schema::{Attribute, AttributeType, Cardinality, Catalog, ClassDescription};

/// Build the demo catalog. Panics only on a programming error in the
/// fixture itself, so tests can call it bare.
#[must_use]
pub fn demo_catalog() -> Catalog {
    Catalog::builder()
        .class(
            ClassDescription::new("Entity")
                .with_attribute(Attribute::new("uuid", AttributeType::Utf8String))
                .with_attribute(
                    Attribute::new("keywords", AttributeType::PerUser)
                        .with_cardinality(Cardinality::ToMany)
                        .with_display_name("keyword"),
                )
                .with_attribute(
                    Attribute::new("properties", AttributeType::PerUserParametersMap)
                        .with_cardinality(Cardinality::Na)
                        .with_display_name("property"),
                )
                .with_attribute(
                    Attribute::new("owner", AttributeType::PerUserOrCustomReference)
                        .with_target("User"),
                )
                .with_attribute(
                    Attribute::reference("resources", "Resource", Cardinality::ToMany),
                ),
        )
        .class(
            ClassDescription::new("Epoch")
                .with_parent("Entity")
                .with_attribute(Attribute::new("purpose", AttributeType::Utf8String))
                .with_attribute(Attribute::new("protocolID", AttributeType::Utf8String))
                .with_attribute(Attribute::new("startTime", AttributeType::DateTime))
                .with_attribute(Attribute::new("duration", AttributeType::Float64))
                .with_attribute(Attribute::new("incomplete", AttributeType::Boolean))
                .with_attribute(Attribute::new("channelCount", AttributeType::Int16))
                .with_attribute(
                    Attribute::new("protocolParameters", AttributeType::ParametersMap)
                        .with_cardinality(Cardinality::Na),
                )
                .with_attribute(Attribute::reference(
                    "epochGroup",
                    "EpochGroup",
                    Cardinality::ToOne,
                ))
                .with_attribute(Attribute::reference(
                    "responses",
                    "Response",
                    Cardinality::ToMany,
                )),
        )
        .class(
            ClassDescription::new("EpochGroup")
                .with_parent("Entity")
                .with_attribute(Attribute::new("label", AttributeType::Utf8String))
                .with_attribute(Attribute::new("startTime", AttributeType::DateTime))
                .with_attribute(Attribute::reference("source", "Source", Cardinality::ToOne))
                .with_attribute(Attribute::reference("epochs", "Epoch", Cardinality::ToMany)),
        )
        .class(
            ClassDescription::new("Source")
                .with_parent("Entity")
                .with_attribute(Attribute::new("label", AttributeType::Utf8String))
                .with_attribute(Attribute::reference("parent", "Source", Cardinality::ToOne))
                .with_attribute(Attribute::reference(
                    "children",
                    "Source",
                    Cardinality::ToMany,
                )),
        )
        .class(
            ClassDescription::new("Response")
                .with_parent("Entity")
                .with_attribute(Attribute::new("sampleRate", AttributeType::Float64))
                .with_attribute(Attribute::new("units", AttributeType::Utf8String))
                .with_attribute(Attribute::new("sampleCount", AttributeType::Int32)),
        )
        .class(
            ClassDescription::new("Resource")
                .with_attribute(Attribute::new("name", AttributeType::Utf8String))
                .with_attribute(Attribute::new("uti", AttributeType::Utf8String)),
        )
        .class(
            ClassDescription::new("User")
                .with_attribute(Attribute::new("username", AttributeType::Utf8String)),
        )
        .build()
        .expect("demo catalog is well formed")
}
