//! Shared helpers for building rows and paths over the demo catalog.

use crate::path::AttributePath;
use quarry_schema::{Catalog, SchemaProvider};

pub(crate) fn catalog() -> Catalog {
    quarry_test_fixtures::demo_catalog()
}

/// Build a path by walking attribute names from `class`, following
/// reference targets between segments.
pub(crate) fn path(catalog: &Catalog, class: &str, names: &[&str]) -> AttributePath {
    let mut cls = catalog.class(class).expect("class");
    let mut out = Vec::new();

    for name in names {
        let attr = catalog.attribute(cls, name).expect("attribute").clone();
        if let Some(target) = attr.target.as_deref() {
            cls = catalog.class(target).expect("target");
        }
        out.push(attr);
    }

    out.into()
}
