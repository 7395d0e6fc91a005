use super::*;
use crate::test_support::{catalog, path};
use quarry_schema::Attribute;

fn purpose_row(catalog: &quarry_schema::Catalog) -> RowData {
    RowData::new(path(catalog, "Epoch", &["purpose"]))
        .with_comparison(AttributeOperator::Eq, "ramp")
}

#[test]
fn add_child_reports_the_new_row_path() {
    let catalog = catalog();
    let mut root = RowRoot::new("Epoch", CollectionOperator::Any);

    let change = root
        .apply(EditOp::AddChild {
            parent: RowPath::root(),
            row: purpose_row(&catalog),
        })
        .expect("adds");

    assert_eq!(change.kind, crate::event::ChangeKind::ChildAdded);
    assert_eq!(change.row, RowPath::root().child(0));
    assert!(root.row(&change.row).is_some());
}

#[test]
fn remove_child_drops_the_row() {
    let catalog = catalog();
    let mut root = RowRoot::new("Epoch", CollectionOperator::Any).with_child(purpose_row(&catalog));

    root.apply(EditOp::RemoveChild {
        row: RowPath::root().child(0),
    })
    .expect("removes");

    assert!(root.row.children.is_empty());
}

#[test]
fn the_root_row_cannot_be_removed() {
    let mut root = RowRoot::new("Epoch", CollectionOperator::Any);

    let err = root
        .apply(EditOp::RemoveChild {
            row: RowPath::root(),
        })
        .expect_err("root");
    assert_eq!(err, RowError::RootRemoval);
}

#[test]
fn edits_against_missing_rows_fail() {
    let mut root = RowRoot::new("Epoch", CollectionOperator::Any);

    let err = root
        .apply(EditOp::SetAttributeValue {
            row: RowPath::root().child(3),
            value: Some(Value::Int32(1)),
        })
        .expect_err("missing row");
    assert!(matches!(err, RowError::UnknownRow { .. }));
}

#[test]
fn valueless_operator_clears_a_stale_value() {
    let catalog = catalog();
    let mut root = RowRoot::new("Epoch", CollectionOperator::Any).with_child(purpose_row(&catalog));
    let at = RowPath::root().child(0);

    root.apply(EditOp::SetAttributeOperator {
        row: at.clone(),
        op: Some(AttributeOperator::IsNull),
    })
    .expect("sets");

    let row = root.row(&at).expect("row");
    assert_eq!(row.attribute_operator, Some(AttributeOperator::IsNull));
    assert_eq!(row.attribute_value, None);
}

#[test]
fn validate_accepts_a_plain_comparison_tree() {
    let catalog = catalog();
    let root = RowRoot::new("Epoch", CollectionOperator::Any).with_child(purpose_row(&catalog));

    root.validate().expect("legal");
}

#[test]
fn validate_rejects_the_select_placeholder() {
    let root = RowRoot::new("Epoch", CollectionOperator::Any)
        .with_child(RowData::new(vec![Attribute::select()].into()));

    let err = root.validate().expect_err("placeholder");
    assert_eq!(
        err,
        RowError::SelectAttribute {
            row: RowPath::root().child(0),
        }
    );
}

#[test]
fn validate_rejects_childless_compound_rows() {
    let catalog = catalog();
    let root = RowRoot::new("Epoch", CollectionOperator::Any).with_child(
        RowData::new(path(&catalog, "Epoch", &["responses"]))
            .with_collection_operator(CollectionOperator::Any),
    );

    let err = root.validate().expect_err("no children");
    assert_eq!(
        err,
        RowError::EmptyCompoundRow {
            row: RowPath::root().child(0),
        }
    );
}

#[test]
fn validate_rejects_empty_paths_below_the_root() {
    let root = RowRoot::new("Epoch", CollectionOperator::Any)
        .with_child(RowData::new(AttributePath::new()));

    let err = root.validate().expect_err("empty path");
    assert!(matches!(err, RowError::EmptyAttributePath { .. }));
}

#[test]
fn validate_rejects_values_on_valueless_operators() {
    let catalog = catalog();
    let mut row = RowData::new(path(&catalog, "Epoch", &["epochGroup"]))
        .with_operator(AttributeOperator::IsNull);
    row.attribute_value = Some(Value::Text("x".into()));

    let root = RowRoot::new("Epoch", CollectionOperator::Any).with_child(row);

    let err = root.validate().expect_err("stale value");
    assert!(matches!(err, RowError::ValueForValuelessOperator { .. }));
}

#[test]
fn second_operator_requires_a_quantified_to_many_path() {
    let catalog = catalog();

    // to-one childmost
    let row = RowData::new(path(&catalog, "Epoch", &["epochGroup"]))
        .with_collection_operator(CollectionOperator::Any)
        .with_collection_operator2(CollectionOperator::All)
        .with_child(purpose_row(&catalog));
    let root = RowRoot::new("Epoch", CollectionOperator::Any).with_child(row);
    let err = root.validate().expect_err("to-one");
    assert!(matches!(err, RowError::MisplacedSecondOperator { .. }));

    // well-formed two-level row
    let child = RowData::new(path(&catalog, "Response", &["sampleRate"]))
        .with_comparison(AttributeOperator::Gt, 1.0);
    let row = RowData::new(path(&catalog, "Epoch", &["responses"]))
        .with_collection_operator(CollectionOperator::Any)
        .with_collection_operator2(CollectionOperator::All)
        .with_child(child);
    let root = RowRoot::new("Epoch", CollectionOperator::Any).with_child(row);
    root.validate().expect("legal");
}

#[test]
fn keyed_per_user_rows_need_a_quantifier_and_no_children() {
    let catalog = catalog();

    let mut bare = RowData::new(path(&catalog, "Entity", &["properties"]))
        .with_prop(KeyedProperty::new("species", AttributeType::Utf8String))
        .with_operator(AttributeOperator::Eq);
    bare.attribute_value = Some(Value::Text("mouse".into()));

    let root = RowRoot::new("Entity", CollectionOperator::Any).with_child(bare.clone());
    let err = root.validate().expect_err("no quantifier");
    assert!(matches!(err, RowError::MissingQuantifier { .. }));

    let quantified = bare
        .clone()
        .with_collection_operator(CollectionOperator::Any);
    let root = RowRoot::new("Entity", CollectionOperator::Any).with_child(quantified.clone());
    root.validate().expect("legal");

    let with_child = quantified.with_child(purpose_row(&catalog));
    let root = RowRoot::new("Entity", CollectionOperator::Any).with_child(with_child);
    let err = root.validate().expect_err("children not allowed");
    assert!(matches!(err, RowError::UnexpectedChildren { .. }));
}

#[test]
fn null_sentinels_must_be_childmost() {
    let catalog = catalog();
    let mut segments: Vec<Attribute> = path(&catalog, "Epoch", &["epochGroup"]).into_iter().collect();
    segments.insert(0, Attribute::is_null());

    let root =
        RowRoot::new("Epoch", CollectionOperator::Any).with_child(RowData::new(segments.into()));

    let err = root.validate().expect_err("misplaced sentinel");
    assert!(matches!(err, RowError::MisplacedSentinel { .. }));
}

#[test]
fn row_paths_display_like_slash_paths() {
    assert_eq!(RowPath::root().to_string(), "/");
    assert_eq!(RowPath::root().child(0).child(2).to_string(), "/0/2");
}
