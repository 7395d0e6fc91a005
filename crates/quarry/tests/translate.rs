mod common;

use common::path;
use quarry::{Error, prelude::*};
use quarry_test_fixtures::demo_catalog;

#[test]
fn mixed_query_encodes_to_the_expected_expression() {
    let catalog = demo_catalog();

    let mut count_row = RowData::new(path(&catalog, "Entity", &["resources"]))
        .with_collection_operator(CollectionOperator::Count)
        .with_operator(AttributeOperator::Lte);
    count_row.attribute_value = Some(Value::Int32(5));

    let root = RowRoot::new("Epoch", CollectionOperator::All)
        .with_child(
            RowData::new(path(&catalog, "Epoch", &["epochGroup", "source", "label"]))
                .with_comparison(AttributeOperator::Eq, "Test 27"),
        )
        .with_child(
            RowData::new(path(&catalog, "Epoch", &["incomplete"]))
                .with_operator(AttributeOperator::IsFalse),
        )
        .with_child(count_row)
        .with_child(
            RowData::new(path(&catalog, "Epoch", &["responses"]))
                .with_collection_operator(CollectionOperator::None)
                .with_child(
                    RowData::new(path(&catalog, "Response", &["units"]))
                        .with_comparison(AttributeOperator::Eq, "V"),
                ),
        );

    let tree = quarry::encode(&catalog, &root).expect("encodes");
    assert_eq!(
        tree.to_string(),
        concat!(
            "Epoch: (and ",
            r#"(== (. (. epochGroup source) label) "Test 27") "#,
            "(== incomplete false) ",
            "(<= (count resources) 5) ",
            r#"(not (any responses (== units "V"))))"#,
        )
    );
}

#[test]
fn decoding_recovers_the_original_rows() {
    let catalog = demo_catalog();

    let root = RowRoot::new("Epoch", CollectionOperator::Any)
        .with_child(
            RowData::new(path(&catalog, "Epoch", &["channelCount"]))
                .with_comparison(AttributeOperator::Gte, 2i16),
        )
        .with_child(
            RowData::new(path(&catalog, "Epoch", &["epochGroup", "keywords"]))
                .with_comparison(AttributeOperator::Eq, "control"),
        );

    let tree = quarry::encode(&catalog, &root).expect("encodes");
    let decoded = quarry::decode(&catalog, &tree).expect("decodes");

    assert_eq!(decoded, root);
}

#[test]
fn illegal_trees_fail_before_encoding() {
    let catalog = demo_catalog();

    let root = RowRoot::new("Epoch", CollectionOperator::Any).with_child(
        RowData::new(path(&catalog, "Epoch", &["responses"]))
            .with_collection_operator(CollectionOperator::Any),
    );

    let err = quarry::encode(&catalog, &root).expect_err("childless compound");
    assert!(matches!(err, Error::Row(_)));
}

#[test]
fn edits_flow_through_the_editor_into_encoding() {
    let catalog = demo_catalog();
    let mut root = RowRoot::new("Epoch", CollectionOperator::Any);
    let mut sink = quarry::core::event::RecordingSink::default();

    {
        let mut editor = quarry::core::event::Editor::new(&mut root, &mut sink);
        let added = editor
            .apply(EditOp::AddChild {
                parent: RowPath::root(),
                row: RowData::new(path(&catalog, "Epoch", &["purpose"])),
            })
            .expect("adds");
        editor
            .apply(EditOp::SetAttributeOperator {
                row: added.row.clone(),
                op: Some(AttributeOperator::Matches),
            })
            .expect("sets operator");
        editor
            .apply(EditOp::SetAttributeValue {
                row: added.row,
                value: Some(Value::Text("ramp.*".into())),
            })
            .expect("sets value");
    }

    assert_eq!(sink.after.len(), 3);

    let tree = quarry::encode(&catalog, &root).expect("encodes");
    assert_eq!(tree.root.to_string(), r#"(or (=~ purpose "ramp.*"))"#);
}

#[test]
fn saved_queries_reload_against_the_same_catalog() {
    let catalog = demo_catalog();

    let root = RowRoot::new("Entity", CollectionOperator::Any).with_child(
        RowData::new(path(&catalog, "Entity", &["uuid"]))
            .with_comparison(AttributeOperator::Eq, "123e4567"),
    );

    let bytes = quarry::save(&catalog, &root).expect("saves");
    let restored = quarry::load(&catalog, &bytes).expect("loads");

    assert_eq!(restored, root);
}

#[test]
fn saved_queries_reject_a_changed_schema() {
    let catalog = demo_catalog();

    let root = RowRoot::new("Entity", CollectionOperator::Any).with_child(
        RowData::new(path(&catalog, "Entity", &["uuid"]))
            .with_comparison(AttributeOperator::Eq, "123e4567"),
    );
    let bytes = quarry::save(&catalog, &root).expect("saves");

    let changed = Catalog::builder()
        .class(ClassDescription::new("Entity").with_attribute(Attribute::new(
            "uuid",
            AttributeType::Utf8String,
        )))
        .build()
        .expect("builds");

    let err = quarry::load(&changed, &bytes).expect_err("schema drift");
    assert!(matches!(err, Error::Serialize(_)));
}
