mod common;

use common::path;
use proptest::prelude::*;
use quarry::prelude::*;
use quarry_test_fixtures::demo_catalog;

fn comparison_operator() -> impl Strategy<Value = AttributeOperator> {
    prop_oneof![
        Just(AttributeOperator::Eq),
        Just(AttributeOperator::Ne),
        Just(AttributeOperator::Lt),
        Just(AttributeOperator::Lte),
        Just(AttributeOperator::Gt),
        Just(AttributeOperator::Gte),
        Just(AttributeOperator::Matches),
        Just(AttributeOperator::NotMatches),
        Just(AttributeOperator::MatchesCi),
        Just(AttributeOperator::NotMatchesCi),
    ]
}

fn quantifier() -> impl Strategy<Value = CollectionOperator> {
    prop_oneof![
        Just(CollectionOperator::Any),
        Just(CollectionOperator::All),
        Just(CollectionOperator::None),
    ]
}

fn text_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,12}"
}

/// Property key type and a matching value for keyed-map rows.
fn prop_value() -> impl Strategy<Value = (AttributeType, Value)> {
    prop_oneof![
        text_value().prop_map(|s| (AttributeType::Utf8String, Value::Text(s))),
        any::<i32>().prop_map(|v| (AttributeType::Int32, Value::Int32(v))),
        (-1.0e9_f64..1.0e9).prop_map(|v| (AttributeType::Float64, Value::Float64(v))),
    ]
}

fn epoch_leaf() -> impl Strategy<Value = RowData> {
    prop_oneof![
        (comparison_operator(), text_value()).prop_map(|(op, v)| {
            let catalog = demo_catalog();
            RowData::new(path(&catalog, "Epoch", &["purpose"])).with_comparison(op, v)
        }),
        (comparison_operator(), any::<i16>()).prop_map(|(op, v)| {
            let catalog = demo_catalog();
            RowData::new(path(&catalog, "Epoch", &["channelCount"])).with_comparison(op, v)
        }),
        (comparison_operator(), -1.0e9_f64..1.0e9).prop_map(|(op, v)| {
            let catalog = demo_catalog();
            RowData::new(path(&catalog, "Epoch", &["duration"])).with_comparison(op, v)
        }),
        prop_oneof![
            Just(AttributeOperator::IsTrue),
            Just(AttributeOperator::IsFalse)
        ]
        .prop_map(|op| {
            let catalog = demo_catalog();
            RowData::new(path(&catalog, "Epoch", &["incomplete"])).with_operator(op)
        }),
        (comparison_operator(), text_value()).prop_map(|(op, v)| {
            let catalog = demo_catalog();
            RowData::new(path(&catalog, "Epoch", &["epochGroup", "source", "label"]))
                .with_comparison(op, v)
        }),
        (comparison_operator(), any::<i32>()).prop_map(|(op, v)| {
            let catalog = demo_catalog();
            let mut row = RowData::new(path(&catalog, "Epoch", &["responses"]))
                .with_collection_operator(CollectionOperator::Count)
                .with_operator(op);
            row.attribute_value = Some(Value::Int32(v));
            row
        }),
        (comparison_operator(), text_value(), any::<bool>()).prop_map(|(op, v, mine)| {
            let catalog = demo_catalog();
            let mut segments = path(&catalog, "Epoch", &["keywords"]);
            let keywords = segments.pop().expect("segment").with_is_mine(mine);
            segments.push(keywords);
            RowData::new(segments).with_comparison(op, v)
        }),
        (comparison_operator(), "[a-z]{1,8}", prop_value()).prop_map(|(op, key, (ty, v))| {
            let catalog = demo_catalog();
            let mut row = RowData::new(path(&catalog, "Epoch", &["protocolParameters"]))
                .with_prop(KeyedProperty::new(key, ty))
                .with_operator(op);
            row.attribute_value = Some(v);
            row
        }),
    ]
}

fn response_leaf() -> impl Strategy<Value = RowData> {
    prop_oneof![
        (comparison_operator(), text_value()).prop_map(|(op, v)| {
            let catalog = demo_catalog();
            RowData::new(path(&catalog, "Response", &["units"])).with_comparison(op, v)
        }),
        (comparison_operator(), -1.0e9_f64..1.0e9).prop_map(|(op, v)| {
            let catalog = demo_catalog();
            RowData::new(path(&catalog, "Response", &["sampleRate"])).with_comparison(op, v)
        }),
        (comparison_operator(), any::<i32>()).prop_map(|(op, v)| {
            let catalog = demo_catalog();
            RowData::new(path(&catalog, "Response", &["sampleCount"])).with_comparison(op, v)
        }),
    ]
}

fn responses_row() -> impl Strategy<Value = RowData> {
    (
        quantifier(),
        proptest::option::of(quantifier()),
        proptest::collection::vec(response_leaf(), 1..3),
    )
        .prop_map(|(q, q2, children)| {
            let catalog = demo_catalog();
            let mut row = RowData::new(path(&catalog, "Epoch", &["responses"]))
                .with_collection_operator(q);
            row.collection_operator2 = q2;
            row.children = children;
            row
        })
}

fn properties_row() -> impl Strategy<Value = RowData> {
    (
        quantifier(),
        "[a-z]{1,8}",
        prop_value(),
        comparison_operator(),
    )
        .prop_map(|(q, key, (ty, v), op)| {
            let catalog = demo_catalog();
            let mut row = RowData::new(path(&catalog, "Epoch", &["properties"]))
                .with_collection_operator(q)
                .with_prop(KeyedProperty::new(key, ty))
                .with_operator(op);
            row.attribute_value = Some(v);
            row
        })
}

fn any_row() -> impl Strategy<Value = RowData> {
    prop_oneof![
        4 => epoch_leaf(),
        1 => responses_row(),
        1 => properties_row(),
    ]
}

fn arb_root() -> impl Strategy<Value = RowRoot> {
    (quantifier(), proptest::collection::vec(any_row(), 1..4)).prop_map(|(q, children)| {
        let mut root = RowRoot::new("Epoch", q);
        root.row.children = children;
        root
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn edit_trees_survive_encode_then_decode(root in arb_root()) {
        let catalog = demo_catalog();
        prop_assert!(root.validate().is_ok());

        let tree = quarry::encode(&catalog, &root).expect("encodes");
        let decoded = quarry::decode(&catalog, &tree).expect("decodes");

        prop_assert_eq!(decoded, root);
    }

    #[test]
    fn expression_trees_survive_decode_then_encode(root in arb_root()) {
        let catalog = demo_catalog();

        let tree = quarry::encode(&catalog, &root).expect("encodes");
        let decoded = quarry::decode(&catalog, &tree).expect("decodes");
        let reencoded = quarry::encode(&catalog, &decoded).expect("re-encodes");

        prop_assert_eq!(reencoded, tree);
    }

    #[test]
    fn saved_queries_round_trip(root in arb_root()) {
        let catalog = demo_catalog();

        let bytes = quarry::save(&catalog, &root).expect("saves");
        let restored = quarry::load(&catalog, &bytes).expect("loads");

        prop_assert_eq!(restored, root);
    }
}
