//! Property-based tests for pattern and prism laws.
//!
//! Tests that matching, erasing and writing fit together, that writes never
//! clobber existing data, and that the permissive combinators keep whatever
//! succeeded.

use proptest::prelude::*;
use shorthand::prelude::*;
use std::collections::BTreeMap;

fn entries() -> impl Strategy<Value = BTreeMap<String, (i32, bool)>> {
    prop::collection::btree_map("[a-z]{1,6}", (any::<i32>(), any::<bool>()), 0..8)
}

/// Builds `{"kind": "Pod", "k_<key>": n, ...}` and a partial pattern of the
/// constants whose flag is set.
fn document_and_pattern(entries: &BTreeMap<String, (i32, bool)>) -> (Value, Pattern) {
    let mut document = Map::new();
    document.insert("kind".to_string(), Value::from("Pod"));
    let mut fields = Vec::new();
    for (key, (number, chosen)) in entries {
        let key = format!("k_{key}");
        document.insert(key.clone(), Value::from(*number));
        if *chosen {
            fields.push(Field::new(key, *number));
        }
    }
    (Value::Map(document), Pattern::partial(fields))
}

// =============================================================================
// Erase / Write Laws
// =============================================================================

// EraseWrite Law: pattern.write(pattern.erase(value)) == value
//   for constant patterns that match value
// NoClobber Law: writing a constant over a present value always fails

proptest! {
    #[test]
    fn prop_constant_pattern_matches_its_document(entries in entries()) {
        let (document, pattern) = document_and_pattern(&entries);
        prop_assert!(!pattern.matches(&document).has_errors());
    }

    #[test]
    fn prop_erase_write_law(entries in entries()) {
        let (document, pattern) = document_and_pattern(&entries);
        let erased = pattern.erase(document.clone());
        prop_assert_eq!(string_at(&erased, &["kind"]).unwrap(), "Pod");
        prop_assert_eq!(pattern.write(erased).unwrap(), document);
    }

    #[test]
    fn prop_write_never_clobbers(entries in entries(), replacement: i32) {
        let (document, _) = document_and_pattern(&entries);
        for key in entries.keys() {
            let overwrite = Pattern::partial([Field::new(format!("k_{key}"), replacement)]);
            let is_overwrite = matches!(
                overwrite.write(document.clone()),
                Err(InvariantError::Overwrite { .. })
            );
            prop_assert!(is_overwrite);
        }
    }

    #[test]
    fn prop_exclusive_rejects_what_partial_accepts(entries in entries()) {
        let (document, _) = document_and_pattern(&entries);
        let partial = partial! { "kind" => "Pod" };
        let exclusive = exclusive! { "kind" => "Pod" };
        prop_assert!(!partial.matches(&document).has_errors());
        prop_assert_eq!(exclusive.matches(&document).has_errors(), !entries.is_empty());
    }
}

// =============================================================================
// Path Laws
// =============================================================================

// InsertClean Law: clean_path(insert_path(root, path, x), path) leaves an empty root

proptest! {
    #[test]
    fn prop_insert_then_clean_leaves_empty_root(
        path in prop::collection::vec("[a-z]{1,4}", 1..5),
        number: i32,
    ) {
        let mut root = Value::Absent;
        insert_path(&mut root, &path, Value::from(number)).unwrap();
        prop_assert_eq!(at(&root, &path).unwrap(), &Value::from(number));

        clean_path(&mut root, &path).unwrap();
        prop_assert_eq!(root, Value::Map(Map::new()));
    }

    #[test]
    fn prop_insert_refuses_occupied_path(
        path in prop::collection::vec("[a-z]{1,4}", 1..5),
        first: i32,
        second: i32,
    ) {
        let mut root = Value::Absent;
        insert_path(&mut root, &path, Value::from(first)).unwrap();
        let before = root.clone();
        let is_already_present = matches!(
            insert_path(&mut root, &path, Value::from(second)),
            Err(PathError::AlreadyPresent { .. })
        );
        prop_assert!(is_already_present);
        prop_assert_eq!(root, before);
    }
}

// =============================================================================
// Multiply Laws
// =============================================================================

fn negate() -> Prism {
    Prism::new(Pattern::wildcard(WildcardKind::Number), |matched| {
        Ok(Pattern::constant(-float_at::<&str>(&matched.extract(), &[])?))
    })
}

fn mixed_list() -> impl Strategy<Value = Vec<Result<i32, String>>> {
    prop::collection::vec(
        prop_oneof![any::<i32>().prop_map(Ok), "[a-z]{0,4}".prop_map(Err)],
        0..10,
    )
}

proptest! {
    #[test]
    fn prop_multiply_keeps_rejected_elements(items in mixed_list()) {
        let list: Value = items
            .iter()
            .map(|item| match item {
                Ok(number) => Value::from(*number),
                Err(text) => Value::from(text.as_str()),
            })
            .collect();

        let outcome = Prism::multiply(negate()).view(&list);
        let every_element_failed = !items.is_empty() && items.iter().all(|item| item.is_err());
        prop_assert_eq!(outcome.is_err(), every_element_failed);

        if let Ok(viewed) = outcome {
            let expected: Value = items
                .iter()
                .map(|item| match item {
                    Ok(number) => Value::from(-f64::from(*number)),
                    Err(text) => Value::from(text.as_str()),
                })
                .collect();
            prop_assert_eq!(viewed, expected);
        }
    }

    #[test]
    fn prop_iso_multiply_round_trip(numbers in prop::collection::vec(any::<i32>(), 1..10)) {
        let iso = Iso::multiply(Iso::from_prisms(negate(), negate()));
        let list: Value = numbers.iter().copied().map(Value::from).collect();
        let forward = iso.forward().view(&list).unwrap();
        prop_assert_eq!(iso.backward().view(&forward).unwrap(), list);
    }
}

// =============================================================================
// Telescope Laws
// =============================================================================

// TemplateErase Law: matched.to_template().write(pattern.erase(value)) == value
// ZoomIdentity Law: Iso::zoom(telescope, Iso::identity()) round-trips every match

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,4}".prop_map(Value::from),
        Just(Value::Map(Map::new())),
        Just(Value::List(Vec::new())),
        prop::collection::btree_map("[a-z]{1,3}", any::<i32>(), 0..3).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(key, number)| (key, Value::from(number)))
                .collect::<Value>()
        }),
    ]
}

/// Generates `(kind, focus, document)`: a document with a `kind`, a `spec`
/// map that may or may not hold `focus`, and sometimes a `metadata` leaf.
fn telescoped_document() -> impl Strategy<Value = (String, String, Value)> {
    (
        "[A-Z][a-z]{1,6}",
        "[a-z]{1,4}",
        prop::collection::btree_map("[a-z]{1,4}", leaf(), 0..4),
        prop::option::of(leaf()),
    )
        .prop_map(|(kind, focus, spec, metadata)| {
            let mut document = Map::new();
            document.insert("kind".to_string(), Value::from(kind.as_str()));
            document.insert("spec".to_string(), spec.into_iter().collect());
            if let Some(metadata) = metadata {
                document.insert("metadata".to_string(), metadata);
            }
            (kind, focus, Value::Map(document))
        })
}

fn telescope(kind: &str, focus: &str) -> Pattern {
    partial! {
        "kind" => kind,
        "spec" => partial! { focus => WildcardKind::Any },
    }
}

proptest! {
    #[test]
    fn prop_template_write_restores_erased_document(
        (kind, focus, document) in telescoped_document(),
    ) {
        let pattern = telescope(&kind, &focus);
        let matched = pattern.matches(&document);
        prop_assert!(!matched.has_errors());

        let erased = pattern.erase(document.clone());
        prop_assert_eq!(matched.to_template().write(erased).unwrap(), document);
    }

    #[test]
    fn prop_zoomed_identity_round_trip(
        (kind, focus, document) in telescoped_document(),
    ) {
        let iso = Iso::sequence([
            Iso::zoom(telescope(&kind, &focus), Iso::identity()).unwrap(),
            Iso::identity(),
        ]);

        let forward = iso.forward().view(&document).unwrap();
        prop_assert_eq!(&forward, &document);
        prop_assert_eq!(iso.backward().view(&forward).unwrap(), document);
    }

    #[test]
    fn prop_nested_partial_erases_only_what_it_names(
        (kind, focus, document) in telescoped_document(),
    ) {
        let pattern = telescope(&kind, &focus);
        let erased = pattern.erase(document.clone());
        prop_assert!(at(&erased, &["kind"]).is_err());
        prop_assert!(at(&erased, &["spec", focus.as_str()]).is_err());
        prop_assert_eq!(at(&erased, &["metadata"]).ok(), at(&document, &["metadata"]).ok());
    }
}
