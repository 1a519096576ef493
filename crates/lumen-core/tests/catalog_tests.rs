use lumen_core::catalog::{CatalogStore, LampCatalog, LampEdit, LampField, LampSpec};
use lumen_core::color::{is_hex_color, ColorGenerator};
use lumen_core::config::LampDefaults;
use lumen_core::protocol::LampType;
use lumen_core::LumenError;
use rstest::rstest;
use std::sync::Arc;
use strum::IntoEnumIterator;

fn store() -> CatalogStore {
    CatalogStore::starter(ColorGenerator::with_seed(1))
}

fn ids(catalog: &LampCatalog) -> Vec<String> {
    catalog.iter().map(|l| l.id.clone()).collect()
}

#[test]
fn test_starter_catalog() {
    let catalog = store().snapshot();

    assert_eq!(ids(&catalog), ["A", "B"]);
    let a = catalog.get("A").unwrap();
    assert_eq!((a.cost, a.radius), (100.0, 80.0));
    let b = catalog.get("B").unwrap();
    assert_eq!((b.cost, b.radius), (180.0, 150.0));
    assert!(catalog.iter().all(|l| is_hex_color(&l.color)));
}

#[test]
fn test_add_uses_defaults_and_fresh_identity() {
    let mut store = store();
    let defaults = LampDefaults::builder().default_cost(42.0).build();

    let catalog = store.add(&defaults);

    assert_eq!(catalog.len(), 3);
    let added = catalog.last().unwrap();
    assert_eq!(added.cost, 42.0);
    assert_eq!(added.radius, 80.0);
    assert_eq!(added.name, "Lamp 3");
    assert!(is_hex_color(&added.color));
    assert!(added.id != "A" && added.id != "B");
}

#[test]
fn test_add_then_remove_restores_catalog() {
    let mut store = store();
    let before = store.snapshot();

    let added = store.add(&LampDefaults::default());
    let new_id = added.last().unwrap().id.clone();
    let after = store.remove(&new_id).unwrap();

    assert_eq!(ids(&after), ids(&before));
    for (a, b) in after.entries().iter().zip(before.entries()) {
        assert!(Arc::ptr_eq(a, b));
    }
}

#[test]
fn test_update_changes_only_the_target() {
    let mut store = store();
    store.add(&LampDefaults::default());
    let before = store.snapshot();

    let after = store.update("B", &LampEdit::Radius(200.0)).unwrap();

    assert_eq!(after.get("B").unwrap().radius, 200.0);
    assert_eq!(before.get("B").unwrap().radius, 150.0);
    for (old, new) in before.entries().iter().zip(after.entries()) {
        if old.id == "B" {
            assert!(!Arc::ptr_eq(old, new));
        } else {
            assert!(Arc::ptr_eq(old, new));
        }
    }
    assert!(!before.same_snapshot(&after));
}

#[test]
fn test_snapshot_is_unaffected_by_later_edits() {
    let mut store = store();
    let held = store.snapshot();

    store.update("A", &LampEdit::Name("Renamed".into())).unwrap();
    store.remove("B").unwrap();
    store.add(&LampDefaults::default());

    assert_eq!(ids(&held), ["A", "B"]);
    assert_eq!(held.get("A").unwrap().name, "Standard");
}

#[rstest]
#[case::update_unknown(true)]
#[case::remove_unknown(false)]
fn test_unknown_id_is_an_error(#[case] update: bool) {
    let mut store = store();
    let before = store.snapshot();

    let err = if update {
        store.update("nope", &LampEdit::Cost(1.0)).unwrap_err()
    } else {
        store.remove("nope").unwrap_err()
    };

    assert!(matches!(err, LumenError::UnknownLamp(ref id) if id == "nope"));
    assert!(store.snapshot().same_snapshot(&before));
}

#[test]
fn test_invalid_edit_leaves_catalog_untouched() {
    let mut store = store();
    let before = store.snapshot();

    let err = store.update("A", &LampEdit::Cost(-3.0)).unwrap_err();

    assert!(matches!(
        err,
        LumenError::InvalidLampField {
            field: LampField::Cost,
            ..
        }
    ));
    assert!(store.snapshot().same_snapshot(&before));
}

#[rstest]
#[case("cost", "120", LampEdit::Cost(120.0))]
#[case("radius", " 95.5 ", LampEdit::Radius(95.5))]
#[case("name", "Corner lamp", LampEdit::Name("Corner lamp".into()))]
#[case("color", "#A0b1C2", LampEdit::Color("#A0b1C2".into()))]
fn test_parse_valid_edit(#[case] field: &str, #[case] value: &str, #[case] expected: LampEdit) {
    assert_eq!(LampEdit::parse(field, value).unwrap(), expected);
}

#[rstest]
#[case("cost", "-1")]
#[case("cost", "0")]
#[case("radius", "abc")]
#[case("radius", "NaN")]
#[case("color", "#zzzzzz")]
#[case("color", "red")]
fn test_parse_rejects_bad_value(#[case] field: &str, #[case] value: &str) {
    let err = LampEdit::parse(field, value).unwrap_err();
    assert!(matches!(err, LumenError::InvalidLampField { .. }), "{:?}", err);
}

#[test]
fn test_parse_rejects_unknown_field() {
    let err = LampEdit::parse("weight", "3").unwrap_err();

    assert!(matches!(err, LumenError::UnknownLampField(ref f) if f == "weight"));
    assert!(!matches!(err, LumenError::Config(_)));
}

#[test]
fn test_update_field_from_form_input() {
    let mut store = store();

    let catalog = store.update_field("A", "cost", "120").unwrap();
    assert_eq!(catalog.get("A").unwrap().cost, 120.0);
    assert_eq!(catalog.get("B").unwrap().cost, 180.0);

    assert!(matches!(
        store.update_field("missing", "cost", "1"),
        Err(LumenError::UnknownLamp(_))
    ));
}

#[test]
fn test_field_names_round_trip() {
    for field in LampField::iter() {
        assert_eq!(field.to_string().parse::<LampField>().unwrap(), field);
    }
}

#[test]
fn test_import_fills_missing_fields() {
    let mut store = CatalogStore::new(ColorGenerator::with_seed(3));
    let specs: Vec<LampSpec> = serde_json::from_str(
        r##"[
            { "id": "post", "name": "Post top", "cost": 60, "radius": 40, "color": "#112233" },
            { "cost": 250, "radius": 200 }
        ]"##,
    )
    .unwrap();

    let catalog = store.import(specs).unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("post").unwrap().color, "#112233");
    let second = &catalog.entries()[1];
    assert_eq!(second.name, "Lamp 2");
    assert!(is_hex_color(&second.color));
    assert!(!second.id.is_empty());
}

#[test]
fn test_import_rejects_duplicates_and_bad_values() {
    let mut store = store();
    let dup = vec![
        LampSpec {
            id: Some("X".into()),
            name: None,
            cost: 1.0,
            radius: 1.0,
            color: None,
        };
        2
    ];
    assert!(matches!(store.import(dup), Err(LumenError::Config(_))));

    let negative = vec![LampSpec {
        id: None,
        name: None,
        cost: 1.0,
        radius: -5.0,
        color: None,
    }];
    assert!(store.import(negative).is_err());
    assert_eq!(ids(&store.snapshot()), ["A", "B"]);
}

#[test]
fn test_to_wire_keeps_order() {
    let lamps = vec![
        LampType {
            id: "z".into(),
            name: "Z".into(),
            cost: 1.0,
            radius: 2.0,
            color: "#000000".into(),
        },
        LampType {
            id: "a".into(),
            name: "A".into(),
            cost: 3.0,
            radius: 4.0,
            color: "#ffffff".into(),
        },
    ];
    let catalog = LampCatalog::new(lamps.clone()).unwrap();

    assert_eq!(catalog.to_wire(), lamps);
}
