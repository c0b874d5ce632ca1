use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use scopestore_storage::{EntryKind, PropertySet, PropertyStoreError};
use scopestore_toolkit::{
    DefaultScopeBridge, DefaultStorageService, Identity, Properties, ScopeBridge, StorageError,
    StorageFacade, StorageService,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

fn service() -> DefaultStorageService {
    DefaultStorageService::in_memory().unwrap()
}

fn facade(service: &DefaultStorageService, name: &str) -> StorageFacade {
    service.constant_name_storage(name).unwrap()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Settings {
    title: String,
    limit: u32,
    tags: Vec<String>,
    extra: Option<BTreeMap<String, String>>,
}

fn sample_settings() -> Settings {
    Settings {
        title: "Board".to_string(),
        limit: 25,
        tags: vec!["a".to_string(), "b".to_string()],
        extra: Some(BTreeMap::from([("k".to_string(), "v".to_string())])),
    }
}

// ── Absent values ───────────────────────────────────────────────

#[test]
fn fresh_facade_reads_absent_values() {
    let service = service();
    let facade = facade(&service, "fresh");

    assert!(!facade.get_boolean("k").unwrap());
    assert_eq!(facade.get_data("k").unwrap(), None);
    assert_eq!(facade.get_date("k").unwrap(), None);
    assert_eq!(facade.get_decimal("k").unwrap(), None);
    assert_eq!(facade.get_long("k").unwrap(), None);
    assert_eq!(facade.get_string("k").unwrap(), None);
    assert_eq!(facade.get_text("k").unwrap(), None);
    assert_eq!(facade.get_object::<Settings>("k").unwrap(), None);
    assert_eq!(facade.get_properties("k").unwrap(), None);
    assert!(!facade.exists("k").unwrap());
    assert!(facade.keys().unwrap().is_empty());
}

// ── Round trips ─────────────────────────────────────────────────

#[test]
fn scalar_round_trips() {
    let service = service();
    let facade = facade(&service, "scalars");
    let date = Utc.with_ymd_and_hms(2010, 2, 2, 3, 4, 5).unwrap();

    facade.set_boolean("flag", true).unwrap();
    facade.set_data("bytes", b"\x00\x01raw").unwrap();
    facade.set_date("when", date).unwrap();
    facade.set_decimal("price", Some(Decimal::from_str("1.05").unwrap())).unwrap();
    facade.set_long("count", Some(-42)).unwrap();
    facade.set_string("name", Some("short")).unwrap();
    facade.set_text("body", Some("long text")).unwrap();

    assert!(facade.get_boolean("flag").unwrap());
    assert_eq!(facade.get_data("bytes").unwrap(), Some(b"\x00\x01raw".to_vec()));
    assert_eq!(facade.get_date("when").unwrap(), Some(date));
    assert_eq!(
        facade.get_decimal("price").unwrap(),
        Some(Decimal::new(105, 2))
    );
    assert_eq!(facade.get_long("count").unwrap(), Some(-42));
    assert_eq!(facade.get_string("name").unwrap().as_deref(), Some("short"));
    assert_eq!(facade.get_text("body").unwrap().as_deref(), Some("long text"));
}

#[test]
fn object_round_trip() {
    let service = service();
    let facade = facade(&service, "objects");
    let settings = sample_settings();

    facade.set_object("settings", Some(&settings)).unwrap();
    assert_eq!(facade.get_object::<Settings>("settings").unwrap(), Some(settings));
}

#[test]
fn object_accepts_unsized_values() {
    let service = service();
    let facade = facade(&service, "objects");
    facade.set_object("list", Some(&[1, 2, 3][..])).unwrap();
    facade.set_object("word", Some("plain")).unwrap();

    assert_eq!(facade.get_object::<Vec<i32>>("list").unwrap(), Some(vec![1, 2, 3]));
    assert_eq!(
        facade.get_object::<String>("word").unwrap().as_deref(),
        Some("plain")
    );
}

#[test]
fn object_of_wrong_shape_is_serialization_error() {
    let service = service();
    let facade = facade(&service, "objects");
    facade.set_object("n", Some(&5)).unwrap();

    assert!(matches!(
        facade.get_object::<Settings>("n"),
        Err(StorageError::Serialization(_))
    ));
}

#[test]
fn properties_round_trip() {
    let service = service();
    let facade = facade(&service, "props");
    let properties: Properties = [("this.is.on", "on"), ("this.is.off", "off")]
        .into_iter()
        .collect();

    facade.set_properties("p", Some(&properties)).unwrap();
    assert_eq!(facade.get_properties("p").unwrap(), Some(properties));
}

#[test]
fn properties_render_non_string_values() {
    let service = service();
    let facade = facade(&service, "props");
    facade
        .set_object("p", Some(&json!({"a": "x", "b": 2, "c": true, "d": null, "e": [1]})))
        .unwrap();

    let properties = facade.get_properties("p").unwrap().unwrap();
    assert_eq!(properties.get("a"), Some("x"));
    assert_eq!(properties.get("b"), Some("2"));
    assert_eq!(properties.get("c"), Some("true"));
    assert_eq!(properties.get("d"), Some("null"));
    assert_eq!(properties.get("e"), Some("[1]"));
}

#[test]
fn properties_from_non_mapping_is_serialization_error() {
    let service = service();
    let facade = facade(&service, "props");
    facade.set_object("p", Some(&vec!["a", "b"])).unwrap();

    assert!(matches!(
        facade.get_properties("p"),
        Err(StorageError::Serialization(_))
    ));
}

// ── Null handling ───────────────────────────────────────────────

#[test]
fn none_deletes_decimal_long_object_properties() {
    let service = service();
    let facade = facade(&service, "nulls");

    facade.set_decimal("d", Some(Decimal::ONE)).unwrap();
    facade.set_long("l", Some(1)).unwrap();
    facade.set_object("o", Some(&sample_settings())).unwrap();
    facade.set_properties("p", Some(&Properties::new())).unwrap();
    assert_eq!(facade.keys().unwrap(), vec!["d", "l", "o", "p"]);

    facade.set_decimal("d", None).unwrap();
    facade.set_long("l", None).unwrap();
    facade.set_object::<Settings>("o", None).unwrap();
    facade.set_properties("p", None).unwrap();
    assert!(facade.keys().unwrap().is_empty());

    facade.set_decimal("absent", None).unwrap();
    facade.set_long("absent", None).unwrap();
    assert!(!facade.exists("absent").unwrap());
}

#[test]
fn none_string_and_text_keep_the_key() {
    let service = service();
    let facade = facade(&service, "nulls");

    facade.set_string("s", None).unwrap();
    facade.set_text("t", None).unwrap();

    assert!(facade.exists("s").unwrap());
    assert!(facade.exists("t").unwrap());
    assert_eq!(facade.get_string("s").unwrap(), None);
    assert_eq!(facade.get_text("t").unwrap(), None);
}

#[test]
fn missing_long_is_none_not_zero() {
    let service = service();
    let facade = facade(&service, "longs");
    facade.set_long("zero", Some(0)).unwrap();

    assert_eq!(facade.get_long("zero").unwrap(), Some(0));
    assert_eq!(facade.get_long("missing").unwrap(), None);
}

// ── Errors ──────────────────────────────────────────────────────

#[test]
fn invalid_decimal_reports_logical_key() {
    let service = service();
    let facade = facade(&service, "decimals");
    facade.set_string("price", Some("one euro")).unwrap();

    match facade.get_decimal("price") {
        Err(StorageError::InvalidDecimal { key, value }) => {
            assert_eq!(key, "price");
            assert_eq!(value, "one euro");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn wrong_getter_is_engine_type_mismatch() {
    let service = service();
    let facade = facade(&service, "kinds");
    facade.set_long("n", Some(3)).unwrap();

    match facade.get_string("n") {
        Err(StorageError::Engine(PropertyStoreError::TypeMismatch {
            key,
            expected,
            actual,
        })) => {
            assert_eq!(key, "constant-n");
            assert_eq!(expected, EntryKind::String);
            assert_eq!(actual, EntryKind::Long);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn error_display() {
    let err = StorageError::IncompleteScope("delete-all");
    assert_eq!(err.to_string(), "scope is missing its delete-all rule");

    let err = StorageError::InvalidDecimal {
        key: "k".to_string(),
        value: "x".to_string(),
    };
    assert!(err.to_string().contains("\"x\""));
}

// ── Remove ──────────────────────────────────────────────────────

#[test]
fn remove_is_true_exactly_once() {
    let service = service();
    let facade = facade(&service, "remove");
    facade.set_boolean("flag", true).unwrap();

    assert!(facade.remove("flag").unwrap());
    assert!(!facade.remove("flag").unwrap());
}

#[test]
fn remove_all_clears_whole_partition() {
    let service = service();
    let facade = facade(&service, "clear");
    facade.set_boolean("a", true).unwrap();
    facade.set_long("b", Some(2)).unwrap();

    let bridge = service.scopes().bridge();
    let raw = bridge.open(facade.identity()).unwrap();
    raw.set_string("foreign-key", Some("written without prefix")).unwrap();

    facade.remove_all().unwrap();
    assert!(raw.keys("").unwrap().is_empty());
}

// ── Keys ────────────────────────────────────────────────────────

#[test]
fn keys_are_logical_and_sorted() {
    let service = service();
    let facade = facade(&service, "keys");
    for key in ["b", "a", "c.x", "c.y"] {
        facade.set_boolean(key, true).unwrap();
    }

    assert_eq!(facade.keys().unwrap(), vec!["a", "b", "c.x", "c.y"]);
    assert_eq!(facade.keys_with_prefix("c.").unwrap(), vec!["c.x", "c.y"]);
    assert!(facade.keys_with_prefix("zzz").unwrap().is_empty());
}

#[test]
fn keys_skip_entries_without_the_prefix() {
    let service = service();
    let facade = facade(&service, "keys");
    facade.set_boolean("mine", true).unwrap();

    let raw = service.scopes().bridge().open(facade.identity()).unwrap();
    raw.set_boolean("stray", true).unwrap();

    assert_eq!(facade.keys().unwrap(), vec!["mine"]);
    for key in facade.keys().unwrap() {
        assert!(!key.starts_with(facade.identity().key_prefix()));
    }
}

#[test]
fn facade_stores_under_physical_key() {
    let service = service();
    let facade = facade(&service, "physical");
    facade.set_text("k", Some("v")).unwrap();

    let raw = service.scopes().bridge().open(facade.identity()).unwrap();
    assert_eq!(raw.keys("").unwrap(), vec!["constant-k"]);
    assert_eq!(
        facade.identity(),
        &Identity::new("constant-", "FacadeStorageConstant-physical", Some(2))
    );
}

// ── Bridge serialization ────────────────────────────────────────

#[test]
fn bridge_serialization_maps_none_to_none() {
    let bridge = DefaultScopeBridge::in_memory().unwrap();
    assert_eq!(bridge.serialize(None).unwrap(), None);
    assert_eq!(bridge.deserialize(None).unwrap(), None);
}

#[test]
fn bridge_deserialize_rejects_garbage() {
    let bridge = DefaultScopeBridge::in_memory().unwrap();
    assert!(matches!(
        bridge.deserialize(Some("{not json")),
        Err(StorageError::Serialization(_))
    ));
}

#[test]
fn bridge_over_shared_store() {
    let bridge = Arc::new(DefaultScopeBridge::in_memory().unwrap());
    let service = DefaultStorageService::new(bridge.clone()).unwrap();
    service
        .constant_name_storage("shared")
        .unwrap()
        .set_long("n", Some(1))
        .unwrap();

    let set = bridge
        .store()
        .property_set("FacadeStorageConstant-shared", Some(2));
    assert_eq!(set.get_long("constant-n").unwrap(), Some(1));
}

proptest! {
    #[test]
    fn bridge_serialization_round_trips(
        map in proptest::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8),
        text in "[ -~]{0,32}",
        flag in any::<bool>(),
    ) {
        let bridge = DefaultScopeBridge::in_memory().unwrap();
        let value = json!({ "map": map, "text": text, "flag": flag });
        let serialized = bridge.serialize(Some(&value)).unwrap();
        prop_assert_eq!(bridge.deserialize(serialized.as_deref()).unwrap(), Some(value));
    }

    #[test]
    fn decimal_round_trips(mantissa in any::<i64>(), scale in 0u32..10) {
        let service = service();
        let facade = facade(&service, "decimal-prop");
        let value = Decimal::new(mantissa, scale);
        facade.set_decimal("d", Some(value)).unwrap();
        prop_assert_eq!(facade.get_decimal("d").unwrap(), Some(value));
    }

    #[test]
    fn properties_round_trip_any_bag(
        entries in proptest::collection::btree_map("[a-z.]{1,12}", "[ -~]{0,16}", 0..10),
    ) {
        let service = service();
        let facade = facade(&service, "props-prop");
        let properties = Properties::from(entries);
        facade.set_properties("p", Some(&properties)).unwrap();
        prop_assert_eq!(facade.get_properties("p").unwrap(), Some(properties));
    }
}
