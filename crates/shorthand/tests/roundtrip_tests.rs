use serde_json::json;
use shorthand::{parse_and_build, render, Value};

/// Assert that render → parse_and_build gives back the same tree.
fn assert_roundtrip(json: serde_json::Value) {
    let obj = match Value::from(json.clone()) {
        Value::Object(obj) => obj,
        other => panic!("expected an object, got {other:?}"),
    };
    let text = render(&obj);
    let back = parse_and_build("roundtrip", &text)
        .unwrap_or_else(|e| panic!("re-parse failed: {e}\n  shorthand: {text}"));
    assert_eq!(
        back, obj,
        "Roundtrip failed:\n  input JSON: {json}\n  shorthand:  {text}"
    );
}

#[test]
fn roundtrip_scalars() {
    assert_roundtrip(json!({"n": null, "b": false, "i": 42, "f": 3.25, "s": "hello"}));
}

#[test]
fn roundtrip_whole_float() {
    assert_roundtrip(json!({"f": 2.0, "g": -0.5}));
}

#[test]
fn roundtrip_ambiguous_strings() {
    assert_roundtrip(json!({"a": "1", "b": "true", "c": "null", "d": "@home", "e": "-3.5"}));
}

#[test]
fn roundtrip_empty_string() {
    assert_roundtrip(json!({"a": ""}));
}

#[test]
fn roundtrip_nested_objects() {
    assert_roundtrip(json!({
        "a": {"b": {"c": 1}},
        "d": {"e": 1, "f": {"g": 2, "h": 3}},
        "i": {}
    }));
}

#[test]
fn roundtrip_lists() {
    assert_roundtrip(json!({
        "nums": [1, 2, 3],
        "one": [1],
        "none": [],
        "strs": ["1", "2"],
        "mixed": ["1", 2],
        "nulls": [null, null]
    }));
}

#[test]
fn roundtrip_list_of_objects() {
    assert_roundtrip(json!({
        "items": [{"id": 1, "tags": ["a", "b"]}, {"id": 2, "tags": ["c", "d"]}],
        "single": [{"id": 1}, {"id": 2}],
        "after": true
    }));
}

#[test]
fn roundtrip_list_of_lists() {
    assert_roundtrip(json!({"grid": [[1, 2], [3, 4]]}));
}

#[test]
fn roundtrip_single_item_inner_lists() {
    assert_roundtrip(json!({
        "foo": [[1], [2]],
        "bar": [1, [2], [[3]], [], ["a", "b"]],
        "after": 0
    }));
}

#[test]
fn roundtrip_list_items_holding_lists() {
    assert_roundtrip(json!({
        "items": [{"tags": ["a", "b"]}, {"tags": ["c"]}, {"id": 3}],
        "deep": [{"a": {"b": [1]}}, 2]
    }));
}

#[test]
fn roundtrip_unicode() {
    assert_roundtrip(json!({"greeting": "caf\u{00e9} \u{4f60}\u{597d}"}));
}

#[test]
fn roundtrip_through_json_preserves_types() {
    let obj = parse_and_build("test", "i: 1, f: 1.0, s:~ 1").unwrap();
    let text = serde_json::to_string(&obj).unwrap();
    assert_eq!(text, r#"{"i":1,"f":1.0,"s":"1"}"#);
}
