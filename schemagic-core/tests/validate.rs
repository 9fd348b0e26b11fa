//! validate() over every schema shape, without guards.

use schemagic_core::validators::{enum_, float, formatted_string, int, null, or_, string};
use schemagic_core::{json, schema, validate, Schema, ValidationError};

#[test]
fn sequence_template_of_ints() {
    let out = validate(&schema!([int()]), &json!([5, 6])).unwrap();
    assert_eq!(out, json!([5, 6]));
}

#[test]
fn sequence_template_accepts_empty_sequence() {
    let out = validate(&schema!([int()]), &json!([])).unwrap();
    assert_eq!(out, json!([]));
}

#[test]
fn sequence_template_rejects_scalar() {
    let err = validate(&schema!([int()]), &json!(5)).unwrap_err();
    match err {
        ValidationError::TypeMismatch {
            expected, found, ..
        } => {
            assert_eq!(expected, "sequence");
            assert_eq!(found, "number");
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn leaf_functions() {
    assert_eq!(validate(&string(), &json!("hello")).unwrap(), json!("hello"));
    let err = validate(&int(), &json!("hello")).unwrap_err();
    assert!(matches!(err, ValidationError::PredicateRejected { .. }));
}

#[test]
fn map_template_with_correct_data() {
    let s = schema!({[int()] => string()});
    let value = json!({"1": "hello", "2": "world"});
    assert_eq!(validate(&s, &value).unwrap(), value);
}

#[test]
fn map_template_validates_values() {
    let s = Schema::map_template(string(), int());
    let err = validate(&s, &json!({"a": 1, "b": "two"})).unwrap_err();
    assert!(matches!(err, ValidationError::PredicateRejected { .. }));
}

#[test]
fn map_template_rejects_non_mapping() {
    let err = validate(&schema!({[int()] => string()}), &json!([1])).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::TypeMismatch {
            expected: "mapping",
            ..
        }
    ));
}

#[test]
fn strict_sequence_with_good_data() {
    let out = validate(&schema!([int(), int()]), &json!([1, 2])).unwrap();
    assert_eq!(out, json!([1, 2]));
}

#[test]
fn strict_sequence_length_mismatch() {
    let err = validate(&schema!([int(), int()]), &json!([1])).unwrap_err();
    match err {
        ValidationError::LengthMismatch { expected, found } => {
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("expected LengthMismatch, got {:?}", other),
    }
}

#[test]
fn strict_sequence_is_positional() {
    let s = schema!([int(), string()]);
    assert_eq!(validate(&s, &json!([1, 2])).unwrap(), json!([1, "2"]));
    assert!(validate(&s, &json!(["a", "b"])).is_err());
}

#[test]
fn keyed_mapping_passes_extra_keys_through() {
    let s = schema!({"name" => string()});
    let value = json!({"name": "Bob", "age": 5});
    assert_eq!(validate(&s, &value).unwrap(), value);
}

#[test]
fn keyed_mapping_reports_all_missing_keys() {
    let s = schema!({"name" => string(), "age" => int(), "id" => int()});
    let err = validate(&s, &json!({"name": "Bob"})).unwrap_err();
    match err {
        ValidationError::MissingKeys { mut keys, value } => {
            keys.sort();
            assert_eq!(keys, vec!["age".to_string(), "id".to_string()]);
            assert_eq!(value, json!({"name": "Bob"}));
        }
        other => panic!("expected MissingKeys, got {:?}", other),
    }
}

#[test]
fn keyed_mapping_coercions_override_original_entries() {
    let s = schema!({"age" => int()});
    let out = validate(&s, &json!({"age": "41", "name": "Ann"})).unwrap();
    assert_eq!(out, json!({"age": 41, "name": "Ann"}));
}

#[test]
fn nested_schemas() {
    let s = schema!({
        "users" => schema!([schema!({"name" => string(), "scores" => schema!({[string()] => float()})})]),
        "page" => schema!([int(), int()]),
    });
    let value = json!({
        "users": [
            {"name": "a", "scores": {"math": 1.5}},
            {"name": "b", "scores": {}}
        ],
        "page": [1, 10]
    });
    assert_eq!(validate(&s, &value).unwrap(), value);

    let bad = json!({"users": [{"name": "a", "scores": {"math": "x"}}], "page": [1, 10]});
    assert!(validate(&s, &bad).is_err());
}

#[test]
fn empty_sequence_schema_is_a_configuration_error() {
    let err = validate(&Schema::Sequence(vec![]), &json!([])).unwrap_err();
    assert!(matches!(err, ValidationError::Classification(_)));
}

#[test]
fn formatted_string_validator() {
    let digits = formatted_string(r"\d+").unwrap();
    assert_eq!(validate(&digits, &json!("112233")).unwrap(), json!("112233"));
    assert_eq!(validate(&digits, &json!(112233)).unwrap(), json!("112233"));
    let err = validate(&digits, &json!("abc")).unwrap_err();
    match err {
        ValidationError::PredicateRejected { value, message, .. } => {
            assert_eq!(value, json!("abc"));
            assert!(message.contains("\"abc\""));
        }
        other => panic!("expected PredicateRejected, got {:?}", other),
    }
}

#[test]
fn enum_validator() {
    let e = enum_([json!("Hello"), json!(5)]);
    assert_eq!(validate(&e, &json!("Hello")).unwrap(), json!("Hello"));
    assert_eq!(validate(&e, &json!(5)).unwrap(), json!(5));
    assert!(validate(&e, &json!(6)).is_err());
    assert!(validate(&e, &json!("World")).is_err());
}

#[test]
fn or_validator() {
    let number = or_([int(), float()]);
    assert_eq!(validate(&number, &json!(10)).unwrap(), json!(10));
    assert_eq!(validate(&number, &json!(10.5)).unwrap(), json!(10.5));
    let err = validate(&number, &json!("hello")).unwrap_err();
    assert!(matches!(err, ValidationError::PredicateRejected { .. }));
}

#[test]
fn or_returns_first_successful_alternative() {
    let s = or_([string(), int()]);
    assert_eq!(validate(&s, &json!(3)).unwrap(), json!("3"));
}

#[test]
fn or_accepts_structural_schemas() {
    let s = or_([null(), schema!([int()])]);
    assert_eq!(validate(&s, &json!(null)).unwrap(), json!(null));
    assert_eq!(validate(&s, &json!([1])).unwrap(), json!([1]));
    assert!(validate(&s, &json!({"a": 1})).is_err());
}

#[test]
fn try_leaf_converts_foreign_errors() {
    let port = Schema::try_leaf("port", |v| {
        let text = schemagic_core::value::to_plain_string(v);
        text.parse::<u16>().map(|p| json!(p))
    });
    assert_eq!(validate(&port, &json!("8080")).unwrap(), json!(8080));
    let err = validate(&port, &json!("99999")).unwrap_err();
    match err {
        ValidationError::PredicateRejected { predicate, .. } => assert_eq!(predicate, "port"),
        other => panic!("expected PredicateRejected, got {:?}", other),
    }
}

#[test]
fn builtin_leaves_follow_their_conversions() {
    assert_eq!(validate(&int(), &json!(5.0)).unwrap(), json!(5));
    assert!(validate(&int(), &json!(5.5)).is_err());
    assert_eq!(validate(&string(), &json!(null)).unwrap(), json!("null"));
    assert_eq!(
        validate(&schema!([string()]), &json!([[1, 2], {"a": 1}])).unwrap(),
        json!(["[1,2]", "{\"a\":1}"])
    );
}
