//! Property-based tests for the array round trip and header ordering.

use internet_object::types::{ArrayDef, Context, TypeHandler};
use internet_object::{compile_header, parser, registry, HeaderValue, MemberDef, Options, Value};
use proptest::prelude::*;

fn roundtrip(value: &Value, def: &MemberDef) -> bool {
    let options = Options::default();
    let ctx = Context::new(registry::builtin(), None, &options);

    let text = match ArrayDef.serialize(Some(value), def, &ctx) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            return false;
        }
    };

    let parsed = parser::parse_value(&text)
        .and_then(|node| ArrayDef.parse(node.as_ref(), def, &ctx));
    match parsed {
        Ok(Some(back)) => back == *value,
        Ok(None) => false,
        Err(e) => {
            eprintln!("Parse failed: {}", e);
            eprintln!("Serialized was: {}", text);
            false
        }
    }
}

fn array_of(type_name: &str) -> MemberDef {
    MemberDef::array_of("items", MemberDef::new("", type_name))
}

proptest! {
    #[test]
    fn prop_integer_array(v in prop::collection::vec(any::<i64>(), 0..20)) {
        let value = Value::Array(v.into_iter().map(Value::from).collect());
        prop_assert!(roundtrip(&value, &array_of("number")));
    }

    #[test]
    fn prop_float_array(v in prop::collection::vec(-1.0e9f64..1.0e9, 0..20)) {
        let value = Value::Array(v.into_iter().map(Value::from).collect());
        prop_assert!(roundtrip(&value, &array_of("number")));
    }

    #[test]
    fn prop_string_array(v in prop::collection::vec("[a-zA-Z0-9 ,:\"\\\\._-]{0,12}", 0..10)) {
        let value = Value::Array(v.into_iter().map(Value::from).collect());
        prop_assert!(roundtrip(&value, &array_of("string")));
    }

    #[test]
    fn prop_nullable_bool_matrix(
        rows in prop::collection::vec(prop::collection::vec(proptest::option::of(any::<bool>()), 0..5), 0..5)
    ) {
        let value = Value::Array(
            rows.into_iter()
                .map(|row| Value::Array(row.into_iter().map(|b| b.map_or(Value::Null, Value::from)).collect()))
                .collect(),
        );
        let def = MemberDef::array_of(
            "grid",
            MemberDef::array_of("", MemberDef::new("", "boolean").nullable()),
        );
        prop_assert!(roundtrip(&value, &def));
    }

    #[test]
    fn prop_optional_string_slots(
        v in prop::collection::vec(proptest::option::of("[a-z0-9 ,]{0,8}"), 2..10)
    ) {
        // empty slots are held as null once parsed
        let value = Value::Array(v.into_iter().map(|s| s.map_or(Value::Null, Value::from)).collect());
        let def = MemberDef::array_of("tags", MemberDef::new("", "string").optional());
        prop_assert!(roundtrip(&value, &def));

        let options = Options::default();
        let ctx = Context::new(registry::builtin(), None, &options);
        prop_assert_eq!(ArrayDef.load(Some(&value), &def, &ctx).unwrap(), Some(value.clone()));
    }

    #[test]
    fn prop_header_keys_keep_declaration_order(
        names in prop::collection::hash_set("[a-z]{1,8}", 1..12)
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let text: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("~ {}: {}", name, i))
            .collect();

        let header = compile_header(&text.join("\n")).unwrap();
        prop_assert_eq!(header.keys(), names.clone());
        for (i, name) in names.iter().enumerate() {
            prop_assert_eq!(header.get(name), Some(&HeaderValue::Value(Value::from(i as i64))));
        }
    }
}
