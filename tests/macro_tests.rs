use internet_object::{io_value, Number, Value, ValueMap};

#[test]
fn test_io_value_macro_primitives() {
    assert_eq!(io_value!(null), Value::Null);
    assert_eq!(io_value!(true), Value::Bool(true));
    assert_eq!(io_value!(false), Value::Bool(false));
    assert_eq!(io_value!(42), Value::Number(Number::Integer(42)));
    assert_eq!(io_value!(2.5), Value::Number(Number::Float(2.5)));
    assert_eq!(io_value!("hello"), Value::String("hello".to_string()));
}

#[test]
fn test_io_value_macro_arrays() {
    assert_eq!(io_value!([]), Value::Array(vec![]));
    assert_eq!(
        io_value!([1, "two", true, null]),
        Value::Array(vec![
            Value::Number(Number::Integer(1)),
            Value::String("two".to_string()),
            Value::Bool(true),
            Value::Null,
        ])
    );
}

#[test]
fn test_io_value_macro_objects_keep_order() {
    assert_eq!(io_value!({}), Value::Object(ValueMap::new()));

    let value = io_value!({
        "zeta": 1,
        "alpha": { "inner": [1, 2] },
        "mid": null
    });

    let obj = value.as_object().expect("object");
    let keys: Vec<_> = obj.keys().cloned().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    assert_eq!(
        obj.get("alpha").and_then(|a| a.as_object()).and_then(|a| a.get("inner")),
        Some(&io_value!([1, 2]))
    );
}

#[test]
fn test_io_value_macro_expressions() {
    let name = "Alice".to_string();
    let age = 30;
    let value = io_value!({ "name": name, "age": age });
    assert_eq!(value.to_string(), "{name: Alice,age: 30}");
}
