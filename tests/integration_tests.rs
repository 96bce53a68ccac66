use internet_object::{
    compile_header, from_document, from_str_with_header, from_str_with_options, io_value,
    load_with_header, registry, to_string_with_header, ErrorKind, Options, Value,
};

const PEOPLE: &str = r#"~ $address: {street, city}
~ $schema: {name, age: {number, min: 0, max: 150}, role?: {string, choices: [admin, user], default: user}, tags?: [string], address?*: $address}
~ default_city: Paris
---
~ Alice, 30, admin, [dev, ops], {"1 Main St", $default_city}
~ Bob, 25
~ Carol, 41, , [], N
"#;

#[test]
fn test_document_round_trip() {
    let (header, data) = from_document(PEOPLE).unwrap();

    let expected = io_value!([
        {
            "name": "Alice",
            "age": 30,
            "role": "admin",
            "tags": ["dev", "ops"],
            "address": { "street": "1 Main St", "city": "Paris" }
        },
        { "name": "Bob", "age": 25, "role": "user" },
        { "name": "Carol", "age": 41, "role": "user", "tags": [], "address": null }
    ]);
    assert_eq!(data, expected);

    let text = to_string_with_header(&data, &header).unwrap();
    println!("Serialized:\n{}", text);
    assert_eq!(
        text,
        "~ Alice,30,admin,[dev,ops],{1 Main St,Paris}\n~ Bob,25,user\n~ Carol,41,user,[],N"
    );

    let reparsed = from_str_with_header(&text, &header).unwrap();
    assert_eq!(reparsed, data);
}

#[test]
fn test_validation_errors_abort() {
    let header = compile_header("name, age: {number, min: 0}").unwrap();

    let err = from_str_with_header("~ Alice, 30\n~ Bob, -1", &header).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidMinValue);
    assert_eq!(err.position.map(|p| p.line), Some(2));
    assert!(err.to_string().starts_with("invalid-min-value: "));

    let err = from_str_with_header("Alice", &header).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingRequiredField);

    let err = from_str_with_header("Alice, N", &header).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NullNotAllowed);
}

#[test]
fn test_choices() {
    let header = compile_header("size: {string, choices: [S, M, L]}").unwrap();
    assert_eq!(
        from_str_with_header("M", &header).unwrap(),
        io_value!({ "size": "M" })
    );

    let err = from_str_with_header("XL", &header).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidChoice);
    assert!(err.is_validation());
}

#[test]
fn test_load_native_json() {
    let header = compile_header("name, age: number, tags?: [string], joined?: datetime").unwrap();

    let json = r#"[
        {"name": "Alice", "age": 30, "tags": ["a"], "joined": "2024-01-02T03:04:05Z"},
        {"age": 25, "name": "Bob"}
    ]"#;
    let native: Value = serde_json::from_str(json).unwrap();

    let loaded = load_with_header(&native, &header).unwrap();
    let records = loaded.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0]
        .as_object()
        .and_then(|o| o.get("joined"))
        .map_or(false, Value::is_datetime));

    let keys: Vec<_> = records[1].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["name", "age"]);

    let text = to_string_with_header(&loaded, &header).unwrap();
    assert_eq!(
        text,
        "~ Alice,30,[a],\"2024-01-02T03:04:05+00:00\"\n~ Bob,25"
    );
}

#[test]
fn test_load_rejects_wrong_types() {
    let header = compile_header("name, scores: [number]").unwrap();
    let native: Value = serde_json::from_str(r#"{"name": "x", "scores": [1, "two"]}"#).unwrap();
    let err = load_with_header(&native, &header).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidNumber);

    let native: Value = serde_json::from_str(r#"{"name": "x", "scores": 3}"#).unwrap();
    let err = load_with_header(&native, &header).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidValue);
}

#[test]
fn test_serialize_to_json() {
    let header = compile_header("name, tags: [string]").unwrap();
    let value = from_str_with_header("Alice, [x, y]", &header).unwrap();
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(json, r#"{"name":"Alice","tags":["x","y"]}"#);
}

#[test]
fn test_depth_limit_option() {
    let header = compile_header("grid: [[[number]]]").unwrap();
    let text = "[[[1]]]";

    assert!(from_str_with_header(text, &header).is_ok());

    let options = Options::new().with_max_depth(2);
    let err = from_str_with_options(text, &header, registry::builtin(), &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MaxDepthExceeded);
}

#[test]
fn test_syntax_error_position() {
    let header = compile_header("a, b").unwrap();
    let err = from_str_with_header("1, [2\n", &header).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
    assert!(err.position.is_some());
}

#[test]
fn test_document_error_lines_are_absolute() {
    let err = from_document("name, age: number\n---\nAlice, old").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidNumber);
    assert_eq!(err.position.map(|p| p.line), Some(3));
}

#[test]
fn test_empty_array_slots_survive_round_trip() {
    let header = compile_header("tags: [{string, optional: T}]").unwrap();

    let record = from_str_with_header("[a, , c]", &header).unwrap();
    let text = to_string_with_header(&record, &header).unwrap();
    assert_eq!(text, "[a,,c]");

    assert_eq!(load_with_header(&record, &header).unwrap(), record);
    assert_eq!(from_str_with_header(&text, &header).unwrap(), record);
}
