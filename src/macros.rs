/// Builds a [`Value`](crate::Value) from a literal-like syntax.
///
/// ```rust
/// use internet_object::{io_value, Value};
///
/// let value = io_value!({ "name": "Alice", "tags": ["a", "b"], "age": null });
/// let obj = value.as_object().unwrap();
/// assert_eq!(obj.get("age"), Some(&Value::Null));
/// ```
#[macro_export]
macro_rules! io_value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::io_value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ValueMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ValueMap::new();
        $(
            object.insert($key.to_string(), $crate::io_value!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Anything else goes through `From`
    ($s:expr) => {
        $crate::Value::from($s)
    };
}
