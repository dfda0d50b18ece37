//! Parameter binder.
//!
//! Maps a request's params payload onto a handler's declared inputs.
//! Handlers declare descriptors instead of relying on runtime
//! introspection; resolution is plain map lookup:
//!
//! 1. a raw-payload input receives the entire params structure unmodified;
//! 2. named inputs resolve by exact key, then by a snake_case fallback,
//!    looking under a conventional `data` key before the top level;
//! 3. positional inputs bind by declaration order;
//! 4. shape mismatches surface as named Invalid-params failures;
//! 5. unresolved optional inputs are omitted, not defaulted to null.
//!
//! The request context never participates in name resolution — it is
//! passed to `invoke` as a separate argument.

use serde_json::{Map, Value};

use wirecall_protocol::RequestParams;

use crate::error::HandlerError;

/// Expected shape of a bound value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Any,
    Null,
    Bool,
    Integer,
    Float,
    String,
    List,
    Map,
}

impl ValueShape {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueShape::Any => true,
            ValueShape::Null => value.is_null(),
            ValueShape::Bool => value.is_boolean(),
            ValueShape::Integer => value.is_i64() || value.is_u64(),
            ValueShape::Float => value.is_number(),
            ValueShape::String => value.is_string(),
            ValueShape::List => value.is_array(),
            ValueShape::Map => value.is_object(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ValueShape::Any => "any value",
            ValueShape::Null => "null",
            ValueShape::Bool => "a boolean",
            ValueShape::Integer => "an integer",
            ValueShape::Float => "a number",
            ValueShape::String => "a string",
            ValueShape::List => "a list",
            ValueShape::Map => "a map",
        }
    }
}

/// How a declared input is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Receives the whole params payload unmodified
    RawPayload,
    /// Resolved from the payload and validated against a shape
    Shaped(ValueShape),
}

/// One declared handler input
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamSpec {
    pub const fn required(name: &'static str, shape: ValueShape) -> Self {
        Self {
            name,
            kind: ParamKind::Shaped(shape),
            required: true,
        }
    }

    pub const fn optional(name: &'static str, shape: ValueShape) -> Self {
        Self {
            name,
            kind: ParamKind::Shaped(shape),
            required: false,
        }
    }

    pub const fn raw_payload(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::RawPayload,
            required: false,
        }
    }
}

/// Arguments resolved for one invocation, keyed by declared name
#[derive(Debug, Clone, Default)]
pub struct BoundArgs {
    values: Map<String, Value>,
}

impl BoundArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn str_arg(&self, name: &str) -> Option<&str> {
        self.values.get(name)?.as_str()
    }

    pub fn i64_arg(&self, name: &str) -> Option<i64> {
        self.values.get(name)?.as_i64()
    }

    pub fn f64_arg(&self, name: &str) -> Option<f64> {
        self.values.get(name)?.as_f64()
    }
}

/// Resolve a handler's declared inputs against a params payload.
pub fn bind_params(
    specs: &[ParamSpec],
    params: Option<&RequestParams>,
) -> Result<BoundArgs, HandlerError> {
    let mut args = BoundArgs::new();
    let mut position = 0;

    for spec in specs {
        match spec.kind {
            ParamKind::RawPayload => {
                let raw = params.map(RequestParams::to_value).unwrap_or(Value::Null);
                args.insert(spec.name, raw);
            }
            ParamKind::Shaped(shape) => {
                let resolved = match params {
                    Some(RequestParams::Object(map)) => resolve_named(map, spec.name),
                    Some(RequestParams::Array(list)) => {
                        let value = list.get(position);
                        position += 1;
                        value
                    }
                    None => None,
                };

                match resolved {
                    Some(value) => {
                        if !shape.matches(value) {
                            return Err(HandlerError::Validation(format!(
                                "parameter '{}' must be {}",
                                spec.name,
                                shape.describe()
                            )));
                        }
                        args.insert(spec.name, value.clone());
                    }
                    None if spec.required => {
                        return Err(HandlerError::Validation(format!(
                            "missing required parameter '{}'",
                            spec.name
                        )));
                    }
                    // Unresolved optional inputs are omitted, not null
                    None => {}
                }
            }
        }
    }

    Ok(args)
}

/// Exact name first, snake_case fallback second; a `data` sub-object is
/// searched before the top level.
fn resolve_named<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    if let Some(Value::Object(data)) = map.get("data")
        && let Some(value) = lookup(data, name)
    {
        return Some(value);
    }
    lookup(map, name)
}

fn lookup<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(name) {
        return Some(value);
    }
    let fallback = to_snake_case(name);
    if fallback != name {
        return map.get(&fallback);
    }
    None
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object_params(value: Value) -> RequestParams {
        let Value::Object(map) = value else {
            panic!("expected an object");
        };
        RequestParams::Object(map)
    }

    #[test]
    fn test_named_binding() {
        let specs = [
            ParamSpec::required("minuend", ValueShape::Integer),
            ParamSpec::required("subtrahend", ValueShape::Integer),
        ];
        let params = object_params(json!({"minuend": 42, "subtrahend": 23}));

        let args = bind_params(&specs, Some(&params)).unwrap();
        assert_eq!(args.i64_arg("minuend"), Some(42));
        assert_eq!(args.i64_arg("subtrahend"), Some(23));
    }

    #[test]
    fn test_positional_binding_by_declaration_order() {
        let specs = [
            ParamSpec::required("minuend", ValueShape::Integer),
            ParamSpec::required("subtrahend", ValueShape::Integer),
        ];
        let params = RequestParams::Array(vec![json!(42), json!(23)]);

        let args = bind_params(&specs, Some(&params)).unwrap();
        assert_eq!(args.i64_arg("minuend"), Some(42));
        assert_eq!(args.i64_arg("subtrahend"), Some(23));
    }

    #[test]
    fn test_snake_case_fallback() {
        let specs = [ParamSpec::required("pageSize", ValueShape::Integer)];
        let params = object_params(json!({"page_size": 10}));

        let args = bind_params(&specs, Some(&params)).unwrap();
        assert_eq!(args.i64_arg("pageSize"), Some(10));
    }

    #[test]
    fn test_exact_match_wins_over_fallback() {
        let specs = [ParamSpec::required("pageSize", ValueShape::Integer)];
        let params = object_params(json!({"pageSize": 5, "page_size": 10}));

        let args = bind_params(&specs, Some(&params)).unwrap();
        assert_eq!(args.i64_arg("pageSize"), Some(5));
    }

    #[test]
    fn test_data_key_convention() {
        let specs = [ParamSpec::required("name", ValueShape::String)];
        let params = object_params(json!({"data": {"name": "inner"}, "name": "outer"}));

        let args = bind_params(&specs, Some(&params)).unwrap();
        assert_eq!(args.str_arg("name"), Some("inner"));
    }

    #[test]
    fn test_raw_payload_passes_through() {
        let specs = [ParamSpec::raw_payload("payload")];
        let params = object_params(json!({"anything": [1, 2, 3]}));

        let args = bind_params(&specs, Some(&params)).unwrap();
        assert_eq!(args.get("payload"), Some(&json!({"anything": [1, 2, 3]})));
    }

    #[test]
    fn test_shape_mismatch_is_validation_error() {
        let specs = [ParamSpec::required("count", ValueShape::Integer)];
        let params = object_params(json!({"count": "three"}));

        let err = bind_params(&specs, Some(&params)).unwrap_err();
        let HandlerError::Validation(detail) = err else {
            panic!("expected a validation error");
        };
        assert!(detail.contains("count"));
    }

    #[test]
    fn test_missing_required_is_validation_error() {
        let specs = [ParamSpec::required("count", ValueShape::Integer)];
        let params = object_params(json!({}));

        let err = bind_params(&specs, Some(&params)).unwrap_err();
        assert!(matches!(err, HandlerError::Validation(_)));
    }

    #[test]
    fn test_missing_optional_is_omitted() {
        let specs = [ParamSpec::optional("limit", ValueShape::Integer)];
        let params = object_params(json!({}));

        let args = bind_params(&specs, Some(&params)).unwrap();
        assert!(!args.contains("limit"));
    }

    #[test]
    fn test_no_params_with_no_required_inputs() {
        let specs = [ParamSpec::optional("limit", ValueShape::Integer)];
        let args = bind_params(&specs, None).unwrap();
        assert!(!args.contains("limit"));
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("pageSize"), "page_size");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("Simple"), "simple");
    }
}
