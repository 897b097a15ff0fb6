//! Argument validation against a tool's parameter schema.
//!
//! Runs before any remote call: a missing required field, a wrong type, a
//! negative price, or an unknown sort token fails fast and never reaches
//! the marketplace collaborator.

use serde_json::Value;

/// Validate `args` against the JSON-Schema subset in `schema`.
///
/// Returns every problem found (empty vec = valid). The supported subset
/// covers what the marketplace tool schemas need: object nesting, the
/// scalar types `string`/`integer`/`number`/`boolean`, `required` lists,
/// `enum` token sets, and numeric `minimum` bounds.
pub fn validate_args(schema: &Value, args: &Value) -> Vec<String> {
    let mut problems = Vec::new();
    validate_value(schema, args, "", &mut problems);
    problems
}

fn validate_value(schema: &Value, value: &Value, path: &str, problems: &mut Vec<String>) {
    let type_name = schema.get("type").and_then(Value::as_str);

    match type_name {
        Some("object") => validate_object(schema, value, path, problems),
        Some("string") => {
            if !value.is_string() {
                problems.push(format!("{}: expected string, got {}", display(path), kind(value)));
                return;
            }
            check_enum(schema, value, path, problems);
        }
        Some("integer") => {
            if value.as_i64().is_none() && value.as_u64().is_none() {
                problems.push(format!("{}: expected integer, got {}", display(path), kind(value)));
                return;
            }
            check_minimum(schema, value, path, problems);
            check_enum(schema, value, path, problems);
        }
        Some("number") => {
            if !value.is_number() {
                problems.push(format!("{}: expected number, got {}", display(path), kind(value)));
                return;
            }
            check_minimum(schema, value, path, problems);
        }
        Some("boolean") => {
            if !value.is_boolean() {
                problems.push(format!("{}: expected boolean, got {}", display(path), kind(value)));
            }
        }
        // Unconstrained or unknown schema types accept anything.
        _ => {}
    }
}

fn validate_object(schema: &Value, value: &Value, path: &str, problems: &mut Vec<String>) {
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => {
            problems.push(format!("{}: expected object, got {}", display(path), kind(value)));
            return;
        }
    };

    let empty = serde_json::Map::new();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !obj.contains_key(field) {
                problems.push(format!(
                    "{}: missing required field '{}'",
                    display(path),
                    field
                ));
            }
        }
    }

    for (key, field_value) in obj {
        if let Some(field_schema) = properties.get(key) {
            let field_path = if path.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", path, key)
            };
            validate_value(field_schema, field_value, &field_path, problems);
        }
        // Unknown fields are tolerated; the remote API ignores them.
    }
}

fn check_enum(schema: &Value, value: &Value, path: &str, problems: &mut Vec<String>) {
    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            problems.push(format!(
                "{}: value {} is not one of the allowed tokens",
                display(path),
                value
            ));
        }
    }
}

fn check_minimum(schema: &Value, value: &Value, path: &str, problems: &mut Vec<String>) {
    if let Some(minimum) = schema.get("minimum").and_then(Value::as_f64) {
        let actual = value.as_f64().unwrap_or(f64::NAN);
        if actual < minimum {
            problems.push(format!(
                "{}: value {} is below the minimum of {}",
                display(path),
                value,
                minimum
            ));
        }
    }
}

fn display(path: &str) -> &str {
    if path.is_empty() {
        "arguments"
    } else {
        path
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
