//! The structured-output contract: the schema every model proposal must
//! satisfy before it is trusted, and the validator that enforces it.

use serde_json::{json, Value};

/// Declarative schema applied to `StructuredProposal::arguments`.
///
/// A workflow is an object with a `name`, the `trigger` event that starts
/// it, and the `steps` it performs; each step names its `type`, the
/// `entity` it touches, and the `update` to apply.
pub fn workflow_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "trigger": {"type": "string"},
            "steps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "type": {"type": "string"},
                        "entity": {"type": "string"},
                        "update": {"type": "object"}
                    },
                    "required": ["type", "entity", "update"]
                }
            }
        },
        "required": ["name", "trigger", "steps"]
    })
}

/// A proposal's arguments did not match the contract schema. Carries the
/// violated path and rule so callers can tell malformed model output apart
/// from legitimate denials.
#[derive(Debug, thiserror::Error)]
#[error("schema validation failed: {0}")]
pub struct ContractViolation(pub String);

/// Validate `value` against a declarative schema.
///
/// Supports required-field presence, primitive type checks (string, object,
/// array, number, boolean), and nested checks through `properties` and
/// `items`. Stateless; safe to share across concurrent validations.
pub fn validate(value: &Value, schema: &Value) -> Result<(), ContractViolation> {
    validate_at(value, schema, "$")
}

fn validate_at(value: &Value, schema: &Value, path: &str) -> Result<(), ContractViolation> {
    if let Some(expected) = schema.get("type").and_then(Value::as_str) {
        check_type(value, expected, path)?;
    }

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if value.get(field).is_none() {
                return Err(ContractViolation(format!(
                    "{path}: missing required field '{field}'"
                )));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (key, prop_schema) in properties {
            if let Some(child) = value.get(key) {
                validate_at(child, prop_schema, &format!("{path}.{key}"))?;
            }
        }
    }

    if let Some(items) = schema.get("items") {
        if let Some(elements) = value.as_array() {
            for (index, element) in elements.iter().enumerate() {
                validate_at(element, items, &format!("{path}[{index}]"))?;
            }
        }
    }

    Ok(())
}

fn check_type(value: &Value, expected: &str, path: &str) -> Result<(), ContractViolation> {
    let matches = match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        // Unknown type keywords are not enforced
        _ => true,
    };

    if matches {
        Ok(())
    } else {
        Err(ContractViolation(format!(
            "{path}: expected {expected}, got {}",
            type_name(value)
        )))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
