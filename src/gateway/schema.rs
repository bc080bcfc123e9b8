//! Input schema validation.
//!
//! Checks raw arguments against a tool's declared schema before they can
//! reach the logic layer: required members present, declared primitive types
//! respected, enum membership enforced. Members the schema does not declare
//! pass through untouched; the typed input structs simply ignore them.

use serde_json::{Map, Value};

use crate::shop::errors::ShopError;

pub fn validate_input(schema: &Value, input: &Value) -> Result<(), ShopError> {
    let Some(members) = input.as_object() else {
        return Err(ShopError::validation("arguments must be an object"));
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !members.contains_key(field) {
                return Err(ShopError::validation(format!("{field} is required")));
            }
        }
    }

    let empty = Map::new();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    for (field, value) in members {
        let Some(declared) = properties.get(field) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        if let Some(expected) = declared.get("type").and_then(Value::as_str) {
            let matches = match expected {
                "string" => value.is_string(),
                "number" => value.is_number(),
                "integer" => value.as_i64().is_some() || value.as_u64().is_some(),
                "boolean" => value.is_boolean(),
                "object" => value.is_object(),
                "array" => value.is_array(),
                _ => true,
            };
            if !matches {
                return Err(ShopError::validation(format!(
                    "{field} must be a {expected}"
                )));
            }
        }

        if let Some(allowed) = declared.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                let choices: Vec<&str> =
                    allowed.iter().filter_map(Value::as_str).collect();
                return Err(ShopError::validation(format!(
                    "{field} must be one of: {}",
                    choices.join(", ")
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "productId": { "type": "string" },
                "quantity": { "type": "number" },
                "category": { "type": "string", "enum": ["office", "electronics", "home"] }
            },
            "required": ["productId"]
        })
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = validate_input(&schema(), &json!({ "quantity": 1 })).unwrap_err();
        assert_eq!(err, ShopError::validation("productId is required"));
    }

    #[test]
    fn wrong_primitive_type_is_rejected() {
        let err =
            validate_input(&schema(), &json!({ "productId": 42 })).unwrap_err();
        assert_eq!(err, ShopError::validation("productId must be a string"));

        let err = validate_input(
            &schema(),
            &json!({ "productId": "p1", "quantity": "two" }),
        )
        .unwrap_err();
        assert_eq!(err, ShopError::validation("quantity must be a number"));
    }

    #[test]
    fn enum_membership_is_enforced() {
        let err = validate_input(
            &schema(),
            &json!({ "productId": "p1", "category": "groceries" }),
        )
        .unwrap_err();
        assert!(matches!(err, ShopError::Validation(message)
            if message.starts_with("category must be one of:")));
    }

    #[test]
    fn valid_input_passes() {
        validate_input(
            &schema(),
            &json!({ "productId": "p1", "quantity": 3, "category": "home" }),
        )
        .unwrap();
    }

    #[test]
    fn undeclared_members_pass_through() {
        validate_input(&schema(), &json!({ "productId": "p1", "extra": true })).unwrap();
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let err = validate_input(&schema(), &json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, ShopError::validation("arguments must be an object"));
    }

    #[test]
    fn null_members_count_as_absent() {
        validate_input(&schema(), &json!({ "productId": "p1", "quantity": null })).unwrap();
    }
}
