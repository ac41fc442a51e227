//! Per-field validation
//!
//! [`validate`] checks one candidate value against its field definition and
//! returns the normalized value to store in a descriptor. Array-shaped
//! fields accept a scalar and are normalized to a one-element list; each
//! element is checked on its own.

use crate::error::ValidationError;
use crate::schema::{FieldDefinition, Rule};
use crate::types::Value;

/// Validate and normalize a candidate value for `field`
pub fn validate(field: &FieldDefinition, candidate: &Value) -> Result<Value, ValidationError> {
    if field.shape.is_array() {
        let items = candidate
            .elements()
            .iter()
            .map(|item| check(field, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::List(items))
    } else {
        check(field, candidate)
    }
}

/// Apply the field's rule to a single element
fn check(field: &FieldDefinition, value: &Value) -> Result<Value, ValidationError> {
    let fail = |reason: String| ValidationError::new(field.name, reason);

    match field.rule {
        Rule::Any => Ok(value.clone()),
        Rule::String => {
            require_string(field.name, value).map_err(fail)?;
            Ok(value.clone())
        }
        Rule::NonEmptyString => {
            let s = require_string(field.name, value).map_err(fail)?;
            if s.is_empty() {
                return Err(fail(format!("{} should not be blank", field.name)));
            }
            Ok(value.clone())
        }
        Rule::Token => {
            let s = require_string(field.name, value).map_err(fail)?;
            if s.chars().any(char::is_whitespace) {
                return Err(fail(format!("{} should not contain spaces", field.name)));
            }
            if s.is_empty() {
                return Err(fail(format!("{} should not be blank", field.name)));
            }
            Ok(value.clone())
        }
        Rule::Boolean => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(fail(format!("{} must be true or false", field.name))),
        },
        Rule::Custom(custom) => {
            custom(value).map_err(fail)?;
            Ok(value.clone())
        }
    }
}

fn require_string<'a>(name: &str, value: &'a Value) -> Result<&'a str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("{name} should be a String"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValueShape;

    fn token_field() -> FieldDefinition {
        FieldDefinition::property("region").rule(Rule::Token)
    }

    #[test]
    fn test_token_accepts_plain_strings() {
        for s in ["us-east-1", "eu-west-2", "x", "ap-southeast-1a"] {
            assert_eq!(
                validate(&token_field(), &Value::from(s)).unwrap(),
                Value::from(s)
            );
        }
    }

    #[test]
    fn test_token_rejects_whitespace_and_blank() {
        for s in ["", "us east-1", " us-east-1", "us-east-1\n", "\t"] {
            let err = validate(&token_field(), &Value::from(s)).unwrap_err();
            assert_eq!(err.field, "region");
        }

        let err = validate(&token_field(), &Value::from("")).unwrap_err();
        assert_eq!(err.reason, "region should not be blank");

        let err = validate(&token_field(), &Value::from("us east")).unwrap_err();
        assert_eq!(err.reason, "region should not contain spaces");
    }

    #[test]
    fn test_string_rules_reject_non_strings() {
        let field = FieldDefinition::property("key_name").rule(Rule::String);
        let err = validate(&field, &Value::Integer(3)).unwrap_err();
        assert_eq!(err.reason, "key_name should be a String");

        // Empty is fine for a plain string rule
        assert!(validate(&field, &Value::from("")).is_ok());

        let err = validate(&token_field(), &Value::Bool(true)).unwrap_err();
        assert_eq!(err.reason, "region should be a String");
    }

    #[test]
    fn test_non_empty_string() {
        let field = FieldDefinition::property("label").rule(Rule::NonEmptyString);
        assert!(validate(&field, &Value::from("has spaces ok")).is_ok());
        assert_eq!(
            validate(&field, &Value::from("")).unwrap_err().reason,
            "label should not be blank"
        );
    }

    #[test]
    fn test_boolean_normalizes_strings() {
        let field = FieldDefinition::property("public").rule(Rule::Boolean);
        assert_eq!(
            validate(&field, &Value::from("false")).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(validate(&field, &Value::Bool(true)).unwrap(), Value::Bool(true));
        assert_eq!(
            validate(&field, &Value::from("maybe")).unwrap_err().reason,
            "public must be true or false"
        );
    }

    #[test]
    fn test_array_shape_normalizes_scalar() {
        let field = FieldDefinition::property("groups")
            .shape(ValueShape::UnorderedSet)
            .rule(Rule::NonEmptyString);

        assert_eq!(
            validate(&field, &Value::from("sg-1")).unwrap(),
            Value::from(vec!["sg-1"])
        );
        assert_eq!(
            validate(&field, &Value::from(vec!["sg-1", "sg-2"])).unwrap(),
            Value::from(vec!["sg-1", "sg-2"])
        );
    }

    #[test]
    fn test_array_shape_checks_each_element() {
        let field = FieldDefinition::property("groups")
            .shape(ValueShape::UnorderedSet)
            .rule(Rule::NonEmptyString);

        let err = validate(&field, &Value::from(vec!["sg-1", ""])).unwrap_err();
        assert_eq!(err.field, "groups");
    }

    #[test]
    fn test_custom_rule() {
        fn even(value: &Value) -> Result<(), String> {
            match value {
                Value::Integer(i) if i % 2 == 0 => Ok(()),
                _ => Err("must be even".into()),
            }
        }

        let field = FieldDefinition::property("count").rule(Rule::Custom(even));
        assert!(validate(&field, &Value::Integer(4)).is_ok());
        assert_eq!(
            validate(&field, &Value::Integer(3)).unwrap_err(),
            ValidationError::new("count", "must be even")
        );
    }

    #[test]
    fn test_any_accepts_everything() {
        let field = FieldDefinition::parameter("user_data");
        assert!(validate(&field, &Value::from("#!/bin/sh")).is_ok());
        assert!(validate(&field, &Value::Integer(1)).is_ok());
    }
}
