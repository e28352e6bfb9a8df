//! Schema check for registration bodies.
//!
//! Both fields are required strings of at least [`MIN_LENGTH`] characters
//! and no other keys are accepted. Only the first violated rule is reported,
//! fields are checked in schema order before unknown keys.

use common::RegistrationRequest;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

pub const MIN_LENGTH: usize = 3;

const SCHEMA_KEYS: [&str; 2] = ["username", "password"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("\"value\" must be of type object")]
    NotAnObject,
    #[error("\"{0}\" must be a string")]
    NotAString(&'static str),
    #[error("\"{0}\" is not allowed to be empty")]
    Empty(&'static str),
    #[error("\"{0}\" is not allowed")]
    NotAllowed(Box<str>),
    /// a required or length rule declared on [`RegistrationFields`]
    #[error("{0}")]
    Rule(Box<str>),
}

/// the string valued schema fields of a body, absent when missing or mistyped
#[derive(Debug, Default, Validate)]
struct RegistrationFields {
    #[validate(
        required(message = "\"username\" is required"),
        length(min = 3, message = "\"username\" length must be at least 3 characters long")
    )]
    username: Option<String>,
    #[validate(
        required(message = "\"password\" is required"),
        length(min = 3, message = "\"password\" length must be at least 3 characters long")
    )]
    password: Option<String>,
}

pub fn validate_registration(body: &Value) -> Result<RegistrationRequest, SchemaViolation> {
    let Some(fields) = body.as_object() else {
        return Err(SchemaViolation::NotAnObject);
    };

    let registration = RegistrationFields {
        username: string_field(fields, "username"),
        password: string_field(fields, "password"),
    };
    let rule_errors = registration.validate().err();

    for key in SCHEMA_KEYS {
        match fields.get(key) {
            Some(Value::String(value)) if value.is_empty() => {
                return Err(SchemaViolation::Empty(key));
            },
            Some(Value::String(_)) | None => {},
            Some(_) => return Err(SchemaViolation::NotAString(key)),
        }

        if let Some(message) = rule_errors.as_ref().and_then(|errors| first_message(errors, key)) {
            return Err(SchemaViolation::Rule(message));
        }
    }

    if let Some(key) = fields.keys().find(|key| !SCHEMA_KEYS.contains(&key.as_str())) {
        return Err(SchemaViolation::NotAllowed(key.as_str().into()));
    }

    let (Some(username), Some(password)) = (registration.username, registration.password) else {
        return Err(SchemaViolation::Rule("\"username\" is required".into()));
    };

    Ok(RegistrationRequest {
        username: username.into_boxed_str(),
        password: password.into_boxed_str(),
    })
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn first_message(errors: &ValidationErrors, key: &'static str) -> Option<Box<str>> {
    let error = errors.field_errors()
        .get(key)?
        .first()?
        .clone();

    let message = match error.message {
        Some(message) => message.into_owned(),
        None => format!("\"{}\" failed {}", key, error.code),
    };

    Some(message.into_boxed_str())
}
