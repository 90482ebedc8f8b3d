//! Domain schemas: validators for the `data` field of a success envelope.
//!
//! Any `Deserialize + Default` type is a schema. Validation is serde
//! deserialization of the `data` value, and `Default` supplies the value a
//! `204 No Content` response stands for.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// The `data` payload does not have the expected resource shape.
#[derive(Debug, Error)]
#[error("payload does not match {type_name}: {source}")]
pub struct SchemaError {
    type_name: &'static str,
    #[source]
    source: serde_json::Error,
}

pub trait Schema: Sized {
    fn validate(data: Value) -> Result<Self, SchemaError>;

    /// The value returned for a response without content.
    fn no_content() -> Self;
}

impl<T> Schema for T
where
    T: DeserializeOwned + Default,
{
    fn validate(data: Value) -> Result<Self, SchemaError> {
        serde_json::from_value(data).map_err(|source| SchemaError {
            type_name: std::any::type_name::<T>(),
            source,
        })
    }

    fn no_content() -> Self {
        T::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Foo {
        foo: String,
    }

    #[test]
    fn matching_payload_validates() {
        let foo = Foo::validate(json!({"foo": "bar", "ignored": 1})).unwrap();
        assert_eq!(foo.foo, "bar");
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        let err = Foo::validate(json!({"foo": 123})).unwrap_err();
        assert!(err.to_string().contains("Foo"), "{err}");
    }

    #[test]
    fn unit_accepts_null() {
        assert!(<()>::validate(Value::Null).is_ok());
    }

    #[test]
    fn no_content_is_default() {
        assert_eq!(Foo::no_content(), Foo::default());
    }
}
