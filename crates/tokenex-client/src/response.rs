//! Response envelope interpretation.

use serde_json::{Map, Value};

use crate::error::{ClientError, ServiceFault};

pub(crate) const FIELD_SUCCESS: &str = "Success";
pub(crate) const FIELD_TOKEN: &str = "Token";
pub(crate) const FIELD_VALUE: &str = "Value";
pub(crate) const FIELD_VALID: &str = "Valid";
const FIELD_ERROR: &str = "Error";
const FIELD_REFERENCE_NUMBER: &str = "ReferenceNumber";

/// A parsed service reply.
#[derive(Debug)]
pub(crate) struct OperationResponse {
    fields: Map<String, Value>,
}

impl OperationResponse {
    /// Parses a raw response body.
    ///
    /// Invalid JSON and bodies that are not a JSON object are protocol errors.
    pub(crate) fn parse(body: &str) -> Result<Self, ClientError> {
        match serde_json::from_str::<Value>(body)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ClientError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// The success gate: only a literal JSON `true` counts.
    pub(crate) fn is_success(&self) -> bool {
        matches!(self.fields.get(FIELD_SUCCESS), Some(Value::Bool(true)))
    }

    /// Diagnostic detail for a rejected request.
    pub(crate) fn fault(&self) -> ServiceFault {
        ServiceFault {
            error: self.text(FIELD_ERROR),
            reference_number: self.text(FIELD_REFERENCE_NUMBER),
        }
    }

    /// Applies the success gate, then extracts the result.
    ///
    /// `failure` builds the operation's error from the service detail when the
    /// gate is not met. `extract` runs only on a successful reply.
    pub(crate) fn interpret<T, F, E>(self, failure: F, extract: E) -> Result<T, ClientError>
    where
        F: FnOnce(ServiceFault) -> ClientError,
        E: FnOnce(&Self) -> Result<T, ClientError>,
    {
        if !self.is_success() {
            return Err(failure(self.fault()));
        }
        extract(&self)
    }

    /// A required string result field.
    pub(crate) fn string_field(&self, name: &str) -> Result<String, ClientError> {
        match self.fields.get(name) {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(other) => Err(ClientError::InvalidResponse(format!(
                "field {name} should be a string, got {}",
                json_kind(other)
            ))),
            None => Err(missing(name)),
        }
    }

    /// A required boolean result field.
    pub(crate) fn bool_field(&self, name: &str) -> Result<bool, ClientError> {
        match self.fields.get(name) {
            Some(Value::Bool(value)) => Ok(*value),
            Some(other) => Err(ClientError::InvalidResponse(format!(
                "field {name} should be a boolean, got {}",
                json_kind(other)
            ))),
            None => Err(missing(name)),
        }
    }

    /// Lenient text read for diagnostic fields; numbers are stringified.
    fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

fn missing(name: &str) -> ClientError {
    ClientError::InvalidResponse(format!("successful response is missing field {name}"))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]

    use proptest::prelude::*;

    use super::*;

    fn token_result(response: OperationResponse) -> Result<String, ClientError> {
        response.interpret(ClientError::InvalidToken, |r| r.string_field(FIELD_VALUE))
    }

    #[test]
    fn test_success_returns_field() {
        let response =
            OperationResponse::parse(r#"{"Success": true, "Value": "4242424242424242"}"#).unwrap();
        assert_eq!(token_result(response).unwrap(), "4242424242424242");
    }

    #[test]
    fn test_failure_carries_service_detail() {
        let response = OperationResponse::parse(
            r#"{"Success": false, "Error": "3000 : Invalid Token", "ReferenceNumber": 15031412}"#,
        )
        .unwrap();

        match token_result(response) {
            Err(ClientError::InvalidToken(fault)) => {
                assert_eq!(fault.error.as_deref(), Some("3000 : Invalid Token"));
                assert_eq!(fault.reference_number.as_deref(), Some("15031412"));
            }
            other => panic!("expected InvalidToken, got {other:?}"),
        }
    }

    #[test]
    fn test_gate_ignores_result_field_when_not_successful() {
        for body in [
            r#"{"Value": "4242"}"#,
            r#"{"Success": "true", "Value": "4242"}"#,
            r#"{"Success": 1, "Value": "4242"}"#,
            r#"{"Success": null, "Value": "4242"}"#,
            r#"{"success": true, "Value": "4242"}"#,
        ] {
            let response = OperationResponse::parse(body).unwrap();
            assert!(!response.is_success(), "{body} passed the gate");
            assert!(matches!(
                token_result(response),
                Err(ClientError::InvalidToken(_))
            ));
        }
    }

    #[test]
    fn test_missing_result_field_is_protocol_error() {
        let response = OperationResponse::parse(r#"{"Success": true}"#).unwrap();
        let err = token_result(response).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
        assert!(err.to_string().contains("Value"));
    }

    #[test]
    fn test_mistyped_result_field_is_protocol_error() {
        let response = OperationResponse::parse(r#"{"Success": true, "Valid": "yes"}"#).unwrap();
        let err = response
            .interpret(ClientError::InvalidToken, |r| r.bool_field(FIELD_VALID))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }

    #[test]
    fn test_unparseable_bodies() {
        assert!(matches!(
            OperationResponse::parse("<html>502 Bad Gateway</html>"),
            Err(ClientError::SerializationError(_))
        ));
        assert!(matches!(
            OperationResponse::parse("[true]"),
            Err(ClientError::InvalidResponse(_))
        ));
        assert!(matches!(
            OperationResponse::parse(""),
            Err(ClientError::SerializationError(_))
        ));
    }

    #[test]
    fn test_empty_error_text_is_dropped() {
        let response = OperationResponse::parse(r#"{"Success": false, "Error": ""}"#).unwrap();
        assert_eq!(response.fault(), ServiceFault::default());
    }

    fn non_true_success() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Bool(false)),
            Just(Value::Null),
            any::<i64>().prop_map(Value::from),
            ".*".prop_map(Value::String),
            prop::collection::vec(any::<bool>(), 0..3).prop_map(Value::from),
        ]
    }

    proptest! {
        #[test]
        fn prop_only_literal_true_passes_gate(success in non_true_success(), token in ".*") {
            let body = serde_json::json!({ "Success": success, "Token": token });
            let response = OperationResponse::parse(&body.to_string()).unwrap();
            prop_assert!(!response.is_success());
        }

        #[test]
        fn prop_success_returns_value_unmodified(value in ".*") {
            let body = serde_json::json!({ "Success": true, "Value": value.clone() });
            let response = OperationResponse::parse(&body.to_string()).unwrap();
            prop_assert_eq!(token_result(response).unwrap(), value);
        }
    }
}
