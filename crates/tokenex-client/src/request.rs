//! Request envelope construction.

use secrecy::ExposeSecret;
use serde_json::{Map, Value};

use crate::config::Credentials;
use crate::scheme::{TokenAction, TokenScheme};

pub(crate) const FIELD_API_KEY: &str = "APIKey";
pub(crate) const FIELD_TOKENEX_ID: &str = "TokenExID";
pub(crate) const FIELD_DATA: &str = "Data";
pub(crate) const FIELD_TOKEN_SCHEME: &str = "TokenScheme";
pub(crate) const FIELD_ENCRYPTED_DATA: &str = "EncryptedData";
pub(crate) const FIELD_TOKEN: &str = "Token";

/// A single authenticated request to one service action.
///
/// Starts from the two authentication fields and overlays the operation's own
/// fields. Operation fields win on a key collision.
#[derive(Clone)]
pub(crate) struct OperationRequest {
    action: TokenAction,
    fields: Map<String, Value>,
}

impl OperationRequest {
    pub(crate) fn new<I>(
        credentials: &Credentials,
        action: TokenAction,
        operation_fields: I,
    ) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        let mut fields = Map::new();
        fields.insert(
            FIELD_API_KEY.to_string(),
            Value::String(credentials.api_key().expose_secret().to_string()),
        );
        fields.insert(
            FIELD_TOKENEX_ID.to_string(),
            Value::String(credentials.tokenex_id().to_string()),
        );
        for (name, value) in operation_fields {
            fields.insert(name.to_string(), value);
        }

        Self { action, fields }
    }

    pub(crate) fn tokenize(credentials: &Credentials, data: &str, scheme: TokenScheme) -> Self {
        Self::new(
            credentials,
            TokenAction::Tokenize,
            [
                (FIELD_DATA, Value::String(data.to_string())),
                (FIELD_TOKEN_SCHEME, Value::from(scheme.code())),
            ],
        )
    }

    pub(crate) fn tokenize_from_encrypted_value(
        credentials: &Credentials,
        encrypted_data: &str,
        scheme: TokenScheme,
    ) -> Self {
        Self::new(
            credentials,
            TokenAction::TokenizeFromEncryptedValue,
            [
                (FIELD_ENCRYPTED_DATA, Value::String(encrypted_data.to_string())),
                (FIELD_TOKEN_SCHEME, Value::from(scheme.code())),
            ],
        )
    }

    /// Detokenize, validate and delete all send just the token.
    pub(crate) fn for_token(credentials: &Credentials, action: TokenAction, token: &str) -> Self {
        Self::new(
            credentials,
            action,
            [(FIELD_TOKEN, Value::String(token.to_string()))],
        )
    }

    pub(crate) const fn action(&self) -> TokenAction {
        self.action
    }

    #[cfg(test)]
    pub(crate) const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Serializes the envelope to the JSON request body.
    pub(crate) fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.fields)
    }
}

// Request fields include the API key and sensitive payloads.
impl std::fmt::Debug for OperationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRequest")
            .field("action", &self.action)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("https://example.test/", "tokenex-id", "api-key")
    }

    fn keys(request: &OperationRequest) -> BTreeSet<&str> {
        request.fields().keys().map(String::as_str).collect()
    }

    #[test]
    fn test_tokenize_envelope() {
        let request =
            OperationRequest::tokenize(&credentials(), "4242424242424242", TokenScheme::TokenFour);
        let body: Value = serde_json::from_str(&request.to_body().unwrap()).unwrap();

        assert_eq!(request.action(), TokenAction::Tokenize);
        assert_eq!(
            body,
            serde_json::json!({
                "APIKey": "api-key",
                "TokenExID": "tokenex-id",
                "Data": "4242424242424242",
                "TokenScheme": 3
            })
        );
    }

    #[test]
    fn test_encrypted_envelope() {
        let request = OperationRequest::tokenize_from_encrypted_value(
            &credentials(),
            "ZW5jcnlwdGVk",
            TokenScheme::SixTokenFour,
        );

        assert_eq!(request.action(), TokenAction::TokenizeFromEncryptedValue);
        assert_eq!(
            keys(&request),
            BTreeSet::from(["APIKey", "EncryptedData", "TokenExID", "TokenScheme"])
        );
        assert_eq!(request.fields()["EncryptedData"], "ZW5jcnlwdGVk");
        assert_eq!(request.fields()["TokenScheme"], 1);
    }

    #[test]
    fn test_token_envelopes() {
        for action in [
            TokenAction::Detokenize,
            TokenAction::ValidateToken,
            TokenAction::DeleteToken,
        ] {
            let request = OperationRequest::for_token(&credentials(), action, "abcdefg");
            assert_eq!(request.action(), action);
            assert_eq!(keys(&request), BTreeSet::from(["APIKey", "Token", "TokenExID"]));
            assert_eq!(request.fields()["Token"], "abcdefg");
        }
    }

    #[test]
    fn test_operation_fields_override_auth_fields() {
        let request = OperationRequest::new(
            &credentials(),
            TokenAction::Tokenize,
            [(FIELD_TOKENEX_ID, Value::String("override".to_string()))],
        );
        assert_eq!(request.fields()["TokenExID"], "override");
        assert_eq!(request.fields().len(), 2);
    }

    #[test]
    fn test_debug_hides_values() {
        let request =
            OperationRequest::tokenize(&credentials(), "4242424242424242", TokenScheme::Guid);
        let debug = format!("{request:?}");
        assert!(!debug.contains("api-key"));
        assert!(!debug.contains("4242424242424242"));
    }

    proptest! {
        #[test]
        fn prop_tokenize_carries_exactly_auth_and_operation_fields(
            data in ".*",
            scheme_index in 0usize..TokenScheme::ALL.len(),
        ) {
            let scheme = TokenScheme::ALL[scheme_index];
            let request = OperationRequest::tokenize(&credentials(), &data, scheme);
            let body: Value = serde_json::from_str(&request.to_body().unwrap()).unwrap();
            let object = body.as_object().unwrap();

            prop_assert_eq!(object.len(), 4);
            prop_assert_eq!(&object["Data"], &Value::String(data));
            prop_assert_eq!(&object["TokenScheme"], &Value::from(scheme.code()));
            prop_assert_eq!(&object["APIKey"], "api-key");
            prop_assert_eq!(&object["TokenExID"], "tokenex-id");
        }

        #[test]
        fn prop_token_requests_carry_exactly_three_fields(token in ".*") {
            let request =
                OperationRequest::for_token(&credentials(), TokenAction::Detokenize, &token);
            let body: Value = serde_json::from_str(&request.to_body().unwrap()).unwrap();
            let object = body.as_object().unwrap();

            prop_assert_eq!(object.len(), 3);
            prop_assert_eq!(&object["Token"], &Value::String(token));
        }
    }
}
