//! TokenEx client implementation.
//!
//! Every operation is one HTTPS `POST` of a JSON envelope to
//! `{base_url}{action}`, followed by interpretation of the JSON reply. There
//! are no retries: a transport failure or a refused request is reported to the
//! caller exactly once.
//!
//! # Examples
//!
//! ```no_run
//! use tokenex_client::{ClientOptions, Credentials, TokenClient};
//!
//! # async fn example() -> Result<(), tokenex_client::ClientError> {
//! let credentials = Credentials::new(
//!     "https://test-api.tokenex.com/TokenServices.svc/REST/",
//!     "4311038889209736",
//!     "my-api-key",
//! );
//! let client = TokenClient::new(credentials, ClientOptions::default())?;
//!
//! let token = client.tokenize_card_number("4242424242424242", None).await?;
//! let card = client.detokenize(&token).await?;
//! assert_eq!(card, "4242424242424242");
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! The default transport only speaks HTTPS and always verifies the peer
//! certificate. The API key lives in a `SecretString` and is never logged;
//! neither are card numbers, payloads or tokens.

use std::sync::Arc;

use log::{debug, error, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::config::{ClientOptions, Credentials};
use crate::error::ClientError;
use crate::request::OperationRequest;
use crate::response::{FIELD_SUCCESS, FIELD_TOKEN, FIELD_VALID, FIELD_VALUE, OperationResponse};
use crate::scheme::{TokenAction, TokenScheme};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Client for the TokenEx token services.
///
/// Cheap to clone; clones share credentials and the connection pool. The
/// client holds no mutable state, so one instance can serve concurrent calls.
#[derive(Clone)]
pub struct TokenClient {
    http: reqwest::Client,
    credentials: Arc<Credentials>,
    options: Arc<ClientOptions>,
}

// Custom Debug implementation to avoid exposing API key
impl std::fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClient")
            .field("base_url", &self.credentials.base_url())
            .field("tokenex_id", &self.credentials.tokenex_id())
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl TokenClient {
    /// Creates a client with an HTTPS-only transport.
    ///
    /// No request is made and the credentials are not checked here.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] if the TLS backend cannot be
    /// initialised.
    pub fn new(credentials: Credentials, options: ClientOptions) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .https_only(true)
            .build()
            .map_err(|e| {
                ClientError::ConfigurationError(format!("failed to build HTTPS transport: {e}"))
            })?;

        Ok(Self::with_http_client(credentials, options, http))
    }

    /// Creates a client around a caller-built `reqwest::Client`.
    ///
    /// Use this to share a connection pool or to add transport settings such
    /// as timeouts. The caller is responsible for keeping certificate
    /// verification enabled.
    pub fn with_http_client(
        credentials: Credentials,
        options: ClientOptions,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            credentials: Arc::new(credentials),
            options: Arc::new(options),
        }
    }

    /// The credentials this client authenticates with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The options this client was created with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Tokenizes a card number.
    ///
    /// Uses [`TokenScheme::CARD_DEFAULT`] when `scheme` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidCardNumber`] if the service refuses the
    /// number, or a transport error if the exchange fails.
    pub async fn tokenize_card_number(
        &self,
        card_number: &str,
        scheme: Option<TokenScheme>,
    ) -> Result<String, ClientError> {
        let scheme = scheme.unwrap_or(TokenScheme::CARD_DEFAULT);
        self.tokenize(card_number, Some(scheme))
            .await
            .map_err(|e| match e {
                ClientError::CannotTokenizeData(fault) => ClientError::InvalidCardNumber(fault),
                other => other,
            })
    }

    /// Tokenizes arbitrary sensitive data.
    ///
    /// Uses [`TokenScheme::DATA_DEFAULT`] when `scheme` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CannotTokenizeData`] if the service refuses the
    /// data, or a transport error if the exchange fails.
    pub async fn tokenize(
        &self,
        data: &str,
        scheme: Option<TokenScheme>,
    ) -> Result<String, ClientError> {
        let scheme = scheme.unwrap_or(TokenScheme::DATA_DEFAULT);
        let request = OperationRequest::tokenize(&self.credentials, data, scheme);

        self.send(&request).await?.interpret(ClientError::CannotTokenizeData, |r| {
            r.string_field(FIELD_TOKEN)
        })
    }

    /// Tokenizes a value that was encrypted with the account's public key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CannotTokenizeEncryptedValue`] if the service
    /// refuses the payload, or a transport error if the exchange fails.
    pub async fn tokenize_from_encrypted_value(
        &self,
        encrypted_data: &str,
        scheme: TokenScheme,
    ) -> Result<String, ClientError> {
        let request = OperationRequest::tokenize_from_encrypted_value(
            &self.credentials,
            encrypted_data,
            scheme,
        );

        self.send(&request)
            .await?
            .interpret(ClientError::CannotTokenizeEncryptedValue, |r| {
                r.string_field(FIELD_TOKEN)
            })
    }

    /// Recovers the original value behind a token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidToken`] if the service rejects the token,
    /// or a transport error if the exchange fails.
    pub async fn detokenize(&self, token: &str) -> Result<String, ClientError> {
        let request =
            OperationRequest::for_token(&self.credentials, TokenAction::Detokenize, token);

        self.send(&request)
            .await?
            .interpret(ClientError::InvalidToken, |r| r.string_field(FIELD_VALUE))
    }

    /// Asks the service whether a token is valid.
    ///
    /// A malformed or unknown token is reported as an error, not as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidToken`] if the service rejects the token,
    /// or a transport error if the exchange fails.
    pub async fn validate_token(&self, token: &str) -> Result<bool, ClientError> {
        let request =
            OperationRequest::for_token(&self.credentials, TokenAction::ValidateToken, token);

        self.send(&request)
            .await?
            .interpret(ClientError::InvalidToken, |r| r.bool_field(FIELD_VALID))
    }

    /// Deletes a token from the vault.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidToken`] if the service rejects the token,
    /// including a token that was already deleted, or a transport error if the
    /// exchange fails.
    pub async fn delete_token(&self, token: &str) -> Result<bool, ClientError> {
        let request =
            OperationRequest::for_token(&self.credentials, TokenAction::DeleteToken, token);

        self.send(&request)
            .await?
            .interpret(ClientError::InvalidToken, |r| r.bool_field(FIELD_SUCCESS))
    }

    /// Posts one request and parses the reply.
    ///
    /// The body is read and parsed whatever the HTTP status; the success gate
    /// decides the outcome.
    async fn send(&self, request: &OperationRequest) -> Result<OperationResponse, ClientError> {
        let action = request.action();
        let url = format!("{}{}", self.credentials.base_url(), action.path());

        // Validate URL construction
        reqwest::Url::parse(&url)
            .map_err(|e| ClientError::ConfigurationError(format!("Invalid URL '{url}': {e}")))?;

        debug!("Sending {action} request to {url}");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .body(request.to_body()?)
            .send()
            .await
            .map_err(|e| {
                error!("{action} request failed: {e}");
                ClientError::NetworkError(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{action} returned HTTP status {}", status.as_u16());
        }

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read {action} response body: {e}");
            ClientError::NetworkError(e)
        })?;

        let parsed = OperationResponse::parse(&body).inspect_err(|e| {
            error!(
                "{action} returned an unparseable body (status {}): {e}",
                status.as_u16()
            );
        })?;

        if parsed.is_success() {
            debug!("{action} succeeded");
        } else {
            let fault = parsed.fault();
            warn!(
                "{action} refused by service: {}",
                fault.error.as_deref().unwrap_or("no error detail")
            );
            if let Some(reference) = &fault.reference_number {
                debug!("{action} reference number: {reference}");
            }
        }

        Ok(parsed)
    }
}
