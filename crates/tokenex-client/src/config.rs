//! Credentials and client options.

use std::collections::HashMap;

use secrecy::SecretString;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::error::ClientError;

/// Environment variable holding the service base URL.
pub const ENV_BASE_URL: &str = "TOKENEX_API_BASE_URL";
/// Environment variable holding the account identifier.
pub const ENV_TOKENEX_ID: &str = "TOKENEX_ID";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "TOKENEX_API_KEY";

/// Account credentials bound to a client for its whole lifetime.
///
/// The API key is kept in a [`SecretString`], so `Debug` output never shows
/// it.
///
/// # Examples
///
/// ```
/// use tokenex_client::Credentials;
///
/// let credentials = Credentials::builder()
///     .base_url("https://test-api.tokenex.com/TokenServices.svc/REST/")
///     .tokenex_id("4311038889209736")
///     .api_key("my-api-key".to_string())
///     .build();
///
/// assert_eq!(credentials.tokenex_id(), "4311038889209736");
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct Credentials {
    #[builder(setter(into))]
    base_url: String,
    #[builder(setter(into))]
    tokenex_id: String,
    #[builder(setter(transform = |api_key: String| SecretString::new(api_key.into())))]
    api_key: SecretString,
}

impl Credentials {
    /// Creates credentials from the three account values.
    pub fn new(
        base_url: impl Into<String>,
        tokenex_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            tokenex_id: tokenex_id.into(),
            api_key: SecretString::new(api_key.into().into()),
        }
    }

    /// Reads credentials from `TOKENEX_API_BASE_URL`, `TOKENEX_ID` and
    /// `TOKENEX_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationError`] naming the first variable
    /// that is unset or not valid unicode.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds credentials from any name-to-value lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name).ok_or_else(|| {
                ClientError::ConfigurationError(format!("environment variable {name} is not set"))
            })
        };

        Ok(Self::new(
            read(ENV_BASE_URL)?,
            read(ENV_TOKENEX_ID)?,
            read(ENV_API_KEY)?,
        ))
    }

    /// The service base URL that action names are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The account identifier sent as `TokenExID`.
    pub fn tokenex_id(&self) -> &str {
        &self.tokenex_id
    }

    pub(crate) const fn api_key(&self) -> &SecretString {
        &self.api_key
    }
}

/// Additional client options.
///
/// Reserved for future settings. The client accepts and stores these but
/// nothing currently reads them.
#[derive(Debug, Clone, Default, Deserialize)]
#[non_exhaustive]
pub struct ClientOptions {
    /// Arbitrary extra settings.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ClientOptions {
    /// Creates an empty options block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an extra setting.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
