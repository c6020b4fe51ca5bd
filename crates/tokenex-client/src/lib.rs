//! # tokenex-client
//!
//! Client library for the TokenEx tokenization service.
//!
//! The service swaps sensitive values (card numbers, arbitrary secrets, or
//! payloads encrypted with the account's public key) for opaque tokens, and
//! maps tokens back on request. [`TokenClient`] covers the five token
//! operations:
//! - tokenize (with a card-number specialization)
//! - tokenize from an encrypted value
//! - detokenize
//! - validate a token
//! - delete a token
//!
//! Every call is a single authenticated HTTPS request. Refusals from the
//! service come back as distinct [`ClientError`] variants so callers can tell
//! "the service said no" apart from "the network failed".
//!
//! ## Example
//!
//! ```no_run
//! use tokenex_client::{ClientError, ClientOptions, Credentials, TokenClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = TokenClient::new(Credentials::from_env()?, ClientOptions::default())?;
//!
//! match client.validate_token("abcdefg").await {
//!     Ok(valid) => println!("valid: {valid}"),
//!     Err(ClientError::InvalidToken(fault)) => println!("rejected{fault}"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
mod request;
mod response;
pub mod scheme;

pub use client::TokenClient;
pub use config::{ClientOptions, Credentials};
pub use error::{ClientError, ServiceFault};
pub use scheme::{TokenAction, TokenScheme, UnknownScheme};
