//! Subcommands and their execution.

use anyhow::{Context, Result};
use clap::Subcommand;
use log::debug;

use tokenex_client::{TokenClient, TokenScheme};

/// One service operation per subcommand.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tokenize arbitrary data (default scheme: GUID)
    Tokenize {
        /// The value to tokenize
        data: String,
        /// Token scheme, by name (e.g. GUID, TOKENfour) or code
        #[arg(long)]
        scheme: Option<TokenScheme>,
    },

    /// Tokenize a card number (default scheme: TOKENfour)
    TokenizeCard {
        /// The card number to tokenize
        card_number: String,
        /// Token scheme, by name (e.g. sixTOKENfour) or code
        #[arg(long)]
        scheme: Option<TokenScheme>,
    },

    /// Tokenize a value encrypted with the account's public key
    TokenizeEncrypted {
        /// The base64 encrypted payload
        encrypted_data: String,
        /// Token scheme, by name or code
        #[arg(long)]
        scheme: TokenScheme,
    },

    /// Recover the original value behind a token
    Detokenize {
        /// The token to resolve
        token: String,
    },

    /// Check whether a token is valid
    Validate {
        /// The token to check
        token: String,
    },

    /// Delete a token
    Delete {
        /// The token to delete
        token: String,
    },
}

impl Command {
    /// Runs the operation and returns the line to print.
    pub async fn execute(self, client: &TokenClient) -> Result<String> {
        debug!("Executing {}", self.name());

        match self {
            Self::Tokenize { data, scheme } => client
                .tokenize(&data, scheme)
                .await
                .context("tokenize failed"),
            Self::TokenizeCard {
                card_number,
                scheme,
            } => client
                .tokenize_card_number(&card_number, scheme)
                .await
                .context("card tokenization failed"),
            Self::TokenizeEncrypted {
                encrypted_data,
                scheme,
            } => client
                .tokenize_from_encrypted_value(&encrypted_data, scheme)
                .await
                .context("encrypted tokenization failed"),
            Self::Detokenize { token } => client
                .detokenize(&token)
                .await
                .context("detokenize failed"),
            Self::Validate { token } => client
                .validate_token(&token)
                .await
                .map(|valid| valid.to_string())
                .context("validation failed"),
            Self::Delete { token } => client
                .delete_token(&token)
                .await
                .map(|deleted| deleted.to_string())
                .context("delete failed"),
        }
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Tokenize { .. } => "tokenize",
            Self::TokenizeCard { .. } => "tokenize-card",
            Self::TokenizeEncrypted { .. } => "tokenize-encrypted",
            Self::Detokenize { .. } => "detokenize",
            Self::Validate { .. } => "validate",
            Self::Delete { .. } => "delete",
        }
    }
}
