//! Token schemes and service actions.
//!
//! Both are closed enumerations: the service only understands a fixed set of
//! scheme codes and endpoint names, so neither is ever built from a free-form
//! string at the call site.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Format policy for the tokens the service generates.
///
/// Serialized on the wire as the service's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenScheme {
    /// Keeps the first six and last four digits of the input.
    SixTokenFour,
    /// Keeps the first four and last four digits of the input.
    FourTokenFour,
    /// Keeps the last four digits of the input.
    TokenFour,
    /// A random globally unique identifier.
    Guid,
    /// Social security number format, keeping the last four digits.
    Ssn,
    /// A GUID without dashes.
    NGuid,
    /// Numeric token keeping the last four digits.
    NTokenFour,
    /// Numeric token of the same length as the input.
    NToken,
}

impl TokenScheme {
    /// Scheme used by card-number tokenization when the caller supplies none.
    pub const CARD_DEFAULT: Self = Self::TokenFour;

    /// Scheme used by generic tokenization when the caller supplies none.
    pub const DATA_DEFAULT: Self = Self::Guid;

    /// Every scheme, in wire-code order.
    pub const ALL: [Self; 8] = [
        Self::SixTokenFour,
        Self::FourTokenFour,
        Self::TokenFour,
        Self::Guid,
        Self::Ssn,
        Self::NGuid,
        Self::NTokenFour,
        Self::NToken,
    ];

    /// The integer the service expects in the `TokenScheme` field.
    pub const fn code(self) -> u8 {
        match self {
            Self::SixTokenFour => 1,
            Self::FourTokenFour => 2,
            Self::TokenFour => 3,
            Self::Guid => 4,
            Self::Ssn => 5,
            Self::NGuid => 6,
            Self::NTokenFour => 7,
            Self::NToken => 8,
        }
    }

    /// The service's name for this scheme.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SixTokenFour => "sixTOKENfour",
            Self::FourTokenFour => "fourTOKENfour",
            Self::TokenFour => "TOKENfour",
            Self::Guid => "GUID",
            Self::Ssn => "SSN",
            Self::NGuid => "nGUID",
            Self::NTokenFour => "nTOKENfour",
            Self::NToken => "nTOKEN",
        }
    }

    /// Look up a scheme by its wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|scheme| scheme.code() == code)
    }
}

impl fmt::Display for TokenScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenScheme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Error returned when a string names no known scheme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token scheme '{0}'")]
pub struct UnknownScheme(pub String);

impl FromStr for TokenScheme {
    type Err = UnknownScheme;

    /// Accepts the service name (case-insensitive) or the integer code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code).ok_or_else(|| UnknownScheme(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownScheme(s.to_string()))
    }
}

/// Service endpoints, one per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenAction {
    Tokenize,
    TokenizeFromEncryptedValue,
    Detokenize,
    ValidateToken,
    DeleteToken,
}

impl TokenAction {
    /// Path segment appended to the base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Tokenize => "Tokenize",
            Self::TokenizeFromEncryptedValue => "TokenizeFromEncryptedValue",
            Self::Detokenize => "Detokenize",
            Self::ValidateToken => "ValidateToken",
            Self::DeleteToken => "DeleteToken",
        }
    }
}

impl fmt::Display for TokenAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
