//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers of the bounty marketplace.
//! These prevent accidental identifier confusion: you cannot pass an
//! `ActorId` where a `BountyId` is expected.
//!
//! Bounty and actor identifiers are opaque strings chosen by the store or
//! the session layer. Both are validated on construction and on
//! deserialization.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Unique identifier for a bounty.
///
/// Alphabet: ASCII letters, digits, `-` and `_`. The in-memory store
/// assigns `bounty<N>` sequentially, see [`BountyId::sequential`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BountyId(String);

/// Identifier of an actor (creator, worker, or bystander).
///
/// Any non-empty string without whitespace or `:`. The colon is reserved
/// as the separator in `<actor>:<secret>` bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(String);

/// Unique identifier for a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl BountyId {
    /// Validate and wrap a bounty identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyIdentifier { kind: "bounty" });
        }
        let well_formed = value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            return Err(ValidationError::MalformedIdentifier {
                kind: "bounty",
                value,
            });
        }
        Ok(Self(value))
    }

    /// The identifier the store assigns to its `n`-th bounty (`bounty<n>`).
    pub fn sequential(n: u64) -> Self {
        Self(format!("bounty{n}"))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ActorId {
    /// Validate and wrap an actor identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier { kind: "actor" });
        }
        if value.chars().any(|c| c.is_whitespace() || c == ':') {
            return Err(ValidationError::MalformedIdentifier {
                kind: "actor",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl MessageId {
    /// Generate a new random message identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<String> for BountyId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for ActorId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BountyId> for String {
    fn from(id: BountyId) -> Self {
        id.0
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

impl std::str::FromStr for BountyId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::str::FromStr for ActorId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for BountyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}
