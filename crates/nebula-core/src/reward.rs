//! # Reward Amounts
//!
//! A bounty reward in ETH. Settlement is out of scope; the amount is a
//! label carried through the lifecycle and echoed back in responses.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A finite, non-negative ETH amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Reward(f64);

impl Reward {
    /// Reward used when a command does not name one.
    pub const DEFAULT_ETH: f64 = 0.5;

    /// Validate an amount in ETH.
    pub fn new(eth: f64) -> Result<Self, ValidationError> {
        if !eth.is_finite() || eth.is_sign_negative() {
            return Err(ValidationError::InvalidReward(eth));
        }
        Ok(Self(eth))
    }

    /// The default command reward (0.5 ETH).
    pub fn default_command_reward() -> Self {
        Self(Self::DEFAULT_ETH)
    }

    /// The amount in ETH.
    pub fn eth(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Reward {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Reward> for f64 {
    fn from(reward: Reward) -> Self {
        reward.0
    }
}

/// Renders the bare amount (`0.5`, `1.2`, `2`), without the unit.
impl std::fmt::Display for Reward {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
