//! Core protocol types shared by every layer above the wire.
//!
//! Identity newtypes and the logout result codes live here because the
//! session layer, the facade, and the codec all need to agree on them.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for an account.
///
/// Newtype over `u32` so an account id can never be passed where a
/// character id is expected. `#[serde(transparent)]` keeps the persisted
/// form a plain number: `AccountId(7)` is stored as `7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u32);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A-{}", self.0)
    }
}

/// A unique identifier for a character in the world (its GUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u64);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{:#x}", self.0)
    }
}

// ---------------------------------------------------------------------------
// LogoutResult
// ---------------------------------------------------------------------------

/// Result code carried by `SMSG_LOGOUT_RESPONSE`.
///
/// This is a closed set: the client only knows how to render these four
/// values. Anything other than [`Success`](Self::Success) is a denial and
/// must be sent with `instant = false`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum LogoutResult {
    /// The logout was accepted.
    #[default]
    Success = 0,

    /// The character is in combat.
    FailureInCombat = 1,

    /// The character has been frozen by a game master.
    FailureFrozenByGm = 2,

    /// The character is not standing on the ground (jumping or falling).
    FailureJumpingOrFalling = 3,
}

impl LogoutResult {
    /// Wire value of this result code.
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Returns `true` only for [`LogoutResult::Success`].
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl TryFrom<u32> for LogoutResult {
    type Error = u32;

    /// Converts a wire value back into a result code, returning the
    /// unknown value as the error.
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::FailureInCombat),
            2 => Ok(Self::FailureFrozenByGm),
            3 => Ok(Self::FailureJumpingOrFalling),
            other => Err(other),
        }
    }
}

impl fmt::Display for LogoutResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::FailureInCombat => "in combat",
            Self::FailureFrozenByGm => "frozen by gm",
            Self::FailureJumpingOrFalling => "not on ground",
        };
        f.write_str(name)
    }
}
