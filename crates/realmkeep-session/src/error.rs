//! Error types for the session layer.

use realmkeep_transport::TransportError;

/// Any error the session layer reports to the layer above.
///
/// Operations return the narrower [`DecodeError`] or [`SendError`]; this
/// enum is what the facade converts both into.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session key was malformed; the session is rejected.
    #[error("session rejected: {0}")]
    Decode(#[from] DecodeError),

    /// A packet could not be written to the client.
    #[error(transparent)]
    Send(#[from] SendError),
}

/// The transport-encoded session key could not be decoded.
///
/// Recoverable at the authentication layer: the session is rejected and
/// the key is never used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Hex needs two characters per byte.
    #[error("session key has an odd number of hex digits")]
    OddLength,

    /// A character outside `0-9a-fA-F`.
    #[error("invalid hex character {c:?} at position {index}")]
    InvalidCharacter { c: char, index: usize },

    /// `decode()` already succeeded once; the raw secret is immutable.
    #[error("session key is already decoded")]
    AlreadyDecoded,
}

impl From<hex::FromHexError> for DecodeError {
    fn from(err: hex::FromHexError) -> Self {
        match err {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                Self::InvalidCharacter { c, index }
            }
            // `InvalidStringLength` only comes from the fixed-size
            // decoders; `hex::decode` reports length problems as odd.
            _ => Self::OddLength,
        }
    }
}

/// Writing a packet to the client failed.
///
/// The connection is assumed dead; an outer layer will close it.
#[derive(Debug, thiserror::Error)]
#[error("failed to send opcode {opcode:#06x}: {source}")]
pub struct SendError {
    /// Server opcode of the packet that was being sent.
    pub opcode: u16,

    /// What the transport reported.
    #[source]
    pub source: TransportError,
}
