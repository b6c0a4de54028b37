//! Error types for the protocol layer.
//!
//! Each crate in Realmkeep defines its own error enum. A `ProtocolError`
//! always means the bytes were wrong, never that the network failed.

/// Errors that can occur while decoding realm packets.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Fewer bytes than a complete header.
    #[error("truncated packet: need at least {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    /// The size field disagrees with the number of bytes received.
    #[error("size mismatch: header says {declared} bytes, got {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    /// The packet decoded but breaks protocol rules, e.g. a body on an
    /// opcode that must be empty.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
