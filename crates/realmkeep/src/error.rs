//! Unified error type for Realmkeep.

use realmkeep_protocol::ProtocolError;
use realmkeep_session::{DecodeError, SendError, SessionError};

/// Top-level error that wraps the sub-crate errors.
///
/// When using the `realmkeep` facade you deal with this single error
/// type. The `#[from]` attributes generate `From` impls so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RealmError {
    /// A client frame could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session layer rejected the key or failed to reach the client.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<DecodeError> for RealmError {
    fn from(err: DecodeError) -> Self {
        Self::Session(err.into())
    }
}

impl From<SendError> for RealmError {
    fn from(err: SendError) -> Self {
        Self::Session(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use realmkeep_transport::TransportError;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let realm_err: RealmError = err.into();
        assert!(matches!(realm_err, RealmError::Protocol(_)));
    }

    #[test]
    fn test_from_decode_error_mentions_rejection() {
        let realm_err: RealmError = DecodeError::OddLength.into();
        assert!(matches!(
            realm_err,
            RealmError::Session(SessionError::Decode(DecodeError::OddLength))
        ));
        assert!(realm_err.to_string().starts_with("session rejected"));
    }

    #[test]
    fn test_from_send_error_keeps_transport_message() {
        let err = SendError {
            opcode: 0x4D,
            source: TransportError::ConnectionClosed("gone".into()),
        };
        let realm_err: RealmError = err.into();
        assert!(matches!(realm_err, RealmError::Session(SessionError::Send(_))));
        assert!(realm_err.to_string().contains("gone"));
        assert!(realm_err.to_string().contains("0x004d"));
    }
}
