//! Codec trait and the plain (unencrypted header) realm codec.
//!
//! A "codec" turns typed packets into framed bytes and back. Header
//! encryption keyed by the session key is a different codec implementing
//! the same trait; it is not part of this workspace.
//!
//! # Framing
//!
//! ```text
//! server → client:  size: u16 BE | opcode: u16 LE | body
//! client → server:  size: u16 BE | opcode: u32 LE | body
//! ```
//!
//! `size` counts the opcode and the body, not itself.

use crate::opcode;
use crate::{ClientPacket, ProtocolError, ServerPacket};

const SIZE_FIELD_LEN: usize = 2;
const SERVER_OPCODE_LEN: usize = 2;
const CLIENT_OPCODE_LEN: usize = 4;
const CLIENT_HEADER_LEN: usize = SIZE_FIELD_LEN + CLIENT_OPCODE_LEN;

/// Encodes server packets and decodes client packets.
///
/// `Send + Sync + 'static` because a single codec instance is shared by
/// the receive loop and the delayed-logout timer task.
pub trait Codec: Send + Sync + 'static {
    /// Frames a server packet, header included.
    fn encode(&self, packet: &ServerPacket) -> Vec<u8>;

    /// Parses one complete client packet, header included.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the frame is truncated, its size
    /// field is wrong, or a logout opcode carries a body.
    fn decode(&self, data: &[u8]) -> Result<ClientPacket, ProtocolError>;
}

// ---------------------------------------------------------------------------
// PlainCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] with unencrypted headers.
///
/// ```rust
/// use realmkeep_protocol::{Codec, LogoutResult, PlainCodec, ServerPacket};
///
/// let bytes = PlainCodec.encode(&ServerPacket::LogoutResponse {
///     result: LogoutResult::Success,
///     instant: true,
/// });
/// assert_eq!(bytes, [0, 7, 0x4C, 0, 0, 0, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec;

impl Codec for PlainCodec {
    fn encode(&self, packet: &ServerPacket) -> Vec<u8> {
        let mut body = Vec::new();
        packet.write_body(&mut body);

        // The largest body we produce is 5 bytes, far below u16::MAX.
        let size = (SERVER_OPCODE_LEN + body.len()) as u16;

        let mut out = Vec::with_capacity(SIZE_FIELD_LEN + size as usize);
        out.extend_from_slice(&size.to_be_bytes());
        out.extend_from_slice(&packet.opcode().to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    fn decode(&self, data: &[u8]) -> Result<ClientPacket, ProtocolError> {
        if data.len() < CLIENT_HEADER_LEN {
            return Err(ProtocolError::Truncated {
                needed: CLIENT_HEADER_LEN,
                got: data.len(),
            });
        }

        let declared = u16::from_be_bytes([data[0], data[1]]) as usize;
        let actual = data.len() - SIZE_FIELD_LEN;
        if declared != actual {
            return Err(ProtocolError::SizeMismatch { declared, actual });
        }

        let code = u32::from_le_bytes([data[2], data[3], data[4], data[5]]);
        let body = &data[CLIENT_HEADER_LEN..];

        let packet = match code {
            opcode::CMSG_LOGOUT_REQUEST => ClientPacket::LogoutRequest,
            opcode::CMSG_LOGOUT_CANCEL => ClientPacket::LogoutCancel,
            opcode::CMSG_PLAYER_LOGOUT => ClientPacket::PlayerLogout,
            other => {
                return Ok(ClientPacket::Other {
                    opcode: other,
                    body: body.to_vec(),
                });
            }
        };

        if !body.is_empty() {
            return Err(ProtocolError::InvalidMessage(format!(
                "opcode {code:#06x} must have an empty body, got {} bytes",
                body.len()
            )));
        }

        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogoutResult;

    #[test]
    fn test_encode_logout_response_success_instant() {
        let bytes = PlainCodec.encode(&ServerPacket::LogoutResponse {
            result: LogoutResult::Success,
            instant: true,
        });
        assert_eq!(bytes, [0, 7, 76, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_encode_logout_response_denial_is_delayed() {
        let bytes = PlainCodec.encode(&ServerPacket::LogoutResponse {
            result: LogoutResult::FailureInCombat,
            instant: false,
        });
        assert_eq!(bytes, [0, 7, 76, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_logout_complete_has_empty_body() {
        let bytes = PlainCodec.encode(&ServerPacket::LogoutComplete);
        assert_eq!(bytes, [0, 2, 77, 0]);
    }

    #[test]
    fn test_encode_logout_cancel_ack_has_empty_body() {
        let bytes = PlainCodec.encode(&ServerPacket::LogoutCancelAck);
        assert_eq!(bytes, [0, 2, 79, 0]);
    }

    #[test]
    fn test_decode_logout_request() {
        let packet = PlainCodec.decode(&[0, 4, 75, 0, 0, 0]).unwrap();
        assert_eq!(packet, ClientPacket::LogoutRequest);
    }

    #[test]
    fn test_decode_logout_cancel() {
        let packet = PlainCodec.decode(&[0, 4, 78, 0, 0, 0]).unwrap();
        assert_eq!(packet, ClientPacket::LogoutCancel);
    }

    #[test]
    fn test_decode_player_logout() {
        let packet = PlainCodec.decode(&[0, 4, 74, 0, 0, 0]).unwrap();
        assert_eq!(packet, ClientPacket::PlayerLogout);
    }

    #[test]
    fn test_decode_unknown_opcode_keeps_body() {
        // CMSG_PING with sequence 0xEF and latency 0
        let data = [0, 12, 0xDC, 0x01, 0, 0, 0xEF, 0, 0, 0, 0, 0, 0, 0];
        let packet = PlainCodec.decode(&data).unwrap();
        assert_eq!(
            packet,
            ClientPacket::Other {
                opcode: 0x1DC,
                body: vec![0xEF, 0, 0, 0, 0, 0, 0, 0],
            }
        );
    }

    #[test]
    fn test_decode_short_frame_returns_truncated() {
        let result = PlainCodec.decode(&[0, 4, 75]);
        assert!(matches!(
            result,
            Err(ProtocolError::Truncated { needed: 6, got: 3 })
        ));
    }

    #[test]
    fn test_decode_wrong_size_field_returns_mismatch() {
        let result = PlainCodec.decode(&[0, 9, 75, 0, 0, 0]);
        assert!(matches!(
            result,
            Err(ProtocolError::SizeMismatch { declared: 9, actual: 4 })
        ));
    }

    #[test]
    fn test_decode_logout_request_with_body_is_invalid() {
        let result = PlainCodec.decode(&[0, 5, 75, 0, 0, 0, 1]);
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }
}
