//! Typed realm packets handled by this workspace.
//!
//! Only the logout family is modelled. Every other client opcode is kept
//! as [`ClientPacket::Other`] so the dispatcher can log and skip it.

use crate::opcode;
use crate::LogoutResult;

/// A packet the server sends to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPacket {
    /// `SMSG_LOGOUT_RESPONSE`: answer to a logout request.
    ///
    /// `instant` tells the client whether to skip the 20 second
    /// countdown. It is always `false` when `result` is a denial.
    LogoutResponse {
        result: LogoutResult,
        instant: bool,
    },

    /// `SMSG_LOGOUT_COMPLETE`: the character has left the world.
    LogoutComplete,

    /// `SMSG_LOGOUT_CANCEL_ACK`: acknowledges `CMSG_LOGOUT_CANCEL`.
    LogoutCancelAck,
}

impl ServerPacket {
    /// The `u16` server opcode for this packet.
    pub fn opcode(&self) -> u16 {
        match self {
            Self::LogoutResponse { .. } => opcode::SMSG_LOGOUT_RESPONSE,
            Self::LogoutComplete => opcode::SMSG_LOGOUT_COMPLETE,
            Self::LogoutCancelAck => opcode::SMSG_LOGOUT_CANCEL_ACK,
        }
    }

    /// Appends the packet body (everything after the header) to `out`.
    pub fn write_body(&self, out: &mut Vec<u8>) {
        if let Self::LogoutResponse { result, instant } = self {
            out.extend_from_slice(&result.as_u32().to_le_bytes());
            out.push(u8::from(*instant));
        }
    }
}

/// A packet received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientPacket {
    /// `CMSG_LOGOUT_REQUEST`: start a (possibly delayed) logout.
    LogoutRequest,

    /// `CMSG_LOGOUT_CANCEL`: abort a pending logout.
    LogoutCancel,

    /// `CMSG_PLAYER_LOGOUT`: log out without a countdown.
    PlayerLogout,

    /// Any opcode this workspace does not handle.
    Other { opcode: u32, body: Vec<u8> },
}

impl ClientPacket {
    /// The `u32` client opcode for this packet.
    pub fn opcode(&self) -> u32 {
        match self {
            Self::LogoutRequest => opcode::CMSG_LOGOUT_REQUEST,
            Self::LogoutCancel => opcode::CMSG_LOGOUT_CANCEL,
            Self::PlayerLogout => opcode::CMSG_PLAYER_LOGOUT,
            Self::Other { opcode, .. } => *opcode,
        }
    }
}
