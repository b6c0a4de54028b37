//! Opcode numbers for the logout family of realm messages.
//!
//! Client opcodes travel as `u32`, server opcodes as `u16`; the two
//! directions use differently sized headers.

/// Client → server: `CMSG_PLAYER_LOGOUT`.
pub const CMSG_PLAYER_LOGOUT: u32 = 0x004A;
/// Client → server: `CMSG_LOGOUT_REQUEST`.
pub const CMSG_LOGOUT_REQUEST: u32 = 0x004B;
/// Client → server: `CMSG_LOGOUT_CANCEL`.
pub const CMSG_LOGOUT_CANCEL: u32 = 0x004E;

/// Server → client: `SMSG_LOGOUT_RESPONSE`.
pub const SMSG_LOGOUT_RESPONSE: u16 = 0x004C;
/// Server → client: `SMSG_LOGOUT_COMPLETE`.
pub const SMSG_LOGOUT_COMPLETE: u16 = 0x004D;
/// Server → client: `SMSG_LOGOUT_CANCEL_ACK`.
pub const SMSG_LOGOUT_CANCEL_ACK: u16 = 0x004F;
