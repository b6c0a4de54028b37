//! Wire protocol for Realmkeep.
//!
//! This crate defines what the realm server and the client say to each
//! other about logging out:
//!
//! - **Types** ([`AccountId`], [`CharacterId`], [`LogoutResult`]) shared by
//!   every layer above the wire.
//! - **Packets** ([`ServerPacket`], [`ClientPacket`]) for the logout opcodes.
//! - **Codec** ([`Codec`] trait, [`PlainCodec`]) for framing them.
//! - **Errors** ([`ProtocolError`]) for malformed client frames.
//!
//! ```text
//! Transport (bytes) → Protocol (packets) → Session (logout, session key)
//! ```

mod codec;
mod error;
pub mod opcode;
mod packet;
mod types;

pub use codec::{Codec, PlainCodec};
pub use error::ProtocolError;
pub use packet::{ClientPacket, ServerPacket};
pub use types::{AccountId, CharacterId, LogoutResult};
