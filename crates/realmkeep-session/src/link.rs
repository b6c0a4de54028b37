//! The server's handle to one connected client.

use realmkeep_protocol::{CharacterId, Codec, ServerPacket};
use realmkeep_transport::{Connection, ConnectionId};
use tokio::sync::Mutex;

use crate::SendError;

/// A client connection plus the state the connection holds for it.
///
/// Shared (through `Arc`) by the receive loop and the delayed-logout
/// timer task. The only mutable part is the character association, set
/// when the client enters the world and cleared when it logs out.
pub struct ClientLink<C, K> {
    conn: C,
    codec: K,
    character: Mutex<Option<CharacterId>>,
}

impl<C: Connection, K: Codec> ClientLink<C, K> {
    /// Wraps a connection. No character is associated yet.
    pub fn new(conn: C, codec: K) -> Self {
        Self {
            conn,
            codec,
            character: Mutex::new(None),
        }
    }

    /// Encodes and sends one packet.
    ///
    /// # Errors
    /// Returns [`SendError`] if the transport rejects the write.
    pub async fn send(&self, packet: ServerPacket) -> Result<(), SendError> {
        let bytes = self.codec.encode(&packet);
        tracing::trace!(
            connection_id = %self.conn.id(),
            opcode = packet.opcode(),
            len = bytes.len(),
            "sending packet"
        );
        self.conn.send(&bytes).await.map_err(|source| SendError {
            opcode: packet.opcode(),
            source,
        })
    }

    /// Associates a character with this connection.
    pub async fn enter_world(&self, character: CharacterId) {
        *self.character.lock().await = Some(character);
        tracing::debug!(connection_id = %self.conn.id(), %character, "character entered world");
    }

    /// The character currently played on this connection, if any.
    pub async fn character(&self) -> Option<CharacterId> {
        *self.character.lock().await
    }

    /// Clears the character association, returning what was there.
    pub(crate) async fn take_character(&self) -> Option<CharacterId> {
        self.character.lock().await.take()
    }

    /// Identifier of the underlying connection.
    pub fn id(&self) -> ConnectionId {
        self.conn.id()
    }

    /// The underlying connection.
    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// The codec packets are framed with.
    pub fn codec(&self) -> &K {
        &self.codec
    }
}
