//! Transport abstraction layer for Realmkeep.
//!
//! Provides the [`Connection`] trait: reliable, ordered delivery of
//! already-framed realm packets to a single connected client. The
//! concrete socket (plain TCP, a proxy, an in-memory pipe in tests) lives
//! outside this workspace and only has to implement this trait.

mod error;

pub use error::TransportError;

use std::fmt;
use std::future::Future;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A single client connection that packets can be written to.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → a connection is shared between the
///   receive loop and the delayed-logout timer task, which Tokio may run
///   on different worker threads.
/// - The returned futures are `Send` for the same reason: the timer task
///   awaits `send` from inside `tokio::spawn`.
pub trait Connection: Send + Sync + 'static {
    /// Writes one framed packet to the client.
    ///
    /// Delivery is reliable and ordered. An error means the connection
    /// is dead or broken; an outer layer is expected to close it.
    fn send(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "realm-a");
        map.insert(ConnectionId::new(2), "realm-b");
        assert_eq!(map[&ConnectionId::new(1)], "realm-a");
    }
}
