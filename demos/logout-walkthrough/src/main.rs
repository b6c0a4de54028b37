//! Walks one connection through a cancelled and a completed logout.
//!
//! Run with `RUST_LOG=debug cargo run -p logout-walkthrough` to see every
//! state transition.

use std::sync::Arc;
use std::time::Duration;

use realmkeep::prelude::*;

// ---------------------------------------------------------------------------
// In-process stand-ins for the socket and the world
// ---------------------------------------------------------------------------

struct LoggingConnection;

impl Connection for LoggingConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        tracing::info!(frame = ?data, "→ client");
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        ConnectionId::new(1)
    }
}

struct Overworld;

impl World for Overworld {
    fn remove_character(&self, character: CharacterId) {
        tracing::info!(%character, "removed from world");
    }
}

fn client_frame(op: u32) -> Vec<u8> {
    let mut frame = vec![0, 4];
    frame.extend_from_slice(&op.to_le_bytes());
    frame
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    realmkeep::init_logging();

    let record: SessionRecord = serde_json::from_str(
        r#"{ "account_id": 1, "session_key": "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef" }"#,
    )?;

    // A short grace period keeps the walkthrough quick.
    let session = RealmSessionBuilder::new()
        .logout_grace(Duration::from_secs(2))
        .authenticate(record, LoggingConnection, PlainCodec, Arc::new(Overworld))?;
    tracing::info!(key_len = session.session_key().secret().len(), "key decoded");

    session.enter_world(CharacterId(0xBEEF)).await;

    // Ask to log out, change our mind half-way.
    session.dispatch(&client_frame(opcode::CMSG_LOGOUT_REQUEST)).await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    session.dispatch(&client_frame(opcode::CMSG_LOGOUT_CANCEL)).await?;

    // Ask again and let the grace period run out.
    session.dispatch(&client_frame(opcode::CMSG_LOGOUT_REQUEST)).await?;
    tokio::time::sleep(Duration::from_secs(3)).await;

    session.teardown().await;
    Ok(())
}
