//! # Realmkeep
//!
//! Session key custody and deferred logout for realm server connections.
//!
//! One [`RealmSession`] per connection: it only exists once the account's
//! session key has decoded, and it routes the logout opcodes to a
//! per-connection [`LogoutCoordinator`](realmkeep_session::LogoutCoordinator).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use realmkeep::prelude::*;
//!
//! realmkeep::init_logging();
//!
//! let session = RealmSessionBuilder::new().authenticate(record, conn, PlainCodec, world)?;
//! session.enter_world(CharacterId(guid)).await;
//! while let Some(frame) = next_frame().await {
//!     session.dispatch(&frame).await?;
//! }
//! session.teardown().await;
//! ```

mod error;
mod logging;
mod session;

pub use error::RealmError;
pub use logging::init_logging;
pub use session::{RealmSession, RealmSessionBuilder};

/// Everything needed to run a realm session.
pub mod prelude {
    pub use crate::{init_logging, RealmError, RealmSession, RealmSessionBuilder};
    pub use realmkeep_protocol::opcode;
    pub use realmkeep_protocol::{
        AccountId, CharacterId, ClientPacket, Codec, LogoutResult, PlainCodec,
        ServerPacket,
    };
    pub use realmkeep_session::{
        ClientLink, DecodeError, LogoutCoordinator, LogoutOutcome, LogoutPhase,
        SendError, SessionConfig, SessionError, SessionKey, SessionRecord, World,
        LOGOUT_GRACE_PERIOD,
    };
    pub use realmkeep_transport::{Connection, ConnectionId, TransportError};
}
