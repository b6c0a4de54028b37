//! Authenticated-session lifecycle for one realm connection.
//!
//! This crate handles two independent pieces of per-connection state:
//!
//! 1. **Session key custody**: turning the persisted hex session key
//!    into bytes exactly once and refusing access before that
//!    ([`SessionKey`]).
//! 2. **Deferred logout**: the request / grace period / cancel protocol,
//!    with a background timer that either completes or is cancelled,
//!    never both ([`LogoutCoordinator`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)  ← routes client opcodes, owns one RealmSession per connection
//!     ↕
//! Session Layer (this crate)  ← session key, logout state machine
//!     ↕
//! Protocol + Transport (below)  ← packets, framing, Connection trait
//! ```

mod config;
mod error;
mod key;
mod link;
mod logout;
mod world;

pub use config::{SessionConfig, LOGOUT_GRACE_PERIOD};
pub use error::{DecodeError, SendError, SessionError};
pub use key::{SessionKey, SessionRecord};
pub use link::ClientLink;
pub use logout::{LogoutCoordinator, LogoutOutcome, LogoutPhase};
pub use world::World;
