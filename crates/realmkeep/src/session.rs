//! Per-connection session: authentication gate and opcode routing.
//!
//! A [`RealmSession`] exists only for a connection whose session key
//! decoded successfully, so every holder of one can read the secret
//! without checking. The flow is:
//!   1. [`RealmSessionBuilder::authenticate`] → decode the key or reject
//!   2. [`RealmSession::enter_world`] → associate the played character
//!   3. [`RealmSession::dispatch`] → route client packets
//!   4. [`RealmSession::teardown`] → stop the logout timer

use std::sync::Arc;
use std::time::Duration;

use realmkeep_protocol::{AccountId, CharacterId, ClientPacket, Codec};
use realmkeep_session::{
    ClientLink, LogoutCoordinator, LogoutOutcome, SessionConfig, SessionKey,
    SessionRecord, World,
};
use realmkeep_transport::{Connection, ConnectionId};

use crate::RealmError;

/// Builder for authenticated realm sessions.
///
/// # Example
///
/// ```rust,ignore
/// let session = RealmSessionBuilder::new()
///     .instant_logout(false)
///     .authenticate(record, conn, PlainCodec, world)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RealmSessionBuilder {
    config: SessionConfig,
}

impl RealmSessionBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the delayed-logout grace period.
    pub fn logout_grace(mut self, grace: Duration) -> Self {
        self.config.logout_grace = grace;
        self
    }

    /// Makes every accepted logout complete immediately.
    pub fn instant_logout(mut self, instant: bool) -> Self {
        self.config.instant_logout = instant;
        self
    }

    /// Decodes the record's session key and opens the session.
    ///
    /// # Errors
    /// Returns [`RealmError::Session`] wrapping a
    /// [`DecodeError`](realmkeep_session::DecodeError) if the key is malformed. Nothing
    /// about the connection should be trusted in that case.
    pub fn authenticate<C, K, W>(
        self,
        record: SessionRecord,
        conn: C,
        codec: K,
        world: Arc<W>,
    ) -> Result<RealmSession<C, K, W>, RealmError>
    where
        C: Connection,
        K: Codec,
        W: World,
    {
        let connection_id = conn.id();
        let mut key = SessionKey::from(record);

        if let Err(e) = key.decode() {
            tracing::warn!(
                %connection_id,
                account_id = %key.account_id(),
                error = %e,
                "rejecting session with malformed key"
            );
            return Err(e.into());
        }

        tracing::info!(%connection_id, account_id = %key.account_id(), "session authenticated");

        let link = Arc::new(ClientLink::new(conn, codec));
        let logout = LogoutCoordinator::new(
            Arc::clone(&link),
            world,
            self.config.logout_grace,
        );

        Ok(RealmSession {
            key,
            link,
            logout,
            config: self.config,
        })
    }
}

/// One authenticated client connection.
pub struct RealmSession<C, K, W> {
    key: SessionKey,
    link: Arc<ClientLink<C, K>>,
    logout: LogoutCoordinator<C, K, W>,
    config: SessionConfig,
}

impl<C, K, W> RealmSession<C, K, W>
where
    C: Connection,
    K: Codec,
    W: World,
{
    /// The decoded session key.
    pub fn session_key(&self) -> &SessionKey {
        &self.key
    }

    /// The account this session belongs to.
    pub fn account_id(&self) -> AccountId {
        self.key.account_id()
    }

    /// Identifier of the underlying connection.
    pub fn id(&self) -> ConnectionId {
        self.link.id()
    }

    /// The client link (connection, codec, character association).
    pub fn link(&self) -> &ClientLink<C, K> {
        &self.link
    }

    /// The logout state machine for this connection.
    pub fn logout(&self) -> &LogoutCoordinator<C, K, W> {
        &self.logout
    }

    /// Associates the character the client is now playing.
    pub async fn enter_world(&self, character: CharacterId) {
        self.link.enter_world(character).await;
    }

    /// The character currently played, if any.
    pub async fn character(&self) -> Option<CharacterId> {
        self.link.character().await
    }

    /// Decodes one client frame and routes it.
    ///
    /// Only the logout opcodes are handled here; anything else is logged
    /// and skipped.
    ///
    /// # Errors
    /// [`RealmError::Protocol`] for a malformed frame,
    /// [`RealmError::Session`] if a reply could not be written.
    pub async fn dispatch(&self, data: &[u8]) -> Result<(), RealmError> {
        match self.link.codec().decode(data)? {
            ClientPacket::LogoutRequest => {
                self.on_logout_request().await?;
            }
            ClientPacket::PlayerLogout => {
                self.logout.request_logout(true).await?;
            }
            ClientPacket::LogoutCancel => {
                self.on_logout_cancel_request().await?;
            }
            ClientPacket::Other { opcode, body } => {
                tracing::debug!(
                    connection_id = %self.id(),
                    opcode = format!("{opcode:#06x}"),
                    len = body.len(),
                    "ignoring unhandled opcode"
                );
            }
        }
        Ok(())
    }

    /// `CMSG_LOGOUT_REQUEST`: immediate when configured, delayed otherwise.
    pub async fn on_logout_request(&self) -> Result<LogoutOutcome, RealmError> {
        Ok(self.logout.request_logout(self.config.instant_logout).await?)
    }

    /// `CMSG_LOGOUT_CANCEL`.
    ///
    /// Returns `true` if a pending logout was cancelled.
    pub async fn on_logout_cancel_request(&self) -> Result<bool, RealmError> {
        Ok(self.logout.cancel_logout().await?)
    }

    /// Ends the session. A pending logout is cancelled; a completion
    /// already in progress is waited for.
    pub async fn teardown(self) {
        self.logout.shutdown().await;
        tracing::info!(
            connection_id = %self.link.id(),
            account_id = %self.key.account_id(),
            "session closed"
        );
    }
}
