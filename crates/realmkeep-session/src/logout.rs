//! Deferred logout: request, grace period, cancel.
//!
//! A client asks to log out; the server either finishes right away or
//! grants a grace period during which the client may change its mind.
//!
//! ```text
//!   Idle ──request(immediate)──→ Completing ──→ Idle
//!     │
//!     └──request(delayed)──→ Pending ──(grace elapsed, timer claims)──→ Completing ──→ Idle
//!                               │
//!                               └──(cancel claims)──→ Idle
//! ```
//!
//! # Race handling
//!
//! The timer task and the connection's receive loop both try to leave
//! `Pending`. Each does so by locking the state and replacing `Pending`
//! with something else; whoever takes the lock first wins and the loser
//! sees a state that is no longer `Pending` (or is a newer `Pending`,
//! distinguished by its generation). Once the timer has moved the state to
//! `Completing`, cancellation only acknowledges: the completion procedure
//! always runs to the end.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use realmkeep_protocol::{Codec, LogoutResult, ServerPacket};
use realmkeep_transport::Connection;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{ClientLink, SendError, World};

// ---------------------------------------------------------------------------
// Public result types
// ---------------------------------------------------------------------------

/// What [`LogoutCoordinator::request_logout`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The completion procedure ran before returning.
    Completed,

    /// A grace-period timer was armed.
    Pending,

    /// A logout was already pending or completing; nothing new was armed.
    AlreadyPending,

    /// The world refused the logout with this code.
    Denied(LogoutResult),

    /// No character is associated with the connection.
    NotInWorld,
}

/// Observable phase of a coordinator, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutPhase {
    /// No logout in progress.
    Idle,
    /// A grace-period timer is armed and may still be cancelled.
    Pending,
    /// The completion procedure is running and can no longer be cancelled.
    Completing,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

enum LogoutState {
    Idle,

    /// `cancel` and `timer` exist only in this variant, so "cancel handle
    /// present iff pending" holds by construction.
    Pending {
        generation: u64,
        cancel: oneshot::Sender<()>,
        timer: JoinHandle<()>,
    },

    /// `timer` is `None` on the immediate path, which completes inline.
    Completing { timer: Option<JoinHandle<()>> },
}

impl LogoutState {
    fn phase(&self) -> LogoutPhase {
        match self {
            Self::Idle => LogoutPhase::Idle,
            Self::Pending { .. } => LogoutPhase::Pending,
            Self::Completing { .. } => LogoutPhase::Completing,
        }
    }
}

// ---------------------------------------------------------------------------
// LogoutCoordinator
// ---------------------------------------------------------------------------

/// Per-connection logout state machine.
///
/// Exactly one per live connection. Its state is private: only
/// [`request_logout`](Self::request_logout),
/// [`cancel_logout`](Self::cancel_logout), [`shutdown`](Self::shutdown)
/// and the timer task it spawns may move it.
pub struct LogoutCoordinator<C, K, W> {
    link: Arc<ClientLink<C, K>>,
    world: Arc<W>,
    grace: Duration,
    state: Arc<Mutex<LogoutState>>,
    generation: AtomicU64,
}

impl<C, K, W> LogoutCoordinator<C, K, W>
where
    C: Connection,
    K: Codec,
    W: World,
{
    /// Creates an idle coordinator for `link`.
    pub fn new(link: Arc<ClientLink<C, K>>, world: Arc<W>, grace: Duration) -> Self {
        Self {
            link,
            world,
            grace,
            state: Arc::new(Mutex::new(LogoutState::Idle)),
            generation: AtomicU64::new(0),
        }
    }

    /// Handles a logout request.
    ///
    /// A request while a logout is pending or completing is re-acknowledged
    /// and changes nothing. Otherwise the world may deny it; if not, sends
    /// `SMSG_LOGOUT_RESPONSE`, then either waits for the completion
    /// procedure (`immediate`) or arms the grace-period timer and returns
    /// without waiting for it.
    ///
    /// # Errors
    /// Returns [`SendError`] if a packet could not be written. When the
    /// response itself fails nothing else happens; when the completion
    /// notice fails the character has still been removed.
    pub async fn request_logout(
        &self,
        immediate: bool,
    ) -> Result<LogoutOutcome, SendError> {
        let connection_id = self.link.id();

        let Some(character) = self.link.character().await else {
            debug!(%connection_id, "logout requested with no character in world");
            return Ok(LogoutOutcome::NotInWorld);
        };

        let mut state = self.state.lock().await;

        if !matches!(*state, LogoutState::Idle) {
            drop(state);
            self.link
                .send(ServerPacket::LogoutResponse {
                    result: LogoutResult::Success,
                    instant: false,
                })
                .await?;
            debug!(%connection_id, %character, "logout already in progress");
            return Ok(LogoutOutcome::AlreadyPending);
        }

        // The world is only asked when nothing is in flight, so a denial
        // never contradicts an armed timer.
        let result = self.world.check_logout(character);
        if !result.is_success() {
            drop(state);
            self.link
                .send(ServerPacket::LogoutResponse {
                    result,
                    instant: false,
                })
                .await?;
            info!(%connection_id, %character, %result, "logout denied");
            return Ok(LogoutOutcome::Denied(result));
        }

        self.link
            .send(ServerPacket::LogoutResponse {
                result: LogoutResult::Success,
                instant: immediate,
            })
            .await?;

        if immediate {
            *state = LogoutState::Completing { timer: None };

            // Runs as its own task so the completion still finishes, and
            // the state still returns to idle, if this future is dropped.
            let completion = tokio::spawn(complete_then_idle(
                Arc::clone(&self.state),
                Arc::clone(&self.link),
                Arc::clone(&self.world),
            ));
            drop(state);

            let completed = match completion.await {
                Ok(completed) => completed,
                // Never aborted, so only a panic in the world ends up here.
                Err(e) => std::panic::resume_unwind(e.into_panic()),
            };
            completed?;
            return Ok(LogoutOutcome::Completed);
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let (cancel, cancelled) = oneshot::channel();

        // Spawned while the lock is held, so the timer cannot claim the
        // state before `Pending` is stored below.
        let timer = tokio::spawn(run_timer(
            generation,
            self.grace,
            cancelled,
            Arc::clone(&self.state),
            Arc::clone(&self.link),
            Arc::clone(&self.world),
        ));

        *state = LogoutState::Pending {
            generation,
            cancel,
            timer,
        };

        debug!(
            %connection_id,
            %character,
            grace = ?self.grace,
            "logout pending"
        );
        Ok(LogoutOutcome::Pending)
    }

    /// Handles a logout cancel.
    ///
    /// If a logout is pending, stops its timer and returns to idle. An
    /// acknowledgement is sent whether or not anything was pending.
    ///
    /// Returns `true` if a pending logout was cancelled.
    ///
    /// # Errors
    /// Returns [`SendError`] if the acknowledgement could not be written.
    /// The cancellation itself has already taken effect by then.
    pub async fn cancel_logout(&self) -> Result<bool, SendError> {
        let cancelled = {
            let mut state = self.state.lock().await;
            match mem::replace(&mut *state, LogoutState::Idle) {
                LogoutState::Pending { cancel, timer, .. } => {
                    let _ = cancel.send(());
                    timer.abort();
                    true
                }
                other => {
                    *state = other;
                    false
                }
            }
        };

        if cancelled {
            info!(connection_id = %self.link.id(), "logout cancelled");
        } else {
            debug!(connection_id = %self.link.id(), "logout cancel with nothing pending");
        }

        self.link.send(ServerPacket::LogoutCancelAck).await?;
        Ok(cancelled)
    }

    /// Stops any pending timer and waits for a running completion.
    ///
    /// Call on connection teardown. Afterwards no task spawned by this
    /// coordinator is still running.
    pub async fn shutdown(&self) {
        let timer = {
            let mut state = self.state.lock().await;
            match mem::replace(&mut *state, LogoutState::Idle) {
                LogoutState::Pending { cancel, timer, .. } => {
                    let _ = cancel.send(());
                    Some(timer)
                }
                LogoutState::Completing { timer } => {
                    *state = LogoutState::Completing { timer: None };
                    timer
                }
                LogoutState::Idle => None,
            }
        };

        if let Some(timer) = timer {
            // A cancelled timer returns as soon as it sees the signal.
            if let Err(e) = timer.await {
                warn!(connection_id = %self.link.id(), error = %e, "logout timer task failed");
            }
        }
    }

    /// Current phase.
    pub async fn phase(&self) -> LogoutPhase {
        self.state.lock().await.phase()
    }

    /// Whether a grace-period timer is armed.
    pub async fn is_pending(&self) -> bool {
        self.phase().await == LogoutPhase::Pending
    }

    /// The grace period used for delayed logouts.
    pub fn grace_period(&self) -> Duration {
        self.grace
    }
}

impl<C, K, W> Drop for LogoutCoordinator<C, K, W> {
    /// Signals a pending timer so it never touches a torn-down connection.
    ///
    /// A completion that already started keeps running; it only holds
    /// `Arc`s, so nothing it uses can be freed underneath it.
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_lock() {
            if let LogoutState::Pending { cancel, timer, .. } =
                mem::replace(&mut *state, LogoutState::Idle)
            {
                let _ = cancel.send(());
                timer.abort();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Timer task and completion procedure
// ---------------------------------------------------------------------------

async fn run_timer<C, K, W>(
    generation: u64,
    grace: Duration,
    cancelled: oneshot::Receiver<()>,
    state: Arc<Mutex<LogoutState>>,
    link: Arc<ClientLink<C, K>>,
    world: Arc<W>,
) where
    C: Connection,
    K: Codec,
    W: World,
{
    tokio::select! {
        () = tokio::time::sleep(grace) => {}
        _ = cancelled => {
            debug!(connection_id = %link.id(), generation, "logout timer cancelled");
            return;
        }
    }

    // Claim: only the timer that armed the current `Pending` may proceed.
    {
        let mut guard = state.lock().await;
        match mem::replace(&mut *guard, LogoutState::Idle) {
            LogoutState::Pending {
                generation: current,
                timer,
                ..
            } if current == generation => {
                *guard = LogoutState::Completing { timer: Some(timer) };
            }
            other => {
                *guard = other;
                debug!(connection_id = %link.id(), generation, "logout timer lost the claim");
                return;
            }
        }
    }

    let connection_id = link.id();
    if let Err(e) = complete_then_idle(state, link, world).await {
        warn!(
            %connection_id,
            error = %e,
            "logout completed but the client was not notified"
        );
    }
}

/// Runs the completion procedure, then returns the state to `Idle`.
async fn complete_then_idle<C, K, W>(
    state: Arc<Mutex<LogoutState>>,
    link: Arc<ClientLink<C, K>>,
    world: Arc<W>,
) -> Result<(), SendError>
where
    C: Connection,
    K: Codec,
    W: World,
{
    let completed = complete(&link, world.as_ref()).await;
    *state.lock().await = LogoutState::Idle;
    completed
}

/// Notifies the client, removes the character, clears the association.
///
/// The character is removed even when the notification fails, so a
/// started completion never leaves the character half logged out.
async fn complete<C, K, W>(link: &ClientLink<C, K>, world: &W) -> Result<(), SendError>
where
    C: Connection,
    K: Codec,
    W: World,
{
    let sent = link.send(ServerPacket::LogoutComplete).await;

    if let Some(character) = link.take_character().await {
        world.remove_character(character);
        info!(connection_id = %link.id(), %character, "character logged out");
    }

    sent
}
