//! Hook into the world simulation.
//!
//! Realmkeep does not own characters or the world they live in. The
//! [`World`] trait is the narrow interface the logout path needs: may
//! this character leave right now, and take it out of the world.

use realmkeep_protocol::{CharacterId, LogoutResult};

/// The world-state collaborator consulted by the logout path.
///
/// `Send + Sync + 'static` because the delayed-logout timer task calls
/// [`remove_character`](Self::remove_character) from whichever Tokio
/// worker it lands on.
///
/// # Example
///
/// ```rust
/// use realmkeep_protocol::{CharacterId, LogoutResult};
/// use realmkeep_session::World;
///
/// struct Arena;
///
/// impl World for Arena {
///     fn check_logout(&self, _character: CharacterId) -> LogoutResult {
///         // Nobody leaves the arena mid-fight.
///         LogoutResult::FailureInCombat
///     }
///
///     fn remove_character(&self, _character: CharacterId) {}
/// }
/// ```
pub trait World: Send + Sync + 'static {
    /// Decides whether `character` may log out now.
    ///
    /// Combat, a game-master freeze, or not standing on the ground are
    /// reported with the matching failure code. The default accepts
    /// every request.
    fn check_logout(&self, character: CharacterId) -> LogoutResult {
        let _ = character;
        LogoutResult::Success
    }

    /// Removes `character` from the world.
    ///
    /// Called exactly once per completed logout.
    fn remove_character(&self, character: CharacterId);
}
