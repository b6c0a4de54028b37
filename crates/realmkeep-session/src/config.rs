//! Session configuration.

use std::time::Duration;

/// How long the client counts down between a delayed logout request and
/// `SMSG_LOGOUT_COMPLETE`.
///
/// The client UI hard-codes a 20 second countdown, so the server must use
/// exactly this value in production.
pub const LOGOUT_GRACE_PERIOD: Duration = Duration::from_secs(20);

/// Configuration for per-connection session behavior.
///
/// Sensible defaults are provided; override only the fields you need:
///
/// ```rust
/// use realmkeep_session::SessionConfig;
///
/// let config = SessionConfig {
///     instant_logout: true,
///     ..SessionConfig::default()
/// };
/// assert!(config.instant_logout);
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Delay before a non-instant logout completes.
    ///
    /// Default: [`LOGOUT_GRACE_PERIOD`]. Only tests should change this.
    pub logout_grace: Duration,

    /// When `true`, every accepted logout request completes immediately
    /// (as in a rested area or for a game master).
    ///
    /// Default: `false`.
    pub instant_logout: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            logout_grace: LOGOUT_GRACE_PERIOD,
            instant_logout: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grace_matches_client_countdown() {
        let config = SessionConfig::default();
        assert_eq!(config.logout_grace, Duration::from_secs(20));
        assert!(!config.instant_logout);
    }
}
