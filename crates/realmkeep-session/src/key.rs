//! Session key custody.
//!
//! The session key is the secret both sides derived during login. The
//! realm server gets it as a hex string (from the login server's session
//! row) and must turn it into bytes before it can verify or encrypt any
//! packet for that account.
//!
//! A key starts [`Undecoded`](KeyState::Undecoded) and becomes
//! [`Decoded`](KeyState::Decoded) exactly once. There is no state in which
//! "decoded but empty" can be observed: reading the secret early is a bug
//! in the caller and panics.

use std::fmt;

use realmkeep_protocol::AccountId;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::DecodeError;

/// A persisted session row, as stored by the login server.
///
/// ```rust
/// use realmkeep_session::{SessionKey, SessionRecord};
///
/// let record: SessionRecord =
///     serde_json::from_str(r#"{ "account_id": 3, "session_key": "a1b2" }"#).unwrap();
/// let mut key = SessionKey::from(record);
/// key.decode().unwrap();
/// assert_eq!(key.secret(), &[0xA1, 0xB2]);
/// ```
#[derive(Clone, Deserialize)]
pub struct SessionRecord {
    /// Account the key belongs to.
    pub account_id: AccountId,

    /// Hex-encoded session key.
    pub session_key: String,
}

impl fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRecord")
            .field("account_id", &self.account_id)
            .field("session_key", &"[REDACTED]")
            .finish()
    }
}

enum KeyState {
    Undecoded { encoded: String },
    Decoded { raw: Zeroizing<Vec<u8>> },
}

/// The shared secret for one account's connection.
pub struct SessionKey {
    account_id: AccountId,
    state: KeyState,
}

impl SessionKey {
    /// Length in bytes of the session keys the login server issues.
    ///
    /// Informational: [`decode`](Self::decode) accepts any even-length hex.
    pub const CANONICAL_LEN: usize = 40;

    /// Creates an undecoded key from its transport encoding.
    pub fn new(account_id: AccountId, encoded: impl Into<String>) -> Self {
        Self {
            account_id,
            state: KeyState::Undecoded {
                encoded: encoded.into(),
            },
        }
    }

    /// Decodes the hex form into the raw secret.
    ///
    /// On failure the key stays undecoded and must not be used to
    /// authenticate anything.
    ///
    /// # Errors
    /// - [`DecodeError::OddLength`] / [`DecodeError::InvalidCharacter`]:
    ///   the encoding is malformed
    /// - [`DecodeError::AlreadyDecoded`]: a previous call succeeded
    pub fn decode(&mut self) -> Result<(), DecodeError> {
        let KeyState::Undecoded { encoded } = &self.state else {
            return Err(DecodeError::AlreadyDecoded);
        };

        let raw = hex::decode(encoded)?;
        self.state = KeyState::Decoded {
            raw: Zeroizing::new(raw),
        };
        Ok(())
    }

    /// Returns the raw secret.
    ///
    /// # Panics
    /// If [`decode`](Self::decode) has not succeeded. That is a bug in the
    /// caller: sessions are only handed out after decoding.
    pub fn secret(&self) -> &[u8] {
        match &self.state {
            KeyState::Decoded { raw } => raw.as_slice(),
            KeyState::Undecoded { .. } => panic!(
                "session key for account {} read before decode()",
                self.account_id
            ),
        }
    }

    /// Returns the raw secret, or `None` if it has not been decoded.
    pub fn try_secret(&self) -> Option<&[u8]> {
        match &self.state {
            KeyState::Decoded { raw } => Some(raw.as_slice()),
            KeyState::Undecoded { .. } => None,
        }
    }

    /// Whether [`decode`](Self::decode) has succeeded.
    pub fn is_decoded(&self) -> bool {
        matches!(self.state, KeyState::Decoded { .. })
    }

    /// The account this key belongs to.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }
}

impl From<SessionRecord> for SessionKey {
    fn from(record: SessionRecord) -> Self {
        Self::new(record.account_id, record.session_key)
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKey")
            .field("account_id", &self.account_id)
            .field("decoded", &self.is_decoded())
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(encoded: &str) -> SessionKey {
        SessionKey::new(AccountId(1), encoded)
    }

    #[test]
    fn test_decode_a1b2_returns_two_bytes() {
        let mut k = key("a1b2");
        k.decode().expect("valid hex");
        assert_eq!(k.secret(), &[0xA1, 0xB2]);
    }

    #[test]
    fn test_decode_uppercase_hex_is_accepted() {
        let mut k = key("A1B2");
        k.decode().expect("valid hex");
        assert_eq!(k.secret(), &[0xA1, 0xB2]);
    }

    #[test]
    fn test_decode_empty_string_yields_empty_secret() {
        let mut k = key("");
        k.decode().expect("empty is even length");
        assert!(k.secret().is_empty());
        assert!(k.is_decoded());
    }

    #[test]
    fn test_decode_xyz_returns_error() {
        let mut k = key("xyz");
        assert_eq!(k.decode(), Err(DecodeError::OddLength));
        assert!(!k.is_decoded());
    }

    #[test]
    fn test_decode_non_hex_reports_position() {
        let mut k = key("a1zz");
        assert_eq!(
            k.decode(),
            Err(DecodeError::InvalidCharacter { c: 'z', index: 2 })
        );
        assert!(k.try_secret().is_none());
    }

    #[test]
    fn test_decode_twice_returns_already_decoded_and_keeps_secret() {
        let mut k = key("00ff");
        k.decode().unwrap();

        assert_eq!(k.decode(), Err(DecodeError::AlreadyDecoded));
        assert_eq!(k.secret(), &[0x00, 0xFF]);
    }

    #[test]
    #[should_panic(expected = "read before decode()")]
    fn test_secret_before_decode_panics() {
        let k = key("a1b2");
        let _ = k.secret();
    }

    #[test]
    #[should_panic(expected = "read before decode()")]
    fn test_secret_after_failed_decode_panics() {
        let mut k = key("xyz");
        let _ = k.decode();
        let _ = k.secret();
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut k = key("deadbeef");
        k.decode().unwrap();
        let printed = format!("{k:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("deadbeef"));
    }

    #[test]
    fn test_record_debug_redacts_encoded_key() {
        let record = SessionRecord {
            account_id: AccountId(9),
            session_key: "cafebabe".into(),
        };
        assert!(!format!("{record:?}").contains("cafebabe"));
    }

    #[test]
    fn test_record_into_key_keeps_account() {
        let record: SessionRecord = serde_json::from_str(
            r#"{ "account_id": 42, "session_key": "0102" }"#,
        )
        .unwrap();
        let k = SessionKey::from(record);
        assert_eq!(k.account_id(), AccountId(42));
        assert!(!k.is_decoded());
    }
}
