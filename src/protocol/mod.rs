//! DataStacks wire protocol.
//!
//! A session starts with a JSON credentials message answered by the
//! server, after which every request is an opaque command line
//! (`GET key`, `SET key "value"`, `PING`, ...) answered by one response.

mod codec;
mod credentials;

pub use codec::{Framing, WireCodec, LEGACY_READ_SIZE, MAX_FRAME_LENGTH, MAX_LINE_LENGTH};
pub use credentials::Credentials;

/// Exact server reply that confirms a successful handshake.
pub const AUTH_OK: &str = "OK";

/// Result of the password handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Server replied with exactly [`AUTH_OK`].
    Authorized,
    /// Server replied with something else.
    Unconfirmed(String),
}

impl AuthOutcome {
    /// Classify a decoded handshake reply.
    pub fn from_response(response: &str) -> Self {
        if response == AUTH_OK {
            AuthOutcome::Authorized
        } else {
            AuthOutcome::Unconfirmed(response.to_string())
        }
    }

    /// Check if the server confirmed the password.
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthOutcome::Authorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_exact_ok_authorizes() {
        assert!(AuthOutcome::from_response("OK").is_authorized());
        assert_eq!(
            AuthOutcome::from_response("OK\n"),
            AuthOutcome::Unconfirmed("OK\n".into())
        );
        assert!(!AuthOutcome::from_response("ok").is_authorized());
        assert!(!AuthOutcome::from_response("").is_authorized());
    }
}
