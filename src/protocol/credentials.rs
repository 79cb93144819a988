//! Handshake credentials.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio_util::bytes::Bytes;

/// Password sent to the server as the first message of a session.
///
/// Serializes to `{"password":"<value>"}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    password: String,
}

impl Credentials {
    /// Create credentials for the given password.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// The plain-text password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Encode as the compact JSON handshake payload.
    pub fn to_payload(&self) -> crate::Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"<redacted>")
            .finish()
    }
}
