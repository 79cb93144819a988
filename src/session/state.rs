//! Session state machine.

use std::fmt;

/// Lifecycle state of a DataStacks session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Connected, credentials not yet sent.
    #[default]
    Init,
    /// Credentials sent, waiting for the server's answer.
    Authenticating,
    /// Handshake finished; requests may be issued.
    Interactive,
    /// Connection closed; the session cannot be reused.
    Terminated,
}

impl SessionState {
    /// Check if transition to target state is valid.
    ///
    /// Only forward moves are allowed:
    /// - Init -> Authenticating
    /// - Authenticating -> Interactive
    /// - any non-terminal state -> Terminated
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (*self, target),
            (Init, Authenticating)
                | (Authenticating, Interactive)
                | (Init, Terminated)
                | (Authenticating, Terminated)
                | (Interactive, Terminated)
        )
    }

    /// Attempt to transition to a new state.
    ///
    /// On failure the state is left unchanged.
    pub fn transition_to(&mut self, target: SessionState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::ShellError::InvalidStateTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Terminated)
    }

    /// Check if the session accepts requests.
    pub fn is_interactive(&self) -> bool {
        matches!(self, SessionState::Interactive)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Init => "init",
            SessionState::Authenticating => "authenticating",
            SessionState::Interactive => "interactive",
            SessionState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
