//! Authenticated session lifecycle
//!
//! A [`Session`] is built at the composition root and handed to the store
//! constructors. The scheduling core only ever reads the resolved [`UserId`].
//!
//! ```text
//! Anonymous ──begin──▶ Authenticating ──complete──▶ Authenticated ──sign_out──▶ SignedOut
//!     ▲                      │                                                     │
//!     └──────── fail ────────┘◀──────────────────────begin─────────────────────────┘
//! ```

use super::errors::AgendaError;
use super::ids::UserId;
use super::result::Result;
use crate::config::SecretString;

/// Current state of a session
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No sign-in attempted yet
    Anonymous,

    /// Sign-in request in flight
    Authenticating,

    /// Signed in
    Authenticated {
        /// Resolved user identifier
        user_id: UserId,
        /// Bearer token for stores that need one
        access_token: Option<SecretString>,
    },

    /// Explicitly signed out
    SignedOut,
}

/// Explicit session object replacing ambient auth state
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an anonymous session
    pub fn new() -> Self {
        Self {
            state: SessionState::Anonymous,
        }
    }

    /// Creates an already-authenticated session
    pub fn authenticated(user_id: UserId, access_token: Option<SecretString>) -> Self {
        Self {
            state: SessionState::Authenticated {
                user_id,
                access_token,
            },
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Short name of the current state, for logs
    pub fn state_name(&self) -> &'static str {
        match self.state {
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated { .. } => "authenticated",
            SessionState::SignedOut => "signed-out",
        }
    }

    /// Marks a sign-in attempt as started
    pub fn begin_authentication(&mut self) -> Result<()> {
        match self.state {
            SessionState::Anonymous | SessionState::SignedOut => {
                self.state = SessionState::Authenticating;
                Ok(())
            }
            _ => Err(self.illegal("begin authentication")),
        }
    }

    /// Records a successful sign-in
    pub fn complete_authentication(
        &mut self,
        user_id: UserId,
        access_token: Option<SecretString>,
    ) -> Result<()> {
        match self.state {
            SessionState::Authenticating => {
                self.state = SessionState::Authenticated {
                    user_id,
                    access_token,
                };
                Ok(())
            }
            _ => Err(self.illegal("complete authentication")),
        }
    }

    /// Records a failed sign-in, returning to anonymous
    pub fn fail_authentication(&mut self) -> Result<()> {
        match self.state {
            SessionState::Authenticating => {
                self.state = SessionState::Anonymous;
                Ok(())
            }
            _ => Err(self.illegal("fail authentication")),
        }
    }

    /// Signs out an authenticated session
    pub fn sign_out(&mut self) -> Result<()> {
        match self.state {
            SessionState::Authenticated { .. } => {
                self.state = SessionState::SignedOut;
                Ok(())
            }
            _ => Err(self.illegal("sign out")),
        }
    }

    /// Whether the session is signed in
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    /// The signed-in user's identifier
    ///
    /// # Errors
    ///
    /// Returns [`AgendaError::Session`] when the session is not authenticated.
    pub fn user_id(&self) -> Result<&UserId> {
        match &self.state {
            SessionState::Authenticated { user_id, .. } => Ok(user_id),
            _ => Err(AgendaError::Session(format!(
                "No signed-in user (session is {})",
                self.state_name()
            ))),
        }
    }

    /// Bearer token, if the session carries one
    pub fn access_token(&self) -> Option<&SecretString> {
        match &self.state {
            SessionState::Authenticated { access_token, .. } => access_token.as_ref(),
            _ => None,
        }
    }

    fn illegal(&self, action: &str) -> AgendaError {
        AgendaError::Session(format!(
            "Cannot {action} while session is {}",
            self.state_name()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use secrecy::ExposeSecret;

    fn user() -> UserId {
        UserId::new("u-1").unwrap()
    }

    #[test]
    fn test_full_lifecycle() {
        let mut session = Session::new();
        assert!(session.user_id().is_err());

        session.begin_authentication().unwrap();
        assert_eq!(session.state_name(), "authenticating");

        session
            .complete_authentication(user(), Some(secret_string("jwt".to_string())))
            .unwrap();
        assert_eq!(session.user_id().unwrap().as_str(), "u-1");
        assert_eq!(session.access_token().unwrap().expose_secret(), "jwt");

        session.sign_out().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());

        session.begin_authentication().unwrap();
    }

    #[test]
    fn test_failed_sign_in_returns_to_anonymous() {
        let mut session = Session::new();
        session.begin_authentication().unwrap();
        session.fail_authentication().unwrap();
        assert_eq!(session.state_name(), "anonymous");
    }

    #[test]
    fn test_illegal_transitions() {
        let mut session = Session::new();
        assert!(matches!(
            session.complete_authentication(user(), None),
            Err(AgendaError::Session(_))
        ));
        assert!(session.sign_out().is_err());

        let mut signed_in = Session::authenticated(user(), None);
        assert!(signed_in.begin_authentication().is_err());
        assert!(signed_in.fail_authentication().is_err());
    }
}
