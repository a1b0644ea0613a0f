//! Route guard for the map page.
//!
//! The session and profile lookups belong to the host application. This
//! state machine only decides what the map page should do while they
//! resolve.

/// Where the guard currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Session or profile still loading.
    Loading,
    /// No session.
    Unauthenticated,
    /// Signed in, but without the role this page requires.
    WrongRole,
    /// Signed in with the required role.
    Authorized,
}

/// Completion of an external session or profile fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Session lookup finished; `true` if a user is signed in.
    SessionResolved(bool),
    /// Profile lookup finished with the user's role.
    ProfileResolved(String),
    /// The user signed out.
    SignedOut,
}

/// Gatekeeper for a page that requires one role.
///
/// The two lookups may complete in either order. A profile that arrives
/// before the session is held until the session resolves, and only a
/// signed-in session can reach [`GuardState::Authorized`].
#[derive(Debug, Clone)]
pub struct RouteGuard {
    required_role: String,
    state: GuardState,
    signed_in: bool,
    role: Option<String>,
}

impl RouteGuard {
    /// Creates a guard in the [`GuardState::Loading`] state.
    #[must_use]
    pub fn new(required_role: impl Into<String>) -> Self {
        Self {
            required_role: required_role.into(),
            state: GuardState::Loading,
            signed_in: false,
            role: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    /// Applies an event and returns the new state.
    pub fn handle(&mut self, event: SessionEvent) -> GuardState {
        match event {
            SessionEvent::SignedOut | SessionEvent::SessionResolved(false) => {
                self.signed_in = false;
                self.role = None;
                self.state = GuardState::Unauthenticated;
            }
            SessionEvent::SessionResolved(true) => {
                self.signed_in = true;
                self.state = self.evaluate();
            }
            SessionEvent::ProfileResolved(role) => {
                if self.state != GuardState::Unauthenticated {
                    self.role = Some(role);
                    self.state = self.evaluate();
                }
            }
        }
        self.state
    }

    fn evaluate(&self) -> GuardState {
        match (&self.role, self.signed_in) {
            (Some(role), true) if *role == self.required_role => GuardState::Authorized,
            (Some(_), true) => GuardState::WrongRole,
            _ => GuardState::Loading,
        }
    }

    /// Path to send the user to, if the page must not render.
    #[must_use]
    pub const fn redirect(&self) -> Option<&'static str> {
        match self.state {
            GuardState::Unauthenticated => Some("/login"),
            GuardState::WrongRole => Some("/"),
            GuardState::Loading | GuardState::Authorized => None,
        }
    }
}
