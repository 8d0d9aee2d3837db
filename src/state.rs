// 🧭 Application state - one explicit, serializable owner for view + session
//
// The club list is owned by ClubRegistry; this struct owns everything else a
// front end needs to remember between interactions.

use crate::auth::{login, AdminSession, CredentialVerifier};
use crate::error::AuthError;
use crate::mutator::RegistryMutator;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum View {
    #[default]
    Student,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChange {
    Switched(View),
    Unchanged,
    /// Admin view requested without a session; current view kept
    LoginRequired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub view: View,
    pub session: Option<AdminSession>,
    /// Mirrors `RegistryMutator::is_busy`; the admin submit control is disabled while set
    pub mutation_in_flight: bool,
    pub submission_in_flight: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn request_view(&mut self, view: View) -> ViewChange {
        if view == View::Admin && !self.is_authenticated() {
            return ViewChange::LoginRequired;
        }
        if self.view == view {
            return ViewChange::Unchanged;
        }
        self.view = view;
        ViewChange::Switched(view)
    }

    /// On success the session is installed and the admin view opened
    pub fn login(
        &mut self,
        verifier: &dyn CredentialVerifier,
        email: &str,
        password: &SecretString,
    ) -> Result<&AdminSession, AuthError> {
        let session = login(verifier, email, password)?;
        self.view = View::Admin;
        Ok(self.session.insert(session))
    }

    /// Drop the session and return to the student view
    pub fn logout(&mut self) -> Option<AdminSession> {
        let session = self.session.take();
        if let Some(session) = &session {
            info!(email = %session.email, "admin logged out");
        }
        self.view = View::Student;
        self.mutation_in_flight = false;
        session
    }

    pub fn sync_mutation(&mut self, mutator: &RegistryMutator) {
        self.mutation_in_flight = mutator.is_busy();
    }

    /// Whether the admin form may be submitted right now
    pub fn can_mutate(&self) -> bool {
        self.is_authenticated() && !self.mutation_in_flight
    }

    pub fn can_submit_registration(&self) -> bool {
        !self.submission_in_flight
    }
}

// ============================================================================
// TESTS
// ============================================================================
