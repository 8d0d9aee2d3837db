// Club Directory - Core Library
// Exposes all modules for use in the CLI/TUI, API server, and tests

pub mod entities;       // Colleges, branches, clubs and the shared registry
pub mod error;
pub mod validation;     // Field checks shared by clubs and registrations
pub mod mutator;        // Admin create/update/delete with simulated latency
pub mod auth;           // Admin credential checks
pub mod browse;         // Read-only student/dashboard projections
pub mod registration;   // Registration relay to the intake endpoint
pub mod state;
pub mod config;
pub mod telemetry;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use entities::{
    default_clubs, Branch, Club, ClubFields, ClubRegistry, College, CollegeClubs, PastEvent,
};
pub use error::{
    AuthError, MutationError, ParseEnumError, SubmissionError, ValidationError, ValidationErrors,
    ValidationResult,
};
pub use validation::{validate_club_fields, Validator, MIN_FOUNDING_YEAR};
pub use mutator::{MutationLatency, RegistryMutator};
pub use auth::{login, AdminSession, CredentialVerifier, StaticCredentials};
pub use browse::{BrowseView, CollegeSummary, RegistryStats, Selection};
pub use registration::{
    HttpIntakeClient, IntakeClient, IntakePayload, IntakeResponse, RegistrationForm,
    RegistrationSubmitter, SubmissionReceipt,
};
pub use state::{AppState, View, ViewChange};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
