// 🔐 Credential Checker - is this (email, password) pair an admin?
//
// Passwords are never stored: each admin is kept as the SHA-256 digest of
// "<email>:<password>". Verification sits behind `CredentialVerifier` so a
// real identity provider can replace the static list without touching callers.

use crate::error::AuthError;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

/// Seeded admins: (email, sha256("<email>:<password>"))
const DEFAULT_ADMINS: [(&str, &str); 3] = [
    (
        "admin@ggits.org",
        "3344ca4185dde6b881c31e4e355e29744affdf5492a83ce2eaa9a68dd83151b2",
    ),
    (
        "admin@ggct.org",
        "b6cb9d6c5edf76da13f9ec98cac5bea93338fbf178c93dff6d641df205e6f2f1",
    ),
    (
        "admin@ggce.org",
        "08067ce6ee92a6220888b9a7da4669a95142db8e032f31e4c1205a41121009b0",
    ),
];

// ============================================================================
// VERIFIER
// ============================================================================

pub trait CredentialVerifier: Send + Sync {
    /// Exact, case-sensitive match on both fields
    fn authenticate(&self, email: &str, password: &SecretString) -> bool;
}

/// Digest stored in place of a password
pub fn credential_digest(email: &str, password: &SecretString) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(password.expose_secret().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone)]
struct CredentialEntry {
    email: String,
    digest: String,
}

/// Process-wide allow-list, loaded at startup and never edited by users
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    entries: Vec<CredentialEntry>,
}

impl StaticCredentials {
    /// The three college admins
    pub fn new() -> Self {
        StaticCredentials {
            entries: DEFAULT_ADMINS
                .iter()
                .map(|(email, digest)| CredentialEntry {
                    email: email.to_string(),
                    digest: digest.to_string(),
                })
                .collect(),
        }
    }

    pub fn empty() -> Self {
        StaticCredentials {
            entries: Vec::new(),
        }
    }

    pub fn with_admin(mut self, email: &str, password: &SecretString) -> Self {
        self.entries.push(CredentialEntry {
            email: email.to_string(),
            digest: credential_digest(email, password),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn authenticate(&self, email: &str, password: &SecretString) -> bool {
        let digest = credential_digest(email, password);
        self.entries
            .iter()
            .any(|entry| entry.email == email && entry.digest == digest)
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// In-memory proof of a successful login; gone on logout or restart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub email: String,
    pub authenticated_at: DateTime<Utc>,
}

/// Check credentials and open a session
pub fn login(
    verifier: &dyn CredentialVerifier,
    email: &str,
    password: &SecretString,
) -> Result<AdminSession, AuthError> {
    if verifier.authenticate(email, password) {
        info!(email = %email, "admin authenticated");
        Ok(AdminSession {
            email: email.to_string(),
            authenticated_at: Utc::now(),
        })
    } else {
        warn!(email = %email, "admin authentication failed");
        Err(AuthError::InvalidCredentials)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_default_admins() {
        let creds = StaticCredentials::new();
        assert_eq!(creds.len(), 3);

        assert!(creds.authenticate("admin@ggits.org", &secret("admin123")));
        assert!(creds.authenticate("admin@ggct.org", &secret("admin123")));
        assert!(creds.authenticate("admin@ggce.org", &secret("admin123")));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let creds = StaticCredentials::new();
        assert!(!creds.authenticate("admin@ggits.org", &secret("wrong")));
        assert!(!creds.authenticate("admin@ggits.org", &secret("")));
        assert!(!creds.authenticate("admin@ggits.org", &secret("admin123 ")));
    }

    #[test]
    fn test_unknown_email_rejected() {
        let creds = StaticCredentials::new();
        assert!(!creds.authenticate("student@ggits.org", &secret("admin123")));
        assert!(!creds.authenticate("", &secret("admin123")));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let creds = StaticCredentials::new();
        assert!(!creds.authenticate("Admin@ggits.org", &secret("admin123")));
        assert!(!creds.authenticate("admin@ggits.org", &secret("ADMIN123")));
    }

    #[test]
    fn test_digest_binds_email() {
        let a = credential_digest("admin@ggits.org", &secret("admin123"));
        let b = credential_digest("admin@ggct.org", &secret("admin123"));
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(a, DEFAULT_ADMINS[0].1);
    }

    #[test]
    fn test_custom_admin() {
        let creds = StaticCredentials::empty().with_admin("dean@ggits.org", &secret("s3cret"));
        assert!(creds.authenticate("dean@ggits.org", &secret("s3cret")));
        assert!(!creds.authenticate("admin@ggits.org", &secret("admin123")));
    }

    #[test]
    fn test_login_opens_session() {
        let creds = StaticCredentials::new();

        let session = login(&creds, "admin@ggce.org", &secret("admin123")).unwrap();
        assert_eq!(session.email, "admin@ggce.org");
        assert!(session.authenticated_at <= Utc::now());

        let err = login(&creds, "admin@ggce.org", &secret("nope")).unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "Invalid email or password");
    }
}
