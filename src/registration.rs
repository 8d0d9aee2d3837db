// 📝 Registration Submitter - relay a student's pick to the intake endpoint
//
// Form → validate → resolve club → POST JSON → {"status": "success"}?
//   yes → caller opens the club's registration link, form resets
//   no  → human-readable failure, form kept for a retry
//
// The registry is only read here. Nothing about the student is stored.

use crate::entities::{Branch, ClubRegistry, College};
use crate::error::{SubmissionError, ValidationError, ValidationErrors};
use crate::validation::Validator;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

// ============================================================================
// STUDENT REGISTRATION (transient)
// ============================================================================

/// One submission attempt; discarded once handed to the intake endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRegistration {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub branch: Branch,
    pub club_id: String,
}

// ============================================================================
// REGISTRATION FORM
// ============================================================================

/// What the student has typed so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationForm {
    #[serde(rename = "selectedCollege")]
    pub college: College,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub branch: Option<Branch>,
    pub selected_club: Option<String>,
}

impl RegistrationForm {
    pub fn new(college: College) -> Self {
        RegistrationForm {
            college,
            ..RegistrationForm::default()
        }
    }

    /// Switching college always drops the club pick
    pub fn select_college(&mut self, college: College) {
        self.college = college;
        self.selected_club = None;
    }

    pub fn select_club(&mut self, club_id: impl Into<String>) {
        self.selected_club = Some(club_id.into());
    }

    /// Clear every field, keeping the college selection
    pub fn reset(&mut self) {
        *self = RegistrationForm::new(self.college);
    }

    /// A club must be picked before anything else is looked at
    pub fn validate(&self) -> Result<StudentRegistration, SubmissionError> {
        let club_id = self
            .selected_club
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(SubmissionError::ClubNotSelected)?;

        let mut v = Validator::new("Registration");
        v.require("full_name", &self.full_name)
            .require("phone_number", &self.phone_number);
        if self.email.trim().is_empty() {
            v.fail("email", "Required field is empty");
        } else if !self.email.contains('@') {
            v.fail("email", "Not an email address");
        }
        if self.branch.is_none() {
            v.fail("branch", "Required field is empty");
        }
        v.finish()?;

        let branch = self.branch.ok_or_else(|| {
            ValidationErrors::single(ValidationError::new(
                "Registration",
                "branch",
                "Required field is empty",
            ))
        })?;
        Ok(StudentRegistration {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            branch,
            club_id: club_id.to_string(),
        })
    }

    /// Validate, submit, and reset on success
    pub async fn submit(
        &mut self,
        submitter: &RegistrationSubmitter,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let registration = self.validate()?;
        let receipt = submitter.submit(&registration).await?;
        self.reset();
        Ok(receipt)
    }
}

// ============================================================================
// INTAKE WIRE FORMAT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakePayload {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub branch: Branch,
    pub selected_college: College,
    /// Club display name, not its id
    pub selected_club: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl IntakeResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Result handed back to the caller after a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Open this in a new browsing context
    pub open_url: String,
    pub club_id: String,
    pub club_name: String,
    pub college: College,
}

// ============================================================================
// INTAKE CLIENT
// ============================================================================

/// The external intake endpoint; mocked in tests
#[async_trait]
pub trait IntakeClient: Send + Sync {
    async fn send(&self, payload: &IntakePayload) -> Result<IntakeResponse, SubmissionError>;
}

pub struct HttpIntakeClient {
    client: reqwest::Client,
    url: String,
}

impl HttpIntakeClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpIntakeClient {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl IntakeClient for HttpIntakeClient {
    async fn send(&self, payload: &IntakePayload) -> Result<IntakeResponse, SubmissionError> {
        let response = self.client.post(&self.url).json(payload).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        debug!(status = status.as_u16(), content_type = %content_type, "intake responded");

        let body = response.text().await?;

        if !status.is_success() {
            return Err(SubmissionError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        if !content_type.contains("application/json") {
            return Err(SubmissionError::NonJson { content_type, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

// ============================================================================
// SUBMITTER
// ============================================================================

#[derive(Clone)]
pub struct RegistrationSubmitter {
    registry: ClubRegistry,
    client: Arc<dyn IntakeClient>,
}

impl RegistrationSubmitter {
    pub fn new(registry: ClubRegistry, client: Arc<dyn IntakeClient>) -> Self {
        RegistrationSubmitter { registry, client }
    }

    /// Resolve the club, relay the registration, interpret the answer.
    ///
    /// An unresolvable club fails before any network activity. Transport
    /// problems come back as errors, never as panics.
    pub async fn submit(
        &self,
        registration: &StudentRegistration,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let club = self
            .registry
            .find_by_id(&registration.club_id)
            .ok_or(SubmissionError::ClubNotSelected)?;

        let payload = IntakePayload {
            full_name: registration.full_name.clone(),
            email: registration.email.clone(),
            phone_number: registration.phone_number.clone(),
            branch: registration.branch,
            selected_college: club.college,
            selected_club: club.name.clone(),
        };

        debug!(club_id = %club.id, college = %club.college, "submitting registration");
        let response = self.client.send(&payload).await.map_err(|err| {
            warn!(club_id = %club.id, error = %err, "registration submission failed");
            err
        })?;

        if response.is_success() {
            info!(club_id = %club.id, college = %club.college, "registration accepted");
            Ok(SubmissionReceipt {
                open_url: club.registration_link,
                club_id: club.id,
                club_name: club.name,
                college: club.college,
            })
        } else {
            let message = response
                .message
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!(
                club_id = %club.id,
                status = %response.status,
                message = %message,
                "registration rejected"
            );
            Err(SubmissionError::Rejected { message })
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
