// 📐 Shape Layer - form validation
// Checks run before any latency or network call; all problems are reported at once

use crate::entities::ClubFields;
use crate::error::{ValidationError, ValidationErrors, ValidationResult};
use chrono::{Datelike, Utc};
use reqwest::Url;

/// Earliest founding year accepted by the admin form
pub const MIN_FOUNDING_YEAR: i32 = 2000;

// ============================================================================
// VALIDATOR
// ============================================================================

/// Collects field errors for one context ("Club", "Registration", ...)
pub struct Validator {
    context: &'static str,
    errors: Vec<ValidationError>,
}

impl Validator {
    pub fn new(context: &'static str) -> Self {
        Validator {
            context,
            errors: Vec::new(),
        }
    }

    /// Required text: blank or whitespace-only is an error
    pub fn require(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "Required field is empty");
        }
        self
    }

    pub fn check(&mut self, field: &str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.fail(field, message);
        }
        self
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors
            .push(ValidationError::new(self.context, field, message));
        self
    }

    pub fn finish(&mut self) -> ValidationResult {
        match ValidationErrors::from_vec(std::mem::take(&mut self.errors)) {
            Some(errors) => Err(errors),
            None => Ok(()),
        }
    }
}

// ============================================================================
// CLUB FIELDS
// ============================================================================

/// Validate the admin "Add/Edit club" form against the current year
pub fn validate_club_fields(fields: &ClubFields) -> ValidationResult {
    validate_club_fields_at(fields, Utc::now().year())
}

pub fn validate_club_fields_at(fields: &ClubFields, current_year: i32) -> ValidationResult {
    let mut v = Validator::new("Club");

    v.require("name", &fields.name)
        .require("description", &fields.description);

    if fields.registration_link.trim().is_empty() {
        v.fail("registration_link", "Required field is empty");
    } else if !is_well_formed_url(&fields.registration_link) {
        v.fail(
            "registration_link",
            format!("Not a valid http(s) URL: {}", fields.registration_link),
        );
    }

    v.check(
        "founding_year",
        (MIN_FOUNDING_YEAR..=current_year).contains(&fields.founding_year),
        format!(
            "Must be between {} and {}, got {}",
            MIN_FOUNDING_YEAR, current_year, fields.founding_year
        ),
    );

    v.finish()
}

/// Absolute http/https URL with a host
pub fn is_well_formed_url(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::College;

    fn valid_fields() -> ClubFields {
        ClubFields {
            college: College::Ggct,
            name: "Photography Club".to_string(),
            description: "Capture the campus".to_string(),
            registration_link: "https://forms.gle/photo".to_string(),
            founding_year: 2015,
            member_count: 40,
        }
    }

    #[test]
    fn test_valid_fields_pass() {
        assert!(validate_club_fields_at(&valid_fields(), 2026).is_ok());
    }

    #[test]
    fn test_blank_form_reports_every_problem() {
        let fields = ClubFields {
            name: "   ".to_string(),
            ..ClubFields::default()
        };

        let errors = validate_club_fields(&fields).unwrap_err();
        assert!(errors.has_field("name"));
        assert!(errors.has_field("description"));
        assert!(errors.has_field("registration_link"));
        assert!(!errors.has_field("founding_year"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_founding_year_bounds() {
        let mut fields = valid_fields();

        fields.founding_year = 2000;
        assert!(validate_club_fields_at(&fields, 2026).is_ok());

        fields.founding_year = 2026;
        assert!(validate_club_fields_at(&fields, 2026).is_ok());

        fields.founding_year = 1999;
        let errors = validate_club_fields_at(&fields, 2026).unwrap_err();
        assert!(errors.has_field("founding_year"));

        fields.founding_year = 2027;
        assert!(validate_club_fields_at(&fields, 2026).is_err());
    }

    #[test]
    fn test_registration_link_must_be_url() {
        let mut fields = valid_fields();
        fields.registration_link = "forms.gle/nope".to_string();

        let errors = validate_club_fields_at(&fields, 2026).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.errors()[0].message.contains("forms.gle/nope"));
    }

    #[test]
    fn test_is_well_formed_url() {
        assert!(is_well_formed_url("https://forms.gle/abcd123"));
        assert!(is_well_formed_url("http://example.org/path?q=1"));
        assert!(!is_well_formed_url("ftp://example.org/file"));
        assert!(!is_well_formed_url("mailto:club@ggits.org"));
        assert!(!is_well_formed_url("not a url"));
        assert!(!is_well_formed_url(""));
    }
}
