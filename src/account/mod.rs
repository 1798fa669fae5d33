//! Account models and the user-edit form: field validation and the
//! update payload the form is allowed to send.

pub mod api;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// One account as the users API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub has_subscription: bool,
    #[serde(default)]
    pub is_trial: bool,
    #[serde(default)]
    pub is_deactivated: bool,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

impl UserPublic {
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.email,
        }
    }

    /// Whether the subscription or trial window has already closed.
    /// The API sends RFC 3339 timestamps, with or without an offset;
    /// anything unparseable counts as not expired.
    pub fn is_expired(&self) -> bool {
        let raw = match self.expiry_date.as_deref() {
            Some(raw) => raw,
            None => return false,
        };
        if let Ok(when) = DateTime::parse_from_rfc3339(raw) {
            return when.with_timezone(&Utc) < Utc::now();
        }
        if let Ok(naive) = raw.parse::<NaiveDateTime>() {
            return naive.and_utc() < Utc::now();
        }
        false
    }
}

/// The list endpoint's envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersPage {
    pub data: Vec<UserPublic>,
    pub count: usize,
}

/// The partial update the edit form sends. The confirmation field is
/// never part of the payload, and `password: None` serializes to no key
/// at all, which the API reads as "no change".
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub is_superuser: bool,
    pub is_active: bool,
    pub has_subscription: bool,
    pub is_trial: bool,
    pub is_deactivated: bool,
}

/// Buffer state for the user-edit popup.
#[derive(Debug, Clone, Default)]
pub struct EditForm {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub has_subscription: bool,
    pub is_trial: bool,
    pub is_deactivated: bool,
}

impl EditForm {
    pub fn from_user(user: &UserPublic) -> Self {
        Self {
            email: user.email.clone(),
            full_name: user.full_name.clone().unwrap_or_default(),
            password: String::new(),
            confirm_password: String::new(),
            is_superuser: user.is_superuser,
            is_active: user.is_active,
            has_subscription: user.has_subscription,
            is_trial: user.is_trial,
            is_deactivated: user.is_deactivated,
        }
    }

    /// Field-level checks, run locally before anything is sent. An
    /// empty result means the form may submit.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push("Email is required".to_string());
        } else if !is_valid_email(&self.email) {
            errors.push("Invalid email address".to_string());
        }
        if !self.password.is_empty() && self.password.chars().count() < 8 {
            errors.push("Password must be at least 8 characters".to_string());
        }
        if self.confirm_password != self.password {
            errors.push("The passwords do not match".to_string());
        }
        errors
    }

    /// Build the wire payload: all editable fields except the
    /// confirmation one; a blank password is left out entirely.
    pub fn payload(&self) -> UserUpdate {
        UserUpdate {
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            password: if self.password.is_empty() {
                None
            } else {
                Some(self.password.clone())
            },
            is_superuser: self.is_superuser,
            is_active: self.is_active,
            has_subscription: self.has_subscription,
            is_trial: self.is_trial,
            is_deactivated: self.is_deactivated,
        }
    }
}

/// Light address check: something before one `@`, a dotted host after
/// it, no whitespace anywhere.
fn is_valid_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    match s.split_once('@') {
        Some((user, host)) => {
            !user.is_empty() && host.contains('.') && !host.starts_with('.') && !host.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserPublic {
        UserPublic {
            id: "b7f1d1e4".to_string(),
            email: "ada@example.com".to_string(),
            full_name: Some("Ada L.".to_string()),
            is_active: true,
            is_superuser: false,
            has_subscription: true,
            is_trial: false,
            is_deactivated: false,
            expiry_date: None,
        }
    }

    #[test]
    fn blank_password_is_omitted_from_the_payload() {
        let mut form = EditForm::from_user(&sample_user());
        form.full_name = "Ada Lovelace".to_string();

        let value = serde_json::to_value(form.payload()).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("confirm_password"));
        assert_eq!(object["email"], "ada@example.com");
        assert_eq!(object["full_name"], "Ada Lovelace");
        assert_eq!(object["has_subscription"], true);
    }

    #[test]
    fn entered_password_is_sent() {
        let mut form = EditForm::from_user(&sample_user());
        form.password = "hunter2hunter2".to_string();
        form.confirm_password = form.password.clone();

        let value = serde_json::to_value(form.payload()).unwrap();
        assert_eq!(value["password"], "hunter2hunter2");
    }

    #[test]
    fn validation_catches_the_three_field_rules() {
        let mut form = EditForm::default();
        let errors = form.validate();
        assert!(errors.iter().any(|e| e == "Email is required"));

        form.email = "not-an-address".to_string();
        let errors = form.validate();
        assert!(errors.iter().any(|e| e == "Invalid email address"));

        form.email = "ada@example.com".to_string();
        form.password = "short".to_string();
        form.confirm_password = "short".to_string();
        let errors = form.validate();
        assert_eq!(errors, vec!["Password must be at least 8 characters".to_string()]);

        form.password = "long enough secret".to_string();
        form.confirm_password = "different".to_string();
        let errors = form.validate();
        assert_eq!(errors, vec!["The passwords do not match".to_string()]);
    }

    #[test]
    fn blank_password_with_blank_confirmation_passes() {
        let form = EditForm::from_user(&sample_user());
        assert!(form.validate().is_empty());
    }

    #[test]
    fn expiry_is_compared_against_now() {
        let mut user = sample_user();
        assert!(!user.is_expired());

        user.expiry_date = Some("2001-01-01T00:00:00Z".to_string());
        assert!(user.is_expired());

        user.expiry_date = Some("2999-01-01T00:00:00Z".to_string());
        assert!(!user.is_expired());

        // Offset-less timestamps, as the API often sends them.
        user.expiry_date = Some("2001-01-01T00:00:00".to_string());
        assert!(user.is_expired());

        user.expiry_date = Some("not a date".to_string());
        assert!(!user.is_expired());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut user = sample_user();
        assert_eq!(user.display_name(), "Ada L.");
        user.full_name = Some(String::new());
        assert_eq!(user.display_name(), "ada@example.com");
        user.full_name = None;
        assert_eq!(user.display_name(), "ada@example.com");
    }

    #[test]
    fn address_check_accepts_and_rejects_sensibly() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example.com "));
    }
}
