//! Account registration and sign-in input.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account role chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// All roles in display order.
    pub const ALL: [Self; 2] = [Self::User, Self::Admin];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or(RegistrationError::MissingFields)
    }
}

/// Errors raised before a registration reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("All fields are required. Please fill in all the details.")]
    MissingFields,
}

/// Raw sign-up form input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl RegistrationForm {
    /// Check that every field is filled in and the role is known.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::MissingFields` if any field is blank.
    pub fn validate(self) -> Result<Registration, RegistrationError> {
        let required = [
            &self.first_name,
            &self.last_name,
            &self.dob,
            &self.email,
            &self.password,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(RegistrationError::MissingFields);
        }
        let role = self.role.trim().parse::<Role>()?;

        Ok(Registration {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            dob: self.dob.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            role,
        })
    }
}

/// A complete registration request.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    /// Date of birth as entered (`YYYY-MM-DD` from the date input).
    pub dob: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("dob", &self.dob)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Sign-in credentials.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            dob: "1990-04-01".to_string(),
            email: "asha@example.com".to_string(),
            password: "hunter22".to_string(),
            role: "USER".to_string(),
        }
    }

    #[test]
    fn test_complete_registration_validates() {
        let registration = form().validate().unwrap();
        assert_eq!(registration.role, Role::User);
        assert_eq!(registration.email, "asha@example.com");
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut f = form();
        f.dob = String::new();
        assert_eq!(f.validate().unwrap_err(), RegistrationError::MissingFields);
    }

    #[test]
    fn test_missing_role_rejected() {
        let mut f = form();
        f.role = String::new();
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_error_message_matches_banner() {
        assert_eq!(
            RegistrationError::MissingFields.to_string(),
            "All fields are required. Please fill in all the details."
        );
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let registration = form().validate().unwrap();
        let output = format!("{registration:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("hunter22"));

        let creds = Credentials {
            email: "a@b.c".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(!format!("{creds:?}").contains("hunter22"));
    }
}
