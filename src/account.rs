//! Sign-up form validation and the login session.
//!
//! Required fields: first name, last name, username, e-mail, password and
//! its confirmation. Birthdate (`MM/DD/YYYY`) and phone number are optional
//! but checked when present.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    FirstName,
    LastName,
    Username,
    Birthdate,
    Email,
    PhoneNumber,
    Password,
    ConfirmPassword,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    #[error("{0:?} is required")]
    Missing(Field),

    #[error("Username may only contain letters, digits, '_' and '.'")]
    InvalidUsername,

    #[error("Invalid e-mail address: {0}")]
    InvalidEmail(String),

    #[error("Birthdate must be MM/DD/YYYY and not in the future")]
    InvalidBirthdate,

    #[error("Phone number must have 10 to 15 digits")]
    InvalidPhoneNumber,

    #[error("Password is too weak ({0:?})")]
    WeakPassword(PasswordStrength),

    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::Missing(field) => *field,
            FieldError::InvalidUsername => Field::Username,
            FieldError::InvalidEmail(_) => Field::Email,
            FieldError::InvalidBirthdate => Field::Birthdate,
            FieldError::InvalidPhoneNumber => Field::PhoneNumber,
            FieldError::WeakPassword(_) => Field::Password,
            FieldError::PasswordMismatch => Field::ConfirmPassword,
        }
    }
}

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Sign-up form has {} invalid field(s)", .0.len())]
    InvalidForm(Vec<FieldError>),

    #[error("Username and password are required")]
    MissingCredentials,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

/// One point each for reaching 8 and 12 characters, mixed case, a digit
/// and a symbol. Anything shorter than 8 characters is weak.
pub fn password_strength(password: &str) -> PasswordStrength {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return PasswordStrength::Weak;
    }

    let has_lower = password.chars().any(char::is_lowercase);
    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    let score = 1
        + usize::from(len >= 12)
        + usize::from(has_lower && has_upper)
        + usize::from(has_digit)
        + usize::from(has_symbol);

    match score {
        0 | 1 => PasswordStrength::Weak,
        2 => PasswordStrength::Fair,
        3 => PasswordStrength::Good,
        _ => PasswordStrength::Strong,
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

fn is_username(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub birthdate: Option<String>,
    pub email: String,
    pub phone_number: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// Every problem with the form, in field order. Empty means valid.
    pub fn validate(&self, today: NaiveDate) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let required = [
            (Field::FirstName, &self.first_name),
            (Field::LastName, &self.last_name),
            (Field::Username, &self.username),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError::Missing(field));
            }
        }
        if !self.username.trim().is_empty() && !is_username(self.username.trim()) {
            errors.push(FieldError::InvalidUsername);
        }

        if let Some(birthdate) = present(&self.birthdate) {
            match NaiveDate::parse_from_str(birthdate, "%m/%d/%Y") {
                Ok(date) if date <= today => {}
                _ => errors.push(FieldError::InvalidBirthdate),
            }
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::Missing(Field::Email));
        } else if !is_email(email) {
            errors.push(FieldError::InvalidEmail(email.to_string()));
        }

        if let Some(phone) = present(&self.phone_number) {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            let allowed = phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+' | '.'));
            if !allowed || !(10..=15).contains(&digits) {
                errors.push(FieldError::InvalidPhoneNumber);
            }
        }

        if self.password.is_empty() {
            errors.push(FieldError::Missing(Field::Password));
        } else {
            let strength = password_strength(&self.password);
            if strength < PasswordStrength::Fair {
                errors.push(FieldError::WeakPassword(strength));
            }
        }

        if self.confirm_password.is_empty() {
            errors.push(FieldError::Missing(Field::ConfirmPassword));
        } else if self.confirm_password != self.password {
            errors.push(FieldError::PasswordMismatch);
        }

        errors
    }

    pub fn check(&self, today: NaiveDate) -> Result<(), AccountError> {
        let errors = self.validate(today);
        if errors.is_empty() {
            Ok(())
        } else {
            log::debug!("Sign-up rejected: {:?}", errors);
            Err(AccountError::InvalidForm(errors))
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Who is logged in, if anyone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    username: Option<String>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Start a session. There is no account backend, so any non-blank
    /// username and password pair is accepted.
    pub fn log_in(&mut self, username: &str, password: &str) -> Result<(), AccountError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AccountError::MissingCredentials);
        }
        log::info!("Logged in as {}", username);
        self.username = Some(username.to_string());
        Ok(())
    }

    /// Validate the form, then log in as the new user.
    pub fn sign_up(&mut self, form: &SignUpForm, today: NaiveDate) -> Result<(), AccountError> {
        form.check(today)?;
        self.log_in(&form.username, &form.password)
    }

    /// Returns false if nobody was logged in.
    pub fn sign_out(&mut self) -> bool {
        match self.username.take() {
            Some(username) => {
                log::info!("Signed out {}", username);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    fn valid_form() -> SignUpForm {
        SignUpForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: "ada_l".into(),
            birthdate: Some("12/10/1990".into()),
            email: "ada@example.com".into(),
            phone_number: Some("(555) 123-4567".into()),
            password: "Analytical1".into(),
            confirm_password: "Analytical1".into(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(valid_form().validate(today()).is_empty());
        assert!(valid_form().check(today()).is_ok());
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let form = SignUpForm {
            birthdate: Some("  ".into()),
            phone_number: None,
            ..valid_form()
        };
        assert!(form.validate(today()).is_empty());
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = SignUpForm::default().validate(today());
        let fields: Vec<Field> = errors.iter().map(FieldError::field).collect();
        assert_eq!(
            fields,
            vec![
                Field::FirstName,
                Field::LastName,
                Field::Username,
                Field::Email,
                Field::Password,
                Field::ConfirmPassword,
            ]
        );
    }

    #[test]
    fn test_field_specific_errors() {
        let form = SignUpForm {
            username: "ada lovelace".into(),
            birthdate: Some("1990-12-10".into()),
            email: "ada@example".into(),
            phone_number: Some("12345".into()),
            password: "short".into(),
            confirm_password: "different".into(),
            ..valid_form()
        };
        let errors = form.validate(today());
        assert_eq!(
            errors,
            vec![
                FieldError::InvalidUsername,
                FieldError::InvalidBirthdate,
                FieldError::InvalidEmail("ada@example".into()),
                FieldError::InvalidPhoneNumber,
                FieldError::WeakPassword(PasswordStrength::Weak),
                FieldError::PasswordMismatch,
            ]
        );
        match form.check(today()) {
            Err(AccountError::InvalidForm(found)) => assert_eq!(found.len(), 6),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_future_birthdate_rejected() {
        let form = SignUpForm {
            birthdate: Some("04/01/2025".into()),
            ..valid_form()
        };
        assert_eq!(form.validate(today()), vec![FieldError::InvalidBirthdate]);
    }

    #[test]
    fn test_password_strength_levels() {
        assert_eq!(password_strength("abc"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefgh"), PasswordStrength::Weak);
        assert_eq!(password_strength("abcdefg1"), PasswordStrength::Fair);
        assert_eq!(password_strength("Abcdefg1"), PasswordStrength::Good);
        assert_eq!(password_strength("Abcdefg1!"), PasswordStrength::Strong);
        assert_eq!(password_strength("Abcdefghijk1!"), PasswordStrength::Strong);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a@@b.co"));
        assert!(!is_email("a b@c.de"));
        assert!(!is_email("a@.co"));
        assert!(!is_email("a@b..c"));
        assert!(!is_email("a@b.c."));
        assert!(is_email("a@mail.b.co"));
    }

    #[test]
    fn test_session_login_and_sign_out() {
        let mut session = Session::default();
        assert!(!session.is_logged_in());
        assert!(matches!(session.log_in("  ", "pw"), Err(AccountError::MissingCredentials)));
        assert!(matches!(session.log_in("ada", ""), Err(AccountError::MissingCredentials)));
        assert!(!session.is_logged_in());

        session.log_in(" ada ", "pw").unwrap();
        assert_eq!(session.username(), Some("ada"));
        assert!(session.sign_out());
        assert!(!session.is_logged_in());
        assert!(!session.sign_out());
    }

    #[test]
    fn test_sign_up_logs_in_only_when_valid() {
        let mut session = Session::default();
        let invalid = SignUpForm {
            email: "ada@b..c".into(),
            ..valid_form()
        };
        assert!(matches!(session.sign_up(&invalid, today()), Err(AccountError::InvalidForm(_))));
        assert!(!session.is_logged_in());

        session.sign_up(&valid_form(), today()).unwrap();
        assert_eq!(session.username(), Some("ada_l"));
    }
}
