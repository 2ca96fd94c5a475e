//! Form validation for the auth pages.
//!
//! Runs before any network call; a form that fails here never reaches the
//! gateway.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::fmt;

use crate::net::types::{LoginRequest, SignupRequest};

pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters.";
pub const PASSWORD_TOO_WEAK: &str = "Password must contain uppercase, lowercase, and numbers.";
pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters.";
pub const PASSWORDS_DIFFER: &str = "Passwords don't match";
pub const TERMS_REQUIRED: &str = "You must accept the terms and conditions.";
pub const EMAIL_REQUIRED_FOR_CODE: &str = "Please enter a valid email first";

const MIN_PASSWORD_LEN: usize = 8;
const MIN_NAME_LEN: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
    AcceptTerms,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// All failures for one submission, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: Field, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    /// First message recorded against `field`.
    #[must_use]
    pub fn message_for(&self, field: Field) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.0.iter().map(|e| e.message).collect::<Vec<_>>().join(" ");
        f.write_str(&joined)
    }
}

impl std::error::Error for FieldErrors {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
    /// Optional exclusive-access code; blank means none.
    pub exclusive_code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

fn is_strong_password(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// # Errors
///
/// Field errors for an invalid email or a short password.
pub fn validate_sign_in(input: &SignInInput) -> Result<LoginRequest, FieldErrors> {
    let email = input.email.trim();
    let mut errors = FieldErrors::default();
    if !is_valid_email(email) {
        errors.push(Field::Email, INVALID_EMAIL);
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(Field::Password, PASSWORD_TOO_SHORT);
    }
    errors.into_result()?;

    let code = input.exclusive_code.trim();
    Ok(LoginRequest {
        email: email.to_owned(),
        password: input.password.clone(),
        exclusive_code: (!code.is_empty()).then(|| code.to_owned()),
    })
}

/// # Errors
///
/// Every failing field, each with its first failing rule.
pub fn validate_sign_up(input: &SignUpInput) -> Result<SignupRequest, FieldErrors> {
    let name = input.name.trim();
    let email = input.email.trim();
    let mut errors = FieldErrors::default();

    if name.chars().count() < MIN_NAME_LEN {
        errors.push(Field::Name, NAME_TOO_SHORT);
    }
    if !is_valid_email(email) {
        errors.push(Field::Email, INVALID_EMAIL);
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(Field::Password, PASSWORD_TOO_SHORT);
    } else if !is_strong_password(&input.password) {
        errors.push(Field::Password, PASSWORD_TOO_WEAK);
    }
    if input.password != input.confirm_password {
        errors.push(Field::ConfirmPassword, PASSWORDS_DIFFER);
    }
    if !input.accept_terms {
        errors.push(Field::AcceptTerms, TERMS_REQUIRED);
    }
    errors.into_result()?;

    Ok(SignupRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        password: input.password.clone(),
        confirm_password: input.confirm_password.clone(),
        accept_terms: true,
    })
}

/// Email for an access-code request.
///
/// # Errors
///
/// A single email field error.
pub fn validate_code_request(email: &str) -> Result<String, FieldErrors> {
    let email = email.trim();
    if is_valid_email(email) {
        return Ok(email.to_owned());
    }
    let mut errors = FieldErrors::default();
    errors.push(Field::Email, EMAIL_REQUIRED_FOR_CODE);
    Err(errors)
}
