//! Client-side checks for the login and registration forms.
//!
//! These run before any request is sent and report errors in the same
//! `field -> messages` shape the API uses, so the pages render local and
//! server-side validation failures through one path.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use eyeclinic::error::FieldErrors;
use eyeclinic::{Credentials, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns per-field messages when the email or password is missing.
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            add(&mut errors, "password", "The password field is required.");
        }
        if errors.is_empty() {
            Ok(Credentials::new(self.email.trim(), self.password.clone()))
        } else {
            Err(errors)
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub phone: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns per-field messages for a missing name or email, a short
    /// password, or a confirmation that does not match.
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            add(&mut errors, "name", "The name field is required.");
        }
        check_email(&mut errors, &self.email);
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            add(
                &mut errors,
                "password",
                &format!("The password must be at least {MIN_PASSWORD_LEN} characters."),
            );
        }
        if self.password != self.password_confirmation {
            add(&mut errors, "password_confirmation", "The password confirmation does not match.");
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        let phone = self.phone.trim();
        Ok(RegisterRequest {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
        })
    }
}

/// First message for `field`, if any.
pub fn first_error<'a>(errors: &'a FieldErrors, field: &str) -> Option<&'a str> {
    errors.get(field).and_then(|msgs| msgs.first()).map(String::as_str)
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        add(errors, "email", "The email field is required.");
    } else if !looks_like_email(email) {
        add(errors, "email", "The email must be a valid email address.");
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

fn add(errors: &mut FieldErrors, field: &str, message: &str) {
    errors.entry(field.to_owned()).or_default().push(message.to_owned());
}
