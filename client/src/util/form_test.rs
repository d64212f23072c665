use super::*;

fn register_form() -> RegisterForm {
    RegisterForm {
        name: "Ada Patient".to_owned(),
        email: "ada@example.com".to_owned(),
        password: "correct horse".to_owned(),
        password_confirmation: "correct horse".to_owned(),
        phone: String::new(),
    }
}

// =============================================================
// LoginForm
// =============================================================

#[test]
fn login_form_trims_email() {
    let form = LoginForm { email: "  ada@example.com ".to_owned(), password: "pw".to_owned() };
    let creds = form.validate().unwrap();
    assert_eq!(creds.email, "ada@example.com");
    assert_eq!(creds.password, "pw");
}

#[test]
fn login_form_requires_both_fields() {
    let errors = LoginForm::default().validate().unwrap_err();
    assert_eq!(first_error(&errors, "email"), Some("The email field is required."));
    assert_eq!(first_error(&errors, "password"), Some("The password field is required."));
}

#[test]
fn login_form_rejects_malformed_email() {
    for email in ["ada", "@example.com", "ada@localhost", "ada@.com"] {
        let form = LoginForm { email: email.to_owned(), password: "pw".to_owned() };
        let errors = form.validate().unwrap_err();
        assert!(first_error(&errors, "email").is_some(), "{email:?}");
    }
}

// =============================================================
// RegisterForm
// =============================================================

#[test]
fn register_form_builds_request_without_blank_phone() {
    let request = register_form().validate().unwrap();
    assert_eq!(request.name, "Ada Patient");
    assert_eq!(request.phone, None);
}

#[test]
fn register_form_keeps_trimmed_phone() {
    let form = RegisterForm { phone: " 555-0100 ".to_owned(), ..register_form() };
    assert_eq!(form.validate().unwrap().phone.as_deref(), Some("555-0100"));
}

#[test]
fn register_form_enforces_password_rules() {
    let form = RegisterForm {
        password: "short".to_owned(),
        password_confirmation: "different".to_owned(),
        ..register_form()
    };
    let errors = form.validate().unwrap_err();
    assert!(first_error(&errors, "password").is_some_and(|m| m.contains("at least 8")));
    assert!(first_error(&errors, "password_confirmation").is_some());
    assert!(first_error(&errors, "name").is_none());
}

#[test]
fn register_form_requires_name() {
    let form = RegisterForm { name: "   ".to_owned(), ..register_form() };
    let errors = form.validate().unwrap_err();
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["name"]);
}
