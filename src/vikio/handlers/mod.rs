pub mod health;
pub use self::health::health;

pub mod home;
pub use self::home::home;

pub mod signup;
pub use self::signup::{signup, signup_form};

pub mod login;
pub use self::login::{login, login_form, logout};

pub mod page;
pub use self::page::{edit_form, edit_submit, view};


// common functions for the handlers
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use regex::Regex;
use tracing::error;

use super::error::RequestError;
use super::AppContext;

pub fn valid_username(username: &str) -> bool {
    Regex::new(r"^[a-zA-Z0-9_-]{3,20}$").map_or(false, |re| re.is_match(username))
}

pub fn valid_password(password: &str) -> bool {
    Regex::new(r"^.{3,20}$").map_or(false, |re| re.is_match(password))
}

pub fn valid_email(email: &str) -> bool {
    // the field is optional, empty passes
    email.is_empty()
        || Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Titles double as store keys and path segments, so slashes and specials
/// are rejected outright instead of sanitized.
pub fn valid_title(title: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9_-]+$").map_or(false, |re| re.is_match(title))
}

/// Fields of the signup form.
#[derive(serde::Deserialize, Debug)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub verify: String,
    #[serde(default)]
    pub email: String,
}

/// First failing check wins, mirroring how the form reports one error at a
/// time.
pub fn validate_signup(form: &SignupForm) -> Result<(), RequestError> {
    if !valid_username(&form.username) {
        return Err(RequestError::Validation(
            "That's not a valid username.".to_string(),
        ));
    }

    if !valid_password(&form.password) {
        return Err(RequestError::Validation(
            "That wasn't a valid password.".to_string(),
        ));
    }

    if form.password != form.verify {
        return Err(RequestError::Validation(
            "Your passwords didn't match.".to_string(),
        ));
    }

    if !valid_email(&form.email) {
        return Err(RequestError::Validation(
            "That's not a valid email.".to_string(),
        ));
    }

    Ok(())
}

/// Render a template to a response, degrading to a 500 when the template
/// is missing.
pub(crate) fn render_html(ctx: &AppContext, template: &str, params: &[(&str, &str)]) -> Response {
    match ctx.renderer.render(template, params) {
        Ok(body) => Html(body).into_response(),
        Err(err) => {
            error!("Failed to render {template}: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn username_length_bounds() {
        assert!(!valid_username("ab"));
        assert!(valid_username("abc"));
        assert!(valid_username(&"a".repeat(20)));
        assert!(!valid_username(&"a".repeat(21)));
    }

    #[test]
    fn username_character_set() {
        assert!(valid_username("phelan_42-x"));
        assert!(!valid_username("no spaces"));
        assert!(!valid_username("pünktchen"));
    }

    #[test]
    fn email_is_optional() {
        assert!(valid_email(""));
        assert!(valid_email("a@b.c"));
        assert!(!valid_email("not-an-email"));
    }

    #[test]
    fn titles_reject_separators() {
        assert!(valid_title("Home"));
        assert!(valid_title("Home_page-2"));
        assert!(!valid_title(""));
        assert!(!valid_title("a/b"));
        assert!(!valid_title("a b"));
    }

    #[test]
    fn signup_reports_first_error() {
        let mut form = SignupForm {
            username: "ab".to_string(),
            password: "hunter2".to_string(),
            verify: "hunter2".to_string(),
            email: String::new(),
        };
        assert_eq!(
            validate_signup(&form).unwrap_err().to_string(),
            "That's not a valid username."
        );

        form.username = "alice".to_string();
        form.verify = "hunter3".to_string();
        assert_eq!(
            validate_signup(&form).unwrap_err().to_string(),
            "Your passwords didn't match."
        );

        form.verify = "hunter2".to_string();
        form.email = "nope".to_string();
        assert_eq!(
            validate_signup(&form).unwrap_err().to_string(),
            "That's not a valid email."
        );

        form.email = "a@b.c".to_string();
        assert!(validate_signup(&form).is_ok());
    }
}
