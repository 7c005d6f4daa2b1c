//! Request-level error taxonomy.
//!
//! Everything here is recoverable at the request boundary: validation and
//! conflicts re-render the form the user came from, missing pages drive
//! redirects, and a bad cookie simply means anonymous. Nothing terminates
//! the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    /// User-correctable input problem; re-render the form with the message.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or an invalid cookie. Treated as anonymous, never as
    /// a crash.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Page or user absent; drives redirect logic.
    #[error("not found")]
    NotFound,

    /// Duplicate username at registration. Surfaced as a validation-style
    /// message on the signup form.
    #[error("User already exists")]
    Conflict,
}
