//! # Vikio
//!
//! `vikio` is a minimal multi-user wiki. Users sign up and log in with a
//! username and password, sessions ride in a tamper-evident signed cookie,
//! and wiki pages are created and edited through server-rendered forms.
//!
//! ## Sessions
//!
//! There is no server-side session store. The session cookie carries the
//! user id together with an HMAC over it, so a request can be resolved to a
//! user without any lookup beyond fetching the user record. Rotating the
//! signing key invalidates every outstanding cookie and forces re-login.
//!
//! ## Consistency
//!
//! Concurrent edit submissions to the same title are resolved
//! last-write-wins by the database; this is a documented property of the
//! design, not a defect.

pub mod cli;
pub mod vikio;
