//! Selfsame Session - HTTP transport and credential handling
//!
//! Builds the bounded-timeout HTTP clients used by every probe and loads
//! the primary-platform session cookie from a raw string or a JSON file.

pub mod client;
pub mod credentials;

pub use client::{build_client, random_user_agent, SessionConfig, SessionError};
pub use credentials::{check_credential_health, Credentials};
