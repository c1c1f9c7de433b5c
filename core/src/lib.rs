//! Client core for the admin console REST API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values; a pluggable
//! `Transport` performs the round-trip (host-does-IO). On top of that sit the
//! resource clients for each endpoint family and the screen controllers that
//! keep list state in step with the server.
//!
//! # Design
//! - `ApiClient` is the only place requests are built and responses are
//!   classified. The bearer credential comes from an explicit `Session`.
//! - A 401/403 clears the credential and raises `ApiError::Unauthorized`;
//!   `screens::handle_failure` is the one place that redirects to login.
//! - List responses go through `envelope::normalize_list`, whatever shape
//!   the backend wrapped them in.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod screens;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use envelope::{normalize_list, ListEnvelope};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{CredentialStore, MemoryStore, PendingRegistration, Session};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Category, CategoryInput, Id, Role, Service, ServiceInput, UpdateUser, User};
