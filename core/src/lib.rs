//! Client core for the Brik roommate-matching app.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for every
//! backend endpoint (auth, listing, preferences, profile), with a
//! `Transport` seam for the single round-trip in between. On top sit the
//! signed-in `Session` and per-screen view-state controllers.
//!
//! # Design
//! - `BrikClient` is stateless: it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response); the service clients' plain methods
//!   compose the two around one `Transport::execute`.
//! - One `ApiError` type for every client, tagged with the `Operation`.
//! - Multipart bodies come from a consuming builder, so a closed form cannot
//!   be appended to.
//! - Client instances are constructed explicitly and passed in; there is no
//!   process-wide state.

pub mod auth;
pub mod client;
pub mod config;
pub mod controllers;
pub mod error;
pub mod http;
pub mod listings;
pub mod multipart;
pub mod operation;
pub mod preferences;
pub mod profile;
pub mod session;
pub mod token;
pub mod transport;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

pub use auth::AuthClient;
pub use client::{Backend, BrikClient};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use listings::ListingsClient;
pub use multipart::{MultipartBody, MultipartError, MultipartForm};
pub use operation::Operation;
pub use preferences::PreferencesClient;
pub use profile::ProfileClient;
pub use session::Session;
pub use token::{BearerToken, MemoryTokenStore, TokenStore, TokenStoreError};
pub use transport::{Transport, TransportError, UreqTransport};
pub use types::{
    AuthResponse, CleanlinessLevel, Credentials, Gender, Lifestyle, Listing, ListingPayload, Preferences,
    ProfileUpdate, RegistrationPayload, User,
};
