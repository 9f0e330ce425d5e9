//! Per-screen view-state controllers.
//!
//! # Design
//! Each controller owns the observable state of one form: field values,
//! per-field validation messages, a loading flag and a user-visible error
//! message. Actions validate locally, read the bearer token from the
//! `Session`, make one client call and fold the outcome back into state.
//! The loading flag is cleared by a guard on every exit path.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ApiError, ErrorKind};
use crate::operation::Operation;

mod edit_listing;
mod listings;
mod login;
mod preferences;
mod profile;
mod signup;

pub use edit_listing::EditListingController;
pub use listings::ListingsController;
pub use login::LoginController;
pub use preferences::PreferencesController;
pub use profile::EditProfileController;
pub use signup::SignUpController;

type FlowResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Shared "request in progress" indicator.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag until the returned guard is dropped.
    pub fn begin(&self) -> LoadingGuard {
        self.0.store(true, Ordering::SeqCst);
        LoadingGuard(self.0.clone())
    }
}

#[must_use = "the loading flag clears as soon as the guard is dropped"]
pub struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Message shown to the user for a failed action.
pub fn user_message(err: &(dyn Error + 'static)) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) => api_message(api),
        None => format!("An error occurred: {err}"),
    }
}

fn api_message(err: &ApiError) -> String {
    match &err.kind {
        ErrorKind::InvalidUrl(_) => "Invalid URL.".to_string(),
        ErrorKind::MissingAuthToken => "Please log in to continue.".to_string(),
        ErrorKind::Transport(detail) => format!("Could not reach the server: {detail}"),
        ErrorKind::InvalidResponse { .. } => {
            format!("Server returned status code {}.", err.kind.status_code().unwrap_or(-1))
        }
        ErrorKind::NotFound => match err.operation {
            Operation::FetchListing => "No listing found.".to_string(),
            Operation::FetchPreferences => "No preferences saved yet.".to_string(),
            _ => "Not found.".to_string(),
        },
        ErrorKind::Decoding(_) => "Failed to decode server response.".to_string(),
        ErrorKind::Encoding(detail) => format!("Could not prepare the request: {detail}"),
        ErrorKind::Server { message, .. } => message.clone(),
    }
}
