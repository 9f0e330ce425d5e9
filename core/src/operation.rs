//! The fixed set of backend endpoints the client talks to.
//!
//! Every request is tagged with an `Operation`, which owns the method, path
//! and authentication requirement of its endpoint and is carried by every
//! `ApiError` raised while serving it.

use std::fmt;

use crate::http::HttpMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Register,
    FetchListing,
    CreateListing,
    UpdateListing,
    DeleteListing,
    FetchPreferences,
    CreatePreferences,
    UpdatePreferences,
    UpdateProfile,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::Login,
        Operation::Register,
        Operation::FetchListing,
        Operation::CreateListing,
        Operation::UpdateListing,
        Operation::DeleteListing,
        Operation::FetchPreferences,
        Operation::CreatePreferences,
        Operation::UpdatePreferences,
        Operation::UpdateProfile,
    ];

    pub const fn method(self) -> HttpMethod {
        match self {
            Operation::Login
            | Operation::Register
            | Operation::CreateListing
            | Operation::CreatePreferences => HttpMethod::Post,
            Operation::FetchListing | Operation::FetchPreferences => HttpMethod::Get,
            Operation::UpdateListing | Operation::UpdatePreferences | Operation::UpdateProfile => {
                HttpMethod::Put
            }
            Operation::DeleteListing => HttpMethod::Delete,
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Operation::Login => "/auth/login",
            Operation::Register => "/auth/register",
            Operation::FetchListing
            | Operation::CreateListing
            | Operation::UpdateListing
            | Operation::DeleteListing => "/user/listings",
            Operation::FetchPreferences
            | Operation::CreatePreferences
            | Operation::UpdatePreferences => "/user/preferences",
            Operation::UpdateProfile => "/user/update",
        }
    }

    /// Whether the request must carry `Authorization: Bearer <token>`.
    pub const fn requires_auth(self) -> bool {
        !matches!(self, Operation::Login | Operation::Register)
    }

    /// Fetches of resources the user may not have created yet. A 404 on these
    /// is reported as `ErrorKind::NotFound` instead of a generic failure.
    pub const fn is_optional_fetch(self) -> bool {
        matches!(self, Operation::FetchListing | Operation::FetchPreferences)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::Register => "register",
            Operation::FetchListing => "fetch listing",
            Operation::CreateListing => "create listing",
            Operation::UpdateListing => "update listing",
            Operation::DeleteListing => "delete listing",
            Operation::FetchPreferences => "fetch preferences",
            Operation::CreatePreferences => "create preferences",
            Operation::UpdatePreferences => "update preferences",
            Operation::UpdateProfile => "update profile",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
