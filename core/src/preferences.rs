//! Match preferences: JSON in, JSON out.
//!
//! `fetch` reports a user who has never saved preferences as
//! `ErrorKind::NotFound`, which callers treat as "use the create flow"
//! rather than as a failure.

use crate::client::{check_status, decode, Backend};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::operation::Operation;
use crate::token::BearerToken;
use crate::types::Preferences;

#[derive(Clone)]
pub struct PreferencesClient {
    backend: Backend,
}

impl PreferencesClient {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn build_fetch(&self, token: Option<&BearerToken>) -> Result<HttpRequest, ApiError> {
        self.backend
            .client()
            .request(Operation::FetchPreferences, token)
    }

    pub fn parse_fetch(&self, response: HttpResponse) -> Result<Preferences, ApiError> {
        check_status(Operation::FetchPreferences, &response)?;
        decode(Operation::FetchPreferences, &response)
    }

    pub fn fetch(&self, token: Option<&BearerToken>) -> Result<Preferences, ApiError> {
        let request = self.build_fetch(token)?;
        let response = self.backend.send(Operation::FetchPreferences, request)?;
        self.parse_fetch(response)
    }

    pub fn build_create(
        &self,
        token: Option<&BearerToken>,
        preferences: &Preferences,
    ) -> Result<HttpRequest, ApiError> {
        self.backend
            .client()
            .json_request(Operation::CreatePreferences, token, preferences)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<Preferences, ApiError> {
        check_status(Operation::CreatePreferences, &response)?;
        decode(Operation::CreatePreferences, &response)
    }

    pub fn create(
        &self,
        token: Option<&BearerToken>,
        preferences: &Preferences,
    ) -> Result<Preferences, ApiError> {
        let request = self.build_create(token, preferences)?;
        let response = self.backend.send(Operation::CreatePreferences, request)?;
        self.parse_create(response)
    }

    pub fn build_update(
        &self,
        token: Option<&BearerToken>,
        preferences: &Preferences,
    ) -> Result<HttpRequest, ApiError> {
        self.backend
            .client()
            .json_request(Operation::UpdatePreferences, token, preferences)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<Preferences, ApiError> {
        check_status(Operation::UpdatePreferences, &response)?;
        decode(Operation::UpdatePreferences, &response)
    }

    pub fn update(
        &self,
        token: Option<&BearerToken>,
        preferences: &Preferences,
    ) -> Result<Preferences, ApiError> {
        let request = self.build_update(token, preferences)?;
        let response = self.backend.send(Operation::UpdatePreferences, request)?;
        self.parse_update(response)
    }
}
