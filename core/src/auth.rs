//! Login and registration.

use crate::client::{check_status, decode, Backend};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::operation::Operation;
use crate::types::{AuthResponse, Credentials, RegistrationPayload};

pub const PROFILE_IMAGE_FIELD: &str = "profileImage";

#[derive(Clone)]
pub struct AuthClient {
    backend: Backend,
}

impl AuthClient {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.backend
            .client()
            .json_request(Operation::Login, None, credentials)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        check_status(Operation::Login, &response)?;
        decode(Operation::Login, &response)
    }

    pub fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let request = self.build_login(credentials)?;
        let response = self.backend.send(Operation::Login, request)?;
        self.parse_login(response)
    }

    /// Multipart registration: every payload field as text, plus an optional
    /// `profileImage` JPEG part.
    pub fn build_register(
        &self,
        payload: &RegistrationPayload,
        profile_image: Option<&[u8]>,
    ) -> Result<HttpRequest, ApiError> {
        let mut form = MultipartForm::new()
            .text("email", payload.email.as_str())
            .text("password", payload.password.as_str())
            .text("name", payload.name.as_str())
            .text("age", payload.age.to_string())
            .text("gender", payload.gender.as_str())
            .text("bio", payload.bio.as_str())
            .text("location", payload.location.as_str());
        if let Some(image) = profile_image {
            form = form.jpeg(PROFILE_IMAGE_FIELD, image);
        }
        self.backend
            .client()
            .multipart_request(Operation::Register, None, form)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        check_status(Operation::Register, &response)?;
        decode(Operation::Register, &response)
    }

    pub fn register(
        &self,
        payload: &RegistrationPayload,
        profile_image: Option<&[u8]>,
    ) -> Result<AuthResponse, ApiError> {
        let request = self.build_register(payload, profile_image)?;
        let response = self.backend.send(Operation::Register, request)?;
        self.parse_register(response)
    }
}
