//! Profile edits.

use crate::auth::PROFILE_IMAGE_FIELD;
use crate::client::{check_status, decode, Backend};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::operation::Operation;
use crate::token::BearerToken;
use crate::types::{ProfileUpdate, User, UserEnvelope};

#[derive(Clone)]
pub struct ProfileClient {
    backend: Backend,
}

impl ProfileClient {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn build_update(
        &self,
        token: Option<&BearerToken>,
        update: &ProfileUpdate,
        profile_image: Option<&[u8]>,
    ) -> Result<HttpRequest, ApiError> {
        let mut form = MultipartForm::new()
            .text("name", update.name.as_str())
            .text("age", update.age.to_string())
            .text("gender", update.gender.as_str())
            .text("bio", update.bio.as_str())
            .text("location", update.location.as_str());
        if let Some(image) = profile_image {
            form = form.jpeg(PROFILE_IMAGE_FIELD, image);
        }
        self.backend
            .client()
            .multipart_request(Operation::UpdateProfile, token, form)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(Operation::UpdateProfile, &response)?;
        let envelope: UserEnvelope = decode(Operation::UpdateProfile, &response)?;
        Ok(envelope.user)
    }

    pub fn update(
        &self,
        token: Option<&BearerToken>,
        update: &ProfileUpdate,
        profile_image: Option<&[u8]>,
    ) -> Result<User, ApiError> {
        let request = self.build_update(token, update, profile_image)?;
        let response = self.backend.send(Operation::UpdateProfile, request)?;
        self.parse_update(response)
    }
}
