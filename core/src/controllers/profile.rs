use std::sync::Arc;

use super::{user_message, LoadingFlag};
use crate::profile::ProfileClient;
use crate::session::Session;
use crate::types::{Gender, ProfileUpdate};
use crate::validation::MINIMUM_AGE;

pub struct EditProfileController {
    client: ProfileClient,
    session: Arc<Session>,
    saving: LoadingFlag,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub bio: String,
    pub location: String,
    pub profile_image_url: Option<String>,
    pub profile_image: Option<Vec<u8>>,
    pub error_message: Option<String>,
}

impl EditProfileController {
    /// Prefilled from the signed-in user; `None` when nobody is signed in.
    pub fn new(client: ProfileClient, session: Arc<Session>) -> Option<Self> {
        let user = session.current_user()?;
        Some(Self {
            client,
            session,
            saving: LoadingFlag::default(),
            name: user.name,
            age: user.age,
            gender: user.gender,
            bio: user.bio,
            location: user.location,
            profile_image_url: user.profile_image,
            profile_image: None,
            error_message: None,
        })
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_set()
    }

    fn validation_error(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            Some("Name is required.".to_string())
        } else if self.location.trim().is_empty() {
            Some("Location is required.".to_string())
        } else if self.age < MINIMUM_AGE {
            Some(format!("You must be at least {MINIMUM_AGE} years old."))
        } else {
            None
        }
    }

    pub fn save(&mut self) -> bool {
        if let Some(message) = self.validation_error() {
            self.error_message = Some(message);
            return false;
        }

        let update = ProfileUpdate {
            name: self.name.trim().to_string(),
            age: self.age,
            gender: self.gender,
            bio: self.bio.trim().to_string(),
            location: self.location.trim().to_string(),
        };

        let _saving = self.saving.begin();
        self.error_message = None;
        let token = self.session.token();
        match self
            .client
            .update(token.as_ref(), &update, self.profile_image.as_deref())
        {
            Ok(user) => {
                self.profile_image_url = user.profile_image.clone();
                self.profile_image = None;
                self.session.update_user(user);
                true
            }
            Err(e) => {
                self.error_message = Some(user_message(&e));
                false
            }
        }
    }
}
