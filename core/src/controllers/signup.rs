use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use super::{user_message, FlowResult, LoadingFlag};
use crate::auth::AuthClient;
use crate::session::Session;
use crate::types::{Gender, RegistrationPayload};
use crate::validation::{age_on, is_valid_email, MINIMUM_AGE};

pub struct SignUpController {
    auth: AuthClient,
    session: Arc<Session>,
    loading: LoadingFlag,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub location: String,
    pub bio: String,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_image: Option<Vec<u8>>,
    pub name_error: Option<String>,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub confirm_password_error: Option<String>,
    pub date_of_birth_error: Option<String>,
    pub gender_error: Option<String>,
    pub location_error: Option<String>,
    pub bio_error: Option<String>,
    pub error_message: Option<String>,
}

fn required(value: &str, message: &str) -> Option<String> {
    value.trim().is_empty().then(|| message.to_string())
}

impl SignUpController {
    pub fn new(auth: AuthClient, session: Arc<Session>) -> Self {
        Self {
            auth,
            session,
            loading: LoadingFlag::default(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            name: String::new(),
            gender: None,
            location: String::new(),
            bio: String::new(),
            date_of_birth: None,
            profile_image: None,
            name_error: None,
            email_error: None,
            password_error: None,
            confirm_password_error: None,
            date_of_birth_error: None,
            gender_error: None,
            location_error: None,
            bio_error: None,
            error_message: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn validate_fields(&mut self, today: NaiveDate) {
        self.name_error = required(&self.name, "Name is required.");
        self.email_error = if self.email.is_empty() {
            Some("Email is required.".to_string())
        } else if !is_valid_email(&self.email) {
            Some("Please enter a valid email.".to_string())
        } else {
            None
        };
        self.password_error = self
            .password
            .is_empty()
            .then(|| "Password is required.".to_string());
        self.confirm_password_error = (self.password != self.confirm_password)
            .then(|| "Passwords do not match.".to_string());
        self.date_of_birth_error = match self.date_of_birth {
            None => Some("Date of birth is required.".to_string()),
            Some(dob) if age_on(dob, today) < MINIMUM_AGE => {
                Some(format!("You must be at least {MINIMUM_AGE} years old."))
            }
            Some(_) => None,
        };
        self.gender_error = self
            .gender
            .is_none()
            .then(|| "Please select a gender.".to_string());
        self.location_error = required(&self.location, "Location is required.");
        self.bio_error = required(&self.bio, "Bio is required.");
    }

    pub fn can_submit(&self) -> bool {
        [
            &self.name_error,
            &self.email_error,
            &self.password_error,
            &self.confirm_password_error,
            &self.date_of_birth_error,
            &self.gender_error,
            &self.location_error,
            &self.bio_error,
        ]
        .iter()
        .all(|error| error.is_none())
    }

    pub fn sign_up(&mut self) -> bool {
        self.sign_up_on(Utc::now().date_naive())
    }

    /// Validate against `today`, register and sign the session in.
    pub fn sign_up_on(&mut self, today: NaiveDate) -> bool {
        self.validate_fields(today);
        let (Some(gender), Some(dob), true) = (self.gender, self.date_of_birth, self.can_submit()) else {
            self.error_message = Some("Please correct the errors in the form.".to_string());
            return false;
        };

        let payload = RegistrationPayload {
            email: self.email.clone(),
            password: self.password.clone(),
            name: self.name.trim().to_string(),
            age: age_on(dob, today),
            gender,
            bio: self.bio.trim().to_string(),
            location: self.location.trim().to_string(),
        };

        let _loading = self.loading.begin();
        self.error_message = None;
        match self.submit(&payload) {
            Ok(()) => true,
            Err(e) => {
                self.error_message = Some(user_message(&*e));
                false
            }
        }
    }

    fn submit(&self, payload: &RegistrationPayload) -> FlowResult<()> {
        let response = self.auth.register(payload, self.profile_image.as_deref())?;
        self.session.sign_in(response.user, &response.token)?;
        Ok(())
    }
}
