use std::sync::Arc;

use super::{user_message, FlowResult, LoadingFlag};
use crate::auth::AuthClient;
use crate::session::Session;
use crate::types::Credentials;
use crate::validation::is_valid_email;

pub struct LoginController {
    auth: AuthClient,
    session: Arc<Session>,
    loading: LoadingFlag,
    pub email: String,
    pub password: String,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub error_message: Option<String>,
}

impl LoginController {
    pub fn new(auth: AuthClient, session: Arc<Session>) -> Self {
        Self {
            auth,
            session,
            loading: LoadingFlag::default(),
            email: String::new(),
            password: String::new(),
            email_error: None,
            password_error: None,
            error_message: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn validate_fields(&mut self) {
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
    }

    pub fn can_submit(&self) -> bool {
        self.email_error.is_none() && self.password_error.is_none()
    }

    /// Validate, log in and sign the session in. Returns whether the user is
    /// now signed in.
    pub fn login(&mut self) -> bool {
        self.validate_fields();
        if !self.can_submit() {
            self.error_message = Some("Please enter a valid email and password.".to_string());
            return false;
        }

        let _loading = self.loading.begin();
        self.error_message = None;
        match self.submit() {
            Ok(()) => true,
            Err(e) => {
                self.error_message = Some(user_message(&*e));
                false
            }
        }
    }

    fn submit(&self) -> FlowResult<()> {
        let credentials = Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        };
        let response = self.auth.login(&credentials)?;
        self.session.sign_in(response.user, &response.token)?;
        Ok(())
    }
}
