//! Signed-in state shared by the controllers.
//!
//! The token lives only in the `TokenStore`; the session keeps the current
//! user alongside it. A sign-out racing an in-flight request is tolerated:
//! that request simply fails server-side.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::token::{BearerToken, TokenStore, TokenStoreError};
use crate::types::User;

pub struct Session {
    store: Arc<dyn TokenStore>,
    current_user: RwLock<Option<User>>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            current_user: RwLock::new(None),
        }
    }

    /// True while a token is stored, including one left from a previous run.
    pub fn is_logged_in(&self) -> bool {
        self.store.retrieve().is_some()
    }

    pub fn token(&self) -> Option<BearerToken> {
        self.store.retrieve()
    }

    pub fn current_user(&self) -> Option<User> {
        self.current_user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sign_in(&self, user: User, token: &BearerToken) -> Result<(), TokenStoreError> {
        self.store.save(token)?;
        info!(user_id = user.id, "signed in");
        *self.current_user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
        Ok(())
    }

    pub fn update_user(&self, user: User) {
        *self.current_user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    pub fn sign_out(&self) -> Result<(), TokenStoreError> {
        self.store.delete()?;
        *self.current_user.write().unwrap_or_else(PoisonError::into_inner) = None;
        info!("signed out");
        Ok(())
    }
}
