use std::sync::Arc;

use super::{user_message, LoadingFlag};
use crate::listings::ListingsClient;
use crate::session::Session;
use crate::types::Listing;

/// The "my listing" screen: shows the current listing or the empty state.
pub struct ListingsController {
    listings: ListingsClient,
    session: Arc<Session>,
    loading: LoadingFlag,
    pub current_listing: Option<Listing>,
    pub error_message: Option<String>,
}

impl ListingsController {
    pub fn new(listings: ListingsClient, session: Arc<Session>) -> Self {
        Self {
            listings,
            session,
            loading: LoadingFlag::default(),
            current_listing: None,
            error_message: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Whether the empty "no listing yet" state should be shown.
    pub fn has_no_listing(&self) -> bool {
        self.current_listing.is_none() && self.error_message.is_none()
    }

    /// A 404 is the "no listing yet" state, not an error.
    pub fn fetch_listing(&mut self) {
        let _loading = self.loading.begin();
        self.error_message = None;
        match self.listings.fetch(self.session.token().as_ref()) {
            Ok(listing) => self.current_listing = Some(listing),
            Err(e) if e.is_not_found() => self.current_listing = None,
            Err(e) => {
                self.current_listing = None;
                self.error_message = Some(user_message(&e));
            }
        }
    }

    pub fn delete_listing(&mut self) -> bool {
        let _loading = self.loading.begin();
        self.error_message = None;
        match self.listings.delete(self.session.token().as_ref()) {
            Ok(()) => {
                self.current_listing = None;
                true
            }
            Err(e) => {
                self.error_message = Some(user_message(&e));
                false
            }
        }
    }
}
