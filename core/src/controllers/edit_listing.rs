use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use super::{user_message, LoadingFlag};
use crate::listings::{ListingsClient, MAX_LISTING_IMAGES};
use crate::session::Session;
use crate::types::{Listing, ListingPayload};
use crate::validation::{format_iso_date, parse_iso_date, parse_rent};

/// Create/edit form for the user's single listing.
///
/// Every image keeps the slot it was placed in. Without an existing listing,
/// saving creates one with each filled slot under its own part name. With
/// one, saving sends only the slots replaced since the form was opened.
pub struct EditListingController {
    listings: ListingsClient,
    session: Arc<Session>,
    saving: LoadingFlag,
    existing: Option<Listing>,
    slots: [Option<Vec<u8>>; MAX_LISTING_IMAGES],
    replaced: BTreeMap<usize, Vec<u8>>,
    pub description: String,
    pub location: String,
    pub rent_price_weekly: String,
    pub availability_date: NaiveDate,
    pub pets_allowed: bool,
    pub description_error: Option<String>,
    pub location_error: Option<String>,
    pub rent_error: Option<String>,
    pub error_message: Option<String>,
}

impl EditListingController {
    pub fn new(listings: ListingsClient, session: Arc<Session>, existing: Option<Listing>) -> Self {
        let today = Utc::now().date_naive();
        let (description, location, rent, availability, pets) = match &existing {
            Some(listing) => (
                listing.description.clone(),
                listing.location.clone(),
                listing.rent_price_weekly.clone(),
                parse_iso_date(&listing.availability_date).unwrap_or(today),
                listing.pets_allowed,
            ),
            None => (String::new(), String::new(), String::new(), today, false),
        };
        Self {
            listings,
            session,
            saving: LoadingFlag::default(),
            existing,
            slots: Default::default(),
            replaced: BTreeMap::new(),
            description,
            location,
            rent_price_weekly: rent,
            availability_date: availability,
            pets_allowed: pets,
            description_error: None,
            location_error: None,
            rent_error: None,
            error_message: None,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_set()
    }

    pub fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    /// Put an image in a zero-based slot. Returns false for a slot past the
    /// last one.
    pub fn set_image(&mut self, slot: usize, image: Vec<u8>) -> bool {
        let Some(target) = self.slots.get_mut(slot) else {
            return false;
        };
        *target = Some(image.clone());
        self.replaced.insert(slot, image);
        true
    }

    pub fn image(&self, slot: usize) -> Option<&[u8]> {
        self.slots.get(slot).and_then(|image| image.as_deref())
    }

    pub fn validate_fields(&mut self) -> Option<ListingPayload> {
        self.description_error = self
            .description
            .trim()
            .is_empty()
            .then(|| "Description is required.".to_string());
        self.location_error = self
            .location
            .trim()
            .is_empty()
            .then(|| "Location is required.".to_string());
        let rent = parse_rent(&self.rent_price_weekly);
        self.rent_error = rent
            .is_none()
            .then(|| "Rent must be a number.".to_string());

        if self.description_error.is_some() || self.location_error.is_some() {
            return None;
        }
        Some(ListingPayload {
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            rent_price_weekly: rent?,
            availability_date: format_iso_date(self.availability_date),
            pets_allowed: self.pets_allowed,
        })
    }

    pub fn save_listing(&mut self) -> bool {
        let Some(payload) = self.validate_fields() else {
            self.error_message = Some("Please correct the errors in the form.".to_string());
            return false;
        };

        let _saving = self.saving.begin();
        self.error_message = None;
        let token = self.session.token();
        let result = if self.existing.is_some() {
            self.listings.update(token.as_ref(), &payload, &self.replaced)
        } else {
            let images: BTreeMap<usize, Vec<u8>> = self
                .slots
                .iter()
                .enumerate()
                .filter_map(|(slot, image)| image.clone().map(|image| (slot, image)))
                .collect();
            self.listings.create_in_slots(token.as_ref(), &payload, &images)
        };
        match result {
            Ok(()) => {
                self.replaced.clear();
                true
            }
            Err(e) => {
                self.error_message = Some(user_message(&e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{backend, ScriptedTransport, LISTING_JSON};
    use crate::token::{BearerToken, MemoryTokenStore};

    fn session() -> Arc<Session> {
        Arc::new(Session::new(Arc::new(MemoryTokenStore::with_token(
            BearerToken::new("t1"),
        ))))
    }

    fn existing() -> Listing {
        serde_json::from_str(LISTING_JSON).unwrap()
    }

    #[test]
    fn prefills_from_existing_listing() {
        let transport = ScriptedTransport::new();
        let form = EditListingController::new(
            ListingsClient::new(backend(&transport)),
            session(),
            Some(existing()),
        );
        assert!(form.is_editing());
        assert_eq!(form.description, "Sunny room");
        assert_eq!(form.rent_price_weekly, "320.00");
        assert_eq!(form.availability_date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert!(form.pets_allowed);
    }

    #[test]
    fn new_listing_posts_each_image_under_its_slot() {
        let transport = ScriptedTransport::new();
        transport.respond(201, "");
        let mut form = EditListingController::new(ListingsClient::new(backend(&transport)), session(), None);
        form.description = "Room".to_string();
        form.location = "Ultimo".to_string();
        form.rent_price_weekly = "250".to_string();
        form.availability_date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        assert!(form.set_image(2, vec![3]));
        assert!(form.set_image(0, vec![1]));

        assert!(form.save_listing());
        assert!(!form.is_saving());
        let body = transport.last_body_text();
        assert!(body.contains("name=\"listingImage1\""));
        assert!(body.contains("name=\"listingImage3\""));
        assert!(!body.contains("name=\"listingImage2\""));
        assert!(body.contains("name=\"rentPriceWeekly\"\r\n\r\n250.00\r\n"));
        assert!(body.contains("name=\"availabilityDate\"\r\n\r\n2025-08-01T00:00:00Z\r\n"));
    }

    #[test]
    fn lone_image_in_a_later_slot_is_not_renumbered() {
        let transport = ScriptedTransport::new();
        transport.respond(201, "");
        let mut form = EditListingController::new(ListingsClient::new(backend(&transport)), session(), None);
        form.description = "Room".to_string();
        form.location = "Ultimo".to_string();
        form.rent_price_weekly = "250".to_string();
        assert!(form.set_image(3, vec![0x44]));

        assert!(form.save_listing());
        let body = transport.last_body_text();
        assert!(body.contains("name=\"listingImage4\"; filename=\"listingImage4.jpg\""));
        assert!(!body.contains("name=\"listingImage1\""));
    }

    #[test]
    fn edit_sends_only_replaced_slots() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "");
        let mut form = EditListingController::new(
            ListingsClient::new(backend(&transport)),
            session(),
            Some(existing()),
        );
        form.set_image(3, vec![9]);

        assert!(form.save_listing());
        let body = transport.last_body_text();
        assert!(body.contains("name=\"listingImage4\""));
        assert!(!body.contains("name=\"listingImage1\""));
    }

    #[test]
    fn slot_past_the_end_is_refused() {
        let transport = ScriptedTransport::new();
        let mut form = EditListingController::new(ListingsClient::new(backend(&transport)), session(), None);
        assert!(!form.set_image(MAX_LISTING_IMAGES, vec![1]));
        assert!(form.image(0).is_none());
    }

    #[test]
    fn bad_rent_blocks_save() {
        let transport = ScriptedTransport::new();
        let mut form = EditListingController::new(ListingsClient::new(backend(&transport)), session(), None);
        form.description = "Room".to_string();
        form.location = "Ultimo".to_string();
        form.rent_price_weekly = "cheap".to_string();

        assert!(!form.save_listing());
        assert_eq!(form.rent_error.as_deref(), Some("Rent must be a number."));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn failed_save_keeps_pending_images() {
        let transport = ScriptedTransport::new();
        transport.respond(500, "");
        transport.respond(200, "");
        let mut form = EditListingController::new(
            ListingsClient::new(backend(&transport)),
            session(),
            Some(existing()),
        );
        form.set_image(1, vec![7]);

        assert!(!form.save_listing());
        assert_eq!(form.error_message.as_deref(), Some("Server returned status code 500."));
        assert!(form.save_listing());
        assert!(transport.last_body_text().contains("name=\"listingImage2\""));
    }
}
