//! The signed-in user's listing: fetch, create, sparse update, delete.
//!
//! Images travel as JPEG parts named `listingImage{slot}` with slots 1..=5.
//! A slot keeps its name whether or not the slots before it are filled, so
//! an update can replace image 4 without resending images 1 to 3.

use std::collections::BTreeMap;

use tracing::warn;

use crate::client::{check_status, decode, Backend};
use crate::error::{ApiError, ErrorKind};
use crate::http::{HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::operation::Operation;
use crate::token::BearerToken;
use crate::types::{Listing, ListingEnvelope, ListingPayload};

pub const MAX_LISTING_IMAGES: usize = 5;

/// Form field for a zero-based slot index.
pub fn image_field(slot: usize) -> String {
    format!("listingImage{}", slot + 1)
}

/// Text fields plus one `listingImage{slot + 1}` part per entry, in slot
/// order. Slots at or past `MAX_LISTING_IMAGES` are an `Encoding` error.
fn slotted_form(
    operation: Operation,
    payload: &ListingPayload,
    images: &BTreeMap<usize, Vec<u8>>,
) -> Result<MultipartForm, ApiError> {
    if let Some(slot) = images.keys().find(|slot| **slot >= MAX_LISTING_IMAGES) {
        return Err(ApiError::new(
            operation,
            ErrorKind::Encoding(format!(
                "image slot {slot} is outside 0..{MAX_LISTING_IMAGES}"
            )),
        ));
    }
    Ok(images
        .iter()
        .fold(listing_form(payload), |form, (slot, image)| {
            form.jpeg(&image_field(*slot), image.as_slice())
        }))
}

fn listing_form(payload: &ListingPayload) -> MultipartForm {
    MultipartForm::new()
        .text("description", payload.description.as_str())
        .text("location", payload.location.as_str())
        .text("rentPriceWeekly", format!("{:.2}", payload.rent_price_weekly))
        .text("availabilityDate", payload.availability_date.as_str())
        .text("petsAllowed", payload.pets_allowed.to_string())
}

#[derive(Clone)]
pub struct ListingsClient {
    backend: Backend,
}

impl ListingsClient {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn build_fetch(&self, token: Option<&BearerToken>) -> Result<HttpRequest, ApiError> {
        self.backend.client().request(Operation::FetchListing, token)
    }

    /// Unwraps the `{listing}` envelope. A user with no listing yields
    /// `ErrorKind::NotFound`.
    pub fn parse_fetch(&self, response: HttpResponse) -> Result<Listing, ApiError> {
        check_status(Operation::FetchListing, &response)?;
        let envelope: ListingEnvelope = decode(Operation::FetchListing, &response)?;
        Ok(envelope.listing)
    }

    pub fn fetch(&self, token: Option<&BearerToken>) -> Result<Listing, ApiError> {
        let request = self.build_fetch(token)?;
        let response = self.backend.send(Operation::FetchListing, request)?;
        self.parse_fetch(response)
    }

    /// Images fill slots 1..=n in input order. Anything past the fifth image
    /// is dropped.
    pub fn build_create(
        &self,
        token: Option<&BearerToken>,
        payload: &ListingPayload,
        images: &[Vec<u8>],
    ) -> Result<HttpRequest, ApiError> {
        if images.len() > MAX_LISTING_IMAGES {
            warn!(
                supplied = images.len(),
                kept = MAX_LISTING_IMAGES,
                "dropping listing images beyond the slot limit"
            );
        }
        let form = images
            .iter()
            .take(MAX_LISTING_IMAGES)
            .enumerate()
            .fold(listing_form(payload), |form, (slot, image)| {
                form.jpeg(&image_field(slot), image.as_slice())
            });
        self.backend
            .client()
            .multipart_request(Operation::CreateListing, token, form)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(Operation::CreateListing, &response)
    }

    pub fn create(
        &self,
        token: Option<&BearerToken>,
        payload: &ListingPayload,
        images: &[Vec<u8>],
    ) -> Result<(), ApiError> {
        let request = self.build_create(token, payload, images)?;
        let response = self.backend.send(Operation::CreateListing, request)?;
        self.parse_create(response)
    }

    /// Create with images pinned to zero-based slots, so an image chosen for
    /// slot 3 goes out as `listingImage4` even when earlier slots are empty.
    pub fn build_create_in_slots(
        &self,
        token: Option<&BearerToken>,
        payload: &ListingPayload,
        images: &BTreeMap<usize, Vec<u8>>,
    ) -> Result<HttpRequest, ApiError> {
        let form = slotted_form(Operation::CreateListing, payload, images)?;
        self.backend
            .client()
            .multipart_request(Operation::CreateListing, token, form)
    }

    pub fn create_in_slots(
        &self,
        token: Option<&BearerToken>,
        payload: &ListingPayload,
        images: &BTreeMap<usize, Vec<u8>>,
    ) -> Result<(), ApiError> {
        let request = self.build_create_in_slots(token, payload, images)?;
        let response = self.backend.send(Operation::CreateListing, request)?;
        self.parse_create(response)
    }

    /// Text fields plus one image part per replaced slot. `replaced` is keyed
    /// by zero-based slot; untouched slots keep whatever the server holds.
    pub fn build_update(
        &self,
        token: Option<&BearerToken>,
        payload: &ListingPayload,
        replaced: &BTreeMap<usize, Vec<u8>>,
    ) -> Result<HttpRequest, ApiError> {
        let form = slotted_form(Operation::UpdateListing, payload, replaced)?;
        self.backend
            .client()
            .multipart_request(Operation::UpdateListing, token, form)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(Operation::UpdateListing, &response)
    }

    pub fn update(
        &self,
        token: Option<&BearerToken>,
        payload: &ListingPayload,
        replaced: &BTreeMap<usize, Vec<u8>>,
    ) -> Result<(), ApiError> {
        let request = self.build_update(token, payload, replaced)?;
        let response = self.backend.send(Operation::UpdateListing, request)?;
        self.parse_update(response)
    }

    pub fn build_delete(&self, token: Option<&BearerToken>) -> Result<HttpRequest, ApiError> {
        self.backend.client().request(Operation::DeleteListing, token)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(Operation::DeleteListing, &response)
    }

    pub fn delete(&self, token: Option<&BearerToken>) -> Result<(), ApiError> {
        let request = self.build_delete(token)?;
        let response = self.backend.send(Operation::DeleteListing, request)?;
        self.parse_delete(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{backend, ScriptedTransport, LISTING_JSON};

    fn token() -> BearerToken {
        BearerToken::new("t1")
    }

    fn payload() -> ListingPayload {
        ListingPayload {
            description: "Sunny room".to_string(),
            location: "Glebe".to_string(),
            rent_price_weekly: 320.5,
            availability_date: "2025-07-01T00:00:00Z".to_string(),
            pets_allowed: true,
        }
    }

    fn file_parts(body: &str) -> Vec<String> {
        (1..=MAX_LISTING_IMAGES + 1)
            .map(|n| format!("listingImage{n}"))
            .filter(|name| body.contains(&format!("name=\"{name}\"; filename=\"{name}.jpg\"")))
            .collect()
    }

    #[test]
    fn fetch_unwraps_envelope() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &format!(r#"{{"listing":{LISTING_JSON}}}"#));
        let listings = ListingsClient::new(backend(&transport));

        let listing = listings.fetch(Some(&token())).unwrap();
        assert_eq!(listing.id, 3);
        assert_eq!(listing.image_urls.len(), 2);

        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.url, "http://localhost:3000/user/listings");
        assert_eq!(sent.header("authorization"), Some("Bearer t1"));
        assert!(sent.body.is_none());
    }

    #[test]
    fn fetch_404_is_not_found() {
        let transport = ScriptedTransport::new();
        transport.respond(404, "");
        let listings = ListingsClient::new(backend(&transport));

        let err = listings.fetch(Some(&token())).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn missing_token_sends_nothing() {
        let transport = ScriptedTransport::new();
        let listings = ListingsClient::new(backend(&transport));

        let results = [
            listings.fetch(None).map(|_| ()),
            listings.create(None, &payload(), &[]),
            listings.update(None, &payload(), &BTreeMap::new()),
            listings.delete(None),
        ];
        for result in results {
            assert!(matches!(result.unwrap_err().kind, ErrorKind::MissingAuthToken));
        }
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn create_with_two_images_names_two_slots() {
        let transport = ScriptedTransport::new();
        transport.respond(201, "");
        let listings = ListingsClient::new(backend(&transport));

        listings
            .create(Some(&token()), &payload(), &[vec![1, 2], vec![3, 4]])
            .unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Post);
        let body = transport.last_body_text();
        assert_eq!(file_parts(&body), vec!["listingImage1", "listingImage2"]);
        for (name, value) in [
            ("description", "Sunny room"),
            ("location", "Glebe"),
            ("rentPriceWeekly", "320.50"),
            ("availabilityDate", "2025-07-01T00:00:00Z"),
            ("petsAllowed", "true"),
        ] {
            assert!(body.contains(&format!("name=\"{name}\"\r\n\r\n{value}\r\n")), "{name}");
        }
    }

    #[test]
    fn create_keeps_at_most_five_images() {
        let transport = ScriptedTransport::new();
        transport.respond(201, "");
        let listings = ListingsClient::new(backend(&transport));

        let images: Vec<Vec<u8>> = (0..7u8).map(|i| vec![i]).collect();
        listings.create(Some(&token()), &payload(), &images).unwrap();
        assert_eq!(file_parts(&transport.last_body_text()).len(), MAX_LISTING_IMAGES);
    }

    #[test]
    fn whole_rent_keeps_two_decimals() {
        let transport = ScriptedTransport::new();
        transport.respond(201, "");
        let listings = ListingsClient::new(backend(&transport));

        let whole = ListingPayload {
            rent_price_weekly: 320.0,
            ..payload()
        };
        listings.create(Some(&token()), &whole, &[]).unwrap();
        assert!(transport
            .last_body_text()
            .contains("name=\"rentPriceWeekly\"\r\n\r\n320.00\r\n"));
    }

    #[test]
    fn create_in_slots_keeps_slot_names() {
        let transport = ScriptedTransport::new();
        transport.respond(201, "");
        let listings = ListingsClient::new(backend(&transport));

        let images = BTreeMap::from([(1, vec![0x11]), (3, vec![0x44])]);
        listings
            .create_in_slots(Some(&token()), &payload(), &images)
            .unwrap();

        assert_eq!(transport.last_request().method, HttpMethod::Post);
        assert_eq!(
            file_parts(&transport.last_body_text()),
            vec!["listingImage2", "listingImage4"]
        );
    }

    #[test]
    fn create_in_slots_rejects_out_of_range_slot() {
        let transport = ScriptedTransport::new();
        let listings = ListingsClient::new(backend(&transport));

        let images = BTreeMap::from([(MAX_LISTING_IMAGES, vec![1])]);
        let err = listings
            .create_in_slots(Some(&token()), &payload(), &images)
            .unwrap_err();
        assert_eq!(err.operation, Operation::CreateListing);
        assert!(matches!(err.kind, ErrorKind::Encoding(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn update_names_only_replaced_slots() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "");
        let listings = ListingsClient::new(backend(&transport));

        let replaced = BTreeMap::from([(0, vec![0xaa]), (3, vec![0xbb])]);
        listings.update(Some(&token()), &payload(), &replaced).unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Put);
        assert_eq!(
            file_parts(&transport.last_body_text()),
            vec!["listingImage1", "listingImage4"]
        );
    }

    #[test]
    fn update_rejects_out_of_range_slot() {
        let transport = ScriptedTransport::new();
        let listings = ListingsClient::new(backend(&transport));

        let replaced = BTreeMap::from([(5, vec![1])]);
        let err = listings.update(Some(&token()), &payload(), &replaced).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Encoding(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn delete_sends_no_body() {
        let transport = ScriptedTransport::new();
        transport.respond(204, "");
        let listings = ListingsClient::new(backend(&transport));

        listings.delete(Some(&token())).unwrap();
        let sent = transport.last_request();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert!(sent.body.is_none());
    }

    #[test]
    fn delete_404_is_not_distinguished() {
        let transport = ScriptedTransport::new();
        transport.respond(404, "");
        let listings = ListingsClient::new(backend(&transport));

        let err = listings.delete(Some(&token())).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidResponse { status: Some(404) }));
    }
}
