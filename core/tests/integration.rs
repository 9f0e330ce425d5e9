//! Full account lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every service client
//! over real HTTP through `UreqTransport`. Validates that request building,
//! the multipart wire format and response classification agree with an
//! actual axum backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use brik_core::{
    AuthClient, Backend, BrikClient, CleanlinessLevel, Credentials, ErrorKind, Gender, Lifestyle,
    ListingPayload, ListingsClient, Preferences, PreferencesClient, ProfileClient, ProfileUpdate,
    RegistrationPayload, UreqTransport,
};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn registration(email: &str) -> RegistrationPayload {
    RegistrationPayload {
        email: email.to_string(),
        password: "hunter22".to_string(),
        name: "Sam".to_string(),
        age: 24,
        gender: Gender::Other,
        bio: "Tidy and quiet".to_string(),
        location: "Glebe".to_string(),
    }
}

fn listing(description: &str) -> ListingPayload {
    ListingPayload {
        description: description.to_string(),
        location: "Newtown".to_string(),
        rent_price_weekly: 320.5,
        availability_date: "2025-07-01T00:00:00Z".to_string(),
        pets_allowed: true,
    }
}

#[test]
fn account_lifecycle() {
    // Step 1: start mock server and wire the clients to it.
    let backend = Backend::new(BrikClient::new(&start_server()), Arc::new(UreqTransport::new()));
    let auth = AuthClient::new(backend.clone());
    let listings = ListingsClient::new(backend.clone());
    let preferences = PreferencesClient::new(backend.clone());
    let profile = ProfileClient::new(backend);

    // Step 2: register with a profile image.
    let image: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];
    let registered = auth.register(&registration("sam@example.com"), Some(image)).unwrap();
    assert_eq!(registered.user.email, "sam@example.com");
    assert_eq!(registered.user.gender, Gender::Other);
    assert!(registered.user.profile_image.is_some());

    // Step 3: registering the same email again is a server-reported error.
    let err = auth.register(&registration("sam@example.com"), None).unwrap_err();
    assert!(
        matches!(err.kind(), ErrorKind::Server { status: 409, message } if message == "Email already registered"),
        "{err}"
    );

    // Step 4: log in; wrong password is rejected.
    let credentials = Credentials {
        email: "sam@example.com".to_string(),
        password: "hunter22".to_string(),
    };
    let session = auth.login(&credentials).unwrap();
    assert_eq!(session.user.id, registered.user.id);
    let token = session.token;

    let err = auth
        .login(&Credentials {
            password: "wrong".to_string(),
            ..credentials
        })
        .unwrap_err();
    assert_eq!(err.kind().status_code(), Some(401));

    // Step 5: no preferences yet.
    let err = preferences.fetch(Some(&token)).unwrap_err();
    assert!(err.is_not_found());

    // Step 6: create, then update preferences.
    let mut prefs = Preferences {
        preferred_location: "Newtown".to_string(),
        min_budget: 200,
        max_budget: 450,
        pets_allowed: true,
        smoking_allowed: false,
        min_age: 21,
        max_age: 35,
        cleanliness_level: CleanlinessLevel::High,
        lifestyle: Lifestyle::Quiet,
    };
    assert_eq!(preferences.create(Some(&token), &prefs).unwrap(), prefs);
    prefs.lifestyle = Lifestyle::Active;
    assert_eq!(preferences.update(Some(&token), &prefs).unwrap(), prefs);
    assert_eq!(preferences.fetch(Some(&token)).unwrap(), prefs);

    // Step 7: no listing yet.
    let err = listings.fetch(Some(&token)).unwrap_err();
    assert!(err.is_not_found());

    // Step 8: create a listing with two images.
    let images = vec![vec![1, 2, 3], vec![4, 5, 6]];
    listings.create(Some(&token), &listing("Sunny room"), &images).unwrap();
    let created = listings.fetch(Some(&token)).unwrap();
    assert_eq!(created.description, "Sunny room");
    assert_eq!(created.rent_price_weekly, "320.50");
    assert!(created.pets_allowed);
    assert_eq!(created.image_urls.len(), 2);

    // Step 9: replace only the fourth slot; existing images survive.
    let replaced = BTreeMap::from([(3, vec![7, 8, 9])]);
    listings
        .update(Some(&token), &listing("Sunnier room"), &replaced)
        .unwrap();
    let updated = listings.fetch(Some(&token)).unwrap();
    assert_eq!(updated.description, "Sunnier room");
    assert_eq!(updated.image_urls.len(), 3);
    assert_eq!(updated.image_urls[..2], created.image_urls[..]);

    // Step 10: delete, then the listing is gone.
    listings.delete(Some(&token)).unwrap();
    assert!(listings.fetch(Some(&token)).unwrap_err().is_not_found());

    // Step 11: deleting again is a plain 404 failure, not NotFound.
    let err = listings.delete(Some(&token)).unwrap_err();
    assert_eq!(err.kind().status_code(), Some(404));
    assert!(!err.is_not_found());

    // Step 12: profile update returns the refreshed user.
    let update = ProfileUpdate {
        name: "Samantha".to_string(),
        age: 25,
        gender: Gender::Female,
        bio: "Still tidy".to_string(),
        location: "Redfern".to_string(),
    };
    let user = profile.update(Some(&token), &update, None).unwrap();
    assert_eq!(user.id, registered.user.id);
    assert_eq!(user.name, "Samantha");
    assert_eq!(user.gender, Gender::Female);
    assert_eq!(user.profile_image, registered.user.profile_image);
}

#[test]
fn authenticated_calls_without_token_never_leave_the_client() {
    // Nothing listens on this address; a sent request would fail as Transport.
    let backend = Backend::new(BrikClient::new("http://127.0.0.1:9"), Arc::new(UreqTransport::new()));
    let err = ListingsClient::new(backend.clone()).fetch(None).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MissingAuthToken));
    assert!(err.failed_before_send());

    let err = PreferencesClient::new(backend).fetch(None).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::MissingAuthToken));
}

#[test]
fn stale_token_is_rejected_by_server() {
    let backend = Backend::new(BrikClient::new(&start_server()), Arc::new(UreqTransport::new()));
    let stale = brik_core::BearerToken::new("expired");
    let err = ListingsClient::new(backend).fetch(Some(&stale)).unwrap_err();
    assert!(
        matches!(err.kind(), ErrorKind::Server { status: 401, message } if message == "Unauthorized"),
        "{err}"
    );
}

#[test]
fn unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = Backend::new(BrikClient::new(&format!("http://{addr}")), Arc::new(UreqTransport::new()));
    let err = AuthClient::new(backend)
        .login(&Credentials {
            email: "sam@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Transport(_)), "{err}");
    assert_eq!(err.kind().status_code(), None);
}

#[test]
fn image_keeps_its_slot_from_create_to_update() {
    let backend = Backend::new(BrikClient::new(&start_server()), Arc::new(UreqTransport::new()));
    let auth = AuthClient::new(backend.clone());
    let listings = ListingsClient::new(backend);
    let token = auth.register(&registration("slots@example.com"), None).unwrap().token;

    listings
        .create_in_slots(Some(&token), &listing("Room"), &BTreeMap::from([(3, vec![0x44])]))
        .unwrap();
    let created = listings.fetch(Some(&token)).unwrap();
    assert_eq!(created.image_urls.len(), 1);

    listings
        .update(Some(&token), &listing("Room"), &BTreeMap::from([(3, vec![0x55])]))
        .unwrap();
    let updated = listings.fetch(Some(&token)).unwrap();
    assert_eq!(updated.image_urls.len(), 1, "slot 4 was replaced, not added");
    assert_ne!(updated.image_urls, created.image_urls);
}
