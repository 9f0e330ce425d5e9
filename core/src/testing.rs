//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::{Backend, BrikClient};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, TransportError};

pub const BASE_URL: &str = "http://localhost:3000";

/// Replays queued outcomes in order and records every request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.outcomes.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }));
    }

    pub fn fail(&self, message: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(TransportError(message.to_string())));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn last_body_text(&self) -> String {
        String::from_utf8_lossy(self.last_request().body.as_deref().unwrap_or_default()).into_owned()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_string())))
    }
}

pub fn backend(transport: &Arc<ScriptedTransport>) -> Backend {
    Backend::new(BrikClient::new(BASE_URL), transport.clone())
}

pub const USER_JSON: &str = r#"{
    "id": 7,
    "email": "a@b.com",
    "name": "Sam",
    "age": 24,
    "gender": "Female",
    "bio": "Early riser",
    "location": "Glebe",
    "profileImage": null,
    "rating": 4,
    "createdAt": "2025-06-01T10:00:00Z"
}"#;

pub fn auth_json(token: &str) -> String {
    format!(r#"{{"token":"{token}","user":{USER_JSON}}}"#)
}

pub const LISTING_JSON: &str = r#"{
    "id": 3,
    "userId": 7,
    "description": "Sunny room",
    "location": "Glebe",
    "rentPriceWeekly": "320.00",
    "availabilityDate": "2025-07-01T00:00:00Z",
    "petsAllowed": true,
    "imageUrls": ["/uploads/1.jpg", "/uploads/2.jpg"],
    "createdAt": "2025-06-16T09:00:00Z"
}"#;

pub const PREFERENCES_JSON: &str = r#"{
    "preferredLocation": "Newtown",
    "minBudget": 200,
    "maxBudget": 450,
    "petsAllowed": true,
    "smokingAllowed": false,
    "minAge": 21,
    "maxAge": 35,
    "cleanlinessLevel": "High",
    "lifestyle": "Quiet"
}"#;
