//! In-memory stand-in for the Brik backend.
//!
//! Implements the auth, listing, preferences and profile endpoints with the
//! same envelopes and status codes the client expects. Everything lives in
//! one `Store` behind a `RwLock`; nothing is persisted.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const IMAGE_SLOTS: usize = 5;
const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub bio: String,
    pub location: String,
    pub profile_image: Option<String>,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub location: String,
    pub rent_price_weekly: String,
    pub availability_date: String,
    pub pets_allowed: bool,
    pub image_urls: Vec<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub preferred_location: String,
    pub min_budget: i32,
    pub max_budget: i32,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,
    pub min_age: u32,
    pub max_age: u32,
    pub cleanliness_level: String,
    pub lifestyle: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

#[derive(Serialize, Deserialize)]
pub struct ListingEnvelope {
    pub listing: Listing,
}

#[derive(Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

struct Account {
    user: User,
    password: String,
}

struct StoredListing {
    listing: Listing,
    slots: [Option<String>; IMAGE_SLOTS],
}

impl StoredListing {
    fn view(&self) -> Listing {
        Listing {
            image_urls: self.slots.iter().flatten().cloned().collect(),
            ..self.listing.clone()
        }
    }
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    accounts: HashMap<i64, Account>,
    tokens: HashMap<String, i64>,
    listings: HashMap<i64, StoredListing>,
    preferences: HashMap<i64, Preferences>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn issue_token(&mut self, user_id: i64) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), user_id);
        token
    }
}

pub type Db = Arc<RwLock<Store>>;

type Rejection = (StatusCode, Json<Message>);
type ApiResult<T> = Result<T, Rejection>;

fn reject(status: StatusCode, message: impl Into<String>) -> Rejection {
    (
        status,
        Json(Message {
            message: message.into(),
        }),
    )
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route(
            "/user/listings",
            get(get_listing)
                .post(create_listing)
                .put(update_listing)
                .delete(delete_listing),
        )
        .route(
            "/user/preferences",
            get(get_preferences)
                .post(create_preferences)
                .put(update_preferences),
        )
        .route("/user/update", put(update_profile))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn authenticate(store: &Store, headers: &HeaderMap) -> ApiResult<i64> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| store.tokens.get(token).copied())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Unauthorized"))
}

/// Text fields by name, and the names of file parts with their sizes.
#[derive(Default)]
struct Form {
    text: HashMap<String, String>,
    files: HashMap<String, usize>,
}

impl Form {
    fn required(&self, name: &str) -> ApiResult<String> {
        self.text
            .get(name)
            .cloned()
            .ok_or_else(|| reject(StatusCode::BAD_REQUEST, format!("Missing field: {name}")))
    }

    fn parsed<T: std::str::FromStr>(&self, name: &str) -> ApiResult<T> {
        self.required(name)?
            .parse()
            .map_err(|_| reject(StatusCode::BAD_REQUEST, format!("Invalid field: {name}")))
    }

    fn gender(&self) -> ApiResult<String> {
        let gender = self.required("gender")?;
        if GENDERS.contains(&gender.as_str()) {
            Ok(gender)
        } else {
            Err(reject(StatusCode::BAD_REQUEST, "Invalid field: gender"))
        }
    }
}

async fn read_form(mut multipart: Multipart) -> ApiResult<Form> {
    let malformed = |e: axum::extract::multipart::MultipartError| {
        reject(StatusCode::BAD_REQUEST, format!("Malformed multipart body: {e}"))
    };
    let mut form = Form::default();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            let bytes = field.bytes().await.map_err(malformed)?;
            form.files.insert(name, bytes.len());
        } else {
            let value = field.text().await.map_err(malformed)?;
            form.text.insert(name, value);
        }
    }
    Ok(form)
}

fn upload_url() -> String {
    format!("/uploads/{}.jpg", Uuid::new_v4())
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let mut store = db.write().await;
    let user = store
        .accounts
        .values()
        .find(|account| account.user.email == input.email && account.password == input.password)
        .map(|account| account.user.clone())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid credentials"))?;
    let token = store.issue_token(user.id);
    info!(user_id = user.id, "login");
    Ok(Json(AuthResponse { token, user }))
}

async fn register(
    State(db): State<Db>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let form = read_form(multipart).await?;
    let email = form.required("email")?;
    let password = form.required("password")?;
    let name = form.required("name")?;
    let age: u32 = form.parsed("age")?;
    let gender = form.gender()?;
    let bio = form.required("bio")?;
    let location = form.required("location")?;

    let mut store = db.write().await;
    if store.accounts.values().any(|account| account.user.email == email) {
        return Err(reject(StatusCode::CONFLICT, "Email already registered"));
    }
    let id = store.next_id();
    let user = User {
        id,
        email,
        name,
        age,
        gender,
        bio,
        location,
        profile_image: form.files.contains_key("profileImage").then(upload_url),
        rating: 0,
        created_at: Utc::now(),
    };
    store.accounts.insert(
        id,
        Account {
            user: user.clone(),
            password,
        },
    );
    let token = store.issue_token(id);
    info!(user_id = id, "registered");
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

async fn get_listing(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<ListingEnvelope>> {
    let store = db.read().await;
    let user_id = authenticate(&store, &headers)?;
    store
        .listings
        .get(&user_id)
        .map(|stored| Json(ListingEnvelope { listing: stored.view() }))
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "No listing found"))
}

fn image_slot(field: &str) -> Option<usize> {
    field
        .strip_prefix("listingImage")?
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=IMAGE_SLOTS).contains(n))
        .map(|n| n - 1)
}

fn rent(form: &Form) -> ApiResult<String> {
    let rent: f64 = form.parsed("rentPriceWeekly")?;
    Ok(format!("{rent:.2}"))
}

async fn create_listing(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ListingEnvelope>)> {
    let form = read_form(multipart).await?;
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    if store.listings.contains_key(&user_id) {
        return Err(reject(StatusCode::CONFLICT, "Listing already exists"));
    }

    let mut slots: [Option<String>; IMAGE_SLOTS] = Default::default();
    for name in form.files.keys() {
        if let Some(slot) = image_slot(name) {
            slots[slot] = Some(upload_url());
        }
    }
    let id = store.next_id();
    let stored = StoredListing {
        listing: Listing {
            id,
            user_id,
            description: form.required("description")?,
            location: form.required("location")?,
            rent_price_weekly: rent(&form)?,
            availability_date: form.required("availabilityDate")?,
            pets_allowed: form.parsed("petsAllowed")?,
            image_urls: Vec::new(),
            created_at: Utc::now().to_rfc3339(),
        },
        slots,
    };
    let listing = stored.view();
    store.listings.insert(user_id, stored);
    Ok((StatusCode::CREATED, Json(ListingEnvelope { listing })))
}

async fn update_listing(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<Json<ListingEnvelope>> {
    let form = read_form(multipart).await?;
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    let stored = store
        .listings
        .get_mut(&user_id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "No listing found"))?;

    let listing = Listing {
        description: form.required("description")?,
        location: form.required("location")?,
        rent_price_weekly: rent(&form)?,
        availability_date: form.required("availabilityDate")?,
        pets_allowed: form.parsed("petsAllowed")?,
        ..stored.listing.clone()
    };
    stored.listing = listing;
    for name in form.files.keys() {
        if let Some(slot) = image_slot(name) {
            stored.slots[slot] = Some(upload_url());
        }
    }
    Ok(Json(ListingEnvelope {
        listing: stored.view(),
    }))
}

async fn delete_listing(State(db): State<Db>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    store
        .listings
        .remove(&user_id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "No listing found"))
}

async fn get_preferences(State(db): State<Db>, headers: HeaderMap) -> ApiResult<Json<Preferences>> {
    let store = db.read().await;
    let user_id = authenticate(&store, &headers)?;
    store
        .preferences
        .get(&user_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "No preferences found"))
}

async fn create_preferences(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Preferences>,
) -> ApiResult<(StatusCode, Json<Preferences>)> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    if store.preferences.contains_key(&user_id) {
        return Err(reject(StatusCode::CONFLICT, "Preferences already exist"));
    }
    store.preferences.insert(user_id, input.clone());
    Ok((StatusCode::CREATED, Json(input)))
}

async fn update_preferences(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Preferences>,
) -> ApiResult<Json<Preferences>> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    let saved = store
        .preferences
        .get_mut(&user_id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "No preferences found"))?;
    *saved = input.clone();
    Ok(Json(input))
}

async fn update_profile(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Multipart,
) -> ApiResult<Json<UserEnvelope>> {
    let form = read_form(multipart).await?;
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;
    let account = store
        .accounts
        .get_mut(&user_id)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Unauthorized"))?;

    let user = User {
        name: form.required("name")?,
        age: form.parsed("age")?,
        gender: form.gender()?,
        bio: form.required("bio")?,
        location: form.required("location")?,
        profile_image: if form.files.contains_key("profileImage") {
            Some(upload_url())
        } else {
            account.user.profile_image.clone()
        },
        ..account.user.clone()
    };
    account.user = user.clone();
    Ok(Json(UserEnvelope { user }))
}
