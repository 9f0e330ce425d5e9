//! Domain DTOs for the Brik API.
//!
//! # Design
//! Response types mirror the backend's camelCase JSON. Request payloads that
//! travel as multipart (`RegistrationPayload`, `ListingPayload`,
//! `ProfileUpdate`) are plain structs; the service clients stringify their
//! fields. Free-form strings the backend treats as enumerations are closed
//! enums here and reject unknown values when parsed or decoded.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::token::BearerToken;

/// A string did not name any variant of a closed enum.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized {kind}: `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! literal_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $text:literal $(| $alias:literal)*),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text $(, alias = $alias)*)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text $(| $alias)* => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

literal_enum!(Gender, "gender", {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

literal_enum!(CleanlinessLevel, "cleanliness level", {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

literal_enum!(
    /// `"Quite"` is accepted on input for records saved by older clients.
    Lifestyle, "lifestyle", {
    Quiet => "Quiet" | "Quite",
    Relaxed => "Relaxed",
    Active => "Active",
});

/// A registered user as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub bio: String,
    pub location: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-up fields. `age` is derived from a birth date by the caller and is
/// already at least 18 here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPayload {
    pub email: String,
    pub password: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub bio: String,
    pub location: String,
}

/// `{token, user}` envelope returned by login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: BearerToken,
    pub user: User,
}

/// `{user}` envelope returned by a profile update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub bio: String,
    pub location: String,
}

/// A room listing as stored by the backend.
///
/// `rent_price_weekly` is the backend's decimal rendered as text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub location: String,
    pub rent_price_weekly: String,
    pub availability_date: String,
    pub pets_allowed: bool,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub created_at: String,
}

/// `{listing}` envelope returned by the listing fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingEnvelope {
    pub listing: Listing,
}

/// Text fields of a listing create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPayload {
    pub description: String,
    pub location: String,
    pub rent_price_weekly: f64,
    /// ISO-8601 date or date-time.
    pub availability_date: String,
    pub pets_allowed: bool,
}

/// Match preferences, sent and received as bare JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub preferred_location: String,
    pub min_budget: i32,
    pub max_budget: i32,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,
    pub min_age: u32,
    pub max_age: u32,
    pub cleanliness_level: CleanlinessLevel,
    pub lifestyle: Lifestyle,
}
