use std::sync::Arc;

use super::{user_message, LoadingFlag};
use crate::preferences::PreferencesClient;
use crate::session::Session;
use crate::types::{CleanlinessLevel, Lifestyle, Preferences};
use crate::validation::MINIMUM_AGE;

pub struct PreferencesController {
    client: PreferencesClient,
    session: Arc<Session>,
    loading: LoadingFlag,
    has_saved: bool,
    pub preferred_location: String,
    pub min_budget: String,
    pub max_budget: String,
    pub pets_allowed: bool,
    pub smoking_allowed: bool,
    pub min_age: u32,
    pub max_age: u32,
    pub cleanliness_level: CleanlinessLevel,
    pub lifestyle: Lifestyle,
    pub preferred_location_error: Option<String>,
    pub min_budget_error: Option<String>,
    pub max_budget_error: Option<String>,
    pub min_age_error: Option<String>,
    pub max_age_error: Option<String>,
    pub error_message: Option<String>,
}

impl PreferencesController {
    pub fn new(client: PreferencesClient, session: Arc<Session>) -> Self {
        Self {
            client,
            session,
            loading: LoadingFlag::default(),
            has_saved: false,
            preferred_location: String::new(),
            min_budget: "0".to_string(),
            max_budget: "0".to_string(),
            pets_allowed: false,
            smoking_allowed: false,
            min_age: MINIMUM_AGE,
            max_age: 100,
            cleanliness_level: CleanlinessLevel::Low,
            lifestyle: Lifestyle::Quiet,
            preferred_location_error: None,
            min_budget_error: None,
            max_budget_error: None,
            min_age_error: None,
            max_age_error: None,
            error_message: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Whether the backend already holds preferences, so saving updates
    /// rather than creates.
    pub fn has_saved(&self) -> bool {
        self.has_saved
    }

    pub fn validate_fields(&mut self) {
        self.preferred_location_error = self
            .preferred_location
            .trim()
            .is_empty()
            .then(|| "Preferred location is required.".to_string());

        let age_order = self.min_age <= self.max_age;
        self.min_age_error = (!age_order).then(|| "Must be lower than max age.".to_string());
        self.max_age_error = (!age_order).then(|| "Must be higher than min age.".to_string());

        match (self.min_budget.trim().parse::<i32>(), self.max_budget.trim().parse::<i32>()) {
            (Ok(min), Ok(max)) => {
                self.min_budget_error = (min > max).then(|| "Must be lower than max budget.".to_string());
                self.max_budget_error = (min > max).then(|| "Must be higher than min budget.".to_string());
            }
            (min, max) => {
                self.min_budget_error = min.is_err().then(|| "Must be a number.".to_string());
                self.max_budget_error = max.is_err().then(|| "Must be a number.".to_string());
            }
        }
    }

    pub fn can_submit(&self) -> bool {
        [
            &self.preferred_location_error,
            &self.min_budget_error,
            &self.max_budget_error,
            &self.min_age_error,
            &self.max_age_error,
        ]
        .iter()
        .all(|error| error.is_none())
    }

    fn apply(&mut self, preferences: Preferences) {
        self.preferred_location = preferences.preferred_location;
        self.min_budget = preferences.min_budget.to_string();
        self.max_budget = preferences.max_budget.to_string();
        self.pets_allowed = preferences.pets_allowed;
        self.smoking_allowed = preferences.smoking_allowed;
        self.min_age = preferences.min_age;
        self.max_age = preferences.max_age;
        self.cleanliness_level = preferences.cleanliness_level;
        self.lifestyle = preferences.lifestyle;
        self.has_saved = true;
    }

    /// Populate the form from the backend. A 404 leaves the defaults in
    /// place and selects the create flow without showing an error.
    pub fn load_preferences(&mut self) {
        let _loading = self.loading.begin();
        self.error_message = None;
        match self.client.fetch(self.session.token().as_ref()) {
            Ok(preferences) => self.apply(preferences),
            Err(e) if e.is_not_found() => self.has_saved = false,
            Err(e) => self.error_message = Some(user_message(&e)),
        }
    }

    pub fn save_preferences(&mut self) -> bool {
        self.validate_fields();
        if !self.can_submit() {
            self.error_message = Some("Please correct the errors in the form.".to_string());
            return false;
        }
        let (Ok(min_budget), Ok(max_budget)) = (
            self.min_budget.trim().parse::<i32>(),
            self.max_budget.trim().parse::<i32>(),
        ) else {
            self.error_message = Some("Please enter valid numeric budgets.".to_string());
            return false;
        };

        let preferences = Preferences {
            preferred_location: self.preferred_location.trim().to_string(),
            min_budget,
            max_budget,
            pets_allowed: self.pets_allowed,
            smoking_allowed: self.smoking_allowed,
            min_age: self.min_age,
            max_age: self.max_age,
            cleanliness_level: self.cleanliness_level,
            lifestyle: self.lifestyle,
        };

        let _loading = self.loading.begin();
        self.error_message = None;
        let token = self.session.token();
        let result = if self.has_saved {
            self.client.update(token.as_ref(), &preferences)
        } else {
            self.client.create(token.as_ref(), &preferences)
        };
        match result {
            Ok(saved) => {
                self.apply(saved);
                true
            }
            Err(e) => {
                self.error_message = Some(user_message(&e));
                false
            }
        }
    }
}
