use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::gateway::{ProgramGateway, SchoolGateway};
use crate::models::program::{DEFAULT_CURRENCY, DEFAULT_DURATION_WEEKS, DEFAULT_LANGUAGE_ID, DEFAULT_LANGUAGE_LEVEL, PROGRAM_TYPE_LANGUAGE_COURSE};
use crate::models::{
    HousingRecord, InternshipRecord, LanguageRef, ProgramPayload, ProgramStatus, SchoolRef,
};
use crate::shell::{Navigator, Notification, Notifier, Route};

/// Outcome of the school-by-user lookup. `Unresolved` covers both a missing
/// link and a failed lookup; the caller decides how to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchoolResolution {
    Resolved(i64),
    Unresolved,
}

/// What to do when the acting school cannot be resolved from the user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Proceed with the user id standing in for the school id.
    UseUserId,
    /// Fail the submission instead of guessing.
    Abort,
}

/// One lodging entry of the registration form. The type is kept as the raw
/// select value; an entry with an empty type is still serialized.
#[derive(Debug, Clone, Default)]
pub struct HousingEntry {
    pub entry_id: i64,
    pub kind: String,
    pub description: String,
    pub weekly_price: String,
    pub amenities: Vec<String>,
}

impl HousingEntry {
    fn record(&self) -> HousingRecord {
        HousingRecord {
            kind: self.kind.clone(),
            description: self.description.clone(),
            weekly_price: self.weekly_price.clone(),
            amenities: self.amenities.clone(),
        }
    }
}

/// The form's single optional internship block.
#[derive(Debug, Clone, Default)]
pub struct InternshipEntry {
    pub available: bool,
    pub description: String,
    pub duration: String,
    pub areas: Vec<String>,
    pub paid: bool,
    pub requirements: String,
}

/// Raw input of the registration form. Everything arrives as text and is
/// only parsed at submit time.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub title: String,
    pub description: String,
    pub country: String,
    pub city: String,
    pub available_seats: String,
    pub price: String,
    pub language_id: i64,
    pub housing: Vec<HousingEntry>,
    pub internship: InternshipEntry,
    next_entry_id: i64,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            country: String::new(),
            city: String::new(),
            available_seats: String::new(),
            price: String::new(),
            language_id: DEFAULT_LANGUAGE_ID,
            housing: Vec::new(),
            internship: InternshipEntry::default(),
            next_entry_id: 1,
        }
    }

    pub fn add_housing(&mut self) -> i64 {
        let entry_id = self.next_entry_id;
        self.next_entry_id += 1;
        self.housing.push(HousingEntry {
            entry_id,
            ..HousingEntry::default()
        });
        entry_id
    }

    pub fn remove_housing(&mut self, entry_id: i64) {
        self.housing.retain(|entry| entry.entry_id != entry_id);
    }

    pub fn housing_mut(&mut self, entry_id: i64) -> Option<&mut HousingEntry> {
        self.housing.iter_mut().find(|e| e.entry_id == entry_id)
    }

    pub fn add_amenity(&mut self, entry_id: i64, amenity: &str) {
        let amenity = amenity.trim();
        if amenity.is_empty() {
            return;
        }
        if let Some(entry) = self.housing_mut(entry_id) {
            entry.amenities.push(amenity.to_string());
        }
    }

    pub fn remove_amenity(&mut self, entry_id: i64, amenity: &str) {
        if let Some(entry) = self.housing_mut(entry_id) {
            entry.amenities.retain(|a| a != amenity);
        }
    }

    pub fn add_area(&mut self, area: &str) {
        let area = area.trim();
        if !area.is_empty() {
            self.internship.areas.push(area.to_string());
        }
    }

    pub fn remove_area(&mut self, area: &str) {
        self.internship.areas.retain(|a| a != area);
    }

    /// Required-field check, run at submit time only. Housing entries and
    /// the internship block have no required sub-fields.
    pub fn validate(&self) -> Result<(u32, f64), AppError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("country", &self.country),
            ("city", &self.city),
            ("available seats", &self.available_seats),
            ("price", &self.price),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }

        let seats = self
            .available_seats
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|seats| *seats > 0)
            .ok_or_else(|| {
                AppError::Validation("available seats must be a positive number".to_string())
            })?;

        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| *price > 0.0)
            .ok_or_else(|| AppError::Validation("price must be a positive amount".to_string()))?;

        Ok((seats, price))
    }

    /// Serializes the housing entries into the blob plus the headline
    /// weekly price taken from the first entry.
    fn housing_blobs(&self) -> (Option<String>, Option<String>) {
        if self.housing.is_empty() {
            return (None, None);
        }
        let records: Vec<HousingRecord> = self.housing.iter().map(HousingEntry::record).collect();
        let blob =
            serde_json::to_string(&records).expect("housing records always serialize");
        let headline = self.housing[0].weekly_price.clone();
        (Some(blob), Some(headline))
    }

    /// Serializes the internship block, or nothing at all when it is not
    /// offered. The payload must carry no `infoEstagio` key in that case.
    fn internship_blob(&self) -> Option<String> {
        if !self.internship.available {
            return None;
        }
        let record = InternshipRecord {
            description: self.internship.description.clone(),
            duration: self.internship.duration.clone(),
            areas: self.internship.areas.clone(),
            paid: self.internship.paid,
            requirements: self.internship.requirements.clone(),
        };
        Some(serde_json::to_string(&record).expect("internship record always serializes"))
    }

    fn payload(&self, school_id: i64, seats: u32, price: f64) -> ProgramPayload {
        let (housing, housing_price) = self.housing_blobs();
        ProgramPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            language: LanguageRef {
                id: self.language_id,
            },
            country: self.country.clone(),
            city: self.city.clone(),
            duration_weeks: DEFAULT_DURATION_WEEKS,
            available_seats: seats,
            price,
            currency: DEFAULT_CURRENCY.to_string(),
            language_level: DEFAULT_LANGUAGE_LEVEL.to_string(),
            program_type: PROGRAM_TYPE_LANGUAGE_COURSE.to_string(),
            has_scholarship: false,
            school: SchoolRef { id: school_id },
            registered_at: Utc::now().to_rfc3339(),
            housing,
            housing_price,
            internship: self.internship_blob(),
            status: ProgramStatus::Active,
        }
    }
}

/// Submits one registration form against the backend, exactly once per
/// action. Owns the busy flag; the form itself stays untouched so partial
/// input survives a failed attempt.
pub struct RegistrationService {
    schools: Arc<dyn SchoolGateway>,
    programs: Arc<dyn ProgramGateway>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    submitting: bool,
}

impl RegistrationService {
    pub fn new(
        schools: Arc<dyn SchoolGateway>,
        programs: Arc<dyn ProgramGateway>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            schools,
            programs,
            notifier,
            navigator,
            submitting: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Two-step school resolution. Lookup failures of any kind degrade to
    /// `Unresolved`; the submit path applies the caller's fallback policy.
    pub async fn resolve_school(&self, user_id: i64) -> SchoolResolution {
        match self.schools.school_by_user(user_id).await {
            Ok(school) => SchoolResolution::Resolved(school.id),
            Err(err) => {
                warn!(user_id, error = %err, "school lookup failed; resolution degraded");
                SchoolResolution::Unresolved
            }
        }
    }

    /// Returns true when the program was created and the shell navigated
    /// back to the dashboard.
    pub async fn submit(
        &mut self,
        form: &RegistrationForm,
        user_id: Option<i64>,
        policy: FallbackPolicy,
    ) -> bool {
        if self.submitting {
            return false;
        }

        let Some(user_id) = user_id else {
            self.notifier.notify(Notification::error(
                "You must be signed in as a school to register a program.",
            ));
            return false;
        };

        let (seats, price) = match form.validate() {
            Ok(parsed) => parsed,
            Err(err) => {
                self.notifier.notify(Notification::error(err.to_string()));
                return false;
            }
        };

        self.submitting = true;

        let school_id = match self.resolve_school(user_id).await {
            SchoolResolution::Resolved(id) => id,
            SchoolResolution::Unresolved => match policy {
                FallbackPolicy::UseUserId => {
                    warn!(user_id, "using the user id as the school id");
                    user_id
                }
                FallbackPolicy::Abort => {
                    self.submitting = false;
                    self.notifier
                        .notify(Notification::error("Could not resolve the acting school."));
                    return false;
                }
            },
        };

        let payload = form.payload(school_id, seats, price);
        let result = self.programs.create(&payload).await;
        self.submitting = false;

        match result {
            Ok(created) => {
                info!(id = ?created.id, "program registered");
                self.notifier
                    .notify(Notification::success("Program registered successfully!"));
                self.navigator.navigate(Route::Dashboard);
                true
            }
            Err(err) => {
                warn!(error = %err, "program registration failed");
                self.notifier.notify(Notification::error(
                    "Could not register the program. Try again.",
                ));
                false
            }
        }
    }
}
