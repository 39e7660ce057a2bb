pub mod dashboard;
pub mod registration;

pub use dashboard::{Dashboard, DashboardEntry, EditDialog};
pub use registration::{
    FallbackPolicy, HousingEntry, InternshipEntry, RegistrationForm, RegistrationService,
    SchoolResolution,
};
