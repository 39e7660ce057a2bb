pub mod draft;
pub mod program;
pub mod school;

pub use draft::{DraftCourse, DraftForm, DraftHousing, DraftInternship};
pub use program::{
    HousingRecord, HousingType, InternshipRecord, Language, LanguageRef, Program, ProgramPayload,
    ProgramStatus, SchoolRef, SchoolSummary,
};
pub use school::School;
