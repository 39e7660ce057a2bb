use crate::error::AppError;

/// Client-only draft entered through the dashboard's inline form. Never
/// sent to the backend; lost when the dashboard is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftCourse {
    pub id: i64,
    pub name: String,
    pub vacancies: u32,
    pub duration: String,
    pub price: String,
    pub deadline: String,
    pub description: String,
    pub requirements: String,
    pub housing: DraftHousing,
    pub internship: DraftInternship,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftHousing {
    pub kind: String,
    pub description: String,
    pub price: String,
    pub facilities: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftInternship {
    pub available: bool,
    pub description: String,
    pub duration: String,
    pub areas: String,
}

/// Raw string input of the inline draft form.
#[derive(Debug, Clone, Default)]
pub struct DraftForm {
    pub name: String,
    pub vacancies: String,
    pub duration: String,
    pub price: String,
    pub deadline: String,
    pub description: String,
    pub requirements: String,
    pub housing_type: String,
    pub housing_description: String,
    pub housing_price: String,
    pub housing_facilities: String,
    pub internship_available: bool,
    pub internship_description: String,
    pub internship_duration: String,
    pub internship_areas: String,
}

impl DraftForm {
    /// Name, vacancies and housing type are the inline form's required fields.
    pub fn build(self, id: i64) -> Result<DraftCourse, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        let vacancies = self
            .vacancies
            .trim()
            .parse::<u32>()
            .map_err(|_| AppError::Validation("vacancies must be a number".to_string()))?;
        if self.housing_type.trim().is_empty() {
            return Err(AppError::Validation("housing type is required".to_string()));
        }

        Ok(DraftCourse {
            id,
            name: self.name.trim().to_string(),
            vacancies,
            duration: self.duration,
            price: self.price,
            deadline: self.deadline,
            description: self.description,
            requirements: self.requirements,
            housing: DraftHousing {
                kind: self.housing_type,
                description: self.housing_description,
                price: self.housing_price,
                facilities: self.housing_facilities,
            },
            internship: DraftInternship {
                available: self.internship_available,
                description: self.internship_description,
                duration: self.internship_duration,
                areas: self.internship_areas,
            },
        })
    }
}
