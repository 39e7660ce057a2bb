use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Language select defaults to Inglês, matching the registration form.
pub const DEFAULT_LANGUAGE_ID: i64 = 1;
/// Fields the form does not expose yet; the backend contract still expects them.
pub const DEFAULT_DURATION_WEEKS: u32 = 4;
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_LANGUAGE_LEVEL: &str = "Básico";
pub const PROGRAM_TYPE_LANGUAGE_COURSE: &str = "CURSO_IDIOMA";

/// Language options offered by the registration form.
pub const LANGUAGES: [(i64, &str); 6] = [
    (1, "Inglês"),
    (2, "Espanhol"),
    (3, "Francês"),
    (4, "Alemão"),
    (5, "Italiano"),
    (6, "Mandarim"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramStatus {
    #[default]
    #[serde(rename = "ATIVO")]
    Active,
    #[serde(rename = "INATIVO")]
    Inactive,
}

impl ProgramStatus {
    pub fn toggled(self) -> Self {
        match self {
            ProgramStatus::Active => ProgramStatus::Inactive,
            ProgramStatus::Inactive => ProgramStatus::Active,
        }
    }

    pub fn is_active(self) -> bool {
        self == ProgramStatus::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProgramStatus::Active => "ATIVO",
            ProgramStatus::Inactive => "INATIVO",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: String,
}

/// Reference-only shape the backend expects inside create/update payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRef {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolSummary {
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolRef {
    pub id: i64,
}

/// A study-abroad program as returned by the backend. Housing and internship
/// data arrive as opaque serialized blobs and are never parsed back into
/// structured form by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "idioma", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(rename = "pais")]
    pub country: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "vagasDisponiveis")]
    pub available_seats: u32,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "moeda", default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(rename = "duracaoSemanas", default, skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<u32>,
    #[serde(rename = "escola", default, skip_serializing_if = "Option::is_none")]
    pub school: Option<SchoolSummary>,
    #[serde(rename = "dataCadastro", default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<String>,
    #[serde(rename = "acomodacao", default, skip_serializing_if = "Option::is_none")]
    pub housing: Option<String>,
    #[serde(rename = "acomodacaoPreco", default, skip_serializing_if = "Option::is_none")]
    pub housing_price: Option<String>,
    #[serde(rename = "infoEstagio", default, skip_serializing_if = "Option::is_none")]
    pub internship: Option<String>,
    #[serde(rename = "statusPrograma", default)]
    pub status: ProgramStatus,
}

impl Program {
    pub fn belongs_to(&self, school_id: i64) -> bool {
        self.school.as_ref().is_some_and(|s| s.id == school_id)
    }
}

/// Full create/update request body. Every mutation sends the whole shape;
/// the backend does not accept partial updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramPayload {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "idioma")]
    pub language: LanguageRef,
    #[serde(rename = "pais")]
    pub country: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "duracaoSemanas")]
    pub duration_weeks: u32,
    #[serde(rename = "vagasDisponiveis")]
    pub available_seats: u32,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "moeda")]
    pub currency: String,
    #[serde(rename = "nivelIdioma")]
    pub language_level: String,
    #[serde(rename = "tipoPrograma")]
    pub program_type: String,
    #[serde(rename = "temBolsa")]
    pub has_scholarship: bool,
    #[serde(rename = "escola")]
    pub school: SchoolRef,
    #[serde(rename = "dataCadastro")]
    pub registered_at: String,
    #[serde(rename = "acomodacao", default, skip_serializing_if = "Option::is_none")]
    pub housing: Option<String>,
    #[serde(rename = "acomodacaoPreco", default, skip_serializing_if = "Option::is_none")]
    pub housing_price: Option<String>,
    #[serde(rename = "infoEstagio", default, skip_serializing_if = "Option::is_none")]
    pub internship: Option<String>,
    #[serde(rename = "statusPrograma")]
    pub status: ProgramStatus,
}

impl ProgramPayload {
    /// Rebuilds the full request body from a fetched program, carrying the
    /// opaque blobs through unchanged. Used by status toggles and edit saves.
    pub fn from_program(program: &Program) -> Self {
        Self {
            title: program.title.clone(),
            description: program.description.clone(),
            language: LanguageRef {
                id: program.language.as_ref().map_or(DEFAULT_LANGUAGE_ID, |l| l.id),
            },
            country: program.country.clone(),
            city: program.city.clone(),
            duration_weeks: program.duration_weeks.unwrap_or(DEFAULT_DURATION_WEEKS),
            available_seats: program.available_seats,
            price: program.price,
            currency: program
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            language_level: DEFAULT_LANGUAGE_LEVEL.to_string(),
            program_type: PROGRAM_TYPE_LANGUAGE_COURSE.to_string(),
            has_scholarship: false,
            school: SchoolRef {
                id: program.school.as_ref().map_or(0, |s| s.id),
            },
            registered_at: program
                .registered_at
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            housing: program.housing.clone(),
            housing_price: program.housing_price.clone(),
            internship: program.internship.clone(),
            status: program.status,
        }
    }
}

/// Lodging catalog shown by the registration form. Entries keep the raw
/// select value, so an unset type still serializes as an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HousingType {
    FamilyStay,
    Dorm,
    SharedApartment,
    PrivateStudio,
    Hotel,
}

impl HousingType {
    pub const ALL: [HousingType; 5] = [
        HousingType::FamilyStay,
        HousingType::Dorm,
        HousingType::SharedApartment,
        HousingType::PrivateStudio,
        HousingType::Hotel,
    ];

    pub fn wire_value(self) -> &'static str {
        match self {
            HousingType::FamilyStay => "CASA_FAMILIA",
            HousingType::Dorm => "RESIDENCIA",
            HousingType::SharedApartment => "APARTAMENTO",
            HousingType::PrivateStudio => "STUDIO",
            HousingType::Hotel => "HOTEL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HousingType::FamilyStay => "Casa de Família",
            HousingType::Dorm => "Residência Estudantil",
            HousingType::SharedApartment => "Apartamento Compartilhado",
            HousingType::PrivateStudio => "Studio Privado",
            HousingType::Hotel => "Hotel",
        }
    }
}

/// One element of the serialized `acomodacao` blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousingRecord {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "precoSemanal")]
    pub weekly_price: String,
    #[serde(rename = "comodidades")]
    pub amenities: Vec<String>,
}

/// Shape of the serialized `infoEstagio` blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternshipRecord {
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "duracao")]
    pub duration: String,
    #[serde(rename = "areas")]
    pub areas: Vec<String>,
    #[serde(rename = "remunerado")]
    pub paid: bool,
    #[serde(rename = "requisitos")]
    pub requirements: String,
}
