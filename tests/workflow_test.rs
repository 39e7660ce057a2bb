use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use intercambio_console::error::AppError;
use intercambio_console::gateway::{ProgramGateway, SchoolGateway};
use intercambio_console::models::{
    HousingRecord, Language, Program, ProgramPayload, ProgramStatus, School, SchoolSummary,
};
use intercambio_console::services::{
    Dashboard, FallbackPolicy, RegistrationForm, RegistrationService, SchoolResolution,
};
use intercambio_console::shell::{Navigator, Notification, Notifier, Route, Variant};

/// Backend double holding the program collection in memory, in the style
/// of the real REST resource.
struct InMemoryBackend {
    school: Option<School>,
    programs: Mutex<Vec<Program>>,
    next_id: AtomicI64,
    create_calls: AtomicUsize,
    last_payload: Mutex<Option<ProgramPayload>>,
    fail_listing: AtomicBool,
}

impl InMemoryBackend {
    fn with_school(school_id: i64, user_id: i64) -> Arc<Self> {
        Arc::new(Self {
            school: Some(School {
                id: school_id,
                name: "Escola Teste".to_string(),
                user_id,
            }),
            programs: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            create_calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
            fail_listing: AtomicBool::new(false),
        })
    }

    fn without_school() -> Arc<Self> {
        Arc::new(Self {
            school: None,
            programs: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            create_calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
            fail_listing: AtomicBool::new(false),
        })
    }

    fn seed(&self, school_id: i64, title: &str, status: ProgramStatus) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.programs.lock().unwrap().push(Program {
            id: Some(id),
            title: title.to_string(),
            description: "Programa de teste".to_string(),
            language: Some(Language {
                id: 1,
                name: "Inglês".to_string(),
            }),
            country: "UK".to_string(),
            city: "Londres".to_string(),
            available_seats: 15,
            price: 2500.0,
            currency: Some("USD".to_string()),
            duration_weeks: Some(4),
            school: Some(SchoolSummary {
                id: school_id,
                name: "Escola Teste".to_string(),
            }),
            registered_at: Some("2026-01-10T12:00:00Z".to_string()),
            housing: None,
            housing_price: None,
            internship: None,
            status,
        });
        id
    }

    fn status_of(&self, id: i64) -> ProgramStatus {
        self.programs
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == Some(id))
            .map(|p| p.status)
            .expect("program exists")
    }

    fn last_payload(&self) -> ProgramPayload {
        self.last_payload
            .lock()
            .unwrap()
            .clone()
            .expect("a payload was submitted")
    }

    fn from_payload(id: i64, payload: &ProgramPayload) -> Program {
        Program {
            id: Some(id),
            title: payload.title.clone(),
            description: payload.description.clone(),
            language: Some(Language {
                id: payload.language.id,
                name: String::new(),
            }),
            country: payload.country.clone(),
            city: payload.city.clone(),
            available_seats: payload.available_seats,
            price: payload.price,
            currency: Some(payload.currency.clone()),
            duration_weeks: Some(payload.duration_weeks),
            school: Some(SchoolSummary {
                id: payload.school.id,
                name: String::new(),
            }),
            registered_at: Some(payload.registered_at.clone()),
            housing: payload.housing.clone(),
            housing_price: payload.housing_price.clone(),
            internship: payload.internship.clone(),
            status: payload.status,
        }
    }
}

#[async_trait]
impl SchoolGateway for InMemoryBackend {
    async fn school_by_user(&self, user_id: i64) -> Result<School, AppError> {
        self.school
            .clone()
            .filter(|school| school.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("no school linked to user {user_id}")))
    }
}

#[async_trait]
impl ProgramGateway for InMemoryBackend {
    async fn list(&self) -> Result<Vec<Program>, AppError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(AppError::RequestFailed {
                status: 500,
                body: "listing unavailable".to_string(),
            });
        }
        Ok(self.programs.lock().unwrap().clone())
    }

    async fn get(&self, id: i64) -> Result<Program, AppError> {
        self.programs
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == Some(id))
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("program {id} does not exist")))
    }

    async fn create(&self, payload: &ProgramPayload) -> Result<Program, AppError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(payload.clone());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let program = Self::from_payload(id, payload);
        self.programs.lock().unwrap().push(program.clone());
        Ok(program)
    }

    async fn update(&self, id: i64, payload: &ProgramPayload) -> Result<Program, AppError> {
        let mut programs = self.programs.lock().unwrap();
        let slot = programs
            .iter_mut()
            .find(|p| p.id == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("program {id} does not exist")))?;
        *slot = Self::from_payload(id, payload);
        Ok(slot.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.programs.lock().unwrap().retain(|p| p.id != Some(id));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notes: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn errors(&self) -> usize {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.variant == Variant::Error)
            .count()
    }

    fn successes(&self) -> usize {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.variant == Variant::Success)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notes.lock().unwrap().push(notification);
    }
}

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

fn dashboard_over(backend: &Arc<InMemoryBackend>) -> (Dashboard, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let dashboard = Dashboard::new(backend.clone(), backend.clone(), notifier.clone());
    (dashboard, notifier)
}

fn registration_over(
    backend: &Arc<InMemoryBackend>,
) -> (RegistrationService, Arc<RecordingNotifier>, Arc<RecordingNavigator>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let service = RegistrationService::new(
        backend.clone(),
        backend.clone(),
        notifier.clone(),
        navigator.clone(),
    );
    (service, notifier, navigator)
}

fn filled_form() -> RegistrationForm {
    let mut form = RegistrationForm::new();
    form.title = "Inglês em Londres".to_string();
    form.description = "Curso intensivo de inglês".to_string();
    form.country = "UK".to_string();
    form.city = "Londres".to_string();
    form.available_seats = "15".to_string();
    form.price = "2500".to_string();
    form
}

#[tokio::test]
async fn test_load_shows_only_the_schools_programs() {
    let backend = InMemoryBackend::with_school(1, 7);
    backend.seed(1, "Inglês em Londres", ProgramStatus::Active);
    backend.seed(1, "Espanhol em Madri", ProgramStatus::Inactive);
    backend.seed(2, "Francês em Paris", ProgramStatus::Active);
    backend.seed(2, "Alemão em Berlim", ProgramStatus::Active);
    backend.seed(3, "Italiano em Roma", ProgramStatus::Active);

    let (mut dashboard, notifier) = dashboard_over(&backend);
    dashboard.load(7).await;

    assert_eq!(dashboard.rows().len(), 2);
    assert!(dashboard.rows().iter().all(|p| p.belongs_to(1)));
    assert_eq!(notifier.errors(), 0);
}

#[tokio::test]
async fn test_toggle_twice_round_trips_the_status() {
    let backend = InMemoryBackend::with_school(1, 7);
    let id = backend.seed(1, "Inglês em Londres", ProgramStatus::Active);

    let (mut dashboard, notifier) = dashboard_over(&backend);
    dashboard.load(7).await;

    dashboard.toggle_status(id).await;
    assert_eq!(backend.status_of(id), ProgramStatus::Inactive);
    assert_eq!(dashboard.rows()[0].status, ProgramStatus::Inactive);

    dashboard.toggle_status(id).await;
    assert_eq!(backend.status_of(id), ProgramStatus::Active);
    assert_eq!(dashboard.rows()[0].status, ProgramStatus::Active);
    assert_eq!(notifier.successes(), 2);
    assert!(!dashboard.is_busy(id));
}

#[tokio::test]
async fn test_delete_removes_the_row_for_good() {
    let backend = InMemoryBackend::with_school(1, 7);
    let doomed = backend.seed(1, "Inglês em Londres", ProgramStatus::Active);
    backend.seed(1, "Espanhol em Madri", ProgramStatus::Active);

    let (mut dashboard, _notifier) = dashboard_over(&backend);
    dashboard.load(7).await;
    assert_eq!(dashboard.rows().len(), 2);

    dashboard.delete_program(doomed).await;
    assert_eq!(dashboard.rows().len(), 1);
    assert!(dashboard.rows().iter().all(|p| p.id != Some(doomed)));

    dashboard.load(7).await;
    assert_eq!(dashboard.rows().len(), 1);
}

#[tokio::test]
async fn test_failed_reload_keeps_the_previous_rows() {
    let backend = InMemoryBackend::with_school(1, 7);
    backend.seed(1, "Inglês em Londres", ProgramStatus::Active);

    let (mut dashboard, notifier) = dashboard_over(&backend);
    dashboard.load(7).await;
    assert_eq!(dashboard.rows().len(), 1);

    backend.fail_listing.store(true, Ordering::SeqCst);
    dashboard.load(7).await;

    assert_eq!(dashboard.rows().len(), 1);
    assert_eq!(notifier.errors(), 1);
}

#[tokio::test]
async fn test_edit_copy_is_discarded_unless_saved() {
    let backend = InMemoryBackend::with_school(1, 7);
    let id = backend.seed(1, "Inglês em Londres", ProgramStatus::Active);

    let (mut dashboard, notifier) = dashboard_over(&backend);
    dashboard.load(7).await;

    dashboard.open_edit(id);
    dashboard.edit_dialog().unwrap().set_title("Título descartado");
    dashboard.close_edit();
    assert!(dashboard.editing().is_none());
    assert_eq!(dashboard.rows()[0].title, "Inglês em Londres");

    dashboard.open_edit(id);
    {
        let mut dialog = dashboard.edit_dialog().unwrap();
        dialog.set_title("Inglês Avançado em Londres");
        dialog.set_available_seats(20);
    }
    dashboard.save_edit().await;

    assert!(dashboard.editing().is_none());
    assert_eq!(dashboard.rows()[0].title, "Inglês Avançado em Londres");
    assert_eq!(dashboard.rows()[0].available_seats, 20);
    assert_eq!(notifier.successes(), 1);
}

#[tokio::test]
async fn test_submit_builds_the_expected_create_payload() {
    let backend = InMemoryBackend::with_school(42, 7);
    let (mut service, notifier, navigator) = registration_over(&backend);

    let mut form = filled_form();
    let entry = form.add_housing();
    {
        let housing = form.housing_mut(entry).unwrap();
        housing.kind = "CASA_FAMILIA".to_string();
        housing.weekly_price = "280".to_string();
    }

    let submitted = service
        .submit(&form, Some(7), FallbackPolicy::UseUserId)
        .await;
    assert!(submitted);

    let payload = backend.last_payload();
    assert_eq!(payload.school.id, 42);
    assert_eq!(payload.status, ProgramStatus::Active);
    assert_eq!(payload.housing_price.as_deref(), Some("280"));

    let records: Vec<HousingRecord> =
        serde_json::from_str(payload.housing.as_deref().unwrap()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, "CASA_FAMILIA");

    let body = serde_json::to_value(&payload).unwrap();
    assert!(!body.as_object().unwrap().contains_key("infoEstagio"));

    assert_eq!(notifier.successes(), 1);
    assert_eq!(*navigator.routes.lock().unwrap(), vec![Route::Dashboard]);
}

#[tokio::test]
async fn test_invalid_form_never_reaches_the_network() {
    let backend = InMemoryBackend::with_school(42, 7);
    let (mut service, notifier, navigator) = registration_over(&backend);

    let mut form = filled_form();
    form.title = String::new();
    assert!(!service.submit(&form, Some(7), FallbackPolicy::UseUserId).await);

    let mut form = filled_form();
    form.available_seats = "0".to_string();
    assert!(!service.submit(&form, Some(7), FallbackPolicy::UseUserId).await);

    assert_eq!(backend.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.errors(), 2);
    assert!(navigator.routes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_without_identity_fails_before_the_network() {
    let backend = InMemoryBackend::with_school(42, 7);
    let (mut service, notifier, _navigator) = registration_over(&backend);

    assert!(!service.submit(&filled_form(), None, FallbackPolicy::UseUserId).await);
    assert_eq!(backend.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.errors(), 1);
}

#[tokio::test]
async fn test_unresolved_school_follows_the_fallback_policy() {
    let backend = InMemoryBackend::without_school();
    let (service, _, _) = registration_over(&backend);
    assert_eq!(service.resolve_school(7).await, SchoolResolution::Unresolved);

    // UseUserId proceeds with the degraded id.
    let (mut service, _, _) = registration_over(&backend);
    assert!(service.submit(&filled_form(), Some(7), FallbackPolicy::UseUserId).await);
    assert_eq!(backend.last_payload().school.id, 7);

    // Abort refuses to guess.
    let backend = InMemoryBackend::without_school();
    let (mut service, notifier, navigator) = registration_over(&backend);
    assert!(!service.submit(&filled_form(), Some(7), FallbackPolicy::Abort).await);
    assert_eq!(backend.create_calls.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.errors(), 1);
    assert!(navigator.routes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_created_program_shows_up_on_the_next_load() {
    let backend = InMemoryBackend::with_school(42, 7);
    let (mut service, _, _) = registration_over(&backend);
    assert!(service.submit(&filled_form(), Some(7), FallbackPolicy::UseUserId).await);

    let (mut dashboard, _) = dashboard_over(&backend);
    dashboard.load(7).await;
    assert_eq!(dashboard.rows().len(), 1);
    assert_eq!(dashboard.rows()[0].title, "Inglês em Londres");
    assert_eq!(dashboard.rows()[0].status, ProgramStatus::Active);
}
