use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::gateway::{ProgramGateway, SchoolGateway};
use crate::models::{DraftCourse, DraftForm, Program, ProgramPayload, School};
use crate::shell::{Notification, Notifier};

/// One row of the dashboard. Persisted programs come from the backend and
/// carry the toggle/delete/edit actions; drafts are client-only and can
/// only be removed.
#[derive(Debug)]
pub enum DashboardEntry<'a> {
    Persisted(&'a Program),
    Draft(&'a DraftCourse),
}

/// Scalar-only editing surface of the edit dialog. The opaque housing and
/// internship blobs are not reachable from here.
pub struct EditDialog<'a> {
    program: &'a mut Program,
}

impl EditDialog<'_> {
    pub fn program(&self) -> &Program {
        self.program
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.program.title = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.program.description = value.into();
    }

    pub fn set_country(&mut self, value: impl Into<String>) {
        self.program.country = value.into();
    }

    pub fn set_city(&mut self, value: impl Into<String>) {
        self.program.city = value.into();
    }

    pub fn set_price(&mut self, value: f64) {
        self.program.price = value;
    }

    pub fn set_available_seats(&mut self, value: u32) {
        self.program.available_seats = value;
    }
}

/// The school's program-management view. Displayed state always reflects
/// the last successful reload; every mutation is followed by a full
/// refetch instead of an optimistic local update.
pub struct Dashboard {
    schools: Arc<dyn SchoolGateway>,
    programs: Arc<dyn ProgramGateway>,
    notifier: Arc<dyn Notifier>,
    user_id: Option<i64>,
    school: Option<School>,
    rows: Vec<Program>,
    drafts: Vec<DraftCourse>,
    busy: HashSet<i64>,
    editing: Option<Program>,
}

impl Dashboard {
    pub fn new(
        schools: Arc<dyn SchoolGateway>,
        programs: Arc<dyn ProgramGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            schools,
            programs,
            notifier,
            user_id: None,
            school: None,
            rows: Vec::new(),
            drafts: Vec::new(),
            busy: HashSet::new(),
            editing: None,
        }
    }

    pub fn school(&self) -> Option<&School> {
        self.school.as_ref()
    }

    pub fn rows(&self) -> &[Program] {
        &self.rows
    }

    pub fn drafts(&self) -> &[DraftCourse] {
        &self.drafts
    }

    pub fn is_busy(&self, program_id: i64) -> bool {
        self.busy.contains(&program_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = DashboardEntry<'_>> {
        self.rows
            .iter()
            .map(DashboardEntry::Persisted)
            .chain(self.drafts.iter().map(DashboardEntry::Draft))
    }

    /// Called on mount and whenever the signed-in identity changes.
    pub async fn load(&mut self, user_id: i64) {
        self.user_id = Some(user_id);
        self.reload().await;
    }

    /// Resolve school, list all programs, keep the school's own. A failed
    /// reload leaves the previous rows stale and surfaces a notification.
    async fn reload(&mut self) {
        let Some(user_id) = self.user_id else {
            return;
        };
        match self.fetch_school_programs(user_id).await {
            Ok((school, rows)) => {
                info!(school = school.id, count = rows.len(), "loaded school programs");
                self.school = Some(school);
                self.rows = rows;
            }
            Err(err) => {
                warn!(error = %err, "dashboard load failed");
                self.notifier
                    .notify(Notification::error("Could not load the school's programs."));
            }
        }
    }

    async fn fetch_school_programs(
        &self,
        user_id: i64,
    ) -> Result<(School, Vec<Program>), AppError> {
        let school = self.schools.school_by_user(user_id).await?;
        let all = self.programs.list().await?;
        let owned = all
            .into_iter()
            .filter(|program| program.belongs_to(school.id))
            .collect();
        Ok((school, owned))
    }

    /// Flips the program between ATIVO and INATIVO, then refetches.
    pub async fn toggle_status(&mut self, program_id: i64) {
        if !self.begin(program_id) {
            return;
        }
        let result = self.toggle_inner(program_id).await;
        self.busy.remove(&program_id);
        match result {
            Ok(was_active) => {
                let description = if was_active {
                    "Program deactivated successfully!"
                } else {
                    "Program activated successfully!"
                };
                self.notifier.notify(Notification::success(description));
            }
            Err(err) => {
                warn!(program_id, error = %err, "status toggle failed");
                self.notifier
                    .notify(Notification::error("Could not change the program's status."));
            }
        }
    }

    async fn toggle_inner(&mut self, program_id: i64) -> Result<bool, AppError> {
        let program = self
            .rows
            .iter()
            .find(|p| p.id == Some(program_id))
            .ok_or_else(|| {
                AppError::NotFound(format!("program {program_id} is not on the dashboard"))
            })?;
        let was_active = program.status.is_active();
        let mut payload = ProgramPayload::from_program(program);
        payload.status = program.status.toggled();

        self.programs.update(program_id, &payload).await?;
        self.reload().await;
        Ok(was_active)
    }

    pub async fn delete_program(&mut self, program_id: i64) {
        if !self.begin(program_id) {
            return;
        }
        let result = self.programs.delete(program_id).await;
        self.busy.remove(&program_id);
        match result {
            Ok(()) => {
                self.reload().await;
                self.notifier
                    .notify(Notification::success("Program deleted successfully!"));
            }
            Err(err) => {
                warn!(program_id, error = %err, "delete failed");
                self.notifier
                    .notify(Notification::error("Could not delete the program."));
            }
        }
    }

    /// Opens the edit dialog over an independent copy of the selected row.
    pub fn open_edit(&mut self, program_id: i64) {
        self.editing = self
            .rows
            .iter()
            .find(|p| p.id == Some(program_id))
            .cloned();
    }

    pub fn editing(&self) -> Option<&Program> {
        self.editing.as_ref()
    }

    pub fn edit_dialog(&mut self) -> Option<EditDialog<'_>> {
        self.editing.as_mut().map(|program| EditDialog { program })
    }

    /// Closing without saving discards the copy.
    pub fn close_edit(&mut self) {
        self.editing = None;
    }

    /// Saves the edit copy, refetches, then closes the dialog. On failure
    /// the dialog stays open with the copy intact.
    pub async fn save_edit(&mut self) {
        let Some(program) = self.editing.clone() else {
            return;
        };
        let Some(program_id) = program.id else {
            return;
        };
        if !self.begin(program_id) {
            return;
        }
        let payload = ProgramPayload::from_program(&program);
        let result = self.programs.update(program_id, &payload).await;
        self.busy.remove(&program_id);
        match result {
            Ok(_) => {
                self.reload().await;
                self.editing = None;
                self.notifier
                    .notify(Notification::success("Program updated successfully!"));
            }
            Err(err) => {
                warn!(program_id, error = %err, "edit save failed");
                self.notifier
                    .notify(Notification::error("Could not update the program."));
            }
        }
    }

    /// Appends a client-only draft with a fresh timestamp id.
    pub fn add_draft(&mut self, form: DraftForm) -> Result<i64, AppError> {
        let id = Utc::now().timestamp_millis();
        let draft = form.build(id)?;
        self.drafts.push(draft);
        Ok(id)
    }

    pub fn remove_draft(&mut self, draft_id: i64) {
        self.drafts.retain(|draft| draft.id != draft_id);
    }

    // HashSet::insert is false when the row already has an action in flight.
    fn begin(&mut self, program_id: i64) -> bool {
        self.busy.insert(program_id)
    }
}
