//! Proof templates page.

use std::sync::Arc;

use tracing::{debug, info};

use super::{Completion, Outgoing, RequestTracker, TableCommand, Ticket, apply_table_command};
use super::{report, unexpected};
use crate::api::{ApiReply, ApiRequest, Saved};
use crate::forms::{ModalMode, TemplateForm};
use crate::models::{Role, Template};
use crate::notify::{Notice, Notifier};
use crate::session::Session;
use crate::table::{Column, PageSize, RecordId, RecordTable, TableView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateAction {
    LoadTemplates,
    LoadRoles,
    Submit,
}

fn role_ids(template: &Template) -> String {
    template
        .verifier_role_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn columns() -> Vec<Column<Template>> {
    vec![
        Column::accessor("templateId", "Template ID"),
        Column::accessor("name", "Template Name"),
        Column::accessor("version", "Version"),
        Column::accessor("description", "Description"),
        Column::display("roles", "Roles", role_ids).unsortable(),
    ]
}

pub struct TemplatesPage {
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
    templates: Vec<Template>,
    roles: Vec<Role>,
    table: RecordTable<Template>,
    form: TemplateForm,
    tracker: RequestTracker<TemplateAction>,
    loaded: bool,
}

impl TemplatesPage {
    pub fn new(session: Arc<Session>, notifier: Arc<dyn Notifier>, page_size: PageSize) -> Self {
        Self {
            session,
            notifier,
            templates: Vec::new(),
            roles: Vec::new(),
            table: RecordTable::new(columns()).with_page_size(page_size),
            form: TemplateForm::default(),
            tracker: RequestTracker::default(),
            loaded: false,
        }
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn table(&self) -> &RecordTable<Template> {
        &self.table
    }

    pub fn view(&self) -> TableView<'_, Template> {
        self.table.view(&self.templates)
    }

    pub fn table_command(&mut self, command: TableCommand) -> bool {
        apply_table_command(&mut self.table, &self.templates, command)
    }

    pub fn form(&self) -> &TemplateForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TemplateForm {
        &mut self.form
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_busy(TemplateAction::LoadTemplates)
    }

    pub fn is_submitting(&self) -> bool {
        self.tracker.is_busy(TemplateAction::Submit)
    }

    /// First load of the session; no-op afterwards.
    pub fn load(&mut self) -> Vec<Outgoing<TemplateAction>> {
        if self.loaded {
            return Vec::new();
        }
        self.reload()
    }

    /// Fetches templates and roles.
    pub fn reload(&mut self) -> Vec<Outgoing<TemplateAction>> {
        if let Err(e) = self.session.bearer() {
            report(self.notifier.as_ref(), "Failed to fetch templates", &e);
            return Vec::new();
        }
        self.loaded = true;
        [
            self.tracker
                .begin(TemplateAction::LoadTemplates, ApiRequest::ListTemplates),
            self.tracker
                .begin(TemplateAction::LoadRoles, ApiRequest::ListRoles),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn open_create(&mut self) {
        self.tracker.close_modal();
        self.form.open_create();
    }

    pub fn open_edit(&mut self, id: RecordId) -> bool {
        let Some(template) = self.templates.iter().find(|t| t.id == id) else {
            return false;
        };
        self.tracker.close_modal();
        match self.form.open_edit(template) {
            Ok(()) => true,
            Err(e) => {
                report(self.notifier.as_ref(), "Failed to open template", &e);
                false
            }
        }
    }

    pub fn close_form(&mut self) {
        self.form.close();
        self.tracker.close_modal();
    }

    /// Validates the form and issues create or update. `None` when the form
    /// is closed, a submit is already in flight, or validation fails.
    pub fn submit(&mut self) -> Option<Outgoing<TemplateAction>> {
        if !self.form.is_open() || self.is_submitting() {
            return None;
        }
        if let Err(e) = self.session.bearer() {
            report(self.notifier.as_ref(), "Failed to save template", &e);
            return None;
        }
        let payload = match self.form.validate() {
            Ok(payload) => payload,
            Err(errors) => {
                debug!(%errors, "template form rejected");
                if let Some(first) = errors.first() {
                    self.notifier.notify(Notice::error(first.message.clone()));
                }
                return None;
            }
        };
        let request = match self.form.mode() {
            ModalMode::Edit(id) => ApiRequest::UpdateTemplate { id, payload },
            _ => ApiRequest::CreateTemplate(payload),
        };
        self.tracker.begin_modal(TemplateAction::Submit, request)
    }

    /// Applies a finished request.
    pub fn complete(
        &mut self,
        ticket: Ticket<TemplateAction>,
        result: Completion,
    ) -> Vec<Outgoing<TemplateAction>> {
        if !self.tracker.finish(&ticket) {
            return Vec::new();
        }
        let outcome = match ticket.action {
            TemplateAction::LoadTemplates => match result {
                Ok(ApiReply::Templates(templates)) => {
                    debug!(count = templates.len(), "templates loaded");
                    self.templates = templates;
                    self.clamp_page();
                    Ok(())
                }
                Ok(other) => Err(unexpected("list_templates", &other)),
                Err(e) => Err(e),
            },
            TemplateAction::LoadRoles => match result {
                Ok(ApiReply::Roles(roles)) => {
                    self.roles = roles;
                    Ok(())
                }
                Ok(other) => Err(unexpected("list_roles", &other)),
                Err(e) => Err(e),
            },
            TemplateAction::Submit => match result {
                Ok(ApiReply::Template(saved)) => {
                    self.apply_saved(saved);
                    Ok(())
                }
                Ok(other) => Err(unexpected("save_template", &other)),
                Err(e) => Err(e),
            },
        };
        if let Err(e) = outcome {
            report(self.notifier.as_ref(), self.failure_context(ticket.action), &e);
        }
        Vec::new()
    }

    fn failure_context(&self, action: TemplateAction) -> &'static str {
        match action {
            TemplateAction::LoadTemplates => "Failed to fetch templates",
            TemplateAction::LoadRoles => "Failed to fetch roles",
            TemplateAction::Submit if self.form.mode().editing().is_some() => {
                "Failed to update template"
            }
            TemplateAction::Submit => "Failed to add template",
        }
    }

    fn apply_saved(&mut self, saved: Saved<Template>) {
        let Saved { entity, message } = saved;
        let default_message = match self.form.mode() {
            ModalMode::Edit(id) => {
                match self.templates.iter_mut().find(|t| t.id == id) {
                    Some(slot) => *slot = entity,
                    None => self.templates.push(entity),
                }
                info!(id, "template updated");
                "Template updated successfully"
            }
            _ => {
                info!(id = entity.id, "template created");
                self.templates.push(entity);
                "Template created successfully"
            }
        };
        self.notifier.notify(Notice::success(
            message.unwrap_or_else(|| default_message.to_string()),
        ));
        self.close_form();
    }

    fn clamp_page(&mut self) {
        let index = self.table.state().page_index;
        self.table.go_to_page(index, &self.templates);
    }
}

impl std::fmt::Debug for TemplatesPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplatesPage")
            .field("templates", &self.templates.len())
            .field("roles", &self.roles.len())
            .field("mode", &self.form.mode())
            .field("loaded", &self.loaded)
            .finish()
    }
}
