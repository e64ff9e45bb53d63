//! Proof template editor with role multi-select and schema rows.

use super::{FormFields, ModalMode, Rule, SEMVER, SchemaRowForm, ValidationErrors};
use crate::api::ApiError;
use crate::models::{ProofPayload, Role, SchemaEntry, Template, TemplatePayload};
use crate::table::RecordId;

static NAME_RULES: &[Rule] = &[Rule::Required("Template Name is required")];
static TEMPLATE_ID_RULES: &[Rule] = &[Rule::Required("Template ID is required")];
static VERSION_RULES: &[Rule] = &[
    Rule::Required("Version is required"),
    Rule::Pattern(
        &SEMVER,
        "Version must follow Semantic Versioning (e.g., 1.0.0)",
    ),
];
static DESCRIPTION_RULES: &[Rule] = &[Rule::Required("Description is required")];

const ROLES_REQUIRED: &str = "At least one role must be selected";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateField {
    Name,
    TemplateId,
    Roles,
    Version,
    Description,
    Schemas,
}

/// Role multi-select with its dropdown state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSelection {
    selected: Vec<RecordId>,
    open: bool,
    cursor: usize,
}

impl RoleSelection {
    pub fn selected(&self) -> &[RecordId] {
        &self.selected
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    /// Adds or removes `id`, keeping selection order.
    pub fn toggle(&mut self, id: RecordId) {
        match self.selected.iter().position(|&s| s == id) {
            Some(pos) => {
                self.selected.remove(pos);
            }
            None => self.selected.push(id),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open_dropdown(&mut self) {
        self.open = true;
    }

    /// Backdrop dismissal: closes the dropdown, keeps the selection.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_down(&mut self, role_count: usize) {
        if role_count > 0 {
            self.cursor = (self.cursor + 1).min(role_count - 1);
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Toggles the role under the dropdown cursor.
    pub fn toggle_at_cursor(&mut self, roles: &[Role]) {
        if let Some(role) = roles.get(self.cursor) {
            self.toggle(role.id);
        }
    }
}

/// Create/edit dialog for proof templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateForm {
    mode: ModalMode,
    pub name: String,
    pub template_id: String,
    pub version: String,
    pub description: String,
    pub roles: RoleSelection,
    schemas: Vec<SchemaEntry>,
    schema_cursor: usize,
    schema_editor: Option<SchemaRowForm>,
    errors: ValidationErrors,
}

impl TemplateForm {
    pub fn mode(&self) -> ModalMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_open()
    }

    pub fn open_create(&mut self) {
        *self = Self {
            mode: ModalMode::Create,
            ..Self::default()
        };
    }

    /// Pre-populates every field from `template`. Fails without opening when
    /// the stored payload cannot be decoded.
    pub fn open_edit(&mut self, template: &Template) -> Result<(), ApiError> {
        let schemas = template.schemas()?;
        let mut roles = RoleSelection::default();
        for &id in &template.verifier_role_ids {
            if !roles.contains(id) {
                roles.toggle(id);
            }
        }
        *self = Self {
            mode: ModalMode::Edit(template.id),
            name: template.name.clone(),
            template_id: template.template_id.clone(),
            version: template.version.clone(),
            description: template.description.clone().unwrap_or_default(),
            roles,
            schemas,
            ..Self::default()
        };
        Ok(())
    }

    /// Cancel and every other close path.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn schemas(&self) -> &[SchemaEntry] {
        &self.schemas
    }

    pub fn schema_cursor(&self) -> usize {
        self.schema_cursor
    }

    pub fn schema_cursor_down(&mut self) {
        if !self.schemas.is_empty() {
            self.schema_cursor = (self.schema_cursor + 1).min(self.schemas.len() - 1);
        }
    }

    pub fn schema_cursor_up(&mut self) {
        self.schema_cursor = self.schema_cursor.saturating_sub(1);
    }

    /// Removes the schema row under the cursor.
    pub fn delete_schema(&mut self) -> bool {
        if self.schema_cursor >= self.schemas.len() {
            return false;
        }
        self.schemas.remove(self.schema_cursor);
        self.schema_cursor = self.schema_cursor.min(self.schemas.len().saturating_sub(1));
        true
    }

    pub fn open_schema_editor(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.schema_editor = Some(SchemaRowForm::default());
        true
    }

    pub fn schema_editor(&self) -> Option<&SchemaRowForm> {
        self.schema_editor.as_ref()
    }

    pub fn schema_editor_mut(&mut self) -> Option<&mut SchemaRowForm> {
        self.schema_editor.as_mut()
    }

    /// Appends the sub-editor's row and closes it. On validation failure the
    /// sub-editor stays open with its messages.
    pub fn save_schema_row(&mut self) -> Result<(), ValidationErrors> {
        let Some(editor) = self.schema_editor.as_mut() else {
            return Ok(());
        };
        let row = editor.validate()?;
        self.schemas.push(row);
        self.schema_cursor = self.schemas.len() - 1;
        self.schema_editor = None;
        Ok(())
    }

    /// Discards the draft row.
    pub fn cancel_schema_editor(&mut self) {
        self.schema_editor = None;
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Runs every rule. Messages stay on the form for display.
    pub fn validate(&mut self) -> Result<TemplatePayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check("name", &self.name, NAME_RULES);
        errors.check("templateId", &self.template_id, TEMPLATE_ID_RULES);
        if self.roles.selected().is_empty() {
            errors.push("verifierRoleIds", ROLES_REQUIRED);
        }
        errors.check("version", &self.version, VERSION_RULES);
        errors.check("description", &self.description, DESCRIPTION_RULES);
        self.errors = errors.clone();
        errors.into_result(|| TemplatePayload {
            template_id: self.template_id.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            version: self.version.trim().to_string(),
            payload: ProofPayload::dif(self.schemas.clone()),
            verifier_role_ids: self.roles.selected().to_vec(),
        })
    }
}

impl FormFields for TemplateForm {
    type Field = TemplateField;

    const FIELDS: &'static [TemplateField] = &[
        TemplateField::Name,
        TemplateField::TemplateId,
        TemplateField::Roles,
        TemplateField::Version,
        TemplateField::Description,
        TemplateField::Schemas,
    ];

    fn label(field: TemplateField) -> &'static str {
        match field {
            TemplateField::Name => "Template Name",
            TemplateField::TemplateId => "Template ID",
            TemplateField::Roles => "Roles",
            TemplateField::Version => "Version",
            TemplateField::Description => "Description",
            TemplateField::Schemas => "Schemas",
        }
    }

    fn text(&self, field: TemplateField) -> Option<&str> {
        match field {
            TemplateField::Name => Some(&self.name),
            TemplateField::TemplateId => Some(&self.template_id),
            TemplateField::Version => Some(&self.version),
            TemplateField::Description => Some(&self.description),
            TemplateField::Roles | TemplateField::Schemas => None,
        }
    }

    fn text_mut(&mut self, field: TemplateField) -> Option<&mut String> {
        match field {
            TemplateField::Name => Some(&mut self.name),
            TemplateField::TemplateId => Some(&mut self.template_id),
            TemplateField::Version => Some(&mut self.version),
            TemplateField::Description => Some(&mut self.description),
            TemplateField::Roles | TemplateField::Schemas => None,
        }
    }

    fn error(&self, field: TemplateField) -> Option<&str> {
        let key = match field {
            TemplateField::Name => "name",
            TemplateField::TemplateId => "templateId",
            TemplateField::Roles => "verifierRoleIds",
            TemplateField::Version => "version",
            TemplateField::Description => "description",
            TemplateField::Schemas => return None,
        };
        self.errors.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::api::VerifierApi;

    fn filled() -> TemplateForm {
        let mut form = TemplateForm::default();
        form.open_create();
        form.name = "KYC".into();
        form.template_id = "kyc".into();
        form.version = "1.0.0".into();
        form.description = "Basic".into();
        form
    }

    #[test]
    fn zero_roles_blocks_submit() {
        let mut form = filled();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(form.error(TemplateField::Roles), Some(ROLES_REQUIRED));

        form.roles.toggle(2);
        let payload = form.validate().unwrap();
        assert_eq!(payload.verifier_role_ids, vec![2]);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn version_must_be_semver() {
        let mut form = filled();
        form.roles.toggle(1);
        form.version = "1.0".into();
        form.validate().unwrap_err();
        assert_eq!(
            form.error(TemplateField::Version),
            Some("Version must follow Semantic Versioning (e.g., 1.0.0)")
        );
    }

    #[test]
    fn edit_prefills_and_close_resets() {
        let api = MockApi::seeded();
        let template = api.list_templates().unwrap().remove(0);
        let mut form = TemplateForm::default();
        form.open_edit(&template).unwrap();
        assert_eq!(form.mode(), ModalMode::Edit(template.id));
        assert_eq!(form.name, template.name);
        assert_eq!(form.roles.selected(), template.verifier_role_ids.as_slice());
        assert_eq!(form.schemas().len(), 1);

        form.close();
        form.open_create();
        assert_eq!(form.mode(), ModalMode::Create);
        assert!(form.name.is_empty());
        assert!(form.roles.selected().is_empty());
        assert!(form.schemas().is_empty());
    }

    #[test]
    fn schema_editor_appends_on_save_and_discards_on_cancel() {
        let mut form = filled();
        assert!(form.open_schema_editor());
        form.cancel_schema_editor();
        assert!(form.schema_editor().is_none());
        assert!(form.schemas().is_empty());

        form.open_schema_editor();
        assert!(form.save_schema_row().is_err());
        assert!(form.schema_editor().is_some());

        let editor = form.schema_editor_mut().unwrap();
        editor.schema_name = "Passport".into();
        editor.schema_url = "https://s/passport".into();
        form.save_schema_row().unwrap();
        assert_eq!(form.schemas().len(), 1);
        assert!(form.schema_editor().is_none());

        assert!(form.delete_schema());
        assert!(form.schemas().is_empty());
        assert!(!form.delete_schema());
    }

    #[test]
    fn dropdown_dismiss_keeps_selection() {
        let roles = vec![
            Role { id: 1, role: "A".into() },
            Role { id: 2, role: "B".into() },
        ];
        let mut selection = RoleSelection::default();
        selection.open_dropdown();
        selection.cursor_down(roles.len());
        selection.cursor_down(roles.len());
        selection.toggle_at_cursor(&roles);
        selection.dismiss();
        assert!(!selection.is_open());
        assert_eq!(selection.selected(), &[2]);
        selection.toggle(2);
        assert!(selection.selected().is_empty());
    }
}
