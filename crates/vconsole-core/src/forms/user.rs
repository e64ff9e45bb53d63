//! Verifier user editor.

use uuid::Uuid;

use super::{FormFields, ModalMode, Rule, ValidationErrors};
use crate::models::{Role, User, UserPayload, UserStatus};
use crate::table::RecordId;

static FIRST_NAME_RULES: &[Rule] = &[Rule::Required("First name is required")];
static LAST_NAME_RULES: &[Rule] = &[Rule::Required("Last name is required")];
static EMAIL_RULES: &[Rule] = &[
    Rule::Required("Email is required"),
    Rule::Email("Invalid email format!"),
];
static FOUNDATION_ID_RULES: &[Rule] = &[Rule::Required("Foundation ID is required")];

/// Typed user ids longer than this are checked for availability.
const USER_ID_CHECK_MIN_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    FirstName,
    LastName,
    UserId,
    Email,
    FoundationId,
    Role,
}

/// Remote availability state of the typed user id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UserIdCheck {
    #[default]
    Unchecked,
    Checking(String),
    Available(String),
    Taken(String),
}

/// `first_last_<8 hex>` in lowercase.
pub fn generate_username(first_name: &str, last_name: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        first_name.trim(),
        last_name.trim(),
        &suffix[..8]
    )
    .to_lowercase()
}

/// Create/edit dialog for verifier users.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserForm {
    mode: ModalMode,
    pub first_name: String,
    pub last_name: String,
    pub user_id: String,
    pub email: String,
    pub foundation_id: String,
    pub role: Option<RecordId>,
    status: UserStatus,
    user_id_check: UserIdCheck,
    errors: ValidationErrors,
}

impl UserForm {
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

    /// Pre-populates from `user`; the stored username is split at the first
    /// space into first and last name.
    pub fn open_edit(&mut self, user: &User) {
        let (first, last) = match user.username.split_once(' ') {
            Some((first, last)) => (first.to_string(), last.to_string()),
            None => (user.username.clone(), String::new()),
        };
        *self = Self {
            mode: ModalMode::Edit(user.id),
            first_name: first,
            last_name: last,
            user_id: user.user_id.clone().unwrap_or_default(),
            email: user.email.clone(),
            foundation_id: user.foundation_id.clone(),
            role: user.verifier_role.as_ref().map(|r| r.id),
            status: user.status(),
            ..Self::default()
        };
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Status of the edited user, shown read-only.
    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Selects the role after the current one, wrapping.
    pub fn next_role(&mut self, roles: &[Role]) {
        self.role = cycle_role(roles, self.role, true);
    }

    pub fn prev_role(&mut self, roles: &[Role]) {
        self.role = cycle_role(roles, self.role, false);
    }

    pub fn user_id_check(&self) -> &UserIdCheck {
        &self.user_id_check
    }

    /// The id to look up while typing: only ids longer than
    /// `USER_ID_CHECK_MIN_LEN` that have not been checked yet.
    pub fn pending_user_id_check(&self) -> Option<String> {
        self.unchecked_user_id(USER_ID_CHECK_MIN_LEN + 1)
    }

    /// The id to look up before a create is sent: any non-blank id that has
    /// not been checked yet.
    pub fn user_id_check_before_submit(&self) -> Option<String> {
        self.unchecked_user_id(1)
    }

    fn unchecked_user_id(&self, min_len: usize) -> Option<String> {
        if self.mode != ModalMode::Create {
            return None;
        }
        let typed = self.user_id.trim();
        if typed.len() < min_len {
            return None;
        }
        let known = match &self.user_id_check {
            UserIdCheck::Unchecked => None,
            UserIdCheck::Checking(v) | UserIdCheck::Available(v) | UserIdCheck::Taken(v) => {
                Some(v.as_str())
            }
        };
        (known != Some(typed)).then(|| typed.to_string())
    }

    pub fn begin_user_id_check(&mut self, user_id: String) {
        self.user_id_check = UserIdCheck::Checking(user_id);
    }

    /// Records an availability answer. Answers for an id that is no longer
    /// the one being checked are ignored.
    pub fn finish_user_id_check(&mut self, user_id: &str, exists: bool) -> bool {
        if !matches!(&self.user_id_check, UserIdCheck::Checking(v) if v == user_id) {
            return false;
        }
        let value = user_id.to_string();
        self.user_id_check = if exists {
            UserIdCheck::Taken(value)
        } else {
            UserIdCheck::Available(value)
        };
        true
    }

    /// Clears an in-flight check after it failed.
    pub fn abandon_user_id_check(&mut self, user_id: &str) {
        if matches!(&self.user_id_check, UserIdCheck::Checking(v) if v == user_id) {
            self.user_id_check = UserIdCheck::Unchecked;
        }
    }

    pub fn user_id_checking(&self) -> bool {
        matches!(&self.user_id_check, UserIdCheck::Checking(v) if v == self.user_id.trim())
    }

    pub fn user_id_taken(&self) -> bool {
        self.mode == ModalMode::Create
            && matches!(&self.user_id_check, UserIdCheck::Taken(v) if v == self.user_id.trim())
    }

    /// Username to submit: the user id when given, otherwise generated in
    /// create mode and `"first last"` in edit mode.
    pub fn username(&self) -> String {
        let typed = self.user_id.trim();
        if !typed.is_empty() {
            return typed.to_string();
        }
        match self.mode {
            ModalMode::Edit(_) => format!("{} {}", self.first_name.trim(), self.last_name.trim())
                .trim()
                .to_string(),
            _ => generate_username(&self.first_name, &self.last_name),
        }
    }

    /// Runs every rule; the role must be one of `roles`.
    pub fn validate(&mut self, roles: &[Role]) -> Result<UserPayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check("firstName", &self.first_name, FIRST_NAME_RULES);
        errors.check("lastName", &self.last_name, LAST_NAME_RULES);
        if self.user_id_taken() {
            errors.push("userId", "User ID already exists");
        }
        errors.check("email", &self.email, EMAIL_RULES);
        errors.check("foundationID", &self.foundation_id, FOUNDATION_ID_RULES);
        match self.role {
            None => errors.push("verifierRoleId", "Role is required"),
            Some(id) if !roles.iter().any(|r| r.id == id) => {
                errors.push("verifierRoleId", "Invalid role selected")
            }
            Some(_) => {}
        }
        self.errors = errors.clone();
        let role = self.role.unwrap_or_default();
        errors.into_result(|| UserPayload {
            username: self.username(),
            foundation_id: self.foundation_id.trim().to_string(),
            email: self.email.trim().to_string(),
            verifier_role_id: role,
        })
    }
}

fn cycle_role(roles: &[Role], current: Option<RecordId>, forward: bool) -> Option<RecordId> {
    if roles.is_empty() {
        return None;
    }
    let len = roles.len();
    let next = match (current.and_then(|id| roles.iter().position(|r| r.id == id)), forward) {
        (Some(pos), true) => (pos + 1) % len,
        (Some(pos), false) => (pos + len - 1) % len,
        (None, true) => 0,
        (None, false) => len - 1,
    };
    Some(roles[next].id)
}

impl FormFields for UserForm {
    type Field = UserField;

    const FIELDS: &'static [UserField] = &[
        UserField::FirstName,
        UserField::LastName,
        UserField::UserId,
        UserField::Email,
        UserField::FoundationId,
        UserField::Role,
    ];

    fn label(field: UserField) -> &'static str {
        match field {
            UserField::FirstName => "First Name",
            UserField::LastName => "Last Name",
            UserField::UserId => "User ID",
            UserField::Email => "Email",
            UserField::FoundationId => "Foundation ID",
            UserField::Role => "Role",
        }
    }

    fn text(&self, field: UserField) -> Option<&str> {
        match field {
            UserField::FirstName => Some(&self.first_name),
            UserField::LastName => Some(&self.last_name),
            UserField::UserId => Some(&self.user_id),
            UserField::Email => Some(&self.email),
            UserField::FoundationId => Some(&self.foundation_id),
            UserField::Role => None,
        }
    }

    fn text_mut(&mut self, field: UserField) -> Option<&mut String> {
        match field {
            UserField::FirstName => Some(&mut self.first_name),
            UserField::LastName => Some(&mut self.last_name),
            UserField::UserId => Some(&mut self.user_id),
            UserField::Email => Some(&mut self.email),
            UserField::FoundationId => Some(&mut self.foundation_id),
            UserField::Role => None,
        }
    }

    fn error(&self, field: UserField) -> Option<&str> {
        let key = match field {
            UserField::FirstName => "firstName",
            UserField::LastName => "lastName",
            UserField::UserId => "userId",
            UserField::Email => "email",
            UserField::FoundationId => "foundationID",
            UserField::Role => "verifierRoleId",
        };
        self.errors.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleRef;
    use regex::Regex;

    fn roles() -> Vec<Role> {
        vec![
            Role { id: 1, role: "Auditor".into() },
            Role { id: 2, role: "Clerk".into() },
        ]
    }

    fn user() -> User {
        User {
            id: 7,
            username: "ada lovelace king".into(),
            user_id: None,
            email: "ada@example.org".into(),
            foundation_id: "F-1".into(),
            verifier_role: Some(RoleRef { id: 2, role: "Clerk".into() }),
            status_id: UserStatus::Suspended.id(),
        }
    }

    fn filled() -> UserForm {
        let mut form = UserForm::default();
        form.open_create();
        form.first_name = "Ada".into();
        form.last_name = "Lovelace".into();
        form.email = "ada@example.org".into();
        form.foundation_id = "F-1".into();
        form.role = Some(1);
        form
    }

    #[test]
    fn generated_username_shape() {
        let re = Regex::new(r"^ada_lovelace_[0-9a-f]{8}$").unwrap();
        assert!(re.is_match(&generate_username("Ada", "Lovelace")));
        let form = filled();
        assert!(re.is_match(&form.username()));
    }

    #[test]
    fn explicit_user_id_wins() {
        let mut form = filled();
        form.user_id = " ada01 ".into();
        assert_eq!(form.validate(&roles()).unwrap().username, "ada01");
    }

    #[test]
    fn required_fields_and_email_format() {
        let mut form = UserForm::default();
        form.open_create();
        let errors = form.validate(&roles()).unwrap_err();
        assert_eq!(errors.len(), 5);

        let mut form = filled();
        form.email = "ada@example".into();
        form.validate(&roles()).unwrap_err();
        assert_eq!(form.error(UserField::Email), Some("Invalid email format!"));
    }

    #[test]
    fn role_must_exist() {
        let mut form = filled();
        form.role = Some(99);
        form.validate(&roles()).unwrap_err();
        assert_eq!(form.error(UserField::Role), Some("Invalid role selected"));
        assert!(form.validate(&[]).is_err());
    }

    #[test]
    fn edit_then_cancel_then_create_shows_defaults() {
        let mut form = UserForm::default();
        form.open_edit(&user());
        assert_eq!(form.first_name, "ada");
        assert_eq!(form.last_name, "lovelace king");
        assert_eq!(form.role, Some(2));
        assert_eq!(form.status(), UserStatus::Suspended);
        assert_eq!(form.username(), "ada lovelace king");

        form.close();
        form.open_create();
        assert_eq!(form, {
            let mut fresh = UserForm::default();
            fresh.open_create();
            fresh
        });
        assert!(form.first_name.is_empty());
        assert!(form.email.is_empty());
        assert_eq!(form.role, None);
    }

    #[test]
    fn user_id_check_lifecycle() {
        let mut form = filled();
        form.user_id = "  ".into();
        assert_eq!(form.user_id_check_before_submit(), None);
        form.user_id = "ada".into();
        assert_eq!(form.pending_user_id_check(), None);
        assert_eq!(form.user_id_check_before_submit().as_deref(), Some("ada"));

        form.user_id = "ada0".into();
        let id = form.pending_user_id_check().unwrap();
        form.begin_user_id_check(id);
        assert!(form.user_id_checking());
        assert_eq!(form.pending_user_id_check(), None);

        assert!(!form.finish_user_id_check("other", true));
        assert!(form.finish_user_id_check("ada0", true));
        assert!(form.user_id_taken());
        form.validate(&roles()).unwrap_err();
        assert_eq!(form.error(UserField::UserId), Some("User ID already exists"));

        form.user_id = "ada01".into();
        assert!(!form.user_id_taken());
        assert_eq!(form.pending_user_id_check().as_deref(), Some("ada01"));
    }

    #[test]
    fn edit_mode_skips_user_id_check() {
        let mut form = UserForm::default();
        let mut u = user();
        u.user_id = Some("ada-lovelace".into());
        form.open_edit(&u);
        assert_eq!(form.pending_user_id_check(), None);
        assert_eq!(form.user_id_check_before_submit(), None);
    }

    #[test]
    fn role_cycling_wraps() {
        let roles = roles();
        let mut form = UserForm::default();
        form.next_role(&roles);
        assert_eq!(form.role, Some(1));
        form.next_role(&roles);
        assert_eq!(form.role, Some(2));
        form.next_role(&roles);
        assert_eq!(form.role, Some(1));
        form.prev_role(&roles);
        assert_eq!(form.role, Some(2));
        form.role = None;
        form.prev_role(&roles);
        assert_eq!(form.role, Some(2));
        form.next_role(&[]);
        assert_eq!(form.role, None);
    }
}
