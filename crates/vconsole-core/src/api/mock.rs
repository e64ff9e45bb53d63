//! In-memory verifier backend.
//!
//! Used by tests to drive pages end to end and by `vconsole --demo` to run
//! the console without a server. Behaves like the real backend for the
//! operations the console uses and records every call.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ApiError, Saved, VerifierApi};
use crate::models::{
    ProofPayload, Role, RoleRef, SchemaEntry, Template, TemplatePayload, User, UserPayload,
    UserStatus,
};
use crate::session::Session;
use crate::table::RecordId;

#[derive(Debug, Default)]
struct MockState {
    templates: Vec<Template>,
    roles: Vec<Role>,
    users: Vec<User>,
    next_id: RecordId,
    fail_next: Option<ApiError>,
    calls: Vec<&'static str>,
}

impl MockState {
    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }
}

/// Mock implementation of [`VerifierApi`].
#[derive(Debug, Default)]
pub struct MockApi {
    state: Mutex<MockState>,
    session: Option<Arc<Session>>,
}

impl MockApi {
    /// Backend pre-populated with demo roles, templates and users.
    pub fn seeded() -> Self {
        let roles = vec![
            Role {
                id: 1,
                role: "Auditor".into(),
            },
            Role {
                id: 2,
                role: "Border Officer".into(),
            },
            Role {
                id: 3,
                role: "Clerk".into(),
            },
        ];

        let templates = [
            ("kyc-basic", "Basic KYC", "1.0.0", "Name and date of birth", "Passport"),
            ("age-over-18", "Age Check", "1.2.0", "Proves holder is an adult", "National ID"),
            ("employment", "Employment", "2.0.1", "Current employer and role", "Employer Credential"),
            ("student-id", "Student ID", "1.0.3", "Enrollment status", "University Card"),
            ("driver-license", "Driver License", "3.1.0", "Vehicle categories", "mDL"),
            ("address-proof", "Address Proof", "1.0.0", "Registered home address", "Utility Bill"),
            ("health-insurance", "Health Insurance", "0.9.0", "Coverage and insurer", "Insurance Card"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (template_id, name, version, description, schema_name))| {
            let payload = ProofPayload::dif(vec![SchemaEntry {
                schema_name: schema_name.to_string(),
                schema: format!("https://schemas.example.org/{template_id}.json"),
                names: vec!["given_name".into(), "family_name".into()],
            }]);
            Template {
                id: i as RecordId + 1,
                template_id: template_id.to_string(),
                name: name.to_string(),
                version: version.to_string(),
                description: Some(description.to_string()),
                payload: serde_json::Value::String(
                    serde_json::to_string(&payload).unwrap_or_default(),
                ),
                verifier_role_ids: vec![(i as RecordId % 3) + 1],
            }
        })
        .collect::<Vec<_>>();

        let users = [
            ("ada lovelace", "ada@example.org", "F-1001", 1, UserStatus::Active),
            ("alan turing", "alan@example.org", "F-1002", 2, UserStatus::Invited),
            ("grace hopper", "grace@example.org", "F-1003", 3, UserStatus::Created),
            ("edsger dijkstra", "edsger@example.org", "F-1004", 1, UserStatus::Suspended),
            ("barbara liskov", "barbara@example.org", "F-1005", 2, UserStatus::Active),
            ("donald knuth", "donald@example.org", "F-1006", 3, UserStatus::Revoked),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (username, email, foundation_id, role_id, status))| User {
            id: 100 + i as RecordId,
            username: username.to_string(),
            user_id: None,
            email: email.to_string(),
            foundation_id: foundation_id.to_string(),
            verifier_role: roles.iter().find(|r| r.id == role_id).map(RoleRef::from),
            status_id: status.id(),
        })
        .collect::<Vec<_>>();

        Self {
            state: Mutex::new(MockState {
                templates,
                roles,
                users,
                next_id: 1000,
                fail_next: None,
                calls: Vec::new(),
            }),
            session: None,
        }
    }

    /// Requires a usable token from `session` for every call.
    pub fn with_session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Replaces the user collection.
    pub fn with_users(self, users: Vec<User>) -> Self {
        self.lock().users = users;
        self
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        self.lock().fail_next = Some(error);
    }

    /// Names of the calls received so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn templates(&self) -> Vec<Template> {
        self.lock().templates.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call and applies auth / injected failure.
    fn enter(&self, call: &'static str) -> Result<MutexGuard<'_, MockState>, ApiError> {
        if let Some(session) = &self.session {
            session.bearer()?;
        }
        let mut state = self.lock();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

fn not_found(what: &str, id: RecordId) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{what} {id} not found"),
    }
}

impl VerifierApi for MockApi {
    fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        Ok(self.enter("list_templates")?.templates.clone())
    }

    fn create_template(&self, payload: &TemplatePayload) -> Result<Saved<Template>, ApiError> {
        let mut state = self.enter("create_template")?;
        if state
            .templates
            .iter()
            .any(|t| t.template_id == payload.template_id)
        {
            return Err(ApiError::Status {
                status: 409,
                message: format!("Template ID {} already exists", payload.template_id),
            });
        }
        let id = state.allocate_id();
        let template = payload.clone().into_template(id);
        state.templates.push(template.clone());
        Ok(Saved {
            entity: template,
            message: Some("Template created successfully".into()),
        })
    }

    fn update_template(
        &self,
        id: RecordId,
        payload: &TemplatePayload,
    ) -> Result<Saved<Template>, ApiError> {
        let mut state = self.enter("update_template")?;
        let slot = state
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("template", id))?;
        *slot = payload.clone().into_template(id);
        Ok(Saved {
            entity: slot.clone(),
            message: Some("Template updated successfully".into()),
        })
    }

    fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        Ok(self.enter("list_roles")?.roles.clone())
    }

    fn list_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.enter("list_users")?.users.clone())
    }

    fn check_user_id(&self, user_id: &str) -> Result<bool, ApiError> {
        let state = self.enter("check_user_id")?;
        Ok(state
            .users
            .iter()
            .any(|u| u.user_id.as_deref() == Some(user_id) || u.username == user_id))
    }

    fn create_user(&self, payload: &UserPayload) -> Result<Saved<User>, ApiError> {
        let mut state = self.enter("create_user")?;
        let role = state
            .roles
            .iter()
            .find(|r| r.id == payload.verifier_role_id)
            .map(RoleRef::from);
        let id = state.allocate_id();
        let user = User {
            id,
            username: payload.username.clone(),
            user_id: Some(payload.username.clone()),
            email: payload.email.clone(),
            foundation_id: payload.foundation_id.clone(),
            verifier_role: role,
            status_id: UserStatus::Created.id(),
        };
        state.users.push(user.clone());
        Ok(Saved {
            entity: user,
            message: Some("User added successfully".into()),
        })
    }

    fn update_user(
        &self,
        id: RecordId,
        payload: &UserPayload,
    ) -> Result<Saved<Option<User>>, ApiError> {
        let mut state = self.enter("update_user")?;
        let role = state
            .roles
            .iter()
            .find(|r| r.id == payload.verifier_role_id)
            .cloned();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found("user", id))?;
        user.apply(payload, role.as_ref());
        // The real backend answers updates without the entity.
        Ok(Saved {
            entity: None,
            message: None,
        })
    }

    fn delete_user(&self, id: RecordId) -> Result<(), ApiError> {
        let mut state = self.enter("delete_user")?;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Err(not_found("user", id));
        }
        Ok(())
    }

    fn invite_user(&self, email: &str) -> Result<(), ApiError> {
        let mut state = self.enter("invite_user")?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("no user with email {email}"),
            })?;
        if user.status() == UserStatus::Created {
            user.status_id = UserStatus::Invited.id();
        }
        Ok(())
    }

    fn update_user_status(&self, id: RecordId, status: UserStatus) -> Result<(), ApiError> {
        let mut state = self.enter("update_user_status")?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found("user", id))?;
        user.status_id = status.id();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_data_is_consistent() {
        let api = MockApi::seeded();
        let templates = api.list_templates().unwrap();
        assert_eq!(templates.len(), 7);
        for template in &templates {
            assert_eq!(template.schemas().unwrap().len(), 1);
        }
        let users = api.list_users().unwrap();
        assert!(users.iter().all(|u| u.verifier_role.is_some()));
        assert_eq!(api.calls(), vec!["list_templates", "list_users"]);
    }

    #[test]
    fn injected_failure_applies_once() {
        let api = MockApi::seeded();
        api.fail_next(ApiError::Transport("boom".into()));
        assert!(api.list_roles().is_err());
        assert_eq!(api.list_roles().unwrap().len(), 3);
    }

    #[test]
    fn session_is_enforced_when_attached() {
        let api = MockApi::seeded().with_session(Arc::new(Session::anonymous()));
        assert_eq!(api.list_users(), Err(ApiError::NotAuthenticated));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn invite_promotes_created_users_only() {
        let api = MockApi::seeded();
        api.invite_user("grace@example.org").unwrap();
        api.invite_user("ada@example.org").unwrap();
        let users = api.users();
        let status = |email: &str| users.iter().find(|u| u.email == email).unwrap().status();
        assert_eq!(status("grace@example.org"), UserStatus::Invited);
        assert_eq!(status("ada@example.org"), UserStatus::Active);
    }
}
