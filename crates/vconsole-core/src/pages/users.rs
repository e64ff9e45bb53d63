//! Verifier users page.

use std::sync::Arc;

use tracing::{debug, info};

use super::{Completion, Outgoing, RequestTracker, TableCommand, Ticket, apply_table_command};
use super::{report, unexpected};
use crate::api::{ApiError, ApiReply, ApiRequest, Saved};
use crate::forms::{Confirmation, ModalMode, StatusForm, UserForm, UserIdCheck};
use crate::models::{Role, User, UserPayload, UserStatus};
use crate::notify::{Notice, Notifier};
use crate::session::Session;
use crate::table::{Column, PageSize, RecordId, RecordTable, TableView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    LoadUsers,
    LoadRoles,
    CheckUserId,
    Submit,
    Delete,
    Invite,
    UpdateStatus,
}

fn status_label(user: &User) -> String {
    user.status().label().to_string()
}

fn invitation(user: &User) -> String {
    if user.status().can_reinvite() {
        "Re-Invite".to_string()
    } else {
        "-".to_string()
    }
}

fn columns() -> Vec<Column<User>> {
    vec![
        Column::accessor("foundationID", "Foundation ID"),
        Column::accessor("username", "Username"),
        Column::accessor("email", "Email"),
        Column::accessor("verifierRole.role", "Role"),
        Column::accessor("statusId", "Status").with_renderer(status_label),
        Column::display("invite", "Invitation", invitation).unsortable(),
    ]
}

pub struct UsersPage {
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
    users: Vec<User>,
    roles: Vec<Role>,
    table: RecordTable<User>,
    form: UserForm,
    status_form: StatusForm,
    delete_confirm: Confirmation<User>,
    invite_confirm: Confirmation<User>,
    tracker: RequestTracker<UserAction>,
    /// Update payload awaiting its reply, merged locally when the backend
    /// does not echo the entity.
    pending_update: Option<UserPayload>,
    submit_after_check: bool,
    loaded: bool,
}

impl UsersPage {
    pub fn new(session: Arc<Session>, notifier: Arc<dyn Notifier>, page_size: PageSize) -> Self {
        Self {
            session,
            notifier,
            users: Vec::new(),
            roles: Vec::new(),
            table: RecordTable::new(columns()).with_page_size(page_size),
            form: UserForm::default(),
            status_form: StatusForm::default(),
            delete_confirm: Confirmation::default(),
            invite_confirm: Confirmation::default(),
            tracker: RequestTracker::default(),
            pending_update: None,
            submit_after_check: false,
            loaded: false,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn table(&self) -> &RecordTable<User> {
        &self.table
    }

    pub fn view(&self) -> TableView<'_, User> {
        self.table.view(&self.users)
    }

    pub fn table_command(&mut self, command: TableCommand) -> bool {
        apply_table_command(&mut self.table, &self.users, command)
    }

    pub fn form(&self) -> &UserForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UserForm {
        &mut self.form
    }

    pub fn status_form(&self) -> &StatusForm {
        &self.status_form
    }

    pub fn status_form_mut(&mut self) -> &mut StatusForm {
        &mut self.status_form
    }

    pub fn delete_confirm(&self) -> &Confirmation<User> {
        &self.delete_confirm
    }

    pub fn invite_confirm(&self) -> &Confirmation<User> {
        &self.invite_confirm
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_busy(UserAction::LoadUsers)
    }

    pub fn is_busy(&self, action: UserAction) -> bool {
        self.tracker.is_busy(action)
    }

    /// First load of the session; no-op afterwards.
    pub fn load(&mut self) -> Vec<Outgoing<UserAction>> {
        if self.loaded {
            return Vec::new();
        }
        self.reload()
    }

    pub fn reload(&mut self) -> Vec<Outgoing<UserAction>> {
        if !self.authenticated("Failed to fetch users") {
            return Vec::new();
        }
        self.loaded = true;
        [
            self.tracker.begin(UserAction::LoadUsers, ApiRequest::ListUsers),
            self.tracker.begin(UserAction::LoadRoles, ApiRequest::ListRoles),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn authenticated(&self, context: &str) -> bool {
        match self.session.bearer() {
            Ok(_) => true,
            Err(e) => {
                report(self.notifier.as_ref(), context, &e);
                false
            }
        }
    }

    fn find(&self, id: RecordId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn reset_modal_state(&mut self) {
        self.tracker.close_modal();
        self.pending_update = None;
        self.submit_after_check = false;
    }

    /// At most one dialog is open at a time.
    fn close_dialogs(&mut self) {
        self.form.close();
        self.status_form.close();
        self.delete_confirm.cancel();
        self.invite_confirm.cancel();
        self.reset_modal_state();
    }

    pub fn open_create(&mut self) {
        self.close_dialogs();
        self.form.open_create();
    }

    pub fn open_edit(&mut self, id: RecordId) -> bool {
        let Some(user) = self.find(id).cloned() else {
            return false;
        };
        self.close_dialogs();
        self.form.open_edit(&user);
        true
    }

    pub fn close_form(&mut self) {
        self.form.close();
        self.reset_modal_state();
    }

    /// Moves the role selection through the loaded roles.
    pub fn cycle_role(&mut self, forward: bool) {
        if forward {
            self.form.next_role(&self.roles);
        } else {
            self.form.prev_role(&self.roles);
        }
    }

    /// Call after the user id field changed; starts an availability check
    /// when the typed id qualifies for one.
    pub fn user_id_edited(&mut self) -> Option<Outgoing<UserAction>> {
        let user_id = self.form.pending_user_id_check()?;
        self.check_user_id(user_id)
    }

    fn check_user_id(&mut self, user_id: String) -> Option<Outgoing<UserAction>> {
        let out = self
            .tracker
            .begin_modal(UserAction::CheckUserId, ApiRequest::CheckUserId(user_id.clone()))?;
        self.form.begin_user_id_check(user_id);
        Some(out)
    }

    /// Validates and issues create or update. A create whose user id has not
    /// been checked yet checks first and submits from the reply.
    pub fn submit(&mut self) -> Option<Outgoing<UserAction>> {
        if !self.form.is_open() || self.tracker.is_busy(UserAction::Submit) {
            return None;
        }
        if !self.authenticated("Failed to save user") {
            return None;
        }
        if let Some(user_id) = self.form.user_id_check_before_submit() {
            self.submit_after_check = true;
            return self.check_user_id(user_id);
        }
        if self.form.user_id_checking() {
            self.submit_after_check = true;
            self.notifier
                .notify(Notice::info("Checking user ID availability..."));
            return None;
        }
        let payload = match self.form.validate(&self.roles) {
            Ok(payload) => payload,
            Err(errors) => {
                debug!(%errors, "user form rejected");
                let message = if self.form.user_id_taken() {
                    "User ID already exists. Please choose a different one.".to_string()
                } else {
                    errors
                        .first()
                        .map(|e| e.message.clone())
                        .unwrap_or_default()
                };
                self.notifier.notify(Notice::error(message));
                return None;
            }
        };
        let request = match self.form.mode() {
            ModalMode::Edit(id) => {
                self.pending_update = Some(payload.clone());
                ApiRequest::UpdateUser { id, payload }
            }
            _ => ApiRequest::CreateUser(payload),
        };
        self.tracker.begin_modal(UserAction::Submit, request)
    }

    /// Opens the delete confirmation for `id`.
    pub fn ask_delete(&mut self, id: RecordId) -> bool {
        let Some(user) = self.find(id).cloned() else {
            return false;
        };
        self.close_dialogs();
        self.delete_confirm.ask(user);
        true
    }

    /// `None` while the delete is already in flight.
    pub fn confirm_delete(&mut self) -> Option<Outgoing<UserAction>> {
        let id = self.delete_confirm.target()?.id;
        if !self.authenticated("Failed to delete user") {
            return None;
        }
        self.tracker
            .begin_modal(UserAction::Delete, ApiRequest::DeleteUser(id))
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirm.cancel();
        self.reset_modal_state();
    }

    /// Opens the invitation confirmation. Only users up to ACTIVE can be
    /// re-invited.
    pub fn ask_invite(&mut self, id: RecordId) -> bool {
        let Some(user) = self.find(id).cloned() else {
            return false;
        };
        if !user.status().can_reinvite() {
            self.notifier.notify(Notice::info(format!(
                "{} users cannot be re-invited",
                user.status()
            )));
            return false;
        }
        self.close_dialogs();
        self.invite_confirm.ask(user);
        true
    }

    /// Sends the invitation. The trigger stays disabled (`None`) until the
    /// reply arrives.
    pub fn confirm_invite(&mut self) -> Option<Outgoing<UserAction>> {
        let email = self.invite_confirm.target()?.email.clone();
        if !self.authenticated("Failed to send invitation") {
            return None;
        }
        self.tracker
            .begin_modal(UserAction::Invite, ApiRequest::InviteUser { email })
    }

    pub fn cancel_invite(&mut self) {
        self.invite_confirm.cancel();
        self.reset_modal_state();
    }

    /// Opens the status dialog; revoked users are final.
    pub fn open_status(&mut self, id: RecordId) -> bool {
        let Some(user) = self.find(id).cloned() else {
            return false;
        };
        if !user.status().can_change() {
            self.notifier
                .notify(Notice::info("Revoked users cannot change status"));
            return false;
        }
        self.close_dialogs();
        self.status_form.open(&user)
    }

    pub fn submit_status(&mut self) -> Option<Outgoing<UserAction>> {
        let id = self.status_form.target()?;
        let status = self.status_form.status;
        if !self.authenticated("Failed to update status") {
            return None;
        }
        self.tracker.begin_modal(
            UserAction::UpdateStatus,
            ApiRequest::UpdateUserStatus { id, status },
        )
    }

    pub fn close_status(&mut self) {
        self.status_form.close();
        self.reset_modal_state();
    }

    /// Applies a finished request; may return a follow-up (a newer user id
    /// check, or the submit that was waiting for one).
    pub fn complete(
        &mut self,
        ticket: Ticket<UserAction>,
        result: Completion,
    ) -> Vec<Outgoing<UserAction>> {
        if !self.tracker.finish(&ticket) {
            return Vec::new();
        }
        let action = ticket.action;
        let mut follow_up = Vec::new();
        let outcome = match (action, result) {
            (UserAction::LoadUsers, Ok(ApiReply::Users(users))) => {
                debug!(count = users.len(), "users loaded");
                self.users = users;
                self.clamp_page();
                Ok(())
            }
            (UserAction::LoadRoles, Ok(ApiReply::Roles(roles))) => {
                self.roles = roles;
                Ok(())
            }
            (UserAction::CheckUserId, Ok(ApiReply::UserIdExists(exists))) => {
                follow_up.extend(self.apply_user_id_check(exists));
                Ok(())
            }
            (UserAction::Submit, Ok(ApiReply::User(saved))) => {
                self.apply_created(saved);
                Ok(())
            }
            (UserAction::Submit, Ok(ApiReply::UpdatedUser(saved))) => {
                self.apply_updated(saved);
                Ok(())
            }
            (UserAction::Delete, Ok(ApiReply::Done)) => {
                self.apply_deleted();
                Ok(())
            }
            (UserAction::Invite, Ok(ApiReply::Done)) => {
                self.apply_invited();
                Ok(())
            }
            (UserAction::UpdateStatus, Ok(ApiReply::Done)) => {
                self.apply_status();
                Ok(())
            }
            (action, Ok(other)) => Err(unexpected(&format!("{action:?}"), &other)),
            (_, Err(e)) => Err(e),
        };
        if let Err(e) = outcome {
            self.fail(action, &e);
        }
        follow_up
    }

    fn fail(&mut self, action: UserAction, error: &ApiError) {
        let context = match action {
            UserAction::LoadUsers => "Failed to fetch users",
            UserAction::LoadRoles => "Failed to fetch roles",
            UserAction::CheckUserId => {
                if let UserIdCheck::Checking(id) = self.form.user_id_check().clone() {
                    self.form.abandon_user_id_check(&id);
                }
                self.submit_after_check = false;
                "Failed to check user ID"
            }
            UserAction::Submit => {
                self.pending_update = None;
                if self.form.mode().editing().is_some() {
                    "Failed to update user"
                } else {
                    "Failed to add user"
                }
            }
            UserAction::Delete => "Failed to delete user",
            UserAction::Invite => "Failed to send invitation",
            UserAction::UpdateStatus => "Failed to update status",
        };
        report(self.notifier.as_ref(), context, error);
    }

    fn apply_user_id_check(&mut self, exists: bool) -> Option<Outgoing<UserAction>> {
        let UserIdCheck::Checking(checked) = self.form.user_id_check().clone() else {
            return None;
        };
        self.form.finish_user_id_check(&checked, exists);
        // The field may have changed while the check was out.
        if let Some(out) = self.user_id_edited() {
            return Some(out);
        }
        if !std::mem::take(&mut self.submit_after_check) {
            return None;
        }
        if exists {
            self.notifier.notify(Notice::error(
                "User ID already exists. Please choose a different one.",
            ));
            return None;
        }
        self.submit()
    }

    fn apply_created(&mut self, saved: Saved<User>) {
        info!(id = saved.entity.id, "user created");
        self.users.push(saved.entity);
        self.notifier.notify(Notice::success(
            saved
                .message
                .unwrap_or_else(|| "User added successfully!".to_string()),
        ));
        self.close_form();
    }

    fn apply_updated(&mut self, saved: Saved<Option<User>>) {
        let Some(id) = self.form.mode().editing() else {
            return;
        };
        let payload = self.pending_update.take();
        let role = payload
            .as_ref()
            .and_then(|p| self.roles.iter().find(|r| r.id == p.verifier_role_id))
            .cloned();
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == id) {
            match (saved.entity, payload) {
                (Some(entity), _) => *slot = entity,
                (None, Some(payload)) => slot.apply(&payload, role.as_ref()),
                (None, None) => {}
            }
        }
        info!(id, "user updated");
        self.notifier.notify(Notice::success("User updated successfully!"));
        self.close_form();
    }

    fn apply_deleted(&mut self) {
        let Some(user) = self.delete_confirm.take() else {
            return;
        };
        self.users.retain(|u| u.id != user.id);
        self.clamp_page();
        info!(id = user.id, "user deleted");
        self.notifier.notify(Notice::success("User deleted successfully!"));
        self.reset_modal_state();
    }

    fn apply_invited(&mut self) {
        let Some(user) = self.invite_confirm.take() else {
            return;
        };
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == user.id) {
            if slot.status() == UserStatus::Created {
                slot.status_id = UserStatus::Invited.id();
            }
        }
        info!(id = user.id, "invitation sent");
        self.notifier
            .notify(Notice::success("Invitation email sent successfully!"));
        self.reset_modal_state();
    }

    fn apply_status(&mut self) {
        let Some(id) = self.status_form.target() else {
            return;
        };
        let status = self.status_form.status;
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == id) {
            slot.status_id = status.id();
        }
        info!(id, %status, "user status updated");
        self.notifier
            .notify(Notice::success(format!("User status updated to {status}")));
        self.close_status();
    }

    fn clamp_page(&mut self) {
        let index = self.table.state().page_index;
        self.table.go_to_page(index, &self.users);
    }
}

impl std::fmt::Debug for UsersPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsersPage")
            .field("users", &self.users.len())
            .field("roles", &self.roles.len())
            .field("mode", &self.form.mode())
            .field("loaded", &self.loaded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VerifierApi;
    use crate::api::mock::MockApi;
    use crate::notify::NoticeLevel;
    use crate::pages::run_to_completion;
    use crate::pages::testing::Recorder;

    fn loaded(api: &MockApi, recorder: &Arc<Recorder>) -> UsersPage {
        let mut page = UsersPage::new(
            Arc::new(Session::new(Some("token".into()))),
            recorder.clone(),
            PageSize::Five,
        );
        let out = page.load();
        run_to_completion(out, |o| {
            let result = o.request.dispatch(api);
            page.complete(o.ticket, result)
        });
        page
    }

    fn run(api: &MockApi, page: &mut UsersPage, out: Option<Outgoing<UserAction>>) {
        run_to_completion(out.into_iter().collect(), |o| {
            let result = o.request.dispatch(api);
            page.complete(o.ticket, result)
        });
    }

    fn fill(form: &mut UserForm) {
        form.first_name = "Katherine".into();
        form.last_name = "Johnson".into();
        form.email = "katherine@example.org".into();
        form.foundation_id = "F-2001".into();
        form.role = Some(2);
    }

    fn by_email<'a>(page: &'a UsersPage, email: &str) -> &'a User {
        page.users().iter().find(|u| u.email == email).unwrap()
    }

    #[test]
    fn loads_users_and_roles() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let page = loaded(&api, &recorder);
        assert_eq!(page.users().len(), 6);
        assert_eq!(page.roles().len(), 3);
        assert_eq!(page.view().page_count, 2);
    }

    #[test]
    fn create_appends() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        page.open_create();
        fill(page.form_mut());
        let out = page.submit();
        assert!(matches!(out.as_ref().map(|o| &o.request), Some(ApiRequest::CreateUser(_))));
        run(&api, &mut page, out);

        assert_eq!(page.users().len(), 7);
        let created = by_email(&page, "katherine@example.org");
        assert!(created.username.starts_with("katherine_johnson_"));
        assert_eq!(created.status(), UserStatus::Created);
        assert!(!page.form().is_open());
        assert_eq!(
            recorder.last(),
            Some((NoticeLevel::Success, "User added successfully".into()))
        );
    }

    #[test]
    fn submit_checks_user_id_first_then_creates() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        page.open_create();
        fill(page.form_mut());
        page.form_mut().user_id = "kjohnson".into();

        let out = page.submit();
        assert!(matches!(
            out.as_ref().map(|o| &o.request),
            Some(ApiRequest::CheckUserId(id)) if id == "kjohnson"
        ));
        run(&api, &mut page, out);
        assert_eq!(by_email(&page, "katherine@example.org").username, "kjohnson");
        assert_eq!(
            api.calls()[api.calls().len() - 2..],
            ["check_user_id", "create_user"]
        );
    }

    #[test]
    fn short_user_id_is_checked_on_submit() {
        let mut users = MockApi::seeded().users();
        users[0].user_id = Some("bob".into());
        let api = MockApi::seeded().with_users(users);
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        page.open_create();
        fill(page.form_mut());
        page.form_mut().user_id = "bob".into();
        assert!(page.user_id_edited().is_none(), "too short to check while typing");

        let out = page.submit();
        assert!(matches!(
            out.as_ref().map(|o| &o.request),
            Some(ApiRequest::CheckUserId(id)) if id == "bob"
        ));
        run(&api, &mut page, out);

        assert!(page.form().user_id_taken());
        assert_eq!(page.users().len(), 6);
        assert!(!api.calls().contains(&"create_user"));
        assert_eq!(
            recorder.last(),
            Some((
                NoticeLevel::Error,
                "User ID already exists. Please choose a different one.".into()
            ))
        );

        page.form_mut().user_id = "bo".into();
        let out = page.submit();
        run(&api, &mut page, out);
        assert_eq!(by_email(&page, "katherine@example.org").username, "bo");
        assert_eq!(
            api.calls()[api.calls().len() - 2..],
            ["check_user_id", "create_user"]
        );
    }

    #[test]
    fn taken_user_id_blocks_submit() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        page.open_create();
        fill(page.form_mut());
        page.form_mut().user_id = "ada lovelace".into();
        let out = page.user_id_edited();
        assert!(page.user_id_edited().is_none(), "check already in flight");
        assert!(page.submit().is_none(), "blocked while checking");
        run(&api, &mut page, out);

        assert!(page.form().user_id_taken());
        assert_eq!(page.users().len(), 6);
        assert!(page.submit().is_none());
        assert_eq!(
            recorder.last(),
            Some((
                NoticeLevel::Error,
                "User ID already exists. Please choose a different one.".into()
            ))
        );
        assert!(!api.calls().contains(&"create_user"));
    }

    #[test]
    fn update_merges_payload_when_backend_returns_no_entity() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        let id = by_email(&page, "alan@example.org").id;

        assert!(page.open_edit(id));
        assert_eq!(page.form().first_name, "alan");
        page.form_mut().email = "alan.t@example.org".into();
        page.form_mut().role = Some(3);
        let out = page.submit();
        run(&api, &mut page, out);

        let user = page.users().iter().find(|u| u.id == id).unwrap();
        assert_eq!(user.email, "alan.t@example.org");
        assert_eq!(user.username, "alan turing");
        assert_eq!(user.verifier_role.as_ref().map(|r| r.role.as_str()), Some("Clerk"));
        assert_eq!(page.users().len(), 6);
    }

    #[test]
    fn edit_cancel_create_shows_defaults() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        let id = page.users()[0].id;
        page.open_edit(id);
        assert!(!page.form().email.is_empty());
        page.close_form();
        page.open_create();
        let form = page.form();
        assert!(form.first_name.is_empty());
        assert!(form.last_name.is_empty());
        assert!(form.user_id.is_empty());
        assert!(form.email.is_empty());
        assert!(form.foundation_id.is_empty());
        assert_eq!(form.role, None);
    }

    #[test]
    fn delete_filters_out_after_confirmation() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        let id = page.users()[1].id;

        assert!(page.ask_delete(id));
        let out = page.confirm_delete();
        assert!(page.confirm_delete().is_none());
        run(&api, &mut page, out);

        assert_eq!(page.users().len(), 5);
        assert!(page.users().iter().all(|u| u.id != id));
        assert!(!page.delete_confirm().is_open());
    }

    #[test]
    fn failed_delete_leaves_collection() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        let id = page.users()[1].id;
        page.ask_delete(id);
        api.fail_next(ApiError::Status {
            status: 500,
            message: "database unavailable".into(),
        });
        let out = page.confirm_delete();
        run(&api, &mut page, out);

        assert_eq!(page.users().len(), 6);
        assert!(page.delete_confirm().is_open());
        assert_eq!(
            recorder.last(),
            Some((
                NoticeLevel::Error,
                "Failed to delete user: database unavailable".into()
            ))
        );
    }

    #[test]
    fn invite_disables_trigger_and_promotes_created_user() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        let id = by_email(&page, "grace@example.org").id;

        assert!(page.ask_invite(id));
        let out = page.confirm_invite();
        assert!(out.is_some());
        assert!(page.is_busy(UserAction::Invite));
        assert!(page.confirm_invite().is_none());
        run(&api, &mut page, out);

        assert!(!page.is_busy(UserAction::Invite));
        assert_eq!(by_email(&page, "grace@example.org").status(), UserStatus::Invited);
        assert_eq!(api.calls().iter().filter(|c| **c == "invite_user").count(), 1);
    }

    #[test]
    fn suspended_users_cannot_be_invited() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        let id = by_email(&page, "edsger@example.org").id;
        assert!(!page.ask_invite(id));
        assert!(!page.invite_confirm().is_open());
    }

    #[test]
    fn opening_a_dialog_closes_the_others() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        let ada = by_email(&page, "ada@example.org").id;
        let grace = by_email(&page, "grace@example.org").id;
        let open = |page: &UsersPage| {
            [
                page.form().is_open(),
                page.status_form().is_open(),
                page.delete_confirm().is_open(),
                page.invite_confirm().is_open(),
            ]
        };

        assert!(page.open_edit(ada));
        assert!(page.ask_delete(ada));
        assert_eq!(open(&page), [false, false, true, false]);

        assert!(page.open_status(ada));
        assert_eq!(open(&page), [false, true, false, false]);

        assert!(page.ask_invite(grace));
        assert_eq!(open(&page), [false, false, false, true]);

        let suspended = by_email(&page, "edsger@example.org").id;
        assert!(!page.ask_invite(suspended));
        assert_eq!(page.invite_confirm().target().map(|u| u.id), Some(grace));

        page.open_create();
        assert_eq!(open(&page), [true, false, false, false]);
    }

    #[test]
    fn status_change_replaces_local_status() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        let id = by_email(&page, "ada@example.org").id;

        assert!(page.open_status(id));
        page.status_form_mut().next();
        let out = page.submit_status();
        run(&api, &mut page, out);

        assert_eq!(by_email(&page, "ada@example.org").status(), UserStatus::Suspended);
        assert!(!page.status_form().is_open());
        assert_eq!(
            recorder.last(),
            Some((NoticeLevel::Success, "User status updated to SUSPENDED".into()))
        );

        let revoked = by_email(&page, "donald@example.org").id;
        assert!(!page.open_status(revoked));
    }

    #[test]
    fn status_reply_after_close_is_discarded() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        let id = by_email(&page, "ada@example.org").id;
        page.open_status(id);
        page.status_form_mut().next();
        let out = page.submit_status();
        page.close_status();
        run(&api, &mut page, out);
        assert_eq!(by_email(&page, "ada@example.org").status(), UserStatus::Active);
        assert_eq!(api.list_users().unwrap()[0].status(), UserStatus::Suspended);
    }

    #[test]
    fn missing_role_blocks_without_request() {
        let api = MockApi::seeded();
        let recorder = Recorder::new();
        let mut page = loaded(&api, &recorder);
        let calls = api.calls().len();
        page.open_create();
        fill(page.form_mut());
        page.form_mut().role = None;
        assert!(page.submit().is_none());
        assert_eq!(api.calls().len(), calls);
        assert_eq!(recorder.last(), Some((NoticeLevel::Error, "Role is required".into())));
    }
}
