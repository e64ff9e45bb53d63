//! Backend collaborator: the verifier REST API.
//!
//! [`VerifierApi`] is the seam between pages and the network. [`ApiClient`]
//! talks HTTP, [`mock::MockApi`] keeps everything in memory. Pages never call
//! the API directly; they describe work as [`ApiRequest`] values which the
//! host executes with [`ApiRequest::dispatch`].

mod client;
pub mod envelope;
mod error;
pub mod mock;

pub use client::ApiClient;
pub use error::ApiError;

use crate::models::{Role, Template, TemplatePayload, User, UserPayload, UserStatus};
use crate::table::RecordId;

/// Successful mutation result: the entity (when the backend returns one) and
/// the backend's message.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    pub entity: T,
    pub message: Option<String>,
}

/// Operations offered by the verifier backend.
pub trait VerifierApi: Send + Sync {
    fn list_templates(&self) -> Result<Vec<Template>, ApiError>;

    fn create_template(&self, payload: &TemplatePayload) -> Result<Saved<Template>, ApiError>;

    fn update_template(
        &self,
        id: RecordId,
        payload: &TemplatePayload,
    ) -> Result<Saved<Template>, ApiError>;

    fn list_roles(&self) -> Result<Vec<Role>, ApiError>;

    fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// Whether `user_id` is already taken.
    fn check_user_id(&self, user_id: &str) -> Result<bool, ApiError>;

    fn create_user(&self, payload: &UserPayload) -> Result<Saved<User>, ApiError>;

    /// The backend may answer without echoing the updated entity.
    fn update_user(
        &self,
        id: RecordId,
        payload: &UserPayload,
    ) -> Result<Saved<Option<User>>, ApiError>;

    fn delete_user(&self, id: RecordId) -> Result<(), ApiError>;

    fn invite_user(&self, email: &str) -> Result<(), ApiError>;

    fn update_user_status(&self, id: RecordId, status: UserStatus) -> Result<(), ApiError>;
}

/// A backend call described as data, so it can cross threads.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    ListTemplates,
    CreateTemplate(TemplatePayload),
    UpdateTemplate {
        id: RecordId,
        payload: TemplatePayload,
    },
    ListRoles,
    ListUsers,
    CheckUserId(String),
    CreateUser(UserPayload),
    UpdateUser {
        id: RecordId,
        payload: UserPayload,
    },
    DeleteUser(RecordId),
    InviteUser {
        email: String,
    },
    UpdateUserStatus {
        id: RecordId,
        status: UserStatus,
    },
}

/// Result payload of a successful [`ApiRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    Templates(Vec<Template>),
    Template(Saved<Template>),
    Roles(Vec<Role>),
    Users(Vec<User>),
    User(Saved<User>),
    UpdatedUser(Saved<Option<User>>),
    UserIdExists(bool),
    Done,
}

impl ApiRequest {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ApiRequest::ListTemplates => "list_templates",
            ApiRequest::CreateTemplate(_) => "create_template",
            ApiRequest::UpdateTemplate { .. } => "update_template",
            ApiRequest::ListRoles => "list_roles",
            ApiRequest::ListUsers => "list_users",
            ApiRequest::CheckUserId(_) => "check_user_id",
            ApiRequest::CreateUser(_) => "create_user",
            ApiRequest::UpdateUser { .. } => "update_user",
            ApiRequest::DeleteUser(_) => "delete_user",
            ApiRequest::InviteUser { .. } => "invite_user",
            ApiRequest::UpdateUserStatus { .. } => "update_user_status",
        }
    }

    /// Executes the request against `api`.
    pub fn dispatch(&self, api: &dyn VerifierApi) -> Result<ApiReply, ApiError> {
        tracing::debug!(request = self.name(), "dispatching");
        match self {
            ApiRequest::ListTemplates => api.list_templates().map(ApiReply::Templates),
            ApiRequest::CreateTemplate(payload) => {
                api.create_template(payload).map(ApiReply::Template)
            }
            ApiRequest::UpdateTemplate { id, payload } => {
                api.update_template(*id, payload).map(ApiReply::Template)
            }
            ApiRequest::ListRoles => api.list_roles().map(ApiReply::Roles),
            ApiRequest::ListUsers => api.list_users().map(ApiReply::Users),
            ApiRequest::CheckUserId(user_id) => {
                api.check_user_id(user_id).map(ApiReply::UserIdExists)
            }
            ApiRequest::CreateUser(payload) => api.create_user(payload).map(ApiReply::User),
            ApiRequest::UpdateUser { id, payload } => {
                api.update_user(*id, payload).map(ApiReply::UpdatedUser)
            }
            ApiRequest::DeleteUser(id) => api.delete_user(*id).map(|_| ApiReply::Done),
            ApiRequest::InviteUser { email } => api.invite_user(email).map(|_| ApiReply::Done),
            ApiRequest::UpdateUserStatus { id, status } => api
                .update_user_status(*id, *status)
                .map(|_| ApiReply::Done),
        }
    }
}
