//! HTTP implementation of [`VerifierApi`] on top of `reqwest::blocking`.
//!
//! Calls block the calling thread; the TUI runs each one on a worker thread.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use tracing::{debug, warn};

use super::envelope::{self, parse_entity, parse_exists, parse_list, parse_optional_entity};
use super::{ApiError, Saved, VerifierApi};
use crate::models::{Role, Template, TemplatePayload, User, UserPayload, UserStatus};
use crate::session::Session;
use crate::table::RecordId;

/// Path prefix of every verifier endpoint.
const API_PREFIX: &str = "/mobile-verifier/v1";

/// Page size requested for list reads; the console paginates locally.
const LIST_PAGE_SIZE: u32 = 300;

/// Key under which template writes nest the entity.
const TEMPLATE_ENTITY_KEY: &str = "proofTemplate";

/// Blocking REST client for the verifier backend.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<Session>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vconsole/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, API_PREFIX, path)
    }

    /// Authorized request builder. Fails before touching the network when no
    /// usable token is available.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.session.bearer()?;
        Ok(self
            .http
            .request(method, self.url(path))
            .bearer_auth(token)
            .header(ACCEPT, "*/*"))
    }

    /// Sends and returns the body of a 2xx response.
    fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send()?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text()?;
        debug!(status = status.as_u16(), path = %url, bytes = body.len(), "response");
        if !status.is_success() {
            let message = envelope::error_message(&body);
            warn!(status = status.as_u16(), path = %url, %message, "backend rejected request");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }

    fn get_list<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let builder = self
            .request(Method::GET, path)?
            .query(&[("pageSize", LIST_PAGE_SIZE)]);
        let body = self.send(builder)?;
        Ok(parse_list(&body)?.data)
    }
}

impl VerifierApi for ApiClient {
    fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        self.get_list("proof-template")
    }

    fn create_template(&self, payload: &TemplatePayload) -> Result<Saved<Template>, ApiError> {
        let builder = self.request(Method::POST, "proof-template")?.json(payload);
        let body = self.send(builder)?;
        let env = parse_entity(&body, Some(TEMPLATE_ENTITY_KEY))?;
        Ok(Saved {
            entity: env.data,
            message: env.message,
        })
    }

    fn update_template(
        &self,
        id: RecordId,
        payload: &TemplatePayload,
    ) -> Result<Saved<Template>, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("proof-templates/{id}"))?
            .json(payload);
        let body = self.send(builder)?;
        let env = parse_entity(&body, Some(TEMPLATE_ENTITY_KEY))?;
        Ok(Saved {
            entity: env.data,
            message: env.message,
        })
    }

    fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.get_list("verifier-role")
    }

    fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_list("verifier-user")
    }

    fn check_user_id(&self, user_id: &str) -> Result<bool, ApiError> {
        let builder = self
            .request(Method::GET, "verifier-user/check-userid")?
            .query(&[("userId", user_id)]);
        let body = self.send(builder)?;
        parse_exists(&body)
    }

    fn create_user(&self, payload: &UserPayload) -> Result<Saved<User>, ApiError> {
        let builder = self.request(Method::POST, "verifier-user")?.json(payload);
        let body = self.send(builder)?;
        let env = parse_entity(&body, None)?;
        Ok(Saved {
            entity: env.data,
            message: env.message,
        })
    }

    fn update_user(
        &self,
        id: RecordId,
        payload: &UserPayload,
    ) -> Result<Saved<Option<User>>, ApiError> {
        let builder = self
            .request(Method::PATCH, &format!("verifier-user/{id}"))?
            .json(payload);
        let body = self.send(builder)?;
        // Some deployments echo a partial entity; treat undecodable data as absent.
        let env = parse_optional_entity(&body, None).unwrap_or_else(|e| {
            debug!(error = %e, "update_user response carried no usable entity");
            envelope::Envelope {
                data: None,
                message: envelope::parse_message(&body),
            }
        });
        Ok(Saved {
            entity: env.data,
            message: env.message,
        })
    }

    fn delete_user(&self, id: RecordId) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("verifier-user/{id}"))?;
        self.send(builder).map(|_| ())
    }

    fn invite_user(&self, email: &str) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "verifier-user/invite")?
            .json(&serde_json::json!({ "email": email }));
        self.send(builder).map(|_| ())
    }

    fn update_user_status(&self, id: RecordId, status: UserStatus) -> Result<(), ApiError> {
        let id = id.to_string();
        let builder = self
            .request(Method::POST, "verifier-user/revoke_suspend")?
            .query(&[("id", id.as_str()), ("status", status.label())]);
        self.send(builder).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_fails_before_any_network_call() {
        // Port 9 (discard) on localhost: the call must not get that far.
        let client = ApiClient::new(
            "http://127.0.0.1:9/",
            Arc::new(Session::anonymous()),
            Duration::from_millis(50),
        )
        .unwrap();
        assert_eq!(client.list_templates(), Err(ApiError::NotAuthenticated));
        assert_eq!(client.delete_user(1), Err(ApiError::NotAuthenticated));
    }

    #[test]
    fn urls_are_built_under_the_api_prefix() {
        let client = ApiClient::new(
            "https://verifier.example.org/",
            Arc::new(Session::anonymous()),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://verifier.example.org");
        assert_eq!(
            client.url("proof-templates/4"),
            "https://verifier.example.org/mobile-verifier/v1/proof-templates/4"
        );
    }
}
