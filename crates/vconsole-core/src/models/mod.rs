//! Typed backend records: proof templates, schema rows, verifier roles and users.
//!
//! Records are decoded at the API boundary; anything that does not match
//! these shapes is reported as a malformed response instead of being
//! passed downstream as loose JSON.

mod status;

pub use status::UserStatus;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiError;
use crate::table::{CellValue, Record, RecordId};

/// Payload type tag used by the verifier backend.
pub const PAYLOAD_TYPE_DIF: &str = "dif";

/// Access-control role assigned to verifier users and templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RecordId,
    pub role: String,
}

impl Role {
    /// `"<id>: <role>"`, as shown in role pickers.
    pub fn label(&self) -> String {
        format!("{}: {}", self.id, self.role)
    }
}

impl Record for Role {
    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, path: &str) -> CellValue {
        match path {
            "id" => self.id.into(),
            "role" => self.role.as_str().into(),
            _ => CellValue::Empty,
        }
    }
}

/// One credential schema requested by a proof template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEntry {
    pub schema_name: String,
    /// Schema URL.
    pub schema: String,
    /// Attribute names requested from the credential.
    #[serde(default)]
    pub names: Vec<String>,
}

/// `{ "type": "dif", "data": [SchemaEntry] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Vec<SchemaEntry>,
}

impl ProofPayload {
    pub fn dif(data: Vec<SchemaEntry>) -> Self {
        Self {
            kind: PAYLOAD_TYPE_DIF.to_string(),
            data,
        }
    }
}

/// Proof template as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: RecordId,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Either a JSON-encoded string or an embedded [`ProofPayload`] object.
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub verifier_role_ids: Vec<RecordId>,
}

impl Template {
    /// Decodes the schema rows carried in `payload`.
    pub fn schemas(&self) -> Result<Vec<SchemaEntry>, ApiError> {
        let decoded = match &self.payload {
            Value::Null => return Ok(Vec::new()),
            Value::String(raw) => serde_json::from_str::<Value>(raw).map_err(|e| {
                ApiError::Malformed(format!("template {} payload is not JSON: {e}", self.id))
            })?,
            other => other.clone(),
        };
        let payload: ProofPayload = serde_json::from_value(decoded).map_err(|e| {
            ApiError::Malformed(format!("template {} payload has wrong shape: {e}", self.id))
        })?;
        Ok(payload.data)
    }
}

impl Record for Template {
    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, path: &str) -> CellValue {
        match path {
            "id" => self.id.into(),
            "templateId" => self.template_id.as_str().into(),
            "name" => self.name.as_str().into(),
            "version" => self.version.as_str().into(),
            "description" => self.description.clone().into(),
            _ => CellValue::Empty,
        }
    }
}

/// Request body for creating or updating a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload {
    pub template_id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub payload: ProofPayload,
    pub verifier_role_ids: Vec<RecordId>,
}

impl TemplatePayload {
    /// Record the backend would return for this payload under `id`.
    pub fn into_template(self, id: RecordId) -> Template {
        let payload = serde_json::to_value(&self.payload).unwrap_or_default();
        Template {
            id,
            template_id: self.template_id,
            name: self.name,
            version: self.version,
            description: Some(self.description),
            payload,
            verifier_role_ids: self.verifier_role_ids,
        }
    }
}

/// Role reference embedded in a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub id: RecordId,
    pub role: String,
}

impl From<&Role> for RoleRef {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            role: role.role.clone(),
        }
    }
}

/// Verifier user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "foundationID", default)]
    pub foundation_id: String,
    #[serde(default)]
    pub verifier_role: Option<RoleRef>,
    #[serde(default)]
    pub status_id: i64,
}

impl User {
    pub fn status(&self) -> UserStatus {
        UserStatus::from_id(self.status_id)
    }

    /// Applies a submitted payload locally (used when the backend answers an
    /// update without echoing the entity).
    pub fn apply(&mut self, payload: &UserPayload, role: Option<&Role>) {
        self.username = payload.username.clone();
        self.email = payload.email.clone();
        self.foundation_id = payload.foundation_id.clone();
        if let Some(role) = role {
            self.verifier_role = Some(role.into());
        }
    }
}

impl Record for User {
    fn id(&self) -> RecordId {
        self.id
    }

    fn field(&self, path: &str) -> CellValue {
        match path {
            "id" => self.id.into(),
            "username" => self.username.as_str().into(),
            "userId" => self.user_id.clone().into(),
            "email" => self.email.as_str().into(),
            "foundationID" => self.foundation_id.as_str().into(),
            "verifierRole.id" => self.verifier_role.as_ref().map(|r| r.id).into(),
            "verifierRole.role" => self
                .verifier_role
                .as_ref()
                .map(|r| r.role.clone())
                .into(),
            "statusId" => self.status_id.into(),
            _ => CellValue::Empty,
        }
    }
}

/// Request body for creating or updating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    pub username: String,
    #[serde(rename = "foundationID")]
    pub foundation_id: String,
    pub email: String,
    #[serde(rename = "verifierRoleId")]
    pub verifier_role_id: RecordId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn template_payload_decodes_from_string_or_object() {
        let mut template: Template = serde_json::from_value(json!({
            "id": 3,
            "templateId": "kyc",
            "name": "KYC",
            "version": "1.0.0",
            "payload": "{\"type\":\"dif\",\"data\":[{\"schemaName\":\"Passport\",\"schema\":\"https://s/passport\",\"names\":[\"given_name\"]}]}",
            "verifierRoleIds": [1, 2]
        }))
        .unwrap();
        let schemas = template.schemas().unwrap();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].schema_name, "Passport");
        assert_eq!(schemas[0].names, vec!["given_name".to_string()]);

        template.payload = json!({"type": "dif", "data": []});
        assert!(template.schemas().unwrap().is_empty());

        template.payload = json!("not json");
        assert!(matches!(template.schemas(), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn template_payload_serializes_camel_case() {
        let payload = TemplatePayload {
            template_id: "kyc".into(),
            name: "KYC".into(),
            description: "d".into(),
            version: "1.2.3".into(),
            payload: ProofPayload::dif(vec![SchemaEntry {
                schema_name: "Passport".into(),
                schema: "https://s".into(),
                names: vec!["a".into()],
            }]),
            verifier_role_ids: vec![4],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["templateId"], "kyc");
        assert_eq!(value["verifierRoleIds"], json!([4]));
        assert_eq!(value["payload"]["type"], "dif");
        assert_eq!(value["payload"]["data"][0]["schemaName"], "Passport");
    }

    #[test]
    fn user_decodes_wire_names_and_exposes_nested_role() {
        let user: User = serde_json::from_value(json!({
            "id": 9,
            "username": "ada lovelace",
            "email": "ada@example.org",
            "foundationID": "F-1",
            "verifierRole": {"id": 2, "role": "Auditor"},
            "statusId": 4
        }))
        .unwrap();
        assert_eq!(user.foundation_id, "F-1");
        assert_eq!(user.status(), UserStatus::Suspended);
        assert_eq!(user.field("verifierRole.role"), CellValue::Text("Auditor".into()));
        assert_eq!(user.field("statusId"), CellValue::Int(4));
        assert_eq!(user.field("userId"), CellValue::Empty);
    }

    #[test]
    fn user_payload_uses_backend_field_names() {
        let payload = UserPayload {
            username: "u".into(),
            foundation_id: "F".into(),
            email: "e@x.io".into(),
            verifier_role_id: 7,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"username": "u", "foundationID": "F", "email": "e@x.io", "verifierRoleId": 7}));
    }
}
