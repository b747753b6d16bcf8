//! SCIM User resource schema (RFC 7643).
//!
//! Users are virtual. The email is the id, the `externalId` and the
//! `userName` at once.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::scim_response::ScimAttributes;
use crate::error::{ScimError, ScimResult};

/// SCIM User resource (RFC 7643 Section 4.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
    pub schemas: Vec<String>,
    pub id: String,
    pub external_id: String,
    pub user_name: String,
    pub active: bool,
}

impl ScimUser {
    /// SCIM Core User schema URI.
    pub const SCHEMA: &'static str = "urn:ietf:params:scim:schemas:core:2.0:User";

    #[must_use]
    pub fn for_email(email: impl Into<String>, active: bool) -> Self {
        let email = email.into();
        Self {
            schemas: vec![Self::SCHEMA.to_string()],
            id: email.clone(),
            external_id: email.clone(),
            user_name: email,
            active,
        }
    }

    /// Required `userName` of a create request.
    pub fn user_name_from(attributes: &ScimAttributes) -> ScimResult<String> {
        match attributes.get("userName") {
            Some(Value::String(name)) if !name.is_empty() => Ok(name.clone()),
            _ => Err(ScimError::BadRequest("userName is required".to_string())),
        }
    }

    /// Optional `active` flag of a replace request. Absent means active.
    pub fn active_from(attributes: &ScimAttributes) -> ScimResult<bool> {
        match attributes.get("active") {
            None => Ok(true),
            Some(Value::Bool(active)) => Ok(*active),
            Some(other) => Err(ScimError::InvalidValue(format!(
                "active must be a boolean, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> ScimAttributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_for_email() {
        let user = ScimUser::for_email("alice@x.com", true);
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value["id"], "alice@x.com");
        assert_eq!(value["externalId"], "alice@x.com");
        assert_eq!(value["userName"], "alice@x.com");
        assert_eq!(value["active"], true);
    }

    #[test]
    fn test_user_name_from() {
        assert_eq!(
            ScimUser::user_name_from(&attrs(json!({ "userName": "a@x.com" }))).unwrap(),
            "a@x.com"
        );
        assert!(matches!(
            ScimUser::user_name_from(&attrs(json!({ "userName": 1 }))),
            Err(ScimError::BadRequest(_))
        ));
        assert!(ScimUser::user_name_from(&attrs(json!({}))).is_err());
    }

    #[test]
    fn test_active_from() {
        assert!(ScimUser::active_from(&attrs(json!({}))).unwrap());
        assert!(!ScimUser::active_from(&attrs(json!({ "active": false }))).unwrap());
        assert!(matches!(
            ScimUser::active_from(&attrs(json!({ "active": "false" }))),
            Err(ScimError::InvalidValue(_))
        ));
    }
}
