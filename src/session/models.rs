//! Authentication wire types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::AuthFailure;
use crate::client::Payload;

/// Client-side copy of the signed-in user's identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: String,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: String,
    pub last_name: String,
}

impl<'a> RegisterRequest<'a> {
    pub fn new(email: &'a str, password: &'a str, full_name: &str) -> Self {
        let (first_name, last_name) = split_full_name(full_name);
        Self {
            email,
            password,
            first_name,
            last_name,
        }
    }
}

/// Split a full name into its first token and the rest.
///
/// A single-word name yields an empty last name.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, rest)
}

/// A validated `{token, user}` response from login or registration
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

impl AuthResponse {
    /// Validate the canonical response shape. Both fields must be present.
    pub fn from_payload(payload: Payload) -> Result<Self, AuthFailure> {
        let body = payload
            .into_value()
            .ok_or_else(|| AuthFailure::InvalidAuthResponse("empty response body".to_string()))?;

        let token = match body.get("token") {
            Some(Value::String(token)) if !token.trim().is_empty() => token.clone(),
            Some(_) => {
                return Err(AuthFailure::InvalidAuthResponse(
                    "token is not a non-empty string".to_string(),
                ))
            }
            None => {
                return Err(AuthFailure::InvalidAuthResponse(
                    "missing token".to_string(),
                ))
            }
        };

        let user = match body.get("user") {
            Some(user @ Value::Object(_)) => serde_json::from_value(user.clone()).map_err(|e| {
                AuthFailure::InvalidAuthResponse(format!("invalid user profile: {}", e))
            })?,
            Some(_) => {
                return Err(AuthFailure::InvalidAuthResponse(
                    "user is not an object".to_string(),
                ))
            }
            None => {
                return Err(AuthFailure::InvalidAuthResponse(
                    "missing user".to_string(),
                ))
            }
        };

        Ok(Self { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_json() -> Value {
        json!({
            "id": "1",
            "email": "a@b.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "role": "user"
        })
    }

    #[test]
    fn test_split_full_name() {
        assert_eq!(
            split_full_name("Ada Lovelace"),
            ("Ada".to_string(), "Lovelace".to_string())
        );
        assert_eq!(
            split_full_name("Madonna"),
            ("Madonna".to_string(), String::new())
        );
        assert_eq!(
            split_full_name("  Juan  Carlos de la Vega "),
            ("Juan".to_string(), "Carlos de la Vega".to_string())
        );
        assert_eq!(split_full_name(""), (String::new(), String::new()));
    }

    #[test]
    fn test_register_request_wire_format() {
        let request = RegisterRequest::new("a@b.com", "pw", "Ada Lovelace");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "email": "a@b.com",
                "password": "pw",
                "firstName": "Ada",
                "lastName": "Lovelace"
            })
        );
    }

    #[test]
    fn test_valid_auth_response() {
        let payload = Payload::Json(json!({"token": "t1", "user": user_json()}));
        let response = AuthResponse::from_payload(payload).unwrap();

        assert_eq!(response.token, "t1");
        assert_eq!(response.user.id, "1");
        assert_eq!(response.user.first_name, "Ada");
        assert_eq!(response.user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_rejects_missing_fields() {
        let cases = [
            Payload::NoContent,
            Payload::Json(json!({"user": user_json()})),
            Payload::Json(json!({"token": "", "user": user_json()})),
            Payload::Json(json!({"token": 42, "user": user_json()})),
            Payload::Json(json!({"token": "t1"})),
            Payload::Json(json!({"token": "t1", "user": null})),
            Payload::Json(json!({"token": "t1", "user": {"email": "a@b.com"}})),
            Payload::Json(json!({"data": {"token": "t1", "user": user_json()}})),
        ];

        for payload in cases {
            let result = AuthResponse::from_payload(payload.clone());
            assert!(
                matches!(result, Err(AuthFailure::InvalidAuthResponse(_))),
                "accepted {payload:?}"
            );
        }
    }

    #[test]
    fn test_profile_optional_fields_default() {
        let user: UserProfile =
            serde_json::from_value(json!({"id": "7", "email": "x@y.z"})).unwrap();
        assert_eq!(user.first_name, "");
        assert_eq!(user.role, "");
        assert_eq!(user.full_name(), "");
    }
}
