//! Registration input and pipeline stages.

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Sign-up payload as decoded from the client.
///
/// Plaintext secrets are wiped from memory when the request is dropped.
/// Missing fields decode to their empty value so that policy checks, not the
/// decoder, decide which rule the payload violates.
#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Desired unique username
    #[cfg_attr(feature = "openapi", schema(example = "alice"))]
    #[serde(default)]
    pub username: String,
    /// Plaintext password
    #[cfg_attr(feature = "openapi", schema(example = "Str0ng!Pass"))]
    #[serde(default)]
    pub password: String,
    /// Must equal `password`
    #[cfg_attr(feature = "openapi", schema(example = "Str0ng!Pass"))]
    #[serde(default)]
    pub confirm_password: String,
    /// Unique email address
    #[cfg_attr(feature = "openapi", schema(example = "alice@example.com"))]
    #[serde(default)]
    pub email: String,
    /// Whether the terms of service were accepted
    #[serde(default)]
    pub terms_accepted: bool,
}

impl RegistrationRequest {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
        email: impl Into<String>,
        terms_accepted: bool,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            email: email.into(),
            terms_accepted,
        }
    }
}

// Don't expose plaintext secrets in debug output (security)
impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .field("email", &self.email)
            .field("terms_accepted", &self.terms_accepted)
            .finish()
    }
}

/// Stages a registration attempt passes through, in order.
///
/// An attempt only ever moves forward; any failure ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegistrationStage {
    Received,
    Validated,
    Hashed,
    Persisted,
    TokenIssued,
    SessionEstablished,
}

impl std::fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RegistrationStage::Received => "received",
            RegistrationStage::Validated => "validated",
            RegistrationStage::Hashed => "hashed",
            RegistrationStage::Persisted => "persisted",
            RegistrationStage::TokenIssued => "token_issued",
            RegistrationStage::SessionEstablished => "session_established",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_camel_case_payload() {
        let json = r#"{
            "username": "alice",
            "password": "Str0ng!Pass",
            "confirmPassword": "Str0ng!Pass",
            "email": "alice@example.com",
            "termsAccepted": true
        }"#;
        let request: RegistrationRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.username, "alice");
        assert_eq!(request.confirm_password, "Str0ng!Pass");
        assert!(request.terms_accepted);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let request: RegistrationRequest = serde_json::from_str(r#"{"username":"bob"}"#).unwrap();

        assert_eq!(request.username, "bob");
        assert!(request.password.is_empty());
        assert!(!request.terms_accepted);
    }

    #[test]
    fn test_empty_object_decodes_to_blank_request() {
        let request: RegistrationRequest = serde_json::from_str("{}").unwrap();

        assert!(request.username.is_empty());
        assert!(request.confirm_password.is_empty());
        assert!(request.email.is_empty());
        assert!(!request.terms_accepted);
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let result = serde_json::from_str::<RegistrationRequest>(r#"{"termsAccepted":"yes"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let request = RegistrationRequest::new("alice", "hunter2hunter2", "hunter2hunter2", "a@b.co", true);
        let debug = format!("{:?}", request);

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_zeroize_clears_secrets() {
        let mut request = RegistrationRequest::new("alice", "Str0ng!Pass", "Str0ng!Pass", "a@b.co", true);
        request.zeroize();

        assert!(request.password.is_empty());
        assert!(request.confirm_password.is_empty());
        assert!(!request.terms_accepted);
    }

    #[test]
    fn test_stages_only_move_forward() {
        assert!(RegistrationStage::Received < RegistrationStage::Validated);
        assert!(RegistrationStage::Persisted < RegistrationStage::TokenIssued);
        assert_eq!(RegistrationStage::TokenIssued.to_string(), "token_issued");
    }
}
