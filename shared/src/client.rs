//! Auth DTOs and error bodies shared between the backend and the client

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// `POST /auth/send-otp`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpRequest {
    pub phone: String,
}

/// `POST /auth/verify-otp`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub code: String,
}

/// Successful OTP verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub phone: String,
}

// =============================================================================
// Error body
// =============================================================================

/// Error payload returned by the backend on non-2xx responses.
///
/// The backend reports `{"error": "..."}`; some endpoints use `message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract the server-provided message from a raw response body.
    ///
    /// Returns `None` when the body is not a JSON error object or carries
    /// no non-blank message.
    pub fn parse_message(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed.into_message()
    }

    pub fn into_message(self) -> Option<String> {
        self.error
            .into_iter()
            .chain(self.message)
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_prefers_error_field() {
        let body = r#"{"error":"Table is closed","message":"ignored"}"#;
        assert_eq!(ErrorBody::parse_message(body).as_deref(), Some("Table is closed"));
    }

    #[test]
    fn test_error_body_falls_back_to_message() {
        let body = r#"{"error":"  ","message":"Product unavailable"}"#;
        assert_eq!(
            ErrorBody::parse_message(body).as_deref(),
            Some("Product unavailable")
        );
    }

    #[test]
    fn test_error_body_rejects_non_json() {
        assert_eq!(ErrorBody::parse_message("<html>Bad Gateway</html>"), None);
        assert_eq!(ErrorBody::parse_message(""), None);
        assert_eq!(ErrorBody::parse_message("{}"), None);
    }

    #[test]
    fn test_auth_response_camel_case() {
        let json = r#"{"token":"t-1","userId":"u-1","phone":"+992935551234"}"#;
        let auth: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(auth.user_id, "u-1");
        assert_eq!(auth.phone, "+992935551234");
    }
}
