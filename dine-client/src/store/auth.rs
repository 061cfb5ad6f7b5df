//! Auth session store (phone + OTP login)

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
use crate::gateway::MenuGateway;
use crate::storage::{AUTH_KEY, Storage, TOKEN_KEY};

/// Shown when the backend refuses to send a code
pub const SEND_OTP_FAILED: &str = "SMS send failed, try again";
/// Shown when the backend rejects a code
pub const VERIFY_OTP_FAILED: &str = "Invalid code, try again";

/// Result of a successful OTP verification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub phone: Option<String>,
    pub is_authenticated: bool,
}

#[derive(Debug, Default)]
struct AuthState {
    session: AuthSession,
    is_loading: bool,
    error: Option<String>,
}

/// Persisted auth session.
///
/// The token is kept twice: inside the `auth-storage` snapshot and under the
/// raw `token` key that the HTTP gateway reads on every request. The gateway
/// removes both on a 401, so the session only counts as authenticated while
/// the raw token is still present.
#[derive(Debug)]
pub struct AuthStore {
    storage: Storage,
    state: Mutex<AuthState>,
}

impl AuthStore {
    pub fn rehydrate(storage: Storage) -> Self {
        let mut session: AuthSession = storage.load_or_default(AUTH_KEY);
        if session.is_authenticated && !token_present(&storage) {
            tracing::debug!("Auth snapshot without a token, starting logged out");
            session = AuthSession::default();
        }
        Self {
            storage,
            state: Mutex::new(AuthState {
                session,
                ..AuthState::default()
            }),
        }
    }

    pub fn session(&self) -> AuthSession {
        self.state.lock().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().session.is_authenticated && token_present(&self.storage)
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn clear_error(&self) {
        self.state.lock().error = None;
    }

    fn begin(&self) {
        let mut state = self.state.lock();
        state.is_loading = true;
        state.error = None;
    }

    fn finish(&self, error: Option<&str>) {
        let mut state = self.state.lock();
        state.is_loading = false;
        state.error = error.map(str::to_string);
    }

    /// Ask the backend to text a code to `phone` (E.164)
    pub async fn send_otp(&self, gateway: &dyn MenuGateway, phone: &str) -> ClientResult<()> {
        self.begin();
        match gateway.send_otp(phone).await {
            Ok(()) => {
                tracing::info!("OTP sent");
                self.finish(None);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "OTP send failed");
                self.finish(Some(SEND_OTP_FAILED));
                Err(e)
            }
        }
    }

    /// Verify `code` and persist the resulting session
    pub async fn verify_otp(
        &self,
        gateway: &dyn MenuGateway,
        phone: &str,
        code: &str,
    ) -> ClientResult<()> {
        self.begin();
        let response = match gateway.verify_otp(phone, code).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "OTP verification failed");
                self.finish(Some(VERIFY_OTP_FAILED));
                return Err(e);
            }
        };

        let session = AuthSession {
            token: Some(response.token.clone()),
            user_id: Some(response.user_id),
            phone: Some(response.phone),
            is_authenticated: true,
        };
        if let Err(e) = self.storage.set_raw(TOKEN_KEY, &response.token) {
            tracing::warn!(error = %e, "Failed to persist token");
        }
        if let Err(e) = self.storage.save(AUTH_KEY, &session) {
            tracing::warn!(error = %e, "Failed to persist auth session");
        }

        tracing::info!(user_id = ?session.user_id, "Diner authenticated");
        {
            let mut state = self.state.lock();
            state.session = session;
            state.is_loading = false;
            state.error = None;
        }
        Ok(())
    }

    /// Forget the session and both persisted copies
    pub fn logout(&self) {
        {
            let mut state = self.state.lock();
            state.session = AuthSession::default();
            state.error = None;
        }
        for key in [TOKEN_KEY, AUTH_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to remove auth state");
            }
        }
        tracing::debug!("Logged out");
    }
}

fn token_present(storage: &Storage) -> bool {
    matches!(storage.get_raw(TOKEN_KEY), Ok(Some(token)) if !token.trim().is_empty())
}
