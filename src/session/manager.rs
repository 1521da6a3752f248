//! Auth Session Manager
//!
//! Owns the in-memory session state and keeps it consistent with the
//! persisted token: a profile is only ever held alongside a stored token,
//! and a token that fails validation is cleared together with the profile.
//!
//! ```text
//!            restore (no token / invalid token)
//!   Unknown ─────────────────────────────────────▶ Unauthenticated
//!      │                                               ▲     │
//!      │ restore (profile fetched)              logout │     │ login / register
//!      ▼                                               │     ▼
//!   Authenticated(profile) ◀───────────────────────────┴─────┘
//! ```

use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::{AuthError, AuthFailure, AuthResult};
use super::models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use super::store::SessionStore;
use crate::client::{ApiClient, ClientResult};

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const CURRENT_USER_PATH: &str = "/auth/me";

/// Session state as seen by the views
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// The startup check has not completed
    #[default]
    Unknown,
    Authenticated(UserProfile),
    Unauthenticated,
}

impl AuthState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, AuthState::Unknown)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Session context shared with the views
pub struct SessionManager {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    state: RwLock<AuthState>,
}

impl SessionManager {
    /// Create a manager in the `Unknown` state. Call [`restore`](Self::restore)
    /// to resolve it.
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            store,
            state: RwLock::new(AuthState::Unknown),
        }
    }

    /// Create a manager and run the startup check
    pub async fn start(client: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        let manager = Self::new(client, store);
        manager.restore().await;
        manager
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.state.read().await.user().cloned()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Validate the persisted token, if any, and resolve the session.
    ///
    /// Failures are not returned: an unusable token is cleared and the
    /// session resolves to `Unauthenticated`.
    pub async fn restore(&self) -> AuthState {
        let token = match self.store.read() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Could not read session token: {}", e);
                self.discard_token();
                None
            }
        };

        if token.is_none() {
            tracing::debug!("No stored session token");
            return self.set_state(AuthState::Unauthenticated).await;
        }

        match self.fetch_current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.set_state(AuthState::Authenticated(user)).await
            }
            Err(e) => {
                tracing::info!("Stored session is no longer valid: {}", e);
                let mut state = self.state.write().await;
                self.discard_token();
                *state = AuthState::Unauthenticated;
                (*state).clone()
            }
        }
    }

    /// Log in with email and password
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<UserProfile> {
        tracing::debug!(email = %email, "Attempting login");

        let result = match self
            .client
            .post(LOGIN_PATH, &LoginRequest { email, password })
            .await
        {
            Ok(payload) => self.establish(AuthResponse::from_payload(payload)).await,
            Err(e) => Err(AuthFailure::Client(e)),
        };

        result.map_err(|cause| {
            tracing::warn!(email = %email, "Login failed: {}", cause);
            AuthError::login(cause)
        })
    }

    /// Register a new account and sign in with the returned session
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> AuthResult<UserProfile> {
        tracing::debug!(email = %email, "Attempting registration");

        let request = RegisterRequest::new(email, password, full_name);
        let result = match self.client.post(REGISTER_PATH, &request).await {
            Ok(payload) => self.establish(AuthResponse::from_payload(payload)).await,
            Err(e) => Err(AuthFailure::Client(e)),
        };

        result.map_err(|cause| {
            tracing::warn!(email = %email, "Registration failed: {}", cause);
            AuthError::registration(cause)
        })
    }

    /// Clear the stored token and end the session, whatever the prior state
    pub async fn logout(&self) -> AuthResult<()> {
        let mut state = self.state.write().await;
        *state = AuthState::Unauthenticated;
        tracing::info!("Logged out");
        self.store.clear().map_err(AuthError::Logout)
    }

    async fn fetch_current_user(&self) -> ClientResult<UserProfile> {
        self.client.get(CURRENT_USER_PATH).await?.decode()
    }

    /// Persist the token and adopt the profile as one step
    async fn establish(
        &self,
        response: Result<AuthResponse, AuthFailure>,
    ) -> Result<UserProfile, AuthFailure> {
        let AuthResponse { token, user } = response?;

        let mut state = self.state.write().await;
        self.store.save(&token)?;
        *state = AuthState::Authenticated(user.clone());

        tracing::info!(user_id = %user.id, "Session established");
        Ok(user)
    }

    async fn set_state(&self, next: AuthState) -> AuthState {
        let mut state = self.state.write().await;
        *state = next;
        (*state).clone()
    }

    fn discard_token(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Could not clear session token: {}", e);
        }
    }
}
