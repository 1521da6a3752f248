//! Application Context
//!
//! Wires configuration, session, and record store together and resolves
//! navigation requests into pages through the route guard.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::client::{ApiClient, ClientError};
use crate::config::Config;
use crate::guard::{guard, Route, RouteDecision};
use crate::records::{
    summarize, HealthRecord, HealthRecordUpdate, MockRecords, NewHealthRecord, RecordStore,
    RecordSummary, RemoteRecords,
};
use crate::session::{
    AuthError, AuthState, FileSessionStore, SessionManager, SessionStore, UserProfile,
};

/// Errors surfaced by the application layer
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to set up API client: {0}")]
    Setup(#[source] reqwest::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Records(#[from] ClientError),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A resolved view
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Loading,
    Redirect(Route),
    Dashboard {
        user: UserProfile,
        records: Vec<HealthRecord>,
    },
    Stats {
        user: UserProfile,
        summaries: Vec<RecordSummary>,
    },
    Profile(UserProfile),
    Login,
    Register,
}

/// Record store together with the user it was opened for
type OwnedRecords = (String, Arc<dyn RecordStore>);

/// Application context passed to the views
pub struct App {
    config: Config,
    session: SessionManager,
    records: Mutex<Option<OwnedRecords>>,
}

impl App {
    /// Build the app with a file-backed session store
    pub fn new(config: Config) -> Result<Self, AppError> {
        let store = Arc::new(FileSessionStore::new(PathBuf::from(
            &config.session.token_file,
        )));
        Self::with_store(config, store)
    }

    /// Build the app around an existing session store
    pub fn with_store(config: Config, store: Arc<dyn SessionStore>) -> Result<Self, AppError> {
        let client = ApiClient::new(&config.api, Arc::clone(&store)).map_err(AppError::Setup)?;
        let session = SessionManager::new(client, store);

        Ok(Self {
            config,
            session,
            records: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Run the startup session check
    pub async fn start(&self) -> AuthState {
        self.session.restore().await
    }

    /// Run the startup check unless the session is already resolved
    pub async fn ensure_started(&self) -> AuthState {
        let state = self.session.state().await;
        if state.is_resolved() {
            state
        } else {
            self.start().await
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AppError> {
        Ok(self.session.login(email, password).await?)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<UserProfile, AppError> {
        Ok(self.session.register(email, password, full_name).await?)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        Ok(self.session.logout().await?)
    }

    /// Resolve a navigation request into a page
    pub async fn open(&self, route: Route) -> Result<Page, AppError> {
        let state = self.session.state().await;

        let route = match guard(&state, route) {
            RouteDecision::Loading => return Ok(Page::Loading),
            RouteDecision::Redirect(target) => return Ok(Page::Redirect(target)),
            RouteDecision::Render(route) => route,
        };

        let page = match route {
            Route::Login => Page::Login,
            Route::Register => Page::Register,
            Route::Dashboard => {
                let user = Self::signed_in(&state)?;
                let records = self.list_records().await?;
                Page::Dashboard { user, records }
            }
            Route::Stats => {
                let user = Self::signed_in(&state)?;
                let records = self.list_records().await?;
                Page::Stats {
                    user,
                    summaries: summarize(&records),
                }
            }
            Route::Profile => Page::Profile(Self::signed_in(&state)?),
        };

        Ok(page)
    }

    /// Records of the signed-in user, newest first
    pub async fn list_records(&self) -> Result<Vec<HealthRecord>, AppError> {
        let mut records = self.records().await?.list().await?;
        records.sort_by(|a, b| {
            b.day()
                .cmp(&a.day())
                .then_with(|| a.record_type.cmp(&b.record_type))
        });
        Ok(records)
    }

    /// Create a record owned by the signed-in user
    pub async fn add_record(
        &self,
        date: &str,
        record_type: &str,
        value: f64,
        unit: &str,
        notes: Option<String>,
    ) -> Result<HealthRecord, AppError> {
        let user = self.require_user().await?;
        let mut record = NewHealthRecord::new(user.id, date, record_type, value, unit);
        record.notes = notes;

        Ok(self.records().await?.create(record).await?)
    }

    pub async fn update_record(
        &self,
        id: &str,
        update: HealthRecordUpdate,
    ) -> Result<HealthRecord, AppError> {
        Ok(self.records().await?.update(id, update).await?)
    }

    pub async fn delete_record(&self, id: &str) -> Result<(), AppError> {
        Ok(self.records().await?.delete(id).await?)
    }

    async fn require_user(&self) -> Result<UserProfile, AppError> {
        self.session
            .current_user()
            .await
            .ok_or(AppError::NotAuthenticated)
    }

    fn signed_in(state: &AuthState) -> Result<UserProfile, AppError> {
        state.user().cloned().ok_or(AppError::NotAuthenticated)
    }

    /// Record store for the signed-in user, opened on first use and
    /// reopened when a different user signs in
    async fn records(&self) -> Result<Arc<dyn RecordStore>, AppError> {
        let user = self.require_user().await?;
        let mut slot = self.records.lock().await;

        if let Some((owner, store)) = slot.as_ref() {
            if *owner == user.id {
                return Ok(Arc::clone(store));
            }
        }

        let store: Arc<dyn RecordStore> = if self.config.api.mock_data {
            Arc::new(MockRecords::seeded(&user.id))
        } else {
            Arc::new(RemoteRecords::new(self.session.client().clone()))
        };
        tracing::info!(source = store.name(), user_id = %user.id, "Record store ready");

        *slot = Some((user.id, Arc::clone(&store)));
        Ok(store)
    }
}
