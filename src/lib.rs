//! # Health Stats
//!
//! Client for the Health Stats REST API: sign up or log in, keep the session
//! token between runs, and manage personal health records.
//!
//! ## Modules
//!
//! - [`client`]: HTTP wrapper with bearer-token auth and normalized errors
//! - [`session`]: token store and the auth session state machine
//! - [`guard`]: route guard deciding what a session may see
//! - [`records`]: health record CRUD (remote or mock) and statistics
//! - [`app`]: application context resolving routes into pages
//! - [`views`]: text rendering for the terminal
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthstats::{App, Config, Route};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::new(Config::load_default())?;
//!
//!     // Validate any stored session token
//!     if !app.start().await.is_authenticated() {
//!         app.login("ada@example.com", "secret").await?;
//!     }
//!
//!     let page = app.open(Route::Dashboard).await?;
//!     println!("{}", healthstats::views::render_page(&page));
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod guard;
pub mod records;
pub mod session;
pub mod views;

#[cfg(test)]
mod test_support;

// Re-export top-level types for convenience
pub use app::{App, AppError, Page};

pub use client::{ApiClient, ClientError, ClientResult, Payload};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SessionConfig};

pub use guard::{guard, Route, RouteDecision};

pub use records::{
    summarize, HealthRecord, HealthRecordUpdate, MockRecords, NewHealthRecord, RecordStore,
    RecordSummary, RemoteRecords,
};

pub use session::{
    AuthError, AuthFailure, AuthResponse, AuthResult, AuthState, FileSessionStore,
    MemorySessionStore, SessionManager, SessionStore, StoreError, UserProfile,
};
