//! Authentication Session
//!
//! Token persistence and the session state machine.
//!
//! ## Architecture
//!
//! - **SessionStore**: persists the opaque token (file or memory)
//! - **SessionManager**: startup restore, login, register, logout
//! - **AuthState**: `Unknown`, `Authenticated(profile)`, `Unauthenticated`

mod error;
mod manager;
mod models;
mod store;

pub use error::{AuthError, AuthFailure, AuthResult};
pub use manager::{AuthState, SessionManager};
pub use models::{split_full_name, AuthResponse, UserProfile};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
