//! Session authentication for the FoodHub back-office
//!
//! Provides cookie-backed sessions, the login gate for administrative
//! paths, per-request locale resolution, and axum extractors that work
//! with any domain state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod config;
mod context;
mod error;
mod extractors;
mod locale;
mod session;
mod types;

pub use backend::{AuthBackend, IssuedSession};
pub use config::{AuthConfig, SESSION_COOKIE};
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::{AuthUser, EffectiveLocale, SuperAdmin};
pub use locale::{content_language, resolve_locale};
pub use session::{
    clear_session_cookie, login_location, safe_return_to, session_cookie, session_token,
    DEFAULT_LANDING,
};
pub use types::{AuthEnterprise, AuthIdentity, AuthRole, EnterpriseRelation};
