//! Authentication
//!
//! Registration, OAuth2 password-grant login, and the `AuthUser` extractor
//! that guards every journal, goal and insight route.

pub mod extract;
pub mod handler;
pub mod jwt;
pub mod password;
pub mod store;
pub mod types;

pub use extract::AuthUser;
pub use handler::{auth_router, AuthState};
pub use jwt::TokenIssuer;
pub use store::UserStore;
pub use types::User;
