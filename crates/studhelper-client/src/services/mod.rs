//! # Resource Services
//!
//! One service per API resource. Each method maps one domain operation to
//! one HTTP call and returns the parsed response body. Services borrow the
//! [`ApiClient`](crate::ApiClient) and are obtained from it:
//! `api.classes().list().await`.

mod auth;
mod chat;
mod classes;
mod documents;
mod usage;

pub use auth::AuthService;
pub use chat::ChatService;
pub use classes::ClassService;
pub use documents::DocumentService;
pub use usage::UsageService;
