//! # StudHelper API Client
//!
//! HTTP gateway and resource services for the StudHelper REST API.
//!
//! The [`ApiClient`] is the gateway: it owns the base address, the request
//! timeout and the bearer token. Resource services ([`AuthService`],
//! [`ClassService`], [`ChatService`], [`DocumentService`], [`UsageService`])
//! borrow it and map one domain operation to one HTTP call each.

mod error;
mod gateway;
mod services;
mod types;

pub use error::{ApiError, ApiResult};
pub use gateway::{ApiClient, DEFAULT_TIMEOUT};
pub use services::{AuthService, ChatService, ClassService, DocumentService, UsageService};
pub use types::{
    CreateClassData, FirebaseLoginRequest, LoginRequest, RegisterRequest, TokenResponse,
    UploadFile, VideoRef,
};
