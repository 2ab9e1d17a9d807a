pub mod auth;
pub mod response;

pub use auth::{authentication_gate, require_authentication, AuthContext, Principal};
pub use response::{ApiResponse, ApiResult};
