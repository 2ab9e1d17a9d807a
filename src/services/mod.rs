pub mod crud_service;
pub mod user_service;

pub use crud_service::CrudService;
pub use user_service::{UserDetails, UserService, UserServiceError};
