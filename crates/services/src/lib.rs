pub mod auth;
pub mod dao;
pub mod lifecycle;

pub use auth::AuthService;
pub use dao::*;
pub use lifecycle::RealtorLifecycle;
