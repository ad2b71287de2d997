pub mod admin;
pub mod application;
pub mod hostel;
pub mod realtor;
pub mod student;

pub use admin::*;
pub use application::*;
pub use hostel::*;
pub use realtor::*;
pub use student::*;
