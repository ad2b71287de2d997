pub mod admin;
pub mod application;
pub mod base;
pub mod hostel;
pub mod realtor;
pub mod student;

pub use base::BaseDao;
