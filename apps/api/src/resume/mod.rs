pub mod ats_check;
pub mod experience;
pub mod handlers;
pub mod patterns;
pub mod sections;
pub mod store;
pub mod upload;
