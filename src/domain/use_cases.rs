pub mod auth;
pub mod blog;
pub mod cv;
pub mod extractors;
