pub mod comment;
pub mod cv;
pub mod memory;
pub mod post;
pub mod sqlx_repo;
pub mod token;
pub mod user;
