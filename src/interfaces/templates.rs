pub mod accounts;
pub mod blog;
pub mod cv;
pub mod errors;
pub mod forms;
pub mod home;
pub mod layout;
