pub mod comment;
pub mod cv;
pub mod education;
pub mod experience;
pub mod form;
pub mod interest;
pub mod post;
pub mod skill;
pub mod token;
pub mod user;
