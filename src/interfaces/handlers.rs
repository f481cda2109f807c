pub mod accounts;
pub mod blog_posts;
pub mod comments;
pub mod cv;
pub mod home;
pub mod responses;
