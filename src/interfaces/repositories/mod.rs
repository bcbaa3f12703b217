pub mod blog_post;
pub mod comment;
pub mod contact;
pub mod media;
pub mod profile;
pub mod project;
pub mod resume;
pub mod sqlx_repo;
pub mod taxonomy;
pub mod user;
