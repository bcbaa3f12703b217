pub mod blog;
pub mod comment;
pub mod contact;
pub mod media;
pub mod profile;
pub mod project;
pub mod resume;
pub mod taxonomy;
pub mod user;
