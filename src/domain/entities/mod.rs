pub mod option_fields;
pub mod content_status;
pub mod blog_post;
pub mod comment;
pub mod taxonomy;
pub mod project;
pub mod profile;
pub mod skill;
pub mod experience;
pub mod education;
pub mod contact;
pub mod user;
pub mod media;
