pub mod entities;
pub mod use_cases;
pub mod slug;
pub mod ordering;
pub mod html_md;
pub mod observable;
pub mod navigation;
pub mod validation;
