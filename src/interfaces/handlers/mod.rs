pub mod blog_posts;
pub mod comments;
pub mod contact;
pub mod convert;
pub mod home;
pub mod media;
pub mod navigation;
pub mod profile;
pub mod projects;
pub mod resume;
pub mod system;
pub mod taxonomy;
pub mod users;

use std::collections::HashMap;

/// Pagination defaults shared by the list endpoints: 1-based `page`,
/// `per_page` capped at 100.
pub(crate) fn pagination(query: &HashMap<String, String>) -> (u32, u32) {
    let page = query
        .get("page")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);
    let per_page = query
        .get("per_page")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(10)
        .clamp(1, 100);
    (page, per_page)
}

pub(crate) fn hard_delete_flag(query: &HashMap<String, String>) -> bool {
    query.get("hard_delete").map_or(false, |v| v == "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_caps() {
        let empty = HashMap::new();
        assert_eq!(pagination(&empty), (1, 10));

        let mut query = HashMap::new();
        query.insert("page".to_string(), "0".to_string());
        query.insert("per_page".to_string(), "500".to_string());
        assert_eq!(pagination(&query), (1, 100));

        query.insert("page".to_string(), "3".to_string());
        query.insert("per_page".to_string(), "25".to_string());
        assert_eq!(pagination(&query), (3, 25));
    }

    #[test]
    fn hard_delete_requires_exact_true() {
        let mut query = HashMap::new();
        assert!(!hard_delete_flag(&query));
        query.insert("hard_delete".to_string(), "1".to_string());
        assert!(!hard_delete_flag(&query));
        query.insert("hard_delete".to_string(), "true".to_string());
        assert!(hard_delete_flag(&query));
    }
}
