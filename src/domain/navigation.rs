//! Admin view state machine.
//!
//! The URL path is the single source of truth: every view is derived from a
//! path by [`resolve_path`], and every transition yields the canonical next
//! view plus its side effects (navigation target, collection invalidation).
//! There is no second copy of the view state to fall out of sync with.

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminSection {
    Blog,
    Projects,
    Skills,
    Experience,
    Education,
    Users,
    Media,
    Messages,
    Profile,
}

impl AdminSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminSection::Blog => "blog",
            AdminSection::Projects => "projects",
            AdminSection::Skills => "skills",
            AdminSection::Experience => "experience",
            AdminSection::Education => "education",
            AdminSection::Users => "users",
            AdminSection::Media => "media",
            AdminSection::Messages => "messages",
            AdminSection::Profile => "profile",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "blog" => Some(AdminSection::Blog),
            "projects" => Some(AdminSection::Projects),
            "skills" => Some(AdminSection::Skills),
            "experience" => Some(AdminSection::Experience),
            "education" => Some(AdminSection::Education),
            "users" => Some(AdminSection::Users),
            "media" => Some(AdminSection::Media),
            "messages" => Some(AdminSection::Messages),
            "profile" => Some(AdminSection::Profile),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AdminView {
    List { section: AdminSection },
    FormNew { section: AdminSection },
    FormEdit { section: AdminSection, id: Uuid },
    Categories,
    Tags,
    Comments { post_id: Uuid },
    Account,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminEvent {
    Add,
    Edit(Uuid),
    SubmitSuccess,
    Cancel,
    OpenComments(Uuid),
    OpenCategories,
    OpenTags,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SideEffect {
    Navigate { path: String },
    InvalidateCollection { section: AdminSection },
}

/// Derive the admin view from a URL path. Returns None for paths outside the
/// admin surface.
pub fn resolve_path(path: &str) -> Option<AdminView> {
    let mut segments = path.trim_matches('/').split('/').filter(|s| !s.is_empty());

    if segments.next()? != "admin" {
        return None;
    }

    let second = segments.next();
    let second = match second {
        None => return None,
        Some("account") => return match segments.next() {
            None => Some(AdminView::Account),
            Some(_) => None,
        },
        Some(s) => s,
    };

    let section = AdminSection::from_segment(second)?;

    match (segments.next(), segments.next(), segments.next()) {
        (None, _, _) => Some(AdminView::List { section }),
        (Some("new"), None, _) => Some(AdminView::FormNew { section }),
        (Some("categories"), None, _) if section == AdminSection::Blog => Some(AdminView::Categories),
        (Some("tags"), None, _) if section == AdminSection::Blog => Some(AdminView::Tags),
        (Some(id), None, _) => {
            let id = Uuid::parse_str(id).ok()?;
            Some(AdminView::FormEdit { section, id })
        }
        (Some(id), Some("comments"), None) if section == AdminSection::Blog => {
            let post_id = Uuid::parse_str(id).ok()?;
            Some(AdminView::Comments { post_id })
        }
        _ => None,
    }
}

/// Canonical path for a view; `resolve_path(view_path(v)) == Some(v)`.
pub fn view_path(view: &AdminView) -> String {
    match view {
        AdminView::List { section } => format!("/admin/{}", section.as_str()),
        AdminView::FormNew { section } => format!("/admin/{}/new", section.as_str()),
        AdminView::FormEdit { section, id } => format!("/admin/{}/{}", section.as_str(), id),
        AdminView::Categories => "/admin/blog/categories".to_string(),
        AdminView::Tags => "/admin/blog/tags".to_string(),
        AdminView::Comments { post_id } => format!("/admin/blog/{}/comments", post_id),
        AdminView::Account => "/admin/account".to_string(),
    }
}

/// Apply an event to the current view.
///
/// Mirrors the editing workflow: add/edit navigate into a form, a successful
/// submit invalidates the section's collection and returns to the list,
/// cancel returns to the list discarding the draft, and opening comments is
/// a sub-view that does not navigate.
pub fn transition(view: &AdminView, event: &AdminEvent) -> (AdminView, Vec<SideEffect>) {
    let section = view_section(view);

    match (view, event) {
        (AdminView::List { section }, AdminEvent::Add) => {
            let next = AdminView::FormNew { section: *section };
            let nav = SideEffect::Navigate { path: view_path(&next) };
            (next, vec![nav])
        }
        (AdminView::List { section }, AdminEvent::Edit(id)) => {
            let next = AdminView::FormEdit { section: *section, id: *id };
            let nav = SideEffect::Navigate { path: view_path(&next) };
            (next, vec![nav])
        }
        (AdminView::FormNew { section } | AdminView::FormEdit { section, .. }, AdminEvent::SubmitSuccess) => {
            let next = AdminView::List { section: *section };
            (
                next,
                vec![
                    SideEffect::InvalidateCollection { section: *section },
                    SideEffect::Navigate { path: view_path(&next) },
                ],
            )
        }
        (AdminView::FormNew { section } | AdminView::FormEdit { section, .. }, AdminEvent::Cancel) => {
            let next = AdminView::List { section: *section };
            let nav = SideEffect::Navigate { path: view_path(&next) };
            (next, vec![nav])
        }
        // Sub-views open without navigation: the list keeps its URL while a
        // side panel shows the sub-resource.
        (AdminView::List { section: AdminSection::Blog }, AdminEvent::OpenComments(post_id)) => {
            (AdminView::Comments { post_id: *post_id }, vec![])
        }
        (AdminView::List { section: AdminSection::Blog }, AdminEvent::OpenCategories) => {
            (AdminView::Categories, vec![])
        }
        (AdminView::List { section: AdminSection::Blog }, AdminEvent::OpenTags) => {
            (AdminView::Tags, vec![])
        }
        (_, AdminEvent::Back) => {
            let next = AdminView::List { section };
            let nav = SideEffect::Navigate { path: view_path(&next) };
            (next, vec![nav])
        }
        // Unmodeled (view, event) pairs leave the view unchanged.
        _ => (view.clone(), vec![]),
    }
}

fn view_section(view: &AdminView) -> AdminSection {
    match view {
        AdminView::List { section }
        | AdminView::FormNew { section }
        | AdminView::FormEdit { section, .. } => *section,
        AdminView::Categories | AdminView::Tags | AdminView::Comments { .. } => AdminSection::Blog,
        AdminView::Account => AdminSection::Profile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_list_form_and_subviews() {
        assert_eq!(
            resolve_path("/admin/blog"),
            Some(AdminView::List { section: AdminSection::Blog })
        );
        assert_eq!(
            resolve_path("/admin/projects/new"),
            Some(AdminView::FormNew { section: AdminSection::Projects })
        );
        assert_eq!(resolve_path("/admin/blog/categories"), Some(AdminView::Categories));
        assert_eq!(resolve_path("/admin/blog/tags"), Some(AdminView::Tags));
        assert_eq!(resolve_path("/admin/account"), Some(AdminView::Account));

        let id = Uuid::new_v4();
        assert_eq!(
            resolve_path(&format!("/admin/blog/{id}")),
            Some(AdminView::FormEdit { section: AdminSection::Blog, id })
        );
        assert_eq!(
            resolve_path(&format!("/admin/blog/{id}/comments")),
            Some(AdminView::Comments { post_id: id })
        );
    }

    #[test]
    fn rejects_foreign_paths() {
        assert_eq!(resolve_path("/blog"), None);
        assert_eq!(resolve_path("/admin/unknown"), None);
        assert_eq!(resolve_path("/admin/blog/not-a-uuid"), None);
        assert_eq!(resolve_path("/admin/projects/categories"), None);
    }

    #[test]
    fn paths_round_trip() {
        let views = vec![
            AdminView::List { section: AdminSection::Media },
            AdminView::FormNew { section: AdminSection::Skills },
            AdminView::FormEdit { section: AdminSection::Projects, id: Uuid::new_v4() },
            AdminView::Categories,
            AdminView::Tags,
            AdminView::Comments { post_id: Uuid::new_v4() },
            AdminView::Account,
        ];
        for view in views {
            assert_eq!(resolve_path(&view_path(&view)), Some(view));
        }
    }

    #[test]
    fn submit_success_invalidates_and_returns_to_list() {
        let form = AdminView::FormEdit { section: AdminSection::Blog, id: Uuid::new_v4() };
        let (next, effects) = transition(&form, &AdminEvent::SubmitSuccess);

        assert_eq!(next, AdminView::List { section: AdminSection::Blog });
        assert_eq!(
            effects,
            vec![
                SideEffect::InvalidateCollection { section: AdminSection::Blog },
                SideEffect::Navigate { path: "/admin/blog".to_string() },
            ]
        );
    }

    #[test]
    fn cancel_discards_without_invalidation() {
        let form = AdminView::FormNew { section: AdminSection::Projects };
        let (next, effects) = transition(&form, &AdminEvent::Cancel);

        assert_eq!(next, AdminView::List { section: AdminSection::Projects });
        assert_eq!(effects, vec![SideEffect::Navigate { path: "/admin/projects".to_string() }]);
    }

    #[test]
    fn comments_subview_opens_without_navigation() {
        let list = AdminView::List { section: AdminSection::Blog };
        let post_id = Uuid::new_v4();
        let (next, effects) = transition(&list, &AdminEvent::OpenComments(post_id));

        assert_eq!(next, AdminView::Comments { post_id });
        assert!(effects.is_empty());
    }

    #[test]
    fn unmodeled_events_are_ignored() {
        let account = AdminView::Account;
        let (next, effects) = transition(&account, &AdminEvent::Add);
        assert_eq!(next, AdminView::Account);
        assert!(effects.is_empty());
    }
}
