//! Workflow tests over the public domain API: a deep-linked editing
//! session, the slug rename latch, gallery reordering, and the merged
//! date rules for resume patches.

use chrono::NaiveDate;
use portfolio_cms::{
    cache::CollectionCache,
    entities::{
        experience::{UpdateWorkExperienceRequest, WorkExperience},
        option_fields::OptionField,
    },
    navigation::{resolve_path, transition, AdminEvent, AdminSection, AdminView, SideEffect},
    ordering::{assign_dense_order, move_item, translate_focus},
    slug::{derive_slug, resolve_slug_for_rename},
};
use uuid::Uuid;

#[test]
fn deep_linked_edit_session_invalidates_the_section_on_submit() {
    let cache = CollectionCache::new();
    cache.insert(AdminSection::Blog, "page=1", &vec!["cached post list"]);
    cache.insert(AdminSection::Projects, "page=1", &vec!["cached project list"]);

    // Restore the view from a bookmarked edit URL.
    let id = Uuid::new_v4();
    let view = resolve_path(&format!("/admin/blog/{id}")).unwrap();
    assert_eq!(view, AdminView::FormEdit { section: AdminSection::Blog, id });

    // A successful submit returns to the list and drops its cached pages.
    let (next, effects) = transition(&view, &AdminEvent::SubmitSuccess);
    assert_eq!(next, AdminView::List { section: AdminSection::Blog });

    for effect in &effects {
        if let SideEffect::InvalidateCollection { section } = effect {
            cache.invalidate_section(*section);
        }
    }

    assert!(cache.get(AdminSection::Blog, "page=1").is_none());
    assert!(cache.get(AdminSection::Projects, "page=1").is_some());
}

#[test]
fn cancelled_edit_leaves_cached_collections_alone() {
    let cache = CollectionCache::new();
    cache.insert(AdminSection::Skills, "page=1", &vec!["cached"]);

    let view = resolve_path("/admin/skills/new").unwrap();
    let (next, effects) = transition(&view, &AdminEvent::Cancel);

    assert_eq!(next, AdminView::List { section: AdminSection::Skills });
    assert!(effects
        .iter()
        .all(|e| !matches!(e, SideEffect::InvalidateCollection { .. })));
    assert!(cache.get(AdminSection::Skills, "page=1").is_some());
}

#[test]
fn slug_follows_renames_until_hand_edited() {
    let name = "Web Development";
    let slug = derive_slug(name);
    assert_eq!(slug, "web-development");

    // Rename while the slug still tracks the name: it follows.
    let slug = resolve_slug_for_rename(name, &slug, Some("Rust Notes"), None);
    assert_eq!(slug, "rust-notes");

    // Hand-edit the slug: the link is severed.
    let slug = resolve_slug_for_rename("Rust Notes", &slug, None, Some("notes"));
    assert_eq!(slug, "notes");

    // Later renames no longer touch it.
    let slug = resolve_slug_for_rename("Rust Notes", &slug, Some("Completely New"), None);
    assert_eq!(slug, "notes");
}

#[test]
fn gallery_drag_keeps_dense_order_and_tracks_focus() {
    #[derive(Debug, PartialEq)]
    struct Img {
        id: u32,
        order: i32,
    }

    let mut gallery = vec![
        Img { id: 10, order: 0 },
        Img { id: 11, order: 1 },
        Img { id: 12, order: 2 },
        Img { id: 13, order: 3 },
    ];

    // Editor has image 11 focused and drags image 10 to the end.
    let focus = 1;
    assert!(move_item(&mut gallery, 0, 3));
    let focus = translate_focus(focus, 0, 3);
    assign_dense_order(&mut gallery, |img, o| img.order = o);

    let ids: Vec<_> = gallery.iter().map(|img| img.id).collect();
    assert_eq!(ids, vec![11, 12, 13, 10]);
    let orders: Vec<_> = gallery.iter().map(|img| img.order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
    assert_eq!(gallery[focus].id, 11);
}

fn past_role() -> WorkExperience {
    WorkExperience {
        id: Uuid::new_v4(),
        company: "Acme".to_string(),
        position: "Engineer".to_string(),
        location: None,
        description: None,
        start_date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
        end_date: Some(NaiveDate::from_ymd_opt(2022, 6, 30).unwrap()),
        is_current: false,
        display_order: 0,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

#[test]
fn patch_cannot_clear_end_date_of_a_past_role() {
    let patch = UpdateWorkExperienceRequest {
        end_date: OptionField::SetToNull,
        ..Default::default()
    };
    assert!(patch.validate_against(&past_role()).is_err());
}

#[test]
fn patch_clearing_end_date_is_valid_once_marked_current() {
    let patch = UpdateWorkExperienceRequest {
        end_date: OptionField::SetToNull,
        is_current: OptionField::SetToValue(true),
        ..Default::default()
    };
    assert!(patch.validate_against(&past_role()).is_ok());
}

#[test]
fn patch_sees_merged_dates_not_the_sparse_patch() {
    // Moving the start date past the stored end date must be rejected even
    // though the patch itself touches only one field.
    let patch = UpdateWorkExperienceRequest {
        start_date: OptionField::SetToValue(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()),
        ..Default::default()
    };
    assert!(patch.validate_against(&past_role()).is_err());
}
