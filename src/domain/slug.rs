//! Slug derivation and the rename latch.
//!
//! Slugs auto-follow their source name only while the stored slug still
//! equals what derivation would produce for the stored name. The moment a
//! caller supplies a slug of their own the link is severed for good: later
//! renames no longer touch it.

use slug::slugify;

/// Derive a URL slug: lowercase `[a-z0-9-]`, no edge hyphens, no hyphen runs.
pub fn derive_slug(input: &str) -> String {
    slugify(input)
}

/// True while the stored slug is still the derived form of the stored name.
pub fn slug_tracks_name(current_name: &str, current_slug: &str) -> bool {
    derive_slug(current_name) == current_slug
}

/// Resolve the slug to persist when an entity is renamed or its slug is
/// edited.
///
/// - An explicit non-empty `requested_slug` always wins (and pins the slug).
/// - Otherwise, a new name regenerates the slug only while the current slug
///   still tracks the current name.
/// - Otherwise the current slug is kept unchanged.
pub fn resolve_slug_for_rename(
    current_name: &str,
    current_slug: &str,
    new_name: Option<&str>,
    requested_slug: Option<&str>,
) -> String {
    if let Some(slug) = requested_slug {
        let trimmed = slug.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    match new_name {
        Some(name) if slug_tracks_name(current_name, current_slug) => derive_slug(name),
        _ => current_slug.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_clean_slug_from_noisy_name() {
        assert_eq!(derive_slug("Web Development!!"), "web-development");
    }

    #[test]
    fn derived_slugs_are_well_formed() {
        for name in [
            "  Leading and trailing  ",
            "Ünïcodé — marks",
            "a+b=c",
            "MANY   SPACES",
            "hy--phens---everywhere",
        ] {
            let slug = derive_slug(name);
            assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'), "{slug}");
            assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{slug}");
            assert!(!slug.contains("--"), "{slug}");
        }
    }

    #[test]
    fn rename_regenerates_while_tracking() {
        let resolved = resolve_slug_for_rename("Web Development", "web-development", Some("Rust Notes"), None);
        assert_eq!(resolved, "rust-notes");
    }

    #[test]
    fn pinned_slug_survives_renames() {
        // Slug was hand-edited away from the derived form; renames must not touch it.
        let resolved = resolve_slug_for_rename("Web Development", "webdev", Some("Rust Notes"), None);
        assert_eq!(resolved, "webdev");

        let again = resolve_slug_for_rename("Rust Notes", "webdev", Some("Другое имя"), None);
        assert_eq!(again, "webdev");
    }

    #[test]
    fn explicit_slug_always_wins() {
        let resolved = resolve_slug_for_rename("Web Development", "web-development", Some("Rust Notes"), Some("custom"));
        assert_eq!(resolved, "custom");
    }

    #[test]
    fn no_rename_keeps_current_slug() {
        let resolved = resolve_slug_for_rename("Web Development", "web-development", None, None);
        assert_eq!(resolved, "web-development");
    }
}
