//! Traits shared by the record types, plus identifier generation.

use uuid::Uuid;

/// Records addressed by an opaque string identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Records with a display name that importers match against free text.
pub trait NamedEntity {
    fn name(&self) -> &str;

    /// Case-insensitive equality with `candidate`, ignoring surrounding whitespace.
    fn matches_name(&self, candidate: &str) -> bool {
        self.name().trim().to_lowercase() == candidate.trim().to_lowercase()
    }
}

/// One-line summary used in CLI listings.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Generates a fresh record identifier (UUID v4, hyphenated).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn find_by_id<'a, T: Identifiable>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}
