//! Display helper functions for elements

use shared::WallElement;

/// Get display name for an element
pub fn element_display_name(element: &WallElement) -> String {
    format!("{} ({})", element.kind.display_name(), short_id(&element.id))
}

/// Shorten an ID for display (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
