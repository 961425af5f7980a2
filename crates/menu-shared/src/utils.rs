//! Utility functions

use crate::constants::MENU_ITEMS_STORAGE_ROOT;

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let visible = if local.chars().count() <= 2 { 1 } else { 2 };
        let shown: String = local.chars().take(visible).collect();
        format!("{}***{}", shown, domain)
    } else {
        "***".to_string()
    }
}

/// Storage key of an item's image: `menuItems/{id}/{filename}`.
pub fn image_storage_path(item_id: &str, filename: &str) -> String {
    format!("{}/{}/{}", MENU_ITEMS_STORAGE_ROOT, item_id, filename)
}

/// Percentage in `[0, 100]`; an empty transfer counts as complete.
pub fn percent_of(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    ((done.min(total) as f64 / total as f64) * 100.0).clamp(0.0, 100.0)
}
