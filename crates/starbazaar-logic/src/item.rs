//! Item-key helpers.
//!
//! Items are identified by structured strings: `Category.Name` or
//! `Category.Modifier Name` (e.g. `Food.Wheat`, `Ore.Refined Iron`).
//! The economy treats the key as opaque except for the category
//! projection, which groups items for production and popularity.

/// Category portion of an item key (`"Food.Wheat"` → `"Food"`).
///
/// A key with no separator is its own category.
pub fn category(item: &str) -> &str {
    item.split('.').next().unwrap_or(item)
}

/// Display name portion of an item key (`"Food.Wheat"` → `"Wheat"`).
pub fn name(item: &str) -> &str {
    match item.split_once('.') {
        Some((_, rest)) => rest,
        None => item,
    }
}

/// Compose an item key from a category, an optional modifier, and a name.
pub fn compose(category: &str, modifier: Option<&str>, name: &str) -> String {
    match modifier {
        Some(m) => format!("{}.{} {}", category, m, name),
        None => format!("{}.{}", category, name),
    }
}

/// Whether an item is a warehouse deed marker rather than tradeable
/// goods. Deeds grant access to an outpost warehouse and are exempt
/// from production-stock adjustments during clearing.
pub fn is_warehouse_deed(item: &str) -> bool {
    category(item) == "Other" && name(item).contains("Warehouse")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_projection() {
        assert_eq!(category("Food.Wheat"), "Food");
        assert_eq!(category("Ore.Refined Iron"), "Ore");
        assert_eq!(category("Scrap"), "Scrap");
    }

    #[test]
    fn test_name_projection() {
        assert_eq!(name("Food.Wheat"), "Wheat");
        assert_eq!(name("Ore.Refined Iron"), "Refined Iron");
        assert_eq!(name("Scrap"), "Scrap");
    }

    #[test]
    fn test_compose() {
        assert_eq!(compose("Food", None, "Wheat"), "Food.Wheat");
        assert_eq!(compose("Ore", Some("Refined"), "Iron"), "Ore.Refined Iron");
    }

    #[test]
    fn test_warehouse_deed_detection() {
        assert!(is_warehouse_deed("Other.Halcyon Warehouse 1"));
        assert!(!is_warehouse_deed("Other.Scrap"));
        assert!(!is_warehouse_deed("Food.Warehouse")); // wrong category
    }
}
