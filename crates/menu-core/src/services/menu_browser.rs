//! Read-only views over a full menu listing

use serde::Serialize;

use crate::domain::{CategoryCatalog, CategoryFilter, MenuItem};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<MenuItem>,
}

pub struct MenuBrowser;

impl MenuBrowser {
    pub fn filter(items: &[MenuItem], filter: &CategoryFilter) -> Vec<MenuItem> {
        items
            .iter()
            .filter(|item| filter.matches(&item.category))
            .cloned()
            .collect()
    }

    /// Groups in catalog order, then categories only found in stored data
    /// in first-seen order. Empty groups are left out.
    pub fn group_by_category(items: &[MenuItem], catalog: &CategoryCatalog) -> Vec<CategoryGroup> {
        let mut groups: Vec<CategoryGroup> = catalog
            .iter()
            .map(|label| CategoryGroup {
                category: label.to_string(),
                items: Vec::new(),
            })
            .collect();

        for item in items {
            match groups.iter_mut().find(|g| g.category == item.category) {
                Some(group) => group.items.push(item.clone()),
                None => groups.push(CategoryGroup {
                    category: item.category.clone(),
                    items: vec![item.clone()],
                }),
            }
        }

        groups.retain(|g| !g.items.is_empty());
        groups
    }

    /// Distinct categories in first-seen order.
    pub fn categories_present(items: &[MenuItem]) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for item in items {
            if !seen.iter().any(|c| c == &item.category) {
                seen.push(item.category.clone());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MenuItemFields;
    use chrono::Utc;

    fn item(id: &str, category: &str) -> MenuItem {
        MenuItem::new(
            id.to_string(),
            MenuItemFields::new(format!("Dish {}", id), "100", category),
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_filter() {
        let items = vec![item("1", "Pizza"), item("2", "Burgers"), item("3", "Pizza")];
        let pizza = MenuBrowser::filter(&items, &CategoryFilter::Only("Pizza".into()));
        assert_eq!(pizza.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["1", "3"]);
        assert_eq!(MenuBrowser::filter(&items, &CategoryFilter::All).len(), 3);
        assert!(MenuBrowser::filter(&items, &CategoryFilter::Only("Salads".into())).is_empty());
    }

    #[test]
    fn test_group_by_category_follows_catalog_order() {
        let catalog = CategoryCatalog::new(["Breakfast", "Burgers", "Pizza"]).unwrap();
        let items = vec![
            item("1", "Pizza"),
            item("2", "Juices & Hot Drinks"),
            item("3", "Breakfast"),
            item("4", "Pizza"),
        ];

        let groups = MenuBrowser::group_by_category(&items, &catalog);
        let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, vec!["Breakfast", "Pizza", "Juices & Hot Drinks"]);
        assert_eq!(groups[1].items.len(), 2);
    }

    #[test]
    fn test_categories_present() {
        let items = vec![item("1", "Pizza"), item("2", "Salads"), item("3", "Pizza")];
        assert_eq!(MenuBrowser::categories_present(&items), vec!["Pizza", "Salads"]);
        assert!(MenuBrowser::categories_present(&[]).is_empty());
    }
}
