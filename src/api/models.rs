//! Wire models for the DualTab backend admin API.
//!
//! Field sets mirror the backend's JSON serialization. Timestamps are
//! carried as strings since the console only displays them.

use crate::ordering::Orderable;
use fake::{Dummy, Fake};
use serde::{Deserialize, Serialize};

/// Defines admin user data structure.
///
#[derive(Clone, Debug, Deserialize, Serialize, Dummy, PartialEq, Eq)]
pub struct AdminUser {
    pub id: u64,
    pub username: String,
}

/// Defines bookmark category data structure. Reorderable.
///
#[derive(Clone, Debug, Deserialize, Serialize, Dummy, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    pub sort_order: i64,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Defines search engine data structure. Reorderable.
///
/// The `url` field contains a `%s` placeholder for the query term.
#[derive(Clone, Debug, Deserialize, Serialize, Dummy, PartialEq, Eq)]
pub struct SearchEngine {
    pub id: u64,
    #[serde(default)]
    pub uuid: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon_url: String,
    pub sort_order: i64,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Defines bookmark icon data structure. Paginated, not reorderable.
///
#[derive(Clone, Debug, Deserialize, Serialize, Dummy, PartialEq, Eq)]
pub struct Icon {
    pub id: u64,
    #[serde(default)]
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub bg_color: String,
    #[serde(default)]
    pub mime_type: String,
    pub sort_order: i64,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Defines wallpaper data structure. Paginated, not reorderable.
///
#[derive(Clone, Debug, Deserialize, Serialize, Dummy, PartialEq, Eq)]
pub struct Wallpaper {
    pub id: u64,
    #[serde(default)]
    pub uuid: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub thumb_url: String,
    #[serde(default)]
    pub source: String,
    pub sort_order: i64,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Defines key/value system configuration data structure.
///
#[derive(Clone, Debug, Deserialize, Serialize, Dummy, PartialEq, Eq)]
pub struct SystemConfig {
    pub id: u64,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Describes one configuration key the backend understands.
///
#[derive(Clone, Debug, Deserialize, Serialize, Dummy, PartialEq, Eq)]
pub struct ConfigKeyInfo {
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example: String,
}

/// One page of a paginated collection.
///
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Page<T> {
    pub list: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

impl<T> Page<T> {
    /// Number of pages implied by `total` and `size`.
    ///
    pub fn page_count(&self) -> i64 {
        if self.size <= 0 {
            return 1;
        }
        ((self.total + self.size - 1) / self.size).max(1)
    }
}

/// Fields submitted when creating or updating a bookmark icon.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IconPayload {
    pub title: String,
    pub description: String,
    pub url: String,
    pub img_url: String,
    pub bg_color: String,
    pub category_ids: Vec<u64>,
    pub is_active: bool,
}

/// Fields submitted when creating or updating a wallpaper.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WallpaperPayload {
    pub title: String,
    pub url: String,
    pub thumb_url: String,
    pub source: String,
    pub is_active: bool,
}

impl Orderable for Category {
    fn id(&self) -> u64 {
        self.id
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }
}

impl Orderable for SearchEngine {
    fn id(&self) -> u64 {
        self.id
    }

    fn sort_order(&self) -> i64 {
        self.sort_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        let page = Page::<Icon> {
            list: vec![],
            total: 41,
            page: 1,
            size: 20,
        };
        assert_eq!(page.page_count(), 3);

        let page = Page::<Icon> {
            list: vec![],
            total: 0,
            page: 1,
            size: 20,
        };
        assert_eq!(page.page_count(), 1);
    }

    #[test]
    fn test_category_deserializes_with_missing_optionals() {
        let category: Category = serde_json::from_str(
            r#"{"id":3,"name":"Tools","sort_order":2,"is_active":true}"#,
        )
        .unwrap();
        assert_eq!(category.id, 3);
        assert_eq!(category.name_en, "");
        assert_eq!(category.sort_order(), 2);
    }
}
