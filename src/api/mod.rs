mod client;
mod error;
mod models;

pub use error::ApiError;
pub use models::*;

use crate::ordering::OrderStore;
use async_trait::async_trait;
use client::Client;
use log::*;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

/// Unwraps `{ "list": [...] }` payloads returned by full-list endpoints.
///
#[derive(Deserialize)]
struct ListData<T> {
    list: Vec<T>,
}

/// Unwraps the `{ "keys": [...] }` payload of the config-keys endpoint.
///
#[derive(Deserialize)]
struct KeysData {
    keys: Vec<ConfigKeyInfo>,
}

/// Payload returned by a successful login.
///
#[derive(Deserialize)]
struct LoginData {
    token: String,
    user: AdminUser,
}

/// Responsible for asynchronous interaction with the DualTab admin API
/// including transformation of response data into explicitly-defined
/// types.
///
#[derive(Clone)]
pub struct DualTab {
    client: Client,
}

impl DualTab {
    /// Returns a new instance for the given API base URL and optional
    /// session token.
    ///
    pub fn new(api_url: &str, access_token: Option<&str>) -> DualTab {
        debug!("Initializing DualTab client for {}...", api_url);
        DualTab {
            client: Client::new(api_url, access_token),
        }
    }

    /// Replace the session token attached to subsequent requests.
    ///
    pub fn set_access_token(&mut self, token: Option<String>) {
        self.client.set_access_token(token);
    }

    /// Exchange admin credentials for a session token and user details.
    ///
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, AdminUser), ApiError> {
        debug!("Requesting session token for user '{}'...", username);

        let data: LoginData = self
            .client
            .request(
                Method::POST,
                "/admin/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await?;

        Ok((data.token, data.user))
    }

    /// Returns the currently authenticated admin user.
    ///
    pub async fn me(&self) -> Result<AdminUser, ApiError> {
        debug!("Requesting authenticated user details...");
        self.client
            .request(Method::GET, "/admin/auth/me", None, None)
            .await
    }

    /// Change the authenticated admin's password.
    ///
    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<(), ApiError> {
        debug!("Requesting password change...");
        self.client
            .request_empty(
                Method::PUT,
                "/admin/auth/password",
                None,
                Some(json!({
                    "old_password": old_password,
                    "new_password": new_password,
                })),
            )
            .await
    }

    /// Returns all bookmark categories in server order.
    ///
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        debug!("Requesting category list...");
        let data: ListData<Category> = self
            .client
            .request(Method::GET, "/admin/categories", None, None)
            .await?;
        debug!("Retrieved {} categories", data.list.len());
        Ok(data.list)
    }

    /// Create a category. New categories are appended, so callers pass
    /// the current collection length as `sort_order`.
    ///
    pub async fn create_category(
        &self,
        name: &str,
        name_en: &str,
        is_active: bool,
        sort_order: i64,
    ) -> Result<Category, ApiError> {
        debug!("Creating category '{}'...", name);
        self.client
            .request(
                Method::POST,
                "/admin/categories",
                None,
                Some(json!({
                    "name": name,
                    "name_en": name_en,
                    "is_active": is_active,
                    "sort_order": sort_order,
                })),
            )
            .await
    }

    /// Update a category's editable fields.
    ///
    pub async fn update_category(
        &self,
        id: u64,
        name: &str,
        name_en: &str,
        is_active: bool,
    ) -> Result<Category, ApiError> {
        debug!("Updating category {}...", id);
        self.client
            .request(
                Method::PUT,
                &format!("/admin/categories/{}", id),
                None,
                Some(json!({
                    "name": name,
                    "name_en": name_en,
                    "is_active": is_active,
                })),
            )
            .await
    }

    /// Persist a new position for a category. The body carries only
    /// `sort_order`; every other field is left untouched.
    ///
    pub async fn update_category_order(&self, id: u64, sort_order: i64) -> Result<Category, ApiError> {
        self.client
            .request(
                Method::PUT,
                &format!("/admin/categories/{}", id),
                None,
                Some(json!({ "sort_order": sort_order })),
            )
            .await
    }

    /// Delete a category.
    ///
    pub async fn delete_category(&self, id: u64) -> Result<(), ApiError> {
        debug!("Deleting category {}...", id);
        self.client
            .request_empty(Method::DELETE, &format!("/admin/categories/{}", id), None, None)
            .await
    }

    /// Returns all search engines in server order.
    ///
    pub async fn search_engines(&self) -> Result<Vec<SearchEngine>, ApiError> {
        debug!("Requesting search engine list...");
        let data: ListData<SearchEngine> = self
            .client
            .request(Method::GET, "/admin/search-engines", None, None)
            .await?;
        debug!("Retrieved {} search engines", data.list.len());
        Ok(data.list)
    }

    /// Create a search engine, appended at the given position.
    ///
    pub async fn create_search_engine(
        &self,
        name: &str,
        url: &str,
        icon_url: &str,
        is_active: bool,
        sort_order: i64,
    ) -> Result<SearchEngine, ApiError> {
        debug!("Creating search engine '{}'...", name);
        self.client
            .request(
                Method::POST,
                "/admin/search-engines",
                None,
                Some(json!({
                    "name": name,
                    "url": url,
                    "icon_url": icon_url,
                    "is_active": is_active,
                    "sort_order": sort_order,
                })),
            )
            .await
    }

    /// Update a search engine's editable fields.
    ///
    pub async fn update_search_engine(
        &self,
        id: u64,
        name: &str,
        url: &str,
        icon_url: &str,
        is_active: bool,
    ) -> Result<SearchEngine, ApiError> {
        debug!("Updating search engine {}...", id);
        self.client
            .request(
                Method::PUT,
                &format!("/admin/search-engines/{}", id),
                None,
                Some(json!({
                    "name": name,
                    "url": url,
                    "icon_url": icon_url,
                    "is_active": is_active,
                })),
            )
            .await
    }

    /// Persist a new position for a search engine.
    ///
    pub async fn update_search_engine_order(&self, id: u64, sort_order: i64) -> Result<SearchEngine, ApiError> {
        self.client
            .request(
                Method::PUT,
                &format!("/admin/search-engines/{}", id),
                None,
                Some(json!({ "sort_order": sort_order })),
            )
            .await
    }

    /// Delete a search engine.
    ///
    pub async fn delete_search_engine(&self, id: u64) -> Result<(), ApiError> {
        debug!("Deleting search engine {}...", id);
        self.client
            .request_empty(
                Method::DELETE,
                &format!("/admin/search-engines/{}", id),
                None,
                None,
            )
            .await
    }

    /// Returns one page of bookmark icons, optionally filtered by
    /// category or keyword.
    ///
    pub async fn icons(
        &self,
        page: i64,
        size: i64,
        category_id: Option<u64>,
        keyword: Option<&str>,
    ) -> Result<Page<Icon>, ApiError> {
        debug!("Requesting icon page {} (size {})...", page, size);

        let mut params = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(category_id) = category_id {
            params.push(("category_id", category_id.to_string()));
        }
        if let Some(keyword) = keyword {
            params.push(("keyword", keyword.to_string()));
        }

        self.client
            .request(Method::GET, "/admin/icons", Some(params), None)
            .await
    }

    /// Create a bookmark icon.
    ///
    pub async fn create_icon(&self, payload: &IconPayload) -> Result<Icon, ApiError> {
        debug!("Creating icon '{}'...", payload.title);
        self.client
            .request(Method::POST, "/admin/icons", None, Some(icon_body(payload)))
            .await
    }

    /// Update a bookmark icon.
    ///
    pub async fn update_icon(&self, id: u64, payload: &IconPayload) -> Result<Icon, ApiError> {
        debug!("Updating icon {}...", id);
        self.client
            .request(
                Method::PUT,
                &format!("/admin/icons/{}", id),
                None,
                Some(icon_body(payload)),
            )
            .await
    }

    /// Delete a bookmark icon.
    ///
    pub async fn delete_icon(&self, id: u64) -> Result<(), ApiError> {
        debug!("Deleting icon {}...", id);
        self.client
            .request_empty(Method::DELETE, &format!("/admin/icons/{}", id), None, None)
            .await
    }

    /// Returns one page of wallpapers.
    ///
    pub async fn wallpapers(&self, page: i64, size: i64) -> Result<Page<Wallpaper>, ApiError> {
        debug!("Requesting wallpaper page {} (size {})...", page, size);
        let params = vec![("page", page.to_string()), ("size", size.to_string())];
        self.client
            .request(Method::GET, "/admin/wallpapers", Some(params), None)
            .await
    }

    /// Create a wallpaper.
    ///
    pub async fn create_wallpaper(&self, payload: &WallpaperPayload) -> Result<Wallpaper, ApiError> {
        debug!("Creating wallpaper '{}'...", payload.title);
        self.client
            .request(
                Method::POST,
                "/admin/wallpapers",
                None,
                Some(wallpaper_body(payload)),
            )
            .await
    }

    /// Update a wallpaper.
    ///
    pub async fn update_wallpaper(&self, id: u64, payload: &WallpaperPayload) -> Result<Wallpaper, ApiError> {
        debug!("Updating wallpaper {}...", id);
        self.client
            .request(
                Method::PUT,
                &format!("/admin/wallpapers/{}", id),
                None,
                Some(wallpaper_body(payload)),
            )
            .await
    }

    /// Delete a wallpaper.
    ///
    pub async fn delete_wallpaper(&self, id: u64) -> Result<(), ApiError> {
        debug!("Deleting wallpaper {}...", id);
        self.client
            .request_empty(Method::DELETE, &format!("/admin/wallpapers/{}", id), None, None)
            .await
    }

    /// Returns all system configuration entries.
    ///
    pub async fn configs(&self) -> Result<Vec<SystemConfig>, ApiError> {
        debug!("Requesting system config list...");
        let data: ListData<SystemConfig> = self
            .client
            .request(Method::GET, "/admin/configs", None, None)
            .await?;
        Ok(data.list)
    }

    /// Returns descriptions of the configuration keys the backend
    /// understands.
    ///
    pub async fn config_keys(&self) -> Result<Vec<ConfigKeyInfo>, ApiError> {
        debug!("Requesting known config keys...");
        let data: KeysData = self
            .client
            .request(Method::GET, "/admin/configs/keys", None, None)
            .await?;
        Ok(data.keys)
    }

    /// Create or overwrite one configuration entry.
    ///
    pub async fn set_config(&self, key: &str, value: &str) -> Result<SystemConfig, ApiError> {
        debug!("Setting config '{}'...", key);
        self.client
            .request(
                Method::POST,
                "/admin/configs",
                None,
                Some(json!({ "key": key, "value": value })),
            )
            .await
    }

    /// Create or overwrite several configuration entries in one call.
    ///
    #[allow(dead_code)]
    pub async fn batch_set_configs(&self, configs: &[(String, String)]) -> Result<(), ApiError> {
        debug!("Batch-setting {} config entries...", configs.len());
        let entries: Vec<_> = configs
            .iter()
            .map(|(key, value)| json!({ "key": key, "value": value }))
            .collect();
        self.client
            .request_empty(
                Method::POST,
                "/admin/configs/batch",
                None,
                Some(json!({ "configs": entries })),
            )
            .await
    }

    /// Delete one configuration entry.
    ///
    pub async fn delete_config(&self, key: &str) -> Result<(), ApiError> {
        debug!("Deleting config '{}'...", key);
        self.client
            .request_empty(Method::DELETE, &format!("/admin/configs/{}", key), None, None)
            .await
    }
}

fn icon_body(payload: &IconPayload) -> serde_json::Value {
    json!({
        "title": payload.title,
        "description": payload.description,
        "url": payload.url,
        "img_url": payload.img_url,
        "bg_color": payload.bg_color,
        "category_ids": payload.category_ids,
        "is_active": payload.is_active,
    })
}

fn wallpaper_body(payload: &WallpaperPayload) -> serde_json::Value {
    json!({
        "title": payload.title,
        "url": payload.url,
        "thumb_url": payload.thumb_url,
        "source": payload.source,
        "is_active": payload.is_active,
    })
}

/// Store adapter persisting category order through the admin API.
///
pub struct CategoryStore {
    api: DualTab,
}

impl CategoryStore {
    pub fn new(api: DualTab) -> Self {
        CategoryStore { api }
    }
}

#[async_trait]
impl OrderStore for CategoryStore {
    type Record = Category;

    async fn fetch(&self) -> Result<Vec<Category>, ApiError> {
        self.api.categories().await
    }

    async fn persist_order(&self, id: u64, sort_order: i64) -> Result<(), ApiError> {
        self.api.update_category_order(id, sort_order).await.map(|_| ())
    }
}

/// Store adapter persisting search engine order through the admin API.
///
pub struct SearchEngineStore {
    api: DualTab,
}

impl SearchEngineStore {
    pub fn new(api: DualTab) -> Self {
        SearchEngineStore { api }
    }
}

#[async_trait]
impl OrderStore for SearchEngineStore {
    type Record = SearchEngine;

    async fn fetch(&self) -> Result<Vec<SearchEngine>, ApiError> {
        self.api.search_engines().await
    }

    async fn persist_order(&self, id: u64, sort_order: i64) -> Result<(), ApiError> {
        self.api
            .update_search_engine_order(id, sort_order)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::OrderedCollection;
    use fake::uuid::UUIDv4;
    use fake::{Fake, Faker};
    use httpmock::MockServer;
    use serde_json::json;
    use uuid::Uuid;

    fn category_json(category: &Category) -> serde_json::Value {
        json!({
            "id": category.id,
            "name": category.name,
            "name_en": category.name_en,
            "sort_order": category.sort_order,
            "is_active": category.is_active,
            "created_at": category.created_at,
            "updated_at": category.updated_at,
        })
    }

    #[tokio::test]
    async fn login_success() {
        let user: AdminUser = Faker.fake();
        let token: Uuid = UUIDv4.fake();

        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/admin/auth/login")
                    .json_body(json!({ "username": "admin", "password": "hunter2" }));
                then.status(200).json_body(json!({
                    "msg": "success",
                    "data": {
                        "token": token.to_string(),
                        "user": { "id": user.id, "username": user.username },
                    }
                }));
            })
            .await;

        let api = DualTab::new(&server.base_url(), None);
        let (got_token, got_user) = api.login("admin", "hunter2").await.unwrap();
        assert_eq!(got_token, token.to_string());
        assert_eq!(got_user, user);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn login_failure_surfaces_server_message() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/admin/auth/login");
                then.status(401)
                    .json_body(json!({ "msg": "invalid username or password" }));
            })
            .await;

        let api = DualTab::new(&server.base_url(), None);
        let err = api.login("admin", "wrong").await.unwrap_err();
        match err {
            ApiError::Server { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid username or password");
            }
            other => panic!("expected server error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn me_sends_bearer_token() {
        let token: Uuid = UUIDv4.fake();
        let user: AdminUser = Faker.fake();

        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/admin/auth/me")
                    .header("Authorization", format!("Bearer {}", token));
                then.status(200).json_body(json!({
                    "msg": "success",
                    "data": { "id": user.id, "username": user.username },
                }));
            })
            .await;

        let api = DualTab::new(&server.base_url(), Some(&token.to_string()));
        assert_eq!(api.me().await.unwrap(), user);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn categories_success() {
        let token: Uuid = UUIDv4.fake();
        let categories: [Category; 2] = Faker.fake();

        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/admin/categories")
                    .header("Authorization", format!("Bearer {}", token));
                then.status(200).json_body(json!({
                    "msg": "success",
                    "data": { "list": [
                        category_json(&categories[0]),
                        category_json(&categories[1]),
                    ]}
                }));
            })
            .await;

        let api = DualTab::new(&server.base_url(), Some(&token.to_string()));
        let list = api.categories().await.unwrap();
        assert_eq!(list, categories.to_vec());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn update_category_order_writes_only_sort_order() {
        let mut category: Category = Faker.fake();
        category.id = 7;
        category.sort_order = 3;

        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("PUT")
                    .path("/admin/categories/7")
                    .json_body(json!({ "sort_order": 3 }));
                then.status(200).json_body(json!({
                    "msg": "success",
                    "data": category_json(&category),
                }));
            })
            .await;

        let api = DualTab::new(&server.base_url(), None);
        let updated = api.update_category_order(7, 3).await.unwrap();
        assert_eq!(updated.sort_order, 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_category_success() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("DELETE").path("/admin/categories/12");
                then.status(200).json_body(json!({ "msg": "success" }));
            })
            .await;

        let api = DualTab::new(&server.base_url(), None);
        api.delete_category(12).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn icons_paginated_with_filters() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/admin/icons")
                    .query_param("page", "2")
                    .query_param("size", "20")
                    .query_param("category_id", "4")
                    .query_param("keyword", "mail");
                then.status(200).json_body(json!({
                    "msg": "success",
                    "data": { "list": [], "total": 41, "page": 2, "size": 20 },
                }));
            })
            .await;

        let api = DualTab::new(&server.base_url(), None);
        let page = api.icons(2, 20, Some(4), Some("mail")).await.unwrap();
        assert_eq!(page.total, 41);
        assert_eq!(page.page_count(), 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn set_config_success() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/admin/configs")
                    .json_body(json!({ "key": "bing_wallpaper_on", "value": "true" }));
                then.status(200).json_body(json!({
                    "msg": "success",
                    "data": {
                        "id": 1,
                        "key": "bing_wallpaper_on",
                        "value": "true",
                        "remark": "",
                    },
                }));
            })
            .await;

        let api = DualTab::new(&server.base_url(), None);
        let config = api.set_config("bing_wallpaper_on", "true").await.unwrap();
        assert_eq!(config.key, "bing_wallpaper_on");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn config_keys_success() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/admin/configs/keys");
                then.status(200).json_body(json!({
                    "msg": "success",
                    "data": { "keys": [
                        { "key": "weather_api_key", "description": "Weather API key", "example": "your-api-key" },
                    ]},
                }));
            })
            .await;

        let api = DualTab::new(&server.base_url(), None);
        let keys = api.config_keys().await.unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, "weather_api_key");
        mock.assert_async().await;
    }

    // A reorder gesture writes every row's new index through the store
    // adapter, one PUT per record.
    #[tokio::test]
    async fn reorder_writes_every_row() {
        let server = MockServer::start();
        let list_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/admin/categories");
                then.status(200).json_body(json!({
                    "msg": "success",
                    "data": { "list": [
                        { "id": 1, "name": "Dev", "sort_order": 0, "is_active": true },
                        { "id": 2, "name": "News", "sort_order": 1, "is_active": true },
                        { "id": 3, "name": "Tools", "sort_order": 2, "is_active": true },
                    ]},
                }));
            })
            .await;

        let mut put_mocks = Vec::new();
        for (id, sort_order) in [(2, 0), (3, 1), (1, 2)] {
            let mock = server
                .mock_async(move |when, then| {
                    when.method("PUT")
                        .path(format!("/admin/categories/{}", id))
                        .json_body(json!({ "sort_order": sort_order }));
                    then.status(200).json_body(json!({
                        "msg": "success",
                        "data": {
                            "id": id,
                            "name": "x",
                            "sort_order": sort_order,
                            "is_active": true,
                        },
                    }));
                })
                .await;
            put_mocks.push(mock);
        }

        let api = DualTab::new(&server.base_url(), None);
        let mut collection = OrderedCollection::new(CategoryStore::new(api));
        collection.load().await.unwrap();
        let generation = collection.generation();
        collection.reorder(0, 2, generation).await.unwrap();

        list_mock.assert_async().await;
        for mock in &put_mocks {
            mock.assert_async().await;
        }
    }
}
