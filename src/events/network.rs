use crate::api::{ApiError, CategoryStore, DualTab, IconPayload, SearchEngineStore, WallpaperPayload};
use crate::ordering::{OrderedCollection, Outcome};
use crate::state::State;
use anyhow::Result;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    Login {
        username: String,
        password: String,
    },
    Me,
    ChangePassword {
        old_password: String,
        new_password: String,
    },
    LoadCategories,
    SaveCategory {
        id: Option<u64>,
        name: String,
        name_en: String,
        is_active: bool,
    },
    DeleteCategory {
        id: u64,
    },
    MoveCategory {
        from: usize,
        to: usize,
        generation: u64,
    },
    LoadSearchEngines,
    SaveSearchEngine {
        id: Option<u64>,
        name: String,
        url: String,
        icon_url: String,
        is_active: bool,
    },
    DeleteSearchEngine {
        id: u64,
    },
    MoveSearchEngine {
        from: usize,
        to: usize,
        generation: u64,
    },
    LoadIcons {
        page: i64,
    },
    SaveIcon {
        id: Option<u64>,
        payload: IconPayload,
    },
    DeleteIcon {
        id: u64,
    },
    LoadWallpapers {
        page: i64,
    },
    SaveWallpaper {
        id: Option<u64>,
        payload: WallpaperPayload,
    },
    DeleteWallpaper {
        id: u64,
    },
    LoadConfigs,
    SaveConfig {
        key: String,
        value: String,
    },
    DeleteConfig {
        key: String,
    },
}

/// Specify struct for managing state with network events.
///
/// Owns the API client and the two reorder synchronizers; the
/// synchronizers are the authority on list order, and the state only
/// mirrors their sequences for rendering.
pub struct Handler {
    state: Arc<Mutex<State>>,
    api: DualTab,
    categories: OrderedCollection<CategoryStore>,
    engines: OrderedCollection<SearchEngineStore>,
}

impl Handler {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: Arc<Mutex<State>>, api: DualTab) -> Self {
        let categories = OrderedCollection::new(CategoryStore::new(api.clone()));
        let engines = OrderedCollection::new(SearchEngineStore::new(api.clone()));
        Handler {
            state,
            api,
            categories,
            engines,
        }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        // Credentials stay out of the log pane.
        match &event {
            Event::Login { username, .. } => {
                debug!("Processing network event 'Login' for '{}'...", username)
            }
            other => debug!("Processing network event '{:?}'...", other),
        }
        match event {
            Event::Login { username, password } => self.login(username, password).await?,
            Event::Me => self.me().await?,
            Event::ChangePassword {
                old_password,
                new_password,
            } => self.change_password(old_password, new_password).await?,
            Event::LoadCategories => self.load_categories().await?,
            Event::SaveCategory {
                id,
                name,
                name_en,
                is_active,
            } => self.save_category(id, name, name_en, is_active).await?,
            Event::DeleteCategory { id } => self.delete_category(id).await?,
            Event::MoveCategory {
                from,
                to,
                generation,
            } => self.move_category(from, to, generation).await?,
            Event::LoadSearchEngines => self.load_search_engines().await?,
            Event::SaveSearchEngine {
                id,
                name,
                url,
                icon_url,
                is_active,
            } => {
                self.save_search_engine(id, name, url, icon_url, is_active)
                    .await?
            }
            Event::DeleteSearchEngine { id } => self.delete_search_engine(id).await?,
            Event::MoveSearchEngine {
                from,
                to,
                generation,
            } => self.move_search_engine(from, to, generation).await?,
            Event::LoadIcons { page } => self.load_icons(page).await?,
            Event::SaveIcon { id, payload } => self.save_icon(id, payload).await?,
            Event::DeleteIcon { id } => self.delete_icon(id).await?,
            Event::LoadWallpapers { page } => self.load_wallpapers(page).await?,
            Event::SaveWallpaper { id, payload } => self.save_wallpaper(id, payload).await?,
            Event::DeleteWallpaper { id } => self.delete_wallpaper(id).await?,
            Event::LoadConfigs => self.load_configs().await?,
            Event::SaveConfig { key, value } => self.save_config(key, value).await?,
            Event::DeleteConfig { key } => self.delete_config(key).await?,
        }
        Ok(())
    }

    /// Exchange credentials for a session. Login failures stay on the
    /// login screen instead of becoming footer notifications.
    ///
    async fn login(&mut self, username: String, password: String) -> Result<()> {
        info!("Logging in as '{}'...", username);
        match self.api.login(&username, &password).await {
            Ok((token, user)) => {
                self.api.set_access_token(Some(token.clone()));
                // The synchronizers hold their own client handles, so
                // rebuild them with the authenticated one.
                self.categories = OrderedCollection::new(CategoryStore::new(self.api.clone()));
                self.engines = OrderedCollection::new(SearchEngineStore::new(self.api.clone()));
                let mut state = self.state.lock().await;
                state.set_session(token, user);
                info!("Login succeeded.");
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                let mut state = self.state.lock().await;
                state.set_loading(false);
                state.set_auth_error(login_failure_message(e));
            }
        }
        Ok(())
    }

    /// Update state with details of the authenticated user. A rejected
    /// token drops the session back to the login screen.
    ///
    async fn me(&mut self) -> Result<()> {
        info!("Fetching authenticated user details...");
        match self.api.me().await {
            Ok(user) => {
                let mut state = self.state.lock().await;
                state.set_user(user);
                Ok(())
            }
            Err(ApiError::Server { status: 401, message }) => {
                self.api.set_access_token(None);
                let mut state = self.state.lock().await;
                state.clear_session(message);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn change_password(&mut self, old_password: String, new_password: String) -> Result<()> {
        info!("Changing admin password...");
        self.api
            .change_password(&old_password, &new_password)
            .await?;
        let mut state = self.state.lock().await;
        state.set_loading(false);
        state.notify_success("Password changed");
        Ok(())
    }

    /// Re-read the authoritative category order and mirror it.
    ///
    async fn load_categories(&mut self) -> Result<()> {
        info!("Fetching categories...");
        self.categories.load().await?;
        let mut state = self.state.lock().await;
        state.set_categories(
            self.categories.items().to_vec(),
            self.categories.generation(),
        );
        info!("Received {} categories.", self.categories.items().len());
        Ok(())
    }

    async fn save_category(
        &mut self,
        id: Option<u64>,
        name: String,
        name_en: String,
        is_active: bool,
    ) -> Result<()> {
        match id {
            Some(id) => {
                info!("Updating category {}...", id);
                self.api
                    .update_category(id, &name, &name_en, is_active)
                    .await?;
            }
            None => {
                info!("Creating category '{}'...", name);
                // New records are appended: their position is the
                // current collection length.
                let sort_order = self.categories.items().len() as i64;
                self.api
                    .create_category(&name, &name_en, is_active, sort_order)
                    .await?;
            }
        }
        self.load_categories().await?;
        let mut state = self.state.lock().await;
        state.notify_success(if id.is_some() {
            "Category updated"
        } else {
            "Category created"
        });
        Ok(())
    }

    async fn delete_category(&mut self, id: u64) -> Result<()> {
        info!("Deleting category {}...", id);
        self.api.delete_category(id).await?;
        self.load_categories().await?;
        let mut state = self.state.lock().await;
        state.notify_success("Category deleted");
        Ok(())
    }

    /// Persist a category reorder gesture. The terminal handler has
    /// already moved the row in the rendered mirror; this confirms the
    /// order with the server, or resynchronizes and reports when any
    /// write fails, in which case the list may snap to a different
    /// order than the gesture produced.
    ///
    async fn move_category(&mut self, from: usize, to: usize, generation: u64) -> Result<()> {
        let result = self.categories.reorder(from, to, generation).await;
        let mut state = self.state.lock().await;
        state.set_categories(
            self.categories.items().to_vec(),
            self.categories.generation(),
        );
        match result {
            Ok(Outcome::Applied) => {
                info!("Category order persisted ({} -> {}).", from, to);
                Ok(())
            }
            Ok(Outcome::Noop) => Ok(()),
            Ok(Outcome::Stale) => {
                debug!("Dropped stale category reorder gesture.");
                Ok(())
            }
            Err(e) => {
                state.notify_error(format!("Reorder failed, order reloaded: {}", e));
                Err(e.into())
            }
        }
    }

    /// Re-read the authoritative search engine order and mirror it.
    ///
    async fn load_search_engines(&mut self) -> Result<()> {
        info!("Fetching search engines...");
        self.engines.load().await?;
        let mut state = self.state.lock().await;
        state.set_engines(self.engines.items().to_vec(), self.engines.generation());
        info!("Received {} search engines.", self.engines.items().len());
        Ok(())
    }

    async fn save_search_engine(
        &mut self,
        id: Option<u64>,
        name: String,
        url: String,
        icon_url: String,
        is_active: bool,
    ) -> Result<()> {
        match id {
            Some(id) => {
                info!("Updating search engine {}...", id);
                self.api
                    .update_search_engine(id, &name, &url, &icon_url, is_active)
                    .await?;
            }
            None => {
                info!("Creating search engine '{}'...", name);
                let sort_order = self.engines.items().len() as i64;
                self.api
                    .create_search_engine(&name, &url, &icon_url, is_active, sort_order)
                    .await?;
            }
        }
        self.load_search_engines().await?;
        let mut state = self.state.lock().await;
        state.notify_success(if id.is_some() {
            "Search engine updated"
        } else {
            "Search engine created"
        });
        Ok(())
    }

    async fn delete_search_engine(&mut self, id: u64) -> Result<()> {
        info!("Deleting search engine {}...", id);
        self.api.delete_search_engine(id).await?;
        self.load_search_engines().await?;
        let mut state = self.state.lock().await;
        state.notify_success("Search engine deleted");
        Ok(())
    }

    async fn move_search_engine(&mut self, from: usize, to: usize, generation: u64) -> Result<()> {
        let result = self.engines.reorder(from, to, generation).await;
        let mut state = self.state.lock().await;
        state.set_engines(self.engines.items().to_vec(), self.engines.generation());
        match result {
            Ok(Outcome::Applied) => {
                info!("Search engine order persisted ({} -> {}).", from, to);
                Ok(())
            }
            Ok(Outcome::Noop) => Ok(()),
            Ok(Outcome::Stale) => {
                debug!("Dropped stale search engine reorder gesture.");
                Ok(())
            }
            Err(e) => {
                state.notify_error(format!("Reorder failed, order reloaded: {}", e));
                Err(e.into())
            }
        }
    }

    async fn load_icons(&mut self, page: i64) -> Result<()> {
        info!("Fetching icon page {}...", page);
        let data = self
            .api
            .icons(page, crate::state::PAGE_SIZE, None, None)
            .await?;
        let mut state = self.state.lock().await;
        state.set_icons(data);
        Ok(())
    }

    async fn save_icon(&mut self, id: Option<u64>, payload: IconPayload) -> Result<()> {
        match id {
            Some(id) => {
                info!("Updating icon {}...", id);
                self.api.update_icon(id, &payload).await?;
            }
            None => {
                info!("Creating icon '{}'...", payload.title);
                self.api.create_icon(&payload).await?;
            }
        }
        let page = {
            let state = self.state.lock().await;
            state.icons_page()
        };
        self.load_icons(page).await?;
        let mut state = self.state.lock().await;
        state.notify_success(if id.is_some() {
            "Bookmark updated"
        } else {
            "Bookmark created"
        });
        Ok(())
    }

    async fn delete_icon(&mut self, id: u64) -> Result<()> {
        info!("Deleting icon {}...", id);
        self.api.delete_icon(id).await?;
        let page = {
            let state = self.state.lock().await;
            state.icons_page()
        };
        self.load_icons(page).await?;
        let mut state = self.state.lock().await;
        state.notify_success("Bookmark deleted");
        Ok(())
    }

    async fn load_wallpapers(&mut self, page: i64) -> Result<()> {
        info!("Fetching wallpaper page {}...", page);
        let data = self
            .api
            .wallpapers(page, crate::state::PAGE_SIZE)
            .await?;
        let mut state = self.state.lock().await;
        state.set_wallpapers(data);
        Ok(())
    }

    async fn save_wallpaper(&mut self, id: Option<u64>, payload: WallpaperPayload) -> Result<()> {
        match id {
            Some(id) => {
                info!("Updating wallpaper {}...", id);
                self.api.update_wallpaper(id, &payload).await?;
            }
            None => {
                info!("Creating wallpaper '{}'...", payload.title);
                self.api.create_wallpaper(&payload).await?;
            }
        }
        let page = {
            let state = self.state.lock().await;
            state.wallpapers_page()
        };
        self.load_wallpapers(page).await?;
        let mut state = self.state.lock().await;
        state.notify_success(if id.is_some() {
            "Wallpaper updated"
        } else {
            "Wallpaper created"
        });
        Ok(())
    }

    async fn delete_wallpaper(&mut self, id: u64) -> Result<()> {
        info!("Deleting wallpaper {}...", id);
        self.api.delete_wallpaper(id).await?;
        let page = {
            let state = self.state.lock().await;
            state.wallpapers_page()
        };
        self.load_wallpapers(page).await?;
        let mut state = self.state.lock().await;
        state.notify_success("Wallpaper deleted");
        Ok(())
    }

    async fn load_configs(&mut self) -> Result<()> {
        info!("Fetching system configuration...");
        let configs = self.api.configs().await?;
        let keys = self.api.config_keys().await?;
        let mut state = self.state.lock().await;
        state.set_configs(configs);
        state.set_config_keys(keys);
        Ok(())
    }

    async fn save_config(&mut self, key: String, value: String) -> Result<()> {
        info!("Saving config '{}'...", key);
        self.api.set_config(&key, &value).await?;
        self.load_configs().await?;
        let mut state = self.state.lock().await;
        state.notify_success("Config saved");
        Ok(())
    }

    async fn delete_config(&mut self, key: String) -> Result<()> {
        info!("Deleting config '{}'...", key);
        self.api.delete_config(&key).await?;
        self.load_configs().await?;
        let mut state = self.state.lock().await;
        state.notify_success("Config deleted");
        Ok(())
    }
}

/// Turn a login API failure into a message for the login screen.
///
fn login_failure_message(error: ApiError) -> String {
    match error {
        ApiError::Server { message, .. } => message,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failure_message_prefers_server_text() {
        let message = login_failure_message(ApiError::Server {
            status: 401,
            message: "invalid username or password".to_string(),
        });
        assert_eq!(message, "invalid username or password");

        let message = login_failure_message(ApiError::MissingData);
        assert!(message.contains("missing data"));
    }
}
